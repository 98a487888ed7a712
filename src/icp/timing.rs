use std::time::Duration;

/// longest single wait handed to `Hardware::delay_us`; longer waits get split
pub const MAX_DELAY_SLICE_US: u32 = 16383;

/// Delays (in microseconds) around the clock pulse that completes an operation.
///
/// `setup_us` is waited before raising CLK, `hold_us` while CLK is high.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TimingProfile {
	pub setup_us: u32,
	pub hold_us: u32,
	/// upper bound for the total delay of a length-scaled operation
	pub max_total_us: Option<u32>,
}

impl TimingProfile {
	pub const RESET: TimingProfile = TimingProfile::new(10_000, 1_000);
	// setup: settle after the entry magic, hold: settle after the exit magic
	pub const MODE: TimingProfile = TimingProfile::new(10, 500);
	pub const MASS_ERASE: TimingProfile = TimingProfile::new(65_000, 1_000);
	pub const PAGE_ERASE: TimingProfile = TimingProfile::new(6_000, 100).capped(3_200_000);
	pub const PROGRAM: TimingProfile = TimingProfile::new(25, 5).capped(2_000_000);
	pub const READ: TimingProfile = TimingProfile::new(1, 1);

	pub const fn new(setup_us: u32, hold_us: u32) -> Self {
		TimingProfile {
			setup_us,
			hold_us,
			max_total_us: None,
		}
	}

	pub const fn capped(self, max_total_us: u32) -> Self {
		TimingProfile {
			max_total_us: Some(max_total_us),
			..self
		}
	}

	pub fn per_unit_us(&self) -> u32 {
		self.setup_us + self.hold_us
	}

	/// Total delay spent on `units` repetitions (bytes or pages), bounded by
	/// `max_total_us`.
	pub fn budget(&self, units: usize) -> Duration {
		let total = (units as u64).saturating_mul(u64::from(self.per_unit_us()));
		let total = match self.max_total_us {
			Some(cap) => total.min(u64::from(cap)),
			None => total,
		};
		Duration::from_micros(total)
	}

	/// Whether `units` repetitions stay within `max_total_us` (if any).
	pub fn fits(&self, units: usize) -> bool {
		match self.max_total_us {
			Some(cap) => (units as u64).saturating_mul(u64::from(self.per_unit_us())) <= u64::from(cap),
			None => true,
		}
	}
}

/// Operation classes with their own timing.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Operation {
	Reset,
	Mode,
	MassErase,
	PageErase,
	Program,
	Read,
}

impl Operation {
	pub fn profile(self) -> TimingProfile {
		match self {
			Operation::Reset => TimingProfile::RESET,
			Operation::Mode => TimingProfile::MODE,
			Operation::MassErase => TimingProfile::MASS_ERASE,
			Operation::PageErase => TimingProfile::PAGE_ERASE,
			Operation::Program => TimingProfile::PROGRAM,
			Operation::Read => TimingProfile::READ,
		}
	}
}

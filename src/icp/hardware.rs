use std::thread;
use std::time::{
	Duration,
	Instant,
};

pub fn reliable_sleep(mut duration: Duration) {
	loop {
		let now = Instant::now();
		thread::sleep(duration);
		let elapsed = now.elapsed();
		if elapsed >= duration {
			return;
		}
		duration -= elapsed;
	}
}

/// One of the three ICP signal lines.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Line {
	Data,
	Clock,
	Reset,
}

/// Pin primitives of the platform; the ICP layers are built on top of these.
pub trait Hardware {
	/// switch line to output (if needed) and drive it to `level`
	fn drive(&mut self, line: Line, level: bool);

	/// switch line to input, leaving it floating (high impedance)
	fn float(&mut self, line: Line);

	/// read the current input level of a (floating) line
	fn sample(&mut self, line: Line) -> bool;

	// busy wait / sleep for (at least) `us` microseconds
	fn delay_us(&mut self, us: u16) {
		reliable_sleep(Duration::from_micros(u64::from(us)));
	}
}

impl<'a, H: ?Sized + Hardware> Hardware for &'a mut H {
	fn drive(&mut self, line: Line, level: bool) {
		H::drive(*self, line, level)
	}

	fn float(&mut self, line: Line) {
		H::float(*self, line)
	}

	fn sample(&mut self, line: Line) -> bool {
		H::sample(*self, line)
	}

	fn delay_us(&mut self, us: u16) {
		H::delay_us(*self, us)
	}
}

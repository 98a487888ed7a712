use std::fmt;
use std::ops::{
	BitOr,
	BitOrAssign,
};

const NOT_EQUAL: u8 = 0x01;
const GREATER: u8 = 0x02; // some bit needs to go from 0 to 1
const NOT_EMPTY: u8 = 0x04; // desired data isn't all 0xff

/// Outcome of comparing device contents with desired data, OR-ed over all
/// compared bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CompareResult(pub u8);

impl CompareResult {
	pub fn of_byte(current: u8, desired: u8) -> Self {
		let mut flags = 0;
		if current != desired {
			flags |= NOT_EQUAL;
		}
		if current & desired != desired {
			flags |= GREATER;
		}
		if desired != 0xff {
			flags |= NOT_EMPTY;
		}
		CompareResult(flags)
	}

	// both slices need the same length
	pub(crate) fn of(current: &[u8], desired: &[u8]) -> Self {
		assert_eq!(current.len(), desired.len());
		current.iter().zip(desired)
			.map(|(c, d)| CompareResult::of_byte(*c, *d))
			.fold(CompareResult::default(), |acc, r| acc | r)
	}

	pub fn is_not_equal(&self) -> bool {
		0 != self.0 & NOT_EQUAL
	}
	pub fn is_greater(&self) -> bool {
		0 != self.0 & GREATER
	}
	pub fn is_not_empty(&self) -> bool {
		0 != self.0 & NOT_EMPTY
	}

	pub fn is_equal(&self) -> bool {
		!self.is_not_equal()
	}

	/// only an erase can set the bits the desired data needs
	pub fn need_erase(&self) -> bool {
		self.is_not_equal() && self.is_greater()
	}

	/// programming is required (erasing alone doesn't produce the data)
	pub fn need_write(&self) -> bool {
		self.is_not_equal() && self.is_not_empty()
	}
}

impl BitOr for CompareResult {
	type Output = CompareResult;

	fn bitor(self, rhs: CompareResult) -> CompareResult {
		CompareResult(self.0 | rhs.0)
	}
}

impl BitOrAssign for CompareResult {
	fn bitor_assign(&mut self, rhs: CompareResult) {
		self.0 |= rhs.0;
	}
}

impl fmt::Debug for CompareResult {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:02x} (", self.0)?;
		if self.is_equal() { write!(f, "[EQUAL]")?; }
		if self.is_not_equal() { write!(f, "[NOT_EQUAL]")?; }
		if self.is_greater() { write!(f, " [GREATER]")?; }
		if self.is_not_empty() { write!(f, " [NOT_EMPTY]")?; }
		write!(f, ")")
	}
}

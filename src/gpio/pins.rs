use std::fmt;
use std::str;

use crate::icp::Line;

/// GPIO numbers of the three ICP lines, written as `data,clock,reset`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct LinePins {
	pub data: u32,
	pub clock: u32,
	pub reset: u32,
}

impl LinePins {
	pub fn get(&self, line: Line) -> u32 {
		match line {
			Line::Data => self.data,
			Line::Clock => self.clock,
			Line::Reset => self.reset,
		}
	}
}

impl fmt::Display for LinePins {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{},{},{}", self.data, self.clock, self.reset)
	}
}

impl str::FromStr for LinePins {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let parts: Vec<&str> = s.split(',').map(str::trim).collect();
		ensure!(parts.len() == 3, "Expected GPIO lines as data,clock,reset: {:?}", s);

		let mut numbers = [0u32; 3];
		for (name, (part, number)) in ["data", "clock", "reset"].iter().zip(parts.iter().zip(numbers.iter_mut())) {
			*number = with_context!(("invalid {} GPIO: {:?}", name, part),
				Ok(part.parse::<u32>()?)
			)?;
		}

		let pins = LinePins {
			data: numbers[0],
			clock: numbers[1],
			reset: numbers[2],
		};
		ensure!(pins.data != pins.clock && pins.data != pins.reset && pins.clock != pins.reset,
			"GPIO lines must be distinct: {}", pins);

		Ok(pins)
	}
}

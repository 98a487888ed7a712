//! Host-side `Hardware` implementations driving real GPIO lines.

mod pins;
mod sysfs;

pub use self::pins::LinePins;

// OS-specific. for now linux only.
pub use self::sysfs::{
	SysfsGpio,
	SysfsLine,
	open_sysfs,
};

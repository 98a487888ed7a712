#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

macro_rules! with_context {
	(( $fmt:tt $($t:tt)* ), $e:expr) => {{
		use failure::Error;

		match (|| { $e })() {
			Ok(v) => Ok(v),
			Err(e) => {
				let e: Error = e;
				let msg = format!(concat!($fmt, ": {}") $($t)*, e);
				Err(Error::from(e.context(msg)))
			}
		}
	}};

	($msg:expr, $e:expr) => {
		with_context!(("{}", $msg), $e)
	};
}

pub type AResult<T> = Result<T, failure::Error>;

pub mod compare;
pub mod config;
pub mod device;
pub mod gpio;
pub mod icp;

pub use self::compare::CompareResult;
pub use self::config::ConfigBytes;
pub use self::device::{
	DeviceIdentity,
	N76E616,
	NUVOTON,
};
pub use self::icp::{
	Hardware,
	Icp,
	Line,
	Operation,
	Session,
};

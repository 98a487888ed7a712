/// In-Circuit Programming for Nuvoton 8051 parts (N76E003, N76E616, ...)
///
/// Three lines: DATA (bidirectional), CLK and RESET, all driven by the host.
///
/// Entering ICP mode:
/// - RESET high, then the 24-bit reset magic shifted onto RESET
/// - 24-bit entry magic clocked onto DATA
///
/// Commands are 24-bit words (MSB first): `parameter << 6 | opcode`, with the
/// parameter usually being an address in the unified address space (flash
/// at 0, the 5 config bytes at 0x30000).
///
/// Data phases use 9 CLK cycles per byte: 8 data bits and a trailer bit.
/// - reading: device drives the 8 data bits, host sends the trailer (1 on
///   the last byte of a burst)
/// - writing: host drives all 9 bits; the trailer pulse is stretched to the
///   programming / erase time
///
/// Leaving ICP mode: 24-bit exit magic on DATA, then all lines released.

mod hardware;
mod low_level;
mod operations;
mod session;
mod timing;

#[cfg(test)]
pub(crate) mod simulator;

pub use self::hardware::{
	Hardware,
	Line,
	reliable_sleep,
};

// bit transport and raw memory operations stay internal: only `Session`
// (i.e. ICP mode entered) may use them
use self::low_level::LowLevel;

use self::operations::MemoryOperations;

pub use self::session::{
	Icp,
	Session,
};

pub use self::timing::{
	MAX_DELAY_SLICE_US,
	Operation,
	TimingProfile,
};

pub(crate) mod consts {
	pub const MAGIC_RESET: u32 = 0x9e1cb6;
	pub const MAGIC_ENTER: u32 = 0x5aa503;
	pub const MAGIC_EXIT: u32 = 0x0f78f0;

	pub const OPCODE_MASK: u8 = 0x3f;
	pub const PARAMETER_MASK: u32 = 0x3_ffff;

	pub const CMD_READ_FLASH: u8 = 0x00;
	pub const CMD_READ_CID: u8 = 0x0b; // company id
	pub const CMD_READ_DEVICE_ID: u8 = 0x0c; // parameter selects low (0) / high (1) byte
	pub const CMD_WRITE_FLASH: u8 = 0x21;
	pub const CMD_PAGE_ERASE: u8 = 0x22;
	pub const CMD_MASS_ERASE: u8 = 0x26;

	// parameter for CMD_MASS_ERASE
	pub const MASS_ERASE_KEY: u32 = 0x3a5a5;
}

//! CONFIG0..CONFIG4 fuse bytes at the start of the config region

use std::fmt;

use crate::device::CONFIG_LEN;

const CONFIG0_CBS: u8 = 0x80; // boot from APROM (1) or LDROM (0)
const CONFIG0_LOCK: u8 = 0x02; // 0: flash locked
const CONFIG1_LDSIZE_MASK: u8 = 0x07;

// LDROM size is encoded in 1 KiB steps, up to 7 KiB
const LDSIZE_UNIT: u32 = 1024;
const LDSIZE_MAX_UNITS: u32 = 7;

pub const fn config0(cbs: bool) -> u8 {
	if cbs { 0xff } else { 0x7f }
}

/// encode LDROM size (rounded up to full KiB)
pub fn config1(ldsize: u16) -> u8 {
	let units = (u32::from(ldsize) + LDSIZE_UNIT - 1) / LDSIZE_UNIT;
	0xff - units.min(LDSIZE_MAX_UNITS) as u8
}

pub const fn cbs(config0: u8) -> bool {
	0 != config0 & CONFIG0_CBS
}

/// decode LDROM size in bytes (multiple of 1 KiB)
pub const fn ldsize(config1: u8) -> u16 {
	(LDSIZE_MAX_UNITS as u16 - (config1 & CONFIG1_LDSIZE_MASK) as u16) * LDSIZE_UNIT as u16
}

pub const fn is_locked(config0: u8) -> bool {
	0 == config0 & CONFIG0_LOCK
}

/// The config bytes as stored on the device; erased means all 0xff.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigBytes(pub [u8; CONFIG_LEN]);

impl Default for ConfigBytes {
	fn default() -> Self {
		ConfigBytes([0xff; CONFIG_LEN])
	}
}

impl ConfigBytes {
	pub fn cbs(&self) -> bool {
		cbs(self.0[0])
	}

	pub fn locked(&self) -> bool {
		is_locked(self.0[0])
	}

	pub fn ldrom_size(&self) -> u16 {
		ldsize(self.0[1])
	}

	pub fn with_cbs(mut self, cbs: bool) -> Self {
		self.0[0] = (self.0[0] & !CONFIG0_CBS) | (config0(cbs) & CONFIG0_CBS);
		self
	}

	pub fn with_locked(mut self, locked: bool) -> Self {
		if locked {
			self.0[0] &= !CONFIG0_LOCK;
		} else {
			self.0[0] |= CONFIG0_LOCK;
		}
		self
	}

	pub fn with_ldrom_size(mut self, ldsize: u16) -> Self {
		self.0[1] = (self.0[1] & !CONFIG1_LDSIZE_MASK) | (config1(ldsize) & CONFIG1_LDSIZE_MASK);
		self
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}
}

impl fmt::Debug for ConfigBytes {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f,
			"{:02x} {:02x} {:02x} {:02x} {:02x} (LDROM: {} KiB",
			self.0[0], self.0[1], self.0[2], self.0[3], self.0[4],
			self.ldrom_size() / 1024,
		)?;
		if self.cbs() { write!(f, " [CBS]")?; }
		if self.locked() { write!(f, " [LOCKED]")?; }
		write!(f, ")")
	}
}

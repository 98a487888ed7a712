use crate::compare::CompareResult;

use super::consts::*;
use super::timing::TimingProfile;
use super::LowLevel;

/// Memory operations on the unified ICP address space.
///
/// Only valid while the target is in ICP mode; `Session` takes care of that.
pub(crate) trait MemoryOperations: LowLevel {
	fn read_company_id(&mut self) -> u8 {
		self.command(CMD_READ_CID, 0);
		self.read9(true)
	}

	fn read_device_id(&mut self) -> u16 {
		self.command(CMD_READ_DEVICE_ID, 0);
		let lo = self.read9(true);
		self.command(CMD_READ_DEVICE_ID, 1);
		let hi = self.read9(true);
		u16::from(hi) << 8 | u16::from(lo)
	}

	// erase page containing `address`
	fn erase(&mut self, address: u32) {
		self.command(CMD_PAGE_ERASE, address);
		self.write9(0xff, true, TimingProfile::PAGE_ERASE);
	}

	fn mass_erase(&mut self) {
		self.command(CMD_MASS_ERASE, MASS_ERASE_KEY);
		self.write9(0xff, true, TimingProfile::MASS_ERASE);
	}

	// device increments the address itself after each byte
	fn read(&mut self, address: u32, target: &mut [u8]) {
		if target.is_empty() {
			return;
		}
		self.command(CMD_READ_FLASH, address);
		let last = target.len() - 1;
		for (i, t) in target.iter_mut().enumerate() {
			*t = self.read9(i == last);
		}
	}

	// can only clear bits; erasing first is the caller's job
	fn write(&mut self, address: u32, data: &[u8]) {
		if data.is_empty() {
			return;
		}
		self.command(CMD_WRITE_FLASH, address);
		let last = data.len() - 1;
		for (i, b) in data.iter().enumerate() {
			self.write9(*b, i == last, TimingProfile::PROGRAM);
		}
	}

	fn compare(&mut self, address: u32, desired: &[u8]) -> CompareResult {
		let mut current = vec![0u8; desired.len()];
		self.read(address, &mut current);
		CompareResult::of(&current, desired)
	}
}

impl<H: LowLevel + ?Sized> MemoryOperations for H {
}

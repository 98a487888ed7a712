use std::time::Duration;

use crate::compare::CompareResult;
use crate::config::{
	self,
	ConfigBytes,
};
use crate::device::{
	CONFIG_BASE,
	DeviceIdentity,
	NUVOTON,
	Region,
};

use super::consts::*;
use super::timing::{
	Operation,
	TimingProfile,
};
use super::{
	Hardware,
	LowLevel,
	MemoryOperations,
};

/// Owner of the three ICP lines; the target runs normally while no
/// `Session` is active.
///
/// Memory operations are only reachable through a `Session`; the raw
/// operations on the hardware aren't public:
///
/// ```compile_fail
/// use nuvoton_icp::icp::MemoryOperations;
/// ```
pub struct Icp<H: Hardware> {
	hardware: H,
}

impl<H: Hardware> Icp<H> {
	pub fn new(mut hardware: H) -> Self {
		hardware.release_lines();
		Icp { hardware }
	}

	pub fn into_inner(self) -> H {
		self.hardware
	}

	/// Enter ICP mode and identify the target.
	///
	/// Doesn't fail if nothing (or something else) is connected: check
	/// `Session::company_id` (or use `enter_checked`).
	pub fn enter(&mut self) -> Session<H> {
		let hw = &mut self.hardware;
		hw.claim_lines();
		hw.reset_sequence();
		hw.write24(MAGIC_ENTER);
		hw.wait_us(TimingProfile::MODE.setup_us);

		let company_id = hw.read_company_id();
		let mut session = Session {
			icp: self,
			identity: DeviceIdentity {
				company_id,
				device_id: 0,
			},
			active: true,
		};
		session.update_device_id();

		if company_id == NUVOTON {
			info!("ICP: entered, {}", session.identity);
		} else {
			warn!("ICP: unexpected company id 0x{:02x} (expected 0x{:02x})", company_id, NUVOTON);
		}

		session
	}

	/// `enter`, but fail unless a Nuvoton device answered.
	pub fn enter_checked(&mut self) -> crate::AResult<Session<H>> {
		let session = self.enter();
		let company_id = session.company_id();
		if company_id != NUVOTON {
			// leave ICP mode again (drop) before reporting
			drop(session);
			bail!("No Nuvoton device found: company id 0x{:02x} (expected 0x{:02x})", company_id, NUVOTON);
		}
		Ok(session)
	}
}

/// Target in ICP mode; leaves it again when dropped.
pub struct Session<'a, H: Hardware + 'a> {
	icp: &'a mut Icp<H>,
	identity: DeviceIdentity,
	active: bool,
}

impl<'a, H: Hardware> Drop for Session<'a, H> {
	fn drop(&mut self) {
		if self.active {
			self.leave();
		}
	}
}

impl<'a, H: Hardware> Session<'a, H> {
	fn hw(&mut self) -> &mut H {
		&mut self.icp.hardware
	}

	fn leave(&mut self) {
		self.active = false;
		let hw = self.hw();
		hw.write24(MAGIC_EXIT);
		hw.wait_us(TimingProfile::MODE.hold_us);
		hw.release_lines();
		debug!("ICP: left programming mode");
	}

	/// Leave ICP mode and release the lines, letting the target run.
	pub fn exit(mut self) {
		self.leave();
	}

	pub fn identity(&self) -> DeviceIdentity {
		self.identity
	}

	pub fn company_id(&self) -> u8 {
		self.identity.company_id
	}

	pub fn device_id(&self) -> u16 {
		self.identity.device_id
	}

	pub fn page_size(&self) -> u16 {
		self.identity.page_size()
	}

	pub fn flash_size(&self) -> u32 {
		self.identity.flash_size()
	}

	pub fn update_device_id(&mut self) -> u16 {
		let device_id = self.hw().read_device_id();
		self.identity.device_id = device_id;
		debug!("ICP: device id 0x{:04x}", device_id);
		device_id
	}

	/// Flash read/write protection; while set, flash contents read back
	/// meaningless.
	pub fn locked(&mut self) -> bool {
		let mut config0 = [0u8];
		self.hw().read(CONFIG_BASE, &mut config0);
		let locked = config::is_locked(config0[0]);
		if locked {
			warn!("ICP: device is locked (CONFIG0 0x{:02x})", config0[0]);
		}
		locked
	}

	/// Total time the given operation spends waiting on the device for
	/// `len` bytes starting at the beginning of a page.
	pub fn budget(&self, operation: Operation, len: usize) -> Duration {
		let units = match operation {
			Operation::PageErase => {
				let page_size = usize::from(self.page_size());
				len / page_size + (len % page_size != 0) as usize
			},
			Operation::Program | Operation::Read => len,
			Operation::Reset | Operation::Mode | Operation::MassErase => 1,
		};
		operation.profile().budget(units)
	}

	// CONFIG

	pub fn config_erase(&mut self) {
		self.hw().erase(CONFIG_BASE);
	}

	pub fn config_read(&mut self) -> ConfigBytes {
		let mut config = ConfigBytes::default();
		self.hw().read(CONFIG_BASE, &mut config.0);
		config
	}

	pub fn config_write(&mut self, config: &ConfigBytes) {
		self.hw().write(CONFIG_BASE, config.as_bytes());
	}

	pub fn config_compare(&mut self, config: &ConfigBytes) -> CompareResult {
		self.hw().compare(CONFIG_BASE, config.as_bytes())
	}

	pub fn config_verify(&mut self, config: &ConfigBytes) -> bool {
		self.config_compare(config).is_equal()
	}

	// FLASH

	fn check_flash_range(&self, address: u32, len: usize) -> crate::AResult<()> {
		let region = Region::Flash;
		let size = u64::from(region.base()) + u64::from(region.len(&self.identity));
		let end = u64::from(address) + len as u64;
		ensure!(end <= size && (len == 0 || region.contains(&self.identity, address)),
			"Flash range 0x{:05x}+0x{:x} exceeds flash size 0x{:05x} of device 0x{:04x}",
			address, len, size, self.device_id()
		);
		Ok(())
	}

	/// Erase the page containing `address`.
	pub fn flash_erase(&mut self, address: u32) -> crate::AResult<()> {
		self.check_flash_range(address, 1)?;
		self.hw().erase(address);
		Ok(())
	}

	/// Erase all pages overlapping `address..address+len`.
	pub fn flash_erase_range(&mut self, address: u32, len: usize) -> crate::AResult<()> {
		if len == 0 {
			return Ok(());
		}
		self.check_flash_range(address, len)?;
		let page_size = u32::from(self.page_size());
		let first = address - address % page_size;
		let end = address + len as u32;
		let pages = ((end - first + page_size - 1) / page_size) as usize;
		ensure!(TimingProfile::PAGE_ERASE.fits(pages),
			"Erasing {} pages exceeds the page erase time limit", pages);
		debug!("ICP: erasing 0x{:05x}..0x{:05x} (max {:?})",
			first, end, self.budget(Operation::PageErase, (end - first) as usize));
		let mut page = first;
		while page < end {
			self.hw().erase(page);
			page += page_size;
		}
		Ok(())
	}

	pub fn flash_read(&mut self, address: u32, target: &mut [u8]) -> crate::AResult<()> {
		self.check_flash_range(address, target.len())?;
		self.hw().read(address, target);
		Ok(())
	}

	/// Program `data` at `address`; bits can only be cleared, erase first
	/// where `flash_compare` says so.
	pub fn flash_write(&mut self, address: u32, data: &[u8]) -> crate::AResult<()> {
		self.check_flash_range(address, data.len())?;
		ensure!(TimingProfile::PROGRAM.fits(data.len()),
			"Writing {} bytes exceeds the programming time limit", data.len());
		debug!("ICP: writing {} bytes at 0x{:05x} (max {:?})",
			data.len(), address, self.budget(Operation::Program, data.len()));
		self.hw().write(address, data);
		Ok(())
	}

	pub fn flash_compare(&mut self, address: u32, desired: &[u8]) -> crate::AResult<CompareResult> {
		self.check_flash_range(address, desired.len())?;
		Ok(self.hw().compare(address, desired))
	}

	pub fn flash_verify(&mut self, address: u32, desired: &[u8]) -> crate::AResult<bool> {
		Ok(self.flash_compare(address, desired)?.is_equal())
	}

	// MASS

	/// Erase all of flash (and the config bytes) in one operation.
	pub fn mass_erase(&mut self) {
		info!("ICP: mass erase");
		self.hw().mass_erase();
	}
}

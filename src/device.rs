use std::fmt;

pub const NUVOTON: u8 = 0xda; // company id
pub const N76E616: u16 = 0x2f50; // device id of the only part with 256-byte pages

pub const CONFIG_BASE: u32 = 0x3_0000;
pub const CONFIG_LEN: usize = 5;

// largest flash tier encoded in the device id; everything above is 18 KiB
const MAX_SIZE_TIER: u8 = 4;

pub fn page_size(device_id: u16) -> u16 {
	if device_id == N76E616 { 256 } else { 128 }
}

pub fn flash_size(device_id: u16) -> u32 {
	let tier = (device_id as u8) >> 4;
	if tier <= MAX_SIZE_TIER {
		4096 << tier
	} else {
		18 * 1024
	}
}

/// Identity bytes read from the target after entering ICP mode.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DeviceIdentity {
	pub company_id: u8,
	pub device_id: u16,
}

impl DeviceIdentity {
	pub fn is_nuvoton(&self) -> bool {
		self.company_id == NUVOTON
	}

	pub fn page_size(&self) -> u16 {
		page_size(self.device_id)
	}

	pub fn flash_size(&self) -> u32 {
		flash_size(self.device_id)
	}
}

impl fmt::Display for DeviceIdentity {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "company 0x{:02x}, device 0x{:04x} ({} KiB flash, {} byte pages)",
			self.company_id,
			self.device_id,
			self.flash_size() / 1024,
			self.page_size(),
		)
	}
}

/// The two regions of the ICP address space.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Region {
	Flash,
	Config,
}

impl Region {
	pub fn base(self) -> u32 {
		match self {
			Region::Flash => 0,
			Region::Config => CONFIG_BASE,
		}
	}

	pub fn len(self, identity: &DeviceIdentity) -> u32 {
		match self {
			Region::Flash => identity.flash_size(),
			Region::Config => CONFIG_LEN as u32,
		}
	}

	pub fn contains(self, identity: &DeviceIdentity, address: u32) -> bool {
		address >= self.base() && address - self.base() < self.len(identity)
	}
}

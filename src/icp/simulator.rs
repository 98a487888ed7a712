//! Simulated ICP target, decoding the pin activity of a `Hardware` user.

use crate::config;
use crate::device::{
	self,
	CONFIG_BASE,
	CONFIG_LEN,
	NUVOTON,
};

use super::consts::*;
use super::timing::TimingProfile;
use super::{
	Hardware,
	Line,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Source {
	Memory(u32),
	CompanyId,
	DeviceId(u32),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Phase {
	// running normally, watching for the entry magic
	Idle,
	Command,
	Read(Source),
	Program(u32),
	PageErase(u32),
	MassErase,
}

// erase/program pulse currently holding CLK high
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Trailer {
	Program,
	PageErase,
}

fn line_index(line: Line) -> usize {
	match line {
		Line::Data => 0,
		Line::Clock => 1,
		Line::Reset => 2,
	}
}

pub struct Simulator {
	pub flash: Vec<u8>,
	pub config: [u8; CONFIG_LEN],
	pub company_id: u8,
	pub device_id: u16,
	// without a target DATA just floats high
	pub connected: bool,
	// erase/program pulses with too short setup time (and therefore ignored)
	pub timing_violations: usize,
	pub max_delay_us: u16,
	// summed setup + hold of all program / page erase pulses
	pub program_wait_us: u64,
	pub page_erase_wait_us: u64,
	pub commands: Vec<u32>,

	// None: floating
	driven: [Option<bool>; 3],
	reset_history: u32,
	phase: Phase,
	shift: u32,
	bits: usize,
	frame_bit: usize,
	frame_byte: u8,
	out_bit: bool,
	since_clock_us: u64,
	trailer: Option<Trailer>,
}

impl Simulator {
	pub fn new(device_id: u16) -> Self {
		Simulator {
			flash: vec![0xff; device::flash_size(device_id) as usize],
			config: [0xff; CONFIG_LEN],
			company_id: NUVOTON,
			device_id,
			connected: true,
			timing_violations: 0,
			max_delay_us: 0,
			program_wait_us: 0,
			page_erase_wait_us: 0,
			commands: Vec::new(),
			driven: [None; 3],
			reset_history: 0,
			phase: Phase::Idle,
			shift: 0,
			bits: 0,
			frame_bit: 0,
			frame_byte: 0,
			out_bit: true,
			since_clock_us: 0,
			trailer: None,
		}
	}

	pub fn in_icp(&self) -> bool {
		self.phase != Phase::Idle
	}

	pub fn lines_released(&self) -> bool {
		self.driven.iter().all(Option::is_none)
	}

	fn level(&self, line: Line) -> bool {
		// floating lines are pulled up
		self.driven[line_index(line)].unwrap_or(true)
	}

	fn locked(&self) -> bool {
		config::is_locked(self.config[0])
	}

	fn read_source(&self, source: Source) -> u8 {
		match source {
			Source::CompanyId => self.company_id,
			Source::DeviceId(p) => (self.device_id >> (8 * (p & 1))) as u8,
			Source::Memory(address) if address >= CONFIG_BASE => {
				*self.config.get((address - CONFIG_BASE) as usize).unwrap_or(&0xff)
			},
			Source::Memory(_) if self.locked() => 0xff,
			Source::Memory(address) => *self.flash.get(address as usize).unwrap_or(&0xff),
		}
	}

	fn program(&mut self, address: u32, data: u8) {
		let cell = if address >= CONFIG_BASE {
			self.config.get_mut((address - CONFIG_BASE) as usize)
		} else {
			self.flash.get_mut(address as usize)
		};
		if let Some(cell) = cell {
			*cell &= data;
		}
	}

	fn page_erase(&mut self, address: u32) {
		if address >= CONFIG_BASE {
			self.config = [0xff; CONFIG_LEN];
			return;
		}
		let page_size = device::page_size(self.device_id) as usize;
		let start = address as usize / page_size * page_size;
		let end = (start + page_size).min(self.flash.len());
		for b in &mut self.flash[start.min(end)..end] {
			*b = 0xff;
		}
	}

	fn mass_erase(&mut self) {
		for b in self.flash.iter_mut() {
			*b = 0xff;
		}
		self.config = [0xff; CONFIG_LEN];
	}

	fn shift_in(&mut self, data: bool) {
		self.shift = ((self.shift << 1) | data as u32) & 0xff_ffff;
		self.bits += 1;
	}

	fn start_phase(&mut self, phase: Phase) {
		self.phase = phase;
		self.shift = 0;
		self.bits = 0;
		self.frame_bit = 0;
		self.frame_byte = 0;
	}

	fn command(&mut self, word: u32) {
		self.commands.push(word);
		if word == MAGIC_EXIT {
			self.start_phase(Phase::Idle);
			return;
		}
		let opcode = (word & u32::from(OPCODE_MASK)) as u8;
		let parameter = word >> 6;
		let phase = match opcode {
			CMD_READ_FLASH => Phase::Read(Source::Memory(parameter)),
			CMD_READ_CID => Phase::Read(Source::CompanyId),
			CMD_READ_DEVICE_ID => Phase::Read(Source::DeviceId(parameter)),
			CMD_WRITE_FLASH => Phase::Program(parameter),
			CMD_PAGE_ERASE => Phase::PageErase(parameter),
			CMD_MASS_ERASE if parameter == MASS_ERASE_KEY => Phase::MassErase,
			_ => Phase::Command,
		};
		self.start_phase(phase);
	}

	// trailer of an erase/program frame; returns whether the setup time was met
	fn trailer_timing_ok(&mut self, profile: TimingProfile) -> bool {
		if self.since_clock_us < u64::from(profile.setup_us) {
			self.timing_violations += 1;
			return false;
		}
		true
	}

	fn account(&mut self, trailer: Trailer) {
		match trailer {
			Trailer::Program => self.program_wait_us += self.since_clock_us,
			Trailer::PageErase => self.page_erase_wait_us += self.since_clock_us,
		}
	}

	fn rising_edge(&mut self) {
		let data = self.level(Line::Data);
		match self.phase {
			Phase::Idle => {
				self.shift_in(data);
				if self.bits >= 24
					&& self.shift == MAGIC_ENTER
					&& self.reset_history & 0xff_ffff == MAGIC_RESET
					&& !self.level(Line::Reset)
				{
					self.start_phase(Phase::Command);
				}
			},
			Phase::Command => {
				self.shift_in(data);
				if self.bits == 24 {
					let word = self.shift;
					self.command(word);
				}
			},
			Phase::Read(source) => {
				if self.frame_bit < 8 {
					if self.frame_bit == 0 {
						self.frame_byte = self.read_source(source);
					}
					self.out_bit = 0 != (self.frame_byte >> (7 - self.frame_bit)) & 1;
					self.frame_bit += 1;
				} else {
					self.frame_bit = 0;
					if data {
						self.start_phase(Phase::Command);
					} else {
						let next = match source {
							Source::Memory(a) => Source::Memory(a + 1),
							Source::DeviceId(p) => Source::DeviceId(p + 1),
							Source::CompanyId => Source::CompanyId,
						};
						self.phase = Phase::Read(next);
					}
				}
			},
			Phase::Program(address) => {
				if self.frame_bit < 8 {
					self.frame_byte = (self.frame_byte << 1) | data as u8;
					self.frame_bit += 1;
				} else {
					self.frame_bit = 0;
					self.account(Trailer::Program);
					self.trailer = Some(Trailer::Program);
					if self.trailer_timing_ok(TimingProfile::PROGRAM) {
						let byte = self.frame_byte;
						self.program(address, byte);
					}
					if data {
						self.start_phase(Phase::Command);
					} else {
						self.phase = Phase::Program(address + 1);
					}
				}
			},
			Phase::PageErase(address) => {
				if self.frame_bit < 8 {
					self.frame_bit += 1;
				} else {
					self.account(Trailer::PageErase);
					self.trailer = Some(Trailer::PageErase);
					if self.trailer_timing_ok(TimingProfile::PAGE_ERASE) {
						self.page_erase(address);
					}
					self.start_phase(Phase::Command);
				}
			},
			Phase::MassErase => {
				if self.frame_bit < 8 {
					self.frame_bit += 1;
				} else {
					if self.trailer_timing_ok(TimingProfile::MASS_ERASE) {
						self.mass_erase();
					}
					self.start_phase(Phase::Command);
				}
			},
		}
	}
}

impl Hardware for Simulator {
	fn drive(&mut self, line: Line, level: bool) {
		let previous = self.level(line);
		self.driven[line_index(line)] = Some(level);
		if !self.connected {
			return;
		}
		match line {
			Line::Clock => {
				if previous != level {
					if level {
						self.rising_edge();
					} else if let Some(trailer) = self.trailer.take() {
						self.account(trailer);
					}
					self.since_clock_us = 0;
				}
			},
			Line::Reset => {
				self.reset_history = (self.reset_history << 1) | level as u32;
				self.start_phase(Phase::Idle);
			},
			Line::Data => (),
		}
	}

	fn float(&mut self, line: Line) {
		self.driven[line_index(line)] = None;
	}

	fn sample(&mut self, line: Line) -> bool {
		match (line, self.phase) {
			(Line::Data, Phase::Read(_)) if self.connected => self.out_bit,
			_ => self.level(line),
		}
	}

	fn delay_us(&mut self, us: u16) {
		self.since_clock_us += u64::from(us);
		self.max_delay_us = self.max_delay_us.max(us);
	}
}

use super::consts::*;
use super::timing::{
	MAX_DELAY_SLICE_US,
	TimingProfile,
};
use super::{
	Hardware,
	Line,
};

const WORD_WIDTH: usize = 24;
const WORD_MASK: u32 = (1u32 << WORD_WIDTH) - 1;

/// Bit transport on top of the pin primitives.
pub(crate) trait LowLevel: Hardware {
	// wait `us` microseconds, split into slices `delay_us` can handle
	fn wait_us(&mut self, mut us: u32) {
		while us > 0 {
			let slice = us.min(MAX_DELAY_SLICE_US);
			self.delay_us(slice as u16);
			us -= slice;
		}
	}

	// one CLK pulse: wait `setup_us` with CLK low, then keep it high for
	// `hold_us` and drop it again
	fn tiktok(&mut self, setup_us: u32, hold_us: u32) {
		self.wait_us(setup_us);
		self.drive(Line::Clock, true);
		self.wait_us(hold_us);
		self.drive(Line::Clock, false);
	}

	fn pulse(&mut self, profile: TimingProfile) {
		self.tiktok(profile.setup_us, profile.hold_us);
	}

	// send `num` lowest bits from word, starting with highest bit
	fn write_bits(&mut self, word: u32, num: usize) {
		assert!(num <= 32);
		for bit in (0..num).rev() {
			self.drive(Line::Data, 0 != (word >> bit) & 1);
			self.pulse(TimingProfile::READ);
		}
	}

	fn write24(&mut self, word: u32) {
		debug_assert!(word <= WORD_MASK, "command word 0x{:x} wider than 24 bits", word);
		self.write_bits(word & WORD_MASK, WORD_WIDTH);
	}

	// every command is a 6-bit opcode and an (up to) 18-bit parameter
	fn command(&mut self, opcode: u8, parameter: u32) {
		debug_assert!(opcode <= OPCODE_MASK);
		debug_assert!(parameter <= PARAMETER_MASK, "command parameter 0x{:x} too wide", parameter);
		trace!("ICP command 0x{:02x} @ 0x{:05x}", opcode, parameter);
		self.write24((parameter & PARAMETER_MASK) << 6 | u32::from(opcode & OPCODE_MASK));
	}

	// receive 8 data bits (MSB first) and send the trailer bit; `last`
	// ends the read burst
	fn read9(&mut self, last: bool) -> u8 {
		self.float(Line::Data);
		let mut result = 0u8;
		for _ in 0..8 {
			self.pulse(TimingProfile::READ);
			result = (result << 1) | (self.sample(Line::Data) as u8);
		}
		self.drive(Line::Data, last);
		self.pulse(TimingProfile::READ);
		self.drive(Line::Data, false);
		result
	}

	// send 8 data bits and a trailer bit; the trailer pulse carries the
	// operation timing (programming / erasing happens while waiting)
	fn write9(&mut self, data: u8, last: bool, profile: TimingProfile) {
		self.write_bits(u32::from(data), 8);
		self.drive(Line::Data, last);
		self.pulse(profile);
		self.drive(Line::Data, false);
	}

	// hold RESET high, then shift the reset magic onto RESET, each level
	// held for the second reset phase
	fn reset_sequence(&mut self) {
		let profile = TimingProfile::RESET;
		self.drive(Line::Reset, true);
		self.wait_us(profile.setup_us);
		for bit in (0..WORD_WIDTH).rev() {
			self.drive(Line::Reset, 0 != (MAGIC_RESET >> bit) & 1);
			self.wait_us(profile.hold_us);
		}
	}

	// drive DATA and CLK low, ready to clock
	fn claim_lines(&mut self) {
		self.drive(Line::Clock, false);
		self.drive(Line::Data, false);
	}

	fn release_lines(&mut self) {
		self.float(Line::Data);
		self.float(Line::Clock);
		self.float(Line::Reset);
	}
}

impl<H: Hardware + ?Sized> LowLevel for H {
}

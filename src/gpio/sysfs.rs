use std::fs;
use std::io::{
	self,
	Write,
};
use std::os::unix::fs::FileExt;
use std::path::{
	Path,
	PathBuf,
};

use crate::icp::{
	Hardware,
	Line,
	reliable_sleep,
};

use super::LinePins;

const SYSFS_GPIO: &str = "/sys/class/gpio";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Direction {
	Input,
	Output(bool),
}

/// One exported GPIO line, driven through its `direction` and `value` files.
pub struct SysfsLine {
	number: u32,
	path: PathBuf,
	value: fs::File,
	direction: Direction,
}

fn write_file(path: &Path, data: &str) -> io::Result<()> {
	// need to write in one syscall for sysfs
	fs::OpenOptions::new().write(true).open(path)?.write_all(data.as_bytes())
}

impl SysfsLine {
	pub fn open(number: u32) -> crate::AResult<Self> {
		let path = Path::new(SYSFS_GPIO).join(format!("gpio{}", number));
		with_context!(("couldn't open GPIO {}", number), {
			if !path.exists() {
				debug!("GPIO {}: exporting", number);
				write_file(&Path::new(SYSFS_GPIO).join("export"), &number.to_string())?;
			}
			let value = fs::OpenOptions::new()
				.read(true)
				.write(true)
				.open(path.join("value"))?;

			let mut line = SysfsLine {
				number,
				path,
				value,
				direction: Direction::Output(false),
			};
			// start floating; the state of an already exported line is unknown
			line.set_direction(Direction::Input)?;
			Ok(line)
		})
	}

	pub fn number(&self) -> u32 {
		self.number
	}

	fn set_direction(&mut self, direction: Direction) -> io::Result<()> {
		let setting = match direction {
			Direction::Input => "in",
			// sets level and direction in one step (no glitch)
			Direction::Output(false) => "low",
			Direction::Output(true) => "high",
		};
		write_file(&self.path.join("direction"), setting)?;
		self.direction = direction;
		Ok(())
	}

	fn write_value(&mut self, level: bool) -> io::Result<()> {
		let data: &[u8] = if level { b"1" } else { b"0" };
		let l = self.value.write_at(data, 0)?;
		if l != data.len() {
			return Err(io::Error::new(io::ErrorKind::Other, "failed to write GPIO value"));
		}
		self.direction = Direction::Output(level);
		Ok(())
	}

	fn read_value(&self) -> io::Result<bool> {
		let mut buf = [0u8; 1];
		let l = self.value.read_at(&mut buf, 0)?;
		if l != buf.len() {
			return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "failed to read GPIO value"));
		}
		Ok(buf[0] == b'1')
	}

	pub fn drive(&mut self, level: bool) {
		let result = match self.direction {
			Direction::Output(current) if current == level => Ok(()),
			Direction::Output(_) => self.write_value(level),
			Direction::Input => self.set_direction(Direction::Output(level)),
		};
		result.expect("driving exported GPIO must not fail");
	}

	pub fn float(&mut self) {
		if self.direction != Direction::Input {
			self.set_direction(Direction::Input).expect("releasing exported GPIO must not fail");
		}
	}

	pub fn sample(&mut self) -> bool {
		self.read_value().expect("reading exported GPIO must not fail")
	}
}

/// ICP lines on Linux sysfs GPIOs.
///
/// sysfs is slow (several microseconds per access), which only stretches
/// the protocol timing; all delays are minimums.
pub struct SysfsGpio {
	pins: LinePins,
	data: SysfsLine,
	clock: SysfsLine,
	reset: SysfsLine,
}

impl SysfsGpio {
	pub fn pins(&self) -> LinePins {
		self.pins
	}

	fn line(&mut self, line: Line) -> &mut SysfsLine {
		match line {
			Line::Data => &mut self.data,
			Line::Clock => &mut self.clock,
			Line::Reset => &mut self.reset,
		}
	}
}

impl Hardware for SysfsGpio {
	fn drive(&mut self, line: Line, level: bool) {
		self.line(line).drive(level);
	}

	fn float(&mut self, line: Line) {
		self.line(line).float();
	}

	fn sample(&mut self, line: Line) -> bool {
		self.line(line).sample()
	}

	fn delay_us(&mut self, us: u16) {
		// sysfs access itself takes longer than short delays
		if us > 1 {
			reliable_sleep(std::time::Duration::from_micros(u64::from(us)));
		}
	}
}

fn open_line(pins: LinePins, line: Line) -> crate::AResult<SysfsLine> {
	with_context!(("couldn't set up ICP {:?} line", line), {
		SysfsLine::open(pins.get(line))
	})
}

pub fn open_sysfs(pins: LinePins) -> crate::AResult<SysfsGpio> {
	info!("ICP on GPIO lines {} (data,clock,reset)", pins);
	Ok(SysfsGpio {
		pins,
		data: open_line(pins, Line::Data)?,
		clock: open_line(pins, Line::Clock)?,
		reset: open_line(pins, Line::Reset)?,
	})
}

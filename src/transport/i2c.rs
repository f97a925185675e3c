//! # I2C Bus Access
//!
//! The byte-level I2C capability consumed by expander-based ports, plus a
//! Linux implementation over the kernel's `i2c-dev` interface.
//!
//! ## Linux Setup
//!
//! The adapter must be visible as a character device:
//!
//! ```bash
//! # Raspberry Pi: enable the i2c-1 bus, then
//! $ ls /dev/i2c-*
//! /dev/i2c-1
//!
//! # Probe for the expander (MCP23017 with address pins grounded = 0x20)
//! $ i2cdetect -y 1
//! ```
//!
//! Opening the device may require membership in the `i2c` group.

use crate::error::BusError;

/// SMBus-style access to devices on an I2C bus.
///
/// `addr` is the 7-bit device address. Register variants cover devices with
/// an internal register pointer (MCP23017); plain variants cover registerless
/// devices (PCF8574).
pub trait I2cBus {
    /// Write a bare byte to the device.
    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), BusError>;

    /// Read a bare byte from the device.
    fn read_byte(&mut self, addr: u16) -> Result<u8, BusError>;

    /// Write `value` into the device register at `register`.
    fn write_register(&mut self, addr: u16, register: u8, value: u8) -> Result<(), BusError>;

    /// Read the device register at `register`.
    fn read_register(&mut self, addr: u16, register: u8) -> Result<u8, BusError>;
}

/// ioctl request selecting the slave address for subsequent I/O.
#[cfg(unix)]
const I2C_SLAVE: libc::c_ulong = 0x0703;

/// I2C bus backed by a Linux `/dev/i2c-N` character device.
///
/// Register access uses plain write/read transactions (write the register
/// pointer, then transfer the data byte), which is what `smbus` byte-data
/// calls do on the wire.
#[cfg(unix)]
pub struct LinuxI2cDev {
    file: std::fs::File,
    /// Address currently selected via `I2C_SLAVE`, to skip redundant ioctls.
    selected: Option<u16>,
}

#[cfg(unix)]
impl LinuxI2cDev {
    /// Open an I2C adapter device, e.g. `/dev/i2c-1`.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self, BusError> {
        let path = path.as_ref();
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| BusError::Open(format!("{}: {}", path.display(), e)))?;
        Ok(Self {
            file,
            selected: None,
        })
    }

    /// Point subsequent reads/writes at the device at `addr`.
    fn select(&mut self, addr: u16) -> Result<(), BusError> {
        use std::os::unix::io::AsRawFd;

        if self.selected == Some(addr) {
            return Ok(());
        }
        let rc = unsafe { libc::ioctl(self.file.as_raw_fd(), I2C_SLAVE, addr as libc::c_ulong) };
        if rc != 0 {
            return Err(BusError::Write(format!(
                "I2C_SLAVE 0x{:02x}: {}",
                addr,
                std::io::Error::last_os_error()
            )));
        }
        self.selected = Some(addr);
        Ok(())
    }

    fn write_all(&mut self, addr: u16, bytes: &[u8]) -> Result<(), BusError> {
        use std::io::Write;

        self.file
            .write_all(bytes)
            .map_err(|e| BusError::Write(format!("device 0x{:02x}: {}", addr, e)))
    }

    fn read_one(&mut self, addr: u16) -> Result<u8, BusError> {
        use std::io::Read;

        let mut buf = [0u8; 1];
        self.file
            .read_exact(&mut buf)
            .map_err(|e| BusError::Read(format!("device 0x{:02x}: {}", addr, e)))?;
        Ok(buf[0])
    }
}

#[cfg(unix)]
impl I2cBus for LinuxI2cDev {
    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), BusError> {
        self.select(addr)?;
        self.write_all(addr, &[value])
    }

    fn read_byte(&mut self, addr: u16) -> Result<u8, BusError> {
        self.select(addr)?;
        self.read_one(addr)
    }

    fn write_register(&mut self, addr: u16, register: u8, value: u8) -> Result<(), BusError> {
        self.select(addr)?;
        self.write_all(addr, &[register, value])
    }

    fn read_register(&mut self, addr: u16, register: u8) -> Result<u8, BusError> {
        self.select(addr)?;
        self.write_all(addr, &[register])?;
        self.read_one(addr)
    }
}

/*
 * This file is part of nctprobe.
 *
 * Copyright (C) 2025 nctprobe contributors
 *
 * nctprobe is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 2 of the License, or
 * (at your option) any later version.
 *
 * nctprobe is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with nctprobe. If not, see <https://www.gnu.org/licenses/>.
 */

//! Single-byte register access to one device on one SMBus segment.

use std::io;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

#[cfg(any(target_os = "linux", target_os = "android"))]
use i2cdev::{core::I2CDevice, linux::LinuxI2CDevice};

use crate::error::Result;

/// Byte-wide register access bound to one bus handle and one device address.
///
/// A failed transaction comes back as `Err`; callers treat it as "value
/// absent" and carry on.
#[cfg_attr(test, automock)]
pub trait RegisterTransport {
    fn read_byte(&mut self, register: u8) -> io::Result<u8>;
    fn write_byte(&mut self, register: u8, value: u8) -> io::Result<()>;
}

/// A `/dev/i2c-N` node with the slave address already selected.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub struct SmbusDevice {
    dev: LinuxI2CDevice,
}

#[cfg(any(target_os = "linux", target_os = "android"))]
impl SmbusDevice {
    /// Open `path` and bind it to `address`. `force` takes the address even
    /// when a kernel driver has already claimed it.
    pub fn open(path: &Path, address: u8, force: bool) -> Result<Self> {
        let dev = if force {
            // SAFETY: we only issue byte reads and writes; the bound driver may see stale state
            unsafe { LinuxI2CDevice::force_new(path, u16::from(address)) }
        } else {
            LinuxI2CDevice::new(path, u16::from(address))
        };
        let dev = dev.map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(Self { dev })
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
impl RegisterTransport for SmbusDevice {
    fn read_byte(&mut self, register: u8) -> io::Result<u8> {
        self.dev
            .smbus_read_byte_data(register)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }

    fn write_byte(&mut self, register: u8, value: u8) -> io::Result<()> {
        self.dev
            .smbus_write_byte_data(register, value)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub struct SmbusDevice;

#[cfg(not(any(target_os = "linux", target_os = "android")))]
impl SmbusDevice {
    pub fn open(_path: &Path, _address: u8, _force: bool) -> Result<Self> {
        Err(crate::error::ProbeError::Unsupported)
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
impl RegisterTransport for SmbusDevice {
    fn read_byte(&mut self, _register: u8) -> io::Result<u8> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "smbus transport is linux-only"))
    }

    fn write_byte(&mut self, _register: u8, _value: u8) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "smbus transport is linux-only"))
    }
}

//! Linux i2c-dev bus implementation.
//!
//! Talks to `/dev/i2c-N` through the kernel's userspace I2C interface. The
//! slave address is re-targeted only when a call names a different device
//! than the previous one.
//!
//! Transfers here are short ioctls (a handful of bytes at bus speed) and are
//! issued inline on the calling task.

use std::path::Path;

use async_trait::async_trait;
use i2cdev::core::{I2CDevice, I2CMessage, I2CTransfer};
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError, LinuxI2CMessage};
use nix::errno::Errno;

use crate::hw_trait::{HwError, I2c, I2cError, Result};
use crate::tracing::prelude::*;

/// I2C bus backed by a Linux i2c-dev character device.
pub struct LinuxI2c {
    dev: LinuxI2CDevice,
    address: u8,
}

impl LinuxI2c {
    /// Open `path` (e.g. `/dev/i2c-1`) and select `address` as the initial
    /// slave.
    pub fn open(path: impl AsRef<Path>, address: u8) -> Result<Self> {
        let path = path.as_ref();
        let dev = LinuxI2CDevice::new(path, address.into()).map_err(|e| {
            HwError::Other(format!("Failed to open {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), address, "Opened i2c-dev bus");
        Ok(Self { dev, address })
    }

    fn select(&mut self, addr: u8) -> Result<()> {
        if addr != self.address {
            self.dev.set_slave_address(addr.into()).map_err(|e| bus_error(addr, e))?;
            self.address = addr;
        }
        Ok(())
    }
}

/// Translate an i2c-dev failure into the bus fault it stands for.
///
/// The kernel adapters report a missing ACK as ENXIO or EREMOTEIO, lost
/// arbitration as EAGAIN and a stuck transfer as ETIMEDOUT.
fn bus_error(addr: u8, e: LinuxI2CError) -> HwError {
    let raw = match &e {
        LinuxI2CError::Errno(errno) => Some(*errno),
        LinuxI2CError::Io(io) => io.raw_os_error(),
    };

    match raw.map(Errno::from_raw) {
        Some(Errno::ENXIO | Errno::EREMOTEIO) => HwError::I2c(I2cError::NoAck(addr)),
        Some(Errno::EAGAIN) => HwError::I2c(I2cError::ArbitrationLost),
        Some(Errno::ETIMEDOUT) => HwError::Timeout,
        Some(Errno::EIO) => HwError::I2c(I2cError::BusError),
        _ => HwError::I2c(I2cError::Other(e.to_string())),
    }
}

#[async_trait]
impl I2c for LinuxI2c {
    async fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        self.select(addr)?;
        trace!(addr, data = ?data, "i2c write");
        self.dev.write(data).map_err(|e| bus_error(addr, e))
    }

    async fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        self.select(addr)?;
        self.dev.read(buffer).map_err(|e| bus_error(addr, e))?;
        trace!(addr, data = ?buffer, "i2c read");
        Ok(())
    }

    async fn write_read(&mut self, addr: u8, write: &[u8], read: &mut [u8]) -> Result<()> {
        self.select(addr)?;
        let mut msgs = [LinuxI2CMessage::write(write), LinuxI2CMessage::read(read)];
        self.dev.transfer(&mut msgs).map_err(|e| bus_error(addr, e))?;
        Ok(())
    }
}

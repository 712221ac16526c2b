//! TCS34725 RGBC color light-to-digital converter driver.
//!
//! The TCS34725 is an I2C color sensor with four photodiode channels (clear,
//! red, green, blue), each digitized by a 16-bit integrating ADC. This driver
//! covers power-up, fixed integration time and gain configuration, and the
//! 8-byte data block read.
//!
//! Datasheet: <https://cdn-shop.adafruit.com/datasheets/TCS34725.pdf>

use std::time::Duration;

use bitflags::bitflags;

use crate::color::ColorSample;
use crate::hw_trait::{Delay, I2c, Result};
use crate::tracing::prelude::*;

/// Default I2C address for TCS34725
pub const DEFAULT_ADDRESS: u8 = 0x29;

/// Bit 7 of the address byte selects the command register. Every register
/// access on this part must carry it.
pub const COMMAND_BIT: u8 = 0x80;

/// Oscillator warm-up required between PON and AEN
pub const POWER_ON_DELAY: Duration = Duration::from_millis(3);

/// Time for the first RGBC integration cycle to complete after enabling
pub const FIRST_INTEGRATION_DELAY: Duration = Duration::from_millis(50);

/// ATIME value written at init: 0xFF, the largest register value (256 - 0xFF
/// = 1 cycle, 2.4 ms).
pub const DEFAULT_ATIME: u8 = 0xFF;

/// CONTROL value written at init: AGAIN = 0b00, 1x gain.
pub const DEFAULT_CONTROL: u8 = 0x00;

/// TCS34725 register addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    /// Enables states and interrupts
    Enable = 0x00,
    /// RGBC integration time
    Atime = 0x01,
    /// Analog gain control
    Control = 0x0F,
    /// Clear data low byte, start of the 8-byte RGBC block
    Cdatal = 0x14,
}

impl Register {
    /// Address byte as sent on the bus.
    pub const fn command(self) -> u8 {
        COMMAND_BIT | self as u8
    }
}

bitflags! {
    /// ENABLE (0x00) register bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Enable: u8 {
        /// Power on, starts the internal oscillator
        const PON = 0x01;
        /// RGBC ADC enable
        const AEN = 0x02;
    }
}

/// TCS34725 driver.
///
/// Owns the bus transport and the wait capability for the one sensor it
/// talks to. Nothing is cached between calls: every read goes to hardware.
pub struct Tcs34725<I: I2c, D: Delay> {
    i2c: I,
    delay: D,
    address: u8,
}

impl<I: I2c, D: Delay> Tcs34725<I, D> {
    /// Create a new TCS34725 driver with default address
    pub fn new(i2c: I, delay: D) -> Self {
        Self::new_with_address(i2c, delay, DEFAULT_ADDRESS)
    }

    /// Create a new TCS34725 driver with custom address
    pub fn new_with_address(i2c: I, delay: D, address: u8) -> Self {
        Self { i2c, delay, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Power up the sensor and start RGBC conversion.
    ///
    /// PON and AEN must be written separately with the oscillator warm-up in
    /// between. On return the first integration cycle has completed and
    /// `read_color` yields valid data. The first failing write aborts the
    /// sequence and its error is returned as-is.
    pub async fn initialize(&mut self) -> Result<()> {
        debug!(address = self.address, "Powering on TCS34725");
        self.write_register(Register::Enable, Enable::PON.bits()).await?;
        self.delay.delay(POWER_ON_DELAY).await;

        debug!("Enabling RGBC conversion");
        self.write_register(Register::Enable, (Enable::PON | Enable::AEN).bits())
            .await?;

        self.write_register(Register::Atime, DEFAULT_ATIME).await?;
        self.write_register(Register::Control, DEFAULT_CONTROL).await?;

        // No data is valid until one integration cycle has elapsed
        self.delay.delay(FIRST_INTEGRATION_DELAY).await;
        debug!(
            atime = DEFAULT_ATIME,
            control = DEFAULT_CONTROL,
            "TCS34725 initialized"
        );
        Ok(())
    }

    /// Read the clear, red, green and blue channels in one block transfer.
    pub async fn read_color(&mut self) -> Result<ColorSample> {
        let mut buf = [0u8; ColorSample::WIRE_SIZE];
        self.i2c
            .write_read(self.address, &[Register::Cdatal.command()], &mut buf)
            .await?;
        trace!(data = ?buf, "RGBC block");
        Ok(ColorSample::from_le_bytes(buf))
    }

    /// Put the sensor back into its low-power sleep state.
    pub async fn power_down(&mut self) -> Result<()> {
        self.write_register(Register::Enable, Enable::empty().bits())
            .await
    }

    /// Give back the bus and delay.
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    async fn write_register(&mut self, reg: Register, value: u8) -> Result<()> {
        trace!(reg = ?reg, value = %format!("{:#04x}", value), "Register write");
        self.i2c
            .write(self.address, &[reg.command(), value])
            .await
    }
}

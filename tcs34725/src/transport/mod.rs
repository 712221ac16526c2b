//! Physical transport layer for the sensor bus.
//!
//! Implementations of [`I2c`](crate::hw_trait::I2c) that reach real
//! hardware. Tests use the in-crate fakes instead.

pub mod linux;

pub use linux::LinuxI2c;

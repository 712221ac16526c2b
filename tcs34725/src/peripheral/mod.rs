//! Drivers for devices attached over the hardware traits.

pub mod tcs34725;

pub use tcs34725::Tcs34725;

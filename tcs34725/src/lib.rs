//! Driver for the TCS34725 RGBC color sensor.
//!
//! ```text
//! caller ──▶ Gateway ──▶ Tcs34725 ──▶ I2c ──▶ sensor
//!            (requests,   (registers,  (i2c-dev
//!             lifecycle)   timing)      or fake)
//! ```
//!
//! The [`gateway::Gateway`] accepts one request, "read the current color",
//! and answers with a [`ColorSample`] whose wire form is eight bytes:
//! clear, red, green, blue as little-endian `u16`.

pub mod color;
pub mod config;
pub mod gateway;
pub mod hw_trait;
pub mod peripheral;
pub mod tracing;
pub mod transport;

pub use color::ColorSample;
pub use config::SensorConfig;
pub use gateway::{Gateway, GatewayState, RequestError, SharedGateway, READ_COLOR};
pub use peripheral::Tcs34725;

use hw_trait::TokioDelay;
use transport::LinuxI2c;

/// Gateway over a Linux i2c-dev bus with real delays.
pub type LinuxGateway = Gateway<LinuxI2c, TokioDelay>;

/// Open the configured bus and wrap it in an unattached gateway.
pub fn open(config: &SensorConfig) -> hw_trait::Result<LinuxGateway> {
    let i2c = LinuxI2c::open(&config.bus, config.address)?;
    let sensor = Tcs34725::new_with_address(i2c, TokioDelay, config.address);
    Ok(Gateway::new(sensor))
}

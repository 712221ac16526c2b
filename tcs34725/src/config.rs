//! Sensor location configuration.
//!
//! Parses environment variables naming the i2c-dev bus and the sensor's
//! address on it.

use std::path::PathBuf;

use thiserror::Error;

use crate::peripheral::tcs34725::DEFAULT_ADDRESS;

/// Bus used when `TCS34725_I2C_BUS` is unset.
pub const DEFAULT_BUS: &str = "/dev/i2c-1";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid I2C address {0:?} (expected 7-bit value, e.g. 0x29)")]
    InvalidAddress(String),
}

/// Where to find the sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorConfig {
    /// i2c-dev device node.
    pub bus: PathBuf,

    /// 7-bit I2C address of the sensor.
    pub address: u8,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            bus: PathBuf::from(DEFAULT_BUS),
            address: DEFAULT_ADDRESS,
        }
    }
}

impl SensorConfig {
    /// Parse configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TCS34725_I2C_BUS`: i2c-dev path (default: `/dev/i2c-1`)
    /// - `TCS34725_ADDRESS`: sensor address, hex with `0x` prefix or decimal
    ///   (default: `0x29`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(bus) = std::env::var("TCS34725_I2C_BUS") {
            config.bus = PathBuf::from(bus);
        }
        if let Ok(address) = std::env::var("TCS34725_ADDRESS") {
            config.address = parse_address(&address)?;
        }

        Ok(config)
    }
}

/// Parse a 7-bit I2C address given as `0x29`, `0X29` or `41`.
pub fn parse_address(s: &str) -> Result<u8, ConfigError> {
    let trimmed = s.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => trimmed.parse(),
    };

    match parsed {
        Ok(addr) if addr <= 0x7f => Ok(addr),
        _ => Err(ConfigError::InvalidAddress(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("TCS34725_I2C_BUS");
        std::env::remove_var("TCS34725_ADDRESS");
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x29"), Ok(0x29));
        assert_eq!(parse_address("0X2a"), Ok(0x2a));
        assert_eq!(parse_address(" 41 "), Ok(41));
        assert_eq!(parse_address("0x7f"), Ok(0x7f));

        // Out of 7-bit range
        assert!(parse_address("0x80").is_err());
        assert!(parse_address("300").is_err());
        assert!(parse_address("sensor").is_err());
        assert!(parse_address("").is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = SensorConfig::from_env().unwrap();
        assert_eq!(config, SensorConfig::default());
        assert_eq!(config.bus, PathBuf::from("/dev/i2c-1"));
        assert_eq!(config.address, 0x29);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("TCS34725_I2C_BUS", "/dev/i2c-3");
        std::env::set_var("TCS34725_ADDRESS", "0x30");

        let config = SensorConfig::from_env().unwrap();
        assert_eq!(config.bus, PathBuf::from("/dev/i2c-3"));
        assert_eq!(config.address, 0x30);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_address() {
        clear_env();
        std::env::set_var("TCS34725_ADDRESS", "0x1ff");

        let err = SensorConfig::from_env().unwrap_err();
        assert_eq!(err, ConfigError::InvalidAddress("0x1ff".to_string()));

        clear_env();
    }
}

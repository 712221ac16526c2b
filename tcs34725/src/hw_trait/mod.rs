//! Hardware abstraction layer traits.
//!
//! The sensor driver only needs two capabilities from its environment: an
//! I2C bus to move register bytes and a way to wait. Both are traits so the
//! same driver runs against Linux i2c-dev in production and against a
//! recording fake in tests.

pub mod delay;
pub mod i2c;

#[cfg(test)]
pub(crate) mod mock;

// Re-export traits
pub use delay::{Delay, TokioDelay};
pub use i2c::{I2c, I2cError};

/// Common error type for hardware operations
#[derive(Debug, thiserror::Error)]
pub enum HwError {
    /// I/O error from underlying transport
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bus-level I2C failure
    #[error(transparent)]
    I2c(#[from] I2cError),

    /// Timeout waiting for hardware response
    #[error("Hardware timeout")]
    Timeout,

    /// Other hardware-specific error
    #[error("Hardware error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HwError>;

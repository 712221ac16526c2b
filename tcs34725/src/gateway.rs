//! Request gateway: the caller-facing side of the driver.
//!
//! The gateway owns a [`Tcs34725`] and exposes exactly one request, "read
//! the current color", plus the attach/detach lifecycle around it.
//!
//! ```text
//!              attach ok                 read
//! Unattached ───────────▶ Ready ◀──────────────┐
//!     │  ▲                  │ └────────────────┘
//!     │  └──── detach ──────┘
//!     │ attach err
//!     ▼
//!   Failed ── attach ok ──▶ Ready      Failed ── detach ──▶ Unattached
//! ```
//!
//! Reads are only served in `Ready`. In every other state they are refused
//! before any bus traffic happens.

use std::io;
use std::sync::Arc;

use nix::errno::Errno;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::color::ColorSample;
use crate::hw_trait::{Delay, HwError, I2c};
use crate::peripheral::Tcs34725;
use crate::tracing::prelude::*;

const IOC_READ: u32 = 2;

/// Linux `_IOR(magic, nr, size)` request number.
const fn ior(magic: u8, nr: u8, size: usize) -> u32 {
    (IOC_READ << 30) | ((size as u32) << 16) | ((magic as u32) << 8) | nr as u32
}

/// Request code for "read current color": `_IOR('t', 1, [u16; 4])`.
pub const READ_COLOR: u32 = ior(b't', 1, ColorSample::WIRE_SIZE);

/// Requests understood by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    ReadColor,
}

impl Request {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            READ_COLOR => Some(Self::ReadColor),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::ReadColor => READ_COLOR,
        }
    }
}

/// Lifecycle state of a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum GatewayState {
    Unattached,
    Ready,
    Failed,
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Sensor read failed: {0}")]
    Io(#[source] HwError),

    #[error("Sensor initialization failed: {0}")]
    Initialization(#[source] HwError),

    #[error("Unsupported request code 0x{0:08x}")]
    UnsupportedRequest(u32),

    #[error("Result could not be delivered: need {need} bytes, have {have}")]
    CopyFault { need: usize, have: usize },

    #[error("Sensor not ready (state: {0})")]
    NotReady(GatewayState),
}

impl RequestError {
    /// errno a character-device front end would return for this error.
    pub fn errno(&self) -> Errno {
        match self {
            Self::Io(_) | Self::Initialization(_) => Errno::EIO,
            Self::UnsupportedRequest(_) => Errno::EINVAL,
            Self::CopyFault { .. } => Errno::EFAULT,
            Self::NotReady(_) => Errno::ENODEV,
        }
    }
}

impl From<RequestError> for io::Error {
    fn from(err: RequestError) -> Self {
        io::Error::from_raw_os_error(err.errno() as i32)
    }
}

/// Serves color read requests for one sensor.
pub struct Gateway<I: I2c, D: Delay> {
    sensor: Tcs34725<I, D>,
    state: GatewayState,
}

impl<I: I2c, D: Delay> Gateway<I, D> {
    /// Wrap a sensor. Nothing touches the bus until [`attach`](Self::attach).
    pub fn new(sensor: Tcs34725<I, D>) -> Self {
        Self {
            sensor,
            state: GatewayState::Unattached,
        }
    }

    pub fn state(&self) -> GatewayState {
        self.state
    }

    /// Run the full power-up sequence and start serving reads.
    ///
    /// Always runs every step, whatever state the gateway was in. On failure
    /// the gateway is `Failed` and refuses reads until a later attach
    /// succeeds.
    pub async fn attach(&mut self) -> Result<(), RequestError> {
        match self.sensor.initialize().await {
            Ok(()) => {
                self.state = GatewayState::Ready;
                info!(address = self.sensor.address(), "TCS34725 attached");
                Ok(())
            }
            Err(e) => {
                self.state = GatewayState::Failed;
                error!(
                    address = self.sensor.address(),
                    error = %e,
                    "Failed to initialize TCS34725"
                );
                Err(RequestError::Initialization(e))
            }
        }
    }

    /// Stop serving reads and power the sensor down.
    ///
    /// Never fails. A failed attach may have left PON set, so the sensor is
    /// powered down from `Failed` as well as `Ready`. A power-down error is
    /// logged and otherwise ignored.
    pub async fn detach(&mut self) {
        if self.state != GatewayState::Unattached {
            if let Err(e) = self.sensor.power_down().await {
                warn!(error = %e, "Failed to power down TCS34725 during detach");
            }
        }
        self.state = GatewayState::Unattached;
        info!("TCS34725 detached");
    }

    /// Dispatch a request by its numeric code.
    pub async fn handle_request(&mut self, code: u32) -> Result<ColorSample, RequestError> {
        match Request::from_code(code) {
            Some(Request::ReadColor) => self.handle_read_request().await,
            None => {
                debug!(code = %format!("{:#010x}", code), "Rejecting unknown request");
                Err(RequestError::UnsupportedRequest(code))
            }
        }
    }

    /// Read the current color.
    pub async fn handle_read_request(&mut self) -> Result<ColorSample, RequestError> {
        if self.state != GatewayState::Ready {
            return Err(RequestError::NotReady(self.state));
        }

        self.sensor.read_color().await.map_err(|e| {
            warn!(error = %e, "Color read failed");
            RequestError::Io(e)
        })
    }

    /// Handle a request and deliver its payload into `out` in wire layout.
    ///
    /// Returns the number of bytes written. A buffer too small for the
    /// payload is reported as [`RequestError::CopyFault`], separate from
    /// sensor failures.
    pub async fn handle_request_into(
        &mut self,
        code: u32,
        out: &mut [u8],
    ) -> Result<usize, RequestError> {
        let sample = self.handle_request(code).await?;

        let payload = sample.to_le_bytes();
        let have = out.len();
        let dst = out
            .get_mut(..payload.len())
            .ok_or(RequestError::CopyFault {
                need: payload.len(),
                have,
            })?;
        dst.copy_from_slice(&payload);
        Ok(payload.len())
    }

    /// Tear down the gateway and hand back the sensor.
    pub fn into_inner(self) -> Tcs34725<I, D> {
        self.sensor
    }
}

/// A gateway shared between tasks.
///
/// The core assumes one register transaction at a time; this wrapper
/// serializes callers on an async mutex so each request runs to completion
/// before the next starts.
pub struct SharedGateway<I: I2c, D: Delay> {
    inner: Arc<Mutex<Gateway<I, D>>>,
}

impl<I: I2c, D: Delay> Clone for SharedGateway<I, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I: I2c, D: Delay> SharedGateway<I, D> {
    pub fn new(gateway: Gateway<I, D>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(gateway)),
        }
    }

    pub async fn state(&self) -> GatewayState {
        self.inner.lock().await.state()
    }

    pub async fn attach(&self) -> Result<(), RequestError> {
        self.inner.lock().await.attach().await
    }

    pub async fn detach(&self) {
        self.inner.lock().await.detach().await
    }

    pub async fn read_color(&self) -> Result<ColorSample, RequestError> {
        self.inner.lock().await.handle_read_request().await
    }

    pub async fn request(&self, code: u32) -> Result<ColorSample, RequestError> {
        self.inner.lock().await.handle_request(code).await
    }
}

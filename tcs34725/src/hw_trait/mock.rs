//! Recording fakes for the bus and delay traits.
//!
//! `MockI2c` and `MockDelay` append to one shared log so tests can assert on
//! the exact interleaving of register traffic and waits.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{Delay, HwError, I2c, I2cError, Result};

/// One observable interaction with the fake hardware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    Write { addr: u8, data: Vec<u8> },
    Read { addr: u8, len: usize },
    WriteRead { addr: u8, write: Vec<u8>, len: usize },
    Delay(Duration),
}

#[derive(Debug, Default)]
struct State {
    log: Vec<BusEvent>,
    // Zero-based index of the write that should fail (counted across the
    // lifetime of the mock).
    fail_write_at: Option<usize>,
    writes_seen: usize,
    fail_reads: bool,
    block_data: VecDeque<Vec<u8>>,
}

/// Handle shared by the fakes and the test body.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<State>>);

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn i2c(&self) -> MockI2c {
        MockI2c(self.clone())
    }

    pub fn delay(&self) -> MockDelay {
        MockDelay(self.clone())
    }

    pub fn events(&self) -> Vec<BusEvent> {
        self.0.lock().unwrap().log.clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().log.clear();
    }

    /// Make the `n`th write from now on (zero-based) NACK.
    pub fn fail_write_at(&self, n: usize) {
        let mut state = self.0.lock().unwrap();
        state.fail_write_at = Some(state.writes_seen + n);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.0.lock().unwrap().fail_reads = fail;
    }

    /// Queue bytes returned by the next read. Unqueued reads return zeros.
    pub fn push_block(&self, data: &[u8]) {
        self.0.lock().unwrap().block_data.push_back(data.to_vec());
    }

    /// Number of bus transfers (delays excluded).
    pub fn transfers(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| !matches!(e, BusEvent::Delay(_)))
            .count()
    }
}

impl State {
    fn fill(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        if self.fail_reads {
            return Err(HwError::I2c(I2cError::NoAck(addr)));
        }
        buffer.fill(0);
        if let Some(data) = self.block_data.pop_front() {
            let n = data.len().min(buffer.len());
            buffer[..n].copy_from_slice(&data[..n]);
        }
        Ok(())
    }
}

pub struct MockI2c(Recorder);

#[async_trait]
impl I2c for MockI2c {
    async fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        let mut state = self.0 .0.lock().unwrap();
        state.log.push(BusEvent::Write {
            addr,
            data: data.to_vec(),
        });
        let index = state.writes_seen;
        state.writes_seen += 1;
        if state.fail_write_at == Some(index) {
            return Err(HwError::I2c(I2cError::NoAck(addr)));
        }
        Ok(())
    }

    async fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        let mut state = self.0 .0.lock().unwrap();
        state.log.push(BusEvent::Read {
            addr,
            len: buffer.len(),
        });
        state.fill(addr, buffer)
    }

    async fn write_read(&mut self, addr: u8, write: &[u8], read: &mut [u8]) -> Result<()> {
        let mut state = self.0 .0.lock().unwrap();
        state.log.push(BusEvent::WriteRead {
            addr,
            write: write.to_vec(),
            len: read.len(),
        });
        state.fill(addr, read)
    }
}

pub struct MockDelay(Recorder);

#[async_trait]
impl Delay for MockDelay {
    async fn delay(&mut self, duration: Duration) {
        self.0 .0.lock().unwrap().log.push(BusEvent::Delay(duration));
    }
}

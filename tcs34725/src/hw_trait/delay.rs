//! Wait capability used for hardware settling times.

use async_trait::async_trait;
use std::time::Duration;

/// Something that can pause the caller for at least `duration`.
///
/// Drivers never sleep directly; they ask their `Delay`. Production code
/// passes [`TokioDelay`], tests pass a fake that returns immediately and
/// records what was requested.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn delay(&mut self, duration: Duration);
}

/// Real wall-clock delay backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn delay(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_delay_waits_full_duration() {
        let start = tokio::time::Instant::now();
        TokioDelay.delay(Duration::from_millis(50)).await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}

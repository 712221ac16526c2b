//! Provide tracing, tailored to this driver.
//!
//! Programs using the driver call one of the `init_*` functions at startup
//! to install a subscriber. Library code uses `crate::tracing::prelude::*`
//! for the `trace!()` .. `error!()` macros.

use std::env;

use time::OffsetDateTime;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{format::Writer, time::FormatTime, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
};

pub mod prelude {
    #[allow(unused_imports)]
    pub use tracing::{debug, error, info, trace, warn};
}

use prelude::*;

/// Initialize logging.
///
/// Under systemd, use journald; otherwise fall back to stdout at INFO.
pub fn init_journald_or_stdout() {
    if env::var("JOURNAL_STREAM").is_ok() {
        if let Ok(layer) = tracing_journald::layer() {
            tracing_subscriber::registry().with(layer).init();
        } else {
            init_stdout(LevelFilter::INFO);
            error!("Failed to initialize journald logging, using stdout.");
        }
    } else {
        init_stdout(LevelFilter::INFO);
    }
}

/// Log to stdout, filtering by `RUST_LOG` with `default_level` when unset.
pub fn init_stdout(default_level: LevelFilter) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("RUST_LOG")
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().event_format(CompactFormatter))
        .init();
}

/// `HH:MM:SS LEVEL target: message fields`, with our own crate prefix
/// removed from the target.
struct CompactFormatter;

impl<S, N> FormatEvent<S, N> for CompactFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        LocalTimer.format_time(&mut writer)?;

        let level = *event.metadata().level();
        let color = match level {
            tracing::Level::ERROR => "\x1b[31m",
            tracing::Level::WARN => "\x1b[33m",
            tracing::Level::INFO => "\x1b[32m",
            tracing::Level::DEBUG => "\x1b[34m",
            tracing::Level::TRACE => "\x1b[35m",
        };
        if writer.has_ansi_escapes() {
            write!(writer, " {}{:<5}\x1b[0m ", color, level.as_str())?;
        } else {
            write!(writer, " {:<5} ", level.as_str())?;
        }

        write!(writer, "{}: ", short_target(event.metadata().target()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn short_target(target: &str) -> &str {
    target.strip_prefix("tcs34725::").unwrap_or(target)
}

// Local time to the nearest second; the default UTC timestamp is long and
// hard to read on a console.
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let formatted = now
            .format(time::macros::format_description!("[hour]:[minute]:[second]"))
            .map_err(|_| std::fmt::Error)?;
        write!(w, "{}", formatted)
    }
}

//! Read RGBC samples from a TCS34725 and print them.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tcs34725::{
    config::{self, SensorConfig},
    ColorSample, READ_COLOR,
};
use tracing::{info, level_filters::LevelFilter};

/// Color sensor read client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// i2c-dev bus (overrides TCS34725_I2C_BUS)
    #[arg(short = 'b', long)]
    bus: Option<PathBuf>,

    /// Sensor address, e.g. 0x29 (overrides TCS34725_ADDRESS)
    #[arg(short = 'a', long, value_parser = config::parse_address)]
    address: Option<u8>,

    /// Number of samples to read (default: until interrupted)
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Pause between samples in milliseconds
    #[arg(short = 'i', long, default_value_t = 100)]
    interval_ms: u64,

    /// Print the 8-byte payload as hex instead of decoded channels
    #[arg(short = 'x', long)]
    raw: bool,

    /// Enable debug logging
    #[arg(short = 'd', long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        tcs34725::tracing::init_stdout(LevelFilter::DEBUG);
    } else {
        tcs34725::tracing::init_journald_or_stdout();
    }

    let mut config = SensorConfig::from_env().context("Invalid sensor configuration")?;
    if let Some(bus) = args.bus {
        config.bus = bus;
    }
    if let Some(address) = args.address {
        config.address = address;
    }

    let mut gateway = tcs34725::open(&config)
        .with_context(|| format!("Failed to open {}", config.bus.display()))?;
    gateway
        .attach()
        .await
        .context("Failed to initialize TCS34725")?;

    let result = tokio::select! {
        result = read_loop(&mut gateway, args.count, args.interval_ms, args.raw) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            Ok(())
        }
    };

    gateway.detach().await;
    result
}

async fn read_loop(
    gateway: &mut tcs34725::LinuxGateway,
    count: Option<u64>,
    interval_ms: u64,
    raw: bool,
) -> Result<()> {
    let mut payload = [0u8; ColorSample::WIRE_SIZE];
    let mut taken = 0u64;

    while count.map_or(true, |n| taken < n) {
        gateway
            .handle_request_into(READ_COLOR, &mut payload)
            .await
            .context("Failed to read color data")?;
        taken += 1;

        if raw {
            println!("{:02x?}", payload);
        } else {
            let sample = ColorSample::from_le_bytes(payload);
            println!("Color readings:");
            println!("Clear: {}", sample.clear);
            println!("Red  : {}", sample.red);
            println!("Green: {}", sample.green);
            println!("Blue : {}", sample.blue);
        }

        if count.map_or(true, |n| taken < n) {
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        }
    }

    Ok(())
}

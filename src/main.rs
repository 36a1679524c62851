use anyhow::Result;
use clap::Parser;
use ledtrig_core::{BlinkTiming, DeviceId, DeviceTriggerRegistry};
use ledtrig_dev::backends::MemoryBackend;
use ledtrig_dev::{AppConfig, ControlSurface};
use log::{error, info, warn};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// ledtrig-dev - Per-device LED activity triggers
///
/// Reads control commands from stdin, one per line:
/// `list`, `register <major>:<minor>`, `unregister <major>:<minor>`,
/// `trigger <major>:<minor>` and `clear`.
#[derive(Parser, Debug, Clone)]
#[command(name = "ledtrig-dev")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Config file to use instead of the default location
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Blink on/off delay in milliseconds (overrides the config file)
    #[arg(long = "blink-delay", value_name = "MS")]
    blink_delay: Option<u64>,

    /// Devices to register at startup, as major:minor
    #[arg(value_name = "DEVICE")]
    devices: Vec<DeviceId>,
}

fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace (includes every blink)
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting ledtrig-dev v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load().unwrap_or_else(|e| {
            warn!("Using default configuration: {:#}", e);
            AppConfig::default()
        }),
    };

    let timing = match cli.blink_delay {
        Some(delay_ms) => BlinkTiming {
            invert: config.blink.invert,
            ..BlinkTiming::symmetric(delay_ms)
        },
        None => config.blink,
    };

    let backend = Arc::new(MemoryBackend::new());
    let registry = Arc::new(DeviceTriggerRegistry::with_timing(backend.clone(), timing));
    let surface = ControlSurface::new(Arc::clone(&registry));

    for device in config.devices.iter().chain(cli.devices.iter()) {
        if let Err(e) = registry.add(*device) {
            warn!("{}", e);
        }
    }
    info!(
        "{} device triggers registered, blink {}ms/{}ms",
        registry.len(),
        timing.delay_on_ms,
        timing.delay_off_ms
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let line = line?;
        let command = line.trim();
        if command.is_empty() || command.starts_with('#') {
            continue;
        }

        match surface.execute(command) {
            Ok(output) => {
                out.write_all(output.as_bytes())?;
                out.flush()?;
            }
            Err(e) => eprintln!("{}", e),
        }
    }

    // Module exit: drop every trigger
    registry.remove_all();
    for indicator in backend.snapshot() {
        warn!("Indicator {} still registered at exit", indicator.name);
    }

    Ok(())
}

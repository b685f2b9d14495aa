//! Sarathi - Control loop host for the competition robot
//!
//! Builds the robot from configuration and drives it at a fixed period
//! through one match: disabled, autonomous, teleop, disabled.
//!
//! Usage:
//! - `sarathi <path>` or `sarathi --config <path>`: load a TOML config
//! - `sarathi`: use `sarathi.toml` if present, otherwise built-in defaults

use sarathi::{InputHub, MatchPhase, Result, Robot, SarathiConfig, TelemetryHub};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

const DEFAULT_CONFIG: &str = "sarathi.toml";

/// Config path from `--config <path>`, `-c <path>` or the first positional
/// argument
fn parse_config_path() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();

    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return Some(PathBuf::from(&args[i + 1]));
        }
    }

    if args.len() > 1 && !args[1].starts_with('-') {
        return Some(PathBuf::from(&args[1]));
    }

    None
}

fn load_config() -> Result<SarathiConfig> {
    match parse_config_path() {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            SarathiConfig::load(&path)
        }
        None if Path::new(DEFAULT_CONFIG).exists() => {
            info!("Loading configuration from {}", DEFAULT_CONFIG);
            SarathiConfig::load(Path::new(DEFAULT_CONFIG))
        }
        None => {
            info!("Using default configuration");
            Ok(SarathiConfig::default())
        }
    }
}

/// Phase the timeline prescribes `elapsed` seconds after start, `None` once
/// the match is over
fn phase_at(config: &SarathiConfig, elapsed: f64) -> Option<MatchPhase> {
    let timeline = config.match_timeline;
    let auto_end = timeline.pre_match_secs + timeline.autonomous_secs;
    let teleop_end = auto_end + timeline.teleop_secs;

    if elapsed < timeline.pre_match_secs {
        Some(MatchPhase::Disabled)
    } else if elapsed < auto_end {
        Some(MatchPhase::Autonomous)
    } else if elapsed < teleop_end {
        Some(MatchPhase::Teleop)
    } else {
        None
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sarathi=info")),
        )
        .init();

    info!("Sarathi v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    let period = Duration::from_millis(config.control.period_ms);
    info!("Control period: {:?}", period);

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| sarathi::Error::Config(format!("Error setting Ctrl-C handler: {}", e)))?;

    // Vision processor, sensor parsers and motor drivers attach to these
    let telemetry = TelemetryHub::new();
    let inputs = InputHub::new();
    let mut robot = Robot::new(config.clone(), telemetry, inputs)?;

    let start = Instant::now();
    let mut next_tick = start;
    let mut phase = robot.phase();

    while running.load(Ordering::Relaxed) {
        let Some(scheduled) = phase_at(&config, start.elapsed().as_secs_f64()) else {
            info!("Match complete");
            break;
        };
        if scheduled != phase {
            robot.enter(scheduled)?;
            phase = scheduled;
        }

        if let Err(e) = robot.tick() {
            error!("Control tick failed: {}", e);
            return Err(e);
        }

        if robot.ticks() % 50 == 0 {
            if let Some(vision) = robot.vision() {
                let vision = vision.subsystem.lock();
                debug!(
                    "tick {}: target visible={} x={:.2} distance={:.1}",
                    robot.ticks(),
                    vision.visible(),
                    vision.horizontal_offset(),
                    vision.estimated_distance()
                );
            }
        }

        next_tick += period;
        let now = Instant::now();
        if next_tick > now {
            std::thread::sleep(next_tick - now);
        } else {
            // Overran; realign instead of bursting to catch up
            next_tick = now;
        }
    }

    robot.enter_disabled();
    robot.tick()?;
    info!("Sarathi stopped after {} ticks", robot.ticks());
    Ok(())
}

// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sensorkit-rs

//! SensorKit demo - drives an activity detector on a simulated device

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use rand::Rng;
use tokio::time::{interval, Duration};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sensorkit::config::Config;
use sensorkit::provider::{RawEvent, SimulatedProvider, SimulatedSensor};
use sensorkit::sensors::{
    ActivityDetector, ActivityKind, ActivityReading, ActivityType, InVehicle, Running,
    SensorDataUpdated, SensorType, Stationary, Walking, ACTIVITY_FEATURE_KEY,
};
use sensorkit::{build_info, VERSION};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ActivityArg {
    Running,
    Walking,
    Stationary,
    InVehicle,
}

impl From<ActivityArg> for ActivityType {
    fn from(arg: ActivityArg) -> Self {
        match arg {
            ActivityArg::Running => ActivityType::Running,
            ActivityArg::Walking => ActivityType::Walking,
            ActivityArg::Stationary => ActivityType::Stationary,
            ActivityArg::InVehicle => ActivityType::InVehicle,
        }
    }
}

/// SensorKit - sensor lifecycle demo on a simulated device
#[derive(Parser, Debug)]
#[command(name = "sensorkit")]
#[command(version = VERSION)]
#[command(about = "Open an activity detector on a simulated device and print its events")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,

    /// Activity detector to open
    #[arg(long, value_enum)]
    activity: Option<ActivityArg>,

    /// Sensor index
    #[arg(long)]
    index: Option<u32>,

    /// Stop after this many simulated events (runs until Ctrl+C otherwise)
    #[arg(long)]
    events: Option<u64>,

    /// Delay between simulated events in milliseconds
    #[arg(long)]
    period_ms: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)?;

    // Initialize logging: flags, then RUST_LOG, then the config file
    let filter = if args.trace {
        EnvFilter::new("trace")
    } else if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.log_level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(args.debug)
        .with_line_number(args.debug)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let build = build_info();
    info!("{} v{} ({}/{})", config.app_name, build.version, build.os, build.target);
    info!("Configuration loaded from {:?}", config_path);

    // Override with command line args
    if let Some(activity) = args.activity {
        config.sensor.activity = activity.into();
    }
    if let Some(index) = args.index {
        config.sensor.index = index;
    }
    if let Some(period) = args.period_ms {
        config.simulator.period_ms = period;
    }
    config.validate()?;

    let provider = Arc::new(simulated_device(&config));
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        match config.sensor.activity {
            ActivityType::Running => run::<Running>(&config, provider, args.events).await,
            ActivityType::Walking => run::<Walking>(&config, provider, args.events).await,
            ActivityType::Stationary => run::<Stationary>(&config, provider, args.events).await,
            ActivityType::InVehicle => run::<InVehicle>(&config, provider, args.events).await,
            other => bail!("No detector for activity {:?}", other),
        }
    })
}

fn simulated_device(config: &Config) -> SimulatedProvider {
    let provider = SimulatedProvider::new();
    for i in 0..config.simulator.detectors {
        let mut sensor = SimulatedSensor::new(&format!("activity-{}", i), &config.simulator.vendor);
        sensor.max_range = 1.0;
        sensor.min_interval = 10;
        sensor.fifo_count = 32;
        sensor.max_batch_count = 64;
        // Every activity class shares this native sensor.
        provider.add_sensor(SensorType::RunningActivityDetector, sensor);
    }
    provider.set_feature(ACTIVITY_FEATURE_KEY, config.simulator.detectors > 0);
    provider
}

async fn run<A: ActivityKind>(
    config: &Config,
    provider: Arc<SimulatedProvider>,
    max_events: Option<u64>,
) -> Result<()> {
    if !ActivityDetector::<A>::is_supported(&*provider) {
        bail!("{:?} detector is not supported on this device", A::ACTIVITY);
    }
    info!(
        "{} {:?} detector(s) available",
        ActivityDetector::<A>::count(&*provider),
        A::ACTIVITY
    );

    let mut detector = ActivityDetector::<A>::new(provider.clone(), config.sensor.index)?;
    config.sensor.apply(&mut detector)?;
    println!("{}", serde_json::to_string_pretty(detector.descriptor())?);

    detector.subscribe(|event: &SensorDataUpdated<ActivityReading>| {
        info!(
            "[{:?}] state={:?} raw={} accuracy={:?}",
            event.timestamp, event.reading.state, event.reading.raw, event.accuracy
        );
    });
    detector.start()?;

    let handle = detector.handle();
    let mut ticker = interval(Duration::from_millis(config.simulator.period_ms));
    let mut sent = 0u64;

    info!("Press Ctrl+C to stop");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let detected = rand::thread_rng().gen_bool(config.simulator.detection_probability);
                let event = RawEvent::new(
                    Utc::now().timestamp_micros(),
                    config.simulator.accuracy,
                    &[if detected { 1.0 } else { 0.0 }],
                );
                if provider.emit_to_sensor(handle, &event) == 0 {
                    warn!("Simulated event reached no listener");
                }
                sent += 1;
                if max_events.is_some_and(|max| sent >= max) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    detector.stop()?;
    info!(
        "Last state {:?} after {} events ({:?})",
        detector.detected(),
        sent,
        detector.time_span()
    );
    detector.dispose();
    Ok(())
}

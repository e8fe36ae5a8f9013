//! Stationary Drift Agent CLI
//!
//! Replays recorded sensor traces or consumes a live JSON-lines feed and
//! reports GPS drift while the device is at rest.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use stationary_drift_agent::{
    collector::{read_trace, Collector, CollectorConfig},
    config::Config,
    core::{MotionPipeline, PipelineOutput, RecordingObserver, TracingObserver},
    report::SessionReport,
    VERSION,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "drift-sensor")]
#[command(version = VERSION)]
#[command(about = "Detect GPS drift on a stationary device", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded JSON-lines sensor trace
    Replay {
        /// Trace file, one event per line
        trace: PathBuf,

        /// Where to write the session report (defaults to the report directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Consume a live JSON-lines feed until EOF or Ctrl+C
    Start {
        /// Feed to read from; `-` for stdin
        #[arg(long, default_value = "-")]
        input: String,

        /// Where to write the session report (defaults to the report directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        /// Write the default configuration file if none exists
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { trace, output } => cmd_replay(&trace, output),
        Commands::Start { input, output } => cmd_start(&input, output),
        Commands::Config { init } => cmd_config(init),
    }
}

fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Could not load configuration, using defaults: {}", e);
            Config::default()
        }
    }
}

fn build_pipeline(config: &Config) -> (MotionPipeline, Arc<RecordingObserver>) {
    let mut pipeline = MotionPipeline::from_config(config);
    let recorder = Arc::new(RecordingObserver::new());
    pipeline.add_observer(Arc::new(TracingObserver));
    pipeline.add_observer(recorder.clone());
    (pipeline, recorder)
}

fn cmd_replay(trace: &Path, output: Option<PathBuf>) -> Result<()> {
    let config = load_config();
    let events =
        read_trace(trace).with_context(|| format!("Failed to read trace {}", trace.display()))?;

    println!("Stationary Drift Agent v{VERSION}");
    println!("Replaying {} events from {}", events.len(), trace.display());
    println!();

    let (mut pipeline, recorder) = build_pipeline(&config);

    for event in &events {
        match pipeline.handle_event(event) {
            PipelineOutput::Detection(result) if result.state_changed => {
                println!(
                    "[{:>8}ms] {} (mean {:.3}, std {:.3})",
                    result.timestamp_ms,
                    if result.is_stationary {
                        "STATIONARY"
                    } else {
                        "MOVING"
                    },
                    result.mean,
                    result.standard_deviation
                );
            }
            PipelineOutput::Fix(Some(drift)) => {
                println!(
                    "[{:>8}ms] GPS drift: {:.2} m/s while stationary",
                    event.timestamp_ms(),
                    drift.gps_speed
                );
            }
            _ => {}
        }
    }

    finish_session(
        &trace.display().to_string(),
        &config,
        &pipeline,
        &recorder,
        output,
    )
}

fn cmd_start(input: &str, output: Option<PathBuf>) -> Result<()> {
    let config = load_config();

    println!("Stationary Drift Agent v{VERSION}");
    println!(
        "  Expected accelerometer rate: {} Hz",
        1000 / config.sample_interval_ms.max(1)
    );
    println!(
        "  Drift speed threshold: {} m/s",
        config.drift_speed_threshold
    );
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let reader: Box<dyn BufRead + Send> = if input == "-" {
        Box::new(std::io::BufReader::new(std::io::stdin()))
    } else {
        let file = std::fs::File::open(input).with_context(|| format!("Failed to open {input}"))?;
        Box::new(std::io::BufReader::new(file))
    };

    let mut collector = Collector::new(CollectorConfig::default());
    collector
        .start(reader)
        .context("Failed to start collector")?;

    let (mut pipeline, recorder) = build_pipeline(&config);

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    ctrlc_handler(running.clone())?;

    let receiver = collector.receiver().clone();
    while running.load(Ordering::SeqCst) {
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                pipeline.handle_event(&event);
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                tracing::info!("Sensor feed closed");
                break;
            }
        }
    }

    println!();
    if collector.is_running() {
        println!("Stopping collection...");
        collector.stop();
    }

    finish_session("live", &config, &pipeline, &recorder, output)
}

fn finish_session(
    source: &str,
    config: &Config,
    pipeline: &MotionPipeline,
    recorder: &RecordingObserver,
    output: Option<PathBuf>,
) -> Result<()> {
    let report = SessionReport::new(source, config, pipeline.stats().stats(), recorder);
    let path = output.unwrap_or_else(|| SessionReport::default_path(&config.report_path));

    match report.write(&path) {
        Ok(()) => println!("Report written to {}", path.display()),
        Err(e) => eprintln!("Warning: Could not write report to {}: {e}", path.display()),
    }

    println!();
    println!("{}", pipeline.stats().summary());
    Ok(())
}

fn cmd_config(init: bool) -> Result<()> {
    let path = Config::config_path();

    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            Config::default()
                .save()
                .context("Failed to write default configuration")?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    let config = Config::load().context("Failed to load configuration")?;

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {}", path.display());
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(running: Arc<AtomicBool>) -> Result<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .context("Error setting Ctrl+C handler")
}

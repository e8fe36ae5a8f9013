//! Demonstration of stationary detection and GPS drift flagging.
//!
//! Simulates a phone resting on a table while its GPS receiver reports small
//! phantom speeds, then being picked up and carried.
//!
//! Run with: cargo run --example drift_demo

use std::sync::Arc;

use stationary_drift_agent::{
    collector::{AccelSample, GpsFix, SensorEvent},
    config::Config,
    core::{MotionPipeline, PipelineOutput, RecordingObserver, STANDARD_GRAVITY},
};

fn main() {
    println!("Stationary Drift Agent - Drift Demo");
    println!("===================================");
    println!();

    let config = Config::default();
    let mut pipeline = MotionPipeline::from_config(&config);
    let recorder = Arc::new(RecordingObserver::new());
    pipeline.add_observer(recorder.clone());

    // 10 Hz accelerometer, GPS every 2 s, 15 s total.
    for i in 0..150i64 {
        let t = i * 100;
        let carried = i >= 90;

        let noise = ((i * 7919) % 11) as f64 * 0.002;
        let z = if carried {
            STANDARD_GRAVITY + 2.5 * ((i as f64) * 1.9).sin()
        } else {
            STANDARD_GRAVITY + noise
        };
        pipeline.handle_event(&SensorEvent::Accel(AccelSample::new(t, noise, -noise, z)));

        if i % 20 == 19 {
            let speed = if carried { 1.3 } else { 0.45 };
            let output = pipeline.handle_event(&SensorEvent::Gps(GpsFix::with_speed(t, speed)));
            let verdict = match output {
                PipelineOutput::Fix(Some(_)) => "DRIFT",
                _ => "ok",
            };
            println!(
                "[{:>5}ms] fix {:.2} m/s, stationary={} -> {}",
                t,
                speed,
                pipeline.detector().is_stationary(),
                verdict
            );
        }
    }

    println!();
    for transition in recorder.transitions() {
        println!(
            "Transition at {}ms: {}",
            transition.timestamp_ms,
            if transition.stationary {
                "stationary"
            } else {
                "moving"
            }
        );
    }
    println!();
    println!("{}", pipeline.stats().summary());
}

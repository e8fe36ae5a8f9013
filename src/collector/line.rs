//! Live event collection from a line-oriented feed.
//!
//! The platform sensor bridge (outside this crate) writes one JSON event per
//! line to a pipe or stdin. A background thread parses the lines and forwards
//! events over a bounded channel. Malformed lines are logged and skipped so a
//! misbehaving feed never takes down classification.

use crate::collector::reader::{parse_line, CollectorError};
use crate::collector::types::SensorEvent;
use crate::core::clock::{Clock, SystemClock};
use crossbeam_channel::{bounded, Receiver};
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Configuration for the line collector.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Capacity of the event channel
    pub channel_capacity: usize,
    /// Overwrite event timestamps with the arrival time
    pub stamp_on_arrival: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 10_000,
            stamp_on_arrival: true,
        }
    }
}

/// Collects sensor events from any buffered reader on a background thread.
pub struct LineCollector {
    config: CollectorConfig,
    receiver: Receiver<SensorEvent>,
    running: Arc<AtomicBool>,
}

impl LineCollector {
    /// Create a new collector. Nothing is read until [`start`](Self::start).
    pub fn new(config: CollectorConfig) -> Self {
        let (_, receiver) = bounded(config.channel_capacity);
        Self {
            config,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start reading events from `input`.
    ///
    /// The channel disconnects once the input reaches EOF or the collector is
    /// stopped, so consumers can treat `Disconnected` as end of stream.
    pub fn start<R>(&mut self, input: R) -> Result<(), CollectorError>
    where
        R: BufRead + Send + 'static,
    {
        if self.running.load(Ordering::SeqCst) {
            return Err(CollectorError::AlreadyRunning);
        }

        let (sender, receiver) = bounded(self.config.channel_capacity);
        self.receiver = receiver;

        // Each run owns its flag so a previous reader exiting late cannot stop this one.
        let running = Arc::new(AtomicBool::new(true));
        self.running = Arc::clone(&running);
        let stamp_on_arrival = self.config.stamp_on_arrival;

        thread::Builder::new()
            .name("line-collector".to_string())
            .spawn(move || {
                let clock = SystemClock;
                for (index, line) in input.lines().enumerate() {
                    if !running.load(Ordering::SeqCst) {
                        break;
                    }
                    let line = match line {
                        Ok(line) => line,
                        Err(e) => {
                            tracing::warn!("Sensor feed read failed: {}", e);
                            break;
                        }
                    };
                    match parse_line(&line, index + 1) {
                        Ok(Some(mut event)) => {
                            if stamp_on_arrival {
                                event.restamp(clock.now_ms());
                            }
                            if sender.send(event).is_err() {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => tracing::warn!("Skipping malformed sensor event: {}", e),
                    }
                }
                running.store(false, Ordering::SeqCst);
                tracing::debug!("Sensor feed ended");
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                CollectorError::Io(e.to_string())
            })?;

        Ok(())
    }

    /// Stop forwarding events after the line currently being read.
    ///
    /// A reader blocked on input keeps its thread until the next line or EOF,
    /// but nothing it reads afterwards is forwarded.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the collector is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the receiver for sensor events.
    pub fn receiver(&self) -> &Receiver<SensorEvent> {
        &self.receiver
    }

    /// Try to receive an event without blocking.
    pub fn try_recv(&self) -> Option<SensorEvent> {
        self.receiver.try_recv().ok()
    }
}

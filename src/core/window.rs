//! Time-bounded window of acceleration deviation samples.
//!
//! Samples are appended in arrival order and pruned from the front once they
//! fall outside the retention horizon, so the backing `VecDeque` reuses its
//! allocation instead of being rebuilt on every sample.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::VecDeque;

/// Absolute deviation of acceleration magnitude from gravity at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviationSample {
    /// |magnitude - gravity| in m/s²
    pub value: f64,
    /// Time the sample was classified, in milliseconds
    pub timestamp_ms: i64,
}

impl DeviationSample {
    pub fn new(value: f64, timestamp_ms: i64) -> Self {
        Self {
            value,
            timestamp_ms,
        }
    }
}

/// Chronologically ordered deviation samples no older than `history_duration_ms`.
#[derive(Debug, Clone)]
pub struct DetectionWindow {
    history_duration_ms: i64,
    samples: VecDeque<DeviationSample>,
}

/// Initial capacity: 2 s of history at 10 Hz plus headroom.
const DEFAULT_CAPACITY: usize = 32;

impl DetectionWindow {
    /// Create an empty window retaining `history_duration_ms` of samples.
    pub fn new(history_duration_ms: i64) -> Self {
        Self {
            history_duration_ms,
            samples: VecDeque::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Append a sample and drop everything older than the horizon relative to it.
    pub fn push(&mut self, sample: DeviationSample) {
        let now_ms = sample.timestamp_ms;
        self.samples.push_back(sample);
        self.prune(now_ms);
    }

    /// Drop samples for which `now_ms - timestamp_ms > history_duration_ms`.
    pub fn prune(&mut self, now_ms: i64) {
        while let Some(front) = self.samples.front() {
            if now_ms.saturating_sub(front.timestamp_ms) > self.history_duration_ms {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn history_duration_ms(&self) -> i64 {
        self.history_duration_ms
    }

    /// Iterate over retained deviation values, oldest first.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.value)
    }

    /// Iterate over retained samples, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = &DeviationSample> {
        self.samples.iter()
    }

    /// Rolling mean of the retained deviations (0 when empty).
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.values().mean()
    }

    /// Population standard deviation of the retained deviations (0 when empty).
    pub fn std_dev(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.values().population_std_dev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_prunes_old_samples() {
        let mut window = DetectionWindow::new(2000);

        for i in 0..30 {
            window.push(DeviationSample::new(0.1, i * 100));
        }

        // Last sample at 2900ms; everything from 900ms onwards survives.
        assert_eq!(window.len(), 21);
        assert!(window
            .samples()
            .all(|s| 2900 - s.timestamp_ms <= window.history_duration_ms()));
    }

    #[test]
    fn test_window_keeps_sample_exactly_at_horizon() {
        let mut window = DetectionWindow::new(1000);
        window.push(DeviationSample::new(1.0, 0));
        window.push(DeviationSample::new(1.0, 1000));
        assert_eq!(window.len(), 2);

        window.push(DeviationSample::new(1.0, 1001));
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn test_window_statistics() {
        let mut window = DetectionWindow::new(10_000);
        for (i, v) in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].iter().enumerate() {
            window.push(DeviationSample::new(*v, i as i64));
        }

        assert!((window.mean() - 5.0).abs() < 1e-9);
        // Population standard deviation of the classic example set is exactly 2.
        assert!((window.std_dev() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_window_statistics_are_zero() {
        let window = DetectionWindow::new(2000);
        assert!(window.is_empty());
        assert_eq!(window.mean(), 0.0);
        assert_eq!(window.std_dev(), 0.0);
    }

    #[test]
    fn test_clear() {
        let mut window = DetectionWindow::new(2000);
        window.push(DeviationSample::new(0.5, 0));
        window.clear();
        assert!(window.is_empty());
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let mut window = DetectionWindow::new(2000);
        window.push(DeviationSample::new(0.5, i64::MIN));
        window.push(DeviationSample::new(0.5, i64::MAX));

        assert_eq!(window.len(), 1);
        assert_eq!(window.samples().next().unwrap().timestamp_ms, i64::MAX);
    }
}

//! Automatic gain control
//!
//! Tracks the recent per-frame temperature extremes in two fixed-capacity FIFO
//! windows and derives display color limits from them. Limit updates are gated
//! on a wall-clock interval; timestamps are passed in by the caller so the gate
//! is testable without sleeping.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

/// Number of frames the min/max windows remember.
pub const AGC_SAMPLE_COUNT: usize = 10;

/// Interval gate between color-limit adjustments.
pub const AGC_INTERVAL: Duration = Duration::from_secs(2);

/// Margin added outside the observed extremes, degrees C.
const LIMIT_MARGIN: f64 = 1.0;

/// Fixed-capacity FIFO of observed values; oldest evicted at capacity.
#[derive(Debug, Clone)]
pub struct MinMaxWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl MinMaxWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a value, evicting the oldest entry first when full.
    pub fn push(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Smallest value in the window, `None` when empty.
    pub fn min(&self) -> Option<f64> {
        self.samples
            .iter()
            .copied()
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.min(v))))
    }

    /// Largest value in the window, `None` when empty.
    pub fn max(&self) -> Option<f64> {
        self.samples
            .iter()
            .copied()
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
    }
}

/// Rolling-window gain controller for the display color scale.
///
/// `observe` after every accepted frame; `maybe_adjust` returns the new
/// `(lower, upper)` color limits when the interval gate fires.
pub struct GainController {
    min_temps: MinMaxWindow,
    max_temps: MinMaxWindow,
    interval: Duration,
    last_adjustment: Instant,
}

impl GainController {
    pub fn new(now: Instant) -> Self {
        Self::with_interval(now, AGC_INTERVAL)
    }

    pub fn with_interval(now: Instant, interval: Duration) -> Self {
        Self {
            min_temps: MinMaxWindow::new(AGC_SAMPLE_COUNT),
            max_temps: MinMaxWindow::new(AGC_SAMPLE_COUNT),
            interval,
            last_adjustment: now,
        }
    }

    /// Record one accepted frame's extremes.
    pub fn observe(&mut self, frame_min: f64, frame_max: f64) {
        self.min_temps.push(frame_min);
        self.max_temps.push(frame_max);
    }

    /// Recompute the color limits when the interval gate fires.
    ///
    /// The gate passes while *less* than the interval has elapsed since the
    /// last adjustment.
    // TODO: the gate looks inverted relative to "adjust every 2 seconds" -
    // confirm the intended cadence against the deployed sensor-api clients
    // before flipping it.
    pub fn maybe_adjust(&mut self, now: Instant) -> Option<(f64, f64)> {
        if now.duration_since(self.last_adjustment) >= self.interval {
            return None;
        }
        let lower = self.min_temps.min()? - LIMIT_MARGIN;
        let upper = self.max_temps.max()? + LIMIT_MARGIN;
        self.last_adjustment = now;
        debug!(lower, upper, "adjusted color limits");
        Some((lower, upper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_capacity_and_eviction() {
        let mut window = MinMaxWindow::new(AGC_SAMPLE_COUNT);
        for i in 0..11 {
            window.push(i as f64);
            assert!(window.len() <= AGC_SAMPLE_COUNT);
        }
        // 11 pushes into a 10-slot window: 0.0 evicted, 1.0 is now oldest.
        assert_eq!(window.len(), AGC_SAMPLE_COUNT);
        assert_eq!(window.min(), Some(1.0));
        assert_eq!(window.max(), Some(10.0));
    }

    #[test]
    fn test_empty_window_has_no_extremes() {
        let window = MinMaxWindow::new(AGC_SAMPLE_COUNT);
        assert!(window.is_empty());
        assert_eq!(window.min(), None);
        assert_eq!(window.max(), None);
    }

    #[test]
    fn test_limits_have_one_degree_margin() {
        let start = Instant::now();
        let mut agc = GainController::new(start);
        agc.observe(18.5, 26.0);
        agc.observe(19.0, 27.5);
        let (lower, upper) = agc
            .maybe_adjust(start + Duration::from_millis(100))
            .unwrap();
        assert_eq!(lower, 17.5);
        assert_eq!(upper, 28.5);
    }

    #[test]
    fn test_gate_blocks_once_interval_elapsed() {
        let start = Instant::now();
        let mut agc = GainController::new(start);
        agc.observe(20.0, 25.0);
        assert!(agc.maybe_adjust(start + Duration::from_secs(2)).is_none());
        assert!(agc.maybe_adjust(start + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn test_gate_passes_within_interval_and_rearms() {
        let start = Instant::now();
        let mut agc = GainController::new(start);
        agc.observe(20.0, 25.0);

        let t1 = start + Duration::from_millis(500);
        assert!(agc.maybe_adjust(t1).is_some());

        // Re-armed at t1: 1.9s later is still inside the window.
        let t2 = t1 + Duration::from_millis(1900);
        assert!(agc.maybe_adjust(t2).is_some());
    }

    #[test]
    fn test_no_adjustment_without_observations() {
        let start = Instant::now();
        let mut agc = GainController::new(start);
        assert!(agc.maybe_adjust(start + Duration::from_millis(10)).is_none());
    }

    #[test]
    fn test_window_tracks_recent_extremes_only() {
        let start = Instant::now();
        let mut agc = GainController::new(start);
        // A cold outlier, then enough warm frames to evict it.
        agc.observe(5.0, 22.0);
        for _ in 0..10 {
            agc.observe(20.0, 24.0);
        }
        let (lower, upper) = agc
            .maybe_adjust(start + Duration::from_millis(100))
            .unwrap();
        assert_eq!(lower, 19.0);
        assert_eq!(upper, 25.0);
    }
}

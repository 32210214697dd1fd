//! Per-phase timing statistics
//!
//! Accumulates elapsed-time samples for the five loop phases plus an error
//! counter, for the lifetime of the process. Read once at shutdown to print
//! arithmetic-mean timings in milliseconds.

use std::time::Duration;

/// Loop phases measured per iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// HTTP round trip
    Request,
    /// JSON decode
    Parse,
    /// Full fetch-to-frame span
    Read,
    /// Spline upsample
    Interp,
    /// Rasterize + present
    Draw,
}

/// Timing accumulator for the viewer loop.
#[derive(Debug, Default)]
pub struct TimingStats {
    request: Vec<Duration>,
    parse: Vec<Duration>,
    read: Vec<Duration>,
    interp: Vec<Duration>,
    draw: Vec<Duration>,
    errors: u64,
}

impl TimingStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sample for a phase.
    pub fn record(&mut self, phase: Phase, elapsed: Duration) {
        self.samples_mut(phase).push(elapsed);
    }

    /// Count one sensor-reported error.
    pub fn count_error(&mut self) {
        self.errors += 1;
    }

    pub fn errors(&self) -> u64 {
        self.errors
    }

    /// Arithmetic mean of a phase's samples in milliseconds; 0 when empty.
    pub fn mean_ms(&self, phase: Phase) -> f64 {
        let samples = self.samples(phase);
        if samples.is_empty() {
            return 0.0;
        }
        let total: Duration = samples.iter().sum();
        total.as_secs_f64() * 1000.0 / samples.len() as f64
    }

    /// Print the shutdown report to stdout.
    pub fn report(&self) {
        println!("Request: {:.2}ms", self.mean_ms(Phase::Request));
        println!("Parse:   {:.2}ms", self.mean_ms(Phase::Parse));
        println!("Read:    {:.2}ms", self.mean_ms(Phase::Read));
        println!("Interp:  {:.2}ms", self.mean_ms(Phase::Interp));
        println!("Draw:    {:.2}ms", self.mean_ms(Phase::Draw));
        println!("Errors:  {}", self.errors);
    }

    fn samples(&self, phase: Phase) -> &Vec<Duration> {
        match phase {
            Phase::Request => &self.request,
            Phase::Parse => &self.parse,
            Phase::Read => &self.read,
            Phase::Interp => &self.interp,
            Phase::Draw => &self.draw,
        }
    }

    fn samples_mut(&mut self, phase: Phase) -> &mut Vec<Duration> {
        match phase {
            Phase::Request => &mut self.request,
            Phase::Parse => &mut self.parse,
            Phase::Read => &mut self.read,
            Phase::Interp => &mut self.interp,
            Phase::Draw => &mut self.draw,
        }
    }
}

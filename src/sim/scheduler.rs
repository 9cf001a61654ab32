//! Frame timing
//!
//! Turns host timestamps into per-frame deltas and a time-scale factor, and
//! tracks which frame loop is allowed to drive the simulation.

use std::cell::Cell;

use crate::tuning::Tuning;

/// Timing for one simulation frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Host timestamp of this frame (ms, monotonic)
    pub now: f64,
    /// Elapsed since the previous frame (ms)
    pub delta_ms: f32,
    /// `delta_ms` relative to a nominal 60 Hz frame
    pub time_scale: f32,
}

impl FrameTime {
    /// A frame with an explicit delta, for driving steps directly
    pub fn fixed(now: f64, delta_ms: f32, target_frame_ms: f32) -> Self {
        Self {
            now,
            delta_ms,
            time_scale: delta_ms / target_frame_ms,
        }
    }
}

/// Monotonic millisecond clock
pub trait TimeSource {
    fn now_ms(&self) -> f64;
}

/// Hand-driven clock for tests and headless runs
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl TimeSource for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Computes frame deltas from successive timestamps
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    last_timestamp: Option<f64>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous timestamp; the next frame reports zero elapsed time
    pub fn rebaseline(&mut self) {
        self.last_timestamp = None;
    }

    /// Advance to `timestamp`. The first call after construction or
    /// [`rebaseline`](Self::rebaseline) yields a zero delta.
    pub fn advance(&mut self, timestamp: f64, tuning: &Tuning) -> FrameTime {
        let delta = match self.last_timestamp {
            Some(last) => timestamp - last,
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp);

        let max = tuning.max_frame_delta_ms as f64;
        let delta_ms = if delta.is_finite() { delta.clamp(0.0, max) } else { 0.0 };
        if delta > max {
            log::debug!("Frame delta {:.1}ms clamped to {:.1}ms", delta, max);
        }

        FrameTime::fixed(timestamp, delta_ms as f32, tuning.target_frame_ms)
    }
}

/// Identifies one frame loop; stale tokens are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopToken(u64);

/// Hands out loop tokens and invalidates them on cancel
#[derive(Debug, Clone, Default)]
pub struct LoopControl {
    generation: u64,
    running: bool,
}

impl LoopControl {
    /// Begin a new loop, invalidating any earlier token
    pub fn start(&mut self) -> LoopToken {
        self.generation += 1;
        self.running = true;
        LoopToken(self.generation)
    }

    /// Stop the current loop. Safe to call repeatedly.
    pub fn cancel(&mut self) {
        if self.running {
            self.generation += 1;
            self.running = false;
        }
    }

    pub fn is_current(&self, token: LoopToken) -> bool {
        self.running && token.0 == self.generation
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Token of the running loop, if any
    pub fn current(&self) -> Option<LoopToken> {
        self.running.then_some(LoopToken(self.generation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_baseline() {
        let tuning = Tuning::default();
        let mut sched = FrameScheduler::new();
        let frame = sched.advance(5000.0, &tuning);
        assert_eq!(frame.delta_ms, 0.0);
        assert_eq!(frame.time_scale, 0.0);

        let frame = sched.advance(5000.0 + 1000.0 / 60.0, &tuning);
        assert!((frame.time_scale - 1.0).abs() < 1e-4);

        let frame = sched.advance(5000.0 + 3000.0 / 60.0, &tuning);
        assert!((frame.time_scale - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_rebaseline_avoids_spike() {
        let tuning = Tuning::default();
        let mut sched = FrameScheduler::new();
        sched.advance(0.0, &tuning);
        sched.advance(16.0, &tuning);
        sched.rebaseline();
        let frame = sched.advance(60_000.0, &tuning);
        assert_eq!(frame.delta_ms, 0.0);
    }

    #[test]
    fn test_delta_clamped() {
        let tuning = Tuning::default();
        let mut sched = FrameScheduler::new();
        sched.advance(100.0, &tuning);
        assert_eq!(sched.advance(50.0, &tuning).delta_ms, 0.0);
        assert_eq!(sched.advance(10_000.0, &tuning).delta_ms, tuning.max_frame_delta_ms);
    }

    #[test]
    fn test_loop_tokens() {
        let mut control = LoopControl::default();
        let first = control.start();
        assert!(control.is_current(first));

        let second = control.start();
        assert!(!control.is_current(first));
        assert!(control.is_current(second));

        control.cancel();
        control.cancel();
        assert!(!control.is_current(second));
        assert!(!control.is_running());
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(10.0);
        clock.advance(5.0);
        assert_eq!(clock.now_ms(), 15.0);
        clock.set(1.0);
        assert_eq!(clock.now_ms(), 1.0);
    }
}

// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Combo Engine - Scheduler

//! Fixed-period timers driven by host frame time.
//!
//! The host calls [`Scheduler::advance`] once per animation frame with the
//! time since the previous frame. Each [`Interval`] accumulates that time and
//! reports how many of its periods elapsed, so a slow frame runs several
//! ticks and a fast one may run none.

use crate::config::EngineSettings;

/// Longest frame the scheduler catches up on. Anything longer (a backgrounded
/// tab, a debugger pause) is treated as this long.
pub const MAX_FRAME_MS: f64 = 1_000.0;

// ─── Interval ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    period_ms: f64,
    accumulated_ms: f64,
}

impl Interval {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            accumulated_ms: 0.0,
        }
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    pub fn accumulated_ms(&self) -> f64 {
        self.accumulated_ms
    }

    /// Add `elapsed_ms` and return how many periods completed.
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        if elapsed_ms.is_nan() || elapsed_ms <= 0.0 || self.period_ms <= 0.0 {
            return 0;
        }
        self.accumulated_ms += elapsed_ms;
        let fires = (self.accumulated_ms / self.period_ms).floor();
        self.accumulated_ms -= fires * self.period_ms;
        fires as u32
    }

    pub fn cancel(&mut self) {
        self.accumulated_ms = 0.0;
    }
}

// ─── Scheduler ───────────────────────────────────────────────────────────────

/// Ticks due after one host frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fires {
    pub sim: u32,
    pub decay: u32,
    pub stats: u32,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    sim: Interval,
    decay: Interval,
    stats: Interval,
    now_ms: f64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(&EngineSettings::default())
    }
}

impl Scheduler {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            sim: Interval::new(settings.sim_tick_ms),
            decay: Interval::new(settings.decay_tick_ms),
            stats: Interval::new(settings.stats_tick_ms),
            now_ms: 0.0,
        }
    }

    /// Session clock in whole milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms as u64
    }

    pub fn sim_period_ms(&self) -> f64 {
        self.sim.period_ms()
    }

    pub fn decay_period_ms(&self) -> f64 {
        self.decay.period_ms()
    }

    /// Move the clock forward by at most [`MAX_FRAME_MS`]. The simulator
    /// interval only runs while `playing`; decay and stats always run.
    pub fn advance(&mut self, elapsed_ms: f64, playing: bool) -> Fires {
        if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
            return Fires::default();
        }
        if elapsed_ms > MAX_FRAME_MS {
            log::debug!("frame of {:.0} ms clamped to {:.0} ms", elapsed_ms, MAX_FRAME_MS);
        }
        let elapsed_ms = elapsed_ms.min(MAX_FRAME_MS);
        self.now_ms += elapsed_ms;
        Fires {
            sim: if playing { self.sim.advance(elapsed_ms) } else { 0 },
            decay: self.decay.advance(elapsed_ms),
            stats: self.stats.advance(elapsed_ms),
        }
    }

    /// Drop partial progress of the play-gated interval so no tick fires
    /// from time accumulated before a stop.
    pub fn cancel(&mut self) {
        self.sim.cancel();
    }

    pub fn reset(&mut self) {
        self.sim.cancel();
        self.decay.cancel();
        self.stats.cancel();
        self.now_ms = 0.0;
    }
}

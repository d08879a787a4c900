// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Combo Engine - Combo Tracker

//! Combo counter with tiering and velocity-scaled decay.
//!
//! Every delivered batch of orders extends the combo and refills the decay
//! window. A periodic decay tick drains the window; when it runs out the
//! combo is lost and the tracker returns to `Inactive`, keeping the session
//! best (`max_combo` / `max_tier`).
//!
//! The decay window *lengthens* as order velocity rises, so streaks are
//! easier to hold through busy periods:
//!
//! ```text
//! factor   = min(opm / REFERENCE_OPM, 1)
//! duration = BASE + (MAX - BASE) * factor
//! ```
//!
//! Tier changes and combo losses are queued as [`ComboEvent`]s and handed out
//! by [`ComboTracker::drain_events`], so observers always see settled state.

use std::collections::VecDeque;

use crate::tiers::{TierId, TierTable};
use crate::types::{ComboEvent, ComboState};

pub const BASE_COMBO_DECAY_MS: f64 = 3000.0;
pub const MAX_COMBO_DECAY_MS: f64 = 5000.0;
/// Order velocity at which the decay window reaches its maximum.
pub const REFERENCE_OPM: f64 = 1000.0;
/// Period of the decay check.
pub const DECAY_TICK_MS: f64 = 50.0;

/// Decay window for the given order velocity, bounded in
/// `[BASE_COMBO_DECAY_MS, MAX_COMBO_DECAY_MS]`.
pub fn decay_duration(current_opm: f64) -> f64 {
    let factor = if current_opm.is_finite() {
        (current_opm / REFERENCE_OPM).clamp(0.0, 1.0)
    } else if current_opm > 0.0 {
        1.0
    } else {
        0.0
    };
    BASE_COMBO_DECAY_MS + (MAX_COMBO_DECAY_MS - BASE_COMBO_DECAY_MS) * factor
}

// ---------------------------------------------------------------------------
// ComboTracker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ComboTracker {
    table: TierTable,
    state: ComboState,
    current_opm: f64,
    events: VecDeque<ComboEvent>,
}

impl Default for ComboTracker {
    fn default() -> Self {
        Self::new(TierTable::default())
    }
}

impl ComboTracker {
    pub fn new(table: TierTable) -> Self {
        Self {
            table,
            state: ComboState::default(),
            current_opm: 0.0,
            events: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &ComboState {
        &self.state
    }

    pub fn table(&self) -> &TierTable {
        &self.table
    }

    pub fn current_opm(&self) -> f64 {
        self.current_opm
    }

    /// Feed back the host's aggregate order velocity. Takes effect on the
    /// next `increment`; an already running window is not rescaled.
    pub fn set_velocity(&mut self, current_opm: f64) {
        self.current_opm = current_opm.max(0.0);
    }

    pub fn lookup(&self, count: u32) -> TierId {
        self.table.lookup(count)
    }

    /// Add one flush worth of orders to the combo.
    pub fn increment(&mut self, n: u32, now_ms: u64) {
        let prev_tier = self.state.tier;
        let count = self.state.count.saturating_add(n);
        let tier = self.table.lookup(count);
        let max_combo = self.state.max_combo.max(count);
        let decay_ms = decay_duration(self.current_opm);

        self.state = ComboState {
            count,
            tier,
            last_order_time: now_ms,
            decay_remaining: decay_ms,
            max_decay: decay_ms,
            is_active: true,
            max_combo,
            max_tier: self.table.lookup(max_combo),
        };

        if tier != prev_tier {
            log::debug!(
                "combo tier {} -> {} at count {}",
                self.table.name(prev_tier),
                self.table.name(tier),
                count
            );
            self.events.push_back(ComboEvent::TierChanged { from: prev_tier, to: tier });
        }
    }

    /// Drain `period_ms` from the decay window. Returns true when this tick
    /// lost the combo.
    pub fn decay_tick(&mut self, period_ms: f64) -> bool {
        if !self.state.is_active || self.state.count == 0 {
            return false;
        }

        let remaining = self.state.decay_remaining - period_ms;
        if remaining <= 0.0 {
            let lost = self.state.count;
            log::debug!("combo lost at {} ({})", lost, self.table.name(self.state.tier));
            self.events.push_back(ComboEvent::ComboLost { count: lost });
            self.state.count = 0;
            self.state.tier = TierId::NONE;
            self.state.decay_remaining = 0.0;
            self.state.is_active = false;
            return true;
        }

        self.state.decay_remaining = remaining;
        false
    }

    /// Back to the creation state, session best and velocity feedback
    /// included. Undelivered events are discarded.
    pub fn reset(&mut self) {
        self.state = ComboState::default();
        self.current_opm = 0.0;
        self.events.clear();
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn drain_events(&mut self) -> Vec<ComboEvent> {
        self.events.drain(..).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ComboTracker {
        ComboTracker::default()
    }

    fn assert_invariants(t: &ComboTracker) {
        let s = t.state();
        assert_eq!(s.tier, t.lookup(s.count));
        assert_eq!(s.max_tier, t.lookup(s.max_combo));
        assert!(s.max_combo >= s.count);
        if !s.is_active {
            assert_eq!(s.count, 0);
            assert_eq!(s.decay_remaining, 0.0);
        }
    }

    #[test]
    fn test_creation_default() {
        let t = tracker();
        assert_eq!(*t.state(), ComboState::default());
        assert_eq!(t.state().max_decay, BASE_COMBO_DECAY_MS);
        assert!(!t.has_events());
    }

    #[test]
    fn test_first_increment_enters_browsing() {
        let mut t = tracker();
        t.increment(3, 1_000);
        let s = t.state().clone();
        assert_eq!(s.count, 3);
        assert_eq!(t.table().name(s.tier), "browsing");
        assert!(s.is_active);
        assert_eq!(s.last_order_time, 1_000);
        assert_eq!(s.decay_remaining, BASE_COMBO_DECAY_MS);
        assert_eq!(
            t.drain_events(),
            vec![ComboEvent::TierChanged { from: TierId::NONE, to: TierId(1) }]
        );
    }

    #[test]
    fn test_increment_within_tier_emits_nothing() {
        let mut t = tracker();
        t.increment(1, 0);
        t.increment(1, 0);
        assert!(t.drain_events().is_empty());
        t.increment(1, 0);
        assert_eq!(t.drain_events().len(), 1);
        t.increment(4, 0);
        assert!(t.drain_events().is_empty());
    }

    #[test]
    fn test_zero_increment_refreshes_window() {
        let mut t = tracker();
        t.increment(0, 500);
        assert!(t.state().is_active);
        assert_eq!(t.state().count, 0);
        assert!(t.drain_events().is_empty());
        // count is zero, so the decay check leaves the state alone
        assert!(!t.decay_tick(DECAY_TICK_MS));
    }

    #[test]
    fn test_crossing_one_threshold_emits_one_change() {
        let mut t = tracker();
        t.increment(5, 0);
        t.drain_events();
        for _ in 0..3 {
            t.increment(1, 0);
        }
        // 5 -> 8 crosses window_shopping exactly once
        let events = t.drain_events();
        assert_eq!(
            events,
            vec![ComboEvent::TierChanged { from: TierId(1), to: TierId(2) }]
        );
    }

    #[test]
    fn test_large_jump_reports_endpoints() {
        let mut t = tracker();
        t.increment(130, 0);
        let events = t.drain_events();
        assert_eq!(events.len(), 1);
        let to = t.table().find("retail_rush").unwrap();
        assert_eq!(events[0], ComboEvent::TierChanged { from: TierId::NONE, to });
    }

    #[test]
    fn test_decay_to_zero_loses_combo() {
        let mut t = tracker();
        t.increment(3, 0);
        t.drain_events();

        let max_decay = t.state().max_decay;
        let ticks = (max_decay / DECAY_TICK_MS).ceil() as usize;
        let mut lost = 0;
        for _ in 0..ticks {
            if t.decay_tick(DECAY_TICK_MS) {
                lost += 1;
            }
        }
        assert_eq!(lost, 1);
        assert_eq!(t.drain_events(), vec![ComboEvent::ComboLost { count: 3 }]);

        let s = t.state();
        assert_eq!(s.count, 0);
        assert_eq!(s.tier, TierId::NONE);
        assert!(!s.is_active);
        assert_eq!(s.max_combo, 3);
        assert_eq!(t.table().name(s.max_tier), "browsing");
        assert_invariants(&t);

        // further ticks are no-ops
        assert!(!t.decay_tick(DECAY_TICK_MS));
        assert!(t.drain_events().is_empty());
    }

    #[test]
    fn test_decay_one_tick_short_keeps_combo() {
        let mut t = tracker();
        t.increment(10, 0);
        let ticks = (BASE_COMBO_DECAY_MS / DECAY_TICK_MS) as usize - 1;
        for _ in 0..ticks {
            assert!(!t.decay_tick(DECAY_TICK_MS));
        }
        assert!((t.state().decay_remaining - DECAY_TICK_MS).abs() < 1e-9);
        assert!(t.decay_tick(DECAY_TICK_MS));
    }

    #[test]
    fn test_increment_refills_window() {
        let mut t = tracker();
        t.increment(4, 0);
        for _ in 0..40 {
            t.decay_tick(DECAY_TICK_MS);
        }
        assert!(t.state().decay_remaining < BASE_COMBO_DECAY_MS);
        t.increment(1, 2_000);
        assert_eq!(t.state().decay_remaining, BASE_COMBO_DECAY_MS);
        assert_eq!(t.state().count, 5);
    }

    #[test]
    fn test_velocity_lengthens_window() {
        let mut t = tracker();
        t.set_velocity(500.0);
        t.increment(1, 0);
        assert_eq!(t.state().max_decay, 4000.0);
        t.set_velocity(5_000.0);
        t.increment(1, 0);
        assert_eq!(t.state().max_decay, MAX_COMBO_DECAY_MS);
        t.set_velocity(-20.0);
        assert_eq!(t.current_opm(), 0.0);
    }

    #[test]
    fn test_decay_duration_bounds_and_monotonic() {
        assert_eq!(decay_duration(0.0), BASE_COMBO_DECAY_MS);
        assert_eq!(decay_duration(-5.0), BASE_COMBO_DECAY_MS);
        assert_eq!(decay_duration(REFERENCE_OPM), MAX_COMBO_DECAY_MS);
        assert_eq!(decay_duration(f64::INFINITY), MAX_COMBO_DECAY_MS);
        assert_eq!(decay_duration(f64::NAN), BASE_COMBO_DECAY_MS);
        let mut prev = decay_duration(0.0);
        for opm in (0..3_000).step_by(7) {
            let d = decay_duration(opm as f64);
            assert!(d >= prev);
            assert!((BASE_COMBO_DECAY_MS..=MAX_COMBO_DECAY_MS).contains(&d));
            prev = d;
        }
    }

    #[test]
    fn test_max_tracking_across_losses() {
        let mut t = tracker();
        t.increment(30, 0);
        while !t.decay_tick(DECAY_TICK_MS) {}
        t.increment(5, 0);
        assert_eq!(t.state().max_combo, 30);
        assert_eq!(t.table().name(t.state().max_tier), "checkout_ready");
        assert_invariants(&t);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut t = tracker();
        t.increment(42, 10);
        t.decay_tick(DECAY_TICK_MS);
        t.reset();
        let once = t.state().clone();
        assert!(!t.has_events());
        t.reset();
        assert_eq!(*t.state(), once);
        assert_eq!(once, ComboState::default());
    }

    #[test]
    fn test_reset_clears_velocity_feedback() {
        let mut t = tracker();
        t.set_velocity(1_200.0);
        t.increment(5, 0);
        assert_eq!(t.state().max_decay, MAX_COMBO_DECAY_MS);

        t.reset();
        assert_eq!(t.current_opm(), 0.0);
        t.increment(1, 0);
        assert_eq!(t.state().max_decay, BASE_COMBO_DECAY_MS);
    }
}

// Per-Frame Metric Trackers - Streaks, Tier Occupancy, Event Counts
// Everything here is derived from dashboard snapshots and drained events

use std::collections::BTreeMap;

use combo_engine::{ComboState, DashboardEvent, TierTable};

// ─── Streak Tracker ─────────────────────────────────────────────────────────

/// Measures how long combos stay alive and where the session spends its time.
pub struct StreakTracker {
    pub total_ms: f64,
    pub active_ms: f64,
    pub current_streak_ms: f64,
    pub longest_streak_ms: f64,
    pub time_in_tier: BTreeMap<String, f64>,
}

impl StreakTracker {
    pub fn new() -> Self {
        Self {
            total_ms: 0.0,
            active_ms: 0.0,
            current_streak_ms: 0.0,
            longest_streak_ms: 0.0,
            time_in_tier: BTreeMap::new(),
        }
    }

    /// Record the combo state observed at the end of a frame of `frame_ms`.
    pub fn record_frame(&mut self, combo: &ComboState, table: &TierTable, frame_ms: f64) {
        self.total_ms += frame_ms;
        if combo.is_active && combo.count > 0 {
            self.active_ms += frame_ms;
            self.current_streak_ms += frame_ms;
            self.longest_streak_ms = self.longest_streak_ms.max(self.current_streak_ms);
        } else {
            self.current_streak_ms = 0.0;
        }
        *self
            .time_in_tier
            .entry(table.name(combo.tier).to_string())
            .or_insert(0.0) += frame_ms;
    }

    pub fn active_pct(&self) -> f64 {
        if self.total_ms <= 0.0 { return 0.0; }
        self.active_ms / self.total_ms * 100.0
    }

    pub fn time_in_tier_ms(&self) -> BTreeMap<String, u64> {
        self.time_in_tier
            .iter()
            .map(|(name, ms)| (name.clone(), ms.round() as u64))
            .collect()
    }
}

// ─── Event Counter ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct EventCounter {
    pub orders: u64,
    pub tier_changes: u32,
    pub tier_ups: u32,
    pub combo_losses: u32,
    pub milestones: u32,
}

impl EventCounter {
    pub fn record(&mut self, events: &[DashboardEvent]) {
        for event in events {
            match event {
                DashboardEvent::Orders { orders } => self.orders += orders.len() as u64,
                DashboardEvent::TierChanged { .. } => self.tier_changes += 1,
                DashboardEvent::TierUp { .. } => self.tier_ups += 1,
                DashboardEvent::ComboLost { .. } => self.combo_losses += 1,
                DashboardEvent::Milestone { .. } => self.milestones += 1,
            }
        }
    }
}

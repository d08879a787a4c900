// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Combo Engine - Dashboard Core

use std::collections::VecDeque;
use wasm_bindgen::prelude::*;

use crate::combo::ComboTracker;
use crate::config::{ConfigError, EngineSettings, SimulationConfig};
use crate::milestones::MilestoneTracker;
use crate::scheduler::{Fires, Scheduler};
use crate::simulator::OrderSimulator;
use crate::stats::StatsAggregator;
use crate::tiers::TierTable;
use crate::types::*;
use crate::EngineError;

/// Undrained events kept before the oldest are dropped.
const MAX_PENDING_EVENTS: usize = 4_096;

// ─── Dashboard struct ────────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct Dashboard {
    pub(crate) config: SimulationConfig,
    pub(crate) settings: EngineSettings,
    pub(crate) combo: ComboTracker,
    pub(crate) simulator: OrderSimulator,
    pub(crate) stats: StatsAggregator,
    pub(crate) milestones: MilestoneTracker,
    pub(crate) scheduler: Scheduler,
    pub(crate) events: VecDeque<DashboardEvent>,
    /// Set while the queue is full and dropping; cleared by a drain.
    pub(crate) events_overflowed: bool,
}

/// Summary of one host frame, used by the bench time series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    pub fires: Fires,
    pub delivered: usize,
    pub burst: usize,
    /// Effective simulator rate at the last tick of the frame.
    pub effective_opm: f64,
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl Dashboard {
    pub fn with_seed(seed: u64) -> Self {
        Self::build(TierTable::shopping(), EngineSettings::with_seed(seed))
    }

    pub fn with_table(table: TierTable, settings: EngineSettings) -> Result<Self, EngineError> {
        settings.validate()?;
        Ok(Self::build(table, settings))
    }

    fn build(table: TierTable, settings: EngineSettings) -> Self {
        Self {
            config: SimulationConfig::default(),
            combo: ComboTracker::new(table),
            simulator: OrderSimulator::new(settings.seed),
            stats: StatsAggregator::new(settings.chart_window_secs),
            milestones: MilestoneTracker::new(),
            scheduler: Scheduler::new(&settings),
            events: VecDeque::new(),
            events_overflowed: false,
            settings,
        }
    }

    /// Run one host frame of `elapsed_ms`.
    ///
    /// Order within a frame: simulator ticks, decay ticks, flush of the
    /// frame's orders into stats/combo/milestones, then the stats roll that
    /// feeds velocity back into the combo decay window.
    pub fn frame_core(&mut self, elapsed_ms: f64) -> FrameReport {
        let fires = self.scheduler.advance(elapsed_ms, self.config.is_playing);
        let now = self.scheduler.now_ms();
        let mut report = FrameReport { fires, ..FrameReport::default() };

        let sim_period = self.scheduler.sim_period_ms();
        for _ in 0..fires.sim {
            let tick = self.simulator.tick(&self.config, sim_period, now);
            report.burst += tick.burst;
            report.effective_opm = tick.effective_opm;
        }

        let decay_period = self.scheduler.decay_period_ms();
        for _ in 0..fires.decay {
            self.combo.decay_tick(decay_period);
        }
        self.pump_combo_events();

        let batch = self.simulator.flush();
        report.delivered = batch.len();
        self.handle_batch(batch, now);

        for _ in 0..fires.stats {
            self.stats.roll_second();
            self.combo.set_velocity(self.stats.current_opm() as f64);
            self.check_milestone(now);
        }

        report
    }

    fn handle_batch(&mut self, batch: Vec<Order>, now: u64) {
        if batch.is_empty() {
            return;
        }
        self.stats.record_batch(&batch, now);
        self.combo.increment(batch.len() as u32, now);
        self.push_event(DashboardEvent::Orders { orders: batch });
        self.pump_combo_events();
        self.check_milestone(now);
    }

    fn check_milestone(&mut self, now: u64) {
        let stats = self.stats.stats();
        if let Some(milestone) = self.milestones.check(
            stats.total_orders,
            stats.total_revenue,
            stats.current_opm,
            now,
        ) {
            self.push_event(DashboardEvent::Milestone { milestone });
        }
    }

    fn pump_combo_events(&mut self) {
        for event in self.combo.drain_events() {
            match event {
                ComboEvent::TierChanged { from, to } => {
                    self.push_event(DashboardEvent::TierChanged { from, to });
                    if to > from {
                        let def = self.combo.table().get(to);
                        let tier_up = DashboardEvent::TierUp {
                            tier: to,
                            name: def.name.clone(),
                            label: def.label.clone(),
                            combo: self.combo.state().count,
                        };
                        self.push_event(tier_up);
                    }
                }
                ComboEvent::ComboLost { count } => {
                    self.push_event(DashboardEvent::ComboLost { count });
                }
            }
        }
    }

    fn push_event(&mut self, event: DashboardEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
            if !self.events_overflowed {
                self.events_overflowed = true;
                log::warn!(
                    "event queue full ({} pending), dropping oldest events",
                    MAX_PENDING_EVENTS
                );
            }
        }
        self.events.push_back(event);
    }

    /// Replace the host controls. Leaving the playing state stops the
    /// simulator the same way `pause` does.
    pub fn apply_config(&mut self, config: SimulationConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let was_playing = self.config.is_playing;
        let now_playing = config.is_playing;
        self.config = config;
        if was_playing != now_playing {
            self.on_playback_changed();
        }
        Ok(())
    }

    pub fn set_playing(&mut self, playing: bool) {
        if self.config.is_playing == playing {
            return;
        }
        self.config.is_playing = playing;
        self.on_playback_changed();
    }

    fn on_playback_changed(&mut self) {
        if self.config.is_playing {
            log::info!("simulation playing at {} opm", self.config.base_opm());
        } else {
            self.simulator.stop();
            self.scheduler.cancel();
            log::info!("simulation paused");
        }
    }

    /// Pause and return every component to its initial state.
    pub fn reset_core(&mut self) {
        self.set_playing(false);
        self.simulator.reset();
        self.combo.reset();
        self.stats.reset();
        self.milestones.reset();
        self.scheduler.reset();
        self.events.clear();
        self.events_overflowed = false;
        log::info!("dashboard reset");
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn table(&self) -> &TierTable {
        self.combo.table()
    }

    pub fn combo(&self) -> &ComboState {
        self.combo.state()
    }

    pub fn stats(&self) -> &DashboardStats {
        self.stats.stats()
    }

    pub fn simulator(&self) -> &OrderSimulator {
        &self.simulator
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Per-second order counts for the velocity chart, oldest first.
    pub fn chart_core(&mut self) -> Vec<u32> {
        let now = self.scheduler.now_ms();
        self.stats.chart_buckets(now)
    }

    pub fn drain_events(&mut self) -> Vec<DashboardEvent> {
        self.events_overflowed = false;
        self.events.drain(..).collect()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combo::{BASE_COMBO_DECAY_MS, MAX_COMBO_DECAY_MS};
    use crate::tiers::TierId;

    fn steady(opm: f64) -> SimulationConfig {
        SimulationConfig {
            orders_per_minute: opm,
            speed_multiplier: 1.0,
            is_playing: true,
            burst_mode: false,
            volatility: 0.0,
            trend_range: 0.0,
        }
    }

    fn run(dash: &mut Dashboard, ms: u32) {
        for _ in 0..ms / 20 {
            dash.frame_core(20.0);
        }
    }

    #[test]
    fn test_paused_dashboard_is_idle() {
        let mut dash = Dashboard::with_seed(1);
        run(&mut dash, 5_000);
        assert_eq!(dash.stats().total_orders, 0);
        assert!(dash.drain_events().is_empty());
        assert_eq!(dash.now_ms(), 5_000);
    }

    #[test]
    fn test_orders_flow_into_stats_and_combo() {
        let mut dash = Dashboard::with_seed(2);
        dash.apply_config(steady(600.0)).unwrap();
        run(&mut dash, 1_000);

        // 10 ticks of exactly one order each
        assert_eq!(dash.stats().total_orders, 10);
        assert_eq!(dash.combo().count, 10);
        assert!(dash.combo().is_active);

        let events = dash.drain_events();
        let delivered: usize = events
            .iter()
            .filter_map(|e| match e {
                DashboardEvent::Orders { orders } => Some(orders.len()),
                _ => None,
            })
            .sum();
        assert_eq!(delivered, 10);
    }

    #[test]
    fn test_tier_up_follows_tier_change() {
        let mut dash = Dashboard::with_seed(3);
        dash.apply_config(steady(600.0)).unwrap();
        run(&mut dash, 400);
        let events = dash.drain_events();
        let pos = events
            .iter()
            .position(|e| matches!(e, DashboardEvent::TierChanged { from: TierId::NONE, .. }))
            .unwrap();
        match &events[pos + 1] {
            DashboardEvent::TierUp { name, combo, .. } => {
                assert_eq!(name, "browsing");
                assert_eq!(*combo, 3);
            }
            other => panic!("expected TierUp, got {:?}", other),
        }
    }

    #[test]
    fn test_pause_loses_combo_after_decay() {
        let mut dash = Dashboard::with_seed(4);
        dash.apply_config(steady(600.0)).unwrap();
        run(&mut dash, 500);
        let count = dash.combo().count;
        assert!(count > 0);
        dash.set_playing(false);
        dash.drain_events();

        run(&mut dash, 6_000);
        assert!(!dash.combo().is_active);
        let events = dash.drain_events();
        assert!(events.contains(&DashboardEvent::ComboLost { count }));
        // no tier-up for a drop back to zero
        assert!(!events.iter().any(|e| matches!(e, DashboardEvent::TierUp { .. })));
    }

    #[test]
    fn test_invalid_config_is_rejected_and_kept() {
        let mut dash = Dashboard::with_seed(5);
        let bad = SimulationConfig {
            speed_multiplier: -1.0,
            ..steady(600.0)
        };
        assert!(dash.apply_config(bad).is_err());
        assert_eq!(*dash.config(), SimulationConfig::default());
    }

    #[test]
    fn test_first_milestones_of_a_fast_session() {
        let mut dash = Dashboard::with_seed(6);
        dash.apply_config(steady(6_000.0)).unwrap();
        run(&mut dash, 1_000);
        let milestones: Vec<Milestone> = dash
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                DashboardEvent::Milestone { milestone } => Some(milestone),
                _ => None,
            })
            .collect();

        // a handful of orders already clears $1K, well before the 50th order
        assert_eq!(milestones[0].kind, MilestoneKind::Revenue);
        assert_eq!(milestones[0].label, "$1K REVENUE");
        let first_orders = milestones
            .iter()
            .find(|m| m.kind == MilestoneKind::Orders)
            .unwrap();
        assert_eq!(first_orders.label, "50 ORDERS");
    }

    #[test]
    fn test_reset_restores_base_decay_window() {
        let mut dash = Dashboard::with_seed(8);
        dash.apply_config(steady(1_200.0)).unwrap();
        run(&mut dash, 61_000);
        assert_eq!(dash.combo().max_decay, MAX_COMBO_DECAY_MS);

        dash.reset_core();
        dash.set_playing(true);
        run(&mut dash, 200);
        assert_eq!(dash.stats().current_opm, 0);
        assert!(dash.combo().count > 0);
        assert_eq!(dash.combo().max_decay, BASE_COMBO_DECAY_MS);
    }

    #[test]
    fn test_event_queue_is_bounded() {
        let mut dash = Dashboard::with_seed(7);
        dash.apply_config(steady(600.0)).unwrap();
        for _ in 0..(MAX_PENDING_EVENTS + 100) {
            dash.frame_core(100.0);
        }
        assert!(dash.events.len() <= MAX_PENDING_EVENTS);
        assert!(dash.events_overflowed);

        // the overflow warning re-arms once the host drains again
        assert_eq!(dash.drain_events().len(), MAX_PENDING_EVENTS);
        assert!(!dash.events_overflowed);
        dash.frame_core(100.0);
        assert!(!dash.events_overflowed);
    }

    #[test]
    fn test_with_table_validates_settings() {
        let settings = EngineSettings {
            sim_tick_ms: 0.0,
            ..EngineSettings::default()
        };
        let err = Dashboard::with_table(TierTable::shopping(), settings).err().unwrap();
        assert!(matches!(err, EngineError::Config(_)));
    }
}

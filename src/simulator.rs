// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Combo Engine - Order Simulator

//! Variable-rate synthetic order stream.
//!
//! Each tick computes an effective rate from the host config:
//!
//! ```text
//! effective_opm = max(0, base_opm * (1 + trend + noise))
//! expected      = effective_opm / 60 * elapsed_secs
//! ```
//!
//! `trend` wanders smoothly toward a target that is re-drawn every 2-10 s,
//! `noise` is fresh every tick. The integer part of `expected` is emitted
//! outright and the fractional part as one Bernoulli trial, which keeps the
//! long-run count unbiased. Burst mode layers random 10-49 order spikes on
//! top. Orders are buffered until the host flushes once per frame.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::SimulationConfig;
use crate::orders::OrderFactory;
use crate::types::Order;

const TREND_SMOOTHING: f64 = 0.02;
const TREND_RETARGET_MIN_MS: f64 = 2_000.0;
const TREND_RETARGET_SPAN_MS: f64 = 8_000.0;
const BURST_DELAY_MIN_MS: f64 = 5_000.0;
const BURST_DELAY_SPAN_MS: f64 = 15_000.0;
const BURST_SIZE_MIN: usize = 10;
const BURST_SIZE_MAX: usize = 50; // exclusive

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendState {
    pub value: f64,
    pub target: f64,
    /// Time left until the next target is drawn. Starts at zero so the first
    /// tick picks a target.
    pub retarget_in_ms: f64,
}

impl TrendState {
    fn step<R: Rng + ?Sized>(&mut self, rng: &mut R, trend_range: f64, elapsed_ms: f64) {
        self.retarget_in_ms -= elapsed_ms;
        if self.retarget_in_ms <= 0.0 {
            self.target = rng.gen_range(-1.0..1.0) * trend_range;
            self.retarget_in_ms = TREND_RETARGET_MIN_MS + rng.gen::<f64>() * TREND_RETARGET_SPAN_MS;
        }
        self.value += (self.target - self.value) * TREND_SMOOTHING;
    }
}

// ---------------------------------------------------------------------------
// TickReport
// ---------------------------------------------------------------------------

/// What one simulator tick did, for time series and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub effective_opm: f64,
    pub expected: f64,
    pub emitted: usize,
    pub burst: usize,
}

// ---------------------------------------------------------------------------
// OrderSimulator
// ---------------------------------------------------------------------------

pub struct OrderSimulator {
    rng: ChaCha8Rng,
    factory: OrderFactory,
    trend: TrendState,
    noise: f64,
    /// Time until the pending burst fires; None when no burst is scheduled.
    burst_in_ms: Option<f64>,
    buffer: Vec<Order>,
    total_emitted: u64,
}

impl OrderSimulator {
    pub fn new(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: ChaCha8Rng) -> Self {
        Self {
            rng,
            factory: OrderFactory::new(),
            trend: TrendState::default(),
            noise: 0.0,
            burst_in_ms: None,
            buffer: Vec::new(),
            total_emitted: 0,
        }
    }

    pub fn trend(&self) -> &TrendState {
        &self.trend
    }

    pub fn noise(&self) -> f64 {
        self.noise
    }

    pub fn burst_pending(&self) -> Option<f64> {
        self.burst_in_ms
    }

    /// Orders waiting for the next frame flush.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn total_emitted(&self) -> u64 {
        self.total_emitted
    }

    /// Advance the rate process by `elapsed_ms` and buffer the orders it
    /// produces. Paused configs do nothing at all.
    pub fn tick(&mut self, config: &SimulationConfig, elapsed_ms: f64, now_ms: u64) -> TickReport {
        if !config.is_playing {
            return TickReport::default();
        }

        self.trend.step(&mut self.rng, config.trend_range, elapsed_ms);
        self.noise = self.rng.gen_range(-1.0..1.0) * config.volatility * 0.5;

        let modifier = 1.0 + self.trend.value + self.noise;
        let effective_opm = (config.base_opm() * modifier).max(0.0);
        let expected = effective_opm / 60.0 * (elapsed_ms / 1000.0);

        let whole = expected.floor();
        let fractional = expected - whole;
        let mut emitted = whole as usize;
        if self.rng.gen::<f64>() < fractional {
            emitted += 1;
        }
        self.emit(emitted, now_ms);

        let burst = self.advance_bursts(config, elapsed_ms, now_ms);

        TickReport {
            effective_opm,
            expected,
            emitted,
            burst,
        }
    }

    /// Burst clock. Schedules a burst when burst mode is on, fires it when due
    /// and schedules the next one. Turning burst mode off cancels it.
    fn advance_bursts(&mut self, config: &SimulationConfig, elapsed_ms: f64, now_ms: u64) -> usize {
        if !config.burst_mode || !config.is_playing {
            self.burst_in_ms = None;
            return 0;
        }

        let remaining = match self.burst_in_ms {
            Some(due) => due - elapsed_ms,
            None => {
                self.burst_in_ms = Some(self.burst_delay());
                return 0;
            }
        };

        if remaining > 0.0 {
            self.burst_in_ms = Some(remaining);
            return 0;
        }

        let size = self.rng.gen_range(BURST_SIZE_MIN..BURST_SIZE_MAX);
        log::debug!("burst of {} orders at {}ms", size, now_ms);
        self.emit(size, now_ms);
        self.burst_in_ms = Some(self.burst_delay());
        size
    }

    fn burst_delay(&mut self) -> f64 {
        BURST_DELAY_MIN_MS + self.rng.gen::<f64>() * BURST_DELAY_SPAN_MS
    }

    fn emit(&mut self, count: usize, now_ms: u64) {
        if count == 0 {
            return;
        }
        self.factory
            .generate_batch(&mut self.rng, count, now_ms, &mut self.buffer);
        self.total_emitted += count as u64;
    }

    /// Hand over everything generated since the last flush, oldest first.
    pub fn flush(&mut self) -> Vec<Order> {
        std::mem::take(&mut self.buffer)
    }

    /// Cancel the burst schedule and forget trend/noise. Buffered orders and
    /// the id sequence survive so playback can resume.
    pub fn stop(&mut self) {
        self.burst_in_ms = None;
        self.trend = TrendState::default();
        self.noise = 0.0;
    }

    /// Full reset: also drops buffered orders and restarts ids.
    pub fn reset(&mut self) {
        self.stop();
        self.buffer.clear();
        self.factory.reset();
        self.total_emitted = 0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_paused_emits_nothing() {
        let mut sim = OrderSimulator::new(1);
        let config = SimulationConfig {
            is_playing: false,
            burst_mode: true,
            ..steady(10_000.0)
        };
        for _ in 0..100 {
            assert_eq!(sim.tick(&config, 100.0, 0), TickReport::default());
        }
        assert_eq!(sim.buffered(), 0);
        assert_eq!(sim.burst_pending(), None);
    }

    #[test]
    fn test_zero_rate_emits_nothing() {
        let mut sim = OrderSimulator::new(2);
        let config = SimulationConfig {
            volatility: 0.8,
            trend_range: 0.5,
            ..steady(0.0)
        };
        for _ in 0..600 {
            let report = sim.tick(&config, 100.0, 0);
            assert_eq!(report.emitted, 0);
        }
        assert!(sim.flush().is_empty());
    }

    #[test]
    fn test_integer_rate_is_exact() {
        // 600 OPM at 100 ms ticks is exactly one order per tick
        let mut sim = OrderSimulator::new(3);
        let config = steady(600.0);
        for _ in 0..50 {
            let report = sim.tick(&config, 100.0, 0);
            assert!((report.expected - 1.0).abs() < 1e-12);
            assert_eq!(report.emitted, 1);
        }
        assert_eq!(sim.flush().len(), 50);
    }

    #[test]
    fn test_fractional_rate_is_unbiased() {
        // 0.25 expected orders per tick
        let mut sim = OrderSimulator::new(4);
        let config = steady(150.0);
        let ticks = 40_000;
        for _ in 0..ticks {
            sim.tick(&config, 100.0, 0);
        }
        let mean = sim.total_emitted() as f64 / ticks as f64;
        assert!((mean - 0.25).abs() < 0.01, "mean {} per tick", mean);
    }

    #[test]
    fn test_speed_multiplier_scales_rate() {
        let mut sim = OrderSimulator::new(5);
        let config = SimulationConfig {
            speed_multiplier: 3.0,
            ..steady(600.0)
        };
        let report = sim.tick(&config, 100.0, 0);
        assert_eq!(report.emitted, 3);
        assert!((report.effective_opm - 1_800.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_stays_in_range_and_moves_smoothly() {
        let mut sim = OrderSimulator::new(6);
        let config = SimulationConfig {
            trend_range: 0.4,
            ..steady(300.0)
        };
        let mut prev = sim.trend().value;
        for _ in 0..2_000 {
            sim.tick(&config, 100.0, 0);
            let t = sim.trend();
            assert!(t.value.abs() <= 0.4 + 1e-12);
            assert!(t.target.abs() <= 0.4);
            assert!(t.retarget_in_ms <= TREND_RETARGET_MIN_MS + TREND_RETARGET_SPAN_MS);
            // each step covers 2% of the gap, which is at most 0.8
            assert!((t.value - prev).abs() <= 0.8 * TREND_SMOOTHING + 1e-12);
            prev = t.value;
        }
    }

    #[test]
    fn test_noise_bounded_by_half_volatility() {
        let mut sim = OrderSimulator::new(7);
        let config = SimulationConfig {
            volatility: 0.6,
            ..steady(300.0)
        };
        for _ in 0..1_000 {
            sim.tick(&config, 100.0, 0);
            assert!(sim.noise().abs() <= 0.3);
        }
    }

    #[test]
    fn test_bursts_fire_within_window() {
        let mut sim = OrderSimulator::new(8);
        let config = SimulationConfig {
            burst_mode: true,
            ..steady(0.0)
        };
        let mut bursts = Vec::new();
        let mut elapsed = 0.0;
        let mut last_fire = 0.0;
        for _ in 0..6_000 {
            let report = sim.tick(&config, 100.0, 0);
            elapsed += 100.0;
            if report.burst > 0 {
                let gap = elapsed - last_fire;
                assert!(gap >= BURST_DELAY_MIN_MS && gap <= BURST_DELAY_MIN_MS + BURST_DELAY_SPAN_MS + 200.0);
                last_fire = elapsed;
                bursts.push(report.burst);
            }
        }
        assert!(!bursts.is_empty());
        assert!(bursts.iter().all(|&b| (BURST_SIZE_MIN..BURST_SIZE_MAX).contains(&b)));
        assert_eq!(sim.total_emitted(), bursts.iter().sum::<usize>() as u64);
    }

    #[test]
    fn test_disabling_bursts_cancels_schedule() {
        let mut sim = OrderSimulator::new(9);
        let mut config = SimulationConfig {
            burst_mode: true,
            ..steady(0.0)
        };
        sim.tick(&config, 100.0, 0);
        assert!(sim.burst_pending().is_some());
        config.burst_mode = false;
        sim.tick(&config, 100.0, 0);
        assert!(sim.burst_pending().is_none());
    }

    #[test]
    fn test_stop_keeps_buffer_and_clears_schedule() {
        let mut sim = OrderSimulator::new(10);
        let config = SimulationConfig {
            burst_mode: true,
            trend_range: 0.3,
            ..steady(600.0)
        };
        for _ in 0..5 {
            sim.tick(&config, 100.0, 0);
        }
        let buffered = sim.buffered();
        assert!(buffered > 0);
        sim.stop();
        assert_eq!(sim.burst_pending(), None);
        assert_eq!(*sim.trend(), TrendState::default());
        assert_eq!(sim.buffered(), buffered);

        sim.reset();
        assert_eq!(sim.buffered(), 0);
        assert_eq!(sim.total_emitted(), 0);
    }

    #[test]
    fn test_flush_preserves_generation_order() {
        let mut sim = OrderSimulator::new(11);
        let config = steady(1_200.0);
        for i in 0..10 {
            sim.tick(&config, 100.0, i * 100);
        }
        let batch = sim.flush();
        let ids: Vec<u64> = batch
            .iter()
            .map(|o| o.id.trim_start_matches("order-").parse().unwrap())
            .collect();
        assert!(ids.windows(2).all(|w| w[1] == w[0] + 1));
        assert!(batch.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(sim.buffered(), 0);
    }
}

// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Combo Engine - Configuration

//! Host-owned simulation controls and engine timing settings.
//!
//! [`SimulationConfig`] mirrors the control dock of the dashboard and is
//! mutated by the host at any time; the simulator only reads it.
//! [`EngineSettings`] fixes the cadence of the scheduler and is chosen once
//! when the dashboard is built.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised when host-supplied configuration is out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

// ---------------------------------------------------------------------------
// SimulationConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    pub orders_per_minute: f64,
    pub speed_multiplier: f64,
    pub is_playing: bool,
    pub burst_mode: bool,
    /// Amplitude of the per-tick noise; noise is drawn from ±volatility/2.
    pub volatility: f64,
    /// Bound of the slowly wandering trend multiplier.
    pub trend_range: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            orders_per_minute: 500.0,
            speed_multiplier: 1.0,
            is_playing: false,
            burst_mode: false,
            volatility: 0.3,
            trend_range: 0.4,
        }
    }
}

impl SimulationConfig {
    /// Host-side guard. A zero rate is accepted and simply yields no orders.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("ordersPerMinute", self.orders_per_minute)?;
        positive("speedMultiplier", self.speed_multiplier)?;
        non_negative("volatility", self.volatility)?;
        non_negative("trendRange", self.trend_range)?;
        Ok(())
    }

    /// Nominal order rate before trend and noise.
    pub fn base_opm(&self) -> f64 {
        self.orders_per_minute * self.speed_multiplier
    }

    pub fn from_json(json: &str) -> Result<Self, crate::EngineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// EngineSettings
// ---------------------------------------------------------------------------

/// Scheduler cadence and RNG seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    pub seed: u64,
    /// Simulator rate computation period (10 Hz).
    pub sim_tick_ms: f64,
    /// Combo decay check period.
    pub decay_tick_ms: f64,
    /// Stats roll-up period; one per-second OPM bucket per roll.
    pub stats_tick_ms: f64,
    /// Seconds shown by the velocity chart.
    pub chart_window_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            sim_tick_ms: 100.0,
            decay_tick_ms: crate::combo::DECAY_TICK_MS,
            stats_tick_ms: 1000.0,
            chart_window_secs: 120,
        }
    }
}

impl EngineSettings {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed, ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("simTickMs", self.sim_tick_ms)?;
        positive("decayTickMs", self.decay_tick_ms)?;
        positive("statsTickMs", self.stats_tick_ms)?;
        positive("chartWindowSecs", self.chart_window_secs as f64)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

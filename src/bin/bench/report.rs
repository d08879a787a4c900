// Benchmark Report Types
// Structured output for offline analysis of the combo engine

use serde::Serialize;
use std::collections::BTreeMap;

// ─── Statistics (per-metric Monte Carlo aggregation) ────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let stderr = std_dev / (n as f64).sqrt();
        let z = 1.96; // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - z * stderr,
            ci_upper: mean + z * stderr,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }

    pub fn half_width(&self) -> f64 {
        (self.ci_upper - self.ci_lower) / 2.0
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub scenario: String,
    pub name: String,
    pub category: String,
    pub seed: u64,
    pub pass: bool,
    pub failures: Vec<String>,
    pub duration_ms: u64,
    pub total_orders: u64,
    pub total_revenue: f64,
    /// Orders per minute over the whole run.
    pub observed_opm: f64,
    pub peak_opm: u32,
    pub max_combo: u32,
    pub max_tier: String,
    pub combo_losses: u32,
    pub tier_changes: u32,
    pub tier_ups: u32,
    pub milestones: u32,
    pub bursts: u32,
    pub longest_streak_ms: u64,
    /// Share of the run with an active combo, percent.
    pub active_pct: f64,
    /// Milliseconds spent per tier name.
    pub time_in_tier: BTreeMap<String, u64>,
    pub frames: u64,
    pub elapsed_ms: u128,
    pub frames_per_sec: f64,
}

// ─── Monte Carlo Report (per-scenario aggregation) ──────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloReport {
    pub scenario_name: String,
    pub label: String,
    pub category: String,
    pub n_runs: usize,
    pub pass_rate: f64,
    pub observed_opm: Stats,
    pub peak_opm: Stats,
    pub total_orders: Stats,
    pub total_revenue: Stats,
    pub max_combo: Stats,
    pub combo_losses: Stats,
    pub longest_streak_ms: Stats,
    pub active_pct: Stats,
    pub milestones: Stats,
    pub elapsed_ms: Stats,
    pub frames_per_sec: Stats,
    pub individual_runs: Vec<BenchResult>,
}

// ─── Engine Validation Summary ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct EngineValidation {
    /// Steady 600 OPM converges to 600 within tolerance.
    pub rate_convergence: bool,
    /// Zero rate never produces orders or combos.
    pub zero_rate_silent: bool,
    /// Sparse traffic loses combos; dense traffic holds them.
    pub decay_behaviour: bool,
    /// Sustained velocity reaches the top tier.
    pub top_tier_reachable: bool,
}

impl EngineValidation {
    pub fn all_pass(&self) -> bool {
        self.rate_convergence && self.zero_rate_silent && self.decay_behaviour && self.top_tier_reachable
    }
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub n_runs_per_scenario: usize,
    pub summary: Summary,
    pub engine_validation: EngineValidation,
    pub scenarios: Vec<MonteCarloReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}

// Per-Second JSONL Time Series Recorder
// Outputs one JSON line per simulated second for offline analysis

use serde::Serialize;
use combo_engine::Dashboard;
use num_traits::ToPrimitive;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct SecondSnapshot {
    pub second: u64,
    pub target_opm: f64,
    pub effective_opm: f64,
    pub trend: f64,
    pub noise: f64,
    pub current_opm: u32,
    pub total_orders: u64,
    pub total_revenue: f64,
    pub combo: u32,
    pub tier: String,
    pub decay_remaining_ms: f64,
    pub decay_window_ms: f64,
    pub burst_pending_ms: Option<f64>,
}

impl SecondSnapshot {
    pub fn from_dashboard(dash: &Dashboard, second: u64, effective_opm: f64) -> Self {
        let combo = dash.combo();
        let stats = dash.stats();
        let sim = dash.simulator();
        Self {
            second,
            target_opm: dash.config().base_opm(),
            effective_opm,
            trend: sim.trend().value,
            noise: sim.noise(),
            current_opm: stats.current_opm,
            total_orders: stats.total_orders,
            total_revenue: stats.total_revenue.to_f64().unwrap_or(0.0),
            combo: combo.count,
            tier: dash.table().name(combo.tier).to_string(),
            decay_remaining_ms: combo.decay_remaining,
            decay_window_ms: combo.max_decay,
            burst_pending_ms: sim.burst_pending(),
        }
    }
}

/// Time series recorder that accumulates snapshots and writes JSONL
pub struct TimeSeriesRecorder {
    snapshots: Vec<SecondSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self { snapshots: Vec::new() }
    }

    pub fn record(&mut self, dash: &Dashboard, second: u64, effective_opm: f64) {
        self.snapshots.push(SecondSnapshot::from_dashboard(dash, second, effective_opm));
    }

    /// Write all snapshots to a JSONL file
    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }
}

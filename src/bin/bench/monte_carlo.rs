// Monte Carlo Infrastructure - N runs per scenario with statistical aggregation
// Each scenario runs N times with seeds base..base+N, computing mean ± 95% CI

use combo_engine::*;
use num_traits::ToPrimitive;

use crate::metrics::{EventCounter, StreakTracker};
use crate::report::*;
use crate::scenarios::Scenario;
use crate::time_series::TimeSeriesRecorder;

use std::time::Instant;

/// Run a single scenario iteration with a specific seed.
pub fn run_single(
    scenario: &Scenario,
    seed: u64,
    time_series_dir: Option<&std::path::Path>,
) -> BenchResult {
    let start = Instant::now();
    let mut dash = Dashboard::with_seed(seed);
    if let Err(e) = dash.apply_config(scenario.config.clone()) {
        log::error!("{}: invalid scenario config: {}", scenario.name, e);
    }

    let mut streaks = StreakTracker::new();
    let mut events = EventCounter::default();
    let mut time_series = if time_series_dir.is_some() {
        Some(TimeSeriesRecorder::new())
    } else {
        None
    };

    let frames_per_sec = (1000.0 / scenario.frame_ms).round().max(1.0) as u64;
    let mut frames: u64 = 0;
    let mut bursts: u32 = 0;
    let mut last_effective_opm = 0.0_f64;

    for sec in 0..scenario.duration_secs {
        // Apply the rate curve on top of whatever the host state is
        if let Some(curve) = scenario.opm_curve {
            let config = SimulationConfig {
                orders_per_minute: curve(sec),
                ..dash.config().clone()
            };
            if let Err(e) = dash.apply_config(config) {
                log::warn!("{}: rate curve rejected at {}s: {}", scenario.name, sec, e);
            }
        }

        if let Some(event) = &scenario.mid_event {
            event(&mut dash, sec);
        }

        for _ in 0..frames_per_sec {
            let frame = dash.frame_core(scenario.frame_ms);
            frames += 1;
            if frame.fires.sim > 0 {
                last_effective_opm = frame.effective_opm;
            }
            if frame.burst > 0 {
                bursts += 1;
            }
            events.record(&dash.drain_events());
            streaks.record_frame(dash.combo(), dash.table(), scenario.frame_ms);
        }

        if let Some(ref mut ts) = time_series {
            ts.record(&dash, sec, last_effective_opm);
        }
    }

    if let (Some(ts), Some(dir)) = (&time_series, time_series_dir) {
        let path = dir.join(format!("seed-{}.jsonl", seed));
        if let Err(e) = ts.write_jsonl(&path) {
            eprintln!("  Warning: failed to write time series: {}", e);
        }
    }

    let elapsed = start.elapsed();
    let elapsed_secs = elapsed.as_secs_f64().max(0.001);

    let stats = dash.stats().clone();
    let combo = dash.combo().clone();
    let duration_ms = dash.now_ms();
    let minutes = (duration_ms as f64 / 60_000.0).max(f64::EPSILON);
    let observed_opm = stats.total_orders as f64 / minutes;
    let max_tier = dash.table().name(combo.max_tier).to_string();

    // Evaluate pass/fail
    let criteria = &scenario.criteria;
    let mut failures = Vec::new();
    if let Some((lo, hi)) = criteria.opm_range {
        if observed_opm < lo || observed_opm > hi {
            failures.push(format!("observed {:.1} opm outside [{}, {}]", observed_opm, lo, hi));
        }
    }
    if let Some(max) = criteria.max_total_orders {
        if stats.total_orders > max {
            failures.push(format!("{} orders > {}", stats.total_orders, max));
        }
    }
    if let Some(min) = criteria.min_combo_losses {
        if events.combo_losses < min {
            failures.push(format!("{} combo losses < {}", events.combo_losses, min));
        }
    }
    if let Some(max) = criteria.max_combo_losses {
        if events.combo_losses > max {
            failures.push(format!("{} combo losses > {}", events.combo_losses, max));
        }
    }
    if let Some(name) = criteria.min_max_tier {
        match dash.table().find(name) {
            Some(required) if combo.max_tier >= required => {}
            Some(_) => failures.push(format!("best tier {} below {}", max_tier, name)),
            None => failures.push(format!("unknown tier {}", name)),
        }
    }
    if let Some(min) = criteria.min_milestones {
        if events.milestones < min {
            failures.push(format!("{} milestones < {}", events.milestones, min));
        }
    }
    if let Some(min) = criteria.min_peak_opm {
        if stats.peak_opm < min {
            failures.push(format!("peak {} opm < {}", stats.peak_opm, min));
        }
    }
    if criteria.require_bursts && bursts == 0 {
        failures.push("no bursts fired".to_string());
    }
    if events.orders != stats.total_orders {
        failures.push(format!(
            "delivered {} orders but stats counted {}",
            events.orders, stats.total_orders
        ));
    }

    BenchResult {
        scenario: scenario.label.to_string(),
        name: scenario.name.to_string(),
        category: scenario.category.to_string(),
        seed,
        pass: failures.is_empty(),
        failures,
        duration_ms,
        total_orders: stats.total_orders,
        total_revenue: stats.total_revenue.to_f64().unwrap_or(0.0),
        observed_opm,
        peak_opm: stats.peak_opm,
        max_combo: combo.max_combo,
        max_tier,
        combo_losses: events.combo_losses,
        tier_changes: events.tier_changes,
        tier_ups: events.tier_ups,
        milestones: events.milestones,
        bursts,
        longest_streak_ms: streaks.longest_streak_ms.round() as u64,
        active_pct: streaks.active_pct(),
        time_in_tier: streaks.time_in_tier_ms(),
        frames,
        elapsed_ms: elapsed.as_millis(),
        frames_per_sec: frames as f64 / elapsed_secs,
    }
}

/// Run Monte Carlo: N runs of a scenario, aggregate stats.
pub fn run_monte_carlo(
    scenario: &Scenario,
    n_runs: usize,
    base_seed: u64,
    time_series_base: Option<&std::path::Path>,
) -> MonteCarloReport {
    let ts_dir = time_series_base.map(|base| base.join(scenario.name.to_lowercase()));

    let mut results = Vec::with_capacity(n_runs);
    for i in 0..n_runs {
        let seed = base_seed + i as u64;
        let result = run_single(scenario, seed, ts_dir.as_deref());
        if !result.pass {
            log::debug!("{} seed {} failed: {:?}", scenario.name, seed, result.failures);
        }
        results.push(result);
    }

    aggregate(scenario, results)
}

fn sample<F: Fn(&BenchResult) -> f64>(results: &[BenchResult], f: F) -> Stats {
    Stats::from_samples(&results.iter().map(f).collect::<Vec<_>>())
}

/// Aggregate individual runs into a MonteCarloReport.
fn aggregate(scenario: &Scenario, results: Vec<BenchResult>) -> MonteCarloReport {
    let n = results.len();
    let passed = results.iter().filter(|r| r.pass).count();
    let pass_rate = if n > 0 { passed as f64 / n as f64 } else { 0.0 };

    MonteCarloReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        category: scenario.category.to_string(),
        n_runs: n,
        pass_rate,
        observed_opm: sample(&results, |r| r.observed_opm),
        peak_opm: sample(&results, |r| r.peak_opm as f64),
        total_orders: sample(&results, |r| r.total_orders as f64),
        total_revenue: sample(&results, |r| r.total_revenue),
        max_combo: sample(&results, |r| r.max_combo as f64),
        combo_losses: sample(&results, |r| r.combo_losses as f64),
        longest_streak_ms: sample(&results, |r| r.longest_streak_ms as f64),
        active_pct: sample(&results, |r| r.active_pct),
        milestones: sample(&results, |r| r.milestones as f64),
        elapsed_ms: sample(&results, |r| r.elapsed_ms as f64),
        frames_per_sec: sample(&results, |r| r.frames_per_sec),
        individual_runs: results,
    }
}

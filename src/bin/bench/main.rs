// Combo Engine Benchmark Runner v0.2.0
// Monte Carlo (N=30), seedable ChaCha8 order streams, per-second audit trail
//
// Usage:
//   cargo run --release --bin bench                     # Run all scenarios (30 runs each)
//   cargo run --release --bin bench -- --runs 5         # Quick mode (5 runs each)
//   cargo run --release --bin bench -- FLASH_SALE       # Filter by name, label or category
//   cargo run --release --bin bench -- --time-series    # Enable JSONL output
//   cargo run --release --bin bench -- --seed 42        # Custom base seed
//   RUST_LOG=debug cargo run --release --bin bench      # Engine logging

mod report;
mod scenarios;
mod monte_carlo;
mod metrics;
mod time_series;

use report::*;
use scenarios::*;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Share of seeds a scenario must pass.
const PASS_THRESHOLD: f64 = 0.933;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    time_series: bool,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 30,
        seed: 0,
        time_series: false,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(30);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--time-series" => {
                cli.time_series = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli.runs = cli.runs.max(1);
    cli
}

fn passes(report: &MonteCarloReport) -> bool {
    report.pass_rate >= PASS_THRESHOLD
}

fn scenario_passes(reports: &[MonteCarloReport], names: &[&str]) -> bool {
    reports
        .iter()
        .filter(|r| names.contains(&r.scenario_name.as_str()))
        .all(passes)
}

fn write_report(report: &BenchReport, timestamp: &str) -> std::io::Result<PathBuf> {
    let dir = Path::new("benchmark-results");
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("bench-{}.json", timestamp));
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    std::fs::write(&path, json)?;
    Ok(path)
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = parse_args();
    let all_scenarios = scenarios();

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios.iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower)
                          || s.category.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        eprintln!("No scenarios match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    let ts_dir = if cli.time_series {
        Some(Path::new("benchmark-results/time-series").to_path_buf())
    } else {
        None
    };

    println!("\n  Combo Engine Benchmark Runner v0.2.0");
    println!("  PRNG: ChaCha8Rng | Runs/scenario: {} | Base seed: {}", cli.runs, cli.seed);
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!("  {:<40} {:>5} {:>14} {:>8} {:>7} {:>6} {:>7}",
        "Scenario", "Pass%", "OPM", "MaxCmb", "Losses", "Miles", "Time");
    println!("  {}", "-".repeat(96));

    let suite_start = Instant::now();
    let mut mc_reports = Vec::new();

    for scenario in &to_run {
        let report = monte_carlo::run_monte_carlo(
            scenario,
            cli.runs,
            cli.seed,
            ts_dir.as_deref(),
        );

        let pass_pct = report.pass_rate * 100.0;
        let status = if passes(&report) { "PASS" } else { "FAIL" };

        println!("  {:<40} {:>4}% {:>7.1}±{:<5.1} {:>8.0} {:>7.1} {:>6.1} {:>5.0}ms  {}",
            report.label,
            pass_pct as u32,
            report.observed_opm.mean, report.observed_opm.half_width(),
            report.max_combo.mean,
            report.combo_losses.mean,
            report.milestones.mean,
            report.elapsed_ms.mean,
            status,
        );

        mc_reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Engine Validation ──────────────────────────────────────────────

    let validation = EngineValidation {
        rate_convergence: scenario_passes(&mc_reports, &["STEADY_600", "NOISY_600", "SPEED_X5"]),
        zero_rate_silent: scenario_passes(&mc_reports, &["ZERO_RATE"]),
        decay_behaviour: scenario_passes(&mc_reports, &["TRICKLE_10", "BURST_ONLY", "PAUSE_RESUME"]),
        top_tier_reachable: scenario_passes(&mc_reports, &["HIGH_VELOCITY"]),
    };

    // ─── Summary ────────────────────────────────────────────────────────

    let total = mc_reports.len();
    let passed = mc_reports.iter().filter(|r| passes(r)).count();
    let failed = total - passed;

    println!("  {}", "-".repeat(96));
    println!("  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total, passed, failed, suite_elapsed.as_secs_f64());

    let verdict = |ok: bool| if ok { "PASS" } else { "FAIL" };
    println!("  Engine Validation:");
    println!("    Rate convergence:     {}", verdict(validation.rate_convergence));
    println!("    Zero rate silent:     {}", verdict(validation.zero_rate_silent));
    println!("    Decay behaviour:      {}", verdict(validation.decay_behaviour));
    println!("    Top tier reachable:   {}", verdict(validation.top_tier_reachable));
    println!("    Overall:              {}\n", verdict(validation.all_pass()));

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let timestamp = format!("{}", ts);

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: "0.2.0",
        prng: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: passed as f64 / total as f64,
        },
        engine_validation: validation,
        scenarios: mc_reports,
    };

    match write_report(&report, &timestamp) {
        Ok(path) => println!("  Results saved to: {}\n", path.display()),
        Err(e) => {
            eprintln!("  Failed to write benchmark report: {}", e);
            std::process::exit(2);
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

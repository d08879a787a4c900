// Scenario Definitions - scripted shop sessions for the bench runner
// All scenario logic lives in configs, rate curves and per-second event closures

use combo_engine::{Dashboard, SimulationConfig};

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    pub duration_secs: u64,
    /// Host frame length fed to the dashboard.
    pub frame_ms: f64,
    pub config: SimulationConfig,
    /// Orders-per-minute override, evaluated at the start of every second.
    pub opm_curve: Option<fn(u64) -> f64>,
    pub criteria: PassCriteria,
    /// Scripted host actions, called at the start of every second.
    pub mid_event: Option<Box<dyn Fn(&mut Dashboard, u64) + Send + Sync>>,
}

#[derive(Default)]
pub struct PassCriteria {
    /// Accepted band for orders per minute over the whole run.
    pub opm_range: Option<(f64, f64)>,
    pub max_total_orders: Option<u64>,
    pub min_combo_losses: Option<u32>,
    pub max_combo_losses: Option<u32>,
    /// Lowest acceptable session-best tier, by name.
    pub min_max_tier: Option<&'static str>,
    pub min_milestones: Option<u32>,
    pub min_peak_opm: Option<u32>,
    pub require_bursts: bool,
}

fn playing(opm: f64, volatility: f64, trend_range: f64) -> SimulationConfig {
    SimulationConfig {
        orders_per_minute: opm,
        speed_multiplier: 1.0,
        is_playing: true,
        burst_mode: false,
        volatility,
        trend_range,
    }
}

// ─── Rate Curves ────────────────────────────────────────────────────────────

fn ramp_up_opm(sec: u64) -> f64 {
    3_000.0 * (sec as f64 / 180.0).min(1.0)
}

fn flash_sale_opm(sec: u64) -> f64 {
    if (60..120).contains(&sec) { 3_000.0 } else { 300.0 }
}

fn lunch_wave_opm(sec: u64) -> f64 {
    let t = sec as f64;
    (400.0 + 350.0 * (t / 30.0).sin()).max(0.0)
}

// ─── Scenario Table ─────────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "STEADY_600", label: "Steady 600 OPM (no noise)", category: "rate",
            duration_secs: 60, frame_ms: 20.0,
            config: playing(600.0, 0.0, 0.0),
            opm_curve: None,
            criteria: PassCriteria {
                opm_range: Some((594.0, 606.0)),
                max_combo_losses: Some(0),
                ..Default::default()
            },
            mid_event: None,
        },
        Scenario {
            name: "NOISY_600", label: "Noisy 600 OPM (vol 0.3, trend 0.4)", category: "rate",
            duration_secs: 300, frame_ms: 25.0,
            config: playing(600.0, 0.3, 0.4),
            opm_curve: None,
            criteria: PassCriteria {
                opm_range: Some((510.0, 690.0)),
                ..Default::default()
            },
            mid_event: None,
        },
        Scenario {
            name: "SPEED_X5", label: "200 OPM x5 speed", category: "rate",
            duration_secs: 120, frame_ms: 20.0,
            config: SimulationConfig {
                speed_multiplier: 5.0,
                ..playing(200.0, 0.2, 0.2)
            },
            opm_curve: None,
            criteria: PassCriteria {
                opm_range: Some((850.0, 1_150.0)),
                ..Default::default()
            },
            mid_event: None,
        },
        Scenario {
            name: "ZERO_RATE", label: "Zero rate (silent store)", category: "edge",
            duration_secs: 30, frame_ms: 20.0,
            config: playing(0.0, 0.3, 0.4),
            opm_curve: None,
            criteria: PassCriteria {
                max_total_orders: Some(0),
                max_combo_losses: Some(0),
                ..Default::default()
            },
            mid_event: None,
        },
        Scenario {
            name: "BURST_ONLY", label: "Bursts only (0 OPM + burst mode)", category: "edge",
            duration_secs: 180, frame_ms: 20.0,
            config: SimulationConfig {
                burst_mode: true,
                ..playing(0.0, 0.3, 0.4)
            },
            opm_curve: None,
            criteria: PassCriteria {
                require_bursts: true,
                min_combo_losses: Some(1),
                ..Default::default()
            },
            mid_event: None,
        },
        Scenario {
            name: "TRICKLE_10", label: "Trickle 10 OPM (combo breaks)", category: "combo",
            duration_secs: 300, frame_ms: 20.0,
            config: playing(10.0, 0.3, 0.4),
            opm_curve: None,
            criteria: PassCriteria {
                min_combo_losses: Some(1),
                ..Default::default()
            },
            mid_event: None,
        },
        Scenario {
            name: "HIGH_VELOCITY", label: "6000 OPM sustained (top tier)", category: "combo",
            duration_secs: 120, frame_ms: 20.0,
            config: playing(6_000.0, 0.0, 0.0),
            opm_curve: None,
            criteria: PassCriteria {
                max_combo_losses: Some(0),
                min_max_tier: Some("retail_nirvana"),
                min_milestones: Some(10),
                ..Default::default()
            },
            mid_event: None,
        },
        Scenario {
            name: "RAMP_UP", label: "Ramp 0 -> 3000 OPM over 3 min", category: "combo",
            duration_secs: 240, frame_ms: 25.0,
            config: playing(0.0, 0.3, 0.4),
            opm_curve: Some(ramp_up_opm),
            criteria: PassCriteria {
                min_max_tier: Some("retail_empire"),
                ..Default::default()
            },
            mid_event: None,
        },
        Scenario {
            name: "FLASH_SALE", label: "Flash sale spike (300 -> 3000 -> 300)", category: "combo",
            duration_secs: 180, frame_ms: 20.0,
            config: playing(300.0, 0.3, 0.4),
            opm_curve: Some(flash_sale_opm),
            criteria: PassCriteria {
                min_peak_opm: Some(1_500),
                ..Default::default()
            },
            mid_event: None,
        },
        Scenario {
            name: "LUNCH_WAVE", label: "Sinusoidal demand with bursts", category: "combo",
            duration_secs: 300, frame_ms: 25.0,
            config: SimulationConfig {
                burst_mode: true,
                ..playing(400.0, 0.3, 0.4)
            },
            opm_curve: Some(lunch_wave_opm),
            criteria: PassCriteria {
                require_bursts: true,
                min_milestones: Some(3),
                ..Default::default()
            },
            mid_event: None,
        },
        Scenario {
            name: "PAUSE_RESUME", label: "Pause 30 s mid-session", category: "host",
            duration_secs: 90, frame_ms: 20.0,
            config: playing(600.0, 0.0, 0.0),
            opm_curve: None,
            criteria: PassCriteria {
                opm_range: Some((380.0, 420.0)),
                min_combo_losses: Some(1),
                ..Default::default()
            },
            mid_event: Some(Box::new(|dash: &mut Dashboard, sec: u64| {
                if sec == 30 {
                    dash.set_playing(false);
                } else if sec == 60 {
                    dash.set_playing(true);
                }
            })),
        },
    ]
}

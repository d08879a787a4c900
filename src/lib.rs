// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Combo Engine ("Order Rush")

pub mod types;
pub mod tiers;
pub mod config;
pub mod error;
pub mod combo;
pub mod orders;
pub mod simulator;
pub mod stats;
pub mod milestones;
pub mod scheduler;
pub mod dashboard;

pub use types::*;
pub use tiers::{TierDef, TierId, TierTable, TierTableError};
pub use config::{ConfigError, EngineSettings, SimulationConfig};
pub use error::EngineError;
pub use combo::ComboTracker;
pub use simulator::OrderSimulator;
pub use dashboard::{Dashboard, FrameReport};

use wasm_bindgen::prelude::*;

fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
    }
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl Dashboard {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> Self {
        init_logging();
        log::info!("dashboard created (seed {})", seed);
        Dashboard::with_seed(seed as u64)
    }

    /// Advance by one animation frame. Returns the number of orders delivered.
    pub fn frame(&mut self, elapsed_ms: f64) -> u32 {
        self.frame_core(elapsed_ms).delivered as u32
    }

    pub fn set_config(&mut self, value: JsValue) -> Result<(), JsValue> {
        let config: SimulationConfig =
            serde_wasm_bindgen::from_value(value).map_err(to_js_error)?;
        self.apply_config(config).map_err(to_js_error)
    }

    pub fn config_json(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.config).unwrap_or(JsValue::NULL)
    }

    pub fn play(&mut self) {
        self.set_playing(true);
    }

    pub fn pause(&mut self) {
        self.set_playing(false);
    }

    pub fn toggle_play(&mut self) -> bool {
        let playing = !self.config.is_playing;
        self.set_playing(playing);
        playing
    }

    pub fn is_playing(&self) -> bool {
        self.config.is_playing
    }

    pub fn combo_json(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.combo()).unwrap_or(JsValue::NULL)
    }

    pub fn decay_fraction(&self) -> f64 {
        self.combo().decay_fraction()
    }

    pub fn stats_json(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.stats()).unwrap_or(JsValue::NULL)
    }

    /// The active tier table, highest threshold first.
    pub fn tiers_json(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.table()).unwrap_or(JsValue::NULL)
    }

    pub fn tier_json(&self, tier: u8) -> JsValue {
        serde_wasm_bindgen::to_value(self.table().get(TierId(tier))).unwrap_or(JsValue::NULL)
    }

    pub fn chart(&mut self) -> Vec<u32> {
        self.chart_core()
    }

    pub fn drain_events_json(&mut self) -> JsValue {
        let events = self.drain_events();
        serde_wasm_bindgen::to_value(&events).unwrap_or(JsValue::NULL)
    }

    /// Pause and clear all session state.
    pub fn reset(&mut self) {
        self.reset_core();
    }
}

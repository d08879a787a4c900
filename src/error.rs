// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Combo Engine - Errors

use crate::config::ConfigError;
use crate::tiers::TierTableError;

/// Errors surfaced at the host boundary. Core state transitions never fail.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid tier table: {0}")]
    TierTable(#[from] TierTableError),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Combo Engine - Type Definitions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::tiers::TierId;

// ─── Order Category ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrderCategory {
    Shoes = 0,
    Shirts = 1,
    Pants = 2,
    Dresses = 3,
    Jackets = 4,
    Accessories = 5,
    Sportswear = 6,
    Bags = 7,
}

impl OrderCategory {
    pub const ALL: [OrderCategory; 8] = [
        Self::Shoes,
        Self::Shirts,
        Self::Pants,
        Self::Dresses,
        Self::Jackets,
        Self::Accessories,
        Self::Sportswear,
        Self::Bags,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Shoes => "Shoes",
            Self::Shirts => "Shirts",
            Self::Pants => "Pants",
            Self::Dresses => "Dresses",
            Self::Jackets => "Jackets",
            Self::Accessories => "Accessories",
            Self::Sportswear => "Sportswear",
            Self::Bags => "Bags",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

// ─── Order ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category: OrderCategory,
    /// Milliseconds on the session clock.
    pub timestamp: u64,
    pub customer_name: String,
    pub product_name: String,
}

// ─── ComboState ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboState {
    pub count: u32,
    pub tier: TierId,
    pub last_order_time: u64,
    pub decay_remaining: f64,
    pub max_decay: f64,
    pub is_active: bool,
    pub max_combo: u32,
    pub max_tier: TierId,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            count: 0,
            tier: TierId::NONE,
            last_order_time: 0,
            decay_remaining: 0.0,
            max_decay: crate::combo::BASE_COMBO_DECAY_MS,
            is_active: false,
            max_combo: 0,
            max_tier: TierId::NONE,
        }
    }
}

impl ComboState {
    /// Share of the decay window still left, in [0, 1]. Drives the decay bar.
    pub fn decay_fraction(&self) -> f64 {
        if self.max_decay > 0.0 {
            (self.decay_remaining / self.max_decay).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

// ─── Combo Events ────────────────────────────────────────────────────────────

/// Notifications raised by the combo tracker, observed after the state
/// mutation that caused them has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ComboEvent {
    TierChanged { from: TierId, to: TierId },
    ComboLost { count: u32 },
}

// ─── DashboardStats ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_orders: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub current_opm: u32,
    pub peak_opm: u32,
    /// Session clock time of the first delivered batch, None before that.
    pub session_start: Option<u64>,
}

// ─── Milestones ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneKind {
    Orders,
    Revenue,
    Velocity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub kind: MilestoneKind,
    pub label: String,
    pub value: u64,
    pub timestamp: u64,
}

// ─── Dashboard Events ────────────────────────────────────────────────────────

/// Everything a rendering collaborator reacts to, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DashboardEvent {
    Orders { orders: Vec<Order> },
    TierChanged { from: TierId, to: TierId },
    /// Raised alongside `TierChanged` when the new tier is higher.
    TierUp { tier: TierId, name: String, label: String, combo: u32 },
    ComboLost { count: u32 },
    Milestone { milestone: Milestone },
}

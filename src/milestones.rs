// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Combo Engine - Milestones

use std::collections::HashSet;

use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use crate::types::{Milestone, MilestoneKind};

pub const ORDER_MILESTONES: [u64; 10] = [50, 100, 250, 500, 1_000, 2_500, 5_000, 10_000, 25_000, 50_000];
pub const REVENUE_MILESTONES: [u64; 9] = [
    1_000, 5_000, 10_000, 25_000, 50_000, 100_000, 250_000, 500_000, 1_000_000,
];
pub const VELOCITY_MILESTONES: [u64; 5] = [100, 500, 1_000, 5_000, 10_000];

/// First threshold strictly above `current`, for progress displays.
pub fn next_milestone(current: u64, thresholds: &[u64]) -> Option<u64> {
    thresholds.iter().copied().find(|&m| m > current)
}

/// Tracks which milestones were already announced this session.
///
/// A check announces at most one milestone, scanning orders, then revenue,
/// then velocity; anything else already reached is picked up by later checks.
#[derive(Debug, Clone, Default)]
pub struct MilestoneTracker {
    hit: HashSet<(MilestoneKind, u64)>,
    next_id: u64,
}

impl MilestoneTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_hit(&self, kind: MilestoneKind, value: u64) -> bool {
        self.hit.contains(&(kind, value))
    }

    pub fn check(
        &mut self,
        total_orders: u64,
        total_revenue: Decimal,
        current_opm: u32,
        now_ms: u64,
    ) -> Option<Milestone> {
        let revenue = total_revenue.floor().to_u64().unwrap_or(0);
        let scans: [(MilestoneKind, &[u64], u64); 3] = [
            (MilestoneKind::Orders, &ORDER_MILESTONES, total_orders),
            (MilestoneKind::Revenue, &REVENUE_MILESTONES, revenue),
            (MilestoneKind::Velocity, &VELOCITY_MILESTONES, current_opm as u64),
        ];

        for (kind, thresholds, current) in scans {
            for &value in thresholds {
                if current >= value && self.hit.insert((kind, value)) {
                    self.next_id += 1;
                    let milestone = Milestone {
                        id: format!("ms-{}", self.next_id),
                        kind,
                        label: label(kind, value),
                        value,
                        timestamp: now_ms,
                    };
                    log::info!("milestone reached: {}", milestone.label);
                    return Some(milestone);
                }
            }
        }
        None
    }

    /// Forget announced milestones. Ids keep counting so overlays can tell
    /// repeated announcements apart.
    pub fn reset(&mut self) {
        self.hit.clear();
    }
}

fn label(kind: MilestoneKind, value: u64) -> String {
    match kind {
        MilestoneKind::Orders => format!("{} ORDERS", group_thousands(value)),
        MilestoneKind::Velocity => format!("{} OPM", group_thousands(value)),
        MilestoneKind::Revenue => {
            if value >= 1_000_000 {
                format!("${}M REVENUE", value / 1_000_000)
            } else if value >= 1_000 {
                format!("${}K REVENUE", value / 1_000)
            } else {
                format!("${} REVENUE", value)
            }
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Combo Engine - Order Statistics

//! Session totals and order velocity.
//!
//! Velocity is measured from a rolling window of per-second buckets: a new
//! bucket opens every stats tick, delivered batches land in the newest one,
//! and `current_opm` is the sum of the trailing minute. The velocity chart
//! keeps a separate map keyed by session second so it can render gaps.

use std::collections::{BTreeMap, VecDeque};

use rust_decimal::Decimal;

use crate::types::{DashboardStats, Order};

const MAX_SECOND_BUCKETS: usize = 120;
const OPM_WINDOW_SECS: usize = 60;
/// Extra history kept behind the chart window before pruning.
const CHART_RETENTION_SLACK_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct StatsAggregator {
    stats: DashboardStats,
    second_buckets: VecDeque<u32>,
    chart: BTreeMap<u64, u32>,
    chart_window_secs: u64,
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new(120)
    }
}

impl StatsAggregator {
    pub fn new(chart_window_secs: u64) -> Self {
        Self {
            stats: DashboardStats::default(),
            second_buckets: VecDeque::with_capacity(MAX_SECOND_BUCKETS + 1),
            chart: BTreeMap::new(),
            chart_window_secs: chart_window_secs.max(1),
        }
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    pub fn current_opm(&self) -> u32 {
        self.stats.current_opm
    }

    /// Fold one delivered batch into the totals. Returns the batch revenue.
    pub fn record_batch(&mut self, orders: &[Order], now_ms: u64) -> Decimal {
        if orders.is_empty() {
            return Decimal::ZERO;
        }
        let count = orders.len() as u32;
        let revenue: Decimal = orders.iter().map(|o| o.amount).sum();

        self.stats.total_orders += orders.len() as u64;
        self.stats.total_revenue += revenue;
        if self.stats.session_start.is_none() {
            self.stats.session_start = Some(now_ms);
        }

        match self.second_buckets.back_mut() {
            Some(last) => *last += count,
            None => self.second_buckets.push_back(count),
        }
        *self.chart.entry(now_ms / 1000).or_insert(0) += count;

        revenue
    }

    /// Close the current second: recompute velocity and open a new bucket.
    pub fn roll_second(&mut self) {
        let opm: u32 = self
            .second_buckets
            .iter()
            .rev()
            .take(OPM_WINDOW_SECS)
            .sum();
        self.stats.current_opm = opm;
        self.stats.peak_opm = self.stats.peak_opm.max(opm);

        self.second_buckets.push_back(0);
        while self.second_buckets.len() > MAX_SECOND_BUCKETS {
            self.second_buckets.pop_front();
        }
    }

    /// Orders per session second for the chart window ending at `now_ms`,
    /// oldest first. Prunes entries that fell out of retention.
    pub fn chart_buckets(&mut self, now_ms: u64) -> Vec<u32> {
        let now = now_ms / 1000;
        let window = self.chart_window_secs;
        let cutoff = now.saturating_sub(window + CHART_RETENTION_SLACK_SECS);
        self.chart = self.chart.split_off(&cutoff);

        (0..window)
            .map(|i| {
                let offset = window - 1 - i;
                if offset > now {
                    0
                } else {
                    self.chart.get(&(now - offset)).copied().unwrap_or(0)
                }
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.stats = DashboardStats::default();
        self.second_buckets.clear();
        self.chart.clear();
    }
}

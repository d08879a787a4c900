// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Combo Engine - Tier Table

//! Combo tier thresholds.
//!
//! A [`TierTable`] is an ordered list of tier definitions sorted by
//! descending `min_combo`, terminated by a sentinel tier with threshold zero.
//! Lookup scans from the highest threshold down and returns the first tier
//! the combo count reaches, so every count resolves to some tier.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised when a tier table is constructed from invalid definitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TierTableError {
    #[error("tier table is empty")]
    Empty,

    #[error("last tier `{0}` must have min_combo = 0")]
    MissingSentinel(String),

    #[error("tier `{name}` threshold {min_combo} is not below the previous threshold {previous}")]
    NotDescending {
        name: String,
        min_combo: u32,
        previous: u32,
    },

    #[error("duplicate tier name `{0}`")]
    DuplicateName(String),

    #[error("tier table has {0} tiers, at most 256 are addressable")]
    TooManyTiers(usize),
}

// ---------------------------------------------------------------------------
// TierId
// ---------------------------------------------------------------------------

/// Rank of a tier ordered by ascending threshold. The sentinel is rank 0, so
/// a larger id always means a higher tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierId(pub u8);

impl TierId {
    pub const NONE: TierId = TierId(0);

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

// ---------------------------------------------------------------------------
// TierDef
// ---------------------------------------------------------------------------

/// One row of the tier table. Only `min_combo` drives the state machine; the
/// rest is presentation metadata handed through to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierDef {
    pub name: String,
    pub label: String,
    pub min_combo: u32,
    pub color: String,
    #[serde(default)]
    pub particle_intensity: f64,
    #[serde(default = "default_replenish")]
    pub replenish_multiplier: f64,
    #[serde(default)]
    pub description: String,
}

fn default_replenish() -> f64 {
    1.0
}

// name, label, min_combo, color, particle_intensity, replenish_multiplier, description
type TierRow = (&'static str, &'static str, u32, &'static str, f64, f64, &'static str);

const SHOPPING_TIERS: [TierRow; 20] = [
    ("retail_nirvana", "RETAIL NIRVANA", 10_000, "#ffffff", 1.0, 30.0,
        "Retail nirvana. The ultimate state of commercial transcendence."),
    ("commerce_god", "COMMERCE GOD", 5_000, "#f59e0b", 0.98, 25.0,
        "The god of commerce. Every purchase in existence flows through you."),
    ("retail_singularity", "RETAIL SINGULARITY", 3_000, "#ec4899", 0.97, 20.0,
        "A retail singularity. Commerce itself bends to your will."),
    ("global_takeover", "GLOBAL TAKEOVER", 2_000, "#f472b6", 0.95, 15.0,
        "Global retail takeover. Every market on the planet is yours."),
    ("market_domination", "MARKET DOMINATION", 1_500, "#fb7185", 0.92, 12.0,
        "Total market domination. Competitors can only watch in awe."),
    ("retail_empire", "RETAIL EMPIRE", 1_000, "#e11d48", 0.9, 10.0,
        "You have built a retail empire. Every transaction is gold."),
    ("mega_sale", "MEGA SALE", 750, "#f43f5e", 0.85, 8.0,
        "The mega sale of the century. Revenue numbers are staggering."),
    ("doorbuster", "DOORBUSTER", 500, "#dc2626", 0.8, 7.0,
        "Doorbuster deals have been unleashed. Pure retail pandemonium!"),
    ("black_friday", "BLACK FRIDAY", 350, "#ef4444", 0.75, 6.0,
        "Black Friday levels of chaos! Record-shattering demand!"),
    ("sold_out", "SOLD OUT", 250, "#f97316", 0.7, 5.0,
        "Items selling out instantly! Restock can barely keep up!"),
    ("flash_sale", "FLASH SALE", 170, "#fbbf24", 0.6, 4.0,
        "Flash sale energy! Products flying off the shelves!"),
    ("retail_rush", "RETAIL RUSH", 120, "#f59e0b", 0.55, 3.5,
        "A pure retail rush. The floor is packed, every aisle buzzing!"),
    ("vip_shopper", "VIP SHOPPERS", 85, "#fb923c", 0.5, 3.0,
        "VIP customers are going all in. Premium purchases rolling in!"),
    ("shopping_spree", "SHOPPING SPREE", 60, "#a78bfa", 0.4, 2.5,
        "Full-blown shopping spree! Bags upon bags at every register."),
    ("impulse_buyer", "IMPULSE BUYERS", 40, "#818cf8", 0.3, 2.0,
        "Impulse purchases everywhere! No one can resist these deals."),
    ("checkout_ready", "CHECKOUT READY", 25, "#38bdf8", 0.2, 1.8,
        "The checkout lines are forming. Registers are warming up!"),
    ("adding_to_cart", "ADDING TO CART", 15, "#22d3ee", 0.15, 1.5,
        "Carts are filling up across the floor. Conversion is climbing!"),
    ("window_shopping", "WINDOW SHOPPING", 8, "#2dd4bf", 0.1, 1.2,
        "Window shoppers are turning into buyers. Keep the displays fresh!"),
    ("browsing", "BROWSING", 3, "#4ade80", 0.05, 1.0,
        "Customers are starting to browse. The store is waking up."),
    ("none", "", 0, "#64748b", 0.0, 1.0,
        "No sales streak active. Start selling to build momentum!"),
];

// ---------------------------------------------------------------------------
// TierTable
// ---------------------------------------------------------------------------

/// Validated tier table, stored highest threshold first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TierTable {
    tiers: Vec<TierDef>,
}

impl Default for TierTable {
    fn default() -> Self {
        Self::shopping()
    }
}

impl TierTable {
    /// Built-in 20-tier retail table.
    pub fn shopping() -> Self {
        let tiers = SHOPPING_TIERS
            .iter()
            .map(|&(name, label, min_combo, color, particle_intensity, replenish_multiplier, description)| {
                TierDef {
                    name: name.to_string(),
                    label: label.to_string(),
                    min_combo,
                    color: color.to_string(),
                    particle_intensity,
                    replenish_multiplier,
                    description: description.to_string(),
                }
            })
            .collect();
        Self { tiers }
    }

    /// Build a table from caller-supplied definitions, highest threshold first.
    pub fn from_defs(tiers: Vec<TierDef>) -> Result<Self, TierTableError> {
        let last = tiers.last().ok_or(TierTableError::Empty)?;
        if last.min_combo != 0 {
            return Err(TierTableError::MissingSentinel(last.name.clone()));
        }
        if tiers.len() > u8::MAX as usize + 1 {
            return Err(TierTableError::TooManyTiers(tiers.len()));
        }
        for pair in tiers.windows(2) {
            if pair[1].min_combo >= pair[0].min_combo {
                return Err(TierTableError::NotDescending {
                    name: pair[1].name.clone(),
                    min_combo: pair[1].min_combo,
                    previous: pair[0].min_combo,
                });
            }
        }
        for (i, tier) in tiers.iter().enumerate() {
            if tiers[..i].iter().any(|t| t.name == tier.name) {
                return Err(TierTableError::DuplicateName(tier.name.clone()));
            }
        }
        Ok(Self { tiers })
    }

    /// Parse a JSON array of tier definitions and validate it.
    pub fn from_json(json: &str) -> Result<Self, crate::EngineError> {
        let defs: Vec<TierDef> = serde_json::from_str(json)?;
        Ok(Self::from_defs(defs)?)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Highest tier whose threshold `count` meets or exceeds.
    pub fn lookup(&self, count: u32) -> TierId {
        for (pos, tier) in self.tiers.iter().enumerate() {
            if count >= tier.min_combo {
                return self.id_at(pos);
            }
        }
        TierId::NONE
    }

    /// Definition for a tier id. Ids outside the table resolve to the sentinel.
    pub fn get(&self, id: TierId) -> &TierDef {
        let idx = id.0 as usize;
        if idx < self.tiers.len() {
            &self.tiers[self.tiers.len() - 1 - idx]
        } else {
            &self.tiers[self.tiers.len() - 1]
        }
    }

    pub fn name(&self, id: TierId) -> &str {
        &self.get(id).name
    }

    pub fn find(&self, name: &str) -> Option<TierId> {
        self.tiers
            .iter()
            .position(|t| t.name == name)
            .map(|pos| self.id_at(pos))
    }

    /// Highest tier in the table.
    pub fn top(&self) -> TierId {
        self.id_at(0)
    }

    /// Iterate tiers from the highest threshold down.
    pub fn iter(&self) -> impl Iterator<Item = (TierId, &TierDef)> {
        self.tiers.iter().enumerate().map(|(pos, t)| (self.id_at(pos), t))
    }

    fn id_at(&self, pos: usize) -> TierId {
        TierId((self.tiers.len() - 1 - pos) as u8)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn def(name: &str, min_combo: u32) -> TierDef {
        TierDef {
            name: name.to_string(),
            label: name.to_uppercase(),
            min_combo,
            color: "#000000".to_string(),
            particle_intensity: 0.0,
            replenish_multiplier: 1.0,
            description: String::new(),
        }
    }

    #[test]
    fn test_shopping_table_is_valid() {
        let table = TierTable::shopping();
        assert_eq!(table.len(), 20);
        let rebuilt = TierTable::from_defs(table.tiers.clone()).unwrap();
        assert_eq!(rebuilt, table);
    }

    #[test]
    fn test_lookup_thresholds() {
        let table = TierTable::shopping();
        assert_eq!(table.name(table.lookup(0)), "none");
        assert_eq!(table.name(table.lookup(2)), "none");
        assert_eq!(table.name(table.lookup(3)), "browsing");
        assert_eq!(table.name(table.lookup(7)), "browsing");
        assert_eq!(table.name(table.lookup(8)), "window_shopping");
        assert_eq!(table.name(table.lookup(9_999)), "commerce_god");
        assert_eq!(table.name(table.lookup(10_000)), "retail_nirvana");
        assert_eq!(table.lookup(u32::MAX), table.top());
    }

    #[test]
    fn test_tier_ids_rank_ascending() {
        let table = TierTable::shopping();
        assert_eq!(table.find("none"), Some(TierId::NONE));
        assert_eq!(table.find("browsing"), Some(TierId(1)));
        assert_eq!(table.find("retail_nirvana"), Some(TierId(19)));
        assert_eq!(table.find("missing"), None);
        assert_eq!(table.get(TierId(200)).name, "none");
    }

    #[test]
    fn test_lookup_is_monotonic() {
        let table = TierTable::shopping();
        let mut prev = table.lookup(0);
        for count in 1..12_000 {
            let tier = table.lookup(count);
            assert!(tier >= prev, "tier dropped at count {}", count);
            prev = tier;
        }
    }

    #[test]
    fn test_iter_runs_highest_first() {
        let table = TierTable::shopping();
        let thresholds: Vec<u32> = table.iter().map(|(_, t)| t.min_combo).collect();
        assert_eq!(thresholds.first(), Some(&10_000));
        assert_eq!(thresholds.last(), Some(&0));
    }

    #[test]
    fn test_rejects_empty_table() {
        assert_eq!(TierTable::from_defs(Vec::new()), Err(TierTableError::Empty));
    }

    #[test]
    fn test_rejects_missing_sentinel() {
        let err = TierTable::from_defs(vec![def("gold", 10), def("silver", 5)]).unwrap_err();
        assert_eq!(err, TierTableError::MissingSentinel("silver".to_string()));
    }

    #[test]
    fn test_rejects_unsorted_thresholds() {
        let err = TierTable::from_defs(vec![def("silver", 5), def("gold", 5), def("none", 0)])
            .unwrap_err();
        assert!(matches!(err, TierTableError::NotDescending { min_combo: 5, previous: 5, .. }));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = TierTable::from_defs(vec![def("a", 9), def("a", 4), def("none", 0)]).unwrap_err();
        assert_eq!(err, TierTableError::DuplicateName("a".to_string()));
    }

    #[test]
    fn test_custom_table_from_json() {
        let json = r##"[
            {"name": "hot", "label": "HOT", "minCombo": 10, "color": "#f00"},
            {"name": "warm", "label": "WARM", "minCombo": 2, "color": "#fa0"},
            {"name": "none", "label": "", "minCombo": 0, "color": "#888"}
        ]"##;
        let table = TierTable::from_json(json).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.name(table.lookup(1)), "none");
        assert_eq!(table.name(table.lookup(2)), "warm");
        assert_eq!(table.name(table.lookup(50)), "hot");
        assert_eq!(table.get(table.lookup(50)).replenish_multiplier, 1.0);
    }
}

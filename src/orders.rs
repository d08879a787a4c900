// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Combo Engine - Order Factory

use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::types::{Order, OrderCategory};

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// Category weights, indexed like `OrderCategory::ALL`.
pub const CATEGORY_WEIGHTS: [f64; 8] = [0.18, 0.20, 0.14, 0.12, 0.10, 0.10, 0.08, 0.08];

/// Regular price band (dollars).
const BASE_PRICE_RANGE: (f64, f64) = (15.0, 100.0);
/// Redraw band for high-value orders.
const HIGH_VALUE_PRICE_RANGE: (f64, f64) = (200.0, 500.0);
pub const HIGH_VALUE_PROBABILITY: f64 = 0.08;

pub fn products(category: OrderCategory) -> &'static [&'static str] {
    match category {
        OrderCategory::Shoes => &[
            "Running Shoes", "Sneakers", "Boots", "Sandals", "Heels", "Loafers", "Slip-ons",
            "High Tops",
        ],
        OrderCategory::Shirts => &[
            "Polo Shirt", "T-Shirt", "Button Down", "Henley", "Flannel", "Blouse", "Tank Top",
            "Crop Top",
        ],
        OrderCategory::Pants => &[
            "Jeans", "Chinos", "Joggers", "Cargo Pants", "Trousers", "Shorts", "Leggings",
            "Sweatpants",
        ],
        OrderCategory::Dresses => &[
            "Maxi Dress", "Cocktail Dress", "Sundress", "Wrap Dress", "Midi Dress", "Mini Dress",
            "A-Line Dress",
        ],
        OrderCategory::Jackets => &[
            "Bomber Jacket", "Denim Jacket", "Puffer Coat", "Blazer", "Windbreaker",
            "Leather Jacket", "Parka",
        ],
        OrderCategory::Accessories => &[
            "Watch", "Sunglasses", "Belt", "Scarf", "Hat", "Necklace", "Bracelet", "Ring",
        ],
        OrderCategory::Sportswear => &[
            "Yoga Pants", "Sports Bra", "Athletic Shorts", "Compression Shirt", "Track Suit",
            "Swim Trunks",
        ],
        OrderCategory::Bags => &[
            "Tote Bag", "Backpack", "Clutch", "Crossbody Bag", "Messenger Bag", "Duffle Bag",
            "Wallet",
        ],
    }
}

pub const FIRST_NAMES: [&str; 24] = [
    "Alex", "Sam", "Jordan", "Taylor", "Morgan", "Casey", "Riley", "Quinn", "Avery", "Blake",
    "Cameron", "Dakota", "Emery", "Finley", "Harper", "Jamie", "Kai", "Logan", "Marlo", "Nico",
    "Parker", "Reese", "Sage", "Tatum",
];

pub const LAST_NAMES: [&str; 24] = [
    "Chen", "Smith", "Park", "Garcia", "Kim", "Patel", "Jones", "Williams", "Brown", "Davis",
    "Miller", "Wilson", "Moore", "Taylor", "Anderson", "Thomas", "Jackson", "White", "Harris",
    "Martin", "Thompson", "Robinson", "Clark", "Lewis",
];

// ─── OrderFactory ────────────────────────────────────────────────────────────

/// Builds synthetic orders. Ids come from a counter owned by the factory, so
/// two dashboards never share a sequence.
#[derive(Debug, Clone, Default)]
pub struct OrderFactory {
    next_id: u64,
}

impl OrderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of orders built so far.
    pub fn issued(&self) -> u64 {
        self.next_id
    }

    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R, now_ms: u64) -> Order {
        let category = OrderCategory::ALL[weighted_index(rng, &CATEGORY_WEIGHTS)];
        let catalog = products(category);
        let product_name = catalog[rng.gen_range(0..catalog.len())].to_string();

        let base_price = rng.gen_range(BASE_PRICE_RANGE.0..BASE_PRICE_RANGE.1);
        let amount = if rng.gen::<f64>() < HIGH_VALUE_PROBABILITY {
            rng.gen_range(HIGH_VALUE_PRICE_RANGE.0..HIGH_VALUE_PRICE_RANGE.1)
        } else {
            base_price
        };

        let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];

        self.next_id += 1;
        Order {
            id: format!("order-{}", self.next_id),
            amount: to_cents(amount),
            category,
            timestamp: now_ms,
            customer_name: format!("{} {}", first, last),
            product_name,
        }
    }

    pub fn generate_batch<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        count: usize,
        now_ms: u64,
        out: &mut Vec<Order>,
    ) {
        out.reserve(count);
        for _ in 0..count {
            out.push(self.generate(rng, now_ms));
        }
    }

    pub fn reset(&mut self) {
        self.next_id = 0;
    }
}

/// Weighted choice by subtracting weights from a uniform draw over their sum.
pub fn weighted_index<R: Rng + ?Sized>(rng: &mut R, weights: &[f64]) -> usize {
    let total: f64 = weights.iter().sum();
    let mut r = rng.gen::<f64>() * total;
    for (i, &w) in weights.iter().enumerate() {
        r -= w;
        if r <= 0.0 {
            return i;
        }
    }
    weights.len().saturating_sub(1)
}

fn to_cents(amount: f64) -> Decimal {
    Decimal::from_f64(amount)
        .map(|d| d.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

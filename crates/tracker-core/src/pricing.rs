//! Item price resolution.
//!
//! Prices resolve in a fixed order: coin denominations are hard
//! constants, then custom per-item overrides, then the static item
//! database, and finally zero. There is no error path; an unknown item
//! is worthless, not invalid.

use std::collections::BTreeMap;

use crate::database::ItemDb;

// ── Coin denominations ────────────────────────────────────────────────────────

const GOLD_COIN_VALUE: u64 = 1;
const PLATINUM_COIN_VALUE: u64 = 100;
const CRYSTAL_COIN_VALUE: u64 = 10_000;

/// Resolves item prices from coin tiers, custom overrides and the
/// static database, in that priority order.
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    /// User-supplied overrides, keyed by lower-cased item name.
    custom: BTreeMap<String, u64>,
    items: ItemDb,
}

impl PriceBook {
    pub fn new(items: ItemDb) -> Self {
        Self {
            custom: BTreeMap::new(),
            items,
        }
    }

    /// Price of one unit of `name` (already lower-cased).
    pub fn price_of(&self, name: &str) -> u64 {
        match name {
            "gold coin" => GOLD_COIN_VALUE,
            "platinum coin" => PLATINUM_COIN_VALUE,
            "crystal coin" => CRYSTAL_COIN_VALUE,
            _ => match self.custom.get(name) {
                Some(price) => *price,
                None => self.items.price(name),
            },
        }
    }

    /// Set or replace a custom price override.
    pub fn set_custom(&mut self, name: &str, price: u64) {
        self.custom.insert(name.trim().to_lowercase(), price);
    }

    /// Remove a custom override, falling back to the static database.
    pub fn remove_custom(&mut self, name: &str) {
        self.custom.remove(&name.trim().to_lowercase());
    }

    /// Current overrides, sorted by item name.
    pub fn custom_prices(&self) -> impl Iterator<Item = (&str, u64)> {
        self.custom.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

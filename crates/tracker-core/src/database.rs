//! Static item and creature database.
//!
//! Loaded once at startup from a `db.json` file of the shape
//! `{"items": [{"name", "price"}], "creatures": [{"name", "exp"}]}`.
//! A missing or malformed file degrades to empty lookups with a warning;
//! unknown names are worthless, not invalid.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct ItemRecord {
    name: String,
    #[serde(default)]
    price: u64,
}

#[derive(Debug, Deserialize)]
struct CreatureRecord {
    name: String,
    #[serde(default)]
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct DatabaseFile {
    #[serde(default)]
    items: Vec<ItemRecord>,
    #[serde(default)]
    creatures: Vec<CreatureRecord>,
}

/// Read-only item price lookup keyed by lower-cased name.
#[derive(Debug, Clone, Default)]
pub struct ItemDb {
    prices: HashMap<String, u64>,
}

impl ItemDb {
    /// Price of `name`, or 0 when unknown.
    pub fn price(&self, name: &str) -> u64 {
        self.prices.get(name).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Read-only creature experience lookup keyed by lower-cased name.
#[derive(Debug, Clone, Default)]
pub struct CreatureDb {
    experience: HashMap<String, u64>,
}

impl CreatureDb {
    /// Experience yield of `name` (already lower-cased), or 0 when unknown.
    pub fn experience(&self, name: &str) -> u64 {
        self.experience.get(name).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.experience.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experience.is_empty()
    }
}

/// Load the static database from `path`.
///
/// Any failure (missing file, bad JSON) is logged and yields empty
/// databases; the tracker still works, everything is just worth zero.
pub fn load_database(path: &Path) -> (ItemDb, CreatureDb) {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            warn!("could not read database {}: {}", path.display(), e);
            return (ItemDb::default(), CreatureDb::default());
        }
    };

    let parsed: DatabaseFile = match serde_json::from_str(&text) {
        Ok(p) => p,
        Err(e) => {
            warn!("could not parse database {}: {}", path.display(), e);
            return (ItemDb::default(), CreatureDb::default());
        }
    };

    let prices = parsed
        .items
        .into_iter()
        .map(|r| (r.name.to_lowercase(), r.price))
        .collect::<HashMap<_, _>>();
    let experience = parsed
        .creatures
        .into_iter()
        .map(|r| (r.name.to_lowercase(), r.exp))
        .collect::<HashMap<_, _>>();

    info!(
        "loaded database with {} items and {} creatures",
        prices.len(),
        experience.len()
    );

    (ItemDb { prices }, CreatureDb { experience })
}

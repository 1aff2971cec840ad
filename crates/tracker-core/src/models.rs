use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single normalized item token from a loot list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootItem {
    /// Canonical item name: lower-cased, article-stripped, singularized.
    pub name: String,
    /// Observed quantity for this drop instance (always >= 1).
    pub quantity: u64,
}

impl LootItem {
    pub fn new(name: impl Into<String>, quantity: u64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// The classified shape of one raw log line.
///
/// Produced by a single classification pass with fixed precedence:
/// section marker, kill+loot, bag contents, event points, unrecognized.
#[derive(Debug, Clone, PartialEq)]
pub enum LineEvent {
    /// `Channel saved at <weekday> <month> <day> <HH:MM:SS> <year>`.
    ///
    /// Carries the absolute anchor date for subsequent `HH:MM` lines.
    SectionMarker(NaiveDateTime),
    /// `Loot of <monster>: <items>` — one kill plus its loot list.
    KillLoot {
        /// Lower-cased monster name, exactly as it appears after `Loot of`.
        monster: String,
        /// Raw comma-separated items text, not yet normalized.
        items: String,
    },
    /// `Content of a bag within the corpse of <monster>: <items>` —
    /// loot attributed to the monster without counting a kill.
    BagContents { monster: String, items: String },
    /// `Looted N <word> point(s)` — synthetic item `"<word> point"`.
    EventPoints { kind: String, quantity: u64 },
    /// Anything else. Produces no state change.
    Unrecognized,
}

/// Min/max/mean over the stored quantity sequence of one (monster, item)
/// pair, plus the number of drop instances observed.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityStats {
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    /// Number of drop instances (corpses/bags that contained the item).
    pub instances: usize,
}

impl QuantityStats {
    /// Display form of the quantity range: `"2-5"`, collapsing to a single
    /// value when min == max.
    pub fn range_display(&self) -> String {
        if self.min == self.max {
            self.min.to_string()
        } else {
            format!("{}-{}", self.min, self.max)
        }
    }
}

/// Session-wide gold and experience totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum over loot counts of `count * price_of(item)`.
    pub gold: u64,
    /// Sum over kill counts of `kills * exp_of(monster)`.
    pub experience: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_stats_range_collapses_when_equal() {
        let stats = QuantityStats {
            min: 3,
            max: 3,
            mean: 3.0,
            instances: 4,
        };
        assert_eq!(stats.range_display(), "3");
    }

    #[test]
    fn test_quantity_stats_range_spread() {
        let stats = QuantityStats {
            min: 1,
            max: 12,
            mean: 4.5,
            instances: 8,
        };
        assert_eq!(stats.range_display(), "1-12");
    }

    #[test]
    fn test_totals_default_is_zero() {
        let totals = Totals::default();
        assert_eq!(totals.gold, 0);
        assert_eq!(totals.experience, 0);
    }

    #[test]
    fn test_loot_item_new() {
        let item = LootItem::new("worm", 3);
        assert_eq!(item.name, "worm");
        assert_eq!(item.quantity, 3);
    }
}

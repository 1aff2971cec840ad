//! Derived statistics over the aggregation store.
//!
//! Stateless functions; every query on an empty store returns a
//! well-defined zero or `None`, never an error.

use tracker_core::database::CreatureDb;
use tracker_core::models::{QuantityStats, Totals};
use tracker_core::pricing::PriceBook;

use crate::store::AggregationStore;

/// Drop rate of `item` across all of its known source monsters, as a
/// percentage.
///
/// Each source monster contributes its full kill count to the
/// denominator whether or not it dropped the item recently: the rate is
/// "fraction of kills of source monsters that produced this item", not
/// a per-corpse rate over the whole session. Zero kills yields 0.
pub fn overall_drop_rate(store: &AggregationStore, item: &str) -> f64 {
    let Some(sources) = store.sources(item) else {
        return 0.0;
    };

    let mut total_drops = 0usize;
    let mut total_kills = 0u64;
    for monster in sources {
        total_kills += store.kills(monster);
        total_drops += store.drop_instances(monster, item);
    }

    if total_kills == 0 {
        return 0.0;
    }
    (total_drops as f64 / total_kills as f64) * 100.0
}

/// Drop rate of `item` from one specific monster, as a percentage.
pub fn per_monster_drop_rate(store: &AggregationStore, item: &str, monster: &str) -> f64 {
    let kills = store.kills(monster);
    if kills == 0 {
        return 0.0;
    }
    let instances = store.drop_instances(monster, item);
    (instances as f64 / kills as f64) * 100.0
}

/// Min/max/mean over the stored quantities of one (monster, item) pair.
///
/// `None` when the pair has never been observed.
pub fn quantity_stats(store: &AggregationStore, monster: &str, item: &str) -> Option<QuantityStats> {
    let quantities = store.quantities(monster, item)?;
    if quantities.is_empty() {
        return None;
    }

    let min = *quantities.iter().min().expect("non-empty");
    let max = *quantities.iter().max().expect("non-empty");
    let sum: u64 = quantities.iter().sum();
    Some(QuantityStats {
        min,
        max,
        mean: sum as f64 / quantities.len() as f64,
        instances: quantities.len(),
    })
}

/// Session totals: gold from loot counts, experience from kill counts.
pub fn totals(store: &AggregationStore, prices: &PriceBook, creatures: &CreatureDb) -> Totals {
    let gold = store
        .loot_counts()
        .iter()
        .map(|(item, count)| count * prices.price_of(item))
        .sum();
    let experience = store
        .kill_counts()
        .iter()
        .map(|(monster, kills)| kills * creatures.experience(monster))
        .sum();
    Totals { gold, experience }
}

/// Extrapolate a running total to a per-hour rate, integer-truncated.
///
/// A non-positive elapsed time yields 0; the session just started.
pub fn per_hour_rate(total: u64, elapsed_secs: i64) -> u64 {
    if elapsed_secs <= 0 {
        return 0;
    }
    total * 3600 / elapsed_secs as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::exclusions::Exclusions;
    use tracker_core::models::LineEvent;

    fn store_with(lines: &[(&str, &str)]) -> AggregationStore {
        let mut store = AggregationStore::new();
        let exclusions = Exclusions::new();
        for (monster, items) in lines {
            store.apply(
                &LineEvent::KillLoot {
                    monster: monster.to_string(),
                    items: items.to_string(),
                },
                &exclusions,
            );
        }
        store
    }

    // ── overall_drop_rate ─────────────────────────────────────────────────────

    #[test]
    fn test_overall_rate_single_monster() {
        // 4 rat kills, cheese dropped twice → 50%.
        let store = store_with(&[
            ("rat", "a cheese."),
            ("rat", "empty"),
            ("rat", "a cheese."),
            ("rat", "empty"),
        ]);
        assert!((overall_drop_rate(&store, "cheese") - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_overall_rate_spans_source_monsters() {
        // cheese sources: rat (2 kills, 1 drop) and cave rat (2 kills, 1 drop).
        let store = store_with(&[
            ("rat", "a cheese."),
            ("rat", "empty"),
            ("cave rat", "a cheese."),
            ("cave rat", "empty"),
        ]);
        assert!((overall_drop_rate(&store, "cheese") - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_overall_rate_unknown_item_zero() {
        let store = store_with(&[("rat", "a cheese.")]);
        assert_eq!(overall_drop_rate(&store, "sword"), 0.0);
    }

    #[test]
    fn test_overall_rate_zero_kills_guard() {
        // Bag contents create sources without kills.
        let mut store = AggregationStore::new();
        store.apply(
            &LineEvent::BagContents {
                monster: "dragon".to_string(),
                items: "a sword.".to_string(),
            },
            &Exclusions::new(),
        );
        assert_eq!(overall_drop_rate(&store, "sword"), 0.0);
    }

    // ── per_monster_drop_rate ─────────────────────────────────────────────────

    #[test]
    fn test_per_monster_rate() {
        let store = store_with(&[("rat", "a cheese."), ("rat", "empty")]);
        assert!((per_monster_drop_rate(&store, "cheese", "rat") - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_per_monster_rate_zero_kills() {
        let store = AggregationStore::new();
        assert_eq!(per_monster_drop_rate(&store, "cheese", "rat"), 0.0);
    }

    // ── quantity_stats ────────────────────────────────────────────────────────

    #[test]
    fn test_quantity_stats_min_max_mean() {
        let store = store_with(&[
            ("rat", "2 worms."),
            ("rat", "4 worms."),
            ("rat", "6 worms."),
        ]);
        let stats = quantity_stats(&store, "rat", "worm").unwrap();
        assert_eq!(stats.min, 2);
        assert_eq!(stats.max, 6);
        assert!((stats.mean - 4.0).abs() < 1e-9);
        assert_eq!(stats.instances, 3);
    }

    #[test]
    fn test_quantity_stats_unknown_pair() {
        let store = AggregationStore::new();
        assert!(quantity_stats(&store, "rat", "cheese").is_none());
    }

    // ── totals ────────────────────────────────────────────────────────────────

    #[test]
    fn test_totals_gold_and_experience() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(
            &path,
            r#"{
                "items": [{"name": "cheese", "price": 5}],
                "creatures": [{"name": "rat", "exp": 20}]
            }"#,
        )
        .unwrap();
        let (items, creatures) = tracker_core::database::load_database(&path);
        let prices = PriceBook::new(items);

        let store = store_with(&[("rat", "a cheese, 3 gold coins."), ("rat", "a cheese.")]);
        let totals = totals(&store, &prices, &creatures);
        // 2 cheese * 5 + 3 gold coins * 1 = 13 gold; 2 kills * 20 exp.
        assert_eq!(totals.gold, 13);
        assert_eq!(totals.experience, 40);
    }

    #[test]
    fn test_totals_empty_store() {
        let store = AggregationStore::new();
        let result = totals(&store, &PriceBook::default(), &CreatureDb::default());
        assert_eq!(result, Totals::default());
    }

    // ── per_hour_rate ─────────────────────────────────────────────────────────

    #[test]
    fn test_per_hour_rate_identity_at_one_hour() {
        assert_eq!(per_hour_rate(3600, 3600), 3600);
        assert_eq!(per_hour_rate(1, 3600), 1);
    }

    #[test]
    fn test_per_hour_rate_truncates() {
        // 100 * 3600 / 7000 = 51.42... → 51.
        assert_eq!(per_hour_rate(100, 7000), 51);
    }

    #[test]
    fn test_per_hour_rate_zero_elapsed() {
        assert_eq!(per_hour_rate(123_456, 0), 0);
        assert_eq!(per_hour_rate(123_456, -5), 0);
    }
}

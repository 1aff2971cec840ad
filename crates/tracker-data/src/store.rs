//! In-memory aggregation store.
//!
//! Exclusively owned by the single processing path; no synchronization.
//! All keys are lower-cased before they arrive here (classifier and
//! normalizer boundary), and `BTreeMap`/`BTreeSet` keep every snapshot
//! iteration sorted by name for deterministic display.

use std::collections::{BTreeMap, BTreeSet};

use tracker_core::exclusions::Exclusions;
use tracker_core::models::LineEvent;
use tracker_core::normalize::split_items;

/// Running kill, loot and per-monster drop aggregates for one session.
#[derive(Debug, Default)]
pub struct AggregationStore {
    /// monster → kill count.
    kill_counts: BTreeMap<String, u64>,
    /// item → cumulative quantity across all sources.
    loot_counts: BTreeMap<String, u64>,
    /// monster → item → chronological drop-instance quantities.
    monster_drops: BTreeMap<String, BTreeMap<String, Vec<u64>>>,
    /// item → monsters known to drop it (reverse index over
    /// `monster_drops`).
    item_sources: BTreeMap<String, BTreeSet<String>>,
}

impl AggregationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one classified event, consulting `exclusions` at write time.
    ///
    /// Side-effect order for loot-bearing events: kill count first
    /// (kill+loot only), then per item: drop instance, source index,
    /// loot count.
    pub fn apply(&mut self, event: &LineEvent, exclusions: &Exclusions) {
        match event {
            LineEvent::KillLoot { monster, items } => {
                if !exclusions.is_monster_excluded(monster) {
                    *self.kill_counts.entry(monster.clone()).or_insert(0) += 1;
                }
                self.record_items(Some(monster), items, exclusions);
            }
            LineEvent::BagContents { monster, items } => {
                // Same corpse, secondary container: loot without a kill.
                self.record_items(Some(monster), items, exclusions);
            }
            LineEvent::EventPoints { kind, quantity } => {
                if !exclusions.is_item_excluded(kind) {
                    *self.loot_counts.entry(kind.clone()).or_insert(0) += quantity;
                }
            }
            LineEvent::SectionMarker(_) | LineEvent::Unrecognized => {}
        }
    }

    /// Drop every aggregate. Reprocessing clears all four maps so a
    /// replay starts from a state indistinguishable from "never started".
    pub fn clear(&mut self) {
        self.kill_counts.clear();
        self.loot_counts.clear();
        self.monster_drops.clear();
        self.item_sources.clear();
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    /// monster → kill count, iterable sorted by name.
    pub fn kill_counts(&self) -> &BTreeMap<String, u64> {
        &self.kill_counts
    }

    /// item → cumulative quantity, iterable sorted by name.
    pub fn loot_counts(&self) -> &BTreeMap<String, u64> {
        &self.loot_counts
    }

    pub fn kills(&self, monster: &str) -> u64 {
        self.kill_counts.get(monster).copied().unwrap_or(0)
    }

    pub fn loot_count(&self, item: &str) -> u64 {
        self.loot_counts.get(item).copied().unwrap_or(0)
    }

    /// Chronological drop-instance quantities for one (monster, item).
    pub fn quantities(&self, monster: &str, item: &str) -> Option<&[u64]> {
        self.monster_drops
            .get(monster)
            .and_then(|items| items.get(item))
            .map(Vec::as_slice)
    }

    /// Number of corpses/bags of `monster` that contained `item`.
    pub fn drop_instances(&self, monster: &str, item: &str) -> usize {
        self.quantities(monster, item).map_or(0, <[u64]>::len)
    }

    /// Monsters known to drop `item`, sorted.
    pub fn sources(&self, item: &str) -> Option<&BTreeSet<String>> {
        self.item_sources.get(item)
    }

    /// Items dropped by `monster`, with their quantity sequences.
    pub fn drops_of(&self, monster: &str) -> Option<&BTreeMap<String, Vec<u64>>> {
        self.monster_drops.get(monster)
    }

    /// All per-monster drop histories, sorted by monster name.
    pub fn monster_drops(&self) -> &BTreeMap<String, BTreeMap<String, Vec<u64>>> {
        &self.monster_drops
    }

    // ── Internal ─────────────────────────────────────────────────────────────

    /// Normalize and record every non-excluded token of an items string.
    fn record_items(&mut self, monster: Option<&str>, items_text: &str, exclusions: &Exclusions) {
        for item in split_items(items_text) {
            if exclusions.is_item_excluded(&item.name) {
                continue;
            }

            if let Some(monster) = monster {
                self.monster_drops
                    .entry(monster.to_string())
                    .or_default()
                    .entry(item.name.clone())
                    .or_default()
                    .push(item.quantity);
                self.item_sources
                    .entry(item.name.clone())
                    .or_default()
                    .insert(monster.to_string());
            }

            *self.loot_counts.entry(item.name).or_insert(0) += item.quantity;
        }
    }
}

//! The tracking engine: glue for the whole parsing pipeline.
//!
//! One poll runs tailer → timestamp correlator → classifier →
//! aggregation store, strictly in line order. Bag-contents lines rely on
//! the kill recorded by an earlier loot line of the same corpse, so
//! order within and across polls is never reshuffled.

use std::fmt::Write as _;
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use tracker_core::classify::LineClassifier;
use tracker_core::database::CreatureDb;
use tracker_core::exclusions::Exclusions;
use tracker_core::formatting::{format_drop_stats, format_grouped, format_rate, format_session_time};
use tracker_core::models::{LineEvent, Totals};
use tracker_core::pricing::PriceBook;
use tracker_core::timestamp::TimestampCorrelator;

use crate::series::RateSeries;
use crate::stats;
use crate::store::AggregationStore;
use crate::tailer::LogTailer;

/// Totals and per-hour rates captured at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateSample {
    pub totals: Totals,
    pub gold_per_hour: u64,
    pub exp_per_hour: u64,
}

/// Owns the tail state, the section anchor and all aggregates for one
/// tracking session.
pub struct TrackerEngine {
    tailer: LogTailer,
    correlator: TimestampCorrelator,
    classifier: LineClassifier,
    store: AggregationStore,
    /// Lines resolving strictly before this instant never reach the store.
    session_start: NaiveDateTime,
    gold_series: RateSeries,
    exp_series: RateSeries,
}

impl TrackerEngine {
    pub fn new(log_path: impl AsRef<Path>, session_start: NaiveDateTime) -> Self {
        Self {
            tailer: LogTailer::new(log_path.as_ref()),
            correlator: TimestampCorrelator::new(),
            classifier: LineClassifier::new(),
            store: AggregationStore::new(),
            session_start,
            gold_series: RateSeries::new(),
            exp_series: RateSeries::new(),
        }
    }

    // ── Pipeline ─────────────────────────────────────────────────────────────

    /// Process the lines appended since the previous poll.
    ///
    /// Returns the number of events applied to the store. When the file
    /// shrank underneath us, all aggregates are cleared before the
    /// replayed lines are applied, so nothing is double-counted.
    pub fn poll(&mut self, exclusions: &Exclusions) -> usize {
        let chunk = self.tailer.poll();
        if chunk.truncated {
            info!("log file was truncated or rotated; replaying from the start");
            self.store.clear();
            self.correlator.reset();
        }
        self.process_lines(&chunk.lines, exclusions)
    }

    /// Clear every aggregate and replay the whole file.
    ///
    /// Invoked after an exclusion edit so past matches are retroactively
    /// purged. The clear happens before any read; an interrupted replay
    /// leaves state no different from one that never started.
    pub fn reprocess(&mut self, exclusions: &Exclusions) -> usize {
        self.store.clear();
        self.correlator.reset();
        self.tailer.reset();
        let applied = self.poll(exclusions);
        info!("reprocessed log file; {} events applied", applied);
        applied
    }

    /// Restart the session clock: aggregates and rate series are wiped,
    /// but the tail offset stays at end of file so old lines are never
    /// re-read.
    pub fn reset_session(&mut self, start: NaiveDateTime) {
        self.store.clear();
        self.gold_series.clear();
        self.exp_series.clear();
        self.session_start = start;
    }

    fn process_lines(&mut self, lines: &[String], exclusions: &Exclusions) -> usize {
        let mut applied = 0usize;
        for line in lines {
            match self.classifier.classify(line) {
                LineEvent::SectionMarker(marker) => self.correlator.observe_marker(marker),
                LineEvent::Unrecognized => {}
                event => {
                    // No anchor yet, no HH:MM prefix, or malformed time:
                    // skip without touching any aggregate.
                    let Some(ts) = self.correlator.resolve(line) else {
                        continue;
                    };
                    if ts < self.session_start {
                        debug!("line at {} predates session start; dropped", ts);
                        continue;
                    }
                    self.store.apply(&event, exclusions);
                    applied += 1;
                }
            }
        }
        applied
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn store(&self) -> &AggregationStore {
        &self.store
    }

    pub fn session_start(&self) -> NaiveDateTime {
        self.session_start
    }

    pub fn elapsed_secs(&self, now: NaiveDateTime) -> i64 {
        (now - self.session_start).num_seconds()
    }

    /// Compute totals and per-hour rates at `now` and append them to the
    /// windowed rate series. The caller decides the sampling cadence.
    pub fn sample_rates(
        &mut self,
        now: NaiveDateTime,
        prices: &PriceBook,
        creatures: &CreatureDb,
    ) -> RateSample {
        let totals = stats::totals(&self.store, prices, creatures);
        let elapsed = self.elapsed_secs(now);
        let sample = RateSample {
            totals,
            gold_per_hour: stats::per_hour_rate(totals.gold, elapsed),
            exp_per_hour: stats::per_hour_rate(totals.experience, elapsed),
        };
        self.gold_series.push(now, sample.gold_per_hour);
        self.exp_series.push(now, sample.exp_per_hour);
        sample
    }

    pub fn gold_series(&self) -> &RateSeries {
        &self.gold_series
    }

    pub fn exp_series(&self) -> &RateSeries {
        &self.exp_series
    }

    // ── Session report ───────────────────────────────────────────────────────

    /// Render the plain-text session summary: totals, rates, loot and
    /// kill tables sorted by name, per-monster drop statistics, and the
    /// active exclusions and overrides.
    pub fn render_report(
        &self,
        now: NaiveDateTime,
        prices: &PriceBook,
        creatures: &CreatureDb,
        exclusions: &Exclusions,
    ) -> String {
        let totals = stats::totals(&self.store, prices, creatures);
        let elapsed = self.elapsed_secs(now);
        let mut out = String::new();

        let _ = writeln!(out, "Session Time: {}", format_session_time(elapsed));
        let _ = writeln!(out, "Total Gold: {}", format_grouped(totals.gold));
        let _ = writeln!(out, "Total Exp: {}", format_grouped(totals.experience));
        let _ = writeln!(
            out,
            "Gold/Hour: {}",
            format_grouped(stats::per_hour_rate(totals.gold, elapsed))
        );
        let _ = writeln!(
            out,
            "Exp/Hour: {}",
            format_grouped(stats::per_hour_rate(totals.experience, elapsed))
        );

        let rule = "-".repeat(100);

        let _ = writeln!(out, "\nLoot Items:");
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(
            out,
            "{:<30} {:<10} {:<12} {:<15} {:<10} {}",
            "Item", "Count", "Price", "Total", "Drop Rate", "Sources"
        );
        let _ = writeln!(out, "{}", rule);
        for (item, count) in self.store.loot_counts() {
            // Synthetic event-point items have no price or drop source.
            if item.ends_with(" point") {
                continue;
            }
            let price = prices.price_of(item);
            let sources_text = self.describe_sources(item);
            let _ = writeln!(
                out,
                "{:<30} {:<10} {:<12} {:<15} {:<10} {}",
                item,
                format_grouped(*count),
                format_grouped(price),
                format_grouped(price * count),
                format_rate(stats::overall_drop_rate(&self.store, item)),
                sources_text
            );
        }

        let _ = writeln!(out, "\nMonster Kills and Drops:");
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(
            out,
            "{:<25} {:<8} {:<10} {:<15} {}",
            "Monster", "Kills", "Exp/Kill", "Total Exp", "Items Dropped"
        );
        let _ = writeln!(out, "{}", rule);
        for (monster, kills) in self.store.kill_counts() {
            let exp = creatures.experience(monster);
            let _ = writeln!(
                out,
                "{:<25} {:<8} {:<10} {:<15} {}",
                monster,
                format_grouped(*kills),
                format_grouped(exp),
                format_grouped(exp * kills),
                self.describe_drops(monster)
            );
        }

        let _ = writeln!(out, "\nExcluded Items:");
        for item in exclusions.items() {
            let _ = writeln!(out, "{}", item);
        }
        let _ = writeln!(out, "\nExcluded Monsters:");
        for monster in exclusions.monsters() {
            let _ = writeln!(out, "{}", monster);
        }
        let _ = writeln!(out, "\nCustom Item Prices:");
        for (item, price) in prices.custom_prices() {
            let _ = writeln!(out, "{}: {} gold", item, format_grouped(price));
        }

        out
    }

    /// `"rat (50.00%, avg: 1.0, range: 1) | wolf (…)"` for one item.
    fn describe_sources(&self, item: &str) -> String {
        let Some(sources) = self.store.sources(item) else {
            return "N/A".to_string();
        };
        let parts: Vec<String> = sources
            .iter()
            .filter_map(|monster| {
                if self.store.kills(monster) == 0 {
                    return None;
                }
                let quantity_stats = stats::quantity_stats(&self.store, monster, item)?;
                let rate = stats::per_monster_drop_rate(&self.store, item, monster);
                Some(format!("{} ({})", monster, format_drop_stats(rate, &quantity_stats)))
            })
            .collect();
        if parts.is_empty() {
            "N/A".to_string()
        } else {
            parts.join(" | ")
        }
    }

    /// `"cheese (50.00%, avg: 1.0, range: 1) | …"` for one monster.
    fn describe_drops(&self, monster: &str) -> String {
        let Some(drops) = self.store.drops_of(monster) else {
            return "None".to_string();
        };
        let parts: Vec<String> = drops
            .keys()
            .filter_map(|item| {
                let quantity_stats = stats::quantity_stats(&self.store, monster, item)?;
                let rate = stats::per_monster_drop_rate(&self.store, item, monster);
                Some(format!("{} ({})", item, format_drop_stats(rate, &quantity_stats)))
            })
            .collect();
        if parts.is_empty() {
            "None".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

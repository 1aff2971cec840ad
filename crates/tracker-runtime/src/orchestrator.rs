//! Async tracking orchestrator.
//!
//! Runs the poll-driven engine in a tokio task on a fixed interval and
//! sends periodic [`TrackerSnapshot`] updates through an `mpsc` channel,
//! so the presentation layer never shares mutable state with the
//! pipeline. A second channel carries [`TrackerCommand`]s back in;
//! exclusion edits trigger a full reprocess so past matches are purged.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tokio::sync::mpsc;
use tokio::time;

use tracker_core::database::CreatureDb;
use tracker_core::exclusions::Exclusions;
use tracker_core::models::Totals;
use tracker_core::pricing::PriceBook;
use tracker_data::engine::TrackerEngine;

// ── Public types ──────────────────────────────────────────────────────────────

/// One tracking snapshot forwarded to the consumer.
///
/// The primary data contract between the background runtime and the
/// presentation layer. Count tables are sorted by name.
#[derive(Debug, Clone)]
pub struct TrackerSnapshot {
    pub captured_at: NaiveDateTime,
    pub session_start: NaiveDateTime,
    pub totals: Totals,
    pub gold_per_hour: u64,
    pub exp_per_hour: u64,
    /// monster → kill count, sorted by monster name.
    pub kill_counts: Vec<(String, u64)>,
    /// item → cumulative quantity, sorted by item name.
    pub loot_counts: Vec<(String, u64)>,
}

/// Externally issued mutations, applied between polls.
///
/// The engine itself never observes UI events; whoever owns the edit
/// surface sends these and the orchestrator relays them.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerCommand {
    ExcludeItem(String),
    IncludeItem(String),
    ExcludeMonster(String),
    IncludeMonster(String),
    SetPrice(String, u64),
    ClearPrice(String),
    ResetSession,
}

// ── TrackerOrchestrator ───────────────────────────────────────────────────────

/// Background polling coordinator.
///
/// Call [`TrackerOrchestrator::start`] to spin up the loop in a
/// dedicated tokio task and receive the snapshot and command endpoints.
pub struct TrackerOrchestrator {
    poll_interval: Duration,
    log_path: PathBuf,
    exclusions: Exclusions,
    prices: PriceBook,
    creatures: CreatureDb,
}

impl TrackerOrchestrator {
    pub fn new(
        poll_interval_secs: u64,
        log_path: PathBuf,
        exclusions: Exclusions,
        prices: PriceBook,
        creatures: CreatureDb,
    ) -> Self {
        Self {
            poll_interval: Duration::from_secs(poll_interval_secs),
            log_path,
            exclusions,
            prices,
            creatures,
        }
    }

    /// Start the polling loop.
    ///
    /// Returns the snapshot receiver, the command sender, and a handle
    /// that aborts the loop when dropped or told to.
    pub fn start(
        self,
    ) -> (
        mpsc::Receiver<TrackerSnapshot>,
        mpsc::Sender<TrackerCommand>,
        TrackerHandle,
    ) {
        // Modest buffers; a slow consumer drops ticks, not correctness.
        let (snapshot_tx, snapshot_rx) = mpsc::channel(16);
        let (command_tx, command_rx) = mpsc::channel(16);

        let handle = tokio::spawn(async move {
            self.run(snapshot_tx, command_rx).await;
        });

        (snapshot_rx, command_tx, TrackerHandle { handle })
    }

    // ── Private implementation ────────────────────────────────────────────

    async fn run(
        mut self,
        tx: mpsc::Sender<TrackerSnapshot>,
        mut commands: mpsc::Receiver<TrackerCommand>,
    ) {
        let mut engine = TrackerEngine::new(&self.log_path, Local::now().naive_local());

        // Immediate first poll so the consumer is not left waiting a
        // full interval for its first snapshot.
        self.poll_and_send(&mut engine, &tx).await;

        let mut interval = time::interval(self.poll_interval);
        // The first tick fires immediately; we already polled above.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if tx.is_closed() {
                        tracing::debug!("snapshot channel closed; exiting loop");
                        break;
                    }
                    self.poll_and_send(&mut engine, &tx).await;
                }
                command = commands.recv() => {
                    match command {
                        Some(command) => {
                            self.apply_command(&mut engine, command);
                            // Surface the effect without waiting a tick.
                            self.poll_and_send(&mut engine, &tx).await;
                        }
                        None => {
                            tracing::debug!("command channel closed; exiting loop");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Apply one command. Exclusion edits replay the whole file so past
    /// matches are retroactively removed; price edits only affect
    /// derived values and need no replay.
    fn apply_command(&mut self, engine: &mut TrackerEngine, command: TrackerCommand) {
        tracing::debug!(?command, "applying tracker command");
        match command {
            TrackerCommand::ExcludeItem(name) => {
                self.exclusions.exclude_item(&name);
                engine.reprocess(&self.exclusions);
            }
            TrackerCommand::IncludeItem(name) => {
                self.exclusions.include_item(&name);
                engine.reprocess(&self.exclusions);
            }
            TrackerCommand::ExcludeMonster(name) => {
                self.exclusions.exclude_monster(&name);
                engine.reprocess(&self.exclusions);
            }
            TrackerCommand::IncludeMonster(name) => {
                self.exclusions.include_monster(&name);
                engine.reprocess(&self.exclusions);
            }
            TrackerCommand::SetPrice(name, price) => {
                self.prices.set_custom(&name, price);
            }
            TrackerCommand::ClearPrice(name) => {
                self.prices.remove_custom(&name);
            }
            TrackerCommand::ResetSession => {
                engine.reset_session(Local::now().naive_local());
            }
        }
    }

    async fn poll_and_send(&mut self, engine: &mut TrackerEngine, tx: &mpsc::Sender<TrackerSnapshot>) {
        engine.poll(&self.exclusions);

        let now = Local::now().naive_local();
        let sample = engine.sample_rates(now, &self.prices, &self.creatures);

        let snapshot = TrackerSnapshot {
            captured_at: now,
            session_start: engine.session_start(),
            totals: sample.totals,
            gold_per_hour: sample.gold_per_hour,
            exp_per_hour: sample.exp_per_hour,
            kill_counts: engine
                .store()
                .kill_counts()
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
            loot_counts: engine
                .store()
                .loot_counts()
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
        };

        if let Err(e) = tx.send(snapshot).await {
            tracing::warn!(error = %e, "failed to send tracker snapshot; receiver dropped");
        }
    }
}

// ── TrackerHandle ─────────────────────────────────────────────────────────────

/// A handle to the background polling task.
pub struct TrackerHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl TrackerHandle {
    /// Immediately abort the polling loop.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_log(dir: &TempDir, lines: &[&str]) -> PathBuf {
        let path = dir.path().join("Loot.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn orchestrator_for(path: PathBuf) -> TrackerOrchestrator {
        TrackerOrchestrator::new(
            60,
            path,
            Exclusions::new(),
            PriceBook::default(),
            CreatureDb::default(),
        )
    }

    /// A marker far in the future so engine session start (now) never
    /// filters the test lines out.
    fn future_marker() -> String {
        let at = Local::now().naive_local() + chrono::Duration::hours(2);
        format!("Channel saved at {}", at.format("%a %b %d %H:%M:%S %Y"))
    }

    fn future_line(suffix: &str) -> String {
        let at = Local::now().naive_local() + chrono::Duration::hours(2);
        format!("{} {}", at.format("%H:%M"), suffix)
    }

    #[test]
    fn test_orchestrator_creation() {
        let orch = orchestrator_for(PathBuf::from("/tmp/Loot.txt"));
        assert_eq!(orch.poll_interval, Duration::from_secs(60));
        assert_eq!(orch.log_path, PathBuf::from("/tmp/Loot.txt"));
    }

    #[tokio::test]
    async fn test_start_and_abort() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, &[]);

        let (_rx, _cmd, handle) = orchestrator_for(path).start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();
    }

    #[tokio::test]
    async fn test_initial_snapshot_arrives() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            &dir,
            &[&future_marker(), &future_line("Loot of a rat: a cheese.")],
        );

        let (mut rx, _cmd, handle) = orchestrator_for(path).start();
        let snapshot = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for snapshot")
            .expect("channel closed before first snapshot");

        assert_eq!(snapshot.kill_counts, vec![("a rat".to_string(), 1)]);
        assert_eq!(snapshot.loot_counts, vec![("cheese".to_string(), 1)]);
        handle.abort();
    }

    #[tokio::test]
    async fn test_exclude_item_command_purges_and_resends() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            &dir,
            &[
                &future_marker(),
                &future_line("Loot of a rat: a cheese, 2 worms."),
            ],
        );

        let (mut rx, cmd, handle) = orchestrator_for(path).start();

        let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(first.loot_counts.iter().any(|(name, _)| name == "worm"));

        cmd.send(TrackerCommand::ExcludeItem("worm".to_string()))
            .await
            .unwrap();

        let after = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(after.loot_counts.iter().all(|(name, _)| name != "worm"));
        // Kill count untouched by an item exclusion.
        assert_eq!(after.kill_counts, vec![("a rat".to_string(), 1)]);
        handle.abort();
    }

    #[tokio::test]
    async fn test_reset_session_command_clears_counts() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            &dir,
            &[&future_marker(), &future_line("Loot of a rat: a cheese.")],
        );

        let (mut rx, cmd, handle) = orchestrator_for(path).start();
        let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(!first.kill_counts.is_empty());

        cmd.send(TrackerCommand::ResetSession).await.unwrap();
        let after = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(after.kill_counts.is_empty());
        assert!(after.loot_counts.is_empty());
        handle.abort();
    }
}

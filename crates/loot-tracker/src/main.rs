mod bootstrap;

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use clap::Parser;

use tracker_core::database::load_database;
use tracker_core::formatting::{format_compact, format_grouped, format_session_time};
use tracker_core::pricing::PriceBook;
use tracker_core::settings::Settings;
use tracker_data::engine::TrackerEngine;
use tracker_runtime::orchestrator::{TrackerOrchestrator, TrackerSnapshot};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Loot Tracker v{} starting", env!("CARGO_PKG_VERSION"));

    let log_path = settings
        .log_file
        .clone()
        .unwrap_or_else(bootstrap::default_log_path);
    tracing::info!("Tailing {}", log_path.display());

    let (items, creatures) = load_database(&settings.database);

    let exclusions = settings.exclusions();
    let mut prices = PriceBook::new(items);
    for (name, price) in settings.parsed_price_overrides()? {
        prices.set_custom(&name, price);
    }

    match settings.view.as_str() {
        "live" => {
            tracing::info!("Starting live tracking...");

            let orchestrator = TrackerOrchestrator::new(
                u64::from(settings.refresh_rate),
                log_path,
                exclusions,
                prices,
                creatures,
            );

            let (mut rx, _commands, handle) = orchestrator.start();

            // Print a summary line per snapshot until the channel closes
            // or Ctrl+C arrives.
            loop {
                tokio::select! {
                    snapshot = rx.recv() => {
                        match snapshot {
                            Some(snapshot) => print_snapshot(&snapshot),
                            None => break,
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Ctrl+C received; shutting down tracking task");
                        break;
                    }
                }
            }
            handle.abort();
        }

        "report" => {
            tracing::info!("Generating session report...");

            // A report covers the whole file, so start the session far
            // enough back that no line is filtered out.
            let mut engine = TrackerEngine::new(&log_path, NaiveDateTime::MIN);
            engine.poll(&exclusions);

            let now = Local::now().naive_local();
            println!("{}", engine.render_report(now, &prices, &creatures, &exclusions));
        }

        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(())
}

fn print_snapshot(snapshot: &TrackerSnapshot) {
    let elapsed = snapshot
        .captured_at
        .signed_duration_since(snapshot.session_start)
        .num_seconds();

    println!(
        "[{}] gold {} ({}/h) | exp {} ({}/h) | kills {} | items {}",
        format_session_time(elapsed),
        format_grouped(snapshot.totals.gold),
        format_compact(snapshot.gold_per_hour),
        format_grouped(snapshot.totals.experience),
        format_compact(snapshot.exp_per_hour),
        snapshot.kill_counts.iter().map(|(_, n)| n).sum::<u64>(),
        snapshot.loot_counts.iter().map(|(_, n)| n).sum::<u64>(),
    );
}

use clap::Parser;
use std::path::PathBuf;

use crate::error::{Result, TrackerError};
use crate::exclusions::Exclusions;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Loot and kill statistics for Medivia client logs
#[derive(Parser, Debug, Clone)]
#[command(
    name = "loot-tracker",
    about = "Loot and kill statistics for Medivia client logs",
    version
)]
pub struct Settings {
    /// Path to the client loot log (defaults to ~/medivia/Loot.txt)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Path to the static item/creature database
    #[arg(long, default_value = "db.json")]
    pub database: PathBuf,

    /// View mode
    #[arg(long, default_value = "live", value_parser = ["live", "report"])]
    pub view: String,

    /// Poll interval in seconds (1-60)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=60))]
    pub refresh_rate: u32,

    /// Item name to exclude from aggregation (repeatable)
    #[arg(long = "exclude-item")]
    pub excluded_items: Vec<String>,

    /// Monster name to exclude from kill counting (repeatable)
    #[arg(long = "exclude-monster")]
    pub excluded_monsters: Vec<String>,

    /// Custom price override as `item=price` (repeatable)
    #[arg(long = "price")]
    pub price_overrides: Vec<String>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,
}

impl Settings {
    /// Build the exclusion sets from the repeated CLI arguments.
    pub fn exclusions(&self) -> Exclusions {
        let mut exclusions = Exclusions::new();
        for item in &self.excluded_items {
            exclusions.exclude_item(item);
        }
        for monster in &self.excluded_monsters {
            exclusions.exclude_monster(monster);
        }
        exclusions
    }

    /// Parse the `item=price` override arguments.
    pub fn parsed_price_overrides(&self) -> Result<Vec<(String, u64)>> {
        self.price_overrides
            .iter()
            .map(|raw| parse_price_override(raw))
            .collect()
    }
}

/// Parse one `item=price` pair, e.g. `"dragon scale=180"`.
pub fn parse_price_override(raw: &str) -> Result<(String, u64)> {
    let (name, price) = raw
        .split_once('=')
        .ok_or_else(|| TrackerError::Config(format!("expected item=price, got \"{}\"", raw)))?;

    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return Err(TrackerError::Config(format!(
            "empty item name in price override \"{}\"",
            raw
        )));
    }

    let price = price.trim().parse::<u64>().map_err(|e| {
        TrackerError::Config(format!("bad price in override \"{}\": {}", raw, e))
    })?;

    Ok((name, price))
}

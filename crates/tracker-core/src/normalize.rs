//! Token normalization for loot lists.
//!
//! Canonicalizes the raw comma-separated item text of a loot line into
//! stable aggregation keys: lower-cased, article-stripped, singularized,
//! with explicit quantities extracted.

use crate::models::LootItem;
use tracing::warn;

/// Inherently-plural nouns that keep their trailing `s`.
const KEEP_PLURAL: &[&str] = &["boots", "legs"];

/// Normalized names that denote containers rather than loot.
const CONTAINER_TOKENS: &[&str] = &["bag", "empty"];

/// Collapse plural forms of an already article-free, lower-cased name.
///
/// Rules, in order: keep-list nouns are returned untouched, `ies` → `y`,
/// `ves` → `f`, any other trailing `s` is dropped.
pub fn normalize_name(name: &str) -> String {
    let name = name.trim();
    if KEEP_PLURAL.contains(&name) {
        return name.to_string();
    }
    if let Some(stem) = name.strip_suffix("ies") {
        return format!("{}y", stem);
    }
    if let Some(stem) = name.strip_suffix("ves") {
        return format!("{}f", stem);
    }
    if let Some(stem) = name.strip_suffix('s') {
        return stem.to_string();
    }
    name.to_string()
}

/// Parse one comma-separated token from an items string.
///
/// Returns `None` for empty tokens, container placeholders (`bag`,
/// `empty`) and quantities that fail to parse (reported, not fatal).
pub fn parse_item_token(token: &str) -> Option<LootItem> {
    let token = token.trim().to_lowercase();
    let token = token.strip_suffix('.').unwrap_or(&token).trim();
    if token.is_empty() {
        return None;
    }

    let (quantity, raw_name) = extract_quantity(token)?;
    let name = normalize_name(raw_name);

    if name.is_empty() || CONTAINER_TOKENS.contains(&name.as_str()) {
        return None;
    }

    Some(LootItem::new(name, quantity))
}

/// Normalize every token of a comma-separated items string.
///
/// Discarded tokens (containers, empties, bad quantities) simply vanish
/// from the result; they are not replaced by placeholders.
pub fn split_items(items_text: &str) -> Vec<LootItem> {
    items_text.split(',').filter_map(parse_item_token).collect()
}

/// Split an explicit leading quantity or article off a token.
///
/// * `"3 worms"` → `(3, "worms")`
/// * `"a sword"` / `"an axe"` → `(1, "sword")` / `(1, "axe")`
/// * `"cheese"` → `(1, "cheese")`
fn extract_quantity(token: &str) -> Option<(u64, &str)> {
    let digits_end = token
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(token.len());

    if digits_end > 0 {
        let rest = &token[digits_end..];
        if rest.starts_with(char::is_whitespace) {
            let quantity = match token[..digits_end].parse::<u64>() {
                Ok(q) => q,
                Err(e) => {
                    warn!("unparseable quantity in token \"{}\": {}", token, e);
                    return None;
                }
            };
            let name = rest.trim_start();
            let name = name.strip_suffix('.').unwrap_or(name).trim_end();
            return Some((quantity, name));
        }
    }

    if let Some(rest) = token.strip_prefix("a ").or_else(|| token.strip_prefix("an ")) {
        return Some((1, rest.trim_start()));
    }

    Some((1, token))
}

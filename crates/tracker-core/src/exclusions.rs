//! Externally managed exclusion sets.
//!
//! The aggregation store consults these at write time; membership is a
//! precondition for recording, never a validation error. After editing
//! an exclusion the owner is expected to ask the engine for a full
//! reprocess so past matches are retroactively purged.

use std::collections::BTreeSet;

/// Item and monster names excluded from aggregation. All names are
/// stored lower-cased.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    items: BTreeSet<String>,
    monsters: BTreeSet<String>,
}

impl Exclusions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclude_item(&mut self, name: &str) {
        self.items.insert(name.trim().to_lowercase());
    }

    pub fn include_item(&mut self, name: &str) {
        self.items.remove(&name.trim().to_lowercase());
    }

    pub fn exclude_monster(&mut self, name: &str) {
        self.monsters.insert(name.trim().to_lowercase());
    }

    pub fn include_monster(&mut self, name: &str) {
        self.monsters.remove(&name.trim().to_lowercase());
    }

    /// `name` must already be lower-cased; every caller sits behind the
    /// normalization boundary.
    pub fn is_item_excluded(&self, name: &str) -> bool {
        self.items.contains(name)
    }

    pub fn is_monster_excluded(&self, name: &str) -> bool {
        self.monsters.contains(name)
    }

    /// Excluded item names, sorted.
    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Excluded monster names, sorted.
    pub fn monsters(&self) -> impl Iterator<Item = &str> {
        self.monsters.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_excludes_nothing() {
        let exclusions = Exclusions::new();
        assert!(!exclusions.is_item_excluded("cheese"));
        assert!(!exclusions.is_monster_excluded("rat"));
    }

    #[test]
    fn test_exclude_and_include_item() {
        let mut exclusions = Exclusions::new();
        exclusions.exclude_item("cheese");
        assert!(exclusions.is_item_excluded("cheese"));

        exclusions.include_item("cheese");
        assert!(!exclusions.is_item_excluded("cheese"));
    }

    #[test]
    fn test_names_folded_to_lowercase() {
        let mut exclusions = Exclusions::new();
        exclusions.exclude_item(" Gold Coin ");
        assert!(exclusions.is_item_excluded("gold coin"));
    }

    #[test]
    fn test_monster_set_independent_of_items() {
        let mut exclusions = Exclusions::new();
        exclusions.exclude_monster("rat");
        assert!(exclusions.is_monster_excluded("rat"));
        assert!(!exclusions.is_item_excluded("rat"));
    }

    #[test]
    fn test_iteration_sorted() {
        let mut exclusions = Exclusions::new();
        exclusions.exclude_item("worm");
        exclusions.exclude_item("apple");
        let names: Vec<&str> = exclusions.items().collect();
        assert_eq!(names, vec!["apple", "worm"]);
    }
}

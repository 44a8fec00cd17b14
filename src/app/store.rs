use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::error::Result;

/// The persisted roster document: saved names, current selection, last used
/// month. Read and written whole-record, never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub names: Vec<String>,

    #[serde(default)]
    pub selected: Vec<String>,

    /// Last used month in `YYYY-MM` form.
    #[serde(default)]
    pub month: Option<String>,
}

pub struct RosterStore {
    roster: Roster,
    path: PathBuf,
}

impl RosterStore {
    /// Load the roster from disk, or start empty if not present.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    pub fn load_from(path: PathBuf) -> Self {
        let roster = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(roster) => roster,
                Err(e) => {
                    eprintln!("Failed to parse roster: {}. Starting empty.", e);
                    Roster::default()
                }
            },
            Err(_) => Roster::default(),
        };
        Self { roster, path }
    }

    /// Save the roster to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.roster)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Roster file path (cross-platform)
    pub fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("attendancepad");
        path.push("roster.json");
        path
    }

    pub fn names(&self) -> &[String] {
        &self.roster.names
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.roster.selected.iter().any(|n| n == name)
    }

    pub fn selected_count(&self) -> usize {
        self.roster.selected.len()
    }

    /// Add one or more names from a raw comma-separated entry. Each name is
    /// trimmed; empties are dropped; duplicates are silently ignored. Every
    /// entered name, new or existing, is also selected. Returns how many
    /// new names were stored.
    pub fn add_names(&mut self, raw: &str) -> usize {
        let mut added = 0;
        for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if !self.roster.names.iter().any(|n| n == name) {
                self.roster.names.push(name.to_string());
                added += 1;
            }
            if !self.roster.selected.iter().any(|n| n == name) {
                self.roster.selected.push(name.to_string());
            }
        }
        added
    }

    /// Remove every selected name from the roster and clear the selection.
    /// Returns the number of roster entries removed. The caller is
    /// responsible for confirming with the user first.
    pub fn delete_selected(&mut self) -> usize {
        if self.roster.selected.is_empty() {
            return 0;
        }
        let before = self.roster.names.len();
        let selected = std::mem::take(&mut self.roster.selected);
        self.roster.names.retain(|n| !selected.contains(n));
        before - self.roster.names.len()
    }

    pub fn toggle(&mut self, name: &str, on: bool) {
        if on {
            if !self.roster.selected.iter().any(|n| n == name) {
                self.roster.selected.push(name.to_string());
            }
        } else {
            self.roster.selected.retain(|n| n != name);
        }
    }

    pub fn select_all(&mut self) {
        self.roster.selected = self.roster.names.clone();
    }

    pub fn clear_selection(&mut self) {
        self.roster.selected.clear();
    }

    /// Selected names in roster order. Selection members that no longer
    /// resolve to a roster entry are skipped rather than rendered.
    pub fn selected_in_order(&self) -> Vec<String> {
        self.roster
            .names
            .iter()
            .filter(|n| self.is_selected(n))
            .cloned()
            .collect()
    }

    /// Parsed last-used month, if one was saved and is well-formed.
    pub fn month(&self) -> Option<(i32, u32)> {
        parse_month(self.roster.month.as_deref()?)
    }

    pub fn set_month(&mut self, year: i32, month: u32) {
        self.roster.month = Some(format!("{:04}-{:02}", year, month));
    }
}

/// Parse a `YYYY-MM` string into (year, 1-based month).
pub fn parse_month(s: &str) -> Option<(i32, u32)> {
    let (year, month) = s.split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    if (1..=12).contains(&month) {
        Some((year, month))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_store() -> RosterStore {
        RosterStore {
            roster: Roster::default(),
            path: PathBuf::from("unused"),
        }
    }

    #[test]
    fn test_add_names_batch_dedupes_and_selects() {
        let mut store = empty_store();
        let added = store.add_names("ali, ali, sara");
        assert_eq!(added, 2);
        assert_eq!(store.names(), &["ali".to_string(), "sara".to_string()]);
        assert!(store.is_selected("ali"));
        assert!(store.is_selected("sara"));
    }

    #[test]
    fn test_add_names_trims_and_drops_empties() {
        let mut store = empty_store();
        let added = store.add_names("  ali  ,, ,sara");
        assert_eq!(added, 2);
        assert_eq!(store.names(), &["ali".to_string(), "sara".to_string()]);
    }

    #[test]
    fn test_add_existing_name_reselects_it() {
        let mut store = empty_store();
        store.add_names("ali");
        store.clear_selection();
        let added = store.add_names("ali");
        assert_eq!(added, 0);
        assert_eq!(store.names().len(), 1);
        assert!(store.is_selected("ali"));
    }

    #[test]
    fn test_delete_selected_removes_from_both() {
        let mut store = empty_store();
        store.add_names("ali, sara, omar");
        store.clear_selection();
        store.toggle("sara", true);
        let removed = store.delete_selected();
        assert_eq!(removed, 1);
        assert_eq!(store.names(), &["ali".to_string(), "omar".to_string()]);
        assert_eq!(store.selected_count(), 0);
    }

    #[test]
    fn test_delete_with_empty_selection_is_noop() {
        let mut store = empty_store();
        store.add_names("ali");
        store.clear_selection();
        assert_eq!(store.delete_selected(), 0);
        assert_eq!(store.names().len(), 1);
    }

    #[test]
    fn test_select_all_and_clear() {
        let mut store = empty_store();
        store.add_names("ali, sara");
        store.clear_selection();
        store.select_all();
        assert_eq!(store.selected_count(), 2);
        store.clear_selection();
        assert_eq!(store.selected_count(), 0);
    }

    #[test]
    fn test_toggle_is_idempotent() {
        let mut store = empty_store();
        store.add_names("ali");
        store.toggle("ali", true);
        store.toggle("ali", true);
        assert_eq!(store.selected_count(), 1);
        store.toggle("ali", false);
        assert_eq!(store.selected_count(), 0);
    }

    // Nothing revalidates the selection when names vanish elsewhere, so
    // stale members are skipped at read time rather than treated as errors.
    #[test]
    fn test_stale_selection_members_are_skipped() {
        let mut store = empty_store();
        store.add_names("ali, sara");
        store.roster.selected.push("ghost".to_string());
        assert_eq!(
            store.selected_in_order(),
            vec!["ali".to_string(), "sara".to_string()]
        );
    }

    #[test]
    fn test_selected_in_order_follows_roster_order() {
        let mut store = empty_store();
        store.add_names("ali, sara, omar");
        store.clear_selection();
        store.toggle("omar", true);
        store.toggle("ali", true);
        assert_eq!(
            store.selected_in_order(),
            vec!["ali".to_string(), "omar".to_string()]
        );
    }

    #[test]
    fn test_batch_entry_to_generation_end_to_end() {
        let mut store = empty_store();
        store.add_names("ali, ali, sara");
        let names = store.selected_in_order();
        assert_eq!(names, vec!["ali", "sara"]);

        let pages = crate::app::sheet::generate(2024, 2, &names).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].rows.len(), 29);
        // 2024-02-02 is a Friday
        assert!(pages[0].rows[1].special);
    }

    #[test]
    fn test_month_round_trip() {
        let mut store = empty_store();
        assert_eq!(store.month(), None);
        store.set_month(2024, 2);
        assert_eq!(store.month(), Some((2024, 2)));
        assert_eq!(store.roster.month.as_deref(), Some("2024-02"));
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-02"), Some((2024, 2)));
        assert_eq!(parse_month("2024-12"), Some((2024, 12)));
        assert_eq!(parse_month("2024-13"), None);
        assert_eq!(parse_month("2024-00"), None);
        assert_eq!(parse_month("garbage"), None);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.json");

        let mut store = RosterStore::load_from(path.clone());
        store.add_names("ali, sara");
        store.set_month(2024, 2);
        store.save().unwrap();

        let loaded = RosterStore::load_from(path);
        assert_eq!(loaded.names(), &["ali".to_string(), "sara".to_string()]);
        assert!(loaded.is_selected("ali"));
        assert_eq!(loaded.month(), Some((2024, 2)));
    }

    #[test]
    fn test_load_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = RosterStore::load_from(dir.path().join("missing.json"));
        assert!(store.names().is_empty());
        assert_eq!(store.month(), None);
    }

    #[test]
    fn test_load_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.json");
        fs::write(&path, "{not json").unwrap();
        let store = RosterStore::load_from(path);
        assert!(store.names().is_empty());
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let json = r#"{"names": ["ali"]}"#;
        let roster: Roster = serde_json::from_str(json).unwrap();
        assert_eq!(roster.names, vec!["ali".to_string()]);
        assert!(roster.selected.is_empty());
        assert_eq!(roster.month, None);
    }
}

//! Row selection tied to the identity of the displayed data.
//!
//! Selections only make sense for the rows they were made on. Every page of
//! data gets a key derived from its row IDs; when the key changes (new page,
//! new filter, refetch with different rows) the selection is cleared.

use std::collections::BTreeSet;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Identity key for a set of rows, derived from their IDs in order.
#[must_use]
pub fn data_key<I, S>(ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = DefaultHasher::new();
    let mut count = 0_usize;
    for id in ids {
        id.as_ref().hash(&mut hasher);
        count += 1;
    }
    count.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Selected row IDs for one data set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    data_key: String,
    selected: BTreeSet<String>,
}

impl RowSelection {
    /// Empty selection for the data set identified by `data_key`.
    #[must_use]
    pub fn new(data_key: impl Into<String>) -> Self {
        Self {
            data_key: data_key.into(),
            selected: BTreeSet::new(),
        }
    }

    /// Rebuild a selection submitted for `previous_key`.
    ///
    /// The selection survives only if the data set is still the same, and
    /// only IDs that are actually on the page are kept.
    #[must_use]
    pub fn restore<I, S>(current_key: &str, previous_key: Option<&str>, ids: I, rows: &[S]) -> Self
    where
        I: IntoIterator<Item = String>,
        S: AsRef<str>,
    {
        let mut selection = Self::new(previous_key.unwrap_or_default());
        for id in ids {
            if rows.iter().any(|r| r.as_ref() == id) {
                selection.select(id);
            }
        }
        selection.sync_data(current_key);
        selection
    }

    #[must_use]
    pub fn data_key(&self) -> &str {
        &self.data_key
    }

    /// Adopt a new data identity. Clears the selection when it changed.
    /// Returns whether anything was cleared.
    pub fn sync_data(&mut self, data_key: &str) -> bool {
        if self.data_key == data_key {
            return false;
        }
        data_key.clone_into(&mut self.data_key);
        let had_selection = !self.selected.is_empty();
        self.selected.clear();
        had_selection
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.selected.insert(id.into());
    }

    pub fn deselect(&mut self, id: &str) {
        self.selected.remove(id);
    }

    /// Flip one row. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    /// Select every row, or clear when all are already selected.
    pub fn toggle_all<S: AsRef<str>>(&mut self, rows: &[S]) {
        if self.is_all_selected(rows) {
            self.selected.clear();
        } else {
            self.selected
                .extend(rows.iter().map(|r| r.as_ref().to_string()));
        }
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    #[must_use]
    pub fn is_all_selected<S: AsRef<str>>(&self, rows: &[S]) -> bool {
        !rows.is_empty() && rows.iter().all(|r| self.selected.contains(r.as_ref()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_key_depends_on_ids_and_order() {
        assert_eq!(data_key(["1", "2"]), data_key(["1", "2"]));
        assert_ne!(data_key(["1", "2"]), data_key(["2", "1"]));
        assert_ne!(data_key(["1", "2"]), data_key(["1", "2", "3"]));
        assert_ne!(data_key(["12"]), data_key(["1", "2"]));
    }

    #[test]
    fn test_selection_cleared_when_data_changes() {
        let page_one = data_key(["1", "2", "3"]);
        let page_two = data_key(["4", "5", "6"]);

        let mut selection = RowSelection::new(page_one.clone());
        selection.select("2");
        assert!(!selection.sync_data(&page_one));
        assert!(selection.is_selected("2"));

        assert!(selection.sync_data(&page_two));
        assert!(selection.is_empty());
        assert_eq!(selection.data_key(), page_two);
    }

    #[test]
    fn test_restore_keeps_only_rows_on_same_page() {
        let rows = ["1", "2", "3"];
        let key = data_key(rows);

        let selection = RowSelection::restore(
            &key,
            Some(&key),
            vec!["2".to_string(), "9".to_string()],
            &rows,
        );
        assert_eq!(selection.ids().collect::<Vec<_>>(), vec!["2"]);

        let stale = RowSelection::restore(&key, Some("other"), vec!["2".to_string()], &rows);
        assert!(stale.is_empty());

        let missing = RowSelection::restore(&key, None, vec!["2".to_string()], &rows);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_toggle_and_toggle_all() {
        let rows = ["a", "b"];
        let mut selection = RowSelection::new(data_key(rows));
        assert!(selection.toggle("a"));
        assert!(!selection.toggle("a"));

        selection.toggle_all(&rows);
        assert!(selection.is_all_selected(&rows));
        assert_eq!(selection.len(), 2);

        selection.toggle_all(&rows);
        assert!(selection.is_empty());
    }
}

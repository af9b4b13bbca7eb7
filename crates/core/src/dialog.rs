//! Per-feature dialog state.
//!
//! Each CRUD screen has at most one dialog open at a time. The open dialog and
//! the row it acts on are one value, so "editing without a row" cannot be
//! represented and closing a dialog always drops the selected row.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Which dialog is open, without its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogKind {
    Create,
    Update,
    Delete,
    BulkDelete,
}

impl DialogKind {
    /// URL value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::BulkDelete => "bulk-delete",
        }
    }

    /// Whether this dialog acts on a single existing row.
    #[must_use]
    pub const fn needs_row(self) -> bool {
        matches!(self, Self::Update | Self::Delete)
    }
}

impl fmt::Display for DialogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown dialog name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dialog: {0}")]
pub struct UnknownDialog(pub String);

impl FromStr for DialogKind {
    type Err = UnknownDialog;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" | "edit" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "bulk-delete" => Ok(Self::BulkDelete),
            other => Err(UnknownDialog(other.to_string())),
        }
    }
}

/// The open dialog together with the row(s) it acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState<R> {
    Closed,
    Creating,
    Editing(R),
    Deleting(R),
    BulkDeleting(Vec<R>),
}

impl<R> Default for DialogState<R> {
    fn default() -> Self {
        Self::Closed
    }
}

impl<R> DialogState<R> {
    /// Build from a requested kind and whatever rows could be resolved.
    ///
    /// Requests that lack the rows they need resolve to `Closed`.
    #[must_use]
    pub fn resolve(kind: Option<DialogKind>, row: Option<R>, rows: Vec<R>) -> Self {
        match (kind, row) {
            (Some(DialogKind::Create), _) => Self::Creating,
            (Some(DialogKind::Update), Some(row)) => Self::Editing(row),
            (Some(DialogKind::Delete), Some(row)) => Self::Deleting(row),
            (Some(DialogKind::BulkDelete), _) if !rows.is_empty() => Self::BulkDeleting(rows),
            _ => Self::Closed,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> Option<DialogKind> {
        match self {
            Self::Closed => None,
            Self::Creating => Some(DialogKind::Create),
            Self::Editing(_) => Some(DialogKind::Update),
            Self::Deleting(_) => Some(DialogKind::Delete),
            Self::BulkDeleting(_) => Some(DialogKind::BulkDelete),
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// The row being edited or deleted.
    #[must_use]
    pub const fn current_row(&self) -> Option<&R> {
        match self {
            Self::Editing(row) | Self::Deleting(row) => Some(row),
            _ => None,
        }
    }

    /// Rows affected by the open dialog.
    #[must_use]
    pub fn rows(&self) -> &[R] {
        match self {
            Self::Editing(row) | Self::Deleting(row) => std::slice::from_ref(row),
            Self::BulkDeleting(rows) => rows,
            Self::Closed | Self::Creating => &[],
        }
    }

    pub fn open_create(&mut self) {
        *self = Self::Creating;
    }

    pub fn open_edit(&mut self, row: R) {
        *self = Self::Editing(row);
    }

    pub fn open_delete(&mut self, row: R) {
        *self = Self::Deleting(row);
    }

    pub fn open_bulk_delete(&mut self, rows: Vec<R>) {
        *self = if rows.is_empty() {
            Self::Closed
        } else {
            Self::BulkDeleting(rows)
        };
    }

    /// Close whatever is open and hand back the previous state.
    pub fn close(&mut self) -> Self {
        std::mem::replace(self, Self::Closed)
    }

    /// Map the row type, keeping the dialog.
    pub fn map<U>(self, mut f: impl FnMut(R) -> U) -> DialogState<U> {
        match self {
            Self::Closed => DialogState::Closed,
            Self::Creating => DialogState::Creating,
            Self::Editing(row) => DialogState::Editing(f(row)),
            Self::Deleting(row) => DialogState::Deleting(f(row)),
            Self::BulkDeleting(rows) => DialogState::BulkDeleting(rows.into_iter().map(f).collect()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_url_value() {
        for kind in [
            DialogKind::Create,
            DialogKind::Update,
            DialogKind::Delete,
            DialogKind::BulkDelete,
        ] {
            assert_eq!(kind.as_str().parse::<DialogKind>().unwrap(), kind);
        }
        assert!("drawer".parse::<DialogKind>().is_err());
    }

    #[test]
    fn test_resolve_requires_rows() {
        assert_eq!(
            DialogState::resolve(Some(DialogKind::Update), None::<u8>, vec![]),
            DialogState::Closed
        );
        assert_eq!(
            DialogState::resolve(Some(DialogKind::Delete), Some(3), vec![]),
            DialogState::Deleting(3)
        );
        assert_eq!(
            DialogState::resolve(Some(DialogKind::BulkDelete), None, vec![1, 2]),
            DialogState::BulkDeleting(vec![1, 2])
        );
        assert_eq!(
            DialogState::resolve(Some(DialogKind::BulkDelete), None::<u8>, vec![]),
            DialogState::Closed
        );
        assert_eq!(
            DialogState::resolve(Some(DialogKind::Create), None::<u8>, vec![]),
            DialogState::Creating
        );
        assert_eq!(DialogState::resolve(None, Some(1), vec![]), DialogState::Closed);
    }

    #[test]
    fn test_close_clears_current_row() {
        let mut state = DialogState::Closed;
        state.open_delete("row-7");
        assert_eq!(state.current_row(), Some(&"row-7"));
        assert_eq!(state.kind(), Some(DialogKind::Delete));

        let previous = state.close();
        assert_eq!(previous, DialogState::Deleting("row-7"));
        assert!(!state.is_open());
        assert_eq!(state.current_row(), None);
        assert!(state.rows().is_empty());
    }

    #[test]
    fn test_opening_replaces_previous_dialog() {
        let mut state = DialogState::Creating;
        state.open_edit(1);
        assert_eq!(state, DialogState::Editing(1));
        state.open_bulk_delete(vec![]);
        assert_eq!(state, DialogState::Closed);
    }

    #[test]
    fn test_map_preserves_dialog() {
        let state = DialogState::BulkDeleting(vec![1, 2]).map(|n| n * 10);
        assert_eq!(state.rows(), &[10, 20]);
    }
}

//! Controlled table state shapes.

use serde::{Deserialize, Serialize};

/// Page position of a table. `page_index` is 0-based like the table model;
/// the URL carries the 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page_index: u32,
    pub page_size: u32,
}

impl Pagination {
    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page_index + 1
    }

    /// Same page size, first page.
    #[must_use]
    pub const fn first_page(self) -> Self {
        Self {
            page_index: 0,
            page_size: self.page_size,
        }
    }

    /// Same page size, given 1-based page.
    #[must_use]
    pub const fn with_page(self, page: u32) -> Self {
        Self {
            page_index: page.saturating_sub(1),
            page_size: self.page_size,
        }
    }
}

/// A filter on one column. Multiple values match any of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub id: String,
    pub value: Vec<String>,
}

impl ColumnFilter {
    #[must_use]
    pub fn new(id: &str, value: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            value: value.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Sort order on one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortColumn {
    pub id: String,
    pub desc: bool,
}

impl SortColumn {
    #[must_use]
    pub fn asc(id: &str) -> Self {
        Self {
            id: id.to_string(),
            desc: false,
        }
    }

    #[must_use]
    pub fn desc(id: &str) -> Self {
        Self {
            id: id.to_string(),
            desc: true,
        }
    }

    /// `asc` or `desc`.
    #[must_use]
    pub const fn direction(&self) -> &'static str {
        if self.desc { "desc" } else { "asc" }
    }
}

/// Everything about a table that lives in the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableUrlState {
    pub pagination: Pagination,
    pub global_filter: String,
    pub column_filters: Vec<ColumnFilter>,
    pub sorting: Vec<SortColumn>,
}

impl TableUrlState {
    /// Values of the filter on `column`, empty when unfiltered.
    #[must_use]
    pub fn filter_values(&self, column: &str) -> &[String] {
        self.column_filters
            .iter()
            .find(|f| f.id == column)
            .map_or(&[], |f| f.value.as_slice())
    }

    /// Sort order on `column`, if the table is sorted by it.
    #[must_use]
    pub fn sort_for(&self, column: &str) -> Option<&SortColumn> {
        self.sorting.iter().find(|s| s.id == column)
    }

    /// Whether any filter (global or per-column) is active.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.global_filter.is_empty() || !self.column_filters.is_empty()
    }
}

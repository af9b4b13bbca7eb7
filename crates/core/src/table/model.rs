//! Table row model for server-backed and in-memory tables.
//!
//! Server-backed (manual) tables receive exactly one page from the backend and
//! take the page count from its paginator info. In-memory (client) tables get
//! every row and run filter, sort and paginate locally. Both consume the same
//! [`TableUrlState`].

use std::cmp::Ordering;

use crate::pagination::{PaginatorInfo, page_count};

use super::selection::data_key;
use super::state::TableUrlState;

/// Where row processing happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingMode {
    /// The backend filters, sorts and paginates.
    Manual,
    /// All rows are loaded; filtering, sorting and pagination are local.
    Client,
}

/// A row that can be displayed, filtered and sorted by column.
pub trait TableRow {
    /// Stable row identifier.
    fn row_id(&self) -> String;

    /// Display value of `column`.
    fn cell(&self, column: &str) -> Option<String>;
}

/// The rows visible on the current page plus page metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableModel<R> {
    rows: Vec<R>,
    total: u32,
    page_count: u32,
    data_key: String,
}

impl<R: TableRow> TableModel<R> {
    /// One backend page.
    #[must_use]
    pub fn manual(rows: Vec<R>, info: &PaginatorInfo) -> Self {
        Self::from_rows(rows, info.total, info.page_count())
    }

    /// Every row; filter, sort and paginate according to `state`.
    ///
    /// `searchable` lists the columns the global filter looks at.
    #[must_use]
    pub fn client(rows: Vec<R>, state: &TableUrlState, searchable: &[&str]) -> Self {
        let needle = state.global_filter.to_lowercase();
        let mut rows: Vec<R> = rows
            .into_iter()
            .filter(|row| matches_global(row, &needle, searchable))
            .filter(|row| {
                state.column_filters.iter().all(|filter| {
                    row.cell(&filter.id).is_some_and(|value| {
                        filter.value.iter().any(|v| v.eq_ignore_ascii_case(&value))
                    })
                })
            })
            .collect();

        if let Some(sort) = state.sorting.first() {
            rows.sort_by(|a, b| {
                let ordering = compare_cells(a.cell(&sort.id), b.cell(&sort.id));
                if sort.desc { ordering.reverse() } else { ordering }
            });
        }

        let total = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        let size = state.pagination.page_size;
        let pages = page_count(total, size);
        let start = (state.pagination.page_index as usize).saturating_mul(size as usize);
        let page: Vec<R> = rows.into_iter().skip(start).take(size as usize).collect();

        Self::from_rows(page, total, pages)
    }

    /// Build for either mode.
    ///
    /// `info` is required in manual mode; without it the rows are treated
    /// as a single page.
    #[must_use]
    pub fn build(
        mode: ProcessingMode,
        rows: Vec<R>,
        info: Option<&PaginatorInfo>,
        state: &TableUrlState,
        searchable: &[&str],
    ) -> Self {
        match (mode, info) {
            (ProcessingMode::Manual, Some(info)) => Self::manual(rows, info),
            (ProcessingMode::Manual, None) => {
                let total = u32::try_from(rows.len()).unwrap_or(u32::MAX);
                Self::from_rows(rows, total, u32::from(total > 0))
            }
            (ProcessingMode::Client, _) => Self::client(rows, state, searchable),
        }
    }

    fn from_rows(rows: Vec<R>, total: u32, page_count: u32) -> Self {
        let data_key = data_key(rows.iter().map(TableRow::row_id));
        Self {
            rows,
            total,
            page_count,
            data_key,
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }

    /// Number of rows across all pages.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub const fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Identity of the visible rows, see [`data_key`].
    #[must_use]
    pub fn data_key(&self) -> &str {
        &self.data_key
    }

    #[must_use]
    pub fn row_ids(&self) -> Vec<String> {
        self.rows.iter().map(TableRow::row_id).collect()
    }
}

fn matches_global<R: TableRow>(row: &R, needle: &str, searchable: &[&str]) -> bool {
    needle.is_empty()
        || searchable.iter().any(|column| {
            row.cell(column)
                .is_some_and(|value| value.to_lowercase().contains(needle))
        })
}

fn compare_cells(a: Option<String>, b: Option<String>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.to_lowercase().cmp(&b.to_lowercase()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::state::{ColumnFilter, Pagination, SortColumn};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Depot {
        id: &'static str,
        name: &'static str,
        status: &'static str,
        bays: u32,
    }

    impl TableRow for Depot {
        fn row_id(&self) -> String {
            self.id.to_string()
        }

        fn cell(&self, column: &str) -> Option<String> {
            match column {
                "name" => Some(self.name.to_string()),
                "status" => Some(self.status.to_string()),
                "bays" => Some(self.bays.to_string()),
                _ => None,
            }
        }
    }

    fn depots() -> Vec<Depot> {
        vec![
            Depot { id: "1", name: "Harbor", status: "active", bays: 12 },
            Depot { id: "2", name: "airport", status: "closed", bays: 3 },
            Depot { id: "3", name: "Rail Yard", status: "active", bays: 40 },
            Depot { id: "4", name: "Hub North", status: "active", bays: 7 },
            Depot { id: "5", name: "Hub South", status: "suspended", bays: 7 },
        ]
    }

    fn state(page_index: u32, page_size: u32) -> TableUrlState {
        TableUrlState {
            pagination: Pagination { page_index, page_size },
            global_filter: String::new(),
            column_filters: vec![],
            sorting: vec![],
        }
    }

    fn ids(model: &TableModel<Depot>) -> Vec<&'static str> {
        model.rows().iter().map(|d| d.id).collect()
    }

    #[test]
    fn test_manual_mode_takes_page_count_from_server() {
        let info = PaginatorInfo {
            count: 2,
            current_page: 1,
            has_more_pages: true,
            last_item: Some(2),
            per_page: 10,
            total: 47,
        };
        let model = TableModel::build(
            ProcessingMode::Manual,
            depots().into_iter().take(2).collect(),
            Some(&info),
            &state(0, 10),
            &["name"],
        );
        assert_eq!(model.page_count(), 5);
        assert_eq!(model.total(), 47);
        assert_eq!(ids(&model), vec!["1", "2"]);
    }

    #[test]
    fn test_client_mode_paginates_locally() {
        let model = TableModel::client(depots(), &state(1, 2), &["name"]);
        assert_eq!(model.page_count(), 3);
        assert_eq!(model.total(), 5);
        assert_eq!(ids(&model), vec!["3", "4"]);
    }

    #[test]
    fn test_client_mode_filters_and_sorts() {
        let mut state = state(0, 10);
        state.global_filter = "hub".to_string();
        state.sorting = vec![SortColumn::desc("name")];
        let model = TableModel::client(depots(), &state, &["name"]);
        assert_eq!(ids(&model), vec!["5", "4"]);

        state.global_filter.clear();
        state.column_filters = vec![ColumnFilter::new("status", &["ACTIVE"])];
        state.sorting = vec![SortColumn::asc("bays")];
        let model = TableModel::client(depots(), &state, &["name"]);
        assert_eq!(ids(&model), vec!["4", "1", "3"]);
    }

    #[test]
    fn test_client_sort_is_case_insensitive_text() {
        let mut state = state(0, 10);
        state.sorting = vec![SortColumn::asc("name")];
        let model = TableModel::client(depots(), &state, &["name"]);
        assert_eq!(ids(&model), vec!["2", "1", "4", "5", "3"]);
    }

    #[test]
    fn test_data_key_changes_with_page() {
        let first = TableModel::client(depots(), &state(0, 2), &["name"]);
        let second = TableModel::client(depots(), &state(1, 2), &["name"]);
        assert_ne!(first.data_key(), second.data_key());
        assert_eq!(first.data_key(), data_key(["1", "2"]));
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let model = TableModel::client(depots(), &state(9, 2), &["name"]);
        assert!(model.rows().is_empty());
        assert_eq!(model.page_count(), 3);
    }
}

//! Controlled getters and setters bound to the URL.
//!
//! [`TableStateSync`] exposes the table state the way a controlled table model
//! expects it: a getter per concern and a setter taking either a new value or
//! an update function. Setters never mutate anything; they return the
//! [`Navigation`] that would put the new state into the URL.

use std::fmt;

use super::params::{SearchParamConfig, SearchParams};
use super::state::{ColumnFilter, Pagination, SortColumn, TableUrlState};

/// How a navigation touches browser history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum History {
    Push,
    /// Table interactions replace the current entry so that every page click
    /// or keystroke does not add a history entry.
    Replace,
}

impl History {
    /// `push` or `replace`, as rendered into `data-nav` attributes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Replace => "replace",
        }
    }
}

/// A pending URL change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub path: String,
    pub params: SearchParams,
    pub history: History,
}

impl Navigation {
    /// Path plus query string.
    #[must_use]
    pub fn href(&self) -> String {
        self.params.href(&self.path)
    }
}

/// A new value, or a function of the previous one.
pub enum Updater<T> {
    Value(T),
    Map(Box<dyn FnOnce(T) -> T + Send>),
}

impl<T> Updater<T> {
    /// Build an updater from a function of the previous value.
    pub fn map(f: impl FnOnce(T) -> T + Send + 'static) -> Self {
        Self::Map(Box::new(f))
    }

    /// Resolve against the previous value.
    pub fn apply(self, previous: T) -> T {
        match self {
            Self::Value(value) => value,
            Self::Map(f) => f(previous),
        }
    }
}

impl<T> From<T> for Updater<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Updater<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Map(_) => f.write_str("Map(..)"),
        }
    }
}

/// Bidirectional mapping between a table and the current URL.
#[derive(Debug, Clone)]
pub struct TableStateSync<'a> {
    path: String,
    config: &'a SearchParamConfig,
    params: SearchParams,
    state: TableUrlState,
}

impl<'a> TableStateSync<'a> {
    /// Bind to the URL `path?params`.
    #[must_use]
    pub fn new(path: &str, config: &'a SearchParamConfig, params: SearchParams) -> Self {
        let state = config.decode(&params);
        Self {
            path: path.to_string(),
            config,
            params,
            state,
        }
    }

    /// Bind to `path` with a raw query string.
    #[must_use]
    pub fn from_query(path: &str, config: &'a SearchParamConfig, query: &str) -> Self {
        Self::new(path, config, SearchParams::parse(query))
    }

    #[must_use]
    pub const fn state(&self) -> &TableUrlState {
        &self.state
    }

    #[must_use]
    pub const fn params(&self) -> &SearchParams {
        &self.params
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn config(&self) -> &SearchParamConfig {
        self.config
    }

    #[must_use]
    pub const fn pagination(&self) -> Pagination {
        self.state.pagination
    }

    #[must_use]
    pub fn global_filter(&self) -> &str {
        &self.state.global_filter
    }

    #[must_use]
    pub fn column_filters(&self) -> &[ColumnFilter] {
        &self.state.column_filters
    }

    #[must_use]
    pub fn sorting(&self) -> &[SortColumn] {
        &self.state.sorting
    }

    /// Move to another page or page size.
    pub fn set_pagination(&self, update: impl Into<Updater<Pagination>>) -> Navigation {
        let mut state = self.state.clone();
        state.pagination = update.into().apply(state.pagination);
        self.navigate(&state)
    }

    /// Change the free-text search. Returns to the first page.
    pub fn set_global_filter(&self, update: impl Into<Updater<String>>) -> Navigation {
        let mut state = self.state.clone();
        state.global_filter = update.into().apply(state.global_filter);
        state.pagination = state.pagination.first_page();
        self.navigate(&state)
    }

    /// Change the column filters. Returns to the first page.
    pub fn set_column_filters(&self, update: impl Into<Updater<Vec<ColumnFilter>>>) -> Navigation {
        let mut state = self.state.clone();
        state.column_filters = update.into().apply(state.column_filters);
        state.pagination = state.pagination.first_page();
        self.navigate(&state)
    }

    /// Change the sort order.
    pub fn set_sorting(&self, update: impl Into<Updater<Vec<SortColumn>>>) -> Navigation {
        let mut state = self.state.clone();
        state.sorting = update.into().apply(state.sorting);
        self.navigate(&state)
    }

    /// Cycle sorting on `column`: unsorted -> ascending -> descending -> unsorted.
    #[must_use]
    pub fn toggle_sort(&self, column: &str) -> Navigation {
        let next = match self.state.sort_for(column) {
            None => vec![SortColumn::asc(column)],
            Some(s) if !s.desc => vec![SortColumn::desc(column)],
            Some(_) => Vec::new(),
        };
        self.set_sorting(next)
    }

    /// Drop every filter, keeping page size and sorting.
    #[must_use]
    pub fn reset_filters(&self) -> Navigation {
        let mut state = self.state.clone();
        state.global_filter.clear();
        state.column_filters.clear();
        state.pagination = state.pagination.first_page();
        self.navigate(&state)
    }

    /// Same table state, with extra non-table parameters.
    #[must_use]
    pub fn with_param(&self, key: &str, value: Option<String>) -> Navigation {
        let mut params = self.params.clone();
        params.set(key, value);
        Navigation {
            path: self.path.clone(),
            params,
            history: History::Push,
        }
    }

    /// Change a display parameter the table owns outside [`TableUrlState`],
    /// such as visible columns. Replaces history like the table setters.
    #[must_use]
    pub fn set_param(&self, key: &str, value: Option<String>) -> Navigation {
        Navigation {
            history: History::Replace,
            ..self.with_param(key, value)
        }
    }

    fn navigate(&self, state: &TableUrlState) -> Navigation {
        let mut params = self.params.clone();
        self.config.encode(state, &mut params);
        Navigation {
            path: self.path.clone(),
            params,
            history: History::Replace,
        }
    }
}

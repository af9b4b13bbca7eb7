//! Search-param configuration and the URL <-> state codec.
//!
//! Decoding never fails: unparsable or out-of-range values fall back to the
//! configured defaults. Encoding merges into the existing query, keeps
//! parameters it does not own and omits values equal to their default.

use url::form_urlencoded;

use super::state::{ColumnFilter, Pagination, SortColumn, TableUrlState};

/// Page size used when the URL does not name a valid one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page sizes offered by the pagination control.
pub const PAGE_SIZES: [u32; 5] = [10, 20, 30, 40, 50];

/// Separator between multiple values of one column filter.
const VALUE_SEPARATOR: &str = ",";

/// Separator between column and direction in the sort parameter.
const SORT_SEPARATOR: char = '.';

/// How the free-text search maps onto the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalFilterConfig {
    /// Query parameter name.
    pub key: String,
    /// Disabled tables ignore and never write the parameter.
    pub enabled: bool,
    /// Trim surrounding whitespace in both directions.
    pub trim: bool,
}

impl Default for GlobalFilterConfig {
    fn default() -> Self {
        Self {
            key: "search".to_string(),
            enabled: true,
            trim: true,
        }
    }
}

/// Maps one table column filter onto a query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilterConfig {
    pub column_id: String,
    pub key: String,
}

/// Which query parameters a table owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParamConfig {
    pub page_key: String,
    pub page_size_key: String,
    pub default_page_size: u32,
    pub page_sizes: Vec<u32>,
    pub global_filter: GlobalFilterConfig,
    pub column_filters: Vec<ColumnFilterConfig>,
    pub sort_key: String,
    /// Columns accepted in the sort parameter. Empty disables sorting.
    pub sortable: Vec<String>,
}

impl Default for SearchParamConfig {
    fn default() -> Self {
        Self {
            page_key: "page".to_string(),
            page_size_key: "per_page".to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            page_sizes: PAGE_SIZES.to_vec(),
            global_filter: GlobalFilterConfig::default(),
            column_filters: Vec::new(),
            sort_key: "order_by".to_string(),
            sortable: Vec::new(),
        }
    }
}

impl SearchParamConfig {
    /// Map `column_id` onto the query parameter `key`.
    #[must_use]
    pub fn column_filter(mut self, column_id: &str, key: &str) -> Self {
        self.column_filters.push(ColumnFilterConfig {
            column_id: column_id.to_string(),
            key: key.to_string(),
        });
        self
    }

    /// Replace the global filter mapping.
    #[must_use]
    pub fn global_filter(mut self, config: GlobalFilterConfig) -> Self {
        self.global_filter = config;
        self
    }

    /// Accept these columns in the sort parameter.
    #[must_use]
    pub fn sortable(mut self, columns: &[&str]) -> Self {
        self.sortable = columns.iter().map(ToString::to_string).collect();
        self
    }

    /// Use a different default page size.
    #[must_use]
    pub fn default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        if !self.page_sizes.contains(&size) {
            self.page_sizes.push(size);
            self.page_sizes.sort_unstable();
        }
        self
    }

    /// Every query parameter this table owns.
    #[must_use]
    pub fn owned_keys(&self) -> Vec<&str> {
        let mut keys = vec![
            self.page_key.as_str(),
            self.page_size_key.as_str(),
            self.sort_key.as_str(),
        ];
        if self.global_filter.enabled {
            keys.push(self.global_filter.key.as_str());
        }
        keys.extend(self.column_filters.iter().map(|c| c.key.as_str()));
        keys
    }

    /// Decode table state from query parameters.
    #[must_use]
    pub fn decode(&self, params: &SearchParams) -> TableUrlState {
        let page = params
            .get(&self.page_key)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);

        let page_size = params
            .get(&self.page_size_key)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|s| self.page_sizes.contains(s))
            .unwrap_or(self.default_page_size);

        let global_filter = if self.global_filter.enabled {
            params
                .get(&self.global_filter.key)
                .map(|v| self.normalize_search(v))
                .unwrap_or_default()
        } else {
            String::new()
        };

        let column_filters = self
            .column_filters
            .iter()
            .filter_map(|config| {
                let values = split_values(params.get(&config.key)?);
                (!values.is_empty()).then(|| ColumnFilter {
                    id: config.column_id.clone(),
                    value: values,
                })
            })
            .collect();

        let sorting = params
            .get(&self.sort_key)
            .and_then(|v| self.parse_sort(v))
            .into_iter()
            .collect();

        TableUrlState {
            pagination: Pagination {
                page_index: page - 1,
                page_size,
            },
            global_filter,
            column_filters,
            sorting,
        }
    }

    /// Merge `state` into `params`.
    pub fn encode(&self, state: &TableUrlState, params: &mut SearchParams) {
        let page = state.pagination.page();
        params.set(&self.page_key, (page > 1).then(|| page.to_string()));

        let size = state.pagination.page_size;
        params.set(
            &self.page_size_key,
            (size != self.default_page_size).then(|| size.to_string()),
        );

        if self.global_filter.enabled {
            let search = self.normalize_search(&state.global_filter);
            params.set(
                &self.global_filter.key,
                (!search.is_empty()).then_some(search),
            );
        }

        for config in &self.column_filters {
            let value = state
                .filter_values(&config.column_id)
                .iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .collect::<Vec<_>>()
                .join(VALUE_SEPARATOR);
            params.set(&config.key, (!value.is_empty()).then_some(value));
        }

        let sort = state
            .sorting
            .first()
            .filter(|s| self.sortable.contains(&s.id))
            .map(|s| format!("{}{SORT_SEPARATOR}{}", s.id, s.direction()));
        params.set(&self.sort_key, sort);
    }

    fn normalize_search(&self, value: &str) -> String {
        if self.global_filter.trim {
            value.trim().to_string()
        } else {
            value.to_string()
        }
    }

    fn parse_sort(&self, value: &str) -> Option<SortColumn> {
        let (column, direction) = value
            .rsplit_once(SORT_SEPARATOR)
            .unwrap_or((value, "asc"));
        if !self.sortable.iter().any(|s| s == column) {
            return None;
        }
        match direction {
            "asc" => Some(SortColumn::asc(column)),
            "desc" => Some(SortColumn::desc(column)),
            _ => None,
        }
    }
}

fn split_values(raw: &str) -> Vec<String> {
    raw.split(VALUE_SEPARATOR)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// An ordered query-string map.
///
/// Keeps the original order of parameters so that merged navigations only
/// change what they touch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    /// Parse a raw query string (without the leading `?`).
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// First value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in order. Repeated keys come from multi-value
    /// form controls such as checkboxes.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set `key` to `value`, or remove it when `value` is `None`.
    ///
    /// An existing key keeps its position; a new key is appended.
    pub fn set(&mut self, key: &str, value: Option<String>) {
        match value {
            Some(value) => {
                if let Some(pos) = self.pairs.iter().position(|(k, _)| k == key) {
                    let mut seen = false;
                    self.pairs.retain(|(k, _)| {
                        if k != key {
                            return true;
                        }
                        let keep = !seen;
                        seen = true;
                        keep
                    });
                    if let Some(pair) = self.pairs.get_mut(pos) {
                        pair.1 = value;
                    }
                } else {
                    self.pairs.push((key.to_string(), value));
                }
            }
            None => self.pairs.retain(|(k, _)| k != key),
        }
    }

    /// Copy without the given keys.
    #[must_use]
    pub fn without(&self, keys: &[&str]) -> Self {
        Self {
            pairs: self
                .pairs
                .iter()
                .filter(|(k, _)| !keys.contains(&k.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Copy with `key` set.
    #[must_use]
    pub fn with(&self, key: &str, value: impl Into<String>) -> Self {
        let mut params = self.clone();
        params.set(key, Some(value.into()));
        params
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as a query string (without the leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.pairs {
            serializer.append_pair(k, v);
        }
        serializer.finish()
    }

    /// `path` with this query appended, if any.
    #[must_use]
    pub fn href(&self, path: &str) -> String {
        if self.pairs.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", self.to_query_string())
        }
    }
}

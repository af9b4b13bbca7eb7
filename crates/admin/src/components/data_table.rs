//! Data table component.
//!
//! [`DataTableConfig`] describes a table once per resource. [`DataTableView`]
//! is the per-request render model: every link in it is a URL produced by
//! [`TableStateSync`], so sorting, filtering, paging and column visibility all
//! round-trip through the query string.

use freightdesk_core::table::{
    ColumnFilter, RowSelection, SEARCH_DEBOUNCE, SearchParamConfig, TableModel, TableRow,
    TableStateSync, Updater,
};
use serde::Serialize;

use super::link::Link;
use super::pagination::PaginationView;

/// Query parameter listing the visible columns, comma separated.
pub const COLUMNS_PARAM: &str = "cols";

/// Query parameters that open dialogs; stripped from every table link.
pub const DIALOG_PARAMS: &[&str] = &["dialog", "id", "selected", "data_key"];

/// Column definition for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct TableColumn {
    /// Unique key for the column; also the `TableRow::cell` key.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Whether the column is sortable.
    pub sortable: bool,
    /// Whether the column is visible by default.
    pub default_visible: bool,
}

impl TableColumn {
    /// Create a new sortable column.
    #[must_use]
    pub fn sortable(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sortable: true,
            default_visible: true,
        }
    }

    /// Create a new non-sortable column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sortable: false,
            default_visible: true,
        }
    }

    /// Set whether the column is visible by default.
    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.default_visible = visible;
        self
    }
}

/// Filter type for data tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// At most one option active.
    Select,
    /// Any number of options active; rows match any of them.
    MultiSelect,
}

/// Column filter definition for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct TableFilter {
    /// Column the filter applies to; also its query parameter.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Filter type.
    pub filter_type: FilterType,
    /// Available options.
    pub options: Vec<FilterOption>,
}

/// Option for select/multiselect filters.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOption {
    /// Option value.
    pub value: String,
    /// Display label.
    pub label: String,
}

impl FilterOption {
    /// Create a new filter option.
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

impl TableFilter {
    /// Create a select filter.
    #[must_use]
    pub fn select(key: &str, label: &str, options: Vec<FilterOption>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            filter_type: FilterType::Select,
            options,
        }
    }

    /// Create a multi-select filter.
    #[must_use]
    pub fn multi_select(key: &str, label: &str, options: Vec<FilterOption>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            filter_type: FilterType::MultiSelect,
            options,
        }
    }
}

/// Bulk action definition for data tables.
#[derive(Debug, Clone, Serialize)]
pub struct BulkAction {
    /// Action key; the dialog it opens.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Phosphor icon class.
    pub icon: String,
    /// Whether this is a destructive action.
    pub destructive: bool,
}

impl BulkAction {
    /// Create a new bulk action.
    #[must_use]
    pub fn new(key: &str, label: &str, icon: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            icon: icon.to_string(),
            destructive: false,
        }
    }

    /// Mark this action as destructive.
    #[must_use]
    pub const fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Filter definitions.
    pub filters: Vec<TableFilter>,
    /// Bulk action definitions.
    pub bulk_actions: Vec<BulkAction>,
    /// Search placeholder text.
    pub search_placeholder: String,
    /// Icon for empty state.
    pub empty_icon: String,
    /// Title for empty state.
    pub empty_title: String,
    /// Description for empty state.
    pub empty_description: Option<String>,
    /// Whether to show bulk action bar.
    pub has_bulk_actions: bool,
    /// Whether to show filter panel.
    pub has_filters: bool,
    /// Whether to show column picker.
    pub has_column_picker: bool,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            filters: vec![],
            bulk_actions: vec![],
            search_placeholder: "Search...".to_string(),
            empty_icon: "ph-list".to_string(),
            empty_title: "No items found".to_string(),
            empty_description: None,
            has_bulk_actions: false,
            has_filters: false,
            has_column_picker: true,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, filter: TableFilter) -> Self {
        self.has_filters = true;
        self.filters.push(filter);
        self
    }

    /// Add a bulk action.
    #[must_use]
    pub fn bulk_action(mut self, action: BulkAction) -> Self {
        self.has_bulk_actions = true;
        self.bulk_actions.push(action);
        self
    }

    /// Set search placeholder.
    #[must_use]
    pub fn search_placeholder(mut self, placeholder: &str) -> Self {
        self.search_placeholder = placeholder.to_string();
        self
    }

    /// Set empty state configuration.
    #[must_use]
    pub fn empty_state(mut self, icon: &str, title: &str, description: Option<&str>) -> Self {
        self.empty_icon = icon.to_string();
        self.empty_title = title.to_string();
        self.empty_description = description.map(ToString::to_string);
        self
    }

    /// Query-parameter mapping for this table.
    ///
    /// Sortable columns are accepted in `order_by`; each filter owns the
    /// query parameter named after its column.
    #[must_use]
    pub fn search_params(&self) -> SearchParamConfig {
        let sortable: Vec<&str> = self
            .columns
            .iter()
            .filter(|c| c.sortable)
            .map(|c| c.key.as_str())
            .collect();
        self.filters.iter().fold(
            SearchParamConfig::default().sortable(&sortable),
            |config, filter| config.column_filter(&filter.key, &filter.key),
        )
    }

    /// Columns to display given the `cols` parameter.
    ///
    /// Unknown keys are ignored; an empty or missing list falls back to the
    /// default columns.
    #[must_use]
    pub fn visible_columns(&self, cols: Option<&str>) -> Vec<&TableColumn> {
        let requested: Vec<&str> = cols
            .map(|c| c.split(',').map(str::trim).filter(|k| !k.is_empty()).collect())
            .unwrap_or_default();
        let visible: Vec<&TableColumn> = self
            .columns
            .iter()
            .filter(|c| requested.contains(&c.key.as_str()))
            .collect();
        if visible.is_empty() {
            self.columns.iter().filter(|c| c.default_visible).collect()
        } else {
            visible
        }
    }
}

/// Sortable header cell.
#[derive(Debug, Clone, Serialize)]
pub struct HeaderView {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    /// `asc`, `desc`, or `None` when not sorted by this column.
    pub sort: Option<&'static str>,
    /// Link cycling the sort on this column.
    pub sort_link: Link,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowView {
    pub id: String,
    pub cells: Vec<String>,
    pub selected: bool,
    pub edit_href: String,
    pub delete_href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterOptionView {
    pub label: String,
    pub active: bool,
    /// Link toggling this option.
    pub link: Link,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterView {
    pub key: String,
    pub label: String,
    pub active_count: usize,
    pub options: Vec<FilterOptionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnToggleView {
    pub label: String,
    pub visible: bool,
    pub link: Link,
}

/// Hidden input carried by the search and bulk forms.
#[derive(Debug, Clone, Serialize)]
pub struct HiddenParam {
    pub name: String,
    pub value: String,
}

/// Free-text search box.
#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub enabled: bool,
    pub key: String,
    pub value: String,
    pub placeholder: String,
    /// Delay before the browser submits while typing.
    pub debounce_ms: u128,
    /// History mode for committed searches.
    pub nav: &'static str,
    /// Other query parameters preserved by the search form. The page is
    /// dropped so a new search starts on the first page.
    pub hidden: Vec<HiddenParam>,
}

/// Render model of one table page.
#[derive(Debug, Clone, Serialize)]
pub struct DataTableView {
    pub table_id: String,
    pub path: String,
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    pub search: SearchView,
    pub filters: Vec<FilterView>,
    pub column_toggles: Vec<ColumnToggleView>,
    pub bulk_actions: Vec<BulkAction>,
    /// Identity of the displayed rows, submitted with a selection.
    pub data_key: String,
    /// Parameters the bulk form carries so the dialog reopens the same page.
    pub bulk_hidden: Vec<HiddenParam>,
    pub selected_count: usize,
    pub all_selected: bool,
    /// Link clearing search and column filters, when any is active.
    pub reset: Option<Link>,
    pub create_href: String,
    pub empty_icon: String,
    pub empty_title: String,
    pub empty_description: Option<String>,
    pub pagination: PaginationView,
}

impl DataTableView {
    /// Build the render model for the rows in `model`.
    ///
    /// `sync` must be bound to the URL without dialog parameters.
    #[must_use]
    pub fn build<R: TableRow>(
        config: &DataTableConfig,
        sync: &TableStateSync<'_>,
        model: &TableModel<R>,
        selection: &RowSelection,
    ) -> Self {
        let params = sync.params();
        let cols = params.get(COLUMNS_PARAM);
        let visible = config.visible_columns(cols);

        let headers = visible
            .iter()
            .map(|c| HeaderView {
                key: c.key.clone(),
                label: c.label.clone(),
                sortable: c.sortable,
                sort: sync.state().sort_for(&c.key).map(|s| s.direction()),
                sort_link: Link::from(sync.toggle_sort(&c.key)),
            })
            .collect();

        let rows = model
            .rows()
            .iter()
            .map(|row| {
                let id = row.row_id();
                RowView {
                    cells: visible
                        .iter()
                        .map(|c| row.cell(&c.key).unwrap_or_default())
                        .collect(),
                    selected: selection.is_selected(&id),
                    edit_href: dialog_href(sync, "update", &id),
                    delete_href: dialog_href(sync, "delete", &id),
                    id,
                }
            })
            .collect();

        let filters = config
            .filters
            .iter()
            .map(|filter| filter_view(filter, sync))
            .collect();

        let column_toggles = if config.has_column_picker {
            config
                .columns
                .iter()
                .map(|column| {
                    let is_visible = visible.iter().any(|v| v.key == column.key);
                    let next: Vec<&str> = config
                        .columns
                        .iter()
                        .filter(|c| {
                            let shown = visible.iter().any(|v| v.key == c.key);
                            if c.key == column.key { !shown } else { shown }
                        })
                        .map(|c| c.key.as_str())
                        .collect();
                    ColumnToggleView {
                        label: column.label.clone(),
                        visible: is_visible,
                        link: Link::from(
                            sync.set_param(COLUMNS_PARAM, (!next.is_empty()).then(|| next.join(","))),
                        ),
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        let search_config = &sync.config().global_filter;
        let page_key = sync.config().page_key.as_str();
        let search = SearchView {
            enabled: search_config.enabled,
            key: search_config.key.clone(),
            value: sync.global_filter().to_string(),
            placeholder: config.search_placeholder.clone(),
            debounce_ms: SEARCH_DEBOUNCE.as_millis(),
            nav: sync.set_global_filter(sync.global_filter().to_string()).history.as_str(),
            hidden: hidden_params(sync, &[search_config.key.as_str(), page_key]),
        };

        let row_ids = model.row_ids();
        let reset = sync
            .state()
            .is_filtered()
            .then(|| Link::from(sync.reset_filters()));

        Self {
            table_id: config.table_id.clone(),
            path: sync.path().to_string(),
            headers,
            rows,
            search,
            filters,
            column_toggles,
            bulk_actions: config.bulk_actions.clone(),
            data_key: model.data_key().to_string(),
            bulk_hidden: hidden_params(sync, &[]),
            selected_count: selection.len(),
            all_selected: !row_ids.is_empty() && selection.is_all_selected(&row_ids),
            reset,
            create_href: sync.with_param("dialog", Some("create".to_string())).href(),
            empty_icon: config.empty_icon.clone(),
            empty_title: config.empty_title.clone(),
            empty_description: config.empty_description.clone(),
            pagination: PaginationView::build(sync, model.page_count(), model.total()),
        }
    }

    /// Number of visible columns, for `colspan` on the empty row.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

fn dialog_href(sync: &TableStateSync<'_>, dialog: &str, id: &str) -> String {
    sync.params()
        .with("dialog", dialog)
        .with("id", id)
        .href(sync.path())
}

fn hidden_params(sync: &TableStateSync<'_>, skip: &[&str]) -> Vec<HiddenParam> {
    sync.params()
        .iter()
        .filter(|(k, _)| !skip.contains(k))
        .map(|(name, value)| HiddenParam {
            name: name.to_string(),
            value: value.to_string(),
        })
        .collect()
}

fn filter_view(filter: &TableFilter, sync: &TableStateSync<'_>) -> FilterView {
    let active = sync.state().filter_values(&filter.key);
    let options = filter
        .options
        .iter()
        .map(|option| {
            let is_active = active.iter().any(|v| v == &option.value);
            let mut values: Vec<String> = match (filter.filter_type, is_active) {
                (_, true) => active
                    .iter()
                    .filter(|v| **v != option.value)
                    .cloned()
                    .collect(),
                (FilterType::Select, false) => vec![option.value.clone()],
                (FilterType::MultiSelect, false) => {
                    let mut values = active.to_vec();
                    values.push(option.value.clone());
                    values
                }
            };
            values.sort();
            let key = filter.key.clone();
            let link = Link::from(sync.set_column_filters(Updater::map(
                move |mut filters: Vec<ColumnFilter>| {
                    filters.retain(|f| f.id != key);
                    if !values.is_empty() {
                        filters.push(ColumnFilter { id: key, value: values });
                    }
                    filters
                },
            )));
            FilterOptionView {
                label: option.label.clone(),
                active: is_active,
                link,
            }
        })
        .collect();

    FilterView {
        key: filter.key.clone(),
        label: filter.label.clone(),
        active_count: active.len(),
        options,
    }
}

//! URL-synchronized data table state.
//!
//! The URL query string is the single owner of a table's interactive state.
//! Every request decodes it into a [`TableUrlState`]; every interaction
//! produces a replace-[`Navigation`] carrying the merged query. Nothing here
//! validates business rules: malformed values simply fall back to defaults
//! while decoding.

pub mod debounce;
pub mod model;
pub mod params;
pub mod selection;
pub mod state;
pub mod sync;

pub use debounce::{DebouncedSearch, Debouncer, SEARCH_DEBOUNCE};
pub use model::{ProcessingMode, TableModel, TableRow};
pub use params::{
    ColumnFilterConfig, DEFAULT_PAGE_SIZE, GlobalFilterConfig, PAGE_SIZES, SearchParamConfig,
    SearchParams,
};
pub use selection::{RowSelection, data_key};
pub use state::{ColumnFilter, Pagination, SortColumn, TableUrlState};
pub use sync::{History, Navigation, TableStateSync, Updater};

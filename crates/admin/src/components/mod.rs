//! Reusable UI components.
//!
//! Components are render models: plain structs built per request and handed
//! to askama templates.

pub mod data_table;
pub mod dialog;
pub mod form;
pub mod layout;
pub mod link;
pub mod pagination;

pub use data_table::{
    BulkAction, DataTableConfig, DataTableView, FilterOption, TableColumn, TableFilter,
};
pub use dialog::DialogView;
pub use form::{FieldKind, FormField, FormValues, FormView};
pub use layout::LayoutView;
pub use link::Link;
pub use pagination::PaginationView;

//! Resource commands.
//!
//! Listing goes through the same table state as the web panel: the arguments
//! are turned into the query string the panel would carry and decoded by the
//! resource's table configuration.

use std::io::Write;

use freightdesk_admin::components::data_table::COLUMNS_PARAM;
use freightdesk_admin::components::dialog::count_label;
use freightdesk_admin::resources::Resource;
use freightdesk_admin::services::CrudService;
use freightdesk_core::pagination::{PageItem, page_window};
use freightdesk_core::table::{SearchParams, TableRow, TableStateSync};

use super::{CommandError, Context};

/// Table state requested on the command line.
#[derive(Debug, Default, Clone)]
pub struct ListArgs {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    /// `column` or `column.desc`.
    pub sort: Option<String>,
    /// `key=value[,value...]` pairs.
    pub filters: Vec<String>,
    /// Comma-separated column keys.
    pub columns: Option<String>,
}

impl ListArgs {
    /// The panel query string for these arguments.
    #[must_use]
    pub fn to_params(&self) -> SearchParams {
        let mut params = SearchParams::default();
        params.set("page", self.page.map(|p| p.to_string()));
        params.set("per_page", self.per_page.map(|p| p.to_string()));
        params.set("search", self.search.clone());
        params.set("order_by", self.sort.clone());
        params.set(COLUMNS_PARAM, self.columns.clone());
        for filter in &self.filters {
            if let Some((key, value)) = filter.split_once('=') {
                params.set(key.trim(), Some(value.to_string()));
            } else {
                tracing::warn!(filter, "Ignoring filter without '='");
            }
        }
        params
    }
}

/// Print one page of rows.
pub async fn list<R: Resource>(ctx: &Context, args: &ListArgs) -> Result<(), CommandError> {
    let token = ctx.token()?;
    let config = R::table();
    let search_config = config.search_params();
    let params = args.to_params();
    let sync = TableStateSync::new(&R::path(), &search_config, params.clone());

    let model = match CrudService::<R>::new(&ctx.api, Some(&token))
        .list(sync.state())
        .await
    {
        Ok(model) => model,
        Err(e) => return Err(ctx.api_failure(e).await),
    };

    let columns = config.visible_columns(params.get(COLUMNS_PARAM));
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(model.rows().len() + 1);
    rows.push(
        std::iter::once("ID".to_string())
            .chain(columns.iter().map(|c| c.label.clone()))
            .collect(),
    );
    rows.extend(model.rows().iter().map(|row| {
        std::iter::once(row.row_id())
            .chain(columns.iter().map(|c| row.cell(&c.key).unwrap_or_default()))
            .collect()
    }));

    let mut out = std::io::stdout().lock();
    write_table(&mut out, &rows)?;
    let pagination = sync.pagination();
    writeln!(
        out,
        "\nPage {} of {} ({})",
        pagination.page(),
        model.page_count().max(1),
        count_label::<R>(usize::try_from(model.total()).unwrap_or(usize::MAX)),
    )?;
    if model.page_count() > 1 {
        writeln!(out, "{}", window_line(pagination.page(), model.page_count()))?;
    }
    Ok(())
}

/// Print the page-number window for `current` out of `total` pages.
pub fn pages(current: u32, total: u32) -> Result<(), CommandError> {
    let line = window_line(current, total);
    let mut out = std::io::stdout().lock();
    if line.is_empty() {
        writeln!(out, "No pages")?;
    } else {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// `1 [2] 3 ... 9`: the current page in brackets.
fn window_line(current: u32, total: u32) -> String {
    let current = current.clamp(1, total.max(1));
    page_window(current, total)
        .into_iter()
        .map(|item| match item {
            PageItem::Page(n) if n == current => format!("[{n}]"),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Delete rows by ID; several IDs go through the bulk mutation.
pub async fn delete<R: Resource>(ctx: &Context, ids: &[String]) -> Result<(), CommandError> {
    let token = ctx.token()?;
    let crud = CrudService::<R>::new(&ctx.api, Some(&token));

    let result = match ids {
        [id] => crud.delete(id).await.map(|()| 1),
        _ => crud.bulk_delete(ids).await,
    };
    let count = match result {
        Ok(count) => count,
        Err(e) => return Err(ctx.api_failure(e).await),
    };

    writeln!(std::io::stdout().lock(), "Deleted {}.", count_label::<R>(count))?;
    Ok(())
}

/// Left-aligned columns separated by two spaces.
fn write_table(out: &mut impl Write, rows: &[Vec<String>]) -> std::io::Result<()> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        writeln!(out, "{}", line.join("  ").trim_end())?;
    }
    Ok(())
}

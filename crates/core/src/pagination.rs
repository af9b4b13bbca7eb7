//! Paginator info and the page-number window.
//!
//! The window always shows the first and last page plus a run of
//! [`WINDOW_WIDTH`] pages around the current page. Any gap between those
//! collapses to a single [`PageItem::Ellipsis`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of consecutive pages shown around the current page.
pub const WINDOW_WIDTH: u32 = 3;

/// Paginator metadata returned alongside every paginated list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatorInfo {
    /// Number of items on the current page.
    pub count: u32,
    /// Current page (1-indexed).
    pub current_page: u32,
    /// Whether there are pages after this one.
    pub has_more_pages: bool,
    /// Index of the last item on the page, `None` for an empty page.
    pub last_item: Option<u32>,
    /// Requested page size.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u32,
}

impl PaginatorInfo {
    /// Total number of pages.
    #[must_use]
    pub const fn page_count(&self) -> u32 {
        page_count(self.total, self.per_page)
    }
}

/// A list page together with its paginator info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub paginator_info: PaginatorInfo,
}

/// Number of pages needed for `total` items at `per_page` items each.
#[must_use]
pub const fn page_count(total: u32, per_page: u32) -> u32 {
    if per_page == 0 {
        0
    } else {
        total.div_ceil(per_page)
    }
}

/// One entry of the page-number window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageItem {
    /// A clickable page number (1-indexed).
    Page(u32),
    /// A collapsed range of pages.
    Ellipsis,
}

impl PageItem {
    /// The page number, or `None` for an ellipsis.
    #[must_use]
    pub const fn page(self) -> Option<u32> {
        match self {
            Self::Page(n) => Some(n),
            Self::Ellipsis => None,
        }
    }
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(n) => write!(f, "{n}"),
            Self::Ellipsis => f.write_str("..."),
        }
    }
}

/// Build the page-number window for `current` out of `total` pages.
///
/// `current` is clamped into `1..=total`. An empty result means there is
/// nothing to paginate.
#[must_use]
pub fn page_window(current: u32, total: u32) -> Vec<PageItem> {
    if total == 0 {
        return Vec::new();
    }

    let current = current.clamp(1, total);
    let half = WINDOW_WIDTH / 2;

    let end = current.saturating_add(half).max(WINDOW_WIDTH).min(total);
    let start = end.saturating_sub(WINDOW_WIDTH - 1).max(1);

    let mut pages = Vec::with_capacity(WINDOW_WIDTH as usize + 2);
    pages.push(1);
    pages.extend(start..=end);
    pages.push(total);
    pages.sort_unstable();
    pages.dedup();

    let mut items = Vec::with_capacity(pages.len() * 2);
    let mut previous: Option<u32> = None;
    for page in pages {
        if previous.is_some_and(|p| page > p + 1) {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(page));
        previous = Some(page);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    use PageItem::{Ellipsis, Page};

    fn assert_invariants(current: u32, total: u32) {
        let items = page_window(current, total);
        let pages: Vec<u32> = items.iter().filter_map(|i| i.page()).collect();

        assert_eq!(pages.first(), Some(&1), "first page for {current}/{total}");
        assert_eq!(pages.last(), Some(&total), "last page for {current}/{total}");
        assert!(
            pages.contains(&current.clamp(1, total)),
            "current page for {current}/{total}"
        );
        assert!(
            pages.windows(2).all(|w| w[0] < w[1]),
            "strictly increasing pages for {current}/{total}"
        );
        assert!(
            !items.windows(2).any(|w| w[0] == Ellipsis && w[1] == Ellipsis),
            "no consecutive ellipses for {current}/{total}"
        );
        for pair in items.windows(2) {
            if let (Page(a), Page(b)) = (pair[0], pair[1]) {
                assert_eq!(b, a + 1, "gap without ellipsis for {current}/{total}");
            }
        }
        assert_ne!(items.first(), Some(&Ellipsis));
        assert_ne!(items.last(), Some(&Ellipsis));
    }

    #[test]
    fn test_page_window_invariants_hold_for_all_small_inputs() {
        for total in 1..=40 {
            for current in 0..=total + 2 {
                assert_invariants(current, total);
            }
        }
    }

    #[test]
    fn test_page_window_first_page_of_five() {
        assert_eq!(
            page_window(1, 5),
            vec![Page(1), Page(2), Page(3), Ellipsis, Page(5)]
        );
    }

    #[test]
    fn test_page_window_middle_page() {
        assert_eq!(
            page_window(6, 12),
            vec![Page(1), Ellipsis, Page(5), Page(6), Page(7), Ellipsis, Page(12)]
        );
    }

    #[test]
    fn test_page_window_last_page() {
        assert_eq!(
            page_window(12, 12),
            vec![Page(1), Ellipsis, Page(10), Page(11), Page(12)]
        );
    }

    #[test]
    fn test_page_window_small_totals() {
        assert_eq!(page_window(1, 1), vec![Page(1)]);
        assert_eq!(page_window(2, 2), vec![Page(1), Page(2)]);
        assert_eq!(page_window(3, 4), vec![Page(1), Page(2), Page(3), Page(4)]);
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(page_count(47, 10), 5);
        assert_eq!(page_count(50, 10), 5);
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(5, 0), 0);
    }

    #[test]
    fn test_paginator_info_from_wire() {
        let info: PaginatorInfo = serde_json::from_str(
            r#"{"count":10,"currentPage":1,"hasMorePages":true,"lastItem":10,"perPage":10,"total":47}"#,
        )
        .unwrap_or_default();
        assert_eq!(info.page_count(), 5);
        assert_eq!(
            page_window(info.current_page, info.page_count()),
            vec![Page(1), Page(2), Page(3), Ellipsis, Page(5)]
        );
    }
}

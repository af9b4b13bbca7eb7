//! Pagination control.

use freightdesk_core::pagination::{PageItem, page_window};
use freightdesk_core::table::{Pagination, TableStateSync};
use serde::Serialize;

use super::link::Link;

/// One entry of the page-number window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLinkView {
    /// Page number, or `...` for a collapsed range.
    pub label: String,
    /// `None` for the ellipsis.
    pub link: Option<Link>,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSizeView {
    pub size: u32,
    pub link: Link,
    pub current: bool,
}

/// Render model of the pagination control.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationView {
    /// Current 1-based page.
    pub page: u32,
    pub page_count: u32,
    pub page_size: u32,
    pub total: u32,
    /// 1-based index of the first row shown, 0 when there are none.
    pub first_item: u32,
    pub last_item: u32,
    pub items: Vec<PageLinkView>,
    pub prev: Option<Link>,
    pub next: Option<Link>,
    pub sizes: Vec<PageSizeView>,
}

impl PaginationView {
    /// Build from the URL state and the row model's page metadata.
    ///
    /// A page past the end shows no rows; "previous" then leads back to the
    /// last page that has any.
    #[must_use]
    pub fn build(sync: &TableStateSync<'_>, page_count: u32, total: u32) -> Self {
        let pagination = sync.pagination();
        let page = pagination.page();
        let goto = |target: u32| Link::from(sync.set_pagination(pagination.with_page(target)));
        let past_end = page > page_count.max(1);

        let items = page_window(page, page_count)
            .into_iter()
            .map(|item| match item {
                PageItem::Page(n) => PageLinkView {
                    label: n.to_string(),
                    link: Some(goto(n)),
                    current: n == page,
                },
                PageItem::Ellipsis => PageLinkView {
                    label: item.to_string(),
                    link: None,
                    current: false,
                },
            })
            .collect();

        let sizes = sync
            .config()
            .page_sizes
            .iter()
            .map(|&size| PageSizeView {
                size,
                link: Link::from(sync.set_pagination(Pagination {
                    page_index: 0,
                    page_size: size,
                })),
                current: size == pagination.page_size,
            })
            .collect();

        let size = pagination.page_size;
        let (first_item, last_item) = if total == 0 || past_end {
            (0, 0)
        } else {
            (
                pagination.page_index.saturating_mul(size).saturating_add(1).min(total),
                page.saturating_mul(size).min(total),
            )
        };
        let prev = if past_end {
            Some(goto(page_count.max(1)))
        } else {
            (page > 1).then(|| goto(page - 1))
        };

        Self {
            page,
            page_count,
            page_size: size,
            total,
            first_item,
            last_item,
            items,
            prev,
            next: (page < page_count).then(|| goto(page + 1)),
            sizes,
        }
    }
}

#[cfg(test)]
mod tests {
    use freightdesk_core::table::{SearchParamConfig, SearchParams};

    use super::*;

    fn labels(view: &PaginationView) -> Vec<&str> {
        view.items.iter().map(|i| i.label.as_str()).collect()
    }

    fn href(link: Option<&Link>) -> Option<&str> {
        link.map(|l| l.href.as_str())
    }

    #[test]
    fn test_first_page_of_forty_seven_rows() {
        let config = SearchParamConfig::default();
        let sync = TableStateSync::new("/branches", &config, SearchParams::default());
        let view = PaginationView::build(&sync, 5, 47);

        assert_eq!(labels(&view), vec!["1", "2", "3", "...", "5"]);
        assert!(view.items[0].current);
        assert_eq!(href(view.items[1].link.as_ref()), Some("/branches?page=2"));
        assert!(view.items[3].link.is_none());
        assert!(view.prev.is_none());
        assert_eq!(href(view.next.as_ref()), Some("/branches?page=2"));
        assert_eq!((view.first_item, view.last_item), (1, 10));
    }

    #[test]
    fn test_page_links_replace_history() {
        let config = SearchParamConfig::default();
        let sync = TableStateSync::new("/branches", &config, SearchParams::parse("page=2"));
        let view = PaginationView::build(&sync, 5, 47);

        let navs: Vec<&str> = view
            .items
            .iter()
            .filter_map(|i| i.link.as_ref())
            .chain(view.prev.iter())
            .chain(view.next.iter())
            .chain(view.sizes.iter().map(|s| &s.link))
            .map(|l| l.nav)
            .collect();
        assert!(!navs.is_empty());
        assert!(navs.iter().all(|nav| *nav == "replace"));
    }

    #[test]
    fn test_last_page() {
        let config = SearchParamConfig::default();
        let sync = TableStateSync::new("/branches", &config, SearchParams::parse("page=5&search=x"));
        let view = PaginationView::build(&sync, 5, 47);

        assert_eq!(href(view.prev.as_ref()), Some("/branches?page=4&search=x"));
        assert!(view.next.is_none());
        assert_eq!((view.first_item, view.last_item), (41, 47));
        // Page 1 is the default and is left out of the URL.
        assert_eq!(href(view.items[0].link.as_ref()), Some("/branches?search=x"));
    }

    #[test]
    fn test_page_past_the_end_shows_nothing_and_leads_back() {
        let config = SearchParamConfig::default();
        let sync = TableStateSync::new("/branches", &config, SearchParams::parse("page=9"));
        let view = PaginationView::build(&sync, 5, 47);

        assert_eq!((view.first_item, view.last_item), (0, 0));
        assert_eq!(href(view.prev.as_ref()), Some("/branches?page=5"));
        assert!(view.next.is_none());
    }

    #[test]
    fn test_page_size_links_reset_to_first_page() {
        let config = SearchParamConfig::default();
        let sync = TableStateSync::new("/branches", &config, SearchParams::parse("page=3"));
        let view = PaginationView::build(&sync, 5, 47);

        assert_eq!(view.sizes.len(), 5);
        assert!(view.sizes[0].current);
        assert_eq!(view.sizes[0].link.href, "/branches");
        assert_eq!(view.sizes[1].link.href, "/branches?per_page=20");
    }

    #[test]
    fn test_empty_table() {
        let config = SearchParamConfig::default();
        let sync = TableStateSync::new("/branches", &config, SearchParams::default());
        let view = PaginationView::build(&sync, 0, 0);

        assert!(view.items.is_empty());
        assert_eq!((view.first_item, view.last_item), (0, 0));
        assert!(view.next.is_none());
        assert!(view.prev.is_none());
    }
}

//! Links produced by table navigations.

use freightdesk_core::table::Navigation;
use serde::Serialize;

/// An `href` plus how following it should touch browser history.
///
/// Templates render `nav` as `data-nav`; the table script follows
/// `data-nav="replace"` links with `location.replace`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    pub nav: &'static str,
}

impl From<Navigation> for Link {
    fn from(navigation: Navigation) -> Self {
        Self {
            href: navigation.href(),
            nav: navigation.history.as_str(),
        }
    }
}

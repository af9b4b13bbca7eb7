//! Page chrome shared by every authenticated page.

use freightdesk_core::User;
use serde::Serialize;

use crate::resources::{Branch, Currency, FleetType, Position, Resource};
use crate::services::Toast;

/// Signed-in user for templates.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            roles: user.roles.iter().map(|r| r.name.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub href: String,
    pub icon: &'static str,
    pub active: bool,
}

/// Layout data for `base.html`.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutView {
    pub user: Option<UserView>,
    pub current_path: String,
    pub nav: Vec<NavItem>,
    pub toasts: Vec<Toast>,
}

impl LayoutView {
    #[must_use]
    pub fn new(user: Option<&User>, current_path: &str, toasts: Vec<Toast>) -> Self {
        let item = |label, href: String, icon| {
            let active = if href == "/" {
                current_path == "/"
            } else {
                current_path == href || current_path.starts_with(&format!("{href}/"))
            };
            NavItem {
                label,
                href,
                icon,
                active,
            }
        };

        let nav = vec![
            item("Dashboard", "/".to_string(), "ph-squares-four"),
            item(Branch::TITLE, Branch::path(), "ph-buildings"),
            item(Currency::TITLE, Currency::path(), "ph-currency-circle-dollar"),
            item(FleetType::TITLE, FleetType::path(), "ph-truck"),
            item(Position::TITLE, Position::path(), "ph-identification-badge"),
        ];

        Self {
            user: user.map(UserView::from),
            current_path: current_path.to_string(),
            nav,
            toasts,
        }
    }
}

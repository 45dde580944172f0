// Template context structures for Askama templates, organized by area.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::{Actor, Permissions, take_flash};
use crate::models::nav_item::{self, NavModule, NavSidebarItem};
use crate::queue::view::Breadcrumb;

mod common;
mod queue;
mod tools;

pub use self::common::NeedsAuthTemplate;
pub use self::queue::{QueueItemTemplate, QueueMoveTemplate, QueuePostTemplate, QueueValidateTemplate};
pub use self::tools::VersionTestTemplate;

/// Name of the link hash carried by one-click queue actions.
pub const QUICK_ACTIONS: &str = "quick_actions";

/// Common context shared by all management pages.
/// Templates access these as `ctx.username`, `ctx.nav_modules`, etc.
pub struct PageContext {
    pub username: String,
    pub logged_in: bool,
    pub permissions: Permissions,
    pub flash: Option<String>,
    pub nav_modules: Vec<NavModule>,
    pub sidebar_items: Vec<NavSidebarItem>,
    pub app_name: String,
    pub csrf_token: String,
    /// Link hash appended to quick action links (`?hash=`).
    pub quick_hash: String,
    pub breadcrumbs: Vec<Breadcrumb>,
}

impl PageContext {
    pub fn build(session: &Session, actor: &Actor, app_name: &str, active_module: &str, current_path: &str) -> Self {
        let (nav_modules, sidebar_items) =
            nav_item::find_navigation(&actor.permissions, active_module, current_path);
        Self {
            username: actor.username.clone(),
            logged_in: actor.is_registered(),
            permissions: actor.permissions.clone(),
            flash: take_flash(session),
            nav_modules,
            sidebar_items,
            app_name: app_name.to_string(),
            csrf_token: csrf::get_or_create_token(session),
            quick_hash: csrf::get_or_create_link_hash(session, QUICK_ACTIONS),
            breadcrumbs: Vec::new(),
        }
    }

    pub fn with_breadcrumb(mut self, crumb: Breadcrumb) -> Self {
        self.breadcrumbs.push(crumb);
        self
    }
}

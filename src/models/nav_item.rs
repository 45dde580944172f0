use crate::auth::session::Permissions;
use crate::models::contrib::{Capability, ContribType};
use crate::tools::TOOLS_PERMISSION;

pub struct NavModule {
    pub label: String,
    pub url: String,
    pub is_active: bool,
}

pub struct NavSidebarItem {
    pub label: String,
    pub url: String,
    pub is_active: bool,
}

struct RawNavItem {
    module: &'static str,
    label: String,
    url: String,
    permission_code: String,
}

/// Management area menu. Queue listings live on the host board under
/// `/manage/queue/<type>`; only entries the user may open are shown.
fn manage_items() -> Vec<RawNavItem> {
    let mut items: Vec<RawNavItem> = ContribType::ALL
        .into_iter()
        .map(|t| RawNavItem {
            module: "queue",
            label: format!("{} queue", t.label()),
            url: format!("/manage/queue/{}", t.slug()),
            permission_code: t.acl_code(Capability::View),
        })
        .collect();
    items.push(RawNavItem {
        module: "administration",
        label: "Platform version test".to_string(),
        url: "/manage/tools/phpbb_version_test".to_string(),
        permission_code: TOOLS_PERMISSION.to_string(),
    });
    items
}

fn module_label(module: &str) -> &'static str {
    match module {
        "queue" => "Validation queue",
        _ => "Administration",
    }
}

/// Returns (header_modules, sidebar_items) for the current user.
/// `active_module` is `"queue"` or `"administration"`.
pub fn find_navigation(
    permissions: &Permissions,
    active_module: &str,
    current_path: &str,
) -> (Vec<NavModule>, Vec<NavSidebarItem>) {
    let visible: Vec<RawNavItem> = manage_items()
        .into_iter()
        .filter(|item| item.permission_code.is_empty() || permissions.has(&item.permission_code))
        .collect();

    let mut modules: Vec<NavModule> = Vec::new();
    for item in &visible {
        if modules.iter().any(|m| m.label == module_label(item.module)) {
            continue;
        }
        modules.push(NavModule {
            label: module_label(item.module).to_string(),
            url: item.url.clone(),
            is_active: item.module == active_module,
        });
    }

    let sidebar = visible
        .into_iter()
        .filter(|item| item.module == active_module)
        .map(|item| NavSidebarItem {
            is_active: current_path.starts_with(&item.url),
            label: item.label,
            url: item.url,
        })
        .collect();

    (modules, sidebar)
}

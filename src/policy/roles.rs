//! Role requirements per route category.
//!
//! Authorization is role based: a principal holding any one of the listed
//! roles satisfies the requirement. An empty set means no role check beyond
//! whatever authentication the identity service performs.

use std::collections::BTreeSet;

use crate::routing::{RouteCategory, RouteRule, RouteValues};

/// Controllers reachable through the generic `{controller}/{action}` rule that
/// carry a protected category. `None` matches any action.
const PROTECTED_CONTROLLERS: &[(&str, Option<&str>, RouteCategory)] = &[
    ("clientadmin", None, RouteCategory::IdentityAdministration),
    ("filemanager", None, RouteCategory::FileManagement),
    ("blog", Some("edit"), RouteCategory::ContentEditing),
    ("page", Some("edit"), RouteCategory::ContentEditing),
];

pub const ADMINISTRATORS: &str = "Administrators";
pub const CONTENT_ADMINISTRATORS: &str = "Content Administrators";

/// Roles allowed to reach routes of the given category.
pub fn required_roles(category: RouteCategory) -> BTreeSet<String> {
    let roles: &[&str] = match category {
        RouteCategory::ContentEditing | RouteCategory::FileManagement => {
            &[ADMINISTRATORS, CONTENT_ADMINISTRATORS]
        }
        RouteCategory::IdentityAdministration => &[ADMINISTRATORS],
        RouteCategory::ContentViewing
        | RouteCategory::Sitemap
        | RouteCategory::Syndication
        | RouteCategory::ErrorPage => &[],
    };
    roles.iter().map(|r| r.to_string()).collect()
}

/// Category implied by a bound controller and action, if it is a protected one.
pub fn controller_category(controller: &str, action: Option<&str>) -> Option<RouteCategory> {
    PROTECTED_CONTROLLERS
        .iter()
        .find(|(name, required_action, _)| {
            name.eq_ignore_ascii_case(controller)
                && required_action.map_or(true, |required| {
                    action.is_some_and(|action| action.eq_ignore_ascii_case(required))
                })
        })
        .map(|(_, _, category)| *category)
}

/// Category a match is authorized as.
///
/// Rules that bind `controller` from the path take the category of the named
/// controller, so the generic rule cannot reach a protected controller unguarded.
pub fn effective_category(rule: &RouteRule, values: &RouteValues) -> RouteCategory {
    if !rule.template().has_parameter("controller") {
        return rule.category();
    }
    values
        .get("controller")
        .and_then(|controller| {
            controller_category(controller, values.get("action").map(String::as_str))
        })
        .unwrap_or(rule.category())
}

//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled rules in precedence order
//! - Look up the first rule matching a request
//! - Return matched rule or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) ordered scan (acceptable for typical route counts)
//! - First match wins, no backtracking
//! - Explicit None rather than silent default

use std::sync::Arc;

use crate::routing::rule::RouteRule;
use crate::routing::template::{path_segments, RouteValues};
use crate::tenant::{AddressingMode, TenantContext};

/// A matched rule together with its route values.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub rule: Arc<RouteRule>,
    pub values: RouteValues,
}

/// Ordered, immutable set of route rules.
#[derive(Debug, Clone)]
pub struct RouteTable {
    mode: AddressingMode,
    rules: Vec<Arc<RouteRule>>,
}

impl RouteTable {
    pub(crate) fn new(mode: AddressingMode, rules: Vec<Arc<RouteRule>>) -> Self {
        Self { mode, rules }
    }

    /// Mode the table was built for.
    pub fn mode(&self) -> AddressingMode {
        self.mode
    }

    pub fn rules(&self) -> &[Arc<RouteRule>] {
        &self.rules
    }

    /// Rule names in match order.
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<RouteRule>> {
        self.rules.iter().find(|r| r.name() == name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Find the route for a resolved request.
    ///
    /// Tenant-scoped rules see the tenant-qualified path; bare rules see the
    /// path with the tenant folder removed.
    pub fn lookup(&self, tenant: &TenantContext) -> Option<RouteMatch> {
        let qualified = tenant.tenant_qualified_path();
        let scoped = path_segments(&qualified);
        let bare = path_segments(tenant.path_without_tenant_segment());
        self.scan(tenant.addressing_mode(), &scoped, &bare)
    }

    /// Find the route for a raw path, offering the same path to every rule.
    pub fn lookup_path(&self, path: &str) -> Option<RouteMatch> {
        let segments = path_segments(path);
        self.scan(self.mode, &segments, &segments)
    }

    fn scan(&self, mode: AddressingMode, scoped: &[&str], bare: &[&str]) -> Option<RouteMatch> {
        self.rules
            .iter()
            .filter(|rule| rule.applies_in(mode))
            .find_map(|rule| {
                let segments = if rule.is_tenant_scoped() { scoped } else { bare };
                rule.match_segments(segments).map(|values| RouteMatch {
                    rule: rule.clone(),
                    values,
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TenantConfig;
    use crate::routing::RouteTableBuilder;
    use crate::tenant::TenantRegistry;

    fn table(mode: AddressingMode) -> RouteTable {
        let registry = Arc::new(TenantRegistry::from_config(&[TenantConfig {
            id: "acme".into(),
            hosts: vec![],
        }]));
        RouteTableBuilder::new(registry).build(mode, true).unwrap()
    }

    fn folder(folder: &str, rest: &str) -> TenantContext {
        TenantContext::new("acme", AddressingMode::FolderPrefixed, rest, Some(folder.into()))
    }

    #[test]
    fn test_folder_request_hits_folder_rule() {
        let table = table(AddressingMode::FolderPrefixed);
        let matched = table.lookup(&folder("acme", "/blog/rss")).unwrap();
        assert_eq!(matched.rule.name(), "folderblogrss");
        assert_eq!(matched.values.get("tenant").map(String::as_str), Some("acme"));
        assert_eq!(matched.values.get("action").map(String::as_str), Some("Rss"));
    }

    #[test]
    fn test_unprefixed_request_skips_folder_rules() {
        let table = table(AddressingMode::FolderPrefixed);
        let ctx = TenantContext::new("acme", AddressingMode::FolderPrefixed, "/sitemap", None);
        assert_eq!(table.lookup(&ctx).unwrap().rule.name(), "sitemap");
    }

    #[test]
    fn test_optional_parameter_defaults() {
        let table = table(AddressingMode::HostBased);
        let ctx = TenantContext::new("acme", AddressingMode::HostBased, "/oops/error", None);
        let matched = table.lookup(&ctx).unwrap();
        assert_eq!(matched.rule.name(), "errorhandler");
        assert!(!matched.values.contains_key("statusCode"));

        let ctx = TenantContext::new("acme", AddressingMode::HostBased, "/oops/error/404", None);
        let matched = table.lookup(&ctx).unwrap();
        assert_eq!(matched.values.get("statusCode").map(String::as_str), Some("404"));
    }

    #[test]
    fn test_literal_route_beats_catch_all() {
        let table = table(AddressingMode::HostBased);
        let ctx = TenantContext::new("acme", AddressingMode::HostBased, "/blog/edit/hello", None);
        assert_eq!(table.lookup(&ctx).unwrap().rule.name(), "blogedit");

        let ctx = TenantContext::new("acme", AddressingMode::HostBased, "/shop/cart/1/2", None);
        let matched = table.lookup(&ctx).unwrap();
        assert_eq!(matched.rule.name(), "def");
        assert_eq!(matched.values.get("controller").map(String::as_str), Some("shop"));
        assert_eq!(matched.values.get("id").map(String::as_str), Some("1/2"));
    }

    #[test]
    fn test_root_hits_page_default() {
        let table = table(AddressingMode::FolderPrefixed);
        let matched = table.lookup(&folder("acme", "/")).unwrap();
        assert_eq!(matched.rule.name(), "folderpagedefault");
    }

    #[test]
    fn test_lookup_path_uses_table_mode() {
        let table = table(AddressingMode::FolderPrefixed);
        assert_eq!(table.lookup_path("/acme/sitemap").unwrap().rule.name(), "foldersitemap");
        assert_eq!(table.lookup_path("/sitemap").unwrap().rule.name(), "sitemap");
    }
}

//! Request dispatcher.
//!
//! # Responsibilities
//! - Drive one request through Resolving → Matching → PolicyComposing
//! - Finish in Dispatched with a complete policy, or Rejected with a reason
//!
//! # Design Decisions
//! - Holds only shared read-only state; safe to call from any task
//! - Rejections are values, never retried
//! - Policy composition cannot reject

use std::sync::Arc;
use std::time::Instant;

use crate::dispatch::outcome::{Dispatch, DispatchOutcome, DispatchState, RejectReason, Rejection};
use crate::observability::metrics;
use crate::policy::{CultureHints, PolicyComposer};
use crate::routing::RouteTable;
use crate::tenant::{ResolveError, TenantResolver};

/// Transport-independent view of an incoming request.
#[derive(Debug, Clone, Default)]
pub struct DispatchRequest {
    pub host: String,
    pub path: String,
    pub culture_hints: CultureHints,
}

impl DispatchRequest {
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            culture_hints: CultureHints::default(),
        }
    }

    pub fn with_culture_hints(mut self, hints: CultureHints) -> Self {
        self.culture_hints = hints;
        self
    }
}

/// Orchestrates tenant resolution, route matching and policy composition.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    resolver: TenantResolver,
    table: Arc<RouteTable>,
    composer: PolicyComposer,
}

impl Dispatcher {
    pub fn new(resolver: TenantResolver, table: Arc<RouteTable>, composer: PolicyComposer) -> Self {
        Self {
            resolver,
            table,
            composer,
        }
    }

    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    pub fn resolver(&self) -> &TenantResolver {
        &self.resolver
    }

    /// Run one dispatch cycle.
    pub fn dispatch(&self, request: &DispatchRequest) -> DispatchOutcome {
        let started = Instant::now();
        let outcome = self.run(request);

        match &outcome {
            DispatchOutcome::Dispatched(dispatch) => {
                tracing::debug!(
                    tenant = %dispatch.tenant.tenant_id(),
                    rule = %dispatch.rule.name(),
                    handler = %dispatch.target_handler(),
                    culture = %dispatch.policy.culture,
                    "Request dispatched"
                );
                metrics::record_dispatch(dispatch.rule.name(), started);
            }
            DispatchOutcome::Rejected(rejection) => {
                tracing::info!(
                    reason = %rejection.reason,
                    during = %rejection.during,
                    host = %rejection.host,
                    path = %rejection.path,
                    "Request rejected"
                );
                metrics::record_rejection(rejection.reason.as_str(), started);
            }
        }

        outcome
    }

    fn run(&self, request: &DispatchRequest) -> DispatchOutcome {
        let mut state = DispatchState::Resolving;
        tracing::trace!(state = %state, host = %request.host, path = %request.path);

        let tenant = match self.resolver.resolve(&request.host, &request.path) {
            Ok(tenant) => tenant,
            Err(ResolveError::UnknownTenant { .. }) => {
                return DispatchOutcome::Rejected(Rejection {
                    reason: RejectReason::NoTenant,
                    during: state,
                    host: request.host.clone(),
                    path: request.path.clone(),
                    tenant_id: None,
                });
            }
        };

        state = DispatchState::Matching;
        tracing::trace!(state = %state, tenant = %tenant.tenant_id());

        let Some(matched) = self.table.lookup(&tenant) else {
            return DispatchOutcome::Rejected(Rejection {
                reason: RejectReason::NoRoute,
                during: state,
                host: request.host.clone(),
                path: request.path.clone(),
                tenant_id: Some(tenant.tenant_id().to_string()),
            });
        };

        state = DispatchState::PolicyComposing;
        tracing::trace!(state = %state, rule = %matched.rule.name());

        let policy = self
            .composer
            .compose(&matched.rule, &matched.values, &tenant, &request.culture_hints);

        DispatchOutcome::Dispatched(Box::new(Dispatch {
            tenant,
            rule: matched.rule,
            values: matched.values,
            policy,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DispatchConfig, TenantConfig};
    use crate::policy::PolicyConfig;
    use crate::routing::{RouteCategory, RouteDecl, RouteTableBuilder};
    use crate::tenant::{AddressingMode, TenantRegistry};

    fn dispatcher(mode: AddressingMode, default_tenant: Option<&str>) -> Dispatcher {
        let registry = Arc::new(TenantRegistry::from_config(&[
            TenantConfig { id: "root".into(), hosts: vec!["example.com".into()] },
            TenantConfig { id: "acme".into(), hosts: vec!["acme.example.com".into()] },
        ]));
        let table = RouteTableBuilder::new(registry.clone()).build(mode, true).unwrap();
        Dispatcher::new(
            TenantResolver::new(mode, registry, default_tenant.map(Into::into)),
            Arc::new(table),
            PolicyComposer::new(PolicyConfig::from_config(&DispatchConfig::default())),
        )
    }

    #[test]
    fn test_folder_request_dispatches_to_folder_rule() {
        let outcome = dispatcher(AddressingMode::FolderPrefixed, Some("root"))
            .dispatch(&DispatchRequest::new("example.com", "/acme/blog/hello-world"));
        let dispatch = outcome.dispatched().unwrap();
        assert_eq!(dispatch.tenant.tenant_id(), "acme");
        assert_eq!(dispatch.rule.name(), "folderblogpost");
        assert_eq!(dispatch.values.get("slug").map(String::as_str), Some("hello-world"));
        assert_eq!(dispatch.values.get("tenant").map(String::as_str), Some("acme"));
        assert_eq!(dispatch.target_handler(), "blog.post");
    }

    #[test]
    fn test_default_tenant_uses_bare_rules() {
        let outcome = dispatcher(AddressingMode::FolderPrefixed, Some("root"))
            .dispatch(&DispatchRequest::new("example.com", "/sitemap"));
        let dispatch = outcome.dispatched().unwrap();
        assert_eq!(dispatch.tenant.tenant_id(), "root");
        assert_eq!(dispatch.rule.name(), "sitemap");
    }

    #[test]
    fn test_unknown_host_is_rejected_while_resolving() {
        let outcome = dispatcher(AddressingMode::HostBased, None)
            .dispatch(&DispatchRequest::new("other.org", "/"));
        let rejection = outcome.rejection().unwrap();
        assert_eq!(rejection.reason, RejectReason::NoTenant);
        assert_eq!(rejection.during, DispatchState::Resolving);
        assert_eq!(outcome.state(), DispatchState::Rejected);
    }

    #[test]
    fn test_unmatched_path_is_rejected_while_matching() {
        const SITEMAP_ONLY: &[RouteDecl] = &[RouteDecl {
            name: "sitemap",
            folder_name: "foldersitemap",
            template: "sitemap",
            target: "page.sitemap",
            defaults: &[],
            category: RouteCategory::Sitemap,
        }];
        let registry = Arc::new(TenantRegistry::from_config(&[TenantConfig {
            id: "acme".into(),
            hosts: vec![],
        }]));
        let table = RouteTableBuilder::new(registry.clone())
            .with_catalogue(SITEMAP_ONLY)
            .build(AddressingMode::FolderPrefixed, true)
            .unwrap();
        let dispatcher = Dispatcher::new(
            TenantResolver::new(AddressingMode::FolderPrefixed, registry, None),
            Arc::new(table),
            PolicyComposer::new(PolicyConfig::from_config(&DispatchConfig::default())),
        );

        let outcome = dispatcher.dispatch(&DispatchRequest::new("example.com", "/acme/blog"));
        let rejection = outcome.rejection().unwrap();
        assert_eq!(rejection.reason, RejectReason::NoRoute);
        assert_eq!(rejection.during, DispatchState::Matching);
        assert_eq!(rejection.tenant_id.as_deref(), Some("acme"));

        let outcome = dispatcher.dispatch(&DispatchRequest::new("example.com", "/ACME/sitemap"));
        assert_eq!(outcome.dispatched().unwrap().rule.name(), "foldersitemap");
    }

    #[test]
    fn test_deep_path_falls_to_catch_all() {
        let outcome = dispatcher(AddressingMode::HostBased, None)
            .dispatch(&DispatchRequest::new("example.com", "/blog/a/b"));
        let dispatch = outcome.dispatched().unwrap();
        assert_eq!(dispatch.rule.name(), "def");
        assert_eq!(dispatch.values.get("controller").map(String::as_str), Some("blog"));
        assert_eq!(dispatch.values.get("id").map(String::as_str), Some("b"));
    }
}

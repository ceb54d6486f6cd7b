//! Tenant resolution.
//!
//! # Responsibilities
//! - Map (host, path) to a tenant id under the configured addressing mode
//! - Strip the tenant folder from the path in folder-prefixed mode
//! - Fall back to the configured default tenant
//!
//! # Design Decisions
//! - Host matching is case-insensitive and ignores the port
//! - A full host key wins over a subdomain key
//! - Failure is an explicit `UnknownTenant` value, never retried

use std::sync::Arc;

use thiserror::Error;

use crate::tenant::registry::host_key;
use crate::tenant::{AddressingMode, TenantContext, TenantRegistry};

/// Tenant resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No tenant claims the request and no default tenant is configured.
    #[error("no tenant for host '{host}' and path '{path}'")]
    UnknownTenant { host: String, path: String },
}

/// Resolves the tenant of a request.
#[derive(Debug, Clone)]
pub struct TenantResolver {
    mode: AddressingMode,
    registry: Arc<TenantRegistry>,
    default_tenant: Option<String>,
}

impl TenantResolver {
    /// Create a resolver. The default tenant id is canonicalized through the registry.
    pub fn new(
        mode: AddressingMode,
        registry: Arc<TenantRegistry>,
        default_tenant: Option<String>,
    ) -> Self {
        let default_tenant = default_tenant.map(|id| {
            registry
                .get(&id)
                .map(|record| record.id.clone())
                .unwrap_or(id)
        });
        Self {
            mode,
            registry,
            default_tenant,
        }
    }

    pub fn mode(&self) -> AddressingMode {
        self.mode
    }

    pub fn registry(&self) -> &Arc<TenantRegistry> {
        &self.registry
    }

    /// Resolve the tenant for a request.
    pub fn resolve(&self, host: &str, path: &str) -> Result<TenantContext, ResolveError> {
        let path = normalize_path(path);
        match self.mode {
            AddressingMode::HostBased => self.resolve_by_host(host, path),
            AddressingMode::FolderPrefixed => self.resolve_by_folder(host, path),
        }
    }

    fn resolve_by_host(&self, host: &str, path: String) -> Result<TenantContext, ResolveError> {
        let host_key = host_key(host);

        let matched = self.registry.by_host(&host_key).or_else(|| {
            host_key
                .split_once('.')
                .and_then(|(subdomain, _)| self.registry.by_host(subdomain))
        });

        match matched {
            Some(record) => Ok(TenantContext::new(
                record.id.clone(),
                AddressingMode::HostBased,
                path,
                None,
            )),
            None => self.fall_back(host, path, AddressingMode::HostBased),
        }
    }

    fn resolve_by_folder(&self, host: &str, path: String) -> Result<TenantContext, ResolveError> {
        let trimmed = path.trim_start_matches('/');
        let first = trimmed.split('/').next().unwrap_or_default();

        if let Some(record) = self.registry.by_folder(first).filter(|_| !first.is_empty()) {
            let rest = &trimmed[first.len()..];
            let stripped = if rest.trim_matches('/').is_empty() {
                "/".to_string()
            } else {
                rest.to_string()
            };
            return Ok(TenantContext::new(
                record.id.clone(),
                AddressingMode::FolderPrefixed,
                stripped,
                Some(first.to_string()),
            ));
        }

        self.fall_back(host, path, AddressingMode::FolderPrefixed)
    }

    fn fall_back(
        &self,
        host: &str,
        path: String,
        mode: AddressingMode,
    ) -> Result<TenantContext, ResolveError> {
        match &self.default_tenant {
            Some(id) => Ok(TenantContext::new(id.clone(), mode, path, None)),
            None => Err(ResolveError::UnknownTenant {
                host: host.to_string(),
                path,
            }),
        }
    }
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TenantConfig;

    fn registry() -> Arc<TenantRegistry> {
        Arc::new(TenantRegistry::from_config(&[
            TenantConfig { id: "root".into(), hosts: vec!["example.com".into()] },
            TenantConfig { id: "acme".into(), hosts: vec!["acme".into(), "shop.acme.io".into()] },
        ]))
    }

    fn folder_resolver(default: Option<&str>) -> TenantResolver {
        TenantResolver::new(AddressingMode::FolderPrefixed, registry(), default.map(Into::into))
    }

    #[test]
    fn test_folder_segment_is_stripped() {
        let ctx = folder_resolver(None).resolve("example.com", "/ACME/blog/hello").unwrap();
        assert_eq!(ctx.tenant_id(), "acme");
        assert_eq!(ctx.path_without_tenant_segment(), "/blog/hello");
        assert_eq!(ctx.folder_segment(), Some("ACME"));
        assert_eq!(ctx.addressing_mode(), AddressingMode::FolderPrefixed);
    }

    #[test]
    fn test_folder_only_path_becomes_root() {
        let ctx = folder_resolver(None).resolve("example.com", "/acme/").unwrap();
        assert_eq!(ctx.path_without_tenant_segment(), "/");
        assert_eq!(ctx.tenant_qualified_path(), "/acme");
    }

    #[test]
    fn test_folder_match_is_exact() {
        let resolver = folder_resolver(Some("root"));
        let ctx = resolver.resolve("example.com", "/acme-corp/sitemap").unwrap();
        assert_eq!(ctx.tenant_id(), "root");
        assert_eq!(ctx.path_without_tenant_segment(), "/acme-corp/sitemap");
        assert!(!ctx.resolved_from_folder());
    }

    #[test]
    fn test_unknown_folder_without_default_fails() {
        let err = folder_resolver(None).resolve("example.com", "/other/sitemap").unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnknownTenant {
                host: "example.com".into(),
                path: "/other/sitemap".into(),
            }
        );
    }

    #[test]
    fn test_empty_path_uses_default() {
        let ctx = folder_resolver(Some("ROOT")).resolve("example.com", "").unwrap();
        assert_eq!(ctx.tenant_id(), "root");
        assert_eq!(ctx.path_without_tenant_segment(), "/");
    }

    #[test]
    fn test_host_based_full_host_and_subdomain() {
        let resolver = TenantResolver::new(AddressingMode::HostBased, registry(), None);

        let ctx = resolver.resolve("Shop.Acme.io:8443", "/acme/sitemap").unwrap();
        assert_eq!(ctx.tenant_id(), "acme");
        assert_eq!(ctx.path_without_tenant_segment(), "/acme/sitemap");

        let ctx = resolver.resolve("acme.example.com", "/").unwrap();
        assert_eq!(ctx.tenant_id(), "acme");

        let ctx = resolver.resolve("example.com.", "/").unwrap();
        assert_eq!(ctx.tenant_id(), "root");

        assert!(resolver.resolve("[::1]:8080", "/").is_err());
    }

    #[test]
    fn test_host_based_default() {
        let resolver = TenantResolver::new(AddressingMode::HostBased, registry(), Some("root".into()));
        let ctx = resolver.resolve("unknown.test", "/blog").unwrap();
        assert_eq!(ctx.tenant_id(), "root");
        assert_eq!(ctx.path_without_tenant_segment(), "/blog");
    }
}

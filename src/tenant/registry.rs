//! Static tenant registry.
//!
//! # Responsibilities
//! - Hold every known tenant, keyed by folder name and by host key
//! - Answer read-only lookups from the resolver and the folder route constraint
//!
//! # Design Decisions
//! - Keys are normalized to lowercase once at construction
//! - O(1) lookups via HashMap; no locking since nothing writes after startup

use std::collections::HashMap;

use crate::config::TenantConfig;

/// A known tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRecord {
    /// Canonical id, also the folder name.
    pub id: String,
    /// Host keys owned by this tenant, lowercase.
    pub hosts: Vec<String>,
}

/// Read-only mapping of folder names and host keys to tenant records.
#[derive(Debug, Default)]
pub struct TenantRegistry {
    records: Vec<TenantRecord>,
    by_folder: HashMap<String, usize>,
    by_host: HashMap<String, usize>,
}

impl TenantRegistry {
    /// Build the registry from validated configuration.
    pub fn from_config(tenants: &[TenantConfig]) -> Self {
        let mut registry = Self::default();
        for tenant in tenants {
            registry.insert(TenantRecord {
                id: tenant.id.trim().to_string(),
                hosts: tenant.hosts.iter().map(|h| h.trim().to_lowercase()).collect(),
            });
        }
        tracing::debug!(tenants = registry.len(), "Tenant registry loaded");
        registry
    }

    fn insert(&mut self, record: TenantRecord) {
        let index = self.records.len();
        self.by_folder.entry(record.id.to_lowercase()).or_insert(index);
        for host in &record.hosts {
            self.by_host.entry(host.clone()).or_insert(index);
        }
        self.records.push(record);
    }

    /// Look up a tenant by folder segment (exact, case-insensitive).
    pub fn by_folder(&self, segment: &str) -> Option<&TenantRecord> {
        self.by_folder
            .get(&segment.to_lowercase())
            .map(|&i| &self.records[i])
    }

    /// Look up a tenant by host key (exact, case-insensitive).
    pub fn by_host(&self, host_key: &str) -> Option<&TenantRecord> {
        self.by_host
            .get(&host_key.to_lowercase())
            .map(|&i| &self.records[i])
    }

    /// Look up a tenant by id.
    pub fn get(&self, id: &str) -> Option<&TenantRecord> {
        self.by_folder(id)
    }

    pub fn is_folder(&self, segment: &str) -> bool {
        self.by_folder(segment).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TenantRecord> {
        self.records.iter()
    }

    /// Host to send a tenant's HTTPS redirect to.
    ///
    /// The request host is kept only when it is exactly one of the tenant's
    /// registered hosts; otherwise the tenant's first registered host is used.
    /// `None` when the tenant has no registered host.
    pub fn redirect_host(&self, tenant_id: &str, request_host: &str) -> Option<String> {
        let record = self.get(tenant_id)?;
        let key = host_key(request_host);
        if record.hosts.iter().any(|host| *host == key) {
            return Some(request_host.trim().to_string());
        }
        record.hosts.first().cloned()
    }
}

/// Lowercase host without port or trailing dot.
pub(crate) fn host_key(host: &str) -> String {
    let host = host.trim();
    let without_port = if let Some(rest) = host.strip_prefix('[') {
        // IPv6 literal
        rest.split(']').next().unwrap_or(rest)
    } else {
        host.rsplit_once(':').map(|(h, _)| h).unwrap_or(host)
    };
    without_port.trim_end_matches('.').to_lowercase()
}

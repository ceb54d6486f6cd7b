//! Tenant identification subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (host, path)
//!     → resolver.rs (pick tenant by host key or leading folder segment)
//!     → registry.rs (static lookup of known tenants)
//!     → Return: TenantContext or UnknownTenant
//! ```
//!
//! # Design Decisions
//! - Registry is loaded once from config and never mutated
//! - Resolution is a pure function of (host, path, registry)
//! - Folder matching is exact and case-insensitive
//! - The addressing mode is a deployment-time choice, never per request

pub mod registry;
pub mod resolver;

use serde::{Deserialize, Serialize};

pub use registry::{TenantRecord, TenantRegistry};
pub use resolver::{ResolveError, TenantResolver};

/// How tenants are told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressingMode {
    /// Tenant is derived from the Host header.
    HostBased,
    /// Tenant is the first path segment.
    FolderPrefixed,
}

impl std::fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressingMode::HostBased => write!(f, "host_based"),
            AddressingMode::FolderPrefixed => write!(f, "folder_prefixed"),
        }
    }
}

/// The tenant a request belongs to.
///
/// Created once per request by [`TenantResolver`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: String,
    addressing_mode: AddressingMode,
    path_without_tenant_segment: String,
    folder_segment: Option<String>,
}

impl TenantContext {
    pub(crate) fn new(
        tenant_id: impl Into<String>,
        addressing_mode: AddressingMode,
        path_without_tenant_segment: impl Into<String>,
        folder_segment: Option<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            addressing_mode,
            path_without_tenant_segment: path_without_tenant_segment.into(),
            folder_segment,
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn addressing_mode(&self) -> AddressingMode {
        self.addressing_mode
    }

    /// Request path with the tenant folder removed (unchanged when no folder matched).
    pub fn path_without_tenant_segment(&self) -> &str {
        &self.path_without_tenant_segment
    }

    /// The raw folder segment that identified the tenant, if any.
    pub fn folder_segment(&self) -> Option<&str> {
        self.folder_segment.as_deref()
    }

    pub fn resolved_from_folder(&self) -> bool {
        self.folder_segment.is_some()
    }

    /// The path as tenant-scoped routes see it: folder segment followed by the rest.
    pub fn tenant_qualified_path(&self) -> String {
        match &self.folder_segment {
            Some(folder) => {
                let rest = self.path_without_tenant_segment.trim_start_matches('/');
                if rest.is_empty() {
                    format!("/{}", folder)
                } else {
                    format!("/{}/{}", folder, rest)
                }
            }
            None => self.path_without_tenant_segment.clone(),
        }
    }
}

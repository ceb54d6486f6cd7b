//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dispatcher.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::tenant::AddressingMode;

/// Root configuration for the dispatch service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DispatchConfig {
    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Deployment environment.
    pub environment: Environment,

    /// Tenant identification settings and the static tenant registry.
    pub tenancy: TenancyConfig,

    /// Transport security and identity settings.
    pub security: SecurityConfig,

    /// Locale negotiation settings.
    pub localization: LocalizationConfig,

    /// Cross-origin settings.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Tenant identification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TenancyConfig {
    /// How tenants are identified. Fixed for the process lifetime.
    pub mode: AddressingMode,

    /// Register folder-scoped routes when running in folder mode.
    pub folder_routes: bool,

    /// Tenant that receives requests no other tenant claims.
    pub default_tenant: Option<String>,

    /// Known tenants.
    pub tenants: Vec<TenantConfig>,
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            mode: AddressingMode::HostBased,
            folder_routes: true,
            default_tenant: None,
            tenants: Vec::new(),
        }
    }
}

/// A single tenant record.
///
/// The id doubles as the tenant's folder name in folder-prefixed mode.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TenantConfig {
    /// Tenant identifier and folder name.
    pub id: String,

    /// Host keys (full host names or leading subdomain labels) owned by this tenant.
    #[serde(default)]
    pub hosts: Vec<String>,
}

/// Transport security and identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SecurityConfig {
    /// Require HTTPS for every route.
    pub require_https: bool,

    /// Skip identity server setup entirely.
    pub disable_identity_server: bool,

    /// Path to the token signing certificate (production only).
    pub signing_cert_path: Option<String>,

    /// Password protecting the signing certificate.
    pub signing_cert_password: Option<String>,
}

/// Locale negotiation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocalizationConfig {
    /// Culture used when no hint names a supported culture.
    pub default_culture: String,

    /// Cultures the deployment can serve.
    pub supported_cultures: Vec<String>,

    /// Query string parameter carrying an explicit culture.
    pub query_key: String,

    /// Cookie carrying a persisted culture choice.
    pub cookie_name: String,

    /// Accept "fr" for a "fr-FR" hint when only the parent is supported.
    pub fallback_to_parent: bool,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            default_culture: "en-US".to_string(),
            supported_cultures: vec!["en-US".to_string()],
            query_key: "culture".to_string(),
            cookie_name: "culture".to_string(),
            fallback_to_parent: true,
        }
    }
}

/// Cross-origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Apply the permissive default policy (any origin, header, method).
    pub enabled: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: DispatchConfig = toml::from_str("").unwrap();
        assert_eq!(config.tenancy.mode, AddressingMode::HostBased);
        assert!(config.tenancy.folder_routes);
        assert!(!config.security.require_https);
        assert_eq!(config.localization.default_culture, "en-US");
        assert_eq!(config.environment, Environment::Production);
    }

    #[test]
    fn test_full_tenancy_section() {
        let config: DispatchConfig = toml::from_str(
            r#"
            environment = "development"

            [tenancy]
            mode = "folder_prefixed"
            default_tenant = "root"

            [[tenancy.tenants]]
            id = "root"
            hosts = ["example.com"]

            [[tenancy.tenants]]
            id = "acme"

            [security]
            require_https = true
            "#,
        )
        .unwrap();

        assert_eq!(config.tenancy.mode, AddressingMode::FolderPrefixed);
        assert_eq!(config.tenancy.default_tenant.as_deref(), Some("root"));
        assert_eq!(config.tenancy.tenants.len(), 2);
        assert!(config.tenancy.tenants[1].hosts.is_empty());
        assert!(config.security.require_https);
        assert!(config.environment.is_development());
    }
}

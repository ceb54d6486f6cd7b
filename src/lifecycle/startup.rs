//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Build the tenant registry, then the route table (exactly once)
//! - Assemble the dispatcher and evaluate identity setup
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: configuration and route table errors are fatal
//! - Identity setup problems are a reported status, not a startup failure
//! - Listeners start last (traffic only when ready)

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{validate_config, ConfigError, DispatchConfig};
use crate::dispatch::Dispatcher;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::policy::{PolicyComposer, PolicyConfig};
use crate::routing::{RouteTable, RouteTableBuilder, RouteTableError};
use crate::tenant::{TenantRegistry, TenantResolver};

/// Fatal startup failure.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("route table error: {0}")]
    RouteTable(#[from] RouteTableError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Outcome of configuring the identity server's token signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentitySetup {
    /// Switched off by configuration.
    Disabled,
    /// Ephemeral developer credential; development environment only.
    DeveloperCredential,
    /// Production signing certificate.
    SigningCertificate { path: PathBuf },
    /// Production without a usable credential.
    Failed { reason: String },
}

impl IdentitySetup {
    /// Decide how identity signing is configured.
    pub fn evaluate(config: &DispatchConfig) -> Self {
        let security = &config.security;
        if security.disable_identity_server {
            return IdentitySetup::Disabled;
        }
        if config.environment.is_development() {
            return IdentitySetup::DeveloperCredential;
        }

        let path = security
            .signing_cert_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());
        let password = security
            .signing_cert_password
            .as_deref()
            .filter(|p| !p.trim().is_empty());

        match (path, password) {
            (Some(path), Some(_)) => {
                let path = PathBuf::from(path);
                match std::fs::metadata(&path) {
                    Ok(meta) if meta.is_file() => IdentitySetup::SigningCertificate { path },
                    Ok(_) => IdentitySetup::Failed {
                        reason: format!("signing certificate '{}' is not a file", path.display()),
                    },
                    Err(e) => IdentitySetup::Failed {
                        reason: format!("signing certificate '{}' unreadable: {}", path.display(), e),
                    },
                }
            }
            _ => IdentitySetup::Failed {
                reason: "signing certificate path and password are required in production".into(),
            },
        }
    }

    /// True when identity endpoints can issue tokens.
    pub fn is_ready(&self) -> bool {
        matches!(
            self,
            IdentitySetup::DeveloperCredential | IdentitySetup::SigningCertificate { .. }
        )
    }
}

impl fmt::Display for IdentitySetup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentitySetup::Disabled => write!(f, "disabled"),
            IdentitySetup::DeveloperCredential => write!(f, "developer credential"),
            IdentitySetup::SigningCertificate { path } => {
                write!(f, "signing certificate {}", path.display())
            }
            IdentitySetup::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

/// Every long-lived component, assembled in dependency order.
pub struct Application {
    config: DispatchConfig,
    registry: Arc<TenantRegistry>,
    table: Arc<RouteTable>,
    dispatcher: Arc<Dispatcher>,
    identity: IdentitySetup,
}

impl Application {
    /// Validate configuration and assemble the application.
    pub fn build(config: DispatchConfig) -> Result<Self, StartupError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let tenancy = &config.tenancy;
        let registry = Arc::new(TenantRegistry::from_config(&tenancy.tenants));

        let table = Arc::new(
            RouteTableBuilder::new(registry.clone()).build(tenancy.mode, tenancy.folder_routes)?,
        );

        let resolver = TenantResolver::new(
            tenancy.mode,
            registry.clone(),
            tenancy.default_tenant.clone(),
        );
        let composer = PolicyComposer::new(PolicyConfig::from_config(&config));
        let dispatcher = Arc::new(Dispatcher::new(resolver, table.clone(), composer));

        let identity = IdentitySetup::evaluate(&config);
        match &identity {
            IdentitySetup::Failed { reason } => {
                tracing::error!(reason = %reason, "Identity server setup failed; identity administration stays role-protected")
            }
            setup => tracing::info!(identity = %setup, "Identity server configured"),
        }

        tracing::info!(
            mode = %tenancy.mode,
            tenants = registry.len(),
            routes = table.len(),
            require_https = config.security.require_https,
            "Dispatcher ready"
        );

        Ok(Self {
            config,
            registry,
            table,
            dispatcher,
            identity,
        })
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<TenantRegistry> {
        &self.registry
    }

    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn identity(&self) -> &IdentitySetup {
        &self.identity
    }

    /// HTTP server over this application's dispatcher.
    pub fn http_server(&self) -> HttpServer {
        HttpServer::new(&self.config, self.dispatcher.clone())
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn serve(self, shutdown: &Shutdown) -> Result<(), StartupError> {
        let address = self.config.listener.bind_address.clone();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| StartupError::Bind {
                address: address.clone(),
                source,
            })?;

        self.http_server()
            .run(listener, shutdown.subscribe())
            .await
            .map_err(StartupError::Serve)
    }
}

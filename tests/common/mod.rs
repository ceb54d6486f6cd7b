//! Shared utilities for integration tests.

use std::net::SocketAddr;

use tenant_dispatch::config::{DispatchConfig, Environment, TenantConfig};
use tenant_dispatch::lifecycle::{Application, Shutdown};
use tenant_dispatch::tenant::AddressingMode;
use tokio::net::TcpListener;

/// Tenants `root` (example.com) and `acme` (acme.test, acme).
pub fn tenants() -> Vec<TenantConfig> {
    vec![
        TenantConfig {
            id: "root".into(),
            hosts: vec!["example.com".into()],
        },
        TenantConfig {
            id: "acme".into(),
            hosts: vec!["acme.test".into(), "acme".into()],
        },
    ]
}

/// Folder-prefixed deployment with `root` as the default tenant.
pub fn folder_config() -> DispatchConfig {
    let mut config = DispatchConfig::default();
    config.environment = Environment::Development;
    config.tenancy.mode = AddressingMode::FolderPrefixed;
    config.tenancy.default_tenant = Some("root".into());
    config.tenancy.tenants = tenants();
    config.localization.supported_cultures = vec!["en-US".into(), "fr-FR".into(), "de".into()];
    config
}

/// Host-based deployment without a default tenant.
#[allow(dead_code)]
pub fn host_config() -> DispatchConfig {
    let mut config = folder_config();
    config.tenancy.mode = AddressingMode::HostBased;
    config.tenancy.default_tenant = None;
    config
}

pub fn build(config: DispatchConfig) -> Application {
    Application::build(config).expect("valid test configuration")
}

/// Serve `config` on an ephemeral port until the returned coordinator triggers.
#[allow(dead_code)]
pub async fn spawn_server(config: DispatchConfig) -> (SocketAddr, Shutdown) {
    let app = build(config);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = app.http_server();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });

    (addr, shutdown)
}

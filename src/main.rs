//! Multi-tenant request dispatcher.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ TenantResolver ──▶ RouteTable ──▶ PolicyComposer
//!                                          │                 │                │
//!                                     NoTenant (404)    NoRoute (404)        ▼
//!                                                                transport ▶ roles ▶ content
//!     Client Response                                                              │
//!     ◀────────────── Cache-Control / Content-Language ◀───────────────────────────┘
//!
//!     Cross-cutting: config (TOML) · observability (tracing, metrics) · lifecycle
//! ```
//!
//! # Commands
//! - `serve` (default): run the HTTP server
//! - `routes`: print the compiled route table in match order, or the rule `--path` matches
//! - `check`: validate the configuration, list tenants and report identity setup

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use tenant_dispatch::config::{read_config, DispatchConfig};
use tenant_dispatch::lifecycle::{spawn_signal_listener, Application, Shutdown};
use tenant_dispatch::observability::{logging, metrics};
use tenant_dispatch::routing::RouteRule;

#[derive(Parser)]
#[command(name = "tenant-dispatch", version, about = "Multi-tenant request dispatcher")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "TENANT_DISPATCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone)]
enum Command {
    /// Run the HTTP server.
    Serve,
    /// Print the compiled route table.
    Routes {
        /// Only show the rule a raw request path matches.
        #[arg(long)]
        path: Option<String>,
    },
    /// Validate the configuration.
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Serve);

    let config = match &cli.config {
        Some(path) => match read_config(path) {
            Ok(config) => Ok(config),
            Err(e) => Err((path, e)),
        },
        None => Ok(DispatchConfig::default()),
    };

    // Logging first, with defaults when the file is unusable, so the error is visible.
    let observability = config
        .as_ref()
        .map(|c| c.observability.clone())
        .unwrap_or_default();
    logging::init_logging(&observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "tenant-dispatch starting");

    let config = match config {
        Ok(config) => config,
        Err((path, e)) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to read configuration");
            return ExitCode::FAILURE;
        }
    };
    match &cli.config {
        Some(path) => tracing::info!(path = %path.display(), "Configuration loaded"),
        None => tracing::warn!("No configuration file given; using defaults"),
    }

    let app = match Application::build(config) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    match command {
        Command::Check => check(&app),
        Command::Routes { path: None } => {
            for rule in app.table().rules() {
                print_rule(rule);
            }
            ExitCode::SUCCESS
        }
        Command::Routes { path: Some(path) } => match app.table().lookup_path(&path) {
            Some(matched) => {
                print_rule(&matched.rule);
                for (key, value) in &matched.values {
                    println!("     {} = {}", key, value);
                }
                ExitCode::SUCCESS
            }
            None => {
                println!("no rule matches {}", path);
                ExitCode::FAILURE
            }
        },
        Command::Serve => serve(app).await,
    }
}

fn print_rule(rule: &RouteRule) {
    println!(
        "{:>3}  {:<20} {:<45} {:<14} {}",
        rule.registration_order(),
        rule.name(),
        rule.template().as_str(),
        rule.target_handler(),
        rule.category().as_str()
    );
}

fn check(app: &Application) -> ExitCode {
    println!(
        "configuration OK: {} tenants, {} routes",
        app.registry().len(),
        app.table().len()
    );
    for tenant in app.registry().iter() {
        println!("  tenant {:<20} hosts: {}", tenant.id, tenant.hosts.join(", "));
    }

    let identity = app.identity();
    println!("identity: {}", identity);
    if app.config().security.disable_identity_server || identity.is_ready() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn serve(app: Application) -> ExitCode {
    let observability = &app.config().observability;
    if observability.metrics_enabled {
        match observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    if let Err(e) = app.serve(&shutdown).await {
        tracing::error!(error = %e, "Server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}

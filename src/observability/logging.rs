//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Pick pretty or JSON output from configuration
//!
//! # Design Decisions
//! - RUST_LOG wins over the configured level when set
//! - Library code only emits events; the binary installs the subscriber

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Build the filter: RUST_LOG if present, else `tenant_dispatch=<level>,tower_http=<level>`.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "tenant_dispatch={level},tower_http={level}",
            level = config.log_level
        )
        .into()
    })
}

/// Install the global subscriber. Returns false if one was already installed.
pub fn init_logging(config: &ObservabilityConfig) -> bool {
    let json = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .try_init()
        .is_ok()
}

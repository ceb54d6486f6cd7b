//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (default tenant exists, default culture is supported)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect conflicting tenant ids and host keys
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DispatchConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::DispatchConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("tenant id must not be empty")]
    EmptyTenantId,

    #[error("tenant id '{0}' must be a single path segment")]
    TenantIdNotSegment(String),

    #[error("tenant id '{0}' is declared more than once")]
    DuplicateTenant(String),

    #[error("host key '{host}' is claimed by both '{first}' and '{second}'")]
    DuplicateHost {
        host: String,
        first: String,
        second: String,
    },

    #[error("default tenant '{0}' is not a registered tenant")]
    UnknownDefaultTenant(String),

    #[error("at least one supported culture is required")]
    NoSupportedCultures,

    #[error("default culture '{0}' is not in the supported cultures")]
    UnsupportedDefaultCulture(String),

    #[error("invalid {field} '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &DispatchConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_tenancy(config, &mut errors);
    validate_localization(config, &mut errors);

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "bind address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "metrics address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_tenancy(config: &DispatchConfig, errors: &mut Vec<ValidationError>) {
    let mut ids = HashSet::new();
    let mut hosts: Vec<(String, &str)> = Vec::new();

    for tenant in &config.tenancy.tenants {
        let id = tenant.id.trim();
        if id.is_empty() {
            errors.push(ValidationError::EmptyTenantId);
            continue;
        }
        if id.contains('/') {
            errors.push(ValidationError::TenantIdNotSegment(tenant.id.clone()));
        }
        if !ids.insert(id.to_lowercase()) {
            errors.push(ValidationError::DuplicateTenant(tenant.id.clone()));
        }

        for host in &tenant.hosts {
            let key = host.trim().to_lowercase();
            if let Some((_, owner)) = hosts.iter().find(|(h, _)| *h == key) {
                errors.push(ValidationError::DuplicateHost {
                    host: key.clone(),
                    first: owner.to_string(),
                    second: tenant.id.clone(),
                });
            } else {
                hosts.push((key, tenant.id.as_str()));
            }
        }
    }

    if let Some(default) = &config.tenancy.default_tenant {
        if !ids.contains(&default.trim().to_lowercase()) {
            errors.push(ValidationError::UnknownDefaultTenant(default.clone()));
        }
    }
}

fn validate_localization(config: &DispatchConfig, errors: &mut Vec<ValidationError>) {
    let localization = &config.localization;
    if localization.supported_cultures.is_empty() {
        errors.push(ValidationError::NoSupportedCultures);
        return;
    }
    let supported = localization
        .supported_cultures
        .iter()
        .any(|c| c.eq_ignore_ascii_case(&localization.default_culture));
    if !supported {
        errors.push(ValidationError::UnsupportedDefaultCulture(
            localization.default_culture.clone(),
        ));
    }
}

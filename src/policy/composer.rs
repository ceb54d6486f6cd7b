//! Effective policy composition.
//!
//! # Responsibilities
//! - Merge global configuration with the matched rule's category
//! - Negotiate the request culture
//! - Absorb every composition problem locally
//!
//! # Design Decisions
//! - Transport security is one process-wide switch, no per-route override
//! - Each concern is computed independently so none can override another
//! - Composition never fails; warnings are logged, not returned

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::DispatchConfig;
use crate::policy::cache::{cache_directive, CacheDirective};
use crate::policy::culture::{CultureHints, CultureNegotiator};
use crate::policy::roles::{effective_category, required_roles};
use crate::routing::{RouteCategory, RouteRule, RouteValues};
use crate::tenant::TenantContext;

/// Security and behavior directives for one matched request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectivePolicy {
    /// Category the request is authorized and cached as.
    pub category: RouteCategory,
    pub require_transport_security: bool,
    /// Any one of these roles is sufficient; empty means no role check.
    pub required_roles: BTreeSet<String>,
    pub cache_directive: Option<CacheDirective>,
    pub culture: String,
}

/// Process-wide inputs to policy composition.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    pub require_https: bool,
    pub negotiator: CultureNegotiator,
}

impl PolicyConfig {
    pub fn from_config(config: &DispatchConfig) -> Self {
        Self {
            require_https: config.security.require_https,
            negotiator: CultureNegotiator::from_config(&config.localization),
        }
    }
}

/// Produces the effective policy for a matched rule.
#[derive(Debug, Clone)]
pub struct PolicyComposer {
    config: PolicyConfig,
}

impl PolicyComposer {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Compose the policy for `rule` matched with the bound `values`.
    pub fn compose(
        &self,
        rule: &RouteRule,
        values: &RouteValues,
        tenant: &TenantContext,
        hints: &CultureHints,
    ) -> EffectivePolicy {
        let negotiated = self.config.negotiator.negotiate(hints);
        for warning in &negotiated.warnings {
            tracing::debug!(
                tenant = %tenant.tenant_id(),
                rule = %rule.name(),
                warning = %warning,
                "Culture hint ignored"
            );
        }

        let category = effective_category(rule, values);
        if category != rule.category() {
            tracing::debug!(
                tenant = %tenant.tenant_id(),
                rule = %rule.name(),
                category = category.as_str(),
                "Category taken from bound controller"
            );
        }

        EffectivePolicy {
            category,
            require_transport_security: self.config.require_https,
            required_roles: required_roles(category),
            cache_directive: cache_directive(category),
            culture: negotiated.culture,
        }
    }
}

//! Dispatch outcomes.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::policy::EffectivePolicy;
use crate::routing::{RouteRule, RouteValues};
use crate::tenant::TenantContext;

/// States a request passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Resolving,
    Matching,
    PolicyComposing,
    Dispatched,
    Rejected,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DispatchState::Resolving => "resolving",
            DispatchState::Matching => "matching",
            DispatchState::PolicyComposing => "policy_composing",
            DispatchState::Dispatched => "dispatched",
            DispatchState::Rejected => "rejected",
        })
    }
}

/// Why a request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// No tenant claims the request.
    NoTenant,
    /// No route matches the path.
    NoRoute,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NoTenant => "no_tenant",
            RejectReason::NoRoute => "no_route",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A terminal rejection handed to the error renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub reason: RejectReason,
    /// State in which the request was rejected.
    pub during: DispatchState,
    pub host: String,
    pub path: String,
    /// Resolved tenant, when rejection happened after resolution.
    pub tenant_id: Option<String>,
}

/// Everything the content handler needs.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub tenant: TenantContext,
    pub rule: Arc<RouteRule>,
    pub values: RouteValues,
    pub policy: EffectivePolicy,
}

impl Dispatch {
    pub fn target_handler(&self) -> &str {
        self.rule.target_handler()
    }
}

/// Final state of one dispatch cycle.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    Dispatched(Box<Dispatch>),
    Rejected(Rejection),
}

impl DispatchOutcome {
    pub fn state(&self) -> DispatchState {
        match self {
            DispatchOutcome::Dispatched(_) => DispatchState::Dispatched,
            DispatchOutcome::Rejected(_) => DispatchState::Rejected,
        }
    }

    pub fn dispatched(&self) -> Option<&Dispatch> {
        match self {
            DispatchOutcome::Dispatched(dispatch) => Some(dispatch),
            DispatchOutcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            DispatchOutcome::Dispatched(_) => None,
            DispatchOutcome::Rejected(rejection) => Some(rejection),
        }
    }
}

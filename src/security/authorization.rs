//! Role-based authorization.
//!
//! # Responsibilities
//! - Identify the caller through an [`Authorizer`] collaborator
//! - Check the caller against a route's required roles
//!
//! # Design Decisions
//! - Holding any one required role is sufficient
//! - Role names compare exactly; the host application owns identity
//! - An empty requirement needs no principal at all

use std::collections::BTreeSet;
use std::fmt;

use axum::http::HeaderMap;

/// Header naming the authenticated user.
pub const X_USER: &str = "x-user";
/// Comma-separated roles of the authenticated user.
pub const X_USER_ROLES: &str = "x-user-roles";

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
    pub roles: BTreeSet<String>,
}

impl Principal {
    pub fn new<I, S>(name: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_any_role(&self, required: &BTreeSet<String>) -> bool {
        !self.roles.is_disjoint(required)
    }
}

/// Result of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allow,
    /// No principal; maps to 401.
    Unauthenticated,
    /// Principal without a required role; maps to 403.
    Forbidden,
}

impl fmt::Display for AuthDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuthDecision::Allow => "allow",
            AuthDecision::Unauthenticated => "unauthenticated",
            AuthDecision::Forbidden => "forbidden",
        })
    }
}

/// Identifies the caller of a request.
pub trait Authorizer: Send + Sync {
    /// The authenticated principal, if any.
    fn principal(&self, headers: &HeaderMap) -> Option<Principal>;

    /// Decide whether the caller satisfies `required`.
    fn authorize(&self, headers: &HeaderMap, required: &BTreeSet<String>) -> AuthDecision {
        if required.is_empty() {
            return AuthDecision::Allow;
        }
        match self.principal(headers) {
            None => AuthDecision::Unauthenticated,
            Some(principal) if principal.has_any_role(required) => AuthDecision::Allow,
            Some(_) => AuthDecision::Forbidden,
        }
    }
}

/// Reads the principal from headers set by a trusted front end.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderRoleAuthorizer;

impl Authorizer for HeaderRoleAuthorizer {
    fn principal(&self, headers: &HeaderMap) -> Option<Principal> {
        let name = headers
            .get(X_USER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())?;

        let roles = headers
            .get_all(X_USER_ROLES)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .map(str::trim)
            .filter(|role| !role.is_empty());

        Some(Principal::new(name, roles))
    }
}

//! Transport security enforcement.
//!
//! # Responsibilities
//! - Detect whether a request arrived over HTTPS
//! - Redirect safe methods to the HTTPS URL, refuse the rest
//!
//! # Design Decisions
//! - `X-Forwarded-Proto` is honored so TLS may terminate upstream
//! - Only GET and HEAD are redirected; replaying a body over a redirect is unsafe
//! - The redirect host is chosen by the caller from registered hosts, never taken
//!   from the request as-is; without one the request is refused

use axum::http::{HeaderMap, Method, Uri};

/// Header set by TLS-terminating proxies.
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// What to do with a request under the transport policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportDecision {
    Allow,
    Redirect(String),
    Refuse,
}

/// True if the request was received over HTTPS.
pub fn is_secure(uri: &Uri, headers: &HeaderMap) -> bool {
    if uri.scheme_str().is_some_and(|s| s.eq_ignore_ascii_case("https")) {
        return true;
    }
    headers
        .get(X_FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"))
}

/// Apply the transport requirement to a request.
pub fn enforce_transport(
    required: bool,
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    redirect_host: Option<&str>,
) -> TransportDecision {
    if !required || is_secure(uri, headers) {
        return TransportDecision::Allow;
    }

    match redirect_host {
        Some(host) if method == Method::GET || method == Method::HEAD => {
            let target = uri
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            TransportDecision::Redirect(format!("https://{}{}", host, target))
        }
        _ => TransportDecision::Refuse,
    }
}

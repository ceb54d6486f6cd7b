//! Response decoration.
//!
//! # Responsibilities
//! - Add the cache directive and negotiated culture to handler responses
//! - Build the redirect and refusal responses for policy failures
//!
//! # Design Decisions
//! - Headers set by the content handler are overwritten; policy is authoritative
//! - Invalid header values are skipped with a warning, never a 500

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::policy::EffectivePolicy;

/// Apply `Cache-Control` and `Content-Language` from the effective policy.
pub fn apply_policy_headers(mut response: Response, policy: &EffectivePolicy) -> Response {
    let headers = response.headers_mut();

    if let Some(directive) = &policy.cache_directive {
        match HeaderValue::from_str(&directive.header_value()) {
            Ok(value) => {
                headers.insert(header::CACHE_CONTROL, value);
            }
            Err(e) => tracing::warn!(error = %e, profile = %directive.profile, "Invalid Cache-Control value"),
        }
    }

    match HeaderValue::from_str(&policy.culture) {
        Ok(value) => {
            headers.insert(header::CONTENT_LANGUAGE, value);
        }
        Err(e) => tracing::warn!(error = %e, culture = %policy.culture, "Invalid Content-Language value"),
    }

    response
}

/// 302 to the HTTPS location.
pub fn https_redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

/// Plain status response for a policy denial.
pub fn denied(status: StatusCode, message: &'static str) -> Response {
    (status, message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use crate::policy::{CacheDirective, SITEMAP_PROFILE};
    use crate::routing::RouteCategory;

    fn policy(cache: Option<CacheDirective>) -> EffectivePolicy {
        EffectivePolicy {
            category: RouteCategory::Sitemap,
            require_transport_security: false,
            required_roles: BTreeSet::new(),
            cache_directive: cache,
            culture: "fr-FR".into(),
        }
    }

    #[test]
    fn test_cache_and_language_headers() {
        let response = apply_policy_headers(
            StatusCode::OK.into_response(),
            &policy(Some(CacheDirective::from(SITEMAP_PROFILE))),
        );
        assert_eq!(response.headers()[header::CACHE_CONTROL], "public,max-age=30");
        assert_eq!(response.headers()[header::CONTENT_LANGUAGE], "fr-FR");
    }

    #[test]
    fn test_no_cache_directive_leaves_cache_control_alone() {
        let response = apply_policy_headers(StatusCode::OK.into_response(), &policy(None));
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    }

    #[test]
    fn test_redirect_sets_location() {
        let response = https_redirect("https://acme.test/blog");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "https://acme.test/blog");
    }
}

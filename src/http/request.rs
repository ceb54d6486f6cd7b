//! Request extraction.
//!
//! # Responsibilities
//! - Pull the dispatch inputs (host, path, culture hints) out of an HTTP request
//! - Read the request ID assigned by the request-id layer
//!
//! # Design Decisions
//! - Host comes from the `Host` header, falling back to the URI authority
//! - Query and cookie parsing never fail; unreadable input is treated as absent
//! - Only the configured query key and cookie name are consulted
//! - Path segments are percent-decoded before dispatch; an encoded `/` stays encoded

use axum::http::{header, HeaderMap, Uri};
use percent_encoding::percent_decode_str;
use url::form_urlencoded;

use crate::config::LocalizationConfig;
use crate::dispatch::DispatchRequest;
use crate::policy::CultureHints;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID from headers, or "unknown".
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Host the client addressed, including any port.
pub fn request_host(uri: &Uri, headers: &HeaderMap) -> String {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.to_string()))
        .unwrap_or_default()
}

/// Culture hints from the query string, cookie and Accept-Language header.
pub fn culture_hints(uri: &Uri, headers: &HeaderMap, localization: &LocalizationConfig) -> CultureHints {
    let query = uri.query().and_then(|q| {
        form_urlencoded::parse(q.as_bytes())
            .find(|(key, _)| key.eq_ignore_ascii_case(&localization.query_key))
            .map(|(_, value)| value.into_owned())
    });

    let cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == localization.cookie_name)
        .map(|(_, value)| decode_cookie_value(value));

    let accept_language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    CultureHints {
        query,
        cookie,
        accept_language,
    }
}

/// Build the transport-independent dispatch input.
pub fn dispatch_request(uri: &Uri, headers: &HeaderMap, localization: &LocalizationConfig) -> DispatchRequest {
    DispatchRequest::new(request_host(uri, headers), decode_path(uri.path()))
        .with_culture_hints(culture_hints(uri, headers, localization))
}

/// Percent-decode each path segment. Segments that are not UTF-8 or that
/// decode to contain `/` are kept as sent.
pub fn decode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| match percent_decode_str(segment).decode_utf8() {
            Ok(decoded) if !decoded.contains('/') => decoded.into_owned(),
            _ => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Cookie values may be quoted and percent-encoded (`c%3Dfr-FR%7Cuic%3Dfr-FR`).
fn decode_cookie_value(value: &str) -> String {
    let value = value.trim().trim_matches('"');
    form_urlencoded::parse(format!("v={}", value).as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
        .unwrap_or_else(|| value.to_string())
}

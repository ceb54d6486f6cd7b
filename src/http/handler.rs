//! Content and error collaborators.
//!
//! The dispatcher decides which handler and policy apply; rendering belongs to
//! the host application. These traits are the handoff points, and the default
//! implementations describe the handoff as JSON.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::dispatch::{Dispatch, Rejection};

/// Renders the response for a dispatched request.
pub trait ContentHandler: Send + Sync {
    fn render(&self, dispatch: &Dispatch) -> Response;
}

/// Renders the response for a rejected request.
pub trait ErrorRenderer: Send + Sync {
    fn render(&self, rejection: &Rejection) -> Response;
}

/// Describes the dispatch decision instead of rendering content.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchSummaryHandler;

impl ContentHandler for DispatchSummaryHandler {
    fn render(&self, dispatch: &Dispatch) -> Response {
        Json(json!({
            "tenant": dispatch.tenant.tenant_id(),
            "addressing_mode": dispatch.tenant.addressing_mode(),
            "resolved_from_folder": dispatch.tenant.resolved_from_folder(),
            "rule": dispatch.rule.name(),
            "handler": dispatch.target_handler(),
            "category": dispatch.policy.category,
            "values": dispatch.values,
            "policy": dispatch.policy,
        }))
        .into_response()
    }
}

/// Not-found JSON for every rejection; the path is only shown in development.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorRenderer {
    development: bool,
}

impl DefaultErrorRenderer {
    pub fn new(development: bool) -> Self {
        Self { development }
    }
}

impl ErrorRenderer for DefaultErrorRenderer {
    fn render(&self, rejection: &Rejection) -> Response {
        let mut body = json!({
            "status": StatusCode::NOT_FOUND.as_u16(),
            "error": rejection.reason,
        });
        if self.development {
            body["path"] = json!(rejection.path);
            body["host"] = json!(rejection.host);
        }
        (StatusCode::NOT_FOUND, Json(body)).into_response()
    }
}

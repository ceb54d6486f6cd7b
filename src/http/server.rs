//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with a single fallback handler
//! - Wire up middleware (timeout, request ID, tracing, CORS)
//! - Run every request through the Dispatcher
//! - Enforce the effective policy before handing off to the content handler
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{DispatchConfig, LocalizationConfig};
use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::http::handler::{ContentHandler, DefaultErrorRenderer, DispatchSummaryHandler, ErrorRenderer};
use crate::http::request::{dispatch_request, request_id};
use crate::http::response::{apply_policy_headers, denied, https_redirect};
use crate::observability::metrics;
use crate::security::{enforce_transport, AuthDecision, Authorizer, HeaderRoleAuthorizer, TransportDecision};

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub content: Arc<dyn ContentHandler>,
    pub errors: Arc<dyn ErrorRenderer>,
    pub authorizer: Arc<dyn Authorizer>,
    pub localization: Arc<LocalizationConfig>,
}

/// HTTP front end for the dispatcher.
pub struct HttpServer {
    state: AppState,
    request_timeout: Duration,
    cors_enabled: bool,
}

impl HttpServer {
    /// Create a server with the default collaborators.
    pub fn new(config: &DispatchConfig, dispatcher: Arc<Dispatcher>) -> Self {
        let state = AppState {
            dispatcher,
            content: Arc::new(DispatchSummaryHandler),
            errors: Arc::new(DefaultErrorRenderer::new(config.environment.is_development())),
            authorizer: Arc::new(HeaderRoleAuthorizer),
            localization: Arc::new(config.localization.clone()),
        };

        Self {
            state,
            request_timeout: Duration::from_secs(config.listener.request_timeout_secs),
            cors_enabled: config.cors.enabled,
        }
    }

    pub fn with_content_handler(mut self, content: Arc<dyn ContentHandler>) -> Self {
        self.state.content = content;
        self
    }

    pub fn with_error_renderer(mut self, errors: Arc<dyn ErrorRenderer>) -> Self {
        self.state.errors = errors;
        self
    }

    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.state.authorizer = authorizer;
        self
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn router(&self) -> Router {
        let router = Router::new()
            .fallback(dispatch_handler)
            .with_state(self.state.clone())
            .layer(TimeoutLayer::new(self.request_timeout));

        let router = if self.cors_enabled {
            router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
        } else {
            router
        };

        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Dispatch the request, enforce its policy, then hand off to the collaborators.
async fn dispatch_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let request_id = request_id(&headers);
    let request = dispatch_request(&uri, &headers, &state.localization);

    let dispatch = match state.dispatcher.dispatch(&request) {
        DispatchOutcome::Dispatched(dispatch) => dispatch,
        DispatchOutcome::Rejected(rejection) => {
            tracing::debug!(request_id = %request_id, reason = %rejection.reason, "Rendering rejection");
            return state.errors.render(&rejection);
        }
    };
    let policy = &dispatch.policy;

    let redirect_host = policy
        .require_transport_security
        .then(|| {
            state
                .dispatcher
                .resolver()
                .registry()
                .redirect_host(dispatch.tenant.tenant_id(), &request.host)
        })
        .flatten();
    match enforce_transport(
        policy.require_transport_security,
        &method,
        &uri,
        &headers,
        redirect_host.as_deref(),
    ) {
        TransportDecision::Allow => {}
        TransportDecision::Redirect(location) => {
            tracing::debug!(request_id = %request_id, location = %location, "Redirecting to HTTPS");
            metrics::record_policy_denial("transport_redirect");
            return https_redirect(&location);
        }
        TransportDecision::Refuse => {
            tracing::info!(request_id = %request_id, method = %method, "Insecure request refused");
            metrics::record_policy_denial("transport_refused");
            return denied(StatusCode::FORBIDDEN, "HTTPS required");
        }
    }

    let decision = state.authorizer.authorize(&headers, &policy.required_roles);
    if decision != AuthDecision::Allow {
        tracing::info!(
            request_id = %request_id,
            tenant = %dispatch.tenant.tenant_id(),
            rule = %dispatch.rule.name(),
            decision = %decision,
            "Authorization failed"
        );
        return match decision {
            AuthDecision::Unauthenticated => {
                metrics::record_policy_denial("unauthenticated");
                denied(StatusCode::UNAUTHORIZED, "Authentication required")
            }
            _ => {
                metrics::record_policy_denial("forbidden");
                denied(StatusCode::FORBIDDEN, "Insufficient role")
            }
        };
    }

    let response = state.content.render(&dispatch);
    apply_policy_headers(response, policy)
}

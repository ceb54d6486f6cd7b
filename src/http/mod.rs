//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (host, path, culture hints, request ID)
//!     → Dispatcher (tenant, route, policy)
//!     → Rejected: handler.rs ErrorRenderer
//!     → Dispatched: transport check → authorization → handler.rs ContentHandler
//!     → response.rs (Cache-Control, Content-Language)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use handler::{ContentHandler, DefaultErrorRenderer, DispatchSummaryHandler, ErrorRenderer};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};

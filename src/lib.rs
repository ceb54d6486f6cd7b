//! Multi-tenant request dispatch.
//!
//! Resolves which tenant a request belongs to, matches it against a route
//! table compiled once at startup, and composes the security and behavior
//! policy that applies before handing off to a content handler.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod policy;
pub mod routing;
pub mod security;
pub mod tenant;

pub use config::schema::DispatchConfig;
pub use dispatch::{DispatchOutcome, DispatchRequest, Dispatcher};
pub use http::HttpServer;
pub use lifecycle::{Application, Shutdown};

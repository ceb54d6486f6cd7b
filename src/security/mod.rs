//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatched request + EffectivePolicy:
//!     → transport.rs (HTTPS required? redirect or refuse)
//!     → authorization.rs (required roles? ask the Authorizer)
//!     → Pass to content handler
//! ```
//!
//! # Design Decisions
//! - Fail closed: a missing principal never satisfies a role requirement
//! - No trust in client input beyond what the deployment configures

pub mod authorization;
pub mod transport;

pub use authorization::{AuthDecision, Authorizer, HeaderRoleAuthorizer, Principal};
pub use transport::{enforce_transport, is_secure, TransportDecision};

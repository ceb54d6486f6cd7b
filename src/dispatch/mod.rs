//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! DispatchRequest (host, path, culture hints)
//!     → Resolving        (TenantResolver)      ──UnknownTenant──→ Rejected(NoTenant)
//!     → Matching         (RouteTable lookup)   ──no rule───────→ Rejected(NoRoute)
//!     → PolicyComposing  (PolicyComposer, never fails)
//!     → Dispatched(tenant, rule, route values, policy)
//! ```
//!
//! # Design Decisions
//! - Outcomes are values; the dispatcher renders nothing itself
//! - No partial states: full policy or full rejection

pub mod dispatcher;
pub mod outcome;

pub use dispatcher::{DispatchRequest, Dispatcher};
pub use outcome::{Dispatch, DispatchOutcome, DispatchState, RejectReason, Rejection};

//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     builder.rs (declarative catalogue)
//!     → Filter by addressing mode
//!     → Parse templates, attach folder constraints (template.rs, matcher.rs)
//!     → Sort by tier, specificity, registration order
//!     → Freeze as immutable RouteTable (table.rs)
//!
//! Incoming request (TenantContext)
//!     → table.rs (ordered scan)
//!     → rule.rs (structural match, merge defaults)
//!     → Return: RouteMatch or None
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by precedence)

pub mod builder;
pub mod matcher;
pub mod rule;
pub mod table;
pub mod template;

pub use builder::{RouteDecl, RouteTableBuilder, RouteTableError, DEFAULT_CATALOGUE, TENANT_PARAMETER};
pub use matcher::{SegmentConstraint, SiteFolderConstraint};
pub use rule::{RouteCategory, RouteRule};
pub use table::{RouteMatch, RouteTable};
pub use template::{RouteValues, Template, TemplateError};

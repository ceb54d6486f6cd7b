//! Per-request policy subsystem.
//!
//! # Data Flow
//! ```text
//! Matched RouteRule + TenantContext + culture hints
//!     → roles.rs (authorization requirement by category)
//!     → cache.rs (named cache profile by category)
//!     → culture.rs (query → cookie → Accept-Language → default)
//!     → composer.rs (assemble EffectivePolicy)
//! ```
//!
//! # Design Decisions
//! - Global settings arrive as an immutable value, never ambient state
//! - Composition never rejects a request

pub mod cache;
pub mod composer;
pub mod culture;
pub mod roles;

pub use cache::{CacheDirective, CacheProfile, SITEMAP_PROFILE, SYNDICATION_PROFILE};
pub use composer::{EffectivePolicy, PolicyComposer, PolicyConfig};
pub use culture::{CultureHints, CultureNegotiator, CultureSource, PolicyWarning};
pub use roles::{
    controller_category, effective_category, required_roles, ADMINISTRATORS, CONTENT_ADMINISTRATORS,
};

//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DispatchConfig (validated, immutable)
//!     → handed by value to the startup sequence
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{parse_config, read_config, ConfigError};
pub use schema::{
    CorsConfig, DispatchConfig, Environment, ListenerConfig, LocalizationConfig, LogFormat,
    ObservabilityConfig, SecurityConfig, TenancyConfig, TenantConfig,
};
pub use validation::{validate_config, ValidationError};

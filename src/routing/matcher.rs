//! Segment constraints.
//!
//! # Responsibilities
//! - Decide whether a bound parameter value is acceptable
//! - Restrict `{tenant}` segments to registered tenant folders
//!
//! # Design Decisions
//! - Folder matching is exact and case-insensitive
//! - Constraints are pure and shared via Arc across rules
//! - No regex to guarantee O(n) matching

use std::sync::Arc;

use crate::tenant::TenantRegistry;

/// Trait for checking a bound segment value.
pub trait SegmentConstraint: Send + Sync + std::fmt::Debug {
    /// Returns true if the value satisfies this constraint.
    fn accepts(&self, value: &str) -> bool;
}

/// Accepts only segments naming a registered tenant folder.
#[derive(Debug, Clone)]
pub struct SiteFolderConstraint {
    registry: Arc<TenantRegistry>,
}

impl SiteFolderConstraint {
    pub fn new(registry: Arc<TenantRegistry>) -> Self {
        Self { registry }
    }
}

impl SegmentConstraint for SiteFolderConstraint {
    fn accepts(&self, value: &str) -> bool {
        self.registry.is_folder(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TenantConfig;

    #[test]
    fn test_site_folder_constraint() {
        let registry = Arc::new(TenantRegistry::from_config(&[TenantConfig {
            id: "acme".into(),
            hosts: vec![],
        }]));
        let constraint = SiteFolderConstraint::new(registry);

        assert!(constraint.accepts("acme"));
        assert!(constraint.accepts("ACME")); // Case insensitive
        assert!(!constraint.accepts("acme2"));
        assert!(!constraint.accepts("sitemap"));
    }
}

//! Route rules.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::routing::template::{RouteValues, Template};
use crate::tenant::AddressingMode;

/// Functional category of a route, which drives its policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteCategory {
    /// Public content pages and posts.
    ContentViewing,
    /// Page and post editors.
    ContentEditing,
    /// File browser and uploads.
    FileManagement,
    /// Identity client and scope administration.
    IdentityAdministration,
    /// Site map.
    Sitemap,
    /// Syndication feed.
    Syndication,
    /// Error pages.
    ErrorPage,
}

impl RouteCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteCategory::ContentViewing => "content_viewing",
            RouteCategory::ContentEditing => "content_editing",
            RouteCategory::FileManagement => "file_management",
            RouteCategory::IdentityAdministration => "identity_administration",
            RouteCategory::Sitemap => "sitemap",
            RouteCategory::Syndication => "syndication",
            RouteCategory::ErrorPage => "error_page",
        }
    }
}

/// A template-to-handler binding with mode applicability and precedence.
#[derive(Debug, Clone)]
pub struct RouteRule {
    pub(crate) name: String,
    pub(crate) template: Template,
    pub(crate) target_handler: String,
    pub(crate) defaults: RouteValues,
    pub(crate) category: RouteCategory,
    pub(crate) applies_in_mode: BTreeSet<AddressingMode>,
    pub(crate) tenant_scoped: bool,
    pub(crate) registration_order: u32,
}

impl RouteRule {
    /// Unique name within a table.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Opaque handler id resolved by the content system.
    pub fn target_handler(&self) -> &str {
        &self.target_handler
    }

    /// Values supplied when the template does not bind them.
    pub fn defaults(&self) -> &RouteValues {
        &self.defaults
    }

    pub fn category(&self) -> RouteCategory {
        self.category
    }

    pub fn applies_in_mode(&self) -> &BTreeSet<AddressingMode> {
        &self.applies_in_mode
    }

    pub fn applies_in(&self, mode: AddressingMode) -> bool {
        self.applies_in_mode.contains(&mode)
    }

    /// True for rules whose first segment is the tenant folder.
    pub fn is_tenant_scoped(&self) -> bool {
        self.tenant_scoped
    }

    pub fn registration_order(&self) -> u32 {
        self.registration_order
    }

    /// Leading literal segments, not counting the tenant folder.
    pub fn specificity(&self) -> usize {
        self.template
            .leading_literals(if self.tenant_scoped { 1 } else { 0 })
    }

    /// Match path segments, merging bound values over the rule defaults.
    pub fn match_segments(&self, segments: &[&str]) -> Option<RouteValues> {
        let bound = self.template.matches(segments)?;
        let mut values = self.defaults.clone();
        values.extend(bound);
        Some(values)
    }
}

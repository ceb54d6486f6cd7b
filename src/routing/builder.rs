//! Route table construction.
//!
//! # Responsibilities
//! - Expand the declarative route catalogue into tenant-scoped and bare rules
//! - Keep only the rules that apply to the configured addressing mode
//! - Order rules by tier, then specificity, then registration order
//!
//! # Design Decisions
//! - One catalogue; folder variants are derived, never written out twice
//! - Tenant-scoped rules always precede bare rules
//! - More leading literal segments means tried earlier within a tier
//! - Runs once at startup; the result is immutable

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use thiserror::Error;

use crate::routing::matcher::SiteFolderConstraint;
use crate::routing::rule::{RouteCategory, RouteRule};
use crate::routing::table::RouteTable;
use crate::routing::template::{RouteValues, Template, TemplateError};
use crate::tenant::{AddressingMode, TenantRegistry};

/// Name of the parameter carrying the tenant folder.
pub const TENANT_PARAMETER: &str = "tenant";

/// Error building a route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteTableError {
    #[error("route '{name}': {source}")]
    Template {
        name: String,
        #[source]
        source: TemplateError,
    },

    #[error("route name '{0}' is registered more than once")]
    DuplicateName(String),
}

/// A catalogue entry. Folder variants prepend `{tenant}/` to the template.
#[derive(Debug, Clone, Copy)]
pub struct RouteDecl {
    pub name: &'static str,
    pub folder_name: &'static str,
    pub template: &'static str,
    pub target: &'static str,
    pub defaults: &'static [(&'static str, &'static str)],
    pub category: RouteCategory,
}

/// Content, file manager, identity admin, error, sitemap and default routes.
pub const DEFAULT_CATALOGUE: &[RouteDecl] = &[
    RouteDecl {
        name: "blogrss",
        folder_name: "folderblogrss",
        template: "blog/rss",
        target: "blog.rss",
        defaults: &[("controller", "Blog"), ("action", "Rss")],
        category: RouteCategory::Syndication,
    },
    RouteDecl {
        name: "blogedit",
        folder_name: "folderblogedit",
        template: "blog/edit/{slug?}",
        target: "blog.edit",
        defaults: &[("controller", "Blog"), ("action", "Edit")],
        category: RouteCategory::ContentEditing,
    },
    RouteDecl {
        name: "blogpost",
        folder_name: "folderblogpost",
        template: "blog/{slug}",
        target: "blog.post",
        defaults: &[("controller", "Blog"), ("action", "Post")],
        category: RouteCategory::ContentViewing,
    },
    RouteDecl {
        name: "blogindex",
        folder_name: "folderblogindex",
        template: "blog",
        target: "blog.index",
        defaults: &[("controller", "Blog"), ("action", "Index")],
        category: RouteCategory::ContentViewing,
    },
    RouteDecl {
        name: "pageedit",
        folder_name: "folderpageedit",
        template: "page/edit/{slug?}",
        target: "page.edit",
        defaults: &[("controller", "Page"), ("action", "Edit")],
        category: RouteCategory::ContentEditing,
    },
    RouteDecl {
        name: "filemanager",
        folder_name: "folderfilemanager",
        template: "filemanager/{action?}",
        target: "filemanager",
        defaults: &[("controller", "FileManager"), ("action", "Index")],
        category: RouteCategory::FileManagement,
    },
    RouteDecl {
        name: "clientadmin",
        folder_name: "folderclientadmin",
        template: "clientadmin/{action?}/{id?}",
        target: "clientadmin",
        defaults: &[("controller", "ClientAdmin"), ("action", "Index")],
        category: RouteCategory::IdentityAdministration,
    },
    RouteDecl {
        name: "errorhandler",
        folder_name: "foldererrorhandler",
        template: "oops/error/{statusCode?}",
        target: "oops.error",
        defaults: &[("controller", "Oops"), ("action", "Error")],
        category: RouteCategory::ErrorPage,
    },
    RouteDecl {
        name: "sitemap",
        folder_name: "foldersitemap",
        template: "sitemap",
        target: "page.sitemap",
        defaults: &[("controller", "Page"), ("action", "SiteMap")],
        category: RouteCategory::Sitemap,
    },
    RouteDecl {
        name: "def",
        folder_name: "folderdefault",
        template: "{controller}/{action}/{*id}",
        target: "mvc",
        defaults: &[],
        category: RouteCategory::ContentViewing,
    },
    RouteDecl {
        name: "pagedefault",
        folder_name: "folderpagedefault",
        template: "{slug?}",
        target: "page.index",
        defaults: &[("controller", "Page"), ("action", "Index")],
        category: RouteCategory::ContentViewing,
    },
];

/// Builds the route table for the active addressing mode.
#[derive(Debug, Clone)]
pub struct RouteTableBuilder {
    registry: Arc<TenantRegistry>,
    catalogue: &'static [RouteDecl],
}

impl RouteTableBuilder {
    pub fn new(registry: Arc<TenantRegistry>) -> Self {
        Self {
            registry,
            catalogue: DEFAULT_CATALOGUE,
        }
    }

    /// Replace the route catalogue.
    pub fn with_catalogue(mut self, catalogue: &'static [RouteDecl]) -> Self {
        self.catalogue = catalogue;
        self
    }

    /// Build the table. Folder rules exist only in folder-prefixed mode with folder routes on.
    pub fn build(
        &self,
        mode: AddressingMode,
        supports_folders: bool,
    ) -> Result<RouteTable, RouteTableError> {
        let mut rules = Vec::new();
        let mut order = 0u32;

        for (tenant_scoped, decl) in self.declarations() {
            let applies_in_mode: BTreeSet<AddressingMode> = if tenant_scoped {
                BTreeSet::from([AddressingMode::FolderPrefixed])
            } else {
                BTreeSet::from([AddressingMode::HostBased, AddressingMode::FolderPrefixed])
            };

            if !applies_in_mode.contains(&mode) || (tenant_scoped && !supports_folders) {
                continue;
            }

            rules.push(self.compile(decl, tenant_scoped, applies_in_mode, order)?);
            order += 1;
        }

        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.name.clone()) {
                return Err(RouteTableError::DuplicateName(rule.name.clone()));
            }
        }

        // Tier first, then specificity; the sort is stable so registration order breaks ties.
        rules.sort_by_key(|rule: &RouteRule| {
            (
                !rule.tenant_scoped,
                std::cmp::Reverse(rule.specificity()),
                rule.registration_order,
            )
        });

        tracing::info!(
            mode = %mode,
            rules = rules.len(),
            "Route table built"
        );
        for rule in &rules {
            tracing::debug!(
                name = %rule.name,
                template = %rule.template,
                order = rule.registration_order,
                "Route registered"
            );
        }

        Ok(RouteTable::new(mode, rules.into_iter().map(Arc::new).collect()))
    }

    /// Tenant-scoped declarations first, then their bare equivalents.
    fn declarations(&self) -> impl Iterator<Item = (bool, &'static RouteDecl)> {
        let catalogue = self.catalogue;
        catalogue
            .iter()
            .map(|decl| (true, decl))
            .chain(catalogue.iter().map(|decl| (false, decl)))
    }

    fn compile(
        &self,
        decl: &RouteDecl,
        tenant_scoped: bool,
        applies_in_mode: BTreeSet<AddressingMode>,
        registration_order: u32,
    ) -> Result<RouteRule, RouteTableError> {
        let name = if tenant_scoped { decl.folder_name } else { decl.name };
        let wrap = |source| RouteTableError::Template {
            name: name.to_string(),
            source,
        };

        let template = if tenant_scoped {
            let source = format!("{{{}}}/{}", TENANT_PARAMETER, decl.template);
            Template::parse(&source)
                .and_then(|t| {
                    t.with_constraint(
                        TENANT_PARAMETER,
                        Arc::new(SiteFolderConstraint::new(self.registry.clone())),
                    )
                })
                .map_err(wrap)?
        } else {
            Template::parse(decl.template).map_err(wrap)?
        };

        let defaults: RouteValues = decl
            .defaults
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Ok(RouteRule {
            name: name.to_string(),
            template,
            target_handler: decl.target.to_string(),
            defaults,
            category: decl.category,
            applies_in_mode,
            tenant_scoped,
            registration_order,
        })
    }
}

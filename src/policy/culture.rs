//! Request culture negotiation.
//!
//! # Responsibilities
//! - Read culture hints from query string, cookie and Accept-Language
//! - Pick the first hint naming a supported culture
//! - Fall back to the configured default culture
//!
//! # Design Decisions
//! - Providers are tried in a fixed order: query, cookie, header
//! - Matching is case-insensitive; the supported spelling is returned
//! - A parent culture ("fr") may satisfy a specific hint ("fr-FR")
//! - Never fails: problems become warnings and the default wins

use std::fmt;

use crate::config::LocalizationConfig;

/// Culture hints carried by a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CultureHints {
    /// Explicit query string value.
    pub query: Option<String>,
    /// Raw value of the culture cookie.
    pub cookie: Option<String>,
    /// Raw Accept-Language header.
    pub accept_language: Option<String>,
}

impl CultureHints {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, value: impl Into<String>) -> Self {
        self.query = Some(value.into());
        self
    }

    pub fn with_cookie(mut self, value: impl Into<String>) -> Self {
        self.cookie = Some(value.into());
        self
    }

    pub fn with_accept_language(mut self, value: impl Into<String>) -> Self {
        self.accept_language = Some(value.into());
        self
    }
}

/// Where a negotiated culture came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CultureSource {
    Query,
    Cookie,
    AcceptLanguage,
    Default,
}

impl fmt::Display for CultureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CultureSource::Query => "query",
            CultureSource::Cookie => "cookie",
            CultureSource::AcceptLanguage => "accept_language",
            CultureSource::Default => "default",
        })
    }
}

/// Non-fatal problem found while composing policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyWarning {
    /// A well-formed hint named a culture this deployment does not serve.
    UnsupportedCulture { source: CultureSource, value: String },
    /// A hint could not be read as a culture tag.
    MalformedCultureHint { source: CultureSource, value: String },
}

impl fmt::Display for PolicyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyWarning::UnsupportedCulture { source, value } => {
                write!(f, "unsupported culture '{}' from {}", value, source)
            }
            PolicyWarning::MalformedCultureHint { source, value } => {
                write!(f, "malformed culture hint '{}' from {}", value, source)
            }
        }
    }
}

/// Result of negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiated {
    pub culture: String,
    pub source: CultureSource,
    pub warnings: Vec<PolicyWarning>,
}

/// Picks a supported culture from request hints.
#[derive(Debug, Clone)]
pub struct CultureNegotiator {
    default_culture: String,
    supported: Vec<String>,
    fallback_to_parent: bool,
}

impl CultureNegotiator {
    pub fn from_config(config: &LocalizationConfig) -> Self {
        let default_culture = config
            .supported_cultures
            .iter()
            .find(|c| c.eq_ignore_ascii_case(&config.default_culture))
            .cloned()
            .unwrap_or_else(|| config.default_culture.clone());

        Self {
            default_culture,
            supported: config.supported_cultures.clone(),
            fallback_to_parent: config.fallback_to_parent,
        }
    }

    pub fn default_culture(&self) -> &str {
        &self.default_culture
    }

    /// Negotiate the request culture.
    pub fn negotiate(&self, hints: &CultureHints) -> Negotiated {
        let mut warnings = Vec::new();

        let providers: [(CultureSource, Vec<String>); 3] = [
            (CultureSource::Query, hints.query.iter().cloned().collect()),
            (
                CultureSource::Cookie,
                hints.cookie.as_deref().and_then(parse_cookie).into_iter().collect(),
            ),
            (
                CultureSource::AcceptLanguage,
                hints
                    .accept_language
                    .as_deref()
                    .map(parse_accept_language)
                    .unwrap_or_default(),
            ),
        ];

        for (source, candidates) in providers {
            for candidate in candidates {
                let candidate = candidate.trim();
                if !is_well_formed(candidate) {
                    warnings.push(PolicyWarning::MalformedCultureHint {
                        source,
                        value: candidate.to_string(),
                    });
                    continue;
                }
                match self.supported_match(candidate) {
                    Some(culture) => {
                        return Negotiated {
                            culture: culture.to_string(),
                            source,
                            warnings,
                        };
                    }
                    None => warnings.push(PolicyWarning::UnsupportedCulture {
                        source,
                        value: candidate.to_string(),
                    }),
                }
            }
        }

        Negotiated {
            culture: self.default_culture.clone(),
            source: CultureSource::Default,
            warnings,
        }
    }

    fn supported_match(&self, candidate: &str) -> Option<&str> {
        let exact = |tag: &str| {
            self.supported
                .iter()
                .find(|s| s.eq_ignore_ascii_case(tag))
                .map(String::as_str)
        };

        exact(candidate).or_else(|| {
            if !self.fallback_to_parent {
                return None;
            }
            candidate
                .split_once(['-', '_'])
                .and_then(|(parent, _)| exact(parent))
        })
    }
}

fn is_well_formed(tag: &str) -> bool {
    !tag.is_empty()
        && tag.len() <= 35
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        && !tag.starts_with(['-', '_'])
}

/// Cookie values are either a bare tag or `c=<culture>|uic=<ui culture>`.
fn parse_cookie(value: &str) -> Option<String> {
    let value = value.trim();
    if !value.contains('=') {
        return (!value.is_empty()).then(|| value.to_string());
    }
    let mut ui_culture = None;
    for part in value.split('|') {
        match part.split_once('=') {
            Some(("c", culture)) if !culture.is_empty() => return Some(culture.to_string()),
            Some(("uic", culture)) if !culture.is_empty() => ui_culture = Some(culture.to_string()),
            _ => {}
        }
    }
    ui_culture
}

/// Accept-Language entries ordered by descending quality. Wildcards and q=0 are dropped.
fn parse_accept_language(header: &str) -> Vec<String> {
    let mut entries: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let quality = parts
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            (quality > 0.0).then(|| (tag.to_string(), quality))
        })
        .collect();

    // Stable: equal qualities keep header order.
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    entries.into_iter().map(|(tag, _)| tag).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn negotiator(supported: &[&str]) -> CultureNegotiator {
        CultureNegotiator::from_config(&LocalizationConfig {
            default_culture: "en-US".into(),
            supported_cultures: supported.iter().map(|s| s.to_string()).collect(),
            ..LocalizationConfig::default()
        })
    }

    #[test]
    fn test_no_hints_uses_default() {
        let result = negotiator(&["en-US"]).negotiate(&CultureHints::none());
        assert_eq!(result.culture, "en-US");
        assert_eq!(result.source, CultureSource::Default);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_query_beats_cookie_and_header() {
        let hints = CultureHints::none()
            .with_query("fr-fr")
            .with_cookie("c=de-DE|uic=de-DE")
            .with_accept_language("de-DE");
        let result = negotiator(&["en-US", "fr-FR", "de-DE"]).negotiate(&hints);
        assert_eq!(result.culture, "fr-FR");
        assert_eq!(result.source, CultureSource::Query);
    }

    #[test]
    fn test_unsupported_query_falls_through_to_cookie() {
        let hints = CultureHints::none().with_query("ja-JP").with_cookie("de-DE");
        let result = negotiator(&["en-US", "de-DE"]).negotiate(&hints);
        assert_eq!(result.culture, "de-DE");
        assert_eq!(result.source, CultureSource::Cookie);
        assert_eq!(
            result.warnings,
            vec![PolicyWarning::UnsupportedCulture {
                source: CultureSource::Query,
                value: "ja-JP".into(),
            }]
        );
    }

    #[test]
    fn test_accept_language_quality_order() {
        let hints = CultureHints::none().with_accept_language("es;q=0.2, fr-CH, de;q=0.9, *;q=0.5");
        let result = negotiator(&["en-US", "fr", "de"]).negotiate(&hints);
        assert_eq!(result.culture, "fr");
        assert_eq!(result.source, CultureSource::AcceptLanguage);

        let result = negotiator(&["en-US", "es", "de"]).negotiate(&hints);
        assert_eq!(result.culture, "de");
    }

    #[test]
    fn test_parent_fallback_can_be_disabled() {
        let mut negotiator = negotiator(&["en-US", "fr"]);
        negotiator.fallback_to_parent = false;
        let result = negotiator.negotiate(&CultureHints::none().with_query("fr-FR"));
        assert_eq!(result.culture, "en-US");
        assert_eq!(result.source, CultureSource::Default);
    }

    #[test]
    fn test_malformed_hint_is_a_warning() {
        let hints = CultureHints::none().with_query("<script>");
        let result = negotiator(&["en-US"]).negotiate(&hints);
        assert_eq!(result.culture, "en-US");
        assert!(matches!(
            result.warnings[0],
            PolicyWarning::MalformedCultureHint { source: CultureSource::Query, .. }
        ));
    }

    #[test]
    fn test_zero_quality_is_ignored() {
        let result = negotiator(&["en-US", "fr-FR"])
            .negotiate(&CultureHints::none().with_accept_language("fr-FR;q=0"));
        assert_eq!(result.culture, "en-US");
    }

    #[test]
    fn test_cookie_formats() {
        assert_eq!(parse_cookie("c=fr-FR|uic=de-DE"), Some("fr-FR".into()));
        assert_eq!(parse_cookie("uic=de-DE"), Some("de-DE".into()));
        assert_eq!(parse_cookie(" nl-NL "), Some("nl-NL".into()));
        assert_eq!(parse_cookie(""), None);
    }

    #[test]
    fn test_default_uses_supported_spelling() {
        let negotiator = CultureNegotiator::from_config(&LocalizationConfig {
            default_culture: "EN-us".into(),
            supported_cultures: vec!["en-US".into()],
            ..LocalizationConfig::default()
        });
        assert_eq!(negotiator.default_culture(), "en-US");
    }
}

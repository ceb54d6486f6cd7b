//! Route templates.
//!
//! # Syntax
//! - `literal`   matches one segment, case-insensitive
//! - `{name}`    binds one non-empty segment
//! - `{name?}`   optional, may only be absent at the end of the path
//! - `{*name}`   binds every remaining segment (zero or more), must be last
//!
//! Optional parameters may only be followed by other optional parameters or
//! a catch-all, so absence is only ever permitted at the end.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::routing::matcher::SegmentConstraint;

/// Values bound while matching, keyed by parameter name.
pub type RouteValues = BTreeMap<String, String>;

/// Malformed template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template '{0}' contains an empty segment")]
    EmptySegment(String),

    #[error("template '{template}' has a malformed parameter '{segment}'")]
    MalformedParameter { template: String, segment: String },

    #[error("template '{template}' declares parameter '{name}' twice")]
    DuplicateParameter { template: String, name: String },

    #[error("template '{template}' has a required segment after optional parameter '{name}'")]
    OptionalNotAtEnd { template: String, name: String },

    #[error("template '{template}' has segments after catch-all '{name}'")]
    CatchAllNotLast { template: String, name: String },

    #[error("template '{template}' has no parameter '{name}' to constrain")]
    UnknownParameter { template: String, name: String },
}

/// One template segment.
#[derive(Debug, Clone)]
pub enum Segment {
    Literal(String),
    Parameter {
        name: String,
        optional: bool,
        constraint: Option<Arc<dyn SegmentConstraint>>,
    },
    CatchAll {
        name: String,
    },
}

impl Segment {
    pub fn is_literal(&self) -> bool {
        matches!(self, Segment::Literal(_))
    }

    fn parameter_name(&self) -> Option<&str> {
        match self {
            Segment::Literal(_) => None,
            Segment::Parameter { name, .. } | Segment::CatchAll { name } => Some(name.as_str()),
        }
    }

    /// True when the path may end before this segment.
    fn may_be_absent(&self) -> bool {
        matches!(
            self,
            Segment::Parameter { optional: true, .. } | Segment::CatchAll { .. }
        )
    }
}

/// A parsed route template.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template such as `{tenant}/oops/error/{statusCode?}`.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let trimmed = source.trim_matches('/');
        let mut segments = Vec::new();

        if !trimmed.is_empty() {
            for raw in trimmed.split('/') {
                segments.push(parse_segment(source, raw)?);
            }
        }

        let template = Self {
            source: trimmed.to_string(),
            segments,
        };
        template.check_shape()?;
        Ok(template)
    }

    fn check_shape(&self) -> Result<(), TemplateError> {
        let mut seen: Vec<&str> = Vec::new();
        let mut pending_optional: Option<&str> = None;

        for (index, segment) in self.segments.iter().enumerate() {
            if let Some(name) = segment.parameter_name() {
                if seen.iter().any(|s| s.eq_ignore_ascii_case(name)) {
                    return Err(TemplateError::DuplicateParameter {
                        template: self.source.clone(),
                        name: name.to_string(),
                    });
                }
                seen.push(name);
            }

            match segment {
                Segment::CatchAll { name } if index + 1 != self.segments.len() => {
                    return Err(TemplateError::CatchAllNotLast {
                        template: self.source.clone(),
                        name: name.clone(),
                    });
                }
                Segment::Parameter { name, optional: true, .. } => {
                    pending_optional.get_or_insert(name);
                }
                _ if !segment.may_be_absent() => {
                    if let Some(name) = pending_optional {
                        return Err(TemplateError::OptionalNotAtEnd {
                            template: self.source.clone(),
                            name: name.to_string(),
                        });
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Attach a constraint to a named parameter.
    pub fn with_constraint(
        mut self,
        parameter: &str,
        constraint: Arc<dyn SegmentConstraint>,
    ) -> Result<Self, TemplateError> {
        let slot = self.segments.iter_mut().find_map(|segment| match segment {
            Segment::Parameter { name, constraint, .. } if name == parameter => Some(constraint),
            _ => None,
        });

        match slot {
            Some(slot) => {
                *slot = Some(constraint);
                Ok(self)
            }
            None => Err(TemplateError::UnknownParameter {
                template: self.source.clone(),
                name: parameter.to_string(),
            }),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True if the template binds a parameter or catch-all called `name`.
    pub fn has_parameter(&self, name: &str) -> bool {
        self.segments
            .iter()
            .any(|segment| segment.parameter_name() == Some(name))
    }

    /// Number of literal segments before the first parameter, skipping `skip` leading segments.
    pub fn leading_literals(&self, skip: usize) -> usize {
        self.segments
            .iter()
            .skip(skip)
            .take_while(|segment| segment.is_literal())
            .count()
    }

    /// Structurally match path segments, returning bound parameters.
    pub fn matches(&self, path: &[&str]) -> Option<RouteValues> {
        let mut values = RouteValues::new();
        let mut position = 0;

        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => {
                    let value = path.get(position)?;
                    if !value.eq_ignore_ascii_case(literal) {
                        return None;
                    }
                    position += 1;
                }
                Segment::Parameter { name, optional, constraint } => match path.get(position) {
                    Some(value) if !value.is_empty() => {
                        if let Some(constraint) = constraint {
                            if !constraint.accepts(value) {
                                return None;
                            }
                        }
                        values.insert(name.clone(), value.to_string());
                        position += 1;
                    }
                    _ if *optional => {}
                    _ => return None,
                },
                Segment::CatchAll { name } => {
                    if position < path.len() {
                        values.insert(name.clone(), path[position..].join("/"));
                        position = path.len();
                    }
                }
            }
        }

        (position == path.len()).then_some(values)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_segment(template: &str, raw: &str) -> Result<Segment, TemplateError> {
    if raw.is_empty() {
        return Err(TemplateError::EmptySegment(template.to_string()));
    }

    let malformed = || TemplateError::MalformedParameter {
        template: template.to_string(),
        segment: raw.to_string(),
    };

    let inner = match raw.strip_prefix('{') {
        Some(rest) => rest.strip_suffix('}').ok_or_else(malformed)?,
        None if raw.contains('{') || raw.contains('}') => return Err(malformed()),
        None => return Ok(Segment::Literal(raw.to_string())),
    };

    let (name, catch_all, optional) = if let Some(name) = inner.strip_prefix('*') {
        (name, true, false)
    } else if let Some(name) = inner.strip_suffix('?') {
        (name, false, true)
    } else {
        (inner, false, false)
    };

    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(malformed());
    }

    Ok(if catch_all {
        Segment::CatchAll { name: name.to_string() }
    } else {
        Segment::Parameter {
            name: name.to_string(),
            optional,
            constraint: None,
        }
    })
}

/// Split a request path into non-empty segments.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct OnlyDigits;

    impl SegmentConstraint for OnlyDigits {
        fn accepts(&self, value: &str) -> bool {
            value.chars().all(|c| c.is_ascii_digit())
        }
    }

    fn values(pairs: &[(&str, &str)]) -> RouteValues {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_literal_match_is_case_insensitive() {
        let template = Template::parse("oops/error").unwrap();
        assert_eq!(template.matches(&["OOPS", "Error"]), Some(RouteValues::new()));
        assert_eq!(template.matches(&["oops"]), None);
        assert_eq!(template.matches(&["oops", "error", "extra"]), None);
    }

    #[test]
    fn test_optional_parameter_only_absent_at_end() {
        let template = Template::parse("oops/error/{statusCode?}").unwrap();
        assert_eq!(template.matches(&["oops", "error"]), Some(RouteValues::new()));
        assert_eq!(
            template.matches(&["oops", "error", "500"]),
            Some(values(&[("statusCode", "500")]))
        );

        let err = Template::parse("{slug?}/edit").unwrap_err();
        assert!(matches!(err, TemplateError::OptionalNotAtEnd { .. }));
    }

    #[test]
    fn test_trailing_optional_run() {
        let template = Template::parse("clientadmin/{action?}/{id?}").unwrap();
        assert_eq!(template.matches(&["clientadmin"]), Some(RouteValues::new()));
        assert_eq!(
            template.matches(&["clientadmin", "edit", "7"]),
            Some(values(&[("action", "edit"), ("id", "7")]))
        );
    }

    #[test]
    fn test_catch_all_binds_remaining_segments() {
        let template = Template::parse("{controller}/{action}/{*id}").unwrap();
        assert_eq!(
            template.matches(&["acme", "oops", "error", "500"]),
            Some(values(&[("controller", "acme"), ("action", "oops"), ("id", "error/500")]))
        );
        assert_eq!(
            template.matches(&["home", "index"]),
            Some(values(&[("controller", "home"), ("action", "index")]))
        );
        assert_eq!(template.matches(&["home"]), None);

        let err = Template::parse("{*rest}/tail").unwrap_err();
        assert!(matches!(err, TemplateError::CatchAllNotLast { .. }));
    }

    #[test]
    fn test_constraint_rejects_segment() {
        let template = Template::parse("{code}/x")
            .unwrap()
            .with_constraint("code", Arc::new(OnlyDigits))
            .unwrap();
        assert!(template.matches(&["404", "x"]).is_some());
        assert!(template.matches(&["abc", "x"]).is_none());

        let err = Template::parse("a/{b}")
            .unwrap()
            .with_constraint("c", Arc::new(OnlyDigits))
            .unwrap_err();
        assert!(matches!(err, TemplateError::UnknownParameter { .. }));
    }

    #[test]
    fn test_malformed_templates() {
        assert!(matches!(
            Template::parse("a//b").unwrap_err(),
            TemplateError::EmptySegment(_)
        ));
        assert!(matches!(
            Template::parse("{open").unwrap_err(),
            TemplateError::MalformedParameter { .. }
        ));
        assert!(matches!(
            Template::parse("{}").unwrap_err(),
            TemplateError::MalformedParameter { .. }
        ));
        assert!(matches!(
            Template::parse("{id}/{ID}").unwrap_err(),
            TemplateError::DuplicateParameter { .. }
        ));
    }

    #[test]
    fn test_empty_template_matches_root_only() {
        let template = Template::parse("").unwrap();
        assert_eq!(template.matches(&[]), Some(RouteValues::new()));
        assert_eq!(template.matches(&["x"]), None);
    }

    #[test]
    fn test_leading_literals() {
        let template = Template::parse("{tenant}/oops/error/{statusCode?}").unwrap();
        assert_eq!(template.leading_literals(0), 0);
        assert_eq!(template.leading_literals(1), 2);
        assert_eq!(Template::parse("sitemap").unwrap().leading_literals(0), 1);
    }

    #[test]
    fn test_path_segments_drop_empty() {
        assert_eq!(path_segments("/acme//sitemap/"), vec!["acme", "sitemap"]);
        assert!(path_segments("/").is_empty());
    }
}

//! # Path Templates
//!
//! Parsing of HTTP path templates like `/v1/{name=projects/*/secrets/*}:access`
//! into literal, field-binding and verb segments. Codecs consume the parsed
//! segments to derive format strings and accessor lists.

use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::OnceLock;

/// A field binding inside a path template: `{field}` or `{field=pattern}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBinding {
    /// The (possibly dotted) request field path, e.g. `secret.name`.
    pub field_path: String,
    /// The resource pattern constraining the value, e.g. `projects/*/secrets/*`.
    pub pattern: Option<String>,
}

impl PathBinding {
    /// The first component of the field path; the request field bound by
    /// this segment.
    pub fn root_field(&self) -> &str {
        self.field_path.split('.').next().unwrap_or("")
    }
}

/// One segment of a parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A literal path component, e.g. `v1`.
    Literal(String),
    /// A field binding, e.g. `{name=projects/*}`.
    Binding(PathBinding),
    /// A trailing custom-method verb, e.g. `:access`.
    Verb(String),
}

fn segment_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{(?P<field>[^}=]+)(?:=(?P<pattern>[^}]+))?\}|:(?P<verb>[^/{}:]+)$|(?P<literal>[^/{}:]+)")
            .expect("segment pattern is valid")
    })
}

/// Parses a path template into its segments, preserving order.
///
/// Fails when the template does not start with `/` or contains unbalanced
/// braces; the error names the offending template.
pub fn parse_path_template(template: &str) -> AppResult<Vec<PathSegment>> {
    if !template.starts_with('/') {
        return Err(AppError::General(format!(
            "malformed path template '{}': must start with '/'",
            template
        )));
    }
    let opens = template.matches('{').count();
    let closes = template.matches('}').count();
    if opens != closes {
        return Err(AppError::General(format!(
            "malformed path template '{}': unbalanced braces",
            template
        )));
    }
    // A colon is only valid introducing the trailing custom-method verb.
    if let Some(idx) = template.find(':') {
        let rest = &template[idx + 1..];
        if rest.is_empty() || rest.contains(&['/', ':', '{', '}'][..]) {
            return Err(AppError::General(format!(
                "malformed path template '{}': ':' must introduce a trailing verb",
                template
            )));
        }
    }

    let mut segments = Vec::new();
    for caps in segment_pattern().captures_iter(template) {
        if let Some(field) = caps.name("field") {
            segments.push(PathSegment::Binding(PathBinding {
                field_path: field.as_str().to_string(),
                pattern: caps.name("pattern").map(|p| p.as_str().to_string()),
            }));
        } else if let Some(verb) = caps.name("verb") {
            segments.push(PathSegment::Verb(verb.as_str().to_string()));
        } else if let Some(literal) = caps.name("literal") {
            segments.push(PathSegment::Literal(literal.as_str().to_string()));
        }
    }
    Ok(segments)
}

/// The root request fields bound by the template's `{field=...}` segments,
/// in template order.
pub fn bound_fields(segments: &[PathSegment]) -> Vec<String> {
    segments
        .iter()
        .filter_map(|s| match s {
            PathSegment::Binding(b) => Some(b.root_field().to_string()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_literal_only() {
        let segments = parse_path_template("/v1/projects").unwrap();
        assert_eq!(
            segments,
            vec![
                PathSegment::Literal("v1".into()),
                PathSegment::Literal("projects".into()),
            ]
        );
    }

    #[test]
    fn test_parse_binding_with_pattern_and_verb() {
        let segments = parse_path_template("/v1/{name=projects/*/secrets/*}:access").unwrap();
        assert_eq!(
            segments,
            vec![
                PathSegment::Literal("v1".into()),
                PathSegment::Binding(PathBinding {
                    field_path: "name".into(),
                    pattern: Some("projects/*/secrets/*".into()),
                }),
                PathSegment::Verb("access".into()),
            ]
        );
    }

    #[test]
    fn test_parse_dotted_field_and_mixed_literals() {
        let segments = parse_path_template("/v1/{secret.name=projects/*}/versions").unwrap();
        assert_eq!(
            segments,
            vec![
                PathSegment::Literal("v1".into()),
                PathSegment::Binding(PathBinding {
                    field_path: "secret.name".into(),
                    pattern: Some("projects/*".into()),
                }),
                PathSegment::Literal("versions".into()),
            ]
        );
        assert_eq!(bound_fields(&segments), vec!["secret".to_string()]);
    }

    #[test]
    fn test_parse_binding_without_pattern() {
        let segments = parse_path_template("/v1/{parent}/secrets").unwrap();
        assert_eq!(
            segments[1],
            PathSegment::Binding(PathBinding {
                field_path: "parent".into(),
                pattern: None,
            })
        );
    }

    #[test]
    fn test_reject_relative_template() {
        let err = parse_path_template("v1/things").unwrap_err();
        assert!(format!("{}", err).contains("must start with '/'"));
    }

    #[test]
    fn test_reject_unbalanced_braces() {
        let err = parse_path_template("/v1/{name").unwrap_err();
        assert!(format!("{}", err).contains("unbalanced braces"));
    }

    #[test]
    fn test_reject_colon_outside_trailing_verb() {
        for template in ["/v1/a:b/c", "/v1/things:", "/v1/{name}:get:set"] {
            let err = parse_path_template(template).unwrap_err();
            assert!(
                format!("{}", err).contains("trailing verb"),
                "template {}",
                template
            );
        }
        // The trailing-verb form still parses.
        let segments = parse_path_template("/v1/things:batchGet").unwrap();
        assert_eq!(segments[2], PathSegment::Verb("batchGet".into()));
    }
}

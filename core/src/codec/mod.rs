#![deny(missing_docs)]

//! # Codec Module
//!
//! Defines the [`Codec`] trait — the per-target-language capability set —
//! and the factory selecting a concrete codec by language key. The projector
//! is written entirely against this trait, so adding a target language never
//! touches the projection logic.

use crate::api::path_template::{bound_fields, parse_path_template};
use crate::api::state::State;
use crate::api::{Api, Enum, EnumValue, Field, Message, Method, OneOf, PathInfo};
use crate::config::{self, CodecOptions, PackageDependency};
use crate::error::{AppError, AppResult};
use chrono::Datelike;
use std::collections::BTreeSet;

mod go;
mod rust;

pub use go::GoCodec;
pub use rust::RustCodec;

/// The per-target-language capability set.
///
/// All operations are pure functions of the model node and the generation
/// state; given identical inputs they return identical outputs, which is
/// what makes golden-file regression testing of generated output possible.
///
/// A codec that cannot represent a construct fails the run with a
/// [`AppError::Mapping`] naming the construct; codecs never silently drop
/// data.
pub trait Codec: std::fmt::Debug {
    /// The language key this codec was selected by, e.g. `rust`.
    fn language(&self) -> &'static str;

    /// The template directory for this target.
    fn template_dir(&self) -> String;

    /// Registers the codec's well-known type mappings into the state.
    ///
    /// Idempotent: the second and later calls of a run are no-ops.
    fn load_well_known_types(&self, state: &mut State);

    /// Converts a name to the target's snake_case, escaping reserved words.
    fn to_snake(&self, name: &str) -> String;

    /// Converts a name to snake_case without reserved-word escaping.
    fn to_snake_no_mangling(&self, name: &str) -> String;

    /// Converts a name to PascalCase, escaping reserved words.
    fn to_pascal(&self, name: &str) -> String;

    /// Converts a name to camelCase, escaping reserved words.
    fn to_camel(&self, name: &str) -> String;

    /// The target-language type expression for a field, substituting
    /// well-known-type equivalents where registered.
    fn field_type(&self, field: &Field, state: &State) -> AppResult<String>;

    /// The expression passing a field as a query parameter.
    fn as_query_parameter(&self, field: &Field, state: &State) -> AppResult<String>;

    /// The target-language name of a message.
    fn message_name(&self, message: &Message, state: &State) -> String;

    /// The fully qualified target-language name of a message.
    fn fq_message_name(&self, message: &Message, state: &State) -> String;

    /// Target-language annotations attached to a generated message.
    fn message_attributes(&self, message: &Message, state: &State) -> Vec<String>;

    /// Target-language annotations attached to a generated field, derived
    /// from its semantic role (optional/repeated/map/oneof member).
    fn field_attributes(&self, field: &Field, state: &State) -> Vec<String>;

    /// The target-language name of an enum.
    fn enum_name(&self, enumz: &Enum, state: &State) -> String;

    /// The target-language name of an enum value.
    fn enum_value_name(&self, value: &EnumValue, state: &State) -> String;

    /// The target-language type of a oneof group.
    fn oneof_type(&self, oneof: &OneOf, state: &State) -> AppResult<String>;

    /// The type name used for a method's input or output, resolved through
    /// the state. `referrer` names the method for error reporting.
    fn method_in_out_type_name(&self, id: &str, referrer: &str, state: &State)
        -> AppResult<String>;

    /// The path-formatting literal: each `{field=...}` segment replaced by a
    /// target-language placeholder, literals preserved in order.
    fn http_path_fmt(&self, path_info: &PathInfo, state: &State) -> AppResult<String>;

    /// The ordered field-access expressions, one per placeholder, resolved
    /// against the method's input message.
    fn http_path_args(&self, path_info: &PathInfo, state: &State) -> AppResult<Vec<String>>;

    /// The accessor expression for the method's body field.
    ///
    /// Empty when the whole request is the body (`body_field_path == "*"`)
    /// or when the method has no body; callers distinguish the two through
    /// [`PathInfo::has_body`].
    fn body_accessor(&self, method: &Method, state: &State) -> AppResult<String>;

    /// The input-message fields that become URL query parameters: declared
    /// fields minus path-bound fields minus the body field, in declaration
    /// order.
    ///
    /// The derivation is language independent, so it is shared here; codecs
    /// only differ in how each field is rendered.
    fn query_params(&self, method: &Method, state: &State) -> AppResult<Vec<Field>> {
        if method.path_info.body_is_whole_request() {
            // The entire request travels in the body; nothing is left for
            // the query string.
            return Ok(Vec::new());
        }
        let input = state.resolve_message(&method.input_type_id, &method.name)?;
        let segments = parse_path_template(&method.path_info.path_template)?;
        let mut excluded: BTreeSet<String> = bound_fields(&segments).into_iter().collect();
        if method.path_info.has_body() {
            if let Some(root) = method.path_info.body_field_path.split('.').next() {
                excluded.insert(root.to_string());
            }
        }
        Ok(input
            .fields
            .iter()
            .filter(|f| !excluded.contains(&f.name))
            .cloned()
            .collect())
    }

    /// Formats raw documentation into the target's comment-line convention,
    /// preserving source line breaks.
    fn format_doc_comments(&self, documentation: &str) -> Vec<String>;

    /// The package name of the generated library.
    fn package_name(&self, api: &Api) -> String;

    /// Manifest lines for the external dependencies wired through
    /// `package:` options.
    fn required_packages(&self) -> Vec<String>;

    /// Import lines the generated code needs beyond its templates.
    fn imports(&self) -> Vec<String>;

    /// The boilerplate copyright year.
    fn copyright_year(&self) -> String;

    /// True when the generated project must not be published.
    fn not_for_publication(&self) -> bool;
}

/// Selects the codec for a target language.
///
/// Fails with a configuration error for an unknown language key; option
/// parsing errors (e.g. a malformed `package:` value) surface here as well,
/// before any model work.
pub fn new_codec(options: &CodecOptions) -> AppResult<Box<dyn Codec>> {
    match options.language.as_str() {
        "rust" => Ok(Box::new(RustCodec::new(options)?)),
        "go" => Ok(Box::new(GoCodec::new(options)?)),
        other => Err(AppError::Config(format!(
            "unknown target language '{}'",
            other
        ))),
    }
}

/// Settings shared by every codec, parsed once from the codec options.
#[derive(Debug, Clone)]
pub(crate) struct CodecConfig {
    pub copyright_year: String,
    pub package_name_override: Option<String>,
    pub not_for_publication: bool,
    pub template_dir: String,
    pub dependencies: Vec<PackageDependency>,
}

impl CodecConfig {
    pub fn from_options(options: &CodecOptions) -> AppResult<CodecConfig> {
        let copyright_year = options
            .options
            .get(config::OPTION_COPYRIGHT_YEAR)
            .cloned()
            .unwrap_or_else(|| format!("{:04}", chrono::Utc::now().year()));
        Ok(CodecConfig {
            copyright_year,
            package_name_override: options
                .options
                .get(config::OPTION_PACKAGE_NAME_OVERRIDE)
                .cloned(),
            not_for_publication: options
                .options
                .get(config::OPTION_NOT_FOR_PUBLICATION)
                .map(|v| v == "true")
                .unwrap_or(false),
            template_dir: options.template_dir.clone(),
            dependencies: config::package_dependencies(&options.options)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PathInfo, Service, Typez};

    fn codec_options(language: &str) -> CodecOptions {
        CodecOptions {
            language: language.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_factory_selects_by_language_key() {
        assert_eq!(new_codec(&codec_options("rust")).unwrap().language(), "rust");
        assert_eq!(new_codec(&codec_options("go")).unwrap().language(), "go");
    }

    #[test]
    fn test_factory_rejects_unknown_language() {
        let err = new_codec(&codec_options("cobol")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(format!("{}", err).contains("cobol"));
    }

    #[test]
    fn test_factory_rejects_malformed_package_option() {
        let mut options = codec_options("rust");
        options
            .options
            .insert("package:gax".to_string(), "nonsense".to_string());
        assert!(new_codec(&options).is_err());
    }

    fn query_param_fixture() -> (Api, Method) {
        let method = Method {
            name: "CreateSecret".into(),
            id: ".test.Service.CreateSecret".into(),
            input_type_id: ".test.CreateSecretRequest".into(),
            output_type_id: ".test.Secret".into(),
            path_info: PathInfo {
                verb: "POST".into(),
                path_template: "/v1/{name=projects/*}/secrets".into(),
                body_field_path: "secret".into(),
            },
            ..Default::default()
        };
        let api = Api {
            name: "test".into(),
            messages: vec![
                Message {
                    name: "CreateSecretRequest".into(),
                    id: ".test.CreateSecretRequest".into(),
                    fields: vec![
                        Field {
                            name: "name".into(),
                            typez: Typez::String,
                            ..Default::default()
                        },
                        Field {
                            name: "secret_id".into(),
                            typez: Typez::String,
                            ..Default::default()
                        },
                        Field {
                            name: "secret".into(),
                            typez: Typez::Message,
                            type_id: ".test.Secret".into(),
                            ..Default::default()
                        },
                        Field {
                            name: "validate_only".into(),
                            typez: Typez::Bool,
                            ..Default::default()
                        },
                    ],
                    ..Default::default()
                },
                Message {
                    name: "Secret".into(),
                    id: ".test.Secret".into(),
                    ..Default::default()
                },
            ],
            services: vec![Service {
                name: "Service".into(),
                id: ".test.Service".into(),
                methods: vec![method.clone()],
                ..Default::default()
            }],
            ..Default::default()
        };
        (api, method)
    }

    #[test]
    fn test_query_params_exclude_path_and_body_in_order() {
        let (api, method) = query_param_fixture();
        let state = State::build(&api).unwrap();
        let codec = new_codec(&codec_options("rust")).unwrap();
        let params = codec.query_params(&method, &state).unwrap();
        let names: Vec<&str> = params.iter().map(|f| f.name.as_str()).collect();
        // `name` is path-bound, `secret` is the body; the rest keep their
        // declaration order.
        assert_eq!(names, vec!["secret_id", "validate_only"]);
    }

    #[test]
    fn test_query_params_empty_when_whole_request_is_body() {
        let (api, mut method) = query_param_fixture();
        method.path_info.path_template = "/v1/secrets".into();
        method.path_info.body_field_path = "*".into();
        let state = State::build(&api).unwrap();
        let codec = new_codec(&codec_options("rust")).unwrap();
        assert!(codec.query_params(&method, &state).unwrap().is_empty());
    }
}

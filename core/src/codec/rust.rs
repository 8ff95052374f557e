//! # Rust Codec
//!
//! Maps the API model onto idiomatic Rust client-library vocabulary:
//! `crate::model::` qualified types, `wkt::` well-known-type substitution,
//! serde attributes, `{}` path-format placeholders, `req.field` accessors
//! and `///` doc lines.

use crate::api::state::State;
use crate::api::{Api, Enum, EnumValue, Field, Message, Method, OneOf, PathInfo, PathSegment};
use crate::codec::{Codec, CodecConfig};
use crate::config::CodecOptions;
use crate::error::{AppError, AppResult};
use heck::{ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use std::collections::BTreeMap;

/// Keywords that need `r#` escaping when used as identifiers.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// Identifiers that cannot be raw; escaped with a trailing underscore.
const UNRAWABLE: &[&str] = &["self", "Self", "super", "crate"];

fn escape(name: String) -> String {
    if UNRAWABLE.contains(&name.as_str()) {
        format!("{}_", name)
    } else if KEYWORDS.contains(&name.as_str()) {
        format!("r#{}", name)
    } else {
        name
    }
}

/// Strips a previous escape so conversions stay idempotent.
fn unescape(name: &str) -> &str {
    name.strip_prefix("r#").unwrap_or(name)
}

/// The codec for the `rust` target language.
#[derive(Debug)]
pub struct RustCodec {
    config: CodecConfig,
    /// Specification package -> local crate alias, from `package:` options
    /// carrying `source=` entries.
    source_to_alias: BTreeMap<String, String>,
}

impl RustCodec {
    /// Builds a Rust codec from the merged codec options.
    pub fn new(options: &CodecOptions) -> AppResult<RustCodec> {
        let config = CodecConfig::from_options(options)?;
        let mut source_to_alias = BTreeMap::new();
        for dependency in &config.dependencies {
            let alias = dependency.name.replace('-', "_");
            for source in &dependency.sources {
                source_to_alias.insert(source.clone(), alias.clone());
            }
        }
        Ok(RustCodec {
            config,
            source_to_alias,
        })
    }

    fn scalar_type(&self, field: &Field) -> Option<&'static str> {
        use crate::api::Typez::*;
        match field.typez {
            Double => Some("f64"),
            Float => Some("f32"),
            Int64 | Sfixed64 | Sint64 => Some("i64"),
            Uint64 | Fixed64 => Some("u64"),
            Int32 | Sfixed32 | Sint32 => Some("i32"),
            Uint32 | Fixed32 => Some("u32"),
            Bool => Some("bool"),
            String => Some("String"),
            Bytes => Some("Vec<u8>"),
            Message | Enum => None,
        }
    }

    /// The unwrapped type expression, before `Option`/`Vec` wrapping.
    fn base_type(&self, field: &Field, state: &State) -> AppResult<String> {
        if let Some(scalar) = self.scalar_type(field) {
            return Ok(scalar.to_string());
        }
        match field.typez {
            crate::api::Typez::Message => {
                let message = state.resolve_message(&field.type_id, &field.name)?;
                if message.is_map {
                    let (key, value) = map_entry_fields(message)?;
                    return Ok(format!(
                        "std::collections::HashMap<{},{}>",
                        self.base_type(key, state)?,
                        self.base_type(value, state)?
                    ));
                }
                Ok(self.fq_message_name(message, state))
            }
            crate::api::Typez::Enum => {
                let enumz = state.resolve_enum(&field.type_id, &field.name)?;
                Ok(format!("crate::model::{}", self.to_pascal(&enumz.name)))
            }
            _ => Err(AppError::Mapping {
                construct: format!("field '{}' of unsupported type", field.name),
                language: "rust".into(),
            }),
        }
    }

    fn is_map_field(&self, field: &Field, state: &State) -> bool {
        field.typez == crate::api::Typez::Message
            && state
                .resolve_message(&field.type_id, &field.name)
                .map(|m| m.is_map)
                .unwrap_or(false)
    }

    fn accessor(&self, field_path: &str) -> String {
        field_path
            .split('.')
            .map(|part| self.to_snake(part))
            .collect::<Vec<_>>()
            .join(".")
    }
}

fn map_entry_fields(message: &Message) -> AppResult<(&Field, &Field)> {
    match message.fields.as_slice() {
        [key, value, ..] => Ok((key, value)),
        _ => Err(AppError::Mapping {
            construct: format!(
                "map entry message '{}' without key and value fields",
                message.id
            ),
            language: "rust".into(),
        }),
    }
}

impl Codec for RustCodec {
    fn language(&self) -> &'static str {
        "rust"
    }

    fn template_dir(&self) -> String {
        if self.config.template_dir.is_empty() {
            "templates/rust".to_string()
        } else {
            self.config.template_dir.clone()
        }
    }

    fn load_well_known_types(&self, state: &mut State) {
        if !state.start_well_known_load() {
            return;
        }
        for name in ["Timestamp", "Duration", "Empty", "FieldMask"] {
            state.register_well_known(Message {
                name: name.to_string(),
                id: format!(".google.protobuf.{}", name),
                package: "google.protobuf".to_string(),
                ..Default::default()
            });
        }
    }

    fn to_snake(&self, name: &str) -> String {
        escape(unescape(name).to_snake_case())
    }

    fn to_snake_no_mangling(&self, name: &str) -> String {
        unescape(name).to_snake_case()
    }

    fn to_pascal(&self, name: &str) -> String {
        escape(unescape(name).to_upper_camel_case())
    }

    fn to_camel(&self, name: &str) -> String {
        escape(unescape(name).to_lower_camel_case())
    }

    fn field_type(&self, field: &Field, state: &State) -> AppResult<String> {
        if self.is_map_field(field, state) {
            // Map fields are already a container; never wrapped further.
            return self.base_type(field, state);
        }
        let base = self.base_type(field, state)?;
        if field.repeated {
            Ok(format!("Vec<{}>", base))
        } else if field.typez == crate::api::Typez::Message || field.optional {
            Ok(format!("Option<{}>", base))
        } else {
            Ok(base)
        }
    }

    fn as_query_parameter(&self, field: &Field, state: &State) -> AppResult<String> {
        let accessor = self.to_snake(&field.name);
        if field.typez == crate::api::Typez::Message {
            // Message-typed query parameters are flattened through serde.
            let _ = state.resolve_message(&field.type_id, &field.name)?;
            Ok(format!(
                "&serde_json::to_value(&req.{}).map_err(Error::serde)?",
                accessor
            ))
        } else {
            Ok(format!("&req.{}", accessor))
        }
    }

    fn message_name(&self, message: &Message, _state: &State) -> String {
        if let Some(alias) = self.source_to_alias.get(&message.package) {
            format!("{}::{}", alias, self.to_pascal(&message.name))
        } else {
            self.to_pascal(&message.name)
        }
    }

    fn fq_message_name(&self, message: &Message, _state: &State) -> String {
        if let Some(alias) = self.source_to_alias.get(&message.package) {
            format!("{}::{}", alias, self.to_pascal(&message.name))
        } else {
            format!("crate::model::{}", self.to_pascal(&message.name))
        }
    }

    fn message_attributes(&self, _message: &Message, _state: &State) -> Vec<String> {
        vec![
            "#[serde(default, rename_all = \"camelCase\")]".to_string(),
            "#[non_exhaustive]".to_string(),
        ]
    }

    fn field_attributes(&self, field: &Field, state: &State) -> Vec<String> {
        use crate::api::Typez::*;
        let skip_if = if self.is_map_field(field, state) {
            Some("std::collections::HashMap::is_empty")
        } else if field.repeated {
            Some("Vec::is_empty")
        } else if field.typez == Message || field.optional {
            Some("Option::is_none")
        } else {
            match field.typez {
                String => Some("String::is_empty"),
                Bytes => Some("Vec::is_empty"),
                _ => None,
            }
        };
        skip_if
            .map(|predicate| vec![format!("#[serde(skip_serializing_if = \"{}\")]", predicate)])
            .unwrap_or_default()
    }

    fn enum_name(&self, enumz: &Enum, _state: &State) -> String {
        self.to_pascal(&enumz.name)
    }

    fn enum_value_name(&self, value: &EnumValue, _state: &State) -> String {
        value.name.to_shouty_snake_case()
    }

    fn oneof_type(&self, oneof: &OneOf, _state: &State) -> AppResult<String> {
        Ok(self.to_pascal(&oneof.name))
    }

    fn method_in_out_type_name(
        &self,
        id: &str,
        referrer: &str,
        state: &State,
    ) -> AppResult<String> {
        let message = state.resolve_message(id, referrer)?;
        Ok(self.fq_message_name(message, state))
    }

    fn http_path_fmt(&self, path_info: &PathInfo, _state: &State) -> AppResult<String> {
        let segments = crate::api::path_template::parse_path_template(&path_info.path_template)?;
        let mut fmt = String::new();
        for segment in &segments {
            match segment {
                PathSegment::Literal(literal) => {
                    fmt.push('/');
                    fmt.push_str(literal);
                }
                PathSegment::Binding(_) => fmt.push_str("/{}"),
                PathSegment::Verb(verb) => {
                    fmt.push(':');
                    fmt.push_str(verb);
                }
            }
        }
        Ok(fmt)
    }

    fn http_path_args(&self, path_info: &PathInfo, _state: &State) -> AppResult<Vec<String>> {
        let segments = crate::api::path_template::parse_path_template(&path_info.path_template)?;
        Ok(segments
            .iter()
            .filter_map(|segment| match segment {
                PathSegment::Binding(binding) => {
                    Some(format!("req.{}", self.accessor(&binding.field_path)))
                }
                _ => None,
            })
            .collect())
    }

    fn body_accessor(&self, method: &Method, _state: &State) -> AppResult<String> {
        let path = &method.path_info.body_field_path;
        if !method.path_info.has_body() || method.path_info.body_is_whole_request() {
            // The whole request (or nothing) is the body; `has_body` tells
            // the two apart.
            return Ok(String::new());
        }
        Ok(format!(".{}", self.accessor(path)))
    }

    fn format_doc_comments(&self, documentation: &str) -> Vec<String> {
        if documentation.is_empty() {
            return Vec::new();
        }
        documentation
            .trim_end()
            .lines()
            .map(|line| {
                let line = line.trim_end();
                if line.is_empty() {
                    "///".to_string()
                } else {
                    format!("/// {}", line)
                }
            })
            .collect()
    }

    fn package_name(&self, api: &Api) -> String {
        self.config
            .package_name_override
            .clone()
            .unwrap_or_else(|| api.name.to_lowercase())
    }

    fn required_packages(&self) -> Vec<String> {
        self.config
            .dependencies
            .iter()
            .map(|dependency| {
                let mut parts = Vec::new();
                if let Some(package) = &dependency.package {
                    parts.push(format!("package = \"{}\"", package));
                }
                if let Some(path) = &dependency.path {
                    parts.push(format!("path = \"{}\"", path));
                }
                if !dependency.features.is_empty() {
                    let features: Vec<String> = dependency
                        .features
                        .iter()
                        .map(|f| format!("\"{}\"", f))
                        .collect();
                    parts.push(format!("features = [{}]", features.join(", ")));
                }
                format!("{} = {{ {} }}", dependency.name, parts.join(", "))
            })
            .collect()
    }

    fn imports(&self) -> Vec<String> {
        Vec::new()
    }

    fn copyright_year(&self) -> String {
        self.config.copyright_year.clone()
    }

    fn not_for_publication(&self) -> bool {
        self.config.not_for_publication
    }
}

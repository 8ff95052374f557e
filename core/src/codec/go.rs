//! # Go Codec
//!
//! Maps the API model onto Go client-library vocabulary: exported
//! PascalCase identifiers, pointer message fields, `%s` path-format
//! placeholders and `// ` doc lines.

use crate::api::state::State;
use crate::api::{Api, Enum, EnumValue, Field, Message, Method, OneOf, PathInfo, PathSegment};
use crate::codec::{Codec, CodecConfig};
use crate::config::CodecOptions;
use crate::error::{AppError, AppResult};
use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};

const KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

fn escape(name: String) -> String {
    if KEYWORDS.contains(&name.as_str()) {
        format!("{}_", name)
    } else {
        name
    }
}

/// The codec for the `go` target language.
#[derive(Debug)]
pub struct GoCodec {
    config: CodecConfig,
}

impl GoCodec {
    /// Builds a Go codec from the merged codec options.
    pub fn new(options: &CodecOptions) -> AppResult<GoCodec> {
        Ok(GoCodec {
            config: CodecConfig::from_options(options)?,
        })
    }

    fn scalar_type(&self, field: &Field) -> Option<&'static str> {
        use crate::api::Typez::*;
        match field.typez {
            Double => Some("float64"),
            Float => Some("float32"),
            Int64 | Sfixed64 | Sint64 => Some("int64"),
            Uint64 | Fixed64 => Some("uint64"),
            Int32 | Sfixed32 | Sint32 => Some("int32"),
            Uint32 | Fixed32 => Some("uint32"),
            Bool => Some("bool"),
            String => Some("string"),
            Bytes => Some("[]byte"),
            Message | Enum => None,
        }
    }

    fn base_type(&self, field: &Field, state: &State) -> AppResult<String> {
        if let Some(scalar) = self.scalar_type(field) {
            return Ok(scalar.to_string());
        }
        match field.typez {
            crate::api::Typez::Message => {
                let message = state.resolve_message(&field.type_id, &field.name)?;
                if message.is_map {
                    let (key, value) = match message.fields.as_slice() {
                        [key, value, ..] => (key, value),
                        _ => {
                            return Err(AppError::Mapping {
                                construct: format!(
                                    "map entry message '{}' without key and value fields",
                                    message.id
                                ),
                                language: "go".into(),
                            })
                        }
                    };
                    return Ok(format!(
                        "map[{}]{}",
                        self.base_type(key, state)?,
                        self.base_type(value, state)?
                    ));
                }
                Ok(format!("*{}", self.to_pascal(&message.name)))
            }
            crate::api::Typez::Enum => {
                let enumz = state.resolve_enum(&field.type_id, &field.name)?;
                Ok(self.to_pascal(&enumz.name))
            }
            _ => Err(AppError::Mapping {
                construct: format!("field '{}' of unsupported type", field.name),
                language: "go".into(),
            }),
        }
    }

    fn accessor(&self, field_path: &str) -> String {
        field_path
            .split('.')
            .map(|part| self.to_pascal(part))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl Codec for GoCodec {
    fn language(&self) -> &'static str {
        "go"
    }

    fn template_dir(&self) -> String {
        if self.config.template_dir.is_empty() {
            "templates/go".to_string()
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
        escape(name.to_snake_case())
    }

    fn to_snake_no_mangling(&self, name: &str) -> String {
        name.to_snake_case()
    }

    fn to_pascal(&self, name: &str) -> String {
        // Exported identifiers never collide with Go keywords.
        name.to_upper_camel_case()
    }

    fn to_camel(&self, name: &str) -> String {
        escape(name.to_lower_camel_case())
    }

    fn field_type(&self, field: &Field, state: &State) -> AppResult<String> {
        let base = self.base_type(field, state)?;
        if field.repeated && !base.starts_with("map[") {
            Ok(format!("[]{}", base))
        } else {
            Ok(base)
        }
    }

    fn as_query_parameter(&self, field: &Field, _state: &State) -> AppResult<String> {
        Ok(format!("req.{}", self.to_pascal(&field.name)))
    }

    fn message_name(&self, message: &Message, _state: &State) -> String {
        self.to_pascal(&message.name)
    }

    fn fq_message_name(&self, message: &Message, _state: &State) -> String {
        self.to_pascal(&message.name)
    }

    fn message_attributes(&self, _message: &Message, _state: &State) -> Vec<String> {
        Vec::new()
    }

    fn field_attributes(&self, field: &Field, _state: &State) -> Vec<String> {
        vec![format!("`json:\"{},omitempty\"`", field.json_name)]
    }

    fn enum_name(&self, enumz: &Enum, _state: &State) -> String {
        self.to_pascal(&enumz.name)
    }

    fn enum_value_name(&self, value: &EnumValue, _state: &State) -> String {
        self.to_pascal(&value.name)
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
                PathSegment::Binding(_) => fmt.push_str("/%s"),
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
                    "//".to_string()
                } else {
                    format!("// {}", line)
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
                let mut line = dependency.name.clone();
                if let Some(path) = &dependency.path {
                    line = format!("{} => {}", line, path);
                }
                line
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Typez;
    use pretty_assertions::assert_eq;

    fn codec() -> GoCodec {
        GoCodec::new(&CodecOptions {
            language: "go".into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_naming_conversions() {
        let c = codec();
        assert_eq!(c.to_pascal("secret_version"), "SecretVersion");
        assert_eq!(c.to_snake("range"), "range_");
        assert_eq!(c.to_camel("Type"), "type_");
    }

    #[test]
    fn test_conversions_are_idempotent() {
        let c = codec();
        for name in ["SecretVersion", "range", "page_size", "type"] {
            let snake = c.to_snake(name);
            assert_eq!(c.to_snake(&snake), snake, "to_snake({})", name);
            let pascal = c.to_pascal(name);
            assert_eq!(c.to_pascal(&pascal), pascal, "to_pascal({})", name);
            let camel = c.to_camel(name);
            assert_eq!(c.to_camel(&camel), camel, "to_camel({})", name);
        }
    }

    #[test]
    fn test_field_types() {
        let c = codec();
        let state = State::default();
        let field = Field {
            name: "page_size".into(),
            typez: Typez::Int32,
            ..Default::default()
        };
        assert_eq!(c.field_type(&field, &state).unwrap(), "int32");
        let field = Field {
            name: "names".into(),
            typez: Typez::String,
            repeated: true,
            ..Default::default()
        };
        assert_eq!(c.field_type(&field, &state).unwrap(), "[]string");
    }

    #[test]
    fn test_message_field_is_pointer() {
        let c = codec();
        let api = Api {
            name: "test".into(),
            messages: vec![Message {
                name: "Secret".into(),
                id: ".test.Secret".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let state = State::build(&api).unwrap();
        let field = Field {
            name: "secret".into(),
            typez: Typez::Message,
            type_id: ".test.Secret".into(),
            ..Default::default()
        };
        assert_eq!(c.field_type(&field, &state).unwrap(), "*Secret");
    }

    #[test]
    fn test_path_fmt_uses_format_verbs() {
        let c = codec();
        let path_info = PathInfo {
            verb: "GET".into(),
            path_template: "/v1/{name=projects/*}:access".into(),
            body_field_path: String::new(),
        };
        assert_eq!(
            c.http_path_fmt(&path_info, &State::default()).unwrap(),
            "/v1/%s:access"
        );
        assert_eq!(
            c.http_path_args(&path_info, &State::default()).unwrap(),
            vec!["req.Name".to_string()]
        );
    }

    #[test]
    fn test_doc_comments_use_line_comments() {
        let c = codec();
        assert_eq!(
            c.format_doc_comments("Gets a secret.\n\nDetails."),
            vec![
                "// Gets a secret.".to_string(),
                "//".to_string(),
                "// Details.".to_string(),
            ]
        );
    }

    #[test]
    fn test_json_field_attributes() {
        let c = codec();
        let field = Field {
            name: "page_size".into(),
            json_name: "pageSize".into(),
            typez: Typez::Int32,
            ..Default::default()
        };
        assert_eq!(
            c.field_attributes(&field, &State::default()),
            vec!["`json:\"pageSize,omitempty\"`".to_string()]
        );
    }
}

//! # Template Data Projector
//!
//! Flattens the API model, through a codec, into render-ready records: every
//! derived value a template might need is precomputed here, so templates
//! only substitute strings and iterate lists. Traversal follows model
//! declaration order throughout, which keeps the projected output
//! byte-deterministic for a given model, codec and options.

use crate::api;
use crate::api::state::State;
use crate::codec::Codec;
use crate::error::{AppError, AppResult};
use serde::Serialize;

/// The root record handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateData {
    /// The template directory the codec selected.
    pub template_dir: String,
    /// Short API name.
    pub name: String,
    /// Human readable title.
    pub title: String,
    /// Long form description.
    pub description: String,
    /// The generated package name.
    pub package_name: String,
    /// Manifest lines for the configured external dependencies.
    pub required_packages: Vec<String>,
    /// Extra import lines the generated code needs.
    pub imports: Vec<String>,
    /// True when the model declares at least one service.
    pub has_services: bool,
    /// The boilerplate copyright year.
    pub copyright_year: String,
    /// License-header lines for every generated file.
    pub boilerplate: Vec<String>,
    /// Default host of the first service; empty without services.
    pub default_host: String,
    /// Projected services, in declaration order.
    pub services: Vec<Service>,
    /// Projected top-level messages, in declaration order.
    pub messages: Vec<Message>,
    /// Projected top-level enums, in declaration order.
    pub enums: Vec<Enum>,
    /// The API name lowercased, usable as a file stem.
    pub name_to_lower: String,
    /// True when the generated project must not be published.
    pub not_for_publication: bool,
}

/// A projected service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    /// Projected methods, in declaration order.
    pub methods: Vec<Method>,
    /// Service name in the target's snake_case.
    pub name_to_snake: String,
    /// Service name in the target's PascalCase.
    pub name_to_pascal: String,
    /// Service name in the target's camelCase.
    pub name_to_camel: String,
    /// Alias of `name_to_pascal`, for templates that address the service
    /// explicitly.
    pub service_name_to_pascal: String,
    /// The service name as declared.
    pub service_name: String,
    /// Documentation formatted as target comment lines.
    pub doc_lines: Vec<String>,
    /// Default host of the service.
    pub default_host: String,
}

/// A projected message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// All fields, in declaration order.
    pub fields: Vec<Field>,
    /// Fields that do not belong to any oneof, in declaration order.
    pub basic_fields: Vec<Field>,
    /// The oneof groups.
    pub explicit_one_ofs: Vec<OneOf>,
    /// Nested messages.
    pub nested_messages: Vec<Message>,
    /// Nested enums.
    pub enums: Vec<Enum>,
    /// Target-language annotations for the message declaration.
    pub message_attributes: Vec<String>,
    /// The target-language message name.
    pub name: String,
    /// The fully qualified target-language name.
    pub qualified_name: String,
    /// The message name in the target's snake_case.
    pub name_snake_case: String,
    /// True when the message declares nested enums, oneofs, or non-map
    /// nested messages, i.e. when a nested-types block must be emitted.
    pub has_nested_types: bool,
    /// Documentation formatted as target comment lines.
    pub doc_lines: Vec<String>,
    /// True for synthetic map-entry messages.
    pub is_map: bool,
    /// True when this message is the response of a pageable method.
    pub is_pageable_response: bool,
}

/// A projected method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Method {
    /// Method name in the target's snake_case.
    pub name_to_snake: String,
    /// Method name in the target's camelCase.
    pub name_to_camel: String,
    /// Method name in the target's PascalCase.
    pub name_to_pascal: String,
    /// Documentation formatted as target comment lines.
    pub doc_lines: Vec<String>,
    /// Target-language name of the request type.
    pub input_type_name: String,
    /// Target-language name of the response type.
    pub output_type_name: String,
    /// The HTTP verb, upper case.
    pub http_method: String,
    /// The HTTP verb, lower case.
    pub http_method_to_lower: String,
    /// The path-formatting literal.
    pub http_path_fmt: String,
    /// Field accessors matching the path placeholders, in order.
    pub http_path_args: Vec<String>,
    /// Request fields sent as URL query parameters.
    pub query_params: Vec<Field>,
    /// True when the method carries a request body.
    pub has_body: bool,
    /// Accessor for the body field; empty when the whole request is the
    /// body or there is no body.
    pub body_accessor: String,
    /// True when the method follows the pagination convention.
    pub is_pageable: bool,
}

/// A projected oneof group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneOf {
    /// Group name in the target's PascalCase.
    pub name_to_pascal: String,
    /// Group name in the target's snake_case.
    pub name_to_snake: String,
    /// Group name in snake_case without reserved-word escaping, for use
    /// inside larger identifiers.
    pub name_to_snake_no_mangling: String,
    /// The target-language type of the group.
    pub field_type: String,
    /// Documentation formatted as target comment lines.
    pub doc_lines: Vec<String>,
    /// The member fields, in declaration order.
    pub fields: Vec<Field>,
}

/// A projected field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    /// Field name in the target's snake_case.
    pub name_to_snake: String,
    /// Field name in snake_case without reserved-word escaping.
    pub name_to_snake_no_mangling: String,
    /// Field name in the target's camelCase.
    pub name_to_camel: String,
    /// Field name in the target's PascalCase.
    pub name_to_pascal: String,
    /// Documentation formatted as target comment lines.
    pub doc_lines: Vec<String>,
    /// Target-language annotations for the field declaration.
    pub field_attributes: Vec<String>,
    /// The target-language type expression.
    pub field_type: String,
    /// The JSON name.
    pub json_name: String,
    /// The expression passing this field as a query parameter.
    pub as_query_parameter: String,
}

/// A projected enum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enum {
    /// The target-language enum name.
    pub name: String,
    /// The enum name in the target's snake_case.
    pub name_snake_case: String,
    /// Documentation formatted as target comment lines.
    pub doc_lines: Vec<String>,
    /// The values, in declaration order.
    pub values: Vec<EnumValue>,
}

/// A projected enum value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumValue {
    /// Documentation formatted as target comment lines.
    pub doc_lines: Vec<String>,
    /// The target-language value name.
    pub name: String,
    /// The numeric value.
    pub number: i32,
    /// The target-language name of the enclosing enum.
    pub enum_type: String,
}

impl TemplateData {
    /// Projects the whole model through a codec.
    ///
    /// Loads the codec's well-known types into the state first, then walks
    /// the model in declaration order. Any dangling reference or unmappable
    /// construct aborts the projection.
    pub fn new(model: &api::Api, codec: &dyn Codec, state: &mut State) -> AppResult<TemplateData> {
        codec.load_well_known_types(state);
        let services = model
            .services
            .iter()
            .map(|s| Service::new(s, codec, state))
            .collect::<AppResult<Vec<_>>>()?;
        let messages = model
            .messages
            .iter()
            .map(|m| Message::new(m, codec, state))
            .collect::<AppResult<Vec<_>>>()?;
        let enums = model
            .enums
            .iter()
            .map(|e| Enum::new(e, codec, state))
            .collect::<Vec<_>>();
        let year = codec.copyright_year();
        Ok(TemplateData {
            template_dir: codec.template_dir(),
            name: model.name.clone(),
            title: model.title.clone(),
            description: model.description.clone(),
            package_name: codec.package_name(model),
            required_packages: codec.required_packages(),
            imports: codec.imports(),
            has_services: !model.services.is_empty(),
            boilerplate: boilerplate(&year),
            copyright_year: year,
            default_host: model
                .services
                .first()
                .map(|s| s.default_host.clone())
                .unwrap_or_default(),
            services,
            messages,
            enums,
            name_to_lower: model.name.to_lowercase(),
            not_for_publication: codec.not_for_publication(),
        })
    }
}

fn boilerplate(year: &str) -> Vec<String> {
    vec![
        format!("Copyright {} the original author or authors.", year),
        String::new(),
        "Code generated by apigen. DO NOT EDIT.".to_string(),
    ]
}

impl Service {
    fn new(service: &api::Service, codec: &dyn Codec, state: &State) -> AppResult<Service> {
        Ok(Service {
            methods: service
                .methods
                .iter()
                .map(|m| Method::new(m, codec, state))
                .collect::<AppResult<Vec<_>>>()?,
            name_to_snake: codec.to_snake(&service.name),
            name_to_pascal: codec.to_pascal(&service.name),
            name_to_camel: codec.to_camel(&service.name),
            service_name_to_pascal: codec.to_pascal(&service.name),
            service_name: service.name.clone(),
            doc_lines: codec.format_doc_comments(&service.documentation),
            default_host: service.default_host.clone(),
        })
    }
}

impl Method {
    fn new(method: &api::Method, codec: &dyn Codec, state: &State) -> AppResult<Method> {
        Ok(Method {
            name_to_snake: codec.to_snake(&method.name),
            name_to_camel: codec.to_camel(&method.name),
            name_to_pascal: codec.to_pascal(&method.name),
            doc_lines: codec.format_doc_comments(&method.documentation),
            input_type_name: codec.method_in_out_type_name(
                &method.input_type_id,
                &method.name,
                state,
            )?,
            output_type_name: codec.method_in_out_type_name(
                &method.output_type_id,
                &method.name,
                state,
            )?,
            http_method: method.path_info.verb.clone(),
            http_method_to_lower: method.path_info.verb.to_lowercase(),
            http_path_fmt: codec.http_path_fmt(&method.path_info, state)?,
            http_path_args: codec.http_path_args(&method.path_info, state)?,
            query_params: codec
                .query_params(method, state)?
                .iter()
                .map(|f| Field::new(f, codec, state))
                .collect::<AppResult<Vec<_>>>()?,
            has_body: method.path_info.has_body(),
            body_accessor: codec.body_accessor(method, state)?,
            is_pageable: method.is_pageable,
        })
    }
}

impl Message {
    fn new(message: &api::Message, codec: &dyn Codec, state: &State) -> AppResult<Message> {
        let fields = message
            .fields
            .iter()
            .map(|f| Field::new(f, codec, state))
            .collect::<AppResult<Vec<_>>>()?;
        let basic_fields = message
            .fields
            .iter()
            .filter(|f| !f.is_oneof)
            .map(|f| Field::new(f, codec, state))
            .collect::<AppResult<Vec<_>>>()?;
        let explicit_one_ofs = message
            .oneofs
            .iter()
            .map(|o| OneOf::new(o, message, codec, state))
            .collect::<AppResult<Vec<_>>>()?;
        let nested_messages = message
            .messages
            .iter()
            .map(|m| Message::new(m, codec, state))
            .collect::<AppResult<Vec<_>>>()?;
        let enums = message
            .enums
            .iter()
            .map(|e| Enum::new(e, codec, state))
            .collect::<Vec<_>>();
        let has_nested_types = !enums.is_empty()
            || !explicit_one_ofs.is_empty()
            || nested_messages.iter().any(|m| !m.is_map);
        Ok(Message {
            fields,
            basic_fields,
            explicit_one_ofs,
            nested_messages,
            enums,
            message_attributes: codec.message_attributes(message, state),
            name: codec.message_name(message, state),
            qualified_name: codec.fq_message_name(message, state),
            name_snake_case: codec.to_snake(&message.name),
            has_nested_types,
            doc_lines: codec.format_doc_comments(&message.documentation),
            is_map: message.is_map,
            is_pageable_response: message.is_pageable_response,
        })
    }
}

impl OneOf {
    fn new(
        oneof: &api::OneOf,
        parent: &api::Message,
        codec: &dyn Codec,
        state: &State,
    ) -> AppResult<OneOf> {
        // Members are referenced by name into the parent's field list.
        let fields = oneof
            .fields
            .iter()
            .map(|name| {
                parent
                    .fields
                    .iter()
                    .find(|f| &f.name == name)
                    .ok_or_else(|| AppError::Reference {
                        id: name.clone(),
                        referrer: format!("oneof {} in {}", oneof.name, parent.name),
                    })
                    .and_then(|f| Field::new(f, codec, state))
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok(OneOf {
            name_to_pascal: codec.to_pascal(&oneof.name),
            name_to_snake: codec.to_snake(&oneof.name),
            name_to_snake_no_mangling: codec.to_snake_no_mangling(&oneof.name),
            field_type: codec.oneof_type(oneof, state)?,
            doc_lines: codec.format_doc_comments(&oneof.documentation),
            fields,
        })
    }
}

impl Field {
    fn new(field: &api::Field, codec: &dyn Codec, state: &State) -> AppResult<Field> {
        Ok(Field {
            name_to_snake: codec.to_snake(&field.name),
            name_to_snake_no_mangling: codec.to_snake_no_mangling(&field.name),
            name_to_camel: codec.to_camel(&field.name),
            name_to_pascal: codec.to_pascal(&field.name),
            doc_lines: codec.format_doc_comments(&field.documentation),
            field_attributes: codec.field_attributes(field, state),
            field_type: codec.field_type(field, state)?,
            json_name: field.json_name.clone(),
            as_query_parameter: codec.as_query_parameter(field, state)?,
        })
    }
}

impl Enum {
    fn new(enumz: &api::Enum, codec: &dyn Codec, state: &State) -> Enum {
        let enum_type = codec.enum_name(enumz, state);
        Enum {
            name: enum_type.clone(),
            name_snake_case: codec.to_snake(&enumz.name),
            doc_lines: codec.format_doc_comments(&enumz.documentation),
            values: enumz
                .values
                .iter()
                .map(|v| EnumValue {
                    doc_lines: codec.format_doc_comments(&v.documentation),
                    name: codec.enum_value_name(v, state),
                    number: v.number,
                    enum_type: enum_type.clone(),
                })
                .collect(),
        }
    }
}

#![deny(missing_docs)]

//! # API Model
//!
//! The canonical, format-independent representation of an API surface:
//! services, methods, messages, fields and enums. External parsers produce
//! this model; everything downstream (codecs, the template-data projector)
//! consumes it.
//!
//! Cross-entity links are weak references: an identifier string resolved
//! through [`state::State`], never an owning edge. Messages own their nested
//! messages, which gives arbitrary nesting depth without ownership cycles.

use serde::{Deserialize, Serialize};

pub mod pagination;
pub mod path_template;
pub mod state;

pub use path_template::{PathBinding, PathSegment};

/// The root of the API model.
///
/// Owns the services and the top-level messages and enums. Discarded after
/// one generation run; identifiers are stable only within that run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Api {
    /// Short name of the API, e.g. `secretmanager`.
    pub name: String,
    /// Human readable title, e.g. `Secret Manager API`.
    #[serde(default)]
    pub title: String,
    /// Long form description.
    #[serde(default)]
    pub description: String,
    /// The services exposed by this API.
    #[serde(default)]
    pub services: Vec<Service>,
    /// Top-level messages.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Top-level enums.
    #[serde(default)]
    pub enums: Vec<Enum>,
}

/// A service: a named group of methods sharing a default host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Service name, e.g. `SecretManagerService`.
    pub name: String,
    /// Unique identifier, e.g. `.google.cloud.secretmanager.v1.SecretManagerService`.
    pub id: String,
    /// Raw documentation text.
    #[serde(default)]
    pub documentation: String,
    /// Default host for the service, e.g. `secretmanager.googleapis.com`.
    #[serde(default)]
    pub default_host: String,
    /// The methods, in declaration order.
    #[serde(default)]
    pub methods: Vec<Method>,
}

/// A single RPC method.
///
/// Input and output types are weak references, resolved through
/// [`state::State`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Method {
    /// Method name, e.g. `GetSecret`.
    pub name: String,
    /// Unique identifier.
    pub id: String,
    /// Raw documentation text.
    #[serde(default)]
    pub documentation: String,
    /// Identifier of the request message.
    pub input_type_id: String,
    /// Identifier of the response message.
    pub output_type_id: String,
    /// The HTTP binding of the method.
    pub path_info: PathInfo,
    /// True if the request/response pair follows the pagination convention.
    /// Normally computed by [`pagination::mark_pagination`].
    #[serde(default)]
    pub is_pageable: bool,
}

/// The parsed HTTP binding of a method.
///
/// `body_field_path` distinguishes three states: empty string means the
/// method has no body, `*` means the entire request is the body, and any
/// other value is a (possibly dotted) path to the body field inside the
/// request message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathInfo {
    /// The HTTP verb, upper case, e.g. `GET`.
    pub verb: String,
    /// The raw path template, e.g. `/v1/{name=projects/*/secrets/*}:access`.
    pub path_template: String,
    /// Path to the request field carrying the body, if any.
    #[serde(default)]
    pub body_field_path: String,
}

impl PathInfo {
    /// True if the method carries a request body (a designated field or the
    /// whole request).
    pub fn has_body(&self) -> bool {
        !self.body_field_path.is_empty()
    }

    /// True if the entire request message is the body.
    pub fn body_is_whole_request(&self) -> bool {
        self.body_field_path == "*"
    }
}

/// A message (request, response, or data type).
///
/// Messages own their nested messages and enums, so deeply nested and
/// mutually recursive type graphs never create ownership cycles: recursion
/// between messages is always expressed through field type identifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message name, e.g. `Secret`.
    pub name: String,
    /// Unique identifier, e.g. `.google.cloud.secretmanager.v1.Secret`.
    pub id: String,
    /// The package the message belongs to, e.g. `google.protobuf` for
    /// well-known types.
    #[serde(default)]
    pub package: String,
    /// Raw documentation text.
    #[serde(default)]
    pub documentation: String,
    /// All fields, in declaration order, including oneof members.
    #[serde(default)]
    pub fields: Vec<Field>,
    /// The oneof groups declared on this message.
    #[serde(default)]
    pub oneofs: Vec<OneOf>,
    /// Nested messages.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Nested enums.
    #[serde(default)]
    pub enums: Vec<Enum>,
    /// True for synthetic map-entry messages.
    #[serde(default)]
    pub is_map: bool,
    /// True if this message is the response of a pageable method.
    /// Normally computed by [`pagination::mark_pagination`].
    #[serde(default)]
    pub is_pageable_response: bool,
}

/// The wire type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Typez {
    /// 64-bit float.
    Double,
    /// 32-bit float.
    Float,
    /// Signed 64-bit integer, varint encoded.
    Int64,
    /// Unsigned 64-bit integer, varint encoded.
    Uint64,
    /// Signed 32-bit integer, varint encoded.
    Int32,
    /// Unsigned 64-bit integer, fixed width.
    Fixed64,
    /// Unsigned 32-bit integer, fixed width.
    Fixed32,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    String,
    /// A message type; `type_id` names it.
    Message,
    /// Raw bytes.
    Bytes,
    /// Unsigned 32-bit integer, varint encoded.
    Uint32,
    /// An enum type; `type_id` names it.
    Enum,
    /// Signed 32-bit integer, fixed width.
    Sfixed32,
    /// Signed 64-bit integer, fixed width.
    Sfixed64,
    /// Signed 32-bit integer, zigzag encoded.
    Sint32,
    /// Signed 64-bit integer, zigzag encoded.
    Sint64,
}

impl Default for Typez {
    fn default() -> Self {
        Typez::String
    }
}

/// A field of a message or oneof.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, e.g. `page_size`.
    pub name: String,
    /// Raw documentation text.
    #[serde(default)]
    pub documentation: String,
    /// The wire type.
    #[serde(default)]
    pub typez: Typez,
    /// Identifier of the message or enum type, when `typez` requires one.
    #[serde(default)]
    pub type_id: String,
    /// The JSON name of the field, e.g. `pageSize`.
    #[serde(default)]
    pub json_name: String,
    /// True for proto3 optional fields.
    #[serde(default)]
    pub optional: bool,
    /// True for repeated fields.
    #[serde(default)]
    pub repeated: bool,
    /// True if this field belongs to a oneof. Such fields are excluded from
    /// a message's "basic fields".
    #[serde(default)]
    pub is_oneof: bool,
}

/// A group of mutually exclusive fields.
///
/// The member fields are referenced by name; the referenced fields also
/// appear in the parent message's `fields` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OneOf {
    /// The oneof name, e.g. `expiration`.
    pub name: String,
    /// Raw documentation text.
    #[serde(default)]
    pub documentation: String,
    /// Names of the member fields, in declaration order.
    #[serde(default)]
    pub fields: Vec<String>,
}

/// An enum type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enum {
    /// Enum name, e.g. `State`.
    pub name: String,
    /// Unique identifier.
    pub id: String,
    /// Raw documentation text.
    #[serde(default)]
    pub documentation: String,
    /// The values, in declaration order.
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

/// A single enum value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    /// Value name, e.g. `STATE_UNSPECIFIED`.
    pub name: String,
    /// Raw documentation text.
    #[serde(default)]
    pub documentation: String,
    /// The numeric value.
    #[serde(default)]
    pub number: i32,
}

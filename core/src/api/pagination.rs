//! # Pagination Detection
//!
//! Marks methods whose request/response pair follows the page-token
//! convention: the request carries a `page_size`/`page_token` pair and the
//! response carries a `next_page_token` plus a single repeated items field.
//! Runs once per generation run, before the state is built, so the owned
//! model and the indexed copies never disagree.

use crate::api::{Api, Field, Message, Typez};
use std::collections::{HashMap, HashSet};

/// Marks pageable methods and their response messages across the model.
///
/// Only sets flags, never clears them: a parser that already labeled a
/// method keeps its label.
pub fn mark_pagination(api: &mut Api) {
    let mut pageable = Vec::new();
    let mut pageable_responses = HashSet::new();
    {
        let mut index = HashMap::new();
        index_messages(&api.messages, &mut index);
        for (si, service) in api.services.iter().enumerate() {
            for (mi, method) in service.methods.iter().enumerate() {
                let (Some(input), Some(output)) = (
                    index.get(method.input_type_id.as_str()),
                    index.get(method.output_type_id.as_str()),
                ) else {
                    // Dangling references surface later, during resolution.
                    continue;
                };
                if is_pageable_request(input) && is_pageable_response(output) {
                    pageable.push((si, mi));
                    pageable_responses.insert(output.id.clone());
                }
            }
        }
    }
    for (si, mi) in pageable {
        api.services[si].methods[mi].is_pageable = true;
    }
    mark_responses(&mut api.messages, &pageable_responses);
}

fn index_messages<'a>(messages: &'a [Message], index: &mut HashMap<&'a str, &'a Message>) {
    for message in messages {
        index.insert(message.id.as_str(), message);
        index_messages(&message.messages, index);
    }
}

fn is_pageable_request(message: &Message) -> bool {
    has_scalar_field(message, "page_size", Typez::Int32)
        && has_scalar_field(message, "page_token", Typez::String)
}

fn is_pageable_response(message: &Message) -> bool {
    if !has_scalar_field(message, "next_page_token", Typez::String) {
        return false;
    }
    // Exactly one repeated field: the items.
    message.fields.iter().filter(|f| f.repeated).count() == 1
}

fn has_scalar_field(message: &Message, name: &str, typez: Typez) -> bool {
    message
        .fields
        .iter()
        .any(|f| f.name == name && f.typez == typez && !f.repeated)
}

fn mark_responses(messages: &mut [Message], ids: &HashSet<String>) {
    for message in messages {
        if ids.contains(&message.id) {
            message.is_pageable_response = true;
        }
        mark_responses(&mut message.messages, ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Method, PathInfo, Service};

    fn field(name: &str, typez: Typez) -> Field {
        Field {
            name: name.into(),
            typez,
            ..Default::default()
        }
    }

    fn pageable_api() -> Api {
        Api {
            name: "test".into(),
            messages: vec![
                Message {
                    name: "ListSecretsRequest".into(),
                    id: ".test.ListSecretsRequest".into(),
                    fields: vec![
                        field("parent", Typez::String),
                        field("page_size", Typez::Int32),
                        field("page_token", Typez::String),
                    ],
                    ..Default::default()
                },
                Message {
                    name: "ListSecretsResponse".into(),
                    id: ".test.ListSecretsResponse".into(),
                    fields: vec![
                        Field {
                            name: "secrets".into(),
                            typez: Typez::Message,
                            type_id: ".test.Secret".into(),
                            repeated: true,
                            ..Default::default()
                        },
                        field("next_page_token", Typez::String),
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
                name: "SecretService".into(),
                id: ".test.SecretService".into(),
                methods: vec![Method {
                    name: "ListSecrets".into(),
                    id: ".test.SecretService.ListSecrets".into(),
                    input_type_id: ".test.ListSecretsRequest".into(),
                    output_type_id: ".test.ListSecretsResponse".into(),
                    path_info: PathInfo {
                        verb: "GET".into(),
                        path_template: "/v1/{parent=projects/*}/secrets".into(),
                        body_field_path: String::new(),
                    },
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_marks_pageable_pair() {
        let mut api = pageable_api();
        mark_pagination(&mut api);
        assert!(api.services[0].methods[0].is_pageable);
        assert!(api.messages[1].is_pageable_response);
        assert!(!api.messages[0].is_pageable_response);
    }

    #[test]
    fn test_request_without_page_token_is_not_pageable() {
        let mut api = pageable_api();
        api.messages[0].fields.retain(|f| f.name != "page_token");
        mark_pagination(&mut api);
        assert!(!api.services[0].methods[0].is_pageable);
        assert!(!api.messages[1].is_pageable_response);
    }

    #[test]
    fn test_response_with_two_repeated_fields_is_not_pageable() {
        let mut api = pageable_api();
        api.messages[1].fields.push(Field {
            name: "warnings".into(),
            typez: Typez::String,
            repeated: true,
            ..Default::default()
        });
        mark_pagination(&mut api);
        assert!(!api.services[0].methods[0].is_pageable);
    }

    #[test]
    fn test_existing_labels_are_kept() {
        let mut api = pageable_api();
        api.messages[0].fields.clear();
        api.services[0].methods[0].is_pageable = true;
        mark_pagination(&mut api);
        assert!(api.services[0].methods[0].is_pageable);
    }
}

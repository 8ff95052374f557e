//! # Specification Loading
//!
//! Reads a serialized API model from disk and applies the optional
//! service-configuration overlay. The `model` format accepts the canonical
//! model as YAML or JSON; which parser runs is picked by file extension.

use crate::api::Api;
use crate::config::ParserOptions;
use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::path::Path;

/// The service-configuration overlay: presentation metadata kept outside
/// the specification source. Every entry is optional; present entries win
/// over the parsed model.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    /// Overrides the API name.
    #[serde(default)]
    pub name: Option<String>,
    /// Overrides the API title.
    #[serde(default)]
    pub title: Option<String>,
    /// Overrides the API description.
    #[serde(default)]
    pub description: Option<String>,
    /// Overrides the default host of every service.
    #[serde(default)]
    pub default_host: Option<String>,
}

/// Dispatches to the parser selected by the specification format key.
pub fn parse_specification(format: &str, options: &ParserOptions) -> AppResult<Api> {
    match format {
        "model" => load_model(options),
        other => Err(AppError::Config(format!(
            "unknown specification format '{}'",
            other
        ))),
    }
}

/// Loads a serialized canonical model, then overlays the service config.
pub fn load_model(options: &ParserOptions) -> AppResult<Api> {
    if options.source.is_empty() {
        return Err(AppError::Config(
            "missing specification source".to_string(),
        ));
    }
    let mut api: Api = read_as(&options.source)?;
    if !options.service_config.is_empty() {
        let overlay: ServiceConfig = read_as(&options.service_config)?;
        apply_overlay(&mut api, &overlay);
    }
    Ok(api)
}

fn read_as<T: for<'de> Deserialize<'de>>(path: &str) -> AppResult<T> {
    let contents = std::fs::read_to_string(path)?;
    let is_json = Path::new(path)
        .extension()
        .map(|ext| ext == "json")
        .unwrap_or(false);
    if is_json {
        serde_json::from_str(&contents)
            .map_err(|e| AppError::General(format!("cannot parse {}: {}", path, e)))
    } else {
        serde_yaml::from_str(&contents)
            .map_err(|e| AppError::General(format!("cannot parse {}: {}", path, e)))
    }
}

fn apply_overlay(api: &mut Api, overlay: &ServiceConfig) {
    if let Some(name) = &overlay.name {
        api.name = name.clone();
    }
    if let Some(title) = &overlay.title {
        api.title = title.clone();
    }
    if let Some(description) = &overlay.description {
        api.description = description.clone();
    }
    if let Some(default_host) = &overlay.default_host {
        for service in &mut api.services {
            service.default_host = default_host.clone();
        }
    }
}

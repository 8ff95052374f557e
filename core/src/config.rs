//! # Configuration
//!
//! Option structs consumed by the generation pipeline, plus parsing and
//! validation of the generic codec options. Validation happens at
//! configuration-merge time: a malformed option fails the run before any
//! model work begins.

use crate::error::{AppError, AppResult};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Prefix of the per-dependency codec options, e.g. `package:gax`.
pub const PACKAGE_OPTION_PREFIX: &str = "package:";

/// Codec option overriding the generated boilerplate year.
pub const OPTION_COPYRIGHT_YEAR: &str = "copyright-year";

/// Codec option overriding the derived package name.
pub const OPTION_PACKAGE_NAME_OVERRIDE: &str = "package-name-override";

/// Codec option marking the generated project as not for publication.
pub const OPTION_NOT_FOR_PUBLICATION: &str = "not-for-publication";

/// Options interpreted by the selected specification parser.
///
/// The `options` map is opaque key/value data (e.g. `googleapis-root`); it is
/// always present, possibly empty, so downstream code never branches on
/// absence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParserOptions {
    /// Path to the specification source.
    pub source: String,
    /// Path to the service-configuration overlay; empty when not supplied.
    pub service_config: String,
    /// Parser-specific key/value options.
    pub options: BTreeMap<String, String>,
}

/// Options consumed by the codec/projector layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodecOptions {
    /// Target language key, e.g. `rust`.
    pub language: String,
    /// Root of the project being generated into.
    pub project_root: String,
    /// Directory receiving the generated source tree.
    pub out_dir: PathBuf,
    /// Template directory override; empty selects the codec default.
    pub template_dir: String,
    /// Codec-specific key/value options, including the generic ones above.
    pub options: BTreeMap<String, String>,
}

/// One external dependency to wire into the generated project, parsed from a
/// `package:<name>` option value such as
/// `package=gcp-sdk-gax,path=src/gax,feature=sdk_client`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageDependency {
    /// The local name of the dependency (the part after `package:`).
    pub name: String,
    /// The registry package name, when it differs from `name`.
    pub package: Option<String>,
    /// Filesystem path of the dependency.
    pub path: Option<String>,
    /// Specification packages whose types this dependency provides, e.g.
    /// `google.protobuf`.
    pub sources: Vec<String>,
    /// Features to enable on the dependency.
    pub features: Vec<String>,
}

/// Parses one `package:<name>` option value.
///
/// The value is a comma-separated `key=value` list with keys `package`,
/// `path`, `source` and `feature` (the last two may repeat). Anything else
/// is a configuration error naming the offending key.
pub fn parse_package_option(name: &str, value: &str) -> AppResult<PackageDependency> {
    if name.is_empty() {
        return Err(AppError::Config(
            "package option is missing a dependency name".to_string(),
        ));
    }
    let mut dependency = PackageDependency {
        name: name.to_string(),
        ..Default::default()
    };
    for entry in value.split(',') {
        let Some((key, val)) = entry.split_once('=') else {
            return Err(AppError::Config(format!(
                "malformed entry '{}' in package:{}: expected key=value",
                entry, name
            )));
        };
        if val.is_empty() {
            return Err(AppError::Config(format!(
                "empty value for '{}' in package:{}",
                key, name
            )));
        }
        match key {
            "package" => dependency.package = Some(val.to_string()),
            "path" => dependency.path = Some(val.to_string()),
            "source" => dependency.sources.push(val.to_string()),
            "feature" => dependency.features.push(val.to_string()),
            other => {
                return Err(AppError::Config(format!(
                    "unknown key '{}' in package:{}",
                    other, name
                )))
            }
        }
    }
    Ok(dependency)
}

/// Extracts every `package:` dependency from a codec option map, in key
/// order.
pub fn package_dependencies(
    options: &BTreeMap<String, String>,
) -> AppResult<Vec<PackageDependency>> {
    options
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(PACKAGE_OPTION_PREFIX)
                .map(|name| parse_package_option(name, value))
        })
        .collect()
}

/// Validates the generic codec options without building anything.
///
/// Called by the pipeline before any model work so option errors surface
/// first.
pub fn validate_codec_options(options: &BTreeMap<String, String>) -> AppResult<()> {
    package_dependencies(options)?;
    if let Some(flag) = options.get(OPTION_NOT_FOR_PUBLICATION) {
        if flag != "true" && flag != "false" {
            return Err(AppError::Config(format!(
                "invalid value '{}' for {}: expected true or false",
                flag, OPTION_NOT_FOR_PUBLICATION
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_package_option() {
        let dep =
            parse_package_option("gax", "package=gcp-sdk-gax,path=src/gax,feature=sdk_client")
                .unwrap();
        assert_eq!(
            dep,
            PackageDependency {
                name: "gax".into(),
                package: Some("gcp-sdk-gax".into()),
                path: Some("src/gax".into()),
                sources: vec![],
                features: vec!["sdk_client".into()],
            }
        );
    }

    #[test]
    fn test_parse_repeated_sources() {
        let dep = parse_package_option(
            "wkt",
            "package=gcp-sdk-wkt,path=src/wkt,source=google.protobuf,source=google.type",
        )
        .unwrap();
        assert_eq!(dep.sources, vec!["google.protobuf", "google.type"]);
    }

    #[test]
    fn test_malformed_entry_is_config_error() {
        let err = parse_package_option("gax", "package").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(format!("{}", err).contains("package:gax"));
    }

    #[test]
    fn test_unknown_key_is_config_error() {
        let err = parse_package_option("gax", "version=1.0").unwrap_err();
        assert!(format!("{}", err).contains("unknown key 'version'"));
    }

    #[test]
    fn test_validate_catches_bad_dsl_before_model_work() {
        let mut options = BTreeMap::new();
        options.insert("package:gax".to_string(), "nonsense".to_string());
        assert!(validate_codec_options(&options).is_err());

        options.clear();
        options.insert(
            "package:gax".to_string(),
            "package=gcp-sdk-gax,path=src/gax".to_string(),
        );
        options.insert(OPTION_COPYRIGHT_YEAR.to_string(), "2024".to_string());
        assert!(validate_codec_options(&options).is_ok());
    }

    #[test]
    fn test_validate_not_for_publication_flag() {
        let mut options = BTreeMap::new();
        options.insert(OPTION_NOT_FOR_PUBLICATION.to_string(), "yes".to_string());
        assert!(validate_codec_options(&options).is_err());
        options.insert(OPTION_NOT_FOR_PUBLICATION.to_string(), "true".to_string());
        assert!(validate_codec_options(&options).is_ok());
    }
}

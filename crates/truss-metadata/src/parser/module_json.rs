//! Module metadata JSON descriptor parser.
//!
//! The JSON format is self-contained: the component identity and every
//! variant's dependencies and files live in one document, so no ancestor
//! resolution is involved. Variant dependencies are flattened into one list,
//! first declaration wins.

use std::collections::HashMap;

use serde::Deserialize;

use truss_core::error::TrussError;
use truss_core::types::{
    DeclaredArtifact, DeclaredDependency, DependencyScope, ModuleCoordinate, ModuleMetadataBuilder,
};

use crate::MetadataResult;

#[derive(Debug, Deserialize)]
struct ModuleDescriptor {
    #[serde(rename = "formatVersion")]
    format_version: String,
    component: ComponentSection,
    #[serde(default)]
    variants: Vec<VariantSection>,
}

#[derive(Debug, Deserialize)]
struct ComponentSection {
    group: String,
    module: String,
    version: String,
    #[serde(default)]
    attributes: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct VariantSection {
    name: String,
    #[serde(default)]
    dependencies: Vec<DependencySection>,
    #[serde(default)]
    files: Vec<FileSection>,
}

#[derive(Debug, Deserialize)]
struct DependencySection {
    group: String,
    module: String,
    #[serde(default)]
    version: VersionSection,
}

#[derive(Debug, Default, Deserialize)]
struct VersionSection {
    #[serde(default)]
    requires: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileSection {
    name: String,
}

pub(super) fn parse(
    bytes: &[u8],
    coordinate: &ModuleCoordinate,
    repository: &str,
) -> MetadataResult<ModuleMetadataBuilder> {
    let descriptor: ModuleDescriptor =
        serde_json::from_slice(bytes).map_err(|e| TrussError::MetadataParse {
            coordinate: coordinate.clone(),
            repository: repository.to_string(),
            message: "malformed module metadata JSON".to_string(),
            source: Some(Box::new(e)),
        })?;

    if !descriptor.format_version.starts_with("1.") {
        return Err(TrussError::metadata_parse(
            coordinate,
            repository,
            format!(
                "unsupported module metadata format version '{}'",
                descriptor.format_version
            ),
        ));
    }

    let component = descriptor.component;
    let mut builder = ModuleMetadataBuilder::new();
    builder.set_group(component.group);
    builder.set_name(component.module.clone());
    builder.set_version(component.version.clone());
    builder.set_status("release");
    for (key, value) in &component.attributes {
        if key == "status" {
            if let Some(status) = value.as_str() {
                builder.set_status(status);
            }
        } else if let Some(value) = value.as_str() {
            builder.set_attribute(key.clone(), value);
        }
    }

    let mut seen_files: Vec<String> = Vec::new();
    for variant in &descriptor.variants {
        let scope = DependencyScope::from_label(&variant.name);
        for dependency in &variant.dependencies {
            let version = dependency.version.requires.clone().ok_or_else(|| {
                TrussError::metadata_parse(
                    coordinate,
                    repository,
                    format!(
                        "dependency on {}:{} declares no required version",
                        dependency.group, dependency.module
                    ),
                )
            })?;
            if !builder.declares_dependency(&dependency.group, &dependency.module) {
                builder.add_dependency(
                    DeclaredDependency::new(
                        dependency.group.clone(),
                        dependency.module.clone(),
                        version,
                    )
                    .with_scope(scope),
                );
            }
        }
        for file in &variant.files {
            if seen_files.contains(&file.name) {
                continue;
            }
            seen_files.push(file.name.clone());
            builder.add_artifact(artifact_from_file(
                &file.name,
                &component.module,
                &component.version,
            ));
        }
    }

    Ok(builder)
}

fn artifact_from_file(file_name: &str, module: &str, version: &str) -> DeclaredArtifact {
    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext),
        None => (file_name, "jar"),
    };
    // "lib-1.0-sources" -> name "lib", classifier "sources"
    let name_and_classifier = stem
        .strip_prefix(module)
        .and_then(|rest| rest.strip_prefix('-'))
        .and_then(|rest| rest.strip_prefix(version))
        .map(|rest| rest.strip_prefix('-'));
    match name_and_classifier {
        Some(Some(classifier)) => {
            DeclaredArtifact::new(module, ext).with_classifier(classifier)
        }
        Some(None) => DeclaredArtifact::new(module, ext),
        None => DeclaredArtifact::new(stem, ext),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requested() -> ModuleCoordinate {
        ModuleCoordinate::new("com.example", "lib", "1.0")
    }

    const DESCRIPTOR: &str = r#"{
  "formatVersion": "1.1",
  "component": {
    "group": "com.example",
    "module": "lib",
    "version": "1.0",
    "attributes": { "status": "milestone", "team": "platform" }
  },
  "variants": [
    {
      "name": "apiElements",
      "dependencies": [
        { "group": "org.slf4j", "module": "slf4j-api", "version": { "requires": "1.7.36" } }
      ],
      "files": [ { "name": "lib-1.0.jar" } ]
    },
    {
      "name": "runtimeElements",
      "dependencies": [
        { "group": "org.slf4j", "module": "slf4j-api", "version": { "requires": "1.7.36" } },
        { "group": "com.example", "module": "runtime-only", "version": { "requires": "2.0" } }
      ],
      "files": [ { "name": "lib-1.0.jar" }, { "name": "lib-1.0-sources.jar" } ]
    }
  ]
}"#;

    #[test]
    fn test_parse_module_json() {
        let metadata = parse(DESCRIPTOR.as_bytes(), &requested(), "central")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(metadata.id, requested());
        assert_eq!(metadata.status, "milestone");
        assert_eq!(metadata.attributes.get("team").map(String::as_str), Some("platform"));

        // slf4j appears once even though two variants declare it
        assert_eq!(metadata.dependencies.len(), 2);
        assert_eq!(metadata.dependencies[0].name, "slf4j-api");
        assert_eq!(metadata.dependencies[0].scope, DependencyScope::Compile);
        assert_eq!(metadata.dependencies[1].name, "runtime-only");
        assert_eq!(metadata.dependencies[1].scope, DependencyScope::Runtime);

        assert_eq!(metadata.artifacts.len(), 2);
        assert_eq!(metadata.artifacts[0].name, "lib");
        assert_eq!(metadata.artifacts[0].classifier, None);
        assert_eq!(metadata.artifacts[1].classifier.as_deref(), Some("sources"));
    }

    #[test]
    fn test_unsupported_format_version() {
        let descriptor = r#"{
  "formatVersion": "2.0",
  "component": { "group": "com.example", "module": "lib", "version": "1.0" }
}"#;
        let err = parse(descriptor.as_bytes(), &requested(), "central").unwrap_err();
        match err {
            TrussError::MetadataParse { message, .. } => {
                assert!(message.contains("2.0"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = parse(b"{ not json", &requested(), "central").unwrap_err();
        assert!(matches!(err, TrussError::MetadataParse { .. }));
    }

    #[test]
    fn test_dependency_without_required_version_is_parse_error() {
        let descriptor = r#"{
  "formatVersion": "1.0",
  "component": { "group": "com.example", "module": "lib", "version": "1.0" },
  "variants": [
    {
      "name": "apiElements",
      "dependencies": [ { "group": "org.slf4j", "module": "slf4j-api" } ]
    }
  ]
}"#;
        let err = parse(descriptor.as_bytes(), &requested(), "central").unwrap_err();
        match err {
            TrussError::MetadataParse { message, .. } => {
                assert!(message.contains("slf4j-api"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

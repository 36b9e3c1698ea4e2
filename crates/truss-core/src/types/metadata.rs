//! Parsed module metadata.
//!
//! [`ModuleMetadata`] is the canonical result of a descriptor parse. Parsers
//! work against the mutable [`ModuleMetadataBuilder`] while walking the
//! descriptor and its ancestor chain; only once the chain is fully merged is
//! the frozen value produced. Consumers never see a half-merged module.

use super::ModuleCoordinate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default status for modules whose descriptor does not declare one
pub const DEFAULT_STATUS: &str = "integration";

/// A dependency declared by a module descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredDependency {
    pub group: String,
    pub name: String,
    pub version: String,
    pub scope: DependencyScope,
    pub optional: bool,
}

/// Scope a declared dependency applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    /// Needed to compile against and at runtime
    Compile,
    /// Needed at runtime only
    Runtime,
    /// Needed for the module's own tests only
    Test,
    /// Provided by the target environment
    Provided,
}

/// An artifact declared by a module descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredArtifact {
    pub name: String,
    pub ext: String,
    pub classifier: Option<String>,
}

/// Canonical, frozen metadata for one module as published by one repository.
///
/// The declared identity is validated against the requested coordinate before
/// this value is handed to callers, so `id` can be trusted to equal the
/// request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleMetadata {
    /// Identity declared by the descriptor
    pub id: ModuleCoordinate,
    /// Publication status (e.g. "integration", "milestone", "release")
    pub status: String,
    /// Dependencies declared by the descriptor, ancestor chain included
    pub dependencies: Vec<DeclaredDependency>,
    /// Artifacts the module publishes
    pub artifacts: Vec<DeclaredArtifact>,
    /// Free-form attributes and descriptor properties, declaration order kept
    pub attributes: IndexMap<String, String>,
}

/// Descriptor finished parsing but declares no usable identity
#[derive(Error, Debug, PartialEq, Eq)]
#[error("module descriptor declares no {missing}")]
pub struct MetadataBuildError {
    pub missing: &'static str,
}

/// Mutable accumulator used while parsing a descriptor and merging its
/// ancestor chain.
///
/// Ancestors are merged with child-wins semantics: values the child already
/// declares are kept, everything else is inherited.
#[derive(Debug, Clone, Default)]
pub struct ModuleMetadataBuilder {
    group: Option<String>,
    name: Option<String>,
    version: Option<String>,
    status: Option<String>,
    dependencies: Vec<DeclaredDependency>,
    artifacts: Vec<DeclaredArtifact>,
    attributes: IndexMap<String, String>,
}

impl DeclaredDependency {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
            scope: DependencyScope::Compile,
            optional: false,
        }
    }

    pub fn with_scope(mut self, scope: DependencyScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl DependencyScope {
    /// Map a descriptor scope/configuration label onto the closed scope set.
    ///
    /// Unknown labels fall back to `Compile`, matching how repositories treat
    /// unrecognized configurations.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.contains("test") {
            DependencyScope::Test
        } else if label.contains("runtime") {
            DependencyScope::Runtime
        } else if label == "provided" {
            DependencyScope::Provided
        } else {
            DependencyScope::Compile
        }
    }
}

impl DeclaredArtifact {
    pub fn new(name: impl Into<String>, ext: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ext: ext.into(),
            classifier: None,
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// File name this artifact is published under for a given version
    pub fn file_name(&self, version: &str) -> String {
        match &self.classifier {
            Some(classifier) => format!("{}-{}-{}.{}", self.name, version, classifier, self.ext),
            None => format!("{}-{}.{}", self.name, version, self.ext),
        }
    }
}

impl ModuleMetadata {
    /// Whether the descriptor declared a runtime-relevant dependency on the
    /// given module
    pub fn depends_on(&self, group: &str, name: &str) -> bool {
        self.dependencies
            .iter()
            .any(|dep| dep.group == group && dep.name == name)
    }
}

impl ModuleMetadataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_group(&mut self, group: impl Into<String>) {
        self.group = Some(group.into());
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = Some(version.into());
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn declared_group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn declared_version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn add_dependency(&mut self, dependency: DeclaredDependency) {
        self.dependencies.push(dependency);
    }

    pub fn add_artifact(&mut self, artifact: DeclaredArtifact) {
        self.artifacts.push(artifact);
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Whether the module itself already declares a dependency on the given
    /// group/name pair
    pub fn declares_dependency(&self, group: &str, name: &str) -> bool {
        self.dependencies
            .iter()
            .any(|dep| dep.group == group && dep.name == name)
    }

    /// Merge an ancestor's metadata into this builder, child-wins.
    ///
    /// Inherits group and version when the child declares none, appends
    /// ancestor dependencies the child does not override, and fills in
    /// attributes the child has not set. The module name is never inherited.
    pub fn merge_ancestor(&mut self, ancestor: &ModuleMetadata) {
        if self.group.is_none() {
            self.group = Some(ancestor.id.group.clone());
        }
        if self.version.is_none() {
            self.version = Some(ancestor.id.version.clone());
        }
        for dependency in &ancestor.dependencies {
            if !self.declares_dependency(&dependency.group, &dependency.name) {
                self.dependencies.push(dependency.clone());
            }
        }
        for (key, value) in &ancestor.attributes {
            if !self.attributes.contains_key(key) {
                self.attributes.insert(key.clone(), value.clone());
            }
        }
    }

    /// Freeze the accumulated state into an immutable [`ModuleMetadata`].
    ///
    /// Fails when the descriptor chain never produced a group, name or
    /// version.
    pub fn build(self) -> Result<ModuleMetadata, MetadataBuildError> {
        let group = self.group.ok_or(MetadataBuildError { missing: "group" })?;
        let name = self.name.ok_or(MetadataBuildError { missing: "name" })?;
        let version = self
            .version
            .ok_or(MetadataBuildError { missing: "version" })?;
        Ok(ModuleMetadata {
            id: ModuleCoordinate::new(group, name, version),
            status: self.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            dependencies: self.dependencies,
            artifacts: self.artifacts,
            attributes: self.attributes,
        })
    }
}

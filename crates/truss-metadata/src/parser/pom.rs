//! POM descriptor parser.
//!
//! Reads a Maven POM into a metadata builder. Identity fields missing from
//! the POM are inherited from the parent chain, which is resolved through the
//! shared resolution context so the whole chain goes through the same
//! repositories and caches. `${property}` references are interpolated from
//! the POM's own properties, inherited properties, and the synthetic
//! `project.*` values.

use indexmap::IndexMap;

use truss_core::error::TrussError;
use truss_core::types::{
    DeclaredArtifact, DeclaredDependency, DependencyScope, ModuleCoordinate, ModuleMetadata,
    ModuleMetadataBuilder,
};
use truss_registry::OutcomeSink;

use super::xml::{parse_document, XmlElement};
use crate::context::ResolutionContext;
use crate::MetadataResult;

pub(super) async fn parse(
    bytes: &[u8],
    coordinate: &ModuleCoordinate,
    repository: &str,
    ctx: &ResolutionContext,
    outcomes: &OutcomeSink,
) -> MetadataResult<ModuleMetadataBuilder> {
    let root = parse_document(bytes).map_err(|e| TrussError::MetadataParse {
        coordinate: coordinate.clone(),
        repository: repository.to_string(),
        message: "malformed POM".to_string(),
        source: Some(Box::new(e)),
    })?;
    if root.name != "project" {
        return Err(TrussError::metadata_parse(
            coordinate,
            repository,
            format!("expected <project> root element, found <{}>", root.name),
        ));
    }

    // resolve the parent chain first so inherited values are available
    let ancestor = match root.child("parent") {
        Some(parent) => {
            Some(resolve_parent(parent, coordinate, repository, ctx, outcomes).await?)
        }
        None => None,
    };

    let mut own_properties = IndexMap::new();
    if let Some(properties) = root.child("properties") {
        for property in &properties.children {
            own_properties.insert(property.name.clone(), property.text.clone());
        }
    }

    // interpolation sees inherited properties, own properties, then project.*
    let mut scope = match &ancestor {
        Some(ancestor) => ancestor.attributes.clone(),
        None => IndexMap::new(),
    };
    scope.extend(own_properties.clone());

    let group = match root.child_text("groupId") {
        Some(group) => interpolate(group, &scope, coordinate, repository)?,
        None => match &ancestor {
            Some(ancestor) => ancestor.id.group.clone(),
            None => {
                return Err(TrussError::metadata_parse(
                    coordinate,
                    repository,
                    "POM declares no groupId and has no parent to inherit one from",
                ))
            }
        },
    };
    let name = match root.child_text("artifactId") {
        Some(name) => interpolate(name, &scope, coordinate, repository)?,
        None => {
            return Err(TrussError::metadata_parse(
                coordinate,
                repository,
                "POM declares no artifactId",
            ))
        }
    };
    let version = match root.child_text("version") {
        Some(version) => interpolate(version, &scope, coordinate, repository)?,
        None => match &ancestor {
            Some(ancestor) => ancestor.id.version.clone(),
            None => {
                return Err(TrussError::metadata_parse(
                    coordinate,
                    repository,
                    "POM declares no version and has no parent to inherit one from",
                ))
            }
        },
    };

    scope.insert("project.groupId".to_string(), group.clone());
    scope.insert("project.artifactId".to_string(), name.clone());
    scope.insert("project.version".to_string(), version.clone());

    let mut builder = ModuleMetadataBuilder::new();
    builder.set_group(group);
    builder.set_name(name.clone());
    builder.set_version(version);
    builder.set_status("release");
    for (key, value) in &own_properties {
        builder.set_attribute(key.clone(), value.clone());
    }

    let packaging = root.child_text("packaging").unwrap_or("jar");
    if packaging != "pom" {
        builder.add_artifact(DeclaredArtifact::new(name, packaging));
    }

    if let Some(dependencies) = root.child("dependencies") {
        for dependency in dependencies.children_named("dependency") {
            builder.add_dependency(parse_dependency(
                dependency,
                &scope,
                ancestor.as_ref(),
                coordinate,
                repository,
            )?);
        }
    }

    if let Some(ancestor) = &ancestor {
        builder.merge_ancestor(ancestor);
    }

    Ok(builder)
}

async fn resolve_parent(
    parent: &XmlElement,
    coordinate: &ModuleCoordinate,
    repository: &str,
    ctx: &ResolutionContext,
    outcomes: &OutcomeSink,
) -> MetadataResult<ModuleMetadata> {
    let missing = |field: &str| {
        TrussError::metadata_parse(
            coordinate,
            repository,
            format!("<parent> declaration is missing {field}"),
        )
    };
    let parent_coordinate = ModuleCoordinate::new(
        parent.child_text("groupId").ok_or_else(|| missing("groupId"))?,
        parent
            .child_text("artifactId")
            .ok_or_else(|| missing("artifactId"))?,
        parent.child_text("version").ok_or_else(|| missing("version"))?,
    );
    ctx.resolve_ancestor(&parent_coordinate, repository, outcomes)
        .await
}

fn parse_dependency(
    dependency: &XmlElement,
    scope: &IndexMap<String, String>,
    ancestor: Option<&ModuleMetadata>,
    coordinate: &ModuleCoordinate,
    repository: &str,
) -> MetadataResult<DeclaredDependency> {
    let missing = |field: &str| {
        TrussError::metadata_parse(
            coordinate,
            repository,
            format!("<dependency> declaration is missing {field}"),
        )
    };
    let group = interpolate(
        dependency.child_text("groupId").ok_or_else(|| missing("groupId"))?,
        scope,
        coordinate,
        repository,
    )?;
    let name = interpolate(
        dependency
            .child_text("artifactId")
            .ok_or_else(|| missing("artifactId"))?,
        scope,
        coordinate,
        repository,
    )?;

    // a version may be omitted when the parent chain already declares one
    let version = match dependency.child_text("version") {
        Some(version) => interpolate(version, scope, coordinate, repository)?,
        None => ancestor
            .and_then(|metadata| {
                metadata
                    .dependencies
                    .iter()
                    .find(|dep| dep.group == group && dep.name == name)
                    .map(|dep| dep.version.clone())
            })
            .ok_or_else(|| {
                TrussError::metadata_parse(
                    coordinate,
                    repository,
                    format!("dependency on {group}:{name} declares no version and none is inherited"),
                )
            })?,
    };

    let declared_scope = dependency
        .child_text("scope")
        .map(DependencyScope::from_label)
        .unwrap_or(DependencyScope::Compile);
    let optional = dependency.child_text("optional") == Some("true");

    let mut declared = DeclaredDependency::new(group, name, version).with_scope(declared_scope);
    if optional {
        declared = declared.optional();
    }
    Ok(declared)
}

fn interpolate(
    input: &str,
    scope: &IndexMap<String, String>,
    coordinate: &ModuleCoordinate,
    repository: &str,
) -> MetadataResult<String> {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err(TrussError::metadata_parse(
                coordinate,
                repository,
                format!("unterminated property reference in '{input}'"),
            ));
        };
        let key = &after[..end];
        match scope.get(key) {
            Some(value) => output.push_str(value),
            None => {
                return Err(TrussError::metadata_parse(
                    coordinate,
                    repository,
                    format!("unresolved property '${{{key}}}' in '{input}'"),
                ))
            }
        }
        rest = &after[end + 1..];
    }
    output.push_str(rest);
    Ok(output)
}

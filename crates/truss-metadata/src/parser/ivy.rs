//! Ivy XML descriptor parser.
//!
//! Reads the `<info>` identity, publications and dependencies of an Ivy
//! descriptor. An `<extends>` declaration pulls in the ancestor descriptor
//! through the shared resolution context, merged child-wins like a POM
//! parent chain.

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
        message: "malformed Ivy descriptor".to_string(),
        source: Some(Box::new(e)),
    })?;
    if root.name != "ivy-module" {
        return Err(TrussError::metadata_parse(
            coordinate,
            repository,
            format!("expected <ivy-module> root element, found <{}>", root.name),
        ));
    }

    let info = root.child("info").ok_or_else(|| {
        TrussError::metadata_parse(coordinate, repository, "descriptor has no <info> element")
    })?;
    let missing = |field: &str| {
        TrussError::metadata_parse(
            coordinate,
            repository,
            format!("<info> element is missing the {field} attribute"),
        )
    };
    let organisation = info.attr("organisation").ok_or_else(|| missing("organisation"))?;
    let module = info.attr("module").ok_or_else(|| missing("module"))?;
    let revision = info.attr("revision").ok_or_else(|| missing("revision"))?;

    let mut builder = ModuleMetadataBuilder::new();
    builder.set_group(organisation);
    builder.set_name(module);
    builder.set_version(revision);
    if let Some(status) = info.attr("status") {
        builder.set_status(status);
    }
    for (key, value) in &info.attributes {
        if !matches!(key.as_str(), "organisation" | "module" | "revision" | "status") {
            builder.set_attribute(key.clone(), value.clone());
        }
    }

    let ancestor = match info.child("extends") {
        Some(extends) => {
            Some(resolve_extends(extends, coordinate, repository, ctx, outcomes).await?)
        }
        None => None,
    };

    match root.child("publications") {
        Some(publications) => {
            for artifact in publications.children_named("artifact") {
                let name = artifact.attr("name").unwrap_or(module);
                let ext = artifact
                    .attr("ext")
                    .or_else(|| artifact.attr("type"))
                    .unwrap_or("jar");
                let mut declared = DeclaredArtifact::new(name, ext);
                if let Some(classifier) = artifact.attr("classifier") {
                    declared = declared.with_classifier(classifier);
                }
                builder.add_artifact(declared);
            }
        }
        None => {
            // an Ivy module without publications still publishes its default jar
            builder.add_artifact(DeclaredArtifact::new(module, "jar"));
        }
    }

    if let Some(dependencies) = root.child("dependencies") {
        for dependency in dependencies.children_named("dependency") {
            builder.add_dependency(parse_dependency(dependency, coordinate, repository)?);
        }
    }

    if let Some(ancestor) = &ancestor {
        builder.merge_ancestor(ancestor);
    }

    Ok(builder)
}

async fn resolve_extends(
    extends: &XmlElement,
    coordinate: &ModuleCoordinate,
    repository: &str,
    ctx: &ResolutionContext,
    outcomes: &OutcomeSink,
) -> MetadataResult<ModuleMetadata> {
    let missing = |field: &str| {
        TrussError::metadata_parse(
            coordinate,
            repository,
            format!("<extends> declaration is missing the {field} attribute"),
        )
    };
    let parent_coordinate = ModuleCoordinate::new(
        extends.attr("organisation").ok_or_else(|| missing("organisation"))?,
        extends.attr("module").ok_or_else(|| missing("module"))?,
        extends.attr("revision").ok_or_else(|| missing("revision"))?,
    );
    ctx.resolve_ancestor(&parent_coordinate, repository, outcomes)
        .await
}

fn parse_dependency(
    dependency: &XmlElement,
    coordinate: &ModuleCoordinate,
    repository: &str,
) -> MetadataResult<DeclaredDependency> {
    let missing = |field: &str| {
        TrussError::metadata_parse(
            coordinate,
            repository,
            format!("<dependency> declaration is missing the {field} attribute"),
        )
    };
    let scope = dependency
        .attr("conf")
        .map(DependencyScope::from_label)
        .unwrap_or(DependencyScope::Compile);
    Ok(DeclaredDependency::new(
        dependency.attr("org").ok_or_else(|| missing("org"))?,
        dependency.attr("name").ok_or_else(|| missing("name"))?,
        dependency.attr("rev").ok_or_else(|| missing("rev"))?,
    )
    .with_scope(scope))
}

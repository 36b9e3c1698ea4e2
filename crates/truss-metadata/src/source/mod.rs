//! Metadata source: one repository's resolution attempt.
//!
//! Orchestrates the four steps for a single repository, in order: derive the
//! descriptor location, obtain a local copy, parse, validate identity.
//! Absence at the fetch step returns `Ok(None)` so the caller can try the
//! next repository; a consistency mismatch is a hard failure for this
//! repository, never silently skipped, because it indicates a miscomputed
//! layout or a corrupted publication.

use tracing::debug;

use truss_core::error::TrussError;
use truss_core::types::{
    check_identity, DescriptorFormat, ModuleCoordinate, ModuleMetadata, ResolveOverrides,
};
use truss_registry::{descriptor_ref, ArtifactResolver, OutcomeSink};

use crate::context::ResolutionContext;
use crate::parser::parse_descriptor;
use crate::MetadataResult;

/// Produces validated module metadata from one repository's descriptors
#[derive(Debug, Clone, Copy)]
pub struct MetadataSource {
    format: DescriptorFormat,
}

impl MetadataSource {
    /// A source for repositories publishing the given descriptor format
    pub fn for_format(format: DescriptorFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> DescriptorFormat {
        self.format
    }

    /// Resolve the coordinate's metadata from one repository.
    ///
    /// Returns `Ok(None)` when the repository does not publish the
    /// descriptor. Parse and consistency failures are hard errors carrying
    /// the coordinate and repository name.
    pub async fn create(
        &self,
        repository_name: &str,
        ctx: &ResolutionContext,
        coordinate: &ModuleCoordinate,
        overrides: &ResolveOverrides,
        resolver: &ArtifactResolver,
        outcomes: &OutcomeSink,
    ) -> MetadataResult<Option<ModuleMetadata>> {
        let descriptor = descriptor_ref(self.format, coordinate, overrides);
        let Some(resource) = resolver.resolve_descriptor(&descriptor, outcomes).await? else {
            return Ok(None);
        };

        let effective = overrides.effective_coordinate(coordinate);
        let builder = parse_descriptor(
            self.format,
            resource.bytes(),
            &effective,
            repository_name,
            ctx,
            outcomes,
        )
        .await?;
        let metadata = builder.build().map_err(|e| {
            TrussError::metadata_parse(&effective, repository_name, e.to_string())
        })?;

        let report = check_identity(&effective, &metadata.id);
        if !report.is_empty() {
            return Err(TrussError::Consistency {
                coordinate: effective,
                repository: repository_name.to_string(),
                report,
            });
        }

        debug!(
            "Metadata file found for module '{}' in repository '{}'",
            metadata.id, repository_name
        );
        Ok(Some(metadata))
    }
}

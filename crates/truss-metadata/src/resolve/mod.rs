//! Module resolution across a repository list.
//!
//! The iteration loop callers own: try each repository in the given order,
//! stop at the first one that publishes the module. Only absence falls
//! through to the next repository; parse, consistency and transport failures
//! propagate immediately so a corrupted repository is surfaced rather than
//! masked by a later one.

use truss_core::types::{ModuleCoordinate, ModuleMetadata, ResolveOverrides};
use truss_registry::OutcomeSink;

use crate::context::ResolutionContext;
use crate::source::MetadataSource;
use crate::MetadataResult;

/// A successfully resolved module and the repository that published it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    pub repository: String,
    pub metadata: ModuleMetadata,
}

/// Resolve a coordinate against the context's repositories in order.
///
/// `Ok(None)` means no configured repository publishes the module; the
/// outcome sink then holds one attempt per consulted repository for
/// diagnostics.
pub async fn resolve_module(
    ctx: &ResolutionContext,
    coordinate: &ModuleCoordinate,
    overrides: &ResolveOverrides,
    outcomes: &OutcomeSink,
) -> MetadataResult<Option<ResolvedModule>> {
    for repository in ctx.repositories() {
        let source = MetadataSource::for_format(repository.format);
        let resolved = source
            .create(
                &repository.name,
                ctx,
                coordinate,
                overrides,
                &repository.resolver,
                outcomes,
            )
            .await?;
        if let Some(metadata) = resolved {
            return Ok(Some(ResolvedModule {
                repository: repository.name.clone(),
                metadata,
            }));
        }
    }
    Ok(None)
}

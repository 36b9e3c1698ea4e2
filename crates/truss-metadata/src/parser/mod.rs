//! Descriptor parsers.
//!
//! One parser per descriptor format, all behind a single entry point that
//! dispatches over the closed [`DescriptorFormat`] set. Parsers produce a
//! [`ModuleMetadataBuilder`] so the orchestration layer controls when the
//! metadata freezes. A parse failure is always an error carrying the
//! offending coordinate and repository name; it is never converted to
//! absence.

mod ivy;
mod module_json;
mod pom;
mod xml;

use truss_core::types::{DescriptorFormat, ModuleCoordinate, ModuleMetadataBuilder};
use truss_registry::OutcomeSink;

use crate::context::ResolutionContext;
use crate::MetadataResult;

/// Parse raw descriptor bytes in the given format.
///
/// Formats with ancestor semantics (POM parents, Ivy extends) resolve their
/// chains through `ctx`, reusing the caller's repositories and caches.
pub async fn parse_descriptor(
    format: DescriptorFormat,
    bytes: &[u8],
    coordinate: &ModuleCoordinate,
    repository: &str,
    ctx: &ResolutionContext,
    outcomes: &OutcomeSink,
) -> MetadataResult<ModuleMetadataBuilder> {
    match format {
        DescriptorFormat::Pom => pom::parse(bytes, coordinate, repository, ctx, outcomes).await,
        DescriptorFormat::Ivy => ivy::parse(bytes, coordinate, repository, ctx, outcomes).await,
        DescriptorFormat::ModuleJson => module_json::parse(bytes, coordinate, repository),
    }
}

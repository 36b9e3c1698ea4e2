//! Core data types for module resolution.
//!
//! Everything here is a plain value: coordinates identifying a resolution
//! request, descriptor locations derived from repository layouts, parsed
//! module metadata, and the identity consistency report.

mod artifact;
mod consistency;
mod coordinate;
mod metadata;

pub use artifact::{DescriptorFormat, DescriptorRef, UnknownFormatError};
pub use consistency::{check_identity, ConsistencyReport, Mismatch};
pub use coordinate::{CoordinateError, ModuleCoordinate, ResolveOverrides};
pub use metadata::{
    DeclaredArtifact, DeclaredDependency, DependencyScope, MetadataBuildError, ModuleMetadata,
    ModuleMetadataBuilder,
};

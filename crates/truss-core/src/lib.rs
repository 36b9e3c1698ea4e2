//! # truss-core
//!
//! Core types and utilities shared across all Truss crates.
//!
//! This crate provides:
//! - ModuleCoordinate and ResolveOverrides types identifying a resolution request
//! - ModuleMetadata and its builder for parsed module descriptors
//! - Identity consistency checking between requests and parsed descriptors
//! - TrussError enum for unified error handling
//! - The append-only local-state registry used for incremental-build bookkeeping
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (ModuleCoordinate, ModuleMetadata, etc.)
//! - `error`: Error types and result aliases
//! - `local_state`: Build-step local-state registration

pub mod error;
pub mod local_state;
pub mod types;

// Re-export commonly used types
pub use error::{TrussError, TrussResult};
pub use local_state::LocalStateRegistry;
pub use types::{
    check_identity, ConsistencyReport, DeclaredArtifact, DeclaredDependency, DependencyScope,
    DescriptorFormat, DescriptorRef, Mismatch, ModuleCoordinate, ModuleMetadata,
    ModuleMetadataBuilder, ResolveOverrides,
};

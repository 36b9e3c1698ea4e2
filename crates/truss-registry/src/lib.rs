//! Repository resource resolution for the Truss dependency manager
//!
//! This crate locates descriptor artifacts for module coordinates: it derives
//! repository-specific descriptor paths, fetches them over HTTP or from local
//! directories, and serves byte-identical local copies through a layered
//! cache (in-memory, then disk, then remote) that coalesces duplicate
//! concurrent fetches. It has no knowledge of descriptor formats beyond the
//! paths they live at.

pub mod cache;
pub mod layout;
pub mod outcome;
pub mod remote;
pub mod resolver;

// Re-export main types
pub use cache::{ArtifactCache, LocalResource};
pub use layout::descriptor_ref;
pub use outcome::{Attempt, AttemptOutcome, OutcomeSink};
pub use remote::{AuthConfig, DirRepository, HttpRepository, RemoteFetch, RemoteRepository};
pub use resolver::ArtifactResolver;

use truss_core::error::TrussError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, TrussError>;

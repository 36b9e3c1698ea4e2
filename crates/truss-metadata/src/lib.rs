//! Module descriptor parsing and metadata resolution for Truss
//!
//! This crate is the orchestration core of the metadata pipeline: given a
//! module coordinate and a repository, it derives the descriptor location,
//! obtains a local copy through the resource resolver, parses the descriptor
//! in its repository-configured format (POM, Ivy XML or module JSON), and
//! validates that the declared identity matches the request before handing
//! the frozen metadata to the caller. Recursive ancestor lookups run through
//! a shared per-resolution context so repository configuration and caching
//! stay consistent across a whole descriptor chain.

pub mod context;
pub mod parser;
pub mod resolve;
pub mod source;

// Re-export main types
pub use context::{Repository, ResolutionContext};
pub use parser::parse_descriptor;
pub use resolve::{resolve_module, ResolvedModule};
pub use source::MetadataSource;

use truss_core::error::TrussError;

/// Result type for metadata operations
pub type MetadataResult<T> = Result<T, TrussError>;

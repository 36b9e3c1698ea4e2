//! Configuration parsing for the Truss dependency manager
//!
//! This crate handles parsing and validation of truss.toml, which names the
//! repositories a build resolves module metadata against and where the local
//! artifact cache lives. Repository order in the file is the priority order
//! callers iterate in.

pub mod file;

// Re-export main types
pub use file::{AuthSection, RepositoryConfig, TrussConfig};

use truss_core::error::TrussError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, TrussError>;

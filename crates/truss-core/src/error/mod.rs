//! Error types and result aliases for Truss operations.
//!
//! Provides a unified error type covering the resolution pipeline and its
//! ambient concerns. Absence of a descriptor in a repository is never an
//! error: the pipeline models it as `Ok(None)` so callers can fall through to
//! the next repository.

use crate::types::{ConsistencyReport, ModuleCoordinate};
use thiserror::Error;

/// Unified error type for all Truss operations
#[derive(Error, Debug)]
pub enum TrussError {
    // Resource resolution errors
    #[error("Failed to access resource: {message}")]
    ResourceAccess {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Descriptor parse errors
    #[error("Failed to parse module descriptor for '{coordinate}' in repository '{repository}': {message}")]
    MetadataParse {
        coordinate: ModuleCoordinate,
        repository: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Identity consistency errors
    #[error("Failed to resolve '{coordinate}' from repository '{repository}': {report}")]
    Consistency {
        coordinate: ModuleCoordinate,
        repository: String,
        report: ConsistencyReport,
    },

    // Config errors
    #[error("Failed to parse truss.toml: {message}")]
    TomlParse { message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Truss operations
pub type TrussResult<T> = Result<T, TrussError>;

impl TrussError {
    /// Create a resource access error from any error type
    pub fn resource_access<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ResourceAccess {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a parse error for a descriptor fetched from a repository
    pub fn metadata_parse(
        coordinate: &ModuleCoordinate,
        repository: &str,
        message: impl Into<String>,
    ) -> Self {
        Self::MetadataParse {
            coordinate: coordinate.clone(),
            repository: repository.to_string(),
            message: message.into(),
            source: None,
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Check if retrying this operation could succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TrussError::ResourceAccess { .. } | TrussError::Io { .. })
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            TrussError::ResourceAccess { .. } => {
                Some("Check your network connection and the repository URL, then try again")
            }
            TrussError::Consistency { .. } => Some(
                "The repository publishes a descriptor under a different identity; \
                 check the repository layout or report the corrupted publication",
            ),
            TrussError::ConfigValidation { .. } => {
                Some("Fix the named field in truss.toml and re-run")
            }
            _ => None,
        }
    }
}

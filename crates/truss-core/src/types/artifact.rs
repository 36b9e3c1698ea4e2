//! Descriptor artifact references.
//!
//! A descriptor reference is the repository-specific location of the metadata
//! file for one coordinate. It is derived deterministically from the
//! coordinate and the repository layout, and never persisted on its own.

use super::ModuleCoordinate;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The closed set of descriptor formats a repository can publish.
///
/// The format is selected by repository configuration; parsers and layouts
/// dispatch over this enum rather than inspecting content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorFormat {
    /// Maven POM XML
    Pom,
    /// Ivy XML
    Ivy,
    /// Module metadata JSON
    #[serde(rename = "module")]
    ModuleJson,
}

/// Unknown format label in configuration
#[derive(Error, Debug)]
#[error("Unknown descriptor format '{input}': expected one of 'pom', 'ivy', 'module'")]
pub struct UnknownFormatError {
    pub input: String,
}

impl DescriptorFormat {
    /// The label used in configuration files
    pub fn label(&self) -> &'static str {
        match self {
            DescriptorFormat::Pom => "pom",
            DescriptorFormat::Ivy => "ivy",
            DescriptorFormat::ModuleJson => "module",
        }
    }
}

impl fmt::Display for DescriptorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DescriptorFormat {
    type Err = UnknownFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pom" => Ok(DescriptorFormat::Pom),
            "ivy" => Ok(DescriptorFormat::Ivy),
            "module" => Ok(DescriptorFormat::ModuleJson),
            other => Err(UnknownFormatError {
                input: other.to_string(),
            }),
        }
    }
}

/// Location of a coordinate's descriptor file within one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorRef {
    /// The coordinate this descriptor describes
    pub coordinate: ModuleCoordinate,
    /// Path relative to the repository root
    pub relative_path: Utf8PathBuf,
    /// Format the bytes at this path are expected to be in
    pub format: DescriptorFormat,
}

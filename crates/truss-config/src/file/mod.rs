//! truss.toml parsing and validation

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use truss_core::error::TrussError;
use truss_core::types::DescriptorFormat;
use url::Url;

use crate::ConfigResult;

/// Complete truss.toml configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrussConfig {
    /// Root directory of the local artifact cache
    #[serde(default = "default_cache_dir")]
    pub cache_dir: Utf8PathBuf,

    /// Repositories in priority order
    #[serde(default, rename = "repository")]
    pub repositories: Vec<RepositoryConfig>,
}

/// One configured repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Unique repository name, used in diagnostics and cache keys
    pub name: String,

    /// Repository root URL (https or file scheme)
    pub url: String,

    /// Descriptor format this repository publishes
    pub format: DescriptorFormat,

    /// Optional authentication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthSection>,
}

/// Repository authentication section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSection {
    /// Bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Basic auth username
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Basic auth password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

fn default_cache_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(".truss/cache")
}

impl TrussConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(input: &str) -> ConfigResult<Self> {
        let config: TrussConfig = toml::from_str(input).map_err(|e| TrussError::TomlParse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub async fn load(path: &Utf8Path) -> ConfigResult<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TrussError::io(format!("Failed to read {path}"), e))?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> ConfigResult<()> {
        let mut seen = Vec::new();
        for repository in &self.repositories {
            if repository.name.is_empty() {
                return Err(TrussError::ConfigValidation {
                    field: "repository.name".to_string(),
                    reason: "repository names must not be empty".to_string(),
                });
            }
            if seen.contains(&&repository.name) {
                return Err(TrussError::ConfigValidation {
                    field: "repository.name".to_string(),
                    reason: format!("duplicate repository name '{}'", repository.name),
                });
            }
            seen.push(&repository.name);
            repository.parsed_url()?;
        }
        Ok(())
    }
}

impl RepositoryConfig {
    /// The repository URL, validated
    pub fn parsed_url(&self) -> ConfigResult<Url> {
        Url::parse(&self.url).map_err(|e| TrussError::ConfigValidation {
            field: format!("repository.{}.url", self.name),
            reason: format!("'{}' is not a valid URL: {}", self.url, e),
        })
    }
}

//! Module coordinate types.
//!
//! A coordinate is the (group, name, version) triple identifying a module.
//! It is the identity key for every resolution and is never mutated after
//! construction; per-attempt adjustments travel separately as
//! [`ResolveOverrides`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identity of a module: group, name and version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleCoordinate {
    pub group: String,
    pub name: String,
    pub version: String,
}

/// Coordinate parsing errors
#[derive(Error, Debug)]
pub enum CoordinateError {
    #[error("Invalid coordinate '{input}': expected 'group:name:version'")]
    InvalidFormat { input: String },

    #[error("Invalid coordinate '{input}': the {component} component is empty")]
    EmptyComponent {
        input: String,
        component: &'static str,
    },
}

impl ModuleCoordinate {
    /// Create a new coordinate
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// The same module at a different version
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self {
            group: self.group.clone(),
            name: self.name.clone(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ModuleCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

impl FromStr for ModuleCoordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let parts: Vec<&str> = input.split(':').collect();
        if parts.len() != 3 {
            return Err(CoordinateError::InvalidFormat {
                input: input.to_string(),
            });
        }
        for (part, component) in parts.iter().zip(["group", "name", "version"]) {
            if part.is_empty() {
                return Err(CoordinateError::EmptyComponent {
                    input: input.to_string(),
                    component,
                });
            }
        }
        Ok(ModuleCoordinate::new(parts[0], parts[1], parts[2]))
    }
}

/// Caller-supplied overrides attached to a single resolution attempt.
///
/// Overrides never mutate the requested [`ModuleCoordinate`]; the effective
/// coordinate for one attempt is derived on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOverrides {
    /// Replace the requested version for this attempt
    pub forced_version: Option<String>,
    /// Classifier appended to the descriptor file name
    pub classifier: Option<String>,
}

impl ResolveOverrides {
    /// Overrides that change nothing
    pub fn none() -> Self {
        Self::default()
    }

    /// Force a version for this attempt
    pub fn with_forced_version(version: impl Into<String>) -> Self {
        Self {
            forced_version: Some(version.into()),
            classifier: None,
        }
    }

    /// The coordinate this attempt actually resolves, with the forced
    /// version applied when present
    pub fn effective_coordinate(&self, requested: &ModuleCoordinate) -> ModuleCoordinate {
        match &self.forced_version {
            Some(version) => requested.with_version(version.clone()),
            None => requested.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_display() {
        let coordinate = ModuleCoordinate::new("com.example", "lib", "1.0");
        assert_eq!(coordinate.to_string(), "com.example:lib:1.0");
    }

    #[test]
    fn test_coordinate_parsing() {
        let coordinate: ModuleCoordinate = "com.example:lib:1.0".parse().unwrap();
        assert_eq!(coordinate.group, "com.example");
        assert_eq!(coordinate.name, "lib");
        assert_eq!(coordinate.version, "1.0");
    }

    #[test]
    fn test_coordinate_parsing_rejects_wrong_arity() {
        assert!("com.example:lib".parse::<ModuleCoordinate>().is_err());
        assert!("com.example:lib:1.0:jar".parse::<ModuleCoordinate>().is_err());
    }

    #[test]
    fn test_coordinate_parsing_rejects_empty_components() {
        let err = "com.example::1.0".parse::<ModuleCoordinate>().unwrap_err();
        match err {
            CoordinateError::EmptyComponent { component, .. } => assert_eq!(component, "name"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_with_version() {
        let coordinate = ModuleCoordinate::new("com.example", "lib", "1.0");
        let bumped = coordinate.with_version("2.0");
        assert_eq!(bumped.group, "com.example");
        assert_eq!(bumped.name, "lib");
        assert_eq!(bumped.version, "2.0");
        // original untouched
        assert_eq!(coordinate.version, "1.0");
    }

    #[test]
    fn test_effective_coordinate_without_overrides() {
        let coordinate = ModuleCoordinate::new("com.example", "lib", "1.0");
        let overrides = ResolveOverrides::none();
        assert_eq!(overrides.effective_coordinate(&coordinate), coordinate);
    }

    #[test]
    fn test_effective_coordinate_with_forced_version() {
        let coordinate = ModuleCoordinate::new("com.example", "lib", "1.0");
        let overrides = ResolveOverrides::with_forced_version("1.5");
        let effective = overrides.effective_coordinate(&coordinate);
        assert_eq!(effective.version, "1.5");
        assert_eq!(coordinate.version, "1.0");
    }
}

//! Identity consistency checking.
//!
//! After a descriptor parses, its declared identity must be value-equal to
//! the coordinate that was requested; a repository publishing a descriptor
//! under the wrong identity would otherwise link the wrong artifact into the
//! dependency graph. All three fields are checked independently so a single
//! round trip surfaces every mismatch at once.

use super::ModuleCoordinate;
use std::fmt;

/// One field of the declared identity that differs from the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub field: &'static str,
    pub expected: String,
    pub found: String,
}

/// Aggregated result of an identity consistency check.
///
/// An empty report signals success. The report is transient: it either gets
/// discarded on success or carried inside the consistency error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsistencyReport {
    /// Identity the descriptor actually declared
    pub declared: ModuleCoordinate,
    /// Every field that failed the check
    pub mismatches: Vec<Mismatch>,
}

/// Compare the requested coordinate against the identity a descriptor
/// declared.
///
/// Comparison is exact string equality per field, no normalization. All three
/// fields are always checked; the report collects every failure.
pub fn check_identity(
    expected: &ModuleCoordinate,
    declared: &ModuleCoordinate,
) -> ConsistencyReport {
    let mut report = ConsistencyReport {
        declared: declared.clone(),
        mismatches: Vec::new(),
    };
    report.check("group", &expected.group, &declared.group);
    report.check("module name", &expected.name, &declared.name);
    report.check("version", &expected.version, &declared.version);
    report
}

impl ConsistencyReport {
    pub fn is_empty(&self) -> bool {
        self.mismatches.is_empty()
    }

    fn check(&mut self, field: &'static str, expected: &str, found: &str) {
        if expected != found {
            self.mismatches.push(Mismatch {
                field,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bad {}: expected='{}' found='{}'",
            self.field, self.expected, self.found
        )
    }
}

impl fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if cfg!(windows) { "\r\n" } else { "\n" };
        let errors = self
            .mismatches
            .iter()
            .map(Mismatch::to_string)
            .collect::<Vec<_>>()
            .join(separator);
        write!(
            f,
            "inconsistent module metadata found. Descriptor: {} Errors: {}",
            self.declared, errors
        )
    }
}

//! Repository layout rules.
//!
//! Each descriptor format implies a repository layout; the layout maps a
//! coordinate onto the relative path its descriptor is published at. The
//! mapping is pure and deterministic so concurrent resolutions of the same
//! coordinate always land on the same cache key.

use camino::Utf8PathBuf;
use truss_core::types::{DescriptorFormat, DescriptorRef, ModuleCoordinate, ResolveOverrides};

/// Derive the descriptor location for a coordinate under one repository's
/// layout.
///
/// Overrides apply before derivation: a forced version changes the directory
/// and file name, a classifier is appended to the file stem.
pub fn descriptor_ref(
    format: DescriptorFormat,
    coordinate: &ModuleCoordinate,
    overrides: &ResolveOverrides,
) -> DescriptorRef {
    let effective = overrides.effective_coordinate(coordinate);
    let classifier = overrides
        .classifier
        .as_deref()
        .map(|c| format!("-{c}"))
        .unwrap_or_default();

    let relative_path = match format {
        DescriptorFormat::Pom => Utf8PathBuf::from(format!(
            "{}/{}/{}/{}-{}{}.pom",
            group_as_dirs(&effective.group),
            effective.name,
            effective.version,
            effective.name,
            effective.version,
            classifier,
        )),
        DescriptorFormat::ModuleJson => Utf8PathBuf::from(format!(
            "{}/{}/{}/{}-{}{}.module",
            group_as_dirs(&effective.group),
            effective.name,
            effective.version,
            effective.name,
            effective.version,
            classifier,
        )),
        DescriptorFormat::Ivy => Utf8PathBuf::from(format!(
            "{}/{}/{}/ivy-{}{}.xml",
            effective.group, effective.name, effective.version, effective.version, classifier,
        )),
    };

    DescriptorRef {
        coordinate: effective,
        relative_path,
        format,
    }
}

fn group_as_dirs(group: &str) -> String {
    group.replace('.', "/")
}

//! Repository resolution context.
//!
//! One context is constructed per top-level resolution attempt and threaded
//! by reference through every recursive descriptor parse triggered within it.
//! Nested lookups (parent POMs, Ivy extends) therefore reuse the same
//! repository set and the same caches instead of opening a fresh resolution
//! session, and a chain guard turns ancestor cycles into parse errors instead
//! of unbounded recursion.

use std::future::Future;
use std::pin::Pin;

use camino::Utf8Path;
use parking_lot::Mutex;
use tracing::trace;

use truss_core::error::TrussError;
use truss_core::types::{DescriptorFormat, ModuleCoordinate, ModuleMetadata, ResolveOverrides};
use truss_registry::{ArtifactResolver, OutcomeSink};

use crate::resolve::resolve_module;
use crate::MetadataResult;

/// One configured repository: its name, the descriptor format it publishes,
/// and its artifact resolver
#[derive(Debug, Clone)]
pub struct Repository {
    pub name: String,
    pub format: DescriptorFormat,
    pub resolver: ArtifactResolver,
}

impl Repository {
    pub fn new(name: impl Into<String>, format: DescriptorFormat, resolver: ArtifactResolver) -> Self {
        Self {
            name: name.into(),
            format,
            resolver,
        }
    }
}

/// Per-resolution session shared by all recursive descriptor parses.
///
/// Lives for one top-level resolution call tree and is discarded afterwards;
/// it owns no state beyond that lifetime.
#[derive(Debug)]
pub struct ResolutionContext {
    repositories: Vec<Repository>,
    ancestor_chain: Mutex<Vec<ModuleCoordinate>>,
}

impl ResolutionContext {
    pub fn new(repositories: Vec<Repository>) -> Self {
        Self {
            repositories,
            ancestor_chain: Mutex::new(Vec::new()),
        }
    }

    /// The configured repositories, in the caller's priority order
    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// Read a local file referenced by a descriptor (e.g. a signature file
    /// sitting next to a locally published module)
    pub async fn read_local_file(&self, path: &Utf8Path) -> MetadataResult<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| TrussError::io(format!("Failed to read local file {path}"), e))
    }

    /// Resolve an ancestor descriptor (parent POM, Ivy extends target)
    /// through the same repository set and caches as the current resolution.
    ///
    /// The ancestor must exist somewhere in the configured repositories; an
    /// ancestor that is absent everywhere makes the referencing descriptor
    /// unparseable, so absence surfaces as a parse error here.
    pub fn resolve_ancestor<'a>(
        &'a self,
        coordinate: &'a ModuleCoordinate,
        referencing_repository: &'a str,
        outcomes: &'a OutcomeSink,
    ) -> Pin<Box<dyn Future<Output = MetadataResult<ModuleMetadata>> + Send + 'a>> {
        Box::pin(async move {
            {
                let mut chain = self.ancestor_chain.lock();
                if chain.contains(coordinate) {
                    let mut cycle: Vec<String> = chain.iter().map(ToString::to_string).collect();
                    cycle.push(coordinate.to_string());
                    return Err(TrussError::metadata_parse(
                        coordinate,
                        referencing_repository,
                        format!("circular ancestor chain: {}", cycle.join(" -> ")),
                    ));
                }
                chain.push(coordinate.clone());
            }
            trace!("Resolving ancestor descriptor '{}'", coordinate);

            let result =
                resolve_module(self, coordinate, &ResolveOverrides::none(), outcomes).await;

            {
                let mut chain = self.ancestor_chain.lock();
                if let Some(position) = chain.iter().rposition(|c| c == coordinate) {
                    chain.remove(position);
                }
            }

            match result? {
                Some(resolved) => Ok(resolved.metadata),
                None => Err(TrussError::metadata_parse(
                    coordinate,
                    referencing_repository,
                    format!(
                        "ancestor descriptor not found in any configured repository ({})",
                        outcomes.summary()
                    ),
                )),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[tokio::test]
    async fn test_read_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("module.sig")).unwrap();
        std::fs::write(&path, b"signature").unwrap();

        let ctx = ResolutionContext::new(Vec::new());
        let bytes = ctx.read_local_file(&path).await.unwrap();
        assert_eq!(bytes, b"signature");
    }

    #[tokio::test]
    async fn test_read_missing_local_file_is_io_error() {
        let ctx = ResolutionContext::new(Vec::new());
        let result = ctx.read_local_file(Utf8Path::new("/nonexistent/module.sig")).await;
        assert!(matches!(result, Err(TrussError::Io { .. })));
    }

    #[tokio::test]
    async fn test_ancestor_missing_everywhere_is_parse_error() {
        let ctx = ResolutionContext::new(Vec::new());
        let outcomes = OutcomeSink::new();
        let coordinate = ModuleCoordinate::new("com.example", "parent", "1.0");

        let err = ctx
            .resolve_ancestor(&coordinate, "central", &outcomes)
            .await
            .unwrap_err();
        match err {
            TrussError::MetadataParse { repository, message, .. } => {
                assert_eq!(repository, "central");
                assert!(message.contains("not found in any configured repository"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

//! Locally-available resource resolution for one repository.
//!
//! The resolver binds a repository name and transport to the shared artifact
//! cache. Given a fully-specified descriptor reference it produces a handle
//! to a byte-identical local copy, or absence when the repository does not
//! publish the artifact. Every lookup is recorded in the outcome sink.

use std::sync::Arc;

use tracing::trace;
use truss_core::types::DescriptorRef;

use crate::cache::{ArtifactCache, LocalResource};
use crate::outcome::{AttemptOutcome, OutcomeSink};
use crate::remote::RemoteRepository;
use crate::RegistryResult;

/// Resolves descriptor artifacts for one repository through the shared cache
#[derive(Debug, Clone)]
pub struct ArtifactResolver {
    repository_name: String,
    remote: Arc<dyn RemoteRepository>,
    cache: Arc<ArtifactCache>,
}

impl ArtifactResolver {
    pub fn new(
        repository_name: impl Into<String>,
        remote: Arc<dyn RemoteRepository>,
        cache: Arc<ArtifactCache>,
    ) -> Self {
        Self {
            repository_name: repository_name.into(),
            remote,
            cache,
        }
    }

    pub fn repository_name(&self) -> &str {
        &self.repository_name
    }

    /// Resolve the descriptor artifact to a local copy.
    ///
    /// `Ok(None)` means this repository does not publish the descriptor; the
    /// caller is free to try the next repository. Transport failures surface
    /// as errors and are never retried here.
    pub async fn resolve_descriptor(
        &self,
        descriptor: &DescriptorRef,
        outcomes: &OutcomeSink,
    ) -> RegistryResult<Option<Arc<LocalResource>>> {
        let key = format!("{}/{}", self.repository_name, descriptor.relative_path);
        trace!(
            "Resolving descriptor '{}' in repository '{}'",
            descriptor.relative_path,
            self.repository_name
        );

        let result = self
            .cache
            .get_or_fetch(&key, &descriptor.relative_path, self.remote.as_ref())
            .await;
        let outcome = match &result {
            Ok(Some(_)) => AttemptOutcome::Found,
            Ok(None) => AttemptOutcome::Missing,
            Err(_) => AttemptOutcome::Failed,
        };
        outcomes.record(&self.repository_name, &descriptor.relative_path, outcome);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use camino::{Utf8Path, Utf8PathBuf};
    use truss_core::types::{DescriptorFormat, ModuleCoordinate, ResolveOverrides};

    use crate::layout::descriptor_ref;
    use crate::remote::DirRepository;

    fn fixture() -> (tempfile::TempDir, tempfile::TempDir, ArtifactResolver) {
        let repo_dir = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        let repo_root = Utf8PathBuf::from_path_buf(repo_dir.path().to_path_buf()).unwrap();
        let cache_root = Utf8PathBuf::from_path_buf(cache_dir.path().to_path_buf()).unwrap();

        std::fs::create_dir_all(repo_root.join("com/example/lib/1.0")).unwrap();
        std::fs::write(
            repo_root.join("com/example/lib/1.0/lib-1.0.pom"),
            b"<project/>",
        )
        .unwrap();

        let resolver = ArtifactResolver::new(
            "central",
            Arc::new(DirRepository::new(repo_root)),
            Arc::new(ArtifactCache::new(cache_root)),
        );
        (repo_dir, cache_dir, resolver)
    }

    fn pom_ref(version: &str) -> DescriptorRef {
        descriptor_ref(
            DescriptorFormat::Pom,
            &ModuleCoordinate::new("com.example", "lib", version),
            &ResolveOverrides::none(),
        )
    }

    #[tokio::test]
    async fn test_hit_records_found() {
        let (_repo, _cache, resolver) = fixture();
        let outcomes = OutcomeSink::new();

        let resource = resolver
            .resolve_descriptor(&pom_ref("1.0"), &outcomes)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resource.bytes(), b"<project/>");

        let attempts = outcomes.attempts();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].repository, "central");
        assert_eq!(attempts[0].outcome, AttemptOutcome::Found);
        assert_eq!(
            attempts[0].location,
            Utf8Path::new("com/example/lib/1.0/lib-1.0.pom")
        );
    }

    #[tokio::test]
    async fn test_miss_records_missing_and_returns_none() {
        let (_repo, _cache, resolver) = fixture();
        let outcomes = OutcomeSink::new();

        let result = resolver
            .resolve_descriptor(&pom_ref("9.9"), &outcomes)
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(outcomes.attempts()[0].outcome, AttemptOutcome::Missing);
    }
}

//! Layered artifact cache with fetch coalescing.
//!
//! Lookups go memory, then disk, then remote. Entries are keyed by the
//! repository-qualified relative path, so distinct repositories never share
//! entries even when their layouts collide. At most one fetch per distinct
//! key is in flight at any time: duplicate concurrent requests wait on the
//! in-flight fetch instead of issuing their own. Disk writes are a tempfile
//! write followed by an atomic rename, so an abandoned fetch can never leave
//! a partial file behind.

use std::io::Write;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::trace;

use truss_core::error::TrussError;

use crate::remote::RemoteRepository;
use crate::RegistryResult;

/// A byte-identical local copy of a repository resource.
///
/// Owned by the cache; resolution borrows it for the duration of parsing and
/// never mutates the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalResource {
    path: Utf8PathBuf,
    bytes: Vec<u8>,
}

impl LocalResource {
    fn new(path: Utf8PathBuf, bytes: Vec<u8>) -> Self {
        Self { path, bytes }
    }

    /// Location of the local copy on disk
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// The resource content
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

type CacheCell = Arc<OnceCell<Option<Arc<LocalResource>>>>;

/// Layered cache of repository artifacts
#[derive(Debug)]
pub struct ArtifactCache {
    root: Utf8PathBuf,
    entries: DashMap<String, CacheCell>,
}

impl ArtifactCache {
    /// Create a cache rooted at the given directory
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: DashMap::new(),
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Return the locally available copy for `key`, fetching and populating
    /// the cache on miss.
    ///
    /// `Ok(None)` means the remote repository does not publish `remote_path`;
    /// the absence is remembered for the rest of the session. A failed fetch
    /// leaves the entry unpopulated so a later attempt can retry.
    pub async fn get_or_fetch(
        &self,
        key: &str,
        remote_path: &Utf8Path,
        remote: &dyn RemoteRepository,
    ) -> RegistryResult<Option<Arc<LocalResource>>> {
        let cell: CacheCell = self.entries.entry(key.to_string()).or_default().clone();
        let resolved = cell
            .get_or_try_init(|| self.load_or_fetch(key, remote_path, remote))
            .await?;
        Ok(resolved.clone())
    }

    async fn load_or_fetch(
        &self,
        key: &str,
        remote_path: &Utf8Path,
        remote: &dyn RemoteRepository,
    ) -> RegistryResult<Option<Arc<LocalResource>>> {
        let local_path = self.root.join(key);

        match tokio::fs::read(&local_path).await {
            Ok(bytes) => {
                trace!("Cache hit on disk for '{}'", key);
                return Ok(Some(Arc::new(LocalResource::new(local_path, bytes))));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(TrussError::io(
                    format!("Failed to read cached artifact {local_path}"),
                    e,
                ))
            }
        }

        let Some(bytes) = remote.fetch(remote_path).await? else {
            trace!("Remote has no artifact for '{}'", key);
            return Ok(None);
        };
        self.commit(&local_path, &bytes)?;
        Ok(Some(Arc::new(LocalResource::new(local_path, bytes))))
    }

    /// Write fetched bytes to the cache path atomically
    fn commit(&self, local_path: &Utf8Path, bytes: &[u8]) -> RegistryResult<()> {
        let parent = local_path.parent().unwrap_or(self.root.as_path());
        std::fs::create_dir_all(parent)
            .map_err(|e| TrussError::io(format!("Failed to create cache directory {parent}"), e))?;

        let mut staged = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| TrussError::io(format!("Failed to stage cache entry in {parent}"), e))?;
        staged
            .write_all(bytes)
            .map_err(|e| TrussError::io(format!("Failed to write cache entry {local_path}"), e))?;
        staged
            .persist(local_path)
            .map_err(|e| TrussError::io(format!("Failed to commit cache entry {local_path}"), e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;

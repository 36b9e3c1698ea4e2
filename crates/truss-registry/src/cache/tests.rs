//! Unit tests for the layered artifact cache

use super::*;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Remote double that counts fetches
#[derive(Debug, Default)]
struct CountingRepository {
    files: HashMap<Utf8PathBuf, Vec<u8>>,
    fetches: AtomicUsize,
}

impl CountingRepository {
    fn with_file(path: &str, bytes: &[u8]) -> Self {
        let mut files = HashMap::new();
        files.insert(Utf8PathBuf::from(path), bytes.to_vec());
        Self {
            files,
            fetches: AtomicUsize::new(0),
        }
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl RemoteRepository for CountingRepository {
    fn fetch<'a>(&'a self, path: &'a Utf8Path) -> crate::remote::RemoteFetch<'a> {
        Box::pin(async move {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.files.get(path).cloned())
        })
    }
}

/// Remote double that always fails
#[derive(Debug)]
struct BrokenRepository;

impl RemoteRepository for BrokenRepository {
    fn fetch<'a>(&'a self, _path: &'a Utf8Path) -> crate::remote::RemoteFetch<'a> {
        Box::pin(async move {
            Err(TrussError::ResourceAccess {
                message: "connection reset".to_string(),
                source: None,
            })
        })
    }
}

fn cache_in(dir: &tempfile::TempDir) -> ArtifactCache {
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    ArtifactCache::new(root)
}

#[tokio::test]
async fn test_fetch_populates_memory_and_disk() {
    let dir = tempfile::tempdir().unwrap();
    let cache = cache_in(&dir);
    let remote = CountingRepository::with_file("lib-1.0.pom", b"<project/>");

    let resource = cache
        .get_or_fetch("central/lib-1.0.pom", Utf8Path::new("lib-1.0.pom"), &remote)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resource.bytes(), b"<project/>");
    assert!(resource.path().as_std_path().exists());

    // second lookup is served from memory
    cache
        .get_or_fetch("central/lib-1.0.pom", Utf8Path::new("lib-1.0.pom"), &remote)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(remote.fetch_count(), 1);
}

#[tokio::test]
async fn test_disk_layer_survives_fresh_memory() {
    let dir = tempfile::tempdir().unwrap();
    let remote = CountingRepository::with_file("lib-1.0.pom", b"<project/>");

    let first = cache_in(&dir);
    first
        .get_or_fetch("central/lib-1.0.pom", Utf8Path::new("lib-1.0.pom"), &remote)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(remote.fetch_count(), 1);

    // a fresh cache over the same root finds the file on disk
    let second = cache_in(&dir);
    let resource = second
        .get_or_fetch("central/lib-1.0.pom", Utf8Path::new("lib-1.0.pom"), &remote)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resource.bytes(), b"<project/>");
    assert_eq!(remote.fetch_count(), 1);
}

#[tokio::test]
async fn test_absence_is_not_an_error_and_is_remembered() {
    let dir = tempfile::tempdir().unwrap();
    let cache = cache_in(&dir);
    let remote = CountingRepository::default();

    let first = cache
        .get_or_fetch("central/missing.pom", Utf8Path::new("missing.pom"), &remote)
        .await
        .unwrap();
    assert!(first.is_none());

    let second = cache
        .get_or_fetch("central/missing.pom", Utf8Path::new("missing.pom"), &remote)
        .await
        .unwrap();
    assert!(second.is_none());
    assert_eq!(remote.fetch_count(), 1);
}

#[tokio::test]
async fn test_concurrent_requests_coalesce_to_one_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(cache_in(&dir));
    let remote = Arc::new(CountingRepository::with_file("lib-1.0.pom", b"<project/>"));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let cache = Arc::clone(&cache);
        let remote = Arc::clone(&remote);
        handles.push(tokio::spawn(async move {
            cache
                .get_or_fetch("central/lib-1.0.pom", Utf8Path::new("lib-1.0.pom"), remote.as_ref())
                .await
        }));
    }

    for handle in handles {
        let resource = handle.await.unwrap().unwrap().unwrap();
        assert_eq!(resource.bytes(), b"<project/>");
    }
    assert_eq!(remote.fetch_count(), 1);
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let dir = tempfile::tempdir().unwrap();
    let cache = cache_in(&dir);

    let err = cache
        .get_or_fetch("central/lib-1.0.pom", Utf8Path::new("lib-1.0.pom"), &BrokenRepository)
        .await
        .unwrap_err();
    assert!(err.is_recoverable());

    // the entry was not poisoned: a working remote succeeds afterwards
    let remote = CountingRepository::with_file("lib-1.0.pom", b"<project/>");
    let resource = cache
        .get_or_fetch("central/lib-1.0.pom", Utf8Path::new("lib-1.0.pom"), &remote)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resource.bytes(), b"<project/>");
}

#[tokio::test]
async fn test_distinct_repositories_do_not_share_entries() {
    let dir = tempfile::tempdir().unwrap();
    let cache = cache_in(&dir);
    let central = CountingRepository::with_file("lib-1.0.pom", b"central bytes");
    let mirror = CountingRepository::with_file("lib-1.0.pom", b"mirror bytes");

    let a = cache
        .get_or_fetch("central/lib-1.0.pom", Utf8Path::new("lib-1.0.pom"), &central)
        .await
        .unwrap()
        .unwrap();
    let b = cache
        .get_or_fetch("mirror/lib-1.0.pom", Utf8Path::new("lib-1.0.pom"), &mirror)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(a.bytes(), b"central bytes");
    assert_eq!(b.bytes(), b"mirror bytes");
}

//! Build-step local-state registration.
//!
//! A build step may register arbitrary path values at any point before it
//! executes; incremental-build bookkeeping later replays the registered paths
//! exactly once each, in registration order. No resolution or parsing
//! semantics apply here.

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;

/// Append-only registry of local-state paths for one build step
#[derive(Debug, Default)]
pub struct LocalStateRegistry {
    registered_paths: Mutex<Vec<Utf8PathBuf>>,
}

impl LocalStateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register paths, keeping registration order
    pub fn register<I, P>(&self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        let mut registered = self.registered_paths.lock();
        registered.extend(paths.into_iter().map(Into::into));
    }

    /// Visit every registered path exactly once, in registration order
    pub fn replay<F>(&self, mut visitor: F)
    where
        F: FnMut(&Utf8Path),
    {
        let registered = self.registered_paths.lock();
        for path in registered.iter() {
            visitor(path);
        }
    }

    pub fn len(&self) -> usize {
        self.registered_paths.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered_paths.lock().is_empty()
    }
}

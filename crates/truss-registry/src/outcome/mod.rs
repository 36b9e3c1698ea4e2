//! Append-only record of resolution attempts.
//!
//! Every descriptor lookup records where it looked and what it found, so
//! failures can report "tried N locations" with the actual paths. The sink is
//! observational only and never influences control flow.

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;

/// What a single lookup found at one location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The repository published the artifact
    Found,
    /// The repository does not publish the artifact
    Missing,
    /// The lookup itself failed (transport, auth, IO)
    Failed,
}

/// One recorded lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub repository: String,
    pub location: Utf8PathBuf,
    pub outcome: AttemptOutcome,
}

/// Append-only sink of resolution attempts for one resolution call tree
#[derive(Debug, Default)]
pub struct OutcomeSink {
    attempts: Mutex<Vec<Attempt>>,
}

impl OutcomeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one lookup
    pub fn record(&self, repository: &str, location: &Utf8Path, outcome: AttemptOutcome) {
        self.attempts.lock().push(Attempt {
            repository: repository.to_string(),
            location: location.to_path_buf(),
            outcome,
        });
    }

    /// All attempts recorded so far, in record order
    pub fn attempts(&self) -> Vec<Attempt> {
        self.attempts.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.attempts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.lock().is_empty()
    }

    /// One-line summary for diagnostics
    pub fn summary(&self) -> String {
        let attempts = self.attempts.lock();
        match attempts.len() {
            1 => "tried 1 location".to_string(),
            n => format!("tried {n} locations"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempts_keep_record_order() {
        let sink = OutcomeSink::new();
        sink.record("central", Utf8Path::new("a/b.pom"), AttemptOutcome::Missing);
        sink.record("legacy", Utf8Path::new("a/ivy-b.xml"), AttemptOutcome::Found);

        let attempts = sink.attempts();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].repository, "central");
        assert_eq!(attempts[0].outcome, AttemptOutcome::Missing);
        assert_eq!(attempts[1].repository, "legacy");
        assert_eq!(attempts[1].outcome, AttemptOutcome::Found);
    }

    #[test]
    fn test_summary() {
        let sink = OutcomeSink::new();
        sink.record("central", Utf8Path::new("a/b.pom"), AttemptOutcome::Missing);
        assert_eq!(sink.summary(), "tried 1 location");
        sink.record("legacy", Utf8Path::new("c/d.pom"), AttemptOutcome::Missing);
        sink.record("mirror", Utf8Path::new("e/f.pom"), AttemptOutcome::Missing);
        assert_eq!(sink.summary(), "tried 3 locations");
    }
}

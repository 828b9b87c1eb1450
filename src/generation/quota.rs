//! Persisted count of completed generations.

use std::sync::Arc;

use crate::error::Result;
use crate::session::{Storage, GENERATION_COUNT_KEY};

/// Generation counter backed by a [`Storage`] entry.
///
/// Concurrent processes sharing the same entry race last-write-wins; the
/// counter is only linearizable within one process.
#[derive(Clone)]
pub struct QuotaStore {
    storage: Arc<dyn Storage>,
}

impl QuotaStore {
    /// Create a store over `storage`.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Current count; 0 when the entry is missing, unreadable or not a
    /// non-negative integer.
    pub fn read(&self) -> u64 {
        match self.storage.get(GENERATION_COUNT_KEY) {
            Ok(Some(raw)) => parse_count(&raw),
            Ok(None) => 0,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read generation count, assuming 0");
                0
            },
        }
    }

    /// Add one completed generation and persist it. Returns the new count.
    pub fn increment(&self) -> Result<u64> {
        let next = self.read().saturating_add(1);
        self.storage.set(GENERATION_COUNT_KEY, &next.to_string())?;
        tracing::debug!(count = next, "Generation count updated");
        Ok(next)
    }
}

impl std::fmt::Debug for QuotaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuotaStore").finish()
    }
}

/// Permissive counter parse: surrounding whitespace is ignored, anything else
/// that is not a non-negative integer reads as 0.
fn parse_count(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(raw = raw, "Corrupt generation count, assuming 0");
        0
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::MemoryStorage;

    fn store_with(raw: Option<&str>) -> (QuotaStore, MemoryStorage) {
        let storage = match raw {
            Some(value) => MemoryStorage::with_entries([(GENERATION_COUNT_KEY, value)]),
            None => MemoryStorage::new(),
        };
        (QuotaStore::new(Arc::new(storage.clone())), storage)
    }

    #[test]
    fn test_missing_reads_zero() {
        let (quota, _) = store_with(None);
        assert_eq!(quota.read(), 0);
    }

    #[test]
    fn test_corrupt_reads_zero() {
        for raw in ["abc", "-1", "1.5", "", "NaN"] {
            let (quota, _) = store_with(Some(raw));
            assert_eq!(quota.read(), 0, "raw value {raw:?}");
        }
    }

    #[test]
    fn test_whitespace_is_tolerated() {
        let (quota, _) = store_with(Some(" 1\n"));
        assert_eq!(quota.read(), 1);
    }

    #[test]
    fn test_increment_persists() {
        let (quota, storage) = store_with(None);
        assert_eq!(quota.increment().unwrap(), 1);
        assert_eq!(quota.increment().unwrap(), 2);
        assert_eq!(storage.get(GENERATION_COUNT_KEY).unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_increment_recovers_from_corruption() {
        let (quota, _) = store_with(Some("garbage"));
        assert_eq!(quota.increment().unwrap(), 1);
    }
}

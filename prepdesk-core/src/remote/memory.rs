//! In-memory remote store with failure injection.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Map, Value};

use super::{RemoteError, RemoteStore, Slot};

const MEMORY_USER_ID: &str = "local-user";

#[derive(Debug, Default)]
struct Inner {
    rows: HashMap<&'static str, Map<String, Value>>,
    failing_reads: HashSet<&'static str>,
    failing_writes: HashSet<&'static str>,
    writes: Vec<(Slot, Value)>,
    reads: Vec<Slot>,
}

/// Remote store that keeps a single user's rows in memory.
///
/// Clones share state. Reads and writes can be made to fail per table, and
/// every accepted write is recorded so tests can assert on what was sent.
#[derive(Clone, Debug, Default)]
pub struct MemoryRemote {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Stores `value` in `slot` without recording a write.
    pub fn seed(&self, slot: Slot, value: Value) {
        let mut inner = self.lock();
        if let Ok(fields) = slot.to_row(MEMORY_USER_ID, &value) {
            inner.rows.entry(slot.table).or_default().extend(fields);
        }
    }

    /// Returns what `slot` currently holds.
    pub fn stored(&self, slot: Slot) -> Option<Value> {
        let inner = self.lock();
        let row = inner.rows.get(slot.table)?.clone();
        slot.extract(row)
    }

    /// Makes every read from `table` fail.
    pub fn fail_reads(&self, table: &'static str) {
        self.lock().failing_reads.insert(table);
    }

    /// Makes every write to `table` fail.
    pub fn fail_writes(&self, table: &'static str) {
        self.lock().failing_writes.insert(table);
    }

    /// Clears all injected failures.
    pub fn recover(&self) {
        let mut inner = self.lock();
        inner.failing_reads.clear();
        inner.failing_writes.clear();
    }

    /// Accepted writes, oldest first.
    pub fn writes(&self) -> Vec<(Slot, Value)> {
        self.lock().writes.clone()
    }

    /// Accepted writes to `slot`, oldest first.
    pub fn writes_to(&self, slot: Slot) -> Vec<Value> {
        self.lock()
            .writes
            .iter()
            .filter(|(s, _)| *s == slot)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Slots that were read, oldest first.
    pub fn reads(&self) -> Vec<Slot> {
        self.lock().reads.clone()
    }
}

impl RemoteStore for MemoryRemote {
    async fn get(&self, slot: &Slot) -> Result<Option<Value>, RemoteError> {
        let mut inner = self.lock();
        inner.reads.push(*slot);

        if inner.failing_reads.contains(slot.table) {
            return Err(RemoteError::Unavailable(format!("read from {}", slot)));
        }

        Ok(inner
            .rows
            .get(slot.table)
            .cloned()
            .and_then(|row| slot.extract(row)))
    }

    async fn put(&self, slot: &Slot, value: &Value) -> Result<(), RemoteError> {
        let mut inner = self.lock();

        if inner.failing_writes.contains(slot.table) {
            return Err(RemoteError::Unavailable(format!("write to {}", slot)));
        }

        let fields = slot.to_row(MEMORY_USER_ID, value)?;
        inner.rows.entry(slot.table).or_default().extend(fields);
        inner.writes.push((*slot, value.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_without_row_is_none() {
        let remote = MemoryRemote::new();
        assert_eq!(remote.get(&Slot::PRACTICE_DATA).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let remote = MemoryRemote::new();
        let value = json!({"coreMessages": [], "customQuestions": []});

        remote.put(&Slot::PRACTICE_DATA, &value).await.unwrap();

        assert_eq!(remote.get(&Slot::PRACTICE_DATA).await.unwrap(), Some(value));
        assert_eq!(remote.writes_to(Slot::PRACTICE_DATA).len(), 1);
    }

    #[tokio::test]
    async fn test_column_put_leaves_other_columns() {
        let remote = MemoryRemote::new();
        remote.seed(Slot::PROFILES_DASHBOARD, json!({"streak": 4}));

        remote
            .put(&Slot::PROFILES_PRACTICE, &json!({"coreMessages": []}))
            .await
            .unwrap();

        assert_eq!(
            remote.stored(Slot::PROFILES_DASHBOARD),
            Some(json!({"streak": 4}))
        );
        assert_eq!(
            remote.stored(Slot::PROFILES_PRACTICE),
            Some(json!({"coreMessages": []}))
        );
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let remote = MemoryRemote::new();
        remote.fail_reads("profiles");
        remote.fail_writes("practice_data");

        assert!(remote.get(&Slot::PROFILES_ADVOCACY).await.is_err());
        assert!(remote
            .put(&Slot::PRACTICE_DATA, &json!({"coreMessages": []}))
            .await
            .is_err());
        assert!(remote.writes().is_empty());

        remote.recover();
        assert!(remote.get(&Slot::PROFILES_ADVOCACY).await.is_ok());
    }

    #[test]
    fn test_seed_is_not_recorded() {
        let remote = MemoryRemote::new();
        remote.seed(Slot::MOCK_DATA, json!({"mockQuestions": []}));

        assert!(remote.writes().is_empty());
        assert_eq!(
            remote.stored(Slot::MOCK_DATA),
            Some(json!({"mockQuestions": []}))
        );
    }
}

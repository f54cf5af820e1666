//! In-memory mirror, used by tests and embedders without device storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::LocalMirror;

/// Mirror backed by a shared in-memory map.
///
/// Clones share the same map, so a test can hand one clone to a coordinator
/// and inspect the other.
#[derive(Clone, Debug, Default)]
pub struct MemoryMirror {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `key` holds a value.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalMirror for MemoryMirror {
    fn read_raw(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn write_raw(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

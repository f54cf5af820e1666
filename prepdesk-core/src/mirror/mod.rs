//! Local mirror of feature snapshots.
//!
//! The mirror is a synchronous key/value cache on the user's device. It is
//! never authoritative: reads that fail or do not parse are treated as
//! absent, and writes that fail are logged and dropped.
//!
//! # Keys
//!
//! Each feature owns a single key holding its JSON-serialized snapshot:
//! - `dashboard-state`
//! - `practice-state`
//! - `mock-state`
//! - `advocacy-documents`
//! - `advocacy-active-document` (plain document id, local only)

mod file;
mod memory;

pub use file::FileMirror;
pub use memory::MemoryMirror;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Synchronous, best-effort key/value storage.
pub trait LocalMirror {
    /// Returns the raw value stored under `key`, if any.
    fn read_raw(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn write_raw(&self, key: &str, value: &str);

    /// Removes `key` if present.
    fn remove(&self, key: &str);
}

/// Reads and parses the snapshot stored under `key`.
///
/// Malformed data yields `None`.
pub fn read_snapshot<T, M>(mirror: &M, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    M: LocalMirror + ?Sized,
{
    let raw = mirror.read_raw(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("Ignoring malformed mirror entry '{}': {}", key, e);
            None
        }
    }
}

/// Serializes `value` and stores it under `key`.
pub fn write_snapshot<T, M>(mirror: &M, key: &str, value: &T)
where
    T: Serialize,
    M: LocalMirror + ?Sized,
{
    match serde_json::to_string(value) {
        Ok(raw) => mirror.write_raw(key, &raw),
        Err(e) => tracing::warn!("Failed to serialize mirror entry '{}': {}", key, e),
    }
}

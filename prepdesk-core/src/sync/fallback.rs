//! Ordered fallback across storage targets.

use serde_json::Value;

use super::error::SyncError;
use crate::remote::{RemoteError, RemoteStore, Slot};

/// Writes and reads a feature snapshot through an ordered list of slots.
///
/// The first slot is the feature's dedicated location; later slots are
/// fallbacks (typically a column of the shared `profiles` row). Adding a tier
/// means adding a slot, not new control flow.
#[derive(Debug, Clone)]
pub struct FallbackWriter<R> {
    remote: R,
    feature: &'static str,
    targets: Vec<Slot>,
}

impl<R: RemoteStore> FallbackWriter<R> {
    pub fn new(remote: R, feature: &'static str, targets: Vec<Slot>) -> Self {
        Self {
            remote,
            feature,
            targets,
        }
    }

    /// Writes `value` to the first target that accepts it.
    ///
    /// Returns the slot that took the write. Targets after it are not touched.
    pub async fn store(&self, value: &Value) -> Result<Slot, SyncError> {
        let mut last = RemoteError::Unavailable("no storage targets".to_string());
        let mut attempts = 0;

        for (index, slot) in self.targets.iter().enumerate() {
            attempts += 1;
            match self.remote.put(slot, value).await {
                Ok(()) => {
                    if index == 0 {
                        tracing::info!("Saved {} to {}", self.feature, slot);
                    } else {
                        tracing::warn!("Saved {} to fallback slot {}", self.feature, slot);
                    }
                    return Ok(*slot);
                }
                Err(e) => {
                    tracing::warn!("Failed to save {} to {}: {}", self.feature, slot, e);
                    last = e;
                }
            }
        }

        tracing::error!(
            "Failed to save {}: all {} storage target(s) rejected the write",
            self.feature,
            attempts
        );
        Err(SyncError::Write {
            feature: self.feature,
            attempts,
            last,
        })
    }

    /// Reads the snapshot from the first target holding one.
    ///
    /// A value found only in a fallback slot is copied into the primary slot
    /// so later loads take the fast path. A failing target is skipped; the
    /// first failure is returned only if no target produced a value.
    pub async fn load(&self) -> Result<Option<Value>, SyncError> {
        let mut first_error = None;
        let mut primary_healthy = false;

        for (index, slot) in self.targets.iter().enumerate() {
            match self.remote.get(slot).await {
                Ok(Some(value)) => {
                    if index > 0 && primary_healthy {
                        self.migrate_forward(slot, &value).await;
                    }
                    return Ok(Some(value));
                }
                Ok(None) => {
                    if index == 0 {
                        primary_healthy = true;
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to read {} from {}: {}", self.feature, slot, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(source) => Err(SyncError::Load {
                feature: self.feature,
                source,
            }),
            None => Ok(None),
        }
    }

    async fn migrate_forward(&self, from: &Slot, value: &Value) {
        let Some(primary) = self.targets.first() else {
            return;
        };
        match self.remote.put(primary, value).await {
            Ok(()) => tracing::info!("Migrated {} from {} to {}", self.feature, from, primary),
            Err(e) => tracing::warn!(
                "Failed to migrate {} from {} to {}: {}",
                self.feature,
                from,
                primary,
                e
            ),
        }
    }
}

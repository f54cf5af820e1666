//! Sync error types.

use thiserror::Error;

use crate::remote::RemoteError;

/// Errors surfaced by the sync engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// Reading the remote store failed; the feature runs on local or default data.
    #[error("failed to load {feature}: {source}")]
    Load {
        feature: &'static str,
        #[source]
        source: RemoteError,
    },

    /// The remote store returned a snapshot that does not match the feature's shape.
    #[error("stored {feature} data is malformed: {reason}")]
    Malformed {
        feature: &'static str,
        reason: String,
    },

    /// Every storage target rejected the write.
    #[error("failed to save {feature} after {attempts} attempt(s): {last}")]
    Write {
        feature: &'static str,
        attempts: usize,
        last: RemoteError,
    },

    /// The in-memory state could not be serialized.
    #[error("failed to serialize {feature}: {reason}")]
    Encode {
        feature: &'static str,
        reason: String,
    },
}

impl SyncError {
    /// Returns true for errors raised while loading.
    pub fn is_load_error(&self) -> bool {
        matches!(self, SyncError::Load { .. } | SyncError::Malformed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let err = SyncError::Load {
            feature: "practice",
            source: RemoteError::Http("connection refused".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "failed to load practice: request failed: connection refused"
        );
        assert!(err.is_load_error());
    }

    #[test]
    fn test_write_error_is_not_load_error() {
        let err = SyncError::Write {
            feature: "dashboard",
            attempts: 2,
            last: RemoteError::NotAuthenticated,
        };
        assert!(!err.is_load_error());
        assert!(err.to_string().contains("2 attempt(s)"));
    }
}

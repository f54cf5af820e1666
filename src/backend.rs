//! Remote store selection from configuration.

use prepdesk_core::{FileMirror, RemoteError, RemoteStore, RestRemote, Slot};
use serde_json::Value;

use crate::config::Config;

/// The remote store the CLI talks to.
#[derive(Debug, Clone)]
pub enum Backend {
    Rest(RestRemote),
    /// No remote configured: every call fails, so edits stay in the local mirror.
    Offline,
}

impl Backend {
    pub fn from_config(config: &Config) -> Self {
        let remote = &config.remote;
        match (&remote.url, &remote.anon_key) {
            (Some(url), Some(key)) => {
                let mut rest = RestRemote::new(url, key);
                if let (Some(token), Some(user)) = (&remote.access_token, &remote.user_id) {
                    rest = rest.with_session(token, user);
                }
                Backend::Rest(rest)
            }
            _ => {
                tracing::debug!("No remote configured; running offline");
                Backend::Offline
            }
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, Backend::Offline)
    }
}

impl RemoteStore for Backend {
    async fn get(&self, slot: &Slot) -> Result<Option<Value>, RemoteError> {
        match self {
            Backend::Rest(rest) => rest.get(slot).await,
            Backend::Offline => Err(offline()),
        }
    }

    async fn put(&self, slot: &Slot, value: &Value) -> Result<(), RemoteError> {
        match self {
            Backend::Rest(rest) => rest.put(slot, value).await,
            Backend::Offline => Err(offline()),
        }
    }
}

fn offline() -> RemoteError {
    RemoteError::Unavailable("no remote configured".to_string())
}

/// Local mirror and remote store for one command invocation.
pub fn open(config: &Config) -> (FileMirror, Backend) {
    (
        FileMirror::new(config.data_dir.value.clone()),
        Backend::from_config(config),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigSource, ConfigValue, RemoteConfig};
    use std::path::PathBuf;

    fn config_with(remote: RemoteConfig) -> Config {
        Config {
            data_dir: ConfigValue::new(PathBuf::from("/tmp/prep"), ConfigSource::Default),
            config_file: None,
            remote,
        }
    }

    #[test]
    fn test_unconfigured_is_offline() {
        let backend = Backend::from_config(&config_with(RemoteConfig::default()));
        assert!(backend.is_offline());
    }

    #[test]
    fn test_configured_with_session() {
        let backend = Backend::from_config(&config_with(RemoteConfig {
            url: Some("https://example.supabase.co/".to_string()),
            anon_key: Some("key".to_string()),
            access_token: Some("token".to_string()),
            user_id: Some("user-1".to_string()),
        }));

        match backend {
            Backend::Rest(rest) => {
                assert_eq!(rest.base_url(), "https://example.supabase.co");
                assert!(rest.is_authenticated());
            }
            Backend::Offline => panic!("expected rest backend"),
        }
    }

    #[tokio::test]
    async fn test_offline_reports_unavailable() {
        let backend = Backend::Offline;

        let err = backend.get(&Slot::MOCK_DATA).await.unwrap_err();
        assert!(matches!(err, RemoteError::Unavailable(_)));
        assert!(backend.put(&Slot::MOCK_DATA, &Value::Null).await.is_err());
    }
}

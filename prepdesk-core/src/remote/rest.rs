//! PostgREST remote store (Supabase-compatible).
//!
//! Reads are single-row selects keyed by the user id, writes are upserts:
//! - `GET  {url}/rest/v1/{table}?{key}=eq.{user}&select={columns}`
//! - `POST {url}/rest/v1/{table}?on_conflict={key}` with
//!   `Prefer: resolution=merge-duplicates`

use serde_json::{Map, Value};

use super::{RemoteError, RemoteStore, Slot};

/// Remote store talking to a PostgREST endpoint on behalf of one user.
#[derive(Debug, Clone)]
pub struct RestRemote {
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
    user_id: Option<String>,
    client: reqwest::Client,
}

impl RestRemote {
    /// Creates a client for `base_url` (e.g. `https://xyz.supabase.co`).
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            access_token: None,
            user_id: None,
            client: reqwest::Client::new(),
        }
    }

    /// Sets the authenticated session used for every request.
    pub fn with_session(mut self, access_token: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self.user_id = Some(user_id.into());
        self
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns true if a user session is configured.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user_id.is_some()
    }

    fn session(&self) -> Result<(&str, &str), RemoteError> {
        match (&self.access_token, &self.user_id) {
            (Some(token), Some(user)) => Ok((token.as_str(), user.as_str())),
            _ => Err(RemoteError::NotAuthenticated),
        }
    }

    fn build_select_url(&self, slot: &Slot, user_id: &str) -> String {
        let select = match slot.column {
            Some(column) => column.to_string(),
            None => "*".to_string(),
        };
        format!(
            "{}/rest/v1/{}?{}=eq.{}&select={}",
            self.base_url,
            slot.table,
            slot.key_column,
            urlencoding::encode(user_id),
            urlencoding::encode(&select)
        )
    }

    fn build_upsert_url(&self, slot: &Slot) -> String {
        format!(
            "{}/rest/v1/{}?on_conflict={}",
            self.base_url, slot.table, slot.key_column
        )
    }
}

/// Converts a non-success response into a `RemoteError::Status`.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        body,
    })
}

impl RemoteStore for RestRemote {
    async fn get(&self, slot: &Slot) -> Result<Option<Value>, RemoteError> {
        let (token, user_id) = self.session()?;
        let url = self.build_select_url(slot, user_id);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        let rows: Vec<Map<String, Value>> = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        Ok(rows.into_iter().next().and_then(|row| slot.extract(row)))
    }

    async fn put(&self, slot: &Slot, value: &Value) -> Result<(), RemoteError> {
        let (token, user_id) = self.session()?;
        let url = self.build_upsert_url(slot);
        let row = slot.to_row(user_id, value)?;

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", token))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&Value::Object(row))
            .send()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        check_status(response).await?;
        Ok(())
    }
}

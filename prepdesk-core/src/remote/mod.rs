//! Remote per-user store.
//!
//! The remote store holds one row per authenticated user per table. A feature
//! snapshot lives in a [`Slot`]: either one JSON column of a shared row
//! (`profiles.practice_data`) or a whole dedicated row whose non-key columns
//! are the snapshot fields (`practice_data`).
//!
//! "No row yet" is never an error: it reads as `Ok(None)`.

mod memory;
mod rest;

pub use memory::MemoryRemote;
pub use rest::RestRemote;

use serde_json::{Map, Value};
use thiserror::Error;

/// Columns that belong to the row rather than to the snapshot stored in it.
const ROW_METADATA_COLUMNS: &[&str] = &["id", "user_id", "created_at", "updated_at"];

/// Errors returned by a remote store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    #[error("no authenticated user")]
    NotAuthenticated,

    #[error("request failed: {0}")]
    Http(String),

    #[error("server returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("remote store unavailable: {0}")]
    Unavailable(String),
}

/// A named location in the remote store holding one feature's snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    /// Table holding the row.
    pub table: &'static str,
    /// Column matched against the user id.
    pub key_column: &'static str,
    /// JSON column holding the snapshot, or `None` when the whole row is the snapshot.
    pub column: Option<&'static str>,
}

impl Slot {
    pub const PROFILES_DASHBOARD: Slot = Slot::column("profiles", "id", "dashboard_data");
    pub const PROFILES_ADVOCACY: Slot = Slot::column("profiles", "id", "advocacy_data");
    pub const PROFILES_PRACTICE: Slot = Slot::column("profiles", "id", "practice_data");
    pub const PRACTICE_DATA: Slot = Slot::row("practice_data", "user_id");
    pub const MOCK_DATA: Slot = Slot::row("mock_data", "user_id");

    /// A slot stored in one JSON column of a shared row.
    pub const fn column(
        table: &'static str,
        key_column: &'static str,
        column: &'static str,
    ) -> Self {
        Self {
            table,
            key_column,
            column: Some(column),
        }
    }

    /// A slot that owns a dedicated row.
    pub const fn row(table: &'static str, key_column: &'static str) -> Self {
        Self {
            table,
            key_column,
            column: None,
        }
    }

    /// Extracts this slot's snapshot from a fetched row.
    ///
    /// A null column, or a row with nothing but metadata columns, is absent.
    pub fn extract(&self, mut row: Map<String, Value>) -> Option<Value> {
        match self.column {
            Some(column) => match row.remove(column) {
                Some(Value::Null) | None => None,
                Some(value) => Some(value),
            },
            None => {
                row.remove(self.key_column);
                for column in ROW_METADATA_COLUMNS {
                    row.remove(*column);
                }
                if row.is_empty() {
                    None
                } else {
                    Some(Value::Object(row))
                }
            }
        }
    }

    /// Builds the upsert body writing `value` into this slot for `user_id`.
    ///
    /// Only this slot's columns are present, so other columns of a shared row
    /// are left untouched by the upsert.
    pub fn to_row(&self, user_id: &str, value: &Value) -> Result<Map<String, Value>, RemoteError> {
        let mut row = match self.column {
            Some(column) => {
                let mut row = Map::new();
                row.insert(column.to_string(), value.clone());
                row
            }
            None => match value {
                Value::Object(fields) => fields.clone(),
                other => {
                    return Err(RemoteError::Decode(format!(
                        "snapshot for {} must be a JSON object, got {}",
                        self, other
                    )))
                }
            },
        };
        row.insert(
            self.key_column.to_string(),
            Value::String(user_id.to_string()),
        );
        Ok(row)
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.column {
            Some(column) => write!(f, "{}.{}", self.table, column),
            None => write!(f, "{}", self.table),
        }
    }
}

/// Async, possibly failing durable store keyed by the ambient user.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// Reads the snapshot held in `slot`, `Ok(None)` when nothing is stored.
    async fn get(&self, slot: &Slot) -> Result<Option<Value>, RemoteError>;

    /// Upserts `value` into `slot`.
    async fn put(&self, slot: &Slot, value: &Value) -> Result<(), RemoteError>;
}

//! Multi-document management for advocacy plans.
//!
//! A [`DocumentManager`] sits on one advocacy [`SyncCoordinator`](crate::sync::SyncCoordinator):
//! the whole document map is the synchronized state, and every create,
//! rename, edit or delete is one `apply` of the new map.
//!
//! Policy checks (capacity, protected default, last document, blank title)
//! are reported as `false`/`None`, never as errors.

mod field;
mod manager;

pub use field::{AdvocacyField, ParseFieldError};
pub use manager::{DocumentManager, ACTIVE_DOCUMENT_KEY, MAX_DOCUMENTS};

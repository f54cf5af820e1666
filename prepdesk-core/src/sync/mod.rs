//! Local-first synchronization engine.
//!
//! A [`SyncCoordinator`] owns one feature's state. Every edit is merged in
//! memory, mirrored synchronously to the [`LocalMirror`](crate::mirror::LocalMirror)
//! and scheduled for a debounced write through a [`FallbackWriter`].
//!
//! ## Load
//!
//! 1. Read the local mirror (instant, possibly stale)
//! 2. Read the remote store; a stored snapshot replaces local state wholesale
//! 3. Nothing anywhere: persist the feature default immediately
//!
//! ## Write-back
//!
//! Edits within [`DEBOUNCE_MS`] of each other coalesce into a single remote
//! write of the newest snapshot. Failed writes are logged, never retried; the
//! next edit's write carries the current state.

mod coordinator;
mod error;
mod fallback;
mod scheduler;

pub use coordinator::{Feature, Phase, SyncCoordinator};
pub use error::SyncError;
pub use fallback::FallbackWriter;
pub use scheduler::{Clock, Debouncer, ManualClock, SystemClock, DEBOUNCE_MS};

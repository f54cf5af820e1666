//! Prepdesk Core Library
//!
//! Local-first state synchronization for the prepdesk training tools: typed
//! feature snapshots, a synchronous local mirror, a remote per-user store and
//! the coordinator that keeps the three consistent.

pub mod documents;
pub mod features;
pub mod mirror;
pub mod models;
pub mod remote;
pub mod sync;

pub use documents::{AdvocacyField, DocumentManager, MAX_DOCUMENTS};
pub use features::{
    AdvocacyFeature, AdvocacyPatch, DashboardFeature, DashboardPatch, MockFeature, MockPatch,
    PracticeFeature, PracticePatch,
};
pub use mirror::{FileMirror, LocalMirror, MemoryMirror};
pub use models::{
    AdvocacyDocument, AdvocacyState, CoreMessage, DashboardState, MockData, PracticeData,
    Question, Stats, Task, Week, DEFAULT_DOCUMENT_ID,
};
pub use remote::{MemoryRemote, RemoteError, RemoteStore, RestRemote, Slot};
pub use sync::{
    Clock, Debouncer, FallbackWriter, Feature, ManualClock, Phase, SyncCoordinator, SyncError,
    SystemClock, DEBOUNCE_MS,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}

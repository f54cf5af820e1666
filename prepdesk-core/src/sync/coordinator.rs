//! Per-feature state owner.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::SyncError;
use super::fallback::FallbackWriter;
use super::scheduler::{Clock, Debouncer, SystemClock, DEBOUNCE_MS};
use crate::mirror::{read_snapshot, write_snapshot, LocalMirror};
use crate::remote::{RemoteStore, Slot};

/// A feature whose state is synchronized as one snapshot.
pub trait Feature {
    /// Full snapshot value, written to both the mirror and the remote store.
    type State: Clone + PartialEq + Debug + Serialize + DeserializeOwned;

    /// Partial update: present fields replace the state's fields wholesale.
    type Patch;

    /// Name used in logs and errors.
    const NAME: &'static str;

    /// Local mirror key.
    const MIRROR_KEY: &'static str;

    /// State used when nothing is stored anywhere.
    fn default_state() -> Self::State;

    /// Shallow-merges `patch` into `state`.
    fn merge(state: &mut Self::State, patch: Self::Patch);

    /// Remote slots, dedicated first.
    fn targets() -> Vec<Slot>;

    /// Whether a stored snapshot counts as "nothing stored".
    fn is_empty(_state: &Self::State) -> bool {
        false
    }
}

/// Lifecycle of a coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Loading,
    Ready,
}

/// Owns one feature's state and keeps mirror and remote store in step with it.
///
/// # State Machine
///
/// ```text
/// Uninitialized --initialize()--> Loading --> Ready <--apply()--> Ready
/// ```
///
/// `apply` is the only mutator. It updates memory and the mirror before
/// returning and arms the debouncer; the remote write happens on a later
/// [`tick`](Self::tick), [`settle`](Self::settle) or
/// [`flush_on_suspend`](Self::flush_on_suspend).
pub struct SyncCoordinator<F: Feature, M, R> {
    state: F::State,
    phase: Phase,
    load_error: Option<SyncError>,
    last_write_error: Option<SyncError>,
    remote_writable: bool,
    mirror: M,
    writer: FallbackWriter<R>,
    clock: Arc<dyn Clock>,
    debouncer: Debouncer<F::State>,
}

impl<F, M, R> SyncCoordinator<F, M, R>
where
    F: Feature,
    M: LocalMirror,
    R: RemoteStore,
{
    /// Creates a coordinator on the wall clock.
    pub fn new(mirror: M, remote: R) -> Self {
        Self::with_clock(mirror, remote, Arc::new(SystemClock))
    }

    /// Creates a coordinator driven by `clock`.
    pub fn with_clock(mirror: M, remote: R, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: F::default_state(),
            phase: Phase::Uninitialized,
            load_error: None,
            last_write_error: None,
            remote_writable: true,
            mirror,
            writer: FallbackWriter::new(remote, F::NAME, F::targets()),
            clock,
            debouncer: Debouncer::new(Duration::from_millis(DEBOUNCE_MS)),
        }
    }

    pub fn state(&self) -> &F::State {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    /// The error raised while loading, if any. The coordinator is still usable.
    pub fn load_error(&self) -> Option<&SyncError> {
        self.load_error.as_ref()
    }

    /// The most recent failed remote write, cleared by the next successful one.
    pub fn last_write_error(&self) -> Option<&SyncError> {
        self.last_write_error.as_ref()
    }

    pub fn has_pending_write(&self) -> bool {
        self.debouncer.is_armed()
    }

    /// When the pending remote write becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn mirror(&self) -> &M {
        &self.mirror
    }

    /// False after a malformed remote snapshot: edits are mirrored locally
    /// but never written over the stored data.
    pub fn is_remote_writable(&self) -> bool {
        self.remote_writable
    }

    /// Loads the feature: mirror first, then the remote store, which wins when
    /// it holds a snapshot.
    ///
    /// Always ends in [`Phase::Ready`]. A failed remote read is kept in
    /// [`load_error`](Self::load_error) and the best available state is used.
    pub async fn initialize(&mut self) {
        if self.phase != Phase::Uninitialized {
            return;
        }
        self.phase = Phase::Loading;

        let local = read_snapshot::<F::State, _>(&self.mirror, F::MIRROR_KEY)
            .filter(|state| !F::is_empty(state));
        let had_local = local.is_some();
        if let Some(local) = local {
            tracing::debug!("Loaded {} from local mirror", F::NAME);
            self.state = local;
        }

        match self.writer.load().await {
            Ok(Some(value)) => match serde_json::from_value::<F::State>(value) {
                Ok(remote) if !F::is_empty(&remote) => {
                    tracing::info!("Loaded {} from remote store", F::NAME);
                    self.state = remote;
                    write_snapshot(&self.mirror, F::MIRROR_KEY, &self.state);
                }
                Ok(_) => self.bootstrap(had_local).await,
                Err(e) => {
                    tracing::error!("Stored {} data is malformed: {}", F::NAME, e);
                    self.remote_writable = false;
                    self.load_error = Some(SyncError::Malformed {
                        feature: F::NAME,
                        reason: e.to_string(),
                    });
                    if !had_local {
                        self.state = F::default_state();
                    }
                }
            },
            Ok(None) => self.bootstrap(had_local).await,
            Err(e) => {
                tracing::error!("{}", e);
                self.load_error = Some(e);
                if !had_local {
                    self.state = F::default_state();
                }
            }
        }

        self.phase = Phase::Ready;
    }

    /// Nothing stored remotely: keep local data if any, otherwise persist the default.
    async fn bootstrap(&mut self, had_local: bool) {
        if had_local {
            tracing::debug!("No remote {} yet; keeping local mirror", F::NAME);
            return;
        }
        tracing::info!("No stored {}; creating default", F::NAME);
        self.state = F::default_state();
        write_snapshot(&self.mirror, F::MIRROR_KEY, &self.state);
        let snapshot = self.state.clone();
        self.write_now(&snapshot).await;
    }

    /// Merges `patch`, mirrors the result and schedules a debounced remote write.
    ///
    /// Returns false (and changes nothing) before the feature is loaded.
    pub fn apply(&mut self, patch: F::Patch) -> bool {
        if self.phase != Phase::Ready {
            tracing::warn!("Ignoring {} edit before load completed", F::NAME);
            return false;
        }

        F::merge(&mut self.state, patch);
        write_snapshot(&self.mirror, F::MIRROR_KEY, &self.state);
        self.debouncer.arm(self.state.clone(), self.clock.now());
        true
    }

    /// Applies `patch` and writes it to the remote store without waiting.
    pub async fn commit(&mut self, patch: F::Patch) -> bool {
        if !self.apply(patch) {
            return false;
        }
        self.flush_on_suspend().await;
        true
    }

    /// Fires the pending write if its quiet window has elapsed.
    ///
    /// Returns true if a write was attempted.
    pub async fn tick(&mut self) -> bool {
        match self.debouncer.take_due(self.clock.now()) {
            Some(snapshot) => {
                self.write_now(&snapshot).await;
                true
            }
            None => false,
        }
    }

    /// Waits out the quiet window in real time, then writes.
    pub async fn settle(&mut self) {
        let Some(deadline) = self.debouncer.deadline() else {
            return;
        };
        tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        self.flush_on_suspend().await;
    }

    /// Sends the pending write now instead of dropping it, for page or
    /// process teardown. Returns true if a write was attempted.
    pub async fn flush_on_suspend(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(snapshot) => {
                self.write_now(&snapshot).await;
                true
            }
            None => false,
        }
    }

    async fn write_now(&mut self, snapshot: &F::State) {
        if !self.remote_writable {
            tracing::warn!(
                "Not saving {} remotely: stored data could not be read",
                F::NAME
            );
            return;
        }

        let value = match serde_json::to_value(snapshot) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize {}: {}", F::NAME, e);
                self.last_write_error = Some(SyncError::Encode {
                    feature: F::NAME,
                    reason: e.to_string(),
                });
                return;
            }
        };

        match self.writer.store(&value).await {
            Ok(_) => self.last_write_error = None,
            Err(e) => self.last_write_error = Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::MemoryMirror;
    use crate::remote::MemoryRemote;
    use crate::sync::ManualClock;
    use serde::Deserialize;
    use serde_json::json;

    const NOTE_SLOT: Slot = Slot::row("notes", "user_id");
    const SHARED_SLOT: Slot = Slot::column("profiles", "id", "note_data");

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        title: String,
        body: String,
    }

    #[derive(Default)]
    struct NotePatch {
        title: Option<String>,
        body: Option<String>,
    }

    struct NoteFeature;

    impl Feature for NoteFeature {
        type State = Note;
        type Patch = NotePatch;
        const NAME: &'static str = "note";
        const MIRROR_KEY: &'static str = "note-state";

        fn default_state() -> Note {
            Note {
                title: "Untitled".to_string(),
                body: String::new(),
            }
        }

        fn merge(state: &mut Note, patch: NotePatch) {
            if let Some(title) = patch.title {
                state.title = title;
            }
            if let Some(body) = patch.body {
                state.body = body;
            }
        }

        fn targets() -> Vec<Slot> {
            vec![NOTE_SLOT, SHARED_SLOT]
        }
    }

    type NoteSync = SyncCoordinator<NoteFeature, MemoryMirror, MemoryRemote>;

    fn setup() -> (NoteSync, MemoryMirror, MemoryRemote, ManualClock) {
        let mirror = MemoryMirror::new();
        let remote = MemoryRemote::new();
        let clock = ManualClock::new();
        let sync = SyncCoordinator::with_clock(
            mirror.clone(),
            remote.clone(),
            Arc::new(clock.clone()),
        );
        (sync, mirror, remote, clock)
    }

    fn title(value: &str) -> NotePatch {
        NotePatch {
            title: Some(value.to_string()),
            ..Default::default()
        }
    }

    fn note(title: &str, body: &str) -> Note {
        Note {
            title: title.to_string(),
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_initialize_empty_writes_default_immediately() {
        let (mut sync, mirror, remote, _clock) = setup();
        assert_eq!(sync.phase(), Phase::Uninitialized);

        sync.initialize().await;

        assert!(sync.is_ready());
        assert_eq!(sync.state(), &NoteFeature::default_state());
        assert_eq!(
            remote.writes_to(NOTE_SLOT),
            vec![json!({"title": "Untitled", "body": ""})]
        );
        assert_eq!(
            read_snapshot::<Note, _>(&mirror, "note-state"),
            Some(NoteFeature::default_state())
        );
        assert!(!sync.has_pending_write());
    }

    #[tokio::test]
    async fn test_remote_wins_over_local_at_load() {
        let (mut sync, mirror, remote, _clock) = setup();
        write_snapshot(&mirror, "note-state", &note("local", "a"));
        remote.seed(NOTE_SLOT, json!({"title": "remote", "body": "b"}));

        sync.initialize().await;

        assert_eq!(sync.state(), &note("remote", "b"));
        assert_eq!(
            read_snapshot::<Note, _>(&mirror, "note-state"),
            Some(note("remote", "b"))
        );
        assert!(remote.writes().is_empty());
    }

    #[tokio::test]
    async fn test_local_kept_when_remote_empty() {
        let (mut sync, mirror, remote, _clock) = setup();
        write_snapshot(&mirror, "note-state", &note("local", "a"));

        sync.initialize().await;

        assert_eq!(sync.state(), &note("local", "a"));
        assert!(remote.writes().is_empty());
        assert!(sync.load_error().is_none());
    }

    #[tokio::test]
    async fn test_load_failure_falls_back_to_local() {
        let (mut sync, mirror, remote, _clock) = setup();
        write_snapshot(&mirror, "note-state", &note("local", "a"));
        remote.fail_reads("notes");
        remote.fail_reads("profiles");

        sync.initialize().await;

        assert!(sync.is_ready());
        assert_eq!(sync.state(), &note("local", "a"));
        assert!(sync.load_error().unwrap().is_load_error());
    }

    #[tokio::test]
    async fn test_load_failure_without_local_uses_default() {
        let (mut sync, _mirror, remote, _clock) = setup();
        remote.fail_reads("notes");
        remote.fail_reads("profiles");

        sync.initialize().await;

        assert!(sync.is_ready());
        assert_eq!(sync.state(), &NoteFeature::default_state());
        assert!(sync.load_error().is_some());
        assert!(remote.writes().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_remote_is_load_error() {
        let (mut sync, _mirror, remote, _clock) = setup();
        remote.seed(NOTE_SLOT, json!({"title": 42}));

        sync.initialize().await;

        assert!(matches!(
            sync.load_error(),
            Some(SyncError::Malformed { feature: "note", .. })
        ));
        assert_eq!(sync.state(), &NoteFeature::default_state());
    }

    #[tokio::test]
    async fn test_malformed_remote_is_never_overwritten() {
        let (mut sync, mirror, remote, _clock) = setup();
        let stored = json!({"title": 42, "body": ["unexpected"]});
        remote.seed(NOTE_SLOT, stored.clone());

        sync.initialize().await;
        assert!(!sync.is_remote_writable());

        assert!(sync.apply(title("edited")));
        assert!(sync.flush_on_suspend().await);

        assert_eq!(
            read_snapshot::<Note, _>(&mirror, "note-state").map(|n| n.title),
            Some("edited".to_string())
        );
        assert_eq!(remote.stored(NOTE_SLOT), Some(stored));
        assert!(remote.writes().is_empty());
    }

    #[tokio::test]
    async fn test_apply_before_initialize_is_ignored() {
        let (mut sync, mirror, _remote, _clock) = setup();

        assert!(!sync.apply(title("early")));

        assert!(mirror.is_empty());
        assert!(!sync.has_pending_write());
    }

    #[tokio::test]
    async fn test_apply_is_shallow_merge_and_mirrored_synchronously() {
        let (mut sync, mirror, remote, _clock) = setup();
        remote.seed(NOTE_SLOT, json!({"title": "t", "body": "keep"}));
        sync.initialize().await;

        assert!(sync.apply(title("new")));

        assert_eq!(sync.state(), &note("new", "keep"));
        assert_eq!(
            read_snapshot::<Note, _>(&mirror, "note-state"),
            Some(note("new", "keep"))
        );
        assert!(remote.writes().is_empty());
        assert!(sync.has_pending_write());
    }

    #[tokio::test]
    async fn test_burst_coalesces_into_last_snapshot() {
        let (mut sync, _mirror, remote, clock) = setup();
        remote.seed(NOTE_SLOT, json!({"title": "t", "body": ""}));
        sync.initialize().await;

        for (i, text) in ["h", "he", "hel", "hell", "hello"].iter().enumerate() {
            sync.apply(NotePatch {
                body: Some(text.to_string()),
                ..Default::default()
            });
            if i < 4 {
                clock.advance_ms(DEBOUNCE_MS - 1);
                assert!(!sync.tick().await);
            }
        }

        clock.advance_ms(DEBOUNCE_MS);
        assert!(sync.tick().await);
        assert!(!sync.tick().await);

        assert_eq!(
            remote.writes_to(NOTE_SLOT),
            vec![json!({"title": "t", "body": "hello"})]
        );
    }

    #[tokio::test]
    async fn test_only_last_title_is_sent() {
        let (mut sync, _mirror, remote, clock) = setup();
        remote.seed(NOTE_SLOT, json!({"title": "t", "body": ""}));
        sync.initialize().await;

        sync.apply(title("x"));
        clock.advance_ms(300);
        sync.apply(title("y"));
        clock.advance_ms(DEBOUNCE_MS);
        sync.tick().await;

        let sent = remote.writes_to(NOTE_SLOT);
        assert_eq!(sent, vec![json!({"title": "y", "body": ""})]);
    }

    #[tokio::test]
    async fn test_flush_on_suspend_sends_pending_write() {
        let (mut sync, _mirror, remote, _clock) = setup();
        remote.seed(NOTE_SLOT, json!({"title": "t", "body": ""}));
        sync.initialize().await;

        sync.apply(title("last edit"));
        assert!(sync.flush_on_suspend().await);
        assert!(!sync.flush_on_suspend().await);

        assert_eq!(
            remote.writes_to(NOTE_SLOT),
            vec![json!({"title": "last edit", "body": ""})]
        );
    }

    #[tokio::test]
    async fn test_commit_writes_immediately() {
        let (mut sync, _mirror, remote, _clock) = setup();
        remote.seed(NOTE_SLOT, json!({"title": "t", "body": ""}));
        sync.initialize().await;

        assert!(sync.commit(title("reset")).await);

        assert!(!sync.has_pending_write());
        assert_eq!(remote.writes_to(NOTE_SLOT).len(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_is_recorded_and_recovered_by_next_edit() {
        let (mut sync, mirror, remote, clock) = setup();
        remote.seed(NOTE_SLOT, json!({"title": "t", "body": ""}));
        sync.initialize().await;
        remote.fail_writes("notes");
        remote.fail_writes("profiles");

        sync.apply(title("offline"));
        clock.advance_ms(DEBOUNCE_MS);
        sync.tick().await;

        assert!(sync.last_write_error().is_some());
        assert!(!sync.has_pending_write());
        assert_eq!(
            read_snapshot::<Note, _>(&mirror, "note-state"),
            Some(note("offline", ""))
        );

        remote.recover();
        sync.apply(NotePatch {
            body: Some("back".to_string()),
            ..Default::default()
        });
        clock.advance_ms(DEBOUNCE_MS);
        sync.tick().await;

        assert!(sync.last_write_error().is_none());
        assert_eq!(
            remote.writes_to(NOTE_SLOT),
            vec![json!({"title": "offline", "body": "back"})]
        );
    }

    #[tokio::test]
    async fn test_dedicated_write_failure_uses_shared_slot() {
        let (mut sync, _mirror, remote, clock) = setup();
        remote.seed(NOTE_SLOT, json!({"title": "t", "body": ""}));
        sync.initialize().await;
        remote.fail_writes("notes");

        sync.apply(title("fallback"));
        clock.advance_ms(DEBOUNCE_MS);
        sync.tick().await;

        assert!(sync.last_write_error().is_none());
        assert_eq!(
            remote.writes_to(SHARED_SLOT),
            vec![json!({"title": "fallback", "body": ""})]
        );
    }

    #[tokio::test]
    async fn test_initialize_twice_is_noop() {
        let (mut sync, _mirror, remote, _clock) = setup();
        sync.initialize().await;
        sync.initialize().await;
        assert_eq!(remote.writes().len(), 1);
    }

    #[tokio::test]
    async fn test_settle_waits_then_writes() {
        let mirror = MemoryMirror::new();
        let remote = MemoryRemote::new();
        remote.seed(NOTE_SLOT, json!({"title": "t", "body": ""}));
        let mut sync: NoteSync = SyncCoordinator::new(mirror, remote.clone());
        sync.initialize().await;

        sync.apply(title("settled"));
        sync.settle().await;

        assert!(!sync.has_pending_write());
        assert_eq!(remote.writes_to(NOTE_SLOT).len(), 1);
    }
}

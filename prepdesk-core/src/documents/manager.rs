use chrono::Utc;
use uuid::Uuid;

use super::field::AdvocacyField;
use crate::features::{AdvocacyFeature, AdvocacyPatch};
use crate::mirror::LocalMirror;
use crate::models::{AdvocacyDocument, AdvocacyState, DEFAULT_DOCUMENT_ID};
use crate::remote::RemoteStore;
use crate::sync::SyncCoordinator;

/// Maximum number of advocacy documents per user.
pub const MAX_DOCUMENTS: usize = 10;

/// Mirror key remembering the selected document. Never sent remotely.
pub const ACTIVE_DOCUMENT_KEY: &str = "advocacy-active-document";

/// Title given to newly created documents.
const NEW_DOCUMENT_TITLE: &str = "Untitled Advocacy Plan";

/// Create/select/rename/delete over the synchronized advocacy document map.
///
/// Invariants once initialized:
/// - at least one document exists
/// - the `default-advocacy` document is never deleted
/// - at most [`MAX_DOCUMENTS`] documents exist
/// - the active pointer, when set, names an existing document
pub struct DocumentManager<M, R> {
    sync: SyncCoordinator<AdvocacyFeature, M, R>,
    active: Option<String>,
}

impl<M, R> DocumentManager<M, R>
where
    M: LocalMirror,
    R: RemoteStore,
{
    pub fn new(sync: SyncCoordinator<AdvocacyFeature, M, R>) -> Self {
        Self { sync, active: None }
    }

    /// Loads documents and restores the active pointer.
    ///
    /// With nothing stored anywhere, the coordinator bootstraps exactly one
    /// default document and persists it.
    pub async fn initialize(&mut self) {
        self.sync.initialize().await;

        let remembered = self
            .sync
            .mirror()
            .read_raw(ACTIVE_DOCUMENT_KEY)
            .map(|id| id.trim().to_string())
            .filter(|id| self.state().documents.contains_key(id));
        self.active = remembered.or_else(|| self.first_id());
    }

    pub fn sync(&self) -> &SyncCoordinator<AdvocacyFeature, M, R> {
        &self.sync
    }

    pub fn sync_mut(&mut self) -> &mut SyncCoordinator<AdvocacyFeature, M, R> {
        &mut self.sync
    }

    pub fn state(&self) -> &AdvocacyState {
        self.sync.state()
    }

    /// Documents in display order.
    pub fn documents(&self) -> Vec<&AdvocacyDocument> {
        self.state().ordered()
    }

    pub fn get(&self, id: &str) -> Option<&AdvocacyDocument> {
        self.state().get(id)
    }

    pub fn count(&self) -> usize {
        self.state().len()
    }

    pub fn can_create(&self) -> bool {
        self.sync.is_ready() && self.count() < MAX_DOCUMENTS
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&AdvocacyDocument> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    fn first_id(&self) -> Option<String> {
        self.documents().first().map(|doc| doc.id.clone())
    }

    fn set_active(&mut self, id: Option<String>) {
        match &id {
            Some(id) => self.sync.mirror().write_raw(ACTIVE_DOCUMENT_KEY, id),
            None => self.sync.mirror().remove(ACTIVE_DOCUMENT_KEY),
        }
        self.active = id;
    }

    /// Creates a templated document and makes it active.
    ///
    /// Returns the new id, or `None` at capacity.
    pub fn create(&mut self) -> Option<String> {
        if !self.can_create() {
            tracing::info!(
                "Not creating advocacy document: {} of {} in use",
                self.count(),
                MAX_DOCUMENTS
            );
            return None;
        }

        let id = format!("advocacy-{}", Uuid::new_v4());
        let doc = AdvocacyDocument::new(id.clone(), NEW_DOCUMENT_TITLE, Utc::now());

        let mut documents = self.state().documents.clone();
        documents.insert(id.clone(), doc);
        if !self.sync.apply(AdvocacyPatch {
            documents: Some(documents),
        }) {
            return None;
        }

        self.set_active(Some(id.clone()));
        Some(id)
    }

    /// Points the active document at `id`. Viewing is not an edit, so nothing
    /// is written remotely.
    pub fn select(&mut self, id: &str) -> bool {
        if !self.state().documents.contains_key(id) {
            return false;
        }
        self.set_active(Some(id.to_string()));
        true
    }

    /// Sets one field of document `id` and refreshes `updatedAt`.
    pub fn update_field(&mut self, id: &str, field: AdvocacyField, value: impl Into<String>) -> bool {
        let mut documents = self.state().documents.clone();
        let Some(doc) = documents.get_mut(id) else {
            return false;
        };
        field.set(doc, value.into());
        doc.updated_at = Utc::now();

        self.sync.apply(AdvocacyPatch {
            documents: Some(documents),
        })
    }

    /// Renames document `id`. Blank titles are rejected and the old title kept.
    pub fn rename(&mut self, id: &str, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        self.update_field(id, AdvocacyField::Title, title)
    }

    /// Deletes document `id`.
    ///
    /// Rejected for the protected default document and for the last
    /// remaining document. Deleting the active document moves the pointer to
    /// the first remaining one.
    pub fn delete(&mut self, id: &str) -> bool {
        if id == DEFAULT_DOCUMENT_ID {
            tracing::info!("Refusing to delete the default advocacy document");
            return false;
        }
        if !self.state().documents.contains_key(id) || self.count() <= 1 {
            return false;
        }

        let mut documents = self.state().documents.clone();
        documents.remove(id);
        if !self.sync.apply(AdvocacyPatch {
            documents: Some(documents),
        }) {
            return false;
        }

        if self.active.as_deref() == Some(id) || self.active.is_none() {
            let next = self.first_id();
            self.set_active(next);
        }
        true
    }

    /// Fires the pending remote write if it is due.
    pub async fn tick(&mut self) -> bool {
        self.sync.tick().await
    }

    /// Waits out the quiet window, then writes.
    pub async fn settle(&mut self) {
        self.sync.settle().await
    }

    /// Sends any pending remote write immediately.
    pub async fn flush_on_suspend(&mut self) -> bool {
        self.sync.flush_on_suspend().await
    }
}

use std::collections::BTreeMap;

use chrono::Utc;

use crate::models::{AdvocacyDocument, AdvocacyState};
use crate::remote::Slot;
use crate::sync::Feature;

pub struct AdvocacyFeature;

/// Partial advocacy update. The document map is replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvocacyPatch {
    pub documents: Option<BTreeMap<String, AdvocacyDocument>>,
}

impl Feature for AdvocacyFeature {
    type State = AdvocacyState;
    type Patch = AdvocacyPatch;
    const NAME: &'static str = "advocacy";
    const MIRROR_KEY: &'static str = "advocacy-documents";

    fn default_state() -> AdvocacyState {
        AdvocacyState::with_default_document(Utc::now())
    }

    fn merge(state: &mut AdvocacyState, patch: AdvocacyPatch) {
        if let Some(documents) = patch.documents {
            state.documents = documents;
        }
    }

    fn targets() -> Vec<Slot> {
        vec![Slot::PROFILES_ADVOCACY]
    }

    fn is_empty(state: &AdvocacyState) -> bool {
        state.is_empty()
    }
}

use crate::models::{CoreMessage, PracticeData, Question};
use crate::remote::Slot;
use crate::sync::Feature;

pub struct PracticeFeature;

/// Partial practice update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PracticePatch {
    pub core_messages: Option<Vec<CoreMessage>>,
    pub custom_questions: Option<Vec<Question>>,
}

impl PracticePatch {
    pub fn add_core_message(state: &PracticeData, text: &str) -> Self {
        let mut messages = state.core_messages.clone();
        messages.push(CoreMessage::new(state.next_message_id(), text));
        Self {
            core_messages: Some(messages),
            ..Default::default()
        }
    }

    /// Replaces the text of message `id`. `None` if there is no such message.
    pub fn edit_core_message(state: &PracticeData, id: u64, text: &str) -> Option<Self> {
        let mut messages = state.core_messages.clone();
        let message = messages.iter_mut().find(|m| m.id == id)?;
        message.text = text.to_string();
        Some(Self {
            core_messages: Some(messages),
            ..Default::default()
        })
    }

    pub fn remove_core_message(state: &PracticeData, id: u64) -> Option<Self> {
        let messages = without(&state.core_messages, |m| m.id == id)?;
        Some(Self {
            core_messages: Some(messages),
            ..Default::default()
        })
    }

    pub fn add_custom_question(
        state: &PracticeData,
        text: &str,
        category: &str,
        sample_answer: &str,
    ) -> Self {
        let mut questions = state.custom_questions.clone();
        questions.push(
            Question::new(state.next_question_id(), text, category)
                .with_sample_answer(sample_answer),
        );
        Self {
            custom_questions: Some(questions),
            ..Default::default()
        }
    }

    pub fn remove_custom_question(state: &PracticeData, id: u64) -> Option<Self> {
        let questions = without(&state.custom_questions, |q| q.id == id)?;
        Some(Self {
            custom_questions: Some(questions),
            ..Default::default()
        })
    }
}

/// `items` minus those matching `pred`, or `None` if nothing matched.
pub(super) fn without<T: Clone>(items: &[T], pred: impl Fn(&T) -> bool) -> Option<Vec<T>> {
    let kept: Vec<T> = items.iter().filter(|item| !pred(item)).cloned().collect();
    if kept.len() == items.len() {
        None
    } else {
        Some(kept)
    }
}

impl Feature for PracticeFeature {
    type State = PracticeData;
    type Patch = PracticePatch;
    const NAME: &'static str = "practice";
    const MIRROR_KEY: &'static str = "practice-state";

    fn default_state() -> PracticeData {
        PracticeData::default()
    }

    fn merge(state: &mut PracticeData, patch: PracticePatch) {
        if let Some(messages) = patch.core_messages {
            state.core_messages = messages;
        }
        if let Some(questions) = patch.custom_questions {
            state.custom_questions = questions;
        }
    }

    fn targets() -> Vec<Slot> {
        vec![Slot::PRACTICE_DATA, Slot::PROFILES_PRACTICE]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(state: &mut PracticeData, patch: PracticePatch) {
        PracticeFeature::merge(state, patch);
    }

    #[test]
    fn test_add_and_edit_core_message() {
        let mut state = PracticeData::default();

        let patch = PracticePatch::add_core_message(&state, "I listen first.");
        apply(&mut state, patch);
        assert_eq!(state.core_messages.len(), 4);
        assert_eq!(state.core_messages[3].id, 4);

        let patch = PracticePatch::edit_core_message(&state, 4, "I listen, then act.").unwrap();
        apply(&mut state, patch);
        assert_eq!(state.core_messages[3].text, "I listen, then act.");

        assert!(PracticePatch::edit_core_message(&state, 42, "x").is_none());
    }

    #[test]
    fn test_remove_core_message() {
        let mut state = PracticeData::default();

        let patch = PracticePatch::remove_core_message(&state, 2).unwrap();
        apply(&mut state, patch);

        let ids: Vec<u64> = state.core_messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(PracticePatch::remove_core_message(&state, 2).is_none());
    }

    #[test]
    fn test_custom_questions_patch_leaves_messages() {
        let mut state = PracticeData::default();
        let before = state.core_messages.clone();

        let patch = PracticePatch::add_custom_question(&state, "Why now?", "Motivation", "");
        assert!(patch.core_messages.is_none());
        apply(&mut state, patch);

        assert_eq!(state.core_messages, before);
        assert_eq!(state.custom_questions[0].category, "Motivation");

        let patch = PracticePatch::remove_custom_question(&state, 1).unwrap();
        apply(&mut state, patch);
        assert!(state.custom_questions.is_empty());
    }

    #[test]
    fn test_targets_dedicated_first() {
        assert_eq!(
            PracticeFeature::targets(),
            vec![Slot::PRACTICE_DATA, Slot::PROFILES_PRACTICE]
        );
    }

    #[tokio::test]
    async fn test_timestamp_question_ids_survive_a_session() {
        use crate::mirror::MemoryMirror;
        use crate::remote::MemoryRemote;
        use crate::sync::SyncCoordinator;
        use serde_json::json;

        let remote = MemoryRemote::new();
        remote.seed(
            Slot::PRACTICE_DATA,
            json!({
                "coreMessages": [{"id": 1, "text": "mine"}],
                "customQuestions": [
                    {"id": 1717000000000u64, "text": "Why you?", "category": "Personal"}
                ]
            }),
        );
        let mut sync =
            SyncCoordinator::<PracticeFeature, _, _>::new(MemoryMirror::new(), remote.clone());
        sync.initialize().await;
        assert!(sync.load_error().is_none());

        let patch = PracticePatch::add_core_message(sync.state(), "new");
        sync.apply(patch);
        sync.flush_on_suspend().await;

        let stored: PracticeData =
            serde_json::from_value(remote.stored(Slot::PRACTICE_DATA).unwrap()).unwrap();
        assert_eq!(stored.core_messages[0].text, "mine");
        assert_eq!(stored.core_messages[1].id, 2);
        assert_eq!(stored.custom_questions[0].id, 1_717_000_000_000);
    }
}

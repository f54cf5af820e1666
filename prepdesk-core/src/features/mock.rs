use super::practice::without;
use crate::models::{MockData, Question};
use crate::remote::Slot;
use crate::sync::Feature;

pub struct MockFeature;

/// Partial mock interview update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockPatch {
    pub mock_questions: Option<Vec<Question>>,
}

impl MockPatch {
    pub fn add_question(state: &MockData, text: &str, category: &str) -> Self {
        let mut questions = state.mock_questions.clone();
        questions.push(Question::new(state.next_question_id(), text, category));
        Self {
            mock_questions: Some(questions),
        }
    }

    pub fn remove_question(state: &MockData, id: u64) -> Option<Self> {
        Some(Self {
            mock_questions: Some(without(&state.mock_questions, |q| q.id == id)?),
        })
    }
}

impl Feature for MockFeature {
    type State = MockData;
    type Patch = MockPatch;
    const NAME: &'static str = "mock";
    const MIRROR_KEY: &'static str = "mock-state";

    fn default_state() -> MockData {
        MockData::default()
    }

    fn merge(state: &mut MockData, patch: MockPatch) {
        if let Some(questions) = patch.mock_questions {
            state.mock_questions = questions;
        }
    }

    fn targets() -> Vec<Slot> {
        vec![Slot::MOCK_DATA]
    }
}

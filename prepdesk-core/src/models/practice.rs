use serde::{Deserialize, Serialize};

/// A reusable core message the user works into answers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoreMessage {
    pub id: u64,
    pub text: String,
}

impl CoreMessage {
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

/// A practice question, either from the bank or written by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u64,
    pub text: String,
    pub category: String,
    #[serde(default)]
    pub sample_answer: String,
}

impl Question {
    pub fn new(id: u64, text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            category: category.into(),
            sample_answer: String::new(),
        }
    }

    pub fn with_sample_answer(mut self, answer: impl Into<String>) -> Self {
        self.sample_answer = answer.into();
        self
    }
}

/// Practice snapshot stored in the dedicated `practice_data` row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PracticeData {
    pub core_messages: Vec<CoreMessage>,
    pub custom_questions: Vec<Question>,
}

impl PracticeData {
    pub fn default_core_messages() -> Vec<CoreMessage> {
        vec![
            CoreMessage::new(1, "I am a dedicated and passionate leader..."),
            CoreMessage::new(2, "My core strength is in strategic planning..."),
            CoreMessage::new(3, "I excel at building and motivating teams..."),
        ]
    }

    pub fn next_message_id(&self) -> u64 {
        self.core_messages.iter().map(|m| m.id).max().unwrap_or(0) + 1
    }

    pub fn next_question_id(&self) -> u64 {
        next_question_id(&self.custom_questions)
    }
}

impl Default for PracticeData {
    fn default() -> Self {
        Self {
            core_messages: Self::default_core_messages(),
            custom_questions: Vec::new(),
        }
    }
}

/// Mock interview snapshot stored in the dedicated `mock_data` row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MockData {
    pub mock_questions: Vec<Question>,
}

impl MockData {
    pub fn next_question_id(&self) -> u64 {
        next_question_id(&self.mock_questions)
    }
}

fn next_question_id(questions: &[Question]) -> u64 {
    questions.iter().map(|q| q.id).max().unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_practice_data() {
        let data = PracticeData::default();
        assert_eq!(data.core_messages.len(), 3);
        assert!(data.custom_questions.is_empty());
        assert_eq!(data.next_message_id(), 4);
        assert_eq!(data.next_question_id(), 1);
    }

    #[test]
    fn test_question_field_names() {
        let question = Question::new(7, "Why you?", "Personal").with_sample_answer("Because...");
        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(json["sampleAnswer"], "Because...");

        let data = PracticeData {
            core_messages: Vec::new(),
            custom_questions: vec![question],
        };
        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("coreMessages").is_some());
        assert_eq!(json["customQuestions"][0]["id"], 7);
    }

    #[test]
    fn test_timestamp_ids_load() {
        let stored = serde_json::json!({
            "coreMessages": [{"id": 1, "text": "mine"}],
            "customQuestions": [
                {"id": 1717000000000u64, "text": "Why now?", "category": "Personal"}
            ]
        });

        let data: PracticeData = serde_json::from_value(stored).unwrap();

        assert_eq!(data.custom_questions[0].id, 1_717_000_000_000);
        assert_eq!(data.next_question_id(), 1_717_000_000_001);
    }

    #[test]
    fn test_mock_next_id_skips_gaps() {
        let data = MockData {
            mock_questions: vec![Question::new(2, "a", "x"), Question::new(9, "b", "x")],
        };
        assert_eq!(data.next_question_id(), 10);
    }
}

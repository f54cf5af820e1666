use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id of the document every user starts with. It can never be deleted.
pub const DEFAULT_DOCUMENT_ID: &str = "default-advocacy";

/// An advocacy plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdvocacyDocument {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub advocate_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, rename = "abstract")]
    pub summary: String,
    #[serde(default)]
    pub introduction: String,
    #[serde(default)]
    pub problem_statement: String,
    #[serde(default)]
    pub general_objective: String,
    #[serde(default)]
    pub specific_objectives: String,
    #[serde(default)]
    pub significance: String,
    #[serde(default)]
    pub methodology: String,
    #[serde(default)]
    pub expected_outcomes: String,
    #[serde(default)]
    pub conclusion: String,
    #[serde(default)]
    pub references: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl AdvocacyDocument {
    /// Creates a document pre-filled with the plan template.
    pub fn new(id: impl Into<String>, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            advocate_name: "Your Name / Group Name".to_string(),
            date: now.format("%B %-d, %Y").to_string(),
            summary: String::new(),
            introduction: String::new(),
            problem_statement: String::new(),
            general_objective: String::new(),
            specific_objectives: "• \n• \n• ".to_string(),
            significance: String::new(),
            methodology: String::new(),
            expected_outcomes: String::new(),
            conclusion: String::new(),
            references: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The protected document created on first run.
    pub fn default_document(now: DateTime<Utc>) -> Self {
        Self::new(DEFAULT_DOCUMENT_ID, "Your Advocacy Title", now)
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_DOCUMENT_ID
    }
}

/// Advocacy snapshot: every document the user owns, keyed by id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(from = "StoredAdvocacy")]
pub struct AdvocacyState {
    pub documents: BTreeMap<String, AdvocacyDocument>,
}

impl AdvocacyState {
    /// State holding only the protected default document.
    pub fn with_default_document(now: DateTime<Utc>) -> Self {
        let doc = AdvocacyDocument::default_document(now);
        let mut documents = BTreeMap::new();
        documents.insert(doc.id.clone(), doc);
        Self { documents }
    }

    /// Documents in display order: oldest first, ties broken by id.
    pub fn ordered(&self) -> Vec<&AdvocacyDocument> {
        let mut docs: Vec<_> = self.documents.values().collect();
        docs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        docs
    }

    pub fn get(&self, id: &str) -> Option<&AdvocacyDocument> {
        self.documents.get(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Accepted stored shapes: a single plan from before multi-document
/// support, or the document map.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredAdvocacy {
    Single(AdvocacyDocument),
    Documents {
        #[serde(default)]
        documents: BTreeMap<String, AdvocacyDocument>,
    },
}

impl From<StoredAdvocacy> for AdvocacyState {
    fn from(stored: StoredAdvocacy) -> Self {
        let now = Utc::now();
        let fill = |id: String, mut doc: AdvocacyDocument| {
            doc.id = id;
            if doc.created_at == DateTime::<Utc>::default() {
                doc.created_at = now;
            }
            if doc.updated_at < doc.created_at {
                doc.updated_at = doc.created_at;
            }
            doc
        };

        let documents = match stored {
            StoredAdvocacy::Single(doc) => {
                let doc = fill(DEFAULT_DOCUMENT_ID.to_string(), doc);
                BTreeMap::from([(doc.id.clone(), doc)])
            }
            StoredAdvocacy::Documents { documents } => documents
                .into_iter()
                .map(|(id, doc)| (id.clone(), fill(id, doc)))
                .collect(),
        };
        Self { documents }
    }
}

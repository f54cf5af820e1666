use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::models::AdvocacyDocument;

/// Editable text fields of an advocacy document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdvocacyField {
    Title,
    AdvocateName,
    Date,
    Abstract,
    Introduction,
    ProblemStatement,
    GeneralObjective,
    SpecificObjectives,
    Significance,
    Methodology,
    ExpectedOutcomes,
    Conclusion,
    References,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown advocacy field '{0}'")]
pub struct ParseFieldError(pub String);

impl AdvocacyField {
    pub const ALL: [AdvocacyField; 13] = [
        AdvocacyField::Title,
        AdvocacyField::AdvocateName,
        AdvocacyField::Date,
        AdvocacyField::Abstract,
        AdvocacyField::Introduction,
        AdvocacyField::ProblemStatement,
        AdvocacyField::GeneralObjective,
        AdvocacyField::SpecificObjectives,
        AdvocacyField::Significance,
        AdvocacyField::Methodology,
        AdvocacyField::ExpectedOutcomes,
        AdvocacyField::Conclusion,
        AdvocacyField::References,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdvocacyField::Title => "title",
            AdvocacyField::AdvocateName => "advocate-name",
            AdvocacyField::Date => "date",
            AdvocacyField::Abstract => "abstract",
            AdvocacyField::Introduction => "introduction",
            AdvocacyField::ProblemStatement => "problem-statement",
            AdvocacyField::GeneralObjective => "general-objective",
            AdvocacyField::SpecificObjectives => "specific-objectives",
            AdvocacyField::Significance => "significance",
            AdvocacyField::Methodology => "methodology",
            AdvocacyField::ExpectedOutcomes => "expected-outcomes",
            AdvocacyField::Conclusion => "conclusion",
            AdvocacyField::References => "references",
        }
    }

    /// Human-readable section heading.
    pub fn label(&self) -> &'static str {
        match self {
            AdvocacyField::Title => "Title",
            AdvocacyField::AdvocateName => "Advocate",
            AdvocacyField::Date => "Date",
            AdvocacyField::Abstract => "Abstract",
            AdvocacyField::Introduction => "Introduction",
            AdvocacyField::ProblemStatement => "Problem Statement",
            AdvocacyField::GeneralObjective => "General Objective",
            AdvocacyField::SpecificObjectives => "Specific Objectives",
            AdvocacyField::Significance => "Significance",
            AdvocacyField::Methodology => "Methodology",
            AdvocacyField::ExpectedOutcomes => "Expected Outcomes",
            AdvocacyField::Conclusion => "Conclusion",
            AdvocacyField::References => "References",
        }
    }

    pub fn get<'a>(&self, doc: &'a AdvocacyDocument) -> &'a str {
        match self {
            AdvocacyField::Title => &doc.title,
            AdvocacyField::AdvocateName => &doc.advocate_name,
            AdvocacyField::Date => &doc.date,
            AdvocacyField::Abstract => &doc.summary,
            AdvocacyField::Introduction => &doc.introduction,
            AdvocacyField::ProblemStatement => &doc.problem_statement,
            AdvocacyField::GeneralObjective => &doc.general_objective,
            AdvocacyField::SpecificObjectives => &doc.specific_objectives,
            AdvocacyField::Significance => &doc.significance,
            AdvocacyField::Methodology => &doc.methodology,
            AdvocacyField::ExpectedOutcomes => &doc.expected_outcomes,
            AdvocacyField::Conclusion => &doc.conclusion,
            AdvocacyField::References => &doc.references,
        }
    }

    pub fn set(&self, doc: &mut AdvocacyDocument, value: String) {
        let slot = match self {
            AdvocacyField::Title => &mut doc.title,
            AdvocacyField::AdvocateName => &mut doc.advocate_name,
            AdvocacyField::Date => &mut doc.date,
            AdvocacyField::Abstract => &mut doc.summary,
            AdvocacyField::Introduction => &mut doc.introduction,
            AdvocacyField::ProblemStatement => &mut doc.problem_statement,
            AdvocacyField::GeneralObjective => &mut doc.general_objective,
            AdvocacyField::SpecificObjectives => &mut doc.specific_objectives,
            AdvocacyField::Significance => &mut doc.significance,
            AdvocacyField::Methodology => &mut doc.methodology,
            AdvocacyField::ExpectedOutcomes => &mut doc.expected_outcomes,
            AdvocacyField::Conclusion => &mut doc.conclusion,
            AdvocacyField::References => &mut doc.references,
        };
        *slot = value;
    }
}

impl fmt::Display for AdvocacyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdvocacyField {
    type Err = ParseFieldError;

    /// Accepts kebab-case, snake_case or camelCase names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().replace('-', "") == normalized)
            .ok_or_else(|| ParseFieldError(s.to_string()))
    }
}

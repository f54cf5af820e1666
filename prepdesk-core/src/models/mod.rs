mod advocacy;
mod dashboard;
mod practice;

pub use advocacy::{AdvocacyDocument, AdvocacyState, DEFAULT_DOCUMENT_ID};
pub use dashboard::{DashboardState, Stats, Task, Week};
pub use practice::{CoreMessage, MockData, PracticeData, Question};

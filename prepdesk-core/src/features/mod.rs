//! Synchronized features.
//!
//! Each feature pairs a snapshot type from [`crate::models`] with a patch
//! type and its storage locations:
//!
//! | feature   | mirror key           | remote slots                               |
//! |-----------|----------------------|--------------------------------------------|
//! | dashboard | `dashboard-state`    | `profiles.dashboard_data`                  |
//! | practice  | `practice-state`     | `practice_data`, `profiles.practice_data`  |
//! | mock      | `mock-state`         | `mock_data`                                |
//! | advocacy  | `advocacy-documents` | `profiles.advocacy_data`                   |

mod advocacy;
mod dashboard;
mod mock;
mod practice;

pub use advocacy::{AdvocacyFeature, AdvocacyPatch};
pub use dashboard::{today_gmt8, DashboardFeature, DashboardPatch};
pub use mock::{MockFeature, MockPatch};
pub use practice::{PracticeFeature, PracticePatch};

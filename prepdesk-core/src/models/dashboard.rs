use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A daily practice task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub completed: bool,
    pub time_estimate: u32, // minutes
}

impl Task {
    pub fn new(id: u32, title: impl Into<String>, time_estimate: u32) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
            time_estimate,
        }
    }
}

/// One week of the training program.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Week {
    pub number: u32,
    pub title: String,
    pub completed: bool,
    pub current: bool,
}

impl Week {
    pub fn new(number: u32, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            completed: false,
            current: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub time_practiced: u32, // minutes
    pub questions_answered: u32,
}

/// Dashboard snapshot: daily tasks, program weeks and streak counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", from = "StoredDashboard")]
pub struct DashboardState {
    pub tasks: Vec<Task>,
    pub weeks: Vec<Week>,
    pub stats: Stats,
    pub streak: u32,
    pub last_streak_date: Option<NaiveDate>,
    pub last_task_reset_date: Option<NaiveDate>,
}

impl DashboardState {
    pub fn default_tasks() -> Vec<Task> {
        vec![
            Task::new(1, "Practice Q&A Session + Answer 3 Questions", 30),
            Task::new(2, "Breathing Exercises + Answer 3 Questions", 10),
            Task::new(3, "Speech Drills + Answer 3 Questions", 15),
            Task::new(4, "Review Advocacy Plan + Answer 3 Questions", 20),
            Task::new(5, "Watch Expert Q&A Videos + Answer 3 Questions", 25),
        ]
    }

    pub fn initial_weeks() -> Vec<Week> {
        let mut weeks = vec![
            Week::new(1, "Foundation Building"),
            Week::new(2, "Core Skills Development"),
            Week::new(3, "Advanced Techniques"),
            Week::new(4, "Mock Practice Sessions"),
            Week::new(5, "Refinement & Polish"),
            Week::new(6, "Final Preparation"),
        ];
        weeks[0].current = true;
        weeks
    }

    pub fn task(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn current_week(&self) -> Option<&Week> {
        self.weeks.iter().find(|w| w.current)
    }

    pub fn all_tasks_completed(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| t.completed)
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            tasks: Self::default_tasks(),
            weeks: Self::initial_weeks(),
            stats: Stats::default(),
            streak: 0,
            last_streak_date: None,
            last_task_reset_date: None,
        }
    }
}

/// Stored dashboard shape. Missing and `null` fields both fall back to the
/// program defaults.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct StoredDashboard {
    tasks: Option<Vec<Task>>,
    weeks: Option<Vec<Week>>,
    stats: Option<Stats>,
    streak: Option<u32>,
    last_streak_date: Option<NaiveDate>,
    last_task_reset_date: Option<NaiveDate>,
}

impl From<StoredDashboard> for DashboardState {
    fn from(stored: StoredDashboard) -> Self {
        let defaults = DashboardState::default();
        Self {
            tasks: stored.tasks.unwrap_or(defaults.tasks),
            weeks: stored.weeks.unwrap_or(defaults.weeks),
            stats: stored.stats.unwrap_or(defaults.stats),
            streak: stored.streak.unwrap_or(defaults.streak),
            last_streak_date: stored.last_streak_date,
            last_task_reset_date: stored.last_task_reset_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_program() {
        let state = DashboardState::default();
        assert_eq!(state.tasks.len(), 5);
        assert_eq!(state.weeks.len(), 6);
        assert_eq!(state.current_week().map(|w| w.number), Some(1));
        assert!(!state.all_tasks_completed());
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut state = DashboardState::default();
        state.last_streak_date = NaiveDate::from_ymd_opt(2026, 3, 4);
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["tasks"][0]["timeEstimate"], 30);
        assert_eq!(json["stats"]["timePracticed"], 0);
        assert_eq!(json["lastStreakDate"], "2026-03-04");
        assert!(json["lastTaskResetDate"].is_null());
    }

    #[test]
    fn test_missing_fields_fill_defaults() {
        let state: DashboardState = serde_json::from_str(r#"{"streak": 4}"#).unwrap();
        assert_eq!(state.streak, 4);
        assert_eq!(state.tasks, DashboardState::default_tasks());
        assert_eq!(state.weeks, DashboardState::initial_weeks());
    }

    #[test]
    fn test_null_fields_fill_defaults() {
        let state: DashboardState =
            serde_json::from_str(r#"{"tasks": null, "weeks": null, "stats": null, "streak": 2}"#)
                .unwrap();
        assert_eq!(state.tasks, DashboardState::default_tasks());
        assert_eq!(state.weeks, DashboardState::initial_weeks());
        assert_eq!(state.stats, Stats::default());
        assert_eq!(state.streak, 2);
    }
}

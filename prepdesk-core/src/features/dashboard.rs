use chrono::{FixedOffset, NaiveDate, Utc};

use crate::models::{DashboardState, Stats, Task, Week};
use crate::remote::Slot;
use crate::sync::Feature;

/// Questions credited for completing a task.
const QUESTIONS_PER_TASK: u32 = 3;

/// Streak length that completes a program week.
const STREAK_PER_WEEK: u32 = 7;

/// Daily tasks roll over at midnight GMT+8.
const DAY_OFFSET_SECS: i32 = 8 * 60 * 60;

/// Today's calendar date in GMT+8.
pub fn today_gmt8() -> NaiveDate {
    match FixedOffset::east_opt(DAY_OFFSET_SECS) {
        Some(offset) => Utc::now().with_timezone(&offset).date_naive(),
        None => Utc::now().date_naive(),
    }
}

pub struct DashboardFeature;

/// Partial dashboard update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardPatch {
    pub tasks: Option<Vec<Task>>,
    pub weeks: Option<Vec<Week>>,
    pub stats: Option<Stats>,
    pub streak: Option<u32>,
    pub last_streak_date: Option<Option<NaiveDate>>,
    pub last_task_reset_date: Option<Option<NaiveDate>>,
}

impl DashboardPatch {
    /// Every field, set to the program's starting values.
    pub fn reset_all() -> Self {
        let state = DashboardState::default();
        Self {
            tasks: Some(state.tasks),
            weeks: Some(state.weeks),
            stats: Some(state.stats),
            streak: Some(state.streak),
            last_streak_date: Some(state.last_streak_date),
            last_task_reset_date: Some(state.last_task_reset_date),
        }
    }

    /// Clears task completion once per day.
    ///
    /// Returns `None` if the tasks were already reset `today`.
    pub fn daily_reset(state: &DashboardState, today: NaiveDate) -> Option<Self> {
        if state.last_task_reset_date == Some(today) {
            return None;
        }
        Some(Self {
            tasks: Some(cleared(&state.tasks)),
            last_task_reset_date: Some(Some(today)),
            ..Default::default()
        })
    }

    /// Flips task `id` and updates stats, streak and week progress.
    ///
    /// Returns `None` for an unknown task.
    pub fn toggle_task(state: &DashboardState, id: u32, today: NaiveDate) -> Option<Self> {
        let was_completed = state.task(id)?.completed;
        let mut tasks = state.tasks.clone();
        let mut time_estimate = 0;
        for task in tasks.iter_mut().filter(|t| t.id == id) {
            task.completed = !task.completed;
            time_estimate = task.time_estimate;
        }

        let stats = if was_completed {
            Stats {
                time_practiced: state.stats.time_practiced.saturating_sub(time_estimate),
                questions_answered: state
                    .stats
                    .questions_answered
                    .saturating_sub(QUESTIONS_PER_TASK),
            }
        } else {
            Stats {
                time_practiced: state.stats.time_practiced + time_estimate,
                questions_answered: state.stats.questions_answered + QUESTIONS_PER_TASK,
            }
        };

        let all_completed = tasks.iter().all(|t| t.completed);
        let mut patch = Self {
            stats: Some(stats),
            ..Default::default()
        };

        if all_completed && state.last_streak_date != Some(today) {
            let streak = state.streak + 1;
            patch.streak = Some(streak);
            patch.last_streak_date = Some(Some(today));

            if streak >= STREAK_PER_WEEK {
                patch.streak = Some(0);
                patch.weeks = Some(advance_week(&state.weeks));
                tasks = cleared(&tasks);
                patch.last_task_reset_date = Some(Some(today));
            }
        }

        patch.tasks = Some(tasks);
        Some(patch)
    }
}

fn cleared(tasks: &[Task]) -> Vec<Task> {
    tasks
        .iter()
        .cloned()
        .map(|mut t| {
            t.completed = false;
            t
        })
        .collect()
}

/// Completes the current week and makes the next one current.
fn advance_week(weeks: &[Week]) -> Vec<Week> {
    let mut weeks = weeks.to_vec();
    if let Some(index) = weeks.iter().position(|w| w.current) {
        weeks[index].completed = true;
        weeks[index].current = false;
        if let Some(next) = weeks.get_mut(index + 1) {
            next.current = true;
        }
    }
    weeks
}

impl Feature for DashboardFeature {
    type State = DashboardState;
    type Patch = DashboardPatch;
    const NAME: &'static str = "dashboard";
    const MIRROR_KEY: &'static str = "dashboard-state";

    fn default_state() -> DashboardState {
        DashboardState::default()
    }

    fn merge(state: &mut DashboardState, patch: DashboardPatch) {
        if let Some(tasks) = patch.tasks {
            state.tasks = tasks;
        }
        if let Some(weeks) = patch.weeks {
            state.weeks = weeks;
        }
        if let Some(stats) = patch.stats {
            state.stats = stats;
        }
        if let Some(streak) = patch.streak {
            state.streak = streak;
        }
        if let Some(date) = patch.last_streak_date {
            state.last_streak_date = date;
        }
        if let Some(date) = patch.last_task_reset_date {
            state.last_task_reset_date = date;
        }
    }

    fn targets() -> Vec<Slot> {
        vec![Slot::PROFILES_DASHBOARD]
    }
}

//! Dashboard commands: daily tasks, streak and program weeks.

use clap::{Args, Subcommand};
use prepdesk_core::features::today_gmt8;
use prepdesk_core::{DashboardFeature, DashboardPatch, DashboardState, SyncCoordinator};

use super::{finish, print_json, report_load, OutputFormat};
use crate::backend;
use crate::config::Config;

/// Track daily practice tasks
#[derive(Args)]
pub struct DashboardCommand {
    #[command(subcommand)]
    pub command: DashboardSubcommand,
}

#[derive(Subcommand)]
pub enum DashboardSubcommand {
    /// Show today's tasks, stats and program progress
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Mark a task done (or not done)
    Toggle {
        /// Task ID
        id: u32,
    },

    /// Reset all dashboard progress
    Reset {
        /// Skip confirmation
        #[arg(long, short)]
        force: bool,
    },
}

impl DashboardCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run_async(config))
    }

    async fn run_async(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let (mirror, remote) = backend::open(config);
        let mut sync = SyncCoordinator::<DashboardFeature, _, _>::new(mirror, remote);
        sync.initialize().await;
        report_load(&sync);

        let today = today_gmt8();
        if let Some(patch) = DashboardPatch::daily_reset(sync.state(), today) {
            sync.apply(patch);
        }

        let result = match &self.command {
            DashboardSubcommand::Show { format } => match format {
                OutputFormat::Json => print_json(sync.state()),
                OutputFormat::Text => {
                    print_dashboard(sync.state());
                    Ok(())
                }
            },
            DashboardSubcommand::Toggle { id } => {
                match DashboardPatch::toggle_task(sync.state(), *id, today) {
                    Some(patch) => {
                        sync.apply(patch);
                        print_toggle(sync.state(), *id);
                        Ok(())
                    }
                    None => Err(format!("Task not found: {}", id).into()),
                }
            }
            DashboardSubcommand::Reset { force } => {
                if !force {
                    println!("This resets tasks, weeks, stats and streak.");
                    println!("Run again with --force to confirm.");
                    Ok(())
                } else {
                    sync.commit(DashboardPatch::reset_all()).await;
                    if let Some(e) = sync.last_write_error() {
                        eprintln!("Warning: {} (reset kept locally)", e);
                    }
                    println!("Dashboard reset.");
                    Ok(())
                }
            }
        };

        finish(&mut sync).await;
        result
    }
}

fn print_toggle(state: &DashboardState, id: u32) {
    if let Some(task) = state.task(id) {
        let mark = if task.completed { "done" } else { "not done" };
        println!("Task {} marked {}: {}", task.id, mark, task.title);
    }
    if state.all_tasks_completed() {
        println!("All tasks complete. Streak: {}", state.streak);
    }
}

fn print_dashboard(state: &DashboardState) {
    match state.current_week() {
        Some(week) => println!("Week {}: {}", week.number, week.title),
        None => println!("Program complete"),
    }
    println!(
        "Streak: {} day{}",
        state.streak,
        if state.streak == 1 { "" } else { "s" }
    );
    println!(
        "Practiced: {} min, {} questions answered",
        state.stats.time_practiced, state.stats.questions_answered
    );
    println!();

    println!("Today's tasks");
    println!("-------------");
    for task in &state.tasks {
        let mark = if task.completed { "x" } else { " " };
        println!(
            "  [{}] {}. {} ({} min)",
            mark, task.id, task.title, task.time_estimate
        );
    }
    println!();

    println!("Weeks");
    println!("-----");
    for week in &state.weeks {
        let status = if week.completed {
            "completed"
        } else if week.current {
            "current"
        } else {
            ""
        };
        println!("  {}. {:<28} {}", week.number, week.title, status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigSource, ConfigValue, RemoteConfig};
    use prepdesk_core::mirror::read_snapshot;
    use prepdesk_core::FileMirror;
    use tempfile::tempdir;

    fn offline_config(dir: &std::path::Path) -> Config {
        Config {
            data_dir: ConfigValue::new(dir.to_path_buf(), ConfigSource::Default),
            config_file: None,
            remote: RemoteConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_toggle_offline_keeps_edit_locally() {
        let temp_dir = tempdir().unwrap();
        let config = offline_config(temp_dir.path());
        let cmd = DashboardCommand {
            command: DashboardSubcommand::Toggle { id: 1 },
        };

        cmd.run_async(&config).await.unwrap();

        let mirror = FileMirror::new(temp_dir.path().to_path_buf());
        let state: DashboardState = read_snapshot(&mirror, "dashboard-state").unwrap();
        assert!(state.task(1).unwrap().completed);
        assert_eq!(state.stats.time_practiced, 30);
        assert_eq!(state.last_task_reset_date, Some(today_gmt8()));
    }

    #[tokio::test]
    async fn test_toggle_unknown_task_fails() {
        let temp_dir = tempdir().unwrap();
        let config = offline_config(temp_dir.path());
        let cmd = DashboardCommand {
            command: DashboardSubcommand::Toggle { id: 99 },
        };

        let err = cmd.run_async(&config).await.unwrap_err();
        assert!(err.to_string().contains("Task not found"));
    }
}

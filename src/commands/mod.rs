mod advocacy;
mod config_cmd;
mod dashboard;
mod mock;
mod practice;

pub use advocacy::AdvocacyCommand;
pub use config_cmd::ConfigCommand;
pub use dashboard::DashboardCommand;
pub use mock::MockCommand;
pub use practice::PracticeCommand;

use clap::ValueEnum;
use prepdesk_core::{Feature, LocalMirror, RemoteStore, SyncCoordinator};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Warns about a failed load. The command still runs on the best available state.
fn report_load<F, M, R>(sync: &SyncCoordinator<F, M, R>)
where
    F: Feature,
    M: LocalMirror,
    R: RemoteStore,
{
    for warning in load_warnings(sync) {
        eprintln!("Warning: {}", warning);
    }
}

fn load_warnings<F, M, R>(sync: &SyncCoordinator<F, M, R>) -> Vec<String>
where
    F: Feature,
    M: LocalMirror,
    R: RemoteStore,
{
    let mut warnings = Vec::new();
    if let Some(e) = sync.load_error() {
        warnings.push(format!("{} (using local or default data)", e));
    }
    if !sync.is_remote_writable() {
        warnings.push("changes will be kept locally until the stored data is fixed".to_string());
    }
    warnings
}

/// Sends pending edits before the process exits and reports a failed write.
async fn finish<F, M, R>(sync: &mut SyncCoordinator<F, M, R>)
where
    F: Feature,
    M: LocalMirror,
    R: RemoteStore,
{
    if sync.flush_on_suspend().await {
        if let Some(e) = sync.last_write_error() {
            eprintln!("Warning: {} (changes kept locally)", e);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

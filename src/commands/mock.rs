use clap::{Args, Subcommand};
use prepdesk_core::{MockData, MockFeature, MockPatch, SyncCoordinator};

use super::{finish, print_json, report_load, OutputFormat};
use crate::backend;
use crate::config::Config;

/// Manage mock interview questions
#[derive(Args)]
pub struct MockCommand {
    #[command(subcommand)]
    pub command: MockSubcommand,
}

#[derive(Subcommand)]
pub enum MockSubcommand {
    /// List mock interview questions
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a mock interview question
    Add {
        /// Question text
        text: String,

        /// Question category
        #[arg(long, short, default_value = "General")]
        category: String,
    },

    /// Remove a mock interview question
    Remove {
        /// Question ID
        id: u64,
    },
}

impl MockCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run_async(config))
    }

    async fn run_async(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let (mirror, remote) = backend::open(config);
        let mut sync = SyncCoordinator::<MockFeature, _, _>::new(mirror, remote);
        sync.initialize().await;
        report_load(&sync);

        let state = sync.state();
        let result = match &self.command {
            MockSubcommand::Show { format } => match format {
                OutputFormat::Json => print_json(state),
                OutputFormat::Text => {
                    print_mock(state);
                    Ok(())
                }
            },
            MockSubcommand::Add { text, category } => {
                let patch = MockPatch::add_question(state, text, category);
                let id = state.next_question_id();
                sync.apply(patch);
                println!("Added mock question {}", id);
                Ok(())
            }
            MockSubcommand::Remove { id } => match MockPatch::remove_question(state, *id) {
                Some(patch) => {
                    sync.apply(patch);
                    println!("Removed mock question {}", id);
                    Ok(())
                }
                None => Err(format!("Mock question not found: {}", id).into()),
            },
        };

        finish(&mut sync).await;
        result
    }
}

fn print_mock(state: &MockData) {
    if state.mock_questions.is_empty() {
        println!("No mock questions yet.");
        println!("Add one with 'prep mock add \"<question>\"'.");
        return;
    }
    for question in &state.mock_questions {
        println!("  {}. [{}] {}", question.id, question.category, question.text);
    }
}

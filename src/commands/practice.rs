use clap::{Args, Subcommand};
use prepdesk_core::{PracticeData, PracticeFeature, PracticePatch, SyncCoordinator};

use super::{finish, print_json, report_load, OutputFormat};
use crate::backend;
use crate::config::Config;

/// Manage core messages and custom practice questions
#[derive(Args)]
pub struct PracticeCommand {
    #[command(subcommand)]
    pub command: PracticeSubcommand,
}

#[derive(Subcommand)]
pub enum PracticeSubcommand {
    /// Show core messages and custom questions
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a core message
    AddMessage {
        /// Message text
        text: String,
    },

    /// Replace the text of a core message
    EditMessage {
        /// Message ID
        id: u64,
        /// New text
        text: String,
    },

    /// Remove a core message
    RemoveMessage {
        /// Message ID
        id: u64,
    },

    /// Add a custom practice question
    AddQuestion {
        /// Question text
        text: String,

        /// Question category
        #[arg(long, short, default_value = "General")]
        category: String,

        /// Sample answer
        #[arg(long, short, default_value = "")]
        answer: String,
    },

    /// Remove a custom practice question
    RemoveQuestion {
        /// Question ID
        id: u64,
    },
}

impl PracticeCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run_async(config))
    }

    async fn run_async(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let (mirror, remote) = backend::open(config);
        let mut sync = SyncCoordinator::<PracticeFeature, _, _>::new(mirror, remote);
        sync.initialize().await;
        report_load(&sync);

        let state = sync.state();
        let result = match &self.command {
            PracticeSubcommand::Show { format } => match format {
                OutputFormat::Json => print_json(state),
                OutputFormat::Text => {
                    print_practice(state);
                    Ok(())
                }
            },
            PracticeSubcommand::AddMessage { text } => {
                let patch = PracticePatch::add_core_message(state, text);
                let id = state.next_message_id();
                sync.apply(patch);
                println!("Added core message {}", id);
                Ok(())
            }
            PracticeSubcommand::EditMessage { id, text } => {
                match PracticePatch::edit_core_message(state, *id, text) {
                    Some(patch) => {
                        sync.apply(patch);
                        println!("Updated core message {}", id);
                        Ok(())
                    }
                    None => Err(format!("Core message not found: {}", id).into()),
                }
            }
            PracticeSubcommand::RemoveMessage { id } => {
                match PracticePatch::remove_core_message(state, *id) {
                    Some(patch) => {
                        sync.apply(patch);
                        println!("Removed core message {}", id);
                        Ok(())
                    }
                    None => Err(format!("Core message not found: {}", id).into()),
                }
            }
            PracticeSubcommand::AddQuestion {
                text,
                category,
                answer,
            } => {
                let patch = PracticePatch::add_custom_question(state, text, category, answer);
                let id = state.next_question_id();
                sync.apply(patch);
                println!("Added question {}", id);
                Ok(())
            }
            PracticeSubcommand::RemoveQuestion { id } => {
                match PracticePatch::remove_custom_question(state, *id) {
                    Some(patch) => {
                        sync.apply(patch);
                        println!("Removed question {}", id);
                        Ok(())
                    }
                    None => Err(format!("Question not found: {}", id).into()),
                }
            }
        };

        finish(&mut sync).await;
        result
    }
}

fn print_practice(state: &PracticeData) {
    println!("Core messages");
    println!("-------------");
    for message in &state.core_messages {
        println!("  {}. {}", message.id, message.text);
    }
    println!();

    println!("Custom questions");
    println!("----------------");
    if state.custom_questions.is_empty() {
        println!("  (none)");
    }
    for question in &state.custom_questions {
        println!("  {}. [{}] {}", question.id, question.category, question.text);
        if !question.sample_answer.is_empty() {
            println!("     Sample answer: {}", question.sample_answer);
        }
    }
}

//! Advocacy plan commands.

use clap::{Args, Subcommand};
use prepdesk_core::{
    AdvocacyDocument, AdvocacyField, DocumentManager, LocalMirror, RemoteStore, SyncCoordinator,
    MAX_DOCUMENTS,
};

use super::{finish, print_json, report_load, OutputFormat};
use crate::backend;
use crate::config::Config;

/// Manage advocacy plans
#[derive(Args)]
pub struct AdvocacyCommand {
    #[command(subcommand)]
    pub command: AdvocacySubcommand,
}

#[derive(Subcommand)]
pub enum AdvocacySubcommand {
    /// List advocacy plans
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a plan (the active one by default)
    Show {
        /// Document ID
        id: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Create a new plan from the template and make it active
    Create,

    /// Make a plan the active one
    Select {
        /// Document ID
        id: String,
    },

    /// Rename a plan
    Rename {
        /// Document ID
        id: String,
        /// New title
        title: String,
    },

    /// Set one section of a plan
    Edit {
        /// Document ID
        id: String,
        /// Section name (e.g. problem-statement, abstract, references)
        field: AdvocacyField,
        /// New content
        value: String,
    },

    /// Delete a plan
    Delete {
        /// Document ID
        id: String,
    },
}

impl AdvocacyCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run_async(config))
    }

    async fn run_async(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let (mirror, remote) = backend::open(config);
        let mut manager = DocumentManager::new(SyncCoordinator::new(mirror, remote));
        manager.initialize().await;
        report_load(manager.sync());

        let result = self.execute(&mut manager);

        finish(manager.sync_mut()).await;
        result
    }

    fn execute<M, R>(
        &self,
        manager: &mut DocumentManager<M, R>,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        M: LocalMirror,
        R: RemoteStore,
    {
        match &self.command {
            AdvocacySubcommand::List { format } => {
                let documents = manager.documents();
                match format {
                    OutputFormat::Json => print_json(&documents),
                    OutputFormat::Text => {
                        let active = manager.active_id();
                        for doc in &documents {
                            let marker = if Some(doc.id.as_str()) == active { "*" } else { " " };
                            println!("{} {}  {}", marker, doc.id, doc.title);
                        }
                        println!();
                        println!("{} of {} plans", documents.len(), MAX_DOCUMENTS);
                        Ok(())
                    }
                }
            }
            AdvocacySubcommand::Show { id, format } => {
                let doc = match id {
                    Some(id) => manager.get(id),
                    None => manager.active(),
                }
                .ok_or_else(|| {
                    format!("Advocacy plan not found: {}", id.as_deref().unwrap_or("(active)"))
                })?;
                match format {
                    OutputFormat::Json => print_json(doc),
                    OutputFormat::Text => {
                        print_document(doc);
                        Ok(())
                    }
                }
            }
            AdvocacySubcommand::Create => match manager.create() {
                Some(id) => {
                    println!("Created advocacy plan {}", id);
                    Ok(())
                }
                None => Err(format!(
                    "Cannot create more than {} advocacy plans",
                    MAX_DOCUMENTS
                )
                .into()),
            },
            AdvocacySubcommand::Select { id } => {
                if manager.select(id) {
                    println!("Active plan: {}", id);
                    Ok(())
                } else {
                    Err(format!("Advocacy plan not found: {}", id).into())
                }
            }
            AdvocacySubcommand::Rename { id, title } => {
                if manager.get(id).is_none() {
                    return Err(format!("Advocacy plan not found: {}", id).into());
                }
                if manager.rename(id, title) {
                    println!("Renamed {} to '{}'", id, title.trim());
                    Ok(())
                } else {
                    Err("Title cannot be empty".into())
                }
            }
            AdvocacySubcommand::Edit { id, field, value } => {
                if manager.update_field(id, *field, value.as_str()) {
                    println!("Updated {} of {}", field.label(), id);
                    Ok(())
                } else {
                    Err(format!("Advocacy plan not found: {}", id).into())
                }
            }
            AdvocacySubcommand::Delete { id } => {
                if manager.get(id).is_none() {
                    return Err(format!("Advocacy plan not found: {}", id).into());
                }
                if manager.delete(id) {
                    println!("Deleted advocacy plan {}", id);
                    if let Some(active) = manager.active_id() {
                        println!("Active plan: {}", active);
                    }
                    Ok(())
                } else {
                    Err(format!("Advocacy plan {} cannot be deleted", id).into())
                }
            }
        }
    }
}

fn print_document(doc: &AdvocacyDocument) {
    println!("{}", doc.title);
    println!("{}", "=".repeat(doc.title.chars().count()));
    println!("ID:      {}", doc.id);
    println!("Updated: {}", doc.updated_at.format("%Y-%m-%d %H:%M"));

    for field in AdvocacyField::ALL
        .iter()
        .filter(|f| **f != AdvocacyField::Title)
    {
        println!();
        println!("{}", field.label());
        println!("{}", "-".repeat(field.label().len()));
        let text = field.get(doc);
        if text.trim().is_empty() {
            println!("(empty)");
        } else {
            println!("{}", text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prepdesk_core::{MemoryMirror, MemoryRemote, DEFAULT_DOCUMENT_ID};

    async fn manager() -> DocumentManager<MemoryMirror, MemoryRemote> {
        let mut manager =
            DocumentManager::new(SyncCoordinator::new(MemoryMirror::new(), MemoryRemote::new()));
        manager.initialize().await;
        manager
    }

    fn command(command: AdvocacySubcommand) -> AdvocacyCommand {
        AdvocacyCommand { command }
    }

    #[tokio::test]
    async fn test_edit_sets_field() {
        let mut manager = manager().await;

        command(AdvocacySubcommand::Edit {
            id: DEFAULT_DOCUMENT_ID.to_string(),
            field: AdvocacyField::ProblemStatement,
            value: "Too few libraries".to_string(),
        })
        .execute(&mut manager)
        .unwrap();

        let doc = manager.get(DEFAULT_DOCUMENT_ID).unwrap();
        assert_eq!(doc.problem_statement, "Too few libraries");
    }

    #[tokio::test]
    async fn test_delete_default_is_an_error() {
        let mut manager = manager().await;
        manager.create().unwrap();

        let err = command(AdvocacySubcommand::Delete {
            id: DEFAULT_DOCUMENT_ID.to_string(),
        })
        .execute(&mut manager)
        .unwrap_err();

        assert!(err.to_string().contains("cannot be deleted"));
        assert_eq!(manager.count(), 2);
    }

    #[tokio::test]
    async fn test_blank_rename_is_an_error() {
        let mut manager = manager().await;

        let result = command(AdvocacySubcommand::Rename {
            id: DEFAULT_DOCUMENT_ID.to_string(),
            title: "  ".to_string(),
        })
        .execute(&mut manager);

        assert!(result.is_err());
    }

    #[test]
    fn test_field_parses_from_cli_names() {
        assert_eq!(
            "problem-statement".parse::<AdvocacyField>().unwrap(),
            AdvocacyField::ProblemStatement
        );
    }
}

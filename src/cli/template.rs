//! Template CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use crate::document::{TemplateDocument, ADMIN_TABLE_INDEX};
use crate::error::{MedLogError, MedLogResult};

/// Template subcommands
#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// Write the built-in template to a file for customizing
    Init {
        /// Destination file
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Check that a template file is usable
    Check {
        /// Template file
        path: PathBuf,
    },
}

/// Handle a template command
pub fn handle_template_command(cmd: TemplateCommands) -> MedLogResult<()> {
    match cmd {
        TemplateCommands::Init { path, force } => {
            if path.exists() && !force {
                return Err(MedLogError::AlreadyExists {
                    entity_type: "File",
                    identifier: path.display().to_string(),
                });
            }
            TemplateDocument::builtin().save(&path)?;
            println!("Wrote template to: {}", path.display());
        }

        TemplateCommands::Check { path } => {
            let template = TemplateDocument::load(&path)?;
            let tables = template.tables();
            let admin = tables[ADMIN_TABLE_INDEX];
            println!("Template OK: {}", path.display());
            println!("  Tables:               {}", tables.len());
            println!(
                "  Administration table: {} rows x {} columns",
                admin.row_count(),
                admin.column_count()
            );
        }
    }

    Ok(())
}

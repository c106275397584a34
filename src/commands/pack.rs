use clap::{Args, Subcommand, ValueEnum};

use glow_track_core::{LibraryStore, RoutineLibraryManager};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct PackCommand {
    #[command(subcommand)]
    pub command: PackSubcommand,
}

#[derive(Subcommand)]
pub enum PackSubcommand {
    /// List routine packs
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Create a new routine pack and select it
    Create {
        /// Pack name
        name: String,
    },

    /// Rename the current pack
    Rename {
        /// New name
        name: String,
    },

    /// Delete a pack (the current one if no ID is given)
    Delete {
        /// Pack ID
        id: Option<String>,

        /// Skip the confirmation requirement
        #[arg(long)]
        force: bool,
    },

    /// Select a pack by ID
    Select {
        /// Pack ID
        id: String,
    },
}

impl PackCommand {
    pub async fn run<S: LibraryStore + 'static>(
        &self,
        manager: &RoutineLibraryManager<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            PackSubcommand::List { format } => {
                let summary = manager.library_summary().ok_or("Not signed in")?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&summary)?);
                    }
                    OutputFormat::Text => {
                        for pack in &summary.packs {
                            let marker = if pack.is_current { "*" } else { " " };
                            println!(
                                "{} {}  {}  (updated {})",
                                marker,
                                pack.id,
                                pack.name,
                                pack.updated_at.format("%Y-%m-%d %H:%M")
                            );
                        }
                    }
                }
                Ok(())
            }

            PackSubcommand::Create { name } => {
                let id = manager.create_pack(name)?;
                println!("Created pack '{}' ({})", name.trim(), id);
                Ok(())
            }

            PackSubcommand::Rename { name } => {
                manager.rename_pack(name)?;
                println!("Renamed current pack to '{}'", name.trim());
                Ok(())
            }

            PackSubcommand::Delete { id, force } => {
                // Confirmation lives here at the render boundary; the
                // manager itself never blocks on a prompt.
                if !*force {
                    return Err("Deleting a pack is permanent. Re-run with --force.".into());
                }
                manager.delete_pack(id.as_deref())?;
                println!("Deleted pack");
                Ok(())
            }

            PackSubcommand::Select { id } => {
                manager.select_pack(id).await?;
                println!("Selected pack {}", id);
                Ok(())
            }
        }
    }
}

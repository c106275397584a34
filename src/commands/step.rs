use clap::{Args, Subcommand};

use glow_track_core::{LibraryStore, Mode, RoutineLibraryManager, ShiftDirection};

#[derive(Args)]
pub struct StepCommand {
    #[command(subcommand)]
    pub command: StepSubcommand,
}

#[derive(Subcommand)]
pub enum StepSubcommand {
    /// List the steps of the current pack
    List {
        /// Mode (daytime, nighttime)
        #[arg(long, short)]
        mode: Option<String>,
    },

    /// Add a step
    Add {
        /// Step name
        name: String,

        /// 1-based position (1 prepends; omitted appends)
        #[arg(long, short)]
        position: Option<u32>,

        /// Mode (daytime, nighttime)
        #[arg(long, short)]
        mode: Option<String>,
    },

    /// Move a step one position left or right
    Move {
        /// Step ID
        id: String,

        /// Direction (left, right)
        direction: String,

        /// Mode (daytime, nighttime)
        #[arg(long, short)]
        mode: Option<String>,
    },

    /// Rename a step
    Rename {
        /// Step ID
        id: String,

        /// New name
        name: String,

        /// Mode (daytime, nighttime)
        #[arg(long, short)]
        mode: Option<String>,
    },

    /// Delete a step and its products
    Delete {
        /// Step ID
        id: String,

        /// Mode (daytime, nighttime)
        #[arg(long, short)]
        mode: Option<String>,
    },
}

fn parse_mode(mode: &Option<String>) -> Result<Option<Mode>, String> {
    match mode {
        Some(m) => Ok(Some(m.parse::<Mode>()?)),
        None => Ok(None),
    }
}

fn parse_direction(direction: &str) -> Result<ShiftDirection, String> {
    match direction.to_lowercase().as_str() {
        "left" => Ok(ShiftDirection::Left),
        "right" => Ok(ShiftDirection::Right),
        _ => Err(format!(
            "Invalid direction '{}'. Valid options: left, right",
            direction
        )),
    }
}

impl StepCommand {
    pub async fn run<S: LibraryStore + 'static>(
        &self,
        manager: &RoutineLibraryManager<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            StepSubcommand::List { mode } => {
                let mode = parse_mode(mode).map_err(|e: String| e)?;
                let routine = manager.routine(mode).ok_or("Not signed in")?;
                if routine.steps.is_empty() {
                    println!("No steps yet. Add one with 'glowtrack step add <name>'.");
                    return Ok(());
                }
                for step in routine.ordered_steps() {
                    let spf = if step.is_spf { " [SPF]" } else { "" };
                    println!(
                        "{}. {}{}  ({}, {} products)",
                        step.order,
                        step.name,
                        spf,
                        step.id,
                        routine.products_for(&step.id).len()
                    );
                }
                Ok(())
            }

            StepSubcommand::Add {
                name,
                position,
                mode,
            } => {
                let mode = parse_mode(mode).map_err(|e: String| e)?;
                let id = manager.add_step(mode, name, *position)?;
                println!("Added step '{}' ({})", name.trim(), id);
                Ok(())
            }

            StepSubcommand::Move {
                id,
                direction,
                mode,
            } => {
                let mode = parse_mode(mode).map_err(|e: String| e)?;
                let direction = parse_direction(direction).map_err(|e: String| e)?;
                if manager.move_step(mode, id, direction)? {
                    println!("Moved step {}", id);
                } else {
                    println!("Step {} is already at the boundary", id);
                }
                Ok(())
            }

            StepSubcommand::Rename { id, name, mode } => {
                let mode = parse_mode(mode).map_err(|e: String| e)?;
                manager.rename_step(mode, id, name)?;
                println!("Renamed step {} to '{}'", id, name.trim());
                Ok(())
            }

            StepSubcommand::Delete { id, mode } => {
                let mode = parse_mode(mode).map_err(|e: String| e)?;
                manager.delete_step(mode, id)?;
                println!("Deleted step {}", id);
                Ok(())
            }
        }
    }
}

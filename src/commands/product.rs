use clap::{Args, Subcommand};

use glow_track_core::{LibraryStore, Mode, ProductUpdate, RoutineLibraryManager};

#[derive(Args)]
pub struct ProductCommand {
    #[command(subcommand)]
    pub command: ProductSubcommand,
}

#[derive(Subcommand)]
pub enum ProductSubcommand {
    /// List the products of a step
    List {
        /// Step ID
        step: String,

        /// Mode (daytime, nighttime)
        #[arg(long, short)]
        mode: Option<String>,
    },

    /// Append a placeholder product to a step
    Add {
        /// Step ID
        step: String,

        /// Mode (daytime, nighttime)
        #[arg(long, short)]
        mode: Option<String>,
    },

    /// Edit one product's fields
    Update {
        /// Step ID
        step: String,

        /// 0-based product index
        index: usize,

        /// New name (blank resets to the placeholder)
        #[arg(long, short)]
        name: Option<String>,

        /// Mark the product as done
        #[arg(long, conflicts_with = "uncheck")]
        check: bool,

        /// Mark the product as not done
        #[arg(long)]
        uncheck: bool,

        /// New notes text
        #[arg(long)]
        notes: Option<String>,

        /// Mode (daytime, nighttime)
        #[arg(long, short)]
        mode: Option<String>,
    },

    /// Remove a product from a step (each step keeps at least one)
    Remove {
        /// Step ID
        step: String,

        /// 0-based product index
        index: usize,

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

impl ProductCommand {
    pub async fn run<S: LibraryStore + 'static>(
        &self,
        manager: &RoutineLibraryManager<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ProductSubcommand::List { step, mode } => {
                let mode = parse_mode(mode).map_err(|e: String| e)?;
                let routine = manager.routine(mode).ok_or("Not signed in")?;
                if !routine.has_step(step) {
                    return Err(format!("Step not found: {}", step).into());
                }
                for (index, product) in routine.products_for(step).iter().enumerate() {
                    let icon = if product.checked { "✓" } else { "○" };
                    print!("{} [{}] {}", icon, index, product.name);
                    if !product.notes.is_empty() {
                        print!("  - {}", product.notes);
                    }
                    println!();
                }
                Ok(())
            }

            ProductSubcommand::Add { step, mode } => {
                let mode = parse_mode(mode).map_err(|e: String| e)?;
                manager.add_product(mode, step)?;
                println!("Added product to step {}", step);
                Ok(())
            }

            ProductSubcommand::Update {
                step,
                index,
                name,
                check,
                uncheck,
                notes,
                mode,
            } => {
                let mode = parse_mode(mode).map_err(|e: String| e)?;
                let checked = if *check {
                    Some(true)
                } else if *uncheck {
                    Some(false)
                } else {
                    None
                };
                let update = ProductUpdate {
                    name: name.clone(),
                    checked,
                    notes: notes.clone(),
                };
                manager.update_product(mode, step, *index, update)?;
                println!("Updated product {} of step {}", index, step);
                Ok(())
            }

            ProductSubcommand::Remove { step, index, mode } => {
                let mode = parse_mode(mode).map_err(|e: String| e)?;
                manager.remove_product(mode, step, *index)?;
                println!("Removed product {} from step {}", index, step);
                Ok(())
            }
        }
    }
}

use clap::Args;

use glow_track_core::{
    Library, LibraryStore, Mode, RoutineDocument, RoutineLibraryManager, RoutinePack,
};

#[derive(Args)]
pub struct ShowCommand {
    /// Mode (daytime, nighttime)
    #[arg(long, short)]
    pub mode: Option<String>,

    /// Output as JSON instead of a checklist
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct PrintCommand {
    /// Pack IDs to include (all packs when omitted)
    pub packs: Vec<String>,
}

fn render_routine(routine: &RoutineDocument, mode: Mode, skip_spf: bool) {
    for step in routine.ordered_steps() {
        if skip_spf && step.is_spf {
            continue;
        }
        println!("  {}. {}", step.order, step.name);
        for product in routine.products_for(&step.id) {
            let icon = if product.checked { "✓" } else { "○" };
            print!("     {} {}", icon, product.name);
            if !product.notes.is_empty() {
                print!("  - {}", product.notes);
            }
            println!();
        }
    }
    if routine.steps.is_empty() {
        println!("  (no steps in the {} routine)", mode);
    }
}

fn render_pack(pack: &RoutinePack) {
    println!("{}", pack);
    for mode in [Mode::Daytime, Mode::Nighttime] {
        println!("\n{}:", mode);
        // The printable sheet drops SPF steps from the night column.
        render_routine(pack.routine(mode), mode, mode == Mode::Nighttime);
    }
}

impl ShowCommand {
    pub async fn run<S: LibraryStore + 'static>(
        &self,
        manager: &RoutineLibraryManager<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mode = match &self.mode {
            Some(m) => Some(m.parse::<Mode>().map_err(|e: String| e)?),
            None => None,
        };
        let ctx = manager.resolve(mode).ok_or("Not signed in")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&ctx.routine)?);
            return Ok(());
        }

        println!("{} — {}", ctx.pack.name, ctx.mode);
        render_routine(&ctx.routine, ctx.mode, false);
        Ok(())
    }
}

impl PrintCommand {
    pub async fn run<S: LibraryStore + 'static>(
        &self,
        manager: &RoutineLibraryManager<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let library: Library = manager.snapshot().ok_or("Not signed in")?;

        let mut printed = 0;
        for id in &library.order {
            if !self.packs.is_empty() && !self.packs.contains(id) {
                continue;
            }
            let Some(pack) = library.items.get(id) else {
                continue;
            };
            if printed > 0 {
                println!("\n{}\n", "=".repeat(40));
            }
            render_pack(pack);
            printed += 1;
        }

        if printed == 0 {
            return Err("No matching packs to print".into());
        }
        Ok(())
    }
}

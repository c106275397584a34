use clap::Args;

use glow_track_core::{ProductCatalog, StaticCatalog};

#[derive(Args)]
pub struct SearchCommand {
    /// Search text (case-insensitive substring match)
    pub query: String,

    /// Maximum number of results
    #[arg(long, short, default_value = "8")]
    pub limit: usize,
}

impl SearchCommand {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let results = StaticCatalog.search(&self.query, self.limit);
        if results.is_empty() {
            println!("No products matched '{}'", self.query.trim());
            return Ok(());
        }
        for name in results {
            println!("{}", name);
        }
        Ok(())
    }
}

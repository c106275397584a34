pub mod config_cmd;
pub mod pack;
pub mod product;
pub mod search;
pub mod show;
pub mod step;

pub use config_cmd::ConfigCommand;
pub use pack::PackCommand;
pub use product::ProductCommand;
pub use search::SearchCommand;
pub use show::{PrintCommand, ShowCommand};
pub use step::StepCommand;

mod library;
mod mode;
mod pack;
mod product;
mod routine;
mod step;

pub use library::{Library, LibrarySummary, PackSummary, STARTER_PACK_NAME};
pub use mode::Mode;
pub use pack::RoutinePack;
pub use product::{Product, PLACEHOLDER_NAME};
pub use routine::{RoutineDocument, ShiftDirection, CANONICAL_STEPS};
pub use step::Step;

//! GlowTrack Core Library
//!
//! Shared models and sync logic for the GlowTrack routine tracker: the
//! routine/pack/library data model, schema migration, the library store
//! boundary, and the routine library manager.

pub mod catalog;
pub mod identity;
pub mod manager;
pub mod migrate;
pub mod models;
pub mod store;

pub use catalog::{ProductCatalog, StaticCatalog};
pub use identity::UserIdentity;
pub use manager::{
    ManagerError, ProductUpdate, RoutineContext, RoutineLibraryManager, DEFAULT_DEBOUNCE,
};
pub use migrate::{decode_stored, migrate_routine, upgrade, VersionedStore, CURRENT_SCHEMA_VERSION};
pub use models::{
    Library, LibrarySummary, Mode, PackSummary, Product, RoutineDocument, RoutinePack,
    ShiftDirection, Step,
};
pub use store::{
    FileLibraryStore, LibraryStore, MemoryLibraryStore, RestLibraryStore, StoreError,
    StoredLibrary,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}

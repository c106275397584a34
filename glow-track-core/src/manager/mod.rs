//! The routine library manager.
//!
//! Orchestrates the authenticated session: loads (or synthesizes) the
//! user's library, applies in-memory mutations, and persists them through
//! a debounced save. Every mutation entry point funnels through one commit
//! path so the library invariants survive partial updates.
//!
//! The manager holds no ambient globals; the store is injected at
//! construction and the identity provider drives it through
//! [`on_auth_state_changed`](RoutineLibraryManager::on_auth_state_changed).

mod debounce;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

use crate::identity::UserIdentity;
use crate::migrate;
use crate::models::{
    Library, LibrarySummary, Mode, RoutineDocument, RoutinePack, ShiftDirection,
};
use crate::store::{LibraryStore, StoreError, StoredLibrary};

use debounce::SaveScheduler;

/// Default debounce window for coalescing rapid edits into one write.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

/// Errors surfaced by manager operations.
///
/// Structural corruption never appears here; it is repaired silently by
/// the migrator and normalizer.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("not signed in")]
    NotSignedIn,
    #[error("{0} name cannot be empty")]
    EmptyName(&'static str),
    #[error("the new name matches the current name")]
    NameUnchanged,
    #[error("a library must keep at least one routine pack")]
    LastPack,
    #[error("each step must keep at least one product")]
    LastProduct,
    #[error("routine pack not found: {0}")]
    PackNotFound(String),
    #[error("step not found: {0}")]
    StepNotFound(String),
    #[error("no product at position {index} in step {step_id}")]
    ProductNotFound { step_id: String, index: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The currently-active pack and routine document for one mode, resolved
/// for reading or mutation. `dirty` marks a document that needed repair on
/// the way out and should be committed back.
#[derive(Debug, Clone)]
pub struct RoutineContext {
    pub pack: RoutinePack,
    pub mode: Mode,
    pub routine: RoutineDocument,
    pub dirty: bool,
}

/// Field-wise product edit; unset fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub checked: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug)]
struct Session {
    user: UserIdentity,
    library: Library,
    mode: Mode,
}

/// Orchestrates load, in-memory mutation, debounced save, and pack
/// selection for one user session.
#[derive(Debug)]
pub struct RoutineLibraryManager<S: LibraryStore + 'static> {
    store: Arc<S>,
    session: Arc<Mutex<Option<Session>>>,
    scheduler: SaveScheduler,
}

impl<S: LibraryStore + 'static> RoutineLibraryManager<S> {
    pub fn new(store: S, debounce: Duration) -> Self {
        Self {
            store: Arc::new(store),
            session: Arc::new(Mutex::new(None)),
            scheduler: SaveScheduler::new(debounce),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ==================== Auth Lifecycle ====================

    /// Reacts to an identity change from the auth provider.
    ///
    /// Sign-in fetches the stored library (synthesizing and writing back a
    /// starter library on first-ever read) and opens a fresh session.
    /// Sign-out cancels any pending save so nothing is written under a
    /// stale identity, and discards the in-memory library.
    pub async fn on_auth_state_changed(
        &self,
        identity: Option<UserIdentity>,
    ) -> Result<(), ManagerError> {
        let Some(user) = identity else {
            self.scheduler.cancel();
            *self.session.lock().unwrap() = None;
            tracing::debug!("session discarded on sign-out");
            return Ok(());
        };

        let library = match self.store.get(&user.id).await? {
            Some(value) => migrate::upgrade(migrate::decode_stored(&value)),
            None => {
                let library = Library::starter();
                self.store
                    .set(&user.id, &StoredLibrary::now(library.clone()))
                    .await?;
                tracing::debug!(user = %user.id, "initialized library for new user");
                library
            }
        };

        *self.session.lock().unwrap() = Some(Session {
            user,
            library,
            mode: Mode::Daytime,
        });
        Ok(())
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.lock().unwrap().is_some()
    }

    pub fn user(&self) -> Option<UserIdentity> {
        self.session.lock().unwrap().as_ref().map(|s| s.user.clone())
    }

    // ==================== Mode Toggle ====================

    pub fn mode(&self) -> Mode {
        self.session
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.mode)
            .unwrap_or(Mode::Daytime)
    }

    pub fn set_mode(&self, mode: Mode) {
        if let Some(session) = self.session.lock().unwrap().as_mut() {
            session.mode = mode;
        }
    }

    // ==================== Context Resolution ====================

    /// Resolves the active pack and its routine document for the requested
    /// mode (or the session's current toggle state).
    ///
    /// Returns `None` when signed out; callers fall back to an unsaved
    /// default. A `dirty` context should be committed back to persist the
    /// repair.
    pub fn resolve(&self, mode: Option<Mode>) -> Option<RoutineContext> {
        let mut guard = self.session.lock().unwrap();
        let session = guard.as_mut()?;
        session.library.repair();

        let mode = mode.unwrap_or(session.mode);
        let pack = session.library.current_pack()?.clone();
        let mut routine = pack.routine(mode).clone();
        let dirty = routine.repair();
        Some(RoutineContext {
            pack,
            mode,
            routine,
            dirty,
        })
    }

    /// The current routine document for display. Persists any repair the
    /// resolver had to make.
    pub fn routine(&self, mode: Option<Mode>) -> Option<RoutineDocument> {
        let ctx = self.resolve(mode)?;
        if ctx.dirty {
            // A repaired document is committed without refreshing the
            // pack timestamp; the user changed nothing.
            let routine = ctx.routine.clone();
            if self.commit(ctx, false).is_err() {
                return Some(routine);
            }
            return Some(routine);
        }
        Some(ctx.routine)
    }

    /// Ordered pack names plus the current selection, for render surfaces.
    pub fn library_summary(&self) -> Option<LibrarySummary> {
        let mut guard = self.session.lock().unwrap();
        let session = guard.as_mut()?;
        session.library.repair();
        Some(session.library.summary())
    }

    /// Read-only snapshot of the whole library, for print/export.
    pub fn snapshot(&self) -> Option<Library> {
        self.session.lock().unwrap().as_ref().map(|s| s.library.clone())
    }

    // ==================== Commit Protocol ====================

    /// Folds a mutated context back into the authoritative library and
    /// schedules persistence.
    ///
    /// Write-back order: routine into pack, timestamp if requested, pack
    /// into `items`, re-normalize, then enqueue the debounced save. The
    /// re-normalization restores the library invariants even when the
    /// caller passed a partial mutation.
    pub fn commit(&self, ctx: RoutineContext, update_timestamp: bool) -> Result<(), ManagerError> {
        {
            let mut guard = self.session.lock().unwrap();
            let session = guard.as_mut().ok_or(ManagerError::NotSignedIn)?;

            let mut pack = ctx.pack;
            pack.set_routine(ctx.mode, ctx.routine);
            if update_timestamp {
                pack.touch();
            }
            session.library.items.insert(pack.id.clone(), pack);
            session.library.repair();
        }
        self.schedule_save();
        Ok(())
    }

    /// Resolve-mutate-commit funnel for routine mutations. Validation
    /// errors inside `f` leave the session untouched.
    fn mutate_routine<T>(
        &self,
        mode: Option<Mode>,
        f: impl FnOnce(&mut RoutineDocument) -> Result<T, ManagerError>,
    ) -> Result<T, ManagerError> {
        let mut ctx = self.resolve(mode).ok_or(ManagerError::NotSignedIn)?;
        let out = f(&mut ctx.routine)?;
        self.commit(ctx, true)?;
        Ok(out)
    }

    /// Library-level mutation funnel (pack lifecycle). Re-normalizes and
    /// schedules a save after `f` succeeds.
    fn mutate_library<T>(
        &self,
        f: impl FnOnce(&mut Library) -> Result<T, ManagerError>,
    ) -> Result<T, ManagerError> {
        let out = {
            let mut guard = self.session.lock().unwrap();
            let session = guard.as_mut().ok_or(ManagerError::NotSignedIn)?;
            session.library.repair();
            let out = f(&mut session.library)?;
            session.library.repair();
            out
        };
        self.schedule_save();
        Ok(out)
    }

    // ==================== Pack Lifecycle ====================

    /// Creates a pack with empty documents, appends it to the display
    /// order, and selects it. Returns the new pack id.
    pub fn create_pack(&self, name: &str) -> Result<String, ManagerError> {
        let name = non_empty(name, "pack")?;
        self.mutate_library(|library| {
            let pack = RoutinePack::new(name);
            let id = pack.id.clone();
            library.insert_pack(pack);
            Ok(id)
        })
    }

    /// Renames the current pack. The new name must be non-empty and differ
    /// from the current one.
    pub fn rename_pack(&self, new_name: &str) -> Result<(), ManagerError> {
        let new_name = non_empty(new_name, "pack")?;
        self.mutate_library(|library| {
            let pack = library
                .current_pack_mut()
                .ok_or_else(|| ManagerError::PackNotFound("current".to_string()))?;
            if pack.name == new_name {
                return Err(ManagerError::NameUnchanged);
            }
            pack.name = new_name;
            pack.touch();
            Ok(())
        })
    }

    /// Deletes a pack (the current one when `pack_id` is `None`). Refused
    /// for the last remaining pack: a library always holds at least one.
    pub fn delete_pack(&self, pack_id: Option<&str>) -> Result<(), ManagerError> {
        self.mutate_library(|library| {
            let target = match pack_id {
                Some(id) => id.to_string(),
                None => library.current_id.clone().unwrap_or_default(),
            };
            if !library.items.contains_key(&target) {
                return Err(ManagerError::PackNotFound(target));
            }
            if library.len() <= 1 {
                return Err(ManagerError::LastPack);
            }
            library.remove_pack(&target);
            Ok(())
        })
    }

    /// Switches the current pack. Any pending debounced save is flushed
    /// first so the outgoing pack's edits are persisted before the switch.
    pub async fn select_pack(&self, pack_id: &str) -> Result<(), ManagerError> {
        self.flush().await?;
        self.mutate_library(|library| {
            if !library.items.contains_key(pack_id) {
                return Err(ManagerError::PackNotFound(pack_id.to_string()));
            }
            library.current_id = Some(pack_id.to_string());
            Ok(())
        })
    }

    // ==================== Step Mutations ====================

    /// Inserts a step at `position` (1-based; `None` appends) and returns
    /// its id.
    pub fn add_step(
        &self,
        mode: Option<Mode>,
        name: &str,
        position: Option<u32>,
    ) -> Result<String, ManagerError> {
        let name = non_empty(name, "step")?;
        self.mutate_routine(mode, |routine| Ok(routine.insert_step(name, position)))
    }

    /// Shifts a step toward the front or back. Returns false for a
    /// boundary no-op.
    pub fn move_step(
        &self,
        mode: Option<Mode>,
        step_id: &str,
        direction: ShiftDirection,
    ) -> Result<bool, ManagerError> {
        self.mutate_routine(mode, |routine| {
            routine
                .shift_step(step_id, direction)
                .ok_or_else(|| ManagerError::StepNotFound(step_id.to_string()))
        })
    }

    pub fn rename_step(
        &self,
        mode: Option<Mode>,
        step_id: &str,
        name: &str,
    ) -> Result<(), ManagerError> {
        let name = non_empty(name, "step")?;
        self.mutate_routine(mode, |routine| {
            if !routine.rename_step(step_id, name) {
                return Err(ManagerError::StepNotFound(step_id.to_string()));
            }
            Ok(())
        })
    }

    pub fn delete_step(&self, mode: Option<Mode>, step_id: &str) -> Result<(), ManagerError> {
        self.mutate_routine(mode, |routine| {
            if !routine.delete_step(step_id) {
                return Err(ManagerError::StepNotFound(step_id.to_string()));
            }
            Ok(())
        })
    }

    // ==================== Product Mutations ====================

    /// Appends a placeholder product to a step.
    pub fn add_product(&self, mode: Option<Mode>, step_id: &str) -> Result<(), ManagerError> {
        self.mutate_routine(mode, |routine| {
            if !routine.add_product(step_id) {
                return Err(ManagerError::StepNotFound(step_id.to_string()));
            }
            Ok(())
        })
    }

    /// Applies a field-wise edit to one product. A blank name coerces to
    /// the placeholder name.
    pub fn update_product(
        &self,
        mode: Option<Mode>,
        step_id: &str,
        index: usize,
        update: ProductUpdate,
    ) -> Result<(), ManagerError> {
        self.mutate_routine(mode, |routine| {
            if !routine.has_step(step_id) {
                return Err(ManagerError::StepNotFound(step_id.to_string()));
            }
            let product =
                routine
                    .product_mut(step_id, index)
                    .ok_or(ManagerError::ProductNotFound {
                        step_id: step_id.to_string(),
                        index,
                    })?;
            if let Some(name) = update.name {
                product.set_name(name);
            }
            if let Some(checked) = update.checked {
                product.checked = checked;
            }
            if let Some(notes) = update.notes {
                product.notes = notes.trim().to_string();
            }
            Ok(())
        })
    }

    /// Removes a product from a step. Each step keeps at least one
    /// product.
    pub fn remove_product(
        &self,
        mode: Option<Mode>,
        step_id: &str,
        index: usize,
    ) -> Result<(), ManagerError> {
        self.mutate_routine(mode, |routine| {
            if !routine.has_step(step_id) {
                return Err(ManagerError::StepNotFound(step_id.to_string()));
            }
            let count = routine.products_for(step_id).len();
            if index >= count {
                return Err(ManagerError::ProductNotFound {
                    step_id: step_id.to_string(),
                    index,
                });
            }
            if count <= 1 {
                return Err(ManagerError::LastProduct);
            }
            routine.remove_product(step_id, index);
            Ok(())
        })
    }

    // ==================== Persistence ====================

    /// Writes the library immediately, cancelling any pending debounced
    /// save. A no-op when signed out.
    pub async fn flush(&self) -> Result<(), ManagerError> {
        self.scheduler.cancel();
        let snapshot = {
            let guard = self.session.lock().unwrap();
            guard
                .as_ref()
                .map(|s| (s.user.id.clone(), s.library.clone()))
        };
        let Some((user_id, library)) = snapshot else {
            return Ok(());
        };
        self.store
            .set(&user_id, &StoredLibrary::now(library))
            .await?;
        tracing::debug!(user = %user_id, "library flushed");
        Ok(())
    }

    /// Schedules the debounced save. The write snapshots whatever the
    /// library looks like when the timer fires, so a burst of edits
    /// produces one write. A failed write leaves the in-memory library as
    /// the source of truth; the next edit's debounce cycle retries.
    fn schedule_save(&self) {
        let store = self.store.clone();
        let session = self.session.clone();
        self.scheduler.schedule(async move {
            let snapshot = {
                let guard = session.lock().unwrap();
                guard
                    .as_ref()
                    .map(|s| (s.user.id.clone(), s.library.clone()))
            };
            let Some((user_id, library)) = snapshot else {
                return;
            };
            match store.set(&user_id, &StoredLibrary::now(library)).await {
                Ok(()) => tracing::debug!(user = %user_id, "library saved"),
                Err(e) => tracing::warn!(user = %user_id, error = %e, "library save failed"),
            }
        });
    }
}

fn non_empty(name: &str, what: &'static str) -> Result<String, ManagerError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ManagerError::EmptyName(what));
    }
    Ok(trimmed.to_string())
}

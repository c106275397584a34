use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::pack::RoutinePack;

/// Name given to the pack synthesized for new or repaired libraries.
pub const STARTER_PACK_NAME: &str = "My Routine";

/// The full ordered set of a user's routine packs plus the active selection.
///
/// Invariants (restored by [`repair`](Self::repair)):
/// - `order` references only existing items and covers all of them
/// - `items` is never empty
/// - `current_id` always resolves to an item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    #[serde(default)]
    pub current_id: Option<String>,
    #[serde(default)]
    pub order: Vec<String>,
    #[serde(default)]
    pub items: HashMap<String, RoutinePack>,
}

/// Read-only view of the library for render surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct LibrarySummary {
    pub current_id: String,
    pub packs: Vec<PackSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackSummary {
    pub id: String,
    pub name: String,
    pub updated_at: DateTime<Utc>,
    pub is_current: bool,
}

impl Library {
    /// A library holding one starter pack, as synthesized for a user's
    /// first session.
    pub fn starter() -> Self {
        let mut library = Self::default();
        library.insert_pack(RoutinePack::starter(STARTER_PACK_NAME));
        library
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_pack(&self) -> Option<&RoutinePack> {
        self.items.get(self.current_id.as_deref()?)
    }

    pub fn current_pack_mut(&mut self) -> Option<&mut RoutinePack> {
        let id = self.current_id.clone()?;
        self.items.get_mut(&id)
    }

    /// Adds a pack at the end of the display order and selects it.
    pub fn insert_pack(&mut self, pack: RoutinePack) {
        let id = pack.id.clone();
        self.items.insert(id.clone(), pack);
        self.order.push(id.clone());
        self.current_id = Some(id);
    }

    /// Removes a pack from `items` and `order`, repointing the selection to
    /// the first remaining pack if needed. Returns false if the id is
    /// unknown. Callers enforce the one-pack minimum.
    pub fn remove_pack(&mut self, pack_id: &str) -> bool {
        if self.items.remove(pack_id).is_none() {
            return false;
        }
        self.order.retain(|id| id != pack_id);
        if self.current_id.as_deref() == Some(pack_id) {
            self.current_id = self.order.first().cloned();
        }
        true
    }

    /// Restores the library invariants in place.
    ///
    /// Repairs, in order: `order` filtered to existing items and extended
    /// to cover unlisted ones; an empty library replaced by a starter
    /// pack; a dangling `current_id` repointed to `order[0]`.
    pub fn repair(&mut self) {
        let mut seen = Vec::with_capacity(self.order.len());
        for id in &self.order {
            if self.items.contains_key(id) && !seen.contains(id) {
                seen.push(id.clone());
            }
        }

        let mut unlisted: Vec<&RoutinePack> = self
            .items
            .values()
            .filter(|pack| !seen.contains(&pack.id))
            .collect();
        unlisted.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        seen.extend(unlisted.into_iter().map(|pack| pack.id.clone()));
        self.order = seen;

        if self.items.is_empty() {
            let pack = RoutinePack::starter(STARTER_PACK_NAME);
            self.order = vec![pack.id.clone()];
            self.current_id = Some(pack.id.clone());
            self.items.insert(pack.id.clone(), pack);
            return;
        }

        let current_ok = self
            .current_id
            .as_deref()
            .map(|id| self.items.contains_key(id))
            .unwrap_or(false);
        if !current_ok {
            self.current_id = self.order.first().cloned();
        }
    }

    /// Ordered names plus the current selection, for display and print.
    pub fn summary(&self) -> LibrarySummary {
        let current = self.current_id.clone().unwrap_or_default();
        let packs = self
            .order
            .iter()
            .filter_map(|id| self.items.get(id))
            .map(|pack| PackSummary {
                id: pack.id.clone(),
                name: pack.name.clone(),
                updated_at: pack.updated_at,
                is_current: Some(pack.id.as_str()) == self.current_id.as_deref(),
            })
            .collect();
        LibrarySummary {
            current_id: current,
            packs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_library() {
        let library = Library::starter();
        assert_eq!(library.len(), 1);
        assert_eq!(library.order.len(), 1);

        let pack = library.current_pack().unwrap();
        assert_eq!(pack.name, "My Routine");
        assert_eq!(pack.daytime.steps.len(), 7);
        assert_eq!(pack.nighttime.steps.len(), 7);
    }

    #[test]
    fn test_insert_pack_appends_and_selects() {
        let mut library = Library::starter();
        let pack = RoutinePack::new("Evening Reset");
        let id = pack.id.clone();
        library.insert_pack(pack);

        assert_eq!(library.len(), 2);
        assert_eq!(library.order.last(), Some(&id));
        assert_eq!(library.current_id.as_deref(), Some(id.as_str()));
    }

    #[test]
    fn test_remove_pack_repoints_current() {
        let mut library = Library::starter();
        let first = library.order[0].clone();
        let pack = RoutinePack::new("Second");
        let second = pack.id.clone();
        library.insert_pack(pack);

        assert!(library.remove_pack(&second));
        assert_eq!(library.current_id.as_deref(), Some(first.as_str()));
        assert!(!library.remove_pack("pack_nope"));
    }

    // ==================== Repair Tests ====================

    #[test]
    fn test_repair_empty_library_synthesizes_starter() {
        let mut library = Library::default();
        library.repair();

        assert!(!library.is_empty());
        assert_eq!(library.order.len(), library.len());
        assert_eq!(library.current_pack().unwrap().name, "My Routine");
    }

    #[test]
    fn test_repair_filters_and_extends_order() {
        let mut library = Library::default();
        let a = RoutinePack::new("A");
        let b = RoutinePack::new("B");
        let (a_id, b_id) = (a.id.clone(), b.id.clone());
        library.items.insert(a_id.clone(), a);
        library.items.insert(b_id.clone(), b);
        library.order = vec![b_id.clone(), "pack_ghost".to_string(), b_id.clone()];

        library.repair();
        assert_eq!(library.order, vec![b_id, a_id]);
        assert_eq!(library.order.len(), library.len());
    }

    #[test]
    fn test_repair_repoints_dangling_current() {
        let mut library = Library::starter();
        library.current_id = Some("pack_gone".to_string());
        library.repair();

        let current = library.current_id.clone().unwrap();
        assert!(library.items.contains_key(&current));
        assert_eq!(Some(&current), library.order.first());
    }

    #[test]
    fn test_repair_missing_current() {
        let mut library = Library::starter();
        library.current_id = None;
        library.repair();
        assert!(library.current_pack().is_some());
    }

    #[test]
    fn test_summary_follows_order() {
        let mut library = Library::starter();
        library.insert_pack(RoutinePack::new("Second"));

        let summary = library.summary();
        assert_eq!(summary.packs.len(), 2);
        assert_eq!(summary.packs[0].name, "My Routine");
        assert_eq!(summary.packs[1].name, "Second");
        assert!(summary.packs[1].is_current);
        assert!(!summary.packs[0].is_current);
        assert_eq!(summary.current_id, summary.packs[1].id);
    }

    #[test]
    fn test_library_json_wire_format() {
        let library = Library::starter();
        let json = serde_json::to_string(&library).unwrap();
        assert!(json.contains("\"currentId\""));

        let parsed: Library = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, library);
    }
}

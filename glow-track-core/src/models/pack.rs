use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::mode::Mode;
use super::routine::RoutineDocument;

/// A named bundle of a daytime and a nighttime routine document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutinePack {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub daytime: RoutineDocument,
    #[serde(default)]
    pub nighttime: RoutineDocument,
}

impl RoutinePack {
    /// Creates a pack with empty documents. User-created packs declare
    /// their own steps instead of inheriting the canonical seven.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_pack_id(now),
            name: name.into(),
            created_at: now,
            updated_at: now,
            daytime: RoutineDocument::new(),
            nighttime: RoutineDocument::new(),
        }
    }

    /// Creates the starter pack synthesized for new or repaired libraries:
    /// both modes seeded with the seven canonical steps.
    pub fn starter(name: impl Into<String>) -> Self {
        let mut pack = Self::new(name);
        pack.daytime = RoutineDocument::default_document();
        pack.nighttime = RoutineDocument::default_document();
        pack
    }

    pub fn routine(&self, mode: Mode) -> &RoutineDocument {
        match mode {
            Mode::Daytime => &self.daytime,
            Mode::Nighttime => &self.nighttime,
        }
    }

    pub fn routine_mut(&mut self, mode: Mode) -> &mut RoutineDocument {
        match mode {
            Mode::Daytime => &mut self.daytime,
            Mode::Nighttime => &mut self.nighttime,
        }
    }

    pub fn set_routine(&mut self, mode: Mode, routine: RoutineDocument) {
        *self.routine_mut(mode) = routine;
    }

    /// Refreshes `updated_at`. Called on every committed mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for RoutinePack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;
        writeln!(f, "Daytime steps: {}", self.daytime.steps.len())?;
        writeln!(f, "Nighttime steps: {}", self.nighttime.steps.len())?;
        writeln!(f, "Updated: {}", self.updated_at.format("%Y-%m-%d %H:%M"))?;
        Ok(())
    }
}

/// Pack ids combine the creation timestamp with a random suffix.
fn generate_pack_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("pack_{}_{}", now.timestamp_millis(), &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pack_has_empty_documents() {
        let pack = RoutinePack::new("Travel Kit");
        assert_eq!(pack.name, "Travel Kit");
        assert!(pack.daytime.is_empty());
        assert!(pack.nighttime.is_empty());
        assert_eq!(pack.created_at, pack.updated_at);
    }

    #[test]
    fn test_starter_pack_has_canonical_documents() {
        let pack = RoutinePack::starter("My Routine");
        assert_eq!(pack.daytime.steps.len(), 7);
        assert_eq!(pack.nighttime.steps.len(), 7);
    }

    #[test]
    fn test_pack_id_format_and_uniqueness() {
        let a = RoutinePack::new("A");
        let b = RoutinePack::new("B");
        assert!(a.id.starts_with("pack_"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_touch_refreshes_updated_at() {
        let mut pack = RoutinePack::new("A");
        let before = pack.updated_at;
        pack.touch();
        assert!(pack.updated_at >= before);
    }

    #[test]
    fn test_routine_by_mode() {
        let mut pack = RoutinePack::new("A");
        pack.routine_mut(Mode::Daytime).insert_step("Cleanser", None);
        assert_eq!(pack.routine(Mode::Daytime).steps.len(), 1);
        assert!(pack.routine(Mode::Nighttime).is_empty());
    }

    #[test]
    fn test_pack_json_wire_format() {
        let pack = RoutinePack::starter("My Routine");
        let json = serde_json::to_string(&pack).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));

        let parsed: RoutinePack = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, pack);
    }
}

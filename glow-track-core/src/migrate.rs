//! Structural migration of persisted routine data.
//!
//! The stored schema has gone through three shapes:
//!
//! 1. **V1** - per-mode flat maps from a fixed set of step keys straight to
//!    product arrays (`{ cleanser: [...], toner: [...], ... }`)
//! 2. **V2** - per-mode step/product documents with explicit ordering
//! 3. **V3** - a multi-pack routine library
//!
//! Current payloads carry an explicit `schemaVersion`; pre-versioned
//! documents infer their shape structurally, once, at this boundary. All
//! decoding here is lenient: malformed input degrades to defaults, never to
//! an error.

use serde_json::Value;

use crate::models::{
    Library, Product, RoutineDocument, RoutinePack, Step, CANONICAL_STEPS, STARTER_PACK_NAME,
};

/// Schema version written by this client.
pub const CURRENT_SCHEMA_VERSION: u32 = 3;

/// A stored document decoded into its schema generation.
#[derive(Debug, Clone)]
pub enum VersionedStore {
    V1 { daytime: Value, nighttime: Value },
    V2 { daytime: Value, nighttime: Value },
    V3 { library: Value },
}

/// Decodes a raw stored document into its schema generation.
///
/// The `schemaVersion` field wins when present; otherwise the variant is
/// inferred from the document structure.
pub fn decode_stored(value: &Value) -> VersionedStore {
    let per_mode = |value: &Value| {
        let routines = &value["routines"];
        (routines["daytime"].clone(), routines["nighttime"].clone())
    };

    match value["schemaVersion"].as_u64() {
        Some(3) => VersionedStore::V3 {
            library: value["routineLibrary"].clone(),
        },
        Some(2) => {
            let (daytime, nighttime) = per_mode(value);
            VersionedStore::V2 { daytime, nighttime }
        }
        Some(1) => {
            let (daytime, nighttime) = per_mode(value);
            VersionedStore::V1 { daytime, nighttime }
        }
        _ => {
            if value["routineLibrary"].is_object() {
                VersionedStore::V3 {
                    library: value["routineLibrary"].clone(),
                }
            } else if value["routines"].is_object() {
                let (daytime, nighttime) = per_mode(value);
                if !daytime["steps"].is_null() {
                    VersionedStore::V2 { daytime, nighttime }
                } else {
                    VersionedStore::V1 { daytime, nighttime }
                }
            } else {
                VersionedStore::V3 {
                    library: Value::Null,
                }
            }
        }
    }
}

/// Upgrades any decoded generation to a valid library.
///
/// Single-routine generations become a library holding one pack that keeps
/// the user's migrated documents.
pub fn upgrade(stored: VersionedStore) -> Library {
    match stored {
        VersionedStore::V3 { library } => library_from_value(&library),
        VersionedStore::V1 { daytime, nighttime } | VersionedStore::V2 { daytime, nighttime } => {
            let mut pack = RoutinePack::new(STARTER_PACK_NAME);
            pack.daytime = migrate_routine(&daytime).0;
            pack.nighttime = migrate_routine(&nighttime).0;

            let mut library = Library::default();
            library.insert_pack(pack);
            library.repair();
            library
        }
    }
}

/// Upgrades an arbitrary persisted routine value into a valid document.
///
/// Returns the document plus a dirty flag: true when the input required
/// repair and the caller should persist the fix. Idempotent - a document
/// that already conforms passes through unchanged - and total: the worst
/// case is the default document.
pub fn migrate_routine(value: &Value) -> (RoutineDocument, bool) {
    if value.is_object() && !value["steps"].is_null() && !value["products"].is_null() {
        match serde_json::from_value::<RoutineDocument>(value.clone()) {
            Ok(doc) => return (doc, false),
            Err(_) => return (RoutineDocument::default_document(), true),
        }
    }

    if value.is_object()
        && CANONICAL_STEPS
            .iter()
            .any(|(key, _, _)| value[*key].is_array())
    {
        return (migrate_flat(value), true);
    }

    (RoutineDocument::default_document(), true)
}

/// Converts the V1 flat shape: each known key becomes a canonical step and
/// its array becomes that step's product list.
fn migrate_flat(value: &Value) -> RoutineDocument {
    let mut doc = RoutineDocument::new();
    for (index, (key, name, is_spf)) in CANONICAL_STEPS.iter().enumerate() {
        let order = index as u32 + 1;
        let id = format!("step_{}", order);
        doc.steps.push(Step::new(&id, *name, order, *is_spf));

        let products = match value[*key].as_array() {
            Some(entries) if !entries.is_empty() => entries
                .iter()
                .map(|entry| {
                    serde_json::from_value::<Product>(entry.clone())
                        .unwrap_or_else(|_| Product::placeholder())
                })
                .collect(),
            _ => vec![Product::placeholder()],
        };
        doc.products.insert(id, products);
    }
    doc
}

/// Leniently decodes a stored library value and restores its invariants.
///
/// Malformed pack entries are dropped; missing fields default; legacy
/// routine shapes nested inside packs are migrated. This is the library
/// normalizer: pure, total, and deep-copying (the input value is never
/// aliased).
pub fn library_from_value(value: &Value) -> Library {
    let mut library = Library::default();

    if let Some(items) = value["items"].as_object() {
        for (id, entry) in items {
            if let Some(pack) = pack_from_value(id, entry) {
                library.items.insert(id.clone(), pack);
            }
        }
    }

    if let Some(order) = value["order"].as_array() {
        library.order = order
            .iter()
            .filter_map(|id| id.as_str().map(str::to_string))
            .collect();
    }

    library.current_id = value["currentId"].as_str().map(str::to_string);
    library.repair();
    library
}

/// Decodes one pack entry, or drops it when it has no usable identity.
fn pack_from_value(id: &str, value: &Value) -> Option<RoutinePack> {
    if !value.is_object() || id.is_empty() {
        return None;
    }

    let mut pack = RoutinePack::new(
        value["name"]
            .as_str()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(STARTER_PACK_NAME),
    );
    pack.id = id.to_string();

    if let Some(created) = value["createdAt"].as_str() {
        if let Ok(parsed) = created.parse() {
            pack.created_at = parsed;
        }
    }
    if let Some(updated) = value["updatedAt"].as_str() {
        if let Ok(parsed) = updated.parse() {
            pack.updated_at = parsed;
        }
    }

    pack.daytime = migrate_routine(&value["daytime"]).0;
    pack.nighttime = migrate_routine(&value["nighttime"]).0;
    Some(pack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn legacy_flat() -> Value {
        json!({
            "cleanser": [{"name": "X", "checked": true, "notes": ""}],
            "toner": [{"name": "Rose Water", "checked": false, "notes": "am only"}],
            "serum": [{"name": "Product", "checked": false, "notes": ""}],
            "massage": [{"name": "Product", "checked": false, "notes": ""}],
            "tool": [{"name": "Guacha tool", "checked": false, "notes": ""}],
            "treatment": [{"name": "Product", "checked": false, "notes": ""}],
            "spf": [{"name": "Product", "checked": false, "notes": ""}]
        })
    }

    // ==================== migrate_routine Tests ====================

    #[test]
    fn test_migrate_conforming_passes_through() {
        let doc = RoutineDocument::default_document();
        let value = serde_json::to_value(&doc).unwrap();

        let (migrated, dirty) = migrate_routine(&value);
        assert!(!dirty);
        assert_eq!(migrated, doc);
    }

    #[test]
    fn test_migrate_idempotent() {
        for input in [legacy_flat(), Value::Null, json!({"junk": 1})] {
            let (once, _) = migrate_routine(&input);
            let (twice, dirty) = migrate_routine(&serde_json::to_value(&once).unwrap());
            assert!(!dirty);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_migrate_legacy_flat() {
        let (doc, dirty) = migrate_routine(&legacy_flat());
        assert!(dirty);
        assert_eq!(doc.steps.len(), 7);

        let steps = doc.ordered_steps();
        assert_eq!(steps[2].name, "Conductive Serum");
        assert_eq!(steps[6].name, "SPF");
        assert!(steps[6].is_spf);

        assert_eq!(doc.products_for("step_1")[0].name, "X");
        assert!(doc.products_for("step_1")[0].checked);
        assert_eq!(doc.products_for("step_2")[0].notes, "am only");
    }

    #[test]
    fn test_migrate_legacy_missing_keys_defaulted() {
        let (doc, dirty) = migrate_routine(&json!({
            "cleanser": [{"name": "X", "checked": false, "notes": ""}]
        }));
        assert!(dirty);
        assert_eq!(doc.steps.len(), 7);
        assert_eq!(doc.products_for("step_1")[0].name, "X");
        assert_eq!(doc.products_for("step_5"), &[Product::placeholder()]);
    }

    #[test]
    fn test_migrate_unrecoverable_returns_default() {
        for input in [Value::Null, json!(42), json!("nope"), json!({"a": 1})] {
            let (doc, dirty) = migrate_routine(&input);
            assert!(dirty);
            assert_eq!(doc, RoutineDocument::default_document());
        }
    }

    // ==================== decode_stored Tests ====================

    #[test]
    fn test_decode_explicit_versions() {
        let v3 = json!({"schemaVersion": 3, "routineLibrary": {"items": {}}});
        assert!(matches!(decode_stored(&v3), VersionedStore::V3 { .. }));

        let v2 = json!({
            "schemaVersion": 2,
            "routines": {"daytime": {"steps": [], "products": {}}, "nighttime": {"steps": [], "products": {}}}
        });
        assert!(matches!(decode_stored(&v2), VersionedStore::V2 { .. }));

        let v1 = json!({"schemaVersion": 1, "routines": {"daytime": legacy_flat(), "nighttime": legacy_flat()}});
        assert!(matches!(decode_stored(&v1), VersionedStore::V1 { .. }));
    }

    #[test]
    fn test_decode_infers_preversioned_shapes() {
        let v3 = json!({"routineLibrary": {"items": {}}});
        assert!(matches!(decode_stored(&v3), VersionedStore::V3 { .. }));

        let v2 = json!({"routines": {"daytime": {"steps": [], "products": {}}, "nighttime": {}}});
        assert!(matches!(decode_stored(&v2), VersionedStore::V2 { .. }));

        let v1 = json!({"routines": {"daytime": legacy_flat(), "nighttime": legacy_flat()}});
        assert!(matches!(decode_stored(&v1), VersionedStore::V1 { .. }));

        assert!(matches!(
            decode_stored(&json!({})),
            VersionedStore::V3 { .. }
        ));
    }

    // ==================== upgrade Tests ====================

    #[test]
    fn test_upgrade_v1_preserves_user_data() {
        let stored = json!({"schemaVersion": 1, "routines": {"daytime": legacy_flat(), "nighttime": Value::Null}});
        let library = upgrade(decode_stored(&stored));

        assert_eq!(library.len(), 1);
        let pack = library.current_pack().unwrap();
        assert_eq!(pack.name, "My Routine");
        assert_eq!(pack.daytime.products_for("step_1")[0].name, "X");
        assert_eq!(pack.nighttime, RoutineDocument::default_document());
    }

    #[test]
    fn test_upgrade_null_library_yields_starter() {
        let library = upgrade(decode_stored(&json!({})));
        assert_eq!(library.len(), 1);
        assert_eq!(library.current_pack().unwrap().name, "My Routine");
    }

    // ==================== library_from_value Tests ====================

    #[test]
    fn test_library_from_value_roundtrip() {
        let mut library = Library::starter();
        library.insert_pack(RoutinePack::new("Second"));
        let value = serde_json::to_value(&library).unwrap();

        let decoded = library_from_value(&value);
        assert_eq!(decoded.order, library.order);
        assert_eq!(decoded.current_id, library.current_id);
        assert_eq!(decoded.len(), 2);
    }

    #[test]
    fn test_library_from_value_drops_malformed_packs() {
        let good = RoutinePack::starter("Good");
        let mut items = serde_json::Map::new();
        items.insert(good.id.clone(), serde_json::to_value(&good).unwrap());
        items.insert("bad".to_string(), json!("not an object"));
        let value = json!({
            "currentId": "bogus",
            "order": ["missing", good.id],
            "items": items
        });

        let library = library_from_value(&value);
        assert_eq!(library.len(), 1);
        assert_eq!(library.order, vec![good.id.clone()]);
        assert_eq!(library.current_id.as_deref(), Some(good.id.as_str()));
    }

    #[test]
    fn test_library_from_value_migrates_nested_legacy_documents() {
        let value = json!({
            "items": {
                "pack_1": {
                    "name": "Old Pack",
                    "daytime": legacy_flat(),
                    "nighttime": Value::Null
                }
            }
        });

        let library = library_from_value(&value);
        let pack = library.items.get("pack_1").unwrap();
        assert_eq!(pack.daytime.products_for("step_1")[0].name, "X");
        assert_eq!(pack.nighttime.steps.len(), 7);
    }

    #[test]
    fn test_library_from_value_garbage_yields_starter() {
        for input in [Value::Null, json!([1, 2]), json!("x")] {
            let library = library_from_value(&input);
            assert_eq!(library.len(), 1);
            assert!(library.current_pack().is_some());
        }
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single step in a routine document.
///
/// `order` is 1-based and is kept as a contiguous `1..=N` permutation by
/// [`RoutineDocument::normalize_order`](super::RoutineDocument::normalize_order)
/// after every structural mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_order")]
    pub order: u32,
    #[serde(rename = "isSPF", default)]
    pub is_spf: bool,
}

fn default_order() -> u32 {
    1
}

impl Step {
    pub fn new(id: impl Into<String>, name: impl Into<String>, order: u32, is_spf: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order,
            is_spf,
        }
    }

    /// Generates a fresh unique step id.
    pub fn generate_id() -> String {
        format!("step_{}", Uuid::new_v4().simple())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_wire_format() {
        let step = Step::new("step_7", "SPF", 7, true);
        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"isSPF\":true"));

        let parsed: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, step);
    }

    #[test]
    fn test_step_defaults_on_partial_input() {
        let parsed: Step = serde_json::from_str(r#"{"id":"step_x"}"#).unwrap();
        assert_eq!(parsed.id, "step_x");
        assert_eq!(parsed.order, 1);
        assert!(!parsed.is_spf);
    }

    #[test]
    fn test_generate_id_unique() {
        let a = Step::generate_id();
        let b = Step::generate_id();
        assert!(a.starts_with("step_"));
        assert_ne!(a, b);
    }
}

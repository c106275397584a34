use serde::{Deserialize, Serialize};

/// Placeholder name used when a product name is missing or blank.
pub const PLACEHOLDER_NAME: &str = "Product";

/// A product within a routine step.
///
/// Products have no identity beyond their position in the step's list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub notes: String,
}

fn default_name() -> String {
    PLACEHOLDER_NAME.to_string()
}

impl Product {
    /// The unchecked, empty-notes placeholder every new slot starts with.
    pub fn placeholder() -> Self {
        Self {
            name: PLACEHOLDER_NAME.to_string(),
            checked: false,
            notes: String::new(),
        }
    }

    pub fn new(name: impl Into<String>) -> Self {
        let mut product = Self::placeholder();
        product.set_name(name);
        product
    }

    /// Sets the name, coercing blank input to the placeholder name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        let trimmed = name.trim();
        self.name = if trimmed.is_empty() {
            PLACEHOLDER_NAME.to_string()
        } else {
            trimmed.to_string()
        };
    }
}

impl Default for Product {
    fn default() -> Self {
        Self::placeholder()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder() {
        let product = Product::placeholder();
        assert_eq!(product.name, "Product");
        assert!(!product.checked);
        assert!(product.notes.is_empty());
    }

    #[test]
    fn test_set_name_coerces_blank() {
        let mut product = Product::new("Tretinoin");
        assert_eq!(product.name, "Tretinoin");

        product.set_name("   ");
        assert_eq!(product.name, "Product");

        product.set_name("  Rose Water  ");
        assert_eq!(product.name, "Rose Water");
    }

    #[test]
    fn test_product_defaults_on_partial_input() {
        let parsed: Product = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, Product::placeholder());

        let parsed: Product = serde_json::from_str(r#"{"name":"X","checked":true}"#).unwrap();
        assert_eq!(parsed.name, "X");
        assert!(parsed.checked);
        assert!(parsed.notes.is_empty());
    }
}

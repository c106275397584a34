use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::product::Product;
use super::step::Step;

/// The seven canonical steps, in order: legacy storage key, display name,
/// SPF flag. The legacy flat schema keyed product arrays directly on the
/// storage key.
pub const CANONICAL_STEPS: [(&str, &str, bool); 7] = [
    ("cleanser", "Cleanser", false),
    ("toner", "Toner", false),
    ("serum", "Conductive Serum", false),
    ("massage", "Massage", false),
    ("tool", "Tool", false),
    ("treatment", "Treatment", false),
    ("spf", "SPF", true),
];

/// Direction for moving a step relative to its neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    Left,
    Right,
}

/// The step/product tree for one mode of a routine pack.
///
/// Invariants (restored by [`normalize_order`](Self::normalize_order) and
/// [`ensure_product_entries`](Self::ensure_product_entries)):
/// - step `order` values are a contiguous permutation of `1..=N`
/// - every step id has a products entry, seeded with one placeholder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutineDocument {
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub products: HashMap<String, Vec<Product>>,
}

impl RoutineDocument {
    /// An empty document. New user-created packs start here: a product
    /// tracker declares its own steps rather than inheriting the canonical
    /// seven.
    pub fn new() -> Self {
        Self::default()
    }

    /// The default document: the seven canonical steps in order 1..=7,
    /// each with a single placeholder product.
    pub fn default_document() -> Self {
        let mut doc = Self::new();
        for (index, (_, name, is_spf)) in CANONICAL_STEPS.iter().enumerate() {
            let order = index as u32 + 1;
            let id = format!("step_{}", order);
            doc.steps.push(Step::new(&id, *name, order, *is_spf));
            doc.products.insert(id, vec![Product::placeholder()]);
        }
        doc
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.products.is_empty()
    }

    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn has_step(&self, step_id: &str) -> bool {
        self.step(step_id).is_some()
    }

    /// Steps sorted by their `order` field.
    pub fn ordered_steps(&self) -> Vec<&Step> {
        let mut steps: Vec<&Step> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.order);
        steps
    }

    pub fn products_for(&self, step_id: &str) -> &[Product] {
        self.products.get(step_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sorts steps by `order` and reassigns `1..=N` sequentially. Defends
    /// against duplicate or gapped orders left by partial edits.
    pub fn normalize_order(&mut self) {
        self.steps.sort_by_key(|s| s.order);
        for (index, step) in self.steps.iter_mut().enumerate() {
            step.order = index as u32 + 1;
        }
    }

    /// Seeds a one-placeholder products entry for any step missing one.
    pub fn ensure_product_entries(&mut self) {
        for step in &self.steps {
            self.products
                .entry(step.id.clone())
                .or_insert_with(|| vec![Product::placeholder()]);
        }
    }

    /// Repairs both document invariants in place. Returns true if anything
    /// changed, so callers can persist the fix.
    pub fn repair(&mut self) -> bool {
        let before = self.clone();
        self.normalize_order();
        self.ensure_product_entries();
        *self != before
    }

    /// Inserts a new step at `position` (1 = prepend, `None` = append).
    ///
    /// Existing steps at or after the position are shifted down, then the
    /// whole sequence is renormalized. Returns the new step's id.
    pub fn insert_step(&mut self, name: impl Into<String>, position: Option<u32>) -> String {
        let count = self.steps.len() as u32;
        let position = position.unwrap_or(count + 1).clamp(1, count + 1);

        for step in &mut self.steps {
            if step.order >= position {
                step.order += 1;
            }
        }

        let id = Step::generate_id();
        self.steps.push(Step::new(&id, name, position, false));
        self.products.insert(id.clone(), vec![Product::placeholder()]);
        self.normalize_order();
        id
    }

    /// Swaps a step's order with its neighbor, clamped at the boundaries.
    ///
    /// Returns `Some(true)` if the step moved, `Some(false)` for a
    /// boundary no-op, and `None` if the step does not exist.
    pub fn shift_step(&mut self, step_id: &str, direction: ShiftDirection) -> Option<bool> {
        self.normalize_order();
        let index = self.steps.iter().position(|s| s.id == step_id)?;

        let neighbor = match direction {
            ShiftDirection::Left => {
                if index == 0 {
                    return Some(false);
                }
                index - 1
            }
            ShiftDirection::Right => {
                if index + 1 >= self.steps.len() {
                    return Some(false);
                }
                index + 1
            }
        };

        let tmp = self.steps[index].order;
        self.steps[index].order = self.steps[neighbor].order;
        self.steps[neighbor].order = tmp;
        self.normalize_order();
        Some(true)
    }

    /// Removes a step and its products entry, pruning any orphaned product
    /// keys, then renormalizes the remaining orders.
    pub fn delete_step(&mut self, step_id: &str) -> bool {
        let before = self.steps.len();
        self.steps.retain(|s| s.id != step_id);
        if self.steps.len() == before {
            return false;
        }

        self.products.remove(step_id);
        let live: Vec<String> = self.steps.iter().map(|s| s.id.clone()).collect();
        self.products.retain(|id, _| live.contains(id));
        self.normalize_order();
        true
    }

    /// In-place rename; no reordering.
    pub fn rename_step(&mut self, step_id: &str, name: impl Into<String>) -> bool {
        match self.steps.iter_mut().find(|s| s.id == step_id) {
            Some(step) => {
                step.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Appends a placeholder product to a step's list.
    pub fn add_product(&mut self, step_id: &str) -> bool {
        if !self.has_step(step_id) {
            return false;
        }
        self.products
            .entry(step_id.to_string())
            .or_default()
            .push(Product::placeholder());
        true
    }

    pub fn product_mut(&mut self, step_id: &str, index: usize) -> Option<&mut Product> {
        self.products.get_mut(step_id)?.get_mut(index)
    }

    /// Removes the product at `index`. Callers enforce the one-product
    /// minimum per step before calling this.
    pub fn remove_product(&mut self, step_id: &str, index: usize) -> bool {
        match self.products.get_mut(step_id) {
            Some(list) if index < list.len() => {
                list.remove(index);
                true
            }
            _ => false,
        }
    }
}

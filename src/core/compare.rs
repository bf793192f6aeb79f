//! Side-by-side comparison selection

use crate::core::entity::ItemType;
use crate::core::error::ValidationError;
use crate::entities::FavoriteKey;

/// Default number of listings that can be compared at once
pub const DEFAULT_COMPARE_MAX: usize = 4;

/// Ordered selection of listings of a single kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareList {
    items: Vec<FavoriteKey>,
    max_items: usize,
}

impl CompareList {
    pub fn new(max_items: usize) -> Self {
        Self {
            items: Vec::new(),
            max_items: max_items.max(1),
        }
    }

    /// Kind of listing currently being compared
    pub fn item_type(&self) -> Option<ItemType> {
        self.items.first().map(|k| k.item_type)
    }

    /// Add a listing; adding one that is already present is a no-op
    pub fn add(&mut self, item_type: ItemType, item_id: &str) -> Result<(), ValidationError> {
        if self.contains(item_type, item_id) {
            return Ok(());
        }
        if let Some(expected) = self.item_type().filter(|t| *t != item_type) {
            return Err(ValidationError::CompareTypeMismatch {
                expected: expected.to_string(),
                actual: item_type.to_string(),
            });
        }
        if self.items.len() >= self.max_items {
            return Err(ValidationError::CompareFull {
                max: self.max_items,
            });
        }
        self.items.push(FavoriteKey::new(item_type, item_id));
        Ok(())
    }

    /// Remove a listing; returns whether it was present
    pub fn remove(&mut self, item_type: ItemType, item_id: &str) -> bool {
        let before = self.items.len();
        self.items
            .retain(|k| !(k.item_type == item_type && k.item_id == item_id));
        before != self.items.len()
    }

    /// Add when absent, remove when present; returns whether it is now selected
    pub fn toggle(&mut self, item_type: ItemType, item_id: &str) -> Result<bool, ValidationError> {
        if self.remove(item_type, item_id) {
            Ok(false)
        } else {
            self.add(item_type, item_id).map(|_| true)
        }
    }

    pub fn contains(&self, item_type: ItemType, item_id: &str) -> bool {
        self.items
            .iter()
            .any(|k| k.item_type == item_type && k.item_id == item_id)
    }

    pub fn items(&self) -> &[FavoriteKey] {
        &self.items
    }

    /// Ids in selection order
    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|k| k.item_id.as_str()).collect()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max_items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl Default for CompareList {
    fn default() -> Self {
        Self::new(DEFAULT_COMPARE_MAX)
    }
}

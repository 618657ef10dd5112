use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Insertion index of an item. Assigned once, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub label: String,
    pub vector: Arc<[f32]>,
}

/// Append-only sequence of embedded items.
///
/// Items are shared behind `Arc`, so `clone` is a cheap snapshot: a clone taken
/// before an append never observes it.
#[derive(Clone, Debug, Default)]
pub struct VectorStore {
    items: Vec<Arc<Item>>,
    dimensions: Option<usize>,
}

impl VectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a vector under `label`. The first append fixes the dimensionality
    /// for the lifetime of the store; a rejected vector leaves the store as it
    /// was.
    pub fn append(
        &mut self,
        label: impl Into<String>,
        vector: Vec<f32>,
    ) -> Result<ItemId, LayoutError> {
        if vector.is_empty() {
            return Err(LayoutError::InvalidVector("vector is empty".to_owned()));
        }

        if let Some(expected) = self.dimensions
            && vector.len() != expected
        {
            return Err(LayoutError::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }

        if let Some(index) = vector.iter().position(|value| !value.is_finite()) {
            return Err(LayoutError::InvalidVector(format!(
                "component {index} is not finite"
            )));
        }

        let id = ItemId(self.items.len() as u64);
        self.dimensions = Some(vector.len());
        self.items.push(Arc::new(Item {
            id,
            label: label.into(),
            vector: vector.into(),
        }));
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    pub fn items(&self) -> &[Arc<Item>] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        usize::try_from(id.0)
            .ok()
            .and_then(|index| self.items.get(index))
            .map(Arc::as_ref)
    }

    pub fn vectors_in_order(&self) -> Vec<&[f32]> {
        self.items.iter().map(|item| item.vector.as_ref()).collect()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.label.as_str())
    }
}

//! Multi-row selection used for batch painting.

use crate::model::ProductId;
use indexmap::IndexSet;

/// Selected product ids in insertion order, plus the range anchor.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    ids: IndexSet<ProductId>,
    anchor: Option<ProductId>,
}

impl SelectionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle `id`, or with `extend_range` select everything between the
    /// anchor and `id` in `order`.
    ///
    /// Range extension only adds. If the anchor is missing from `order`,
    /// this falls back to a plain toggle. `id` becomes the new anchor.
    pub fn toggle(&mut self, id: ProductId, extend_range: bool, order: &[ProductId]) {
        let range = if extend_range {
            self.anchor.and_then(|anchor| {
                let from = order.iter().position(|p| *p == anchor)?;
                let to = order.iter().position(|p| *p == id)?;
                Some(from.min(to)..=from.max(to))
            })
        } else {
            None
        };

        match range {
            Some(range) => self.ids.extend(order[range].iter().copied()),
            None => {
                if !self.ids.shift_remove(&id) {
                    self.ids.insert(id);
                }
            }
        }
        self.anchor = Some(id);
    }

    /// Select every row, or clear when every row is already selected.
    pub fn select_all(&mut self, order: &[ProductId]) {
        if !order.is_empty() && order.iter().all(|id| self.ids.contains(id)) {
            self.clear();
        } else {
            self.ids.extend(order.iter().copied());
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.anchor = None;
    }

    pub fn set_anchor(&mut self, id: ProductId) {
        self.anchor = Some(id);
    }

    /// Drop ids no longer present, e.g. after a reload.
    pub fn retain_present(&mut self, order: &[ProductId]) {
        self.ids.retain(|id| order.contains(id));
        if self.anchor.is_some_and(|a| !order.contains(&a)) {
            self.anchor = None;
        }
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub const fn anchor(&self) -> Option<ProductId> {
        self.anchor
    }

    /// Selected ids in the order they were added.
    #[must_use]
    pub fn ids(&self) -> Vec<ProductId> {
        self.ids.iter().copied().collect()
    }
}

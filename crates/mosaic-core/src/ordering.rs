//! The ordering result shared by the engine, the cache and the wire format.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{identifier::ItemId, item::Item};

/// Display orders for the 2-column and 4-column presentations.
///
/// Both lists are permutations of the id set the result was computed for.
/// Field names serialize to the fixed wire names (`orderedIds2col`, ...).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderingResult {
    #[serde(rename = "orderedIds2col")]
    ordered_ids_2col: Vec<ItemId>,
    #[serde(rename = "orderedIds4col")]
    ordered_ids_4col: Vec<ItemId>,
    count: usize,
    #[serde(rename = "avgAspectRatio")]
    avg_aspect_ratio: f64,
    #[serde(rename = "wideImageCount")]
    wide_image_count: usize,
}

impl OrderingResult {
    pub fn new(
        ordered_ids_2col: Vec<ItemId>,
        ordered_ids_4col: Vec<ItemId>,
        avg_aspect_ratio: f64,
        wide_image_count: usize,
    ) -> Self {
        Self {
            count: ordered_ids_2col.len(),
            ordered_ids_2col,
            ordered_ids_4col,
            avg_aspect_ratio,
            wide_image_count,
        }
    }

    /// The result for an empty collection.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn ordered_ids_2col(&self) -> &[ItemId] {
        &self.ordered_ids_2col
    }

    pub fn ordered_ids_4col(&self) -> &[ItemId] {
        &self.ordered_ids_4col
    }

    /// The order tuned for `columns` columns.
    ///
    /// Two or fewer columns use the 2-column order; anything wider uses the
    /// 4-column order.
    pub fn ordered_ids_for(&self, columns: usize) -> &[ItemId] {
        if columns <= 2 {
            &self.ordered_ids_2col
        } else {
            &self.ordered_ids_4col
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn avg_aspect_ratio(&self) -> f64 {
        self.avg_aspect_ratio
    }

    pub fn wide_image_count(&self) -> usize {
        self.wide_image_count
    }

    /// Returns `true` if both orders are exact permutations of the ids of
    /// `items`: same cardinality, no duplicates, no foreign ids.
    pub fn matches_items(&self, items: &[Item]) -> bool {
        let expected: HashSet<ItemId> = items.iter().map(Item::id).collect();
        if expected.len() != items.len() || self.count != items.len() {
            return false;
        }
        is_permutation_of(&self.ordered_ids_2col, &expected)
            && is_permutation_of(&self.ordered_ids_4col, &expected)
    }
}

fn is_permutation_of(ids: &[ItemId], expected: &HashSet<ItemId>) -> bool {
    if ids.len() != expected.len() {
        return false;
    }
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().all(|id| expected.contains(id) && seen.insert(*id))
}

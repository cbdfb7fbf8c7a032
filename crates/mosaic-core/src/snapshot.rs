//! Explicit dimension state passed into each ordering and layout pass.
//!
//! Nothing in the engines remembers dimensions between calls; whoever drives
//! them (the coordinator, the CLI, a test) owns a [`DimensionSnapshot`] and
//! passes it in. Lookups fall back from resolved dimensions to stored hints
//! to the square placeholder, so a missing entry never reaches layout math.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::{
    dimension::Dimension,
    identifier::ImageRef,
    item::{DimensionHints, Item},
};

/// Known dimensions keyed by image reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionSnapshot {
    dimensions: HashMap<ImageRef, Dimension>,
}

impl DimensionSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a resolved dimension, replacing any previous value.
    pub fn insert(&mut self, image_ref: ImageRef, dimension: Dimension) {
        self.dimensions.insert(image_ref, dimension);
    }

    /// Records a raw width/height report.
    ///
    /// Invalid reports are dropped and the image stays unresolved. Returns
    /// `true` if the report was accepted.
    pub fn record_report(&mut self, image_ref: &ImageRef, width: f64, height: f64) -> bool {
        match Dimension::loaded(width, height) {
            Ok(dimension) => {
                self.dimensions.insert(image_ref.clone(), dimension);
                true
            }
            Err(err) => {
                debug!(image_ref = image_ref.as_str(), err:% = err; "Rejected reported dimension");
                false
            }
        }
    }

    /// Returns the resolved dimension for an image, if any.
    pub fn get(&self, image_ref: &ImageRef) -> Option<&Dimension> {
        self.dimensions.get(image_ref)
    }

    /// Returns `true` if the image has a resolved dimension.
    pub fn contains(&self, image_ref: &ImageRef) -> bool {
        self.dimensions.contains_key(image_ref)
    }

    /// Number of resolved images.
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Drops entries for images not referenced by `items`.
    pub fn retain_items(&mut self, items: &[Item]) {
        let referenced: HashSet<&ImageRef> = items.iter().map(Item::image_ref).collect();
        self.dimensions
            .retain(|image_ref, _| referenced.contains(image_ref));
    }

    /// Best-known dimension for an item.
    ///
    /// Resolution order: a resolved entry for its image, then its stored
    /// hints, then [`Dimension::unloaded`].
    pub fn dimension_for(&self, item: &Item) -> Dimension {
        self.dimensions
            .get(item.image_ref())
            .copied()
            .or_else(|| item.stored_dimension())
            .unwrap_or_else(Dimension::unloaded)
    }

    /// Best-known aspect ratio for an item; always positive and finite.
    pub fn aspect_ratio_for(&self, item: &Item) -> f64 {
        self.dimension_for(item).aspect_ratio()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_lookup_prefers_resolved_over_stored() {
        let item = Item::new(1, "a.jpg").with_stored_size(100.0, 100.0);
        let mut snapshot = DimensionSnapshot::new();

        assert_approx_eq!(f64, snapshot.aspect_ratio_for(&item), 1.0);
        assert!(snapshot.dimension_for(&item).from_stored());

        snapshot.insert(
            ImageRef::new("a.jpg"),
            Dimension::loaded(200.0, 100.0).unwrap(),
        );
        assert_approx_eq!(f64, snapshot.aspect_ratio_for(&item), 2.0);
        assert!(!snapshot.dimension_for(&item).from_stored());
    }

    #[test]
    fn test_unknown_item_defaults_to_square() {
        let item = Item::new(1, "missing.jpg");
        let dim = DimensionSnapshot::new().dimension_for(&item);

        assert!(!dim.is_loaded());
        assert_approx_eq!(f64, dim.aspect_ratio(), 1.0);
    }

    #[test]
    fn test_invalid_report_leaves_image_unresolved() {
        let mut snapshot = DimensionSnapshot::new();
        let image_ref = ImageRef::new("a.jpg");

        assert!(!snapshot.record_report(&image_ref, 0.0, 100.0));
        assert!(!snapshot.contains(&image_ref));

        assert!(snapshot.record_report(&image_ref, 50.0, 100.0));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_retain_items_drops_foreign_entries() {
        let mut snapshot = DimensionSnapshot::new();
        snapshot.insert(ImageRef::new("a"), Dimension::loaded(1.0, 1.0).unwrap());
        snapshot.insert(ImageRef::new("b"), Dimension::loaded(1.0, 1.0).unwrap());

        snapshot.retain_items(&[Item::new(1, "a")]);

        assert!(snapshot.contains(&ImageRef::new("a")));
        assert!(!snapshot.contains(&ImageRef::new("b")));
    }
}

//! Displayable gallery items.
//!
//! An [`Item`] is what the surrounding gallery application hands to the
//! engines: an id, an image handle, a vote count and the length of its
//! description (which only feeds the [fingerprint](crate::fingerprint)).
//!
//! Stored dimensions are exposed through the [`DimensionHints`] capability
//! rather than probed at runtime, so any collaborator type can participate.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{
    dimension::Dimension,
    identifier::{ImageRef, ItemId},
};

/// Capability of carrying stored width/height metadata for an image.
pub trait DimensionHints {
    /// Raw stored `(width, height)`, if the collaborator persisted them.
    fn stored_size(&self) -> Option<(f64, f64)>;

    /// Stored size as a validated [`Dimension`].
    ///
    /// Returns `None` when nothing is stored or the stored values are not
    /// usable (non-positive or non-finite).
    fn stored_dimension(&self) -> Option<Dimension> {
        let (width, height) = self.stored_size()?;
        Dimension::stored(width, height).ok()
    }
}

/// A displayable item supplied by the gallery application.
///
/// Deserializes from the collaborator contract:
///
/// ```
/// # use mosaic_core::item::Item;
/// let item: Item = serde_json::from_str(
///     r#"{"id": 3, "imageRef": "a.jpg", "voteCount": 5, "descriptionLength": 12}"#,
/// ).unwrap();
/// assert_eq!(item.vote_count(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    id: ItemId,
    image_ref: ImageRef,
    #[serde(default)]
    vote_count: i64,
    #[serde(default, rename = "descriptionLength")]
    description_len: usize,
    #[serde(default, rename = "width", skip_serializing_if = "Option::is_none")]
    stored_width: Option<f64>,
    #[serde(default, rename = "height", skip_serializing_if = "Option::is_none")]
    stored_height: Option<f64>,
}

impl Item {
    /// Creates an item with no votes, an empty description and no stored size.
    pub fn new(id: i64, image_ref: impl Into<ImageRef>) -> Self {
        Self {
            id: ItemId::new(id),
            image_ref: image_ref.into(),
            vote_count: 0,
            description_len: 0,
            stored_width: None,
            stored_height: None,
        }
    }

    /// Sets the vote count (builder style).
    pub fn with_votes(mut self, vote_count: i64) -> Self {
        self.vote_count = vote_count;
        self
    }

    /// Sets the description length (builder style).
    pub fn with_description_len(mut self, description_len: usize) -> Self {
        self.description_len = description_len;
        self
    }

    /// Sets the stored width and height (builder style).
    pub fn with_stored_size(mut self, width: f64, height: f64) -> Self {
        self.stored_width = Some(width);
        self.stored_height = Some(height);
        self
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn image_ref(&self) -> &ImageRef {
        &self.image_ref
    }

    pub fn vote_count(&self) -> i64 {
        self.vote_count
    }

    pub fn description_len(&self) -> usize {
        self.description_len
    }

    /// Compares two items by display rank.
    ///
    /// Higher vote count ranks first; equal votes fall back to the lower id.
    /// Distinct ids never compare equal, so the order is total.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .vote_count
            .cmp(&self.vote_count)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl DimensionHints for Item {
    fn stored_size(&self) -> Option<(f64, f64)> {
        self.stored_width.zip(self.stored_height)
    }
}

/// Returns the items sorted by [`Item::rank_cmp`].
pub fn ranked<'a>(items: impl IntoIterator<Item = &'a Item>) -> Vec<&'a Item> {
    let mut ranked: Vec<&Item> = items.into_iter().collect();
    ranked.sort_by(|a, b| a.rank_cmp(b));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_prefers_votes_then_lower_id() {
        let a = Item::new(5, "a").with_votes(10);
        let b = Item::new(1, "b").with_votes(3);
        let c = Item::new(2, "c").with_votes(10);

        let order: Vec<i64> = ranked([&a, &b, &c]).iter().map(|i| i.id().get()).collect();
        assert_eq!(order, vec![2, 5, 1]);
    }

    #[test]
    fn test_rank_is_total_for_distinct_ids() {
        let a = Item::new(1, "x");
        let b = Item::new(2, "x");
        assert_eq!(a.rank_cmp(&b), Ordering::Less);
        assert_eq!(b.rank_cmp(&a), Ordering::Greater);
        assert_eq!(a.rank_cmp(&a), Ordering::Equal);
    }

    #[test]
    fn test_stored_dimension_requires_both_sides() {
        let none = Item::new(1, "a");
        assert!(none.stored_dimension().is_none());

        let valid = Item::new(1, "a").with_stored_size(400.0, 200.0);
        let dim = valid.stored_dimension().unwrap();
        assert!(dim.from_stored());
        assert!(dim.is_wide());

        let invalid = Item::new(1, "a").with_stored_size(400.0, 0.0);
        assert!(invalid.stored_dimension().is_none());
    }

    #[test]
    fn test_item_deserializes_collaborator_shape() {
        let item: Item = serde_json::from_str(
            r#"{"id": 9, "imageRef": "img/9.png", "voteCount": 2,
                "descriptionLength": 40, "width": 800, "height": 600}"#,
        )
        .unwrap();

        assert_eq!(item.id(), ItemId::new(9));
        assert_eq!(item.image_ref().as_str(), "img/9.png");
        assert_eq!(item.description_len(), 40);
        assert_eq!(item.stored_size(), Some((800.0, 600.0)));
    }
}

//! Content fingerprints for item collections.
//!
//! A [`Fingerprint`] summarizes everything about a collection that can change
//! its ordering: which items are present, their image handles, their vote
//! counts, their description lengths and their stored size hints. It is a
//! cache key and a staleness token, never an identity.
//!
//! Items are hashed in ascending id order, so the same collection delivered
//! in a different sequence yields the same fingerprint.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::item::{DimensionHints, Item};

/// Fingerprint of the empty collection.
pub const EMPTY_FINGERPRINT: &str = "empty";

/// Derived cache key for an item collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Computes the fingerprint of a collection.
    ///
    /// # Examples
    ///
    /// ```
    /// # use mosaic_core::{fingerprint::Fingerprint, item::Item};
    /// let items = vec![Item::new(1, "a.jpg").with_votes(3)];
    /// let fp = Fingerprint::of(&items);
    ///
    /// // Any vote change produces a different fingerprint.
    /// let voted = vec![Item::new(1, "a.jpg").with_votes(4)];
    /// assert_ne!(fp, Fingerprint::of(&voted));
    ///
    /// assert_eq!(Fingerprint::of(&[]).as_str(), "empty");
    /// ```
    pub fn of(items: &[Item]) -> Self {
        if items.is_empty() {
            return Self::empty();
        }

        let mut sorted: Vec<&Item> = items.iter().collect();
        sorted.sort_by_key(|item| item.id());

        let mut hasher = FxHasher::default();
        hasher.write_u64(sorted.len() as u64);
        for item in sorted {
            hasher.write_i64(item.id().get());
            item.image_ref().as_str().hash(&mut hasher);
            hasher.write_u64(item.description_len() as u64);
            hasher.write_i64(item.vote_count());
            match item.stored_size() {
                Some((width, height)) => {
                    hasher.write_u8(1);
                    hasher.write_u64(width.to_bits());
                    hasher.write_u64(height.to_bits());
                }
                None => hasher.write_u8(0),
            }
        }

        Self(format!("{:016x}", hasher.finish()))
    }

    /// The fingerprint of an empty collection.
    pub fn empty() -> Self {
        Self(EMPTY_FINGERPRINT.to_string())
    }

    /// Returns `true` if this is the empty-collection fingerprint.
    pub fn is_empty(&self) -> bool {
        self.0 == EMPTY_FINGERPRINT
    }

    /// Returns the fingerprint as a string slice (the wire `versionHash`).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Item> {
        vec![
            Item::new(1, "a.jpg").with_votes(2).with_description_len(10),
            Item::new(2, "b.jpg").with_votes(0).with_description_len(0),
        ]
    }

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(Fingerprint::of(&sample()), Fingerprint::of(&sample()));
    }

    #[test]
    fn test_fingerprint_ignores_delivery_order() {
        let mut reversed = sample();
        reversed.reverse();
        assert_eq!(Fingerprint::of(&sample()), Fingerprint::of(&reversed));
    }

    #[test]
    fn test_fingerprint_tracks_every_component() {
        let base = Fingerprint::of(&sample());

        let mut changed = sample();
        changed[0] = Item::new(1, "other.jpg").with_votes(2).with_description_len(10);
        assert_ne!(base, Fingerprint::of(&changed));

        let mut changed = sample();
        changed[1] = Item::new(2, "b.jpg").with_description_len(1);
        assert_ne!(base, Fingerprint::of(&changed));

        let mut changed = sample();
        changed.pop();
        assert_ne!(base, Fingerprint::of(&changed));
    }

    #[test]
    fn test_fingerprint_tracks_stored_size() {
        let base = Fingerprint::of(&sample());

        let mut sized = sample();
        sized[1] = Item::new(2, "b.jpg").with_stored_size(1920.0, 1080.0);
        let with_size = Fingerprint::of(&sized);
        assert_ne!(base, with_size);

        let mut resized = sample();
        resized[1] = Item::new(2, "b.jpg").with_stored_size(1080.0, 1920.0);
        assert_ne!(with_size, Fingerprint::of(&resized));
        assert_eq!(with_size, Fingerprint::of(&sized));
    }

    #[test]
    fn test_empty_fingerprint() {
        let fp = Fingerprint::of(&[]);
        assert!(fp.is_empty());
        assert_eq!(fp.as_str(), EMPTY_FINGERPRINT);
        assert!(!Fingerprint::of(&sample()).is_empty());
    }
}

//! Identifier types for gallery items, collections and images.
//!
//! All identifiers are thin newtypes so that an item id can never be passed
//! where a collection id is expected. They serialize transparently, matching
//! the plain integers and strings used by the collaborator's JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable, unique identifier of a displayable item.
///
/// Ordering of `ItemId` is the numeric ordering, which the tie-break rule
/// relies on ("lower id first").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    /// Creates a new item id.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw integer value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the collection (e.g. an issue) that owns a set of items.
///
/// Used to scope the ordering cache: each collection keeps at most one cached
/// ordering, the one for its latest fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(i64);

impl CollectionId {
    /// Creates a new collection id.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw integer value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for CollectionId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle used to look up an image's dimensions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Creates a new image reference.
    pub fn new(image_ref: impl Into<String>) -> Self {
        Self(image_ref.into())
    }

    /// Returns the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageRef {
    fn from(image_ref: &str) -> Self {
        Self::new(image_ref)
    }
}

impl From<String> for ImageRef {
    fn from(image_ref: String) -> Self {
        Self(image_ref)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

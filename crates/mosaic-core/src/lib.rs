//! Mosaic Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Mosaic ordering
//! and layout engines. It includes:
//!
//! - **Identifiers**: Item, collection and image handles ([`identifier`] module)
//! - **Dimensions**: Validated image dimensions and the wide-image rule ([`dimension`] module)
//! - **Items**: Displayable gallery items and the tie-break rule ([`item`] module)
//! - **Fingerprints**: Content-derived cache keys ([`fingerprint::Fingerprint`])
//! - **Snapshots**: Explicit per-pass dimension state ([`snapshot::DimensionSnapshot`])
//! - **Ordering**: The ordering result shared with the wire format ([`ordering::OrderingResult`])
//! - **Geometry**: Placement rectangles ([`geometry`] module)
//! - **Colors**: CSS color handling for previews ([`color::Color`])

pub mod color;
pub mod dimension;
pub mod fingerprint;
pub mod geometry;
pub mod identifier;
pub mod item;
pub mod ordering;
pub mod snapshot;

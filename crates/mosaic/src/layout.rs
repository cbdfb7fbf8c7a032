//! Layout engine for placing gallery items.
//!
//! This module turns an ordered item list plus (possibly partial) dimension
//! data into exact rectangles inside a column layout.
//!
//! # Pipeline Position
//!
//! ```text
//! Items + DimensionSnapshot
//!     ↓ ordering
//! OrderingResult (or fallback order)
//!     ↓ layout (this module)
//! Layout / ResponsiveLayout
//!     ↓ export / render
//! Output
//! ```
//!
//! # Submodules
//!
//! - [`skyline`] - Shortest-column skyline packing for one column count
//! - [`responsive`] - 2- and 4-column layouts with backend/fallback order selection
//!
//! Every call is a full recomputation; previously returned layouts are never
//! patched. Progressive rendering simply calls again with more dimensions
//! known.

pub mod responsive;
pub mod skyline;

pub use responsive::{OrderSource, ResponsiveLayout};
pub use skyline::SkylineEngine;

use serde::Serialize;

use mosaic_core::{
    dimension::{self, Dimension},
    geometry::Rect,
    identifier::ItemId,
    item::Item,
    snapshot::DimensionSnapshot,
};

use crate::error::MosaicError;

/// Column geometry for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpec {
    columns: usize,
    column_width: f64,
    gap: f64,
}

impl ColumnSpec {
    /// Creates a validated column specification.
    ///
    /// # Errors
    ///
    /// Returns [`MosaicError::Layout`] if `columns` is zero, `column_width`
    /// is not positive and finite, or `gap` is negative or not finite.
    pub fn new(columns: usize, column_width: f64, gap: f64) -> Result<Self, MosaicError> {
        if columns == 0 {
            return Err(MosaicError::Layout("column count must be positive".into()));
        }
        if !(column_width.is_finite() && column_width > 0.0) {
            return Err(MosaicError::Layout(format!(
                "column width must be positive and finite, got {column_width}"
            )));
        }
        if !(gap.is_finite() && gap >= 0.0) {
            return Err(MosaicError::Layout(format!(
                "gap must be non-negative and finite, got {gap}"
            )));
        }
        Ok(Self {
            columns,
            column_width,
            gap,
        })
    }

    /// Gapless columns for simulated placement.
    ///
    /// Skips validation; callers pass a positive count and a positive finite width.
    pub(crate) fn gapless(columns: usize, column_width: f64) -> Self {
        debug_assert!(columns > 0 && column_width > 0.0);
        Self {
            columns,
            column_width,
            gap: 0.0,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn column_width(&self) -> f64 {
        self.column_width
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    /// Left edge of column `column`.
    pub fn column_x(&self, column: usize) -> f64 {
        column as f64 * (self.column_width + self.gap)
    }

    /// Width of a tile spanning `span` adjacent columns, including the gaps between them.
    pub fn span_width(&self, span: usize) -> f64 {
        span as f64 * self.column_width + span.saturating_sub(1) as f64 * self.gap
    }

    /// Total width of all columns and gaps.
    pub fn container_width(&self) -> f64 {
        self.span_width(self.columns)
    }
}

/// One item as seen by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutInput {
    id: ItemId,
    aspect_ratio: f64,
    is_loaded: bool,
}

impl LayoutInput {
    /// Creates an input from an item id and its best-known dimension.
    pub fn new(id: ItemId, dimension: Dimension) -> Self {
        Self {
            id,
            aspect_ratio: dimension.aspect_ratio(),
            is_loaded: dimension.is_loaded(),
        }
    }

    /// Creates an input for `item`, looking its dimension up in `snapshot`.
    pub fn from_item(item: &Item, snapshot: &DimensionSnapshot) -> Self {
        Self::new(item.id(), snapshot.dimension_for(item))
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    pub fn is_wide(&self) -> bool {
        dimension::is_wide(self.aspect_ratio)
    }
}

/// A placed item: the rectangle it occupies plus what the renderer needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    id: ItemId,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    is_wide: bool,
    aspect_ratio: f64,
    is_loaded: bool,
}

impl LayoutItem {
    fn new(input: &LayoutInput, rect: Rect, is_wide: bool) -> Self {
        Self {
            id: input.id,
            x: rect.x(),
            y: rect.y(),
            width: rect.width(),
            height: rect.height(),
            is_wide,
            aspect_ratio: input.aspect_ratio,
            is_loaded: input.is_loaded,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the occupied rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Returns `true` if the item spans two columns.
    pub fn is_wide(&self) -> bool {
        self.is_wide
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }
}

/// The result of one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    columns: usize,
    container_width: f64,
    container_height: f64,
    items: Vec<LayoutItem>,
}

impl Layout {
    /// An empty layout for `spec`.
    pub fn empty(spec: &ColumnSpec) -> Self {
        Self {
            columns: spec.columns(),
            container_width: spec.container_width(),
            container_height: 0.0,
            items: Vec::new(),
        }
    }

    /// Placed items, in placement order.
    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    /// Height of the container: the tallest column minus the trailing gap.
    pub fn container_height(&self) -> f64 {
        self.container_height
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up the placement of an item.
    pub fn get(&self, id: ItemId) -> Option<&LayoutItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns the first pair of items whose rectangles overlap, if any.
    ///
    /// Quadratic; meant for verification and diagnostics.
    pub fn find_overlap(&self) -> Option<(ItemId, ItemId)> {
        self.items.iter().enumerate().find_map(|(i, a)| {
            self.items[i + 1..]
                .iter()
                .find(|b| a.rect().overlaps(b.rect()))
                .map(|b| (a.id, b.id))
        })
    }
}

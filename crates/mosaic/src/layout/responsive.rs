//! Responsive (2- and 4-column) layouts with order selection.
//!
//! The backend [`OrderingResult`] is used when it is present and describes
//! exactly the current item set. Otherwise the items are laid out in the
//! order they were supplied and the layout is marked
//! [`OrderSource::Fallback`]; either way every item gets a rectangle.

use std::collections::HashMap;

use log::{debug, warn};
use serde::Serialize;

use mosaic_core::{
    identifier::ItemId, item::Item, ordering::OrderingResult, snapshot::DimensionSnapshot,
};

use super::{ColumnSpec, Layout, LayoutInput, SkylineEngine};
use crate::{config::LayoutConfig, error::MosaicError};

/// Where the display order of a layout came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderSource {
    /// The ordering engine's optimized order.
    Backend,
    /// The natural input order; ordering was unavailable or did not match.
    Fallback,
}

impl OrderSource {
    /// Returns `true` for the degraded fallback path.
    pub fn is_degraded(self) -> bool {
        matches!(self, Self::Fallback)
    }
}

/// Picks the display order for `columns` columns.
///
/// Returns the backend order when `ordering` is a permutation of the ids in
/// `items`, otherwise `items` as supplied.
pub fn select_order<'a>(
    items: &'a [Item],
    ordering: Option<&OrderingResult>,
    columns: usize,
) -> (Vec<&'a Item>, OrderSource) {
    let Some(ordering) = ordering else {
        debug!(items = items.len(); "No ordering available, using input order");
        return (items.iter().collect(), OrderSource::Fallback);
    };

    if !ordering.matches_items(items) {
        warn!(
            items = items.len(),
            ordered = ordering.count();
            "Ordering does not match current items, using input order"
        );
        return (items.iter().collect(), OrderSource::Fallback);
    }

    let by_id: HashMap<ItemId, &Item> = items.iter().map(|item| (item.id(), item)).collect();
    let ordered = ordering
        .ordered_ids_for(columns)
        .iter()
        .filter_map(|id| by_id.get(id).copied())
        .collect();
    (ordered, OrderSource::Backend)
}

/// Layout inputs for `items` in the selected order.
pub fn layout_inputs(
    items: &[Item],
    ordering: Option<&OrderingResult>,
    snapshot: &DimensionSnapshot,
    columns: usize,
) -> (Vec<LayoutInput>, OrderSource) {
    let (ordered, source) = select_order(items, ordering, columns);
    let inputs = ordered
        .into_iter()
        .map(|item| LayoutInput::from_item(item, snapshot))
        .collect();
    (inputs, source)
}

/// The 2-column and 4-column layouts of one collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiveLayout {
    source: OrderSource,
    two_column: Layout,
    four_column: Layout,
}

impl ResponsiveLayout {
    /// Computes both presentations from the current items and dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`MosaicError::Layout`] if a configured breakpoint does not
    /// yield a valid [`ColumnSpec`].
    pub fn compute(
        items: &[Item],
        ordering: Option<&OrderingResult>,
        snapshot: &DimensionSnapshot,
        config: &LayoutConfig,
    ) -> Result<Self, MosaicError> {
        let two_spec = config.two_column().column_spec(2)?;
        let four_spec = config.four_column().column_spec(4)?;
        Ok(Self::compute_with_specs(
            items, ordering, snapshot, &two_spec, &four_spec,
        ))
    }

    /// Computes both presentations with explicit column geometry.
    pub fn compute_with_specs(
        items: &[Item],
        ordering: Option<&OrderingResult>,
        snapshot: &DimensionSnapshot,
        two_spec: &ColumnSpec,
        four_spec: &ColumnSpec,
    ) -> Self {
        let engine = SkylineEngine::new();

        let (two_inputs, source) = layout_inputs(items, ordering, snapshot, two_spec.columns());
        let (four_inputs, _) = layout_inputs(items, ordering, snapshot, four_spec.columns());

        Self {
            source,
            two_column: engine.layout(&two_inputs, two_spec),
            four_column: engine.layout(&four_inputs, four_spec),
        }
    }

    /// Where the order came from.
    pub fn source(&self) -> OrderSource {
        self.source
    }

    pub fn two_column(&self) -> &Layout {
        &self.two_column
    }

    pub fn four_column(&self) -> &Layout {
        &self.four_column
    }

    /// The layout for a column count: 2 or fewer → 2-column, otherwise 4-column.
    pub fn for_columns(&self, columns: usize) -> &Layout {
        if columns <= 2 {
            &self.two_column
        } else {
            &self.four_column
        }
    }
}

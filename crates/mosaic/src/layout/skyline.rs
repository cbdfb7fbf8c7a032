//! Shortest-column skyline packing.
//!
//! Items are placed strictly in the given order. A regular item drops into
//! the currently shortest column; a wide item (aspect ratio ≥ 16:9) takes the
//! pair of adjacent columns whose taller member is lowest and spans both.
//! Ties always go to the smallest column index, which makes the result a pure
//! function of order, dimensions and column geometry.
//!
//! ```text
//!   col 0   col 1
//!  ┌──────┐
//!  │  A   │         A: regular, shortest column is 0
//!  ├──────┴──────┐
//!  │      B      │  B: wide, spans (0, 1) at max(h0, h1)
//!  ├──────┬──────┤
//!  │  C   │  D   │
//!  │      ├──────┘
//!  └──────┘
//! ```

use log::trace;

use mosaic_core::geometry::Rect;

use super::{ColumnSpec, Layout, LayoutInput, LayoutItem};

/// Column height accumulators for a single layout pass.
///
/// Created per pass and dropped afterwards; never shared.
#[derive(Debug, Clone)]
pub(crate) struct Skyline {
    heights: Vec<f64>,
}

impl Skyline {
    pub(crate) fn new(columns: usize) -> Self {
        Self {
            heights: vec![0.0; columns],
        }
    }

    /// Index of the shortest column, smallest index on ties.
    fn shortest_column(&self) -> usize {
        let mut best = 0;
        for (column, height) in self.heights.iter().enumerate().skip(1) {
            if *height < self.heights[best] {
                best = column;
            }
        }
        best
    }

    /// Start index of the adjacent pair with the lowest `max` height,
    /// smallest index on ties. `None` with fewer than two columns.
    fn lowest_pair(&self) -> Option<usize> {
        self.heights
            .windows(2)
            .map(|pair| pair[0].max(pair[1]))
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (column, top)| match best {
                Some((_, best_top)) if best_top <= top => best,
                _ => Some((column, top)),
            })
            .map(|(column, _)| column)
    }

    /// Places one tile into the columns of `spec` and advances the affected columns.
    pub(crate) fn place(
        &mut self,
        aspect_ratio: f64,
        wide: bool,
        spec: &ColumnSpec,
    ) -> (Rect, bool) {
        let pair = if wide { self.lowest_pair() } else { None };

        match pair {
            Some(column) => {
                let y = self.heights[column].max(self.heights[column + 1]);
                let width = spec.span_width(2);
                let height = width / aspect_ratio;
                let bottom = y + height + spec.gap();
                self.heights[column] = bottom;
                self.heights[column + 1] = bottom;
                (Rect::new(spec.column_x(column), y, width, height), true)
            }
            None => {
                let column = self.shortest_column();
                let y = self.heights[column];
                let width = spec.span_width(1);
                let height = width / aspect_ratio;
                self.heights[column] = y + height + spec.gap();
                (Rect::new(spec.column_x(column), y, width, height), false)
            }
        }
    }

    /// Tallest column minus the trailing gap, or zero if nothing was placed.
    pub(crate) fn container_height(&self, gap: f64, placed: usize) -> f64 {
        if placed == 0 {
            return 0.0;
        }
        let tallest = self.heights.iter().copied().fold(0.0, f64::max);
        (tallest - gap).max(0.0)
    }

    /// Sum of absolute pairwise differences between column heights.
    pub(crate) fn balance_cost(&self) -> f64 {
        let mut cost = 0.0;
        for (i, a) in self.heights.iter().enumerate() {
            for b in &self.heights[i + 1..] {
                cost += (a - b).abs();
            }
        }
        cost
    }
}

/// Skyline layout engine.
///
/// Stateless; all working state lives in a per-call [`Skyline`], so one
/// engine can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkylineEngine;

impl SkylineEngine {
    pub fn new() -> Self {
        Self
    }

    /// Lays out `inputs` in order into the columns described by `spec`.
    ///
    /// Runs in O(n·N) for n items and N columns.
    pub fn layout(&self, inputs: &[LayoutInput], spec: &ColumnSpec) -> Layout {
        let mut skyline = Skyline::new(spec.columns());
        let mut items = Vec::with_capacity(inputs.len());

        for input in inputs {
            let (rect, spans_two) = skyline.place(input.aspect_ratio(), input.is_wide(), spec);
            items.push(LayoutItem::new(input, rect, spans_two));
        }

        let container_height = skyline.container_height(spec.gap(), items.len());
        trace!(
            columns = spec.columns(),
            items = items.len(),
            container_height;
            "Skyline layout computed"
        );

        Layout {
            columns: spec.columns(),
            container_width: spec.container_width(),
            container_height,
            items,
        }
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use mosaic_core::{dimension::Dimension, identifier::ItemId};

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn inputs_strategy() -> impl Strategy<Value = Vec<LayoutInput>> {
        prop::collection::vec(0.3f64..3.5, 0..40).prop_map(|ratios| {
            ratios
                .into_iter()
                .enumerate()
                .map(|(i, ratio)| {
                    let dim = Dimension::loaded(ratio * 100.0, 100.0).unwrap();
                    LayoutInput::new(ItemId::new(i as i64), dim)
                })
                .collect()
        })
    }

    fn spec_strategy() -> impl Strategy<Value = ColumnSpec> {
        (1usize..6, 50.0f64..400.0, 0.0f64..24.0)
            .prop_map(|(columns, width, gap)| ColumnSpec::new(columns, width, gap).unwrap())
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Every input is placed exactly once, inside the container, without overlap.
    fn check_layout_is_complete_and_disjoint(
        inputs: &[LayoutInput],
        spec: &ColumnSpec,
    ) -> Result<(), TestCaseError> {
        let layout = SkylineEngine::new().layout(inputs, spec);

        prop_assert_eq!(layout.len(), inputs.len());
        prop_assert!(layout.find_overlap().is_none());
        for item in layout.items() {
            prop_assert!(item.x() >= 0.0);
            prop_assert!(item.rect().max_x() <= spec.container_width() + 1e-6);
            prop_assert!(item.y() + item.height() <= layout.container_height() + 1e-6);
        }
        Ok(())
    }

    /// Same inputs, same layout.
    fn check_layout_is_deterministic(
        inputs: &[LayoutInput],
        spec: &ColumnSpec,
    ) -> Result<(), TestCaseError> {
        let engine = SkylineEngine::new();
        prop_assert_eq!(engine.layout(inputs, spec), engine.layout(inputs, spec));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn layout_is_complete_and_disjoint(inputs in inputs_strategy(), spec in spec_strategy()) {
            check_layout_is_complete_and_disjoint(&inputs, &spec)?;
        }

        #[test]
        fn layout_is_deterministic(inputs in inputs_strategy(), spec in spec_strategy()) {
            check_layout_is_deterministic(&inputs, &spec)?;
        }
    }
}

//! Placement rectangles for laid-out gallery items.
//!
//! # Coordinate System
//!
//! Mosaic uses the same coordinate system as CSS and SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Rectangles are anchored at their top-left corner. Coordinates are `f64`
//! pixels relative to the layout container.

/// Tolerance used when deciding whether two rectangles overlap.
///
/// Adjacent tiles share an edge exactly in theory, but accumulated float
/// error can push one a hair into its neighbour.
pub const OVERLAP_EPSILON: f64 = 1e-6;

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the left edge
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the top edge
    pub fn y(self) -> f64 {
        self.y
    }

    pub fn width(self) -> f64 {
        self.width
    }

    pub fn height(self) -> f64 {
        self.height
    }

    /// Returns the right edge (`x + width`)
    pub fn max_x(self) -> f64 {
        self.x + self.width
    }

    /// Returns the bottom edge (`y + height`)
    pub fn max_y(self) -> f64 {
        self.y + self.height
    }

    /// Returns `true` if the interiors of both rectangles intersect.
    ///
    /// Rectangles that only share an edge do not overlap.
    pub fn overlaps(self, other: Self) -> bool {
        self.x < other.max_x() - OVERLAP_EPSILON
            && other.x < self.max_x() - OVERLAP_EPSILON
            && self.y < other.max_y() - OVERLAP_EPSILON
            && other.y < self.max_y() - OVERLAP_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_approx_eq!(f64, rect.max_x(), 40.0);
        assert_approx_eq!(f64, rect.max_y(), 60.0);
    }

    #[test]
    fn test_shared_edge_is_not_overlap() {
        let left = Rect::new(0.0, 0.0, 100.0, 100.0);
        let right = Rect::new(100.0, 0.0, 100.0, 100.0);
        let below = Rect::new(0.0, 100.0, 100.0, 50.0);

        assert!(!left.overlaps(right));
        assert!(!left.overlaps(below));
    }

    #[test]
    fn test_intersecting_rectangles_overlap() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 100.0, 100.0);
        assert!(a.overlaps(b));
        assert!(b.overlaps(a));
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (
            -1000.0f64..1000.0,
            -1000.0f64..1000.0,
            1.0f64..500.0,
            1.0f64..500.0,
        )
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Overlap is symmetric.
    fn check_overlap_is_symmetric(a: Rect, b: Rect) -> Result<(), TestCaseError> {
        prop_assert_eq!(a.overlaps(b), b.overlaps(a));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
            check_overlap_is_symmetric(a, b)?;
        }
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cover topology whose root grows to fit the data.

use crate::config::FieldConfig;
use crate::topology::{Cells, Topology};
use crate::types::{Point, Rect, Size};

use super::quadrants;

/// Quadrant subdivision with an unbounded, lazily created root.
///
/// The first insertion creates a square power-of-two root around the object.
/// When an object later falls outside, the root doubles in both dimensions,
/// centered on the old root's corner facing the object, and the old root
/// becomes one of the new root's quadrants.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BottomUpCover {
    overlap: f64,
}

impl BottomUpCover {
    /// A bottom-up policy with the given overlap factor, clamped to `[0, 1]`.
    pub fn new(overlap: f64) -> Self {
        Self {
            overlap: FieldConfig::default().with_overlap(overlap).clamped_overlap(),
        }
    }

    /// The clamped overlap factor.
    pub const fn overlap(&self) -> f64 {
        self.overlap
    }
}

impl Topology for BottomUpCover {
    const FAN_OUT: usize = 4;
    const SHARES_CHILDREN: bool = false;

    fn from_config(config: &FieldConfig) -> Self {
        Self {
            overlap: config.clamped_overlap(),
        }
    }

    fn initial_root(&self, _config: &FieldConfig) -> Option<Rect> {
        None
    }

    fn operating_bounds(&self, actual: Rect) -> Rect {
        actual.scaled(1.0 + self.overlap)
    }

    fn cells(&self, actual: Rect) -> Cells {
        quadrants(actual)
    }

    fn grow(&self, root: Rect, toward: Point) -> Option<Rect> {
        let lo = root.twice_min();
        let hi = root.twice_max();
        // The new center is the old corner on the side of `toward`, which makes
        // the old root an exact quadrant of the new one.
        let corner = if toward.x >= lo.x && toward.y >= hi.y {
            Point::new(hi.x, hi.y)
        } else if toward.x < lo.x && toward.y >= lo.y {
            Point::new(lo.x, hi.y)
        } else if toward.x < hi.x && toward.y < lo.y {
            Point::new(lo.x, lo.y)
        } else {
            Point::new(hi.x, lo.y)
        };
        let size = Size::new(root.width().saturating_mul(2), root.height().saturating_mul(2));
        Some(Rect::from_twice_center(corner, size))
    }
}

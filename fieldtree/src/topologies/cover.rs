// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-extent cover topology.

use crate::config::FieldConfig;
use crate::topology::{Cells, Topology};
use crate::types::Rect;

use super::quadrants;

/// Quadrant subdivision of a fixed root with loose operating bounds.
///
/// Each field's operating bounds are its actual bounds scaled by `1 + overlap`,
/// so an object straddling a quadrant boundary by a little still sinks into
/// the quadrant holding its center.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cover {
    overlap: f64,
}

impl Cover {
    /// A cover policy with the given overlap factor, clamped to `[0, 1]`.
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

impl Topology for Cover {
    const FAN_OUT: usize = 4;
    const SHARES_CHILDREN: bool = false;

    fn from_config(config: &FieldConfig) -> Self {
        Self {
            overlap: config.clamped_overlap(),
        }
    }

    fn initial_root(&self, config: &FieldConfig) -> Option<Rect> {
        Some(config.extent())
    }

    fn operating_bounds(&self, actual: Rect) -> Rect {
        actual.scaled(1.0 + self.overlap)
    }

    fn cells(&self, actual: Rect) -> Cells {
        quadrants(actual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Size;

    #[test]
    fn operating_bounds_are_enlarged() {
        let cover = Cover::new(0.3);
        let op = cover.operating_bounds(Rect::from_center_size(0, 0, 10, 10));
        assert_eq!(op.size(), Size::new(13, 13));
        assert_eq!(Cover::new(4.0).overlap(), 1.0);
    }

    #[test]
    fn four_cells_per_field() {
        let cover = Cover::new(0.0);
        assert_eq!(cover.cells(Rect::from_center_size(0, 0, 8, 8)).len(), Cover::FAN_OUT);
    }
}

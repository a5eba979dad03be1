// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction parameters shared by every tree variant.

use crate::types::{Point, Rect, Size};

/// Node capacity used when none is given.
pub const DEFAULT_CAPACITY: usize = 2;

/// Construction parameters for a field tree.
///
/// `width`, `height` and `center` describe the fixed extent of the cover and
/// partition variants; the bottom-up variant ignores them and sizes its root
/// from the first inserted object.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FieldConfig {
    /// Width of the root field.
    pub width: i64,
    /// Height of the root field.
    pub height: i64,
    /// Center of the root field.
    pub center: Point,
    /// Number of objects a leaf holds before it subdivides.
    pub capacity: usize,
    /// Enlargement factor for operating bounds, clamped to `[0, 1]` on use.
    pub overlap: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            center: Point::new(0, 0),
            capacity: DEFAULT_CAPACITY,
            overlap: 0.0,
        }
    }
}

impl FieldConfig {
    /// A configuration for a root of the given extent centered on the origin.
    pub fn new(width: i64, height: i64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Move the root center.
    #[must_use]
    pub const fn with_center(mut self, x: i64, y: i64) -> Self {
        self.center = Point::new(x, y);
        self
    }

    /// Set the per-node capacity.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the overlap factor.
    #[must_use]
    pub const fn with_overlap(mut self, overlap: f64) -> Self {
        self.overlap = overlap;
        self
    }

    /// The overlap factor clamped to `[0, 1]`; NaN counts as zero.
    pub fn clamped_overlap(&self) -> f64 {
        if self.overlap.is_nan() {
            0.0
        } else {
            self.overlap.clamp(0.0, 1.0)
        }
    }

    /// The root extent described by `width`, `height` and `center`.
    pub const fn extent(&self) -> Rect {
        Rect::new(self.center, Size::new(self.width, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_clamped() {
        assert_eq!(FieldConfig::new(8, 8).with_overlap(1.7).clamped_overlap(), 1.0);
        assert_eq!(FieldConfig::new(8, 8).with_overlap(-0.2).clamped_overlap(), 0.0);
        assert_eq!(FieldConfig::new(8, 8).with_overlap(f64::NAN).clamped_overlap(), 0.0);
        assert_eq!(FieldConfig::new(8, 8).with_overlap(0.3).clamped_overlap(), 0.3);
    }

    #[test]
    fn builder_sets_fields() {
        let cfg = FieldConfig::new(10, 20).with_center(1, -1).with_capacity(5);
        assert_eq!(cfg.capacity, 5);
        assert_eq!(cfg.extent(), Rect::from_center_size(1, -1, 10, 20));
        assert_eq!(FieldConfig::default().capacity, DEFAULT_CAPACITY);
    }
}

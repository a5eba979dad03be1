// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Topology policy trait used by `FieldTreeGeneric`.

use core::fmt::Debug;

use smallvec::SmallVec;

use crate::config::FieldConfig;
use crate::types::{Point, Rect, Size};

/// Child cells produced by one subdivision.
pub type Cells = SmallVec<[Rect; 9]>;

/// How a field tree subdivides, enlarges and grows its fields.
///
/// The node model and tree engine are written once; a topology only supplies
/// geometry and a couple of structural switches.
pub trait Topology: Copy + Debug {
    /// Number of cells produced by one subdivision.
    const FAN_OUT: usize;

    /// Whether a child may be referenced by several parents. When set, creating
    /// children first reuses identical cells already built by neighbors.
    const SHARES_CHILDREN: bool;

    /// Build the policy from construction parameters.
    fn from_config(config: &FieldConfig) -> Self;

    /// Actual bounds of the root created with the tree, or `None` when the
    /// root is only created by the first insertion.
    fn initial_root(&self, config: &FieldConfig) -> Option<Rect>;

    /// Bounds used for containment and intersection tests.
    fn operating_bounds(&self, actual: Rect) -> Rect;

    /// Actual bounds of the children of a field, in creation order.
    fn cells(&self, actual: Rect) -> Cells;

    /// Root for an empty tree whose first object has bounds `first`: a square
    /// power-of-two field centered on the object.
    fn seed_root(&self, first: &Rect) -> Rect {
        let side = first
            .width()
            .max(first.height())
            .max(1)
            .unsigned_abs()
            .next_power_of_two();
        let side = i64::try_from(side).unwrap_or(i64::MAX);
        Rect::from_twice_center(first.twice_center(), Size::new(side, side))
    }

    /// A root twice as large as `root` that extends toward `toward`, given in
    /// twice-coordinates. Fixed-extent topologies return `None`.
    fn grow(&self, root: Rect, toward: Point) -> Option<Rect> {
        let _ = (root, toward);
        None
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=fieldtree --heading-base-level=0

//! Field Tree: a mutable 2D spatial index with adaptive, capacity-bounded subdivision.
//!
//! Objects implement [`Spatial`] (an integer center and size plus equality) and
//! are indexed by their axis-aligned bounding boxes.
//!
//! - Insert one object at a time with [`FieldTreeGeneric::add`], or many with
//!   [`FieldTreeGeneric::add_many`], which defers reorganization to one pass.
//! - Remove by equality, or pop the object nearest to a point.
//! - Query by circle ([`FieldTreeGeneric::range_query`]), by window
//!   ([`FieldTreeGeneric::window_query`]) or by proximity, either single-shot
//!   ([`FieldTreeGeneric::find_nearest`]) or incrementally, one object at a
//!   time in non-decreasing distance.
//!
//! Three topologies share one node model and one engine:
//!
//! - [`CoverFieldTree`]: a fixed extent split into quadrants. Each field's
//!   operating bounds are enlarged by an overlap factor so objects that
//!   straddle a boundary by a little still sink.
//! - [`BottomUpFieldTree`]: the same quadrants, but the root is created by the
//!   first insertion and doubles toward any object that falls outside.
//! - [`PartitionFieldTree`]: a fixed extent split into nine half-size cells
//!   that overlap their neighbors by half. Identical cells of adjacent fields
//!   are shared, which makes the structure a DAG.
//!
//! # Example
//!
//! ```rust
//! use fieldtree::{CoverFieldTree, Rect};
//!
//! // A 64×64 field centered on the origin with 30% loose bounds.
//! let mut tree = CoverFieldTree::new(64, 64, 0.3);
//! tree.add(Rect::from_center_size(1, 1, 2, 2));
//! tree.add(Rect::from_center_size(-10, 4, 4, 4));
//! tree.add(Rect::from_center_size(20, -20, 2, 2));
//!
//! // Nearest to the origin.
//! assert_eq!(tree.find_nearest(0, 0), [Rect::from_center_size(1, 1, 2, 2)]);
//!
//! // Everything inside a 30×30 window.
//! assert_eq!(tree.window_query(0, 0, 30, 30).len(), 2);
//!
//! // Walk outward from a point, one object at a time.
//! tree.init_incremental_nearest(20, -18);
//! assert_eq!(tree.incremental_nearest_next(), Some(Rect::from_center_size(20, -20, 2, 2)));
//! ```
//!
//! Coordinates are `i64`. Rectangles keep a doubled center internally, so the
//! half-unit centers produced by subdivision are exact, and distances are
//! compared as exact `i128` values.
//!
//! Structural events (subdivision, root growth and collapse) are reported
//! through the [`log`] facade at debug level; install any logger to see them.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod config;
pub mod field;
mod node;
pub mod query;
pub mod spatial;
pub mod topologies;
pub mod topology;
mod tree;
pub mod types;

pub use config::{DEFAULT_CAPACITY, FieldConfig};
pub use field::{BottomUpFieldTree, CoverFieldTree, FieldTreeGeneric, PartitionFieldTree};
pub use query::{NearestIter, NearestSearch};
pub use spatial::{Spatial, SpatialObj};
pub use topologies::{BottomUpCover, Cover, Partition};
pub use topology::Topology;
pub use types::{Point, Rect, Size};

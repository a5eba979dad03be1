// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Topology implementations.
//!
//! - [`Cover`]: fixed extent, four quadrant children per field, operating
//!   bounds enlarged by the overlap factor.
//! - [`BottomUpCover`]: same subdivision as [`Cover`], but the root is sized
//!   from the first object and doubles toward any object that falls outside.
//! - [`Partition`]: fixed extent, nine half-size children per field offset by
//!   a quarter of the extent. Neighboring fields share the children they have
//!   in common, so the structure is a DAG.

use crate::topology::Cells;
use crate::types::{Point, Rect, Size};

pub mod bottom_up;
pub mod cover;
pub mod partition;

pub use bottom_up::BottomUpCover;
pub use cover::Cover;
pub use partition::Partition;

/// The four quadrants of `actual` in the order min/min, max/min, min/max, max/max.
pub(crate) fn quadrants(actual: Rect) -> Cells {
    let size = Size::new(actual.width() / 2, actual.height() / 2);
    let c = actual.twice_center();
    let (x1, x2) = (c.x - size.width, c.x + size.width);
    let (y1, y2) = (c.y - size.height, c.y + size.height);
    [(x1, y1), (x2, y1), (x1, y2), (x2, y2)]
        .into_iter()
        .map(|(x, y)| Rect::from_twice_center(Point::new(x, y), size))
        .collect()
}

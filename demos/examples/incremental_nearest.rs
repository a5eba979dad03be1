// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental nearest neighbor.
//!
//! Walk objects outward from a point, first with the borrowing iterator and
//! then with the session stored in the tree.
//!
//! Run:
//! - `cargo run -p fieldtree_demos --example incremental_nearest`

use fieldtree::{PartitionFieldTree, Point, Rect, Size, Spatial};

#[derive(Clone, Debug, PartialEq)]
struct Marker {
    name: &'static str,
    at: Point,
}

impl Spatial for Marker {
    fn center_x(&self) -> i64 {
        self.at.x
    }
    fn center_y(&self) -> i64 {
        self.at.y
    }
    fn width(&self) -> i64 {
        1
    }
    fn height(&self) -> i64 {
        1
    }
}

fn main() {
    let mut tree = PartitionFieldTree::new(256, 256);
    for (name, x, y) in [
        ("harbor", 12, -3),
        ("mill", -40, 70),
        ("well", 2, 2),
        ("tower", 90, 90),
        ("bridge", -8, 0),
        ("gate", 0, -60),
    ] {
        tree.add(Marker {
            name,
            at: Point::new(x, y),
        });
    }

    let ordered: Vec<_> = tree.nearest_iter(0, 0).map(|m| m.name).collect();
    println!("outward from the origin: {ordered:?}");

    tree.init_incremental_nearest(90, 80);
    while let Some(marker) = tree.incremental_nearest_next() {
        let d = Rect::new(marker.at, Size::new(1, 1)).distance_sq_to_point(Point::new(90, 80));
        println!("{:>8} at distance {:.2}", marker.name, d.sqrt());
    }
    assert!(
        tree.incremental_search().is_some_and(|s| s.is_exhausted()),
        "the session visits every marker"
    );
}

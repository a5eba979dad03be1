// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field tree basics.
//!
//! Fill a cover tree with a few rectangles, then run nearest, window and
//! range queries and remove an object.
//!
//! Run:
//! - `cargo run -p fieldtree_demos --example field_tree_basics`

use fieldtree::{CoverFieldTree, FieldConfig, Rect};

fn main() {
    let mut tree = CoverFieldTree::with_config(
        FieldConfig::new(200, 200)
            .with_capacity(2)
            .with_overlap(0.25),
    );
    tree.add_many([
        Rect::from_center_size(10, 10, 4, 4),
        Rect::from_center_size(-40, 25, 10, 6),
        Rect::from_center_size(60, -60, 2, 2),
        Rect::from_center_size(-70, -70, 20, 20),
        Rect::from_center_size(0, 50, 150, 8),
    ]);
    println!("{} objects in {} fields: {tree:?}", tree.len(), tree.node_count());

    let nearest = tree.find_nearest(55, -50);
    println!("nearest to (55, -50): {nearest:?}");
    assert_eq!(nearest, [Rect::from_center_size(60, -60, 2, 2)], "closest is the small square");

    let window = tree.window_query(-20, 20, 100, 60);
    println!("inside the window: {window:?}");

    let range = tree.range_query(-60, -60, 40);
    println!("within 40 of (-60, -60): {range:?}");

    let removed = tree.remove(&Rect::from_center_size(0, 50, 150, 8));
    assert!(removed.is_some(), "the wide strip was present");
    println!("after removal: {} objects in {} fields", tree.len(), tree.node_count());
}

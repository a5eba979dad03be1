// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bottom-up growth.
//!
//! A bottom-up tree starts without a root and doubles it toward whatever is
//! inserted outside. Removing everything drops the root again.
//!
//! Run:
//! - `cargo run -p fieldtree_demos --example bottom_up_growth`

use fieldtree::{BottomUpFieldTree, Rect};

fn main() {
    let mut tree = BottomUpFieldTree::new(0.5);
    assert!(tree.extent().is_none(), "no root before the first insertion");

    let objects = [
        Rect::from_center_size(3, 3, 2, 2),
        Rect::from_center_size(40, -10, 6, 6),
        Rect::from_center_size(-900, 450, 30, 30),
        Rect::from_center_size(25_000, 25_000, 100, 100),
    ];
    for obj in objects {
        tree.add(obj);
        if let Some(extent) = tree.extent() {
            println!("after {obj}: extent {extent}, {} fields", tree.node_count());
        }
    }

    for obj in &objects {
        tree.remove(obj);
    }
    println!("emptied: {} fields, extent {:?}", tree.node_count(), tree.extent());
    assert_eq!(tree.node_count(), 0, "an empty bottom-up tree has no fields");
}

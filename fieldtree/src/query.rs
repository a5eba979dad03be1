// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range, window and nearest-neighbor queries.
//!
//! Distances are kept exact: priorities are squared distances in
//! twice-units (`i128`), so ordering never depends on rounding.

use alloc::collections::{BinaryHeap, VecDeque};
use core::cmp::Ordering;
use core::fmt::Debug;

use hashbrown::HashSet;
use smallvec::SmallVec;

use crate::field::FieldTreeGeneric;
use crate::node::{NodeId, Nodes, is_touching};
use crate::spatial::{Spatial, SpatialObj};
use crate::topology::Topology;
use crate::types::{Point, Rect};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Entry {
    Node(NodeId),
    /// A field and a position in its object list.
    Object(NodeId, usize),
}

/// Heap item ordered so that `BinaryHeap` pops the smallest key first, and
/// among equal keys the earliest pushed.
#[derive(Debug)]
struct Queued {
    key: i128,
    seq: u64,
    entry: Entry,
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

/// State of a resumable nearest-neighbor search.
///
/// Each call to advance the search pops the closest pending entry. Fields are
/// expanded into their objects and children, each keyed by its own distance;
/// objects are yielded. The state holds handles only, so it does not borrow
/// the tree between steps.
#[derive(Debug)]
pub struct NearestSearch {
    origin: Point,
    queue: BinaryHeap<Queued>,
    expanded: HashSet<NodeId>,
    seq: u64,
}

impl NearestSearch {
    pub(crate) fn new(origin: Point, root: Option<NodeId>) -> Self {
        let mut search = Self {
            origin,
            queue: BinaryHeap::new(),
            expanded: HashSet::new(),
            seq: 0,
        };
        if let Some(root) = root {
            search.push(0, Entry::Node(root));
        }
        search
    }

    /// The point distances are measured from.
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Number of queued fields and objects.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is left to yield.
    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }

    fn push(&mut self, key: i128, entry: Entry) {
        self.queue.push(Queued {
            key,
            seq: self.seq,
            entry,
        });
        self.seq += 1;
    }

    /// The next object as a field handle and object position.
    pub(crate) fn advance<T>(&mut self, nodes: &Nodes<T>) -> Option<(NodeId, usize)> {
        while let Some(cur) = self.queue.pop() {
            while self.queue.peek().is_some_and(|next| next.entry == cur.entry) {
                self.queue.pop();
            }
            let id = match cur.entry {
                Entry::Object(node, idx) => return Some((node, idx)),
                Entry::Node(id) => id,
            };
            if !self.expanded.insert(id) {
                continue;
            }
            let Some(node) = nodes.get(id) else {
                continue;
            };
            // The root is queued at zero, which keeps objects parked at a
            // fixed root outside its bounds.
            let floor = cur.key;
            for (idx, obj) in node.objects().enumerate() {
                let d = obj.bounds().twice_distance_sq(self.origin);
                if d >= floor {
                    self.push(d, Entry::Object(id, idx));
                }
            }
            for &c in &node.children {
                let Some(child) = nodes.get(c) else {
                    continue;
                };
                let d = child.operating.twice_distance_sq(self.origin);
                if d >= floor {
                    self.push(d, Entry::Node(c));
                }
            }
        }
        None
    }
}

/// Iterator over the objects of a tree in non-decreasing distance from a point.
///
/// Created by [`FieldTreeGeneric::nearest_iter`].
pub struct NearestIter<'a, T, Topo: Topology> {
    tree: &'a FieldTreeGeneric<T, Topo>,
    search: NearestSearch,
}

impl<'a, T, Topo: Topology> NearestIter<'a, T, Topo> {
    pub(crate) const fn new(tree: &'a FieldTreeGeneric<T, Topo>, search: NearestSearch) -> Self {
        Self { tree, search }
    }

    /// The underlying search state.
    pub const fn search(&self) -> &NearestSearch {
        &self.search
    }
}

impl<'a, T, Topo: Topology> Iterator for NearestIter<'a, T, Topo> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let tree = self.tree;
        let (node, idx) = self.search.advance(&tree.nodes)?;
        tree.nodes[node].object(idx).map(SpatialObj::get)
    }
}

impl<T, Topo: Topology> Debug for NearestIter<'_, T, Topo> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NearestIter")
            .field("search", &self.search)
            .finish_non_exhaustive()
    }
}

impl<T: Spatial, Topo: Topology> FieldTreeGeneric<T, Topo> {
    /// Breadth-first walk over fields whose operating bounds `touches`
    /// accepts, calling `f` on every object whose bounds `holds` accepts.
    pub(crate) fn visit_within(
        &self,
        touches: impl Fn(&Rect) -> bool,
        holds: impl Fn(&Rect) -> bool,
        mut f: impl FnMut(&T),
    ) {
        let Some(root) = self.root else {
            return;
        };
        let mut queue = VecDeque::from([root]);
        let mut seen: HashSet<NodeId> = HashSet::new();
        seen.insert(root);
        while let Some(id) = queue.pop_front() {
            let node = &self.nodes[id];
            // A fixed root may hold objects beyond its bounds, so it is never pruned.
            if id != root && !touches(&node.operating) {
                continue;
            }
            for obj in node.objects() {
                if holds(&obj.bounds()) {
                    f(obj.get());
                }
            }
            for &c in &node.children {
                if seen.insert(c) {
                    queue.push_back(c);
                }
            }
        }
    }

    /// Best-first search for the objects nearest to `p2`, a point in
    /// twice-coordinates, as field handles and object positions. Every object
    /// touching `p2` is returned when any does; otherwise the single closest one.
    pub(crate) fn nearest_candidates(&self, p2: Point) -> SmallVec<[(NodeId, usize); 1]> {
        let mut picks: SmallVec<[(NodeId, usize); 1]> = SmallVec::new();
        let Some(root) = self.root else {
            return picks;
        };
        let mut heap = BinaryHeap::new();
        let mut seq = 0_u64;
        heap.push(Queued {
            key: 0,
            seq,
            entry: Entry::Node(root),
        });
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut best: Option<i128> = None;
        let mut touching = false;
        while let Some(cur) = heap.pop() {
            if best.is_some_and(|b| cur.key > b) {
                break;
            }
            let Entry::Node(id) = cur.entry else {
                continue;
            };
            if !visited.insert(id) {
                continue;
            }
            let node = &self.nodes[id];
            for (idx, d) in node.nearest_objects(p2) {
                if is_touching(d) {
                    if !touching {
                        picks.clear();
                        touching = true;
                    }
                    picks.push((id, idx));
                    best = Some(best.map_or(d, |b| b.min(d)));
                } else if !touching && best.is_none_or(|b| d < b) {
                    picks.clear();
                    picks.push((id, idx));
                    best = Some(d);
                }
            }
            for &c in &node.children {
                let d = self.nodes[c].operating.twice_distance_sq_to_twice_point(p2);
                if !visited.contains(&c) && best.is_none_or(|b| d <= b) {
                    seq += 1;
                    heap.push(Queued {
                        key: d,
                        seq,
                        entry: Entry::Node(c),
                    });
                }
            }
        }
        picks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    use crate::config::FieldConfig;
    use crate::field::{BottomUpFieldTree, CoverFieldTree, PartitionFieldTree};

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Dot(i64, i64);

    impl Spatial for Dot {
        fn center_x(&self) -> i64 {
            self.0
        }
        fn center_y(&self) -> i64 {
            self.1
        }
        fn width(&self) -> i64 {
            1
        }
        fn height(&self) -> i64 {
            1
        }
    }

    fn scatter() -> Vec<Dot> {
        (0..40)
            .map(|i: i64| Dot((i * 7) % 23 - 11, (i * 13) % 19 - 9))
            .collect()
    }

    #[test]
    fn heap_pops_smallest_key_then_oldest() {
        let mut heap = BinaryHeap::new();
        for (key, seq) in [(5, 0), (1, 1), (5, 2), (1, 3)] {
            heap.push(Queued {
                key,
                seq,
                entry: Entry::Node(NodeId::new(0)),
            });
        }
        let order: Vec<_> = core::iter::from_fn(|| heap.pop().map(|q| (q.key, q.seq))).collect();
        assert_eq!(order, [(1, 1), (1, 3), (5, 0), (5, 2)]);
    }

    #[test]
    fn nearest_iter_is_sorted_and_complete() {
        let mut tree = CoverFieldTree::with_config(
            FieldConfig::new(32, 32)
                .with_capacity(2)
                .with_overlap(0.25),
        );
        tree.add_many(scatter());
        let origin = Point::new(2, -3);
        let dists: Vec<i128> = tree
            .nearest_iter(origin.x, origin.y)
            .map(|d| d.bounds().twice_distance_sq(origin))
            .collect();
        assert_eq!(dists.len(), tree.len());
        assert!(dists.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn incremental_session_matches_iterator() {
        let mut tree = PartitionFieldTree::with_config(FieldConfig::new(32, 32).with_capacity(1));
        tree.add_many(scatter());
        let expected: Vec<Dot> = tree.nearest_iter(0, 0).copied().collect();
        tree.init_incremental_nearest(0, 0);
        let mut got = Vec::new();
        while let Some(d) = tree.incremental_nearest_next() {
            got.push(d);
        }
        assert_eq!(got, expected);
        assert!(tree.incremental_search().is_some_and(NearestSearch::is_exhausted));
        assert!(tree.incremental_nearest_next().is_none());
    }

    #[test]
    fn objects_outside_a_fixed_root_are_still_yielded() {
        let mut tree = CoverFieldTree::new(8, 8, 0.0);
        tree.add(Dot(50, 50));
        tree.add(Dot(1, 1));
        let order: Vec<Dot> = tree.nearest_iter(100, 100).copied().collect();
        assert_eq!(order, [Dot(50, 50), Dot(1, 1)]);
        assert_eq!(tree.window_query(50, 50, 3, 3), [Dot(50, 50)]);
        assert_eq!(tree.range_query(50, 49, 2), [Dot(50, 50)]);
    }

    #[test]
    fn restarting_replaces_the_session() {
        let mut tree = CoverFieldTree::new(16, 16, 0.0);
        tree.add(Dot(-5, 0));
        tree.add(Dot(5, 0));
        tree.init_incremental_nearest(-6, 0);
        assert_eq!(tree.incremental_nearest_next(), Some(Dot(-5, 0)));
        tree.init_incremental_nearest(6, 0);
        assert_eq!(
            tree.incremental_search().map(NearestSearch::origin),
            Some(Point::new(6, 0))
        );
        assert_eq!(tree.incremental_nearest_next(), Some(Dot(5, 0)));
        assert_eq!(tree.incremental_nearest_next(), Some(Dot(-5, 0)));
        assert_eq!(tree.incremental_nearest_next(), None);
    }

    #[test]
    fn mutation_ends_the_session() {
        let mut tree = CoverFieldTree::new(16, 16, 0.0);
        tree.add(Dot(1, 1));
        tree.init_incremental_nearest(0, 0);
        tree.add(Dot(2, 2));
        assert!(tree.incremental_search().is_none());
        assert_eq!(tree.incremental_nearest_next(), None);
    }

    #[test]
    fn no_session_yields_nothing() {
        let mut tree: BottomUpFieldTree<Dot> = BottomUpFieldTree::new(0.0);
        assert_eq!(tree.incremental_nearest_next(), None);
        tree.init_incremental_nearest(0, 0);
        assert_eq!(tree.incremental_nearest_next(), None);
    }

    #[test]
    fn touching_ties_are_all_returned() {
        let mut tree = CoverFieldTree::with_config(FieldConfig::new(16, 16).with_capacity(1));
        let left = Rect::from_center_size(0, 0, 2, 2);
        let right = Rect::from_center_size(2, 0, 2, 2);
        tree.add(left);
        tree.add(right);
        tree.add(Rect::from_center_size(1, 6, 2, 2));
        // (1, 0) lies on the edge both squares share.
        let hits = tree.find_nearest(1, 0);
        assert_eq!(hits.len(), 2);
        assert!(hits.contains(&left) && hits.contains(&right));
        // Off the shared edge only one is nearest.
        assert_eq!(tree.find_nearest(-3, 0), [left]);
    }

    #[test]
    fn queries_on_an_empty_tree() {
        let tree: BottomUpFieldTree<Dot> = BottomUpFieldTree::new(0.5);
        assert!(tree.find_nearest(0, 0).is_empty());
        assert!(tree.range_query(0, 0, 10).is_empty());
        assert!(tree.window_query(0, 0, 10, 10).is_empty());
        assert_eq!(tree.nearest_iter(0, 0).count(), 0);
    }

    #[test]
    fn window_and_range_match_brute_force() {
        let mut tree = PartitionFieldTree::with_config(FieldConfig::new(32, 32).with_capacity(2));
        let dots = scatter();
        tree.add_many(dots.iter().copied());
        let window = Rect::from_center_size(-2, 1, 9, 7);
        let mut got = tree.window_query(-2, 1, 9, 7);
        let mut want: Vec<Dot> = dots
            .iter()
            .copied()
            .filter(|d| d.bounds().contained_by_rect(&window))
            .collect();
        got.sort_by_key(|d| (d.0, d.1));
        want.sort_by_key(|d| (d.0, d.1));
        assert_eq!(got, want);

        let mut got = tree.range_query(3, 3, 6);
        let mut want: Vec<Dot> = dots
            .iter()
            .copied()
            .filter(|d| d.bounds().contained_by_circle(Point::new(3, 3), 6))
            .collect();
        got.sort_by_key(|d| (d.0, d.1));
        want.sort_by_key(|d| (d.0, d.1));
        assert_eq!(got, want);
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fields and the arena that owns them.
//!
//! Every node lives in a [`Nodes`] arena and is addressed by a [`NodeId`].
//! Parent and child relations are handle lists kept in sync on both ends, so
//! the same code serves single-parent trees and the partition DAG. Fields of
//! a sharing topology are also registered by their bounds, so a cell is built
//! once no matter how many parents cover it.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::mem;
use core::ops::{Index, IndexMut};

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::spatial::SpatialObj;
use crate::topology::Topology;
use crate::types::{Point, Rect};

/// Distances (in squared units) below this are treated as touching.
pub(crate) const EPSILON: f64 = 1e-5;

/// Whether a squared distance given in twice-units counts as touching.
pub(crate) fn is_touching(twice_distance_sq: i128) -> bool {
    (twice_distance_sq as f64) / 4.0 < EPSILON
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(u32);

impl NodeId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "arena sizes are bounded well below u32::MAX"
    )]
    pub(crate) const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A single field: its bounds, the objects it holds and its links.
pub(crate) struct Node<T> {
    pub(crate) actual: Rect,
    pub(crate) operating: Rect,
    /// Objects that cannot sink below this field.
    pub(crate) stored: Vec<SpatialObj<T>>,
    /// Objects small enough to sink, waiting for a reorganize pass.
    pub(crate) overflow: Vec<SpatialObj<T>>,
    pub(crate) parents: SmallVec<[NodeId; 1]>,
    pub(crate) children: SmallVec<[NodeId; 9]>,
}

impl<T> Node<T> {
    pub(crate) fn new(actual: Rect, operating: Rect) -> Self {
        Self {
            actual,
            operating,
            stored: Vec::new(),
            overflow: Vec::new(),
            parents: SmallVec::new(),
            children: SmallVec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.stored.len() + self.overflow.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.stored.is_empty() && self.overflow.is_empty()
    }

    pub(crate) fn is_full(&self, capacity: usize) -> bool {
        self.len() >= capacity
    }

    pub(crate) fn is_overflown(&self) -> bool {
        !self.overflow.is_empty()
    }

    pub(crate) fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub(crate) fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Whether an object is small enough to be pushed below this field.
    pub(crate) fn can_sink(&self, bounds: &Rect) -> bool {
        2 * bounds.width() <= self.operating.width()
            && 2 * bounds.height() <= self.operating.height()
            && self.can_subdivide()
    }

    /// Unit fields are never split further.
    pub(crate) fn can_subdivide(&self) -> bool {
        self.actual.width().min(self.actual.height()) > 1
    }

    /// Whether this field is where a descent for `bounds` may stop.
    pub(crate) fn holds_center_of(&self, bounds: &Rect) -> bool {
        self.actual.contains_twice_point(bounds.twice_center())
    }

    /// Store an object, as overflow if it could sink deeper. Returns whether
    /// the field is now overflown.
    pub(crate) fn store(&mut self, obj: SpatialObj<T>) -> bool {
        if self.can_sink(&obj.bounds()) {
            self.overflow.push(obj);
        } else {
            self.stored.push(obj);
        }
        self.is_overflown()
    }

    /// Objects held here, stored entries first.
    pub(crate) fn objects(&self) -> impl Iterator<Item = &SpatialObj<T>> + '_ {
        self.stored.iter().chain(self.overflow.iter())
    }

    /// The object at a position of [`Node::objects`].
    pub(crate) fn object(&self, idx: usize) -> Option<&SpatialObj<T>> {
        match idx.checked_sub(self.stored.len()) {
            None => self.stored.get(idx),
            Some(o) => self.overflow.get(o),
        }
    }

    /// Remove the object at a position of [`Node::objects`].
    pub(crate) fn remove_at(&mut self, idx: usize) -> Option<SpatialObj<T>> {
        match idx.checked_sub(self.stored.len()) {
            None => Some(self.stored.remove(idx)),
            Some(o) => (o < self.overflow.len()).then(|| self.overflow.remove(o)),
        }
    }

    /// Positions of the objects here closest to `p2` (in twice-coordinates),
    /// with their twice-unit squared distances: every touching object if any
    /// touches, otherwise the first object at the minimal distance.
    pub(crate) fn nearest_objects(&self, p2: Point) -> SmallVec<[(usize, i128); 1]> {
        let mut out: SmallVec<[(usize, i128); 1]> = SmallVec::new();
        let mut best: Option<(usize, i128)> = None;
        for (i, obj) in self.objects().enumerate() {
            let d = obj.bounds().twice_distance_sq_to_twice_point(p2);
            if is_touching(d) {
                out.push((i, d));
            } else if best.is_none_or(|(_, b)| d < b) {
                best = Some((i, d));
            }
        }
        if out.is_empty() {
            out.extend(best);
        }
        out
    }
}

impl<T: PartialEq> Node<T> {
    /// Remove one entry equal to `obj`, from overflow first and then from the
    /// stored objects unless `overflow_only`. Returns the removed entry, so
    /// `is_some()` tells whether a removal occurred.
    pub(crate) fn delete(&mut self, obj: &T, overflow_only: bool) -> Option<SpatialObj<T>> {
        if let Some(i) = self.overflow.iter().position(|o| o.get() == obj) {
            return Some(self.overflow.remove(i));
        }
        if overflow_only {
            return None;
        }
        let i = self.stored.iter().position(|o| o.get() == obj)?;
        Some(self.stored.remove(i))
    }
}

impl<T> Debug for Node<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Node")
            .field("actual", &self.actual)
            .field("operating", &self.operating)
            .field("stored", &self.stored.len())
            .field("overflow", &self.overflow.len())
            .field("parents", &self.parents)
            .field("children", &self.children)
            .finish()
    }
}

/// Slot arena of fields with a free list.
pub(crate) struct Nodes<T> {
    slots: Vec<Option<Node<T>>>,
    free_list: Vec<usize>,
    alive: usize,
    /// Shared cells by actual bounds.
    cells: HashMap<Rect, NodeId>,
}

impl<T> Default for Nodes<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            alive: 0,
            cells: HashMap::new(),
        }
    }
}

impl<T> Nodes<T> {
    pub(crate) fn alloc(&mut self, node: Node<T>) -> NodeId {
        self.alive += 1;
        if let Some(idx) = self.free_list.pop() {
            self.slots[idx] = Some(node);
            NodeId::new(idx)
        } else {
            self.slots.push(Some(node));
            NodeId::new(self.slots.len() - 1)
        }
    }

    pub(crate) fn free(&mut self, id: NodeId) -> Option<Node<T>> {
        let node = self.slots.get_mut(id.idx())?.take()?;
        self.free_list.push(id.idx());
        self.alive -= 1;
        if self.cells.get(&node.actual) == Some(&id) {
            self.cells.remove(&node.actual);
        }
        Some(node)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots.get(id.idx())?.as_ref()
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.alive = 0;
        self.cells.clear();
    }

    /// Number of live fields.
    pub(crate) fn len(&self) -> usize {
        self.alive
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<T>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|n| (NodeId::new(i), n)))
    }

    /// Record `child` under `parent` on both ends.
    pub(crate) fn link(&mut self, parent: NodeId, child: NodeId) {
        if !self[parent].children.contains(&child) {
            self[parent].children.push(child);
        }
        if !self[child].parents.contains(&parent) {
            self[child].parents.push(parent);
        }
    }

    /// Subdivide a field. A field with more than one child is left alone; a
    /// lone existing child (the old root after growth) is kept and only the
    /// missing cells are added. With a sharing topology, cells already built
    /// for neighboring fields are linked instead of duplicated.
    ///
    /// Returns the number of fields allocated.
    pub(crate) fn create_children<Topo: Topology>(&mut self, id: NodeId, topology: &Topo) -> usize {
        if self[id].children.len() > 1 {
            return 0;
        }
        let mut created = 0;
        for cell in topology.cells(self[id].actual) {
            if self[id].children.iter().any(|&c| self[c].actual == cell) {
                continue;
            }
            let shared = if Topo::SHARES_CHILDREN {
                self.cells.get(&cell).copied()
            } else {
                None
            };
            let child = match shared {
                Some(existing) => existing,
                None => {
                    created += 1;
                    let child = self.alloc(Node::new(cell, topology.operating_bounds(cell)));
                    if Topo::SHARES_CHILDREN {
                        self.cells.insert(cell, child);
                    }
                    child
                }
            };
            self.link(id, child);
        }
        debug_assert!(
            self[id].children.len() <= Topo::FAN_OUT,
            "a field never has more children than one subdivision yields"
        );
        created
    }

    /// Whether `id` has children and every one of them is an empty leaf.
    pub(crate) fn children_collapsible(&self, id: NodeId) -> bool {
        let node = &self[id];
        node.has_children()
            && node.children.iter().all(|&c| {
                let child = &self[c];
                !child.has_children() && child.is_empty()
            })
    }

    /// Unlink every child of `id`. Children still referenced by another
    /// field stay alive; the rest are freed. Returns the number freed.
    pub(crate) fn detach_children(&mut self, id: NodeId) -> usize {
        let children = mem::take(&mut self[id].children);
        let mut freed = 0;
        for c in children {
            let parents = &mut self[c].parents;
            parents.retain(|p| *p != id);
            if parents.is_empty() {
                self.free(c);
                freed += 1;
            }
        }
        freed
    }
}

impl<T> Index<NodeId> for Nodes<T> {
    type Output = Node<T>;

    fn index(&self, id: NodeId) -> &Node<T> {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale node handle {id:?}"),
        }
    }
}

impl<T> IndexMut<NodeId> for Nodes<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self.slots.get_mut(id.idx()).and_then(Option::as_mut) {
            Some(node) => node,
            None => panic!("stale node handle {id:?}"),
        }
    }
}

impl<T> Debug for Nodes<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Nodes")
            .field("slots", &self.slots.len())
            .field("alive", &self.alive)
            .field("free", &self.free_list.len())
            .field("shared_cells", &self.cells.len())
            .finish_non_exhaustive()
    }
}

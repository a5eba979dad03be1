// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Insertion, reorganization, root growth and collapse.

use alloc::collections::{BinaryHeap, VecDeque};
use alloc::vec::Vec;
use core::cmp::Reverse;
use core::mem;

use hashbrown::HashSet;
use log::{debug, trace};

use crate::field::FieldTreeGeneric;
use crate::node::{Node, NodeId, Nodes};
use crate::spatial::{Spatial, SpatialObj};
use crate::topology::Topology;
use crate::types::Rect;

impl<T: Spatial, Topo: Topology> FieldTreeGeneric<T, Topo> {
    /// Create the root described by the configuration, if the topology has one.
    pub(crate) fn plant_root(&mut self) {
        debug_assert!(self.root.is_none(), "planting over an existing root");
        if let Some(actual) = self.topology.initial_root(&self.config) {
            let operating = self.topology.operating_bounds(actual);
            self.root = Some(self.nodes.alloc(Node::new(actual, operating)));
        }
    }

    /// Store one object at the deepest field that accepts it, subdividing full
    /// leaves on the way. Returns the field that received it.
    pub(crate) fn insert(&mut self, obj: SpatialObj<T>, reorganize: bool) -> NodeId {
        let bounds = obj.bounds();
        let mut subdivided = false;
        let field = loop {
            let field = self.deepest_field(&bounds);
            let node = &self.nodes[field];
            if node.is_full(self.config.capacity) && !node.has_children() && node.can_subdivide() {
                let created = self.nodes.create_children(field, &self.topology);
                debug!(
                    "subdivided field {} into {} cells ({created} new)",
                    self.nodes[field].actual,
                    self.nodes[field].children.len(),
                );
                subdivided = true;
                continue;
            }
            break field;
        };
        self.nodes[field].store(obj);
        self.len += 1;
        if subdivided && reorganize {
            self.reorganize();
        }
        field
    }

    /// The field an object belongs to, creating or growing the root as needed.
    fn deepest_field(&mut self, bounds: &Rect) -> NodeId {
        loop {
            let Some(root) = self.root else {
                let actual = self.topology.seed_root(bounds);
                let operating = self.topology.operating_bounds(actual);
                let id = self.nodes.alloc(Node::new(actual, operating));
                debug!("planted root {actual}");
                self.root = Some(id);
                return id;
            };
            if let Some(found) = self.find_containing(bounds, root) {
                return found;
            }
            if !self.grow_root(root, bounds) {
                trace!("no field contains {bounds}; keeping it at the root");
                return root;
            }
        }
    }

    /// Descend from `start` to the deepest field that contains `bounds` and
    /// that the object cannot sink below.
    pub(crate) fn find_containing(&self, bounds: &Rect, start: NodeId) -> Option<NodeId> {
        let node = &self.nodes[start];
        if !node.holds_center_of(bounds) {
            return None;
        }
        let admitted = node.operating.contains_rect(bounds);
        if admitted && !node.can_sink(bounds) {
            return Some(start);
        }
        node.children
            .iter()
            .find_map(|&c| self.find_containing(bounds, c))
            .or_else(|| admitted.then_some(start))
    }

    /// Replace the root by one twice its size that extends toward the part of
    /// `bounds` lying outside. Returns whether the root changed.
    fn grow_root(&mut self, root: NodeId, bounds: &Rect) -> bool {
        let actual = self.nodes[root].actual;
        let center = bounds.twice_center();
        let toward = if actual.contains_twice_point(center) {
            bounds
                .corners()
                .into_iter()
                .find(|c| !actual.contains_twice_point(*c))
        } else {
            Some(center)
        };
        let Some(grown) = toward.and_then(|t| self.topology.grow(actual, t)) else {
            return false;
        };
        if grown.size() == actual.size() {
            return false;
        }
        let id = self
            .nodes
            .alloc(Node::new(grown, self.topology.operating_bounds(grown)));
        self.nodes.link(id, root);
        self.nodes.create_children(id, &self.topology);
        self.root = Some(id);
        debug!("grew root from {actual} to {grown}");
        true
    }

    /// Breadth-first pass moving overflow objects to the deepest field that
    /// now accepts them.
    pub(crate) fn reorganize(&mut self) {
        let Some(root) = self.root else {
            return;
        };
        let mut queue = VecDeque::from([root]);
        let mut seen: HashSet<NodeId> = HashSet::new();
        seen.insert(root);
        let mut moved = 0_usize;
        while let Some(id) = queue.pop_front() {
            if self.nodes[id].is_overflown() {
                let pending = mem::take(&mut self.nodes[id].overflow);
                let mut kept = Vec::with_capacity(pending.len());
                for obj in pending {
                    match self.find_containing(&obj.bounds(), id) {
                        Some(target) if target != id => {
                            trace!("relocating {} to {}", obj.bounds(), self.nodes[target].actual);
                            self.nodes[target].store(obj);
                            moved += 1;
                        }
                        _ => kept.push(obj),
                    }
                }
                self.nodes[id].overflow = kept;
            }
            for &c in &self.nodes[id].children {
                if seen.insert(c) {
                    queue.push_back(c);
                }
            }
        }
        if moved > 0 {
            debug!("reorganize relocated {moved} objects");
        }
    }

    /// Bookkeeping after an object left `node`.
    pub(crate) fn finish_removal(&mut self, node: NodeId) {
        debug_assert!(self.len > 0, "removal from an empty tree");
        self.len -= 1;
        self.collapse_upward(node);
    }

    /// Collapse child sets made only of empty leaves, from `start` toward the
    /// root, smallest fields first. Shared cells survive while another field
    /// references them. A lazily rooted tree also drops a root left empty.
    fn collapse_upward(&mut self, start: NodeId) {
        let mut pending = BinaryHeap::new();
        let mut queued: HashSet<NodeId> = HashSet::new();
        enqueue(&self.nodes, &mut pending, &mut queued, start);
        while let Some((_, id)) = pending.pop() {
            queued.remove(&id);
            if !self.nodes.contains(id) {
                continue;
            }
            if self.nodes.children_collapsible(id) {
                let freed = self.nodes.detach_children(id);
                debug!(
                    "collapsed the children of {} ({freed} fields freed)",
                    self.nodes[id].actual
                );
            }
            let node = &self.nodes[id];
            if node.is_root() {
                let lazy = self.topology.initial_root(&self.config).is_none();
                if lazy && node.is_empty() && !node.has_children() {
                    self.nodes.free(id);
                    self.root = None;
                    debug!("dropped empty root");
                }
                continue;
            }
            if node.is_empty() && !node.has_children() {
                let parents = node.parents.clone();
                for p in parents {
                    enqueue(&self.nodes, &mut pending, &mut queued, p);
                }
            }
        }
    }
}

fn enqueue<T>(
    nodes: &Nodes<T>,
    pending: &mut BinaryHeap<(Reverse<i128>, NodeId)>,
    queued: &mut HashSet<NodeId>,
    id: NodeId,
) {
    if queued.insert(id) {
        pending.push((Reverse(nodes[id].actual.area()), id));
    }
}

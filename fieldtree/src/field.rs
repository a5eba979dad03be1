// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field tree facade generic over the topology.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::config::FieldConfig;
use crate::node::{NodeId, Nodes};
use crate::query::{NearestIter, NearestSearch};
use crate::spatial::{Spatial, SpatialObj};
use crate::topologies::{BottomUpCover, Cover, Partition};
use crate::topology::Topology;
use crate::types::{Point, Rect};

/// A mutable 2D spatial index parameterized by a [`Topology`].
///
/// Most code uses one of the aliases: [`CoverFieldTree`],
/// [`BottomUpFieldTree`] or [`PartitionFieldTree`].
pub struct FieldTreeGeneric<T, Topo: Topology> {
    pub(crate) config: FieldConfig,
    pub(crate) topology: Topo,
    pub(crate) nodes: Nodes<T>,
    pub(crate) root: Option<NodeId>,
    pub(crate) len: usize,
    pub(crate) search: Option<NearestSearch>,
}

/// Fixed-extent tree with quadrant subdivision and loose operating bounds.
pub type CoverFieldTree<T> = FieldTreeGeneric<T, Cover>;

/// Quadrant tree whose root grows to fit whatever is inserted.
pub type BottomUpFieldTree<T> = FieldTreeGeneric<T, BottomUpCover>;

/// Fixed-extent DAG of overlapping 3×3 cells.
pub type PartitionFieldTree<T> = FieldTreeGeneric<T, Partition>;

impl<T: Spatial, Topo: Topology> FieldTreeGeneric<T, Topo> {
    /// Create an empty tree from construction parameters.
    pub fn with_config(config: FieldConfig) -> Self {
        let mut tree = Self {
            config,
            topology: Topo::from_config(&config),
            nodes: Nodes::default(),
            root: None,
            len: 0,
            search: None,
        };
        tree.plant_root();
        tree
    }

    /// The parameters this tree was built with.
    pub const fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// The topology policy in use.
    pub const fn topology(&self) -> &Topo {
        &self.topology
    }

    /// Number of objects in the tree.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no objects.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of live fields, for diagnostics.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Operating bounds of the root, or `None` for a bottom-up tree that has
    /// no root yet.
    pub fn extent(&self) -> Option<Rect> {
        self.root.map(|r| self.nodes[r].operating)
    }

    /// Insert an object, reorganizing right away if a field had to subdivide.
    pub fn add(&mut self, obj: T) {
        self.search = None;
        self.insert(SpatialObj::new(obj), true);
    }

    /// Insert many objects and reorganize once at the end.
    pub fn add_many<I: IntoIterator<Item = T>>(&mut self, objs: I) {
        self.search = None;
        for obj in objs {
            self.insert(SpatialObj::new(obj), false);
        }
        self.reorganize();
    }

    /// Remove an object equal to `obj`. Returns `None`, leaving the tree
    /// untouched, when no such object is present.
    pub fn remove(&mut self, obj: &T) -> Option<T> {
        self.search = None;
        let (node, _) = self
            .nearest_candidates(obj.bounds().twice_center())
            .into_iter()
            .find(|&(n, i)| self.nodes[n].object(i).is_some_and(|o| o.get() == obj))?;
        let removed = self.nodes[node].delete(obj, false)?;
        self.finish_removal(node);
        Some(removed.into_inner())
    }

    /// Remove and return the object nearest to `(x, y)`.
    pub fn pop_nearest(&mut self, x: i64, y: i64) -> Option<T> {
        self.search = None;
        let (node, idx) = self
            .nearest_candidates(Point::new(x, y).doubled())
            .first()
            .copied()?;
        let removed = self.nodes[node].remove_at(idx)?;
        self.finish_removal(node);
        Some(removed.into_inner())
    }

    /// Remove every object and every field but a fresh root.
    pub fn clear(&mut self) {
        self.search = None;
        self.nodes.clear();
        self.root = None;
        self.len = 0;
        self.plant_root();
    }

    /// Iterate over every object in the tree, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.nodes
            .iter()
            .flat_map(|(_, node)| node.objects().map(SpatialObj::get))
    }

    /// Lazily yield objects in non-decreasing distance from `(x, y)`.
    ///
    /// The iterator borrows the tree and is independent of the session driven
    /// by [`Self::init_incremental_nearest`].
    pub fn nearest_iter(&self, x: i64, y: i64) -> NearestIter<'_, T, Topo> {
        NearestIter::new(self, NearestSearch::new(Point::new(x, y), self.root))
    }

    /// Start (or restart) the incremental nearest-neighbor session at `(x, y)`.
    pub fn init_incremental_nearest(&mut self, x: i64, y: i64) {
        self.search = Some(NearestSearch::new(Point::new(x, y), self.root));
    }

    /// The current incremental session, if one is active.
    pub const fn incremental_search(&self) -> Option<&NearestSearch> {
        self.search.as_ref()
    }
}

impl<T: Spatial + Clone, Topo: Topology> FieldTreeGeneric<T, Topo> {
    /// The next object of the incremental session, or `None` once exhausted
    /// or when no session is active.
    pub fn incremental_nearest_next(&mut self) -> Option<T> {
        let search = self.search.as_mut()?;
        let (node, idx) = search.advance(&self.nodes)?;
        self.nodes[node].object(idx).map(|o| o.get().clone())
    }

    /// The object nearest to `(x, y)`. Several are returned only when more
    /// than one touches the point.
    pub fn find_nearest(&self, x: i64, y: i64) -> Vec<T> {
        self.nearest_candidates(Point::new(x, y).doubled())
            .into_iter()
            .filter_map(|(n, i)| self.nodes[n].object(i).map(|o| o.get().clone()))
            .collect()
    }

    /// Objects lying entirely within `radius` of `(cx, cy)`.
    pub fn range_query(&self, cx: i64, cy: i64, radius: i64) -> Vec<T> {
        let center = Point::new(cx, cy);
        let mut out = Vec::new();
        self.visit_within(
            |r| r.intersects_circle(center, radius),
            |r| r.contained_by_circle(center, radius),
            |obj| out.push(obj.clone()),
        );
        out
    }

    /// Objects lying entirely within the `width` × `height` window centered
    /// on `(cx, cy)`.
    pub fn window_query(&self, cx: i64, cy: i64, width: i64, height: i64) -> Vec<T> {
        let window = Rect::from_center_size(cx, cy, width, height);
        let mut out = Vec::new();
        self.visit_within(
            |r| r.intersects(&window),
            |r| r.contained_by_rect(&window),
            |obj| out.push(obj.clone()),
        );
        out
    }

    /// Every object in the tree.
    pub fn all(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: Spatial> FieldTreeGeneric<T, Cover> {
    /// A cover tree of the given extent centered on the origin.
    pub fn new(width: i64, height: i64, overlap: f64) -> Self {
        Self::with_config(FieldConfig::new(width, height).with_overlap(overlap))
    }
}

impl<T: Spatial> FieldTreeGeneric<T, BottomUpCover> {
    /// A bottom-up tree; its extent follows the data.
    pub fn new(overlap: f64) -> Self {
        Self::with_config(FieldConfig::default().with_overlap(overlap))
    }
}

impl<T: Spatial> Default for FieldTreeGeneric<T, BottomUpCover> {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl<T: Spatial> FieldTreeGeneric<T, Partition> {
    /// A partition tree of the given extent centered on the origin.
    pub fn new(width: i64, height: i64) -> Self {
        Self::with_config(FieldConfig::new(width, height))
    }
}

impl<T, Topo: Topology> Debug for FieldTreeGeneric<T, Topo> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FieldTreeGeneric")
            .field("topology", &self.topology)
            .field("capacity", &self.config.capacity)
            .field("len", &self.len)
            .field("fields", &self.nodes.len())
            .field("extent", &self.root.map(|r| self.nodes[r].operating))
            .field("searching", &self.search.is_some())
            .finish_non_exhaustive()
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The quadtree: insertion with lazy subdivision, and pruned overlap queries.

use core::fmt::{self, Debug};
use core::ptr;

use kurbo::{Circle, Point, Rect};
use tracing::{error, trace};

use crate::arena::{Arena, NodeIdx};
use crate::buffer::GrowBuffer;
use crate::config::QuadtreeConfig;
use crate::error::QuadtreeError;
use crate::geometry::{is_valid_boundary, quadrants, splits_cleanly};
use crate::shape::{Body, Bounded, Overlaps};

/// Entity slots per node when the `N` parameter is not given.
pub const DEFAULT_NODE_CAPACITY: usize = 10;

/// A region quadtree over borrowed entities.
///
/// The tree stores `&'a E` references; it never copies or owns entity data.
/// Each node keeps up to `N` references. When a leaf is full, the next entity that
/// reaches it splits it into four quadrants, and that entity and every later one
/// passing through go to each child they overlap. Entities with extent can
/// therefore be stored in several sibling subtrees.
///
/// A split only happens when it separates something: if the incoming entity covers
/// more than one quadrant and every resident covers exactly the same quadrants, the
/// leaf takes the entity past its `N` slots instead. Stacks of identical shapes thus
/// cost one longer list rather than a copy in every descendant.
///
/// The tree is meant to be rebuilt each cycle: [`clear`](Self::clear) (or
/// [`recycle`](Self::recycle)), then [`insert_batch`](Self::insert_batch), then any
/// number of queries. Queries take `&self`, so once insertion is done the tree can be
/// shared across threads and queried in parallel, each thread with its own result
/// buffer. The borrow checker keeps mutation out while such borrows are alive.
///
/// Identity, not value, decides whether a probe matches itself: a query never
/// reports an entity stored at the same address as the probe.
pub struct Quadtree<'a, E, const N: usize = DEFAULT_NODE_CAPACITY> {
    arena: Arena<'a, E, N>,
    boundary: Rect,
    config: QuadtreeConfig,
}

/// Tree of points.
pub type PointTree<'a> = Quadtree<'a, Point>;
/// Tree of axis-aligned rectangles.
pub type RectTree<'a> = Quadtree<'a, Rect>;
/// Tree of circles.
pub type CircleTree<'a> = Quadtree<'a, Circle>;
/// Tree of moving bodies with shape `S`.
pub type BodyTree<'a, S> = Quadtree<'a, Body<S>>;

impl<E, const N: usize> Debug for Quadtree<'_, E, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let refs: usize = self.arena.nodes().iter().map(|n| n.entities.len()).sum();
        f.debug_struct("Quadtree")
            .field("boundary", &self.boundary)
            .field("slots_per_node", &N)
            .field("nodes", &self.arena.len())
            .field("node_storage", &self.arena.capacity())
            .field("stored_refs", &refs)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a, E, const N: usize> Quadtree<'a, E, N> {
    /// Create an empty tree covering `boundary` with the default configuration.
    ///
    /// # Errors
    ///
    /// [`QuadtreeError::InvalidBoundary`] if `boundary` is not finite or has no area,
    /// [`QuadtreeError::Alloc`] if the initial node storage cannot be allocated.
    pub fn new(boundary: Rect) -> Result<Self, QuadtreeError> {
        Self::with_config(boundary, QuadtreeConfig::default())
    }

    /// Create an empty tree covering `boundary`.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_config(boundary: Rect, config: QuadtreeConfig) -> Result<Self, QuadtreeError> {
        const { assert!(N > 0, "quadtree nodes need at least one entity slot") };
        if !is_valid_boundary(boundary) {
            return Err(QuadtreeError::InvalidBoundary(boundary));
        }
        let arena = Arena::new(boundary, config.initial_nodes)?;
        Ok(Self {
            arena,
            boundary,
            config,
        })
    }

    /// The region covered by the root.
    pub fn boundary(&self) -> Rect {
        self.boundary
    }

    /// The configuration the tree was built with.
    pub fn config(&self) -> &QuadtreeConfig {
        &self.config
    }

    /// Number of live nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Number of nodes the current storage can hold without growing.
    pub fn node_capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// True if the root has never been subdivided since the last clear.
    pub fn is_leaf_root(&self) -> bool {
        self.arena[NodeIdx::ROOT].children.is_none()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        let root = &self.arena[NodeIdx::ROOT];
        root.entities.is_empty() && root.children.is_none()
    }

    /// Remove everything, leaving a single empty root. Node storage is kept.
    pub fn clear(&mut self) {
        self.arena.reset();
    }

    /// Clear the tree and rebind it to entities borrowed for `'b`, reusing its
    /// storage where [`GrowBuffer::recycle`] can.
    ///
    /// Use this when the entities of the next cycle live in a different borrow, for
    /// example after the caller has mutated them.
    #[must_use]
    pub fn recycle<'b>(self) -> Quadtree<'b, E, N> {
        Quadtree {
            arena: self.arena.recycle(),
            boundary: self.boundary,
            config: self.config,
        }
    }

    /// Append every stored entity that `probe` overlaps to `out`.
    ///
    /// Pruning treats node boundaries as closed, so a query shape that only reaches
    /// the tree's minimum edges from outside still finds entities overlapping it on
    /// that edge. Overlaps lying entirely outside the tree boundary are not reported.
    ///
    /// `out` is not cleared first. An entity with extent that lies across a
    /// subdivision seam may be reported once per node holding it when the probe
    /// covers several of those nodes; use [`query_unique`](Self::query_unique) for
    /// one report per entity.
    pub fn query<Q>(&self, probe: &Q, out: &mut GrowBuffer<&'a E>)
    where
        Q: Bounded + Overlaps<E> + ?Sized,
    {
        self.visit(NodeIdx::ROOT, probe, &mut |entity| out.push(entity));
    }

    /// Like [`query`](Self::query), but appends each matching entity only once.
    ///
    /// Duplicates are detected by identity among the items this call appends;
    /// whatever `out` already held is left alone.
    pub fn query_unique<Q>(&self, probe: &Q, out: &mut GrowBuffer<&'a E>)
    where
        Q: Bounded + Overlaps<E> + ?Sized,
    {
        let start = out.len();
        self.visit(NodeIdx::ROOT, probe, &mut |entity| {
            if !out[start..].iter().any(|seen| ptr::eq(*seen, entity)) {
                out.push(entity);
            }
        });
    }

    /// Iterate over the stored entities that `probe` overlaps, each once.
    pub fn query_iter<Q>(&self, probe: &Q) -> alloc::vec::IntoIter<&'a E>
    where
        Q: Bounded + Overlaps<E> + ?Sized,
    {
        let mut out = GrowBuffer::new();
        self.query_unique(probe, &mut out);
        out.into_iter()
    }

    /// Shared traversal: prune by boundary, skip the probe itself, test the rest.
    fn visit<Q, F>(&self, idx: NodeIdx, probe: &Q, sink: &mut F)
    where
        Q: Bounded + Overlaps<E> + ?Sized,
        F: FnMut(&'a E),
    {
        let node = &self.arena[idx];
        if node.entities.is_empty() && node.children.is_none() {
            return;
        }
        if !probe.touches_boundary(node.boundary) {
            return;
        }
        for &entity in &node.entities {
            if ptr::addr_eq(probe, entity) {
                continue;
            }
            if probe.overlaps(entity) {
                sink(entity);
            }
        }
        if let Some(first) = node.children {
            for child in first.quadrants() {
                self.visit(child, probe, sink);
            }
        }
    }
}

impl<'a, E: Bounded, const N: usize> Quadtree<'a, E, N> {
    /// Insert one entity.
    ///
    /// Returns `Ok(false)` if the entity lies entirely outside the tree boundary.
    ///
    /// # Errors
    ///
    /// [`QuadtreeError::Alloc`] if node storage could not grow. The entity may then
    /// be stored in some but not all of the nodes it overlaps; clear the tree before
    /// relying on query results again.
    /// [`QuadtreeError::Unplaced`] if the entity's [`Bounded`] implementation is
    /// inconsistent with quadrant splitting. Debug builds panic instead.
    pub fn insert(&mut self, entity: &'a E) -> Result<bool, QuadtreeError> {
        self.insert_at(NodeIdx::ROOT, 0, entity)
    }

    /// Insert every entity from `entities` and return how many were placed.
    ///
    /// Entities entirely outside the boundary are skipped and not counted.
    ///
    /// # Errors
    ///
    /// Stops at the first error from [`insert`](Self::insert); entities before it
    /// stay inserted.
    pub fn insert_batch<I>(&mut self, entities: I) -> Result<usize, QuadtreeError>
    where
        I: IntoIterator<Item = &'a E>,
    {
        let mut placed = 0;
        for entity in entities {
            if self.insert(entity)? {
                placed += 1;
            }
        }
        Ok(placed)
    }

    fn insert_at(&mut self, idx: NodeIdx, depth: u32, entity: &'a E) -> Result<bool, QuadtreeError> {
        let node = &mut self.arena[idx];
        if !entity.overlaps_boundary(node.boundary) {
            return Ok(false);
        }
        let first = if let Some(first) = node.children {
            first
        } else if node.entities.len() < N {
            node.entities.push(entity);
            return Ok(true);
        } else if self.can_split(idx, depth, entity) {
            self.arena.subdivide(idx)?
        } else {
            trace!(node = idx.get(), depth, "leaf cannot split, storing past capacity");
            self.arena[idx].entities.push(entity);
            return Ok(true);
        };

        let mut placed = false;
        for child in first.quadrants() {
            placed |= self.insert_at(child, depth + 1, entity)?;
        }
        if !placed {
            error!(node = idx.get(), "entity rejected by every child of a node that accepted it");
            debug_assert!(
                placed,
                "children of node {} rejected an entity it accepted",
                idx.get()
            );
            return Err(QuadtreeError::Unplaced { node: idx.get() });
        }
        Ok(true)
    }

    fn can_split(&self, idx: NodeIdx, depth: u32, entity: &E) -> bool {
        let node = &self.arena[idx];
        if !self.config.allows_split(self.arena.len(), depth) || !splits_cleanly(node.boundary) {
            return false;
        }
        let quads = quadrants(node.boundary);
        let mask = quadrant_mask(entity, &quads);
        // Entries past `N` were checked when their own split was refused.
        mask.count_ones() <= 1
            || node.entities[..N]
                .iter()
                .any(|resident| quadrant_mask(*resident, &quads) != mask)
    }
}

/// Bit `i` is set when `entity` overlaps `quads[i]`.
fn quadrant_mask<E: Bounded + ?Sized>(entity: &E, quads: &[Rect; 4]) -> u8 {
    quads
        .iter()
        .enumerate()
        .filter(|(_, q)| entity.overlaps_boundary(**q))
        .fold(0, |mask, (i, _)| mask | (1 << i))
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node storage: one growable array of nodes, children referenced by index.
//!
//! Storing child links as indices rather than references means the array can be
//! reallocated while it grows without invalidating any parent→child link.

use alloc::collections::TryReserveError;
use core::ops::{Index, IndexMut};

use kurbo::Rect;
use smallvec::SmallVec;
use tracing::debug;

use crate::buffer::GrowBuffer;
use crate::geometry::quadrants;

/// Index of a node in the arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(usize);

impl NodeIdx {
    pub(crate) const ROOT: Self = Self(0);

    const fn new(i: usize) -> Self {
        Self(i)
    }

    pub(crate) const fn get(self) -> usize {
        self.0
    }

    /// The four sibling indices of a child block starting at `self`, NW, NE, SW, SE.
    pub(crate) const fn quadrants(self) -> [Self; 4] {
        [
            Self(self.0),
            Self(self.0 + 1),
            Self(self.0 + 2),
            Self(self.0 + 3),
        ]
    }
}

/// A tree node: its region, the entity references stored directly here, and
/// optionally the first index of its four contiguous children.
pub(crate) struct Node<'a, E, const N: usize> {
    pub(crate) boundary: Rect,
    /// Up to `N` references inline; more only when the node could not subdivide.
    pub(crate) entities: SmallVec<[&'a E; N]>,
    pub(crate) children: Option<NodeIdx>,
}

impl<E, const N: usize> Node<'_, E, N> {
    fn new(boundary: Rect) -> Self {
        Self {
            boundary,
            entities: SmallVec::new(),
            children: None,
        }
    }
}

/// Growable node array. Node 0 is always the root.
pub(crate) struct Arena<'a, E, const N: usize> {
    nodes: GrowBuffer<Node<'a, E, N>>,
}

impl<'a, E, const N: usize> Arena<'a, E, N> {
    /// Allocate room for `initial_nodes` nodes and create the root.
    pub(crate) fn new(boundary: Rect, initial_nodes: usize) -> Result<Self, TryReserveError> {
        let mut nodes = GrowBuffer::try_with_capacity(initial_nodes.max(1))?;
        nodes.push(Node::new(boundary));
        Ok(Self { nodes })
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes that fit without reallocating.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn nodes(&self) -> &[Node<'a, E, N>] {
        &self.nodes
    }

    /// Drop every node but the root and empty it. Storage is kept.
    pub(crate) fn reset(&mut self) {
        self.nodes.truncate(1);
        let root = &mut self.nodes[0];
        root.entities.clear();
        root.children = None;
    }

    /// Make sure `additional` more nodes fit, doubling the storage if they don't.
    pub(crate) fn ensure_capacity(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let before = self.nodes.capacity();
        self.nodes.try_reserve(additional)?;
        let after = self.nodes.capacity();
        if after != before {
            debug!(capacity = after, "quadtree node storage grew");
        }
        Ok(())
    }

    /// Append four children covering the quadrants of leaf `idx` and link them.
    ///
    /// Returns the index of the first child. On allocation failure nothing changes.
    pub(crate) fn subdivide(&mut self, idx: NodeIdx) -> Result<NodeIdx, TryReserveError> {
        debug_assert!(
            self[idx].children.is_none(),
            "node {} is already subdivided",
            idx.get()
        );
        self.ensure_capacity(4)?;
        let first = NodeIdx::new(self.nodes.len());
        for quadrant in quadrants(self[idx].boundary) {
            self.nodes.push(Node::new(quadrant));
        }
        self[idx].children = Some(first);
        Ok(first)
    }

    /// Empty the arena and rebind it to entity references of another lifetime.
    ///
    /// Storage is kept when [`GrowBuffer::recycle`] manages to reuse it.
    pub(crate) fn recycle<'b>(self) -> Arena<'b, E, N> {
        let boundary = self.nodes[0].boundary;
        let mut nodes = self.nodes.recycle();
        nodes.push(Node::new(boundary));
        Arena { nodes }
    }
}

impl<'a, E, const N: usize> Index<NodeIdx> for Arena<'a, E, N> {
    type Output = Node<'a, E, N>;

    fn index(&self, idx: NodeIdx) -> &Self::Output {
        &self.nodes[idx.get()]
    }
}

impl<E, const N: usize> IndexMut<NodeIdx> for Arena<'_, E, N> {
    fn index_mut(&mut self, idx: NodeIdx) -> &mut Self::Output {
        &mut self.nodes[idx.get()]
    }
}

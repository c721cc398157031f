// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tuning knobs for a [`Quadtree`](crate::Quadtree).

/// Construction-time configuration for a [`Quadtree`](crate::Quadtree).
///
/// The number of entity slots per node is not part of this struct; it is the
/// `N` const parameter of the tree type.
///
/// When a full leaf cannot subdivide, the entity is still accepted and stored in
/// that leaf beyond its `N` slots. A split is refused when:
///
/// - it would exceed `max_nodes` or `max_depth`;
/// - the boundary is too small to split at its center;
/// - the entity and every resident cover the same two or more quadrants, so no
///   child would separate them. Queries stay correct; they just
/// scan a longer list there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuadtreeConfig {
    /// Nodes to allocate up front, including the root. Storage doubles from here.
    pub initial_nodes: usize,
    /// Hard ceiling on the number of nodes, or `None` for unbounded growth.
    pub max_nodes: Option<usize>,
    /// Depth (root = 0) at which leaves stop subdividing.
    pub max_depth: u32,
}

impl QuadtreeConfig {
    /// Default value of [`initial_nodes`](Self::initial_nodes).
    pub const DEFAULT_INITIAL_NODES: usize = 8;
    /// Default value of [`max_depth`](Self::max_depth).
    pub const DEFAULT_MAX_DEPTH: u32 = 32;

    /// Whether a tree that already has `node_count` nodes may add four more
    /// children to a node at `depth`.
    pub(crate) fn allows_split(&self, node_count: usize, depth: u32) -> bool {
        if depth >= self.max_depth {
            return false;
        }
        match self.max_nodes {
            Some(max) => node_count.saturating_add(4) <= max,
            None => true,
        }
    }
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            initial_nodes: Self::DEFAULT_INITIAL_NODES,
            max_nodes: None,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

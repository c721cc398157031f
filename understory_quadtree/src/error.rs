// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for tree construction and insertion.

use alloc::collections::TryReserveError;

use kurbo::Rect;

/// Errors reported by [`Quadtree`](crate::Quadtree).
///
/// Entities lying entirely outside the tree boundary are not errors; they are
/// skipped and left out of the inserted count.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum QuadtreeError {
    /// The root boundary is not finite, or is empty or inverted on some axis.
    #[error("invalid quadtree boundary {0:?}: need finite coordinates with min < max")]
    InvalidBoundary(Rect),
    /// Node storage could not grow. The tree is still structurally valid.
    #[error("failed to allocate quadtree node storage")]
    Alloc(#[from] TryReserveError),
    /// A node accepted an entity that none of its four children accepted.
    ///
    /// This points at a broken shape predicate rather than bad input.
    #[error("entity accepted by node {node} was rejected by all of its children")]
    Unplaced {
        /// Index of the node whose children all rejected the entity.
        node: usize,
    },
}

// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage summary types returned from commit.

use alloc::vec::Vec;

use crate::types::BoxId;

/// A batched set of rendering changes derived from [`crate::Tree::commit`].
///
/// `Damage` is the tree's only channel to the renderer: boxes listed in
/// `drawn` had their geometry change since the last commit and should be
/// (re)painted; boxes listed in `erased` left the visible set and should
/// have their rendering state detached. Ids in `erased` may be stale by the
/// time the renderer sees them — they are keys into the renderer's own
/// state, not handles to be dereferenced.
#[derive(Clone, Debug, Default)]
pub struct Damage {
    /// Boxes whose geometry changed and which are currently renderable.
    pub drawn: Vec<BoxId>,
    /// Boxes that were rendered and no longer are.
    pub erased: Vec<BoxId>,
}

impl Damage {
    /// Whether the commit produced no rendering work at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drawn.is_empty() && self.erased.is_empty()
    }
}

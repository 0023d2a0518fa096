// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoomtype Box Tree: the live, navigable tree of zoom boxes.
//!
//! A [`Tree`] holds one session's instantiation of a palette's template
//! tree: one mutable box per navigable node, carrying screen geometry, the
//! message accumulated so far, and a prediction weight. Boxes live in an
//! arena and are addressed by generational [`BoxId`] handles, so the tree
//! can be reshaped — children expanded lazily, off-screen roots trimmed,
//! trimmed parents promoted back — without reference cycles.
//!
//! The tree is deliberately renderer-blind and predictor-blind:
//!
//! - Rendering changes are batched into a [`Damage`] summary by
//!   [`Tree::commit`]; the session drains it to drive an external renderer.
//! - Boxes that need prediction weights before they can lay out are pushed
//!   onto an expansion queue ([`Tree::take_expansion_requests`]); the
//!   session resolves them and feeds weights back with
//!   [`Tree::set_child_weight`]. A box waiting on weights is excluded from
//!   containment queries until [`Tree::complete_spawn`] runs.
//!
//! Coordinates follow the session convention: origin-centred, y positive
//! downward for box geometry, while pointer input arrives y positive
//! upward. [`Tree::holder`] performs the negation internally.
//!
//! ## Minimal example
//!
//! ```
//! use zoomtype_box_tree::{SetDimensions, Tree};
//! use zoomtype_limits::{GradientRatio, Limits};
//! use zoomtype_palette::Palette;
//!
//! let palette = Palette::latin();
//! let mut limits = Limits::new(100.0, 200.0);
//! limits.set_ratios(vec![
//!     GradientRatio { offset: 0.9, height: 0.01 },
//!     GradientRatio { offset: -1.0, height: 1.0 },
//! ]);
//!
//! let mut tree = Tree::new();
//! let root = tree.spawn_root(&palette);
//! tree.set_dimensions(root, SetDimensions {
//!     left: Some(0.0),
//!     width: Some(100.0),
//!     middle: Some(0.0),
//!     height: Some(limits.solve_height(0.0).unwrap()),
//! });
//! assert!(tree.instantiate_children(&palette, root));
//! // A second call is a no-op.
//! assert!(!tree.instantiate_children(&palette, root));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod arrange;
mod damage;
mod geometry;
mod tree;
mod trim;
mod types;

pub use arrange::Arrange;
pub use damage::Damage;
pub use geometry::BoxGeometry;
pub use tree::Tree;
pub use types::{BoxId, ChildSlot, HolderPath, SetDimensions, WeightError};

// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoomtype Palette: the symbol alphabet and its immutable template tree.
//!
//! A [`Palette`] describes the static universe of symbols available to a
//! zooming text-entry session: which code points exist, how they are grouped
//! (capitals, numerals, punctuation, ...), and how non-printing symbols are
//! substituted for display. Building a palette produces an immutable
//! [`Template`] tree rooted at "no symbols yet", which live box trees use as
//! a shared blueprint when they expand.
//!
//! Templates are stored in a flat arena addressed by [`TemplateId`]. A node
//! is either a leaf carrying exactly one code point, or a group carrying an
//! ordered run of children. The palette also records, for every code point,
//! the path of child indices leading from the root to its leaf, so that
//! external weight predictions can be routed to the right subtree.
//!
//! ## Minimal example
//!
//! ```
//! use zoomtype_palette::Palette;
//!
//! let palette = Palette::latin();
//! // Every code point has a root-to-leaf path.
//! let path = palette.path('q').unwrap();
//! assert!(!path.is_empty());
//! // Whitespace is substituted for display.
//! assert_ne!(palette.display_text(' '), ' ');
//! assert_eq!(palette.display_text('q'), 'q');
//! ```
//!
//! Palette construction is an explicit factory call producing an owned
//! value; there is no global registry, so independent sessions and tests can
//! each build their own. Construction fails with
//! [`PaletteError::DuplicateCodePoint`] if two groups claim the same code
//! point.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod groups;
mod palette;
mod template;

pub use groups::{GroupDefinition, GroupMembers, default_display_substitutions, default_groups};
pub use palette::{Palette, PaletteError};
pub use template::{StyleClass, Template, TemplateId, TemplatePath};

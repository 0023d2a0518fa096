// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Template nodes: the immutable blueprint tree shared by live box trees.

use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;

/// Identifier for a template node within its [`Palette`](crate::Palette).
///
/// Templates are immutable and never removed, so this is a plain index with
/// no generation counter. Ids from one palette must not be used with
/// another.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TemplateId(pub(crate) u32);

impl TemplateId {
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Child-index path from the root template to a leaf.
///
/// Stock palettes nest at most one group deep, so two inline slots cover the
/// common case without allocating.
pub type TemplatePath = SmallVec<[u32; 2]>;

/// Resolved visual category of a box.
///
/// Group nodes carry a fixed name. Symbol nodes alternate through a
/// two-by-two cycle derived from their position in the message (ordinal) and
/// among their siblings (child index), so that adjacent boxes are always
/// distinguishable.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum StyleClass {
    /// A named group category, e.g. `"capital"` or `"punctuation"`.
    Named(&'static str),
    /// A sequence-positioned category; both fields are parities, 0 or 1.
    Sequence {
        /// Parity of the symbol's position within the message.
        ordinal: u8,
        /// Parity of the box's index among its siblings.
        index: u8,
    },
}

impl StyleClass {
    /// The sequence class for a symbol at `ordinal` placed at child `index`.
    #[must_use]
    pub fn sequence(ordinal: u32, index: usize) -> Self {
        Self::Sequence {
            ordinal: (ordinal % 2) as u8,
            index: (index % 2) as u8,
        }
    }
}

impl fmt::Display for StyleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Sequence { ordinal, index } => write!(f, "sequence-{ordinal}-{index}"),
        }
    }
}

/// One immutable node of the template tree.
///
/// A leaf carries exactly one code point; a group carries none and instead
/// has children. The root is a group with no style class of its own.
#[derive(Clone, Debug)]
pub struct Template {
    pub(crate) symbol: Option<char>,
    pub(crate) display_text: Option<char>,
    pub(crate) style_class: Option<&'static str>,
    pub(crate) children: Vec<TemplateId>,
}

impl Template {
    /// The code point this node appends to the message, or `None` for a
    /// group.
    #[must_use]
    pub fn symbol(&self) -> Option<char> {
        self.symbol
    }

    /// The text to render for this node, after display substitution.
    ///
    /// Groups have no text of their own.
    #[must_use]
    pub fn display_text(&self) -> Option<char> {
        self.display_text
    }

    /// The fixed style class, or `None` when the class is derived from
    /// sequence position at instantiation time.
    #[must_use]
    pub fn style_class(&self) -> Option<&'static str> {
        self.style_class
    }

    /// Ordered children; empty for a leaf.
    #[must_use]
    pub fn children(&self) -> &[TemplateId] {
        &self.children
    }

    /// Whether this node is a group rather than a symbol leaf.
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.symbol.is_none()
    }

    /// The weight a node has before any prediction is applied.
    ///
    /// Every symbol starts at 1; a group's default is the sum over its
    /// leaves, which the live tree recomputes whenever a prediction lands.
    #[must_use]
    pub fn default_weight(&self) -> f64 {
        1.0
    }
}

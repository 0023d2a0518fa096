// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the box tree: handles, child slots, and errors.

use alloc::string::String;
use core::fmt;

use smallvec::SmallVec;

/// Identifier for a box in the tree.
///
/// A small, copyable handle consisting of a slot index and a generation
/// counter. It stays stable while the box is alive and becomes invalid when
/// the underlying slot is reused; a stale `BoxId` never aliases a different
/// live box because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BoxId(pub(crate) u32, pub(crate) u32);

impl BoxId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// One entry in a box's child array.
///
/// The array mirrors the template children index-for-index. A slot whose
/// occupant has been detached (promoted to root, or discarded while its
/// parent was trimmed away) holds [`ChildSlot::StandIn`], a no-op stand-in
/// rather than a stale handle, so iteration over siblings never needs a
/// special case.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ChildSlot {
    /// A live child box.
    Occupied(BoxId),
    /// The former occupant has been detached from this tree position.
    StandIn,
}

impl ChildSlot {
    /// The occupant, if the slot is live.
    #[must_use]
    pub fn occupant(self) -> Option<BoxId> {
        match self {
            Self::Occupied(id) => Some(id),
            Self::StandIn => None,
        }
    }
}

/// Root-to-leaf record of the child indices chosen by a containment search.
///
/// Each entry is the child index taken at that level; the final entry is
/// `-1`, marking the box on which the search stopped. A path of just `[-1]`
/// addresses the root itself.
pub type HolderPath = SmallVec<[i32; 8]>;

/// Partial update for a box's four primary dimensions.
///
/// Any field left `None` keeps its current value. The derived `top`,
/// `bottom`, and `right` follow from the primary fields and are never set
/// directly.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SetDimensions {
    /// New left edge.
    pub left: Option<f64>,
    /// New width.
    pub width: Option<f64>,
    /// New vertical centre (y positive downward).
    pub middle: Option<f64>,
    /// New height.
    pub height: Option<f64>,
}

/// Error raised when a weight is assigned to a code point the palette does
/// not index.
///
/// This is a programming error in the predictor wiring, not a recoverable
/// prediction miss: the assignment cannot be routed to any child box, so
/// the whole update is aborted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightError {
    /// The code point with no known tree path.
    pub code_point: char,
    /// The message of the box whose children were being weighted.
    pub message: String,
}

impl fmt::Display for WeightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no palette path for code point {:?} while weighting children of {:?}",
            self.code_point, self.message
        )
    }
}

impl core::error::Error for WeightError {}

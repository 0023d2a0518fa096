// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-box geometry: four primary fields, derived edges, and containment.

use kurbo::Rect;

use crate::types::SetDimensions;

/// The geometry of one box.
///
/// The four primary fields are `left`, `width`, `middle`, and `height`; the
/// edges `top`, `bottom`, and `right` derive from them. All fields are
/// unset until the box is first placed, and a box with any primary field
/// unset is "dimension-undefined": it must be excluded from containment
/// queries and rendering alike.
///
/// Geometry is stored y positive downward, so `top < bottom` numerically.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BoxGeometry {
    /// Left edge, if placed.
    pub left: Option<f64>,
    /// Width, if placed.
    pub width: Option<f64>,
    /// Vertical centre, if placed.
    pub middle: Option<f64>,
    /// Height, if placed.
    pub height: Option<f64>,
}

impl BoxGeometry {
    /// Applies a partial update; `None` fields keep their current value.
    pub fn apply(&mut self, update: SetDimensions) {
        if let Some(left) = update.left {
            self.left = Some(left);
        }
        if let Some(width) = update.width {
            self.width = Some(width);
        }
        if let Some(middle) = update.middle {
            self.middle = Some(middle);
        }
        if let Some(height) = update.height {
            self.height = Some(height);
        }
    }

    /// Top edge: `middle - height / 2`.
    #[must_use]
    pub fn top(&self) -> Option<f64> {
        Some(self.middle? - self.height? / 2.0)
    }

    /// Bottom edge: `middle + height / 2`.
    #[must_use]
    pub fn bottom(&self) -> Option<f64> {
        Some(self.middle? + self.height? / 2.0)
    }

    /// Right edge: `left + width`.
    #[must_use]
    pub fn right(&self) -> Option<f64> {
        Some(self.left? + self.width?)
    }

    /// Whether any primary field is unset.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        self.left.is_none()
            || self.width.is_none()
            || self.middle.is_none()
            || self.height.is_none()
    }

    /// The box as a rectangle, if fully placed.
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        Some(Rect::new(
            self.left?,
            self.top()?,
            self.right()?,
            self.bottom()?,
        ))
    }

    /// Whether the geometry is well-formed enough to render or hit-test:
    /// fully placed, finite, with strictly positive extent.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        let (Some(left), Some(width), Some(middle), Some(height)) =
            (self.left, self.width, self.middle, self.height)
        else {
            return false;
        };
        left.is_finite()
            && width.is_finite()
            && middle.is_finite()
            && height.is_finite()
            && width > 0.0
            && height > 0.0
    }

    /// Tri-state containment test for a point with y positive upward.
    ///
    /// Returns `None` when the geometry is dimension-undefined; callers
    /// must treat that as "does not hold". Degenerate geometry (non-finite
    /// or non-positive extent) never holds.
    #[must_use]
    pub fn holds(&self, x: f64, y: f64) -> Option<bool> {
        if self.is_undefined() {
            return None;
        }
        if !self.is_renderable() {
            return Some(false);
        }
        // Edges are measured from the top of the window, so negate the
        // upward-positive input before comparing.
        let negative_y = -y;
        let left = self.left.unwrap_or_default();
        let right = self.right().unwrap_or_default();
        let top = self.top().unwrap_or_default();
        let bottom = self.bottom().unwrap_or_default();
        Some(x >= left && x <= right && negative_y >= top && negative_y <= bottom)
    }

    /// Clears every field back to the unplaced state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

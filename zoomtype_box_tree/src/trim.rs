// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Root trimming and promotion: keeping the session root anchored to the
//! viewport as navigation zooms past it.

use alloc::vec::Vec;

use zoomtype_limits::{GradientError, Limits};
use zoomtype_palette::Palette;

use crate::arrange::Arrange;
use crate::tree::Tree;
use crate::types::{BoxId, ChildSlot, SetDimensions};

impl Tree {
    /// If a child of the current root should become the new session root,
    /// detaches and returns it; otherwise returns `None`.
    ///
    /// The root is trimmed when its left edge has crossed the viewport's
    /// left bound and exactly one of its children is spawned with its own
    /// left edge across the bound too. Two simultaneous candidates block
    /// trimming for this pass; that ambiguity resolves itself as movement
    /// continues.
    ///
    /// The promoted child records its trimmed parent so the parent can be
    /// pushed back later; the slot it vacated (and the slots of its
    /// discarded siblings) hold stand-ins rather than stale handles.
    pub fn child_root(&mut self, root: BoxId, limits: &Limits) -> Option<BoxId> {
        let root_left = self.node(root).geometry.left?;
        if root_left > limits.left() {
            // Still inside the window; don't trim.
            return None;
        }

        let slots = self.node(root).children.as_ref()?.clone();
        let mut candidate: Option<(usize, BoxId)> = None;
        for (index, slot) in slots.iter().enumerate().rev() {
            let Some(child) = slot.occupant() else {
                continue;
            };
            if !self.node(child).spawned {
                continue;
            }
            if candidate.is_some() {
                // Second live child; ambiguous, don't trim.
                return None;
            }
            candidate = Some((index, child));
        }
        let (index, child) = candidate?;

        if self.node(child).geometry.left? > limits.left() {
            // The candidate isn't at the edge of the window; don't trim.
            return None;
        }

        // Detach the new root, discard its stale siblings, and leave
        // stand-ins behind so later erasure passes over the old root's
        // children never see a freed handle.
        for (sibling_index, slot) in slots.iter().enumerate() {
            if sibling_index != index {
                if let Some(sibling) = slot.occupant() {
                    let mut erased = Vec::new();
                    self.erase_rendering(sibling, &mut erased);
                    self.erased.append(&mut erased);
                    self.free_subtree(sibling);
                }
            }
            self.node_mut(root).children.as_mut().expect("checked above")[sibling_index] =
                ChildSlot::StandIn;
        }

        // De-render the outgoing root itself.
        if self.node(root).rendered {
            self.node_mut(root).rendered = false;
            self.erased.push(root);
        }

        self.node_mut(child).trimmed = Some((root, index as u32));
        Some(child)
    }

    /// If this box's trimmed parent should become the session root again,
    /// re-inserts this box into it, re-arranges the parent so this box does
    /// not move, and returns the parent; otherwise returns `None`.
    ///
    /// The parent comes back once there is visible slack around this box:
    /// its left edge has retreated inside the bound, or there is vertical
    /// slack on a side where this box has siblings.
    ///
    /// The parent's other children are re-instantiated fresh and the parent
    /// is queued for a new round of weight resolution.
    ///
    /// ## Errors
    ///
    /// - [`GradientError`] if no gradient table is configured.
    pub fn parent_root(
        &mut self,
        palette: &Palette,
        root: BoxId,
        limits: &Limits,
    ) -> Result<Option<BoxId>, GradientError> {
        let Some((parent, index)) = self.node(root).trimmed else {
            return Ok(None);
        };
        let index = index as usize;
        let geometry = self.node(root).geometry;
        let (Some(left), Some(top), Some(bottom), Some(height)) =
            (geometry.left, geometry.top(), geometry.bottom(), geometry.height)
        else {
            return Ok(None);
        };

        let sibling_count = self.node(parent).children.as_ref().map_or(0, Vec::len);
        let slack_above = index > 0 && top > limits.top();
        let slack_below = index + 1 < sibling_count && bottom < limits.bottom();
        if left <= limits.left() && !slack_above && !slack_below {
            return Ok(None);
        }

        // Rebuild the parent's children from the template, then put this
        // box back into its old slot in place of the fresh instantiation.
        self.free_children(parent);
        self.instantiate_children(palette, parent);
        let fresh = self.node(parent).children.as_ref().expect("just instantiated")[index]
            .occupant()
            .expect("fresh instantiation is fully occupied");
        self.free_subtree(fresh);
        self.node_mut(parent).children.as_mut().expect("just instantiated")[index] =
            ChildSlot::Occupied(root);
        self.node_mut(root).trimmed = None;

        // The fresh siblings have default weights until a predictor pass
        // refreshes them.
        self.complete_spawn(palette, parent);
        self.request_expansion(parent);

        // Arrange the parent so this box keeps its place: derive the parent
        // height from this box's height via the unit height, solve the
        // parent's left from that, and stack the siblings above.
        let unit_height = height / self.node(root).weight;
        let parent_height = unit_height * self.node(parent).total_weight;
        let parent_left = limits.solve_left(parent_height)?;
        self.set_dimensions(
            parent,
            SetDimensions {
                left: Some(parent_left),
                width: Some(limits.width() - parent_left),
                middle: None,
                height: Some(parent_height),
            },
        );
        let parent_top =
            self.arrange_children(palette, parent, limits, Arrange::Above { initialiser: index })?;
        self.set_dimensions(
            parent,
            SetDimensions {
                middle: Some(parent_top + parent_height / 2.0),
                ..Default::default()
            },
        );
        Ok(Some(parent))
    }
}

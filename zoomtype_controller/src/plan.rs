// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Target selection and the inverse-kinematic move solve.
//!
//! Each tick the controller picks the box the pointer is steering at, then
//! solves for where that box should be next: a new left edge from the
//! pointer's horizontal deflection, the height the gradient assigns at
//! that edge, and a new vertical centre chosen so the pointer keeps its
//! relative position inside the box. The move is expressed as deltas and
//! applied through the box tree, which re-establishes congruence up the
//! ancestor chain.

use kurbo::Vec2;
use zoomtype_box_tree::{BoxId, HolderPath, Tree};
use zoomtype_limits::{GradientError, Limits};

use crate::pointer::PointerState;

/// The full computed move for one tick, before application.
///
/// Also the payload handed to the frozen-diagnostics callback.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveRecord {
    /// The box the move applies to.
    pub target: BoxId,
    /// Root-to-target child indices, `-1` terminated.
    pub path: HolderPath,
    /// Pointer raw offset, y positive upward.
    pub pointer_raw: Vec2,
    /// Pointer offset after multiplier scaling.
    pub pointer_scaled: Vec2,
    /// Target left edge before the move.
    pub left_before: f64,
    /// Solved left edge after the move.
    pub left_after: f64,
    /// Target height before the move.
    pub height_before: f64,
    /// Gradient height at the solved left edge.
    pub height_after: f64,
    /// Target vertical centre before the move.
    pub middle_before: f64,
    /// Solved vertical centre after the move.
    pub middle_after: f64,
}

impl MoveRecord {
    /// Horizontal delta to apply.
    #[must_use]
    pub fn move_x(&self) -> f64 {
        self.left_after - self.left_before
    }

    /// Vertical delta to apply.
    #[must_use]
    pub fn move_y(&self) -> f64 {
        self.middle_after - self.middle_before
    }
}

/// Selects the box the pointer is steering at: the deepest box at the
/// right-hand working edge, level with the pointer.
///
/// When no box holds that point the move falls back to the root, signalled
/// by a path of just `[-1]`.
pub(crate) fn select_target(
    tree: &Tree,
    root: BoxId,
    limits: &Limits,
    pointer: &PointerState,
) -> Result<(BoxId, HolderPath), GradientError> {
    let edge = if limits.target_right() {
        limits.solver_right()?
    } else {
        limits.right()
    };
    let mut path = HolderPath::new();
    match tree.holder(root, edge, pointer.raw().y, Some(&mut path)) {
        Some(target) => Ok((target, path)),
        None => {
            path.clear();
            path.push(-1);
            Ok((root, path))
        }
    }
}

/// Selects the box under the pointer itself, for frozen diagnostics.
pub(crate) fn select_frozen_target(
    tree: &Tree,
    root: BoxId,
    pointer: &PointerState,
) -> Option<(BoxId, HolderPath)> {
    let mut path = HolderPath::new();
    let raw = pointer.raw();
    tree.holder(root, raw.x, raw.y, Some(&mut path))
        .map(|target| (target, path))
}

/// Solves the move for `target` from the pointer state.
///
/// Returns `None` when the target has no usable geometry yet.
///
/// ## Errors
///
/// - [`GradientError`] if no gradient table is configured.
pub(crate) fn plan_move(
    tree: &Tree,
    limits: &Limits,
    target: BoxId,
    path: HolderPath,
    pointer: &PointerState,
) -> Result<Option<MoveRecord>, GradientError> {
    let geometry = tree.geometry(target);
    let (Some(left_before), Some(middle_before), Some(height_before)) =
        (geometry.left, geometry.middle, geometry.height)
    else {
        return Ok(None);
    };
    if !(height_before.is_finite() && height_before > 0.0) {
        return Ok(None);
    }

    let raw = pointer.raw();
    let scaled = pointer.scaled();

    // Pushing the pointer right pulls the boxes left.
    let mut left_after = left_before - scaled.x;
    if raw.x < 0.0 && left_before < limits.left() {
        // Reversing out from beyond the viewport's left bound: damp the
        // step in proportion to the remaining room so the edge approaches
        // the bound without jumping past it.
        let step = -scaled.x;
        let room = limits.left() - left_before;
        if step > 0.0 && room > 0.0 {
            left_after = left_before + step * (room / (room + step));
        }
    }

    let height_after = limits.solve_height(left_after)?;

    // Preserve the pointer's relative vertical position within the box:
    // the fraction of the pointer's distance from the middle, over the
    // height, is carried from the old geometry to the new.
    let pointer_down = -scaled.y;
    let on_before = (pointer_down - middle_before) / height_before;
    let middle_after = pointer_down - on_before * height_after;

    Ok(Some(MoveRecord {
        target,
        path,
        pointer_raw: raw,
        pointer_scaled: scaled,
        left_before,
        left_after,
        height_before,
        height_after,
        middle_before,
        middle_after,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zoomtype_box_tree::SetDimensions;
    use zoomtype_limits::GradientRatio;
    use zoomtype_palette::Palette;

    fn limits() -> Limits {
        let mut limits = Limits::new(100.0, 200.0);
        limits.set_ratios(vec![
            GradientRatio {
                offset: 0.9,
                height: 0.01,
            },
            GradientRatio {
                offset: -1.0,
                height: 1.0,
            },
        ]);
        limits
    }

    fn tree_with_root(limits: &Limits, left: f64) -> (Palette, Tree, BoxId) {
        let palette = Palette::latin();
        let mut tree = Tree::new();
        let root = tree.spawn_root(&palette);
        let height = limits.solve_height(left).unwrap();
        tree.set_dimensions(
            root,
            SetDimensions {
                left: Some(left),
                width: Some(limits.width() - left),
                middle: Some(0.0),
                height: Some(height),
            },
        );
        tree.instantiate_children(&palette, root);
        tree.complete_spawn(&palette, root);
        (palette, tree, root)
    }

    fn pointer_at(x: f64, y: f64) -> PointerState {
        let mut pointer = PointerState::new();
        pointer.set_raw(x, y);
        pointer
    }

    fn root_path() -> HolderPath {
        let mut path = HolderPath::new();
        path.push(-1);
        path
    }

    #[test]
    fn falls_back_to_the_root_when_nothing_holds() {
        let limits = limits();
        let palette = Palette::latin();
        let mut tree = Tree::new();
        let root = tree.spawn_root(&palette);
        // Root never placed: nothing holds, move targets the root.
        let (target, path) = select_target(&tree, root, &limits, &pointer_at(10.0, 0.0)).unwrap();
        assert_eq!(target, root);
        assert_eq!(path.as_slice(), &[-1]);
    }

    #[test]
    fn selects_at_the_solver_edge_by_default() {
        let limits = limits();
        let (_, tree, root) = tree_with_root(&limits, 0.0);
        let (target, path) = select_target(&tree, root, &limits, &pointer_at(10.0, 0.0)).unwrap();
        assert_eq!(target, root);
        assert_eq!(*path.last().unwrap(), -1);
    }

    #[test]
    fn target_left_responds_monotonically_to_deflection() {
        let limits = limits();
        let (_, tree, root) = tree_with_root(&limits, 0.0);
        let path = root_path();

        let small = plan_move(&tree, &limits, root, path.clone(), &pointer_at(10.0, 0.0))
            .unwrap()
            .unwrap();
        let large = plan_move(&tree, &limits, root, path, &pointer_at(50.0, 0.0))
            .unwrap()
            .unwrap();
        assert!(small.left_after < small.left_before);
        assert!(large.left_after < small.left_after);
        // Moving left means growing.
        assert!(large.height_after > small.height_after);
    }

    #[test]
    fn the_vertical_fraction_is_preserved() {
        let limits = limits();
        let (_, tree, root) = tree_with_root(&limits, 0.0);
        let path = root_path();
        let pointer = pointer_at(20.0, 30.0);

        let record = plan_move(&tree, &limits, root, path, &pointer)
            .unwrap()
            .unwrap();
        let pointer_down = -pointer.scaled().y;
        let before = (pointer_down - record.middle_before) / record.height_before;
        let after = (pointer_down - record.middle_after) / record.height_after;
        assert!((before - after).abs() < 1e-12);
    }

    #[test]
    fn reverse_moves_approach_the_bound_without_crossing() {
        let limits = limits();
        // A box already past the left bound, reversing out.
        let (_, tree, root) = tree_with_root(&limits, limits.left() - 40.0);
        let path = root_path();

        let mut previous = limits.left() - 40.0;
        for magnitude in [10.0, 100.0, 10_000.0] {
            let record = plan_move(
                &tree,
                &limits,
                root,
                path.clone(),
                &pointer_at(-magnitude, 0.0),
            )
            .unwrap()
            .unwrap();
            // Monotonically closer to the bound, never across it.
            assert!(record.left_after > previous);
            assert!(record.left_after < limits.left());
            previous = record.left_after;
        }
    }

    #[test]
    fn reverse_moves_inside_the_window_are_linear() {
        let limits = limits();
        let (_, tree, root) = tree_with_root(&limits, 0.0);
        let path = root_path();
        let record = plan_move(&tree, &limits, root, path, &pointer_at(-10.0, 0.0))
            .unwrap()
            .unwrap();
        assert_eq!(record.left_after, 10.0);
        assert!(record.height_after < record.height_before);
    }

    #[test]
    fn an_unplaced_target_produces_no_move() {
        let limits = limits();
        let palette = Palette::latin();
        let mut tree = Tree::new();
        let root = tree.spawn_root(&palette);
        let path = root_path();
        assert_eq!(
            plan_move(&tree, &limits, root, path, &pointer_at(10.0, 0.0)).unwrap(),
            None
        );
    }
}

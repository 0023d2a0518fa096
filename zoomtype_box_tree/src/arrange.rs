// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Child arrangement and incremental move application.

use zoomtype_limits::{GradientError, Limits};
use zoomtype_palette::Palette;

use crate::tree::Tree;
use crate::types::{BoxId, ChildSlot, HolderPath, SetDimensions};

/// Which children to arrange, and from where.
///
/// The two partial procedures exist so that a move applied deep in the tree
/// can keep the target box fixed while its siblings shuffle around it:
/// everything above the initialiser is pushed up from the initialiser's
/// top, everything below is pushed down from its bottom.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arrange {
    /// Arrange every child downward from this box's own top edge.
    All,
    /// Arrange the children above the initialiser, upward from its top.
    Above {
        /// Index of the child assumed to already be placed.
        initialiser: usize,
    },
    /// Arrange the children below the initialiser, downward from its
    /// bottom.
    Below {
        /// Index of the child assumed to already be placed.
        initialiser: usize,
    },
}

impl Tree {
    /// Arranges child boxes to occupy this box, spawning or erasing them as
    /// they enter and leave the eligible band.
    ///
    /// Children taller than the spawn threshold and overlapping the
    /// viewport vertically get their geometry set (left solved from their
    /// height); spawned ones arrange their own children in turn, pure
    /// groups spawn synchronously, and symbol boxes are queued for
    /// asynchronous weight resolution. Everything else is erased.
    ///
    /// Returns the trailing edge of the last child arranged: the final
    /// bottom for downward arrangement, the final top for upward.
    ///
    /// ## Errors
    ///
    /// - [`GradientError`] if no gradient table is configured.
    pub fn arrange_children(
        &mut self,
        palette: &Palette,
        id: BoxId,
        limits: &Limits,
        mode: Arrange,
    ) -> Result<f64, GradientError> {
        let node = self.node(id);
        let total_weight = node.total_weight;
        let Some(height) = node.geometry.height else {
            return Ok(0.0);
        };
        let Some(slots) = node.children.as_ref() else {
            return Ok(node.geometry.bottom().unwrap_or(0.0));
        };
        let child_count = slots.len() as isize;

        // A box whose weights are still unresolved has nothing meaningful
        // to distribute.
        if !(total_weight > 0.0 && total_weight.is_finite()) {
            return Ok(node.geometry.bottom().unwrap_or(0.0));
        }
        let unit_height = height / total_weight;

        let (mut edge, up, start) = match mode {
            Arrange::All => {
                let Some(top) = node.geometry.top() else {
                    return Ok(0.0);
                };
                (top, false, -1_isize)
            }
            Arrange::Above { initialiser } => {
                let Some(child) = slots
                    .get(initialiser)
                    .and_then(|slot| slot.occupant())
                else {
                    return Ok(0.0);
                };
                let Some(top) = self.node(child).geometry.top() else {
                    return Ok(0.0);
                };
                (top, true, initialiser as isize)
            }
            Arrange::Below { initialiser } => {
                let Some(child) = slots
                    .get(initialiser)
                    .and_then(|slot| slot.occupant())
                else {
                    return Ok(0.0);
                };
                let Some(bottom) = self.node(child).geometry.bottom() else {
                    return Ok(0.0);
                };
                (bottom, false, initialiser as isize)
            }
        };

        let direction: isize = if up { -1 } else { 1 };
        let mut index = start + direction;
        while index >= 0 && index < child_count {
            let child_height = self.child_weight_at(palette, id, index as usize) * unit_height;
            // `edge` tracks the shared boundary; derive this child's span.
            let (child_top, child_bottom) = if up {
                (edge - child_height, edge)
            } else {
                (edge, edge + child_height)
            };

            let should_spawn = limits
                .spawn_threshold()
                .is_none_or(|threshold| child_height >= threshold)
                && child_bottom > limits.top()
                && child_top < limits.bottom();

            let occupant = self
                .node(id)
                .children
                .as_ref()
                .and_then(|slots| slots.get(index as usize).copied())
                .and_then(ChildSlot::occupant);
            if let Some(child) = occupant {
                if should_spawn {
                    let child_left = limits.solve_left(child_height)?;
                    self.set_dimensions(
                        child,
                        SetDimensions {
                            left: Some(child_left),
                            width: Some(limits.width() - child_left),
                            middle: Some(child_bottom - child_height / 2.0),
                            height: Some(child_height),
                        },
                    );
                    if self.is_spawned(child) {
                        self.arrange_children(palette, child, limits, Arrange::All)?;
                    } else if self.is_pure_group(child) {
                        // Groups are pure structure; no weights to wait for.
                        self.spawn_group(palette, child);
                        self.arrange_children(palette, child, limits, Arrange::All)?;
                    } else {
                        self.request_expansion(child);
                    }
                } else {
                    self.erase(child);
                }
            }

            edge = if up { child_top } else { child_bottom };
            index += direction;
        }
        Ok(edge)
    }

    /// Applies a move to the box addressed by `path`, then re-establishes
    /// congruence up the chain: each ancestor takes the height implied by
    /// its moved child's weight share and shuffles the other children
    /// around it.
    ///
    /// Returns `false` without touching the root when the move would push
    /// the target past the solver's right boundary, or would shrink the
    /// root below the draw threshold.
    ///
    /// ## Errors
    ///
    /// - [`GradientError`] if no gradient table is configured.
    pub fn apply_move(
        &mut self,
        palette: &Palette,
        root: BoxId,
        move_x: f64,
        move_y: f64,
        path: &HolderPath,
        limits: &Limits,
    ) -> Result<bool, GradientError> {
        self.apply_move_at(palette, root, move_x, move_y, path, limits, 0)
    }

    fn apply_move_at(
        &mut self,
        palette: &Palette,
        id: BoxId,
        move_x: f64,
        move_y: f64,
        path: &HolderPath,
        limits: &Limits,
        position: usize,
    ) -> Result<bool, GradientError> {
        let index = path.get(position).copied().unwrap_or(-1);
        let root_box = position == 0;

        if index < 0 {
            // End of the path; attempt to apply the move here.
            return self.apply_move_here(palette, id, move_x, move_y, limits, root_box);
        }

        let target = self
            .node(id)
            .children
            .as_ref()
            .and_then(|slots| slots.get(index as usize).copied())
            .and_then(|slot| slot.occupant());
        let Some(target) = target else {
            return self.apply_move_here(palette, id, move_x, move_y, limits, root_box);
        };

        let applied =
            self.apply_move_at(palette, target, move_x, move_y, path, limits, position + 1)?;
        if !applied {
            // If it wasn't applied to the child, attempt to apply here
            // instead.
            return self.apply_move_here(palette, id, move_x, move_y, limits, root_box);
        }

        // Make this box congruent to the new height of the target child:
        // child_weight * (height / total_weight) = target.height.
        let target_height = self.node(target).geometry.height.unwrap_or(0.0);
        let child_weight = self.child_weight_at(palette, id, index as usize);
        let total_weight = self.node(id).total_weight;
        let height = (target_height / child_weight) * total_weight;

        // The root box must never shrink out of existence; undo by
        // re-arranging the children from the current geometry.
        if root_box && height <= limits.draw_threshold_rect() {
            self.arrange_children(palette, id, limits, Arrange::All)?;
            return Ok(false);
        }

        self.set_dimensions(
            id,
            SetDimensions {
                height: Some(height),
                ..Default::default()
            },
        );
        // Push up everything above the target, then push down everything
        // below it.
        let top = self.arrange_children(
            palette,
            id,
            limits,
            Arrange::Above {
                initialiser: index as usize,
            },
        )?;
        self.arrange_children(
            palette,
            id,
            limits,
            Arrange::Below {
                initialiser: index as usize,
            },
        )?;

        let left = limits.solve_left(height)?;
        self.set_dimensions(
            id,
            SetDimensions {
                left: Some(left),
                width: Some(limits.width() - left),
                middle: Some(top + height / 2.0),
                ..Default::default()
            },
        );
        Ok(true)
    }

    fn apply_move_here(
        &mut self,
        palette: &Palette,
        id: BoxId,
        move_x: f64,
        move_y: f64,
        limits: &Limits,
        root_box: bool,
    ) -> Result<bool, GradientError> {
        let geometry = self.node(id).geometry;
        let (Some(left), Some(middle)) = (geometry.left, geometry.middle) else {
            return Ok(false);
        };
        let moved_left = left + move_x;
        // At any point right of the last gradient entry the solver returns
        // the minimum height, which produces degenerate zooming. Reject
        // moves into that zone.
        if moved_left >= limits.solver_right()? {
            return Ok(false);
        }

        let solved_height = limits.solve_height(moved_left)?;
        // The root box must never have its rectangle erased.
        if root_box && solved_height <= limits.draw_threshold_rect() {
            return Ok(false);
        }

        self.set_dimensions(
            id,
            SetDimensions {
                left: Some(moved_left),
                width: Some(limits.width() - moved_left),
                middle: Some(middle + move_y),
                height: Some(solved_height),
            },
        );
        self.arrange_children(palette, id, limits, Arrange::All)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use smallvec::smallvec;
    use zoomtype_limits::GradientRatio;

    fn limits() -> Limits {
        let mut limits = Limits::new(100.0, 200.0);
        limits.set_ratios(alloc::vec![
            GradientRatio {
                offset: 0.9,
                height: 0.01,
            },
            GradientRatio {
                offset: -1.0,
                height: 1.0,
            },
        ]);
        limits.set_spawn_threshold(None);
        limits
    }

    fn spawned_root(palette: &Palette, limits: &Limits) -> (Tree, BoxId) {
        let mut tree = Tree::new();
        let root = tree.spawn_root(palette);
        let height = limits.solve_height(0.0).unwrap();
        tree.set_dimensions(
            root,
            SetDimensions {
                left: Some(0.0),
                width: Some(limits.width()),
                middle: Some(0.0),
                height: Some(height),
            },
        );
        tree.instantiate_children(palette, root);
        tree.complete_spawn(palette, root);
        (tree, root)
    }

    fn occupants(tree: &Tree, id: BoxId) -> Vec<BoxId> {
        tree.children(id)
            .unwrap()
            .iter()
            .filter_map(|slot| slot.occupant())
            .collect()
    }

    #[test]
    fn children_tile_the_parent_contiguously() {
        let palette = Palette::latin();
        let limits = limits();
        let (mut tree, root) = spawned_root(&palette, &limits);
        let bottom_edge = tree
            .arrange_children(&palette, root, &limits, Arrange::All)
            .unwrap();

        let root_geometry = tree.geometry(root);
        assert!((bottom_edge - root_geometry.bottom().unwrap()).abs() < 1e-9);

        let mut expected_top = root_geometry.top().unwrap();
        let unit = root_geometry.height.unwrap() / tree.total_weight(root);
        for child in occupants(&tree, root) {
            let geometry = tree.geometry(child);
            assert!((geometry.top().unwrap() - expected_top).abs() < 1e-9);
            let height = geometry.height.unwrap();
            assert!((height - tree.weight(child) * unit).abs() < 1e-9);
            // Left solved from height, width out to the far edge.
            let left = limits.solve_left(height).unwrap();
            assert!((geometry.left.unwrap() - left).abs() < 1e-9);
            assert!((geometry.width.unwrap() - (limits.width() - left)).abs() < 1e-9);
            expected_top += height;
        }
    }

    #[test]
    fn symbol_children_queue_for_expansion_and_groups_spawn_inline() {
        let palette = Palette::latin();
        let limits = limits();
        let (mut tree, root) = spawned_root(&palette, &limits);
        tree.arrange_children(&palette, root, &limits, Arrange::All)
            .unwrap();

        let requests = tree.take_expansion_requests();
        assert!(!requests.is_empty());
        for &id in &requests {
            assert!(!tree.is_pure_group(id));
            assert!(tree.is_pending_weights(id));
        }
        // Groups inside the viewport spawned synchronously.
        let spawned_groups = occupants(&tree, root)
            .into_iter()
            .filter(|&child| tree.is_pure_group(child) && tree.is_spawned(child))
            .count();
        assert!(spawned_groups > 0);
    }

    #[test]
    fn spawn_threshold_erases_undersized_children() {
        let palette = Palette::latin();
        let mut limits = limits();
        limits.set_spawn_threshold(Some(10.0));
        let (mut tree, root) = spawned_root(&palette, &limits);
        tree.arrange_children(&palette, root, &limits, Arrange::All)
            .unwrap();

        for child in occupants(&tree, root) {
            let height = tree.geometry(child).height;
            match height {
                Some(height) => assert!(height >= 10.0),
                // Undersized or out of view: erased back to unplaced.
                None => assert!(!tree.is_spawned(child)),
            }
        }
    }

    #[test]
    fn root_move_follows_the_gradient() {
        let palette = Palette::latin();
        let limits = limits();
        let (mut tree, root) = spawned_root(&palette, &limits);
        tree.arrange_children(&palette, root, &limits, Arrange::All)
            .unwrap();

        let before = tree.geometry(root);
        let path: HolderPath = smallvec![-1];
        let applied = tree
            .apply_move(&palette, root, -5.0, 2.0, &path, &limits)
            .unwrap();
        assert!(applied);

        let after = tree.geometry(root);
        assert!((after.left.unwrap() - (before.left.unwrap() - 5.0)).abs() < 1e-9);
        // Moving left grows the box.
        assert!(after.height.unwrap() > before.height.unwrap());
        assert!(
            (after.height.unwrap() - limits.solve_height(after.left.unwrap()).unwrap()).abs()
                < 1e-9
        );
        assert!((after.middle.unwrap() - (before.middle.unwrap() + 2.0)).abs() < 1e-9);
    }

    #[test]
    fn moves_past_the_solver_boundary_are_rejected() {
        let palette = Palette::latin();
        let limits = limits();
        let (mut tree, root) = spawned_root(&palette, &limits);

        let before = tree.geometry(root);
        let path: HolderPath = smallvec![-1];
        let applied = tree
            .apply_move(&palette, root, 1000.0, 0.0, &path, &limits)
            .unwrap();
        assert!(!applied);
        assert_eq!(tree.geometry(root), before);
    }

    #[test]
    fn root_shrink_below_draw_threshold_is_rejected() {
        let palette = Palette::latin();
        let mut limits = limits();
        limits.set_draw_threshold_rect(50.0);
        let (mut tree, root) = spawned_root(&palette, &limits);

        // Moving right solves to a height under the threshold.
        let target_left = limits.solve_left(40.0).unwrap();
        let current_left = tree.geometry(root).left.unwrap();
        let path: HolderPath = smallvec![-1];
        let applied = tree
            .apply_move(
                &palette,
                root,
                target_left - current_left,
                0.0,
                &path,
                &limits,
            )
            .unwrap();
        assert!(!applied);
    }

    #[test]
    fn child_moves_keep_the_parent_congruent() {
        let palette = Palette::latin();
        let limits = limits();
        let (mut tree, root) = spawned_root(&palette, &limits);
        tree.arrange_children(&palette, root, &limits, Arrange::All)
            .unwrap();

        // Pick a spawned group child and move it.
        let (index, child) = occupants(&tree, root)
            .into_iter()
            .enumerate()
            .find(|&(_, child)| tree.is_spawned(child))
            .unwrap();
        let path: HolderPath = smallvec![index as i32, -1];
        let applied = tree
            .apply_move(&palette, root, -4.0, 0.0, &path, &limits)
            .unwrap();
        assert!(applied);

        let child_height = tree.geometry(child).height.unwrap();
        let expected_root = (child_height / tree.weight(child)) * tree.total_weight(root);
        assert!((tree.geometry(root).height.unwrap() - expected_root).abs() < 1e-6);
    }
}

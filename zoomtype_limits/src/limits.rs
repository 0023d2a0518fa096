// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::Rect;

use crate::gradient::{self, GradientError, GradientPoint, GradientRatio};

/// Per-session geometric context: viewport bounds, navigation tunables, and
/// the gradient table.
///
/// The coordinate system is origin-centred with y positive downward, so the
/// viewport spans `-width/2 .. width/2` horizontally and
/// `-height/2 .. height/2` vertically. Pointer input arrives with y positive
/// upward; negation happens at the containment test, not here.
///
/// The right-most gradient entry defines [`Limits::solver_right`], the
/// solver's effective working boundary. It is deliberately distinct from the
/// true viewport right edge: at any offset beyond it the solver would return
/// the minimum height, so navigation stops just short.
#[derive(Clone, Debug)]
pub struct Limits {
    width: f64,
    height: f64,
    ratios: Vec<GradientRatio>,
    gradients: Option<Vec<GradientPoint>>,
    spawn_threshold: Option<f64>,
    draw_threshold_rect: f64,
    target_right: bool,
}

impl Limits {
    /// Creates limits for a viewport of the given extent, with no gradient
    /// configured yet.
    ///
    /// The navigation tunables start at workable defaults: children under 4
    /// units tall are not expanded, the root may not shrink below 10 units,
    /// and target selection probes at the solver boundary.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ratios: Vec::new(),
            gradients: None,
            spawn_threshold: Some(4.0),
            draw_threshold_rect: 10.0,
            target_right: true,
        }
    }

    /// Resizes the viewport and rebuilds the absolute gradient table from
    /// the configured ratios.
    pub fn set(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.rebuild();
    }

    /// Replaces the gradient ratios and rebuilds the absolute table.
    pub fn set_ratios(&mut self, ratios: Vec<GradientRatio>) {
        self.ratios = ratios;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.gradients = if self.ratios.is_empty() {
            None
        } else {
            Some(gradient::absolute_table(
                &self.ratios,
                self.width,
                self.height,
            ))
        };
    }

    /// Viewport width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Viewport height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Left bound of the viewport.
    #[must_use]
    pub fn left(&self) -> f64 {
        self.width / -2.0
    }

    /// Right bound of the viewport.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.width / 2.0
    }

    /// Top bound of the viewport (negative; y is positive downward).
    #[must_use]
    pub fn top(&self) -> f64 {
        self.height / -2.0
    }

    /// Bottom bound of the viewport.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.height / 2.0
    }

    /// The viewport as a rectangle, for intersection tests.
    #[must_use]
    pub fn frame(&self) -> Rect {
        Rect::new(self.left(), self.top(), self.right(), self.bottom())
    }

    /// Minimum child height eligible for expansion, if any.
    #[must_use]
    pub fn spawn_threshold(&self) -> Option<f64> {
        self.spawn_threshold
    }

    /// Sets the minimum child height eligible for expansion.
    pub fn set_spawn_threshold(&mut self, threshold: Option<f64>) {
        self.spawn_threshold = threshold;
    }

    /// Minimum height the root box may be moved down to.
    #[must_use]
    pub fn draw_threshold_rect(&self) -> f64 {
        self.draw_threshold_rect
    }

    /// Sets the minimum height the root box may be moved down to.
    pub fn set_draw_threshold_rect(&mut self, threshold: f64) {
        self.draw_threshold_rect = threshold;
    }

    /// Whether target selection probes at [`Limits::solver_right`] rather
    /// than the true viewport right edge.
    #[must_use]
    pub fn target_right(&self) -> bool {
        self.target_right
    }

    /// Sets the target-selection edge mode.
    pub fn set_target_right(&mut self, target_right: bool) {
        self.target_right = target_right;
    }

    /// The absolute gradient table, ascending by offset.
    ///
    /// ## Errors
    ///
    /// - [`GradientError`] if no ratios have been configured.
    pub fn gradients(&self) -> Result<&[GradientPoint], GradientError> {
        self.gradients.as_deref().ok_or(GradientError)
    }

    /// The solver's right-hand working boundary: the right-most gradient
    /// offset.
    ///
    /// ## Errors
    ///
    /// - [`GradientError`] if no ratios have been configured.
    pub fn solver_right(&self) -> Result<f64, GradientError> {
        let table = self.gradients()?;
        Ok(table[table.len() - 1].offset)
    }

    /// Height a box should have when its left edge sits at `offset`.
    ///
    /// ## Errors
    ///
    /// - [`GradientError`] if no ratios have been configured.
    pub fn solve_height(&self, offset: f64) -> Result<f64, GradientError> {
        Ok(gradient::solve_height(self.gradients()?, offset))
    }

    /// Left offset a box of `height` should sit at; inverse of
    /// [`Limits::solve_height`].
    ///
    /// ## Errors
    ///
    /// - [`GradientError`] if no ratios have been configured.
    pub fn solve_left(&self, height: f64) -> Result<f64, GradientError> {
        Ok(gradient::solve_left(self.gradients()?, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn configured() -> Limits {
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

    #[test]
    fn tunables_default_to_workable_values() {
        let limits = Limits::new(100.0, 200.0);
        assert_eq!(limits.spawn_threshold(), Some(4.0));
        assert_eq!(limits.draw_threshold_rect(), 10.0);
        assert!(limits.target_right());
    }

    #[test]
    fn bounds_are_origin_centred() {
        let limits = Limits::new(100.0, 200.0);
        assert_eq!(limits.left(), -50.0);
        assert_eq!(limits.right(), 50.0);
        assert_eq!(limits.top(), -100.0);
        assert_eq!(limits.bottom(), 100.0);
        assert_eq!(limits.frame(), Rect::new(-50.0, -100.0, 50.0, 100.0));
    }

    #[test]
    fn solving_without_ratios_is_a_configuration_error() {
        let limits = Limits::new(100.0, 200.0);
        assert_eq!(limits.solve_height(0.0), Err(GradientError));
        assert_eq!(limits.solve_left(10.0), Err(GradientError));
        assert_eq!(limits.solver_right(), Err(GradientError));
    }

    #[test]
    fn origin_height_sits_strictly_between_the_configured_points() {
        let limits = configured();
        let height = limits.solve_height(0.0).unwrap();
        assert!(height > 200.0 * 0.01);
        assert!(height < 200.0 * 1.0);
    }

    #[test]
    fn solver_right_is_the_rightmost_gradient_offset() {
        let limits = configured();
        assert_eq!(limits.solver_right().unwrap(), 90.0);
        // Distinct from the true viewport edge.
        assert_ne!(limits.solver_right().unwrap(), limits.right());
    }

    #[test]
    fn resize_rescales_the_table() {
        let mut limits = configured();
        limits.set(200.0, 400.0);
        assert_eq!(limits.solver_right().unwrap(), 180.0);
        assert_eq!(limits.solve_height(180.0).unwrap(), 4.0);
    }

    #[test]
    fn round_trip_at_hand_picked_heights() {
        let limits = configured();
        for height in [2.5, 10.0, 95.0, 150.0, 199.0] {
            let offset = limits.solve_left(height).unwrap();
            let back = limits.solve_height(offset).unwrap();
            assert!((back - height).abs() < 1e-9, "height {height}: got {back}");
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Within the table's height range the two solvers invert each
            // other; outside it they clamp, so the range is open at the ends.
            #[test]
            fn solve_round_trip(height in 2.1_f64..199.9) {
                let limits = configured();
                let offset = limits.solve_left(height).unwrap();
                let back = limits.solve_height(offset).unwrap();
                prop_assert!((back - height).abs() < 1e-6);
            }

            #[test]
            fn solve_height_is_monotonic_nonincreasing(
                a in -100.0_f64..90.0,
                b in -100.0_f64..90.0,
            ) {
                let limits = configured();
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                let h_lo = limits.solve_height(lo).unwrap();
                let h_hi = limits.solve_height(hi).unwrap();
                prop_assert!(h_lo >= h_hi - 1e-9);
            }
        }
    }
}

// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input state, as consumed by the controller.

use kurbo::Vec2;

/// Whether the pointer source is paused.
///
/// The state starts undetermined: a freshly constructed pointer has not yet
/// been told either way, and an undetermined pointer is allowed to go, so
/// that hosts which never wire a pause control still work.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PauseState {
    /// No pause control has reported yet.
    #[default]
    Undetermined,
    /// Input is suspended.
    Paused,
    /// Input is live.
    Running,
}

/// A snapshot of pointer input.
///
/// The raw offset is measured from the viewport centre with y positive
/// upward; `(0, 0)` is the rest position. The per-axis multipliers scale
/// raw offsets into the values the move solver consumes; hosts with coarse
/// input (an on-screen keyboard, say) configure smaller multipliers to slow
/// navigation down.
#[derive(Clone, Debug)]
pub struct PointerState {
    raw: Vec2,
    multiplier_left_right: f64,
    multiplier_up_down: f64,
    paused: PauseState,
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerState {
    /// A pointer at rest with unit multipliers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw: Vec2::ZERO,
            multiplier_left_right: 1.0,
            multiplier_up_down: 1.0,
            paused: PauseState::default(),
        }
    }

    /// A pointer at rest with the given per-axis multipliers.
    #[must_use]
    pub fn with_multipliers(left_right: f64, up_down: f64) -> Self {
        Self {
            multiplier_left_right: left_right,
            multiplier_up_down: up_down,
            ..Self::new()
        }
    }

    /// The raw offset, y positive upward.
    #[must_use]
    pub fn raw(&self) -> Vec2 {
        self.raw
    }

    /// Updates the raw offset.
    pub fn set_raw(&mut self, x: f64, y: f64) {
        self.raw = Vec2::new(x, y);
    }

    /// The horizontal multiplier.
    #[must_use]
    pub fn multiplier_left_right(&self) -> f64 {
        self.multiplier_left_right
    }

    /// Sets the horizontal multiplier.
    pub fn set_multiplier_left_right(&mut self, multiplier: f64) {
        self.multiplier_left_right = multiplier;
    }

    /// The vertical multiplier.
    #[must_use]
    pub fn multiplier_up_down(&self) -> f64 {
        self.multiplier_up_down
    }

    /// Sets the vertical multiplier.
    pub fn set_multiplier_up_down(&mut self, multiplier: f64) {
        self.multiplier_up_down = multiplier;
    }

    /// The pause state.
    #[must_use]
    pub fn paused(&self) -> PauseState {
        self.paused
    }

    /// Sets the pause state.
    pub fn set_paused(&mut self, paused: PauseState) {
        self.paused = paused;
    }

    /// The raw offset scaled by the multipliers.
    #[must_use]
    pub fn scaled(&self) -> Vec2 {
        Vec2::new(
            self.raw.x * self.multiplier_left_right,
            self.raw.y * self.multiplier_up_down,
        )
    }

    /// Whether the pointer is driving navigation: not paused, and deflected
    /// from the rest position.
    #[must_use]
    pub fn going(&self) -> bool {
        self.paused != PauseState::Paused && (self.raw.x != 0.0 || self.raw.y != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_resting_pointer_is_not_going() {
        let pointer = PointerState::new();
        assert!(!pointer.going());
    }

    #[test]
    fn deflection_on_either_axis_is_going() {
        let mut pointer = PointerState::new();
        pointer.set_raw(5.0, 0.0);
        assert!(pointer.going());
        pointer.set_raw(0.0, -3.0);
        assert!(pointer.going());
    }

    #[test]
    fn pausing_suppresses_going() {
        let mut pointer = PointerState::new();
        pointer.set_raw(5.0, 5.0);
        pointer.set_paused(PauseState::Paused);
        assert!(!pointer.going());
        pointer.set_paused(PauseState::Running);
        assert!(pointer.going());
    }

    #[test]
    fn multipliers_scale_but_do_not_affect_going() {
        let mut pointer = PointerState::with_multipliers(0.2, 0.5);
        pointer.set_raw(50.0, -10.0);
        assert_eq!(pointer.scaled(), Vec2::new(10.0, -5.0));
        assert_eq!(pointer.raw(), Vec2::new(50.0, -10.0));
        assert!(pointer.going());
    }
}

// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoomtype Controller: pointer-driven navigation over a zoom-box tree.
//!
//! The [`Controller`] is the heart of a zooming text-entry session. It owns
//! the palette, the geometric [`Limits`](zoomtype_limits::Limits), the live
//! box tree, and a pluggable predictor; the host owns a fixed-interval
//! timer, a [`Renderer`], and a source of [`PointerState`] snapshots, and
//! calls [`Controller::tick`] once per cycle.
//!
//! Each tick the controller selects the box the pointer is steering at (the
//! deepest box at the right-hand working edge, level with the pointer),
//! solves a consistent move for it — new left edge from the horizontal
//! deflection, height from the gradient at that edge, vertical centre
//! preserving the pointer's relative position inside the box — and applies
//! it through the tree, which keeps every ancestor congruent. Geometry
//! changes stream to the renderer; off-screen roots are trimmed and trimmed
//! parents promoted back as space allows.
//!
//! Everything is single-threaded and cooperative. Prediction requests
//! resolve between ticks and their weights land at the start of the next
//! tick, so the control loop never blocks on a predictor and no box is
//! mutated from two places at once.
//!
//! ## Minimal example
//!
//! ```
//! use zoomtype_controller::{Controller, PointerState, RenderBox, Renderer, RootPlacement};
//! use zoomtype_limits::{GradientRatio, Limits};
//! use zoomtype_palette::Palette;
//! use zoomtype_predict::UniformPredictor;
//!
//! struct NullRenderer;
//! impl Renderer for NullRenderer {
//!     fn draw(&mut self, _render_box: &RenderBox) {}
//!     fn erase(&mut self, _id: zoomtype_box_tree::BoxId) {}
//! }
//!
//! let mut limits = Limits::new(800.0, 600.0);
//! limits.set_ratios(vec![
//!     GradientRatio { offset: 0.9, height: 0.01 },
//!     GradientRatio { offset: -1.0, height: 1.0 },
//! ]);
//!
//! let mut controller =
//!     Controller::new(Palette::latin(), limits, Box::new(UniformPredictor));
//! controller.start(RootPlacement::AtLeft(0.0)).unwrap();
//!
//! let mut pointer = PointerState::new();
//! pointer.set_raw(40.0, 0.0);
//! let outcome = controller.tick(&pointer, &mut NullRenderer).unwrap();
//! assert!(outcome.going);
//! ```

mod controller;
mod plan;
mod pointer;
mod render;

pub use controller::{
    ControlError, Controller, ControllerState, FrozenReport, RootPlacement, TickOutcome,
};
pub use plan::MoveRecord;
pub use pointer::{PauseState, PointerState};
pub use render::{RenderBox, Renderer, colour_for};

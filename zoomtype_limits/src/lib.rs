// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoomtype Limits: viewport bounds and the zoom perspective solver.
//!
//! A [`Limits`] value is the per-session geometric context of a zooming
//! text-entry view: the viewport extent (origin-centred, y positive
//! downward), a handful of navigation tunables, and a piecewise-linear
//! gradient table mapping a box's horizontal offset to the height it should
//! have there. The gradient is what produces the perspective feel: as a box
//! travels left toward the selection edge it grows, at a rate chosen by the
//! configured curve rather than by any single scale factor.
//!
//! The gradient is configured as [`GradientRatio`] points relative to the
//! viewport and converted to an absolute table whenever the viewport is
//! (re)sized. [`Limits::solve_height`] and [`Limits::solve_left`] are the
//! two directions of the mapping and are approximate inverses of each other
//! within the table's height range.
//!
//! ## Minimal example
//!
//! ```
//! use zoomtype_limits::{GradientRatio, Limits};
//!
//! let mut limits = Limits::new(100.0, 200.0);
//! limits.set_ratios(vec![
//!     GradientRatio { offset: 0.9, height: 0.01 },
//!     GradientRatio { offset: -1.0, height: 1.0 },
//! ]);
//!
//! let height = limits.solve_height(0.0).unwrap();
//! let back = limits.solve_left(height).unwrap();
//! assert!((back - 0.0).abs() < 1e-9);
//! ```
//!
//! Solving before any ratios are set is a configuration error and returns
//! [`GradientError`].
//!
//! This crate is `no_std`; enable the `std` or `libm` feature to select
//! Kurbo's float backend.

#![no_std]

extern crate alloc;

mod gradient;
mod limits;

pub use gradient::{GradientError, GradientPoint, GradientRatio};
pub use limits::Limits;

// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gradient table types and the piecewise-linear solver.

use alloc::vec::Vec;
use core::fmt;

/// One configured gradient point, relative to the viewport.
///
/// `offset` is a fraction of the viewport width and `height` a fraction of
/// the viewport height. Offsets are signed: the viewport spans `-0.5..0.5`,
/// so an offset of `-1.0` sits one full width left of centre, well outside
/// the visible frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GradientRatio {
    /// Horizontal offset as a fraction of viewport width.
    pub offset: f64,
    /// Box height as a fraction of viewport height.
    pub height: f64,
}

/// One absolute gradient point, in viewport coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GradientPoint {
    /// Horizontal offset of a box's left edge.
    pub offset: f64,
    /// Box height at that offset.
    pub height: f64,
}

/// Error returned when a solve is requested before a gradient table exists.
///
/// This is a configuration error: ratios were never set, so there is no
/// curve to interpolate. It is not a recoverable data condition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GradientError;

impl fmt::Display for GradientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("gradient solve requested but no ratios have been configured")
    }
}

impl core::error::Error for GradientError {}

/// Converts ratios to an absolute table, sorted ascending by offset.
pub(crate) fn absolute_table(
    ratios: &[GradientRatio],
    width: f64,
    height: f64,
) -> Vec<GradientPoint> {
    let mut table: Vec<GradientPoint> = ratios
        .iter()
        .map(|ratio| GradientPoint {
            offset: width * ratio.offset,
            height: height * ratio.height,
        })
        .collect();
    table.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    table
}

/// Height at `offset`, by piecewise-linear interpolation over `table`.
///
/// At or beyond the last entry the last height is returned unchanged; the
/// solver never extrapolates rightward, it clamps. Before the first entry
/// the leading slope defined by the first two entries extends backward.
pub(crate) fn solve_height(table: &[GradientPoint], offset: f64) -> f64 {
    let Some(index) = table.iter().position(|point| offset < point.offset) else {
        return table[table.len() - 1].height;
    };
    if table.len() < 2 {
        return table[0].height;
    }
    let (near, far) = if index == 0 {
        (table[1], table[0])
    } else {
        (table[index], table[index - 1])
    };
    near.height + ((far.height - near.height) * (near.offset - offset)) / (near.offset - far.offset)
}

/// Offset at `height`; the inverse of [`solve_height`].
///
/// The table is ascending by offset, which makes it descending by height,
/// so the search direction flips but the boundary handling is symmetric.
pub(crate) fn solve_left(table: &[GradientPoint], height: f64) -> f64 {
    let Some(index) = table.iter().position(|point| height > point.height) else {
        return table[table.len() - 1].offset;
    };
    if table.len() < 2 {
        return table[0].offset;
    }
    let (near, far) = if index == 0 {
        (table[1], table[0])
    } else {
        (table[index], table[index - 1])
    };
    near.offset + ((far.offset - near.offset) * (near.height - height)) / (near.height - far.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn table() -> Vec<GradientPoint> {
        absolute_table(
            &[
                GradientRatio {
                    offset: 0.9,
                    height: 0.01,
                },
                GradientRatio {
                    offset: -1.0,
                    height: 1.0,
                },
            ],
            100.0,
            200.0,
        )
    }

    #[test]
    fn table_is_sorted_ascending_by_offset() {
        let table = table();
        assert_eq!(
            table,
            vec![
                GradientPoint {
                    offset: -100.0,
                    height: 200.0
                },
                GradientPoint {
                    offset: 90.0,
                    height: 2.0
                },
            ]
        );
    }

    #[test]
    fn interior_offsets_interpolate_between_neighbours() {
        let table = table();
        let height = solve_height(&table, 0.0);
        // Strictly between the two configured heights, nearer the small end.
        assert!(height > 2.0 && height < 200.0);
        let expected = 2.0 + (198.0 * 90.0) / 190.0;
        assert!((height - expected).abs() < 1e-12);
    }

    #[test]
    fn offsets_beyond_the_last_entry_clamp() {
        let table = table();
        assert_eq!(solve_height(&table, 90.0), 2.0);
        assert_eq!(solve_height(&table, 1000.0), 2.0);
    }

    #[test]
    fn offsets_before_the_first_entry_extend_the_leading_slope() {
        let table = table();
        let height = solve_height(&table, -150.0);
        assert!(height > 200.0);
    }

    #[test]
    fn solve_left_mirrors_the_clamp_at_the_small_end() {
        let table = table();
        assert_eq!(solve_left(&table, 2.0), 90.0);
        assert_eq!(solve_left(&table, 1.0), 90.0);
    }
}

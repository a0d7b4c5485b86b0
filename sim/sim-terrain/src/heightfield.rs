//! Height field terrain.
//!
//! A height field is a 2D grid of height values that defines a 3D surface.
//! The grid lies in the XY plane with heights along Z:
//! - Sample `(0, 0)` sits at `origin`
//! - X axis spans `[origin.x, origin.x + (width - 1) * cell_size]`
//! - Y axis spans `[origin.y, origin.y + (depth - 1) * cell_size]`
//!
//! ```text
//!    Z (up)
//!    │
//!    │  ╱────╲
//!    │ ╱      ╲
//!    │╱        ╲
//!    └────────────→ X
//!   ╱
//!  ╱
//! ↙ Y
//! ```
//!
//! Queries outside the grid are clamped to the border, so the terrain extends
//! the edge samples to infinity instead of failing.

// Grid indices are small and bounds are checked before casting.
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]

use nalgebra::{Point2, Vector3};
use sim_types::{Result, SimError};
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Height field terrain data.
///
/// Heights are stored in row-major order (X varies fastest).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeightField {
    /// Height values, `heights[y * width + x]`.
    heights: Vec<f64>,
    /// Number of columns (samples along X).
    width: usize,
    /// Number of rows (samples along Y).
    depth: usize,
    /// Spacing between samples (m).
    cell_size: f64,
    /// World XY position of sample `(0, 0)`.
    origin: Point2<f64>,
}

impl HeightField {
    /// Create a height field from row-major samples.
    ///
    /// Fails if the grid is smaller than 2x2, if `heights.len()` does not
    /// match `width * depth`, if `cell_size` is not positive, or if any
    /// sample is not finite.
    pub fn new(
        heights: Vec<f64>,
        width: usize,
        depth: usize,
        cell_size: f64,
        origin: Point2<f64>,
    ) -> Result<Self> {
        if width < 2 || depth < 2 {
            return Err(SimError::invalid_model(format!(
                "height field needs at least 2x2 samples, got {width}x{depth}"
            )));
        }
        if heights.len() != width * depth {
            return Err(SimError::shape(
                "height field samples",
                width * depth,
                heights.len(),
            ));
        }
        if !(cell_size > 0.0 && cell_size.is_finite()) {
            return Err(SimError::invalid_model(format!(
                "height field cell size must be positive, got {cell_size}"
            )));
        }
        if heights.iter().any(|h| !h.is_finite()) {
            return Err(SimError::invalid_model(
                "height field samples must be finite",
            ));
        }

        Ok(Self {
            heights,
            width,
            depth,
            cell_size,
            origin,
        })
    }

    /// Create a height field by sampling a function at the grid vertices.
    ///
    /// The function receives world-space `(x, y)` coordinates.
    pub fn from_fn<F>(
        width: usize,
        depth: usize,
        cell_size: f64,
        origin: Point2<f64>,
        f: F,
    ) -> Result<Self>
    where
        F: Fn(f64, f64) -> f64,
    {
        let mut heights = Vec::with_capacity(width * depth);
        for iy in 0..depth {
            for ix in 0..width {
                let x = origin.x + ix as f64 * cell_size;
                let y = origin.y + iy as f64 * cell_size;
                heights.push(f(x, y));
            }
        }
        Self::new(heights, width, depth, cell_size, origin)
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Spacing between samples (m).
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Total X extent (m).
    #[must_use]
    pub fn extent_x(&self) -> f64 {
        (self.width - 1) as f64 * self.cell_size
    }

    /// Total Y extent (m).
    #[must_use]
    pub fn extent_y(&self) -> f64 {
        (self.depth - 1) as f64 * self.cell_size
    }

    /// Height sample at grid coordinates, `None` when out of bounds.
    #[must_use]
    pub fn get(&self, ix: usize, iy: usize) -> Option<f64> {
        (ix < self.width && iy < self.depth).then(|| self.heights[iy * self.width + ix])
    }

    /// Bilinearly interpolated height at world `(x, y)`, clamped to the grid.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let lx = x - self.origin.x;
        let ly = y - self.origin.y;
        let cx = lx.clamp(0.0, self.extent_x());
        let cy = ly.clamp(0.0, self.extent_y());
        if cx != lx || cy != ly {
            trace!(x, y, "height field query clamped to grid border");
        }

        let gx = cx / self.cell_size;
        let gy = cy / self.cell_size;

        // The last cell owns the far border.
        let x0 = (gx.floor() as usize).min(self.width - 2);
        let y0 = (gy.floor() as usize).min(self.depth - 2);
        let fx = gx - x0 as f64;
        let fy = gy - y0 as f64;

        let h00 = self.heights[y0 * self.width + x0];
        let h10 = self.heights[y0 * self.width + x0 + 1];
        let h01 = self.heights[(y0 + 1) * self.width + x0];
        let h11 = self.heights[(y0 + 1) * self.width + x0 + 1];

        let h0 = h00 + fx * (h10 - h00);
        let h1 = h01 + fx * (h11 - h01);
        h0 + fy * (h1 - h0)
    }

    /// Surface normal at world `(x, y)` from central differences.
    #[must_use]
    pub fn normal(&self, x: f64, y: f64) -> Vector3<f64> {
        let eps = self.cell_size * 0.1;

        let dx = (self.sample(x + eps, y) - self.sample(x - eps, y)) / (2.0 * eps);
        let dy = (self.sample(x, y + eps) - self.sample(x, y - eps)) / (2.0 * eps);

        Vector3::new(-dx, -dy, 1.0).normalize()
    }

    /// Lowest and highest sample.
    #[must_use]
    pub fn height_range(&self) -> (f64, f64) {
        self.heights
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &h| {
                (min.min(h), max.max(h))
            })
    }
}

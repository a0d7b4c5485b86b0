//! The terrain capability and its concrete variants.

use nalgebra::{Point3, Vector3};

use crate::{HeightField, ParametricTerrain};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Height and normal queries against the ground.
///
/// Implementations must be pure: the same `(x, y)` always yields the same
/// answer, so that queries can run on many points in parallel.
pub trait TerrainModel {
    /// Terrain height `z` below or above `(x, y)`.
    fn height(&self, x: f64, y: f64) -> f64;

    /// Unit surface normal at `(x, y)`, pointing out of the ground.
    fn normal(&self, _x: f64, _y: f64) -> Vector3<f64> {
        Vector3::z()
    }

    /// Terrain heights under a batch of points.
    ///
    /// Implementors with several variants override this to pick the variant
    /// once per batch instead of once per point.
    fn heights(&self, points: &[Point3<f64>]) -> Vec<f64> {
        points.iter().map(|p| self.height(p.x, p.y)).collect()
    }

    /// Surface normals under a batch of points, like [`heights`](Self::heights).
    fn normals(&self, points: &[Point3<f64>]) -> Vec<Vector3<f64>> {
        points.iter().map(|p| self.normal(p.x, p.y)).collect()
    }
}

/// Flat ground at constant height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlatTerrain {
    /// Ground level (m).
    pub height: f64,
}

impl TerrainModel for FlatTerrain {
    fn height(&self, _x: f64, _y: f64) -> f64 {
        self.height
    }
}

impl TerrainModel for HeightField {
    fn height(&self, x: f64, y: f64) -> f64 {
        self.sample(x, y)
    }

    fn normal(&self, x: f64, y: f64) -> Vector3<f64> {
        HeightField::normal(self, x, y)
    }
}

impl TerrainModel for ParametricTerrain {
    fn height(&self, x: f64, y: f64) -> f64 {
        ParametricTerrain::height(self, x, y)
    }

    fn normal(&self, x: f64, y: f64) -> Vector3<f64> {
        ParametricTerrain::normal(self, x, y)
    }
}

/// Any of the supported terrains.
///
/// # Example
///
/// ```
/// use sim_terrain::{Terrain, TerrainModel};
///
/// let ground = Terrain::flat(0.0);
/// assert_eq!(ground.height(3.0, -2.0), 0.0);
/// assert_eq!(ground.normal(3.0, -2.0).z, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Terrain {
    /// Constant height.
    Flat(FlatTerrain),
    /// Sampled grid.
    Heightmap(HeightField),
    /// Closed-form surface.
    Parametric(ParametricTerrain),
}

impl Default for Terrain {
    fn default() -> Self {
        Self::flat(0.0)
    }
}

impl Terrain {
    /// Flat ground at `height`.
    #[must_use]
    pub fn flat(height: f64) -> Self {
        Self::Flat(FlatTerrain { height })
    }
}

impl From<HeightField> for Terrain {
    fn from(hf: HeightField) -> Self {
        Self::Heightmap(hf)
    }
}

impl From<ParametricTerrain> for Terrain {
    fn from(p: ParametricTerrain) -> Self {
        Self::Parametric(p)
    }
}

impl TerrainModel for Terrain {
    fn height(&self, x: f64, y: f64) -> f64 {
        match self {
            Self::Flat(t) => t.height(x, y),
            Self::Heightmap(t) => TerrainModel::height(t, x, y),
            Self::Parametric(t) => TerrainModel::height(t, x, y),
        }
    }

    fn normal(&self, x: f64, y: f64) -> Vector3<f64> {
        match self {
            Self::Flat(t) => t.normal(x, y),
            Self::Heightmap(t) => TerrainModel::normal(t, x, y),
            Self::Parametric(t) => TerrainModel::normal(t, x, y),
        }
    }

    fn heights(&self, points: &[Point3<f64>]) -> Vec<f64> {
        match self {
            Self::Flat(t) => t.heights(points),
            Self::Heightmap(t) => t.heights(points),
            Self::Parametric(t) => t.heights(points),
        }
    }

    fn normals(&self, points: &[Point3<f64>]) -> Vec<Vector3<f64>> {
        match self {
            Self::Flat(t) => t.normals(points),
            Self::Heightmap(t) => t.normals(points),
            Self::Parametric(t) => t.normals(points),
        }
    }
}

impl<T: TerrainModel + ?Sized> TerrainModel for &T {
    fn height(&self, x: f64, y: f64) -> f64 {
        (**self).height(x, y)
    }

    fn normal(&self, x: f64, y: f64) -> Vector3<f64> {
        (**self).normal(x, y)
    }

    fn heights(&self, points: &[Point3<f64>]) -> Vec<f64> {
        (**self).heights(points)
    }

    fn normals(&self, points: &[Point3<f64>]) -> Vec<Vector3<f64>> {
        (**self).normals(points)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    #[test]
    fn test_flat() {
        let t = Terrain::flat(0.25);
        assert_eq!(t.height(100.0, -4.0), 0.25);
        assert_eq!(t.normal(1.0, 1.0), Vector3::z());
    }

    #[test]
    fn test_dispatch_matches_variants() {
        let hf = HeightField::from_fn(4, 4, 1.0, Point2::origin(), |x, y| 0.1 * x - 0.2 * y)
            .unwrap();
        let terrain = Terrain::from(hf.clone());

        let points = [Point3::new(0.5, 0.5, 0.0), Point3::new(2.5, 1.0, 0.0)];
        let batch = terrain.heights(&points);
        let normals = terrain.normals(&points);
        assert_eq!(normals.len(), points.len());

        for ((p, h), n) in points.iter().zip(&batch).zip(&normals) {
            assert_relative_eq!(*h, hf.sample(p.x, p.y), epsilon = 1e-12);
            assert_relative_eq!(terrain.normal(p.x, p.y), hf.normal(p.x, p.y), epsilon = 1e-12);
            assert_relative_eq!(*n, hf.normal(p.x, p.y), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_reference_forwarding() {
        let t = Terrain::flat(-1.0);
        let r: &Terrain = &t;
        assert_eq!(TerrainModel::height(&r, 0.0, 0.0), -1.0);
    }
}

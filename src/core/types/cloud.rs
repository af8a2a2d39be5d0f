//! 3D point cloud storage.

use super::point::Point3D;
use serde::{Deserialize, Serialize};

/// Collection of 3D points using Struct of Arrays (SoA) layout.
///
/// Instead of `Vec<Point3D>` (x,y,z,x,y,z...), stores:
/// - `xs: Vec<f32>` (x,x,x...)
/// - `ys: Vec<f32>` (y,y,y...)
/// - `zs: Vec<f32>` (z,z,z...)
///
/// The grid-build and scoring loops walk one axis at a time, so keeping
/// each axis contiguous keeps those loops cache-friendly.
///
/// One cloud represents one sensor frame ("scan") of the tracked object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PointCloud3D {
    /// X coordinates in meters (SoA layout)
    pub xs: Vec<f32>,
    /// Y coordinates in meters (SoA layout)
    pub ys: Vec<f32>,
    /// Z coordinates in meters (SoA layout)
    pub zs: Vec<f32>,
}

impl PointCloud3D {
    /// Create an empty point cloud.
    pub fn new() -> Self {
        Self {
            xs: Vec::new(),
            ys: Vec::new(),
            zs: Vec::new(),
        }
    }

    /// Create a point cloud with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            xs: Vec::with_capacity(capacity),
            ys: Vec::with_capacity(capacity),
            zs: Vec::with_capacity(capacity),
        }
    }

    /// Create from a vector of points (converts AoS to SoA).
    pub fn from_points(points: Vec<Point3D>) -> Self {
        let n = points.len();
        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(n);
        let mut zs = Vec::with_capacity(n);
        for p in points {
            xs.push(p.x);
            ys.push(p.y);
            zs.push(p.z);
        }
        Self { xs, ys, zs }
    }

    /// Add a point.
    #[inline]
    pub fn push(&mut self, point: Point3D) {
        self.xs.push(point.x);
        self.ys.push(point.y);
        self.zs.push(point.z);
    }

    /// Add a point by coordinates directly (faster than push).
    #[inline]
    pub fn push_xyz(&mut self, x: f32, y: f32, z: f32) {
        self.xs.push(x);
        self.ys.push(y);
        self.zs.push(z);
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Clear all points.
    pub fn clear(&mut self) {
        self.xs.clear();
        self.ys.clear();
        self.zs.clear();
    }

    /// Get point at index (compatibility layer for code expecting Point3D).
    ///
    /// # Panics
    /// Panics if index is out of bounds.
    #[inline]
    pub fn point_at(&self, i: usize) -> Point3D {
        Point3D::new(self.xs[i], self.ys[i], self.zs[i])
    }

    /// Iterate over points (creates Point3D on the fly).
    pub fn iter(&self) -> impl Iterator<Item = Point3D> + '_ {
        self.xs
            .iter()
            .zip(self.ys.iter())
            .zip(self.zs.iter())
            .map(|((&x, &y), &z)| Point3D::new(x, y, z))
    }

    /// Axis-aligned bounding box of the cloud.
    ///
    /// Returns `None` for an empty cloud.
    pub fn bounds(&self) -> Option<(Point3D, Point3D)> {
        if self.xs.is_empty() {
            return None;
        }

        let mut min = Point3D::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3D::new(f32::MIN, f32::MIN, f32::MIN);

        for i in 0..self.len() {
            min.x = min.x.min(self.xs[i]);
            min.y = min.y.min(self.ys[i]);
            min.z = min.z.min(self.zs[i]);
            max.x = max.x.max(self.xs[i]);
            max.y = max.y.max(self.ys[i]);
            max.z = max.z.max(self.zs[i]);
        }

        Some((min, max))
    }

    /// Centroid (center of mass) of the cloud.
    ///
    /// Returns `None` for an empty cloud.
    pub fn centroid(&self) -> Option<Point3D> {
        if self.xs.is_empty() {
            return None;
        }

        let mut sum = Point3D::default();
        for i in 0..self.len() {
            sum.x += self.xs[i];
            sum.y += self.ys[i];
            sum.z += self.zs[i];
        }

        let inv_n = 1.0 / (self.len() as f32);
        Some(Point3D::new(sum.x * inv_n, sum.y * inv_n, sum.z * inv_n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_cloud_basic() {
        let mut cloud = PointCloud3D::new();
        assert!(cloud.is_empty());

        cloud.push(Point3D::new(1.0, 2.0, 3.0));
        cloud.push_xyz(4.0, 5.0, 6.0);

        assert_eq!(cloud.len(), 2);
        assert!(!cloud.is_empty());

        let p = cloud.point_at(1);
        assert_eq!(p.x, 4.0);
        assert_eq!(p.y, 5.0);
        assert_eq!(p.z, 6.0);
    }

    #[test]
    fn test_from_points() {
        let cloud = PointCloud3D::from_points(vec![
            Point3D::new(1.0, 2.0, 3.0),
            Point3D::new(-1.0, 0.0, 2.0),
        ]);

        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.xs, vec![1.0, -1.0]);
        assert_eq!(cloud.ys, vec![2.0, 0.0]);
        assert_eq!(cloud.zs, vec![3.0, 2.0]);
    }

    #[test]
    fn test_bounds() {
        let mut cloud = PointCloud3D::new();
        cloud.push_xyz(-1.0, -2.0, 0.5);
        cloud.push_xyz(3.0, 4.0, -0.5);
        cloud.push_xyz(0.0, 0.0, 2.0);

        let (min, max) = cloud.bounds().unwrap();
        assert_relative_eq!(min.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(min.y, -2.0, epsilon = 1e-6);
        assert_relative_eq!(min.z, -0.5, epsilon = 1e-6);
        assert_relative_eq!(max.x, 3.0, epsilon = 1e-6);
        assert_relative_eq!(max.y, 4.0, epsilon = 1e-6);
        assert_relative_eq!(max.z, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_centroid() {
        let mut cloud = PointCloud3D::new();
        cloud.push_xyz(0.0, 0.0, 0.0);
        cloud.push_xyz(2.0, 0.0, 4.0);
        cloud.push_xyz(1.0, 3.0, 2.0);

        let centroid = cloud.centroid().unwrap();
        assert_relative_eq!(centroid.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(centroid.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(centroid.z, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_cloud_operations() {
        let cloud = PointCloud3D::new();
        assert!(cloud.bounds().is_none());
        assert!(cloud.centroid().is_none());
    }

    #[test]
    fn test_single_point_bounds() {
        let mut cloud = PointCloud3D::new();
        cloud.push_xyz(3.0, 4.0, 5.0);

        let (min, max) = cloud.bounds().unwrap();
        assert_eq!(min.x, 3.0);
        assert_eq!(max.x, 3.0);
        assert_eq!(min.z, 5.0);
        assert_eq!(max.z, 5.0);
    }

    #[test]
    fn test_clear() {
        let mut cloud = PointCloud3D::new();
        cloud.push_xyz(1.0, 2.0, 3.0);
        cloud.clear();

        assert!(cloud.is_empty());
        assert_eq!(cloud.len(), 0);
    }

    #[test]
    fn test_iter() {
        let mut cloud = PointCloud3D::with_capacity(2);
        cloud.push_xyz(1.0, 2.0, 3.0);
        cloud.push_xyz(4.0, 5.0, 6.0);

        let points: Vec<_> = cloud.iter().collect();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], Point3D::new(1.0, 2.0, 3.0));
        assert_eq!(points[1], Point3D::new(4.0, 5.0, 6.0));
    }
}

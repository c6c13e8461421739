//! # Triangle Soup
//!
//! Unindexed triangles in millimeters. Geometry is kept in f64; narrowing to
//! f32 happens only when the model is written as STL.

use glam::DVec3;

/// One triangle, counter-clockwise when seen from outside the solid.
///
/// # Example
///
/// ```rust
/// use img2stl::Triangle;
/// use glam::DVec3;
///
/// let tri = Triangle::new(DVec3::ZERO, DVec3::X, DVec3::Y);
/// assert_eq!(tri.normal(), DVec3::Z);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Corners in winding order.
    pub vertices: [DVec3; 3],
}

impl Triangle {
    /// Creates a triangle from its corners in winding order.
    #[inline]
    pub fn new(v0: DVec3, v1: DVec3, v2: DVec3) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Unit face normal from `(v1 - v0) x (v2 - v0)`.
    ///
    /// A degenerate triangle divides by 1 instead of 0 and so yields the zero
    /// vector.
    pub fn normal(&self) -> DVec3 {
        let [v0, v1, v2] = self.vertices;
        let cross = (v1 - v0).cross(v2 - v0);
        let length = cross.length();
        let length = if length == 0.0 { 1.0 } else { length };
        cross / length
    }

    /// Average of the three corners.
    #[inline]
    pub fn centroid(&self) -> DVec3 {
        let [v0, v1, v2] = self.vertices;
        (v0 + v1 + v2) / 3.0
    }
}

/// A named triangle sequence ready for serialization.
///
/// The name only fills the STL header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StlModel {
    /// Header text.
    pub name: String,
    /// Triangles in emission order.
    pub triangles: Vec<Triangle>,
}

impl StlModel {
    /// Creates a model.
    pub fn new(name: impl Into<String>, triangles: Vec<Triangle>) -> Self {
        Self {
            name: name.into(),
            triangles,
        }
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the model has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty model.
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        let mut corners = self.triangles.iter().flat_map(|t| t.vertices);
        let first = corners.next()?;
        Some(corners.fold((first, first), |(min, max), v| (min.min(v), max.max(v))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normal_is_unit_length() {
        let tri = Triangle::new(
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(3.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 4.0),
        );
        let n = tri.normal();
        assert_relative_eq!(n.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(n.y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reversed_winding_flips_normal() {
        let tri = Triangle::new(DVec3::ZERO, DVec3::Y, DVec3::X);
        assert_eq!(tri.normal(), DVec3::NEG_Z);
    }

    #[test]
    fn test_degenerate_normal_is_zero() {
        let collinear = Triangle::new(DVec3::ZERO, DVec3::X, DVec3::X * 2.0);
        assert_eq!(collinear.normal(), DVec3::ZERO);
        let point = Triangle::new(DVec3::ONE, DVec3::ONE, DVec3::ONE);
        assert!(point.normal().is_finite());
    }

    #[test]
    fn test_bounding_box() {
        assert!(StlModel::default().bounding_box().is_none());
        let model = StlModel::new(
            "box",
            vec![
                Triangle::new(DVec3::ZERO, DVec3::X, DVec3::Y),
                Triangle::new(DVec3::new(-1.0, 2.0, 3.0), DVec3::X, DVec3::Y),
            ],
        );
        let (min, max) = model.bounding_box().unwrap();
        assert_eq!(min, DVec3::new(-1.0, 0.0, 0.0));
        assert_eq!(max, DVec3::new(1.0, 2.0, 3.0));
    }
}

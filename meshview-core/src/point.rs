//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// Arithmetic mean of a set of points, `None` for an empty set
pub fn centroid(points: &[Point3f]) -> Option<Point3f> {
    if points.is_empty() {
        return None;
    }

    let sum = points
        .iter()
        .fold(Vector3f::zeros(), |acc, point| acc + point.coords);

    Some(Point3f::from(sum / points.len() as f32))
}

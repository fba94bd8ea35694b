//! Rigid view transform
//!
//! A [`ViewTransform`] is the world-to-camera matrix of a viewer. Its upper
//! 3×3 block holds the camera basis as rows (right, up, backward) and the last
//! column holds the translation. Incremental updates follow the usual
//! post-multiplication convention: translating or rotating the transform
//! composes the new motion on the right, in world coordinates.

use crate::point::*;
use nalgebra::{Matrix3, Matrix4, UnitQuaternion, Vector4};
use serde::{Deserialize, Serialize};

/// World-to-camera transform of a viewer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub matrix: Matrix4<f32>,
}

impl ViewTransform {
    /// Create an identity transform (camera at the origin looking down -Z)
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a right-handed view transform looking from `eye` at `target`
    pub fn look_at(eye: &Point3f, target: &Point3f, up: &Vector3f) -> Self {
        Self {
            matrix: Matrix4::look_at_rh(eye, target, up),
        }
    }

    /// Compose a world-space translation on the right
    pub fn translated(&self, offset: &Vector3f) -> Self {
        Self {
            matrix: self.matrix * Matrix4::new_translation(offset),
        }
    }

    /// Compose a rotation on the right
    pub fn rotated(&self, rotation: &UnitQuaternion<f32>) -> Self {
        Self {
            matrix: self.matrix * rotation.to_homogeneous(),
        }
    }

    /// Compose a rotation about a world-space pivot on the right.
    ///
    /// The pivot conjugation is built first so that an identity rotation
    /// leaves the transform bit-for-bit unchanged.
    pub fn rotated_about(&self, pivot: &Point3f, rotation: &UnitQuaternion<f32>) -> Self {
        let about_pivot = Matrix4::new_translation(&pivot.coords)
            * rotation.to_homogeneous()
            * Matrix4::new_translation(&-pivot.coords);

        Self {
            matrix: self.matrix * about_pivot,
        }
    }

    /// Raw basis row `index` (0 = right, 1 = up, 2 = backward) of the rotation block
    pub fn row(&self, index: usize) -> Vector3f {
        Vector3f::new(
            self.matrix[(index, 0)],
            self.matrix[(index, 1)],
            self.matrix[(index, 2)],
        )
    }

    /// Unit-length basis row. Normalizing strips any scale drift accumulated
    /// by repeated composition; a zero row is returned unchanged.
    pub fn basis_row(&self, index: usize) -> Vector3f {
        let row = self.row(index);
        row.try_normalize(f32::EPSILON).unwrap_or(row)
    }

    /// Camera right direction in world space
    pub fn right(&self) -> Vector3f {
        self.basis_row(0)
    }

    /// Camera up direction in world space
    pub fn up(&self) -> Vector3f {
        self.basis_row(1)
    }

    /// Camera backward direction (local +Z) in world space
    pub fn backward(&self) -> Vector3f {
        self.basis_row(2)
    }

    /// Upper 3×3 rotation block
    pub fn rotation(&self) -> Matrix3<f32> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Translation column
    pub fn translation(&self) -> Vector3f {
        self.matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Camera position in world space
    pub fn eye(&self) -> Point3f {
        Point3f::from(-(self.rotation().transpose() * self.translation()))
    }

    /// Map a world-space point into camera space
    pub fn transform_point(&self, point: &Point3f) -> Point3f {
        let homogeneous = self.matrix * point.to_homogeneous();
        Point3f::from_homogeneous(homogeneous).unwrap_or(*point)
    }

    /// Check that the rotation block is orthonormal with positive determinant
    /// and the bottom row is `[0, 0, 0, 1]`
    pub fn is_rigid(&self, epsilon: f32) -> bool {
        let rotation = self.rotation();
        let orthonormal = (rotation * rotation.transpose() - Matrix3::identity()).norm() < epsilon;
        let bottom = self.matrix.row(3).transpose() - Vector4::new(0.0, 0.0, 0.0, 1.0);

        orthonormal && rotation.determinant() > 0.0 && bottom.norm() < epsilon
    }

    /// Column-major array suitable for uploading to a GPU uniform
    pub fn to_cols_array(&self) -> [[f32; 4]; 4] {
        self.matrix.into()
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Matrix4<f32>> for ViewTransform {
    fn from(matrix: Matrix4<f32>) -> Self {
        Self { matrix }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::prelude::*;

    fn random_view(rng: &mut impl Rng) -> ViewTransform {
        let eye = Point3f::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(5.0..10.0),
        );
        ViewTransform::look_at(&eye, &Point3f::origin(), &Vector3f::y())
    }

    #[test]
    fn test_look_at_recovers_eye() {
        let eye = Point3f::new(1.0, 2.0, 5.0);
        let view = ViewTransform::look_at(&eye, &Point3f::origin(), &Vector3f::y());

        assert_relative_eq!(view.eye(), eye, epsilon = 1e-5);
        assert!(view.is_rigid(1e-5));
    }

    #[test]
    fn test_backward_points_away_from_target() {
        let view = ViewTransform::look_at(
            &Point3f::new(0.0, 0.0, 5.0),
            &Point3f::origin(),
            &Vector3f::y(),
        );

        assert_relative_eq!(view.backward(), Vector3f::z(), epsilon = 1e-6);
        assert_relative_eq!(view.right(), Vector3f::x(), epsilon = 1e-6);
        assert_relative_eq!(view.up(), Vector3f::y(), epsilon = 1e-6);
    }

    #[test]
    fn test_identity_rotation_about_pivot_is_exact() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let view = random_view(&mut rng);
            let pivot = Point3f::new(0.3, -1.2, 2.5);
            let rotated = view.rotated_about(&pivot, &UnitQuaternion::identity());
            assert_eq!(rotated, view);
        }
    }

    #[test]
    fn test_rotation_about_pivot_keeps_pivot_fixed() {
        let view = ViewTransform::look_at(
            &Point3f::new(0.0, 0.0, 5.0),
            &Point3f::origin(),
            &Vector3f::y(),
        );
        let pivot = Point3f::origin();
        let rotation = UnitQuaternion::from_axis_angle(&Vector3f::y_axis(), 0.7);

        let rotated = view.rotated_about(&pivot, &rotation);

        assert_relative_eq!(
            rotated.transform_point(&pivot),
            view.transform_point(&pivot),
            epsilon = 1e-5
        );
        assert!(rotated.is_rigid(1e-5));
    }

    #[test]
    fn test_translation_moves_eye_opposite() {
        let view = ViewTransform::identity();
        let moved = view.translated(&Vector3f::new(1.0, 0.0, 0.0));

        assert_relative_eq!(moved.eye(), Point3f::new(-1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_scaled_matrix_is_not_rigid() {
        let view = ViewTransform::from(Matrix4::new_scaling(2.0));
        assert!(!view.is_rigid(1e-5));
        assert_relative_eq!(view.basis_row(0), Vector3f::x(), epsilon = 1e-6);
    }
}

//! Orbit camera state and its pure update operations
//!
//! Every operation takes the current [`CameraState`] by reference and returns
//! the next one, so callers can keep history for undo or compare states in
//! tests. Pointer deltas are "previous minus current" in screen pixels.

use meshview_core::{Point3f, Vector3f, ViewTransform};
use nalgebra::{Matrix4, Quaternion, UnitQuaternion};
use serde::{Deserialize, Serialize};

/// How a rotate drag turns the camera around its orbit center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationStyle {
    /// Yaw about world up, pitch about the camera's right axis
    #[default]
    Turntable,
    /// Yaw and pitch about the camera's own up and right axes
    Trackball,
}

/// View transform plus the distance from the eye to the orbit center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub view: ViewTransform,
    pub orbit_radius: f32,
}

impl CameraState {
    /// Camera at `eye` orbiting `target`
    pub fn new(eye: Point3f, target: Point3f, up: Vector3f) -> Self {
        Self {
            view: ViewTransform::look_at(&eye, &target, &up),
            orbit_radius: (eye - target).norm(),
        }
    }

    /// Wrap an existing view transform; negative radii are clamped to zero
    pub fn from_view(view: ViewTransform, orbit_radius: f32) -> Self {
        Self {
            view,
            orbit_radius: orbit_radius.max(0.0),
        }
    }

    pub fn view_matrix(&self) -> &Matrix4<f32> {
        &self.view.matrix
    }

    /// Camera position in world space
    pub fn eye(&self) -> Point3f {
        self.view.eye()
    }

    /// Orbit center: `orbit_radius` in front of the eye
    pub fn look_at(&self) -> Point3f {
        self.eye() - self.view.backward() * self.orbit_radius
    }

    /// Rotate about `pivot` with the given style
    pub fn rotate(&self, style: RotationStyle, pivot: &Point3f, dx: f32, dy: f32, speed: f32) -> Self {
        match style {
            RotationStyle::Turntable => self.turntable(pivot, dx, dy, speed),
            RotationStyle::Trackball => self.trackball(pivot, dx, dy, speed),
        }
    }

    /// Turntable rotation about `pivot`.
    ///
    /// Yaw is about world up; its direction flips when the camera is upside
    /// down so that dragging right always turns the scene the same way on
    /// screen. Pitch is about the camera's right axis.
    pub fn turntable(&self, pivot: &Point3f, dx: f32, dy: f32, speed: f32) -> Self {
        let right = self.view.right();
        let sign = if self.view.row(1).y > 0.0 { 1.0 } else { -1.0 };

        let yaw = half_angle_rotation(-Vector3f::y() * (dx * speed * sign));
        let pitch = half_angle_rotation(-right * (dy * speed));

        Self {
            view: self.view.rotated_about(pivot, &(pitch * yaw)),
            orbit_radius: self.orbit_radius,
        }
    }

    /// Trackball rotation about `pivot` using the camera's own axes
    pub fn trackball(&self, pivot: &Point3f, dx: f32, dy: f32, speed: f32) -> Self {
        let right = self.view.right();
        let up = self.view.up();

        let yaw = half_angle_rotation(up * (dx * speed));
        let pitch = half_angle_rotation(-right * (dy * speed));

        Self {
            view: self.view.rotated_about(pivot, &(pitch * yaw)),
            orbit_radius: self.orbit_radius,
        }
    }

    /// Slide the camera in its image plane at a constant rate per pixel,
    /// regardless of the distance to the orbit center
    pub fn pan(&self, dx: f32, dy: f32, speed: f32) -> Self {
        let offset = -self.view.right() * (speed * dx) + self.view.up() * (speed * dy);

        Self {
            view: self.view.translated(&offset),
            orbit_radius: self.orbit_radius,
        }
    }

    /// Move the camera backward (positive offset) or forward along its line
    /// of sight. The orbit radius follows, and the camera never passes
    /// through the orbit center: once the radius reaches zero, further
    /// zooming in has no effect and only a positive offset moves the camera.
    pub fn dolly(&self, offset: f32) -> Self {
        let offset = offset.max(-self.orbit_radius);

        Self {
            view: self.view.translated(&(-self.view.backward() * offset)),
            orbit_radius: self.orbit_radius + offset,
        }
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(Point3f::new(0.0, 0.0, 5.0), Point3f::origin(), Vector3f::y())
    }
}

/// Unit quaternion from the un-normalized quaternion `(1, v)`: a rotation
/// about `v` by `2·atan(|v|)`, the identity when `v` is zero
fn half_angle_rotation(v: Vector3f) -> UnitQuaternion<f32> {
    UnitQuaternion::new_normalize(Quaternion::new(1.0, v.x, v.y, v.z))
}

//! Pointer-driven orbit camera controller
//!
//! A small state machine on top of [`CameraState`]: a press picks the
//! interaction mode, each move turns the pointer delta into a camera update,
//! and a release returns to [`InteractionMode::Idle`]. Moves while idle are
//! ignored.

use crate::camera::{CameraState, RotationStyle};
use meshview_core::Point3f;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What a pointer drag currently does to the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    #[default]
    Idle,
    Rotate,
    Translate,
    Zoom,
}

/// Camera interaction parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Rotation per pixel of drag
    pub rotate_speed: f32,
    /// World units of pan per pixel of drag
    pub pan_speed: f32,
    /// World units of dolly per pixel of drag
    pub dolly_speed: f32,
    /// Drag-equivalent pixels per wheel step
    pub wheel_step_scale: f32,
    pub rotation_style: RotationStyle,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            rotate_speed: 0.005,
            pan_speed: 0.01,
            dolly_speed: 0.01,
            wheel_step_scale: 100.0,
            rotation_style: RotationStyle::Turntable,
        }
    }
}

impl ControllerConfig {
    /// Dolly offset for a wheel delta in eighths of a degree. One notch
    /// (15°, a delta of 120) moves the camera forward by
    /// `wheel_step_scale * dolly_speed`; partial notches are dropped.
    pub fn wheel_offset(&self, delta: i32) -> f32 {
        let steps = delta / 8 / 15;
        -(steps as f32) * self.wheel_step_scale * self.dolly_speed
    }
}

/// Orbit camera controller
#[derive(Debug, Clone)]
pub struct OrbitController {
    config: ControllerConfig,
    camera: CameraState,
    mode: InteractionMode,
    last_pointer: Point2<f32>,
    pivot: Point3f,
}

impl OrbitController {
    pub fn new(camera: CameraState, config: ControllerConfig) -> Self {
        Self {
            config,
            pivot: camera.look_at(),
            camera,
            mode: InteractionMode::Idle,
            last_pointer: Point2::origin(),
        }
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// Replace the camera, e.g. when restoring a saved or undone state
    pub fn set_camera(&mut self, camera: CameraState) {
        self.camera = camera;
        self.pivot = camera.look_at();
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Orbit center used by rotate drags
    pub fn pivot(&self) -> Point3f {
        self.pivot
    }

    /// Start a drag in `mode` at `pointer`
    pub fn begin_drag(&mut self, mode: InteractionMode, pointer: Point2<f32>) {
        self.last_pointer = pointer;
        self.pivot = self.camera.look_at();
        if mode != self.mode {
            debug!(from = ?self.mode, to = ?mode, "camera interaction mode changed");
        }
        self.mode = mode;
    }

    /// Apply the delta from the previous pointer sample. Returns the new
    /// camera state, or `None` when no drag is in progress.
    pub fn drag(&mut self, pointer: Point2<f32>) -> Option<CameraState> {
        let dx = self.last_pointer.x - pointer.x;
        let dy = self.last_pointer.y - pointer.y;
        let config = self.config;

        let next = match self.mode {
            InteractionMode::Idle => return None,
            InteractionMode::Rotate => {
                self.camera
                    .rotate(config.rotation_style, &self.pivot, dx, dy, config.rotate_speed)
            }
            InteractionMode::Translate => self.camera.pan(dx, dy, config.pan_speed),
            InteractionMode::Zoom => self.camera.dolly(config.dolly_speed * (dx + dy)),
        };

        self.camera = next;
        if self.mode != InteractionMode::Rotate {
            self.pivot = next.look_at();
        }
        self.last_pointer = pointer;

        Some(next)
    }

    /// Finish the current drag
    pub fn end_drag(&mut self) {
        if self.mode != InteractionMode::Idle {
            debug!(from = ?self.mode, "camera drag finished");
        }
        self.mode = InteractionMode::Idle;
    }

    /// Discrete dolly from a wheel delta. Works in any mode.
    pub fn wheel(&mut self, delta: i32) -> CameraState {
        let offset = self.config.wheel_offset(delta);
        self.camera = self.camera.dolly(offset);
        self.pivot = self.camera.look_at();
        self.camera
    }
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new(CameraState::default(), ControllerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_idle_ignores_drag() {
        let mut controller = OrbitController::default();
        let before = *controller.camera();

        assert!(controller.drag(Point2::new(40.0, 10.0)).is_none());
        assert_eq!(*controller.camera(), before);
    }

    #[test]
    fn test_drag_uses_previous_sample() {
        let mut controller = OrbitController::default();
        controller.begin_drag(InteractionMode::Zoom, Point2::new(100.0, 100.0));

        // dx + dy = (100 - 90) + (100 - 100) = 10 pixels backward
        let camera = controller.drag(Point2::new(90.0, 100.0)).unwrap();
        assert_relative_eq!(camera.orbit_radius, 5.1, epsilon = 1e-5);

        // Same position again: zero delta
        let camera = controller.drag(Point2::new(90.0, 100.0)).unwrap();
        assert_relative_eq!(camera.orbit_radius, 5.1, epsilon = 1e-5);
    }

    #[test]
    fn test_end_drag_returns_to_idle() {
        let mut controller = OrbitController::default();
        controller.begin_drag(InteractionMode::Rotate, Point2::new(0.0, 0.0));
        assert_eq!(controller.mode(), InteractionMode::Rotate);

        controller.end_drag();
        assert_eq!(controller.mode(), InteractionMode::Idle);
        assert!(controller.drag(Point2::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_rotate_zero_delta_is_identity() {
        let mut controller = OrbitController::default();
        let before = *controller.camera();

        controller.begin_drag(InteractionMode::Rotate, Point2::new(12.0, 34.0));
        let after = controller.drag(Point2::new(12.0, 34.0)).unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn test_pan_moves_orbit_center() {
        let mut controller = OrbitController::default();
        controller.begin_drag(InteractionMode::Translate, Point2::new(0.0, 0.0));
        controller.drag(Point2::new(-10.0, 0.0));

        assert_relative_eq!(controller.pivot(), Point3f::new(0.1, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(controller.camera().look_at(), controller.pivot(), epsilon = 1e-6);
    }

    #[test]
    fn test_wheel_steps() {
        let config = ControllerConfig::default();
        assert_relative_eq!(config.wheel_offset(120), -1.0);
        assert_relative_eq!(config.wheel_offset(-240), 2.0);
        // Less than one notch does nothing
        assert_eq!(config.wheel_offset(100), 0.0);

        let mut controller = OrbitController::default();
        let camera = controller.wheel(120);
        assert_relative_eq!(camera.orbit_radius, 4.0, epsilon = 1e-5);
        assert_relative_eq!(camera.eye(), Point3f::new(0.0, 0.0, 4.0), epsilon = 1e-5);
    }

    #[test]
    fn test_trackball_style_is_selectable() {
        let config = ControllerConfig {
            rotation_style: RotationStyle::Trackball,
            ..ControllerConfig::default()
        };
        let mut controller = OrbitController::new(CameraState::default(), config);
        controller.begin_drag(InteractionMode::Rotate, Point2::new(0.0, 0.0));
        let camera = controller.drag(Point2::new(30.0, 0.0)).unwrap();

        assert!(camera.view.is_rigid(1e-5));
        assert_relative_eq!(camera.look_at(), Point3f::origin(), epsilon = 1e-4);
    }
}

//! Renderer capability
//!
//! The view never draws. It drives an external [`Renderer`] (an OpenGL or
//! wgpu adapter owned by the host) through this trait, once per frame, from
//! [`crate::View::sync`].

use crate::camera::CameraState;
use crate::selection::{SelectionRect, SelectionRequest};
use bytemuck::{Pod, Zeroable};
use meshview_algorithms::PlaneFit;
use meshview_core::{Point3f, ViewTransform};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Pixel viewport with a bottom-left origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    /// Viewport of an item placed at `position` (scene coordinates, top-left
    /// origin) with the given logical size, inside a window of
    /// `window_height` logical pixels.
    pub fn from_item(
        position: Point2<f32>,
        width: f32,
        height: f32,
        window_height: f32,
        device_pixel_ratio: f32,
    ) -> Self {
        Self {
            x: (device_pixel_ratio * position.x).round() as i32,
            y: (device_pixel_ratio * (window_height - (position.y + height))).round() as i32,
            width: (device_pixel_ratio * width).round() as i32,
            height: (device_pixel_ratio * height).round() as i32,
        }
    }
}

/// Drawing backend driven by the view
pub trait Renderer {
    fn set_viewport(&mut self, viewport: Viewport);

    fn set_clear_color(&mut self, color: [f32; 4]);

    fn set_camera_matrix(&mut self, view: &ViewTransform);

    fn set_show_cameras(&mut self, show: bool);

    fn set_show_grid(&mut self, show: bool);

    /// Add every point projecting inside `rect` to the selection
    fn add_points_in_rect(&mut self, rect: SelectionRect);

    /// Add points picked along the screen segment `from`–`to` to the selection
    fn add_points_on_line(&mut self, from: Point2<i32>, to: Point2<i32>);

    fn clear_selection(&mut self);

    /// Currently selected points, in selection order
    fn selection(&self) -> &[Point3f];

    /// Draw the reference plane
    fn set_plane(&mut self, plane: &PlaneFit);

    fn clear_plane(&mut self);

    /// Draw the scale reference line
    fn set_distance_line(&mut self, from: Point3f, to: Point3f);

    fn clear_distance_line(&mut self);
}

/// A deferred scene change, applied to the renderer during sync
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderCommand {
    AddSelection(SelectionRequest),
    ClearSelection,
    SetPlane(PlaneFit),
    ClearPlane,
    SetDistanceLine([Point3f; 2]),
    ClearDistanceLine,
}

impl RenderCommand {
    pub fn apply<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        match self {
            RenderCommand::AddSelection(SelectionRequest::Rect(rect)) => {
                renderer.add_points_in_rect(*rect)
            }
            RenderCommand::AddSelection(SelectionRequest::Line { from, to }) => {
                renderer.add_points_on_line(*from, *to)
            }
            RenderCommand::ClearSelection => renderer.clear_selection(),
            RenderCommand::SetPlane(plane) => renderer.set_plane(plane),
            RenderCommand::ClearPlane => renderer.clear_plane(),
            RenderCommand::SetDistanceLine([from, to]) => renderer.set_distance_line(*from, *to),
            RenderCommand::ClearDistanceLine => renderer.clear_distance_line(),
        }
    }
}

/// Scene changes waiting for the next sync.
///
/// Later requests supersede earlier ones of the same kind: a clear cancels
/// a pending set and vice versa. Selection additions accumulate after a
/// pending clear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingCommands {
    clear_selection: bool,
    selections: VecDeque<SelectionRequest>,
    plane: Option<PlaneFit>,
    clear_plane: bool,
    distance_line: Option<[Point3f; 2]>,
    clear_distance_line: bool,
}

impl PendingCommands {
    pub fn add_selection(&mut self, request: SelectionRequest) {
        self.selections.push_back(request);
    }

    pub fn clear_selection(&mut self) {
        self.selections.clear();
        self.clear_selection = true;
    }

    pub fn set_plane(&mut self, plane: PlaneFit) {
        self.plane = Some(plane);
        self.clear_plane = false;
    }

    pub fn clear_plane(&mut self) {
        self.plane = None;
        self.clear_plane = true;
    }

    pub fn set_distance_line(&mut self, line: [Point3f; 2]) {
        self.distance_line = Some(line);
        self.clear_distance_line = false;
    }

    pub fn clear_distance_line(&mut self) {
        self.distance_line = None;
        self.clear_distance_line = true;
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Take the highest-priority pending command
    pub fn next(&mut self) -> Option<RenderCommand> {
        if std::mem::take(&mut self.clear_selection) {
            return Some(RenderCommand::ClearSelection);
        }
        if let Some(request) = self.selections.pop_front() {
            return Some(RenderCommand::AddSelection(request));
        }
        if let Some(plane) = self.plane.take() {
            return Some(RenderCommand::SetPlane(plane));
        }
        if std::mem::take(&mut self.clear_plane) {
            return Some(RenderCommand::ClearPlane);
        }
        if let Some(line) = self.distance_line.take() {
            return Some(RenderCommand::SetDistanceLine(line));
        }
        if std::mem::take(&mut self.clear_distance_line) {
            return Some(RenderCommand::ClearDistanceLine);
        }
        None
    }
}

/// Camera uniform data for GPU renderers
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub eye: [f32; 3],
    pub orbit_radius: f32,
}

impl From<&CameraState> for CameraUniform {
    fn from(camera: &CameraState) -> Self {
        Self {
            view: camera.view.to_cols_array(),
            eye: camera.eye().coords.into(),
            orbit_radius: camera.orbit_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshview_core::Vector3f;

    fn plane() -> PlaneFit {
        PlaneFit {
            origin: Point3f::origin(),
            normal: Vector3f::z(),
            roll_degrees: 0.0,
        }
    }

    #[test]
    fn test_viewport_from_item() {
        let viewport = Viewport::from_item(Point2::new(10.0, 20.0), 300.0, 200.0, 600.0, 2.0);
        assert_eq!(
            viewport,
            Viewport {
                x: 20,
                y: 760,
                width: 600,
                height: 400
            }
        );
    }

    #[test]
    fn test_pending_priority() {
        let mut pending = PendingCommands::default();
        pending.set_distance_line([Point3f::origin(), Point3f::new(1.0, 0.0, 0.0)]);
        pending.set_plane(plane());
        pending.clear_selection();
        let rect = SelectionRect {
            x: 0,
            y: 0,
            width: 4,
            height: 4,
        };
        pending.add_selection(SelectionRequest::Rect(rect));

        assert_eq!(pending.next(), Some(RenderCommand::ClearSelection));
        assert_eq!(
            pending.next(),
            Some(RenderCommand::AddSelection(SelectionRequest::Rect(rect)))
        );
        assert_eq!(pending.next(), Some(RenderCommand::SetPlane(plane())));
        assert!(matches!(pending.next(), Some(RenderCommand::SetDistanceLine(_))));
        assert_eq!(pending.next(), None);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_selections_apply_in_request_order() {
        let mut pending = PendingCommands::default();
        let requests: Vec<SelectionRequest> = (0..3)
            .map(|i| {
                SelectionRequest::Rect(SelectionRect {
                    x: i * 10,
                    y: 0,
                    width: 5,
                    height: 5,
                })
            })
            .collect();
        for request in &requests {
            pending.add_selection(*request);
        }

        for request in requests {
            assert_eq!(pending.next(), Some(RenderCommand::AddSelection(request)));
        }
        assert_eq!(pending.next(), None);
    }

    #[test]
    fn test_clear_supersedes_set() {
        let mut pending = PendingCommands::default();
        pending.set_plane(plane());
        pending.clear_plane();
        assert_eq!(pending.next(), Some(RenderCommand::ClearPlane));
        assert_eq!(pending.next(), None);

        pending.clear_distance_line();
        pending.set_distance_line([Point3f::origin(); 2]);
        assert!(matches!(pending.next(), Some(RenderCommand::SetDistanceLine(_))));
        assert_eq!(pending.next(), None);
    }

    #[test]
    fn test_camera_uniform_is_plain_data() {
        let camera = CameraState::default();
        let uniform = CameraUniform::from(&camera);

        assert_eq!(uniform.eye, [0.0, 0.0, 5.0]);
        assert_eq!(bytemuck::bytes_of(&uniform).len(), 80);
        assert_eq!(uniform.view[3][2], -5.0);
    }
}

//! Toolkit-agnostic 3D viewer state
//!
//! [`View`] is everything a point-cloud viewer item does besides drawing:
//! it maps pointer gestures to camera, selection and roll interactions, owns
//! the reference plane and the scale reference, and queues scene changes for
//! the host's [`Renderer`]. The host feeds it input events, calls
//! [`View::sync`] once per frame with its renderer, and paints
//! [`View::overlay`] on top.
//!
//! Gestures:
//!
//! | modifiers | button | gesture |
//! |---|---|---|
//! | Alt | left / middle / right | rotate / pan / dolly |
//! | Control | left | select points |
//! | Shift | left | roll the reference plane |
//! | none | right (release) | open the context popup |
//! | any | wheel | dolly |

use crate::camera::CameraState;
use crate::controller::{ControllerConfig, InteractionMode, OrbitController};
use crate::input::{Modifiers, PointerButton, PointerEvent};
use crate::overlay::{format_significant, Overlay};
use crate::renderer::{PendingCommands, RenderCommand, Renderer, Viewport};
use crate::selection::{SelectionMode, SelectionOutcome, SelectionTool};
use meshview_algorithms::{clamp_roll, PlaneFit, PlaneFitConfig, ReferencePlane, ScaleReference};
use meshview_core::{Result, Vector3f};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Viewer configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub controller: ControllerConfig,
    pub plane_fit: PlaneFitConfig,
    pub selection_mode: SelectionMode,
    pub show_cameras: bool,
    pub show_grid: bool,
    pub clear_color: [f32; 4],
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            plane_fit: PlaneFitConfig::default(),
            selection_mode: SelectionMode::Rectangle,
            show_cameras: true,
            show_grid: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Notifications for the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewEvent {
    ShowCamerasChanged(bool),
    ShowGridChanged(bool),
    ClearColorChanged([f32; 4]),
    /// Right click without modifiers
    OpenPopup,
    RollChanged(f32),
    ScaleChanged(f32),
}

#[derive(Debug)]
pub struct View {
    controller: OrbitController,
    selection: SelectionTool,
    plane: ReferencePlane,
    scale: ScaleReference,
    pending: PendingCommands,
    viewport: Viewport,
    show_cameras: bool,
    show_grid: bool,
    clear_color: [f32; 4],
    roll_anchor: Option<Point2<f32>>,
    events: Vec<ViewEvent>,
    redraw_requested: bool,
}

impl View {
    pub fn new(config: ViewConfig) -> Self {
        Self::with_camera(CameraState::default(), config)
    }

    pub fn with_camera(camera: CameraState, config: ViewConfig) -> Self {
        Self {
            controller: OrbitController::new(camera, config.controller),
            selection: SelectionTool::new(config.selection_mode),
            plane: ReferencePlane::new(config.plane_fit),
            scale: ScaleReference::default(),
            pending: PendingCommands::default(),
            viewport: Viewport::default(),
            show_cameras: config.show_cameras,
            show_grid: config.show_grid,
            clear_color: config.clear_color,
            roll_anchor: None,
            events: Vec::new(),
            redraw_requested: false,
        }
    }

    pub fn camera(&self) -> &CameraState {
        self.controller.camera()
    }

    pub fn set_camera(&mut self, camera: CameraState) {
        self.controller.set_camera(camera);
        self.request_redraw();
    }

    pub fn interaction_mode(&self) -> InteractionMode {
        self.controller.mode()
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.selection.set_mode(mode);
    }

    /// Current reference plane
    pub fn plane(&self) -> Option<&PlaneFit> {
        self.plane.current()
    }

    pub fn scale(&self) -> &ScaleReference {
        &self.scale
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn show_cameras(&self) -> bool {
        self.show_cameras
    }

    pub fn set_show_cameras(&mut self, show: bool) {
        if show != self.show_cameras {
            self.show_cameras = show;
            self.events.push(ViewEvent::ShowCamerasChanged(show));
            self.request_redraw();
        }
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn set_show_grid(&mut self, show: bool) {
        if show != self.show_grid {
            self.show_grid = show;
            self.events.push(ViewEvent::ShowGridChanged(show));
            self.request_redraw();
        }
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        if color != self.clear_color {
            self.clear_color = color;
            self.events.push(ViewEvent::ClearColorChanged(color));
            self.request_redraw();
        }
    }

    pub fn pointer_pressed(&mut self, event: &PointerEvent) {
        match event.modifiers {
            Modifiers::ALT => {
                let mode = if event.buttons.is_only(PointerButton::Left) {
                    InteractionMode::Rotate
                } else if event.buttons.is_only(PointerButton::Middle) {
                    InteractionMode::Translate
                } else if event.buttons.is_only(PointerButton::Right) {
                    InteractionMode::Zoom
                } else {
                    InteractionMode::Idle
                };
                self.controller.begin_drag(mode, event.position);
            }
            Modifiers::CONTROL if event.buttons.is_only(PointerButton::Left) => {
                self.selection.begin(event.pixel());
            }
            Modifiers::SHIFT if event.buttons.is_only(PointerButton::Left) => {
                self.roll_anchor = Some(event.position);
            }
            _ => {}
        }
    }

    pub fn pointer_moved(&mut self, event: &PointerEvent) {
        match event.modifiers {
            Modifiers::ALT => {
                if self.controller.drag(event.position).is_some() {
                    self.request_redraw();
                }
            }
            Modifiers::CONTROL => {
                if self.selection.is_dragging() {
                    self.selection.update(event.pixel());
                    self.request_redraw();
                }
            }
            Modifiers::SHIFT => {
                // Rolling without a plane has nothing to turn
                if let Some(anchor) = self.roll_anchor.filter(|_| self.plane.is_defined()) {
                    let degrees = clamp_roll((event.position.x - anchor.x).round());
                    if let Err(err) = self.set_roll(degrees) {
                        warn!(degrees, error = %err, "roll drag rejected");
                    }
                }
            }
            _ => {}
        }
    }

    /// A release ends whichever drag is active, whatever modifiers are
    /// still held.
    pub fn pointer_released(&mut self, event: &PointerEvent) {
        self.controller.end_drag();

        if self.selection.is_dragging() {
            match self.selection.finish() {
                SelectionOutcome::Add(request) => self.pending.add_selection(request),
                SelectionOutcome::Clear => self.pending.clear_selection(),
                SelectionOutcome::Nothing => {}
            }
        }

        if event.button == Some(PointerButton::Left) {
            self.roll_anchor = None;
        }

        if event.modifiers == Modifiers::NONE && event.button == Some(PointerButton::Right) {
            self.events.push(ViewEvent::OpenPopup);
        }

        self.request_redraw();
    }

    /// Wheel delta in eighths of a degree, positive away from the user
    pub fn wheel(&mut self, delta: i32) {
        self.controller.wheel(delta);
        self.request_redraw();
    }

    /// Fit the reference plane to the renderer's current selection.
    /// On failure the previous plane is kept.
    pub fn define_plane<R: Renderer + ?Sized>(&mut self, renderer: &R) -> Result<PlaneFit> {
        let fit = *self.plane.define(renderer.selection())?;
        self.pending.set_plane(fit);
        self.request_redraw();
        Ok(fit)
    }

    pub fn clear_plane(&mut self) {
        self.plane.clear();
        self.pending.clear_plane();
        self.request_redraw();
    }

    pub fn flip_plane_normal(&mut self) -> Result<()> {
        let fit = *self.plane.flip_normal()?;
        self.pending.set_plane(fit);
        self.request_redraw();
        Ok(())
    }

    /// Set the roll about the plane normal, clamped to ±359°.
    /// Returns the stored angle.
    pub fn set_roll(&mut self, degrees: f32) -> Result<f32> {
        let fit = *self.plane.set_roll(degrees)?;
        self.pending.set_plane(fit);
        self.events.push(ViewEvent::RollChanged(fit.roll_degrees));
        self.request_redraw();
        Ok(fit.roll_degrees)
    }

    /// Use the two selected points as a distance line of real length `scale`
    pub fn define_scale<R: Renderer + ?Sized>(&mut self, renderer: &R, scale: f32) -> Result<()> {
        let changed = self.scale.define(renderer.selection(), scale)?;
        if let Some(line) = self.scale.line() {
            self.pending.set_distance_line(line);
        }
        if changed {
            self.events.push(ViewEvent::ScaleChanged(scale));
        }
        self.request_redraw();
        Ok(())
    }

    pub fn reset_scale(&mut self) {
        self.scale.reset();
        self.pending.clear_distance_line();
        self.events.push(ViewEvent::ScaleChanged(self.scale.scale()));
        self.request_redraw();
    }

    /// Push the frame state to `renderer` and apply at most one pending
    /// scene change, which is returned.
    pub fn sync<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Option<RenderCommand> {
        renderer.set_viewport(self.viewport);
        renderer.set_clear_color(self.clear_color);
        renderer.set_camera_matrix(&self.controller.camera().view);
        renderer.set_show_cameras(self.show_cameras);
        renderer.set_show_grid(self.show_grid);

        let command = self.pending.next()?;
        command.apply(renderer);
        debug!(?command, "applied scene change");

        if !self.pending.is_empty() {
            self.request_redraw();
        }

        Some(command)
    }

    /// Status text and selection shape to paint over the view
    pub fn overlay(&self) -> Overlay {
        let (normal, roll) = self
            .plane
            .current()
            .map(|fit| (fit.normal, fit.roll_degrees))
            .unwrap_or((Vector3f::zeros(), 0.0));

        let ratio = self
            .scale
            .ratio()
            .map(|r| format_significant(r, 3))
            .unwrap_or_else(|| "-".to_string());

        Overlay {
            lines: vec![
                format!(
                    "UP VECTOR: [{} {} {}]; ROTATION: {}",
                    format_significant(normal.x, 3),
                    format_significant(normal.y, 3),
                    format_significant(normal.z, 3),
                    format_significant(roll, 3)
                ),
                format!(
                    "DISTANCE: {}; SCALE: {}",
                    format_significant(self.scale.scale(), 3),
                    ratio
                ),
            ],
            selection: self.selection.current_request(),
        }
    }

    /// Drain notifications raised since the last call
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether the host should schedule a repaint; resets the flag
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

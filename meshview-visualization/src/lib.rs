//! Interaction layer for 3D point cloud viewers
//!
//! This crate turns pointer input into camera motion and point-selection
//! gestures without depending on any windowing toolkit or graphics API:
//! - Orbit camera state with turntable/trackball rotation, pan and dolly
//! - A drag state machine mapping pointer deltas to camera updates
//! - Rectangle and line selection gestures
//! - A [`View`] that owns the reference plane and scale reference and drives
//!   an external [`Renderer`]

pub mod camera;
pub mod controller;
pub mod input;
pub mod selection;
pub mod renderer;
pub mod overlay;
pub mod viewer;

pub use camera::*;
pub use controller::*;
pub use input::*;
pub use selection::*;
pub use renderer::*;
pub use overlay::*;
pub use viewer::*;

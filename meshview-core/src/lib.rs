//! Core data structures for meshview
//!
//! This crate provides the fundamental types shared by the camera
//! interaction and plane fitting crates: point aliases, a point container,
//! the rigid view transform and the common error type.

pub mod point;
pub mod point_cloud;
pub mod transform;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use transform::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point2, Point3, Vector3, Matrix4, UnitQuaternion};

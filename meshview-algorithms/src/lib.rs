//! # meshview algorithms
//!
//! Geometry computed from a viewer's point selection:
//! least-squares reference planes (with normal flipping and a roll angle
//! about the normal) and a two-point scale reference.

pub mod plane;
pub mod scale;

// Re-export commonly used items
pub use plane::*;
pub use scale::*;

//! Two-point scale reference
//!
//! The user picks two points of the cloud and states the real-world length
//! between them. The ratio of that length to the measured distance converts
//! scene units into real units.

use meshview_core::{Error, Point3f, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Number of selected points that define a distance line
pub const SCALE_POINTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleReference {
    line: Option<[Point3f; 2]>,
    scale: f32,
}

impl Default for ScaleReference {
    fn default() -> Self {
        Self {
            line: None,
            scale: 1.0,
        }
    }
}

impl ScaleReference {
    /// Record the distance line between the two selected points and the
    /// real-world length it represents. Returns whether the stored scale changed.
    pub fn define(&mut self, selection: &[Point3f], scale: f32) -> Result<bool> {
        if selection.len() != SCALE_POINTS {
            warn!(points = selection.len(), "scale reference needs exactly two selected points");
            return Err(Error::InvalidSelection(format!(
                "scale needs exactly {} selected points, got {}",
                SCALE_POINTS,
                selection.len()
            )));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::InvalidData(format!(
                "scale must be a positive finite length, got {}",
                scale
            )));
        }

        let changed = scale != self.scale;
        self.line = Some([selection[0], selection[1]]);
        self.scale = scale;
        debug!(scale, distance = ?self.distance(), "scale reference defined");

        Ok(changed)
    }

    /// Forget the distance line and restore unit scale
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Real-world length assigned to the distance line
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Endpoints of the distance line
    pub fn line(&self) -> Option<[Point3f; 2]> {
        self.line
    }

    /// Scene-space length of the distance line
    pub fn distance(&self) -> Option<f32> {
        self.line.map(|[a, b]| (b - a).norm())
    }

    /// Real units per scene unit; `None` without a line of non-zero length
    pub fn ratio(&self) -> Option<f32> {
        self.distance()
            .filter(|d| *d > f32::EPSILON)
            .map(|d| self.scale / d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_define_scale() {
        let mut reference = ScaleReference::default();
        let selection = [Point3f::new(0.0, 0.0, 0.0), Point3f::new(0.0, 2.0, 0.0)];

        assert!(reference.define(&selection, 5.0).unwrap());
        assert_relative_eq!(reference.distance().unwrap(), 2.0);
        assert_relative_eq!(reference.ratio().unwrap(), 2.5);

        // Same value again is not a change
        assert!(!reference.define(&selection, 5.0).unwrap());
    }

    #[test]
    fn test_wrong_selection_size() {
        let mut reference = ScaleReference::default();
        let three = [Point3f::origin(); 3];

        assert!(matches!(
            reference.define(&three, 2.0),
            Err(Error::InvalidSelection(_))
        ));
        assert!(matches!(
            reference.define(&three[..1], 2.0),
            Err(Error::InvalidSelection(_))
        ));
        assert_eq!(reference, ScaleReference::default());
    }

    #[test]
    fn test_invalid_scale_value() {
        let mut reference = ScaleReference::default();
        let selection = [Point3f::origin(), Point3f::new(1.0, 0.0, 0.0)];

        assert!(reference.define(&selection, 0.0).is_err());
        assert!(reference.define(&selection, f32::INFINITY).is_err());
        assert!(reference.line().is_none());
    }

    #[test]
    fn test_coincident_points_have_no_ratio() {
        let mut reference = ScaleReference::default();
        let selection = [Point3f::new(1.0, 1.0, 1.0); 2];

        reference.define(&selection, 3.0).unwrap();
        assert_eq!(reference.distance(), Some(0.0));
        assert!(reference.ratio().is_none());
    }

    #[test]
    fn test_reset() {
        let mut reference = ScaleReference::default();
        let selection = [Point3f::origin(), Point3f::new(1.0, 0.0, 0.0)];
        reference.define(&selection, 4.0).unwrap();

        reference.reset();
        assert_eq!(reference.scale(), 1.0);
        assert!(reference.line().is_none());
    }
}

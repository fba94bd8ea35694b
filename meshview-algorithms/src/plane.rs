//! Least-squares reference plane fitting

use meshview_core::{centroid, Error, Point3f, Result, Vector3f};
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Minimum number of points that can define a plane
pub const MIN_PLANE_POINTS: usize = 3;

/// Largest magnitude accepted for the roll angle, in degrees
pub const ROLL_LIMIT_DEGREES: f32 = 359.0;

/// Plane fitting parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneFitConfig {
    /// Relative threshold on the second singular value. Inputs whose second
    /// singular value falls below `degeneracy_tolerance * largest` are rank
    /// deficient (coincident or collinear) and have no unique plane.
    pub degeneracy_tolerance: f32,
}

impl Default for PlaneFitConfig {
    fn default() -> Self {
        Self {
            degeneracy_tolerance: 1e-5,
        }
    }
}

/// A fitted plane: centroid, unit normal and a roll angle about the normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneFit {
    /// Centroid of the input points
    pub origin: Point3f,
    /// Unit normal, the direction of least variance
    pub normal: Vector3f,
    /// Rotation about the normal in degrees, within ±[`ROLL_LIMIT_DEGREES`]
    pub roll_degrees: f32,
}

impl PlaneFit {
    /// Negate the normal in place
    pub fn flip_normal(&mut self) {
        self.normal = -self.normal;
    }

    /// Store a clamped roll angle and return the stored value
    pub fn set_roll(&mut self, degrees: f32) -> f32 {
        self.roll_degrees = clamp_roll(degrees);
        self.roll_degrees
    }

    /// Signed distance from `point` to the plane along the normal
    pub fn signed_distance(&self, point: &Point3f) -> f32 {
        self.normal.dot(&(point - self.origin))
    }

    /// Orthogonal projection of `point` onto the plane
    pub fn project(&self, point: &Point3f) -> Point3f {
        point - self.normal * self.signed_distance(point)
    }
}

/// Clamp a roll angle to ±[`ROLL_LIMIT_DEGREES`]
pub fn clamp_roll(degrees: f32) -> f32 {
    degrees.clamp(-ROLL_LIMIT_DEGREES, ROLL_LIMIT_DEGREES)
}

/// Fit a plane to `points` with the default parameters
pub fn fit_plane(points: &[Point3f]) -> Result<PlaneFit> {
    fit_plane_with(points, &PlaneFitConfig::default())
}

/// Fit the least-squares plane through `points`.
///
/// The points are mean-centered and their 3×3 scatter matrix is decomposed.
/// Its singular vectors are the left singular vectors of the centered 3×N
/// point matrix, and the one with the smallest singular value is the plane
/// normal; the centroid is the plane origin. The returned fit has a zero roll
/// angle.
///
/// # Errors
/// * [`Error::InsufficientPoints`] when fewer than three points are given
/// * [`Error::DegeneratePlane`] when the points are coincident or collinear,
///   or the decomposition does not yield a least-variance direction
/// * [`Error::InvalidData`] when a coordinate is not finite
pub fn fit_plane_with(points: &[Point3f], config: &PlaneFitConfig) -> Result<PlaneFit> {
    if points.len() < MIN_PLANE_POINTS {
        return Err(Error::InsufficientPoints {
            required: MIN_PLANE_POINTS,
            found: points.len(),
        });
    }

    if points.iter().any(|p| !p.coords.iter().all(|c| c.is_finite())) {
        return Err(Error::InvalidData("point coordinates must be finite".to_string()));
    }

    let origin = match centroid(points) {
        Some(origin) => origin,
        None => {
            return Err(Error::InsufficientPoints {
                required: MIN_PLANE_POINTS,
                found: 0,
            })
        }
    };

    // Scatter of the centered points; its singular vectors match those of
    // the centered 3xN matrix and its singular values are their squares
    let center = origin.coords.cast::<f64>();
    let mut scatter = Matrix3::<f64>::zeros();
    for point in points {
        let offset = point.coords.cast::<f64>() - center;
        scatter += offset * offset.transpose();
    }

    let svd = scatter.svd(true, false);
    let u = svd.u.ok_or(Error::DegeneratePlane)?;

    let variances = svd.singular_values;
    if !variances.iter().all(|s| s.is_finite()) {
        return Err(Error::DegeneratePlane);
    }

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| variances[b].total_cmp(&variances[a]));
    let largest = variances[order[0]];
    let middle = variances[order[1]];
    let smallest = order[2];

    let tolerance = f64::from(config.degeneracy_tolerance);
    if middle.sqrt() <= tolerance * largest.sqrt() {
        return Err(Error::DegeneratePlane);
    }

    let candidate = u.column(smallest).into_owned();
    // The normal must attain the least variance, or the factor is not usable
    let residual = candidate.dot(&(scatter * candidate)) - variances[smallest];
    if residual.is_nan() || residual.abs() > tolerance * largest {
        return Err(Error::DegeneratePlane);
    }

    let normal = candidate
        .cast::<f32>()
        .try_normalize(f32::EPSILON)
        .filter(|n| n.iter().all(|c| c.is_finite()))
        .ok_or(Error::DegeneratePlane)?;

    Ok(PlaneFit {
        origin,
        normal,
        roll_degrees: 0.0,
    })
}

/// The viewer's current reference plane.
///
/// Holds at most one fit. A failed fit leaves the previous plane in place;
/// a successful one replaces it entirely, roll included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferencePlane {
    fit: Option<PlaneFit>,
    config: PlaneFitConfig,
}

impl ReferencePlane {
    pub fn new(config: PlaneFitConfig) -> Self {
        Self { fit: None, config }
    }

    /// Current plane, if one is defined
    pub fn current(&self) -> Option<&PlaneFit> {
        self.fit.as_ref()
    }

    pub fn is_defined(&self) -> bool {
        self.fit.is_some()
    }

    /// Fit a new plane to `points`, replacing the current one on success
    pub fn define(&mut self, points: &[Point3f]) -> Result<&PlaneFit> {
        match fit_plane_with(points, &self.config) {
            Ok(fit) => {
                debug!(
                    origin = ?fit.origin,
                    normal = ?fit.normal,
                    points = points.len(),
                    "reference plane defined"
                );
                Ok(&*self.fit.insert(fit))
            }
            Err(err) => {
                warn!(points = points.len(), error = %err, "cannot define reference plane");
                Err(err)
            }
        }
    }

    /// Forget the current plane
    pub fn clear(&mut self) {
        self.fit = None;
    }

    /// Negate the current normal
    pub fn flip_normal(&mut self) -> Result<&PlaneFit> {
        let fit = self.fit.as_mut().ok_or(Error::NoPlaneDefined)?;
        fit.flip_normal();
        debug!(normal = ?fit.normal, "reference plane normal flipped");
        Ok(&*fit)
    }

    /// Set the roll angle about the current normal, clamped to ±359°
    pub fn set_roll(&mut self, degrees: f32) -> Result<&PlaneFit> {
        if degrees.is_nan() {
            return Err(Error::InvalidData("roll angle must be a number".to_string()));
        }
        let fit = self.fit.as_mut().ok_or(Error::NoPlaneDefined)?;
        fit.set_roll(degrees);
        Ok(&*fit)
    }
}

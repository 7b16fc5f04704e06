//! Best-fit planes through noisy point clouds.
//!
//! The normal is the eigenvector of the scatter matrix with the smallest
//! eigenvalue, recovered by power iteration on the inverse scatter matrix.

use bevy::prelude::*;

use crate::error::{Result, WebError};

const MAX_ITERATIONS: usize = 500;
const CONVERGENCE: f32 = 1e-7;
/// Relative size of the adjugate below which the cloud spans less than a plane.
const RANK_TOLERANCE: f32 = 1e-5;
/// Diagonal shift (relative to the trace) applied before inversion so exactly
/// planar clouds stay invertible. A multiple of the identity leaves the
/// eigenvectors untouched.
const REGULARIZATION: f32 = 1e-6;

/// A plane through `center` with unit `normal`.
///
/// The sign of a fitted normal is arbitrary; use [`Plane::oriented_towards`]
/// when a consistent hemisphere is needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub center: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(center: Vec3, normal: Vec3) -> Self {
        Self {
            center,
            normal: normal.normalize_or(Vec3::Z),
        }
    }

    /// Fits a plane through `points`.
    ///
    /// Fails with [`WebError::DegeneratePlane`] when fewer than three points
    /// are given or when they are coincident or collinear.
    pub fn fit(points: &[Vec3]) -> Result<Self> {
        if points.len() < 3 {
            return Err(WebError::DegeneratePlane {
                reason: "fewer than three points",
            });
        }

        let center = points.iter().copied().sum::<Vec3>() / points.len() as f32;
        let scatter = scatter_matrix(points, center);
        let trace = scatter.x_axis.x + scatter.y_axis.y + scatter.z_axis.z;
        if !(trace > f32::EPSILON) {
            return Err(WebError::DegeneratePlane {
                reason: "points are coincident",
            });
        }
        if adjugate_norm(&scatter) <= RANK_TOLERANCE * trace * trace {
            return Err(WebError::DegeneratePlane {
                reason: "points are collinear",
            });
        }

        let shifted = scatter + Mat3::from_diagonal(Vec3::splat(trace * REGULARIZATION));
        let inverse = shifted.inverse();
        if !inverse.is_finite() {
            return Err(WebError::DegeneratePlane {
                reason: "scatter matrix is not invertible",
            });
        }

        let normal = power_iteration(&inverse)?;
        Ok(Self { center, normal })
    }

    /// Signed distance from `point` to the plane.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        (point - self.center).dot(self.normal)
    }

    /// Rotation taking the plane normal onto +Z.
    pub fn rotation_to_up(&self) -> Quat {
        robust_rotation_arc(self.normal, Vec3::Z)
    }

    /// Returns the plane with its normal flipped, if needed, to point towards `point`.
    pub fn oriented_towards(self, point: Vec3) -> Self {
        if self.signed_distance(point) < 0.0 {
            Self {
                center: self.center,
                normal: -self.normal,
            }
        } else {
            self
        }
    }
}

fn scatter_matrix(points: &[Vec3], center: Vec3) -> Mat3 {
    let mut cols = [Vec3::ZERO; 3];
    for point in points {
        let d = *point - center;
        cols[0] += d * d.x;
        cols[1] += d * d.y;
        cols[2] += d * d.z;
    }
    Mat3::from_cols(cols[0], cols[1], cols[2])
}

// Frobenius norm of the adjugate: zero iff the matrix has rank < 2.
fn adjugate_norm(m: &Mat3) -> f32 {
    let (a, b, c) = (m.x_axis, m.y_axis, m.z_axis);
    (b.cross(c).length_squared() + c.cross(a).length_squared() + a.cross(b).length_squared())
        .sqrt()
}

fn power_iteration(m: &Mat3) -> Result<Vec3> {
    let mut v = Vec3::ONE.normalize();
    for _ in 0..MAX_ITERATIONS {
        let next = (*m * v).normalize_or_zero();
        if next == Vec3::ZERO || !next.is_finite() {
            return Err(WebError::DegeneratePlane {
                reason: "power iteration collapsed",
            });
        }
        let converged = next.abs_diff_eq(v, CONVERGENCE);
        v = next;
        if converged {
            break;
        }
    }
    Ok(v)
}

/// Shortest rotation from `from` to `to`, stable for (anti)parallel inputs.
pub(crate) fn robust_rotation_arc(from: Vec3, to: Vec3) -> Quat {
    const DOT_THRESHOLD: f32 = 0.9999;
    let dot = from.dot(to);
    if dot < -DOT_THRESHOLD {
        let axis = if from.x.abs() < 0.8 {
            Vec3::X.cross(from).normalize()
        } else {
            Vec3::Y.cross(from).normalize()
        };
        return Quat::from_axis_angle(axis, std::f32::consts::PI);
    } else if dot > DOT_THRESHOLD {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(from, to)
}

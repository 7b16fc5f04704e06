//! Plane-local UV coordinates for texture packing.

use bevy::prelude::*;

use crate::error::{Result, WebError};
use crate::plane::robust_rotation_arc;

/// Maps 3D points into the unit square of a plane's local frame.
///
/// Points are rotated so the plane normal faces +Z, then offset and scaled
/// by the larger side of their bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvProjection {
    pub rotation: Quat,
    pub origin: Vec2,
    pub scale: f32,
}

impl UvProjection {
    /// Fits the projection to the bounding box of `points`.
    pub fn fit(points: &[Vec3], normal: Vec3) -> Result<Self> {
        let rotation = robust_rotation_arc(normal.normalize_or(Vec3::Z), Vec3::Z);
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for point in points {
            let p = (rotation * *point).truncate();
            min = min.min(p);
            max = max.max(p);
        }

        let extent = max - min;
        let scale = extent.x.max(extent.y);
        if !scale.is_finite() || scale <= f32::EPSILON {
            return Err(WebError::ZeroExtentProjection);
        }
        Ok(Self {
            rotation,
            origin: min,
            scale,
        })
    }

    pub fn project(&self, point: Vec3) -> Vec2 {
        ((self.rotation * point).truncate() - self.origin) / self.scale
    }
}

/// Projects `points` into [0, 1]² along `normal`.
pub fn project_to_uv(points: &[Vec3], normal: Vec3) -> Result<Vec<Vec2>> {
    let projection = UvProjection::fit(points, normal)?;
    Ok(points.iter().map(|p| projection.project(*p)).collect())
}

/// Squeezes a tile-local UV into slot `tile` of a row of `tile_count` tiles.
pub fn tile_uv(uv: Vec2, tile: usize, tile_count: usize) -> Vec2 {
    let n = tile_count.max(1) as f32;
    Vec2::new(uv.x / n + tile as f32 / n, uv.y)
}

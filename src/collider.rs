//! Capsule colliders along web threads.
//!
//! Each polyline segment becomes a capsule (or a sphere when the segment is
//! shorter than the capsule diameter), so rigid bodies can rest on or get
//! caught in a web.

use avian3d::prelude::Collider;
use bevy::prelude::*;

use crate::webs::Webs;

/// A positioned capsule collider ready to be spawned into the world.
#[derive(Debug, Clone)]
pub struct PositionedCollider {
    /// World-space transform for the collider center.
    pub transform: Transform,
    pub collider: Collider,
    /// Length of the segment.
    pub length: f32,
}

/// Generates capsule colliders from web thread polylines.
pub struct ThreadColliderGenerator {
    radius: f32,
    min_length: f32,
}

impl Default for ThreadColliderGenerator {
    fn default() -> Self {
        Self {
            radius: 0.005,
            min_length: 0.0001,
        }
    }
}

impl ThreadColliderGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius.max(0.0001);
        self
    }

    /// Segments shorter than this are skipped.
    pub fn with_min_length(mut self, min_length: f32) -> Self {
        self.min_length = min_length.max(0.0);
        self
    }

    /// A single compound collider for every thread, or `None` when no
    /// segment qualifies.
    pub fn build(&self, webs: &Webs) -> Option<Collider> {
        let parts = self.build_parts(webs);
        if parts.is_empty() {
            return None;
        }
        Some(Collider::compound(
            parts
                .into_iter()
                .map(|p| (p.transform.translation, p.transform.rotation, p.collider))
                .collect::<Vec<_>>(),
        ))
    }

    /// Individual positioned colliders, one per qualifying segment.
    pub fn build_parts(&self, webs: &Webs) -> Vec<PositionedCollider> {
        let mut colliders = Vec::new();
        for polyline in webs.polylines() {
            for segment in polyline.windows(2) {
                if let Some(collider) = self.segment_collider(segment[0], segment[1]) {
                    colliders.push(collider);
                }
            }
        }
        colliders
    }

    fn segment_collider(&self, start: Vec3, end: Vec3) -> Option<PositionedCollider> {
        let segment = end - start;
        let length = segment.length();
        if length < self.min_length.max(f32::EPSILON) {
            return None;
        }

        let center = (start + end) * 0.5;
        // Capsules are aligned along Y by default in Avian
        let rotation = Quat::from_rotation_arc(Vec3::Y, segment / length);
        let collider = if length < 2.0 * self.radius {
            Collider::sphere(self.radius)
        } else {
            Collider::capsule(self.radius, length - 2.0 * self.radius)
        };

        Some(PositionedCollider {
            transform: Transform::from_translation(center).with_rotation(rotation),
            collider,
            length,
        })
    }
}

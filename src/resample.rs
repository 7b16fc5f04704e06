//! Adaptive resampling of thread curves into dense polylines.

use bevy::prelude::*;
use rand::Rng;

use crate::thread::{CurveModel, Thread};

/// How densely a thread is resampled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Segments per span, or per unit of thread length when `adaptive`.
    pub segments: u32,
    pub adaptive: bool,
    /// Control point jitter, divided by the effective segment count.
    pub randomness: f32,
}

impl Resolution {
    pub fn fixed(segments: u32) -> Self {
        Self {
            segments,
            adaptive: false,
            randomness: 0.0,
        }
    }

    pub fn adaptive(segments: u32) -> Self {
        Self {
            segments,
            adaptive: true,
            randomness: 0.0,
        }
    }

    pub fn with_randomness(mut self, randomness: f32) -> Self {
        self.randomness = randomness.max(0.0);
        self
    }

    /// Effective number of segments each span of a thread is split into.
    pub fn segments_for(&self, thread_length: f32) -> u32 {
        let segments = if self.adaptive {
            (thread_length * self.segments as f32) as u32
        } else {
            self.segments
        };
        segments.max(1)
    }
}

/// Resamples every span of `thread` into curve points, appending the new
/// vertices to `verts` and returning the rewritten point sequence.
///
/// Original vertices are kept by index, so both endpoints are preserved
/// exactly.
pub fn resample_thread(
    verts: &mut Vec<Vec3>,
    thread: &Thread,
    model: &CurveModel,
    resolution: Resolution,
    rng: &mut impl Rng,
) -> Vec<usize> {
    let (Some(&first), Some(&last)) = (thread.points.first(), thread.points.last()) else {
        return thread.points.clone();
    };
    if thread.points.len() < 2 {
        return thread.points.clone();
    }

    let segments = resolution.segments_for(verts[first].distance(verts[last]));
    let jitter_scale = resolution.randomness / segments as f32;

    let mut points = Vec::with_capacity(thread.segment_count() * segments as usize + 1);
    points.push(first);
    for span in 0..thread.segment_count() {
        for j in 1..segments {
            let t = (j as f32 + rng.random::<f32>() * 0.5 - 0.25).max(0.0) / segments as f32;
            let jitter = if jitter_scale > 0.0 {
                random_offset(rng) * jitter_scale
            } else {
                Vec3::ZERO
            };
            let point = thread.point_on_curve(verts, model, span, t, jitter);
            points.push(verts.len());
            verts.push(point);
        }
        points.push(thread.points[span + 1]);
    }
    points
}

/// Uniform offset in the unit cube centered on the origin.
pub(crate) fn random_offset(rng: &mut impl Rng) -> Vec3 {
    Vec3::new(
        rng.random::<f32>() - 0.5,
        rng.random::<f32>() - 0.5,
        rng.random::<f32>() - 0.5,
    )
}

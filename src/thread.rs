//! Threads and the quadratic curve model they follow.
//!
//! A [`Thread`] is an ordered run of vertex indices into its web's vertex
//! array. Each pair of consecutive vertices spans a quadratic Bezier whose
//! control point depends on the thread kind and sags under gravity.

use bevy::prelude::*;

/// Downward unit vector of the gravity model.
pub const DOWN: Vec3 = Vec3::NEG_Z;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadKind {
    Frame,
    Support,
    Radial,
    Filling,
    Hub,
}

impl ThreadKind {
    pub const ALL: &'static [ThreadKind] = &[
        ThreadKind::Frame,
        ThreadKind::Support,
        ThreadKind::Radial,
        ThreadKind::Filling,
        ThreadKind::Hub,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ThreadKind::Frame => "frame",
            ThreadKind::Support => "support",
            ThreadKind::Radial => "radial",
            ThreadKind::Filling => "filling",
            ThreadKind::Hub => "hub",
        }
    }
}

/// One strand of a web.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    pub points: Vec<usize>,
    pub kind: ThreadKind,
}

impl Thread {
    pub fn new(points: Vec<usize>, kind: ThreadKind) -> Self {
        Self { points, kind }
    }

    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// A frame thread bridged over by a support keeps its two anchors only.
    pub fn is_bypassed_frame(&self) -> bool {
        self.kind == ThreadKind::Frame && self.points.len() == 2
    }

    pub fn to_vectors(&self, verts: &[Vec3]) -> Vec<Vec3> {
        self.points.iter().map(|&i| verts[i]).collect()
    }

    pub fn edges(&self) -> impl Iterator<Item = [usize; 2]> + '_ {
        self.points.windows(2).map(|w| [w[0], w[1]])
    }

    /// Point sequence with `index` inserted before the last point.
    pub fn inserted_before_last(&self, index: usize) -> Vec<usize> {
        let mut points = self.points.clone();
        let at = points.len().saturating_sub(1);
        points.insert(at, index);
        points
    }

    /// Point sequence with `index` inserted after the first point.
    pub fn inserted_after_first(&self, index: usize) -> Vec<usize> {
        let mut points = self.points.clone();
        points.insert(1.min(points.len()), index);
        points
    }

    /// Point on the curve spanning `segment`, at parameter `t`.
    ///
    /// `jitter` offsets the control point and is scaled by the segment length.
    pub fn point_on_curve(
        &self,
        verts: &[Vec3],
        model: &CurveModel,
        segment: usize,
        t: f32,
        jitter: Vec3,
    ) -> Vec3 {
        let a = verts[self.points[segment]];
        let c = verts[self.points[segment + 1]];
        model.evaluate(self.kind, a, c, t, jitter)
    }
}

/// Web-level state the curve of every thread depends on.
///
/// Passed explicitly to curve evaluation instead of threads pointing back at
/// their web.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveModel {
    /// Anchor centroid the frame and support curves bow towards.
    pub position: Vec3,
    pub gravity: f32,
}

impl CurveModel {
    pub fn new(position: Vec3, gravity: f32) -> Self {
        Self { position, gravity }
    }

    /// Control point of the curve from `a` to `c`, clamped above the ground.
    pub fn control_point(&self, kind: ThreadKind, a: Vec3, c: Vec3) -> Vec3 {
        let mid = (a + c) * 0.5;
        let len = a.distance(c);
        let mut b = match kind {
            ThreadKind::Frame => {
                mid + len * (self.position - mid) * 0.05 + 0.2 * len * self.gravity * DOWN
            }
            ThreadKind::Support => {
                mid + len * (self.position - mid) * 0.4 + 0.2 * len * self.gravity * DOWN
            }
            ThreadKind::Filling | ThreadKind::Hub => mid + 0.3 * len * self.gravity * DOWN,
            ThreadKind::Radial => {
                let slope = 0.5 + (a - c).normalize_or_zero().z * 0.5;
                mid + 0.3 * self.gravity * slope * DOWN
            }
        };
        b.z = b.z.max(0.0);
        b
    }

    /// Quadratic Bezier point at `t`.
    pub fn evaluate(&self, kind: ThreadKind, a: Vec3, c: Vec3, t: f32, jitter: Vec3) -> Vec3 {
        let b = self.control_point(kind, a, c) + jitter * a.distance(c);
        let s = 1.0 - t;
        let mut point = s * s * a + 2.0 * s * t * b + t * t * c;
        point.z = point.z.max(0.0);
        point
    }
}

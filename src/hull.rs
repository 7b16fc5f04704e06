//! Convex hull ordering of near-coplanar points.

use bevy::prelude::*;

use crate::plane::robust_rotation_arc;

/// Indices of the points lying on the 2D convex hull of `points` projected
/// along `normal`, in counter-clockwise order.
///
/// Duplicate projections and points on hull edges are dropped. When fewer
/// than three distinct points remain, or all of them are collinear, every
/// index is returned in input order.
pub fn convex_hull_indices(points: &[Vec3], normal: Vec3) -> Vec<usize> {
    let identity: Vec<usize> = (0..points.len()).collect();
    let projected = project_along(points, normal);

    let mut order = identity.clone();
    order.sort_by(|&a, &b| {
        projected[a]
            .x
            .total_cmp(&projected[b].x)
            .then(projected[a].y.total_cmp(&projected[b].y))
    });
    order.dedup_by(|a, b| projected[*a] == projected[*b]);
    if order.len() < 3 {
        return identity;
    }

    // Andrew's monotone chain: lower hull, then upper hull.
    let turn = |hull: &[usize], next: usize| {
        let o = projected[hull[hull.len() - 2]];
        let a = projected[hull[hull.len() - 1]];
        (a - o).perp_dot(projected[next] - o)
    };

    let mut hull: Vec<usize> = Vec::with_capacity(order.len() * 2);
    for &i in &order {
        while hull.len() >= 2 && turn(&hull, i) <= 0.0 {
            hull.pop();
        }
        hull.push(i);
    }
    let lower_len = hull.len() + 1;
    for &i in order.iter().rev().skip(1) {
        while hull.len() >= lower_len && turn(&hull, i) <= 0.0 {
            hull.pop();
        }
        hull.push(i);
    }
    hull.pop();

    if hull.len() < 3 {
        return identity;
    }
    hull
}

/// The hull points themselves, see [`convex_hull_indices`].
pub fn convex_hull_order(points: &[Vec3], normal: Vec3) -> Vec<Vec3> {
    convex_hull_indices(points, normal)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

/// Rotates `points` so `normal` maps onto +Z and drops the Z component.
pub(crate) fn project_along(points: &[Vec3], normal: Vec3) -> Vec<Vec2> {
    let rotation = robust_rotation_arc(normal.normalize_or(Vec3::Z), Vec3::Z);
    points.iter().map(|p| (rotation * *p).truncate()).collect()
}

//! Anchor selection: turns a loose cloud of candidate points into the ordered,
//! angularly spaced anchor loop a web is strung between.

use bevy::prelude::*;
use rand::Rng;
use rand::seq::{SliceRandom, index};

use crate::error::{Result, WebError};
use crate::hull::convex_hull_order;
use crate::plane::Plane;
use crate::settings::WebSettings;

/// Anchors chosen for one web and the plane they were fitted to.
#[derive(Debug, Clone)]
pub struct AnchorSelection {
    /// Hull-ordered anchors, at least three.
    pub anchors: Vec<Vec3>,
    /// Plane fitted to a random sample of the candidates.
    pub plane: Plane,
}

/// Selects anchors from `candidates`.
///
/// A plane is fitted to a random sample of the candidates, the candidates
/// close to that plane are hull-ordered, and the hull is thinned so that
/// consecutive anchors subtend at least `settings.min_anchor_angle` at the
/// hull centroid.
pub fn select_anchors(
    candidates: &[Vec3],
    settings: &WebSettings,
    rng: &mut impl Rng,
) -> Result<AnchorSelection> {
    if candidates.len() < 3 {
        return Err(WebError::InsufficientAnchors {
            found: candidates.len(),
        });
    }

    let sample_size = settings.plane_sample_size.clamp(3, candidates.len());
    let sample: Vec<Vec3> = index::sample(rng, candidates.len(), sample_size)
        .into_iter()
        .map(|i| candidates[i])
        .collect();
    let plane = Plane::fit(&sample)?;

    let mut shuffled = candidates.to_vec();
    shuffled.shuffle(rng);
    let near: Vec<Vec3> = shuffled
        .into_iter()
        .filter(|p| plane.signed_distance(*p).abs() < settings.plane_tolerance)
        .collect();
    if near.len() < 3 {
        return Err(WebError::InsufficientAnchors { found: near.len() });
    }

    let hull = convex_hull_order(&near, plane.normal);
    let anchors = thin_by_angle(&hull, settings.min_anchor_angle);
    if anchors.len() < 3 {
        return Err(WebError::InsufficientAnchors {
            found: anchors.len(),
        });
    }

    debug!(
        "selected {} anchors from {} candidates ({} near plane)",
        anchors.len(),
        candidates.len(),
        near.len()
    );
    Ok(AnchorSelection { anchors, plane })
}

/// Greedy walk along `ordered` keeping a point only when the angle it makes
/// with the last kept point, seen from the centroid, reaches `min_angle`.
pub fn thin_by_angle(ordered: &[Vec3], min_angle: f32) -> Vec<Vec3> {
    let Some(&first) = ordered.first() else {
        return Vec::new();
    };
    let center = ordered.iter().copied().sum::<Vec3>() / ordered.len() as f32;

    let mut kept = vec![first];
    for &point in &ordered[1..] {
        let last = kept[kept.len() - 1];
        let angle = (center - last).angle_between(center - point);
        if angle >= min_angle {
            kept.push(point);
        }
    }
    kept
}

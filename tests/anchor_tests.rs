use std::f32::consts::{PI, TAU};

use bevy::prelude::*;
use bevy_spiderweb::anchors::{select_anchors, thin_by_angle};
use bevy_spiderweb::{WebError, WebSettings, webs::web_rng};

// A noisy ring standing upright in the XZ plane.
fn upright_ring(count: usize, radius: f32) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let a = i as f32 / count as f32 * TAU;
            let wobble = (i as f32 * 1.7).sin() * 0.05;
            Vec3::new(a.cos() * radius, wobble, 3.0 + a.sin() * radius)
        })
        .collect()
}

#[test]
fn test_anchors_are_spaced_candidates() {
    let candidates = upright_ring(40, 2.0);
    let settings = WebSettings::default();
    let selection = select_anchors(&candidates, &settings, &mut web_rng(3, 0))
        .expect("ring should yield anchors");

    assert!(selection.anchors.len() >= 3);
    for anchor in &selection.anchors {
        assert!(
            candidates.contains(anchor),
            "anchor {:?} is not an input point",
            anchor
        );
    }

    let center = selection.anchors.iter().copied().sum::<Vec3>() / selection.anchors.len() as f32;
    for pair in selection.anchors.windows(2) {
        let angle = (center - pair[0]).angle_between(center - pair[1]);
        assert!(angle >= settings.min_anchor_angle - 1e-4, "angle {} too small", angle);
    }

    assert!(selection.plane.normal.y.abs() > 0.99, "ring normal is Y, got {:?}", selection.plane.normal);
}

#[test]
fn test_too_few_candidates() {
    let candidates = vec![Vec3::ZERO, Vec3::X];
    let result = select_anchors(&candidates, &WebSettings::default(), &mut web_rng(0, 0));
    assert_eq!(result.unwrap_err(), WebError::InsufficientAnchors { found: 2 });

    let result = select_anchors(&[], &WebSettings::default(), &mut web_rng(0, 0));
    assert_eq!(result.unwrap_err(), WebError::InsufficientAnchors { found: 0 });
}

#[test]
fn test_coarse_angle_leaves_too_few_anchors() {
    let candidates = upright_ring(12, 2.0);
    let settings = WebSettings::default().with_min_anchor_angle(PI * 0.9);
    let result = select_anchors(&candidates, &settings, &mut web_rng(1, 0));
    assert!(matches!(result, Err(WebError::InsufficientAnchors { .. })));
}

#[test]
fn test_thin_by_angle_keeps_first_point() {
    let square = vec![
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::new(0.0, -1.0, 0.0),
    ];
    assert_eq!(thin_by_angle(&square, PI / 4.0), square);

    // Right angles never reach a 100 degree threshold, but opposite corners do.
    let thinned = thin_by_angle(&square, 100f32.to_radians());
    assert_eq!(thinned, vec![square[0], square[2]]);

    assert!(thin_by_angle(&[], 0.1).is_empty());
}

#![cfg(feature = "physics")]

use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy_spiderweb::{ThreadColliderGenerator, Webs, WebsSettings};

fn sample_webs() -> Webs {
    let points: Vec<Vec3> = (0..12)
        .map(|i| {
            let a = i as f32 / 12.0 * TAU;
            Vec3::new(a.cos() * 2.0, a.sin() * 2.0, 3.0)
        })
        .collect();
    Webs::generate(&points, &WebsSettings::new().with_seed(2)).expect("generate")
}

#[test]
fn test_one_collider_per_segment() {
    let webs = sample_webs();
    let generator = ThreadColliderGenerator::new().with_min_length(0.0);
    let parts = generator.build_parts(&webs);

    let segments: Vec<(Vec3, Vec3)> = webs
        .polylines()
        .iter()
        .flat_map(|p| p.windows(2).map(|w| (w[0], w[1])).collect::<Vec<_>>())
        .filter(|(a, b)| a.distance(*b) >= f32::EPSILON)
        .collect();
    assert_eq!(parts.len(), segments.len());

    for (part, (a, b)) in parts.iter().zip(&segments) {
        assert!((part.length - a.distance(*b)).abs() < 1e-5);
        let center = (*a + *b) * 0.5;
        assert!(part.transform.translation.abs_diff_eq(center, 1e-5));
        let axis = part.transform.rotation * Vec3::Y;
        assert!(axis.dot((*b - *a).normalize()) > 0.999, "capsule not aligned with its segment");
    }
}

#[test]
fn test_min_length_filters_segments() {
    let webs = sample_webs();
    let all = ThreadColliderGenerator::new().with_min_length(0.0).build_parts(&webs);
    let long = ThreadColliderGenerator::new().with_min_length(0.2).build_parts(&webs);

    assert!(long.len() <= all.len());
    assert!(long.iter().all(|p| p.length >= 0.2));
}

#[test]
fn test_compound_collider() {
    let webs = sample_webs();
    assert!(ThreadColliderGenerator::new().build(&webs).is_some());

    let empty = Webs::generate(&[Vec3::ZERO, Vec3::X], &WebsSettings::default()).expect("generate");
    assert!(ThreadColliderGenerator::new().build(&empty).is_none());
    assert!(ThreadColliderGenerator::new().build_parts(&empty).is_empty());
}

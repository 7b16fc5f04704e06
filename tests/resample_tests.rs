use bevy::prelude::*;
use bevy_spiderweb::resample::{Resolution, resample_thread};
use bevy_spiderweb::thread::{CurveModel, Thread, ThreadKind};
use bevy_spiderweb::webs::web_rng;

fn two_point_thread(length: f32) -> (Vec<Vec3>, Thread) {
    let verts = vec![Vec3::new(0.0, 0.0, 4.0), Vec3::new(length, 0.0, 4.0)];
    (verts, Thread::new(vec![0, 1], ThreadKind::Filling))
}

#[test]
fn test_segments_for() {
    assert_eq!(Resolution::fixed(5).segments_for(100.0), 5);
    assert_eq!(Resolution::adaptive(3).segments_for(2.0), 6);
    assert_eq!(Resolution::adaptive(3).segments_for(0.01), 1);
    assert_eq!(Resolution::fixed(0).segments_for(1.0), 1);
}

#[test]
fn test_adaptive_resampling_point_count() {
    let (mut verts, thread) = two_point_thread(2.0);
    let model = CurveModel::new(Vec3::ZERO, 1.0);
    let points = resample_thread(
        &mut verts,
        &thread,
        &model,
        Resolution::adaptive(3),
        &mut web_rng(0, 0),
    );

    assert_eq!(points.len(), 7);
    assert_eq!(verts.len(), 7, "five new vertices expected");
    assert_eq!(points.first(), Some(&0));
    assert_eq!(points.last(), Some(&1));
}

#[test]
fn test_endpoints_are_preserved() {
    let verts_before = vec![
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(1.0, 1.0, 2.0),
        Vec3::new(3.0, 0.0, 1.5),
    ];
    let thread = Thread::new(vec![0, 1, 2], ThreadKind::Hub);
    let model = CurveModel::new(Vec3::ONE, 0.5);

    let mut verts = verts_before.clone();
    let points = resample_thread(
        &mut verts,
        &thread,
        &model,
        Resolution::fixed(4).with_randomness(0.3),
        &mut web_rng(9, 2),
    );

    // Two spans of four segments each, sharing the middle vertex.
    assert_eq!(points.len(), 9);
    assert_eq!(points[0], 0);
    assert_eq!(points[4], 1);
    assert_eq!(points[8], 2);
    assert_eq!(&verts[..3], &verts_before[..]);
    for &p in &points {
        assert!(verts[p].is_finite());
        assert!(verts[p].z >= 0.0);
    }
}

#[test]
fn test_short_threads_are_untouched() {
    let mut verts = vec![Vec3::ONE];
    let model = CurveModel::new(Vec3::ZERO, 1.0);
    let single = Thread::new(vec![0], ThreadKind::Radial);
    let points = resample_thread(&mut verts, &single, &model, Resolution::fixed(5), &mut web_rng(0, 0));
    assert_eq!(points, vec![0]);
    assert_eq!(verts.len(), 1);
}

#[test]
fn test_resampled_points_follow_the_curve() {
    let (mut verts, thread) = two_point_thread(2.0);
    let model = CurveModel::new(Vec3::ZERO, 1.0);
    let points = resample_thread(&mut verts, &thread, &model, Resolution::fixed(8), &mut web_rng(1, 0));

    // Without jitter every inner point lies in the y = 0 plane and sags.
    for &p in &points[1..points.len() - 1] {
        assert!(verts[p].y.abs() < 1e-6);
        assert!(verts[p].z < 4.0);
        assert!(verts[p].x > 0.0 && verts[p].x < 2.0);
    }
}

use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy_spiderweb::webs::web_rng;
use bevy_spiderweb::{ThreadKind, Web, WebError, WebSettings};

fn flat_ring(count: usize, radius: f32, height: f32) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let a = i as f32 / count as f32 * TAU;
            Vec3::new(a.cos() * radius, a.sin() * radius, height)
        })
        .collect()
}

fn octagon_web(seed: u64) -> Web {
    Web::from_anchors(
        flat_ring(8, 3.0, 4.0),
        Vec3::Z,
        &WebSettings::default(),
        &mut web_rng(seed, 0),
    )
    .expect("octagon should yield a web")
}

#[test]
fn test_every_thread_kind_is_present() {
    let web = octagon_web(1);
    for &kind in ThreadKind::ALL {
        assert!(
            web.threads_of(kind).count() > 0,
            "no {} threads",
            kind.name()
        );
    }
    assert_eq!(web.threads_of(ThreadKind::Frame).count(), 8);
    assert_eq!(web.threads_of(ThreadKind::Support).count(), 8);
}

#[test]
fn test_thread_indices_are_valid() {
    let web = octagon_web(2);
    let count = web.verts().len();
    for thread in web.threads() {
        assert!(!thread.points.is_empty());
        assert!(
            thread.points.iter().all(|&p| p < count),
            "{} thread indexes past the vertex array",
            thread.kind.name()
        );
    }
    assert!(web.verts().iter().all(|v| v.is_finite()));
}

#[test]
fn test_supports_are_two_point_struts() {
    let web = octagon_web(3);
    for support in web.threads_of(ThreadKind::Support) {
        assert_eq!(support.points.len(), 2);
    }
}

#[test]
fn test_frame_threads_form_a_loop() {
    let web = octagon_web(4);
    let mut pairs: Vec<[usize; 2]> = web
        .threads_of(ThreadKind::Frame)
        .map(|t| {
            let (a, b) = (t.points[0], t.points[t.points.len() - 1]);
            [a.min(b), a.max(b)]
        })
        .collect();
    pairs.sort_unstable();

    let mut expected: Vec<[usize; 2]> = (0..8)
        .map(|i| {
            let j = (i + 1) % 8;
            [i.min(j), i.max(j)]
        })
        .collect();
    expected.sort_unstable();
    assert_eq!(pairs, expected);

    // Anchors are the first vertices of the web.
    assert_eq!(&web.verts()[..8], web.anchors());
}

#[test]
fn test_edges_and_polylines_cover_visible_threads() {
    let web = octagon_web(5);
    let visible: Vec<_> = web.threads().iter().filter(|t| !t.is_bypassed_frame()).collect();
    let segments: usize = visible.iter().map(|t| t.segment_count()).sum();

    let edges = web.edges(0);
    assert_eq!(edges.len(), segments);
    assert_eq!(web.edge_segments().len(), segments);

    let shifted = web.edges(5);
    for (a, b) in edges.iter().zip(&shifted) {
        assert_eq!([a[0] + 5, a[1] + 5], *b);
    }

    assert_eq!(
        web.polylines().len(),
        visible.iter().filter(|t| t.points.len() >= 2).count()
    );
}

#[test]
fn test_hub_cluster_contains_center() {
    let web = octagon_web(6);
    assert!(web.hub_indices().contains(&web.center_index()));
    for thread in web.threads_of(ThreadKind::Hub) {
        assert_eq!(thread.points.len(), 6, "hub threads are resampled into five segments");
    }

    let expected_hub = Vec3::new(0.0, 0.0, 4.0 - 0.6);
    assert!(web.hub_center().abs_diff_eq(expected_hub, 1e-5), "hub at {:?}", web.hub_center());
}

#[test]
fn test_radials_start_at_the_hub() {
    let web = octagon_web(7);
    let hub = web.hub_indices();
    for radial in web.threads_of(ThreadKind::Radial) {
        let first = radial.points[0];
        assert!(hub.contains(&first), "radial does not start in the hub cluster");
    }
}

#[test]
fn test_single_anchor_is_rejected() {
    let result = Web::from_anchors(
        vec![Vec3::ONE],
        Vec3::Z,
        &WebSettings::default(),
        &mut web_rng(0, 0),
    );
    assert_eq!(
        result.unwrap_err(),
        WebError::InsufficientTopology {
            stage: "frame",
            found: 1
        }
    );
}

#[test]
fn test_heavy_low_web_stays_above_ground() {
    let settings = WebSettings::default().with_gravity(3.0);
    let web = Web::from_anchors(flat_ring(6, 2.0, 0.3), Vec3::Z, &settings, &mut web_rng(8, 0))
        .expect("low ring should yield a web");

    assert_eq!(web.hub_center().z, 0.0);
    for v in web.verts() {
        assert!(v.z >= 0.0, "vertex {:?} below ground", v);
    }
}

#[test]
fn test_short_frame_thread_is_bypassed() {
    let anchors = vec![
        Vec3::new(3.0, 0.0, 2.0),
        Vec3::new(0.0, 3.0, 2.0),
        Vec3::new(-3.0, 0.0, 2.0),
        Vec3::new(-2.8, -0.5, 2.0),
        Vec3::new(0.0, -3.0, 2.0),
    ];
    let web = Web::from_anchors(anchors, Vec3::Z, &WebSettings::default(), &mut web_rng(9, 0))
        .expect("pentagon should yield a web");

    let kinds: Vec<ThreadKind> = web.threads()[..9].iter().map(|t| t.kind).collect();
    use ThreadKind::{Frame, Support};
    assert_eq!(
        kinds,
        vec![Frame, Support, Frame, Frame, Support, Frame, Support, Frame, Support]
    );

    let bypassed: Vec<_> = web.threads().iter().filter(|t| t.is_bypassed_frame()).collect();
    assert_eq!(bypassed.len(), 1);
    let ends = [bypassed[0].points[0], bypassed[0].points[1]];
    assert!(ends.contains(&2) && ends.contains(&3));
    assert_eq!(web.threads_of(ThreadKind::Support).count(), 4);
}

#[test]
fn test_bypass_does_not_depend_on_loop_start() {
    let pentagon = vec![
        Vec3::new(3.0, 0.0, 2.0),
        Vec3::new(0.0, 3.0, 2.0),
        Vec3::new(-3.0, 0.0, 2.0),
        Vec3::new(-2.8, -0.5, 2.0),
        Vec3::new(0.0, -3.0, 2.0),
    ];

    for start in 0..pentagon.len() {
        let mut anchors = pentagon.clone();
        anchors.rotate_left(start);
        let web = Web::from_anchors(anchors, Vec3::Z, &WebSettings::default(), &mut web_rng(9, 0))
            .expect("pentagon should yield a web");

        let bypassed: Vec<_> = web.threads().iter().filter(|t| t.is_bypassed_frame()).collect();
        assert_eq!(bypassed.len(), 1, "loop starting at anchor {}", start);
        assert_eq!(web.threads_of(ThreadKind::Support).count(), 4, "loop starting at anchor {}", start);
        assert_eq!(web.threads_of(ThreadKind::Frame).count(), 5);

        // The short side runs between the anchors that started at 2 and 3.
        let short = [(2 + 5 - start) % 5, (3 + 5 - start) % 5];
        let ends = [bypassed[0].points[0], bypassed[0].points[1]];
        assert!(
            ends.contains(&short[0]) && ends.contains(&short[1]),
            "loop starting at anchor {} bridged {:?}",
            start,
            ends
        );
    }
}

#[test]
fn test_same_rng_gives_same_web() {
    let a = octagon_web(11);
    let b = octagon_web(11);
    assert_eq!(a.verts(), b.verts());
    assert_eq!(a.threads(), b.threads());
}

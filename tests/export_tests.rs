use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy_spiderweb::export::{polylines_to_obj, webs_to_obj};
use bevy_spiderweb::{Webs, WebsSettings};

fn sample_webs() -> Webs {
    let points: Vec<Vec3> = (0..10)
        .map(|i| {
            let a = i as f32 / 10.0 * TAU;
            Vec3::new(a.cos() * 2.0, 1.0, 3.0 + a.sin() * 2.0)
        })
        .collect();
    Webs::generate(&points, &WebsSettings::new().with_seed(4)).expect("generate")
}

#[test]
fn test_obj_lines() {
    let webs = sample_webs();
    let obj = webs_to_obj(&webs, "web");
    let lines: Vec<&str> = obj.lines().collect();

    assert_eq!(lines[0], "o web");
    let vertices = lines.iter().filter(|l| l.starts_with("v ")).count();
    let edges: Vec<&&str> = lines.iter().filter(|l| l.starts_with("l ")).collect();
    assert_eq!(vertices, webs.verts().len());
    assert_eq!(edges.len(), webs.edges().len());

    // Indices are 1-based and in range.
    for line in edges {
        for index in line.split_whitespace().skip(1) {
            let index: usize = index.parse().expect("numeric index");
            assert!(index >= 1 && index <= vertices);
        }
    }
}

#[test]
fn test_obj_vertex_values() {
    let webs = sample_webs();
    let obj = webs_to_obj(&webs, "web");
    let first = obj.lines().nth(1).expect("vertex line");
    let coords: Vec<f32> = first
        .split_whitespace()
        .skip(1)
        .map(|c| c.parse().expect("float"))
        .collect();
    assert_eq!(coords, webs.verts()[0].to_array().to_vec());
}

#[test]
fn test_polyline_objects() {
    let webs = sample_webs();
    let polylines = webs.polylines();
    let obj = polylines_to_obj(&webs, "thread");

    let objects = obj.lines().filter(|l| l.starts_with("o ")).count();
    assert_eq!(objects, polylines.len());
    assert!(obj.starts_with("o thread_0\n"));

    let elements: Vec<&str> = obj.lines().filter(|l| l.starts_with('l')).collect();
    assert_eq!(elements.len(), polylines.len());
    for (element, polyline) in elements.iter().zip(&polylines) {
        assert_eq!(element.split_whitespace().count() - 1, polyline.len());
    }

    // The last element ends on the last vertex.
    let total: usize = polylines.iter().map(|p| p.len()).sum();
    let last = elements.last().expect("at least one polyline");
    assert!(last.ends_with(&format!(" {}", total)));
}

#[test]
fn test_empty_batch_exports_header_only() {
    let webs = Webs::generate(&[Vec3::ZERO, Vec3::X], &WebsSettings::default()).expect("generate");
    assert_eq!(webs_to_obj(&webs, "nothing"), "o nothing\n");
    assert!(polylines_to_obj(&webs, "nothing").is_empty());
}

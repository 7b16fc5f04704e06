//! Batch generation of several webs sharing one pool of anchor candidates.
//!
//! Each finished web lends a few of its vertices to the candidate pool, so
//! later webs tend to hang off earlier ones. Webs are merged into one vertex
//! and edge array, and webs lying in nearly the same plane are grouped into
//! shared texture tiles.

use bevy::prelude::*;
use rand::SeedableRng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;

use crate::clock::Clock;
use crate::error::{Result, WebError};
use crate::settings::WebsSettings;
use crate::web::Web;

/// Deterministic generator for web number `index` of a batch seeded with `seed`.
pub fn web_rng(seed: u64, index: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(index as u64);
    rng
}

/// A generated batch of webs.
#[derive(Debug, Clone)]
pub struct Webs {
    webs: Vec<Web>,
    verts: Vec<Vec3>,
    edges: Vec<[u32; 2]>,
    tiles: Vec<usize>,
    tile_count: usize,
    failures: Vec<(usize, WebError)>,
}

impl Webs {
    /// Generates `settings.count` webs anchored on `points`.
    ///
    /// Fails only when `points` is empty. A web that cannot be built is
    /// skipped and reported through [`Webs::failures`].
    pub fn generate(points: &[Vec3], settings: &WebsSettings) -> Result<Self> {
        if points.is_empty() {
            return Err(WebError::InsufficientAnchors { found: 0 });
        }

        let mut clock = Clock::new();
        clock.begin("generating_webs");

        let mut candidates = points.to_vec();
        let mut webs = Vec::with_capacity(settings.count);
        let mut failures = Vec::new();
        let mut verts = Vec::new();
        let mut edges = Vec::new();

        for i in 0..settings.count {
            let mut rng = web_rng(settings.seed, i);
            let web = match Web::build(&candidates, &settings.web, &mut rng) {
                Ok(web) => web,
                Err(err) => {
                    warn!("web {} skipped: {}", i, err);
                    failures.push((i, err));
                    continue;
                }
            };

            let borrowed = settings.reseed_samples.min(web.verts().len());
            candidates.extend(
                index::sample(&mut rng, web.verts().len(), borrowed)
                    .into_iter()
                    .map(|v| web.verts()[v]),
            );

            edges.extend(web.edges(verts.len()));
            verts.extend_from_slice(web.verts());
            webs.push(web);
        }

        let (tiles, tile_count) = group_tiles(&webs, settings.tile_max_angle, settings.tile_max_distance);
        clock.end("generating_webs");

        info!(
            "generated {} webs ({} skipped): {} vertices, {} edges, {} tiles",
            webs.len(),
            failures.len(),
            verts.len(),
            edges.len(),
            tile_count
        );

        Ok(Self {
            webs,
            verts,
            edges,
            tiles,
            tile_count,
            failures,
        })
    }

    pub fn webs(&self) -> &[Web] {
        &self.webs
    }

    /// Vertices of every web, concatenated in web order.
    pub fn verts(&self) -> &[Vec3] {
        &self.verts
    }

    /// Edges into [`Webs::verts`].
    pub fn edges(&self) -> &[[u32; 2]] {
        &self.edges
    }

    /// Thread polylines of every web.
    pub fn polylines(&self) -> Vec<Vec<Vec3>> {
        self.webs.iter().flat_map(|w| w.polylines()).collect()
    }

    /// Texture tile of each web, parallel to [`Webs::webs`].
    pub fn tiles(&self) -> &[usize] {
        &self.tiles
    }

    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    /// Index and error of every web that could not be built.
    pub fn failures(&self) -> &[(usize, WebError)] {
        &self.failures
    }

    pub fn is_empty(&self) -> bool {
        self.webs.is_empty()
    }
}

/// Assigns each web to the first earlier tile whose plane is within
/// `max_angle` and whose center is within `max_distance`, or opens a new tile.
///
/// Normals are compared without regard to sign, since fitted normals have
/// arbitrary orientation.
pub fn group_tiles(webs: &[Web], max_angle: f32, max_distance: f32) -> (Vec<usize>, usize) {
    let mut leaders: Vec<(Vec3, Vec3)> = Vec::new();
    let mut tiles = Vec::with_capacity(webs.len());

    for web in webs {
        let plane = web.plane();
        let found = leaders.iter().position(|(normal, center)| {
            let angle = normal.dot(plane.normal).abs().min(1.0).acos();
            angle < max_angle && center.distance(plane.center) < max_distance
        });
        let tile = found.unwrap_or_else(|| {
            leaders.push((plane.normal, plane.center));
            leaders.len() - 1
        });
        tiles.push(tile);
    }
    (tiles, leaders.len())
}

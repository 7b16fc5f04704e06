//! Generation parameters.
//!
//! [`WebSettings`] controls the construction of a single web, while
//! [`WebsSettings`] drives a whole batch (web count, seed, texture size and
//! tile grouping). Both can be edited field-by-field or through the `with_*`
//! setters, which clamp values into their valid range.

use std::f32::consts::PI;

use bevy::prelude::*;

/// Per-web construction parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct WebSettings {
    /// Strength of the static gravity sag applied to every thread.
    pub gravity: f32,
    /// Jitter applied to radial spacing.
    pub randomness: f32,
    /// Minimum angle (at the anchor centroid) between consecutive anchors.
    pub min_anchor_angle: f32,
    /// Maximum distance between a candidate and the fitted plane.
    pub plane_tolerance: f32,
    /// Number of random candidates used for the plane fit.
    pub plane_sample_size: usize,
    /// Curve parameter at which support threads attach to the frame.
    pub reach_coef: f32,
    /// Frame threads shorter than this are bridged by a single support.
    pub min_distance: f32,
    /// Maximum angular sweep between two radial threads.
    pub thread_angle: f32,
    /// Segments per unit length for radial threads.
    pub radial_resolution: u32,
    /// Jitter applied while resampling radial threads.
    pub radial_jitter: f32,
    /// Probability of linking a radial point to the next radial.
    pub fill_probability: f32,
    /// Beyond this distance from the hub the fill probability drops tenfold.
    pub fill_distance: f32,
    /// Segments per filling and hub thread.
    pub fill_resolution: u32,
    /// Number of nearest-neighbour passes stitching the hub.
    pub hub_passes: u32,
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            randomness: 0.2,
            min_anchor_angle: PI / 16.0,
            plane_tolerance: 0.6,
            plane_sample_size: 20,
            reach_coef: 0.3,
            min_distance: 1.0,
            thread_angle: PI / 10.0,
            radial_resolution: 30,
            radial_jitter: 0.5,
            fill_probability: 0.95,
            fill_distance: 1.0,
            fill_resolution: 5,
            hub_passes: 5,
        }
    }
}

impl WebSettings {
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity.max(0.0);
        self
    }

    pub fn with_randomness(mut self, randomness: f32) -> Self {
        self.randomness = randomness.clamp(0.0, 1.0);
        self
    }

    pub fn with_min_anchor_angle(mut self, angle: f32) -> Self {
        self.min_anchor_angle = angle.clamp(0.0, PI);
        self
    }

    pub fn with_thread_angle(mut self, angle: f32) -> Self {
        self.thread_angle = angle.clamp(0.01, PI);
        self
    }

    pub fn with_radial_resolution(mut self, resolution: u32) -> Self {
        self.radial_resolution = resolution.max(1);
        self
    }

    pub fn with_fill_resolution(mut self, resolution: u32) -> Self {
        self.fill_resolution = resolution.max(1);
        self
    }
}

/// Batch parameters for [`Webs`](crate::webs::Webs) generation.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct WebsSettings {
    /// Number of webs to build.
    pub count: usize,
    /// Seed of the generator every web derives its own stream from.
    pub seed: u64,
    /// Vertices of each finished web that join the anchor candidate pool.
    pub reseed_samples: usize,
    /// Side of one atlas tile in pixels.
    pub texture_size: u32,
    /// Webs whose planes differ by less than this angle may share a tile.
    pub tile_max_angle: f32,
    /// Webs whose centers are closer than this may share a tile.
    pub tile_max_distance: f32,
    pub web: WebSettings,
}

impl Default for WebsSettings {
    fn default() -> Self {
        Self {
            count: 1,
            seed: 0,
            reseed_samples: 10,
            texture_size: 1024,
            tile_max_angle: PI / 12.0,
            tile_max_distance: 1.5,
            web: WebSettings::default(),
        }
    }
}

impl WebsSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_texture_size(mut self, size: u32) -> Self {
        self.texture_size = size.max(1);
        self
    }

    pub fn with_web(mut self, web: WebSettings) -> Self {
        self.web = web;
        self
    }
}

//! Topology and geometry of a single web.
//!
//! A web is strung in layers, each consuming the previous one:
//!
//! 1. **Frame**: a closed loop of threads through the anchors.
//! 2. **Support**: short struts across every frame corner.
//! 3. **Radial**: spokes from a sagging hub out to the frame and supports.
//! 4. **Filling + Hub**: links between neighbouring spokes, and a stitched
//!    cluster of threads around the hub.

use bevy::prelude::*;
use rand::Rng;

use crate::anchors::select_anchors;
use crate::error::{Result, WebError};
use crate::plane::Plane;
use crate::resample::{Resolution, resample_thread};
use crate::settings::WebSettings;
use crate::thread::{CurveModel, DOWN, Thread, ThreadKind};

/// Radial spacing below this (as a fraction of the span) is not subdivided.
const MIN_RADIAL_INCREMENT: f32 = 0.01;
const HUB_DROP: f32 = 0.6;

#[derive(Debug, Clone)]
pub struct Web {
    verts: Vec<Vec3>,
    threads: Vec<Thread>,
    anchors: Vec<Vec3>,
    plane: Plane,
    hub_center: Vec3,
    center_index: usize,
    hub_indices: Vec<usize>,
    gravity: f32,
}

// Position of a thread in the frame/support ordering.
#[derive(Clone, Copy)]
enum Slot {
    Frame(usize),
    Support(usize),
}

impl Web {
    /// Selects anchors from `candidates` and builds a web on them.
    pub fn build(candidates: &[Vec3], settings: &WebSettings, rng: &mut impl Rng) -> Result<Self> {
        let selection = select_anchors(candidates, settings, rng)?;
        Self::from_anchors(selection.anchors, selection.plane.normal, settings, rng)
    }

    /// Builds a web on already ordered `anchors` lying in a plane with `normal`.
    pub fn from_anchors(
        anchors: Vec<Vec3>,
        normal: Vec3,
        settings: &WebSettings,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        if anchors.len() < 2 {
            return Err(WebError::InsufficientTopology {
                stage: "frame",
                found: anchors.len(),
            });
        }

        let position = anchors.iter().copied().sum::<Vec3>() / anchors.len() as f32;
        let mut web = Self {
            verts: Vec::new(),
            threads: Vec::new(),
            anchors,
            plane: Plane::new(position, normal),
            hub_center: position,
            center_index: 0,
            hub_indices: Vec::new(),
            gravity: settings.gravity,
        };

        web.add_frame_threads();
        web.add_support_threads(settings.reach_coef, settings.min_distance)?;
        web.add_radial_threads(settings.thread_angle, settings.randomness, rng)?;
        web.add_filling_threads(settings, rng)?;

        debug!(
            "web built: {} anchors, {} threads, {} vertices",
            web.anchors.len(),
            web.threads.len(),
            web.verts.len()
        );
        Ok(web)
    }

    pub fn verts(&self) -> &[Vec3] {
        &self.verts
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn threads_of(&self, kind: ThreadKind) -> impl Iterator<Item = &Thread> {
        self.threads.iter().filter(move |t| t.kind == kind)
    }

    /// Hull-ordered anchors; they are also the first vertices of the web.
    pub fn anchors(&self) -> &[Vec3] {
        &self.anchors
    }

    /// Plane through the anchor centroid with the fitted normal.
    pub fn plane(&self) -> Plane {
        self.plane
    }

    /// Where the radial threads converge, before hub jitter.
    pub fn hub_center(&self) -> Vec3 {
        self.hub_center
    }

    pub fn center_index(&self) -> usize {
        self.center_index
    }

    /// Vertices of the hub cluster.
    pub fn hub_indices(&self) -> &[usize] {
        &self.hub_indices
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn curve_model(&self) -> CurveModel {
        CurveModel::new(self.plane.center, self.gravity)
    }

    /// Edge index pairs shifted by `offset`, skipping bypassed frame threads.
    pub fn edges(&self, offset: usize) -> Vec<[u32; 2]> {
        self.visible_threads()
            .flat_map(|t| t.edges())
            .map(|[a, b]| [(a + offset) as u32, (b + offset) as u32])
            .collect()
    }

    /// One polyline per visible thread.
    pub fn polylines(&self) -> Vec<Vec<Vec3>> {
        self.visible_threads()
            .filter(|t| t.points.len() >= 2)
            .map(|t| t.to_vectors(&self.verts))
            .collect()
    }

    /// Edges as point pairs.
    pub fn edge_segments(&self) -> Vec<(Vec3, Vec3)> {
        self.visible_threads()
            .flat_map(|t| t.edges())
            .map(|[a, b]| (self.verts[a], self.verts[b]))
            .collect()
    }

    fn visible_threads(&self) -> impl Iterator<Item = &Thread> {
        self.threads.iter().filter(|t| !t.is_bypassed_frame())
    }

    fn add_frame_threads(&mut self) {
        let n = self.verts.len();
        let count = self.anchors.len();
        self.verts.extend_from_slice(&self.anchors);
        for i in 0..count {
            self.threads.push(Thread::new(
                vec![n + i, n + (i + 1) % count],
                ThreadKind::Frame,
            ));
        }
    }

    /// Adds one support across every frame corner. A frame thread shorter
    /// than `min_distance` is bridged: the support jumps from the thread
    /// before it to the thread after it, and the short thread keeps only its
    /// two anchors.
    fn add_support_threads(&mut self, reach_coef: f32, min_distance: f32) -> Result<()> {
        let mut frames = std::mem::take(&mut self.threads);
        let count = frames.len();
        if count < 2 {
            return Err(WebError::InsufficientTopology {
                stage: "support",
                found: count,
            });
        }

        // Only frames after the first can be bridged, so start the loop on a
        // long frame.
        let start = (0..count)
            .find(|&f| self.span(&frames[f]) >= min_distance)
            .unwrap_or(0);
        frames.rotate_left(start);

        let model = self.curve_model();
        let mut supports = Vec::with_capacity(count);
        let mut order = Vec::with_capacity(count * 2);
        let mut i = 0;
        while i < count {
            let a = i;
            let mut b = (i + 1) % count;
            order.push(Slot::Frame(a));

            if i + 1 < count && count > 2 && self.span(&frames[b]) < min_distance {
                order.push(Slot::Frame(b));
                b = (b + 1) % count;
                i += 1;
            }

            let last_segment = frames[a].segment_count() - 1;
            let point_a =
                frames[a].point_on_curve(&self.verts, &model, last_segment, 1.0 - reach_coef, Vec3::ZERO);
            let point_b = frames[b].point_on_curve(&self.verts, &model, 0, reach_coef, Vec3::ZERO);

            let n = self.verts.len();
            self.verts.push(point_a);
            self.verts.push(point_b);
            frames[a].points = frames[a].inserted_before_last(n);
            frames[b].points = frames[b].inserted_after_first(n + 1);

            order.push(Slot::Support(supports.len()));
            supports.push(Thread::new(vec![n, n + 1], ThreadKind::Support));
            i += 1;
        }

        self.threads = order
            .into_iter()
            .map(|slot| match slot {
                Slot::Frame(f) => frames[f].clone(),
                Slot::Support(s) => supports[s].clone(),
            })
            .collect();

        debug!("support layer: {} supports", supports.len());
        Ok(())
    }

    /// Drops the hub below the anchor centroid and sweeps around the web,
    /// inserting spokes wherever a support (or a supported frame span) covers
    /// more than `thread_angle` from the last spoke.
    fn add_radial_threads(
        &mut self,
        thread_angle: f32,
        randomness: f32,
        rng: &mut impl Rng,
    ) -> Result<()> {
        if self.threads.len() < 2 {
            return Err(WebError::InsufficientTopology {
                stage: "radial",
                found: self.threads.len(),
            });
        }

        let position = self.plane.center;
        let mut hub = position + DOWN * HUB_DROP * self.gravity;
        hub.z = hub.z.max(0.0);
        self.hub_center = hub;
        self.center_index = self.verts.len();
        self.verts.push(hub);

        let model = self.curve_model();
        let mut reference = Vec3::Z;
        let mut radials = Vec::new();

        for t in 0..self.threads.len() {
            let mut thread = self.threads[t].clone();
            let segment = match thread.kind {
                ThreadKind::Support if thread.points.len() == 2 => 0,
                ThreadKind::Frame if thread.points.len() == 4 => 1,
                _ => continue,
            };

            let p0 = self.verts[thread.points[segment]];
            let p1 = self.verts[thread.points[segment + 1]];
            let length = p0.distance(p1);
            if length <= f32::EPSILON {
                continue;
            }
            let angle_a = reference.angle_between(p0 - position);
            let angle_b = reference.angle_between(p1 - position);
            if angle_a.max(angle_b) <= thread_angle {
                continue;
            }
            // Sweep from the end closest to the previous spoke.
            if angle_a > angle_b {
                thread.points.reverse();
            }

            let distance = ((p0 + p1) * 0.5 - position).length();
            let increment = thread_angle * distance / length;
            if !increment.is_finite() || increment < MIN_RADIAL_INCREMENT {
                continue;
            }

            let mut coefs = Vec::new();
            let mut coef = increment * 0.5;
            while coef < 1.0 {
                coefs.push(coef);
                let step = ((1.0 - randomness) + randomness * (0.5 - rng.random::<f32>())) * increment;
                coef += step.max(increment * 0.1);
            }

            let mut points = thread.points[..=segment].to_vec();
            for coef in coefs {
                let point = thread.point_on_curve(&self.verts, &model, segment, coef, Vec3::ZERO);
                let n = self.verts.len();
                self.verts.push(point);
                points.push(n);
                radials.push(Thread::new(vec![self.center_index, n], ThreadKind::Radial));
                reference = point - hub;
            }
            points.extend_from_slice(&thread.points[segment + 1..]);
            thread.points = points;
            self.threads[t] = thread;
        }

        debug!("radial layer: {} radials", radials.len());
        self.threads.extend(radials);
        Ok(())
    }

    /// Densifies the spokes, links neighbouring spokes, then stitches the
    /// hub from the spoke points nearest the center.
    fn add_filling_threads(&mut self, settings: &WebSettings, rng: &mut impl Rng) -> Result<()> {
        let radial_ids: Vec<usize> = self
            .threads
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind == ThreadKind::Radial)
            .map(|(i, _)| i)
            .collect();
        if radial_ids.len() < 2 {
            return Err(WebError::InsufficientTopology {
                stage: "filling",
                found: radial_ids.len(),
            });
        }

        let model = self.curve_model();
        let radial_resolution =
            Resolution::adaptive(settings.radial_resolution).with_randomness(settings.radial_jitter);
        for &t in &radial_ids {
            let points = resample_thread(&mut self.verts, &self.threads[t], &model, radial_resolution, rng);
            self.threads[t].points = points;
        }

        // Split the spokes into the hub pool and the outer part, keeping rims.
        let mut pool = Vec::new();
        let mut limits = Vec::new();
        for &t in &radial_ids {
            let points = &mut self.threads[t].points;
            let strip = 2.min(points.len().saturating_sub(1));
            pool.extend(points.drain(..strip));
            if let Some(&first) = points.first() {
                limits.push(first);
            }
        }

        let mut added = self.link_radials(&radial_ids, settings, rng);

        pool.sort_unstable();
        pool.dedup();
        self.scatter_hub(&pool, &limits, rng);
        added.extend(stitch_hub(&self.verts, &pool, &limits, settings.hub_passes));

        self.hub_indices = pool;
        self.hub_indices.extend_from_slice(&limits);

        let fill_resolution = Resolution::fixed(settings.fill_resolution);
        for kind in [ThreadKind::Filling, ThreadKind::Hub] {
            for thread in added.iter_mut().filter(|t| t.kind == kind) {
                thread.points = resample_thread(&mut self.verts, thread, &model, fill_resolution, rng);
            }
        }

        debug!(
            "filling layer: {} filling, {} hub threads",
            added.iter().filter(|t| t.kind == ThreadKind::Filling).count(),
            added.iter().filter(|t| t.kind == ThreadKind::Hub).count()
        );
        self.threads.extend(added);
        Ok(())
    }

    /// Links points of each spoke to the nearest unlinked point of the next.
    fn link_radials(
        &self,
        radial_ids: &[usize],
        settings: &WebSettings,
        rng: &mut impl Rng,
    ) -> Vec<Thread> {
        let mut links = Vec::new();
        for (r, &t) in radial_ids.iter().enumerate() {
            let current = &self.threads[t].points;
            let next = &self.threads[radial_ids[(r + 1) % radial_ids.len()]].points;
            let mut linked = vec![false; next.len()];

            for (j, &p) in current.iter().enumerate() {
                let point = self.verts[p];
                let mut probability = settings.fill_probability;
                if point.distance(self.hub_center) > settings.fill_distance {
                    probability /= 10.0;
                }
                if rng.random::<f32>() >= probability {
                    continue;
                }

                let nearest = next
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| !linked[*k])
                    .min_by(|(_, a), (_, b)| {
                        point
                            .distance(self.verts[**a])
                            .total_cmp(&point.distance(self.verts[**b]))
                    });
                let Some((k, &q)) = nearest else {
                    continue;
                };
                linked[k] = true;
                let kind = if j == 0 {
                    ThreadKind::Hub
                } else {
                    ThreadKind::Filling
                };
                links.push(Thread::new(vec![p, q], kind));
            }
        }
        links
    }

    /// Spreads the hub pool between opposite spoke limits so the hub has no
    /// single singular vertex.
    fn scatter_hub(&mut self, pool: &[usize], limits: &[usize], rng: &mut impl Rng) {
        if limits.is_empty() {
            return;
        }
        for &p in pool {
            let index_a = rng.random_range(0..limits.len());
            let a = self.verts[limits[index_a]];
            let b = self.verts[limits[(index_a + limits.len() / 2) % limits.len()]];
            let factor = rng.random::<f32>();
            self.verts[p] = factor * a + (1.0 - factor) * b;
        }
    }

    fn span(&self, thread: &Thread) -> f32 {
        match (thread.points.first(), thread.points.last()) {
            (Some(&a), Some(&b)) => self.verts[a].distance(self.verts[b]),
            _ => 0.0,
        }
    }
}

/// Repeated nearest-neighbour matching from every hub vertex to the hub pool
/// and spoke limits. Pass `l` allows up to `l + 3` links per vertex and never
/// links the same pair twice.
fn stitch_hub(verts: &[Vec3], pool: &[usize], limits: &[usize], passes: u32) -> Vec<Thread> {
    let candidates: Vec<usize> = pool.iter().chain(limits).copied().collect();
    let mut links: Vec<Vec<usize>> = vec![Vec::new(); candidates.len()];
    let mut threads = Vec::new();

    for pass in 0..passes as usize {
        for s in 0..pool.len() {
            let point = verts[candidates[s]];
            let mut best: Option<(usize, f32)> = None;
            for (o, &q) in candidates.iter().enumerate() {
                if o == s || links[o].len() >= pass + 3 || links[o].contains(&s) {
                    continue;
                }
                let distance = point.distance(verts[q]);
                if best.is_none_or(|(_, d)| distance < d) {
                    best = Some((o, distance));
                }
            }
            if let Some((o, _)) = best {
                threads.push(Thread::new(vec![candidates[s], candidates[o]], ThreadKind::Hub));
                links[s].push(o);
                links[o].push(s);
            }
        }
    }
    threads
}

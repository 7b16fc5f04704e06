use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;

use crate::atlas::TextureAtlas;
use crate::plane::robust_rotation_arc;
use crate::webs::Webs;

const MAX_RESOLUTION: u32 = 128;

// Helper struct to build a single mesh
#[derive(Default)]
struct MeshData {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl MeshData {
    fn into_mesh(self) -> Mesh {
        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs);
        mesh.insert_indices(Indices::U32(self.indices));
        mesh
    }
}

/// Turns generated webs into Bevy meshes: raw edge lines, swept thread
/// tubes, and textured anchor planes for baked atlases.
pub struct WebMeshBuilder {
    resolution: u32,
    thread_radius: f32,
}

impl Default for WebMeshBuilder {
    fn default() -> Self {
        Self {
            resolution: 4,
            thread_radius: 0.0005,
        }
    }
}

impl WebMeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertices per tube ring, clamped to `3..=128`.
    pub fn with_resolution(mut self, res: u32) -> Self {
        self.resolution = res.clamp(3, MAX_RESOLUTION);
        self
    }

    pub fn with_thread_radius(mut self, radius: f32) -> Self {
        self.thread_radius = radius.max(0.0);
        self
    }

    /// Line-list mesh of the merged vertex and edge arrays.
    pub fn build_lines(&self, webs: &Webs) -> Mesh {
        let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, webs.verts().to_vec());
        mesh.insert_indices(Indices::U32(
            webs.edges().iter().flat_map(|e| *e).collect(),
        ));
        mesh
    }

    /// Tube mesh swept along every thread polyline.
    pub fn build_tubes(&self, webs: &Webs) -> Mesh {
        self.build_polyline_tubes(&webs.polylines())
    }

    /// Tube mesh swept along arbitrary polylines. Polylines with fewer than
    /// two distinct points are skipped.
    pub fn build_polyline_tubes(&self, polylines: &[Vec<Vec3>]) -> Mesh {
        let mut data = MeshData::default();
        for polyline in polylines {
            self.process_polyline(&mut data, polyline);
        }
        data.into_mesh()
    }

    /// One fan-triangulated polygon per atlas tile, spanning the tile's
    /// hull-ordered anchors and mapped onto its slot of the atlas. V is
    /// flipped for a top-left image origin.
    pub fn build_tile_planes(&self, atlas: &TextureAtlas) -> Mesh {
        let mut data = MeshData::default();
        for tile in &atlas.tiles {
            if tile.anchors.len() < 3 {
                continue;
            }
            let start = data.positions.len() as u32;
            for (anchor, uv) in tile.anchors.iter().zip(&tile.anchor_uvs) {
                data.positions.push(*anchor);
                data.normals.push(tile.normal);
                data.uvs.push([uv.x, 1.0 - uv.y]);
            }
            for i in 1..tile.anchors.len() as u32 - 1 {
                data.indices.extend_from_slice(&[start, start + i, start + i + 1]);
            }
        }
        data.into_mesh()
    }

    fn process_polyline(&self, data: &mut MeshData, points: &[Vec3]) {
        // Filter out duplicate points (zero-length segments) to prevent NaNs
        let mut filtered: Vec<Vec3> = Vec::with_capacity(points.len());
        for &point in points {
            if filtered
                .last()
                .is_none_or(|last: &Vec3| last.distance_squared(point) > 1e-12)
            {
                filtered.push(point);
            }
        }
        if filtered.len() < 2 {
            return;
        }

        let first_tangent = (filtered[1] - filtered[0]).normalize_or_zero();
        let mut rotation = robust_rotation_arc(Vec3::Y, first_tangent);
        let mut travelled = 0.0;
        let mut previous_ring = None;

        for i in 0..filtered.len() {
            let curr = filtered[i];
            // Miter tangent for smooth joints, parallel-transported frame.
            let tangent = if i == 0 {
                first_tangent
            } else if i == filtered.len() - 1 {
                (curr - filtered[i - 1]).normalize_or_zero()
            } else {
                let v_in = (curr - filtered[i - 1]).normalize_or_zero();
                let v_out = (filtered[i + 1] - curr).normalize_or_zero();
                let sum = v_in + v_out;
                if sum.length_squared() < 0.001 {
                    v_in
                } else {
                    sum.normalize()
                }
            };
            let bend = robust_rotation_arc(rotation * Vec3::Y, tangent);
            rotation = bend * rotation;

            if i > 0 {
                travelled += curr.distance(filtered[i - 1]);
            }
            let ring = self.add_ring(data, curr, rotation, travelled);
            if let Some(prev) = previous_ring {
                self.connect_rings(data, prev, ring);
            }
            previous_ring = Some(ring);
        }
    }

    fn add_ring(&self, data: &mut MeshData, center: Vec3, rotation: Quat, v: f32) -> u32 {
        let start_index = data.positions.len() as u32;
        let res = self.resolution;

        for i in 0..=res {
            let u = i as f32 / res as f32;
            let (sin, cos) = (u * std::f32::consts::TAU).sin_cos();

            let local_normal = Vec3::new(cos, 0.0, sin);
            data.positions
                .push(center + rotation * (local_normal * self.thread_radius));
            data.normals.push(rotation * local_normal);
            data.uvs.push([u, v]);
        }
        start_index
    }

    fn connect_rings(&self, data: &mut MeshData, bottom_start: u32, top_start: u32) {
        for i in 0..self.resolution {
            let bottom_curr = bottom_start + i;
            let bottom_next = bottom_start + i + 1;
            let top_curr = top_start + i;
            let top_next = top_start + i + 1;

            data.indices
                .extend_from_slice(&[bottom_curr, top_curr, bottom_next]);
            data.indices
                .extend_from_slice(&[bottom_next, top_curr, top_next]);
        }
    }
}

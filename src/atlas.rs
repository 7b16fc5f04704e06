//! Baking webs into a packed coverage texture.
//!
//! Every tile of the atlas holds the webs grouped onto one plane (see
//! [`group_tiles`](crate::webs::group_tiles)). Tiles sit side by side, so
//! the atlas is `resolution * tile_count` pixels wide and `resolution` high.

use bevy::prelude::*;

use crate::clock::Clock;
use crate::error::{Result, WebError};
use crate::hull::convex_hull_order;
use crate::raster::CoverageBuffer;
use crate::uv::{UvProjection, tile_uv};
use crate::webs::Webs;

/// Geometry painted into one atlas slot.
#[derive(Debug, Clone, Default)]
pub struct TileSource {
    pub normal: Vec3,
    pub segments: Vec<(Vec3, Vec3)>,
    pub anchors: Vec<Vec3>,
}

/// One atlas slot.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasTile {
    /// Webs drawn into this tile.
    pub webs: Vec<usize>,
    pub normal: Vec3,
    /// `None` when the tile could not be projected and was left blank.
    pub projection: Option<UvProjection>,
    /// Hull-ordered anchors of the tile, empty for a blank tile.
    pub anchors: Vec<Vec3>,
    /// Atlas UVs of `anchors`.
    pub anchor_uvs: Vec<Vec2>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextureAtlas {
    pub buffer: CoverageBuffer,
    pub tiles: Vec<AtlasTile>,
    /// Atlas UVs of each web's anchors, parallel to [`Webs::webs`]. Empty
    /// for webs in a blank tile.
    pub web_anchor_uvs: Vec<Vec<Vec2>>,
    /// Index and error of every tile left blank.
    pub skipped: Vec<(usize, WebError)>,
}

impl TextureAtlas {
    /// Paints `sources` side by side into tiles of `resolution` pixels.
    ///
    /// A tile whose points cannot be projected is left blank and reported
    /// through `skipped`. Fails only when every tile is blank.
    pub fn from_tiles(sources: &[TileSource], resolution: u32) -> Result<Self> {
        let mut clock = Clock::new();
        clock.begin("preparing_2d_data");

        let tile_count = sources.len();
        let mut tiles = Vec::with_capacity(tile_count);
        let mut skipped = Vec::new();
        for (i, source) in sources.iter().enumerate() {
            let mut extent: Vec<Vec3> = source.segments.iter().flat_map(|(a, b)| [*a, *b]).collect();
            extent.extend_from_slice(&source.anchors);

            let (projection, anchors) = match UvProjection::fit(&extent, source.normal) {
                Ok(projection) => (Some(projection), convex_hull_order(&source.anchors, source.normal)),
                Err(err) => {
                    warn!("tile {} left blank: {}", i, err);
                    skipped.push((i, err));
                    (None, Vec::new())
                }
            };
            let anchor_uvs = projection
                .map(|p| {
                    anchors
                        .iter()
                        .map(|a| tile_uv(p.project(*a), i, tile_count))
                        .collect()
                })
                .unwrap_or_default();
            tiles.push(AtlasTile {
                webs: Vec::new(),
                normal: source.normal,
                projection,
                anchors,
                anchor_uvs,
            });
        }
        clock.end("preparing_2d_data");

        if tile_count > 0 && skipped.len() == tile_count {
            return Err(skipped.swap_remove(0).1);
        }

        clock.begin("painting_pixels");
        let mut buffer = CoverageBuffer::new(resolution, tile_count);
        let res = buffer.resolution();
        for (i, (tile, source)) in tiles.iter().zip(sources).enumerate() {
            let Some(projection) = &tile.projection else {
                continue;
            };
            for (a, b) in &source.segments {
                let (x0, y0) = tile_pixel(projection, *a, i, res);
                let (x1, y1) = tile_pixel(projection, *b, i, res);
                buffer.draw_line(x0, y0, x1, y1);
            }
        }
        clock.end("painting_pixels");

        Ok(Self {
            buffer,
            tiles,
            web_anchor_uvs: Vec::new(),
            skipped,
        })
    }
}

/// Buffer coordinates of `point` in tile `tile`. Columns stay inside the
/// tile so strokes at `u = 1` do not spill into the next one.
fn tile_pixel(projection: &UvProjection, point: Vec3, tile: usize, res: u32) -> (i32, i32) {
    let uv = projection.project(point);
    let last = res as i32 - 1;
    let x = ((uv.x * res as f32) as i32).clamp(0, last);
    (x + tile as i32 * res as i32, (uv.y * res as f32) as i32)
}

impl Webs {
    /// Rasterizes every web into a coverage atlas with tiles of
    /// `resolution` pixels.
    pub fn bake(&self, resolution: u32) -> Result<TextureAtlas> {
        let tile_count = self.tile_count();
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); tile_count];
        for (w, &tile) in self.tiles().iter().enumerate() {
            members[tile].push(w);
        }

        let sources: Vec<TileSource> = members
            .iter()
            .map(|webs| TileSource {
                normal: self.webs()[webs[0]].plane().normal,
                segments: webs
                    .iter()
                    .flat_map(|&w| self.webs()[w].edge_segments())
                    .collect(),
                anchors: webs
                    .iter()
                    .flat_map(|&w| self.webs()[w].anchors().iter().copied())
                    .collect(),
            })
            .collect();

        let mut atlas = TextureAtlas::from_tiles(&sources, resolution)?;
        for (tile, webs) in atlas.tiles.iter_mut().zip(members) {
            tile.webs = webs;
        }

        atlas.web_anchor_uvs = self
            .webs()
            .iter()
            .zip(self.tiles())
            .map(|(web, &tile)| match &atlas.tiles[tile].projection {
                Some(projection) => web
                    .anchors()
                    .iter()
                    .map(|a| tile_uv(projection.project(*a), tile, tile_count))
                    .collect(),
                None => Vec::new(),
            })
            .collect();

        info!(
            "baked {} webs into {}x{} atlas ({} tiles, {} blank)",
            self.webs().len(),
            atlas.buffer.width(),
            atlas.buffer.height(),
            tile_count,
            atlas.skipped.len()
        );
        Ok(atlas)
    }
}

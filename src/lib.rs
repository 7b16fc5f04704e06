//! Procedural spider webs for Bevy.
//!
//! This crate strings spider webs between loose 3D anchor candidates (points
//! sketched by a user, scanned, or borrowed from other geometry) and turns
//! them into Bevy meshes, packed coverage textures, and physics colliders.
//!
//! # Pipeline
//!
//! - **Anchors**: a plane is fitted to the candidates ([`plane`]), the
//!   candidates near it are hull-ordered ([`hull`]) and thinned by angle
//!   ([`anchors`]).
//! - **Topology**: each [`Web`] is built in layers (frame, support, radial,
//!   filling and hub threads) whose curves sag under a static gravity model
//!   ([`thread`], [`resample`]).
//! - **Batches**: [`Webs`] builds several webs from a shared, growing
//!   candidate pool, merges them, and groups coplanar webs into texture
//!   tiles.
//! - **Baking**: [`Webs::bake`] rasterizes each tile into an anti-aliased
//!   coverage atlas ([`uv`], [`raster`], [`atlas`]).
//! - **Output**: meshes via [`WebMeshBuilder`], images and materials via
//!   [`materials`], OBJ text via [`export`], and colliders via
//!   [`ThreadColliderGenerator`] (`physics` feature).
//!
//! Generation is single-threaded and fully deterministic: the same seed and
//! inputs give bit-identical vertices, threads and pixels.
//!
//! # Feature Flags
//!
//! - `physics`: Enables [`ThreadColliderGenerator`] and [`PositionedCollider`]
//!   for Avian3D physics integration.
//!
//! # Example
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_spiderweb::{WebMeshBuilder, Webs, WebsSettings, materials::*};
//!
//! fn spawn_webs(
//!     mut commands: Commands,
//!     mut meshes: ResMut<Assets<Mesh>>,
//!     mut images: ResMut<Assets<Image>>,
//!     mut materials: ResMut<Assets<StandardMaterial>>,
//!     settings: Res<WebsSettings>,
//! ) {
//!     let anchors: Vec<Vec3> = sketched_points();
//!     let Ok(webs) = Webs::generate(&anchors, &settings) else {
//!         return;
//!     };
//!     let builder = WebMeshBuilder::new().with_thread_radius(0.002);
//!     commands.spawn((
//!         Mesh3d(meshes.add(builder.build_tubes(&webs))),
//!         MeshMaterial3d(materials.add(StandardMaterial::default())),
//!     ));
//!
//!     if let Ok(atlas) = webs.bake(settings.texture_size) {
//!         let texture = images.add(coverage_to_image(&atlas.buffer));
//!         let material = web_plane_material(&WebMaterialSettings::default(), Some(texture));
//!         commands.spawn((
//!             Mesh3d(meshes.add(builder.build_tile_planes(&atlas))),
//!             MeshMaterial3d(materials.add(material)),
//!         ));
//!     }
//! }
//! ```

pub mod anchors;
pub mod atlas;
pub mod clock;
pub mod error;
pub mod export;
pub mod hull;
pub mod materials;
pub mod mesher;
pub mod plane;
pub mod raster;
pub mod resample;
pub mod settings;
pub mod thread;
pub mod uv;
pub mod web;
pub mod webs;

#[cfg(feature = "physics")]
pub mod collider;

pub use atlas::{TextureAtlas, TileSource};
pub use error::{Result, WebError};
pub use mesher::WebMeshBuilder;
pub use settings::{WebSettings, WebsSettings};
pub use thread::{Thread, ThreadKind};
pub use web::Web;
pub use webs::Webs;

#[cfg(feature = "physics")]
pub use collider::{PositionedCollider, ThreadColliderGenerator};

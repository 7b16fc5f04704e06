//! Bevy image and material adapters for baked web atlases.
//!
//! The coverage buffer is converted to an RGBA image whose four channels all
//! carry the coverage, so it can drive both color and alpha of a web plane.

use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use crate::raster::CoverageBuffer;

/// Appearance of alpha-blended web planes.
#[derive(Debug, Clone)]
pub struct WebMaterialSettings {
    pub base_color: [f32; 3],
    pub roughness: f32,
    pub emission_strength: f32,
}

impl Default for WebMaterialSettings {
    fn default() -> Self {
        Self {
            base_color: [0.9, 0.9, 0.9],
            roughness: 0.6,
            emission_strength: 0.0,
        }
    }
}

/// RGBA8 bytes of `buffer`, coverage replicated into every channel.
pub fn coverage_to_rgba8(buffer: &CoverageBuffer) -> Vec<u8> {
    let mut data = Vec::with_capacity(buffer.pixels().len() * 4);
    for &coverage in buffer.pixels() {
        let val = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
        data.extend_from_slice(&[val, val, val, val]);
    }
    data
}

/// Bevy image of a baked atlas, clamped at the edges so tiles do not bleed.
pub fn coverage_to_image(buffer: &CoverageBuffer) -> Image {
    let mut image = Image::new(
        Extent3d {
            width: buffer.width(),
            height: buffer.height(),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        coverage_to_rgba8(buffer),
        TextureFormat::Rgba8Unorm,
        default(),
    );
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::ClampToEdge,
        address_mode_v: ImageAddressMode::ClampToEdge,
        ..default()
    });
    image
}

/// Double-sided, alpha-blended material for web planes using `atlas`.
pub fn web_plane_material(
    settings: &WebMaterialSettings,
    atlas: Option<Handle<Image>>,
) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgb_from_array(settings.base_color),
        base_color_texture: atlas,
        perceptual_roughness: settings.roughness,
        emissive: Color::srgb_from_array(settings.base_color).to_linear()
            * settings.emission_strength,
        alpha_mode: AlphaMode::Blend,
        double_sided: true,
        cull_mode: None,
        ..default()
    }
}

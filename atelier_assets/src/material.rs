use std::sync::Arc;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{ChannelSet, ModelFormat, TextureChannel, TextureImage};

/// Shading model a material is rendered with
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderFamily {
    /// Metallic/specular standard lit shading, used for obj sources
    #[default]
    Standard,
    /// glTF PBR shading
    Gltf,
}

impl From<ModelFormat> for ShaderFamily {
    fn from(value: ModelFormat) -> Self {
        match value {
            ModelFormat::Obj => ShaderFamily::Standard,
            ModelFormat::Gltf => ShaderFamily::Gltf,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Component)]
pub struct Material {
    pub family: ShaderFamily,
    pub base_color_factor: glam::Vec4,
    /// Scalar smoothness, [`None`] leaves the shader default
    pub smoothness: Option<f32>,
    /// Diffuse texture named by the source's material definition. Informational, never fetched.
    pub source_texture: Option<String>,
    textures: ChannelSet<Option<Arc<TextureImage>>>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            family: ShaderFamily::default(),
            base_color_factor: glam::Vec4::ONE,
            smoothness: None,
            source_texture: None,
            textures: Default::default(),
        }
    }
}

impl Material {
    pub fn new(family: ShaderFamily) -> Self {
        Self {
            family,
            ..Default::default()
        }
    }

    pub fn texture(&self, channel: TextureChannel) -> Option<&Arc<TextureImage>> {
        self.textures[channel.index()].as_ref()
    }

    pub fn set_texture(&mut self, channel: TextureChannel, image: Arc<TextureImage>) {
        self.textures[channel.index()] = Some(image);
    }

    pub fn set_base_color_map(&mut self, image: Arc<TextureImage>) {
        self.set_texture(TextureChannel::BaseColor, image);
    }

    pub fn set_normal_map(&mut self, image: Arc<TextureImage>) {
        self.set_texture(TextureChannel::Normal, image);
    }

    pub fn set_occlusion_map(&mut self, image: Arc<TextureImage>) {
        self.set_texture(TextureChannel::Occlusion, image);
    }

    pub fn set_metallic_map(&mut self, image: Arc<TextureImage>) {
        self.set_texture(TextureChannel::Metallic, image);
    }

    pub fn set_roughness_map(&mut self, image: Arc<TextureImage>) {
        self.set_texture(TextureChannel::Roughness, image);
    }

    pub fn set_height_map(&mut self, image: Arc<TextureImage>) {
        self.set_texture(TextureChannel::Height, image);
    }

    pub fn bound_channels(&self) -> impl Iterator<Item = TextureChannel> + '_ {
        TextureChannel::ALL
            .into_iter()
            .filter(|channel| self.textures[channel.index()].is_some())
    }

    pub fn bound_count(&self) -> usize {
        self.textures.iter().filter(|t| t.is_some()).count()
    }
}

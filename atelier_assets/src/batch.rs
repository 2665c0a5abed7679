use serde::{Deserialize, Serialize};

use crate::{AddressingMode, ModelFormat, TextureChannel};

/// Declarative description of one batch: a model plus the texture maps of each of its sub-objects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetBatchSpec {
    /// Logical name, also the root node name once loaded
    pub name: String,
    /// Model url (direct) or opaque file id (indirect)
    pub url: String,
    /// Whether a companion material definition (.mtl) accompanies the model
    pub companion_material: bool,
    pub material_url: String,
    pub addressing: AddressingMode,
    /// Overrides format detection from the url and payload
    pub format: Option<ModelFormat>,
    /// Name of a scene anchor to parent the result under, root when [`None`]
    pub parent: Option<String>,
    pub sub_assets: Vec<SubAssetSpec>,
}

/// Texture maps of one sub-object of a batch. Empty fields mean "no texture for this channel".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubAssetSpec {
    pub name: String,
    pub base_color: String,
    pub normal: String,
    pub occlusion: String,
    pub metallic: String,
    pub roughness: String,
    pub height: String,
}

impl SubAssetSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn channel_url(&self, channel: TextureChannel) -> &str {
        match channel {
            TextureChannel::BaseColor => &self.base_color,
            TextureChannel::Normal => &self.normal,
            TextureChannel::Occlusion => &self.occlusion,
            TextureChannel::Metallic => &self.metallic,
            TextureChannel::Roughness => &self.roughness,
            TextureChannel::Height => &self.height,
        }
    }

    pub fn with_channel(mut self, channel: TextureChannel, url: impl Into<String>) -> Self {
        let url = url.into();
        match channel {
            TextureChannel::BaseColor => self.base_color = url,
            TextureChannel::Normal => self.normal = url,
            TextureChannel::Occlusion => self.occlusion = url,
            TextureChannel::Metallic => self.metallic = url,
            TextureChannel::Roughness => self.roughness = url,
            TextureChannel::Height => self.height = url,
        }
        self
    }
}

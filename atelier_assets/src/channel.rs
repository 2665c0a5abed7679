use serde::{Deserialize, Serialize};

/// Number of texture channels fetched per sub-asset
pub const CHANNEL_COUNT: usize = 6;

/// One value per [`TextureChannel`], indexed by [`TextureChannel::index`]
pub type ChannelSet<T> = [T; CHANNEL_COUNT];

/// Texture roles a sub-asset may supply, in fetch and binding order
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureChannel {
    BaseColor,
    Normal,
    Occlusion,
    Metallic,
    /// Roughness or specular gloss
    Roughness,
    /// Height or parallax
    Height,
}

impl TextureChannel {
    pub const ALL: ChannelSet<TextureChannel> = [
        TextureChannel::BaseColor,
        TextureChannel::Normal,
        TextureChannel::Occlusion,
        TextureChannel::Metallic,
        TextureChannel::Roughness,
        TextureChannel::Height,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            TextureChannel::BaseColor => "base_color",
            TextureChannel::Normal => "normal",
            TextureChannel::Occlusion => "occlusion",
            TextureChannel::Metallic => "metallic",
            TextureChannel::Roughness => "roughness",
            TextureChannel::Height => "height",
        }
    }
}

impl std::fmt::Display for TextureChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

use serde::{Deserialize, Serialize};

use crate::{AssetBatchSpec, ModelFormat, TextureChannel};

/// How the url fields of an [`AssetBatchSpec`] are interpreted
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressingMode {
    /// Fields are complete urls and used verbatim
    Direct,
    /// Fields are opaque file ids appended to [`LocatorConfig::indirect_base`]
    #[default]
    Indirect,
}

/// Which resource of a batch to resolve
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResourceKind {
    Model,
    Material,
    Texture {
        sub_asset: usize,
        channel: TextureChannel,
    },
}

impl ResourceKind {
    fn label(&self) -> &'static str {
        match self {
            ResourceKind::Model => "model",
            ResourceKind::Material => "material",
            ResourceKind::Texture { .. } => "texture",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Redirecting endpoint that serves a file by id, ids are appended as `&id={id}`
    pub indirect_base: String,
    /// Direct mode fallback root, an empty model url resolves to `{root}{name}.{ext}`
    pub storage_root: Option<String>,
    /// Substring identifying a view/share link that must be rewritten
    pub share_marker: String,
    pub share_id_start: String,
    pub share_id_end: String,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            indirect_base: "https://drive.google.com/uc?export=download".to_string(),
            storage_root: None,
            share_marker: "view".to_string(),
            share_id_start: "d/".to_string(),
            share_id_end: "/view".to_string(),
        }
    }
}

/// Turns the fields of a batch into concrete fetch urls
#[derive(Debug, Clone, Default)]
pub struct ResourceLocator {
    config: LocatorConfig,
}

impl ResourceLocator {
    pub fn new(config: LocatorConfig) -> Self {
        Self { config }
    }

    /// Resolve the url for `kind`, [`None`] means there is nothing to fetch.
    ///
    /// Callers treat [`None`] for a texture as a skipped channel, not as an error.
    pub fn resolve(&self, kind: ResourceKind, spec: &AssetBatchSpec) -> Option<String> {
        let field = match kind {
            ResourceKind::Model => spec.url.as_str(),
            ResourceKind::Material => {
                if !spec.companion_material {
                    return None;
                }
                spec.material_url.as_str()
            }
            ResourceKind::Texture { sub_asset, channel } => {
                spec.sub_assets.get(sub_asset)?.channel_url(channel)
            }
        };
        let field = field.trim();

        let url = match spec.addressing {
            AddressingMode::Direct if field.is_empty() => self.storage_fallback(kind, spec)?,
            AddressingMode::Direct => field.to_string(),
            AddressingMode::Indirect if field.is_empty() => return None,
            AddressingMode::Indirect => self.by_id(field),
        };

        if url.contains(&self.config.share_marker) {
            return self.rewrite_share_link(&url, kind);
        }
        Some(url)
    }

    fn by_id(&self, id: &str) -> String {
        format!("{}&id={}", self.config.indirect_base, id)
    }

    fn storage_fallback(&self, kind: ResourceKind, spec: &AssetBatchSpec) -> Option<String> {
        let root = self.config.storage_root.as_deref()?;
        let extension = match kind {
            ResourceKind::Model => spec.format.unwrap_or(ModelFormat::Obj).extension(),
            ResourceKind::Material => "mtl",
            ResourceKind::Texture { .. } => return None,
        };
        Some(format!("{}{}.{}", root, spec.name, extension))
    }

    fn rewrite_share_link(&self, url: &str, kind: ResourceKind) -> Option<String> {
        match extract_between(url, &self.config.share_id_start, &self.config.share_id_end) {
            Some(id) => Some(self.by_id(id)),
            None => {
                tracing::warn!(url, kind = kind.label(), "share link carries no file id");
                None
            }
        }
    }
}

/// Text strictly between the first `start` and the next `end` after it.
///
/// [`None`] if either delimiter is missing or nothing lies between them.
pub fn extract_between<'a>(input: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = input.find(start)? + start.len();
    let length = input[from..].find(end)?;
    (length > 0).then(|| &input[from..from + length])
}

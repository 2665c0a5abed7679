use std::path::Path;

use anyhow::Context;
use atelier_assets::AssetBatchSpec;
use atelier_engine::PipelineConfig;
use serde::Deserialize;

/// A named parent node created before any batch is enqueued
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnchorSpec {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub pipeline: PipelineConfig,
    pub anchors: Vec<AnchorSpec>,
    pub batches: Vec<AssetBatchSpec>,
}

impl Manifest {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing manifest {}", path.display()))
    }
}

use std::time::Duration;

use atelier_assets::LocatorConfig;
use serde::{Deserialize, Serialize};

/// Tunables of the download pipeline, read from the `[pipeline]` table of a manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Interval the completion barrier re-checks fetch states at
    pub tick_ms: u64,
    #[serde(flatten)]
    pub locator: LocatorConfig,
    /// Smoothness forced onto a material whenever a metallic map is bound
    pub smoothness_override: f32,
    /// kg/m³, used for the mass estimate of assembled batches
    pub density: f32,
    /// Handed to the http client. The pipeline itself imposes no deadline.
    pub request_timeout_ms: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            locator: LocatorConfig::default(),
            smoothness_override: 0.0,
            density: 1000.0,
            request_timeout_ms: None,
        }
    }
}

impl PipelineConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use atelier_assets::{
    AssetBatchSpec, ChannelSet, Fetch, FetchState, ModelFetchState, ModelRequest, ResourceKind,
    ResourceLocator, ShaderFamily, TextureChannel, fetch_slot, load_model,
};
use atelier_physics::{BoundingBox, MassEstimate};
use atelier_scene::Scene;
use bevy_ecs::prelude::*;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::assembly::{bind_staged, finalize, locate_sub_object, stage};
use crate::{CompletionBarrier, InFlight, InFlightGuard, PipelineConfig, SubObject};

/// Summary of an assembled batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub root: Entity,
    /// Scene nodes spawned for the batch
    pub nodes: usize,
    /// Sub-asset indices, in the order they were bound
    pub bound_sub_assets: Vec<usize>,
    pub skipped_channels: usize,
    pub bounds: Option<BoundingBox>,
    pub volume: MassEstimate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Assembled(BatchReport),
    /// The model could not be fetched or parsed, nothing was added to the scene
    ObjectMissing,
}

impl BatchOutcome {
    pub fn report(&self) -> Option<&BatchReport> {
        match self {
            BatchOutcome::Assembled(report) => Some(report),
            BatchOutcome::ObjectMissing => None,
        }
    }
}

/// Drives asset batches from fetch to scene.
///
/// Every enqueued batch runs on its own task: all of its fetches are launched at once, then a
/// [`CompletionBarrier`] releases its sub-assets one at a time, in order, for binding. Batches do
/// not wait on each other.
pub struct Orchestrator<F: Fetch> {
    fetcher: Arc<F>,
    locator: Arc<ResourceLocator>,
    config: Arc<PipelineConfig>,
    scene: Arc<Mutex<Scene>>,
    in_flight: InFlight,
}

impl<F: Fetch> Orchestrator<F> {
    pub fn new(fetcher: F, config: PipelineConfig) -> Self {
        Self::with_scene(fetcher, config, Arc::new(Mutex::new(Scene::new())))
    }

    pub fn with_scene(fetcher: F, config: PipelineConfig, scene: Arc<Mutex<Scene>>) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            locator: Arc::new(ResourceLocator::new(config.locator.clone())),
            config: Arc::new(config),
            scene,
            in_flight: InFlight::new(),
        }
    }

    pub fn scene(&self) -> &Arc<Mutex<Scene>> {
        &self.scene
    }

    pub fn locator(&self) -> &ResourceLocator {
        &self.locator
    }

    /// Batches enqueued and not yet settled
    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    /// Start processing `batch`. Must be called from within a tokio runtime.
    ///
    /// The handle may be dropped, the batch runs to completion regardless.
    pub fn enqueue(&self, batch: AssetBatchSpec) -> JoinHandle<BatchOutcome> {
        let guard = self.in_flight.begin();
        let parent = self.resolve_parent(&batch);
        let barrier = self.launch(&batch);
        tracing::info!(
            batch = %batch.name,
            sub_assets = batch.sub_assets.len(),
            in_flight = self.in_flight.get(),
            "batch enqueued"
        );

        let runtime = BatchRuntime {
            batch,
            parent,
            barrier,
            config: self.config.clone(),
            scene: self.scene.clone(),
            _guard: guard,
        };
        tokio::spawn(runtime.run())
    }

    fn resolve_parent(&self, batch: &AssetBatchSpec) -> Option<Entity> {
        let name = batch.parent.as_deref()?;
        let anchor = self
            .scene
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .anchor(name);
        if anchor.is_none() {
            tracing::warn!(batch = %batch.name, anchor = name, "unknown anchor, attaching at root");
        }
        anchor
    }

    /// Spawn the model fetch and every texture fetch of `batch`
    fn launch(&self, batch: &AssetBatchSpec) -> CompletionBarrier {
        let request = ModelRequest::resolve(batch, &self.locator);
        let (model_tx, model_rx) = watch::channel(ModelFetchState::Pending);
        let fetcher = self.fetcher.clone();
        tokio::spawn(async move {
            let state = load_model(&*fetcher, &request).await;
            model_tx.send_replace(state);
        });

        let channels = (0..batch.sub_assets.len())
            .map(|sub_asset| -> ChannelSet<watch::Receiver<FetchState>> {
                TextureChannel::ALL.map(|channel| {
                    let url = self
                        .locator
                        .resolve(ResourceKind::Texture { sub_asset, channel }, batch);
                    let (tx, rx) = watch::channel(FetchState::Pending);
                    let fetcher = self.fetcher.clone();
                    tokio::spawn(async move {
                        let state = fetch_slot(&*fetcher, channel, url.as_deref()).await;
                        tx.send_replace(state);
                    });
                    rx
                })
            })
            .collect();

        CompletionBarrier::new(&batch.name, self.config.tick(), model_rx, channels)
    }
}

/// Everything one batch owns while it is being processed
struct BatchRuntime {
    batch: AssetBatchSpec,
    parent: Option<Entity>,
    barrier: CompletionBarrier,
    config: Arc<PipelineConfig>,
    scene: Arc<Mutex<Scene>>,
    _guard: InFlightGuard,
}

impl BatchRuntime {
    async fn run(self) -> BatchOutcome {
        let Some(model) = self.barrier.wait_model().await else {
            return BatchOutcome::ObjectMissing;
        };
        let family = ShaderFamily::from(model.format);
        let sub_assets = &self.batch.sub_assets;

        let targets: Vec<Option<SubObject>> = sub_assets
            .iter()
            .enumerate()
            .map(|(index, sub_asset)| locate_sub_object(&model.root, sub_asset, index))
            .collect();
        let mut child_name_indices: Vec<usize> = (0..model.root.children.len()).collect();
        for (index, target) in targets.iter().enumerate() {
            if let Some(SubObject::Child(position)) = target {
                child_name_indices[*position] = index;
            }
        }
        let root_name_index = sub_assets.len().saturating_sub(1);

        let staged = stage(
            &mut self.lock_scene(),
            &model.root,
            root_name_index,
            &child_name_indices,
            self.parent,
        );

        let mut bound_sub_assets = Vec::with_capacity(sub_assets.len());
        let mut skipped_channels = 0;
        for (index, sub_asset) in sub_assets.iter().enumerate() {
            let Some(channels) = self.barrier.wait(index).await else {
                break;
            };
            let Some(entity) = targets[index].and_then(|target| staged.entity(target)) else {
                tracing::warn!(
                    batch = %self.batch.name,
                    sub_asset = index,
                    name = %sub_asset.name,
                    "no sub-object for sub-asset"
                );
                continue;
            };
            skipped_channels += bind_staged(
                &mut self.lock_scene(),
                entity,
                family,
                &channels,
                self.config.smoothness_override,
            );
            bound_sub_assets.push(index);
            tracing::debug!(batch = %self.batch.name, sub_asset = index, "sub-asset bound");
        }

        let finalized = finalize(
            &mut self.lock_scene(),
            &staged,
            &model.root,
            self.parent,
            self.config.density,
        );
        tracing::info!(
            batch = %self.batch.name,
            nodes = finalized.nodes,
            bound = bound_sub_assets.len(),
            skipped_channels,
            "batch assembled"
        );
        BatchOutcome::Assembled(BatchReport {
            root: finalized.root,
            nodes: finalized.nodes,
            bound_sub_assets,
            skipped_channels,
            bounds: finalized.bounds,
            volume: finalized.volume,
        })
    }

    fn lock_scene(&self) -> MutexGuard<'_, Scene> {
        self.scene.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

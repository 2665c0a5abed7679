use std::sync::Arc;
use std::time::Duration;

use atelier_assets::{ChannelSet, FetchState, LoadedModel, ModelFetchState, TextureChannel};
use tokio::sync::watch;

/// What a waiting barrier is blocked on
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Awaiting {
    Model,
    Channel(TextureChannel),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BarrierState {
    Waiting(Awaiting),
    /// The model was not found. Terminal, the batch is abandoned.
    ObjectMissing,
    Settled,
}

/// Fan-in point of one batch.
///
/// Holds the receiving end of the model fetch and of every texture slot of every sub-asset, and
/// re-checks them on a fixed tick. Sub-assets are observed one at a time, in order, while their
/// fetches all run concurrently.
#[derive(Debug)]
pub struct CompletionBarrier {
    batch: String,
    tick: Duration,
    model: watch::Receiver<ModelFetchState>,
    channels: Vec<ChannelSet<watch::Receiver<FetchState>>>,
}

impl CompletionBarrier {
    pub fn new(
        batch: impl Into<String>,
        tick: Duration,
        model: watch::Receiver<ModelFetchState>,
        channels: Vec<ChannelSet<watch::Receiver<FetchState>>>,
    ) -> Self {
        Self {
            batch: batch.into(),
            tick,
            model,
            channels,
        }
    }

    pub fn poll_model(&self) -> BarrierState {
        match &*self.model.borrow() {
            ModelFetchState::NotFound => BarrierState::ObjectMissing,
            ModelFetchState::Pending => BarrierState::Waiting(Awaiting::Model),
            ModelFetchState::Ready(_) => BarrierState::Settled,
        }
    }

    /// Settled once the model is ready and all six channels of `sub_asset` are ready or skipped
    pub fn poll(&self, sub_asset: usize) -> BarrierState {
        let state = self.poll_model();
        if state != BarrierState::Settled {
            return state;
        }
        let Some(slots) = self.channels.get(sub_asset) else {
            return BarrierState::Settled;
        };
        TextureChannel::ALL
            .into_iter()
            .find(|channel| !slots[channel.index()].borrow().is_settled())
            .map_or(BarrierState::Settled, |channel| {
                BarrierState::Waiting(Awaiting::Channel(channel))
            })
    }

    /// Wait for the model alone. [`None`] when it was not found.
    pub async fn wait_model(&self) -> Option<Arc<LoadedModel>> {
        self.settle(None).await
    }

    /// Wait for `sub_asset` to settle and snapshot its channel states. [`None`] when the model
    /// was not found.
    pub async fn wait(&self, sub_asset: usize) -> Option<ChannelSet<FetchState>> {
        self.settle(Some(sub_asset)).await?;
        Some(match self.channels.get(sub_asset) {
            Some(slots) => std::array::from_fn(|i| slots[i].borrow().clone()),
            None => std::array::from_fn(|_| FetchState::Skipped),
        })
    }

    async fn settle(&self, sub_asset: Option<usize>) -> Option<Arc<LoadedModel>> {
        loop {
            let state = match sub_asset {
                Some(sub_asset) => self.poll(sub_asset),
                None => self.poll_model(),
            };
            match state {
                BarrierState::ObjectMissing => {
                    tracing::warn!(batch = %self.batch, ?sub_asset, "object not found");
                    return None;
                }
                BarrierState::Settled => {
                    let model = match &*self.model.borrow() {
                        ModelFetchState::Ready(model) => Some(model.clone()),
                        _ => None,
                    };
                    if model.is_some() {
                        return model;
                    }
                }
                BarrierState::Waiting(Awaiting::Model) => {
                    tracing::debug!(batch = %self.batch, "awaiting model");
                }
                BarrierState::Waiting(Awaiting::Channel(channel)) => {
                    tracing::debug!(
                        batch = %self.batch,
                        ?sub_asset,
                        channel = channel.index(),
                        "awaiting channel"
                    );
                }
            }
            tokio::time::sleep(self.tick).await;
        }
    }
}

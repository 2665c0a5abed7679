use std::sync::Arc;

use crate::{LoadedModel, TextureImage};

/// State of one texture channel fetch
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Pending,
    Ready(Arc<TextureImage>),
    /// Empty url or failed fetch, the channel is left unbound
    Skipped,
}

impl FetchState {
    /// Ready and Skipped are terminal
    pub fn is_settled(&self) -> bool {
        !matches!(self, FetchState::Pending)
    }

    pub fn image(&self) -> Option<&Arc<TextureImage>> {
        match self {
            FetchState::Ready(image) => Some(image),
            _ => None,
        }
    }
}

/// State of a batch's model fetch
#[derive(Debug, Clone, Default)]
pub enum ModelFetchState {
    #[default]
    Pending,
    Ready(Arc<LoadedModel>),
    /// Terminal and fatal for the owning batch
    NotFound,
}

impl ModelFetchState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, ModelFetchState::Pending)
    }
}

use std::sync::Arc;

use image::GenericImageView;

use crate::{AssetError, Fetch, FetchState, TextureChannel};

/// A decoded texture map
#[derive(Debug, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub image: image::DynamicImage,
}

impl TextureImage {
    pub fn decode(bytes: &[u8]) -> Result<Self, AssetError> {
        let image = image::load_from_memory(bytes)?;
        let (width, height) = image.dimensions();
        Ok(Self {
            width,
            height,
            image,
        })
    }
}

/// Fetch and decode one texture channel.
///
/// Never fails: an unresolved url, a network error or an undecodable payload all yield
/// [`FetchState::Skipped`]. A missing texture is never fatal to its batch.
pub async fn fetch_slot<F: Fetch>(
    fetcher: &F,
    channel: TextureChannel,
    url: Option<&str>,
) -> FetchState {
    let Some(url) = url else {
        tracing::trace!(%channel, "no texture for channel");
        return FetchState::Skipped;
    };
    let decoded = match fetcher.get(url).await {
        Ok(bytes) => TextureImage::decode(&bytes),
        Err(err) => Err(err.into()),
    };
    match decoded {
        Ok(image) => FetchState::Ready(Arc::new(image)),
        Err(err) => {
            tracing::debug!(%channel, url, error = %err, "texture channel unavailable");
            FetchState::Skipped
        }
    }
}

use thiserror::Error;

/// Failure of a single network fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },
    #[error("could not reach {url}: {reason}")]
    Transport { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("no url could be resolved for the {0}")]
    Unresolved(&'static str),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("malformed obj source: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("malformed gltf source: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("undecodable image: {0}")]
    Image(#[from] image::ImageError),
    #[error("{0} contains no geometry")]
    EmptyGeometry(String),
}

impl AssetError {
    /// Whether the payload arrived but could not be parsed
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            AssetError::Obj(_)
                | AssetError::Gltf(_)
                | AssetError::Image(_)
                | AssetError::EmptyGeometry(_)
        )
    }
}

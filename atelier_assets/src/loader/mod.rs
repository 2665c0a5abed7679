//! Model loading: fetch the model payload (and its companion material definition) then parse it
//! into an in-memory [`ModelNode`](crate::ModelNode) tree.

mod gltf;
mod obj;

use std::sync::Arc;

use bytes::Bytes;

use crate::{
    AssetBatchSpec, AssetError, Fetch, FetchError, LoadedModel, ModelFetchState, ModelFormat,
    ResourceKind, ResourceLocator, extract_between,
};

pub use self::gltf::parse_gltf;
pub use obj::parse_obj;

/// Everything the model loader needs for one batch, with urls already resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    /// Becomes the root node name
    pub name: String,
    pub url: Option<String>,
    /// A companion material definition was declared. Its fetch must then succeed too.
    pub companion_material: bool,
    pub material_url: Option<String>,
    pub format: Option<ModelFormat>,
}

impl ModelRequest {
    pub fn resolve(spec: &AssetBatchSpec, locator: &ResourceLocator) -> Self {
        Self {
            name: spec.name.clone(),
            url: locator.resolve(ResourceKind::Model, spec),
            companion_material: spec.companion_material,
            material_url: locator.resolve(ResourceKind::Material, spec),
            format: spec.format,
        }
    }
}

/// Fetch and parse a model.
///
/// Any failure, including a failed companion material fetch or an unparsable payload, yields
/// [`ModelFetchState::NotFound`]. Nothing is retried.
pub async fn load_model<F: Fetch>(fetcher: &F, request: &ModelRequest) -> ModelFetchState {
    match try_load_model(fetcher, request).await {
        Ok(model) => {
            tracing::debug!(
                batch = %request.name,
                format = ?model.format,
                nodes = model.root.node_count(),
                "model loaded"
            );
            ModelFetchState::Ready(Arc::new(model))
        }
        Err(err) if err.is_malformed() => {
            tracing::warn!(batch = %request.name, error = %err, "malformed model source");
            ModelFetchState::NotFound
        }
        Err(err) => {
            tracing::warn!(batch = %request.name, error = %err, "model not found");
            ModelFetchState::NotFound
        }
    }
}

async fn try_load_model<F: Fetch>(
    fetcher: &F,
    request: &ModelRequest,
) -> Result<LoadedModel, AssetError> {
    let url = request
        .url
        .as_deref()
        .ok_or(AssetError::Unresolved("model"))?;
    let payload = fetch_confirmed(fetcher, url).await?;

    let material = if request.companion_material {
        let material_url = request
            .material_url
            .as_deref()
            .ok_or(AssetError::Unresolved("material definition"))?;
        Some(fetcher.get(material_url).await?)
    } else {
        None
    };

    let format = request
        .format
        .or_else(|| ModelFormat::from_url(url))
        .unwrap_or_else(|| ModelFormat::sniff(&payload));
    let root = match format {
        ModelFormat::Obj => parse_obj(&request.name, &payload, material.as_deref())?,
        ModelFormat::Gltf => parse_gltf(&request.name, &payload)?,
    };
    Ok(LoadedModel { format, root })
}

/// Large files served by id answer with a confirmation page instead of the file. Follow it once.
async fn fetch_confirmed<F: Fetch>(fetcher: &F, url: &str) -> Result<Bytes, FetchError> {
    let payload = fetcher.get(url).await?;
    match confirmation_url(url, &payload) {
        Some(confirmed) => {
            tracing::debug!(url, "following large download confirmation");
            fetcher.get(&confirmed).await
        }
        None => Ok(payload),
    }
}

fn confirmation_url(url: &str, payload: &[u8]) -> Option<String> {
    if payload.iter().find(|b| !b.is_ascii_whitespace()) != Some(&b'<') {
        return None;
    }
    let page = String::from_utf8_lossy(payload);
    let uuid = extract_between(&page, r#"name="uuid" value=""#, "\"")?;
    let at = extract_between(&page, r#"name="at" value=""#, "\"")?;
    Some(format!("{url}&confirm=t&uuid={uuid}&at={at}"))
}

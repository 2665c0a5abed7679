
mod batch;
mod channel;
mod error;
mod fetch;
mod fetch_state;
pub mod loader;
mod locator;
mod material;
mod model;
mod texture;

pub use batch::{AssetBatchSpec, SubAssetSpec};
pub use channel::{CHANNEL_COUNT, ChannelSet, TextureChannel};
pub use error::{AssetError, FetchError};
pub use fetch::{Fetch, HttpFetcher, MemoryFetcher};
pub use fetch_state::{FetchState, ModelFetchState};
pub use loader::{ModelRequest, load_model};
pub use locator::{AddressingMode, LocatorConfig, ResourceKind, ResourceLocator, extract_between};
pub use material::{Material, ShaderFamily};
pub use model::{LoadedModel, MeshGeometry, ModelFormat, ModelNode, Primitive};
pub use texture::{TextureImage, fetch_slot};

mod name;
mod naming;
mod scene;

pub use name::Name;
pub use naming::NameRegistry;
pub use scene::{Anchors, Scene};

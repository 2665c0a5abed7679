#![allow(dead_code)]

pub mod bounding_box;
pub mod picking;
pub mod transform;
pub mod volume;

pub use bounding_box::*;
pub use picking::PickingVolume;
pub use transform::Transform;
pub use volume::{mesh_volume, MassEstimate};

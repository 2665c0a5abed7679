use atelier_physics::{BoundingBox, MassEstimate, Transform, mesh_volume};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::Material;

/// Source format of a model payload
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFormat {
    /// Wavefront obj, optionally with a companion mtl
    Obj,
    /// glTF json with embedded buffers, or binary glb
    Gltf,
}

impl ModelFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ModelFormat::Obj => "obj",
            ModelFormat::Gltf => "gltf",
        }
    }

    /// Format declared by the extension of `url`, ignoring any query string
    pub fn from_url(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
        if path.ends_with(".obj") {
            Some(ModelFormat::Obj)
        } else if path.ends_with(".gltf") || path.ends_with(".glb") {
            Some(ModelFormat::Gltf)
        } else {
            None
        }
    }

    /// Guess from the payload: glb magic or a json object is glTF, anything else obj
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(b"glTF") {
            return ModelFormat::Gltf;
        }
        match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => ModelFormat::Gltf,
            _ => ModelFormat::Obj,
        }
    }
}

/// One indexed triangle list
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Primitive {
    pub positions: Vec<glam::Vec3>,
    pub indices: Vec<u32>,
}

impl Primitive {
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.positions.iter().copied())
    }
}

/// Geometry carried by a node, in the node's local space
#[derive(Debug, Clone, PartialEq, Default, Component)]
pub struct MeshGeometry {
    pub primitives: Vec<Primitive>,
}

impl MeshGeometry {
    /// Union of the primitive bounds
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.primitives
            .iter()
            .filter_map(Primitive::bounds)
            .reduce(|a, b| a.union(&b))
    }
}

/// In-memory scene node produced by the model loader, not yet part of any scene
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelNode {
    pub name: String,
    pub transform: Transform,
    pub geometry: Option<MeshGeometry>,
    pub material: Option<Material>,
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Visit this node and every descendant depth first, with the matrix from the node's space to
    /// the space `parent` maps into
    pub fn visit<'a>(&'a self, parent: glam::Mat4, f: &mut impl FnMut(&'a ModelNode, glam::Mat4)) {
        let matrix = parent * self.transform.matrix();
        f(self, matrix);
        for child in &self.children {
            child.visit(matrix, f);
        }
    }

    /// Bounds of every geometry bearing node below and including this one, in this node's
    /// parent space
    pub fn combined_bounds(&self) -> Option<BoundingBox> {
        let mut combined: Option<BoundingBox> = None;
        self.visit(glam::Mat4::IDENTITY, &mut |node, matrix| {
            let Some(bounds) = node.geometry.as_ref().and_then(MeshGeometry::bounds) else {
                return;
            };
            let bounds = bounds.transformed(matrix);
            combined = Some(match combined {
                Some(c) => c.union(&bounds),
                None => bounds,
            });
        });
        combined
    }

    pub fn mass(&self, density: f32) -> MassEstimate {
        let mut estimate = MassEstimate::default();
        self.visit(glam::Mat4::IDENTITY, &mut |node, matrix| {
            for primitive in node.geometry.iter().flat_map(|g| g.primitives.iter()) {
                let volume = mesh_volume(&primitive.positions, &primitive.indices, matrix);
                estimate.accumulate(MassEstimate::from_volume(volume, density));
            }
        });
        estimate
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ModelNode::node_count).sum::<usize>()
    }
}

/// A parsed model ready for assembly
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModel {
    pub format: ModelFormat,
    pub root: ModelNode,
}

use crate::{AssetError, Material, MeshGeometry, ModelNode, Primitive, ShaderFamily};

/// Parse a self contained glTF (embedded buffers) or glb payload into a root node named `name`
/// whose children are the root nodes of the default scene.
pub fn parse_gltf(name: &str, bytes: &[u8]) -> Result<ModelNode, AssetError> {
    let (document, buffers, _) = gltf::import_slice(bytes)?;
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| AssetError::EmptyGeometry(name.to_string()))?;

    let mut root = ModelNode::new(name);
    root.children = scene
        .nodes()
        .map(|node| convert_node(node, &buffers))
        .collect();

    if root.combined_bounds().is_none() {
        return Err(AssetError::EmptyGeometry(name.to_string()));
    }
    Ok(root)
}

fn convert_node(node: gltf::Node, buffers: &[gltf::buffer::Data]) -> ModelNode {
    let name = node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node{}", node.index()));
    let transform = glam::Mat4::from_cols_array_2d(&node.transform().matrix()).into();

    let mut material = None;
    let geometry = node.mesh().map(|mesh| {
        let primitives = mesh
            .primitives()
            .filter_map(|primitive| {
                if material.is_none() {
                    let pbr = primitive.material().pbr_metallic_roughness();
                    let mut m = Material::new(ShaderFamily::Gltf);
                    m.base_color_factor = glam::Vec4::from_array(pbr.base_color_factor());
                    material = Some(m);
                }
                let reader = primitive
                    .reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
                let positions: Vec<glam::Vec3> =
                    reader.read_positions()?.map(glam::Vec3::from_array).collect();
                let indices = match reader.read_indices() {
                    Some(indices) => indices.into_u32().collect(),
                    None => (0..positions.len() as u32).collect(),
                };
                Some(Primitive { positions, indices })
            })
            .collect();
        MeshGeometry { primitives }
    });

    ModelNode {
        name,
        transform,
        geometry,
        material,
        children: node
            .children()
            .map(|child| convert_node(child, buffers))
            .collect(),
    }
}

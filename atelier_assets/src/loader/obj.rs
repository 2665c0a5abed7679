use std::io::Cursor;

use crate::{AssetError, Material, MeshGeometry, ModelNode, Primitive, ShaderFamily};

/// Parse an obj payload and its optional mtl into a root node named `name` with one child per
/// object of the source.
pub fn parse_obj(name: &str, obj: &[u8], mtl: Option<&[u8]>) -> Result<ModelNode, AssetError> {
    let (models, materials) = tobj::load_obj_buf(
        &mut Cursor::new(obj),
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
        |_| match mtl {
            Some(mtl) => tobj::load_mtl_buf(&mut Cursor::new(mtl)),
            None => Ok((Vec::new(), Default::default())),
        },
    )?;
    let materials = materials.unwrap_or_else(|err| {
        tracing::warn!(batch = name, error = %err, "ignoring unreadable material definition");
        Vec::new()
    });

    if models.is_empty() {
        return Err(AssetError::EmptyGeometry(name.to_string()));
    }

    let mut root = ModelNode::new(name);
    root.children = models
        .into_iter()
        .map(|model| {
            let mesh = model.mesh;
            let positions = mesh
                .positions
                .chunks_exact(3)
                .map(|p| glam::Vec3::new(p[0], p[1], p[2]))
                .collect();

            let mut material = Material::new(ShaderFamily::Standard);
            if let Some(source) = mesh.material_id.and_then(|id| materials.get(id)) {
                if let Some([r, g, b]) = source.diffuse {
                    material.base_color_factor = glam::Vec4::new(r, g, b, 1.0);
                }
                material.source_texture = source.diffuse_texture.clone();
            }

            ModelNode {
                geometry: Some(MeshGeometry {
                    primitives: vec![Primitive {
                        positions,
                        indices: mesh.indices,
                    }],
                }),
                material: Some(material),
                ..ModelNode::new(model.name)
            }
        })
        .collect();
    Ok(root)
}

use atelier_assets::{
    CHANNEL_COUNT, ChannelSet, FetchState, Material, ModelNode, ShaderFamily, SubAssetSpec,
    TextureChannel,
};
use atelier_physics::{BoundingBox, MassEstimate, PickingVolume};
use atelier_scene::Scene;
use bevy_ecs::prelude::*;

/// Where a sub-asset's maps are bound within the loaded model
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SubObject {
    /// The model has a single object, the root itself
    Root,
    Child(usize),
}

/// Find the sub-object `sub_asset` (the `index`-th entry of its batch) refers to: the child
/// with the same name, or the `index`-th child when the name is empty.
pub fn locate_sub_object(
    root: &ModelNode,
    sub_asset: &SubAssetSpec,
    index: usize,
) -> Option<SubObject> {
    let by_name = !sub_asset.name.is_empty();
    if root.children.is_empty() {
        let matches = if by_name {
            sub_asset.name == root.name
        } else {
            index == 0
        };
        return matches.then_some(SubObject::Root);
    }
    if by_name {
        root.children
            .iter()
            .position(|child| child.name == sub_asset.name)
            .map(SubObject::Child)
    } else {
        (index < root.children.len()).then_some(SubObject::Child(index))
    }
}

/// Bind the ready channels of a settled sub-asset into `material`, returning how many channels
/// were skipped. Skipped channels leave their slot untouched.
pub fn bind_sub_asset(
    material: &mut Material,
    channels: &ChannelSet<FetchState>,
    smoothness_override: f32,
) -> usize {
    let mut skipped = 0;
    for channel in TextureChannel::ALL {
        let Some(image) = channels[channel.index()].image().cloned() else {
            skipped += 1;
            continue;
        };
        match channel {
            TextureChannel::BaseColor => material.set_base_color_map(image),
            TextureChannel::Normal => material.set_normal_map(image),
            TextureChannel::Occlusion => material.set_occlusion_map(image),
            TextureChannel::Metallic => {
                material.set_metallic_map(image);
                material.smoothness = Some(smoothness_override);
            }
            TextureChannel::Roughness => material.set_roughness_map(image),
            TextureChannel::Height => material.set_height_map(image),
        }
    }
    skipped
}

/// Bounds of a node's own geometry plus everything below it, in the node's local space
fn local_bounds(node: &ModelNode) -> Option<BoundingBox> {
    node.geometry
        .as_ref()
        .and_then(|geometry| geometry.bounds())
        .into_iter()
        .chain(node.children.iter().filter_map(ModelNode::combined_bounds))
        .reduce(|a, b| a.union(&b))
}

/// A model tree live in the scene, still held by its staging container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedModel {
    pub staging: Entity,
    pub root: Entity,
    /// Entities of the root's children, in model order
    pub top_level: Vec<Entity>,
}

impl StagedModel {
    pub fn entity(&self, target: SubObject) -> Option<Entity> {
        match target {
            SubObject::Root => Some(self.root),
            SubObject::Child(position) => self.top_level.get(position).copied(),
        }
    }
}

/// Spawn `root` and its descendants under a new staging container parented under `parent`, or
/// left at the scene root when [`None`].
///
/// The root takes `root_name_index` as its name index. Top level children take the index in
/// `child_name_indices`, deeper nodes inherit their top level ancestor's. Geometry bearing
/// descendants get a picking volume fitted to their own bounds.
pub fn stage(
    scene: &mut Scene,
    root: &ModelNode,
    root_name_index: usize,
    child_name_indices: &[usize],
    parent: Option<Entity>,
) -> StagedModel {
    let staging = scene.spawn_staging();
    scene.attach(staging, parent);
    let root_entity = spawn_node(scene, root, root_name_index, staging);
    let top_level = root
        .children
        .iter()
        .enumerate()
        .map(|(position, child)| {
            let index = child_name_indices.get(position).copied().unwrap_or(position);
            spawn_tree(scene, child, index, root_entity)
        })
        .collect();
    tracing::debug!(batch = %root.name, ?parent, "model staged");

    StagedModel {
        staging,
        root: root_entity,
        top_level,
    }
}

/// Bind a settled sub-asset onto the material of a live node, creating the material when the
/// source declared none. Returns how many channels were skipped.
pub fn bind_staged(
    scene: &mut Scene,
    entity: Entity,
    family: ShaderFamily,
    channels: &ChannelSet<FetchState>,
    smoothness_override: f32,
) -> usize {
    let world = scene.world_mut();
    let Ok(mut entity_mut) = world.get_entity_mut(entity) else {
        return CHANNEL_COUNT;
    };
    if !entity_mut.contains::<Material>() {
        entity_mut.insert(Material::new(family));
    }
    match entity_mut.get_mut::<Material>() {
        Some(mut material) => bind_sub_asset(&mut material, channels, smoothness_override),
        None => CHANNEL_COUNT,
    }
}

/// A batch after it has been placed in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Finalized {
    pub root: Entity,
    pub nodes: usize,
    pub bounds: Option<BoundingBox>,
    pub volume: MassEstimate,
}

/// Size the root's picking volume over the whole batch, move the root from its staging
/// container to `parent` (or the scene root) and remove the container.
pub fn finalize(
    scene: &mut Scene,
    staged: &StagedModel,
    root: &ModelNode,
    parent: Option<Entity>,
    density: f32,
) -> Finalized {
    let bounds = local_bounds(root);
    match bounds {
        Some(bounds) => {
            scene
                .world_mut()
                .entity_mut(staged.root)
                .insert((bounds, PickingVolume::fit(&bounds)));
        }
        None => tracing::warn!(batch = %root.name, "no geometry to size picking volume"),
    }
    let volume = root.mass(density);
    let nodes = root.node_count();

    scene.attach(staged.root, parent);
    scene.despawn(staged.staging);
    tracing::debug!(batch = %root.name, nodes, ?parent, "batch attached");

    Finalized {
        root: staged.root,
        nodes,
        bounds,
        volume,
    }
}

fn spawn_tree(scene: &mut Scene, node: &ModelNode, name_index: usize, parent: Entity) -> Entity {
    let entity = spawn_node(scene, node, name_index, parent);
    if let Some(bounds) = node.geometry.as_ref().and_then(|geometry| geometry.bounds()) {
        scene
            .world_mut()
            .entity_mut(entity)
            .insert(PickingVolume::fit(&bounds));
    }
    for child in &node.children {
        spawn_tree(scene, child, name_index, entity);
    }
    entity
}

fn spawn_node(scene: &mut Scene, node: &ModelNode, name_index: usize, parent: Entity) -> Entity {
    let entity = scene.spawn_node(&node.name, name_index, node.transform, Some(parent));
    let mut entity_mut = scene.world_mut().entity_mut(entity);
    if let Some(geometry) = &node.geometry {
        entity_mut.insert(geometry.clone());
    }
    if let Some(material) = &node.material {
        entity_mut.insert(material.clone());
    }
    entity
}

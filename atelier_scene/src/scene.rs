use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;
use std::collections::HashMap;

use crate::{Name, NameRegistry};

/// Named parent nodes that batches can be attached under, resolved to handles once
#[derive(Debug, Default, Resource)]
pub struct Anchors(HashMap<String, Entity>);

impl Anchors {
    pub fn get(&self, name: &str) -> Option<Entity> {
        self.0.get(name).copied()
    }
}

/// The live scene graph, backed by a bevy [`World`] whose hierarchy is expressed through
/// [`ChildOf`]. Writers go through the methods here so every named node passes the
/// [`NameRegistry`] exactly once.
pub struct Scene {
    world: World,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        let mut world = World::new();
        world.init_resource::<NameRegistry>();
        world.init_resource::<Anchors>();
        Self { world }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn names(&self) -> &NameRegistry {
        self.world.resource::<NameRegistry>()
    }

    /// Spawn a node named through the registry, optionally under `parent`
    pub fn spawn_node<B: Bundle>(
        &mut self,
        name: &str,
        name_index: usize,
        bundle: B,
        parent: Option<Entity>,
    ) -> Entity {
        let name = self
            .world
            .resource_mut::<NameRegistry>()
            .ensure_unique(name, name_index);
        let mut entity = self.world.spawn((Name(name), bundle));
        if let Some(parent) = parent {
            entity.insert(ChildOf(parent));
        }
        entity.id()
    }

    /// Unnamed temporary container new nodes are assembled under before being attached
    pub fn spawn_staging(&mut self) -> Entity {
        self.world.spawn_empty().id()
    }

    pub fn add_anchor(&mut self, name: &str) -> Entity {
        let entity = self.spawn_node(name, 0, (), None);
        self.world
            .resource_mut::<Anchors>()
            .0
            .insert(name.to_string(), entity);
        entity
    }

    pub fn anchor(&self, name: &str) -> Option<Entity> {
        self.world.resource::<Anchors>().get(name)
    }

    /// Parent `node` under `parent`, or make it a root when [`None`]
    pub fn attach(&mut self, node: Entity, parent: Option<Entity>) {
        match parent {
            Some(parent) => {
                self.world.entity_mut(node).insert(ChildOf(parent));
            }
            None => self.detach_to_root(node),
        }
    }

    pub fn detach_to_root(&mut self, node: Entity) {
        self.world.entity_mut(node).remove::<ChildOf>();
    }

    /// Despawns `node` and everything below it
    pub fn despawn(&mut self, node: Entity) -> bool {
        match self.world.get_entity_mut(node) {
            Ok(entity) => {
                entity.despawn();
                true
            }
            Err(_) => false,
        }
    }

    pub fn parent(&self, node: Entity) -> Option<Entity> {
        self.world.get::<ChildOf>(node).map(ChildOf::parent)
    }

    pub fn children(&self, node: Entity) -> Vec<Entity> {
        self.world
            .get::<Children>(node)
            .map(|children| children.to_vec())
            .unwrap_or_default()
    }

    pub fn name(&self, node: Entity) -> Option<&str> {
        self.world.get::<Name>(node).map(|name| name.0.as_str())
    }

    pub fn get<C: Component>(&self, node: Entity) -> Option<&C> {
        self.world.get::<C>(node)
    }

    /// Look a node up by display name. For inspection only, writers hold handles.
    pub fn find(&mut self, name: &str) -> Option<Entity> {
        let mut query = self.world.query::<(Entity, &Name)>();
        query
            .iter(&self.world)
            .find(|(_, n)| n.0 == name)
            .map(|(entity, _)| entity)
    }

    /// Named nodes without a parent
    pub fn roots(&mut self) -> Vec<Entity> {
        let mut query = self
            .world
            .query_filtered::<Entity, (With<Name>, Without<ChildOf>)>();
        query.iter(&self.world).collect()
    }

    /// Number of named nodes
    pub fn node_count(&mut self) -> usize {
        let mut query = self.world.query::<&Name>();
        query.iter(&self.world).count()
    }
}

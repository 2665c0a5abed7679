use bevy_ecs::prelude::*;
use std::collections::HashSet;

/// Every name ever handed out in the scene.
///
/// Append only: names of despawned nodes are never reclaimed.
#[derive(Debug, Default, Resource)]
pub struct NameRegistry {
    names: HashSet<String>,
}

impl NameRegistry {
    /// Return `name` if it was never emitted, otherwise `name` suffixed with `index` (repeated
    /// until unused). The returned name is recorded before returning.
    pub fn ensure_unique(&mut self, name: &str, index: usize) -> String {
        let mut candidate = name.to_string();
        if self.names.contains(&candidate) {
            let suffix = index.to_string();
            while self.names.contains(&candidate) {
                candidate.push_str(&suffix);
            }
        }
        self.names.insert(candidate.clone());
        candidate
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

use bevy_ecs::prelude as becs;
use std::ops::Deref;

/// Scene unique display name of a node, assigned once through [`crate::NameRegistry`]
#[derive(PartialEq, Eq, Hash, Debug, becs::Component, Clone)]
pub struct Name(pub String);

impl Deref for Name {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

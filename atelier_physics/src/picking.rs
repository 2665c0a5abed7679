use bevy_ecs::prelude::*;

use crate::BoundingBox;

/// Box shaped volume used to hit-test a node when it is clicked in the scene.
///
/// `center` and `size` are expressed in the owning node's local space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Component)]
pub struct PickingVolume {
    pub center: glam::Vec3,
    pub size: glam::Vec3,
}

impl PickingVolume {
    pub fn fit(bounds: &BoundingBox) -> Self {
        Self {
            center: bounds.center(),
            size: bounds.size(),
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        let half = self.size * 0.5;
        BoundingBox::new(self.center - half, self.center + half)
    }

    pub fn contains(&self, point: glam::Vec3) -> bool {
        let bounds = self.bounds();
        point.cmpge(bounds.min).all() && point.cmple(bounds.max).all()
    }
}

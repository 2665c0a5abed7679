use bevy_ecs::prelude::*;

/// Local transform of a scene node relative to its parent
#[derive(Clone, Copy, Debug, PartialEq, Component)]
pub struct Transform {
    pub scale: glam::Vec3,
    pub rotation: glam::Quat,
    pub translation: glam::Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        scale: glam::Vec3::ONE,
        rotation: glam::Quat::IDENTITY,
        translation: glam::Vec3::ZERO,
    };

    pub fn matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    pub fn from_translation(translation: glam::Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }
}

impl From<glam::Mat4> for Transform {
    fn from(value: glam::Mat4) -> Self {
        let (scale, rotation, translation) = value.to_scale_rotation_translation();
        Self {
            scale,
            rotation,
            translation,
        }
    }
}

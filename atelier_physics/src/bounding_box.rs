use bevy_ecs::prelude::*;

/// Describes an axis aligned bounding box by its min max extents in 3d space
#[derive(Debug, Clone, Copy, PartialEq, Default, Component)]
pub struct BoundingBox {
    pub min: glam::Vec3,
    pub max: glam::Vec3,
}

impl BoundingBox {
    /// Given 2 vectors, it will automatically determine the bounding box of the 2
    pub fn new(v1: glam::Vec3, v2: glam::Vec3) -> Self {
        Self {
            min: v1.min(v2),
            max: v2.max(v1),
        }
    }

    /// Smallest box containing every point, [`None`] if there are no points
    pub fn from_points<I: IntoIterator<Item = glam::Vec3>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |mut bounds, point| {
            bounds.encapsulate_point(point);
            bounds
        }))
    }

    /// Grow to contain `point`
    pub fn encapsulate_point(&mut self, point: glam::Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grow to contain `other`
    pub fn encapsulate(&mut self, other: &BoundingBox) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn union(mut self, other: &BoundingBox) -> Self {
        self.encapsulate(other);
        self
    }

    pub fn center(&self) -> glam::Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> glam::Vec3 {
        self.max - self.min
    }

    /// The 8 corners of the box
    pub fn corners(&self) -> [glam::Vec3; 8] {
        [
            glam::Vec3::new(self.min.x, self.min.y, self.min.z),
            glam::Vec3::new(self.min.x, self.min.y, self.max.z),
            glam::Vec3::new(self.min.x, self.max.y, self.min.z),
            glam::Vec3::new(self.min.x, self.max.y, self.max.z),
            glam::Vec3::new(self.max.x, self.min.y, self.min.z),
            glam::Vec3::new(self.max.x, self.min.y, self.max.z),
            glam::Vec3::new(self.max.x, self.max.y, self.min.z),
            glam::Vec3::new(self.max.x, self.max.y, self.max.z),
        ]
    }

    /// Axis aligned box enclosing this box after `matrix` is applied
    pub fn transformed(&self, matrix: glam::Mat4) -> Self {
        let mut corners = self.corners().into_iter().map(|c| matrix.transform_point3(c));
        // corners is never empty
        let first = corners.next().unwrap_or_default();
        corners.fold(Self::new(first, first), |mut bounds, point| {
            bounds.encapsulate_point(point);
            bounds
        })
    }
}

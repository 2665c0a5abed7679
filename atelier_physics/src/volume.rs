/// Volume and mass of a closed triangle mesh
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MassEstimate {
    /// Cubic meters
    pub volume: f32,
    /// Kilograms at the density the estimate was made with
    pub mass: f32,
}

impl MassEstimate {
    pub fn from_volume(volume: f32, density: f32) -> Self {
        Self {
            volume,
            mass: volume * density,
        }
    }

    pub fn accumulate(&mut self, other: MassEstimate) {
        self.volume += other.volume;
        self.mass += other.mass;
    }
}

/// Enclosed volume of an indexed triangle list after `matrix` is applied.
///
/// Sums the signed volumes of the tetrahedra formed by each triangle and the origin, so the mesh
/// must be closed for the result to be meaningful. Trailing indices that do not form a full
/// triangle and out of range indices are ignored.
pub fn mesh_volume(positions: &[glam::Vec3], indices: &[u32], matrix: glam::Mat4) -> f32 {
    let signed: f32 = indices
        .chunks_exact(3)
        .filter_map(|tri| {
            let p1 = positions.get(tri[0] as usize)?;
            let p2 = positions.get(tri[1] as usize)?;
            let p3 = positions.get(tri[2] as usize)?;
            let p1 = matrix.transform_point3(*p1);
            let p2 = matrix.transform_point3(*p2);
            let p3 = matrix.transform_point3(*p3);
            Some(p1.dot(p2.cross(p3)) / 6.0)
        })
        .sum();
    signed.abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn unit_cube() -> (Vec<Vec3>, Vec<u32>) {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ];
        let indices = vec![
            0, 2, 1, 0, 3, 2, // bottom
            4, 5, 6, 4, 6, 7, // top
            0, 1, 5, 0, 5, 4, // front
            3, 7, 6, 3, 6, 2, // back
            0, 4, 7, 0, 7, 3, // left
            1, 2, 6, 1, 6, 5, // right
        ];
        (positions, indices)
    }

    #[test]
    fn test_unit_cube_volume() {
        let (positions, indices) = unit_cube();
        let volume = mesh_volume(&positions, &indices, glam::Mat4::IDENTITY);
        assert!((volume - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_scaled_cube_volume_and_mass() {
        let (positions, indices) = unit_cube();
        let volume = mesh_volume(
            &positions,
            &indices,
            glam::Mat4::from_scale(Vec3::splat(2.0)),
        );
        assert!((volume - 8.0).abs() < 1e-4);
        let estimate = MassEstimate::from_volume(volume, 1000.0);
        assert!((estimate.mass - 8000.0).abs() < 1e-1);
    }

    #[test]
    fn test_ignores_bad_indices() {
        let (positions, _) = unit_cube();
        assert_eq!(mesh_volume(&positions, &[0, 1, 99, 2], glam::Mat4::IDENTITY), 0.0);
    }
}

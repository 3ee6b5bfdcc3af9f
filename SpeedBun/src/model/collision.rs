use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Triangle mesh used for collision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionVolume {
    /// Flat `x, y, z` triples.
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
    pub name: String,
    pub hash: u32,
}

impl CollisionVolume {
    /// Iterate the vertices as points. A trailing partial triple is ignored.
    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.chunks_exact(3).map(Vec3::from_slice)
    }

    /// Number of whole triangles in the index list.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_and_triangles() {
        let volume = CollisionVolume {
            vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 9.0],
            indices: vec![0, 1, 2, 2],
            ..Default::default()
        };

        let points: Vec<Vec3> = volume.points().collect();
        assert_eq!(points.len(), 3);
        assert_eq!(points[1], Vec3::X);
        assert_eq!(volume.triangle_count(), 1);
    }
}

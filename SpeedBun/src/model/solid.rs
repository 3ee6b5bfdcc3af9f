//! Solid (mesh) objects

use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct SolidFlags: u16 {
        const COMPRESSED_VERTS = 1 << 0;
        const SHADOW_MAP = 1 << 3;
        const VERTEX_ANIMATION = 1 << 4;
        const RANDOMIZE_START_FRAME = 1 << 5;
        const IS_LIT = 1 << 6;
        const IS_WINDY = 1 << 7;
        const DUPLICATE_NAME = 1 << 8;
        const DUPLICATE_NAME_ERROR = 1 << 9;
        const DUPLICATED = 1 << 10;
        const WANT_SPOTLIGHT_CONTEXT = 1 << 11;
        const MORPH_INITIALIZED = 1 << 12;
        const SKIN_INFO_CREATED = 1 << 13;
        const PIXEL_DAMAGE_CLEARED = 1 << 14;
    }
}

/// A list of solids belonging to one section or pack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolidObjectList {
    pub marker: i32,
    pub pipeline_path: String,
    pub parent_section_name: String,
    pub objects: Vec<SolidObject>,
}

impl SolidObjectList {
    /// Find an object by its key.
    #[must_use]
    pub fn find(&self, key: u32) -> Option<&SolidObject> {
        self.objects.iter().find(|o| o.key == key)
    }
}

/// Vertex with colour (RGBA, 0..1) and texture coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SolidVertex {
    pub position: Vec3,
    pub color: Vec4,
    pub uv: Vec2,
}

impl SolidVertex {
    /// Set the colour from a packed `0xAARRGGBB` word.
    pub fn set_color(&mut self, argb: u32) {
        let channel = |shift: u32| ((argb >> shift) & 0xFF) as f32 / 255.0;
        self.color = Vec4::new(channel(16), channel(8), channel(0), channel(24));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShadingGroup {
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
    pub length: i32,
    pub texture: i32,
    pub shader: i32,
    pub offset: i32,
    pub flags: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolidObject {
    pub version: u8,
    pub flags: SolidFlags,
    pub key: u32,
    pub num_tris: u32,
    pub volume: f32,
    pub density: f32,
    pub name: String,
    pub vertices: Vec<SolidVertex>,
    pub indices: Vec<u16>,
    pub shading_groups: Vec<ShadingGroup>,
    pub texture_hashes: Vec<u32>,
    pub min_point: Vec3,
    pub max_point: Vec3,
    pub matrix: Mat4,
}

impl Default for SolidObject {
    fn default() -> Self {
        Self {
            version: 0,
            flags: SolidFlags::empty(),
            key: 0,
            num_tris: 0,
            volume: 0.0,
            density: 0.0,
            name: String::new(),
            vertices: Vec::new(),
            indices: Vec::new(),
            shading_groups: Vec::new(),
            texture_hashes: Vec::new(),
            min_point: Vec3::ZERO,
            max_point: Vec3::ZERO,
            matrix: Mat4::IDENTITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_color_unpacking() {
        let mut vertex = SolidVertex::default();
        vertex.set_color(0xFF00_80FF);
        assert_eq!(vertex.color.w, 1.0);
        assert_eq!(vertex.color.x, 0.0);
        assert!((vertex.color.y - 128.0 / 255.0).abs() < f32::EPSILON);
        assert_eq!(vertex.color.z, 1.0);
    }

    #[test]
    fn test_find_by_key() {
        let list = SolidObjectList {
            objects: vec![
                SolidObject { key: 0x10, name: "ROAD".into(), ..Default::default() },
                SolidObject { key: 0x20, name: "WALL".into(), ..Default::default() },
            ],
            ..Default::default()
        };
        assert_eq!(list.find(0x20).unwrap().name, "WALL");
        assert!(list.find(0x30).is_none());
    }
}

//! Scenery placed in a section: object definitions and their instances

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Per-instance render and exclusion flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct InstanceFlags: u16 {
        const EXCLUDE_SPLIT_SCREEN = 1 << 0;
        const EXCLUDE_MAIN_VIEW = 1 << 1;
        const EXCLUDE_RACING = 1 << 2;
        const EXCLUDE_DISABLE_RENDERING = 1 << 3;
        const EXCLUDE_GROUP_DISABLE = 1 << 4;
        const ENABLE_REAR_VIEW = 1 << 5;
        const ENABLE_REFLECTION = 1 << 6;
        const ENVMAP_SHADOW = 1 << 7;
        const IDENTITY_MATRIX = 1 << 8;
        const FLIP_ON_BACKWARDS_TRACK = 1 << 9;
        const CHOPPED_ROADWAY = 1 << 10;
        const REFLECTION = 1 << 11;
        const ENVIRONMENT_MAP = 1 << 12;
        const SWAYABLE = 1 << 13;
        const ENABLE_WIND = 1 << 14;
        const ALWAYS_FACING = 1 << 15;
    }
}

/// Scenery record of one section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenery {
    /// File-relative offset of the scenery chunk. Sections refer to it through
    /// their associated chunk offset.
    pub offset: u32,
    pub visible_section_id: i32,
    pub instances: Vec<SceneryInstance>,
    pub infos: Vec<SceneryInfo>,
}

/// Object definition shared by instances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneryInfo {
    pub name: String,
    pub solid_lod_a: u32,
    pub solid_lod_b: u32,
    pub solid_lod_c: u32,
    pub solid_lod_a_flags: u16,
    pub solid_lod_b_flags: u16,
    pub radius: f32,
    pub hierarchy_key: u32,
}

/// A placed copy of a [`SceneryInfo`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneryInstance {
    pub bound_box_min: Vec3,
    pub bound_box_max: Vec3,
    /// Index into [`Scenery::infos`].
    pub info_index: u16,
    pub pre_culler_info: i32,
    pub flags: InstanceFlags,
    pub matrix: Mat4,
}

impl Default for SceneryInstance {
    fn default() -> Self {
        Self {
            bound_box_min: Vec3::ZERO,
            bound_box_max: Vec3::ZERO,
            info_index: 0,
            pre_culler_info: 0,
            flags: InstanceFlags::empty(),
            matrix: Mat4::IDENTITY,
        }
    }
}

impl SceneryInstance {
    /// Translation part of the instance matrix.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.matrix.w_axis = position.extend(self.matrix.w_axis.w);
    }

    /// Resolve the instance's definition in its owning scenery.
    #[must_use]
    pub fn info<'a>(&self, scenery: &'a Scenery) -> Option<&'a SceneryInfo> {
        scenery.infos.get(usize::from(self.info_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_is_translation() {
        let mut instance = SceneryInstance::default();
        assert_eq!(instance.position(), Vec3::ZERO);

        instance.set_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(instance.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(instance.matrix.w_axis.w, 1.0);
    }

    #[test]
    fn test_info_lookup() {
        let scenery = Scenery {
            infos: vec![
                SceneryInfo { name: "TREE".into(), ..Default::default() },
                SceneryInfo { name: "LAMP".into(), ..Default::default() },
            ],
            ..Default::default()
        };

        let instance = SceneryInstance { info_index: 1, ..Default::default() };
        assert_eq!(instance.info(&scenery).unwrap().name, "LAMP");

        let dangling = SceneryInstance { info_index: 9, ..Default::default() };
        assert!(dangling.info(&scenery).is_none());
    }

    #[test]
    fn test_instance_flags() {
        let flags = InstanceFlags::from_bits_truncate(0x0041);
        assert!(flags.contains(InstanceFlags::EXCLUDE_SPLIT_SCREEN));
        assert!(flags.contains(InstanceFlags::ENABLE_REFLECTION));
        assert!(!flags.contains(InstanceFlags::SWAYABLE));
    }
}

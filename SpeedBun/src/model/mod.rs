//! Decoded track data
//!
//! Readers turn chunk bodies into these types. The deserializer collects them
//! as [`ChunkResult`]s and the link pass joins sections with their scenery and
//! visibility data by value.

mod collision;
mod scenery;
mod section;
mod solid;
mod texture;
mod visible;

pub use collision::CollisionVolume;
pub use scenery::{InstanceFlags, Scenery, SceneryInfo, SceneryInstance};
pub use section::{MAX_SECTION_ID, MIN_SECTION_ID, TrackSection};
pub use solid::{ShadingGroup, SolidFlags, SolidObject, SolidObjectList, SolidVertex};
pub use texture::{TextureInfo, TexturePack, TextureStreamEntry};
pub use visible::VisibleSection;

use serde::Serialize;

/// Output of a chunk reader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DecodedValue {
    Sections(Vec<TrackSection>),
    VisibleSections(Vec<VisibleSection>),
    Solids(SolidObjectList),
    TexturePack(TexturePack),
    CollisionVolumes(Vec<CollisionVolume>),
    Scenery(Scenery),
    /// Raw chunk bytes from readers that only claim an id.
    Unrecognized(Vec<u8>),
}

impl DecodedValue {
    /// Short label for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            DecodedValue::Sections(_) => "sections",
            DecodedValue::VisibleSections(_) => "visible sections",
            DecodedValue::Solids(_) => "solids",
            DecodedValue::TexturePack(_) => "texture pack",
            DecodedValue::CollisionVolumes(_) => "collision volumes",
            DecodedValue::Scenery(_) => "scenery",
            DecodedValue::Unrecognized(_) => "unrecognized",
        }
    }
}

/// A decoded value and the id of the chunk it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkResult {
    pub chunk_id: u32,
    pub value: DecodedValue,
}

impl ChunkResult {
    #[must_use]
    pub fn new(chunk_id: u32, value: DecodedValue) -> Self {
        Self { chunk_id, value }
    }
}

/// Everything decoded for one track region, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Region {
    pub sections: Vec<TrackSection>,
    pub texture_packs: Vec<TexturePack>,
    pub volumes: Vec<CollisionVolume>,
}

impl Region {
    /// Group pass results. Sections and volumes from several chunks are
    /// concatenated in order; sceneries, visible sections and solids are
    /// expected to have been linked into sections already.
    #[must_use]
    pub fn from_results(results: Vec<ChunkResult>) -> Self {
        let mut region = Region::default();

        for result in results {
            match result.value {
                DecodedValue::Sections(sections) => region.sections.extend(sections),
                DecodedValue::TexturePack(pack) => region.texture_packs.push(pack),
                DecodedValue::CollisionVolumes(volumes) => region.volumes.extend(volumes),
                _ => {}
            }
        }

        region
    }

    /// Find a section by name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&TrackSection> {
        self.sections.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_grouping() {
        let results = vec![
            ChunkResult::new(
                1,
                DecodedValue::Sections(vec![TrackSection {
                    id: 212,
                    name: "B12".into(),
                    ..Default::default()
                }]),
            ),
            ChunkResult::new(2, DecodedValue::TexturePack(TexturePack::default())),
            ChunkResult::new(3, DecodedValue::Unrecognized(vec![1, 2])),
            ChunkResult::new(
                4,
                DecodedValue::CollisionVolumes(vec![CollisionVolume::default(); 2]),
            ),
        ];

        let region = Region::from_results(results);
        assert_eq!(region.sections.len(), 1);
        assert_eq!(region.texture_packs.len(), 1);
        assert_eq!(region.volumes.len(), 2);
        assert_eq!(region.section("B12").unwrap().id, 212);
        assert!(region.section("C1").is_none());
    }
}

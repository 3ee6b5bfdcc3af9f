//! Post-pass linking of sections with their scenery and visibility data

use std::collections::BTreeMap;

use glam::Vec2;

use crate::model::{ChunkResult, DecodedValue, Scenery, TrackSection, VisibleSection};

/// Join decoded sceneries and visible sections onto the first section list.
///
/// - a scenery whose offset matches no section's associated chunk offset gets a
///   new section named after its visible section id
/// - a section without scenery takes the one at its associated chunk offset
/// - a section without visibility data takes the visible section with its id
///
/// Values are cloned into the sections; the original results stay in place.
/// Nothing happens if no non-empty section list was decoded.
pub fn link_sections(results: &mut [ChunkResult]) {
    let mut sceneries: BTreeMap<u32, Scenery> = BTreeMap::new();
    let mut visibles: Option<Vec<VisibleSection>> = None;

    for result in results.iter() {
        match &result.value {
            DecodedValue::Scenery(scenery) => {
                if sceneries.contains_key(&scenery.offset) {
                    tracing::warn!(
                        "Duplicate scenery at offset 0x{:X}, keeping the first",
                        scenery.offset
                    );
                } else {
                    sceneries.insert(scenery.offset, scenery.clone());
                }
            }
            DecodedValue::VisibleSections(list) if visibles.is_none() => {
                visibles = Some(list.clone());
            }
            _ => {}
        }
    }

    let Some(sections) = results.iter_mut().find_map(|r| match &mut r.value {
        DecodedValue::Sections(sections) if !sections.is_empty() => Some(sections),
        _ => None,
    }) else {
        return;
    };

    let visibles = visibles.unwrap_or_default();
    let find_visible = |id: i32| visibles.iter().find(|v| i32::from(v.id) == id).cloned();

    let orphans: Vec<&Scenery> = sceneries
        .values()
        .filter(|s| !sections.iter().any(|t| t.associated_chunk_offset == s.offset))
        .collect();

    for scenery in orphans {
        let id = scenery.visible_section_id;
        let name = u16::try_from(id)
            .ok()
            .and_then(|id| TrackSection::id_to_name(id).ok())
            .unwrap_or_else(|| {
                tracing::warn!("Scenery at 0x{:X} has invalid section id {id}", scenery.offset);
                id.to_string()
            });

        tracing::debug!("Creating section {name} for unreferenced scenery at 0x{:X}", scenery.offset);

        sections.push(TrackSection {
            id,
            name,
            center: Vec2::ZERO,
            radius: 0.0,
            associated_chunk_offset: scenery.offset,
            scenery: Some(scenery.clone()),
            visible: find_visible(id),
            ..Default::default()
        });
    }

    let mut linked = 0usize;
    for section in sections.iter_mut() {
        if section.scenery.is_none() {
            section.scenery = sceneries.get(&section.associated_chunk_offset).cloned();
            linked += usize::from(section.scenery.is_some());
        }
        if section.visible.is_none() {
            section.visible = find_visible(section.id);
        }
    }

    tracing::debug!(
        "Linked {linked} sceneries across {} sections ({} sceneries, {} visible sections)",
        sections.len(),
        sceneries.len(),
        visibles.len()
    );
}

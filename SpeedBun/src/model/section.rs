//! Streamable track sections

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{Scenery, SolidObjectList, VisibleSection};
use crate::error::{Error, Result};

/// Lowest valid section id (`A0`).
pub const MIN_SECTION_ID: u16 = 100;
/// Highest valid section id (`Z99`).
pub const MAX_SECTION_ID: u16 = 2699;

/// A section of the track the game streams in and out.
///
/// Sections are named by a letter and a number (`B12`); the numeric id is
/// `100 * letter + number` with `A = 1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackSection {
    pub id: i32,
    pub name: String,
    pub priority: i32,
    /// Centre of the bounding circle.
    pub center: Vec2,
    pub radius: f32,
    /// Offset of the section's scenery chunk inside its stream file.
    pub associated_chunk_offset: u32,
    pub usable: bool,
    pub solids: Option<SolidObjectList>,
    pub scenery: Option<Scenery>,
    pub visible: Option<VisibleSection>,
}

impl TrackSection {
    /// Convert a section name such as `B12` to its id.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSectionName`] unless the name is an uppercase letter
    /// followed by one or two digits.
    pub fn name_to_id(name: &str) -> Result<u16> {
        let invalid = || Error::InvalidSectionName(name.to_string());

        if !(2..=3).contains(&name.len()) {
            return Err(invalid());
        }

        let letter = name.as_bytes()[0];
        if !letter.is_ascii_uppercase() {
            return Err(invalid());
        }

        let digits = &name[1..];
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number: u16 = digits.parse().map_err(|_| invalid())?;

        Ok(100 * u16::from(letter - b'@') + number)
    }

    /// Convert a section id back to its name.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSectionId`] for ids outside `100..=2699`.
    pub fn id_to_name(id: u16) -> Result<String> {
        if !(MIN_SECTION_ID..=MAX_SECTION_ID).contains(&id) {
            return Err(Error::InvalidSectionId(id));
        }

        let letter = char::from(b'@' + (id / 100) as u8);
        Ok(format!("{letter}{}", id % 100))
    }

    /// Whether a point lies within the section's bounding circle.
    #[must_use]
    pub fn in_radius(&self, point: Vec2) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_to_id() {
        assert_eq!(TrackSection::name_to_id("A0").unwrap(), 100);
        assert_eq!(TrackSection::name_to_id("B12").unwrap(), 212);
        assert_eq!(TrackSection::name_to_id("Z99").unwrap(), 2699);
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "B", "b12", "B123", "1AB", "B+1", "Bx"] {
            assert!(
                matches!(TrackSection::name_to_id(name), Err(Error::InvalidSectionName(_))),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_id_to_name() {
        assert_eq!(TrackSection::id_to_name(100).unwrap(), "A0");
        assert_eq!(TrackSection::id_to_name(212).unwrap(), "B12");
        assert_eq!(TrackSection::id_to_name(2699).unwrap(), "Z99");
        assert!(matches!(TrackSection::id_to_name(99), Err(Error::InvalidSectionId(99))));
        assert!(TrackSection::id_to_name(2700).is_err());
    }

    #[test]
    fn test_name_roundtrip() {
        for id in [100u16, 105, 1450, 2601] {
            let name = TrackSection::id_to_name(id).unwrap();
            assert_eq!(TrackSection::name_to_id(&name).unwrap(), id);
        }
    }

    #[test]
    fn test_in_radius() {
        let section = TrackSection {
            center: Vec2::new(10.0, 10.0),
            radius: 5.0,
            ..Default::default()
        };
        assert!(section.in_radius(Vec2::new(13.0, 14.0)));
        assert!(!section.in_radius(Vec2::new(16.0, 10.0)));
    }
}

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Visibility data for one section: its outline and the sections that can be
/// seen from inside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisibleSection {
    pub id: u16,
    pub can_see_ids: Vec<u16>,
    pub polygon: Vec<Vec2>,
    pub min_point: Vec2,
    pub max_point: Vec2,
    pub center: Vec2,
}

impl VisibleSection {
    /// Even-odd test of a point against the outline polygon.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        let mut inside = false;
        let count = self.polygon.len();

        for i in 0..count {
            let a = self.polygon[i];
            let b = self.polygon[(i + count - 1) % count];

            if (a.y > y) != (b.y > y) && x < (b.x - a.x) * (y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
        }
        inside
    }

    #[must_use]
    pub fn can_see(&self, id: u16) -> bool {
        self.can_see_ids.contains(&id)
    }
}

use crate::engine::{Point, Rect, VIEW_WIDTH};
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One security-camera room: a horizontal strip of equally sized frames
/// plus the minimap hotspot that selects it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoomSpec {
    pub name: String,
    pub sheet: String,
    pub frame_count: usize,
    pub frame_width: f32,
    pub frame_height: f32,
    pub zone: Rect,
}

impl RoomSpec {
    /// Rooms wider than the viewport auto-pan.
    pub fn pans(&self) -> bool {
        self.frame_width > VIEW_WIDTH
    }

    /// Horizontal travel available to the pan, zero for narrow rooms.
    pub fn pan_span(&self) -> f32 {
        (self.frame_width - VIEW_WIDTH).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoomManifest {
    pub rooms: Vec<RoomSpec>,
}

impl RoomManifest {
    /// Checked once right after the fetch; the rest of the game trusts the
    /// table afterwards.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.rooms.is_empty(), "room manifest is empty");
        let mut names = HashSet::new();
        for room in &self.rooms {
            ensure!(!room.name.trim().is_empty(), "room with blank name");
            ensure!(
                names.insert(room.name.to_lowercase()),
                "duplicate room name '{}'",
                room.name
            );
            ensure!(room.frame_count >= 1, "room '{}' has no frames", room.name);
            ensure!(
                room.frame_width > 0.0 && room.frame_height > 0.0,
                "room '{}' has degenerate frame geometry",
                room.name
            );
            ensure!(!room.sheet.trim().is_empty(), "room '{}' has no sheet", room.name);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Index of the room whose minimap zone contains the point, if any.
    pub fn zone_hit(&self, point: &Point) -> Option<usize> {
        self.rooms
            .iter()
            .position(|room| room.zone.contains(point))
    }
}

#[cfg(test)]
pub(crate) fn test_manifest() -> RoomManifest {
    let room = |name: &str, frame_count: usize, frame_width: f32, zone_x: f32| RoomSpec {
        name: name.to_string(),
        sheet: format!("sprites/rooms/{}.png", name.to_lowercase().replace(' ', "_")),
        frame_count,
        frame_width,
        frame_height: 720.0,
        zone: Rect::new(zone_x, 400.0, 60.0, 35.0),
    };
    RoomManifest {
        rooms: vec![
            room("Stage", 7, 1600.0, 800.0),
            room("Hall", 3, 1280.0, 900.0),
            room("Closet", 2, 1280.0, 1000.0),
        ],
    }
}

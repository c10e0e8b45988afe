//! Fixed sprite-sheet geometry. The door and monitor-lift sheets have
//! irregular frame origins, so their atlas indexes live here as tables; the
//! per-room sheets are regular strips described by the fetched manifest.

pub mod rooms;

use crate::engine::Rect;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasFrame {
    pub x: f32,
    pub y: f32,
}

const fn frame(x: f32, y: f32) -> AtlasFrame {
    AtlasFrame { x, y }
}

pub const DOOR_FRAME_WIDTH: f32 = 224.0;
pub const DOOR_FRAME_HEIGHT: f32 = 720.0;
/// Ticks per door frame transition.
pub const DOOR_STEP_DELAY: u32 = 2;

/// Door panel travel, fully open (0) to fully shut (last).
pub const DOOR_FRAMES: [AtlasFrame; 17] = [
    frame(0.0, 78.0),
    frame(253.0, 78.0),
    frame(502.0, 78.0),
    frame(751.0, 78.0),
    frame(1000.0, 78.0),
    frame(1249.0, 78.0),
    frame(1498.0, 78.0),
    frame(253.0, 799.0),
    frame(502.0, 799.0),
    frame(751.0, 799.0),
    frame(1000.0, 799.0),
    frame(1249.0, 799.0),
    frame(1498.0, 799.0),
    frame(253.0, 1520.0),
    frame(502.0, 1520.0),
    frame(751.0, 1520.0),
    frame(1000.0, 1520.0),
];

pub fn door_frame(index: usize) -> Rect {
    let origin = DOOR_FRAMES[index];
    Rect::new(origin.x, origin.y, DOOR_FRAME_WIDTH, DOOR_FRAME_HEIGHT)
}

pub const LIFT_FRAME_WIDTH: f32 = 1280.0;
pub const LIFT_FRAME_HEIGHT: f32 = 720.0;
/// Ticks per lift frame transition.
pub const LIFT_STEP_DELAY: u32 = 2;

/// Monitor raise travel, lowered (0) to fully raised (last).
pub const LIFT_FRAMES: [AtlasFrame; 11] = [
    frame(2.0, 2.0),
    frame(1284.0, 2.0),
    frame(2566.0, 2.0),
    frame(3848.0, 2.0),
    frame(2.0, 724.0),
    frame(1284.0, 724.0),
    frame(2566.0, 724.0),
    frame(3848.0, 724.0),
    frame(2.0, 1446.0),
    frame(1284.0, 1446.0),
    frame(2566.0, 1446.0),
];

pub fn lift_frame(index: usize) -> Rect {
    let origin = LIFT_FRAMES[index];
    Rect::new(origin.x, origin.y, LIFT_FRAME_WIDTH, LIFT_FRAME_HEIGHT)
}

pub const STATIC_FRAME_COUNT: usize = 7;
pub const STATIC_FRAME_WIDTH: f32 = 1280.0;
pub const STATIC_FRAME_HEIGHT: f32 = 720.0;
pub const STATIC_STEP_DELAY: u32 = 1;
pub const STATIC_ALPHA: f64 = 0.25;

/// The static overlay is a plain horizontal strip.
pub fn static_frame(index: usize) -> Rect {
    Rect::new(
        index as f32 * STATIC_FRAME_WIDTH,
        0.0,
        STATIC_FRAME_WIDTH,
        STATIC_FRAME_HEIGHT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atlas_tables_are_indexable_end_to_end() {
        let last_door = door_frame(DOOR_FRAMES.len() - 1);
        assert_eq!(last_door.width, DOOR_FRAME_WIDTH);
        let last_lift = lift_frame(LIFT_FRAMES.len() - 1);
        assert_eq!(last_lift.height, LIFT_FRAME_HEIGHT);
    }

    #[test]
    fn static_frames_tile_horizontally() {
        assert_eq!(static_frame(0).x, 0.0);
        assert_eq!(static_frame(3).x, 3.0 * STATIC_FRAME_WIDTH);
    }
}

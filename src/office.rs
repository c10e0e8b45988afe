//! Door and light switches plus the door panel animations. Click
//! coordinates arrive in office space (screen x shifted by the parallax
//! offset); the four switch plates sit at fixed spots on the walls.

use crate::animation::Stepper;
use crate::engine::audio::{Cue, Playback};
use crate::engine::{Point, Rect};
use crate::sprite::{DOOR_FRAMES, DOOR_STEP_DELAY};

const LEFT_DOOR_SWITCH: Rect = Rect::new(1.0, 300.0, 75.0, 50.0);
const LEFT_LIGHT_SWITCH: Rect = Rect::new(1.0, 385.0, 75.0, 50.0);
const RIGHT_DOOR_SWITCH: Rect = Rect::new(1480.0, 300.0, 75.0, 50.0);
const RIGHT_LIGHT_SWITCH: Rect = Rect::new(1480.0, 385.0, 75.0, 50.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// The four office toggles and the two door panel steppers. A door's
/// stepper advances toward the shut panel when the door is activated and
/// rewinds when it is released; the booleans flip immediately, the panels
/// catch up over the next ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Office {
    pub left_door: bool,
    pub right_door: bool,
    pub left_light: bool,
    pub right_light: bool,
    pub left_panel: Stepper,
    pub right_panel: Stepper,
}

impl Office {
    pub fn new() -> Self {
        Office::default()
    }

    /// Hit-test a click against the switch plates. While power is out every
    /// switch is dead and only answers with a blocked cue.
    pub fn handle_click(
        &mut self,
        office_point: &Point,
        power_out: bool,
        playback: &mut Vec<Playback>,
    ) {
        if LEFT_DOOR_SWITCH.contains(office_point) {
            self.toggle_door(Side::Left, power_out, playback);
        }
        if LEFT_LIGHT_SWITCH.contains(office_point) {
            self.toggle_light(Side::Left, power_out, playback);
        }
        if RIGHT_DOOR_SWITCH.contains(office_point) {
            self.toggle_door(Side::Right, power_out, playback);
        }
        if RIGHT_LIGHT_SWITCH.contains(office_point) {
            self.toggle_light(Side::Right, power_out, playback);
        }
    }

    fn toggle_door(&mut self, side: Side, power_out: bool, playback: &mut Vec<Playback>) {
        if power_out {
            playback.push(Playback::Play(Cue::Blocked));
            return;
        }
        let (door, panel) = match side {
            Side::Left => (&mut self.left_door, &mut self.left_panel),
            Side::Right => (&mut self.right_door, &mut self.right_panel),
        };
        *door = !*door;
        if *door {
            panel.advance();
        } else {
            panel.rewind();
        }
        playback.push(Playback::Play(Cue::Door));
    }

    fn toggle_light(&mut self, side: Side, power_out: bool, playback: &mut Vec<Playback>) {
        if power_out {
            playback.push(Playback::Play(Cue::Blocked));
            return;
        }
        // only one side can be lit at a time
        match side {
            Side::Left => {
                self.left_light = !self.left_light;
                self.right_light = false;
            }
            Side::Right => {
                self.right_light = !self.right_light;
                self.left_light = false;
            }
        }
        playback.push(Playback::Play(Cue::Light));
    }

    /// One animation tick for both door panels.
    pub fn tick(&mut self) {
        self.left_panel.tick(DOOR_FRAMES.len(), DOOR_STEP_DELAY);
        self.right_panel.tick(DOOR_FRAMES.len(), DOOR_STEP_DELAY);
    }

    /// Power-loss transition: every switch drops, both panels fall open.
    /// Emits a door cue for each door that was actually shut.
    pub fn black_out(&mut self, playback: &mut Vec<Playback>) {
        if self.left_door {
            playback.push(Playback::Play(Cue::Door));
        }
        if self.right_door {
            playback.push(Playback::Play(Cue::Door));
        }
        self.left_door = false;
        self.right_door = false;
        self.left_light = false;
        self.right_light = false;
        self.left_panel.rewind();
        self.right_panel.rewind();
    }

    /// Count of power-hungry office features currently on.
    pub fn active_features(&self) -> usize {
        [
            self.left_door,
            self.right_door,
            self.left_light,
            self.right_light,
        ]
        .iter()
        .filter(|on| **on)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(office: &mut Office, x: f32, y: f32) -> Vec<Playback> {
        let mut playback = Vec::new();
        office.handle_click(&Point { x, y }, false, &mut playback);
        playback
    }

    #[test]
    fn left_door_switch_starts_the_shut_animation() {
        let mut office = Office::new();
        let playback = click(&mut office, 10.0, 320.0);

        assert!(office.left_door);
        assert!(office.left_panel.is_advancing());
        assert_eq!(office.left_panel.frame, 0);
        assert_eq!(playback, vec![Playback::Play(Cue::Door)]);
    }

    #[test]
    fn releasing_a_door_rewinds_the_panel() {
        let mut office = Office::new();
        click(&mut office, 1500.0, 310.0);
        assert!(office.right_door);

        click(&mut office, 1500.0, 310.0);
        assert!(!office.right_door);
        assert!(office.right_panel.is_rewinding());
    }

    #[test]
    fn lights_are_mutually_exclusive() {
        let mut office = Office::new();
        click(&mut office, 10.0, 400.0);
        assert!(office.left_light);

        click(&mut office, 1500.0, 400.0);
        assert!(office.right_light);
        assert!(!office.left_light);

        // toggling the lit side off leaves both dark
        click(&mut office, 1500.0, 400.0);
        assert!(!office.left_light && !office.right_light);
    }

    #[test]
    fn switches_are_dead_when_power_is_out() {
        let mut office = Office::new();
        let mut playback = Vec::new();
        office.handle_click(&Point { x: 10.0, y: 320.0 }, true, &mut playback);
        office.handle_click(&Point { x: 10.0, y: 400.0 }, true, &mut playback);

        assert!(!office.left_door && !office.left_light);
        assert_eq!(
            playback,
            vec![Playback::Play(Cue::Blocked), Playback::Play(Cue::Blocked)]
        );
    }

    #[test]
    fn misses_change_nothing() {
        let mut office = Office::new();
        let playback = click(&mut office, 640.0, 360.0);
        assert_eq!(office, Office::new());
        assert!(playback.is_empty());
    }

    #[test]
    fn black_out_drops_everything_and_opens_both_doors() {
        let mut office = Office::new();
        click(&mut office, 10.0, 320.0); // left door on
        click(&mut office, 10.0, 400.0); // left light on
        while office.left_panel.is_moving() {
            office.tick();
        }
        assert_eq!(office.left_panel.frame, DOOR_FRAMES.len() - 1);

        let mut playback = Vec::new();
        office.black_out(&mut playback);

        assert_eq!(office.active_features(), 0);
        assert!(office.left_panel.is_rewinding());
        assert!(office.right_panel.is_rewinding());
        // one door was shut -> exactly one door cue
        assert_eq!(playback, vec![Playback::Play(Cue::Door)]);

        while office.left_panel.is_moving() {
            office.tick();
        }
        assert_eq!(office.left_panel.frame, 0);
    }

    #[test]
    fn active_features_counts_each_toggle_once() {
        let mut office = Office::new();
        click(&mut office, 10.0, 320.0);
        click(&mut office, 1500.0, 310.0);
        click(&mut office, 10.0, 400.0);
        assert_eq!(office.active_features(), 3);
    }
}

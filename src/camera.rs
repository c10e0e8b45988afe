//! The security monitor: a Lowered/Raising/Raised/Lowering machine driven
//! by the lift animation, plus per-room auto-pan and the static overlay.
//! Invalid transitions (toggling mid-lift, selecting a room while the
//! monitor is moving) are unrepresentable; the machine simply keeps its
//! state for unsupported events.

use self::monitor_states::{LowerOutcome, MonitorContext, MonitorState, RaiseOutcome};
use crate::animation::Flipbook;
use crate::engine::audio::{Cue, Playback};
use crate::engine::{Point, Rect};
use crate::sprite::rooms::RoomManifest;
use crate::sprite::{STATIC_FRAME_COUNT, STATIC_STEP_DELAY};

/// HUD strip that raises and lowers the monitor.
pub const HUD_TOGGLE: Rect = Rect::new(350.0, 670.0, 600.0, 50.0);

/// Auto-pan speed for wide rooms, pixels per second.
pub const PAN_SPEED: f32 = 60.0;

mod monitor_states {
    use crate::animation::Stepper;
    use crate::sprite::{LIFT_FRAMES, LIFT_STEP_DELAY};

    #[derive(Debug, Copy, Clone)]
    pub struct Lowered;
    #[derive(Debug, Copy, Clone)]
    pub struct Raising;
    #[derive(Debug, Copy, Clone)]
    pub struct Raised;
    #[derive(Debug, Copy, Clone)]
    pub struct Lowering;

    pub enum RaiseOutcome {
        Done(MonitorState<Raised>),
        InProgress(MonitorState<Raising>),
    }

    pub enum LowerOutcome {
        Done(MonitorState<Lowered>),
        InProgress(MonitorState<Lowering>),
    }

    /// Shared data for the lift animation and the selected room.
    #[derive(Debug, Copy, Clone)]
    pub struct MonitorContext {
        pub lift: Stepper,
        pub room: usize,
    }

    #[derive(Debug, Copy, Clone)]
    pub struct MonitorState<S> {
        context: MonitorContext,
        _state: S,
    }

    impl<S> MonitorState<S> {
        pub fn context(&self) -> &MonitorContext {
            &self.context
        }
    }

    impl MonitorState<Lowered> {
        pub fn new() -> Self {
            MonitorState {
                context: MonitorContext {
                    lift: Stepper::new(),
                    room: 0,
                },
                _state: Lowered,
            }
        }

        /// Snap straight to the resting state, keeping the selected room.
        pub fn with_room(room: usize) -> Self {
            let mut state = Self::new();
            state.context.room = room;
            state
        }

        pub fn raise(mut self) -> MonitorState<Raising> {
            self.context.lift.advance();
            MonitorState {
                context: self.context,
                _state: Raising,
            }
        }
    }

    impl MonitorState<Raising> {
        pub fn update(mut self) -> RaiseOutcome {
            if self
                .context
                .lift
                .tick(LIFT_FRAMES.len(), LIFT_STEP_DELAY)
            {
                RaiseOutcome::Done(MonitorState {
                    context: self.context,
                    _state: Raised,
                })
            } else {
                RaiseOutcome::InProgress(self)
            }
        }
    }

    impl MonitorState<Raised> {
        pub fn lower(mut self) -> MonitorState<Lowering> {
            self.context.lift.rewind();
            MonitorState {
                context: self.context,
                _state: Lowering,
            }
        }

        pub fn select(mut self, room: usize) -> Self {
            self.context.room = room;
            self
        }
    }

    impl MonitorState<Lowering> {
        pub fn update(mut self) -> LowerOutcome {
            if self
                .context
                .lift
                .tick(LIFT_FRAMES.len(), LIFT_STEP_DELAY)
            {
                LowerOutcome::Done(MonitorState {
                    context: self.context,
                    _state: Lowered,
                })
            } else {
                LowerOutcome::InProgress(self)
            }
        }
    }
}

#[derive(Debug, Copy, Clone)]
enum MonitorStateMachine {
    Lowered(MonitorState<monitor_states::Lowered>),
    Raising(MonitorState<monitor_states::Raising>),
    Raised(MonitorState<monitor_states::Raised>),
    Lowering(MonitorState<monitor_states::Lowering>),
}

impl From<MonitorState<monitor_states::Lowered>> for MonitorStateMachine {
    fn from(state: MonitorState<monitor_states::Lowered>) -> Self {
        MonitorStateMachine::Lowered(state)
    }
}

impl From<MonitorState<monitor_states::Raising>> for MonitorStateMachine {
    fn from(state: MonitorState<monitor_states::Raising>) -> Self {
        MonitorStateMachine::Raising(state)
    }
}

impl From<MonitorState<monitor_states::Raised>> for MonitorStateMachine {
    fn from(state: MonitorState<monitor_states::Raised>) -> Self {
        MonitorStateMachine::Raised(state)
    }
}

impl From<MonitorState<monitor_states::Lowering>> for MonitorStateMachine {
    fn from(state: MonitorState<monitor_states::Lowering>) -> Self {
        MonitorStateMachine::Lowering(state)
    }
}

impl From<RaiseOutcome> for MonitorStateMachine {
    fn from(outcome: RaiseOutcome) -> Self {
        match outcome {
            RaiseOutcome::Done(raised) => raised.into(),
            RaiseOutcome::InProgress(raising) => raising.into(),
        }
    }
}

impl From<LowerOutcome> for MonitorStateMachine {
    fn from(outcome: LowerOutcome) -> Self {
        match outcome {
            LowerOutcome::Done(lowered) => lowered.into(),
            LowerOutcome::InProgress(lowering) => lowering.into(),
        }
    }
}

impl MonitorStateMachine {
    fn update(self) -> Self {
        match self {
            MonitorStateMachine::Raising(state) => state.update().into(),
            MonitorStateMachine::Lowering(state) => state.update().into(),
            resting => resting,
        }
    }

    fn context(&self) -> &MonitorContext {
        match self {
            MonitorStateMachine::Lowered(state) => state.context(),
            MonitorStateMachine::Raising(state) => state.context(),
            MonitorStateMachine::Raised(state) => state.context(),
            MonitorStateMachine::Lowering(state) => state.context(),
        }
    }
}

/// Ping-pong scroll window for one wide room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pan {
    pub offset: f32,
    direction: f32,
}

impl Default for Pan {
    fn default() -> Self {
        Pan {
            offset: 0.0,
            direction: 1.0,
        }
    }
}

impl Pan {
    fn update(&mut self, span: f32, delta_ms: f64) {
        self.offset += PAN_SPEED * (delta_ms as f32 / 1000.0) * self.direction;
        if self.offset >= span {
            self.offset = span;
            self.direction = -1.0;
        } else if self.offset <= 0.0 {
            self.offset = 0.0;
            self.direction = 1.0;
        }
    }
}

pub struct Monitor {
    state: MonitorStateMachine,
    pans: Vec<Pan>,
    static_overlay: Flipbook,
}

impl Monitor {
    pub fn new(room_count: usize) -> Self {
        Monitor {
            state: MonitorState::new().into(),
            pans: vec![Pan::default(); room_count],
            static_overlay: Flipbook::new(),
        }
    }

    /// HUD toggle. Ignored outright while power is out, and ignored
    /// mid-lift so a half-finished animation can't be restarted.
    pub fn toggle(&mut self, power_out: bool, playback: &mut Vec<Playback>) {
        if power_out {
            return;
        }
        match self.state {
            MonitorStateMachine::Lowered(state) => {
                playback.push(Playback::Play(Cue::MonitorUp));
                self.state = state.raise().into();
            }
            MonitorStateMachine::Raised(state) => {
                playback.push(Playback::Play(Cue::MonitorDown));
                self.state = state.lower().into();
            }
            _ => {}
        }
    }

    /// One animation tick: lift travel, plus the static overlay while the
    /// monitor is up.
    pub fn tick(&mut self) {
        self.state = self.state.update();
        if self.is_open() {
            self.static_overlay
                .tick(STATIC_FRAME_COUNT, STATIC_STEP_DELAY);
        }
    }

    /// Advance the displayed room's scroll window; other rooms hold their
    /// last position.
    pub fn update_pan(&mut self, rooms: &RoomManifest, delta_ms: f64) {
        if !self.is_open() {
            return;
        }
        let index = self.room_index();
        let span = rooms.rooms[index].pan_span();
        if span > 0.0 {
            self.pans[index].update(span, delta_ms);
        }
    }

    pub fn handle_map_click(
        &mut self,
        point: &Point,
        rooms: &RoomManifest,
        playback: &mut Vec<Playback>,
    ) {
        let MonitorStateMachine::Raised(state) = self.state else {
            return;
        };
        if let Some(index) = rooms.zone_hit(point) {
            playback.push(Playback::Play(Cue::RoomSwitch));
            self.state = state.select(index).into();
        }
    }

    /// Arrow keys cycle the selected room, only while fully raised.
    pub fn handle_key(&mut self, key: &str, room_count: usize, playback: &mut Vec<Playback>) {
        let MonitorStateMachine::Raised(state) = self.state else {
            return;
        };
        let current = state.context().room;
        let target = match key {
            "ArrowRight" => (current + 1) % room_count,
            "ArrowLeft" => (current + room_count - 1) % room_count,
            _ => return,
        };
        playback.push(Playback::Play(Cue::RoomSwitch));
        self.state = state.select(target).into();
    }

    /// Power loss slams the monitor down with no lowering animation.
    pub fn force_shut(&mut self) {
        self.state = MonitorState::with_room(self.room_index()).into();
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, MonitorStateMachine::Raised(_))
    }

    pub fn in_transition(&self) -> bool {
        matches!(
            self.state,
            MonitorStateMachine::Raising(_) | MonitorStateMachine::Lowering(_)
        )
    }

    /// Whether the lift sprite should be on screen at all.
    pub fn is_visible(&self) -> bool {
        self.is_open() || self.in_transition()
    }

    pub fn lift_frame(&self) -> usize {
        self.state.context().lift.frame
    }

    pub fn room_index(&self) -> usize {
        self.state.context().room
    }

    pub fn pan_offset(&self, room: usize) -> f32 {
        self.pans[room].offset
    }

    pub fn static_frame(&self) -> usize {
        self.static_overlay.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::rooms::test_manifest;
    use crate::sprite::{LIFT_FRAMES, LIFT_STEP_DELAY};
    use approx::assert_relative_eq;

    fn raise(monitor: &mut Monitor) {
        let mut playback = Vec::new();
        monitor.toggle(false, &mut playback);
        while monitor.in_transition() {
            monitor.tick();
        }
    }

    #[test]
    fn raising_runs_the_full_lift_before_opening() {
        let mut monitor = Monitor::new(3);
        let mut playback = Vec::new();
        monitor.toggle(false, &mut playback);
        assert!(monitor.in_transition());
        assert!(!monitor.is_open());
        assert_eq!(playback, vec![Playback::Play(Cue::MonitorUp)]);

        let expected_ticks = (LIFT_FRAMES.len() - 1) as u32 * LIFT_STEP_DELAY;
        for _ in 0..expected_ticks {
            monitor.tick();
        }
        assert!(monitor.is_open());
        assert_eq!(monitor.lift_frame(), LIFT_FRAMES.len() - 1);
    }

    #[test]
    fn toggle_mid_lift_is_ignored() {
        let mut monitor = Monitor::new(3);
        let mut playback = Vec::new();
        monitor.toggle(false, &mut playback);
        monitor.tick();

        playback.clear();
        monitor.toggle(false, &mut playback);
        assert!(playback.is_empty());
        assert!(monitor.in_transition());
    }

    #[test]
    fn toggle_is_dead_without_power() {
        let mut monitor = Monitor::new(3);
        let mut playback = Vec::new();
        monitor.toggle(true, &mut playback);
        assert!(playback.is_empty());
        assert!(!monitor.is_visible());
    }

    #[test]
    fn lowering_returns_to_rest() {
        let mut monitor = Monitor::new(3);
        raise(&mut monitor);

        let mut playback = Vec::new();
        monitor.toggle(false, &mut playback);
        assert_eq!(playback, vec![Playback::Play(Cue::MonitorDown)]);
        while monitor.in_transition() {
            monitor.tick();
        }
        assert!(!monitor.is_open());
        assert!(!monitor.is_visible());
        assert_eq!(monitor.lift_frame(), 0);
    }

    #[test]
    fn room_selection_requires_a_fully_raised_monitor() {
        let rooms = test_manifest();
        let mut monitor = Monitor::new(rooms.len());
        let mut playback = Vec::new();

        // closed: both selection paths are ignored
        monitor.handle_key("ArrowRight", rooms.len(), &mut playback);
        monitor.handle_map_click(&Point { x: 910.0, y: 410.0 }, &rooms, &mut playback);
        assert_eq!(monitor.room_index(), 0);
        assert!(playback.is_empty());

        // mid-lift: still ignored
        monitor.toggle(false, &mut playback);
        playback.clear();
        monitor.handle_key("ArrowRight", rooms.len(), &mut playback);
        assert_eq!(monitor.room_index(), 0);
        assert!(playback.is_empty());
    }

    #[test]
    fn arrow_keys_cycle_with_wraparound() {
        let rooms = test_manifest();
        let mut monitor = Monitor::new(rooms.len());
        raise(&mut monitor);

        let mut playback = Vec::new();
        monitor.handle_key("ArrowLeft", rooms.len(), &mut playback);
        assert_eq!(monitor.room_index(), rooms.len() - 1);
        monitor.handle_key("ArrowRight", rooms.len(), &mut playback);
        assert_eq!(monitor.room_index(), 0);
        assert_eq!(playback.len(), 2);
    }

    #[test]
    fn map_click_selects_the_zone_room() {
        let rooms = test_manifest();
        let mut monitor = Monitor::new(rooms.len());
        raise(&mut monitor);

        let mut playback = Vec::new();
        monitor.handle_map_click(&Point { x: 1010.0, y: 410.0 }, &rooms, &mut playback);
        assert_eq!(monitor.room_index(), 2);
        assert_eq!(playback, vec![Playback::Play(Cue::RoomSwitch)]);
    }

    #[test]
    fn pan_ping_pongs_between_bounds() {
        let rooms = test_manifest();
        let mut monitor = Monitor::new(rooms.len());
        raise(&mut monitor);

        let span = rooms.rooms[0].pan_span();
        // one second at 60 px/s
        monitor.update_pan(&rooms, 1_000.0);
        assert_relative_eq!(monitor.pan_offset(0), 60.0);

        // run long enough to bounce off the far edge
        for _ in 0..10 {
            monitor.update_pan(&rooms, 1_000.0);
        }
        assert!(monitor.pan_offset(0) <= span);
        assert!(monitor.pan_offset(0) >= 0.0);

        // narrow rooms never pan
        let mut playback = Vec::new();
        monitor.handle_key("ArrowRight", rooms.len(), &mut playback);
        monitor.update_pan(&rooms, 1_000.0);
        assert_eq!(monitor.pan_offset(1), 0.0);
    }

    #[test]
    fn force_shut_skips_the_lowering_animation() {
        let rooms = test_manifest();
        let mut monitor = Monitor::new(rooms.len());
        raise(&mut monitor);
        let mut playback = Vec::new();
        monitor.handle_key("ArrowRight", rooms.len(), &mut playback);

        monitor.force_shut();
        assert!(!monitor.is_visible());
        assert_eq!(monitor.lift_frame(), 0);
        assert_eq!(monitor.room_index(), 1);
    }
}

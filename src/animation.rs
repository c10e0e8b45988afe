//! Frame counters driving every sprite animation in the game. Both kinds
//! advance at most one frame every `delay_ticks` calls; what differs is
//! what happens at the end of the strip.

/// One-shot stepper for animations that travel between two bounds, like a
/// door panel or the monitor lift. `advancing` and `rewinding` are never
/// both set; whichever is set is cleared the moment the matching bound is
/// reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stepper {
    pub frame: usize,
    advancing: bool,
    rewinding: bool,
    ticks: u32,
}

impl Stepper {
    pub fn new() -> Self {
        Stepper::default()
    }

    /// Start travelling toward the last frame.
    pub fn advance(&mut self) {
        self.advancing = true;
        self.rewinding = false;
    }

    /// Start travelling back toward frame 0.
    pub fn rewind(&mut self) {
        self.rewinding = true;
        self.advancing = false;
    }

    pub fn is_advancing(&self) -> bool {
        self.advancing
    }

    pub fn is_rewinding(&self) -> bool {
        self.rewinding
    }

    pub fn is_moving(&self) -> bool {
        self.advancing || self.rewinding
    }

    /// Advance the internal counter and, every `delay_ticks` calls, move one
    /// frame in the active direction. Returns `true` on the tick that
    /// reaches a bound (at which point the direction flag is cleared).
    pub fn tick(&mut self, frame_count: usize, delay_ticks: u32) -> bool {
        debug_assert!(frame_count > 0);
        self.ticks += 1;
        if self.ticks < delay_ticks {
            return false;
        }
        self.ticks = 0;

        let last = frame_count - 1;
        if self.advancing {
            if self.frame < last {
                self.frame += 1;
            }
            if self.frame == last {
                self.advancing = false;
                return true;
            }
        } else if self.rewinding {
            if self.frame > 0 {
                self.frame -= 1;
            }
            if self.frame == 0 {
                self.rewinding = false;
                return true;
            }
        }
        false
    }
}

/// Looping counter for animations that cycle forever, like the camera
/// static overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flipbook {
    pub frame: usize,
    ticks: u32,
}

impl Flipbook {
    pub fn new() -> Self {
        Flipbook::default()
    }

    pub fn tick(&mut self, frame_count: usize, delay_ticks: u32) {
        debug_assert!(frame_count > 0);
        self.ticks += 1;
        if self.ticks >= delay_ticks {
            self.ticks = 0;
            self.frame = (self.frame + 1) % frame_count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepper_advances_one_frame_per_delay_window() {
        let mut stepper = Stepper::new();
        stepper.advance();

        // delay_ticks = 2 -> a frame transition every second call
        assert!(!stepper.tick(5, 2));
        assert_eq!(stepper.frame, 0);
        assert!(!stepper.tick(5, 2));
        assert_eq!(stepper.frame, 1);
        assert!(!stepper.tick(5, 2));
        assert_eq!(stepper.frame, 1);
        assert!(!stepper.tick(5, 2));
        assert_eq!(stepper.frame, 2);
    }

    #[test]
    fn stepper_clamps_and_clears_flag_at_far_bound() {
        let mut stepper = Stepper::new();
        stepper.advance();

        let mut arrivals = 0;
        for _ in 0..20 {
            if stepper.tick(3, 1) {
                arrivals += 1;
            }
        }
        assert_eq!(stepper.frame, 2);
        assert_eq!(arrivals, 1);
        assert!(!stepper.is_moving());
    }

    #[test]
    fn stepper_rewinds_back_to_zero() {
        let mut stepper = Stepper::new();
        stepper.advance();
        while stepper.is_moving() {
            stepper.tick(4, 1);
        }
        assert_eq!(stepper.frame, 3);

        stepper.rewind();
        while stepper.is_moving() {
            stepper.tick(4, 1);
        }
        assert_eq!(stepper.frame, 0);
        assert!(!stepper.is_rewinding());
    }

    #[test]
    fn stepper_directions_are_mutually_exclusive() {
        let mut stepper = Stepper::new();
        stepper.advance();
        stepper.rewind();
        assert!(stepper.is_rewinding() && !stepper.is_advancing());
        stepper.advance();
        assert!(stepper.is_advancing() && !stepper.is_rewinding());
    }

    #[test]
    fn stepper_idles_without_a_direction() {
        let mut stepper = Stepper::new();
        for _ in 0..10 {
            assert!(!stepper.tick(5, 1));
        }
        assert_eq!(stepper.frame, 0);
    }

    #[test]
    fn flipbook_wraps_around() {
        let mut flipbook = Flipbook::new();
        for _ in 0..3 {
            flipbook.tick(3, 1);
        }
        assert_eq!(flipbook.frame, 0);
        flipbook.tick(3, 1);
        assert_eq!(flipbook.frame, 1);
    }
}

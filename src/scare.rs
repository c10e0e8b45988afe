//! The power-out endgame: a one-shot sequence that waits a short random
//! beat, flashes the intruder into the office, and finally blacks the room
//! out for good. Once dark, the session is over; there is no way back.

use crate::engine::audio::{Cue, Playback};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScareConfig {
    /// Delay from power loss to the first appearance, milliseconds.
    pub arm_delay_ms: (f64, f64),
    /// Delay from first appearance to total darkness, milliseconds.
    pub dark_delay_ms: (f64, f64),
    /// Image alternation period while active, milliseconds.
    pub flash_period_ms: f64,
}

impl Default for ScareConfig {
    fn default() -> Self {
        ScareConfig {
            arm_delay_ms: (100.0, 200.0),
            dark_delay_ms: (10_000.0, 15_000.0),
            flash_period_ms: 500.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Armed {
        trigger_at: f64,
    },
    Active {
        flash: bool,
        flipped_at: f64,
        dark_at: f64,
    },
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpScare {
    phase: Phase,
}

impl JumpScare {
    pub fn new() -> Self {
        JumpScare { phase: Phase::Idle }
    }

    /// Schedule the sequence. Arming is a one-shot: later calls while the
    /// sequence is underway change nothing.
    pub fn arm<R: Rng>(&mut self, now_ms: f64, config: &ScareConfig, rng: &mut R) {
        if let Phase::Idle = self.phase {
            let (lo, hi) = config.arm_delay_ms;
            self.phase = Phase::Armed {
                trigger_at: now_ms + rng.gen_range(lo..hi),
            };
        }
    }

    pub fn tick<R: Rng>(
        &mut self,
        now_ms: f64,
        config: &ScareConfig,
        rng: &mut R,
        playback: &mut Vec<Playback>,
    ) {
        match self.phase {
            Phase::Idle | Phase::Dark => {}
            Phase::Armed { trigger_at } => {
                if now_ms >= trigger_at {
                    let (lo, hi) = config.dark_delay_ms;
                    playback.push(Playback::Play(Cue::Scare));
                    self.phase = Phase::Active {
                        flash: false,
                        flipped_at: now_ms,
                        dark_at: now_ms + rng.gen_range(lo..hi),
                    };
                }
            }
            Phase::Active {
                flash,
                flipped_at,
                dark_at,
            } => {
                if now_ms >= dark_at {
                    playback.push(Playback::Stop(Cue::Scare));
                    self.phase = Phase::Dark;
                    return;
                }
                if now_ms - flipped_at > config.flash_period_ms {
                    self.phase = Phase::Active {
                        flash: !flash,
                        flipped_at: now_ms,
                        dark_at,
                    };
                }
            }
        }
    }

    /// The sequence has started showing the intruder (or gone dark).
    pub fn is_triggered(&self) -> bool {
        matches!(self.phase, Phase::Active { .. } | Phase::Dark)
    }

    /// Whether the flash currently shows the intruder image.
    pub fn flash_on(&self) -> bool {
        matches!(self.phase, Phase::Active { flash: true, .. })
    }

    pub fn is_dark(&self) -> bool {
        matches!(self.phase, Phase::Dark)
    }
}

use crate::browser;
use anyhow::Result;
use std::collections::HashMap;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

/// Named sound effects. Game logic emits these as data; only the
/// [`SoundBank`] touches the audio elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Door,
    Light,
    Blocked,
    MonitorUp,
    MonitorDown,
    RoomSwitch,
    PowerDown,
    Scare,
    Bells,
    EarlyAmbience,
    MidnightAmbience,
}

/// Playback requests collected during an update tick and executed
/// afterwards, fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Playback {
    Play(Cue),
    Loop(Cue, f64),
    Stop(Cue),
}

const CUE_SOURCES: &[(Cue, &str)] = &[
    (Cue::Door, "sfx/door_toggle.wav"),
    (Cue::Light, "sfx/light_toggle.wav"),
    (Cue::Blocked, "sfx/blocked.wav"),
    (Cue::MonitorUp, "sfx/monitor_up.wav"),
    (Cue::MonitorDown, "sfx/monitor_down.wav"),
    (Cue::RoomSwitch, "sfx/room_switch.wav"),
    (Cue::PowerDown, "sfx/power_down.wav"),
    (Cue::Scare, "sfx/scare.wav"),
    (Cue::Bells, "sfx/bells.wav"),
    (Cue::EarlyAmbience, "sfx/ambience_early.wav"),
    (Cue::MidnightAmbience, "sfx/ambience_midnight.wav"),
];

pub struct SoundBank {
    sounds: HashMap<Cue, HtmlAudioElement>,
}

impl SoundBank {
    /// Create an element per cue. The browser fetches the files in the
    /// background; a cue played before its file is ready simply fails,
    /// which is logged and otherwise ignored.
    pub fn new() -> Result<Self> {
        let mut sounds = HashMap::new();
        for (cue, source) in CUE_SOURCES {
            sounds.insert(*cue, browser::new_audio(source)?);
        }
        Ok(SoundBank { sounds })
    }

    pub fn run(&self, playback: Playback) {
        match playback {
            Playback::Play(cue) => self.start(cue, false, 1.0),
            Playback::Loop(cue, volume) => self.start(cue, true, volume),
            Playback::Stop(cue) => self.stop(cue),
        }
    }

    fn start(&self, cue: Cue, looping: bool, volume: f64) {
        let Some(sound) = self.sounds.get(&cue) else {
            return;
        };
        sound.set_loop(looping);
        sound.set_volume(volume);
        sound.set_current_time(0.0);
        match sound.play() {
            Ok(promise) => browser::spawn_local(async move {
                if JsFuture::from(promise).await.is_err() {
                    warn!("Cue {:?} couldn't play", cue);
                }
            }),
            Err(err) => warn!("Cue {:?} couldn't play: {:#?}", cue, err),
        }
    }

    fn stop(&self, cue: Cue) {
        if let Some(sound) = self.sounds.get(&cue) {
            sound.pause().unwrap_or_else(|err| {
                warn!("Cue {:?} couldn't pause: {:#?}", cue, err);
            });
            sound.set_current_time(0.0);
        }
    }
}

//! Session orchestration: one `Session` owns every state cluster and runs
//! the fixed per-frame sequence; `Night` pairs it with the loaded assets
//! and the sound bank for rendering and playback.

use crate::browser;
use crate::camera::{Monitor, HUD_TOGGLE};
use crate::clock::NightClock;
use crate::engine::audio::{Cue, Playback, SoundBank};
use crate::engine::input::FrameInput;
use crate::engine::{self, Game, Point, Rect, Renderer, TextAlign, VIEW_HEIGHT, VIEW_WIDTH};
use crate::office::Office;
use crate::power::PowerMeter;
use crate::roster;
use crate::scare::{JumpScare, ScareConfig};
use crate::sprite::{self, rooms::RoomManifest};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use futures::try_join;
use rand::rngs::ThreadRng;
use web_sys::HtmlImageElement;

/// The office backdrop is wider than the viewport; the cursor slides the
/// visible window across it.
const OFFICE_BG_WIDTH: f32 = 1600.0;

/// Left door panel's inner edge in office space; the sprite is mirrored
/// from the right-door art.
const LEFT_DOOR_EDGE: f32 = 300.0;
const RIGHT_DOOR_X: f32 = 1300.0;

const EARLY_AMBIENCE_VOLUME: f64 = 0.3;
const MIDNIGHT_AMBIENCE_VOLUME: f64 = 0.5;
/// The opening ambience hands over to the mid-night loop after this long.
const AMBIENCE_SWITCH_MS: f64 = 12_000.0;

const HUD_FONT: &str = "20px Consolas";
const LABEL_FONT: &str = "24px Consolas";

fn parallax_offset(cursor_x: f32) -> f32 {
    (cursor_x / VIEW_WIDTH).clamp(0.0, 1.0) * (OFFICE_BG_WIDTH - VIEW_WIDTH)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ambience {
    Early,
    Midnight,
    Silenced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    pub night_complete: bool,
}

/// All mutable game state for one night. Owns no canvas, images or audio
/// elements; playback requests and the night-complete signal surface as
/// data for the shell to act on.
pub struct Session {
    player: String,
    night: u32,
    rooms: RoomManifest,
    office: Office,
    power: PowerMeter,
    monitor: Monitor,
    clock: NightClock,
    scare: JumpScare,
    scare_config: ScareConfig,
    rng: ThreadRng,
    ambience: Ambience,
    started_ms: f64,
    bg_offset: f32,
    playback: Vec<Playback>,
}

impl Session {
    pub fn new(player: String, night: u32, rooms: RoomManifest, now_ms: f64) -> Self {
        let monitor = Monitor::new(rooms.len());
        Session {
            player,
            night,
            rooms,
            office: Office::new(),
            power: PowerMeter::new(now_ms),
            monitor,
            clock: NightClock::new(now_ms),
            scare: JumpScare::new(),
            scare_config: ScareConfig::default(),
            rng: rand::thread_rng(),
            ambience: Ambience::Early,
            started_ms: now_ms,
            bg_offset: 0.0,
            playback: vec![Playback::Loop(Cue::EarlyAmbience, EARLY_AMBIENCE_VOLUME)],
        }
    }

    /// One frame: route input, advance every state machine in fixed order.
    pub fn update(&mut self, frame: &FrameInput) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        self.bg_offset = parallax_offset(frame.cursor_x);

        // once the night is won or the room has gone dark, the session only
        // holds its final picture
        if self.clock.has_ended() || self.scare.is_dark() {
            return outcome;
        }

        for click in &frame.clicks {
            self.handle_click(click);
        }
        for key in &frame.keys {
            self.monitor
                .handle_key(key, self.rooms.len(), &mut self.playback);
        }

        self.office.tick();
        self.monitor.tick();
        self.monitor.update_pan(&self.rooms, frame.delta_ms);

        self.power
            .set_usage(self.office.active_features() + usize::from(self.monitor.is_open()));
        if self.power.drain(frame.now_ms) {
            self.black_out(frame.now_ms);
        }
        self.scare.tick(
            frame.now_ms,
            &self.scare_config,
            &mut self.rng,
            &mut self.playback,
        );

        if self.ambience == Ambience::Early
            && !self.power.is_depleted()
            && frame.now_ms - self.started_ms >= AMBIENCE_SWITCH_MS
        {
            self.playback.push(Playback::Stop(Cue::EarlyAmbience));
            self.playback
                .push(Playback::Loop(Cue::MidnightAmbience, MIDNIGHT_AMBIENCE_VOLUME));
            self.ambience = Ambience::Midnight;
        }

        if self.clock.tick(frame.now_ms) && !self.scare.is_dark() {
            outcome.night_complete = true;
            self.silence_ambience();
            self.playback.push(Playback::Play(Cue::Bells));
        }

        outcome
    }

    fn handle_click(&mut self, click: &Point) {
        let power_out = self.power.is_depleted();
        // the office wall scrolls with the parallax; switches are hit-tested
        // in office space
        let office_point = Point {
            x: click.x + self.bg_offset,
            y: click.y,
        };
        self.office
            .handle_click(&office_point, power_out, &mut self.playback);
        if HUD_TOGGLE.contains(click) {
            self.monitor.toggle(power_out, &mut self.playback);
        }
        self.monitor
            .handle_map_click(click, &self.rooms, &mut self.playback);
    }

    fn black_out(&mut self, now_ms: f64) {
        self.office.black_out(&mut self.playback);
        self.monitor.force_shut();
        self.silence_ambience();
        self.playback.push(Playback::Play(Cue::PowerDown));
        self.scare.arm(now_ms, &self.scare_config, &mut self.rng);
    }

    fn silence_ambience(&mut self) {
        match self.ambience {
            Ambience::Early => self.playback.push(Playback::Stop(Cue::EarlyAmbience)),
            Ambience::Midnight => self.playback.push(Playback::Stop(Cue::MidnightAmbience)),
            Ambience::Silenced => {}
        }
        self.ambience = Ambience::Silenced;
    }

    pub fn drain_playback(&mut self) -> Vec<Playback> {
        std::mem::take(&mut self.playback)
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn night(&self) -> u32 {
        self.night
    }

    pub fn rooms(&self) -> &RoomManifest {
        &self.rooms
    }

    pub fn office(&self) -> &Office {
        &self.office
    }

    pub fn power(&self) -> &PowerMeter {
        &self.power
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    pub fn clock(&self) -> &NightClock {
        &self.clock
    }

    pub fn scare(&self) -> &JumpScare {
        &self.scare
    }

    pub fn bg_offset(&self) -> f32 {
        self.bg_offset
    }
}

/// Button plate sprites for one side of the office.
pub struct ButtonPlate {
    idle: HtmlImageElement,
    door_on: HtmlImageElement,
    light_on: HtmlImageElement,
    both_on: HtmlImageElement,
}

impl ButtonPlate {
    async fn load(side: &str) -> Result<Self> {
        let idle_path = format!("sprites/buttons/{}_idle.png", side);
        let door_on_path = format!("sprites/buttons/{}_door_on.png", side);
        let light_on_path = format!("sprites/buttons/{}_light_on.png", side);
        let both_on_path = format!("sprites/buttons/{}_both_on.png", side);
        let (idle, door_on, light_on, both_on) = try_join!(
            engine::load_image(&idle_path),
            engine::load_image(&door_on_path),
            engine::load_image(&light_on_path),
            engine::load_image(&both_on_path),
        )
        .with_context(|| format!("Failed to load {} button plate sprites", side))?;
        Ok(ButtonPlate {
            idle,
            door_on,
            light_on,
            both_on,
        })
    }

    fn pick(&self, door: bool, light: bool) -> &HtmlImageElement {
        match (door, light) {
            (true, true) => &self.both_on,
            (true, false) => &self.door_on,
            (false, true) => &self.light_on,
            (false, false) => &self.idle,
        }
    }
}

/// Every image the night needs, loaded up front so draw code never has to
/// ask whether a resource is ready.
pub struct Assets {
    office: HtmlImageElement,
    office_dark: HtmlImageElement,
    office_scare: HtmlImageElement,
    lit_left: HtmlImageElement,
    lit_right: HtmlImageElement,
    buttons_left: ButtonPlate,
    buttons_right: ButtonPlate,
    doors: HtmlImageElement,
    lift: HtmlImageElement,
    static_noise: HtmlImageElement,
    hud_bar: HtmlImageElement,
    monitor_border: HtmlImageElement,
    monitor_dot: HtmlImageElement,
    monitor_map: HtmlImageElement,
    rooms: Vec<HtmlImageElement>,
}

impl Assets {
    async fn load(manifest: &RoomManifest) -> Result<Self> {
        let (office, office_dark, office_scare) = try_join!(
            engine::load_image("sprites/office/backdrop.png"),
            engine::load_image("sprites/office/blackout.png"),
            engine::load_image("sprites/office/intruder.png"),
        )
        .context("Failed to load office backdrops")?;

        let (lit_left, lit_right, doors) = try_join!(
            engine::load_image("sprites/office/lit_left.png"),
            engine::load_image("sprites/office/lit_right.png"),
            engine::load_image("sprites/office/doors.png"),
        )
        .context("Failed to load office overlays")?;

        let (buttons_left, buttons_right) =
            try_join!(ButtonPlate::load("left"), ButtonPlate::load("right"))?;

        let (lift, static_noise, hud_bar) = try_join!(
            engine::load_image("sprites/monitor/lift.png"),
            engine::load_image("sprites/monitor/static.png"),
            engine::load_image("sprites/monitor/hud_bar.png"),
        )
        .context("Failed to load monitor sprites")?;

        let (monitor_border, monitor_dot, monitor_map) = try_join!(
            engine::load_image("sprites/monitor/border.png"),
            engine::load_image("sprites/monitor/recording_dot.png"),
            engine::load_image("sprites/monitor/map.png"),
        )
        .context("Failed to load monitor chrome")?;

        let rooms = try_join_all(
            manifest
                .rooms
                .iter()
                .map(|room| engine::load_image(&room.sheet)),
        )
        .await
        .context("Failed to load room sheets")?;

        Ok(Assets {
            office,
            office_dark,
            office_scare,
            lit_left,
            lit_right,
            buttons_left,
            buttons_right,
            doors,
            lift,
            static_noise,
            hud_bar,
            monitor_border,
            monitor_dot,
            monitor_map,
            rooms,
        })
    }
}

pub struct Night {
    session: Session,
    assets: Assets,
    sounds: SoundBank,
}

impl Night {
    fn draw(&self, renderer: &Renderer) {
        let session = &self.session;
        let screen = Rect::new(0.0, 0.0, VIEW_WIDTH, VIEW_HEIGHT);
        renderer.clear(&screen);

        let offset = session.bg_offset();
        let viewport = Rect::new(offset, 0.0, VIEW_WIDTH, VIEW_HEIGHT);

        let power_out = session.power().is_depleted();
        let scare = session.scare();
        let backdrop = if power_out {
            if scare.is_triggered() && scare.flash_on() {
                &self.assets.office_scare
            } else {
                &self.assets.office_dark
            }
        } else {
            &self.assets.office
        };
        renderer.draw_sprite(backdrop, &viewport, &screen);

        let office = session.office();
        if office.left_light {
            renderer.draw_sprite(&self.assets.lit_left, &viewport, &screen);
        } else if office.right_light {
            renderer.draw_sprite(&self.assets.lit_right, &viewport, &screen);
        }

        self.draw_doors(renderer, offset);
        self.draw_buttons(renderer, offset);
        if !power_out {
            renderer.draw_image(&self.assets.hud_bar, &Point { x: 350.0, y: 660.0 });
        }

        if session.scare().is_dark() {
            renderer.fill_rect(&screen, "rgba(0, 0, 0, 0.9)");
        }

        if session.monitor().is_visible() {
            self.draw_monitor(renderer, &screen);
        }

        if !power_out {
            self.draw_power_hud(renderer);
        }
        renderer.text(
            &format!("{} AM", session.clock().display_hour()),
            &Point { x: 1240.0, y: 40.0 },
            LABEL_FONT,
            TextAlign::Right,
        );
    }

    fn draw_doors(&self, renderer: &Renderer, offset: f32) {
        let office = self.session.office();
        let left_src = sprite::door_frame(office.left_panel.frame);
        renderer.draw_sprite_mirrored(
            &self.assets.doors,
            &left_src,
            &Rect::new(
                LEFT_DOOR_EDGE - offset - sprite::DOOR_FRAME_WIDTH,
                0.0,
                sprite::DOOR_FRAME_WIDTH,
                sprite::DOOR_FRAME_HEIGHT,
            ),
        );

        let right_src = sprite::door_frame(office.right_panel.frame);
        renderer.draw_sprite(
            &self.assets.doors,
            &right_src,
            &Rect::new(
                RIGHT_DOOR_X - offset,
                0.0,
                sprite::DOOR_FRAME_WIDTH,
                sprite::DOOR_FRAME_HEIGHT,
            ),
        );
    }

    fn draw_buttons(&self, renderer: &Renderer, offset: f32) {
        let office = self.session.office();
        renderer.draw_image(
            self.assets
                .buttons_left
                .pick(office.left_door, office.left_light),
            &Point {
                x: 1.0 - offset,
                y: 250.0,
            },
        );
        renderer.draw_image(
            self.assets
                .buttons_right
                .pick(office.right_door, office.right_light),
            &Point {
                x: 1480.0 - offset,
                y: 250.0,
            },
        );
    }

    fn draw_monitor(&self, renderer: &Renderer, screen: &Rect) {
        let session = &self.session;
        let monitor = session.monitor();
        renderer.draw_sprite(
            &self.assets.lift,
            &sprite::lift_frame(monitor.lift_frame()),
            screen,
        );

        if !monitor.is_open() {
            return;
        }

        let index = monitor.room_index();
        let room = &session.rooms().rooms[index];
        renderer.draw_sprite(
            &self.assets.rooms[index],
            &Rect::new(monitor.pan_offset(index), 0.0, VIEW_WIDTH, VIEW_HEIGHT),
            screen,
        );
        renderer.draw_sprite_with_alpha(
            &self.assets.static_noise,
            &sprite::static_frame(monitor.static_frame()),
            screen,
            sprite::STATIC_ALPHA,
        );

        renderer.text(
            &room.name,
            &Point { x: 900.0, y: 250.0 },
            LABEL_FONT,
            TextAlign::Left,
        );
        renderer.draw_image(&self.assets.monitor_dot, &Point { x: 40.0, y: 40.0 });
        renderer.draw_image(&self.assets.monitor_border, &Point { x: 0.0, y: 0.0 });
        renderer.draw_image(&self.assets.monitor_map, &Point { x: 800.0, y: 300.0 });
        renderer.draw_image(&self.assets.hud_bar, &Point { x: 350.0, y: 660.0 });
    }

    fn draw_power_hud(&self, renderer: &Renderer) {
        let power = self.session.power();
        renderer.text(
            &format!("POWER: {}%", power.remaining().floor()),
            &Point { x: 200.0, y: 650.0 },
            HUD_FONT,
            TextAlign::Right,
        );
        renderer.text(
            &format!("USAGE: {}", power.usage_level() + 1),
            &Point { x: 300.0, y: 650.0 },
            HUD_FONT,
            TextAlign::Right,
        );

        for pip in 0..4 {
            let style = if pip < power.usage_level() {
                "#0f0"
            } else {
                "#444"
            };
            renderer.fill_rect(
                &Rect::new(200.0 + pip as f32 * 25.0, 680.0, 20.0, 20.0),
                style,
            );
        }
    }
}

pub enum NightShift {
    /// Resources are still on their way; transitions to `Loaded` once
    /// initialization completes.
    Loading { player: String },
    Loaded(Night),
}

impl NightShift {
    const MANIFEST_PATH: &'static str = "rooms.json";

    pub fn new(player: String) -> Self {
        NightShift::Loading { player }
    }
}

#[async_trait(?Send)]
impl Game for NightShift {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            NightShift::Loading { player } => {
                let rooms = browser::fetch_json::<RoomManifest>(Self::MANIFEST_PATH)
                    .await
                    .with_context(|| {
                        format!("Failed to load room manifest from : {}", Self::MANIFEST_PATH)
                    })?;
                rooms.validate()?;

                let assets = Assets::load(&rooms).await?;
                let sounds = SoundBank::new()?;

                let mut roster = roster::load();
                let night = roster.night_for(player);
                roster.set_night(player, night);
                if let Err(err) = roster::save(&roster) {
                    warn!("Could not persist roster: {:#?}", err);
                }
                log!("Night {} begins for {}", night, player);

                let session = Session::new(player.clone(), night, rooms, browser::now()?);
                Ok(Box::new(NightShift::Loaded(Night {
                    session,
                    assets,
                    sounds,
                })))
            }
            NightShift::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn update(&mut self, frame: &FrameInput) {
        if let NightShift::Loaded(night) = self {
            let outcome = night.session.update(frame);
            for playback in night.session.drain_playback() {
                night.sounds.run(playback);
            }
            if outcome.night_complete {
                let mut roster = roster::load();
                roster.set_night(night.session.player(), night.session.night() + 1);
                if let Err(err) = roster::save(&roster) {
                    warn!("Could not persist roster: {:#?}", err);
                }
                log!(
                    "{} survived night {}",
                    night.session.player(),
                    night.session.night()
                );
            }
        }
    }

    fn draw(&self, renderer: &Renderer) {
        if let NightShift::Loaded(night) = self {
            night.draw(renderer);
        }
    }
}

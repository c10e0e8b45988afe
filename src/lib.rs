#[macro_use]
mod browser;
mod animation;
mod camera;
mod clock;
mod engine;
mod game;
mod office;
mod power;
mod roster;
mod scare;
mod sprite;

use engine::GameLoop;
use game::NightShift;
use wasm_bindgen::prelude::*;

/// Main entry for the WebAssembly module; the page calls this once on
/// load, before any night starts.
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();
    Ok(())
}

/// Boot a night for the named guard. Called by the menu once a name has
/// been entered; the game loop runs until the tab closes.
#[wasm_bindgen]
pub fn start_night(player: String) -> Result<(), JsValue> {
    browser::spawn_local(async move {
        if let Err(err) = GameLoop::start(NightShift::new(player)).await {
            error!("Could not start the night: {:#?}", err);
        }
    });

    Ok(())
}

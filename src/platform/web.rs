//! Browser bindings
//!
//! The page owns the canvas, image loading and the animation frame loop.
//! It calls `tick` once per frame and draws from `state_json`.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::best_score::LocalStorageStore;
use crate::config::GameConfig;
use crate::game::{Game, InputEvent};
use crate::sim::GamePhase;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("arcade-sim loaded");
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game<LocalStorageStore>,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game for a named variant sized to the canvas
    #[wasm_bindgen(constructor)]
    pub fn new(variant: &str, width: f32, height: f32) -> Result<WebGame, JsValue> {
        let config = GameConfig::from_name(variant)
            .ok_or_else(|| JsValue::from_str(&format!("unknown variant '{variant}'")))?
            .with_bounds(Vec2::new(width, height));
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
        let game = Game::new(config, LocalStorageStore, seed).map_err(to_js)?;
        Ok(WebGame { game })
    }

    /// Create a game from a JSON config document
    pub fn from_config(json: &str) -> Result<WebGame, JsValue> {
        let config = GameConfig::from_json(json).map_err(to_js)?;
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
        let game = Game::new(config, LocalStorageStore, seed).map_err(to_js)?;
        Ok(WebGame { game })
    }

    /// Names of images the page still has to load
    pub fn pending_assets(&self) -> Vec<String> {
        self.game.assets().pending()
    }

    pub fn asset_loaded(&mut self, name: &str) -> bool {
        self.game.asset_loaded(name)
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        self.game.start().map_err(to_js)
    }

    /// Forward a key or pointer event: "left", "right", "action", "start",
    /// "restart" or "pointer" (with coordinates)
    pub fn handle_input(&mut self, name: &str, x: f32, y: f32) -> Result<(), JsValue> {
        let event = match name {
            "left" => InputEvent::MoveLeft,
            "right" => InputEvent::MoveRight,
            "action" => InputEvent::JumpOrShoot,
            "start" => InputEvent::Start,
            "restart" => InputEvent::Restart,
            "pointer" => InputEvent::Pointer { x, y },
            other => return Err(JsValue::from_str(&format!("unknown input '{other}'"))),
        };
        self.game.handle_input(event).map_err(to_js)
    }

    /// End the run now, for variants that never end on their own
    pub fn abandon(&mut self) {
        self.game.abandon();
    }

    /// Advance one frame and return the phase name
    pub fn tick(&mut self) -> String {
        match self.game.tick() {
            GamePhase::Idle => "idle",
            GamePhase::Running => "running",
            GamePhase::GameOver => "game_over",
        }
        .to_string()
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.state()).map_err(to_js)
    }
}

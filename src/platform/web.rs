//! Browser entry points
//!
//! The page owns the canvas and the animation loop; it forwards key events
//! and calls `tick` once per frame, then reads the HUD as JSON and the lit
//! points straight out of wasm memory.

use wasm_bindgen::prelude::*;

use super::input::KeyState;
use crate::consts::DEFAULT_SEED;
use crate::settings::Settings;
use crate::sim::{GameState, tick};
use crate::tuning::Tuning;
use crate::view::{HudSnapshot, PointInstance, collect_lit_points};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Night radar (web) starting...");
}

/// Game instance holding all state
#[wasm_bindgen]
pub struct RadarGame {
    state: GameState,
    keys: KeyState,
    settings: Settings,
    instances: Vec<PointInstance>,
}

#[wasm_bindgen]
impl RadarGame {
    /// `seed` of 0 picks the default cave. `tuning_json` may be empty.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, tuning_json: &str) -> Result<RadarGame, JsValue> {
        let seed = if seed == 0 { DEFAULT_SEED } else { seed };
        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };

        let settings = Settings::load();
        let mut state = GameState::with_tuning(seed, tuning);
        state.apply_settings(&settings);

        Ok(Self {
            state,
            keys: KeyState::new(),
            settings,
            instances: Vec::new(),
        })
    }

    /// Forward a `keydown` by `KeyboardEvent.code`
    pub fn key_down(&mut self, code: &str) {
        self.keys.key_down(code, self.state.mode);
    }

    pub fn key_up(&mut self, code: &str) {
        self.keys.key_up(code);
    }

    /// Call on window blur so no key stays stuck down
    pub fn release_keys(&mut self) {
        self.keys.release_all();
    }

    /// Advance by `dt` seconds and refresh the point buffer
    pub fn tick(&mut self, dt: f32) {
        let input = self.keys.take_input();
        tick(&mut self.state, &input, dt);
        collect_lit_points(&self.state, &mut self.instances);
    }

    pub fn hud_json(&self) -> String {
        HudSnapshot::capture(&self.state)
            .to_json()
            .unwrap_or_else(|e| {
                log::warn!("HUD serialization failed: {}", e);
                String::from("{}")
            })
    }

    /// Start of the lit point buffer, `PointInstance::STRIDE` bytes apart
    pub fn points_ptr(&self) -> *const f32 {
        self.instances.as_ptr().cast()
    }

    /// Number of instances in the point buffer
    pub fn points_len(&self) -> usize {
        self.instances.len()
    }

    pub fn point_stride(&self) -> usize {
        PointInstance::STRIDE
    }

    /// Quality preset by name ("low", "medium", "high"); persisted
    pub fn set_quality(&mut self, name: &str) {
        let Some(preset) = crate::QualityPreset::from_str(name) else {
            log::warn!("Unknown quality preset: {}", name);
            return;
        };
        self.settings.apply_preset(preset);
        self.state.apply_settings(&self.settings);
        self.settings.save();
    }

    pub fn set_reduced_motion(&mut self, on: bool) {
        self.settings.reduced_motion = on;
        self.state.apply_settings(&self.settings);
        self.settings.save();
    }
}

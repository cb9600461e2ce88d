//! Keyboard state
//!
//! Held keys become flight controls; presses become one-shot intents. What a
//! press means depends on the mode it lands in, e.g. Space begins on the
//! title screen, pings in flight and confirms in the pause menu.

use std::collections::HashSet;

use crate::sim::{FlightControls, GameMode, TickInput};

const UP: &[&str] = &["ArrowUp", "KeyW"];
const DOWN: &[&str] = &["ArrowDown", "KeyS"];
const LEFT: &[&str] = &["ArrowLeft", "KeyA"];
const RIGHT: &[&str] = &["ArrowRight", "KeyD"];
const ABILITY: &[&str] = &["KeyE", "ShiftLeft", "ShiftRight"];

/// Keys currently held plus intents pressed since the last frame
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<String>,
    pending: TickInput,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.held.contains(code)
    }

    fn any_held(&self, codes: &[&str]) -> bool {
        codes.iter().any(|c| self.held.contains(*c))
    }

    /// Record a key press. `mode` is the mode the game is in right now.
    pub fn key_down(&mut self, code: &str, mode: GameMode) {
        self.held.insert(code.to_owned());

        if code == "Escape" {
            self.pending.pause = true;
            return;
        }

        if mode == GameMode::Paused {
            if UP.contains(&code) {
                self.pending.menu_up = true;
            } else if DOWN.contains(&code) {
                self.pending.menu_down = true;
            } else if code == "Space" || code == "Enter" {
                self.pending.menu_confirm = true;
            }
            return;
        }

        match code {
            "Space" => match mode {
                GameMode::Start | GameMode::Crash => self.pending.begin = true,
                GameMode::Play => self.pending.fire = true,
                GameMode::Paused => {}
            },
            "Enter" if mode != GameMode::Play => self.pending.begin = true,
            "KeyP" if mode == GameMode::Play => self.pending.pause = true,
            "KeyI" => {
                self.pending.autopilot = !self.pending.autopilot;
                log::info!("Autopilot: {}", self.pending.autopilot);
            }
            c if ABILITY.contains(&c) && mode == GameMode::Play => self.pending.ability = true,
            _ => {}
        }
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.remove(code);
    }

    /// Drop every held key, e.g. when the page loses focus
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Input for the next tick. One-shot intents are consumed; held keys and
    /// the autopilot toggle persist.
    pub fn take_input(&mut self) -> TickInput {
        let controls = FlightControls {
            up: self.any_held(UP),
            down: self.any_held(DOWN),
            left: self.any_held(LEFT),
            right: self.any_held(RIGHT),
        };
        let autopilot = self.pending.autopilot;
        let mut input = std::mem::take(&mut self.pending);
        self.pending.autopilot = autopilot;
        input.controls = controls;
        input
    }
}

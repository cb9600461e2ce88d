//! Game state and mode transitions
//!
//! `GameState` is the whole simulation context. Hosts own one, mutate it only
//! through `tick` and the intent methods below, and read it for drawing.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{Effects, SHAKE_CRASH, SHAKE_FIRE, SHAKE_FIREBALL};
use super::noise::NoiseField;
use super::pickup::PickupField;
use super::player::Player;
use super::points::PointCloud;
use super::pulse::Pulses;
use super::tunnel::TunnelSurface;
use crate::settings::Settings;
use crate::tuning::{ResourceTuning, Tuning};

/// Current mode of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Title screen, waiting for a begin intent
    Start,
    /// Flying
    Play,
    /// Frozen with the pause menu open
    Paused,
    /// Crashed, walls revealed, counting down
    Crash,
}

/// Pause menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PauseOption {
    Resume,
    Restart,
    MainMenu,
}

impl PauseOption {
    const ALL: [PauseOption; 3] = [PauseOption::Resume, PauseOption::Restart, PauseOption::MainMenu];

    pub fn index(self) -> usize {
        match self {
            PauseOption::Resume => 0,
            PauseOption::Restart => 1,
            PauseOption::MainMenu => 2,
        }
    }

    /// Step through the menu, wrapping at both ends
    pub fn step(self, delta: i32) -> Self {
        let len = Self::ALL.len() as i32;
        let i = (self.index() as i32 + delta).rem_euclid(len);
        Self::ALL[i as usize]
    }
}

/// Plasma, ability meter and invulnerability timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resources {
    /// Plasma available for pulses
    pub energy: f32,
    /// Ability meter, 0..=1
    pub meter: f32,
    /// Seconds of cloak left
    pub cloak_timer: f32,
    /// Seconds of pickup shield left
    pub shield_timer: f32,
    /// Fireball charge waiting for the next ping
    pub fireball_ready: bool,
}

impl Resources {
    pub fn full(t: &ResourceTuning) -> Self {
        Self {
            energy: t.energy_max,
            meter: 0.0,
            cloak_timer: 0.0,
            shield_timer: 0.0,
            fireball_ready: false,
        }
    }

    pub fn cloak_active(&self) -> bool {
        self.cloak_timer > 0.0
    }

    pub fn invulnerable(&self) -> bool {
        self.cloak_timer > 0.0 || self.shield_timer > 0.0
    }

    pub fn tick_timers(&mut self, dt: f32) {
        self.cloak_timer = (self.cloak_timer - dt).max(0.0);
        self.shield_timer = (self.shield_timer - dt).max(0.0);
    }
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for the cave, points and pickups
    pub seed: u64,
    pub tuning: Tuning,
    pub tunnel: TunnelSurface,
    pub points: PointCloud,
    pub pulses: Pulses,
    pub player: Player,
    pub resources: Resources,
    pub pickups: PickupField,
    /// Cosmetic only
    pub effects: Effects,
    pub mode: GameMode,
    pub score: u64,
    /// Best score this process
    pub high_score: u64,
    /// Forward distance flown this run
    pub scroll: f32,
    /// Seconds until a crash can be restarted
    pub crash_timer: f32,
    /// Activation floor applied while crashed
    pub flood_level: f32,
    pub pause_selection: PauseOption,
    /// Last distance-to-wall ratio seen by the wall probe
    pub tightness: f32,
    /// Gameplay RNG (pickups); reseeded from `seed` on every run
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game state; `tuning` is expected to be validated
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tunnel = TunnelSurface::new(NoiseField::from_run_seed(seed), tuning.tunnel.clone());
        let mut rng = Pcg32::seed_from_u64(seed);
        let points = PointCloud::generate(&tunnel, &tuning.points, &mut rng);

        log::info!(
            "New game: seed={} points={} base_radius={}",
            seed,
            points.len(),
            tuning.tunnel.base_radius
        );

        Self {
            seed,
            resources: Resources::full(&tuning.resources),
            pickups: PickupField::new(&tuning.pickups),
            tunnel,
            points,
            pulses: Pulses::new(),
            player: Player::new(),
            effects: Effects::new(),
            mode: GameMode::Start,
            score: 0,
            high_score: 0,
            scroll: 0.0,
            crash_timer: 0.0,
            flood_level: 0.0,
            pause_selection: PauseOption::Resume,
            tightness: 0.0,
            rng,
            tuning,
        }
    }

    /// Apply player preferences; a point-count change rebuilds the cloud
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.effects.set_shake_enabled(settings.effective_screen_shake());
        self.effects.set_trail_enabled(settings.trails);

        let count = settings.point_count();
        if count != self.tuning.points.count {
            self.tuning.points.count = count;
            self.reset_run();
        }
    }

    /// Put every per-run value back to its initial state. Keeps `high_score`
    /// and the cave itself.
    pub fn reset_run(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.points = PointCloud::generate(&self.tunnel, &self.tuning.points, &mut self.rng);
        self.pulses.clear();
        self.player = Player::new();
        self.resources = Resources::full(&self.tuning.resources);
        self.pickups = PickupField::new(&self.tuning.pickups);
        self.effects.clear();
        self.score = 0;
        self.scroll = 0.0;
        self.crash_timer = 0.0;
        self.flood_level = 0.0;
        self.tightness = 0.0;
        self.pause_selection = PauseOption::Resume;
    }

    fn start_run(&mut self) {
        self.reset_run();
        self.pickups
            .spawn_ahead(&self.tunnel, self.scroll, &self.tuning.pickups, &mut self.rng);
        self.mode = GameMode::Play;
        log::info!("Run started (best {})", self.high_score);
    }

    /// Start from the title screen, or restart once a crash has played out
    pub fn begin_or_restart(&mut self) {
        match self.mode {
            GameMode::Start => self.start_run(),
            GameMode::Crash if self.crash_timer <= 0.0 => self.start_run(),
            GameMode::Crash => log::debug!("Restart ignored: crash countdown running"),
            GameMode::Play | GameMode::Paused => {}
        }
    }

    /// Launch a sonar pulse from the glider
    pub fn fire_pulse(&mut self) {
        if self.mode != GameMode::Play {
            return;
        }
        let origin = Vec3::new(self.player.pos.x, self.player.pos.y, self.scroll);
        match self
            .pulses
            .fire(origin, &mut self.resources.energy, &self.tuning.pulse)
        {
            Ok(()) if self.resources.fireball_ready => {
                // Charge is kept if the fireball has no free slot
                match self.pulses.fire_fireball(origin, &self.tuning.pulse) {
                    Ok(()) => {
                        self.resources.fireball_ready = false;
                        self.effects.kick(SHAKE_FIREBALL);
                    }
                    Err(reason) => {
                        log::debug!("Fireball held: {:?}", reason);
                        self.effects.kick(SHAKE_FIRE);
                    }
                }
            }
            Ok(()) => self.effects.kick(SHAKE_FIRE),
            Err(reason) => log::debug!("Pulse refused: {:?}", reason),
        }
    }

    /// Spend a full meter on a cloak
    pub fn activate_ability(&mut self) {
        if self.mode != GameMode::Play || self.resources.meter < 1.0 {
            log::debug!("Ability refused (mode {:?}, meter {:.2})", self.mode, self.resources.meter);
            return;
        }
        self.resources.meter = 0.0;
        self.resources.cloak_timer = self.tuning.resources.cloak_duration;
        log::info!("Cloak engaged for {:.1}s", self.resources.cloak_timer);
    }

    /// Play <-> Paused
    pub fn toggle_pause(&mut self) {
        match self.mode {
            GameMode::Play => {
                self.mode = GameMode::Paused;
                self.pause_selection = PauseOption::Resume;
            }
            GameMode::Paused => self.mode = GameMode::Play,
            _ => {}
        }
    }

    /// Move the pause menu cursor
    pub fn menu_move(&mut self, delta: i32) {
        if self.mode == GameMode::Paused {
            self.pause_selection = self.pause_selection.step(delta);
        }
    }

    /// Activate the selected pause menu entry
    pub fn menu_confirm(&mut self) {
        if self.mode != GameMode::Paused {
            return;
        }
        match self.pause_selection {
            PauseOption::Resume => self.mode = GameMode::Play,
            PauseOption::Restart => self.start_run(),
            PauseOption::MainMenu => self.return_to_menu(),
        }
    }

    /// Abandon the run and show the title screen
    pub fn return_to_menu(&mut self) {
        if self.mode == GameMode::Start {
            return;
        }
        self.reset_run();
        self.mode = GameMode::Start;
        log::info!("Returned to menu");
    }

    /// Crash the glider. No-op when already crashed.
    pub fn enter_crash(&mut self) {
        if self.mode == GameMode::Crash {
            return;
        }
        self.mode = GameMode::Crash;
        self.high_score = self.high_score.max(self.score);
        self.crash_timer = self.tuning.crash.duration;
        self.flood_level = 1.0;
        self.effects.kick(SHAKE_CRASH);
        log::info!("Crashed at score {} (best {})", self.score, self.high_score);
    }

    /// Plasma as a fraction of max
    pub fn energy_ratio(&self) -> f32 {
        (self.resources.energy / self.tuning.resources.energy_max).clamp(0.0, 1.0)
    }

    /// Crash countdown as a fraction, 1 right after impact
    pub fn crash_ratio(&self) -> f32 {
        if self.mode == GameMode::Crash {
            (self.crash_timer / self.tuning.crash.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_state(seed: u64) -> GameState {
        let mut tuning = Tuning::default();
        tuning.points.count = 500;
        GameState::with_tuning(seed, tuning)
    }

    #[test]
    fn test_new_state_waits_on_start() {
        let state = small_state(1);
        assert_eq!(state.mode, GameMode::Start);
        assert_eq!(state.score, 0);
        assert_eq!(state.points.len(), 500);
        assert_eq!(state.energy_ratio(), 1.0);
    }

    #[test]
    fn test_begin_enters_play() {
        let mut state = small_state(1);
        state.begin_or_restart();
        assert_eq!(state.mode, GameMode::Play);
        assert!(!state.pickups.is_empty());
    }

    #[test]
    fn test_fire_only_in_play() {
        let mut state = small_state(1);
        state.fire_pulse();
        assert!(state.pulses.is_empty());
        state.begin_or_restart();
        state.fire_pulse();
        assert_eq!(state.pulses.len(), 1);
        assert_eq!(
            state.resources.energy,
            state.tuning.resources.energy_max - state.tuning.pulse.cost
        );
    }

    #[test]
    fn test_fireball_charge_spent_on_next_ping() {
        let mut state = small_state(1);
        state.begin_or_restart();
        state.resources.fireball_ready = true;
        state.fire_pulse();
        assert_eq!(state.pulses.len(), 2);
        assert!(!state.resources.fireball_ready);
        assert_eq!(state.pulses.iter().filter(|p| p.fireball).count(), 1);
        assert_eq!(
            state.resources.energy,
            state.tuning.resources.energy_max - state.tuning.pulse.cost
        );

        state.fire_pulse();
        assert_eq!(state.pulses.len(), 3);
        assert_eq!(state.pulses.iter().filter(|p| p.fireball).count(), 1);
    }

    #[test]
    fn test_ability_needs_full_meter() {
        let mut state = small_state(1);
        state.resources.meter = 1.0;
        state.activate_ability();
        assert!(!state.resources.cloak_active(), "not in play yet");

        state.begin_or_restart();
        state.resources.meter = 0.99;
        state.activate_ability();
        assert!(!state.resources.cloak_active());

        state.resources.meter = 1.0;
        state.activate_ability();
        assert!(state.resources.cloak_active());
        assert_eq!(state.resources.meter, 0.0);
        assert!(state.resources.invulnerable());
    }

    #[test]
    fn test_crash_is_idempotent_and_captures_high_score() {
        let mut state = small_state(1);
        state.begin_or_restart();
        state.score = 42;
        state.enter_crash();
        assert_eq!(state.mode, GameMode::Crash);
        assert_eq!(state.high_score, 42);

        state.crash_timer = 0.5;
        state.score = 99;
        state.enter_crash();
        assert_eq!(state.crash_timer, 0.5);
        assert_eq!(state.high_score, 42);
    }

    #[test]
    fn test_restart_waits_for_countdown() {
        let mut state = small_state(1);
        state.begin_or_restart();
        state.enter_crash();
        state.begin_or_restart();
        assert_eq!(state.mode, GameMode::Crash);
        state.crash_timer = 0.0;
        state.begin_or_restart();
        assert_eq!(state.mode, GameMode::Play);
    }

    #[test]
    fn test_pause_menu_flow() {
        let mut state = small_state(1);
        state.begin_or_restart();
        state.toggle_pause();
        assert_eq!(state.mode, GameMode::Paused);
        assert_eq!(state.pause_selection, PauseOption::Resume);

        state.menu_move(-1);
        assert_eq!(state.pause_selection, PauseOption::MainMenu);
        state.menu_move(1);
        state.menu_move(1);
        assert_eq!(state.pause_selection, PauseOption::Restart);

        state.scroll = 50.0;
        state.menu_confirm();
        assert_eq!(state.mode, GameMode::Play);
        assert_eq!(state.scroll, 0.0);

        state.toggle_pause();
        state.menu_move(2);
        state.menu_confirm();
        assert_eq!(state.mode, GameMode::Start);
    }

    #[test]
    fn test_reset_keeps_cave_and_high_score() {
        let mut state = small_state(5);
        let r_before = state.tunnel.radius(1.0, 10.0);
        let zs_before = state.points.zs().to_vec();
        state.high_score = 10;
        state.begin_or_restart();
        state.enter_crash();
        state.crash_timer = 0.0;
        state.begin_or_restart();
        assert_eq!(state.tunnel.radius(1.0, 10.0), r_before);
        assert_eq!(state.points.zs(), &zs_before[..]);
        assert_eq!(state.high_score, 10);
    }
}

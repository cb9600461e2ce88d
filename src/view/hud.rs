//! HUD snapshot
//!
//! A flat, serializable copy of what the overlay draws. The web host ships it
//! across the wasm boundary as JSON once per frame.

use serde::{Deserialize, Serialize};

use crate::sim::{GameMode, GameState, PickupKind};

/// Glider pose for drawing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerPose {
    pub x: f32,
    pub y: f32,
    pub roll: f32,
    pub stretch: f32,
}

/// A pickup relative to the player's depth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickupMarker {
    pub kind: PickupKind,
    pub position: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub mode: GameMode,
    pub score: u64,
    pub high_score: u64,
    /// Plasma, 0..=1
    pub energy: f32,
    /// Ability meter, 0..=1
    pub meter: f32,
    pub cloak_active: bool,
    pub invulnerable: bool,
    pub fireball_ready: bool,
    /// 1 right after a crash, 0 once a restart is allowed
    pub crash_countdown: f32,
    /// Highlighted pause menu row
    pub pause_selection: usize,
    pub shake: f32,
    pub pose: PlayerPose,
    pub pickups: Vec<PickupMarker>,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        Self {
            mode: state.mode,
            score: state.score,
            high_score: state.high_score,
            energy: state.energy_ratio(),
            meter: state.resources.meter,
            cloak_active: state.resources.cloak_active(),
            invulnerable: state.resources.invulnerable(),
            fireball_ready: state.resources.fireball_ready,
            crash_countdown: state.crash_ratio(),
            pause_selection: state.pause_selection.index(),
            shake: state.effects.shake,
            pose: PlayerPose {
                x: player.pos.x,
                y: player.pos.y,
                roll: player.roll,
                stretch: player.stretch,
            },
            pickups: state
                .pickups
                .iter()
                .map(|p| PickupMarker {
                    kind: p.kind,
                    position: [p.pos.x, p.pos.y, p.pos.z - state.scroll],
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;

    fn state() -> GameState {
        let mut tuning = Tuning::default();
        tuning.points.count = 200;
        GameState::with_tuning(2, tuning)
    }

    #[test]
    fn test_snapshot_on_start() {
        let hud = HudSnapshot::capture(&state());
        assert_eq!(hud.mode, GameMode::Start);
        assert_eq!(hud.energy, 1.0);
        assert_eq!(hud.crash_countdown, 0.0);
        assert!(hud.pickups.is_empty());
    }

    #[test]
    fn test_snapshot_tracks_crash() {
        let mut state = state();
        state.begin_or_restart();
        state.score = 12;
        state.enter_crash();
        let hud = HudSnapshot::capture(&state);
        assert_eq!(hud.mode, GameMode::Crash);
        assert_eq!(hud.high_score, 12);
        assert_eq!(hud.crash_countdown, 1.0);
        assert!(hud.pickups.iter().all(|p| p.position[2] > 0.0));
    }

    #[test]
    fn test_snapshot_json() {
        let json = HudSnapshot::capture(&state()).to_json().unwrap();
        assert!(json.contains("\"mode\":\"Start\""));
        let back: HudSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.score, 0);
    }
}

//! Data-driven game balance
//!
//! Every gameplay constant lives here so a JSON file can override any subset
//! of them. Missing fields fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunnel shape parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelTuning {
    /// Nominal tunnel radius (world units)
    pub base_radius: f32,
    /// Minimum radius as a fraction of `base_radius`
    pub floor_fraction: f32,
    /// Circle radius in noise space for the coarse layer
    pub angular_freq_coarse: f32,
    /// Circle radius in noise space for the detail layer
    pub angular_freq_detail: f32,
    pub z_scale_coarse: f32,
    pub z_scale_detail: f32,
    pub amp_coarse: f32,
    pub amp_detail: f32,
    pub octaves_coarse: u32,
    pub octaves_detail: u32,
    /// Offset separating the detail layer from the coarse one in noise space
    pub detail_phase: f32,
    pub narrowing_base: f32,
    pub narrowing_amp: f32,
    /// Angular frequency of the pinch term along z (radians per unit)
    pub narrowing_freq: f32,
}

impl Default for TunnelTuning {
    fn default() -> Self {
        Self {
            base_radius: 12.0,
            floor_fraction: 0.15,
            angular_freq_coarse: 0.9,
            angular_freq_detail: 1.3,
            z_scale_coarse: 0.035,
            z_scale_detail: 0.09,
            amp_coarse: 0.3,
            amp_detail: 0.15,
            octaves_coarse: 4,
            octaves_detail: 3,
            detail_phase: 17.3,
            narrowing_base: 0.65,
            narrowing_amp: 0.35,
            narrowing_freq: std::f32::consts::TAU / 160.0,
        }
    }
}

/// Point cloud parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PointTuning {
    pub count: usize,
    /// Forward length covered by the cloud before it wraps
    pub repeat_length: f32,
    /// How far behind the player points are kept before recycling
    pub behind: f32,
    pub jitter_min: f32,
    pub jitter_max: f32,
    /// Per reference tick
    pub activation_decay: f32,
    /// Per reference tick
    pub sparkle_decay: f32,
}

impl Default for PointTuning {
    fn default() -> Self {
        Self {
            count: 24_000,
            repeat_length: 240.0,
            behind: 12.0,
            jitter_min: 0.8,
            jitter_max: 1.2,
            activation_decay: 0.992,
            sparkle_decay: 0.92,
        }
    }
}

/// Sonar pulse parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseTuning {
    pub cost: f32,
    /// Shell expansion speed (units/s)
    pub speed: f32,
    pub max_radius: f32,
    pub shell_width: f32,
    /// Activation added per reference tick inside the shell
    pub strong_increment: f32,
    /// Sparkle added per reference tick, scaled by the point seed
    pub sparkle_increment: f32,
    pub sparkle_cap: f32,
    /// Pulses older than this (seconds) no longer add sparkle
    pub young_age: f32,
    pub max_live: usize,
    /// Fireball pulse speed relative to `speed`
    pub fireball_speed_scale: f32,
    /// Fireball shell width relative to `shell_width`
    pub fireball_shell_scale: f32,
    /// Fireball activation relative to `strong_increment`
    pub fireball_strength: f32,
}

impl Default for PulseTuning {
    fn default() -> Self {
        Self {
            cost: 22.0,
            speed: 180.0,
            max_radius: 120.0,
            shell_width: 4.0,
            strong_increment: 0.6,
            sparkle_increment: 0.8,
            sparkle_cap: 1.0,
            young_age: 0.2,
            max_live: 8,
            fireball_speed_scale: 14.0 / 12.0,
            fireball_shell_scale: 1.5,
            fireball_strength: 1.5,
        }
    }
}

/// Glider flight parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Upward acceleration while ascending (units/s²)
    pub lift: f32,
    /// Fraction of `lift` applied downward while descending
    pub descend_factor: f32,
    /// Sideways acceleration (units/s²)
    pub thrust: f32,
    /// Vertical velocity multiplier per reference tick
    pub drag: f32,
    /// Horizontal velocity multiplier per reference tick
    pub drag_x: f32,
    /// Player is kept inside this disk around the centerline
    pub max_radius: f32,
    /// Forward speed at zero momentum (units/s)
    pub base_speed: f32,
    /// Descent speed the pool starts charging at (units/s)
    pub pool_threshold: f32,
    pub pool_gain: f32,
    pub pool_max: f32,
    /// Pool spent per second while ascending
    pub pool_spend_rate: f32,
    /// Extra lift fraction at a full pool
    pub pool_lift_boost: f32,
    /// Extra forward speed fraction at a full pool
    pub pool_speed_gain: f32,
    pub stretch_gain: f32,
    /// Per reference tick, how much of the stretch error remains
    pub stretch_ease: f32,
    pub roll_per_speed: f32,
    pub max_roll: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            gravity: 18.0,
            lift: 60.0,
            descend_factor: 0.7,
            thrust: 40.0,
            drag: 0.96,
            drag_x: 0.93,
            max_radius: 11.0,
            base_speed: 24.0,
            pool_threshold: 2.0,
            pool_gain: 1.0,
            pool_max: 10.0,
            pool_spend_rate: 4.0,
            pool_lift_boost: 0.8,
            pool_speed_gain: 1.5,
            stretch_gain: 0.3,
            stretch_ease: 0.85,
            roll_per_speed: 0.05,
            max_roll: 0.6,
        }
    }
}

/// Wall test parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionTuning {
    /// Bearings sampled across the silhouette
    pub samples: usize,
    /// Silhouette cone width (radians)
    pub cone: f32,
    /// Body clearance subtracted from the wall radius
    pub margin: f32,
}

impl Default for CollisionTuning {
    fn default() -> Self {
        Self {
            samples: 8,
            cone: 0.35,
            margin: 0.6,
        }
    }
}

/// Plasma and ability meter parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceTuning {
    pub energy_max: f32,
    /// Plasma regen per second at normal speed
    pub regen_base: f32,
    /// Plasma regen per second above `fast_speed_threshold`
    pub regen_fast: f32,
    pub fast_speed_threshold: f32,
    /// Meter fill per second while flying tight
    pub meter_fill_rate: f32,
    /// Distance-to-wall ratio that counts as tight
    pub tight_ratio: f32,
    /// Cloak invulnerability (seconds)
    pub cloak_duration: f32,
}

impl Default for ResourceTuning {
    fn default() -> Self {
        Self {
            energy_max: 100.0,
            regen_base: 5.4,
            regen_fast: 13.2,
            fast_speed_threshold: 1.5,
            meter_fill_rate: 0.25,
            tight_ratio: 0.6,
            cloak_duration: 3.0,
        }
    }
}

/// Pickup placement parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    pub spacing_min: f32,
    pub spacing_max: f32,
    /// Distance ahead of the start the first pickup sits
    pub first_offset: f32,
    /// Pickups are generated up to this far ahead of the player
    pub spawn_ahead: f32,
    /// Collection distance (3D)
    pub radius: f32,
    /// Shield invulnerability (seconds)
    pub shield_duration: f32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            spacing_min: 60.0,
            spacing_max: 100.0,
            first_offset: 50.0,
            spawn_ahead: 200.0,
            radius: 1.5,
            shield_duration: 3.0,
        }
    }
}

/// Crash sequence parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrashTuning {
    /// Countdown before restart is accepted (seconds)
    pub duration: f32,
    /// Flood level multiplier per reference tick
    pub flood_decay: f32,
}

impl Default for CrashTuning {
    fn default() -> Self {
        Self {
            duration: 80.0 / 60.0,
            flood_decay: 0.985,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub tunnel: TunnelTuning,
    pub points: PointTuning,
    pub pulse: PulseTuning,
    pub player: PlayerTuning,
    pub collision: CollisionTuning,
    pub resources: ResourceTuning,
    pub pickups: PickupTuning,
    pub crash: CrashTuning,
    /// Score per unit of forward scroll
    pub score_per_unit: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tunnel: TunnelTuning::default(),
            points: PointTuning::default(),
            pulse: PulseTuning::default(),
            player: PlayerTuning::default(),
            collision: CollisionTuning::default(),
            resources: ResourceTuning::default(),
            pickups: PickupTuning::default(),
            crash: CrashTuning::default(),
            score_per_unit: 1.0,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be > 0, got {value}")))
    }
}

fn check_unit_open(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be in (0, 1), got {value}")))
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read and parse a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        let t = &self.tunnel;
        check_positive("tunnel.base_radius", t.base_radius)?;
        check_unit_open("tunnel.floor_fraction", t.floor_fraction)?;

        let p = &self.points;
        if p.count == 0 {
            return Err(invalid("points.count", "must be at least 1"));
        }
        check_positive("points.repeat_length", p.repeat_length)?;
        if p.behind < 0.0 || p.behind >= p.repeat_length {
            return Err(invalid(
                "points.behind",
                format!("must be in [0, repeat_length), got {}", p.behind),
            ));
        }
        if p.jitter_min <= 0.0 || p.jitter_min > p.jitter_max {
            return Err(invalid("points.jitter_min", "must satisfy 0 < min <= max"));
        }
        check_unit_open("points.activation_decay", p.activation_decay)?;
        check_unit_open("points.sparkle_decay", p.sparkle_decay)?;

        let pulse = &self.pulse;
        if pulse.cost < 0.0 {
            return Err(invalid("pulse.cost", "must not be negative"));
        }
        check_positive("pulse.speed", pulse.speed)?;
        check_positive("pulse.max_radius", pulse.max_radius)?;
        check_positive("pulse.shell_width", pulse.shell_width)?;
        if pulse.max_live == 0 {
            return Err(invalid("pulse.max_live", "must be at least 1"));
        }
        check_positive("pulse.fireball_speed_scale", pulse.fireball_speed_scale)?;
        check_positive("pulse.fireball_shell_scale", pulse.fireball_shell_scale)?;

        let pl = &self.player;
        check_positive("player.max_radius", pl.max_radius)?;
        check_positive("player.base_speed", pl.base_speed)?;
        check_positive("player.pool_max", pl.pool_max)?;
        check_unit_open("player.drag", pl.drag)?;
        check_unit_open("player.drag_x", pl.drag_x)?;

        if self.collision.samples == 0 {
            return Err(invalid("collision.samples", "must be at least 1"));
        }
        check_positive("resources.energy_max", self.resources.energy_max)?;
        check_positive("crash.duration", self.crash.duration)?;
        check_unit_open("crash.flood_decay", self.crash.flood_decay)?;

        let pk = &self.pickups;
        if pk.spacing_min <= 0.0 || pk.spacing_min > pk.spacing_max {
            return Err(invalid("pickups.spacing_min", "must satisfy 0 < min <= max"));
        }
        Ok(())
    }

    /// Minimum radius the tunnel can ever report
    pub fn floor_radius(&self) -> f32 {
        self.tunnel.base_radius * self.tunnel.floor_fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Tuning::default().validate().expect("defaults must validate");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "pulse": { "cost": 25.0 } }"#).unwrap();
        assert_eq!(tuning.pulse.cost, 25.0);
        assert_eq!(tuning.pulse.max_live, PulseTuning::default().max_live);
        assert_eq!(tuning.score_per_unit, 1.0);
    }

    #[test]
    fn test_rejects_bad_floor() {
        let err = Tuning::from_json(r#"{ "tunnel": { "floor_fraction": 0.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "tunnel.floor_fraction",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_points() {
        let err = Tuning::from_json(r#"{ "points": { "count": 0 } }"#).unwrap_err();
        assert!(err.to_string().contains("points.count"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }
}

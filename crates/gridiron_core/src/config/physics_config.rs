//! Pitch, kinematics and stamina parameters.
//!
//! Units are pitch units per tick; one tick is `MatchConfig::dt` seconds.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Pitch geometry. BLUE defends `x = 0`, RED defends `x = width`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(default)]
pub struct PitchConfig {
    #[validate(range(min = 10.0, max = 10000.0))]
    pub width: f64,
    #[validate(range(min = 10.0, max = 10000.0))]
    pub height: f64,
    /// Goal mouth width, centred on `height / 2`
    #[validate(range(min = 1.0))]
    pub goal_width: f64,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self { width: 600.0, height: 400.0, goal_width: 80.0 }
    }
}

impl PitchConfig {
    /// Open y-interval of the goal mouth.
    pub fn goal_band(&self) -> (f64, f64) {
        let half = self.goal_width / 2.0;
        let mid = self.height / 2.0;
        (mid - half, mid + half)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    // === Players ===
    #[validate(range(min = 0.0, max = 100.0))]
    pub player_accel: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub player_friction: f64,
    #[validate(range(min = 0.1, max = 100.0))]
    pub max_player_speed: f64,
    /// Acceleration multiplier at full dash flag
    #[validate(range(min = 1.0, max = 5.0))]
    pub dash_multiplier: f64,

    // === Ball ===
    #[validate(range(min = 0.0, max = 1.0))]
    pub ball_friction: f64,
    #[validate(range(min = 0.1, max = 200.0))]
    pub max_ball_speed: f64,

    // === Kicks ===
    #[validate(range(min = 0.0, max = 200.0))]
    pub touch_radius: f64,
    /// Fraction of incoming ball velocity kept on a kick
    #[validate(range(min = 0.0, max = 1.0))]
    pub kick_retain: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub kick_base_impulse: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub kick_scale: f64,
    /// Control magnitude below which a player in range does not kick
    #[validate(range(min = 0.0, max = 1.0))]
    pub kick_min_control: f64,
    /// Extra impulse fraction at full kick flag
    #[validate(range(min = 0.0, max = 5.0))]
    pub kick_flag_boost: f64,

    // === Spin ===
    #[validate(range(min = 0.0, max = 1.0))]
    pub spin_transfer: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub spin_decay: f64,
    #[validate(range(min = 0.0, max = 0.1))]
    pub magnus: f64,

    // === Contacts ===
    #[validate(range(min = 0.0, max = 200.0))]
    pub collision_radius: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub collision_impulse_scale: f64,

    /// Std-dev of the formation spawn jitter (0 disables jitter)
    #[validate(range(min = 0.0, max = 50.0))]
    pub spawn_jitter_std: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            player_accel: 2.6,
            player_friction: 0.91,
            max_player_speed: 7.25,
            dash_multiplier: 1.6,

            ball_friction: 0.962,
            max_ball_speed: 14.0,

            touch_radius: 15.5,
            kick_retain: 0.65,
            kick_base_impulse: 3.2,
            kick_scale: 3.6,
            kick_min_control: 1e-6,
            kick_flag_boost: 0.5,

            spin_transfer: 0.05,
            spin_decay: 0.95,
            magnus: 0.002,

            collision_radius: 24.0,
            collision_impulse_scale: 2.0,

            spawn_jitter_std: 1.0,
        }
    }
}

/// Movement fatigue. Stamina only drains from movement down to `floor`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(default)]
pub struct StaminaConfig {
    /// Drain every tick regardless of input (default: 0.05)
    #[validate(range(min = 0.0, max = 10.0))]
    pub drain_base: f64,
    /// Drain per unit of control magnitude (default: 0.08)
    #[validate(range(min = 0.0, max = 10.0))]
    pub drain_per_control: f64,
    /// Extra drain at full dash flag (default: 0.1)
    #[validate(range(min = 0.0, max = 10.0))]
    pub dash_drain: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub floor: f64,
}

impl Default for StaminaConfig {
    fn default() -> Self {
        Self { drain_base: 0.05, drain_per_control: 0.08, dash_drain: 0.1, floor: 45.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_band_default() {
        let pitch = PitchConfig::default();
        assert_eq!(pitch.goal_band(), (160.0, 240.0));
        assert_eq!(pitch.center(), (300.0, 200.0));
    }

    #[test]
    fn test_defaults_validate() {
        assert!(PitchConfig::default().validate().is_ok());
        assert!(PhysicsConfig::default().validate().is_ok());
        assert!(StaminaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_friction_rejected() {
        let physics = PhysicsConfig { player_friction: 1.5, ..Default::default() };
        assert!(physics.validate().is_err());
    }
}

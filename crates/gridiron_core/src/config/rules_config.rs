//! Rule, referee and match-length thresholds.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    /// Player-ball distance that counts as contesting the ball (default: 20.0)
    #[validate(range(min = 0.0, max = 500.0))]
    pub interaction_radius: f64,
    /// Minimum forward ball travel in one tick for a PROGRESSION event
    #[validate(range(min = 0.0, max = 100.0))]
    pub progression_min_delta: f64,
    /// Depth of the attacking third as a fraction of pitch width
    #[validate(range(min = 0.05, max = 0.5))]
    pub final_third_fraction: f64,
    /// Max distance to the attacking goal for a kick to count as a shot
    #[validate(range(min = 0.0, max = 1.0))]
    pub shot_range_fraction: f64,
    /// Distance restarts are placed inside the touch/goal line
    #[validate(range(min = 0.0, max = 50.0))]
    pub restart_inset: f64,
    /// Goal kick spot distance from the goal line
    #[validate(range(min = 0.0, max = 500.0))]
    pub goal_kick_depth: f64,
    /// Per-unit decay of shot xG with distance to the goal centre
    #[validate(range(min = 0.0, max = 1.0))]
    pub xg_distance_decay: f64,
    /// Opponents closer than this to the ball press the shooter
    #[validate(range(min = 0.0, max = 500.0))]
    pub xg_pressure_radius: f64,
    /// xG multiplier per pressing opponent
    #[validate(range(min = 0.0, max = 1.0))]
    pub xg_pressure_factor: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            interaction_radius: 20.0,
            progression_min_delta: 0.7,
            final_third_fraction: 0.25,
            shot_range_fraction: 0.35,
            restart_inset: 2.0,
            goal_kick_depth: 36.0,
            xg_distance_decay: 0.05,
            xg_pressure_radius: 20.0,
            xg_pressure_factor: 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(default)]
pub struct RefereeConfig {
    /// Minimum impulse that counts as a foul
    #[validate(range(min = 0.0))]
    pub foul_threshold: f64,
    #[validate(range(min = 0.0))]
    pub yellow_threshold: f64,
    #[validate(range(min = 0.0))]
    pub red_threshold: f64,
    /// FOUL severity above which an event is flagged for review
    #[validate(range(min = 0.0))]
    pub var_severity: f64,
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self { foul_threshold: 10.0, yellow_threshold: 40.0, red_threshold: 100.0, var_severity: 30.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(default)]
pub struct MatchConfig {
    #[validate(range(min = 1, max = 11))]
    pub team_size: usize,
    #[validate(range(min = 1))]
    pub max_ticks: u64,
    /// Seconds per tick. Informational for consumers; physics runs in per-tick units.
    #[validate(range(min = 0.0001, max = 1.0))]
    pub dt: f64,
    /// Per-player action width: 2 (force) or 4 (force + kick + dash)
    pub action_dims: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self { team_size: 7, max_ticks: 2000, dt: 1.0 / 60.0, action_dims: 2 }
    }
}

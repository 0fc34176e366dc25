//! # Simulation Configuration
//!
//! All tuning constants in one bundle, supplied once at construction.
//!
//! ## Usage
//! ```rust
//! use gridiron_core::config::SimConfig;
//!
//! let config = SimConfig::default();
//! let arcade = SimConfig::arcade();
//! assert!(config.validate_all().is_ok());
//! assert!(arcade.validate_all().is_ok());
//! ```

mod ability_config;
mod physics_config;
mod rules_config;

pub use ability_config::{AbilityConfig, AbilityDef};
pub use physics_config::{PhysicsConfig, PitchConfig, StaminaConfig};
pub use rules_config::{MatchConfig, RefereeConfig, RulesConfig};

use crate::error::ConfigError;
use crate::events::EventType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use validator::Validate;

/// Formation slots per team. Team size is fixed to this.
pub const FORMATION_SLOTS: usize = 7;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub pitch: PitchConfig,
    pub physics: PhysicsConfig,
    pub stamina: StaminaConfig,
    pub rules: RulesConfig,
    pub referee: RefereeConfig,
    pub abilities: AbilityConfig,
    #[serde(rename = "match")]
    pub match_cfg: MatchConfig,
    /// Per-event contribution to `MatchState::spectacle_score`
    pub spectacle_weights: BTreeMap<EventType, f64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            pitch: PitchConfig::default(),
            physics: PhysicsConfig::default(),
            stamina: StaminaConfig::default(),
            rules: RulesConfig::default(),
            referee: RefereeConfig::default(),
            abilities: AbilityConfig::default(),
            match_cfg: MatchConfig::default(),
            spectacle_weights: default_spectacle_weights(),
        }
    }
}

fn default_spectacle_weights() -> BTreeMap<EventType, f64> {
    BTreeMap::from([
        (EventType::Goal, 10.0),
        (EventType::Shot, 5.0),
        (EventType::Pass, 2.0),
        (EventType::FinalThirdEntry, 1.0),
        (EventType::AbilityCast, 1.0),
    ])
}

impl SimConfig {
    /// Livelier ball, stricter referee.
    pub fn arcade() -> Self {
        let mut cfg = Self::default();
        cfg.physics.max_ball_speed = 18.0;
        cfg.physics.ball_friction = 0.975;
        cfg.physics.kick_scale = 4.5;
        cfg.referee.foul_threshold = 8.0;
        cfg.abilities.energy_regen = 0.2;
        cfg
    }

    /// Total players on the pitch.
    pub fn num_players(&self) -> usize {
        self.match_cfg.team_size * 2
    }

    /// Field-level range checks plus cross-field rules.
    pub fn validate_all(&self) -> Result<(), ConfigError> {
        self.pitch.validate()?;
        self.physics.validate()?;
        self.stamina.validate()?;
        self.rules.validate()?;
        self.referee.validate()?;
        self.abilities.validate()?;
        self.match_cfg.validate()?;
        for def in &self.abilities.registry {
            def.validate()?;
        }

        if self.pitch.goal_width >= self.pitch.height {
            return Err(ConfigError::Invalid(format!(
                "goal_width {} must be smaller than pitch height {}",
                self.pitch.goal_width, self.pitch.height
            )));
        }
        let short_side = self.pitch.width.min(self.pitch.height);
        if 2.0 * self.rules.restart_inset >= short_side {
            return Err(ConfigError::Invalid(format!(
                "restart_inset {} must be less than half the shorter pitch side {}",
                self.rules.restart_inset, short_side
            )));
        }
        if self.rules.goal_kick_depth >= self.pitch.width / 2.0 {
            return Err(ConfigError::Invalid(format!(
                "goal_kick_depth {} must be less than half the pitch width {}",
                self.rules.goal_kick_depth, self.pitch.width
            )));
        }
        if self.referee.yellow_threshold >= self.referee.red_threshold {
            return Err(ConfigError::Invalid(format!(
                "yellow_threshold {} must be below red_threshold {}",
                self.referee.yellow_threshold, self.referee.red_threshold
            )));
        }
        if self.match_cfg.team_size != FORMATION_SLOTS {
            return Err(ConfigError::Invalid(format!(
                "team_size {} unsupported; formation has {} slots",
                self.match_cfg.team_size, FORMATION_SLOTS
            )));
        }
        if !matches!(self.match_cfg.action_dims, 2 | 4) {
            return Err(ConfigError::Invalid(format!(
                "action_dims must be 2 or 4, got {}",
                self.match_cfg.action_dims
            )));
        }
        let mut seen = BTreeSet::new();
        for def in &self.abilities.registry {
            if !seen.insert(def.id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate ability id '{}'", def.id)));
            }
        }
        Ok(())
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: SimConfig = serde_yaml::from_str(text)?;
        cfg.validate_all()?;
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: SimConfig = serde_json::from_str(text)?;
        cfg.validate_all()?;
        Ok(cfg)
    }

    /// Load from a `.yaml`/`.yml`/`.json` file. A missing file yields defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config not found, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            other => Err(ConfigError::Invalid(format!(
                "unsupported config extension {:?} for {}",
                other,
                path.display()
            ))),
        }
    }

    pub fn ability(&self, id: &str) -> Option<&AbilityDef> {
        self.abilities.registry.iter().find(|a| a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let cfg = SimConfig::default();
        assert!(cfg.validate_all().is_ok());
        assert_eq!(cfg.num_players(), 14);
        assert!(SimConfig::arcade().validate_all().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "pitch:\n  width: 800.0\nreferee:\n  foul_threshold: 12.0\n";
        let cfg = SimConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.pitch.width, 800.0);
        assert_eq!(cfg.pitch.height, 400.0);
        assert_eq!(cfg.referee.foul_threshold, 12.0);
        assert_eq!(cfg.referee.red_threshold, 100.0);
        assert_eq!(cfg.abilities.registry.len(), 3);
    }

    #[test]
    fn test_match_section_renamed() {
        let cfg = SimConfig::from_yaml_str("match:\n  max_ticks: 600\n").unwrap();
        assert_eq!(cfg.match_cfg.max_ticks, 600);
    }

    #[test]
    fn test_spectacle_weights_from_yaml() {
        let cfg = SimConfig::from_yaml_str("spectacle_weights:\n  GOAL: 20.0\n  FOUL: -1.0\n").unwrap();
        assert_eq!(cfg.spectacle_weights.get(&EventType::Goal), Some(&20.0));
        assert_eq!(cfg.spectacle_weights.get(&EventType::Foul), Some(&-1.0));
        assert_eq!(cfg.spectacle_weights.get(&EventType::Shot), None);
    }

    #[test]
    fn test_card_thresholds_must_be_ordered() {
        let mut cfg = SimConfig::default();
        cfg.referee.yellow_threshold = 120.0;
        assert!(matches!(cfg.validate_all(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_restart_geometry_must_fit_pitch() {
        let mut cfg = SimConfig::default();
        cfg.pitch.width = 60.0;
        cfg.pitch.goal_width = 20.0;
        cfg.rules.goal_kick_depth = 20.0;
        cfg.rules.restart_inset = 40.0;
        assert!(matches!(cfg.validate_all(), Err(ConfigError::Invalid(msg)) if msg.contains("restart_inset")));

        cfg.rules.restart_inset = 2.0;
        assert!(cfg.validate_all().is_ok());

        cfg.pitch.width = 30.0;
        assert!(matches!(cfg.validate_all(), Err(ConfigError::Invalid(msg)) if msg.contains("goal_kick_depth")));
    }

    #[test]
    fn test_duplicate_ability_rejected() {
        let mut cfg = SimConfig::default();
        cfg.abilities.registry.push(AbilityDef::new("overdrive", 1.0, 0.0, 1, 0.0));
        assert!(cfg.validate_all().is_err());
    }

    #[test]
    fn test_bad_action_dims_rejected() {
        let mut cfg = SimConfig::default();
        cfg.match_cfg.action_dims = 3;
        assert!(cfg.validate_all().is_err());
    }

    #[test]
    fn test_range_violation_surfaces_as_validation_error() {
        let err = SimConfig::from_json_str(r#"{"physics": {"ball_friction": 2.0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let cfg = SimConfig::load("/definitely/not/here.yaml").unwrap();
        assert_eq!(cfg, SimConfig::default());
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, r#"{"match": {"action_dims": 4}}"#).unwrap();
        let cfg = SimConfig::load(&path).unwrap();
        assert_eq!(cfg.match_cfg.action_dims, 4);
    }
}

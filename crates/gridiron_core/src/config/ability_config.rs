//! Special-move registry and resource model.
//!
//! Canonical model: energy pays for the cast, heat gates spam, stamina takes a
//! penalty. Costs live here so balancing never touches engine code.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// One castable ability.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct AbilityDef {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub energy_cost: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub stamina_penalty: f64,
    pub cooldown_ticks: u64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub heat_per_use: f64,
}

impl AbilityDef {
    pub fn new(
        id: &str,
        energy_cost: f64,
        stamina_penalty: f64,
        cooldown_ticks: u64,
        heat_per_use: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: id.replace('_', " "),
            energy_cost,
            stamina_penalty,
            cooldown_ticks,
            heat_per_use,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(default)]
pub struct AbilityConfig {
    /// Casting is blocked while heat is strictly above this value
    #[validate(range(min = 0.0))]
    pub heat_gate: f64,
    /// Per-tick heat multiplier
    #[validate(range(min = 0.0, max = 1.0))]
    pub heat_decay: f64,
    /// Per-tick energy regeneration
    #[validate(range(min = 0.0, max = 100.0))]
    pub energy_regen: f64,
    pub registry: Vec<AbilityDef>,
}

impl Default for AbilityConfig {
    fn default() -> Self {
        Self {
            heat_gate: 90.0,
            heat_decay: 0.99,
            energy_regen: 0.1,
            registry: vec![
                AbilityDef::new("overdrive", 10.0, 5.0, 120, 15.0),
                AbilityDef::new("phase_step", 25.0, 8.0, 300, 30.0),
                AbilityDef::new("pulse_shot", 40.0, 12.0, 600, 45.0),
            ],
        }
    }
}

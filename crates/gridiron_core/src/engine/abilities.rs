//! Resource-gated special moves.
//!
//! Energy pays for a cast, heat blocks casting above the gate, and stamina
//! takes a penalty. A rejected cast is a normal result and changes nothing.

use crate::config::{AbilityConfig, AbilityDef};
use crate::state::PlayerState;
use serde::{Deserialize, Serialize};

/// Why a cast did not happen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CastRejection {
    UnknownAbility,
    InsufficientEnergy,
    Overheated,
    OnCooldown { ready_tick: u64 },
    SentOff,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CastOutcome {
    Cast(AbilityDef),
    Rejected(CastRejection),
}

impl CastOutcome {
    pub fn is_cast(&self) -> bool {
        matches!(self, CastOutcome::Cast(_))
    }
}

#[derive(Debug, Clone)]
pub struct AbilityManager {
    config: AbilityConfig,
}

impl AbilityManager {
    pub fn new(config: AbilityConfig) -> Self {
        Self { config }
    }

    pub fn get(&self, ability_id: &str) -> Option<&AbilityDef> {
        self.config.registry.iter().find(|a| a.id == ability_id)
    }

    /// First failed precondition, if any.
    pub fn check(&self, player: &PlayerState, ability_id: &str, tick: u64) -> Result<&AbilityDef, CastRejection> {
        if player.is_sent_off() {
            return Err(CastRejection::SentOff);
        }
        let def = self.get(ability_id).ok_or(CastRejection::UnknownAbility)?;
        if player.energy < def.energy_cost {
            return Err(CastRejection::InsufficientEnergy);
        }
        if player.heat > self.config.heat_gate {
            return Err(CastRejection::Overheated);
        }
        if let Some(&ready_tick) = player.cooldown_ready.get(ability_id) {
            if tick < ready_tick {
                return Err(CastRejection::OnCooldown { ready_tick });
            }
        }
        Ok(def)
    }

    pub fn can_cast(&self, player: &PlayerState, ability_id: &str, tick: u64) -> bool {
        self.check(player, ability_id, tick).is_ok()
    }

    /// Apply the ability's costs to `player` if every precondition holds.
    ///
    /// The caller records the ABILITY_CAST event on success.
    pub fn cast(&self, player: &mut PlayerState, ability_id: &str, tick: u64) -> CastOutcome {
        let def = match self.check(player, ability_id, tick) {
            Ok(def) => def.clone(),
            Err(reason) => return CastOutcome::Rejected(reason),
        };
        player.energy = (player.energy - def.energy_cost).clamp(0.0, 100.0);
        player.stamina = (player.stamina - def.stamina_penalty).clamp(0.0, 100.0);
        player.heat += def.heat_per_use;
        player.cooldown_ready.insert(def.id.clone(), tick + def.cooldown_ticks);
        CastOutcome::Cast(def)
    }

    /// Per-tick heat decay and energy regeneration.
    pub fn update(&self, players: &mut [PlayerState]) {
        for player in players {
            player.heat = (player.heat * self.config.heat_decay).max(0.0);
            player.energy = (player.energy + self.config.energy_regen).min(100.0);
        }
    }
}

//! Per-tick caller input.
//!
//! Values are clamped to their documented ranges rather than rejected; only
//! shape errors and non-finite numbers are `InputError`s.

use crate::error::InputError;
use crate::state::Vec2;
use serde::{Deserialize, Serialize};

/// One player's input for a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerControl {
    /// Movement force, each component in [-1, 1]
    pub force: Vec2,
    /// Kick power flag in [0, 1]
    pub kick: f64,
    /// Dash flag in [0, 1]
    pub dash: f64,
}

impl Default for PlayerControl {
    fn default() -> Self {
        Self { force: Vec2::zeros(), kick: 0.0, dash: 0.0 }
    }
}

impl PlayerControl {
    pub fn new(fx: f64, fy: f64) -> Self {
        Self { force: Vec2::new(fx, fy), kick: 0.0, dash: 0.0 }
    }

    pub fn with_flags(mut self, kick: f64, dash: f64) -> Self {
        self.kick = kick;
        self.dash = dash;
        self
    }

    pub fn clamped(&self) -> Self {
        Self {
            force: Vec2::new(self.force.x.clamp(-1.0, 1.0), self.force.y.clamp(-1.0, 1.0)),
            kick: self.kick.clamp(0.0, 1.0),
            dash: self.dash.clamp(0.0, 1.0),
        }
    }

    /// Length of the clamped force.
    pub fn magnitude(&self) -> f64 {
        self.clamped().force.norm()
    }

    fn first_non_finite(&self) -> Option<usize> {
        [self.force.x, self.force.y, self.kick, self.dash].iter().position(|v| !v.is_finite())
    }
}

/// Ability cast request, processed in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastRequest {
    pub player: usize,
    pub ability_id: String,
}

/// Full input for one `step`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Action {
    /// One entry per player, in spawn order
    pub controls: Vec<PlayerControl>,
    #[serde(default)]
    pub casts: Vec<CastRequest>,
}

impl Action {
    pub fn idle(num_players: usize) -> Self {
        Self { controls: vec![PlayerControl::default(); num_players], casts: Vec::new() }
    }

    pub fn from_controls(controls: Vec<PlayerControl>) -> Self {
        Self { controls, casts: Vec::new() }
    }

    /// Parse a flat `num_players x dims` vector (policy output layout).
    ///
    /// `dims` is 2 (fx, fy) or 4 (fx, fy, kick, dash).
    pub fn from_flat(values: &[f32], num_players: usize, dims: usize) -> Result<Self, InputError> {
        if dims != 2 && dims != 4 {
            return Err(InputError::UnsupportedActionDims(dims));
        }
        let expected = num_players * dims;
        if values.len() != expected {
            return Err(InputError::FlatLength { expected, found: values.len() });
        }

        let mut controls = Vec::with_capacity(num_players);
        for (player, chunk) in values.chunks_exact(dims).enumerate() {
            if let Some(component) = chunk.iter().position(|v| !v.is_finite()) {
                return Err(InputError::NonFinite { player, component });
            }
            let mut control = PlayerControl::new(chunk[0] as f64, chunk[1] as f64);
            if dims == 4 {
                control = control.with_flags(chunk[2] as f64, chunk[3] as f64);
            }
            controls.push(control);
        }
        Ok(Self::from_controls(controls))
    }

    pub fn with_cast(mut self, player: usize, ability_id: &str) -> Self {
        self.casts.push(CastRequest { player, ability_id: ability_id.to_string() });
        self
    }

    /// Shape and finiteness checks against the match roster size.
    pub fn validate(&self, num_players: usize) -> Result<(), InputError> {
        if self.controls.len() != num_players {
            return Err(InputError::WrongPlayerCount {
                expected: num_players,
                found: self.controls.len(),
            });
        }
        for (player, control) in self.controls.iter().enumerate() {
            if let Some(component) = control.first_non_finite() {
                return Err(InputError::NonFinite { player, component });
            }
        }
        for cast in &self.casts {
            if cast.player >= num_players {
                return Err(InputError::UnknownPlayer(cast.player));
            }
        }
        Ok(())
    }
}

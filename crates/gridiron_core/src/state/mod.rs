//! Entity and match state.
//!
//! `MatchState` is created once per episode from a seed and is owned and
//! mutated only by `SimulationContext::step`.

pub mod formation;

pub use formation::{FormationLayout, RoleSlot, DEFAULT_LAYOUT};

use crate::config::PitchConfig;
use crate::events::{EventKind, MatchEvent};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 2D pitch vector (pitch units, y grows toward the far touchline).
pub type Vec2 = nalgebra::Vector2<f64>;

/// Status tag for a red-carded player.
pub const TAG_SENT_OFF: &str = "SENT_OFF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamId {
    Blue,
    Red,
}

impl TeamId {
    pub fn opponent(&self) -> TeamId {
        match self {
            TeamId::Blue => TeamId::Red,
            TeamId::Red => TeamId::Blue,
        }
    }

    /// Wire index (BLUE = 0, RED = 1).
    pub fn index(&self) -> u8 {
        match self {
            TeamId::Blue => 0,
            TeamId::Red => 1,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            TeamId::Blue => "BLUE",
            TeamId::Red => "RED",
        }
    }

    /// +1 when attacking toward `x = width` (BLUE), -1 otherwise.
    pub fn attack_sign(&self) -> f64 {
        match self {
            TeamId::Blue => 1.0,
            TeamId::Red => -1.0,
        }
    }

    /// x coordinate of the goal line this team defends.
    pub fn defended_line(&self, width: f64) -> f64 {
        match self {
            TeamId::Blue => 0.0,
            TeamId::Red => width,
        }
    }

    /// x coordinate of the goal line this team attacks.
    pub fn attacked_line(&self, width: f64) -> f64 {
        self.opponent().defended_line(width)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: String,
    pub team: TeamId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// [0, 100]
    pub stamina: f64,
    /// [0, 100]
    pub energy: f64,
    /// >= 0
    pub heat: f64,
    /// Role first, then status labels, in insertion order
    pub active_tags: Vec<String>,
    /// ability id -> first tick the ability may be cast again
    pub cooldown_ready: BTreeMap<String, u64>,
}

impl PlayerState {
    pub fn new(id: impl Into<String>, team: TeamId, pos: Vec2, role: &str) -> Self {
        Self {
            id: id.into(),
            team,
            pos,
            vel: Vec2::zeros(),
            stamina: 100.0,
            energy: 100.0,
            heat: 0.0,
            active_tags: vec![role.to_string()],
            cooldown_ready: BTreeMap::new(),
        }
    }

    pub fn role(&self) -> Option<&str> {
        self.active_tags.first().map(String::as_str)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.active_tags.iter().any(|t| t == tag)
    }

    pub fn is_sent_off(&self) -> bool {
        self.has_tag(TAG_SENT_OFF)
    }

    pub fn send_off(&mut self) {
        if !self.is_sent_off() {
            self.active_tags.push(TAG_SENT_OFF.to_string());
        }
        self.vel = Vec2::zeros();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub pos: Vec2,
    pub vel: Vec2,
    pub spin: f64,
    pub last_touch_id: Option<String>,
    pub last_touch_team: Option<TeamId>,
}

impl BallState {
    /// Stationary ball at `pos` with no possession.
    pub fn at(pos: Vec2) -> Self {
        Self { pos, vel: Vec2::zeros(), spin: 0.0, last_touch_id: None, last_touch_team: None }
    }

    /// Stationary ball on the centre spot.
    pub fn kickoff(pitch: &PitchConfig) -> Self {
        let (cx, cy) = pitch.center();
        Self::at(Vec2::new(cx, cy))
    }
}

impl Default for BallState {
    fn default() -> Self {
        Self::at(Vec2::zeros())
    }
}

/// Goals per team. Only ever incremented by a GOAL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub blue: u32,
    pub red: u32,
}

impl Score {
    pub fn get(&self, team: TeamId) -> u32 {
        match team {
            TeamId::Blue => self.blue,
            TeamId::Red => self.red,
        }
    }

    pub fn award(&mut self, team: TeamId) -> u32 {
        let slot = match team {
            TeamId::Blue => &mut self.blue,
            TeamId::Red => &mut self.red,
        };
        *slot = slot.saturating_add(1);
        *slot
    }

    /// Team code -> goals, in stable key order.
    pub fn as_map(&self) -> BTreeMap<String, u32> {
        BTreeMap::from([
            (TeamId::Blue.code().to_string(), self.blue),
            (TeamId::Red.code().to_string(), self.red),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub tick: u64,
    pub score: Score,
    /// Spawn order; never reordered
    pub players: Vec<PlayerState>,
    pub ball: BallState,
    /// Events of the current tick only
    pub events: Vec<MatchEvent>,
    pub spectacle_score: f64,
    #[serde(skip)]
    event_seq: u64,
}

impl MatchState {
    pub fn new(players: Vec<PlayerState>, ball: BallState) -> Self {
        Self {
            tick: 0,
            score: Score::default(),
            players,
            ball,
            events: Vec::new(),
            spectacle_score: 0.0,
            event_seq: 0,
        }
    }

    /// Append an event stamped with the current tick and the next match-wide sequence number.
    pub fn push_event(&mut self, kind: EventKind) -> &MatchEvent {
        self.event_seq += 1;
        let event = MatchEvent::new(self.tick, self.event_seq, kind);
        self.events.push(event);
        &self.events[self.events.len() - 1]
    }

    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn player_index(&self, id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn team_players(&self, team: TeamId) -> impl Iterator<Item = &PlayerState> + '_ {
        self.players.iter().filter(move |p| p.team == team)
    }
}

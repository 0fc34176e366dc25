//! Match event protocol.
//!
//! Every event is a closed variant carrying exactly the fields it needs.
//! Events are produced into `MatchState::events` during a tick and drained by
//! the consumer before the next one.

use crate::state::TeamId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Event discriminant, used for ids, snapshot event lists and weight tables.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Kickoff,
    Goal,
    Foul,
    Yellow,
    Red,
    Pass,
    Shot,
    Possession,
    Progression,
    FinalThirdEntry,
    AbilityCast,
    BallTouch,
    OutOfBounds,
}

impl EventType {
    /// Wire code as it appears in snapshots ("BALL_TOUCH").
    pub fn code(&self) -> &'static str {
        match self {
            EventType::Kickoff => "KICKOFF",
            EventType::Goal => "GOAL",
            EventType::Foul => "FOUL",
            EventType::Yellow => "YELLOW",
            EventType::Red => "RED",
            EventType::Pass => "PASS",
            EventType::Shot => "SHOT",
            EventType::Possession => "POSSESSION",
            EventType::Progression => "PROGRESSION",
            EventType::FinalThirdEntry => "FINAL_THIRD_ENTRY",
            EventType::AbilityCast => "ABILITY_CAST",
            EventType::BallTouch => "BALL_TOUCH",
            EventType::OutOfBounds => "OUT_OF_BOUNDS",
        }
    }

    /// Prefix used in `event_id` ("ball_touch").
    pub fn id_prefix(&self) -> String {
        self.code().to_ascii_lowercase()
    }
}

/// How play restarts after the ball leaves the pitch outside the goal mouth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Restart {
    ThrowIn,
    GoalKick,
    Corner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Kickoff {
        team: TeamId,
    },
    Goal {
        scoring_team: TeamId,
        scorer_id: Option<String>,
    },
    Foul {
        actor_id: String,
        target_id: String,
        severity: f64,
        points: f64,
    },
    Yellow {
        actor_id: String,
        points: f64,
    },
    Red {
        actor_id: String,
        points: f64,
    },
    Pass {
        passer_id: String,
        receiver_id: String,
        team: TeamId,
    },
    Shot {
        shooter_id: String,
        team: TeamId,
        distance: f64,
        on_target: bool,
        /// Expected-goals estimate in [0.01, 0.99]
        xg: f64,
    },
    Possession {
        team: TeamId,
        player_id: String,
    },
    Progression {
        actor_id: String,
        team: TeamId,
        delta_x: f64,
    },
    FinalThirdEntry {
        actor_id: String,
        team: TeamId,
    },
    AbilityCast {
        actor_id: String,
        ability_id: String,
        energy_cost: f64,
    },
    BallTouch {
        actor_id: String,
        team: TeamId,
        impulse: f64,
    },
    OutOfBounds {
        restart: Restart,
        awarded_to: Option<TeamId>,
        last_touch_id: Option<String>,
    },
}

impl EventKind {
    pub fn event_type(&self) -> EventType {
        match self {
            EventKind::Kickoff { .. } => EventType::Kickoff,
            EventKind::Goal { .. } => EventType::Goal,
            EventKind::Foul { .. } => EventType::Foul,
            EventKind::Yellow { .. } => EventType::Yellow,
            EventKind::Red { .. } => EventType::Red,
            EventKind::Pass { .. } => EventType::Pass,
            EventKind::Shot { .. } => EventType::Shot,
            EventKind::Possession { .. } => EventType::Possession,
            EventKind::Progression { .. } => EventType::Progression,
            EventKind::FinalThirdEntry { .. } => EventType::FinalThirdEntry,
            EventKind::AbilityCast { .. } => EventType::AbilityCast,
            EventKind::BallTouch { .. } => EventType::BallTouch,
            EventKind::OutOfBounds { .. } => EventType::OutOfBounds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    /// `{type}_{tick}_{seq}`, unique within a match
    pub event_id: String,
    pub tick: u64,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl MatchEvent {
    pub fn new(tick: u64, seq: u64, kind: EventKind) -> Self {
        let event_id = format!("{}_{}_{}", kind.event_type().id_prefix(), tick, seq);
        Self { event_id, tick, kind }
    }

    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    /// Player primarily responsible for the event, if any.
    pub fn actor_id(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Kickoff { .. } => None,
            EventKind::Goal { scorer_id, .. } => scorer_id.as_deref(),
            EventKind::Foul { actor_id, .. }
            | EventKind::Yellow { actor_id, .. }
            | EventKind::Red { actor_id, .. }
            | EventKind::Progression { actor_id, .. }
            | EventKind::FinalThirdEntry { actor_id, .. }
            | EventKind::AbilityCast { actor_id, .. }
            | EventKind::BallTouch { actor_id, .. } => Some(actor_id),
            EventKind::Pass { passer_id, .. } => Some(passer_id),
            EventKind::Shot { shooter_id, .. } => Some(shooter_id),
            EventKind::Possession { player_id, .. } => Some(player_id),
            EventKind::OutOfBounds { last_touch_id, .. } => last_touch_id.as_deref(),
        }
    }

    pub fn target_id(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Foul { target_id, .. } => Some(target_id),
            EventKind::Pass { receiver_id, .. } => Some(receiver_id),
            _ => None,
        }
    }

    /// Scalar parameters as a flat key/value view for reward shaping and analysis.
    pub fn params(&self) -> Vec<(&'static str, f64)> {
        match &self.kind {
            EventKind::Foul { severity, points, .. } => {
                vec![("severity", *severity), ("points", *points)]
            }
            EventKind::Yellow { points, .. } | EventKind::Red { points, .. } => {
                vec![("points", *points)]
            }
            EventKind::Shot { distance, on_target, xg, .. } => vec![
                ("distance", *distance),
                ("on_target", if *on_target { 1.0 } else { 0.0 }),
                ("xg", *xg),
            ],
            EventKind::Progression { delta_x, .. } => vec![("delta_x", *delta_x)],
            EventKind::AbilityCast { energy_cost, .. } => vec![("energy_cost", *energy_cost)],
            EventKind::BallTouch { impulse, .. } => vec![("impulse", *impulse)],
            _ => Vec::new(),
        }
    }

    /// Severity carried by FOUL events.
    pub fn severity(&self) -> Option<f64> {
        match &self.kind {
            EventKind::Foul { severity, .. } => Some(*severity),
            _ => None,
        }
    }
}

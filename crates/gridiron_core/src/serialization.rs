//! Versioned snapshot frames.
//!
//! Compact wire format for telemetry and replays:
//!
//! ```text
//! {v, t, s:{team->score}, b:{p:[x,y], v:[vx,vy], spin},
//!  p:[{id, team, pos, vel, stm, en, ht}], e:[event_type, ...]}
//! ```
//!
//! Floats are rounded before encoding (positions, velocities and spin to 3
//! decimals, stamina to 2, energy and heat to 1), so two encodings of
//! bit-identical state are byte-identical. Field names and rounding are part
//! of the format: changing either bumps `SNAPSHOT_VERSION`.

use crate::events::EventType;
use crate::state::{MatchState, Vec2};
use schemars::schema::RootSchema;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

const KINEMATIC_DECIMALS: u32 = 3;
const STAMINA_DECIMALS: u32 = 2;
const RESOURCE_DECIMALS: u32 = 1;

/// Round to `decimals` places. Negative zero becomes zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn round_vec(v: &Vec2) -> [f64; 2] {
    [round_to(v.x, KINEMATIC_DECIMALS), round_to(v.y, KINEMATIC_DECIMALS)]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BallFrame {
    pub p: [f64; 2],
    pub v: [f64; 2],
    pub spin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerFrame {
    pub id: String,
    /// 0 = BLUE, 1 = RED
    pub team: u8,
    pub pos: [f64; 2],
    pub vel: [f64; 2],
    pub stm: f64,
    pub en: f64,
    pub ht: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Snapshot {
    pub v: u32,
    pub t: u64,
    pub s: BTreeMap<String, u32>,
    pub b: BallFrame,
    pub p: Vec<PlayerFrame>,
    pub e: Vec<EventType>,
}

impl Snapshot {
    /// Frame for `state`; `events` are the event types of the tick being captured.
    pub fn from_state(state: &MatchState, events: &[EventType]) -> Self {
        let ball = &state.ball;
        Self {
            v: SNAPSHOT_VERSION,
            t: state.tick,
            s: state.score.as_map(),
            b: BallFrame {
                p: round_vec(&ball.pos),
                v: round_vec(&ball.vel),
                spin: round_to(ball.spin, KINEMATIC_DECIMALS),
            },
            p: state
                .players
                .iter()
                .map(|pl| PlayerFrame {
                    id: pl.id.clone(),
                    team: pl.team.index(),
                    pos: round_vec(&pl.pos),
                    vel: round_vec(&pl.vel),
                    stm: round_to(pl.stamina, STAMINA_DECIMALS),
                    en: round_to(pl.energy, RESOURCE_DECIMALS),
                    ht: round_to(pl.heat, RESOURCE_DECIMALS),
                })
                .collect(),
            e: events.to_vec(),
        }
    }

    /// Single-line JSON, as written to replay logs.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// MessagePack with field names, for binary telemetry.
    pub fn to_msgpack(&self) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        rmp_serde::to_vec_named(self)
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, rmp_serde::decode::Error> {
        rmp_serde::from_slice(bytes)
    }

    pub fn event_codes(&self) -> Vec<&'static str> {
        self.e.iter().map(EventType::code).collect()
    }

    pub fn score(&self, team_code: &str) -> u32 {
        self.s.get(team_code).copied().unwrap_or(0)
    }

    pub fn player(&self, id: &str) -> Option<&PlayerFrame> {
        self.p.iter().find(|p| p.id == id)
    }
}

/// JSON Schema of the snapshot frame for telemetry consumers.
pub fn snapshot_schema() -> RootSchema {
    schema_for!(Snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BallState, PlayerState, TeamId};
    use proptest::prelude::*;

    fn sample_state() -> MatchState {
        let mut blue = PlayerState::new("blue_cm_4", TeamId::Blue, Vec2::new(252.123456, 199.9996), "CM");
        blue.vel = Vec2::new(-0.0001, 1.23456);
        blue.stamina = 87.6549;
        blue.energy = 55.56;
        blue.heat = 12.34;
        let red = PlayerState::new("red_cm_4", TeamId::Red, Vec2::new(348.0, 200.0), "CM");
        let mut state = MatchState::new(vec![blue, red], BallState::at(Vec2::new(300.0, 200.0)));
        state.tick = 17;
        state.score.award(TeamId::Red);
        state
    }

    #[test]
    fn test_rounding_rules() {
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(-0.0001, 3), 0.0);
        assert!(round_to(-0.0001, 3).is_sign_positive());
        assert_eq!(round_to(87.6549, 2), 87.65);
    }

    #[test]
    fn test_from_state_shape() {
        let snap = Snapshot::from_state(&sample_state(), &[EventType::BallTouch]);
        assert_eq!(snap.v, SNAPSHOT_VERSION);
        assert_eq!(snap.t, 17);
        assert_eq!(snap.score("RED"), 1);
        assert_eq!(snap.score("BLUE"), 0);
        let p = snap.player("blue_cm_4").unwrap();
        assert_eq!(p.team, 0);
        assert_eq!(p.pos, [252.123, 200.0]);
        assert_eq!(p.vel, [0.0, 1.235]);
        assert_eq!(p.stm, 87.65);
        assert_eq!(p.en, 55.6);
        assert_eq!(p.ht, 12.3);
        assert_eq!(snap.event_codes(), vec!["BALL_TOUCH"]);
    }

    #[test]
    fn test_json_field_names() {
        let json = Snapshot::from_state(&sample_state(), &[EventType::Goal]).to_json().unwrap();
        assert!(json.starts_with(r#"{"v":1,"t":17,"s":{"BLUE":0,"RED":1},"b":{"p":[300.0,200.0]"#));
        assert!(json.contains(r#""e":["GOAL"]"#));
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_identical_state_identical_bytes() {
        let a = Snapshot::from_state(&sample_state(), &[]);
        let b = Snapshot::from_state(&sample_state(), &[]);
        assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
        assert_eq!(a.to_msgpack().unwrap(), b.to_msgpack().unwrap());
    }

    #[test]
    fn test_json_and_msgpack_decode() {
        let snap = Snapshot::from_state(&sample_state(), &[EventType::Pass, EventType::Shot]);
        assert_eq!(Snapshot::from_json(&snap.to_json().unwrap()).unwrap(), snap);
        assert_eq!(Snapshot::from_msgpack(&snap.to_msgpack().unwrap()).unwrap(), snap);
    }

    #[test]
    fn test_schema_names_top_level_fields() {
        let schema = serde_json::to_value(snapshot_schema()).unwrap();
        let required = schema["required"].as_array().unwrap();
        for field in ["v", "t", "s", "b", "p", "e"] {
            assert!(required.iter().any(|r| r == field), "{field}");
        }
    }

    proptest! {
        #[test]
        fn prop_rounding_is_idempotent(x in -1.0e6f64..1.0e6f64, decimals in 0u32..4) {
            let once = round_to(x, decimals);
            prop_assert_eq!(round_to(once, decimals).to_bits(), once.to_bits());
        }

        #[test]
        fn prop_rounding_error_bounded(x in -1.0e4f64..1.0e4f64) {
            prop_assert!((round_to(x, 3) - x).abs() <= 0.0005 + 1e-9);
        }
    }
}

//! # gridiron_core - Deterministic 7v7 Match Simulation Engine
//!
//! A seeded, single-threaded simulation of a 7-vs-7 match: player and ball
//! kinematics, touch and collision detection, rule enforcement, cards,
//! resource-gated abilities and a versioned snapshot/replay protocol.
//!
//! ## Features
//! - 100% deterministic simulation (same seed + same actions = same frames)
//! - Closed, tagged event model drained by the caller every tick
//! - Versioned snapshot frames (JSON / MessagePack) with stable rounding
//! - Append-only JSONL replay log with loader, validator and diff tool
//!
//! ## Usage
//! ```no_run
//! use gridiron_core::{Action, SimConfig, SimulationContext};
//!
//! let mut ctx = SimulationContext::new(SimConfig::default(), 42).unwrap();
//! let action = Action::idle(ctx.state().players.len());
//! let outcome = ctx.step(&action).unwrap();
//! let events = ctx.drain_events();
//! println!("tick {} -> {} events, goal={:?}", ctx.state().tick, events.len(), outcome.goal);
//! ```

// Engine APIs take several physics parameters at once
#![allow(clippy::too_many_arguments)]

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod observation;
pub mod policy;
pub mod replay;
pub mod rng;
pub mod serialization;
pub mod state;

pub use config::SimConfig;
pub use engine::{Action, CastRequest, PlayerControl, SimulationContext, StepOutcome};
pub use error::{ConfigError, InputError, SimError};
pub use events::{EventKind, EventType, MatchEvent};
pub use rng::DeterministicRng;
pub use serialization::{Snapshot, SNAPSHOT_VERSION};
pub use state::{BallState, MatchState, PlayerState, Score, TeamId, Vec2};

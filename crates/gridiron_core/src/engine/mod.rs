//! Match engine.
//!
//! `SimulationContext` owns everything one match needs: config, RNG, state,
//! referee and ability registry. `step` runs the full pipeline synchronously:
//!
//! 1. validate the action (rejected input never touches state)
//! 2. players, then ball (`motion`)
//! 3. contacts judged by the referee (`collision`, `referee`)
//! 4. cast requests in submission order, then resource decay (`abilities`)
//! 5. goal / out-of-bounds classification and restart (`rules`)
//! 6. spectacle accumulation and invariant checks
//!
//! Independent matches share nothing and may run on separate threads.

pub mod abilities;
pub mod action;
pub mod collision;
pub mod invariants;
pub mod motion;
pub mod referee;
pub mod rules;

pub use abilities::{AbilityManager, CastOutcome, CastRejection};
pub use action::{Action, CastRequest, PlayerControl};
pub use collision::{detect_collisions, Contact};
pub use invariants::check_invariants;
pub use motion::{BallStep, MotionIntegrator};
pub use referee::{CardType, Referee};
pub use rules::RulesEngine;

use crate::config::SimConfig;
use crate::error::SimError;
use crate::events::{EventKind, EventType, MatchEvent, Restart};
use crate::rng::DeterministicRng;
use crate::serialization::Snapshot;
use crate::state::{BallState, FormationLayout, MatchState, TeamId, Vec2, DEFAULT_LAYOUT};

/// A cast request that did not go through.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedCast {
    pub player: usize,
    pub ability_id: String,
    pub reason: CastRejection,
}

/// Summary of one `step`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepOutcome {
    pub tick: u64,
    /// Team that scored this tick
    pub goal: Option<TeamId>,
    pub restart: Option<Restart>,
    /// Player index that kicked the ball
    pub kicker: Option<usize>,
    pub rejected_casts: Vec<RejectedCast>,
    pub event_count: usize,
    pub truncated: bool,
}

pub struct SimulationContext {
    config: SimConfig,
    rng: DeterministicRng,
    state: MatchState,
    rules: RulesEngine,
    referee: Referee,
    abilities: AbilityManager,
    layout: FormationLayout,
    final_third_entered: bool,
    /// Event types of the last completed tick, kept for snapshots after a drain
    tick_events: Vec<EventType>,
    faulted_at: Option<u64>,
}

impl SimulationContext {
    /// Validate `config` and spawn a fresh match from `seed`.
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, SimError> {
        config.validate_all()?;
        let mut ctx = Self {
            rules: RulesEngine::new(config.pitch.clone(), config.rules.clone()),
            referee: Referee::new(config.referee.clone()),
            abilities: AbilityManager::new(config.abilities.clone()),
            rng: DeterministicRng::new(seed),
            state: MatchState::new(Vec::new(), BallState::kickoff(&config.pitch)),
            layout: DEFAULT_LAYOUT,
            final_third_entered: false,
            tick_events: Vec::new(),
            faulted_at: None,
            config,
        };
        ctx.reset(seed);
        Ok(ctx)
    }

    /// Discard the match and start over from `seed`. Clears a fault.
    pub fn reset(&mut self, seed: u64) {
        self.rng.reset(seed);
        let players = self.layout.spawn(
            &self.config.pitch,
            &mut self.rng,
            self.config.physics.spawn_jitter_std,
        );
        self.state = MatchState::new(players, BallState::kickoff(&self.config.pitch));
        self.referee.reset();
        self.final_third_entered = false;
        self.tick_events.clear();
        self.faulted_at = None;
        tracing::debug!(seed, players = self.state.players.len(), "match reset");
    }

    /// Advance one tick.
    pub fn step(&mut self, action: &Action) -> Result<StepOutcome, SimError> {
        if let Some(tick) = self.faulted_at {
            return Err(SimError::Faulted { tick });
        }
        action.validate(self.state.players.len())?;

        let previous_score = self.state.score;
        self.state.tick += 1;
        self.state.events.clear();
        let tick = self.state.tick;

        let controls: Vec<PlayerControl> = action
            .controls
            .iter()
            .zip(&self.state.players)
            .map(|(c, p)| if p.is_sent_off() { PlayerControl::default() } else { c.clamped() })
            .collect();

        let mover = MotionIntegrator::new(
            &self.config.pitch,
            &self.config.physics,
            &self.config.stamina,
            &self.config.rules,
        );
        mover.update_players(&mut self.state.players, &controls);
        let ball_step = mover.update_ball(&mut self.state, &controls, &mut self.final_third_entered);

        self.judge_contacts();
        let rejected_casts = self.process_casts(action, tick);
        self.abilities.update(&mut self.state.players);

        let mut outcome = StepOutcome { tick, kicker: ball_step.kicker, rejected_casts, ..Default::default() };
        let ball_pos = self.state.ball.pos;
        if let Some(scoring) = self.rules.check_goal(ball_pos) {
            self.apply_goal(scoring);
            outcome.goal = Some(scoring);
        } else if let Some(restart) = self.rules.check_out_of_bounds(ball_pos, self.state.ball.last_touch_team) {
            self.apply_restart(restart, ball_pos);
            outcome.restart = Some(restart);
        }

        let gained: f64 = self
            .state
            .events
            .iter()
            .filter_map(|e| self.config.spectacle_weights.get(&e.event_type()))
            .sum();
        self.state.spectacle_score += gained;
        self.tick_events = self.state.events.iter().map(MatchEvent::event_type).collect();

        if let Err(detail) = check_invariants(&self.state, &self.config.pitch, previous_score) {
            tracing::error!(tick, %detail, "invariant violation, match faulted");
            self.faulted_at = Some(tick);
            return Err(SimError::InvariantViolation { tick, detail });
        }

        outcome.event_count = self.state.events.len();
        outcome.truncated = self.is_truncated();
        tracing::trace!(tick, events = outcome.event_count, "step");
        Ok(outcome)
    }

    fn judge_contacts(&mut self) {
        let ball_pos = self.state.ball.pos;
        for contact in detect_collisions(&self.state.players, &self.config.physics) {
            let actor = &self.state.players[contact.actor];
            let target = &self.state.players[contact.target];
            // Only challenges for the ball are refereed
            if actor.is_sent_off() || target.is_sent_off() || !self.rules.check_interaction(target.pos, ball_pos) {
                continue;
            }
            let (actor_id, target_id) = (actor.id.clone(), target.id.clone());
            let mut sent_off = false;
            for kind in self.referee.process_collision(&actor_id, &target_id, contact.impulse) {
                sent_off |= matches!(kind, EventKind::Red { .. });
                self.state.push_event(kind);
            }
            if sent_off {
                self.state.players[contact.actor].send_off();
            }
        }
    }

    fn process_casts(&mut self, action: &Action, tick: u64) -> Vec<RejectedCast> {
        let mut rejected = Vec::new();
        for request in &action.casts {
            let player = &mut self.state.players[request.player];
            match self.abilities.cast(player, &request.ability_id, tick) {
                CastOutcome::Cast(def) => {
                    let actor_id = player.id.clone();
                    self.state.push_event(EventKind::AbilityCast {
                        actor_id,
                        ability_id: def.id,
                        energy_cost: def.energy_cost,
                    });
                }
                CastOutcome::Rejected(reason) => {
                    tracing::debug!(tick, player = request.player, ability = %request.ability_id, ?reason, "cast rejected");
                    rejected.push(RejectedCast {
                        player: request.player,
                        ability_id: request.ability_id.clone(),
                        reason,
                    });
                }
            }
        }
        rejected
    }

    fn apply_goal(&mut self, scoring: TeamId) {
        let scorer_id = match self.state.ball.last_touch_team {
            Some(team) if team == scoring => self.state.ball.last_touch_id.clone(),
            _ => None,
        };
        let goals = self.state.score.award(scoring);
        tracing::debug!(tick = self.state.tick, team = scoring.code(), goals, "goal");
        self.state.push_event(EventKind::Goal { scoring_team: scoring, scorer_id });
        self.state.push_event(EventKind::Kickoff { team: scoring.opponent() });

        self.layout.reposition(
            &mut self.state.players,
            &self.config.pitch,
            &mut self.rng,
            self.config.physics.spawn_jitter_std,
        );
        self.state.ball = BallState::kickoff(&self.config.pitch);
        self.final_third_entered = false;
    }

    fn apply_restart(&mut self, restart: Restart, out_at: Vec2) {
        let awarded_to = self.rules.awarded_team(restart, out_at, self.state.ball.last_touch_team);
        let last_touch_id = self.state.ball.last_touch_id.take();
        tracing::debug!(tick = self.state.tick, ?restart, awarded = ?awarded_to, "ball out of play");
        self.state.push_event(EventKind::OutOfBounds { restart, awarded_to, last_touch_id });

        let mut ball = BallState::at(self.rules.restart_spot(restart, out_at));
        ball.last_touch_team = awarded_to;
        self.state.ball = ball;
        self.final_third_entered = false;
    }

    /// `step` from a flat policy output laid out as `num_players x action_dims`
    /// per the match config.
    pub fn step_flat(&mut self, values: &[f32]) -> Result<StepOutcome, SimError> {
        let action = Action::from_flat(values, self.num_players(), self.config.match_cfg.action_dims)?;
        self.step(&action)
    }

    /// Take the events of the last tick.
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        self.state.drain_events()
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn referee(&self) -> &Referee {
        &self.referee
    }

    pub fn abilities(&self) -> &AbilityManager {
        &self.abilities
    }

    pub fn rules(&self) -> &RulesEngine {
        &self.rules
    }

    pub fn layout(&self) -> &FormationLayout {
        &self.layout
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn num_players(&self) -> usize {
        self.state.players.len()
    }

    /// Episode length reached. Stepping further is allowed; stopping is the caller's call.
    pub fn is_truncated(&self) -> bool {
        self.state.tick >= self.config.match_cfg.max_ticks
    }

    pub fn is_faulted(&self) -> bool {
        self.faulted_at.is_some()
    }

    /// Versioned frame of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_state(&self.state, &self.tick_events)
    }
}

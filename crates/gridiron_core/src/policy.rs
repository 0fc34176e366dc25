//! Scripted action sources.
//!
//! Deterministic stand-ins for learned policies, used by the CLI, batch runs
//! and tests. Neither policy draws randomness: the same state always yields
//! the same action.

use crate::config::SimConfig;
use crate::engine::{Action, PlayerControl};
use crate::state::{FormationLayout, MatchState, PlayerState, TeamId, Vec2, DEFAULT_LAYOUT};

/// Produces one action per tick from the current state.
pub trait ActionSource {
    fn act(&mut self, state: &MatchState, config: &SimConfig) -> Action;
}

/// Every player stands still.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePolicy;

impl ActionSource for IdlePolicy {
    fn act(&mut self, state: &MatchState, _config: &SimConfig) -> Action {
        Action::idle(state.players.len())
    }
}

/// Nearest player per team chases the ball and plays it toward goal; the rest
/// hold shifted formation anchors.
#[derive(Debug, Clone)]
pub struct FormationChaser {
    layout: FormationLayout,
    /// Distance at which a player moving to its anchor starts to slow down
    arrive_radius: f64,
    /// Ability the chaser fires when it reaches the ball in shooting range
    ability: Option<String>,
}

impl Default for FormationChaser {
    fn default() -> Self {
        Self { layout: DEFAULT_LAYOUT, arrive_radius: 40.0, ability: None }
    }
}

impl FormationChaser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ability(mut self, ability_id: &str) -> Self {
        self.ability = Some(ability_id.to_string());
        self
    }

    fn chaser(state: &MatchState, team: TeamId) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, p) in state.players.iter().enumerate() {
            if p.team != team || p.is_sent_off() {
                continue;
            }
            let dist = (p.pos - state.ball.pos).norm();
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((idx, dist));
            }
        }
        best.map(|(idx, _)| idx)
    }

    fn chase(&self, player: &PlayerState, state: &MatchState, config: &SimConfig) -> PlayerControl {
        let goal = Vec2::new(player.team.attacked_line(config.pitch.width), config.pitch.height / 2.0);
        let ball = state.ball.pos;
        let to_goal = unit(goal - ball);
        let to_ball = ball - player.pos;

        if to_ball.norm() <= config.physics.touch_radius {
            let in_range = (goal - ball).norm() <= config.rules.shot_range_fraction * config.pitch.width;
            let kick = if in_range { 1.0 } else { 0.0 };
            return PlayerControl::new(to_goal.x, to_goal.y).with_flags(kick, 0.0);
        }
        // Approach from behind the ball so the touch sends it goalward
        let approach = unit(ball - to_goal * (config.physics.touch_radius * 0.5) - player.pos);
        PlayerControl::new(approach.x, approach.y).with_flags(0.0, 1.0)
    }

    fn hold(&self, player: &PlayerState, target: Vec2) -> PlayerControl {
        let offset = target - player.pos;
        let dist = offset.norm();
        if dist < 1e-9 {
            return PlayerControl::default();
        }
        let gain = (dist / self.arrive_radius).min(1.0);
        let dir = offset / dist * gain;
        PlayerControl::new(dir.x, dir.y)
    }

    fn wants_cast(&self, player: &PlayerState, state: &MatchState, config: &SimConfig) -> Option<String> {
        let id = self.ability.as_ref()?;
        let def = config.ability(id)?;
        let goal = Vec2::new(player.team.attacked_line(config.pitch.width), config.pitch.height / 2.0);
        let near_ball = (state.ball.pos - player.pos).norm() <= config.physics.touch_radius;
        let in_range = (goal - state.ball.pos).norm() <= config.rules.shot_range_fraction * config.pitch.width;
        let ready = player.cooldown_ready.get(id).map_or(true, |&t| state.tick + 1 >= t);
        let affordable = player.energy >= def.energy_cost && player.heat <= config.abilities.heat_gate;
        (near_ball && in_range && ready && affordable).then(|| id.clone())
    }
}

impl ActionSource for FormationChaser {
    fn act(&mut self, state: &MatchState, config: &SimConfig) -> Action {
        let possession = state.ball.last_touch_team;
        let mut controls = vec![PlayerControl::default(); state.players.len()];
        let mut action_casts = Vec::new();

        for team in [TeamId::Blue, TeamId::Red] {
            let targets = self.layout.shifted_targets(team, state.ball.pos, possession, &config.pitch);
            let chaser = Self::chaser(state, team);
            let mut slot = 0;
            for (idx, player) in state.players.iter().enumerate() {
                if player.team != team {
                    continue;
                }
                let target = targets[slot % targets.len()];
                slot += 1;
                if player.is_sent_off() {
                    continue;
                }
                controls[idx] = if chaser == Some(idx) {
                    if let Some(ability_id) = self.wants_cast(player, state, config) {
                        action_casts.push((idx, ability_id));
                    }
                    self.chase(player, state, config)
                } else {
                    self.hold(player, target)
                };
            }
        }

        action_casts
            .into_iter()
            .fold(Action::from_controls(controls), |action, (idx, id)| action.with_cast(idx, &id))
    }
}

fn unit(v: Vec2) -> Vec2 {
    let n = v.norm();
    if n < 1e-9 {
        Vec2::zeros()
    } else {
        v / n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SimulationContext;

    #[test]
    fn test_idle_policy() {
        let cfg = SimConfig::default();
        let ctx = SimulationContext::new(cfg.clone(), 1).unwrap();
        let action = IdlePolicy.act(ctx.state(), &cfg);
        assert_eq!(action, Action::idle(14));
    }

    #[test]
    fn test_chaser_is_deterministic_and_valid() {
        let cfg = SimConfig::default();
        let ctx = SimulationContext::new(cfg.clone(), 2).unwrap();
        let mut policy = FormationChaser::new();
        let a = policy.act(ctx.state(), &cfg);
        let b = policy.act(ctx.state(), &cfg);
        assert_eq!(a, b);
        assert!(a.validate(14).is_ok());
        assert!(a.controls.iter().all(|c| c.clamped() == *c));
    }

    #[test]
    fn test_nearest_player_per_team_chases() {
        let cfg = SimConfig::default();
        let ctx = SimulationContext::new(cfg.clone(), 3).unwrap();
        let state = ctx.state();
        // CM is closest to the centre spot on both sides
        assert_eq!(FormationChaser::chaser(state, TeamId::Blue), Some(4));
        assert_eq!(FormationChaser::chaser(state, TeamId::Red), Some(11));
        let action = FormationChaser::new().act(state, &cfg);
        assert!(action.controls[4].force.x > 0.0);
        assert!(action.controls[11].force.x < 0.0);
        assert_eq!(action.controls[4].dash, 1.0);
    }

    #[test]
    fn test_chaser_kicks_toward_goal_and_casts_in_range() {
        let cfg = SimConfig::default();
        let mut state = SimulationContext::new(cfg.clone(), 4).unwrap().state().clone();
        state.ball.pos = Vec2::new(520.0, 200.0);
        state.players[6].pos = Vec2::new(512.0, 200.0);
        let action = FormationChaser::new().with_ability("overdrive").act(&state, &cfg);
        let ctrl = action.controls[6];
        assert!((ctrl.force.x - 1.0).abs() < 1e-9);
        assert_eq!(ctrl.kick, 1.0);
        assert_eq!(action.casts.len(), 1);
        assert_eq!(action.casts[0].player, 6);
    }

    #[test]
    fn test_chaser_game_stays_valid() {
        let cfg = SimConfig::default();
        let mut ctx = SimulationContext::new(cfg.clone(), 5).unwrap();
        let mut policy = FormationChaser::new().with_ability("overdrive");
        let mut touches = 0;
        for _ in 0..300 {
            let action = policy.act(ctx.state(), &cfg);
            let outcome = ctx.step(&action).unwrap();
            touches += outcome.kicker.is_some() as usize;
            ctx.drain_events();
        }
        assert!(touches > 0);
    }
}

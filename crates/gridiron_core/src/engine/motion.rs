//! Motion Integrator
//!
//! Per-tick kinematics in a fixed order: every player in index order, then
//! the ball. The ball step resolves at most one kick per tick and derives
//! touch, pass, possession, shot and progression events from it.
//!
//! # Player update
//! 1. clamp control to [-1, 1]
//! 2. `accel = control * player_accel * fatigue * dash_factor`,
//!    fatigue = `clip(stamina / 100, 0.3, 1.0)`
//! 3. `vel = (vel + accel) * friction`, speed capped at `max_player_speed`
//! 4. `pos += vel`, clamped to the pitch
//! 5. stamina drain, never taking stamina below the movement floor
//!
//! # Ball update
//! nearest player (ties: lowest index) kicks if within `touch_radius` with a
//! non-negligible control, then spin, friction, speed cap, integrate, clamp.

use super::action::PlayerControl;
use crate::config::{PhysicsConfig, PitchConfig, RulesConfig, StaminaConfig};
use crate::events::EventKind;
use crate::state::formation::clamp_to_pitch;
use crate::state::{MatchState, PlayerState, TeamId, Vec2};

const FATIGUE_MIN: f64 = 0.3;
const XG_MIN: f64 = 0.01;
const XG_MAX: f64 = 0.99;

/// Result of the ball step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BallStep {
    /// Index of the player who kicked this tick
    pub kicker: Option<usize>,
    /// Ball travel toward the possessing team's attacking goal
    pub forward_delta: f64,
}

pub struct MotionIntegrator<'a> {
    pub pitch: &'a PitchConfig,
    pub physics: &'a PhysicsConfig,
    pub stamina: &'a StaminaConfig,
    pub rules: &'a RulesConfig,
}

impl<'a> MotionIntegrator<'a> {
    pub fn new(
        pitch: &'a PitchConfig,
        physics: &'a PhysicsConfig,
        stamina: &'a StaminaConfig,
        rules: &'a RulesConfig,
    ) -> Self {
        Self { pitch, physics, stamina, rules }
    }

    // ============================================================
    // Players
    // ============================================================

    /// Integrate all players in index order. `controls` must match `players` in length.
    pub fn update_players(&self, players: &mut [PlayerState], controls: &[PlayerControl]) {
        for (player, control) in players.iter_mut().zip(controls) {
            if player.is_sent_off() {
                player.vel = Vec2::zeros();
                continue;
            }
            self.update_player(player, &control.clamped());
        }
    }

    fn update_player(&self, player: &mut PlayerState, control: &PlayerControl) {
        let fatigue = (player.stamina / 100.0).clamp(FATIGUE_MIN, 1.0);
        let dash_factor = 1.0 + (self.physics.dash_multiplier - 1.0) * control.dash;
        let accel = control.force * (self.physics.player_accel * fatigue * dash_factor);

        player.vel = (player.vel + accel) * self.physics.player_friction;
        player.vel = cap_speed(player.vel, self.physics.max_player_speed);

        player.pos = clamp_to_pitch(player.pos + player.vel, self.pitch);

        let workload = control.force.norm();
        let drain = self.stamina.drain_base
            + workload * self.stamina.drain_per_control
            + control.dash * self.stamina.dash_drain;
        player.stamina = drain_stamina(player.stamina, drain, self.stamina.floor);
    }

    // ============================================================
    // Ball
    // ============================================================

    /// Nearest eligible player to `ball_pos`.
    ///
    /// Exact distance ties resolve to the lowest index: the scan only replaces
    /// the current best on a strictly smaller distance. Sent-off players are skipped.
    pub fn nearest_player(players: &[PlayerState], ball_pos: Vec2) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, player) in players.iter().enumerate() {
            if player.is_sent_off() {
                continue;
            }
            let dist = (player.pos - ball_pos).norm();
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((idx, dist)),
            }
        }
        best
    }

    /// Kick resolution, spin, friction and integration for the ball.
    ///
    /// `final_third_entered` tracks the once-per-possession FINAL_THIRD_ENTRY.
    pub fn update_ball(
        &self,
        state: &mut MatchState,
        controls: &[PlayerControl],
        final_third_entered: &mut bool,
    ) -> BallStep {
        let last_pos = state.ball.pos;
        let mut step = BallStep::default();

        if let Some((idx, dist)) = Self::nearest_player(&state.players, state.ball.pos) {
            let control = controls.get(idx).map(PlayerControl::clamped).unwrap_or_default();
            let strength = control.force.norm();
            if dist <= self.physics.touch_radius && strength > self.physics.kick_min_control {
                self.resolve_kick(state, idx, &control, final_third_entered);
                step.kicker = Some(idx);
            }
        }

        let ball = &mut state.ball;

        // Magnus: spin bends the path perpendicular to travel
        let perp = Vec2::new(-ball.vel.y, ball.vel.x);
        ball.vel += perp * (ball.spin * self.physics.magnus);
        ball.spin *= self.physics.spin_decay;

        ball.vel *= self.physics.ball_friction;
        ball.vel = cap_speed(ball.vel, self.physics.max_ball_speed);
        ball.pos = clamp_to_pitch(ball.pos + ball.vel, self.pitch);

        if let Some(team) = state.ball.last_touch_team {
            step.forward_delta = (state.ball.pos.x - last_pos.x) * team.attack_sign();
            self.emit_progression(state, team, last_pos, step.forward_delta, final_third_entered);
        }
        step
    }

    fn resolve_kick(
        &self,
        state: &mut MatchState,
        idx: usize,
        control: &PlayerControl,
        final_third_entered: &mut bool,
    ) {
        let strength = control.force.norm();
        let direction = control.force / strength;
        let impulse = (self.physics.kick_base_impulse + self.physics.kick_scale * strength)
            * (1.0 + self.physics.kick_flag_boost * control.kick);

        let old_vel = state.ball.vel;
        state.ball.vel = old_vel * self.physics.kick_retain + direction * impulse;
        state.ball.spin += self.physics.spin_transfer * cross(old_vel, direction);

        let (kicker_id, team) = {
            let p = &state.players[idx];
            (p.id.clone(), p.team)
        };
        let prev_id = state.ball.last_touch_id.replace(kicker_id.clone());
        let prev_team = state.ball.last_touch_team.replace(team);

        state.push_event(EventKind::BallTouch { actor_id: kicker_id.clone(), team, impulse });

        if prev_team == Some(team) {
            if let Some(passer_id) = prev_id.filter(|id| *id != kicker_id) {
                state.push_event(EventKind::Pass {
                    passer_id,
                    receiver_id: kicker_id.clone(),
                    team,
                });
            }
        } else {
            *final_third_entered = false;
            state.push_event(EventKind::Possession { team, player_id: kicker_id.clone() });
        }

        if let Some((distance, on_target)) = self.shot_profile(state.ball.pos, state.ball.vel, team) {
            let ball_pos = state.ball.pos;
            let pressure = state
                .players
                .iter()
                .filter(|p| p.team != team && !p.is_sent_off())
                .filter(|p| (p.pos - ball_pos).norm() < self.rules.xg_pressure_radius)
                .count();
            let xg = self.expected_goals(distance, pressure);
            state.push_event(EventKind::Shot { shooter_id: kicker_id, team, distance, on_target, xg });
        }
    }

    /// `(distance_to_goal, on_target)` when a kick from `pos` with `vel` counts as a shot.
    pub fn shot_profile(&self, pos: Vec2, vel: Vec2, team: TeamId) -> Option<(f64, bool)> {
        let goal_x = team.attacked_line(self.pitch.width);
        let goal_center = Vec2::new(goal_x, self.pitch.height / 2.0);
        let distance = (goal_center - pos).norm();
        if distance > self.rules.shot_range_fraction * self.pitch.width {
            return None;
        }
        if vel.x * team.attack_sign() <= 0.0 {
            return None;
        }
        let t = (goal_x - pos.x) / vel.x;
        let y_at_line = pos.y + vel.y * t;
        let (lo, hi) = self.pitch.goal_band();
        Some((distance, y_at_line > lo && y_at_line < hi))
    }

    /// Expected goals for a shot `distance` from goal with `pressure` opponents
    /// near the ball: `exp(-decay * distance) * factor^pressure`, clipped.
    pub fn expected_goals(&self, distance: f64, pressure: usize) -> f64 {
        let base = (-self.rules.xg_distance_decay * distance).exp();
        let pressed = base * self.rules.xg_pressure_factor.powi(i32::try_from(pressure).unwrap_or(i32::MAX));
        pressed.clamp(XG_MIN, XG_MAX)
    }

    fn emit_progression(
        &self,
        state: &mut MatchState,
        team: TeamId,
        last_pos: Vec2,
        forward: f64,
        final_third_entered: &mut bool,
    ) {
        let actor_id = state.ball.last_touch_id.clone().unwrap_or_default();
        if forward > self.rules.progression_min_delta {
            state.push_event(EventKind::Progression {
                actor_id: actor_id.clone(),
                team,
                delta_x: forward,
            });
        }

        let depth = self.pitch.width * self.rules.final_third_fraction;
        let x = state.ball.pos.x;
        let entered = match team {
            TeamId::Blue => {
                let line = self.pitch.width - depth;
                x > line && last_pos.x <= line
            }
            TeamId::Red => x < depth && last_pos.x >= depth,
        };
        if entered && !*final_third_entered {
            *final_third_entered = true;
            state.push_event(EventKind::FinalThirdEntry { actor_id, team });
        }
    }
}

/// Scale `vel` down to `max_speed` if faster.
pub fn cap_speed(vel: Vec2, max_speed: f64) -> Vec2 {
    let speed = vel.norm();
    if speed > max_speed {
        vel * (max_speed / speed)
    } else {
        vel
    }
}

/// Movement drain that never takes stamina below `floor` (and never raises it).
pub fn drain_stamina(stamina: f64, drain: f64, floor: f64) -> f64 {
    let drained = if stamina > floor { (stamina - drain).max(floor) } else { stamina };
    drained.clamp(0.0, 100.0)
}

fn cross(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

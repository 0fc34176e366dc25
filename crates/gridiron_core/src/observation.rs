//! Fixed-width observation vector for policy collaborators.
//!
//! | index   | content                                             |
//! |---------|-----------------------------------------------------|
//! | 0..2    | ball position / pitch size                          |
//! | 2..4    | ball velocity / `max_ball_speed`                    |
//! | 4, 5    | BLUE, RED goals / 10                                |
//! | 6       | episode progress, `tick / max_ticks` capped at 1    |
//! | 8..12   | BLUE then RED centroid / pitch size                 |
//! | 12, 13  | BLUE, RED compactness in [0, 1]                     |
//! | 16..64  | first 12 players: pos / pitch, vel / max speed      |
//!
//! Slots 7, 14 and 15 are reserved and always zero.

use crate::config::SimConfig;
use crate::state::{MatchState, TeamId, Vec2};

pub const OBSERVATION_LEN: usize = 64;

const PLAYER_SLICE_START: usize = 16;
const PLAYER_SLICE_WIDTH: usize = 4;
/// Mean distance from the centroid at which compactness reaches 0
const COMPACTNESS_SPREAD: f64 = 220.0;

pub fn encode_observation(state: &MatchState, config: &SimConfig) -> [f32; OBSERVATION_LEN] {
    let mut obs = [0.0f32; OBSERVATION_LEN];
    let (w, h) = (config.pitch.width, config.pitch.height);
    let norm_pos = |p: &Vec2| [(p.x / w) as f32, (p.y / h) as f32];

    obs[0..2].copy_from_slice(&norm_pos(&state.ball.pos));
    let ball_vel = state.ball.vel / config.physics.max_ball_speed;
    obs[2] = ball_vel.x as f32;
    obs[3] = ball_vel.y as f32;
    obs[4] = state.score.blue as f32 / 10.0;
    obs[5] = state.score.red as f32 / 10.0;
    obs[6] = (state.tick as f64 / config.match_cfg.max_ticks as f64).min(1.0) as f32;

    for (offset, team) in [(8, TeamId::Blue), (10, TeamId::Red)] {
        if let Some(c) = centroid(state, team) {
            obs[offset..offset + 2].copy_from_slice(&norm_pos(&c));
        }
    }
    obs[12] = compactness(state, TeamId::Blue) as f32;
    obs[13] = compactness(state, TeamId::Red) as f32;

    let max_speed = config.physics.max_player_speed;
    let slots = (OBSERVATION_LEN - PLAYER_SLICE_START) / PLAYER_SLICE_WIDTH;
    for (i, player) in state.players.iter().take(slots).enumerate() {
        let cursor = PLAYER_SLICE_START + i * PLAYER_SLICE_WIDTH;
        obs[cursor..cursor + 2].copy_from_slice(&norm_pos(&player.pos));
        obs[cursor + 2] = (player.vel.x / max_speed) as f32;
        obs[cursor + 3] = (player.vel.y / max_speed) as f32;
    }
    obs
}

pub fn centroid(state: &MatchState, team: TeamId) -> Option<Vec2> {
    let (sum, count) = state
        .team_players(team)
        .fold((Vec2::zeros(), 0usize), |(sum, n), p| (sum + p.pos, n + 1));
    (count > 0).then(|| sum / count as f64)
}

/// 1 when the whole team stands on its centroid, 0 at `COMPACTNESS_SPREAD` mean spread.
pub fn compactness(state: &MatchState, team: TeamId) -> f64 {
    let Some(center) = centroid(state, team) else {
        return 0.0;
    };
    let (total, count) = state
        .team_players(team)
        .fold((0.0, 0usize), |(total, n), p| (total + (p.pos - center).norm(), n + 1));
    (1.0 - total / count as f64 / COMPACTNESS_SPREAD).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SimulationContext;

    #[test]
    fn test_layout_on_fresh_match() {
        let cfg = SimConfig::default();
        let ctx = SimulationContext::new(cfg.clone(), 42).unwrap();
        let obs = encode_observation(ctx.state(), &cfg);
        assert_eq!(obs[0], 0.5);
        assert_eq!(obs[1], 0.5);
        assert_eq!(obs[2..8], [0.0; 6]);
        // BLUE sits in its own half, RED in the other
        assert!(obs[8] < 0.5 && obs[10] > 0.5);
        assert!(obs[12] > 0.0 && obs[12] <= 1.0);
        assert_eq!(obs[14..16], [0.0, 0.0]);
        // First player slice is the BLUE keeper
        assert!((obs[16] - 36.0 / 600.0).abs() < 0.01);
        assert!(obs.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_score_and_progress() {
        let cfg = SimConfig::default();
        let mut ctx = SimulationContext::new(cfg.clone(), 1).unwrap();
        ctx.step(&crate::engine::Action::idle(14)).unwrap();
        let mut state = ctx.state().clone();
        state.score.award(TeamId::Red);
        state.tick = 5000;
        let obs = encode_observation(&state, &cfg);
        assert_eq!(obs[5], 0.1);
        assert_eq!(obs[6], 1.0);
    }

    #[test]
    fn test_compactness_bounds() {
        let cfg = SimConfig::default();
        let mut state = SimulationContext::new(cfg, 3).unwrap().state().clone();
        for p in state.players.iter_mut().filter(|p| p.team == TeamId::Red) {
            p.pos = Vec2::new(450.0, 200.0);
        }
        assert_eq!(compactness(&state, TeamId::Red), 1.0);
        assert!(compactness(&state, TeamId::Blue) < 1.0);
    }
}

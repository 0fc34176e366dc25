//! Post-step state checks.
//!
//! Any failure here means the engine produced impossible state from valid
//! input. The context faults the match on the first failure.

use crate::config::PitchConfig;
use crate::state::{MatchState, Score, Vec2};

fn check_position(label: &str, pos: &Vec2, pitch: &PitchConfig) -> Result<(), String> {
    if !pos.x.is_finite() || !pos.y.is_finite() {
        return Err(format!("{label} position is not finite ({}, {})", pos.x, pos.y));
    }
    if pos.x < 0.0 || pos.x > pitch.width || pos.y < 0.0 || pos.y > pitch.height {
        return Err(format!("{label} position ({}, {}) outside pitch", pos.x, pos.y));
    }
    Ok(())
}

fn check_resource(label: &str, name: &str, value: f64, max: Option<f64>) -> Result<(), String> {
    let upper_ok = max.map_or(true, |m| value <= m);
    if !value.is_finite() || value < 0.0 || !upper_ok {
        return Err(format!("{label} {name}={value} out of range"));
    }
    Ok(())
}

/// Validate `state` after a step. `previous_score` is the score before it.
pub fn check_invariants(state: &MatchState, pitch: &PitchConfig, previous_score: Score) -> Result<(), String> {
    check_position("ball", &state.ball.pos, pitch)?;
    if !state.ball.vel.iter().all(|v| v.is_finite()) || !state.ball.spin.is_finite() {
        return Err("ball velocity or spin is not finite".to_string());
    }

    for player in &state.players {
        check_position(&player.id, &player.pos, pitch)?;
        if !player.vel.iter().all(|v| v.is_finite()) {
            return Err(format!("{} velocity is not finite", player.id));
        }
        check_resource(&player.id, "stamina", player.stamina, Some(100.0))?;
        check_resource(&player.id, "energy", player.energy, Some(100.0))?;
        check_resource(&player.id, "heat", player.heat, None)?;
    }

    if state.score.blue < previous_score.blue || state.score.red < previous_score.red {
        return Err("score decreased".to_string());
    }
    if let Some(event) = state.events.iter().find(|e| e.tick != state.tick) {
        return Err(format!("event {} stamped with tick {} during tick {}", event.event_id, event.tick, state.tick));
    }
    if !state.spectacle_score.is_finite() {
        return Err("spectacle score is not finite".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BallState, PlayerState, TeamId};

    fn state() -> MatchState {
        MatchState::new(
            vec![PlayerState::new("blue_gk_0", TeamId::Blue, Vec2::new(36.0, 200.0), "GK")],
            BallState::at(Vec2::new(300.0, 200.0)),
        )
    }

    #[test]
    fn test_valid_state_passes() {
        assert!(check_invariants(&state(), &PitchConfig::default(), Score::default()).is_ok());
    }

    #[test]
    fn test_nan_and_range_violations() {
        let pitch = PitchConfig::default();
        let mut s = state();
        s.ball.pos.x = f64::NAN;
        assert!(check_invariants(&s, &pitch, Score::default()).unwrap_err().contains("ball"));

        let mut s = state();
        s.players[0].energy = 100.5;
        assert!(check_invariants(&s, &pitch, Score::default()).unwrap_err().contains("energy"));

        let mut s = state();
        s.players[0].pos.y = 401.0;
        assert!(check_invariants(&s, &pitch, Score::default()).is_err());
    }

    #[test]
    fn test_score_must_not_decrease() {
        let before = Score { blue: 1, red: 0 };
        let err = check_invariants(&state(), &PitchConfig::default(), before).unwrap_err();
        assert_eq!(err, "score decreased");
    }
}

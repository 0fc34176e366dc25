//! Goal and boundary classification.
//!
//! Pure functions of the ball position (plus the last touching team for
//! corner/goal-kick selection). Positions are clamped to the pitch by the
//! integrator, so boundary tests are inclusive.

use crate::config::{PitchConfig, RulesConfig};
use crate::events::Restart;
use crate::state::formation::clamp_to_pitch;
use crate::state::{TeamId, Vec2};

#[derive(Debug, Clone)]
pub struct RulesEngine {
    pitch: PitchConfig,
    rules: RulesConfig,
}

impl RulesEngine {
    pub fn new(pitch: PitchConfig, rules: RulesConfig) -> Self {
        Self { pitch, rules }
    }

    fn in_goal_band(&self, y: f64) -> bool {
        let (lo, hi) = self.pitch.goal_band();
        y > lo && y < hi
    }

    /// Scoring team if the ball is on a goal line inside the goal mouth.
    ///
    /// Ball on `x = 0` concedes for BLUE (RED scores); ball on `x = width`
    /// concedes for RED (BLUE scores).
    pub fn check_goal(&self, pos: Vec2) -> Option<TeamId> {
        if !self.in_goal_band(pos.y) {
            return None;
        }
        if pos.x <= 0.0 {
            Some(TeamId::Red)
        } else if pos.x >= self.pitch.width {
            Some(TeamId::Blue)
        } else {
            None
        }
    }

    /// Restart kind when the ball is on a boundary outside the goal mouth.
    ///
    /// Touchlines take precedence at the corners. Over a goal line, a last
    /// touch by the defending team gives a corner, anything else a goal kick.
    pub fn check_out_of_bounds(&self, pos: Vec2, last_touch_team: Option<TeamId>) -> Option<Restart> {
        if pos.y <= 0.0 || pos.y >= self.pitch.height {
            return Some(Restart::ThrowIn);
        }
        let defending = if pos.x <= 0.0 {
            TeamId::Blue
        } else if pos.x >= self.pitch.width {
            TeamId::Red
        } else {
            return None;
        };
        if self.in_goal_band(pos.y) {
            return None;
        }
        if last_touch_team == Some(defending) {
            Some(Restart::Corner)
        } else {
            Some(Restart::GoalKick)
        }
    }

    /// Whether a player is close enough to contest the ball.
    pub fn check_interaction(&self, player_pos: Vec2, ball_pos: Vec2) -> bool {
        (player_pos - ball_pos).norm() < self.rules.interaction_radius
    }

    /// Team taking the restart.
    ///
    /// Throw-ins go to the opponent of the last toucher (nobody when the ball
    /// was never touched). Goal kicks go to the defending team, corners to
    /// the attacking team.
    pub fn awarded_team(&self, restart: Restart, pos: Vec2, last_touch_team: Option<TeamId>) -> Option<TeamId> {
        let defending = if pos.x <= self.pitch.width / 2.0 { TeamId::Blue } else { TeamId::Red };
        match restart {
            Restart::ThrowIn => last_touch_team.map(|t| t.opponent()),
            Restart::GoalKick => Some(defending),
            Restart::Corner => Some(defending.opponent()),
        }
    }

    /// Where the ball is placed for `restart`, given where it went out.
    ///
    /// The spot is always on the pitch, whatever the inset and depth.
    pub fn restart_spot(&self, restart: Restart, pos: Vec2) -> Vec2 {
        let (w, h) = (self.pitch.width, self.pitch.height);
        let inset = self.rules.restart_inset;
        let near_side_y = if pos.y <= h / 2.0 { inset } else { h - inset };
        let spot = match restart {
            // `clamp` panics once the inset passes half the width
            Restart::ThrowIn => Vec2::new(pos.x.max(inset).min(w - inset), near_side_y),
            Restart::GoalKick => {
                let depth = self.rules.goal_kick_depth;
                let x = if pos.x <= w / 2.0 { depth } else { w - depth };
                Vec2::new(x, h / 2.0)
            }
            Restart::Corner => {
                let x = if pos.x <= w / 2.0 { inset } else { w - inset };
                Vec2::new(x, near_side_y)
            }
        };
        clamp_to_pitch(spot, &self.pitch)
    }

    pub fn pitch(&self) -> &PitchConfig {
        &self.pitch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RulesEngine {
        RulesEngine::new(PitchConfig::default(), RulesConfig::default())
    }

    #[test]
    fn test_goal_in_band_concedes_for_left_defender() {
        let rules = engine();
        assert_eq!(rules.check_goal(Vec2::new(0.0, 200.0)), Some(TeamId::Red));
        assert_eq!(rules.check_goal(Vec2::new(600.0, 200.0)), Some(TeamId::Blue));
        assert_eq!(rules.check_goal(Vec2::new(-3.0, 239.9)), Some(TeamId::Red));
    }

    #[test]
    fn test_outside_band_is_out_of_bounds_not_goal() {
        let rules = engine();
        assert_eq!(rules.check_goal(Vec2::new(0.0, 50.0)), None);
        assert_eq!(rules.check_out_of_bounds(Vec2::new(0.0, 50.0), None), Some(Restart::GoalKick));
        // Band edges are open
        assert_eq!(rules.check_goal(Vec2::new(0.0, 160.0)), None);
        assert_eq!(rules.check_goal(Vec2::new(600.0, 240.0)), None);
    }

    #[test]
    fn test_in_play_and_goal_mouth_are_not_out() {
        let rules = engine();
        assert_eq!(rules.check_out_of_bounds(Vec2::new(300.0, 200.0), None), None);
        assert_eq!(rules.check_out_of_bounds(Vec2::new(0.0, 200.0), Some(TeamId::Red)), None);
    }

    #[test]
    fn test_touchline_is_throw_in_and_wins_at_corners() {
        let rules = engine();
        assert_eq!(rules.check_out_of_bounds(Vec2::new(250.0, 0.0), None), Some(Restart::ThrowIn));
        assert_eq!(rules.check_out_of_bounds(Vec2::new(250.0, 400.0), None), Some(Restart::ThrowIn));
        assert_eq!(
            rules.check_out_of_bounds(Vec2::new(0.0, 0.0), Some(TeamId::Blue)),
            Some(Restart::ThrowIn)
        );
    }

    #[test]
    fn test_corner_when_defender_touched_last() {
        let rules = engine();
        let left = Vec2::new(0.0, 80.0);
        assert_eq!(rules.check_out_of_bounds(left, Some(TeamId::Blue)), Some(Restart::Corner));
        assert_eq!(rules.check_out_of_bounds(left, Some(TeamId::Red)), Some(Restart::GoalKick));
        let right = Vec2::new(600.0, 320.0);
        assert_eq!(rules.check_out_of_bounds(right, Some(TeamId::Red)), Some(Restart::Corner));
        assert_eq!(rules.awarded_team(Restart::Corner, right, Some(TeamId::Red)), Some(TeamId::Blue));
        assert_eq!(rules.awarded_team(Restart::GoalKick, left, Some(TeamId::Red)), Some(TeamId::Blue));
    }

    #[test]
    fn test_throw_in_awarded_to_opponent() {
        let rules = engine();
        let pos = Vec2::new(250.0, 0.0);
        assert_eq!(rules.awarded_team(Restart::ThrowIn, pos, Some(TeamId::Blue)), Some(TeamId::Red));
        assert_eq!(rules.awarded_team(Restart::ThrowIn, pos, None), None);
    }

    #[test]
    fn test_restart_spots() {
        let rules = engine();
        assert_eq!(rules.restart_spot(Restart::ThrowIn, Vec2::new(0.5, 400.0)), Vec2::new(2.0, 398.0));
        assert_eq!(rules.restart_spot(Restart::GoalKick, Vec2::new(600.0, 20.0)), Vec2::new(564.0, 200.0));
        assert_eq!(rules.restart_spot(Restart::Corner, Vec2::new(0.0, 90.0)), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_restart_spots_stay_on_narrow_pitch() {
        let pitch = PitchConfig { width: 60.0, height: 400.0, goal_width: 20.0 };
        let rules = RulesEngine::new(pitch, RulesConfig { restart_inset: 40.0, ..Default::default() });
        let spot = rules.restart_spot(Restart::ThrowIn, Vec2::new(30.0, 400.0));
        assert!((0.0..=60.0).contains(&spot.x));
        assert_eq!(spot.y, 360.0);

        let pitch = PitchConfig { width: 30.0, height: 400.0, goal_width: 20.0 };
        let rules = RulesEngine::new(pitch, RulesConfig::default());
        let spot = rules.restart_spot(Restart::GoalKick, Vec2::new(30.0, 20.0));
        assert_eq!(spot, Vec2::new(0.0, 200.0));
        for restart in [Restart::ThrowIn, Restart::GoalKick, Restart::Corner] {
            for pos in [Vec2::new(0.0, 0.0), Vec2::new(30.0, 400.0), Vec2::new(15.0, 123.0)] {
                let spot = rules.restart_spot(restart, pos);
                assert!((0.0..=30.0).contains(&spot.x) && (0.0..=400.0).contains(&spot.y));
            }
        }
    }

    #[test]
    fn test_interaction_radius() {
        let rules = engine();
        assert!(rules.check_interaction(Vec2::new(100.0, 100.0), Vec2::new(119.9, 100.0)));
        assert!(!rules.check_interaction(Vec2::new(100.0, 100.0), Vec2::new(120.0, 100.0)));
    }
}

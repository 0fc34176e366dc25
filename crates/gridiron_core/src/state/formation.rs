//! 2-3-1 formation: spawn slots and phase-dependent movement anchors.
//!
//! Slot coordinates are authored for a 600 x 400 reference pitch and scaled to
//! the configured pitch. RED slots mirror BLUE across the halfway line.

use super::{PlayerState, TeamId, Vec2};
use crate::config::PitchConfig;
use crate::rng::DeterministicRng;

const REF_WIDTH: f64 = 600.0;
const REF_HEIGHT: f64 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleSlot {
    pub name: &'static str,
    /// BLUE anchor on the reference pitch
    pub blue: (f64, f64),
}

impl RoleSlot {
    /// Anchor for `team`, scaled to `pitch`.
    pub fn anchor(&self, team: TeamId, pitch: &PitchConfig) -> Vec2 {
        let (bx, by) = self.blue;
        let x = match team {
            TeamId::Blue => bx,
            TeamId::Red => REF_WIDTH - bx,
        };
        Vec2::new(x * pitch.width / REF_WIDTH, by * pitch.height / REF_HEIGHT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationLayout {
    pub name: &'static str,
    pub slots: [RoleSlot; 7],
}

pub const DEFAULT_LAYOUT: FormationLayout = FormationLayout {
    name: "2-3-1",
    slots: [
        RoleSlot { name: "GK", blue: (36.0, 200.0) },
        RoleSlot { name: "LCB", blue: (132.0, 110.0) },
        RoleSlot { name: "RCB", blue: (132.0, 290.0) },
        RoleSlot { name: "LM", blue: (264.0, 95.0) },
        RoleSlot { name: "CM", blue: (252.0, 200.0) },
        RoleSlot { name: "RM", blue: (264.0, 305.0) },
        RoleSlot { name: "ST", blue: (396.0, 200.0) },
    ],
};

impl FormationLayout {
    pub fn anchors(&self, team: TeamId, pitch: &PitchConfig) -> Vec<Vec2> {
        self.slots.iter().map(|s| s.anchor(team, pitch)).collect()
    }

    /// Spawn both teams in fixed order (BLUE slots, then RED slots).
    ///
    /// Jitter draws two normals per player, x then y, in spawn order.
    pub fn spawn(
        &self,
        pitch: &PitchConfig,
        rng: &mut DeterministicRng,
        jitter_std: f64,
    ) -> Vec<PlayerState> {
        let mut players = Vec::with_capacity(self.slots.len() * 2);
        for team in [TeamId::Blue, TeamId::Red] {
            for (idx, slot) in self.slots.iter().enumerate() {
                let pos = jittered_anchor(slot, team, pitch, rng, jitter_std);
                let id = format!(
                    "{}_{}_{}",
                    team.code().to_ascii_lowercase(),
                    slot.name.to_ascii_lowercase(),
                    idx
                );
                players.push(PlayerState::new(id, team, pos, slot.name));
            }
        }
        players
    }

    /// Move spawned players back to their slots after a goal.
    ///
    /// Draws jitter in the same order as `spawn`. Position and velocity are
    /// reset; resources, tags and cooldowns carry over.
    pub fn reposition(
        &self,
        players: &mut [PlayerState],
        pitch: &PitchConfig,
        rng: &mut DeterministicRng,
        jitter_std: f64,
    ) {
        let slots = self.slots.len();
        for (idx, player) in players.iter_mut().enumerate() {
            let slot = &self.slots[idx % slots];
            player.pos = jittered_anchor(slot, player.team, pitch, rng, jitter_std);
            player.vel = Vec2::zeros();
        }
    }

    /// Anchors shifted toward the ball: the team in possession stretches,
    /// the other compacts.
    pub fn shifted_targets(
        &self,
        team: TeamId,
        ball_pos: Vec2,
        possession: Option<TeamId>,
        pitch: &PitchConfig,
    ) -> Vec<Vec2> {
        let sx = pitch.width / REF_WIDTH;
        let sy = pitch.height / REF_HEIGHT;
        let center = Vec2::new(pitch.width / 2.0, pitch.height / 2.0);
        let offset = ball_pos - center;

        let (x_shift, y_shift, scale) = if possession == Some(team) {
            (
                (offset.x * 0.12).clamp(-52.0 * sx, 52.0 * sx),
                (offset.y * 0.08).clamp(-28.0 * sy, 28.0 * sy),
                1.08,
            )
        } else {
            (
                (offset.x * 0.07).clamp(-34.0 * sx, 34.0 * sx),
                (offset.y * 0.05).clamp(-20.0 * sy, 20.0 * sy),
                0.94,
            )
        };

        self.anchors(team, pitch)
            .into_iter()
            .map(|anchor| {
                let shifted = (anchor - center) * scale + center + Vec2::new(x_shift, y_shift);
                clamp_to_pitch(shifted, pitch)
            })
            .collect()
    }
}

/// Mean pairwise distance normalised to [0, 1] (160 units = fully spread).
pub fn spacing_score(positions: &[Vec2]) -> f64 {
    if positions.len() < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            total += (positions[i] - positions[j]).norm();
            pairs += 1;
        }
    }
    (total / pairs as f64 / 160.0).clamp(0.0, 1.0)
}

pub fn clamp_to_pitch(pos: Vec2, pitch: &PitchConfig) -> Vec2 {
    Vec2::new(pos.x.clamp(0.0, pitch.width), pos.y.clamp(0.0, pitch.height))
}

fn jittered_anchor(
    slot: &RoleSlot,
    team: TeamId,
    pitch: &PitchConfig,
    rng: &mut DeterministicRng,
    jitter_std: f64,
) -> Vec2 {
    let jitter = Vec2::new(rng.normal(0.0, jitter_std), rng.normal(0.0, jitter_std));
    clamp_to_pitch(slot.anchor(team, pitch) + jitter, pitch)
}

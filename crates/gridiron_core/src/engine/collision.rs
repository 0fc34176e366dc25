//! Player-player contact detection.
//!
//! Pairs are scanned in `(i, j)` index order with `i < j`, so the contact list
//! is deterministic. Only opposing, active players that are overlapping and
//! closing produce a contact.

use crate::config::PhysicsConfig;
use crate::state::PlayerState;

const MIN_SEPARATION: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Player driving harder into the contact
    pub actor: usize,
    pub target: usize,
    pub impulse: f64,
}

pub fn detect_collisions(players: &[PlayerState], physics: &PhysicsConfig) -> Vec<Contact> {
    let mut contacts = Vec::new();
    for i in 0..players.len() {
        for j in (i + 1)..players.len() {
            let (a, b) = (&players[i], &players[j]);
            if a.team == b.team || a.is_sent_off() || b.is_sent_off() {
                continue;
            }
            let offset = b.pos - a.pos;
            let dist = offset.norm();
            if !(dist < physics.collision_radius) || dist < MIN_SEPARATION {
                continue;
            }
            let normal = offset / dist;
            let push_a = a.vel.dot(&normal);
            let push_b = -b.vel.dot(&normal);
            let closing = push_a + push_b;
            if closing <= 0.0 {
                continue;
            }
            let (actor, target) = if push_a >= push_b { (i, j) } else { (j, i) };
            contacts.push(Contact { actor, target, impulse: closing * physics.collision_impulse_scale });
        }
    }
    contacts
}

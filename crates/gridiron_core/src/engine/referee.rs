//! Foul detection and the card state machine.
//!
//! Penalty points accumulate per player for the whole match. Each card is a
//! one-shot transition: it fires the first time the points reach its
//! threshold and never again, however long the points stay in range.

use crate::config::RefereeConfig;
use crate::events::{EventKind, MatchEvent};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CardType {
    Yellow,
    Red,
}

#[derive(Debug, Clone, Default)]
pub struct Referee {
    config: RefereeConfig,
    penalty_points: BTreeMap<String, f64>,
    issued: BTreeMap<String, BTreeSet<CardType>>,
}

impl Referee {
    pub fn new(config: RefereeConfig) -> Self {
        Self { config, penalty_points: BTreeMap::new(), issued: BTreeMap::new() }
    }

    /// Judge one contact. Returns FOUL plus any cards, in that order.
    ///
    /// Impulses at or below `foul_threshold` are fair challenges.
    pub fn process_collision(&mut self, actor_id: &str, target_id: &str, impulse: f64) -> Vec<EventKind> {
        if !(impulse > self.config.foul_threshold) {
            return Vec::new();
        }
        let points = (impulse - self.config.foul_threshold) / 2.0;
        let total = {
            let entry = self.penalty_points.entry(actor_id.to_string()).or_insert(0.0);
            *entry += points;
            *entry
        };

        let mut events = vec![EventKind::Foul {
            actor_id: actor_id.to_string(),
            target_id: target_id.to_string(),
            severity: impulse,
            points,
        }];
        if total >= self.config.yellow_threshold && self.issue(actor_id, CardType::Yellow) {
            tracing::debug!(player = actor_id, points = total, "yellow card");
            events.push(EventKind::Yellow { actor_id: actor_id.to_string(), points: total });
        }
        if total >= self.config.red_threshold && self.issue(actor_id, CardType::Red) {
            tracing::debug!(player = actor_id, points = total, "red card");
            events.push(EventKind::Red { actor_id: actor_id.to_string(), points: total });
        }
        events
    }

    /// Flag a FOUL for external review. The core never reverses outcomes.
    pub fn check_var(&self, event: &MatchEvent) -> bool {
        event.severity().map_or(false, |s| s > self.config.var_severity)
    }

    pub fn penalty_points(&self, player_id: &str) -> f64 {
        self.penalty_points.get(player_id).copied().unwrap_or(0.0)
    }

    pub fn cards_for(&self, player_id: &str) -> Vec<CardType> {
        self.issued.get(player_id).map(|set| set.iter().copied().collect()).unwrap_or_default()
    }

    pub fn is_sent_off(&self, player_id: &str) -> bool {
        self.issued.get(player_id).map_or(false, |set| set.contains(&CardType::Red))
    }

    pub fn reset(&mut self) {
        self.penalty_points.clear();
        self.issued.clear();
    }

    /// Record `card`; false if it was already issued.
    fn issue(&mut self, player_id: &str, card: CardType) -> bool {
        self.issued.entry(player_id.to_string()).or_default().insert(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventType;

    fn kinds(events: &[EventKind]) -> Vec<EventType> {
        events.iter().map(EventKind::event_type).collect()
    }

    #[test]
    fn test_soft_contact_is_not_a_foul() {
        let mut referee = Referee::new(RefereeConfig::default());
        assert!(referee.process_collision("red_st_6", "blue_gk_0", 10.0).is_empty());
        assert_eq!(referee.penalty_points("red_st_6"), 0.0);
    }

    #[test]
    fn test_foul_points_formula() {
        let mut referee = Referee::new(RefereeConfig::default());
        let events = referee.process_collision("red_st_6", "blue_gk_0", 24.0);
        assert_eq!(
            events,
            vec![EventKind::Foul {
                actor_id: "red_st_6".into(),
                target_id: "blue_gk_0".into(),
                severity: 24.0,
                points: 7.0,
            }]
        );
        assert_eq!(referee.penalty_points("red_st_6"), 7.0);
    }

    #[test]
    fn test_single_yellow_from_zero_to_45() {
        let mut referee = Referee::new(RefereeConfig::default());
        let mut yellows = 0;
        // 9 fouls of 5 points each: 0 -> 45
        for _ in 0..9 {
            let events = referee.process_collision("blue_cm_4", "red_cm_4", 20.0);
            yellows += events.iter().filter(|e| e.event_type() == EventType::Yellow).count();
        }
        assert_eq!(referee.penalty_points("blue_cm_4"), 45.0);
        assert_eq!(yellows, 1);
        // Staying inside [40, 100) keeps firing nothing
        for _ in 0..5 {
            let events = referee.process_collision("blue_cm_4", "red_cm_4", 20.0);
            assert_eq!(kinds(&events), vec![EventType::Foul]);
        }
        assert_eq!(referee.cards_for("blue_cm_4"), vec![CardType::Yellow]);
    }

    #[test]
    fn test_single_red_when_crossing_100() {
        let mut referee = Referee::new(RefereeConfig::default());
        let mut reds = 0;
        for _ in 0..30 {
            let events = referee.process_collision("blue_cm_4", "red_cm_4", 30.0);
            reds += events.iter().filter(|e| e.event_type() == EventType::Red).count();
        }
        assert_eq!(reds, 1);
        assert!(referee.is_sent_off("blue_cm_4"));
    }

    #[test]
    fn test_one_foul_crossing_both_thresholds() {
        let mut referee = Referee::new(RefereeConfig::default());
        let events = referee.process_collision("red_lm_3", "blue_rm_5", 230.0);
        assert_eq!(kinds(&events), vec![EventType::Foul, EventType::Yellow, EventType::Red]);
    }

    #[test]
    fn test_var_flag_and_reset() {
        let mut referee = Referee::new(RefereeConfig::default());
        let hard = MatchEvent::new(1, 1, referee.process_collision("a", "b", 31.0).remove(0));
        let soft = MatchEvent::new(1, 2, referee.process_collision("a", "b", 29.0).remove(0));
        assert!(referee.check_var(&hard));
        assert!(!referee.check_var(&soft));
        referee.reset();
        assert_eq!(referee.penalty_points("a"), 0.0);
        assert!(referee.cards_for("a").is_empty());
    }
}

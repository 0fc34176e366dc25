use super::loader::ReplayLog;
use crate::config::PitchConfig;
use crate::serialization::{Snapshot, SNAPSHOT_VERSION};

/// Validates a replay log for consistency against the pitch it was recorded on
pub fn validate_replay(log: &ReplayLog, pitch: &PitchConfig) -> Result<(), String> {
    validate_replay_basic(log)?;

    let mut last_tick: Option<u64> = None;
    let mut last_score: Option<(u32, u32)> = None;
    let roster = log.frames()[0].p.len();

    for (i, frame) in log.frames().iter().enumerate() {
        if let Some(prev) = last_tick {
            if frame.t <= prev {
                return Err(format!(
                    "Frame {} has tick {} which is not after previous tick {}",
                    i, frame.t, prev
                ));
            }
        }
        last_tick = Some(frame.t);

        if frame.p.len() != roster {
            return Err(format!("Frame {} has {} players, expected {}", i, frame.p.len(), roster));
        }

        let score = (frame.score("BLUE"), frame.score("RED"));
        if let Some(prev) = last_score {
            if score.0 < prev.0 || score.1 < prev.1 {
                return Err(format!("Frame {} score {:?} decreased from {:?}", i, score, prev));
            }
        }
        last_score = Some(score);

        validate_frame(frame, pitch, i)?;
    }

    Ok(())
}

fn validate_frame(frame: &Snapshot, pitch: &PitchConfig, idx: usize) -> Result<(), String> {
    validate_position(&frame.b.p, pitch, idx, "ball")?;
    for player in &frame.p {
        validate_position(&player.pos, pitch, idx, &player.id)?;
        for (name, value) in [("stm", player.stm), ("en", player.en)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(format!("Frame {} player {} has {}={} outside [0, 100]", idx, player.id, name, value));
            }
        }
        if !(player.ht >= 0.0) {
            return Err(format!("Frame {} player {} has negative heat {}", idx, player.id, player.ht));
        }
    }
    Ok(())
}

fn validate_position(pos: &[f64; 2], pitch: &PitchConfig, idx: usize, who: &str) -> Result<(), String> {
    if !(0.0..=pitch.width).contains(&pos[0]) {
        return Err(format!(
            "Frame {} has invalid x position {} for '{}' (pitch width: {})",
            idx, pos[0], who, pitch.width
        ));
    }
    if !(0.0..=pitch.height).contains(&pos[1]) {
        return Err(format!(
            "Frame {} has invalid y position {} for '{}' (pitch height: {})",
            idx, pos[1], who, pitch.height
        ));
    }
    Ok(())
}

/// Validates basic replay structure without per-frame checks
pub fn validate_replay_basic(log: &ReplayLog) -> Result<(), String> {
    if log.is_empty() {
        return Err("Replay must contain at least one frame".into());
    }
    if let Some(frame) = log.frames().iter().find(|f| f.v != SNAPSHOT_VERSION) {
        return Err(format!(
            "Frame at tick {} has snapshot version {}, expected {}",
            frame.t, frame.v, SNAPSHOT_VERSION
        ));
    }
    Ok(())
}

use gridiron_core::policy::{ActionSource, FormationChaser};
use gridiron_core::replay::{
    diff_files, diff_replays, read_archive, validate_replay, write_archive, ReplayArchive, ReplayError, ReplayLog,
    ReplayRecorder, DEFAULT_TOLERANCE,
};
use gridiron_core::{Action, PlayerControl, SimConfig, SimulationContext, Snapshot};
use std::path::Path;
use tempfile::TempDir;

fn record_match(path: &Path, seed: u64, ticks: u64) -> Vec<Snapshot> {
    let mut ctx = SimulationContext::new(SimConfig::default(), seed).unwrap();
    let mut policy = FormationChaser::new().with_ability("overdrive");
    let mut recorder = ReplayRecorder::create(path).unwrap();
    let mut frames = Vec::new();
    for _ in 0..ticks {
        let action = policy.act(ctx.state(), ctx.config());
        ctx.step(&action).unwrap();
        recorder.record(&ctx).unwrap();
        frames.push(ctx.snapshot());
        ctx.drain_events();
    }
    assert_eq!(recorder.finish().unwrap(), ticks as usize);
    frames
}

/// Idle match that switches to a sideways push from `switch_tick` onwards.
fn record_with_switch(path: &Path, seed: u64, ticks: u64, switch_tick: Option<u64>) {
    let mut ctx = SimulationContext::new(SimConfig::default(), seed).unwrap();
    let mut recorder = ReplayRecorder::create(path).unwrap();
    for tick in 1..=ticks {
        let action = match switch_tick {
            Some(k) if tick >= k => Action::from_controls(vec![PlayerControl::new(0.0, 1.0); 14]),
            _ => Action::idle(14),
        };
        ctx.step(&action).unwrap();
        recorder.record(&ctx).unwrap();
        ctx.drain_events();
    }
    recorder.finish().unwrap();
}

#[test]
fn test_recorded_log_reloads_identically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("match.jsonl");
    let frames = record_match(&path, 11, 150);

    let log = ReplayLog::open(&path).unwrap();
    assert_eq!(log.len(), 150);
    assert_eq!(log.first_tick(), Some(1));
    assert_eq!(log.last_tick(), Some(150));
    assert_eq!(log.frames(), frames.as_slice());
    assert_eq!(log.frame(75), Some(&frames[74]));
    assert!(validate_replay(&log, &SimConfig::default().pitch).is_ok());
}

#[test]
fn test_identical_runs_do_not_diverge() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.jsonl");
    let b = dir.path().join("b.jsonl");
    record_match(&a, 21, 200);
    record_match(&b, 21, 200);
    assert_eq!(diff_files(&a, &b, DEFAULT_TOLERANCE).unwrap(), None);
}

#[test]
fn test_divergence_reported_at_first_differing_tick() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.jsonl");
    let b = dir.path().join("b.jsonl");
    record_with_switch(&a, 4, 80, None);
    record_with_switch(&b, 4, 80, Some(37));

    let divergence = diff_files(&a, &b, DEFAULT_TOLERANCE).unwrap().unwrap();
    assert_eq!(divergence.tick, 37);
    assert!(divergence.to_string().starts_with("divergence at tick 37"));
}

#[test]
fn test_edited_frame_is_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("match.jsonl");
    let frames = record_match(&path, 3, 60);
    let mut edited = frames.clone();
    edited[41].p[2].stm -= 0.5;

    let divergence = diff_replays(&ReplayLog::from_frames(frames), &ReplayLog::from_frames(edited), DEFAULT_TOLERANCE)
        .unwrap();
    assert_eq!(divergence.tick, 42);
    assert_eq!(divergence.field, "p[2].stm");
}

#[test]
fn test_archive_roundtrip_on_disk() {
    let dir = TempDir::new().unwrap();
    let jsonl = dir.path().join("match.jsonl");
    record_match(&jsonl, 8, 120);
    let log = ReplayLog::open(&jsonl).unwrap();

    let archive_path = dir.path().join("archives").join("match.ngr");
    let bytes = write_archive(&archive_path, &ReplayArchive::from_log(log.clone(), Some(8))).unwrap();
    assert!(bytes > 0);
    assert!(!archive_path.with_extension("tmp").exists());

    let restored = read_archive(&archive_path).unwrap();
    assert_eq!(restored.seed, Some(8));
    assert_eq!(diff_replays(&log, &restored.into_log(), 0.0), None);
}

#[test]
fn test_truncated_log_line_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("match.jsonl");
    record_match(&path, 2, 5);
    let mut text = std::fs::read_to_string(&path).unwrap();
    text.truncate(text.len() - 20);
    std::fs::write(&path, text).unwrap();

    match ReplayLog::open(&path) {
        Err(err @ ReplayError::Json { line: 5, .. }) => assert!(err.is_recoverable()),
        other => panic!("expected json error on line 5, got {other:?}"),
    }
}

//! JSONL replay reader with a tick index.

use super::error::ReplayError;
use crate::serialization::Snapshot;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayLog {
    frames: Vec<Snapshot>,
    /// tick -> frame index (last frame wins on duplicate ticks)
    by_tick: BTreeMap<u64, usize>,
}

impl ReplayLog {
    /// Parse a JSONL log. Blank lines are skipped; line numbers in errors are 1-based.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let mut frames = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let frame = Snapshot::from_json(&line)
                .map_err(|source| ReplayError::Json { line: idx + 1, source })?;
            frames.push(frame);
        }
        log::debug!("Loaded {} frames from {:?}", frames.len(), path);
        Ok(Self::from_frames(frames))
    }

    pub fn from_frames(frames: Vec<Snapshot>) -> Self {
        let by_tick = frames.iter().enumerate().map(|(idx, f)| (f.t, idx)).collect();
        Self { frames, by_tick }
    }

    pub fn frame(&self, tick: u64) -> Option<&Snapshot> {
        self.by_tick.get(&tick).map(|&idx| &self.frames[idx])
    }

    pub fn frames(&self) -> &[Snapshot] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Snapshot> {
        self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn first_tick(&self) -> Option<u64> {
        self.frames.first().map(|f| f.t)
    }

    pub fn last_tick(&self) -> Option<u64> {
        self.frames.last().map(|f| f.t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FRAME: &str = r#"{"v":1,"t":3,"s":{"BLUE":0,"RED":0},"b":{"p":[300.0,200.0],"v":[0.0,0.0],"spin":0.0},"p":[],"e":[]}"#;

    #[test]
    fn test_open_indexes_by_tick() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{FRAME}").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "{}", FRAME.replace(r#""t":3"#, r#""t":4"#)).unwrap();
        drop(file);

        let log = ReplayLog::open(&path).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.frame(4).map(|f| f.t), Some(4));
        assert!(log.frame(5).is_none());
        assert_eq!((log.first_tick(), log.last_tick()), (Some(3), Some(4)));
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        std::fs::write(&path, format!("{FRAME}\n{{not json\n")).unwrap();
        match ReplayLog::open(&path) {
            Err(ReplayError::Json { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ReplayLog::open("/no/such/replay.jsonl").unwrap_err();
        assert!(matches!(err, ReplayError::Io(_)));
        assert!(err.is_recoverable());
    }
}

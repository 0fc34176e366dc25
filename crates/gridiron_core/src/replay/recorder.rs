//! Append-only JSONL replay writer.
//!
//! One snapshot per line, flushed after every record so a crash loses at
//! most the frame being written. Write failures stay here: they never touch
//! the match being recorded.

use super::error::ReplayError;
use crate::engine::SimulationContext;
use crate::serialization::Snapshot;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct ReplayRecorder {
    path: PathBuf,
    writer: BufWriter<File>,
    frames: usize,
}

impl ReplayRecorder {
    /// Start a new log at `path`, replacing any existing file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        log::info!("Recording replay to {:?}", path);
        Ok(Self { path: path.to_path_buf(), writer: BufWriter::new(file), frames: 0 })
    }

    /// Continue an existing log (created if missing).
    pub fn append<P: AsRef<Path>>(path: P) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        log::info!("Appending replay to {:?}", path);
        Ok(Self { path: path.to_path_buf(), writer: BufWriter::new(file), frames: 0 })
    }

    /// Record the context's current frame.
    pub fn record(&mut self, ctx: &SimulationContext) -> Result<(), ReplayError> {
        self.record_snapshot(&ctx.snapshot())
    }

    pub fn record_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), ReplayError> {
        let line = snapshot
            .to_json()
            .map_err(|source| ReplayError::Json { line: self.frames + 1, source })?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.frames += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), ReplayError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush, sync and close. Returns the number of frames written by this recorder.
    pub fn finish(mut self) -> Result<usize, ReplayError> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        log::debug!("Closed replay {:?} after {} frames", self.path, self.frames);
        Ok(self.frames)
    }

    pub fn frames_written(&self) -> usize {
        self.frames
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

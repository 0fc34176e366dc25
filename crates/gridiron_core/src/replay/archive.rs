//! Compact binary replay archive.
//!
//! Layout: LZ4 block (uncompressed size prepended) of a named MessagePack
//! `ReplayArchive`, followed by a 32-byte SHA-256 of the compressed block.
//! Decoding verifies the checksum before decompressing.

use super::error::ReplayError;
use super::loader::ReplayLog;
use crate::serialization::{Snapshot, SNAPSHOT_VERSION};
use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{rename, File};
use std::io::Write;
use std::path::Path;

/// Current archive container version.
pub const ARCHIVE_VERSION: u32 = 1;

const CHECKSUM_LEN: usize = 32;
const SIZE_PREFIX_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayArchive {
    pub version: u32,
    pub snapshot_version: u32,
    /// Seed the match was run with, when known
    pub seed: Option<u64>,
    pub frames: Vec<Snapshot>,
}

impl ReplayArchive {
    pub fn new(frames: Vec<Snapshot>, seed: Option<u64>) -> Self {
        Self { version: ARCHIVE_VERSION, snapshot_version: SNAPSHOT_VERSION, seed, frames }
    }

    pub fn from_log(log: ReplayLog, seed: Option<u64>) -> Self {
        Self::new(log.into_frames(), seed)
    }

    pub fn into_log(self) -> ReplayLog {
        ReplayLog::from_frames(self.frames)
    }
}

pub fn encode_archive(archive: &ReplayArchive) -> Result<Vec<u8>, ReplayError> {
    let msgpack = to_vec_named(archive)?;
    let mut out = compress_prepend_size(&msgpack);
    let checksum = Sha256::digest(&out);
    out.extend_from_slice(&checksum);
    Ok(out)
}

pub fn decode_archive(bytes: &[u8]) -> Result<ReplayArchive, ReplayError> {
    if bytes.len() < SIZE_PREFIX_LEN + CHECKSUM_LEN {
        return Err(ReplayError::Invalid(format!("archive too short ({} bytes)", bytes.len())));
    }
    let (payload, checksum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    if Sha256::digest(payload).as_slice() != checksum {
        return Err(ReplayError::ChecksumMismatch);
    }
    let msgpack = decompress_size_prepended(payload).map_err(|_| ReplayError::Decompression)?;
    let archive: ReplayArchive = from_slice(&msgpack)?;
    if archive.version > ARCHIVE_VERSION {
        return Err(ReplayError::VersionMismatch { found: archive.version, expected: ARCHIVE_VERSION });
    }
    if archive.snapshot_version != SNAPSHOT_VERSION {
        return Err(ReplayError::VersionMismatch {
            found: archive.snapshot_version,
            expected: SNAPSHOT_VERSION,
        });
    }
    Ok(archive)
}

/// Write atomically (temp file, then rename). Returns the archive size in bytes.
pub fn write_archive<P: AsRef<Path>>(path: P, archive: &ReplayArchive) -> Result<usize, ReplayError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = encode_archive(archive)?;
    let temp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&temp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;
    }
    rename(&temp_path, path)?;
    log::debug!("Archived {} frames ({} bytes) to {:?}", archive.frames.len(), data.len(), path);
    Ok(data.len())
}

pub fn read_archive<P: AsRef<Path>>(path: P) -> Result<ReplayArchive, ReplayError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let archive = decode_archive(&data)?;
    log::debug!("Read {} frames ({} bytes) from {:?}", archive.frames.len(), data.len(), path);
    Ok(archive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::engine::{Action, PlayerControl, SimulationContext};

    fn recorded_frames(ticks: usize) -> Vec<Snapshot> {
        let mut ctx = SimulationContext::new(SimConfig::default(), 21).unwrap();
        let action = Action::from_controls(vec![PlayerControl::new(0.4, -0.2); 14]);
        (0..ticks)
            .map(|_| {
                ctx.step(&action).unwrap();
                ctx.snapshot()
            })
            .collect()
    }

    #[test]
    fn test_archive_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match.gra");
        let archive = ReplayArchive::new(recorded_frames(30), Some(21));
        let size = write_archive(&path, &archive).unwrap();
        assert!(size > CHECKSUM_LEN);
        assert!(!path.with_extension("tmp").exists());
        assert_eq!(read_archive(&path).unwrap(), archive);
    }

    #[test]
    fn test_corrupted_checksum_rejected() {
        let mut bytes = encode_archive(&ReplayArchive::new(recorded_frames(3), None)).unwrap();
        if let Some(last) = bytes.last_mut() {
            *last = last.wrapping_add(1);
        }
        assert!(matches!(decode_archive(&bytes), Err(ReplayError::ChecksumMismatch)));
    }

    #[test]
    fn test_truncated_archive_rejected() {
        assert!(matches!(decode_archive(&[0u8; 10]), Err(ReplayError::Invalid(_))));
    }

    #[test]
    fn test_newer_version_rejected() {
        let mut archive = ReplayArchive::new(Vec::new(), None);
        archive.version = ARCHIVE_VERSION + 1;
        let bytes = encode_archive(&archive).unwrap();
        assert!(matches!(decode_archive(&bytes), Err(ReplayError::VersionMismatch { .. })));
    }

    #[test]
    fn test_compression_beats_json() {
        let frames = recorded_frames(200);
        let json_len: usize = frames.iter().map(|f| f.to_json().unwrap().len() + 1).sum();
        let archived = encode_archive(&ReplayArchive::new(frames, Some(21))).unwrap();
        assert!(archived.len() < json_len);
    }
}

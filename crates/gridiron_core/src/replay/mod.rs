//! Replay collaborators: JSONL recorder and loader, divergence diff,
//! validation and a compressed archive format.
//!
//! Everything here consumes `Snapshot` frames produced by the engine. I/O
//! failures surface as `ReplayError` and never affect a running match.

pub mod archive;
pub mod diff;
pub mod error;
pub mod loader;
pub mod recorder;
pub mod validate;

pub use archive::{decode_archive, encode_archive, read_archive, write_archive, ReplayArchive, ARCHIVE_VERSION};
pub use diff::{compare_frames, diff_files, diff_replays, Divergence, DEFAULT_TOLERANCE};
pub use error::ReplayError;
pub use loader::ReplayLog;
pub use recorder::ReplayRecorder;
pub use validate::{validate_replay, validate_replay_basic};

//! First-divergence search between two replays.
//!
//! Frames are compared pairwise in log order. Floats match within the given
//! tolerance; everything else (ticks, ids, teams, scores, event lists) must
//! match exactly.

use super::error::ReplayError;
use super::loader::ReplayLog;
use crate::serialization::{PlayerFrame, Snapshot};
use std::fmt;
use std::path::Path;

/// Tolerance for float fields when none is given.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct Divergence {
    pub tick: u64,
    /// Dotted path of the first differing field, e.g. `p[3].pos[1]`
    pub field: String,
    pub detail: String,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "divergence at tick {} in {}: {}", self.tick, self.field, self.detail)
    }
}

fn close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance || (a.is_nan() && b.is_nan())
}

fn compare_floats(field: String, a: &[f64], b: &[f64], tolerance: f64) -> Result<(), (String, String)> {
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        if !close(*x, *y, tolerance) {
            let path = if a.len() > 1 { format!("{field}[{i}]") } else { field };
            return Err((path, format!("{x} vs {y}")));
        }
    }
    Ok(())
}

fn compare_players(idx: usize, a: &PlayerFrame, b: &PlayerFrame, tolerance: f64) -> Result<(), (String, String)> {
    if a.id != b.id {
        return Err((format!("p[{idx}].id"), format!("{} vs {}", a.id, b.id)));
    }
    if a.team != b.team {
        return Err((format!("p[{idx}].team"), format!("{} vs {}", a.team, b.team)));
    }
    compare_floats(format!("p[{idx}].pos"), &a.pos, &b.pos, tolerance)?;
    compare_floats(format!("p[{idx}].vel"), &a.vel, &b.vel, tolerance)?;
    compare_floats(format!("p[{idx}].stm"), &[a.stm], &[b.stm], tolerance)?;
    compare_floats(format!("p[{idx}].en"), &[a.en], &[b.en], tolerance)?;
    compare_floats(format!("p[{idx}].ht"), &[a.ht], &[b.ht], tolerance)
}

/// First differing field between two frames.
pub fn compare_frames(a: &Snapshot, b: &Snapshot, tolerance: f64) -> Result<(), (String, String)> {
    if a.v != b.v {
        return Err(("v".into(), format!("{} vs {}", a.v, b.v)));
    }
    if a.t != b.t {
        return Err(("t".into(), format!("{} vs {}", a.t, b.t)));
    }
    if a.s != b.s {
        return Err(("s".into(), format!("{:?} vs {:?}", a.s, b.s)));
    }
    compare_floats("b.p".into(), &a.b.p, &b.b.p, tolerance)?;
    compare_floats("b.v".into(), &a.b.v, &b.b.v, tolerance)?;
    compare_floats("b.spin".into(), &[a.b.spin], &[b.b.spin], tolerance)?;
    if a.p.len() != b.p.len() {
        return Err(("p".into(), format!("{} players vs {}", a.p.len(), b.p.len())));
    }
    for (idx, (pa, pb)) in a.p.iter().zip(&b.p).enumerate() {
        compare_players(idx, pa, pb, tolerance)?;
    }
    if a.e != b.e {
        return Err(("e".into(), format!("{:?} vs {:?}", a.event_codes(), b.event_codes())));
    }
    Ok(())
}

/// First tick and field at which `a` and `b` differ beyond `tolerance`.
///
/// A log that ends early diverges at the first frame the other has extra.
pub fn diff_replays(a: &ReplayLog, b: &ReplayLog, tolerance: f64) -> Option<Divergence> {
    for (fa, fb) in a.frames().iter().zip(b.frames()) {
        if let Err((field, detail)) = compare_frames(fa, fb, tolerance) {
            return Some(Divergence { tick: fa.t, field, detail });
        }
    }
    let common = a.len().min(b.len());
    let extra = a.frames().get(common).or_else(|| b.frames().get(common))?;
    Some(Divergence {
        tick: extra.t,
        field: "length".into(),
        detail: format!("{} frames vs {}", a.len(), b.len()),
    })
}

pub fn diff_files<P: AsRef<Path>, Q: AsRef<Path>>(
    a: P,
    b: Q,
    tolerance: f64,
) -> Result<Option<Divergence>, ReplayError> {
    let left = ReplayLog::open(a)?;
    let right = ReplayLog::open(b)?;
    Ok(diff_replays(&left, &right, tolerance))
}

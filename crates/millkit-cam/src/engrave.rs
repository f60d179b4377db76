//! Engraving: the tool center follows the drawn geometry with no
//! cutter compensation.

use crate::error::CamResult;
use crate::toolpath::Toolpath;
use millkit_core::Diagnostics;
use millkit_geom::{merge_paths, PathSet};

/// Parameters for engraving.
#[derive(Debug, Clone, Default)]
pub struct EngraveParams {
    /// Reverse cutting direction for climb milling.
    pub climb: bool,
}

/// Trace the geometry as drawn. Open and closed paths both engrave;
/// runs are stitched where a connecting move stays on the geometry.
pub fn engrave(
    shape: &PathSet,
    params: &EngraveParams,
    diag: &mut Diagnostics,
) -> CamResult<Vec<Toolpath>> {
    let boundary = shape.clone();
    let mut acc = PathSet::new();
    let mut dropped = 0usize;
    for path in shape.iter() {
        if path.len() < 2 {
            dropped += 1;
            continue;
        }
        let mut path = path.clone();
        if !params.climb {
            path.reverse();
        }
        merge_paths(&mut acc, PathSet::from_paths(vec![path]), Some(&boundary));
    }
    if dropped > 0 {
        diag.warn(format!("{dropped} degenerate path(s) skipped by engraving"));
    }
    Ok(Toolpath::from_set(acc, Some(&boundary)))
}

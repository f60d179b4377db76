//! Greedy path stitching.
//!
//! Joins disjoint path fragments into fewer continuous travel paths to
//! minimize tool retracts. Deliberately greedy and quadratic: toolpath
//! correctness depends on evaluating every candidate pair in documented
//! order, so no spatial index shortcuts.

use crate::path::{Path, PathSet, Point};
use crate::query::crosses;

/// Merge every path of `incoming` into `target`, stitching where
/// allowed.
///
/// A closed incoming path is joined to the accumulated set at the
/// globally closest vertex pair: pristine closed entries offer every
/// vertex, already-stitched (open) entries only their final vertex, and
/// every vertex of the incoming path is a candidate. If the joining
/// segment would cross `clip_boundary` the path is inserted separately
/// instead. A spliced result is always marked open: it is a travel
/// path, never a polygon again.
///
/// Open incoming paths only concatenate onto open entries whose
/// endpoints coincide exactly with one of their own (four combinations
/// tried, reversing as needed); otherwise they stay separate.
pub fn merge_paths(target: &mut PathSet, incoming: PathSet, clip_boundary: Option<&PathSet>) {
    for path in incoming {
        merge_path(target, path, clip_boundary);
    }
}

/// Merge a single path into `target`. See [`merge_paths`].
pub fn merge_path(target: &mut PathSet, path: Path, clip_boundary: Option<&PathSet>) {
    if path.is_empty() {
        return;
    }
    if path.closed {
        merge_closed(target, path, clip_boundary);
    } else {
        merge_open(target, path);
    }
}

fn merge_closed(target: &mut PathSet, path: Path, clip_boundary: Option<&PathSet>) {
    // (entry index, entry vertex index, incoming vertex index, dist^2)
    let mut best: Option<(usize, usize, usize, i128)> = None;
    for (ei, entry) in target.paths.iter().enumerate() {
        if entry.is_empty() {
            continue;
        }
        let entry_candidates: Vec<usize> = if entry.closed {
            (0..entry.len()).collect()
        } else {
            vec![entry.len() - 1]
        };
        for evi in entry_candidates {
            let ep = entry.points[evi];
            for (pvi, pv) in path.points.iter().enumerate() {
                let d = ep.dist_sq(*pv);
                if best.map_or(true, |(_, _, _, bd)| d < bd) {
                    best = Some((ei, evi, pvi, d));
                }
            }
        }
    }

    let Some((ei, evi, pvi, _)) = best else {
        target.push(path);
        return;
    };

    let join_from = target.paths[ei].points[evi];
    let join_to = path.points[pvi];
    if let Some(clip) = clip_boundary {
        if crosses(clip, join_from, join_to) {
            target.push(path);
            return;
        }
    }

    let entry = &mut target.paths[ei];
    if entry.closed {
        // walk the polygon from the stitch vertex all the way around and
        // back onto it, then leave it open as a travel path
        entry.points.rotate_left(evi);
        let first = entry.points[0];
        entry.points.push(first);
        entry.closed = false;
    }
    let n = path.points.len();
    entry
        .points
        .extend((0..n).map(|k| path.points[(pvi + k) % n]));
}

fn merge_open(target: &mut PathSet, path: Path) {
    let pf = path.points[0];
    let pl = path.points[path.points.len() - 1];

    // (entry index, entry-at-end, incoming-at-start, dist^2)
    let mut best: Option<(usize, bool, bool, i128)> = None;
    for (ei, entry) in target.paths.iter().enumerate() {
        if entry.closed || entry.is_empty() {
            continue;
        }
        let ef = entry.points[0];
        let el = entry.points[entry.points.len() - 1];
        for (entry_at_end, ep) in [(false, ef), (true, el)] {
            for (incoming_at_start, pp) in [(true, pf), (false, pl)] {
                let d = ep.dist_sq(pp);
                if best.map_or(true, |(_, _, _, bd)| d < bd) {
                    best = Some((ei, entry_at_end, incoming_at_start, d));
                }
            }
        }
    }

    match best {
        Some((ei, entry_at_end, incoming_at_start, 0)) => {
            let entry = &mut target.paths[ei];
            match (entry_at_end, incoming_at_start) {
                (true, true) => {
                    entry.points.extend(path.points.into_iter().skip(1));
                }
                (true, false) => {
                    entry
                        .points
                        .extend(path.points.into_iter().rev().skip(1));
                }
                (false, true) => {
                    entry.points.reverse();
                    entry.points.extend(path.points.into_iter().skip(1));
                }
                (false, false) => {
                    let mut pts = path.points;
                    pts.extend(entry.points.iter().copied().skip(1));
                    entry.points = pts;
                }
            }
        }
        _ => target.push(path),
    }
}

//! Region offsetting for closed paths.
//!
//! Each closed contour is offset individually by the polyline-offset
//! primitive, the offset results (keeping their winding) are recombined
//! with a non-zero union, and arc joins are flattened to segments at
//! ARC_TOLERANCE. Open paths pass through unchanged.
//!
//! Input winding must follow the cleaned convention (outer contours
//! counter-clockwise, holes clockwise); `simplify_and_clean` establishes
//! it. The offset primitive treats positive distances as left of travel,
//! so under that convention a single negated delta grows the region for
//! positive `delta` and shrinks it for negative, for outers and holes
//! alike.

use crate::clip::shapes_to_pathset;
use crate::path::{Path, PathSet};
use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use i_overlay::core::fill_rule::FillRule as OverlayFill;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use millkit_core::units::ARC_TOLERANCE;
use std::panic;

/// Join treatment where offset edges meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinStyle {
    /// Arc joins, flattened at ARC_TOLERANCE.
    #[default]
    Round,
    /// One chord per join.
    Bevel,
}

/// Offset the closed paths of a set by `delta` integer units (positive
/// grows, negative shrinks) with round joins.
pub fn offset(set: &PathSet, delta: i64) -> PathSet {
    offset_with(set, delta, JoinStyle::Round)
}

/// Offset with an explicit join style.
pub fn offset_with(set: &PathSet, delta: i64, join: JoinStyle) -> PathSet {
    if delta == 0 {
        return set.clone();
    }

    let mut contours: Vec<Vec<[f64; 2]>> = Vec::new();
    for path in set.closed_paths() {
        if path.len() < 3 {
            continue;
        }
        let pline = to_polyline(path);
        // the primitive can panic on pathological self-touching input;
        // treat that contour as degenerate and continue
        let offset_result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            pline.parallel_offset(-(delta as f64))
        }));
        match offset_result {
            Ok(plines) => {
                for pl in &plines {
                    if let Some(contour) = flatten_polyline(pl, join) {
                        contours.push(contour);
                    }
                }
            }
            Err(_) => {
                tracing::warn!(
                    vertices = path.len(),
                    "offset primitive failed on a contour, skipping it"
                );
            }
        }
    }

    let mut out = if contours.is_empty() {
        PathSet::new()
    } else {
        let clip: Vec<Vec<[f64; 2]>> = Vec::new();
        let shapes = contours.overlay(&clip, OverlayRule::Subject, OverlayFill::NonZero);
        shapes_to_pathset(shapes)
    };

    for path in set.open_paths() {
        out.push(path.clone());
    }
    out
}

fn to_polyline(path: &Path) -> Polyline<f64> {
    let mut pline = Polyline::new();
    for p in &path.points {
        pline.add_vertex(PlineVertex::new(p.x as f64, p.y as f64, 0.0));
    }
    pline.set_is_closed(true);
    pline
}

/// Flatten a closed polyline with bulge arcs into a plain contour.
fn flatten_polyline(pline: &Polyline<f64>, join: JoinStyle) -> Option<Vec<[f64; 2]>> {
    let count = pline.vertex_count();
    if count < 3 {
        return None;
    }

    let mut points: Vec<[f64; 2]> = Vec::with_capacity(count);
    for i in 0..count {
        let v1 = pline.at(i);
        let v2 = pline.at((i + 1) % count);

        points.push([v1.x, v1.y]);

        if v1.bulge.abs() > 1e-9 && join == JoinStyle::Round {
            let theta = 4.0 * v1.bulge.atan();
            let chord_len = ((v2.x - v1.x).powi(2) + (v2.y - v1.y).powi(2)).sqrt();
            if chord_len > 1e-9 {
                let radius = chord_len / (2.0 * (theta / 2.0).sin());
                let dist_to_center = radius.abs() * (theta.abs() / 2.0).cos();
                let dx = v2.x - v1.x;
                let dy = v2.y - v1.y;
                let mx = (v1.x + v2.x) / 2.0;
                let my = (v1.y + v2.y) / 2.0;
                let nx = -dy / chord_len;
                let ny = dx / chord_len;
                let sign = if v1.bulge > 0.0 { 1.0 } else { -1.0 };
                let cx = mx + nx * dist_to_center * sign;
                let cy = my + ny * dist_to_center * sign;
                let start_angle = (v1.y - cy).atan2(v1.x - cx);
                let mut end_angle = (v2.y - cy).atan2(v2.x - cx);
                if v1.bulge > 0.0 {
                    if end_angle <= start_angle {
                        end_angle += 2.0 * std::f64::consts::PI;
                    }
                } else if end_angle >= start_angle {
                    end_angle -= 2.0 * std::f64::consts::PI;
                }
                let segments = segments_for_arc(radius.abs(), theta.abs());
                for j in 1..segments {
                    let t = j as f64 / segments as f64;
                    let angle = start_angle + (end_angle - start_angle) * t;
                    points.push([
                        cx + radius.abs() * angle.cos(),
                        cy + radius.abs() * angle.sin(),
                    ]);
                }
            }
        }
    }
    Some(points)
}

/// Segment count keeping the chord-to-arc sagitta under ARC_TOLERANCE.
fn segments_for_arc(radius: f64, sweep: f64) -> usize {
    if ARC_TOLERANCE >= radius {
        return 1;
    }
    let max_step = 2.0 * (1.0 - ARC_TOLERANCE / radius).acos();
    if max_step <= 0.0 {
        return 1;
    }
    ((sweep / max_step).ceil() as usize).max(1)
}

//! Splitting toolpaths where they cross holding-tab regions.
//!
//! A toolpath is cut into alternating pieces: even-indexed pieces lie
//! outside tab material and run at full depth, odd-indexed pieces lie
//! inside it and are held up to the tab height. A path that starts
//! inside a tab gets a zero-length leading piece so the parity holds.

use millkit_geom::{point_in_pathset, Path, PathSet, Point};

/// Split one toolpath at every crossing of a tab boundary.
///
/// Pieces are polylines sharing their split points, in travel order.
pub fn separate_tabs(path: &Path, tabs: &PathSet) -> Vec<Path> {
    let Some(start) = path.first() else {
        return Vec::new();
    };
    let mut pieces: Vec<Path> = Vec::new();
    if point_in_pathset(tabs, start) {
        pieces.push(Path::polyline(Vec::new()));
    }
    let mut cur = vec![start];
    for (a, b) in path.edges() {
        let mut hits: Vec<(f64, Point)> = Vec::new();
        for tab in tabs.closed_paths() {
            for (c, d) in tab.edges() {
                if let Some(hit) = segment_crossing(a, b, c, d) {
                    hits.push(hit);
                }
            }
        }
        hits.sort_by(|x, y| x.0.total_cmp(&y.0));
        for (_, p) in hits {
            // a crossing at the edge start was already split on the
            // incoming edge
            if p.same_xy(a) {
                continue;
            }
            let mut piece = std::mem::take(&mut cur);
            if piece.last().is_none_or(|l| !l.same_xy(p)) {
                piece.push(p);
            }
            pieces.push(Path::polyline(piece));
            cur.push(p);
        }
        if cur.last().is_none_or(|l| !l.same_xy(b)) {
            cur.push(b);
        }
    }
    pieces.push(Path::polyline(cur));
    pieces
}

/// Proper intersection of segments `a-b` and `c-d`, as the parameter
/// along `a-b` and the rounded crossing point. Parallel and collinear
/// pairs yield nothing.
fn segment_crossing(a: Point, b: Point, c: Point, d: Point) -> Option<(f64, Point)> {
    let r = (i128::from(b.x - a.x), i128::from(b.y - a.y));
    let s = (i128::from(d.x - c.x), i128::from(d.y - c.y));
    let denom = r.0 * s.1 - r.1 * s.0;
    if denom == 0 {
        return None;
    }
    let ac = (i128::from(c.x - a.x), i128::from(c.y - a.y));
    let t_num = ac.0 * s.1 - ac.1 * s.0;
    let u_num = ac.0 * r.1 - ac.1 * r.0;
    if !in_unit(t_num, denom) || !in_unit(u_num, denom) {
        return None;
    }
    let t = t_num as f64 / denom as f64;
    let x = a.x + ((b.x - a.x) as f64 * t).round() as i64;
    let y = a.y + ((b.y - a.y) as f64 * t).round() as i64;
    Some((t, Point::new(x, y)))
}

fn in_unit(num: i128, den: i128) -> bool {
    if den > 0 {
        (0..=den).contains(&num)
    } else {
        (den..=0).contains(&num)
    }
}

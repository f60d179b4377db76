//! The toolpath type shared by all strategies.

use millkit_core::Diagnostics;
use millkit_geom::{crosses, Path, PathSet};
use serde::{Deserialize, Serialize};

/// One continuous cutter run produced by a strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Toolpath {
    /// Vertex sequence the cutter follows.
    pub path: Path,
    /// Whether the segment from the last vertex back to the first can be
    /// cut without crossing the boundary the strategy stitched against.
    /// When false the generator retracts between depth passes.
    pub safe_to_close: bool,
    /// Per-vertex Z is authoritative; the generator emits stored depths
    /// and skips pass stepping.
    pub precomputed_z: bool,
}

impl Toolpath {
    /// Wrap a path whose closing move needs no boundary check.
    pub fn new(path: Path) -> Self {
        let safe_to_close = path.closed || closes_on_itself(&path);
        Self {
            path,
            safe_to_close,
            precomputed_z: false,
        }
    }

    /// Wrap a path, checking its closing segment against the stitch
    /// boundary.
    pub fn with_clip(path: Path, clip: Option<&PathSet>) -> Self {
        let safe_to_close = closing_is_safe(&path, clip);
        Self {
            path,
            safe_to_close,
            precomputed_z: false,
        }
    }

    /// Wrap a drill-cycle path carrying its own depths.
    pub fn drilled(path: Path) -> Self {
        Self {
            path,
            safe_to_close: false,
            precomputed_z: true,
        }
    }

    /// Convert every path of a stitched set, sharing one clip boundary.
    pub fn from_set(set: PathSet, clip: Option<&PathSet>) -> Vec<Toolpath> {
        set.into_iter()
            .map(|path| Toolpath::with_clip(path, clip))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// The closed paths of a strategy input. Offsetting passes open paths
/// through unchanged, so region strategies must drop them up front or
/// their terminal conditions never fire.
pub(crate) fn closed_only(shape: &PathSet, strategy: &str, diag: &mut Diagnostics) -> PathSet {
    let open_count = shape.open_paths().count();
    if open_count > 0 {
        diag.warn(format!(
            "{} open path(s) ignored by the {} strategy",
            open_count, strategy
        ));
    }
    shape.closed_paths().cloned().collect()
}

fn closes_on_itself(path: &Path) -> bool {
    match (path.first(), path.last()) {
        (Some(a), Some(b)) => a.same_xy(b),
        _ => false,
    }
}

fn closing_is_safe(path: &Path, clip: Option<&PathSet>) -> bool {
    if path.closed || closes_on_itself(path) {
        return true;
    }
    let (first, last) = match (path.first(), path.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return true,
    };
    match clip {
        Some(boundary) => !crosses(boundary, last, first),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use millkit_geom::Point;

    fn square(origin: i64, side: i64) -> Path {
        Path::polygon(vec![
            Point::new(origin, origin),
            Point::new(origin + side, origin),
            Point::new(origin + side, origin + side),
            Point::new(origin, origin + side),
        ])
    }

    #[test]
    fn test_closed_path_is_safe() {
        let tp = Toolpath::new(square(0, 1000));
        assert!(tp.safe_to_close);
        assert!(!tp.precomputed_z);
    }

    #[test]
    fn test_open_path_with_matching_ends_is_safe() {
        let path = Path::polyline(vec![
            Point::new(0, 0),
            Point::new(1000, 0),
            Point::new(1000, 1000),
            Point::new(0, 0),
        ]);
        let tp = Toolpath::with_clip(path, None);
        assert!(tp.safe_to_close);
    }

    #[test]
    fn test_closing_across_boundary_is_unsafe() {
        // open path whose ends sit on opposite sides of a small square;
        // the straight closing move cuts through it
        let blocker = PathSet::from_paths(vec![square(400, 200)]);
        let path = Path::polyline(vec![
            Point::new(0, 500),
            Point::new(500, 1500),
            Point::new(1000, 500),
        ]);
        let tp = Toolpath::with_clip(path, Some(&blocker));
        assert!(!tp.safe_to_close);
    }

    #[test]
    fn test_closing_clear_of_boundary_is_safe() {
        let blocker = PathSet::from_paths(vec![square(5000, 200)]);
        let path = Path::polyline(vec![
            Point::new(0, 0),
            Point::new(1000, 0),
            Point::new(1000, 1000),
        ]);
        let tp = Toolpath::with_clip(path, Some(&blocker));
        assert!(tp.safe_to_close);
    }

    #[test]
    fn test_drilled_keeps_depths() {
        let path = Path::polyline(vec![
            Point::with_z(0, 0, 500),
            Point::with_z(0, 0, -100),
            Point::with_z(0, 0, 500),
        ]);
        let tp = Toolpath::drilled(path);
        assert!(tp.precomputed_z);
        assert!(!tp.safe_to_close);
    }
}

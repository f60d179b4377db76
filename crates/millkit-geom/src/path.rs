//! Path and path-set value types.
//!
//! All geometry lives in a fixed integer coordinate space
//! (`millkit_core::units::UNITS_PER_MM`). A closed path is a polygon and
//! never stores a duplicate of its first vertex; closure is structural.

use serde::{Deserialize, Serialize};

/// A vertex in the integer coordinate space, with optional per-vertex
/// depth. Z stays `None` until a strategy assigns depths (drill cycles,
/// ramping).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub z: Option<i64>,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y, z: None }
    }

    pub const fn with_z(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Same vertex with the given depth attached.
    pub fn at_depth(self, z: i64) -> Self {
        Self { z: Some(z), ..self }
    }

    /// XY equality, ignoring depth.
    pub fn same_xy(self, other: Point) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Squared XY distance. i128 so full-sheet coordinates cannot
    /// overflow.
    pub fn dist_sq(self, other: Point) -> i128 {
        let dx = (self.x - other.x) as i128;
        let dy = (self.y - other.y) as i128;
        dx * dx + dy * dy
    }

    /// XY distance.
    pub fn dist(self, other: Point) -> f64 {
        (self.dist_sq(other) as f64).sqrt()
    }

    pub fn as_f64(self) -> [f64; 2] {
        [self.x as f64, self.y as f64]
    }
}

/// Axis-aligned bounding box in integer units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl Bounds {
    fn from_point(p: Point) -> Self {
        Self {
            min_x: p.x,
            min_y: p.y,
            max_x: p.x,
            max_y: p.y,
        }
    }

    pub fn expand(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn merge(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Ordered vertices plus a closed flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Path {
    pub fn new(points: Vec<Point>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// A closed polygon.
    pub fn polygon(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    /// An open polyline.
    pub fn polyline(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Reverse vertex order in place. Used for climb/conventional
    /// milling direction changes.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Rotate a closed path so the vertex at `index` comes first.
    pub fn rotate_to_start(&mut self, index: usize) {
        if self.closed && index > 0 && index < self.points.len() {
            self.points.rotate_left(index);
        }
    }

    /// Edges in order; for a closed path this includes the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        let count = if n < 2 {
            0
        } else if self.closed {
            n
        } else {
            n - 1
        };
        (0..count).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Total edge length, including the closing edge when closed.
    pub fn perimeter(&self) -> f64 {
        self.edges().map(|(a, b)| a.dist(b)).sum()
    }

    /// Twice the signed area (shoelace). Positive for counter-clockwise
    /// winding in a Y-up coordinate system.
    pub fn signed_area2(&self) -> i128 {
        let n = self.points.len();
        if !self.closed || n < 3 {
            return 0;
        }
        let mut sum: i128 = 0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            sum += a.x as i128 * b.y as i128 - b.x as i128 * a.y as i128;
        }
        sum
    }

    pub fn is_ccw(&self) -> bool {
        self.signed_area2() > 0
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let mut iter = self.points.iter();
        let mut b = Bounds::from_point(*iter.next()?);
        for p in iter {
            b.expand(*p);
        }
        Some(b)
    }
}

/// An unordered collection of independent paths forming one unit of
/// geometry. Paths are individually closed or open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathSet {
    pub paths: Vec<Path>,
}

impl PathSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_paths(paths: Vec<Path>) -> Self {
        Self { paths }
    }

    pub fn push(&mut self, path: Path) {
        self.paths.push(path);
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Path> {
        self.paths.iter()
    }

    pub fn closed_paths(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().filter(|p| p.closed)
    }

    pub fn open_paths(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().filter(|p| !p.closed)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.paths
            .iter()
            .filter_map(Path::bounds)
            .reduce(Bounds::merge)
    }
}

impl From<Vec<Path>> for PathSet {
    fn from(paths: Vec<Path>) -> Self {
        Self { paths }
    }
}

impl IntoIterator for PathSet {
    type Item = Path;
    type IntoIter = std::vec::IntoIter<Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

impl FromIterator<Path> for PathSet {
    fn from_iter<T: IntoIterator<Item = Path>>(iter: T) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square(side: i64) -> Path {
        Path::polygon(vec![
            Point::new(0, 0),
            Point::new(side, 0),
            Point::new(side, side),
            Point::new(0, side),
        ])
    }

    #[test]
    fn test_closed_path_edges_wrap() {
        let square = unit_square(10);
        let edges: Vec<_> = square.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3], (Point::new(0, 10), Point::new(0, 0)));
    }

    #[test]
    fn test_open_path_edges_do_not_wrap() {
        let line = Path::polyline(vec![Point::new(0, 0), Point::new(5, 0), Point::new(5, 5)]);
        assert_eq!(line.edges().count(), 2);
    }

    #[test]
    fn test_winding_and_area() {
        let mut square = unit_square(10);
        assert!(square.is_ccw());
        assert_eq!(square.signed_area2(), 200);
        square.reverse();
        assert!(!square.is_ccw());
        assert_eq!(square.signed_area2(), -200);
    }

    #[test]
    fn test_perimeter_includes_closing_edge() {
        let square = unit_square(10);
        assert_eq!(square.perimeter(), 40.0);
        let open = Path::polyline(square.points.clone());
        assert_eq!(open.perimeter(), 30.0);
    }

    #[test]
    fn test_rotate_to_start() {
        let mut square = unit_square(10);
        square.rotate_to_start(2);
        assert_eq!(square.points[0], Point::new(10, 10));
        assert_eq!(square.points.len(), 4);
    }

    #[test]
    fn test_bounds() {
        let set = PathSet::from_paths(vec![
            unit_square(4),
            Path::polyline(vec![Point::new(-3, 7), Point::new(2, -1)]),
        ]);
        let b = set.bounds().unwrap();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (-3, -1, 4, 7));
    }

    #[test]
    fn test_point_serde_skips_missing_z() {
        let p = Point::new(3, 4);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"x":3,"y":4}"#);
        let q: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(p, q);

        let with_z = Point::with_z(1, 2, -500);
        let json = serde_json::to_string(&with_z).unwrap();
        assert_eq!(json, r#"{"x":1,"y":2,"z":-500}"#);
    }
}

//! SVG path-data linearization.
//!
//! Parses a `d` attribute string and flattens it into integer-space
//! [`Path`]s: lines pass through, cubic and quadratic Beziers are
//! flattened with lyon_geom, elliptical arcs go through the
//! endpoint-to-center conversion in [`crate::arc`]. Subpaths map to
//! paths, closed iff terminated by `Z`.

use crate::arc::{arc_to_cubics, ArcParams};
use crate::error::{GeomError, GeomResult};
use crate::path::{Path, PathSet, Point};
use lyon_geom::{point, CubicBezierSegment, QuadraticBezierSegment};
use millkit_core::units::ARC_TOLERANCE;
use svgtypes::{PathParser, PathSegment};

/// Flattening tolerance in integer units.
const FLATTEN_TOLERANCE: f64 = ARC_TOLERANCE as f64;

/// Parse SVG path data into a [`PathSet`], scaling user units by
/// `scale` into integer units.
///
/// Coordinates are scaled before curves are flattened so the flattening
/// tolerance is the same one the rest of the crate uses. The result is
/// raw traced geometry; callers normally run it through
/// [`crate::clip::simplify_and_clean`] before doing real work.
pub fn parse_path_data(d: &str, scale: f64) -> GeomResult<PathSet> {
    let mut builder = SubpathBuilder::new(scale);
    for seg in PathParser::from(d) {
        let seg = seg.map_err(|e| GeomError::InvalidPathData(e.to_string()))?;
        builder.segment(seg);
    }
    Ok(builder.finish())
}

struct SubpathBuilder {
    scale: f64,
    out: Vec<Path>,
    points: Vec<Point>,
    /// Current pen position in integer-unit space.
    cur: [f64; 2],
    /// First point of the current subpath; `Z` returns here.
    start: [f64; 2],
    /// Reflection state for `S`/`T`.
    prev_cubic_ctrl: Option<[f64; 2]>,
    prev_quad_ctrl: Option<[f64; 2]>,
}

impl SubpathBuilder {
    fn new(scale: f64) -> Self {
        Self {
            scale,
            out: Vec::new(),
            points: Vec::new(),
            cur: [0.0, 0.0],
            start: [0.0, 0.0],
            prev_cubic_ctrl: None,
            prev_quad_ctrl: None,
        }
    }

    fn segment(&mut self, seg: PathSegment) {
        let s = self.scale;
        let mut keep_cubic = false;
        let mut keep_quad = false;
        match seg {
            PathSegment::MoveTo { abs, x, y } => {
                let p = self.resolve(abs, x * s, y * s);
                self.flush(false);
                self.cur = p;
                self.start = p;
                self.push_cur();
            }
            PathSegment::LineTo { abs, x, y } => {
                let p = self.resolve(abs, x * s, y * s);
                self.line_to(p);
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                let px = if abs { x * s } else { self.cur[0] + x * s };
                let p = [px, self.cur[1]];
                self.line_to(p);
            }
            PathSegment::VerticalLineTo { abs, y } => {
                let py = if abs { y * s } else { self.cur[1] + y * s };
                let p = [self.cur[0], py];
                self.line_to(p);
            }
            PathSegment::CurveTo { abs, x1, y1, x2, y2, x, y } => {
                let c1 = self.resolve(abs, x1 * s, y1 * s);
                let c2 = self.resolve(abs, x2 * s, y2 * s);
                let p = self.resolve(abs, x * s, y * s);
                self.cubic_to(c1, c2, p);
                keep_cubic = true;
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let c1 = self.reflect(self.prev_cubic_ctrl);
                let c2 = self.resolve(abs, x2 * s, y2 * s);
                let p = self.resolve(abs, x * s, y * s);
                self.cubic_to(c1, c2, p);
                keep_cubic = true;
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                let c = self.resolve(abs, x1 * s, y1 * s);
                let p = self.resolve(abs, x * s, y * s);
                self.quad_to(c, p);
                keep_quad = true;
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                let c = self.reflect(self.prev_quad_ctrl);
                let p = self.resolve(abs, x * s, y * s);
                self.quad_to(c, p);
                keep_quad = true;
            }
            PathSegment::EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let p = self.resolve(abs, x * s, y * s);
                let params = ArcParams {
                    rx: rx * s,
                    ry: ry * s,
                    x_rotation_deg: x_axis_rotation,
                    large_arc,
                    sweep,
                };
                let cubics = arc_to_cubics(self.cur, p, &params);
                if cubics.is_empty() {
                    self.line_to(p);
                } else {
                    self.ensure_started();
                    for c in &cubics {
                        c.for_each_flattened(FLATTEN_TOLERANCE, &mut |line| {
                            self.push_f64(line.to.x, line.to.y);
                        });
                    }
                    self.cur = p;
                }
            }
            PathSegment::ClosePath { .. } => {
                self.flush(true);
                self.cur = self.start;
            }
        }
        if !keep_cubic {
            self.prev_cubic_ctrl = None;
        }
        if !keep_quad {
            self.prev_quad_ctrl = None;
        }
    }

    fn resolve(&self, abs: bool, x: f64, y: f64) -> [f64; 2] {
        if abs {
            [x, y]
        } else {
            [self.cur[0] + x, self.cur[1] + y]
        }
    }

    /// Reflect the previous control point through the current point,
    /// or degrade to the current point when the previous command was
    /// not of the matching curve family.
    fn reflect(&self, prev: Option<[f64; 2]>) -> [f64; 2] {
        match prev {
            Some(c) => [2.0 * self.cur[0] - c[0], 2.0 * self.cur[1] - c[1]],
            None => self.cur,
        }
    }

    fn line_to(&mut self, p: [f64; 2]) {
        self.ensure_started();
        self.push_f64(p[0], p[1]);
        self.cur = p;
    }

    fn cubic_to(&mut self, c1: [f64; 2], c2: [f64; 2], p: [f64; 2]) {
        self.ensure_started();
        let seg = CubicBezierSegment {
            from: point(self.cur[0], self.cur[1]),
            ctrl1: point(c1[0], c1[1]),
            ctrl2: point(c2[0], c2[1]),
            to: point(p[0], p[1]),
        };
        seg.for_each_flattened(FLATTEN_TOLERANCE, &mut |line| {
            self.push_f64(line.to.x, line.to.y);
        });
        self.cur = p;
        self.prev_cubic_ctrl = Some(c2);
    }

    fn quad_to(&mut self, c: [f64; 2], p: [f64; 2]) {
        self.ensure_started();
        let seg = QuadraticBezierSegment {
            from: point(self.cur[0], self.cur[1]),
            ctrl: point(c[0], c[1]),
            to: point(p[0], p[1]),
        };
        seg.for_each_flattened(FLATTEN_TOLERANCE, &mut |line| {
            self.push_f64(line.to.x, line.to.y);
        });
        self.cur = p;
        self.prev_quad_ctrl = Some(c);
    }

    /// A drawing command right after `Z` starts a new subpath at the
    /// closed one's start point.
    fn ensure_started(&mut self) {
        if self.points.is_empty() {
            self.push_cur();
        }
    }

    fn push_cur(&mut self) {
        let p = self.cur;
        self.push_f64(p[0], p[1]);
    }

    fn push_f64(&mut self, x: f64, y: f64) {
        let p = Point::new(x.round() as i64, y.round() as i64);
        if self.points.last() != Some(&p) {
            self.points.push(p);
        }
    }

    fn flush(&mut self, closed: bool) {
        if self.points.is_empty() {
            return;
        }
        let mut points = std::mem::take(&mut self.points);
        // closure is structural, drop an explicit closing vertex
        if closed && points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() >= 2 || (closed && !points.is_empty()) {
            self.out.push(Path::new(points, closed));
        }
    }

    fn finish(mut self) -> PathSet {
        self.flush(false);
        PathSet::from(self.out)
    }
}

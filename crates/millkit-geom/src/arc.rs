//! Elliptical arc linearization.
//!
//! Converts SVG-style endpoint arcs (radii, rotation, large-arc and
//! sweep flags) to center parameterization, then approximates the sweep
//! with one cubic Bezier per angular step of at most 90 degrees using
//! the tangent-based control-point construction.

use lyon_geom::{point, CubicBezierSegment};
use std::f64::consts::PI;

/// Endpoint-arc parameters as they appear in path data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    pub rx: f64,
    pub ry: f64,
    /// Ellipse x-axis rotation in degrees.
    pub x_rotation_deg: f64,
    pub large_arc: bool,
    pub sweep: bool,
}

/// Convert an endpoint arc into cubic Bezier segments.
///
/// Returns an empty vector for degenerate input (coincident endpoints
/// or a zero radius); per SVG rules the caller then draws a straight
/// line to the endpoint.
pub fn arc_to_cubics(from: [f64; 2], to: [f64; 2], params: &ArcParams) -> Vec<CubicBezierSegment<f64>> {
    let [x1, y1] = from;
    let [x2, y2] = to;
    if x1 == x2 && y1 == y2 {
        return Vec::new();
    }
    let mut rx = params.rx.abs();
    let mut ry = params.ry.abs();
    if rx == 0.0 || ry == 0.0 {
        return Vec::new();
    }

    let phi = params.x_rotation_deg.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();

    // endpoint to center parameterization
    let dx2 = (x1 - x2) / 2.0;
    let dy2 = (y1 - y2) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    // no ellipse with these radii reaches both endpoints: scale up
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let rx_sq = rx * rx;
    let ry_sq = ry * ry;
    let x1p_sq = x1p * x1p;
    let y1p_sq = y1p * y1p;
    let num = rx_sq * ry_sq - rx_sq * y1p_sq - ry_sq * x1p_sq;
    let den = rx_sq * y1p_sq + ry_sq * x1p_sq;
    let mut factor = (num.max(0.0) / den).sqrt();
    if params.large_arc == params.sweep {
        factor = -factor;
    }
    let cxp = factor * rx * y1p / ry;
    let cyp = -factor * ry * x1p / rx;

    let cx = cos_phi * cxp - sin_phi * cyp + (x1 + x2) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (y1 + y2) / 2.0;

    let start_v = [(x1p - cxp) / rx, (y1p - cyp) / ry];
    let end_v = [(-x1p - cxp) / rx, (-y1p - cyp) / ry];
    let theta1 = vector_angle([1.0, 0.0], start_v);
    let mut delta = vector_angle(start_v, end_v) % (2.0 * PI);
    if !params.sweep && delta > 0.0 {
        delta -= 2.0 * PI;
    } else if params.sweep && delta < 0.0 {
        delta += 2.0 * PI;
    }

    // one cubic per sweep step of at most a quarter turn
    let segments = ((delta.abs() / (PI / 2.0)).ceil() as usize).max(1);
    let step = delta / segments as f64;
    let t = (step / 2.0).tan();
    let alpha = step.sin() * ((4.0 + 3.0 * t * t).sqrt() - 1.0) / 3.0;

    let ellipse_point = |theta: f64| -> [f64; 2] {
        let (s, c) = theta.sin_cos();
        [
            cx + rx * c * cos_phi - ry * s * sin_phi,
            cy + rx * c * sin_phi + ry * s * cos_phi,
        ]
    };
    // derivative direction on the unit circle, mapped through the
    // ellipse axes
    let ellipse_tangent = |theta: f64| -> [f64; 2] {
        let (s, c) = theta.sin_cos();
        [
            -rx * s * cos_phi - ry * c * sin_phi,
            -rx * s * sin_phi + ry * c * cos_phi,
        ]
    };

    let mut out = Vec::with_capacity(segments);
    let mut theta = theta1;
    let mut p_from = ellipse_point(theta);
    for _ in 0..segments {
        let theta_next = theta + step;
        let p_to = ellipse_point(theta_next);
        let t_from = ellipse_tangent(theta);
        let t_to = ellipse_tangent(theta_next);
        out.push(CubicBezierSegment {
            from: point(p_from[0], p_from[1]),
            ctrl1: point(p_from[0] + alpha * t_from[0], p_from[1] + alpha * t_from[1]),
            ctrl2: point(p_to[0] - alpha * t_to[0], p_to[1] - alpha * t_to[1]),
            to: point(p_to[0], p_to[1]),
        });
        theta = theta_next;
        p_from = p_to;
    }
    out
}

/// Signed angle between two vectors.
fn vector_angle(u: [f64; 2], v: [f64; 2]) -> f64 {
    let dot = u[0] * v[0] + u[1] * v[1];
    let len = (u[0] * u[0] + u[1] * u[1]).sqrt() * (v[0] * v[0] + v[1] * v[1]).sqrt();
    let mut a = (dot / len).clamp(-1.0, 1.0).acos();
    if u[0] * v[1] - u[1] * v[0] < 0.0 {
        a = -a;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARC_EPS: f64 = 1e-6;

    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn test_semicircle_splits_into_two_segments() {
        let params = ArcParams {
            rx: 50.0,
            ry: 50.0,
            x_rotation_deg: 0.0,
            large_arc: false,
            sweep: true,
        };
        let cubics = arc_to_cubics([0.0, 0.0], [100.0, 0.0], &params);
        assert_eq!(cubics.len(), 2);
        assert!(close(cubics[0].from.x, 0.0, ARC_EPS));
        assert!(close(cubics[0].from.y, 0.0, ARC_EPS));
        let last = cubics.last().unwrap();
        assert!(close(last.to.x, 100.0, ARC_EPS));
        assert!(close(last.to.y, 0.0, ARC_EPS));
        // consecutive segments share their junction point
        assert_eq!(cubics[0].to, cubics[1].from);
    }

    #[test]
    fn test_arc_stays_on_circle() {
        let params = ArcParams {
            rx: 50.0,
            ry: 50.0,
            x_rotation_deg: 0.0,
            large_arc: false,
            sweep: true,
        };
        let cubics = arc_to_cubics([0.0, 0.0], [100.0, 0.0], &params);
        for seg in &cubics {
            for i in 0..=10 {
                let p = seg.sample(i as f64 / 10.0);
                let r = ((p.x - 50.0).powi(2) + p.y.powi(2)).sqrt();
                // cubic approximation error over 90 degrees is far below 0.1%
                assert!(close(r, 50.0, 0.05), "radius drifted to {}", r);
            }
        }
    }

    #[test]
    fn test_sweep_flag_selects_side() {
        let mk = |sweep| ArcParams {
            rx: 50.0,
            ry: 50.0,
            x_rotation_deg: 0.0,
            large_arc: false,
            sweep,
        };
        let pos = arc_to_cubics([0.0, 0.0], [100.0, 0.0], &mk(true));
        let neg = arc_to_cubics([0.0, 0.0], [100.0, 0.0], &mk(false));
        // sweep picks the direction of increasing angle, so the two
        // flags land on opposite sides of the chord
        let pos_mid = pos[0].to;
        let neg_mid = neg[0].to;
        assert!(pos_mid.y < 0.0);
        assert!(neg_mid.y > 0.0);
    }

    #[test]
    fn test_large_arc_takes_three_quarters() {
        let params = ArcParams {
            rx: 50.0,
            ry: 50.0,
            x_rotation_deg: 0.0,
            large_arc: true,
            sweep: true,
        };
        // quarter-chord endpoints: small arc is 90, large is 270
        let cubics = arc_to_cubics([50.0, -50.0], [100.0, 0.0], &params);
        assert_eq!(cubics.len(), 3);
    }

    #[test]
    fn test_undersized_radii_scale_up() {
        let params = ArcParams {
            rx: 10.0,
            ry: 10.0,
            x_rotation_deg: 0.0,
            large_arc: false,
            sweep: true,
        };
        let cubics = arc_to_cubics([0.0, 0.0], [100.0, 0.0], &params);
        assert!(!cubics.is_empty());
        let last = cubics.last().unwrap();
        assert!(close(last.to.x, 100.0, ARC_EPS));
        assert!(close(last.to.y, 0.0, ARC_EPS));
    }

    #[test]
    fn test_degenerate_input_yields_no_segments() {
        let params = ArcParams {
            rx: 0.0,
            ry: 50.0,
            x_rotation_deg: 0.0,
            large_arc: false,
            sweep: true,
        };
        assert!(arc_to_cubics([0.0, 0.0], [100.0, 0.0], &params).is_empty());
        let params2 = ArcParams {
            rx: 50.0,
            ry: 50.0,
            x_rotation_deg: 0.0,
            large_arc: false,
            sweep: true,
        };
        assert!(arc_to_cubics([5.0, 5.0], [5.0, 5.0], &params2).is_empty());
    }
}

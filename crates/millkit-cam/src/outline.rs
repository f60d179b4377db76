//! Contour cutting along the inside or outside of a shape.
//!
//! The cut lives in a ring-shaped channel starting at the geometry edge:
//! the first pass runs half a cutter diameter from the edge, later
//! passes step away from it until the requested channel width is
//! covered. Passes are stitched with the ring boundary as the clip
//! connecting moves must not cross.

use crate::error::{CamError, CamResult};
use crate::toolpath::{closed_only, Toolpath};
use millkit_core::Diagnostics;
use millkit_geom::{difference, merge_paths, offset, PathSet};

/// Which side of the geometry edge the channel lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineSide {
    Inside,
    Outside,
}

/// Parameters for contour cutting.
#[derive(Debug, Clone)]
pub struct OutlineParams {
    /// Cutter diameter in integer units.
    pub cutter_diameter: i64,
    /// Fraction of the cutter diameter shared between adjacent passes.
    pub overlap: f64,
    /// Total channel width measured from the geometry edge, integer
    /// units. Must cover at least the cutter itself.
    pub width: i64,
    pub side: OutlineSide,
    /// Reverse cutting direction for climb milling.
    pub climb: bool,
}

impl OutlineParams {
    pub fn validate(&self) -> CamResult<()> {
        if self.cutter_diameter <= 0 {
            return Err(CamError::invalid_value(
                "cutter_diameter",
                "must be positive",
            ));
        }
        if !(0.0..1.0).contains(&self.overlap) {
            return Err(CamError::out_of_range("overlap", self.overlap, 0.0, 1.0));
        }
        if self.width < self.cutter_diameter {
            return Err(CamError::invalid_value(
                "width",
                "must be at least the cutter diameter",
            ));
        }
        Ok(())
    }

    fn step(&self) -> i64 {
        let step = (self.cutter_diameter as f64 * (1.0 - self.overlap)).round() as i64;
        step.max(1)
    }
}

/// Cut a contour channel along the shape edge.
pub fn outline(
    shape: &PathSet,
    params: &OutlineParams,
    diag: &mut Diagnostics,
) -> CamResult<Vec<Toolpath>> {
    params.validate()?;
    let shape = closed_only(shape, "outline", diag);
    let half = params.cutter_diameter / 2;
    let far = params.width - half;
    let inward = params.side == OutlineSide::Inside;

    let boundary = channel_ring(&shape, half, far, inward);
    if boundary.is_empty() {
        diag.warn("contour channel collapsed under the cutter offset, nothing to cut");
        return Ok(Vec::new());
    }

    // climb milling flips travel direction, oppositely per side: the
    // material sits inward of an outside cut and outward of an inside one
    let flip = if inward { params.climb } else { !params.climb };
    let step = params.step();

    let mut acc = PathSet::new();
    let mut delta = half;
    loop {
        let signed = if inward { -delta } else { delta };
        let mut pass = offset(&shape, signed);
        if pass.is_empty() {
            // deeper insets only shrink further, nothing more to cut
            break;
        }
        if flip {
            for path in &mut pass.paths {
                path.reverse();
            }
        }
        merge_paths(&mut acc, pass, Some(&boundary));
        if delta >= far {
            break;
        }
        delta = (delta + step).min(far);
    }
    Ok(Toolpath::from_set(acc, Some(&boundary)))
}

/// The ring the passes live in: between the wall pass and the farthest
/// pass. Its paths bound the stitching moves. A channel exactly one
/// cutter wide has no interior, the wall pass itself is the clip then.
fn channel_ring(shape: &PathSet, half: i64, far: i64, inward: bool) -> PathSet {
    let sign = if inward { -1 } else { 1 };
    let near = offset(shape, sign * half);
    if far <= half {
        return near;
    }
    let far_set = offset(shape, sign * far);
    if inward {
        difference(&near, &far_set)
    } else {
        difference(&far_set, &near)
    }
}

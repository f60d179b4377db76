//! Operation descriptions: the serialized form of one machining step
//! and its dispatch onto a toolpath strategy.

use crate::engrave::{engrave, EngraveParams};
use crate::error::{CamError, CamResult};
use crate::gcode_gen::DepthParams;
use crate::outline::{outline, OutlineParams, OutlineSide};
use crate::perforate::{perforate, PerforateParams};
use crate::pocket::{concentric_pocket, raster_pocket, PocketParams};
use crate::project::Job;
use crate::toolpath::Toolpath;
use millkit_core::{to_units, Diagnostics, MeasurementSystem};
use millkit_geom::{
    boolean, parse_path_data, simplify_and_clean, BoolOp, FillRule, Path, PathSet, Point,
};
use serde::{Deserialize, Serialize};

/// Toolpath strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    PocketConcentric,
    PocketRaster,
    OutlineInside,
    OutlineOutside,
    Perforate,
    Engrave,
    VCarve,
    VPocket,
}

/// Source geometry for an operation: SVG path data or an explicit
/// point list, in real-world units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPath {
    pub d: Option<String>,
    pub points: Vec<[f64; 2]>,
    pub closed: bool,
    pub fill_rule: FillRule,
}

impl Default for RawPath {
    fn default() -> Self {
        Self {
            d: None,
            points: Vec::new(),
            closed: true,
            fill_rule: FillRule::default(),
        }
    }
}

impl RawPath {
    pub(crate) fn to_pathset(&self, units: MeasurementSystem) -> CamResult<PathSet> {
        if let Some(d) = &self.d {
            return Ok(parse_path_data(d, units.units_per_unit() as f64)?);
        }
        if self.points.is_empty() {
            return Err(CamError::invalid_value(
                "paths",
                "needs path data or points",
            ));
        }
        let pts: Vec<Point> = self
            .points
            .iter()
            .map(|[x, y]| Point::new(to_units(*x, units), to_units(*y, units)))
            .collect();
        let path = if self.closed {
            Path::polygon(pts)
        } else {
            Path::polyline(pts)
        };
        Ok(PathSet::from_paths(vec![path]))
    }
}

/// Cutting parameters for one operation, in real-world units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CutParams {
    /// Cutter diameter override; the job tool applies when absent.
    pub cutter_diameter: Option<f64>,
    /// Fraction of the cutter shared between adjacent passes.
    pub overlap: f64,
    pub pass_depth: f64,
    pub top_z: f64,
    pub bottom_z: f64,
    pub ramp: bool,
    pub climb: bool,
    /// Stock left on pocket walls.
    pub margin: f64,
    /// Contour channel width; a single wall pass when absent.
    pub width: Option<f64>,
    /// Web left between perforation holes.
    pub spacing: f64,
}

impl Default for CutParams {
    fn default() -> Self {
        Self {
            cutter_diameter: None,
            overlap: 0.5,
            pass_depth: 1.0,
            top_z: 0.0,
            bottom_z: -1.0,
            ramp: false,
            climb: false,
            margin: 0.0,
            width: None,
            spacing: 1.0,
        }
    }
}

fn default_combine() -> BoolOp {
    BoolOp::Union
}

fn default_enabled() -> bool {
    true
}

/// One machining step of a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    pub strategy: Strategy,
    /// How successive closed subpaths combine into the working region.
    #[serde(default = "default_combine")]
    pub combine: BoolOp,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub paths: Vec<RawPath>,
    #[serde(default)]
    pub params: CutParams,
}

impl Operation {
    /// Resolve the drawn geometry. Each entry's closed subpaths are
    /// cleaned under its fill rule, then folded together with the
    /// combine op. Open subpaths ride along uncombined.
    pub fn input_geometry(&self, units: MeasurementSystem) -> CamResult<PathSet> {
        let mut closed_acc: Option<PathSet> = None;
        let mut open = Vec::new();
        for raw in &self.paths {
            let mut closed_part = PathSet::new();
            for path in raw.to_pathset(units)? {
                if path.closed {
                    closed_part.push(path);
                } else {
                    open.push(path);
                }
            }
            if closed_part.is_empty() {
                continue;
            }
            let cleaned = simplify_and_clean(&closed_part, raw.fill_rule);
            closed_acc = Some(match closed_acc {
                Some(acc) => boolean(&acc, &cleaned, self.combine),
                None => cleaned,
            });
        }
        let mut out = closed_acc.unwrap_or_else(PathSet::new);
        for path in open {
            out.push(path);
        }
        if out.is_empty() {
            return Err(CamError::EmptyGeometry(self.name.clone()));
        }
        Ok(out)
    }

    /// Cutter diameter in integer units, falling back to the job tool.
    pub fn cutter(&self, units: MeasurementSystem, fallback: f64) -> i64 {
        to_units(self.params.cutter_diameter.unwrap_or(fallback), units)
    }

    /// Depth plan for this operation's program block.
    pub fn depth(&self, units: MeasurementSystem, cutter: i64) -> DepthParams {
        DepthParams {
            top_z: to_units(self.params.top_z, units),
            bottom_z: to_units(self.params.bottom_z, units),
            pass_depth: to_units(self.params.pass_depth, units),
            ramp: self.params.ramp,
            cutter_diameter: cutter,
        }
    }

    /// Run the strategy over the resolved geometry.
    pub fn toolpaths(
        &self,
        units: MeasurementSystem,
        job: &Job,
        diag: &mut Diagnostics,
    ) -> CamResult<Vec<Toolpath>> {
        let shape = self.input_geometry(units)?;
        let p = &self.params;
        let cutter = self.cutter(units, job.tool.diameter);
        match self.strategy {
            Strategy::PocketConcentric | Strategy::PocketRaster => {
                let pocket = PocketParams {
                    cutter_diameter: cutter,
                    overlap: p.overlap,
                    climb: p.climb,
                    margin: to_units(p.margin, units),
                };
                if self.strategy == Strategy::PocketConcentric {
                    concentric_pocket(&shape, &pocket, diag)
                } else {
                    raster_pocket(&shape, &pocket, diag)
                }
            }
            Strategy::OutlineInside | Strategy::OutlineOutside => {
                let side = if self.strategy == Strategy::OutlineInside {
                    OutlineSide::Inside
                } else {
                    OutlineSide::Outside
                };
                let width = match p.width {
                    Some(w) => to_units(w, units),
                    None => cutter,
                };
                outline(
                    &shape,
                    &OutlineParams {
                        cutter_diameter: cutter,
                        overlap: p.overlap,
                        width,
                        side,
                        climb: p.climb,
                    },
                    diag,
                )
            }
            Strategy::Perforate => perforate(
                &shape,
                &PerforateParams {
                    cutter_diameter: cutter,
                    spacing: to_units(p.spacing, units),
                    retract_z: to_units(job.safe_z, units),
                    bottom_z: to_units(p.bottom_z, units),
                },
                diag,
            ),
            Strategy::Engrave => engrave(&shape, &EngraveParams { climb: p.climb }, diag),
            Strategy::VCarve => Err(CamError::Unsupported("v_carve strategy".into())),
            Strategy::VPocket => Err(CamError::Unsupported("v_pocket strategy".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_raw(origin: f64, side: f64) -> RawPath {
        RawPath {
            points: vec![
                [origin, origin],
                [origin + side, origin],
                [origin + side, origin + side],
                [origin, origin + side],
            ],
            ..RawPath::default()
        }
    }

    fn op(strategy: Strategy, paths: Vec<RawPath>) -> Operation {
        Operation {
            name: "test".into(),
            strategy,
            combine: BoolOp::Union,
            enabled: true,
            paths,
            params: CutParams::default(),
        }
    }

    #[test]
    fn test_strategy_serde_names() {
        let json = serde_json::to_string(&Strategy::PocketConcentric).unwrap();
        assert_eq!(json, "\"pocket_concentric\"");
        let back: Strategy = serde_json::from_str("\"outline_inside\"").unwrap();
        assert_eq!(back, Strategy::OutlineInside);
        let v: Strategy = serde_json::from_str("\"v_carve\"").unwrap();
        assert_eq!(v, Strategy::VCarve);
    }

    #[test]
    fn test_operation_defaults_from_minimal_json() {
        let json = r#"{
            "name": "Pocket",
            "strategy": "pocket_raster",
            "paths": [{"points": [[0,0],[10,0],[10,10],[0,10]]}]
        }"#;
        let op: Operation = serde_json::from_str(json).unwrap();
        assert!(op.enabled);
        assert_eq!(op.combine, BoolOp::Union);
        assert_eq!(op.params.overlap, 0.5);
        assert!(op.paths[0].closed);
        assert_eq!(op.paths[0].fill_rule, FillRule::EvenOdd);
    }

    #[test]
    fn test_input_geometry_combines_with_union() {
        let op = op(
            Strategy::Engrave,
            vec![square_raw(0.0, 10.0), square_raw(5.0, 10.0)],
        );
        let shape = op.input_geometry(MeasurementSystem::Metric).unwrap();
        assert_eq!(shape.len(), 1);
        let b = shape.bounds().unwrap();
        assert_eq!(b.max_x, to_units(15.0, MeasurementSystem::Metric));
    }

    #[test]
    fn test_input_geometry_difference_cuts_hole() {
        let mut op = op(
            Strategy::Engrave,
            vec![square_raw(0.0, 10.0), square_raw(2.0, 6.0)],
        );
        op.combine = BoolOp::Difference;
        let shape = op.input_geometry(MeasurementSystem::Metric).unwrap();
        assert_eq!(shape.len(), 2);
    }

    #[test]
    fn test_open_paths_skip_the_combine() {
        let line = RawPath {
            points: vec![[0.0, 0.0], [30.0, 0.0]],
            closed: false,
            ..RawPath::default()
        };
        let op = op(Strategy::Engrave, vec![square_raw(0.0, 10.0), line]);
        let shape = op.input_geometry(MeasurementSystem::Metric).unwrap();
        assert_eq!(shape.closed_paths().count(), 1);
        assert_eq!(shape.open_paths().count(), 1);
    }

    #[test]
    fn test_svg_path_data_is_scaled() {
        let raw = RawPath {
            d: Some("M 0 0 L 10 0 L 10 10 Z".into()),
            ..RawPath::default()
        };
        let set = raw.to_pathset(MeasurementSystem::Metric).unwrap();
        let b = set.bounds().unwrap();
        assert_eq!(b.max_x, 1_000_000);
    }

    #[test]
    fn test_pathless_entry_is_rejected() {
        let op = op(Strategy::Engrave, vec![RawPath::default()]);
        assert!(matches!(
            op.input_geometry(MeasurementSystem::Metric),
            Err(CamError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_no_paths_is_empty_geometry() {
        let op = op(Strategy::Engrave, Vec::new());
        assert!(matches!(
            op.input_geometry(MeasurementSystem::Metric),
            Err(CamError::EmptyGeometry(_))
        ));
    }

    #[test]
    fn test_vcarve_is_not_supported() {
        let mut diag = Diagnostics::new();
        let op = op(Strategy::VCarve, vec![square_raw(0.0, 10.0)]);
        let err = op
            .toolpaths(MeasurementSystem::Metric, &Job::default(), &mut diag)
            .unwrap_err();
        assert!(err.to_string().contains("Unsupported"));
    }
}

//! Toolpath to G-code conversion.
//!
//! Translates toolpaths into a linear program: a preamble, one block
//! per operation with multi-pass depth stepping, tab handling and
//! plunge ramping, and a footer. Output uses absolute positioning with
//! three decimals in metric programs and four in imperial.

use crate::error::{CamError, CamResult};
use crate::tabs::separate_tabs;
use crate::toolpath::Toolpath;
use millkit_core::{from_units, Diagnostics, MeasurementSystem};
use millkit_geom::{Path, PathSet, Point};
use std::fmt::Write as _;

/// Machine-level settings shared by every operation of a program.
#[derive(Debug, Clone)]
pub struct MachineParams {
    pub units: MeasurementSystem,
    /// Retract height in integer units, above the stock top.
    pub safe_z: i64,
    /// Cutting feed in real-world units per minute.
    pub feed_rate: f64,
    /// Plunging feed in real-world units per minute.
    pub plunge_feed: f64,
    /// Traverse feed, noted in the program header.
    pub rapid_feed: f64,
    pub spindle_speed: f64,
    /// Added to every emitted X/Y, real-world units.
    pub work_offset: (f64, f64),
}

impl MachineParams {
    pub fn validate(&self) -> CamResult<()> {
        for (name, value) in [
            ("feed_rate", self.feed_rate),
            ("plunge_feed", self.plunge_feed),
            ("rapid_feed", self.rapid_feed),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CamError::invalid_value(name, "must be a positive feed"));
            }
        }
        if !self.spindle_speed.is_finite() || self.spindle_speed < 0.0 {
            return Err(CamError::invalid_value(
                "spindle_speed",
                "must not be negative",
            ));
        }
        Ok(())
    }
}

/// Depth plan for one operation.
#[derive(Debug, Clone)]
pub struct DepthParams {
    /// Stock top in integer units.
    pub top_z: i64,
    /// Final depth in integer units, below `top_z`.
    pub bottom_z: i64,
    /// Maximum material removed per pass, integer units.
    pub pass_depth: i64,
    /// Ramp into the material along the path instead of drilling down.
    pub ramp: bool,
    /// Noted in the operation header.
    pub cutter_diameter: i64,
}

impl DepthParams {
    pub fn validate(&self) -> CamResult<()> {
        if self.pass_depth <= 0 {
            return Err(CamError::invalid_value("pass_depth", "must be positive"));
        }
        if self.bottom_z >= self.top_z {
            return Err(CamError::invalid_value("bottom_z", "must lie below top_z"));
        }
        Ok(())
    }

    /// Pass floors from the first step-down to the final depth.
    fn passes(&self) -> Vec<i64> {
        let mut floors = Vec::new();
        let mut z = self.top_z;
        while z > self.bottom_z {
            z = (z - self.pass_depth).max(self.bottom_z);
            floors.push(z);
        }
        floors
    }
}

/// Tab regions and the height cuts are held to above them.
#[derive(Debug, Clone)]
pub struct TabPlan {
    pub regions: PathSet,
    /// Z of the tab top, integer units.
    pub height: i64,
}

/// Emits G-code for toolpaths under one machine configuration.
#[derive(Debug)]
pub struct GcodeGenerator {
    machine: MachineParams,
    decimals: usize,
}

impl GcodeGenerator {
    pub fn new(machine: MachineParams) -> Self {
        let decimals = match machine.units {
            MeasurementSystem::Metric => 3,
            MeasurementSystem::Imperial => 4,
        };
        Self { machine, decimals }
    }

    fn emitter(&self) -> Emitter<'_> {
        Emitter::new(&self.machine, self.decimals)
    }

    /// Program header: units, positioning mode, spindle start, retract.
    pub fn preamble(&self) -> String {
        let mut em = self.emitter();
        match self.machine.units {
            MeasurementSystem::Metric => em.line("G21", Some("Set units to millimeters")),
            MeasurementSystem::Imperial => em.line("G20", Some("Set units to inches")),
        }
        em.line("G90", Some("Absolute positioning"));
        let spindle = format!("M3 S{:.0}", self.machine.spindle_speed);
        em.line(&spindle, Some("Start spindle"));
        let safe = format!("G0 Z{}", em.fmt_z(self.machine.safe_z));
        em.line(&safe, Some("Move to safe height"));
        em.finish()
    }

    /// Program footer: retract, spindle off, program end.
    pub fn footer(&self) -> String {
        let mut em = self.emitter();
        let safe = format!("G0 Z{}", em.fmt_z(self.machine.safe_z));
        em.line(&safe, Some("Retract to safe height"));
        em.line("M5", Some("Stop spindle"));
        em.line("M2", Some("End program"));
        em.finish()
    }

    /// One operation block. Assumes the cutter parked at the safe
    /// height and leaves it there.
    pub fn operation(
        &self,
        label: &str,
        toolpaths: &[Toolpath],
        depth: &DepthParams,
        tabs: Option<&TabPlan>,
        diag: &mut Diagnostics,
    ) -> CamResult<String> {
        self.machine.validate()?;
        depth.validate()?;
        if self.machine.safe_z <= depth.top_z {
            return Err(CamError::invalid_value("safe_z", "must clear the stock top"));
        }
        let tabs = match tabs {
            Some(plan) if plan.height <= depth.bottom_z => {
                diag.warn(format!(
                    "tab height {:.3} not above the operation floor {:.3}, tabs dropped",
                    from_units(plan.height, self.machine.units),
                    from_units(depth.bottom_z, self.machine.units),
                ));
                None
            }
            other => other,
        };

        let mut em = self.emitter();
        let units = self.machine.units.label();
        em.comment(label);
        em.comment(&format!(
            "Tool diameter: {:.3} {units}",
            from_units(depth.cutter_diameter, self.machine.units)
        ));
        em.comment(&format!(
            "Depth: {:.3} to {:.3} {units}",
            from_units(depth.top_z, self.machine.units),
            from_units(depth.bottom_z, self.machine.units)
        ));
        em.comment(&format!(
            "Feed: {:.1} {units}/min, plunge: {:.1} {units}/min",
            self.machine.feed_rate, self.machine.plunge_feed
        ));

        let passes = depth.passes();
        for tp in toolpaths {
            if tp.precomputed_z {
                self.emit_drilled(&mut em, &tp.path);
                em.rapid_z(self.machine.safe_z, None);
                continue;
            }
            if tp.path.len() < 2 {
                continue;
            }
            let pieces = tabs.map(|plan| separate_tabs(&tp.path, &plan.regions));
            let mut entry_floor = depth.top_z;
            for (i, &pass_z) in passes.iter().enumerate() {
                match (&pieces, tabs) {
                    (Some(pieces), Some(plan)) => {
                        self.emit_tabbed_pass(
                            &mut em,
                            pieces,
                            pass_z,
                            plan.height,
                            entry_floor,
                            depth.ramp,
                        );
                    }
                    _ => {
                        let retract = i == 0 || !tp.safe_to_close;
                        self.emit_pass(&mut em, &tp.path, pass_z, entry_floor, depth.ramp, retract);
                    }
                }
                entry_floor = pass_z;
            }
            em.rapid_z(self.machine.safe_z, None);
        }
        Ok(em.finish())
    }

    /// Perforation toolpaths carry explicit Z per vertex. Rises go
    /// first, then the traverse, then the feed down.
    fn emit_drilled(&self, em: &mut Emitter<'_>, path: &Path) {
        for p in &path.points {
            let z = p.z.unwrap_or(em.z);
            if z > em.z {
                em.rapid_z(z, None);
            }
            let moved = em.xy != Some((p.x, p.y));
            em.rapid_xy(*p);
            if z < em.z {
                if moved {
                    em.rapid_z(z, None);
                } else {
                    em.plunge(z);
                }
            }
        }
    }

    fn emit_pass(
        &self,
        em: &mut Emitter<'_>,
        path: &Path,
        target_z: i64,
        entry_floor: i64,
        ramp: bool,
        retract: bool,
    ) {
        let Some(start) = path.first() else { return };
        if retract {
            em.rapid_z(self.machine.safe_z, None);
            em.rapid_xy(start);
            em.rapid_z(entry_floor, None);
        } else if em.xy != Some((start.x, start.y)) {
            // the closing move is safe to cut at the current depth
            let z = em.z;
            let mut feed = Some(self.machine.feed_rate);
            em.cut(start, z, &mut feed);
        }

        let mut plan: Vec<(Point, i64)> = path.edges().map(|(_, b)| (b, target_z)).collect();
        if plan.is_empty() {
            return;
        }
        let mut feed = Some(self.machine.feed_rate);
        if ramp && em.z > target_z {
            match self.apply_ramp(&mut plan, start, em.z) {
                Some((split, at)) => {
                    let closes =
                        path.closed || path.last().is_some_and(|last| last.same_xy(start));
                    if closes {
                        // clear the ramp wedge after the lap
                        let wedge: Vec<Point> = plan[..split].iter().map(|e| e.0).collect();
                        plan.extend(wedge.into_iter().map(|p| (p, target_z)));
                        plan.push((at, target_z));
                    }
                }
                None => em.plunge(target_z),
            }
        } else {
            em.plunge(target_z);
        }
        for (p, z) in plan {
            em.cut(p, z, &mut feed);
        }
    }

    /// A pass split into tab pieces. Even pieces run at the pass floor,
    /// odd pieces are held up to the tab height. Every tabbed pass
    /// enters from the safe height.
    fn emit_tabbed_pass(
        &self,
        em: &mut Emitter<'_>,
        pieces: &[Path],
        pass_z: i64,
        tab_z: i64,
        entry_floor: i64,
        ramp: bool,
    ) {
        let held = pass_z.max(tab_z);
        let mut plan: Vec<(Point, i64)> = Vec::new();
        let mut starts_held = false;
        for (i, piece) in pieces.iter().enumerate() {
            let z = if i % 2 == 1 { held } else { pass_z };
            if plan.is_empty() && !piece.is_empty() && i % 2 == 1 {
                starts_held = true;
            }
            for p in &piece.points {
                plan.push((*p, z));
            }
        }
        let Some(&(start, first_z)) = plan.first() else {
            return;
        };
        em.rapid_z(self.machine.safe_z, None);
        em.rapid_xy(start);
        // above a tab only the tab top is clear
        let floor = if starts_held {
            entry_floor.max(tab_z)
        } else {
            entry_floor
        };
        em.rapid_z(floor, None);

        let mut feed = Some(self.machine.feed_rate);
        if ramp && em.z > first_z {
            if self.apply_ramp(&mut plan, start, em.z).is_none() {
                em.plunge(first_z);
            }
        } else {
            em.plunge(first_z);
        }
        for (p, z) in plan {
            em.cut(p, z, &mut feed);
        }
    }

    /// Rework the leading plan entries into a descending ramp along the
    /// pass geometry, clamped to the leading run at the entry depth.
    /// Returns the plan index and position where full depth is reached,
    /// or None when there is no room to ramp.
    fn apply_ramp(
        &self,
        plan: &mut Vec<(Point, i64)>,
        start: Point,
        from_z: i64,
    ) -> Option<(usize, Point)> {
        let target = plan.first()?.1;
        let drop = from_z - target;
        if drop <= 0 {
            return None;
        }
        let mut run_len = 0.0;
        let mut run_end = 0;
        let mut prev = start;
        for (i, e) in plan.iter().enumerate() {
            if e.1 != target {
                break;
            }
            run_len += prev.dist(e.0);
            prev = e.0;
            run_end = i + 1;
        }
        if run_len <= 0.0 {
            return None;
        }
        let ratio = self.machine.feed_rate / self.machine.plunge_feed;
        let ramp_len = (drop as f64 * ratio).min(run_len);

        let mut walked = 0.0;
        let mut a = start;
        for i in 0..run_end {
            let b = plan[i].0;
            let len = a.dist(b);
            if walked + len + 1e-9 < ramp_len {
                walked += len;
                plan[i].1 = from_z - (drop as f64 * (walked / ramp_len)).round() as i64;
                a = b;
                continue;
            }
            let t = if len > 0.0 {
                ((ramp_len - walked) / len).clamp(0.0, 1.0)
            } else {
                1.0
            };
            if t >= 1.0 - 1e-9 {
                plan[i].1 = target;
                return Some((i, b));
            }
            let at = Point::new(
                a.x + ((b.x - a.x) as f64 * t).round() as i64,
                a.y + ((b.y - a.y) as f64 * t).round() as i64,
            );
            plan.insert(i, (at, target));
            return Some((i, at));
        }
        if run_end > 0 {
            plan[run_end - 1].1 = target;
            let at = plan[run_end - 1].0;
            return Some((run_end - 1, at));
        }
        None
    }
}

/// Write-side state: the move buffer plus the last commanded position.
struct Emitter<'a> {
    machine: &'a MachineParams,
    decimals: usize,
    buf: String,
    z: i64,
    xy: Option<(i64, i64)>,
}

impl<'a> Emitter<'a> {
    fn new(machine: &'a MachineParams, decimals: usize) -> Self {
        Self {
            machine,
            decimals,
            buf: String::new(),
            z: machine.safe_z,
            xy: None,
        }
    }

    fn fmt_z(&self, z: i64) -> String {
        format!("{:.*}", self.decimals, from_units(z, self.machine.units))
    }

    fn fmt_x(&self, x: i64) -> String {
        let v = from_units(x, self.machine.units) + self.machine.work_offset.0;
        format!("{:.*}", self.decimals, v)
    }

    fn fmt_y(&self, y: i64) -> String {
        let v = from_units(y, self.machine.units) + self.machine.work_offset.1;
        format!("{:.*}", self.decimals, v)
    }

    fn line(&mut self, code: &str, comment: Option<&str>) {
        match comment {
            Some(c) => {
                let _ = writeln!(self.buf, "{code} ; {c}");
            }
            None => {
                let _ = writeln!(self.buf, "{code}");
            }
        }
    }

    fn comment(&mut self, text: &str) {
        let _ = writeln!(self.buf, "; {text}");
    }

    fn rapid_z(&mut self, z: i64, comment: Option<&str>) {
        if z == self.z {
            return;
        }
        let code = format!("G0 Z{}", self.fmt_z(z));
        self.line(&code, comment);
        self.z = z;
    }

    fn rapid_xy(&mut self, p: Point) {
        if self.xy == Some((p.x, p.y)) {
            return;
        }
        let code = format!("G0 X{} Y{}", self.fmt_x(p.x), self.fmt_y(p.y));
        self.line(&code, None);
        self.xy = Some((p.x, p.y));
    }

    fn plunge(&mut self, z: i64) {
        if z == self.z {
            return;
        }
        let code = format!(
            "G1 Z{} F{:.1}",
            self.fmt_z(z),
            self.machine.plunge_feed
        );
        self.line(&code, None);
        self.z = z;
    }

    /// One cutting move of a planned pass. Same-XY entries adjust depth
    /// only: rises go rapid, drops plunge.
    fn cut(&mut self, p: Point, z: i64, feed: &mut Option<f64>) {
        let same_xy = self.xy == Some((p.x, p.y));
        if same_xy && z == self.z {
            return;
        }
        if same_xy {
            if z > self.z {
                self.rapid_z(z, None);
            } else {
                self.plunge(z);
            }
            return;
        }
        let mut code = format!("G1 X{} Y{}", self.fmt_x(p.x), self.fmt_y(p.y));
        if z != self.z {
            let _ = write!(code, " Z{}", self.fmt_z(z));
        }
        if let Some(f) = feed.take() {
            let _ = write!(code, " F{f:.1}");
        }
        self.line(&code, None);
        self.xy = Some((p.x, p.y));
        self.z = z;
    }

    fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use millkit_core::mm_to_units;

    fn machine() -> MachineParams {
        MachineParams {
            units: MeasurementSystem::Metric,
            safe_z: mm_to_units(5.0),
            feed_rate: 600.0,
            plunge_feed: 200.0,
            rapid_feed: 1500.0,
            spindle_speed: 8000.0,
            work_offset: (0.0, 0.0),
        }
    }

    fn depth(bottom_mm: f64, pass_mm: f64) -> DepthParams {
        DepthParams {
            top_z: 0,
            bottom_z: mm_to_units(bottom_mm),
            pass_depth: mm_to_units(pass_mm),
            ramp: false,
            cutter_diameter: mm_to_units(3.0),
        }
    }

    fn square_10mm() -> Path {
        Path::polygon(vec![
            Point::new(0, 0),
            Point::new(mm_to_units(10.0), 0),
            Point::new(mm_to_units(10.0), mm_to_units(10.0)),
            Point::new(0, mm_to_units(10.0)),
        ])
    }

    fn count_lines(gcode: &str, prefix: &str) -> usize {
        gcode.lines().filter(|l| l.starts_with(prefix)).count()
    }

    #[test]
    fn test_passes_step_down_to_floor() {
        let d = depth(-5.0, 2.0);
        let floors = d.passes();
        assert_eq!(
            floors,
            vec![mm_to_units(-2.0), mm_to_units(-4.0), mm_to_units(-5.0)]
        );
    }

    #[test]
    fn test_validate_rejects_shallow_bottom() {
        let mut d = depth(-5.0, 2.0);
        d.bottom_z = 0;
        assert!(matches!(d.validate(), Err(CamError::InvalidValue { .. })));
    }

    #[test]
    fn test_preamble_and_footer_frame_the_program() {
        let gen = GcodeGenerator::new(machine());
        let pre = gen.preamble();
        assert!(pre.contains("G21 ; Set units to millimeters"));
        assert!(pre.contains("G90 ; Absolute positioning"));
        assert!(pre.contains("M3 S8000 ; Start spindle"));
        assert!(pre.contains("G0 Z5.000 ; Move to safe height"));
        let post = gen.footer();
        assert!(post.contains("M5 ; Stop spindle"));
        assert!(post.ends_with("M2 ; End program\n"));
    }

    #[test]
    fn test_imperial_uses_four_decimals() {
        let mut m = machine();
        m.units = MeasurementSystem::Imperial;
        m.safe_z = to_units_inch(0.25);
        let gen = GcodeGenerator::new(m);
        let pre = gen.preamble();
        assert!(pre.contains("G20 ; Set units to inches"));
        assert!(pre.contains("G0 Z0.2500"));
    }

    fn to_units_inch(v: f64) -> i64 {
        millkit_core::to_units(v, MeasurementSystem::Imperial)
    }

    #[test]
    fn test_single_pass_cut_carries_feed_once() {
        let gen = GcodeGenerator::new(machine());
        let mut diag = Diagnostics::new();
        let tp = vec![Toolpath::new(square_10mm())];
        let g = gen
            .operation("Test cut", &tp, &depth(-1.0, 1.0), None, &mut diag)
            .unwrap();
        assert!(g.contains("; Test cut"));
        assert!(g.contains("G0 X0.000 Y0.000"));
        assert!(g.contains("G1 Z-1.000 F200.0"));
        assert!(g.contains("G1 X10.000 Y0.000 F600.0"));
        assert_eq!(count_lines(&g, "G1 X"), 4);
        assert_eq!(g.matches("F600.0").count(), 1);
    }

    #[test]
    fn test_multipass_closed_path_stays_down() {
        let gen = GcodeGenerator::new(machine());
        let mut diag = Diagnostics::new();
        let tp = vec![Toolpath::new(square_10mm())];
        let g = gen
            .operation("Pocket", &tp, &depth(-3.0, 1.0), None, &mut diag)
            .unwrap();
        // one plunge per pass, one retract at the end
        assert_eq!(count_lines(&g, "G1 Z"), 3);
        assert_eq!(g.matches("G0 Z5.000").count(), 1);
    }

    #[test]
    fn test_unsafe_path_retracts_every_pass() {
        let gen = GcodeGenerator::new(machine());
        let mut diag = Diagnostics::new();
        let open = Path::polyline(vec![
            Point::new(0, 0),
            Point::new(mm_to_units(10.0), mm_to_units(10.0)),
        ]);
        let tp = vec![Toolpath::new(open)];
        let g = gen
            .operation("Slot", &tp, &depth(-2.0, 1.0), None, &mut diag)
            .unwrap();
        assert_eq!(g.matches("G0 Z5.000").count(), 2);
        assert_eq!(g.matches("G0 X0.000 Y0.000").count(), 2);
    }

    #[test]
    fn test_tab_pieces_rise_and_drop() {
        let gen = GcodeGenerator::new(machine());
        let mut diag = Diagnostics::new();
        let tab = PathSet::from_paths(vec![Path::polygon(vec![
            Point::new(mm_to_units(4.0), mm_to_units(-1.0)),
            Point::new(mm_to_units(6.0), mm_to_units(-1.0)),
            Point::new(mm_to_units(6.0), mm_to_units(1.0)),
            Point::new(mm_to_units(4.0), mm_to_units(1.0)),
        ])]);
        let plan = TabPlan {
            regions: tab,
            height: mm_to_units(-1.0),
        };
        let tp = vec![Toolpath::new(square_10mm())];
        let g = gen
            .operation("Cutout", &tp, &depth(-3.0, 3.0), Some(&plan), &mut diag)
            .unwrap();
        // rise onto the tab, then plunge back off it
        assert_eq!(g.matches("G0 Z-1.000").count(), 1);
        assert_eq!(g.matches("G1 Z-3.000 F200.0").count(), 2);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_tabs_below_floor_are_dropped() {
        let gen = GcodeGenerator::new(machine());
        let mut diag = Diagnostics::new();
        let plan = TabPlan {
            regions: PathSet::from_paths(vec![square_10mm()]),
            height: mm_to_units(-3.0),
        };
        let tp = vec![Toolpath::new(square_10mm())];
        let g = gen
            .operation("Cutout", &tp, &depth(-3.0, 3.0), Some(&plan), &mut diag)
            .unwrap();
        assert_eq!(diag.warnings().len(), 1);
        assert_eq!(g.matches("G0 Z-").count(), 0);
    }

    #[test]
    fn test_ramp_descends_along_the_path() {
        let gen = GcodeGenerator::new(machine());
        let mut diag = Diagnostics::new();
        let open = Path::polyline(vec![Point::new(0, 0), Point::new(mm_to_units(10.0), 0)]);
        let tp = vec![Toolpath::new(open)];
        let mut d = depth(-1.0, 1.0);
        d.ramp = true;
        let g = gen.operation("Ramp", &tp, &d, None, &mut diag).unwrap();
        // feed 600 over plunge 200 stretches a 1mm drop over 3mm
        assert!(g.contains("G1 X3.000 Y0.000 Z-1.000 F600.0"));
        assert!(g.contains("G1 X10.000 Y0.000"));
        assert!(!g.contains("G1 Z-1.000 F200.0"));
    }

    #[test]
    fn test_ramp_wedge_is_recut_on_closed_paths() {
        let gen = GcodeGenerator::new(machine());
        let mut diag = Diagnostics::new();
        let tp = vec![Toolpath::new(square_10mm())];
        let mut d = depth(-1.0, 1.0);
        d.ramp = true;
        let g = gen.operation("Ramp", &tp, &d, None, &mut diag).unwrap();
        // the ramped stretch is visited again at full depth
        assert_eq!(g.matches("X3.000 Y0.000").count(), 2);
    }

    #[test]
    fn test_drilled_toolpath_emits_cycles() {
        let gen = GcodeGenerator::new(machine());
        let mut diag = Diagnostics::new();
        let x = mm_to_units(1.0);
        let hole = Path::polyline(vec![
            Point::with_z(x, 0, mm_to_units(2.0)),
            Point::with_z(x, 0, mm_to_units(-5.0)),
            Point::with_z(x, 0, mm_to_units(2.0)),
        ]);
        let tp = vec![Toolpath::drilled(hole)];
        let g = gen
            .operation("Perforate", &tp, &depth(-5.0, 5.0), None, &mut diag)
            .unwrap();
        assert!(g.contains("G0 X1.000 Y0.000"));
        assert!(g.contains("G1 Z-5.000 F200.0"));
        assert_eq!(g.matches("G0 Z2.000").count(), 2);
        assert!(g.ends_with("G0 Z5.000\n"));
    }

    #[test]
    fn test_work_offset_shifts_coordinates() {
        let mut m = machine();
        m.work_offset = (10.0, 5.0);
        let gen = GcodeGenerator::new(m);
        let mut diag = Diagnostics::new();
        let tp = vec![Toolpath::new(square_10mm())];
        let g = gen
            .operation("Shifted", &tp, &depth(-1.0, 1.0), None, &mut diag)
            .unwrap();
        assert!(g.contains("G0 X10.000 Y5.000"));
        assert!(g.contains("G1 X20.000 Y5.000"));
    }

    #[test]
    fn test_safe_height_must_clear_stock() {
        let mut m = machine();
        m.safe_z = mm_to_units(-1.0);
        let gen = GcodeGenerator::new(m);
        let mut diag = Diagnostics::new();
        let tp = vec![Toolpath::new(square_10mm())];
        let err = gen
            .operation("Bad", &tp, &depth(-3.0, 1.0), None, &mut diag)
            .unwrap_err();
        assert!(matches!(err, CamError::InvalidValue { .. }));
    }
}

//! Project files: the serialized job plus its operations, and
//! compilation into a complete program.

use crate::error::CamResult;
use crate::gcode_gen::{GcodeGenerator, MachineParams, TabPlan};
use crate::operation::{Operation, RawPath, Strategy};
use millkit_core::{to_units, Diagnostics, MeasurementSystem};
use millkit_geom::PathSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path as FsPath;

/// The cutter and feeds a job runs with, real-world units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tool {
    pub diameter: f64,
    pub feed_rate: f64,
    pub plunge_feed: f64,
    pub spindle_speed: f64,
}

impl Default for Tool {
    fn default() -> Self {
        Self {
            diameter: 3.175,
            feed_rate: 100.0,
            plunge_feed: 50.0,
            spindle_speed: 3000.0,
        }
    }
}

/// Machine motion settings for a job, real-world units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    pub safe_z: f64,
    pub rapid_feed: f64,
    pub tool: Tool,
    pub work_offset: [f64; 2],
}

impl Default for Job {
    fn default() -> Self {
        Self {
            safe_z: 5.0,
            rapid_feed: 1500.0,
            tool: Tool::default(),
            work_offset: [0.0, 0.0],
        }
    }
}

/// Holding tabs shared by the job's cut-out operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabConfig {
    pub paths: Vec<RawPath>,
    /// Tab top height, real-world units.
    pub height: f64,
}

/// A complete machining project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub units: MeasurementSystem,
    #[serde(default)]
    pub job: Job,
    #[serde(default)]
    pub tabs: Option<TabConfig>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl Project {
    pub fn from_json(text: &str) -> CamResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> CamResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &FsPath) -> CamResult<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    fn machine(&self) -> MachineParams {
        MachineParams {
            units: self.units,
            safe_z: to_units(self.job.safe_z, self.units),
            feed_rate: self.job.tool.feed_rate,
            plunge_feed: self.job.tool.plunge_feed,
            rapid_feed: self.job.rapid_feed,
            spindle_speed: self.job.tool.spindle_speed,
            work_offset: (self.job.work_offset[0], self.job.work_offset[1]),
        }
    }

    fn tab_plan(&self) -> CamResult<Option<TabPlan>> {
        let Some(cfg) = &self.tabs else {
            return Ok(None);
        };
        let mut regions = PathSet::new();
        for raw in &cfg.paths {
            for path in raw.to_pathset(self.units)? {
                regions.push(path);
            }
        }
        Ok(Some(TabPlan {
            regions,
            height: to_units(cfg.height, self.units),
        }))
    }

    /// Compile every enabled operation into one program.
    pub fn compile(&self, diag: &mut Diagnostics) -> CamResult<String> {
        let gen = GcodeGenerator::new(self.machine());
        let tabs = self.tab_plan()?;
        let mut program = gen.preamble();
        for op in &self.operations {
            if !op.enabled {
                continue;
            }
            let toolpaths = op.toolpaths(self.units, &self.job, diag)?;
            if toolpaths.is_empty() {
                tracing::debug!(operation = %op.name, "no toolpaths generated, skipped");
                continue;
            }
            // tabs hold parts being cut free, pockets never cut through
            let op_tabs = match op.strategy {
                Strategy::OutlineInside | Strategy::OutlineOutside | Strategy::Engrave => {
                    tabs.as_ref()
                }
                _ => None,
            };
            let cutter = op.cutter(self.units, self.job.tool.diameter);
            let block = gen.operation(
                &op.name,
                &toolpaths,
                &op.depth(self.units, cutter),
                op_tabs,
                diag,
            )?;
            program.push_str(&block);
        }
        program.push_str(&gen.footer());
        Ok(program)
    }
}

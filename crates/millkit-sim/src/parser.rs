//! G-code parsing with modal state tracking.
//!
//! Reads a program line by line and reduces it to the sequence of
//! commanded positions, one point per line carrying at least one axis
//! word. Coordinates stay in the program's own units; axis words are
//! modal, so unmentioned axes repeat their last commanded value. Points
//! emitted before an axis first appears take its first commanded value,
//! or zero if the axis never appears.

use crate::error::{ParseError, SimResult};
use millkit_core::MeasurementSystem;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One commanded position of the program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Feed active for the move, units per minute. Zero before the
    /// first F word.
    pub f: f64,
    /// True when the move is a rapid traverse.
    pub rapid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motion {
    Rapid,
    Linear,
}

#[derive(Debug, Clone, Copy)]
struct RawPoint {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
    f: f64,
    rapid: bool,
}

/// Streaming parser with modal motion, feed and axis state.
#[derive(Debug)]
pub struct GcodeParser {
    motion: Motion,
    units: MeasurementSystem,
    feed: f64,
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
    percents: u8,
    stopped: bool,
    line: usize,
    points: Vec<RawPoint>,
}

impl Default for GcodeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl GcodeParser {
    pub fn new() -> Self {
        Self {
            motion: Motion::Rapid,
            units: MeasurementSystem::Metric,
            feed: 0.0,
            x: None,
            y: None,
            z: None,
            percents: 0,
            stopped: false,
            line: 0,
            points: Vec::new(),
        }
    }

    /// Units selected by the program so far (G20/G21), metric until
    /// stated otherwise.
    pub fn units(&self) -> MeasurementSystem {
        self.units
    }

    /// True once an M2/M30 or a closing percent sign was read.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Feed one source line through the parser. Lines after the program
    /// end are ignored.
    pub fn push_line(&mut self, line: &str) -> SimResult<()> {
        self.line += 1;
        if self.stopped {
            return Ok(());
        }
        let cleaned = strip_comments(line);
        let trimmed = cleaned.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        if trimmed.starts_with('/') {
            // block delete
            return Ok(());
        }
        if trimmed.starts_with('%') {
            self.percents += 1;
            if self.percents >= 2 {
                tracing::debug!(line = self.line, "closing percent, program ends");
                self.stopped = true;
            }
            return Ok(());
        }

        let mut x = None;
        let mut y = None;
        let mut z = None;
        let mut seen_axis = false;
        let mut chars = trimmed.chars().peekable();
        while let Some(c) = chars.next() {
            if c.is_whitespace() {
                continue;
            }
            if !c.is_ascii_alphabetic() {
                return Err(ParseError::UnexpectedChar {
                    line: self.line,
                    found: c,
                });
            }
            let mut num = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() || d == '+' || d == '-' || d == '.' {
                    num.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            let value: f64 = num.parse().map_err(|_| ParseError::MalformedWord {
                line: self.line,
                word: format!("{c}{num}"),
            })?;
            match c.to_ascii_uppercase() {
                'G' => {
                    if value == 0.0 {
                        self.motion = Motion::Rapid;
                    } else if value == 1.0 {
                        self.motion = Motion::Linear;
                    } else if value == 20.0 {
                        self.units = MeasurementSystem::Imperial;
                    } else if value == 21.0 {
                        self.units = MeasurementSystem::Metric;
                    }
                    // arcs, planes and other modal groups carry no
                    // position of their own
                }
                'M' => {
                    if value == 2.0 || value == 30.0 {
                        self.stopped = true;
                        break;
                    }
                }
                'X' => {
                    x = Some(value);
                    seen_axis = true;
                }
                'Y' => {
                    y = Some(value);
                    seen_axis = true;
                }
                'Z' => {
                    z = Some(value);
                    seen_axis = true;
                }
                'F' => self.feed = value,
                _ => {}
            }
        }

        if seen_axis {
            if let Some(v) = x {
                self.x = Some(v);
            }
            if let Some(v) = y {
                self.y = Some(v);
            }
            if let Some(v) = z {
                self.z = Some(v);
            }
            self.points.push(RawPoint {
                x: self.x,
                y: self.y,
                z: self.z,
                f: self.feed,
                rapid: self.motion == Motion::Rapid,
            });
        }
        Ok(())
    }

    /// Resolve the collected points, back-filling axes that appear late.
    pub fn finish(self) -> Vec<SimPoint> {
        let first_x = self.points.iter().find_map(|p| p.x).unwrap_or(0.0);
        let first_y = self.points.iter().find_map(|p| p.y).unwrap_or(0.0);
        let first_z = self.points.iter().find_map(|p| p.z).unwrap_or(0.0);
        self.points
            .into_iter()
            .map(|p| SimPoint {
                x: p.x.unwrap_or(first_x),
                y: p.y.unwrap_or(first_y),
                z: p.z.unwrap_or(first_z),
                f: p.f,
                rapid: p.rapid,
            })
            .collect()
    }
}

/// Parse a complete program into its commanded positions.
pub fn parse_gcode(text: &str) -> SimResult<Vec<SimPoint>> {
    let mut parser = GcodeParser::new();
    for line in text.lines() {
        parser.push_line(line)?;
    }
    Ok(parser.finish())
}

fn strip_comments(line: &str) -> String {
    static COMMENT_REGEX: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    let regex = COMMENT_REGEX.get_or_init(|| Regex::new(r"[;(].*").expect("invalid regex pattern"));
    regex.replace(line, "").to_string()
}

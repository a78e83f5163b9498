//! Engine configuration.
//!
//! Every tunable lives in a plain struct with source-matching defaults.
//! A configuration file is one keyword plist; keys not present keep their
//! defaults and unknown keys are ignored:
//!
//! ```text
//! (:proximity-threshold 1.2
//!  :smoothing 0.5
//!  :shapes ("circle" "square"))
//! ```

use lexpr::Value;
use thiserror::Error;
use tracing::debug;

use crate::consumers::DwellConfig;
use crate::hand::landmarks::HandLandmark;
use crate::sexp::{self, format_plist, get_value, list_items, number, quote};
use crate::trace::cursor::CursorConfig;
use crate::trace::shapes::Shape;
use crate::trace::surface::SurfaceConfig;
use crate::trace::tracer::TraceConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Parse(#[from] lexpr::parse::Error),

    #[error("configuration must be a plist")]
    NotAPlist,

    #[error(":{key} must be {expected}")]
    WrongType { key: String, expected: &'static str },

    #[error(":{key} = {value} is out of range ({range})")]
    OutOfRange {
        key: String,
        value: f64,
        range: &'static str,
    },

    #[error("unknown landmark '{0}'")]
    UnknownLandmark(String),

    #[error("unknown shape '{0}'")]
    UnknownShape(String),
}

/// Everything the engine can be tuned with.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub cursor: CursorConfig,
    pub surface: SurfaceConfig,
    pub trace: TraceConfig,
    pub dwell: DwellConfig,
    /// Shape rotation for the tracing game, by built-in name.
    pub shapes: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cursor: CursorConfig::default(),
            surface: SurfaceConfig::default(),
            trace: TraceConfig::default(),
            dwell: DwellConfig::default(),
            shapes: vec![
                "circle".to_string(),
                "square".to_string(),
                "triangle".to_string(),
            ],
        }
    }
}

const KNOWN_KEYS: &[&str] = &[
    "smoothing",
    "mirror-x",
    "cursor-landmark",
    "surface-height",
    "aspect",
    "proximity-threshold",
    "edge-point-budget",
    "curve-divisions",
    "shape-scale",
    "shape-center",
    "success-delay-ms",
    "count-hold-ms",
    "hover-frames",
    "hover-radius",
    "round-delay-ms",
    "retry-delay-ms",
    "shapes",
];

impl EngineConfig {
    /// Parse a configuration plist on top of the defaults.
    pub fn from_sexp(raw: &str) -> Result<Self, ConfigError> {
        let value = sexp::parse(raw)?;
        Self::from_value(&value)
    }

    pub fn from_value(plist: &Value) -> Result<Self, ConfigError> {
        if !matches!(plist, Value::Cons(_) | Value::Null | Value::Nil) {
            return Err(ConfigError::NotAPlist);
        }
        for key in sexp::keys(plist) {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                debug!("Ignoring unknown config key :{}", key);
            }
        }

        let mut config = Self::default();

        // Cursor
        if let Some(v) = float_in(plist, "smoothing", Range::UnitExclusiveZero)? {
            config.cursor.smoothing = v as f32;
        }
        if let Some(v) = sexp::get_bool(plist, "mirror-x") {
            config.cursor.mirror_x = v;
        }
        if let Some(name) = sexp::get_keyword(plist, "cursor-landmark") {
            config.cursor.landmark = HandLandmark::from_str(&name)
                .ok_or(ConfigError::UnknownLandmark(name))?;
        }

        // Surface
        if let Some(v) = float_in(plist, "surface-height", Range::Positive)? {
            config.surface.height = v as f32;
        }
        if let Some(v) = float_in(plist, "aspect", Range::Positive)? {
            config.surface.aspect = v as f32;
        }

        // Tracing
        if let Some(v) = float_in(plist, "proximity-threshold", Range::Positive)? {
            config.trace.proximity_threshold = v as f32;
        }
        if let Some(v) = count_in(plist, "edge-point-budget", 1)? {
            config.trace.edge_point_budget = v as usize;
        }
        if let Some(v) = count_in(plist, "curve-divisions", 1)? {
            config.trace.curve_divisions = v as usize;
        }
        if let Some(v) = float_in(plist, "shape-scale", Range::Positive)? {
            config.trace.shape_scale = v as f32;
        }
        if let Some(center) = get_value(plist, "shape-center") {
            config.trace.shape_center = point3(center, "shape-center")?;
        }
        if let Some(v) = float_in(plist, "success-delay-ms", Range::NonNegative)? {
            config.trace.success_delay_ms = v;
        }

        // Round games
        if let Some(v) = float_in(plist, "count-hold-ms", Range::NonNegative)? {
            config.dwell.count_hold_ms = v;
        }
        if let Some(v) = count_in(plist, "hover-frames", 0)? {
            config.dwell.hover_frames = v as u32;
        }
        if let Some(v) = float_in(plist, "hover-radius", Range::UnitExclusiveZero)? {
            config.dwell.hover_radius = v as f32;
        }
        if let Some(v) = float_in(plist, "round-delay-ms", Range::NonNegative)? {
            config.dwell.round_delay_ms = v;
        }
        if let Some(v) = float_in(plist, "retry-delay-ms", Range::NonNegative)? {
            config.dwell.retry_delay_ms = v;
        }

        if let Some(list) = get_value(plist, "shapes") {
            config.shapes = shape_names(list)?;
        }

        Ok(config)
    }

    /// The effective configuration as a plist that `from_sexp` reads back.
    pub fn config_sexp(&self) -> String {
        let c = &self.trace.shape_center;
        let shapes: Vec<String> = self.shapes.iter().map(|s| quote(s)).collect();
        format_plist(&[
            ("smoothing", format!("{:?}", self.cursor.smoothing)),
            ("mirror-x", if self.cursor.mirror_x { "t" } else { "nil" }.to_string()),
            ("cursor-landmark", format!(":{}", self.cursor.landmark.as_str())),
            ("surface-height", format!("{:?}", self.surface.height)),
            ("aspect", format!("{:?}", self.surface.aspect)),
            ("proximity-threshold", format!("{:?}", self.trace.proximity_threshold)),
            ("edge-point-budget", self.trace.edge_point_budget.to_string()),
            ("curve-divisions", self.trace.curve_divisions.to_string()),
            ("shape-scale", format!("{:?}", self.trace.shape_scale)),
            ("shape-center", format!("({:?} {:?} {:?})", c[0], c[1], c[2])),
            ("success-delay-ms", format!("{:?}", self.trace.success_delay_ms)),
            ("count-hold-ms", format!("{:?}", self.dwell.count_hold_ms)),
            ("hover-frames", self.dwell.hover_frames.to_string()),
            ("hover-radius", format!("{:?}", self.dwell.hover_radius)),
            ("round-delay-ms", format!("{:?}", self.dwell.round_delay_ms)),
            ("retry-delay-ms", format!("{:?}", self.dwell.retry_delay_ms)),
            ("shapes", format!("({})", shapes.join(" "))),
        ])
    }
}

// ── Value checks ───────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Range {
    Positive,
    NonNegative,
    /// (0, 1]
    UnitExclusiveZero,
}

impl Range {
    fn contains(&self, v: f64) -> bool {
        match self {
            Self::Positive => v > 0.0,
            Self::NonNegative => v >= 0.0,
            Self::UnitExclusiveZero => v > 0.0 && v <= 1.0,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::Positive => "> 0",
            Self::NonNegative => ">= 0",
            Self::UnitExclusiveZero => "0 < x <= 1",
        }
    }
}

fn float_in(plist: &Value, key: &str, range: Range) -> Result<Option<f64>, ConfigError> {
    let Some(value) = get_value(plist, key) else {
        return Ok(None);
    };
    let v = number(value).ok_or_else(|| ConfigError::WrongType {
        key: key.to_string(),
        expected: "a number",
    })?;
    if !v.is_finite() || !range.contains(v) {
        return Err(ConfigError::OutOfRange {
            key: key.to_string(),
            value: v,
            range: range.describe(),
        });
    }
    Ok(Some(v))
}

fn count_in(plist: &Value, key: &str, min: i64) -> Result<Option<i64>, ConfigError> {
    let Some(value) = get_value(plist, key) else {
        return Ok(None);
    };
    let v = match value {
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
    .ok_or_else(|| ConfigError::WrongType {
        key: key.to_string(),
        expected: "an integer",
    })?;
    if v < min || v > i64::from(u32::MAX) {
        return Err(ConfigError::OutOfRange {
            key: key.to_string(),
            value: v as f64,
            range: if min == 0 { ">= 0" } else { ">= 1" },
        });
    }
    Ok(Some(v))
}

fn point3(value: &Value, key: &str) -> Result<[f32; 3], ConfigError> {
    let coords: Vec<f64> = list_items(value).into_iter().filter_map(number).collect();
    match coords.as_slice() {
        [x, y, z] if coords.iter().all(|c| c.is_finite()) => Ok([*x as f32, *y as f32, *z as f32]),
        _ => Err(ConfigError::WrongType {
            key: key.to_string(),
            expected: "a list of three numbers",
        }),
    }
}

fn shape_names(list: &Value) -> Result<Vec<String>, ConfigError> {
    let items = list_items(list);
    if items.is_empty() {
        return Err(ConfigError::WrongType {
            key: "shapes".to_string(),
            expected: "a non-empty list of shape names",
        });
    }
    items
        .into_iter()
        .map(|item| {
            let name = sexp::atom_text(item).ok_or(ConfigError::WrongType {
                key: "shapes".to_string(),
                expected: "a list of shape names",
            })?;
            Shape::builtin(&name).map_err(|_| ConfigError::UnknownShape(name.clone()))?;
            Ok(name)
        })
        .collect()
}

// ── Tests ──────────────────────────────────────────────────

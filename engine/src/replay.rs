//! Recorded and synthetic landmark streams.
//!
//! A recording is one plist per line:
//!
//! ```text
//! (:dt 33 :hand :right :landmarks ((0.51 0.62 0.0) ... 21 points))
//! (:dt 33)
//! ```
//!
//! A line without `:landmarks` is a frame with no hand. Landmark data that
//! is present but unusable (wrong point count, non-numeric coordinates) is
//! also a no-hand frame; only a line that is not a frame record at all is
//! an error. Blank lines and `;` comments are skipped.

use lexpr::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::hand::landmarks::{HandFrame, HandLandmark, Handedness, Landmark, LANDMARK_COUNT};
use crate::sexp::{self, format_plist, get_value, list_items, number};
use crate::trace::shapes::{Shape, ShapeError};
use crate::trace::surface::InteractionSurface;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("line {line}: malformed s-expression: {source}")]
    Parse {
        line: usize,
        #[source]
        source: lexpr::parse::Error,
    },

    #[error("line {line}: frame record must be a plist")]
    NotAPlist { line: usize },

    #[error("line {line}: missing or invalid :{field}")]
    BadField { line: usize, field: &'static str },
}

/// One camera frame with the time elapsed since the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayFrame {
    pub dt_ms: f64,
    pub frame: HandFrame,
}

// ── Parsing ────────────────────────────────────────────────

/// Parse a whole recording.
pub fn parse_frames(text: &str) -> Result<Vec<ReplayFrame>, ReplayError> {
    let mut frames = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') {
            continue;
        }
        frames.push(parse_frame(trimmed, i + 1)?);
    }
    debug!("Parsed {} replay frame(s)", frames.len());
    Ok(frames)
}

/// Parse one frame record. `line` is only used in errors.
pub fn parse_frame(raw: &str, line: usize) -> Result<ReplayFrame, ReplayError> {
    let value = sexp::parse(raw).map_err(|source| ReplayError::Parse { line, source })?;
    if !matches!(value, Value::Cons(_)) {
        return Err(ReplayError::NotAPlist { line });
    }

    let dt_ms = sexp::get_float(&value, "dt")
        .filter(|dt| dt.is_finite() && *dt >= 0.0)
        .ok_or(ReplayError::BadField { line, field: "dt" })?;

    let Some(points) = get_value(&value, "landmarks") else {
        return Ok(ReplayFrame {
            dt_ms,
            frame: HandFrame::NoHand,
        });
    };

    let handedness = match sexp::get_keyword(&value, "hand") {
        None => Handedness::Right,
        Some(name) => Handedness::from_str(&name)
            .ok_or(ReplayError::BadField { line, field: "hand" })?,
    };

    let landmarks = landmark_list(points);
    if landmarks.is_none() {
        warn!("line {}: unusable landmark data, treating as no hand", line);
    }
    Ok(ReplayFrame {
        dt_ms,
        frame: HandFrame::from_detector(landmarks.as_deref(), handedness),
    })
}

/// `((x y z) ...)` to points; `None` if any point is not 2 or 3 numbers.
fn landmark_list(value: &Value) -> Option<Vec<Landmark>> {
    list_items(value)
        .into_iter()
        .map(|point| {
            let coords: Vec<f64> = list_items(point).into_iter().filter_map(number).collect();
            match coords.as_slice() {
                [x, y] => Some(Landmark::new(*x as f32, *y as f32, 0.0)),
                [x, y, z] => Some(Landmark::new(*x as f32, *y as f32, *z as f32)),
                _ => None,
            }
        })
        .collect()
}

/// Render a frame as a recording line that `parse_frame` reads back.
pub fn format_frame(frame: &ReplayFrame) -> String {
    let mut fields = vec![("dt", format!("{:?}", frame.dt_ms))];
    if let HandFrame::Hand(pose) = &frame.frame {
        let points: Vec<String> = pose
            .landmarks()
            .iter()
            .map(|lm| format!("({:?} {:?} {:?})", lm.x, lm.y, lm.z))
            .collect();
        fields.push(("hand", format!(":{}", pose.handedness().as_str())));
        fields.push(("landmarks", format!("({})", points.join(" "))));
    }
    format_plist(&fields)
}

// ── Synthetic streams ──────────────────────────────────────

/// Frames spent on a stroke's start and end points.
const SETTLE_FRAMES: usize = 12;

/// Upright right hand pointing with the index finger, tip at `tip` in image
/// coordinates. Non-finite input gives the no-hand frame.
pub fn pointing_frame(tip: [f32; 2]) -> HandFrame {
    let [x, y] = tip;
    let mut points = vec![Landmark::new(x, y + 0.25, 0.0); LANDMARK_COUNT];
    let mut set = |lm: HandLandmark, dx: f32, dy: f32| {
        points[lm.index()] = Landmark::new(x + dx, y + dy, 0.0);
    };
    set(HandLandmark::IndexTip, 0.0, 0.0);
    set(HandLandmark::IndexDip, 0.0, 0.03);
    set(HandLandmark::IndexPip, 0.0, 0.07);
    set(HandLandmark::IndexMcp, 0.0, 0.12);
    for (tip_lm, pip_lm, dx) in [
        (HandLandmark::MiddleTip, HandLandmark::MiddlePip, 0.03),
        (HandLandmark::RingTip, HandLandmark::RingPip, 0.06),
        (HandLandmark::PinkyTip, HandLandmark::PinkyPip, 0.09),
    ] {
        set(pip_lm, dx, 0.12);
        set(tip_lm, dx, 0.16);
    }
    // Thumb folded across the palm: tip inward of the IP joint.
    set(HandLandmark::ThumbIp, -0.04, 0.15);
    set(HandLandmark::ThumbTip, -0.01, 0.15);
    HandFrame::from_detector(Some(points.as_slice()), Handedness::Right)
}

/// Frames that trace every configured shape once, in rotation order.
///
/// The hand settles on each stroke's start, visits every waypoint for
/// `frames_per_waypoint` frames and lingers on the last one. It is then
/// withdrawn for the success delay.
pub fn synthesize_trace(
    config: &EngineConfig,
    dt_ms: f64,
    frames_per_waypoint: usize,
) -> Result<Vec<ReplayFrame>, ShapeError> {
    let surface = InteractionSurface::new(&config.surface);
    let path_config = config.trace.path_config();
    let hand_at = |p: [f32; 3]| {
        let normalized = surface.to_normalized([p[0], p[1]]);
        let raw = config.cursor.unproject(normalized);
        ReplayFrame {
            dt_ms,
            frame: pointing_frame(raw),
        }
    };
    let no_hand = || ReplayFrame {
        dt_ms,
        frame: HandFrame::NoHand,
    };
    let rest_frames = (config.trace.success_delay_ms / dt_ms.max(1.0)).ceil() as usize + 2;

    let mut frames = Vec::new();
    for name in &config.shapes {
        let path = Shape::builtin(name)?.target_path(&path_config)?;
        for stroke in &path.strokes {
            frames.extend(std::iter::repeat_with(|| hand_at(stroke.origin)).take(SETTLE_FRAMES));
            for wp in &stroke.waypoints {
                frames.extend(
                    std::iter::repeat_with(|| hand_at(*wp)).take(frames_per_waypoint.max(1)),
                );
            }
            if let Some(last) = stroke.waypoints.last() {
                frames.extend(std::iter::repeat_with(|| hand_at(*last)).take(SETTLE_FRAMES));
            }
        }
        frames.extend(std::iter::repeat_with(no_hand).take(rest_frames));
    }
    debug!("Synthesized {} frame(s) for {} shape(s)", frames.len(), config.shapes.len());
    Ok(frames)
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::classifier::{classify, GestureLabel};
    use crate::playback::RecordingPlayback;
    use crate::trace::session::ShapeSession;

    fn landmark_text(n: usize) -> String {
        let points: Vec<String> = (0..n).map(|i| format!("(0.{} 0.5 0)", i % 10)).collect();
        format!("({})", points.join(" "))
    }

    #[test]
    fn test_parse_no_hand_frame() {
        let frame = parse_frame("(:dt 33)", 1).unwrap();
        assert_eq!(frame.dt_ms, 33.0);
        assert_eq!(frame.frame, HandFrame::NoHand);
    }

    #[test]
    fn test_parse_hand_frame() {
        let raw = format!("(:dt 16.5 :hand :left :landmarks {})", landmark_text(21));
        let frame = parse_frame(&raw, 1).unwrap();
        assert_eq!(frame.dt_ms, 16.5);
        let pose = frame.frame.pose().unwrap();
        assert_eq!(pose.handedness(), Handedness::Left);
        assert!((pose.get(HandLandmark::ThumbCmc).x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_wrong_point_count_is_no_hand() {
        let raw = format!("(:dt 33 :hand :right :landmarks {})", landmark_text(20));
        assert_eq!(parse_frame(&raw, 1).unwrap().frame, HandFrame::NoHand);
        let raw = "(:dt 33 :landmarks ((0.1 :x 0)))";
        assert_eq!(parse_frame(raw, 1).unwrap().frame, HandFrame::NoHand);
    }

    #[test]
    fn test_bad_records_are_errors() {
        assert!(matches!(
            parse_frame("(:dt 33", 4),
            Err(ReplayError::Parse { line: 4, .. })
        ));
        assert!(matches!(
            parse_frame("17", 2),
            Err(ReplayError::NotAPlist { line: 2 })
        ));
        assert!(matches!(
            parse_frame("(:hand :right)", 3),
            Err(ReplayError::BadField { line: 3, field: "dt" })
        ));
        assert!(matches!(
            parse_frame("(:dt -1)", 5),
            Err(ReplayError::BadField { field: "dt", .. })
        ));
        let raw = format!("(:dt 33 :hand :middle :landmarks {})", landmark_text(21));
        assert!(matches!(
            parse_frame(&raw, 6),
            Err(ReplayError::BadField { field: "hand", .. })
        ));
    }

    #[test]
    fn test_parse_frames_skips_comments() {
        let text = "; recorded session\n\n(:dt 33)\n  (:dt 34)  \n";
        let frames = parse_frames(text).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].dt_ms, 34.0);
    }

    #[test]
    fn test_format_frame_reads_back() {
        let frame = ReplayFrame {
            dt_ms: 33.0,
            frame: pointing_frame([0.4, 0.3]),
        };
        let line = format_frame(&frame);
        assert_eq!(parse_frame(&line, 1).unwrap(), frame);

        let empty = ReplayFrame {
            dt_ms: 20.0,
            frame: HandFrame::NoHand,
        };
        assert_eq!(format_frame(&empty), "(:dt 20.0)");
    }

    #[test]
    fn test_pointing_pose_classifies_as_pointing() {
        let event = classify(&pointing_frame([0.5, 0.4]));
        assert_eq!(event.label, GestureLabel::Pointing);
        assert_eq!(event.extended_count, 1);
        assert_eq!(pointing_frame([f32::NAN, 0.4]), HandFrame::NoHand);
    }

    #[test]
    fn test_synthetic_trace_completes_every_shape() {
        let config = EngineConfig::default();
        let frames = synthesize_trace(&config, 33.0, 2).unwrap();
        let mut session = ShapeSession::new(&config, RecordingPlayback::new()).unwrap();
        session.start();
        for f in &frames {
            session.advance(f.dt_ms);
            session.handle(&classify(&f.frame));
        }
        assert_eq!(session.snapshot().completed_shapes, 3);
        // Rotation wrapped back to the first shape
        assert_eq!(session.snapshot().shape_name, "circle");
    }

    #[test]
    fn test_synthetic_unknown_shape_fails() {
        let config = EngineConfig {
            shapes: vec!["star".to_string()],
            ..EngineConfig::default()
        };
        assert!(synthesize_trace(&config, 33.0, 1).is_err());
    }
}

//! Gesture classification from a single frame of hand landmarks.
//!
//! Derives per-finger extension from tip/joint geometry, counts extended
//! fingers and maps the pattern to one discrete label. Every frame is
//! classified independently; hold-to-confirm debouncing belongs to the
//! consumers (see `dwell`).
//!
//! Extension tests assume an upright hand facing the camera. Tilted or
//! rotated hands are not corrected for.

use std::fmt;

use super::landmarks::{HandFrame, HandLandmark, HandPose, Handedness};

// ── Gesture labels ─────────────────────────────────────────

/// Recognized gesture labels. Exactly one per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureLabel {
    /// No finger extended.
    Fist,
    /// All five fingers extended.
    Open,
    /// Only the index finger extended.
    Pointing,
    /// Generic fallback for 2, 3 or 4 extended fingers.
    Count(u8),
    /// Thumb tip above its joint with index and middle curled.
    ThumbsUp,
    /// Thumb tip below its joint with index curled.
    ThumbsDown,
    /// No confident signature. Never actionable.
    Unknown,
}

impl GestureLabel {
    /// Whether a consumer should react to this label at all.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Parse the wire name (`fist`, `count_3`, `thumbs_up`, ...).
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "fist" => Some(Self::Fist),
            "open" => Some(Self::Open),
            "pointing" => Some(Self::Pointing),
            "thumbs_up" => Some(Self::ThumbsUp),
            "thumbs_down" => Some(Self::ThumbsDown),
            "unknown" => Some(Self::Unknown),
            other => {
                let n: u8 = other.strip_prefix("count_")?.parse().ok()?;
                (2..=4).contains(&n).then_some(Self::Count(n))
            }
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fist => f.write_str("fist"),
            Self::Open => f.write_str("open"),
            Self::Pointing => f.write_str("pointing"),
            Self::Count(n) => write!(f, "count_{}", n),
            Self::ThumbsUp => f.write_str("thumbs_up"),
            Self::ThumbsDown => f.write_str("thumbs_down"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

// ── Events ─────────────────────────────────────────────────

/// One frame's classification, broadcast to the active consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureEvent {
    pub label: GestureLabel,
    /// Number of extended fingers, 0-5.
    pub extended_count: u8,
    /// The landmarks the label was derived from, absent when no hand.
    pub pose: Option<HandPose>,
}

impl GestureEvent {
    /// The event delivered for frames without a hand.
    pub fn no_hand() -> Self {
        Self {
            label: GestureLabel::Unknown,
            extended_count: 0,
            pose: None,
        }
    }

    pub fn has_hand(&self) -> bool {
        self.pose.is_some()
    }
}

// ── Finger extension ───────────────────────────────────────

/// Per-finger extension verdicts for one pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerState {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerState {
    /// Evaluate all five extension tests.
    pub fn from_pose(pose: &HandPose) -> Self {
        let [index, middle, ring, pinky] =
            HandLandmark::finger_tips_and_pips().map(|(tip, pip)| finger_extended(pose, tip, pip));
        Self {
            thumb: thumb_extended(pose),
            index,
            middle,
            ring,
            pinky,
        }
    }

    pub fn extended_count(&self) -> u8 {
        [self.thumb, self.index, self.middle, self.ring, self.pinky]
            .iter()
            .filter(|e| **e)
            .count() as u8
    }
}

/// A non-thumb finger is extended when its tip is above (smaller y than)
/// its proximal joint.
fn finger_extended(pose: &HandPose, tip: HandLandmark, pip: HandLandmark) -> bool {
    pose.get(tip).y < pose.get(pip).y
}

fn finger_curled(pose: &HandPose, tip: HandLandmark, pip: HandLandmark) -> bool {
    pose.get(tip).y > pose.get(pip).y
}

/// The thumb is extended when its tip lies outward of the IP joint.
/// With the palm facing the camera a right thumb points towards the
/// image's left edge and a left thumb towards the right edge.
fn thumb_extended(pose: &HandPose) -> bool {
    let tip = pose.get(HandLandmark::ThumbTip);
    let ip = pose.get(HandLandmark::ThumbIp);
    match pose.handedness() {
        Handedness::Right => tip.x < ip.x,
        Handedness::Left => tip.x > ip.x,
    }
}

fn is_thumbs_up(pose: &HandPose) -> bool {
    pose.get(HandLandmark::ThumbTip).y < pose.get(HandLandmark::ThumbIp).y
        && finger_curled(pose, HandLandmark::IndexTip, HandLandmark::IndexPip)
        && finger_curled(pose, HandLandmark::MiddleTip, HandLandmark::MiddlePip)
}

fn is_thumbs_down(pose: &HandPose) -> bool {
    pose.get(HandLandmark::ThumbTip).y > pose.get(HandLandmark::ThumbIp).y
        && finger_curled(pose, HandLandmark::IndexTip, HandLandmark::IndexPip)
}

// ── Classification ─────────────────────────────────────────

/// Derive the label for one pose.
///
/// The thumb signatures are checked first: a vertical thumb reads as
/// curled under the horizontal thumb test, so a thumbs-up often counts 0.
/// Open never clashes with them since both need the index curled.
pub fn classify_pose(pose: &HandPose) -> (GestureLabel, FingerState) {
    let fingers = FingerState::from_pose(pose);
    let count = fingers.extended_count();

    let label = if is_thumbs_up(pose) {
        GestureLabel::ThumbsUp
    } else if is_thumbs_down(pose) {
        GestureLabel::ThumbsDown
    } else if count == 0 {
        GestureLabel::Fist
    } else if count == 5 {
        GestureLabel::Open
    } else if count == 1 && fingers.index {
        GestureLabel::Pointing
    } else if (2..=4).contains(&count) {
        GestureLabel::Count(count)
    } else {
        GestureLabel::Unknown
    };

    (label, fingers)
}

/// Classify one frame into exactly one event.
pub fn classify(frame: &HandFrame) -> GestureEvent {
    match frame {
        HandFrame::NoHand => GestureEvent::no_hand(),
        HandFrame::Hand(pose) => {
            let (label, fingers) = classify_pose(pose);
            GestureEvent {
                label,
                extended_count: fingers.extended_count(),
                pose: Some(pose.clone()),
            }
        }
    }
}

// ── Test helpers ───────────────────────────────────────────

/// Build an upright pose. `thumb_out` places the thumb tip outward of its
/// IP joint for the given hand, `thumb_dy` offsets the tip vertically
/// (negative is up), `fingers` extends index..pinky.
#[cfg(test)]
pub(crate) fn make_pose(
    handedness: Handedness,
    thumb_out: bool,
    thumb_dy: f32,
    fingers: [bool; 4],
) -> HandPose {
    use super::landmarks::{Landmark, LANDMARK_COUNT};

    let mut points = vec![Landmark::new(0.5, 0.6, 0.0); LANDMARK_COUNT];
    let outward = match handedness {
        Handedness::Right => -0.05,
        Handedness::Left => 0.05,
    };
    points[HandLandmark::ThumbIp.index()] = Landmark::new(0.5, 0.5, 0.0);
    points[HandLandmark::ThumbTip.index()] = Landmark::new(
        if thumb_out { 0.5 + outward } else { 0.5 - outward },
        0.5 + thumb_dy,
        0.0,
    );
    for (extended, (tip, pip)) in fingers.iter().zip(HandLandmark::finger_tips_and_pips()) {
        points[pip.index()] = Landmark::new(0.5, 0.5, 0.0);
        points[tip.index()] = Landmark::new(0.5, if *extended { 0.3 } else { 0.6 }, 0.0);
    }
    HandPose::from_points(&points, handedness).unwrap()
}

// ── Tests ──────────────────────────────────────────────────

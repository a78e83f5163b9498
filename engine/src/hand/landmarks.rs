//! Hand landmark data structures.
//!
//! Models the 21-point hand skeleton produced by an external landmark
//! detector. Coordinates are normalized image space: x and y in [0, 1]
//! with y growing downwards, z is depth relative to the wrist.

use tracing::debug;

// ── Landmark definitions ───────────────────────────────────

/// The 21 hand landmarks, in detector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Total number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

impl HandLandmark {
    /// Convert landmark enum to array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// String representation for config files and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb-cmc",
            Self::ThumbMcp => "thumb-mcp",
            Self::ThumbIp => "thumb-ip",
            Self::ThumbTip => "thumb-tip",
            Self::IndexMcp => "index-mcp",
            Self::IndexPip => "index-pip",
            Self::IndexDip => "index-dip",
            Self::IndexTip => "index-tip",
            Self::MiddleMcp => "middle-mcp",
            Self::MiddlePip => "middle-pip",
            Self::MiddleDip => "middle-dip",
            Self::MiddleTip => "middle-tip",
            Self::RingMcp => "ring-mcp",
            Self::RingPip => "ring-pip",
            Self::RingDip => "ring-dip",
            Self::RingTip => "ring-tip",
            Self::PinkyMcp => "pinky-mcp",
            Self::PinkyPip => "pinky-pip",
            Self::PinkyDip => "pinky-dip",
            Self::PinkyTip => "pinky-tip",
        }
    }

    /// Parse a landmark from its string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::all().into_iter().find(|l| l.as_str() == s)
    }

    /// Every landmark in index order.
    pub fn all() -> [HandLandmark; LANDMARK_COUNT] {
        [
            Self::Wrist,
            Self::ThumbCmc,
            Self::ThumbMcp,
            Self::ThumbIp,
            Self::ThumbTip,
            Self::IndexMcp,
            Self::IndexPip,
            Self::IndexDip,
            Self::IndexTip,
            Self::MiddleMcp,
            Self::MiddlePip,
            Self::MiddleDip,
            Self::MiddleTip,
            Self::RingMcp,
            Self::RingPip,
            Self::RingDip,
            Self::RingTip,
            Self::PinkyMcp,
            Self::PinkyPip,
            Self::PinkyDip,
            Self::PinkyTip,
        ]
    }

    /// (tip, proximal joint) pairs for the four non-thumb fingers,
    /// index finger first.
    pub fn finger_tips_and_pips() -> [(HandLandmark, HandLandmark); 4] {
        [
            (Self::IndexTip, Self::IndexPip),
            (Self::MiddleTip, Self::MiddlePip),
            (Self::RingTip, Self::RingPip),
            (Self::PinkyTip, Self::PinkyPip),
        ]
    }
}

// ── Handedness ─────────────────────────────────────────────

/// Which hand the detector reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parse a handedness label. Accepts the detector's capitalized
    /// labels as well as lowercase.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "left" | "Left" => Some(Self::Left),
            "right" | "Right" => Some(Self::Right),
            _ => None,
        }
    }

    /// The other hand.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

// ── Landmark ───────────────────────────────────────────────

/// One tracked point on the hand skeleton.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// The same point reflected across the vertical image axis.
    pub fn mirrored(&self) -> Self {
        Self {
            x: 1.0 - self.x,
            y: self.y,
            z: self.z,
        }
    }
}

// ── Hand pose ──────────────────────────────────────────────

/// A complete 21-point skeleton for one hand in one frame.
///
/// Only constructible from well-formed detector output, so every
/// `HandPose` in the pipeline has exactly `LANDMARK_COUNT` finite points.
#[derive(Debug, Clone, PartialEq)]
pub struct HandPose {
    landmarks: [Landmark; LANDMARK_COUNT],
    handedness: Handedness,
}

impl HandPose {
    /// Build a pose from raw detector output.
    ///
    /// Returns `None` for anything other than 21 finite points; callers
    /// treat that as the "no hand" frame rather than an error.
    pub fn from_points(points: &[Landmark], handedness: Handedness) -> Option<Self> {
        if points.len() != LANDMARK_COUNT {
            debug!(
                "Hand pose: expected {} landmarks, got {}",
                LANDMARK_COUNT,
                points.len(),
            );
            return None;
        }
        if !points.iter().all(Landmark::is_finite) {
            debug!("Hand pose: non-finite landmark coordinate");
            return None;
        }
        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        landmarks.copy_from_slice(points);
        Some(Self {
            landmarks,
            handedness,
        })
    }

    /// Build a pose from flat `[x0, y0, z0, x1, ...]` data.
    pub fn from_flat(flat: &[f32], handedness: Handedness) -> Option<Self> {
        if flat.len() != LANDMARK_COUNT * 3 {
            return None;
        }
        let points: Vec<Landmark> = flat
            .chunks_exact(3)
            .map(|c| Landmark::new(c[0], c[1], c[2]))
            .collect();
        Self::from_points(&points, handedness)
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    /// Position of a single landmark.
    pub fn get(&self, landmark: HandLandmark) -> Landmark {
        self.landmarks[landmark.index()]
    }

    /// The pose reflected across the vertical axis, with handedness swapped.
    /// A left hand seen in a mirror looks like a right hand.
    pub fn mirrored(&self) -> Self {
        let mut landmarks = self.landmarks;
        for lm in &mut landmarks {
            *lm = lm.mirrored();
        }
        Self {
            landmarks,
            handedness: self.handedness.opposite(),
        }
    }
}

// ── Frames ─────────────────────────────────────────────────

/// What the landmark source delivers once per camera frame.
#[derive(Debug, Clone, PartialEq)]
pub enum HandFrame {
    /// No hand detected (or detector output was malformed).
    NoHand,
    /// A single tracked hand.
    Hand(HandPose),
}

impl HandFrame {
    /// Interpret raw detector output; malformed data becomes `NoHand`.
    pub fn from_detector(points: Option<&[Landmark]>, handedness: Handedness) -> Self {
        match points.and_then(|p| HandPose::from_points(p, handedness)) {
            Some(pose) => Self::Hand(pose),
            None => Self::NoHand,
        }
    }

    pub fn pose(&self) -> Option<&HandPose> {
        match self {
            Self::NoHand => None,
            Self::Hand(pose) => Some(pose),
        }
    }
}

/// Create a pose with every landmark at the image centre.
#[cfg(test)]
pub(crate) fn test_points_default() -> Vec<Landmark> {
    vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT]
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_count() {
        assert_eq!(HandLandmark::Wrist.index(), 0);
        assert_eq!(HandLandmark::ThumbTip.index(), 4);
        assert_eq!(HandLandmark::IndexTip.index(), 8);
        assert_eq!(HandLandmark::PinkyTip.index(), 20);
        assert_eq!(LANDMARK_COUNT, 21);
    }

    #[test]
    fn test_all_in_index_order() {
        for (i, lm) in HandLandmark::all().iter().enumerate() {
            assert_eq!(lm.index(), i);
        }
    }

    #[test]
    fn test_landmark_as_str_roundtrip() {
        for lm in HandLandmark::all() {
            assert_eq!(HandLandmark::from_str(lm.as_str()), Some(lm));
        }
        assert_eq!(HandLandmark::from_str("elbow"), None);
    }

    #[test]
    fn test_pose_from_points_valid() {
        let points = test_points_default();
        let pose = HandPose::from_points(&points, Handedness::Right).unwrap();
        assert_eq!(pose.handedness(), Handedness::Right);
        assert_eq!(pose.get(HandLandmark::IndexTip), Landmark::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_pose_wrong_count_is_none() {
        let points = vec![Landmark::default(); 10];
        assert!(HandPose::from_points(&points, Handedness::Left).is_none());
        assert!(HandPose::from_points(&[], Handedness::Left).is_none());
    }

    #[test]
    fn test_pose_non_finite_is_none() {
        let mut points = test_points_default();
        points[HandLandmark::MiddleTip.index()].y = f32::NAN;
        assert!(HandPose::from_points(&points, Handedness::Left).is_none());
    }

    #[test]
    fn test_pose_from_flat() {
        let flat: Vec<f32> = (0..LANDMARK_COUNT)
            .flat_map(|i| [i as f32 * 0.01, 0.5, 0.0])
            .collect();
        let pose = HandPose::from_flat(&flat, Handedness::Left).unwrap();
        assert!((pose.get(HandLandmark::PinkyTip).x - 0.2).abs() < 0.0001);
        assert!(HandPose::from_flat(&flat[..30], Handedness::Left).is_none());
    }

    #[test]
    fn test_mirrored_swaps_handedness() {
        let mut points = test_points_default();
        points[HandLandmark::ThumbTip.index()] = Landmark::new(0.2, 0.4, 0.1);
        let pose = HandPose::from_points(&points, Handedness::Right).unwrap();
        let mirror = pose.mirrored();
        assert_eq!(mirror.handedness(), Handedness::Left);
        let tip = mirror.get(HandLandmark::ThumbTip);
        assert!((tip.x - 0.8).abs() < 0.0001);
        assert!((tip.y - 0.4).abs() < 0.0001);
    }

    #[test]
    fn test_frame_from_detector() {
        let points = test_points_default();
        let frame = HandFrame::from_detector(Some(points.as_slice()), Handedness::Right);
        assert!(frame.pose().is_some());

        let frame = HandFrame::from_detector(Some(&points[..5]), Handedness::Right);
        assert_eq!(frame, HandFrame::NoHand);

        let frame = HandFrame::from_detector(None, Handedness::Right);
        assert!(frame.pose().is_none());
    }

    #[test]
    fn test_handedness_labels() {
        assert_eq!(Handedness::from_str("Right"), Some(Handedness::Right));
        assert_eq!(Handedness::from_str("left"), Some(Handedness::Left));
        assert_eq!(Handedness::from_str("both"), None);
        assert_eq!(Handedness::Left.as_str(), "left");
        assert_eq!(Handedness::Right.opposite(), Handedness::Left);
    }
}

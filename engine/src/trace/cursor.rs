//! Fingertip cursor projection with exponential smoothing.

use tracing::debug;

use crate::hand::landmarks::{HandLandmark, HandPose};

/// Configuration for the cursor projector.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorConfig {
    /// Fraction of the gap to the latest sample closed each frame
    /// (1.0 = snap, smaller = smoother).
    pub smoothing: f32,
    /// Mirror x so the cursor moves like the mirrored camera preview.
    pub mirror_x: bool,
    /// Landmark driving the cursor.
    pub landmark: HandLandmark,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.4,
            mirror_x: true,
            landmark: HandLandmark::IndexTip,
        }
    }
}

impl CursorConfig {
    /// Map a landmark's image position into normalized cursor space.
    pub fn project(&self, x: f32, y: f32) -> [f32; 2] {
        let x = if self.mirror_x { 1.0 - x } else { x };
        [x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)]
    }

    /// Image position a landmark must have to project onto `normalized`.
    pub fn unproject(&self, normalized: [f32; 2]) -> [f32; 2] {
        let x = if self.mirror_x {
            1.0 - normalized[0]
        } else {
            normalized[0]
        };
        [x, normalized[1]]
    }
}

/// Cursor state as seen by a render loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorSample {
    /// Normalized position in [0, 1] x [0, 1], y down.
    pub position: [f32; 2],
    /// False while no hand is tracked; position is then the last one held.
    pub active: bool,
}

/// Tracks one landmark as a smoothed, mirrored 2D cursor.
#[derive(Debug, Clone)]
pub struct CursorProjector {
    pub config: CursorConfig,
    position: [f32; 2],
    active: bool,
}

impl CursorProjector {
    /// The cursor starts at the centre of the surface.
    pub fn new(config: CursorConfig) -> Self {
        Self {
            config,
            position: [0.5, 0.5],
            active: false,
        }
    }

    /// Step towards the latest sample. Without a hand the position is held
    /// and the sample reports inactive.
    pub fn update(&mut self, pose: Option<&HandPose>) -> CursorSample {
        match pose {
            Some(pose) => {
                let lm = pose.get(self.config.landmark);
                let target = self.config.project(lm.x, lm.y);
                let t = self.config.smoothing.clamp(0.0, 1.0);
                self.position = [
                    lerp(self.position[0], target[0], t),
                    lerp(self.position[1], target[1], t),
                ];
                if !self.active {
                    debug!("Cursor acquired at ({:.3}, {:.3})", target[0], target[1]);
                }
                self.active = true;
            }
            None => {
                if self.active {
                    debug!("Cursor lost, holding ({:.3}, {:.3})", self.position[0], self.position[1]);
                }
                self.active = false;
            }
        }
        self.sample()
    }

    pub fn sample(&self) -> CursorSample {
        CursorSample {
            position: self.position,
            active: self.active,
        }
    }

    pub fn position(&self) -> [f32; 2] {
        self.position
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Back to the centre, inactive.
    pub fn reset(&mut self) {
        self.position = [0.5, 0.5];
        self.active = false;
    }
}

/// Linear interpolation helper.
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Pose with every landmark at `(x, y)`.
#[cfg(test)]
fn pose_at(x: f32, y: f32) -> HandPose {
    use crate::hand::landmarks::{Handedness, Landmark, LANDMARK_COUNT};
    let points = vec![Landmark::new(x, y, 0.0); LANDMARK_COUNT];
    HandPose::from_points(&points, Handedness::Right).unwrap()
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_centred_and_inactive() {
        let cursor = CursorProjector::new(CursorConfig::default());
        assert_eq!(cursor.position(), [0.5, 0.5]);
        assert!(!cursor.is_active());
    }

    #[test]
    fn test_mirroring() {
        let mut cursor = CursorProjector::new(CursorConfig {
            smoothing: 1.0,
            ..CursorConfig::default()
        });
        let sample = cursor.update(Some(&pose_at(0.2, 0.3)));
        assert!(sample.active);
        assert!((sample.position[0] - 0.8).abs() < 1e-6);
        assert!((sample.position[1] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_no_mirroring() {
        let config = CursorConfig {
            smoothing: 1.0,
            mirror_x: false,
            ..CursorConfig::default()
        };
        let mut cursor = CursorProjector::new(config);
        let sample = cursor.update(Some(&pose_at(0.2, 0.3)));
        assert!((sample.position[0] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_smoothing_step() {
        let mut cursor = CursorProjector::new(CursorConfig::default());
        // Mirrored target x = 1.0, from 0.5 with factor 0.4 -> 0.7
        let sample = cursor.update(Some(&pose_at(0.0, 0.5)));
        assert!(
            (sample.position[0] - 0.7).abs() < 1e-6,
            "Expected ~0.7, got {}",
            sample.position[0]
        );
        // Second step: 0.7 + 0.3 * 0.4 = 0.82
        let sample = cursor.update(Some(&pose_at(0.0, 0.5)));
        assert!((sample.position[0] - 0.82).abs() < 1e-5);
    }

    #[test]
    fn test_converges() {
        let mut cursor = CursorProjector::new(CursorConfig::default());
        for _ in 0..40 {
            cursor.update(Some(&pose_at(0.9, 0.1)));
        }
        let p = cursor.position();
        assert!((p[0] - 0.1).abs() < 1e-4);
        assert!((p[1] - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_no_hand_holds_position() {
        let mut cursor = CursorProjector::new(CursorConfig {
            smoothing: 1.0,
            ..CursorConfig::default()
        });
        cursor.update(Some(&pose_at(0.3, 0.6)));
        let held = cursor.position();
        for _ in 0..5 {
            let sample = cursor.update(None);
            assert!(!sample.active);
            assert_eq!(sample.position, held);
        }
    }

    #[test]
    fn test_clamps_out_of_frame() {
        let mut cursor = CursorProjector::new(CursorConfig {
            smoothing: 1.0,
            ..CursorConfig::default()
        });
        let sample = cursor.update(Some(&pose_at(-0.2, 1.3)));
        assert_eq!(sample.position, [1.0, 1.0]);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let config = CursorConfig::default();
        let raw = config.unproject([0.25, 0.75]);
        let back = config.project(raw[0], raw[1]);
        assert!((back[0] - 0.25).abs() < 1e-6);
        assert!((back[1] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_reset() {
        let mut cursor = CursorProjector::new(CursorConfig::default());
        cursor.update(Some(&pose_at(0.1, 0.1)));
        cursor.reset();
        assert_eq!(cursor.position(), [0.5, 0.5]);
        assert!(!cursor.is_active());
    }
}

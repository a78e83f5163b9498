//! Hand input: landmark types, per-frame gesture classification, the
//! single-consumer gesture channel and consumer-side dwell trackers.

pub mod channel;
pub mod classifier;
pub mod dwell;
pub mod landmarks;

pub use channel::{GestureConsumer, GesturePipeline};
pub use classifier::{classify, classify_pose, FingerState, GestureEvent, GestureLabel};
pub use dwell::{HoldToConfirm, HoverDwell, HoverTarget};
pub use landmarks::{HandFrame, HandLandmark, HandPose, Handedness, Landmark, LANDMARK_COUNT};

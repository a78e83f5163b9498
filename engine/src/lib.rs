//! Fingerplay engine: touch-free kids' games driven by hand landmarks.
//!
//! A landmark source delivers one hand pose (or none) per camera frame.
//! The classifier turns it into a gesture event, the pipeline hands that
//! to the one active game, and games answer through a fire-and-forget
//! playback channel. Everything runs on the caller's thread, one frame at
//! a time; timed transitions are driven by frame time.

pub mod config;
pub mod consumers;
pub mod hand;
pub mod playback;
pub mod replay;
pub mod scheduler;
pub mod sexp;
pub mod trace;

pub use config::{ConfigError, EngineConfig};

//! Fire-and-forget audio/speech requests.
//!
//! The pipeline hands requests to a sink and moves on. `play` returns
//! nothing, so a failing or slow sink can never feed back into gesture
//! or trace state.

use tracing::info;

/// Oscillator shape for synthesized tones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

impl Waveform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sine => "sine",
            Self::Triangle => "triangle",
        }
    }
}

/// One playback request.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackRequest {
    /// Short synthesized tone.
    Tone {
        frequency_hz: f32,
        duration_ms: u32,
        waveform: Waveform,
    },
    /// Speak a specific phrase.
    Phrase(String),
    /// Speak a praise phrase of the sink's choosing.
    Positive,
    /// Speak a try-again phrase of the sink's choosing.
    Encouragement,
}

impl PlaybackRequest {
    pub fn tone(frequency_hz: f32, duration_ms: u32, waveform: Waveform) -> Self {
        Self::Tone {
            frequency_hz,
            duration_ms,
            waveform,
        }
    }

    pub fn phrase(text: impl Into<String>) -> Self {
        Self::Phrase(text.into())
    }
}

/// Receiver of playback requests.
pub trait PlaybackSink {
    fn play(&mut self, request: PlaybackRequest);
}

impl<S: PlaybackSink + ?Sized> PlaybackSink for Box<S> {
    fn play(&mut self, request: PlaybackRequest) {
        (**self).play(request);
    }
}

const POSITIVE_PHRASES: [&str; 6] = [
    "Great job!",
    "You did it!",
    "Amazing!",
    "Super cool!",
    "That is correct!",
    "Wow, you are smart!",
];

const ENCOURAGEMENT_PHRASES: [&str; 3] = [
    "Nice try, let's try again!",
    "Almost there!",
    "Give it another go!",
];

/// Logs every request through `tracing`. Rotates through the stock
/// phrase lists for `Positive` and `Encouragement`.
#[derive(Debug, Default)]
pub struct LogPlayback {
    positive_idx: usize,
    encouragement_idx: usize,
}

impl LogPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a request to the text that would be spoken, if any.
    pub fn resolve(&mut self, request: &PlaybackRequest) -> Option<String> {
        match request {
            PlaybackRequest::Tone { .. } => None,
            PlaybackRequest::Phrase(text) => Some(text.clone()),
            PlaybackRequest::Positive => {
                let text = POSITIVE_PHRASES[self.positive_idx % POSITIVE_PHRASES.len()];
                self.positive_idx += 1;
                Some(text.to_string())
            }
            PlaybackRequest::Encouragement => {
                let text =
                    ENCOURAGEMENT_PHRASES[self.encouragement_idx % ENCOURAGEMENT_PHRASES.len()];
                self.encouragement_idx += 1;
                Some(text.to_string())
            }
        }
    }
}

impl PlaybackSink for LogPlayback {
    fn play(&mut self, request: PlaybackRequest) {
        match &request {
            PlaybackRequest::Tone {
                frequency_hz,
                duration_ms,
                waveform,
            } => info!(
                "tone {:.0} Hz {} ms ({})",
                frequency_hz,
                duration_ms,
                waveform.as_str()
            ),
            _ => {
                if let Some(text) = self.resolve(&request) {
                    info!("say \"{}\"", text);
                }
            }
        }
    }
}

/// Keeps every request in memory, for tests and replay summaries.
#[derive(Debug, Default)]
pub struct RecordingPlayback {
    pub requests: Vec<PlaybackRequest>,
}

impl RecordingPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tones(&self) -> Vec<f32> {
        self.requests
            .iter()
            .filter_map(|r| match r {
                PlaybackRequest::Tone { frequency_hz, .. } => Some(*frequency_hz),
                _ => None,
            })
            .collect()
    }

    pub fn phrases(&self) -> Vec<&str> {
        self.requests
            .iter()
            .filter_map(|r| match r {
                PlaybackRequest::Phrase(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl PlaybackSink for RecordingPlayback {
    fn play(&mut self, request: PlaybackRequest) {
        self.requests.push(request);
    }
}

// ── Tests ──────────────────────────────────────────────────

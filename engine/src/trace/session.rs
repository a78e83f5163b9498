//! The shape tracing game.
//!
//! Glues the cursor projector, the interaction surface and the path tracer
//! together and turns tracer events into playback requests and a drawn
//! trail. Only `pose` is read from gesture events; labels are ignored.

use tracing::{debug, info};

use super::cursor::{CursorProjector, CursorSample};
use super::shapes::{Shape, ShapeError};
use super::spline::Point3;
use super::surface::InteractionSurface;
use super::tracer::{PathTracer, TraceEvent, TraceSnapshot, TracerState};
use crate::config::EngineConfig;
use crate::hand::channel::GestureConsumer;
use crate::hand::classifier::GestureEvent;
use crate::playback::{PlaybackRequest, PlaybackSink, Waveform};
use crate::scheduler::Scheduler;
use crate::sexp::escape_string;

/// One drawn piece of the trail between two reached points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSegment {
    pub stroke: usize,
    pub from: Point3,
    pub to: Point3,
}

/// Delay between the two success chime tones.
const CHIME_GAP_MS: f64 = 100.0;

pub struct ShapeSession<P: PlaybackSink> {
    tracer: PathTracer,
    projector: CursorProjector,
    surface: InteractionSurface,
    playback: P,
    /// Delayed playback (second chime tone).
    timers: Scheduler<PlaybackRequest>,
    trail: Vec<TrailSegment>,
    sparkle_step: u32,
    frames: u64,
}

impl<P: PlaybackSink> ShapeSession<P> {
    /// Build a session for the shapes named in `config`.
    pub fn new(config: &EngineConfig, playback: P) -> Result<Self, ShapeError> {
        let shapes = config
            .shapes
            .iter()
            .map(|name| Shape::builtin(name))
            .collect::<Result<Vec<_>, _>>()?;
        Self::with_shapes(config, &shapes, playback)
    }

    /// Build a session for an explicit shape list.
    pub fn with_shapes(
        config: &EngineConfig,
        shapes: &[Shape],
        playback: P,
    ) -> Result<Self, ShapeError> {
        Ok(Self {
            tracer: PathTracer::new(config.trace.clone(), shapes)?,
            projector: CursorProjector::new(config.cursor.clone()),
            surface: InteractionSurface::new(&config.surface),
            playback,
            timers: Scheduler::new(),
            trail: Vec::new(),
            sparkle_step: 0,
            frames: 0,
        })
    }

    /// Begin with the first shape.
    pub fn start(&mut self) {
        info!("Shape session started");
        let events = self.tracer.begin();
        self.react(events);
    }

    /// Handle one frame. Returns the tracer events it produced.
    pub fn handle(&mut self, event: &GestureEvent) -> Vec<TraceEvent> {
        self.frames += 1;
        let sample = self.projector.update(event.pose.as_ref());
        let cursor = sample
            .active
            .then(|| self.surface.to_surface(sample.position));
        let events = self.tracer.update(cursor);
        self.react(events.clone());
        events
    }

    /// Advance delayed playback and the tracer's success timer.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<TraceEvent> {
        for request in self.timers.advance(dt_ms) {
            self.playback.play(request);
        }
        let events = self.tracer.tick(dt_ms);
        self.react(events.clone());
        events
    }

    /// Cancel everything pending and return to idle.
    pub fn stop(&mut self) {
        self.timers.cancel_all();
        self.tracer.stop();
        self.projector.reset();
        self.trail.clear();
        info!("Shape session stopped after {} frame(s)", self.frames);
    }

    fn react(&mut self, events: Vec<TraceEvent>) {
        for event in events {
            match event {
                TraceEvent::ShapeStarted { name, .. } => {
                    self.trail.clear();
                    self.playback
                        .play(PlaybackRequest::phrase(format!("Let's draw a {}!", name)));
                }
                TraceEvent::StrokeStarted { stroke, .. } => {
                    let frequency_hz = self.next_sparkle_hz();
                    debug!("Stroke {} started, sparkle {:.0} Hz", stroke, frequency_hz);
                    self.playback
                        .play(PlaybackRequest::tone(frequency_hz, 50, Waveform::Triangle));
                }
                TraceEvent::WaypointReached { stroke, from, to, .. } => {
                    self.trail.push(TrailSegment { stroke, from, to });
                }
                TraceEvent::StrokeComplete { .. } => {}
                TraceEvent::ShapeComplete { name, .. } => {
                    self.playback.play(PlaybackRequest::Positive);
                    self.playback
                        .play(PlaybackRequest::phrase(format!("Amazing! You drew a {}!", name)));
                    self.playback
                        .play(PlaybackRequest::tone(600.0, 100, Waveform::Sine));
                    self.timers.schedule(
                        CHIME_GAP_MS,
                        PlaybackRequest::tone(800.0, 200, Waveform::Sine),
                    );
                }
            }
        }
    }

    /// Sparkle pitch in [800, 1200) Hz, varied per stroke.
    fn next_sparkle_hz(&mut self) -> f32 {
        let offset = (self.sparkle_step * 97) % 400;
        self.sparkle_step = self.sparkle_step.wrapping_add(1);
        800.0 + offset as f32
    }

    // ── Read-only views ────────────────────────────────────

    pub fn cursor(&self) -> CursorSample {
        self.projector.sample()
    }

    /// Cursor in surface units, if a hand is tracked.
    pub fn surface_cursor(&self) -> Option<[f32; 2]> {
        let sample = self.projector.sample();
        sample
            .active
            .then(|| self.surface.to_surface(sample.position))
    }

    pub fn snapshot(&self) -> TraceSnapshot {
        self.tracer.snapshot()
    }

    pub fn trail(&self) -> &[TrailSegment] {
        &self.trail
    }

    pub fn tracer(&self) -> &PathTracer {
        &self.tracer
    }

    pub fn surface(&self) -> &InteractionSurface {
        &self.surface
    }

    pub fn playback(&self) -> &P {
        &self.playback
    }

    pub fn is_running(&self) -> bool {
        self.tracer.state() != TracerState::Idle
    }

    /// Plist summary for logs and the replay driver.
    pub fn status_sexp(&self) -> String {
        let snap = self.tracer.snapshot();
        format!(
            "(:consumer \"shapes\" :state :{} :shape \"{}\" :stroke {} :progress {} :waypoints {} :completed {} :frames {})",
            snap.state.as_str(),
            escape_string(&snap.shape_name),
            snap.stroke_index,
            snap.progress,
            snap.waypoint_count,
            snap.completed_shapes,
            self.frames,
        )
    }
}

impl<P: PlaybackSink> GestureConsumer for ShapeSession<P> {
    fn name(&self) -> &'static str {
        "shapes"
    }

    fn start(&mut self) {
        ShapeSession::start(self);
    }

    fn on_gesture(&mut self, event: &GestureEvent) {
        self.handle(event);
    }

    fn tick(&mut self, dt_ms: f64) {
        self.advance(dt_ms);
    }

    fn stop(&mut self) {
        ShapeSession::stop(self);
    }

    fn status_sexp(&self) -> String {
        ShapeSession::status_sexp(self)
    }
}

// ── Tests ──────────────────────────────────────────────────

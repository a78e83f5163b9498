//! Path tracer state machine.
//!
//! `Idle -> InitShape -> Tracing -> Success -> InitShape -> ...`
//!
//! Each frame the projected cursor (in surface units) is compared with the
//! next required waypoint of the current stroke. Within the proximity
//! threshold the progress index advances by exactly one. Progress never
//! decreases and resets to 0 only when a stroke begins. After the last
//! stroke of a shape the tracer sits in `Success` until the success delay
//! elapses on its own scheduler, then moves on to the next shape (wrapping).

use tracing::{debug, info};

use super::shapes::{PathConfig, Shape, ShapeError, Stroke, TargetPath};
use super::spline::Point3;
use crate::scheduler::{Scheduler, TimerToken};

// ── Configuration ──────────────────────────────────────────

/// Configuration for waypoint generation and advance.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceConfig {
    /// Planar distance (surface units) under which the next waypoint counts
    /// as reached.
    pub proximity_threshold: f32,
    /// Interpolated points shared across the edges of a polygonal stroke.
    pub edge_point_budget: usize,
    /// Samples along a curved stroke.
    pub curve_divisions: usize,
    /// Scale applied to every shape.
    pub shape_scale: f32,
    /// Centre of every shape on the surface.
    pub shape_center: Point3,
    /// Time spent in `Success` before the next shape.
    pub success_delay_ms: f64,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            proximity_threshold: 1.5,
            edge_point_budget: 100,
            curve_divisions: 40,
            shape_scale: 3.5,
            shape_center: [0.0, 0.0, 0.0],
            success_delay_ms: 3000.0,
        }
    }
}

impl TraceConfig {
    pub fn path_config(&self) -> PathConfig {
        PathConfig {
            edge_point_budget: self.edge_point_budget,
            curve_divisions: self.curve_divisions,
            scale: self.shape_scale,
            center: self.shape_center,
        }
    }
}

// ── State ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracerState {
    Idle,
    InitShape,
    Tracing,
    Success,
}

impl TracerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InitShape => "init-shape",
            Self::Tracing => "tracing",
            Self::Success => "success",
        }
    }
}

/// What happened during one call into the tracer.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    ShapeStarted {
        shape_index: usize,
        name: String,
        strokes: usize,
    },
    StrokeStarted {
        stroke: usize,
        origin: Point3,
        waypoints: usize,
    },
    /// `progress` is the index after the advance. The segment runs from the
    /// previously reached point to the new one.
    WaypointReached {
        stroke: usize,
        progress: usize,
        from: Point3,
        to: Point3,
    },
    StrokeComplete {
        stroke: usize,
    },
    ShapeComplete {
        shape_index: usize,
        name: String,
    },
}

/// Copy of the tracer state for a render loop.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceSnapshot {
    pub state: TracerState,
    pub shape_index: usize,
    pub shape_name: String,
    pub stroke_index: usize,
    pub stroke_count: usize,
    pub progress: usize,
    pub waypoint_count: usize,
    pub next_waypoint: Option<Point3>,
    pub completed_shapes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TracerTimer {
    NextShape,
}

// ── Tracer ─────────────────────────────────────────────────

pub struct PathTracer {
    config: TraceConfig,
    paths: Vec<TargetPath>,
    state: TracerState,
    shape_index: usize,
    stroke_index: usize,
    progress: usize,
    completed_shapes: u64,
    timers: Scheduler<TracerTimer>,
    next_shape_timer: Option<TimerToken>,
}

impl PathTracer {
    /// Generate every shape's target path up front. Degenerate geometry
    /// fails here, never mid-session.
    pub fn new(config: TraceConfig, shapes: &[Shape]) -> Result<Self, ShapeError> {
        if shapes.is_empty() {
            return Err(ShapeError::NoShapes);
        }
        let path_config = config.path_config();
        let paths = shapes
            .iter()
            .map(|shape| shape.target_path(&path_config))
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            "Path tracer ready: {} shape(s), threshold {:.2}",
            paths.len(),
            config.proximity_threshold
        );
        Ok(Self {
            config,
            paths,
            state: TracerState::Idle,
            shape_index: 0,
            stroke_index: 0,
            progress: 0,
            completed_shapes: 0,
            timers: Scheduler::new(),
            next_shape_timer: None,
        })
    }

    /// Start from the first shape. Any previous run is discarded.
    pub fn begin(&mut self) -> Vec<TraceEvent> {
        self.stop();
        let mut events = Vec::new();
        self.init_shape(0, &mut events);
        events
    }

    /// Feed one frame's cursor position in surface units. `None` (no hand)
    /// stalls: nothing advances and nothing regresses.
    pub fn update(&mut self, cursor: Option<[f32; 2]>) -> Vec<TraceEvent> {
        let mut events = Vec::new();
        if self.state != TracerState::Tracing {
            return events;
        }
        let Some(cursor) = cursor else {
            return events;
        };

        let stroke = self.current_stroke();
        let target = stroke.waypoints[self.progress];
        let from = if self.progress == 0 {
            stroke.origin
        } else {
            stroke.waypoints[self.progress - 1]
        };
        let waypoint_count = stroke.waypoint_count();

        if planar_distance(cursor, target) >= self.config.proximity_threshold {
            return events;
        }

        self.progress += 1;
        events.push(TraceEvent::WaypointReached {
            stroke: self.stroke_index,
            progress: self.progress,
            from,
            to: target,
        });

        if self.progress == waypoint_count {
            self.complete_stroke(&mut events);
        }
        events
    }

    /// Advance the success timer.
    pub fn tick(&mut self, dt_ms: f64) -> Vec<TraceEvent> {
        let mut events = Vec::new();
        for timer in self.timers.advance(dt_ms) {
            match timer {
                TracerTimer::NextShape => {
                    self.next_shape_timer = None;
                    let next = (self.shape_index + 1) % self.paths.len();
                    self.init_shape(next, &mut events);
                }
            }
        }
        events
    }

    /// Skip to the next shape immediately, from any active state.
    pub fn advance_shape(&mut self) -> Vec<TraceEvent> {
        let mut events = Vec::new();
        if self.state == TracerState::Idle {
            return events;
        }
        self.cancel_next_shape();
        let next = (self.shape_index + 1) % self.paths.len();
        self.init_shape(next, &mut events);
        events
    }

    /// Tear down from any state. Pending timers are cancelled.
    pub fn stop(&mut self) {
        self.timers.cancel_all();
        self.next_shape_timer = None;
        if self.state != TracerState::Idle {
            debug!("Path tracer stopped in {}", self.state.as_str());
        }
        self.state = TracerState::Idle;
        self.shape_index = 0;
        self.stroke_index = 0;
        self.progress = 0;
    }

    fn cancel_next_shape(&mut self) {
        if let Some(token) = self.next_shape_timer.take() {
            self.timers.cancel(token);
        }
    }

    fn init_shape(&mut self, index: usize, events: &mut Vec<TraceEvent>) {
        self.state = TracerState::InitShape;
        self.shape_index = index;
        self.stroke_index = 0;
        self.progress = 0;

        let path = &self.paths[index];
        info!("Shape {} started: {}", index, path.shape);
        events.push(TraceEvent::ShapeStarted {
            shape_index: index,
            name: path.shape.clone(),
            strokes: path.strokes.len(),
        });
        self.start_stroke(events);
    }

    fn start_stroke(&mut self, events: &mut Vec<TraceEvent>) {
        self.progress = 0;
        self.state = TracerState::Tracing;
        let stroke = self.current_stroke();
        events.push(TraceEvent::StrokeStarted {
            stroke: self.stroke_index,
            origin: stroke.origin,
            waypoints: stroke.waypoint_count(),
        });
    }

    fn complete_stroke(&mut self, events: &mut Vec<TraceEvent>) {
        debug!(
            "Stroke {} of {} complete",
            self.stroke_index,
            self.paths[self.shape_index].shape
        );
        events.push(TraceEvent::StrokeComplete {
            stroke: self.stroke_index,
        });

        if self.stroke_index + 1 < self.paths[self.shape_index].strokes.len() {
            self.stroke_index += 1;
            self.start_stroke(events);
            return;
        }

        self.state = TracerState::Success;
        self.completed_shapes += 1;
        let name = self.paths[self.shape_index].shape.clone();
        info!("Shape {} complete: {}", self.shape_index, name);
        events.push(TraceEvent::ShapeComplete {
            shape_index: self.shape_index,
            name,
        });
        self.next_shape_timer = Some(
            self.timers
                .schedule(self.config.success_delay_ms, TracerTimer::NextShape),
        );
    }

    fn current_stroke(&self) -> &Stroke {
        &self.paths[self.shape_index].strokes[self.stroke_index]
    }

    // ── Read-only views ────────────────────────────────────

    pub fn state(&self) -> TracerState {
        self.state
    }

    pub fn progress(&self) -> usize {
        self.progress
    }

    pub fn shape_index(&self) -> usize {
        self.shape_index
    }

    pub fn stroke_index(&self) -> usize {
        self.stroke_index
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    pub fn paths(&self) -> &[TargetPath] {
        &self.paths
    }

    /// Target path of the current shape (also valid while idle).
    pub fn current_path(&self) -> &TargetPath {
        &self.paths[self.shape_index]
    }

    pub fn completed_shapes(&self) -> u64 {
        self.completed_shapes
    }

    pub fn snapshot(&self) -> TraceSnapshot {
        let path = self.current_path();
        let stroke = &path.strokes[self.stroke_index];
        let next_waypoint = match self.state {
            TracerState::Tracing => stroke.waypoints.get(self.progress).copied(),
            _ => None,
        };
        TraceSnapshot {
            state: self.state,
            shape_index: self.shape_index,
            shape_name: path.shape.clone(),
            stroke_index: self.stroke_index,
            stroke_count: path.strokes.len(),
            progress: self.progress,
            waypoint_count: stroke.waypoint_count(),
            next_waypoint,
            completed_shapes: self.completed_shapes,
        }
    }
}

/// Distance in the surface plane; depth is ignored.
fn planar_distance(cursor: [f32; 2], waypoint: Point3) -> f32 {
    let dx = cursor[0] - waypoint[0];
    let dy = cursor[1] - waypoint[1];
    (dx * dx + dy * dy).sqrt()
}

// ── Tests ──────────────────────────────────────────────────

//! Shape tracing: surface mapping, the fingertip cursor, target path
//! generation and the tracer state machine.

pub mod cursor;
pub mod session;
pub mod shapes;
pub mod spline;
pub mod surface;
pub mod tracer;

pub use cursor::{CursorConfig, CursorProjector, CursorSample};
pub use session::{ShapeSession, TrailSegment};
pub use shapes::{PathConfig, Shape, ShapeError, Stroke, StrokeGeometry, TargetPath};
pub use surface::{InteractionSurface, SurfaceConfig};
pub use tracer::{PathTracer, TraceConfig, TraceEvent, TraceSnapshot, TracerState};

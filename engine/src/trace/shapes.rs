//! Shape definitions and target path generation.
//!
//! A shape is one or more strokes. Each stroke carries its own geometry
//! kind and is turned into a dense, ordered waypoint rail:
//!
//! - `Curved` rings are resampled through a Catmull-Rom curve into a fixed
//!   number of evenly spaced samples and form a closed loop.
//! - `Polygonal` outlines are linearly interpolated edge by edge with an
//!   even share of the point budget per edge, keeping the defining vertices
//!   as anchors. The stroke is open.
//!
//! All shapes share one scale and centre so a single proximity threshold
//! fits every path.

use thiserror::Error;
use tracing::debug;

use super::spline::{catmull_rom_points, Point3};

/// Errors from shape setup. These are configuration mistakes, reported
/// once when a session is built.
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("shape list is empty")]
    NoShapes,

    #[error("shape '{0}' has no strokes")]
    NoStrokes(String),

    #[error("shape '{shape}' stroke {stroke}: need at least 2 vertices, got {found}")]
    TooFewVertices {
        shape: String,
        stroke: usize,
        found: usize,
    },

    #[error("shape '{shape}': point budget {budget} cannot cover {edges} edges")]
    BudgetTooSmall {
        shape: String,
        budget: usize,
        edges: usize,
    },

    #[error("curve division count must be positive")]
    ZeroDivisions,

    #[error("unknown shape '{0}'")]
    UnknownShape(String),
}

// ── Geometry ───────────────────────────────────────────────

/// How one stroke's waypoints are generated.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeGeometry {
    /// Smooth closed outline given as a coarse vertex ring.
    Curved { ring: Vec<Point3> },
    /// Straight edges between consecutive vertices, in order.
    Polygonal { vertices: Vec<Point3> },
}

impl StrokeGeometry {
    fn control_points(&self) -> &[Point3] {
        match self {
            Self::Curved { ring } => ring,
            Self::Polygonal { vertices } => vertices,
        }
    }
}

/// A traceable shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub name: String,
    pub strokes: Vec<StrokeGeometry>,
}

impl Shape {
    /// Unit circle sampled every 10 degrees, first vertex repeated at the end.
    pub fn circle() -> Self {
        let ring = (0..=36)
            .map(|i| {
                let rad = (i as f32 * 10.0).to_radians();
                [rad.cos(), rad.sin(), 0.0]
            })
            .collect();
        Self {
            name: "circle".to_string(),
            strokes: vec![StrokeGeometry::Curved { ring }],
        }
    }

    /// Clockwise from the top-left corner, back to the start.
    pub fn square() -> Self {
        Self {
            name: "square".to_string(),
            strokes: vec![StrokeGeometry::Polygonal {
                vertices: vec![
                    [-1.0, 1.0, 0.0],
                    [1.0, 1.0, 0.0],
                    [1.0, -1.0, 0.0],
                    [-1.0, -1.0, 0.0],
                    [-1.0, 1.0, 0.0],
                ],
            }],
        }
    }

    /// From the apex, down to the right, across, and back up.
    pub fn triangle() -> Self {
        Self {
            name: "triangle".to_string(),
            strokes: vec![StrokeGeometry::Polygonal {
                vertices: vec![
                    [0.0, 1.2, 0.0],
                    [1.0, -0.8, 0.0],
                    [-1.0, -0.8, 0.0],
                    [0.0, 1.2, 0.0],
                ],
            }],
        }
    }

    /// The default rotation: circle, square, triangle.
    pub fn defaults() -> Vec<Shape> {
        vec![Self::circle(), Self::square(), Self::triangle()]
    }

    /// Look up a built-in shape for configuration files.
    pub fn builtin(name: &str) -> Result<Shape, ShapeError> {
        match name {
            "circle" => Ok(Self::circle()),
            "square" => Ok(Self::square()),
            "triangle" => Ok(Self::triangle()),
            other => Err(ShapeError::UnknownShape(other.to_string())),
        }
    }

    /// Generate the waypoint rail for every stroke.
    pub fn target_path(&self, config: &PathConfig) -> Result<TargetPath, ShapeError> {
        if self.strokes.is_empty() {
            return Err(ShapeError::NoStrokes(self.name.clone()));
        }
        let strokes = self
            .strokes
            .iter()
            .enumerate()
            .map(|(i, geometry)| self.generate_stroke(i, geometry, config))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            "Generated path for {}: {} stroke(s), {} waypoint(s)",
            self.name,
            strokes.len(),
            strokes.iter().map(Stroke::waypoint_count).sum::<usize>(),
        );
        Ok(TargetPath {
            shape: self.name.clone(),
            strokes,
        })
    }

    fn generate_stroke(
        &self,
        index: usize,
        geometry: &StrokeGeometry,
        config: &PathConfig,
    ) -> Result<Stroke, ShapeError> {
        let control = geometry.control_points();
        if control.len() < 2 {
            return Err(ShapeError::TooFewVertices {
                shape: self.name.clone(),
                stroke: index,
                found: control.len(),
            });
        }
        let placed: Vec<Point3> = control.iter().map(|p| config.place(*p)).collect();

        let (points, closed) = match geometry {
            StrokeGeometry::Curved { .. } => {
                if config.curve_divisions == 0 {
                    return Err(ShapeError::ZeroDivisions);
                }
                (catmull_rom_points(&placed, config.curve_divisions), true)
            }
            StrokeGeometry::Polygonal { .. } => {
                let edges = placed.len() - 1;
                let per_edge = config.edge_point_budget / edges;
                if per_edge == 0 {
                    return Err(ShapeError::BudgetTooSmall {
                        shape: self.name.clone(),
                        budget: config.edge_point_budget,
                        edges,
                    });
                }
                (interpolate_edges(&placed, per_edge), false)
            }
        };

        // The first point is where the trace starts; it is never required.
        Ok(Stroke {
            origin: points[0],
            waypoints: points[1..].to_vec(),
            closed,
        })
    }
}

/// `per_edge` evenly spaced points along each edge (edge start included,
/// edge end excluded), then the final vertex.
fn interpolate_edges(vertices: &[Point3], per_edge: usize) -> Vec<Point3> {
    let mut points = Vec::with_capacity((vertices.len() - 1) * per_edge + 1);
    for edge in vertices.windows(2) {
        let (start, end) = (edge[0], edge[1]);
        for j in 0..per_edge {
            let alpha = j as f32 / per_edge as f32;
            points.push([
                start[0] + (end[0] - start[0]) * alpha,
                start[1] + (end[1] - start[1]) * alpha,
                start[2] + (end[2] - start[2]) * alpha,
            ]);
        }
    }
    points.push(vertices[vertices.len() - 1]);
    points
}

// ── Generated paths ────────────────────────────────────────

/// Parameters for turning shape geometry into waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct PathConfig {
    /// Total interpolated points for a polygonal stroke, split evenly
    /// across its edges.
    pub edge_point_budget: usize,
    /// Segments a curved stroke is resampled into.
    pub curve_divisions: usize,
    /// Scale applied to unit shape geometry, in surface units.
    pub scale: f32,
    /// Where shapes are centred on the surface.
    pub center: Point3,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            edge_point_budget: 100,
            curve_divisions: 40,
            scale: 3.5,
            center: [0.0, 0.0, 0.0],
        }
    }
}

impl PathConfig {
    fn place(&self, p: Point3) -> Point3 {
        [
            p[0] * self.scale + self.center[0],
            p[1] * self.scale + self.center[1],
            p[2] * self.scale + self.center[2],
        ]
    }
}

/// One generated stroke: a start point and the waypoints to reach in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Where the drawn trail starts.
    pub origin: Point3,
    /// Waypoints to be reached in order.
    pub waypoints: Vec<Point3>,
    /// Closed loop (curved) or open polyline.
    pub closed: bool,
}

impl Stroke {
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }
}

/// All strokes of one shape, immutable while the shape is traced.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetPath {
    pub shape: String,
    pub strokes: Vec<Stroke>,
}

impl TargetPath {
    pub fn total_waypoints(&self) -> usize {
        self.strokes.iter().map(Stroke::waypoint_count).sum()
    }
}

// ── Tests ──────────────────────────────────────────────────

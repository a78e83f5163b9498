//! Centripetal Catmull-Rom resampling.
//!
//! Used to turn a coarse vertex ring into a smooth, dense waypoint
//! sequence. The curve passes through every control point; the ends are
//! extended by reflecting the neighbouring control point.

pub type Point3 = [f32; 3];

/// Below this the parametric gap between two control points is treated
/// as zero.
const MIN_KNOT_GAP: f32 = 1e-4;

/// Sample `divisions + 1` points at uniform parameter steps from the
/// first to the last control point. Needs at least two control points.
pub fn catmull_rom_points(control: &[Point3], divisions: usize) -> Vec<Point3> {
    if control.len() < 2 || divisions == 0 {
        return control.to_vec();
    }
    (0..=divisions)
        .map(|d| point_at(control, d as f32 / divisions as f32))
        .collect()
}

/// Evaluate the curve at `t` in [0, 1].
pub fn point_at(control: &[Point3], t: f32) -> Point3 {
    let l = control.len();
    let p = (l - 1) as f32 * t.clamp(0.0, 1.0);
    let mut seg = p.floor() as usize;
    let mut weight = p - seg as f32;
    if seg >= l - 1 {
        seg = l - 2;
        weight = 1.0;
    }

    let p1 = control[seg];
    let p2 = control[seg + 1];
    let p0 = if seg > 0 {
        control[seg - 1]
    } else {
        reflect(control[0], control[1])
    };
    let p3 = if seg + 2 < l {
        control[seg + 2]
    } else {
        reflect(control[l - 1], control[l - 2])
    };

    let mut dt1 = knot_gap(p1, p2);
    if dt1 < MIN_KNOT_GAP {
        dt1 = 1.0;
    }
    let mut dt0 = knot_gap(p0, p1);
    if dt0 < MIN_KNOT_GAP {
        dt0 = dt1;
    }
    let mut dt2 = knot_gap(p2, p3);
    if dt2 < MIN_KNOT_GAP {
        dt2 = dt1;
    }

    let mut out = [0.0; 3];
    for axis in 0..3 {
        let cubic = Cubic::nonuniform(
            [p0[axis], p1[axis], p2[axis], p3[axis]],
            [dt0, dt1, dt2],
        );
        out[axis] = cubic.eval(weight);
    }
    out
}

/// `anchor + (anchor - neighbour)`.
fn reflect(anchor: Point3, neighbour: Point3) -> Point3 {
    [
        2.0 * anchor[0] - neighbour[0],
        2.0 * anchor[1] - neighbour[1],
        2.0 * anchor[2] - neighbour[2],
    ]
}

/// Centripetal parametrization: square root of the chord length.
fn knot_gap(a: Point3, b: Point3) -> f32 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let dz = b[2] - a[2];
    (dx * dx + dy * dy + dz * dz).powf(0.25)
}

/// One-dimensional cubic `c0 + c1 t + c2 t^2 + c3 t^3` on a segment.
struct Cubic {
    c0: f32,
    c1: f32,
    c2: f32,
    c3: f32,
}

impl Cubic {
    /// Hermite form from end values and tangents.
    fn hermite(x0: f32, x1: f32, t0: f32, t1: f32) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    /// Catmull-Rom segment between x[1] and x[2] with non-uniform knot gaps.
    fn nonuniform(x: [f32; 4], dt: [f32; 3]) -> Self {
        let [x0, x1, x2, x3] = x;
        let [dt0, dt1, dt2] = dt;
        let t1 = ((x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1) * dt1;
        let t2 = ((x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2) * dt1;
        Self::hermite(x1, x2, t1, t2)
    }

    fn eval(&self, t: f32) -> f32 {
        let t2 = t * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t2 * t
    }
}

// ── Tests ──────────────────────────────────────────────────

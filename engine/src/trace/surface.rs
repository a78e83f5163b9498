//! Interaction surface: the coordinate space shapes are traced in.
//!
//! Normalized cursor coordinates ([0, 1], y down) map onto a surface
//! centred at the origin with y up, `height` units tall and
//! `height * aspect` wide. Target paths and the proximity threshold are
//! expressed in surface units.

/// Configuration for the interaction surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    /// Surface height in world units.
    pub height: f32,
    /// Width / height of the display.
    pub aspect: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            height: 10.0,
            aspect: 16.0 / 9.0,
        }
    }
}

/// Maps between normalized cursor space and surface units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSurface {
    width: f32,
    height: f32,
}

impl InteractionSurface {
    pub fn new(config: &SurfaceConfig) -> Self {
        Self {
            width: config.height * config.aspect,
            height: config.height,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Normalized (x right, y down) to surface (origin centre, y up).
    pub fn to_surface(&self, normalized: [f32; 2]) -> [f32; 2] {
        [
            (normalized[0] - 0.5) * self.width,
            -(normalized[1] - 0.5) * self.height,
        ]
    }

    /// Inverse of `to_surface`.
    pub fn to_normalized(&self, surface: [f32; 2]) -> [f32; 2] {
        [
            surface[0] / self.width + 0.5,
            0.5 - surface[1] / self.height,
        ]
    }
}

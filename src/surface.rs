//! Touch surface dimensions and the scale mapping into the remote coordinate space.

/// Size of the local touch surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Per-axis factors mapping surface pixel deltas to remote virtual pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

impl Default for ScaleFactors {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ScaleFactors {
    pub const IDENTITY: Self = Self { x: 1.0, y: 1.0 };

    /// Factors for `reference` over `surface`. A zero-length axis falls back to 1:1.
    pub fn between(reference_width: u32, reference_height: u32, surface: SurfaceSize) -> Self {
        if surface.is_empty() {
            log::warn!(
                "[touch] surface is {}x{}, scaling 1:1",
                surface.width,
                surface.height
            );
        }
        Self {
            x: axis_factor(reference_width, surface.width),
            y: axis_factor(reference_height, surface.height),
        }
    }

    /// Scales a signed pixel delta, rounding the magnitude so both directions behave alike.
    pub fn scale_x(&self, delta: i32) -> i32 {
        scale_axis(delta, self.x)
    }

    pub fn scale_y(&self, delta: i32) -> i32 {
        scale_axis(delta, self.y)
    }
}

fn axis_factor(reference: u32, surface: u32) -> f64 {
    if surface == 0 {
        return 1.0;
    }
    let factor = f64::from(reference) / f64::from(surface);
    if factor.is_finite() {
        factor
    } else {
        1.0
    }
}

fn scale_axis(delta: i32, factor: f64) -> i32 {
    let magnitude = (f64::from(delta.unsigned_abs()) * factor).round();
    let magnitude = magnitude.min(f64::from(i32::MAX)) as i32;
    if delta < 0 {
        -magnitude
    } else {
        magnitude
    }
}

//! Shared coordinate primitives used across viewport, session, and render modules.

/// A position on the viewing surface, in screen pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A position in the natural image, in image pixels, origin top-left.
/// Fractional coordinates are valid; pointer events rarely land on cell centers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePoint {
    pub x: f64,
    pub y: f64,
}

impl ImagePoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the viewing surface in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Natural dimensions of a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle on the viewing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DrawRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

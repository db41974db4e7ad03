//! Screen/image coordinate mapping and zoom/pan state for the viewing surface.

use crate::geometry::{ContainerSize, DrawRect, ImagePoint, ImageSize, ScreenPoint};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 20.0;

/// Multiplier applied per wheel step.
pub const WHEEL_ZOOM_FACTOR: f64 = 1.1;
/// Multiplier applied per keyboard zoom step.
pub const KEY_ZOOM_FACTOR: f64 = 1.25;

fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Zoom/pan scalars plus every screen<->image conversion.
///
/// The drawn image is centered in the container and offset by pan, so all
/// conversions go through the drawn rectangle's top-left corner. Pan is
/// intentionally unclamped; the image may sit fully off-screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportTransform {
    pub const fn new() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }

    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    pub const fn pan_x(&self) -> f64 {
        self.pan_x
    }

    pub const fn pan_y(&self) -> f64 {
        self.pan_y
    }

    /// Out-of-range values are silently clamped into `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    pub fn set_pan(&mut self, pan_x: f64, pan_y: f64) {
        self.pan_x = pan_x;
        self.pan_y = pan_y;
    }

    pub fn pan_by(&mut self, delta_x: f64, delta_y: f64) {
        self.pan_x += delta_x;
        self.pan_y += delta_y;
    }

    pub fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Zoom so the whole image is visible and centered, never upscaling past 100%.
    pub fn fit_to_view(&mut self, container: ContainerSize, image: ImageSize) {
        if image.width == 0 || image.height == 0 {
            self.reset_view();
            return;
        }
        let scale_x = container.width / f64::from(image.width);
        let scale_y = container.height / f64::from(image.height);
        self.zoom = clamp_zoom(scale_x.min(scale_y).min(1.0));
        self.pan_x = 0.0;
        self.pan_y = 0.0;
        tracing::debug!(zoom = self.zoom, "viewport fit to view");
    }

    /// Multiply zoom by one wheel step and correct pan so the image point under
    /// the cursor stays under the cursor.
    ///
    /// The pan correction works in pre-zoom screen units: with the drawn image
    /// centered at `c = container/2 + pan`, the cursor's offset from that
    /// center scales by `ratio = new_zoom / old_zoom`, so pan absorbs the
    /// difference. Any other anchoring formula drifts on repeated steps.
    pub fn zoom_at_cursor(&mut self, cursor: ScreenPoint, container: ContainerSize, zoom_in: bool) {
        let old_zoom = self.zoom;
        let factor = if zoom_in {
            WHEEL_ZOOM_FACTOR
        } else {
            1.0 / WHEEL_ZOOM_FACTOR
        };
        let new_zoom = clamp_zoom(old_zoom * factor);

        let center_x = container.width / 2.0 + self.pan_x;
        let center_y = container.height / 2.0 + self.pan_y;
        let offset_x = cursor.x - center_x;
        let offset_y = cursor.y - center_y;

        let ratio = new_zoom / old_zoom;
        self.pan_x -= offset_x * (ratio - 1.0);
        self.pan_y -= offset_y * (ratio - 1.0);
        self.zoom = new_zoom;
    }

    /// The rectangle the image occupies on the viewing surface.
    pub fn draw_rect(&self, container: ContainerSize, image: ImageSize) -> DrawRect {
        let draw_width = f64::from(image.width) * self.zoom;
        let draw_height = f64::from(image.height) * self.zoom;
        DrawRect::new(
            (container.width - draw_width) / 2.0 + self.pan_x,
            (container.height - draw_height) / 2.0 + self.pan_y,
            draw_width,
            draw_height,
        )
    }

    pub fn screen_to_image(
        &self,
        screen: ScreenPoint,
        container: ContainerSize,
        image: ImageSize,
    ) -> ImagePoint {
        let rect = self.draw_rect(container, image);
        ImagePoint::new((screen.x - rect.x) / self.zoom, (screen.y - rect.y) / self.zoom)
    }
}

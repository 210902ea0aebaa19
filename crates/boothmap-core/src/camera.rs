//! Camera module for pan/zoom transforms.

use crate::config::EditorConfig;
use crate::geometry::CANVAS_EXTENT;
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Container size the normalized space is laid over, in pixels.
/// Matches the 1920/850 aspect ratio of the venue map container.
pub const DEFAULT_VIEWPORT: Size = Size::new(1920.0, 850.0);

/// Zoom limits.
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 7.0;

/// Zoom multiplier for one wheel step.
pub const ZOOM_STEP: f64 = 1.1;

/// Camera manages the view transform for the venue map.
///
/// Screen points are pixels relative to the container's top-left corner.
/// World points are in the normalized [0, 100] space. The mapping is
/// `screen = offset + zoom * container_scale * world`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
    /// Current zoom level (1.0 = the map fills the container).
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
    /// Unzoomed container size in pixels.
    pub viewport: Size,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            viewport: DEFAULT_VIEWPORT,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera using the zoom limits and viewport from a config.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            viewport: config.viewport,
            ..Self::default()
        }
    }

    /// Pixels per normalized unit on each axis at zoom 1.
    fn container_scale(&self) -> Affine {
        Affine::scale_non_uniform(
            self.viewport.width / CANVAS_EXTENT,
            self.viewport.height / CANVAS_EXTENT,
        )
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom) * self.container_scale()
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        self.transform().inverse()
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom the camera, keeping the given screen point fixed.
    /// Returns false when the zoom is already at the limit.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) -> bool {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }

        // newPan = mouse - (mouse - oldPan) / oldZoom * newZoom
        let mouse = screen_point.to_vec2();
        self.offset = mouse - (mouse - self.offset) / self.zoom * new_zoom;
        self.zoom = new_zoom;
        true
    }

    /// Apply one wheel notch at the pointer: scrolling up zooms in.
    pub fn wheel(&mut self, screen_point: Point, delta_y: f64, step: f64) -> bool {
        if delta_y == 0.0 {
            return false;
        }
        let factor = if delta_y < 0.0 { step } else { 1.0 / step };
        self.zoom_at(screen_point, factor)
    }
}

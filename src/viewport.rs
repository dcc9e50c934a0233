//! Viewport state: pan offset, zoom level, and the sizes its bounds derive from.
//!
//! The fields are only ever written by the operations in [`crate::transform`],
//! which re-establish the position and zoom bounds before returning. Everything
//! else reads the state through the accessors below.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::Serialize;

use crate::consts::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM};
use crate::geometry::{Point, Size};
use crate::transform;

/// Inclusive zoom range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self { min: DEFAULT_MIN_ZOOM, max: DEFAULT_MAX_ZOOM }
    }
}

/// Pan/zoom state of one viewer instance.
///
/// `position` is the top-left corner of the viewport inside the scaled
/// content, in pixels. `max_offset` and `scaled_content_size` are derived and
/// refreshed whenever the zoom level or either size changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewportState {
    pub(crate) position: Point,
    pub(crate) zoom_level: f64,
    pub(crate) limits: ZoomLimits,
    pub(crate) content_size: Size,
    pub(crate) viewport_size: Size,
    pub(crate) scaled_content_size: Size,
    pub(crate) max_offset: Size,
}

impl ViewportState {
    /// Build the state from host-reported sizes. The initial zoom is clamped
    /// into `limits` and the bounds are derived before returning.
    #[must_use]
    pub fn new(content_size: Size, viewport_size: Size, limits: ZoomLimits, initial_zoom: f64) -> Self {
        let mut state = Self {
            position: Point::ORIGIN,
            zoom_level: transform::clamp_zoom(initial_zoom, limits),
            limits,
            content_size,
            viewport_size,
            scaled_content_size: Size::ZERO,
            max_offset: Size::ZERO,
        };
        state.recompute_bounds();
        state
    }

    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    #[must_use]
    pub fn zoom_level(&self) -> f64 {
        self.zoom_level
    }

    #[must_use]
    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    /// Intrinsic (unscaled) size of the drawing.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Visible window size in screen pixels.
    #[must_use]
    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    #[must_use]
    pub fn scaled_content_size(&self) -> Size {
        self.scaled_content_size
    }

    /// Largest valid pan offset per axis; never negative.
    #[must_use]
    pub fn max_offset(&self) -> Size {
        self.max_offset
    }
}

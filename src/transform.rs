//! Clamping rules and the three mutating operations on [`ViewportState`].
//!
//! The free functions are pure; the `impl ViewportState` block below is the
//! only code that writes the state's fields. Every operation leaves
//! `0 <= position <= max_offset` and `min <= zoom_level <= max`, and bounds
//! are always rebuilt from the current zoom and sizes before the position is
//! clamped against them.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use tracing::trace;

use crate::geometry::{Point, Size, finite_or_zero};
use crate::viewport::{ViewportState, ZoomLimits};

/// Clamp a zoom level into `limits`.
#[must_use]
pub fn clamp_zoom(zoom: f64, limits: ZoomLimits) -> f64 {
    if zoom.is_nan() {
        return limits.min;
    }
    zoom.max(limits.min).min(limits.max)
}

/// Largest pan offset that keeps the viewport inside the scaled content.
///
/// Content smaller than the viewport yields zero on that axis, never a
/// negative bound.
#[must_use]
pub fn max_offset(content: Size, viewport: Size, zoom: f64) -> Size {
    let scaled = content.scale(zoom);
    Size { width: (scaled.width - viewport.width).max(0.0), height: (scaled.height - viewport.height).max(0.0) }
}

/// Clamp a pan offset into `[0, max]` per axis.
#[must_use]
pub fn clamp_position(position: Point, max: Size) -> Point {
    Point { x: position.x.max(0.0).min(max.width), y: position.y.max(0.0).min(max.height) }
}

impl ViewportState {
    /// Pan by `delta`, clamping against the current bounds. Overshoot is
    /// clamped, never rejected.
    pub fn move_by(&mut self, delta: Point) {
        let delta = delta.finite_or_zero();
        self.position = clamp_position(self.position + delta, self.max_offset);
        trace!(dx = delta.x, dy = delta.y, x = self.position.x, y = self.position.y, "move");
    }

    /// Change the zoom level by `delta`, then rebuild bounds and re-clamp the
    /// position against them. Zooming out can shrink the bounds below the
    /// current offset.
    pub fn zoom_by(&mut self, delta: f64) {
        self.zoom_level = clamp_zoom(self.zoom_level + finite_or_zero(delta), self.limits);
        self.recompute_bounds();
        trace!(zoom = self.zoom_level, "zoom");
    }

    /// Rebuild `scaled_content_size` and `max_offset` from the current zoom and
    /// sizes, and pull the position back inside the new bounds.
    pub fn recompute_bounds(&mut self) {
        self.scaled_content_size = self.content_size.scale(self.zoom_level);
        self.max_offset = max_offset(self.content_size, self.viewport_size, self.zoom_level);
        self.position = clamp_position(self.position, self.max_offset);
    }

    /// Host resize hook for the visible window.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
        self.recompute_bounds();
    }

    /// Host hook for a change of the drawing's intrinsic size.
    pub fn set_content_size(&mut self, size: Size) {
        self.content_size = size;
        self.recompute_bounds();
    }

    /// Replace both sizes at once. The position is clamped only against the
    /// bounds of the final pair, never an intermediate one.
    pub fn set_sizes(&mut self, content: Size, viewport: Size) {
        self.content_size = content;
        self.viewport_size = viewport;
        self.recompute_bounds();
    }
}

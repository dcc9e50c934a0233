//! Minimap geometry derived from the current zoom and pan offset.
//!
//! `MiniMapSync` holds only the sizes it needs; every `update` recomputes the
//! frame height and the indicator rectangle from scratch. The frame's width is
//! controlled by the host layout and is read live on each update.

#[cfg(test)]
#[path = "minimap_test.rs"]
mod minimap_test;

use serde::Serialize;

use crate::geometry::{Point, Size};

/// Placement of the minimap frame and its view indicator.
///
/// Indicator width/height are percentages of the frame and are not capped at
/// 100: at low zoom the indicator outgrows the frame, signalling that the
/// whole drawing is visible.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MiniMapGeometry {
    pub frame_height: f64,
    pub indicator_width_pct: f64,
    pub indicator_height_pct: f64,
    pub indicator_top_px: f64,
    pub indicator_left_px: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiniMapSync {
    content_size: Size,
    viewport_size: Size,
}

impl MiniMapSync {
    #[must_use]
    pub fn new(content_size: Size, viewport_size: Size) -> Self {
        Self { content_size, viewport_size }
    }

    /// Pick up new host sizes after a resize.
    pub fn resize(&mut self, content_size: Size, viewport_size: Size) {
        self.content_size = content_size;
        self.viewport_size = viewport_size;
    }

    /// Compute the overlay geometry for `zoom`/`position` given the frame's
    /// current rendered width.
    #[must_use]
    pub fn update(&self, zoom: f64, position: Point, frame_width: f64) -> MiniMapGeometry {
        let area = self.content_size.scale(zoom);
        let area_ratio = ratio(area.width, area.height);
        let scale = ratio(frame_width, self.content_size.width);

        MiniMapGeometry {
            frame_height: ratio(frame_width, area_ratio).round(),
            indicator_width_pct: ratio(self.viewport_size.width, area.width) * 100.0,
            indicator_height_pct: ratio(self.viewport_size.height, area.height) * 100.0,
            indicator_top_px: (position.y * scale).round(),
            indicator_left_px: (position.x * scale).round(),
        }
    }
}

/// `num / den`, or zero when the denominator is not a positive finite number.
fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 && den.is_finite() { num / den } else { 0.0 }
}

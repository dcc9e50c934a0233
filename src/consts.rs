//! Shared numeric constants and host element names.

// ── Zoom ────────────────────────────────────────────────────────

/// Lower zoom bound when none is configured.
pub const DEFAULT_MIN_ZOOM: f64 = 0.1;

/// Upper zoom bound when none is configured.
pub const DEFAULT_MAX_ZOOM: f64 = 2.0;

/// Zoom level a new viewer starts at.
pub const DEFAULT_INITIAL_ZOOM: f64 = 1.0;

// ── Controls ────────────────────────────────────────────────────

/// Pixels panned per click on a directional button.
pub const DEFAULT_PAN_STEP_PX: f64 = 20.0;

/// Zoom change per click on a zoom button.
pub const DEFAULT_ZOOM_STEP: f64 = 0.1;

// ── Render loop ─────────────────────────────────────────────────

/// Period of the render tick while a drag is active, in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 30;

// ── Host element names ──────────────────────────────────────────

pub const VIEWPORT_ELEMENT: &str = "viewport";
pub const CONTENT_ELEMENT: &str = "drawing";
pub const CONTROLS_ELEMENT: &str = "viewControls";
pub const MINIMAP_FRAME_ELEMENT: &str = "miniMap";
pub const MINIMAP_INDICATOR_ELEMENT: &str = "miniMapView";

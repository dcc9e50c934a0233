//! Viewer configuration, with optional overrides from environment variables.
//!
//! Recognized variables (all optional):
//! - `VIEWER_MIN_ZOOM` / `VIEWER_MAX_ZOOM`: zoom range, default 0.1 .. 2.0
//! - `VIEWER_INITIAL_ZOOM`: default 1.0
//! - `VIEWER_TICK_INTERVAL_MS`: drag repaint period, default 30
//! - `VIEWER_PAN_STEP`: pixels per directional button click, default 20
//! - `VIEWER_ZOOM_STEP`: zoom per zoom button click, default 0.1
//! - `VIEWER_MINIMAP`: `true` (default) or `false`
//! - `VIEWER_RENDER_STRATEGY`: `position` (default) or `native`
//!
//! Numbers that fail to parse fall back to their defaults. Out-of-range values
//! and unknown strategy names are rejected.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;
use std::time::Duration;

use crate::consts::{
    DEFAULT_INITIAL_ZOOM, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_PAN_STEP_PX, DEFAULT_TICK_INTERVAL_MS,
    DEFAULT_ZOOM_STEP,
};
use crate::error::ViewerError;
use crate::render::RenderStrategy;
use crate::viewport::ZoomLimits;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub initial_zoom: f64,
    pub tick_interval: Duration,
    pub pan_step: f64,
    pub zoom_step: f64,
    /// Whether a minimap overlay is present.
    pub minimap: bool,
    pub render_strategy: RenderStrategy,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            initial_zoom: DEFAULT_INITIAL_ZOOM,
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            pan_step: DEFAULT_PAN_STEP_PX,
            zoom_step: DEFAULT_ZOOM_STEP,
            minimap: true,
            render_strategy: RenderStrategy::default(),
        }
    }
}

impl ViewerConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ViewerError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(std::env::VarError::NotPresent | std::env::VarError::NotUnicode(_)) => None,
        })
    }

    /// Build config from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ViewerError> {
        let tick_ms = parse_or(lookup("VIEWER_TICK_INTERVAL_MS"), DEFAULT_TICK_INTERVAL_MS);
        let config = Self {
            min_zoom: parse_or(lookup("VIEWER_MIN_ZOOM"), DEFAULT_MIN_ZOOM),
            max_zoom: parse_or(lookup("VIEWER_MAX_ZOOM"), DEFAULT_MAX_ZOOM),
            initial_zoom: parse_or(lookup("VIEWER_INITIAL_ZOOM"), DEFAULT_INITIAL_ZOOM),
            tick_interval: Duration::from_millis(tick_ms),
            pan_step: parse_or(lookup("VIEWER_PAN_STEP"), DEFAULT_PAN_STEP_PX),
            zoom_step: parse_or(lookup("VIEWER_ZOOM_STEP"), DEFAULT_ZOOM_STEP),
            minimap: parse_or(lookup("VIEWER_MINIMAP"), true),
            render_strategy: parse_strategy(lookup("VIEWER_RENDER_STRATEGY").as_deref())?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject ranges the transform rules cannot honor.
    pub fn validate(&self) -> Result<(), ViewerError> {
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            return Err(ViewerError::InvalidConfig(format!("min_zoom must be positive, got {}", self.min_zoom)));
        }
        if !(self.max_zoom.is_finite() && self.max_zoom >= self.min_zoom) {
            return Err(ViewerError::InvalidConfig(format!(
                "max_zoom {} must be >= min_zoom {}",
                self.max_zoom, self.min_zoom
            )));
        }
        if !self.initial_zoom.is_finite() {
            return Err(ViewerError::InvalidConfig(format!("initial_zoom must be finite, got {}", self.initial_zoom)));
        }
        if self.tick_interval.is_zero() {
            return Err(ViewerError::InvalidConfig("tick_interval must be non-zero".into()));
        }
        if !(self.pan_step.is_finite() && self.pan_step > 0.0) {
            return Err(ViewerError::InvalidConfig(format!("pan_step must be positive, got {}", self.pan_step)));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            return Err(ViewerError::InvalidConfig(format!("zoom_step must be positive, got {}", self.zoom_step)));
        }
        Ok(())
    }

    #[must_use]
    pub fn zoom_limits(&self) -> ZoomLimits {
        ZoomLimits { min: self.min_zoom, max: self.max_zoom }
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    match raw {
        Some(v) => v.trim().parse::<T>().unwrap_or(default),
        None => default,
    }
}

fn parse_strategy(raw: Option<&str>) -> Result<RenderStrategy, ViewerError> {
    match raw.map_or("position", str::trim) {
        "position" => Ok(RenderStrategy::PositionAndScale),
        "native" => Ok(RenderStrategy::NativeScale),
        other => Err(ViewerError::InvalidConfig(format!(
            "unknown VIEWER_RENDER_STRATEGY '{other}' (expected 'position' or 'native')"
        ))),
    }
}

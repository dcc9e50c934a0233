//! Plain value types shared by every module: points and sizes in pixels.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::ops::{Add, Sub};

use serde::Serialize;

/// A point or displacement in pixels.
///
/// Used both for screen-space pointer positions and for the pan offset of the
/// viewport inside the scaled content.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Replace non-finite components with zero.
    #[must_use]
    pub fn finite_or_zero(self) -> Self {
        Self { x: finite_or_zero(self.x), y: finite_or_zero(self.y) }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self { width: 0.0, height: 0.0 };

    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Uniformly scale both axes.
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self { width: self.width * factor, height: self.height * factor }
    }
}

pub(crate) fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

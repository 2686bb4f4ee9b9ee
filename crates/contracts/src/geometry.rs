//! Planar geometry primitives: points and ego pose deltas.

use serde::{Deserialize, Serialize};

/// 2D point in the ego vehicle frame (meters)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Arithmetic mean of a point set, `None` when empty
    pub fn centroid(points: &[Point2]) -> Option<Point2> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point2::new(sx / n, sy / n))
    }
}

/// Ego vehicle motion between two timestamps
///
/// Maps a point expressed in the vehicle frame at `t_prev` into the vehicle
/// frame at `t_cur`:
///
/// `p_cur = R(dtheta) * p_prev + (dx, dy)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseDelta {
    /// Translation along x (meters)
    pub dx: f64,
    /// Translation along y (meters)
    pub dy: f64,
    /// Heading change (radians)
    pub dtheta: f64,
}

impl PoseDelta {
    pub const fn new(dx: f64, dy: f64, dtheta: f64) -> Self {
        Self { dx, dy, dtheta }
    }

    pub const fn identity() -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            dtheta: 0.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0 && self.dtheta == 0.0
    }
}

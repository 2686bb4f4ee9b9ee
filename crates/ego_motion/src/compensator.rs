//! Motion compensator over the ego odometry stream.
//!
//! Odometry reports the global ego pose `T(t)`. The motion between two cycles
//! is `T(t_cur)⁻¹ · T(t_prev)`, which maps points of the previous vehicle
//! frame into the current one.

use contracts::{OdometrySample, PoseDelta, Timestamp};
use nalgebra::{Isometry2, UnitComplex, Vector2};
use tracing::instrument;

use crate::transform::delta_from_isometry;

/// Source of ego motion between two timestamps
pub trait MotionSource {
    /// Rigid transform from the vehicle frame at `t_prev` into the frame at
    /// `t_cur`
    ///
    /// `None` when the interval is not covered; callers skip the cycle.
    fn relative_motion(&self, t_cur: Timestamp, t_prev: Timestamp) -> Option<PoseDelta>;
}

/// Interpolating odometry lookup
#[derive(Debug, Clone, Default)]
pub struct EgoMotionStream {
    samples: Vec<OdometrySample>,
}

impl EgoMotionStream {
    /// Create from samples; they are sorted by timestamp
    pub fn new(mut samples: Vec<OdometrySample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Covered interval
    pub fn time_range(&self) -> Option<(Timestamp, Timestamp)> {
        Some((self.samples.first()?.timestamp, self.samples.last()?.timestamp))
    }

    /// Global pose at `t`, interpolated between the bracketing samples
    ///
    /// Position is interpolated linearly, heading along the shortest arc.
    pub fn pose_at(&self, t: Timestamp) -> Option<Isometry2<f64>> {
        let (first, last) = self.time_range()?;
        if t < first || t > last {
            return None;
        }

        let idx = self.samples.partition_point(|s| s.timestamp < t);
        let upper = self.samples.get(idx)?;
        if upper.timestamp == t || idx == 0 {
            return Some(sample_pose(upper));
        }

        let lower = &self.samples[idx - 1];
        let span = (upper.timestamp - lower.timestamp) as f64;
        let alpha = (t - lower.timestamp) as f64 / span;

        let x = lower.x + alpha * (upper.x - lower.x);
        let y = lower.y + alpha * (upper.y - lower.y);
        let dyaw = UnitComplex::new(upper.yaw - lower.yaw).angle();
        let yaw = lower.yaw + alpha * dyaw;

        Some(Isometry2::new(Vector2::new(x, y), yaw))
    }
}

fn sample_pose(sample: &OdometrySample) -> Isometry2<f64> {
    Isometry2::new(Vector2::new(sample.x, sample.y), sample.yaw)
}

impl MotionSource for EgoMotionStream {
    #[instrument(name = "ego_motion_relative", level = "trace", skip(self))]
    fn relative_motion(&self, t_cur: Timestamp, t_prev: Timestamp) -> Option<PoseDelta> {
        if t_cur < t_prev {
            tracing::debug!(t_cur, t_prev, "current timestamp precedes previous");
            return None;
        }

        let (pose_prev, pose_cur) = match (self.pose_at(t_prev), self.pose_at(t_cur)) {
            (Some(prev), Some(cur)) => (prev, cur),
            _ => {
                tracing::debug!(
                    t_cur,
                    t_prev,
                    range = ?self.time_range(),
                    "odometry does not bracket interval"
                );
                return None;
            }
        };

        if t_cur == t_prev {
            return Some(PoseDelta::identity());
        }

        Some(delta_from_isometry(&(pose_cur.inverse() * pose_prev)))
    }
}

/// Constant motion for every interval
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedMotion(pub PoseDelta);

impl MotionSource for FixedMotion {
    fn relative_motion(&self, t_cur: Timestamp, t_prev: Timestamp) -> Option<PoseDelta> {
        (t_cur >= t_prev).then_some(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn straight_line() -> EgoMotionStream {
        EgoMotionStream::new(vec![
            OdometrySample::new(0, 0.0, 0.0, 0.0),
            OdometrySample::new(100_000, 1.0, 0.0, 0.0),
            OdometrySample::new(200_000, 2.0, 0.0, 0.0),
        ])
    }

    #[test]
    fn test_forward_motion_shifts_points_back() {
        let stream = straight_line();
        let delta = stream.relative_motion(100_000, 0).unwrap();
        assert!((delta.dx + 1.0).abs() < 1e-9);
        assert!(delta.dy.abs() < 1e-9);
        assert!(delta.dtheta.abs() < 1e-9);
    }

    #[test]
    fn test_interpolated_timestamps() {
        let stream = straight_line();
        let delta = stream.relative_motion(150_000, 50_000).unwrap();
        assert!((delta.dx + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_timestamp_is_identity() {
        let stream = straight_line();
        assert_eq!(
            stream.relative_motion(100_000, 100_000),
            Some(PoseDelta::identity())
        );
    }

    #[test]
    fn test_out_of_range_is_none() {
        let stream = straight_line();
        assert_eq!(stream.relative_motion(300_000, 100_000), None);
        assert_eq!(stream.relative_motion(100_000, 200_000), None);
        assert_eq!(EgoMotionStream::default().relative_motion(1, 0), None);
    }

    #[test]
    fn test_turning_motion() {
        // Vehicle turns in place by 90 degrees
        let stream = EgoMotionStream::new(vec![
            OdometrySample::new(0, 0.0, 0.0, 0.0),
            OdometrySample::new(100, 0.0, 0.0, FRAC_PI_2),
        ]);
        let delta = stream.relative_motion(100, 0).unwrap();
        assert!((delta.dtheta + FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_yaw_interpolation_takes_shortest_arc() {
        let stream = EgoMotionStream::new(vec![
            OdometrySample::new(0, 0.0, 0.0, PI - 0.1),
            OdometrySample::new(100, 0.0, 0.0, -PI + 0.1),
        ]);
        let pose = stream.pose_at(50).unwrap();
        // Midpoint of the short arc crosses +-PI
        assert!((pose.rotation.angle().abs() - PI).abs() < 1e-9);
    }

    #[test]
    fn test_samples_sorted_on_construction() {
        let stream = EgoMotionStream::new(vec![
            OdometrySample::new(200, 2.0, 0.0, 0.0),
            OdometrySample::new(0, 0.0, 0.0, 0.0),
        ]);
        assert_eq!(stream.time_range(), Some((0, 200)));
        assert_eq!(stream.len(), 2);
    }

    #[test]
    fn test_fixed_motion() {
        let fixed = FixedMotion(PoseDelta::new(-1.0, 0.0, 0.0));
        assert_eq!(fixed.relative_motion(10, 5), Some(PoseDelta::new(-1.0, 0.0, 0.0)));
        assert_eq!(fixed.relative_motion(5, 10), None);
    }
}

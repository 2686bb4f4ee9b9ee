//! # Ego Motion
//!
//! Motion compensation between two detector cycles.
//!
//! Responsibilities:
//! - Derive the rigid planar transform the ego vehicle underwent between two
//!   timestamps from the odometry stream
//! - Move previously observed objects into the current ego frame
//!
//! ## Example
//!
//! ```
//! use contracts::{DetectedObject, OdometrySample, Point2};
//! use ego_motion::{transform, EgoMotionStream, MotionSource};
//!
//! let odometry = EgoMotionStream::new(vec![
//!     OdometrySample::new(0, 0.0, 0.0, 0.0),
//!     OdometrySample::new(100_000, 1.0, 0.0, 0.0),
//! ]);
//!
//! let delta = odometry.relative_motion(100_000, 0).unwrap();
//! let prev = DetectedObject::delimiter(7, 0, Point2::new(0.0, 0.0), Point2::new(0.0, 1.0));
//! let moved = transform(&prev, &delta);
//! assert!((moved.geometry[0].x + 1.0).abs() < 1e-9);
//! ```

mod compensator;
mod transform;

pub use compensator::{EgoMotionStream, FixedMotion, MotionSource};
pub use transform::{delta_from_isometry, delta_to_isometry, transform, transform_all};

//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the ID maintenance
//! workspace: detected objects, camera frames, ego poses, recordings and the
//! engine configuration. Business crates depend on this crate only.
//!
//! ## Coordinate model
//! - All geometry is planar, in meters, expressed in the ego vehicle frame of
//!   the cycle the object was reported in
//! - Timestamps are microseconds (`u64`)

mod camera;
mod config;
mod error;
mod geometry;
mod object;
mod recording;
mod report;

pub use camera::*;
pub use config::*;
pub use error::*;
pub use geometry::*;
pub use object::*;
pub use recording::*;
pub use report::*;

/// Recording timestamp in microseconds.
pub type Timestamp = u64;

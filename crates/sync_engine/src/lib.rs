//! # Sync Engine
//!
//! Camera timeframe synchronization for one detector cycle pair.
//!
//! Responsibilities:
//! - Pick, per camera, the timeframe that belongs to the `(t_prev, t_cur]`
//!   window
//! - Report cameras without output in the window
//! - Expose the merged current-cycle candidate list
//!
//! ## Example
//!
//! ```
//! use contracts::{CameraId, SensorFrames, SyncConfig, Timeframe};
//! use sync_engine::TimeframeSynchronizer;
//!
//! let frames = SensorFrames::new()
//!     .with_frame(CameraId::Front, Timeframe::new(90, vec![]))
//!     .with_frame(CameraId::Front, Timeframe::new(140, vec![]));
//!
//! let sync = TimeframeSynchronizer::new(SyncConfig::default());
//! let selection = sync.select(150, 100, &frames);
//! assert_eq!(selection.frame_index(CameraId::Front), Some(1));
//! assert!(selection.is_missing(CameraId::Rear));
//! ```

mod engine;
mod window;

pub use contracts::SyncConfig;
pub use engine::{Candidate, TimeframeSynchronizer, WindowSelection};
pub use window::{find_matching_index, find_matching_index_with_tolerance};

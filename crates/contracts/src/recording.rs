//! Recording - reader output
//!
//! A recorded sequence for one object class: the primary detector cycles,
//! the per-camera timeframe streams and the ego odometry.

use serde::{Deserialize, Serialize};

use crate::{DetectedObject, ObjectClass, SensorFrames, Timestamp};

/// Primary detector output for one cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cycle {
    /// Cycle timestamp (microseconds)
    pub timestamp: Timestamp,

    /// Objects reported in this cycle
    #[serde(default)]
    pub objects: Vec<DetectedObject>,
}

impl Cycle {
    pub fn new(timestamp: Timestamp, objects: Vec<DetectedObject>) -> Self {
        Self { timestamp, objects }
    }
}

/// Global ego pose sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OdometrySample {
    pub timestamp: Timestamp,

    /// Position (meters)
    pub x: f64,
    pub y: f64,

    /// Heading (radians)
    pub yaw: f64,
}

impl OdometrySample {
    pub fn new(timestamp: Timestamp, x: f64, y: f64, yaw: f64) -> Self {
        Self { timestamp, x, y, yaw }
    }
}

/// Recorded sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    /// Recording name (diagnostics only)
    #[serde(default)]
    pub name: String,

    /// Class of every object in the recording
    pub object_class: ObjectClass,

    /// Primary detector cycles, timestamp-ordered
    pub cycles: Vec<Cycle>,

    /// Surround camera timeframes
    #[serde(default)]
    pub sensor_frames: SensorFrames,

    /// Ego odometry, strictly timestamp-ordered
    #[serde(default)]
    pub odometry: Vec<OdometrySample>,
}

impl Recording {
    pub fn new(object_class: ObjectClass) -> Self {
        Self {
            name: String::new(),
            object_class,
            cycles: Vec::new(),
            sensor_frames: SensorFrames::default(),
            odometry: Vec::new(),
        }
    }

    /// Total number of objects over all primary cycles
    pub fn object_count(&self) -> usize {
        self.cycles.iter().map(|c| c.objects.len()).sum()
    }

    /// First and last cycle timestamps
    pub fn time_span(&self) -> Option<(Timestamp, Timestamp)> {
        let first = self.cycles.first()?.timestamp;
        let last = self.cycles.last()?.timestamp;
        Some((first, last))
    }
}

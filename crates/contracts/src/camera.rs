//! Per-camera timeframe streams
//!
//! Surround cameras run on their own clocks: neither synchronized with each
//! other nor with the primary detector stream. Each camera contributes an
//! ordered list of timeframes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::{DetectedObject, Timestamp};

/// Physical camera identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraId {
    Front,
    Rear,
    Left,
    Right,
}

impl CameraId {
    pub const COUNT: usize = 4;

    /// All cameras in their canonical iteration order
    pub const ALL: [CameraId; CameraId::COUNT] =
        [CameraId::Front, CameraId::Rear, CameraId::Left, CameraId::Right];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            CameraId::Front => 0,
            CameraId::Rear => 1,
            CameraId::Left => 2,
            CameraId::Right => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CameraId::Front => "front",
            CameraId::Rear => "rear",
            CameraId::Left => "left",
            CameraId::Right => "right",
        }
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One camera output: timestamp plus the objects detected in it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeframe {
    pub timestamp: Timestamp,

    #[serde(default)]
    pub objects: Vec<DetectedObject>,
}

impl Timeframe {
    pub fn new(timestamp: Timestamp, objects: Vec<DetectedObject>) -> Self {
        Self { timestamp, objects }
    }
}

/// Timeframe lists for all cameras, keyed by [`CameraId`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "SensorFramesRepr", into = "SensorFramesRepr")]
pub struct SensorFrames {
    frames: [Vec<Timeframe>; CameraId::COUNT],
}

impl SensorFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timeframes of one camera
    #[inline]
    pub fn get(&self, camera: CameraId) -> &[Timeframe] {
        &self.frames[camera.index()]
    }

    /// Append a timeframe to a camera stream
    pub fn push(&mut self, camera: CameraId, frame: Timeframe) {
        self.frames[camera.index()].push(frame);
    }

    /// Builder-style variant of [`SensorFrames::push`]
    pub fn with_frame(mut self, camera: CameraId, frame: Timeframe) -> Self {
        self.push(camera, frame);
        self
    }

    /// Iterate cameras in canonical order with their timeframes
    pub fn iter(&self) -> impl Iterator<Item = (CameraId, &[Timeframe])> {
        CameraId::ALL
            .into_iter()
            .map(move |camera| (camera, self.get(camera)))
    }

    /// Total number of timeframes over all cameras
    pub fn total_frames(&self) -> usize {
        self.frames.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.iter().all(Vec::is_empty)
    }
}

impl Index<CameraId> for SensorFrames {
    type Output = Vec<Timeframe>;

    fn index(&self, camera: CameraId) -> &Self::Output {
        &self.frames[camera.index()]
    }
}

impl IndexMut<CameraId> for SensorFrames {
    fn index_mut(&mut self, camera: CameraId) -> &mut Self::Output {
        &mut self.frames[camera.index()]
    }
}

/// Serialized shape: one optional list per camera name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SensorFramesRepr {
    #[serde(default)]
    front: Vec<Timeframe>,
    #[serde(default)]
    rear: Vec<Timeframe>,
    #[serde(default)]
    left: Vec<Timeframe>,
    #[serde(default)]
    right: Vec<Timeframe>,
}

impl From<SensorFramesRepr> for SensorFrames {
    fn from(repr: SensorFramesRepr) -> Self {
        Self {
            frames: [repr.front, repr.rear, repr.left, repr.right],
        }
    }
}

impl From<SensorFrames> for SensorFramesRepr {
    fn from(frames: SensorFrames) -> Self {
        let [front, rear, left, right] = frames.frames;
        Self {
            front,
            rear,
            left,
            right,
        }
    }
}

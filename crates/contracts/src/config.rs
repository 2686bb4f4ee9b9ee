//! Engine configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::ObjectClass;

/// Association engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EngineConfig {
    /// Association radius per object class
    #[serde(default)]
    #[validate(nested)]
    pub radii: AssociationRadii,

    /// Camera timeframe selection
    #[serde(default)]
    pub sync: SyncConfig,

    /// Matching behavior
    #[serde(default)]
    pub matching: MatchingConfig,
}

/// Maximum matching distance per object class (meters)
///
/// Used both when merging camera candidates and when associating previous
/// with current objects.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AssociationRadii {
    #[validate(range(exclusive_min = 0.0))]
    pub delimiter: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub stop_line: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub wheel_locker: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub wheel_stopper: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub pedestrian_crossing: f64,
}

impl Default for AssociationRadii {
    fn default() -> Self {
        Self {
            delimiter: 1.0,
            stop_line: 1.5,
            wheel_locker: 0.5,
            wheel_stopper: 0.5,
            pedestrian_crossing: 2.0,
        }
    }
}

impl AssociationRadii {
    /// Same radius for every class
    pub fn uniform(radius: f64) -> Self {
        Self {
            delimiter: radius,
            stop_line: radius,
            wheel_locker: radius,
            wheel_stopper: radius,
            pedestrian_crossing: radius,
        }
    }

    pub fn for_class(&self, class: ObjectClass) -> f64 {
        match class {
            ObjectClass::Delimiter => self.delimiter,
            ObjectClass::StopLine => self.stop_line,
            ObjectClass::WheelLocker => self.wheel_locker,
            ObjectClass::WheelStopper => self.wheel_stopper,
            ObjectClass::PedestrianCrossing => self.pedestrian_crossing,
        }
    }
}

/// Camera timeframe selection configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Extra slack past the current cycle timestamp (microseconds)
    ///
    /// The selection window is `(t_prev, t_cur + tolerance_us]`.
    #[serde(default)]
    pub tolerance_us: u64,
}

/// Matching configuration
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default)]
    pub strategy: MatchingStrategy,

    #[serde(default)]
    pub reference_point: ReferencePoint,
}

/// Previous-to-current assignment strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingStrategy {
    /// Repeatedly commit the globally closest remaining pair
    #[default]
    GlobalGreedy,
    /// Scan previous objects in index order, each takes the first unclaimed
    /// current object within radius
    FirstWithinRadius,
}

/// Point of an object used for distance computations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePoint {
    /// Mean of all geometry points
    #[default]
    Centroid,
    /// First geometry point
    FirstPoint,
}

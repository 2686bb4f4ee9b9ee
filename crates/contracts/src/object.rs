//! DetectedObject - detector output for one cycle
//!
//! A common header (identifier, timestamp, geometry) plus a class-specific
//! payload. Identifiers come from the upstream detector and are not stable by
//! construction.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Point2, ReferencePoint, Timestamp};

/// Object class handled by the association engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectClass {
    Delimiter,
    StopLine,
    WheelLocker,
    WheelStopper,
    PedestrianCrossing,
}

impl ObjectClass {
    pub const ALL: [ObjectClass; 5] = [
        ObjectClass::Delimiter,
        ObjectClass::StopLine,
        ObjectClass::WheelLocker,
        ObjectClass::WheelStopper,
        ObjectClass::PedestrianCrossing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectClass::Delimiter => "delimiter",
            ObjectClass::StopLine => "stop_line",
            ObjectClass::WheelLocker => "wheel_locker",
            ObjectClass::WheelStopper => "wheel_stopper",
            ObjectClass::PedestrianCrossing => "pedestrian_crossing",
        }
    }

    /// Number of geometry points a well-formed object of this class carries
    ///
    /// Line-like markers are segments (2 points), box-like markers are
    /// quadrilaterals (4 points).
    pub fn expected_points(&self) -> usize {
        match self {
            ObjectClass::Delimiter | ObjectClass::StopLine | ObjectClass::WheelStopper => 2,
            ObjectClass::WheelLocker | ObjectClass::PedestrianCrossing => 4,
        }
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parking delimiter subtype
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelimiterType {
    ParkingLine,
    ParkingSlotEnd,
    Curb,
    #[default]
    Unknown,
}

/// Class-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum ObjectPayload {
    Delimiter {
        #[serde(default)]
        delimiter_type: DelimiterType,
        #[serde(default = "default_confidence")]
        confidence: f32,
    },
    StopLine {
        #[serde(default = "default_confidence")]
        confidence: f32,
    },
    WheelLocker {
        #[serde(default = "default_confidence")]
        confidence: f32,
    },
    WheelStopper {
        #[serde(default = "default_confidence")]
        confidence: f32,
    },
    PedestrianCrossing {
        #[serde(default = "default_confidence")]
        confidence: f32,
    },
}

fn default_confidence() -> f32 {
    1.0
}

impl ObjectPayload {
    pub fn class(&self) -> ObjectClass {
        match self {
            ObjectPayload::Delimiter { .. } => ObjectClass::Delimiter,
            ObjectPayload::StopLine { .. } => ObjectClass::StopLine,
            ObjectPayload::WheelLocker { .. } => ObjectClass::WheelLocker,
            ObjectPayload::WheelStopper { .. } => ObjectClass::WheelStopper,
            ObjectPayload::PedestrianCrossing { .. } => ObjectClass::PedestrianCrossing,
        }
    }

    pub fn confidence(&self) -> f32 {
        match self {
            ObjectPayload::Delimiter { confidence, .. }
            | ObjectPayload::StopLine { confidence }
            | ObjectPayload::WheelLocker { confidence }
            | ObjectPayload::WheelStopper { confidence }
            | ObjectPayload::PedestrianCrossing { confidence } => *confidence,
        }
    }

    /// Payload with default attributes for the given class
    pub fn default_for(class: ObjectClass) -> Self {
        let confidence = default_confidence();
        match class {
            ObjectClass::Delimiter => ObjectPayload::Delimiter {
                delimiter_type: DelimiterType::default(),
                confidence,
            },
            ObjectClass::StopLine => ObjectPayload::StopLine { confidence },
            ObjectClass::WheelLocker => ObjectPayload::WheelLocker { confidence },
            ObjectClass::WheelStopper => ObjectPayload::WheelStopper { confidence },
            ObjectClass::PedestrianCrossing => ObjectPayload::PedestrianCrossing { confidence },
        }
    }
}

/// Detected object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    /// Identifier assigned by the upstream detector
    pub id: u32,

    /// Cycle timestamp (microseconds)
    pub timestamp: Timestamp,

    /// Ordered geometry points in the ego frame
    pub geometry: Vec<Point2>,

    /// Class-specific attributes
    pub payload: ObjectPayload,
}

impl DetectedObject {
    pub fn new(id: u32, timestamp: Timestamp, geometry: Vec<Point2>, payload: ObjectPayload) -> Self {
        Self {
            id,
            timestamp,
            geometry,
            payload,
        }
    }

    /// Object of `class` with default payload attributes
    pub fn with_class(
        class: ObjectClass,
        id: u32,
        timestamp: Timestamp,
        geometry: Vec<Point2>,
    ) -> Self {
        Self::new(id, timestamp, geometry, ObjectPayload::default_for(class))
    }

    /// Parking delimiter segment from `start` to `end`
    pub fn delimiter(id: u32, timestamp: Timestamp, start: Point2, end: Point2) -> Self {
        Self::with_class(ObjectClass::Delimiter, id, timestamp, vec![start, end])
    }

    #[inline]
    pub fn class(&self) -> ObjectClass {
        self.payload.class()
    }

    /// Point used for distance computations
    ///
    /// `None` for objects without geometry.
    pub fn reference_point(&self, reference: ReferencePoint) -> Option<Point2> {
        match reference {
            ReferencePoint::Centroid => Point2::centroid(&self.geometry),
            ReferencePoint::FirstPoint => self.geometry.first().copied(),
        }
    }

    /// Distance between the reference points of two objects
    ///
    /// `None` when either object has no geometry.
    pub fn distance_to(&self, other: &DetectedObject, reference: ReferencePoint) -> Option<f64> {
        let a = self.reference_point(reference)?;
        let b = other.reference_point(reference)?;
        Some(a.distance(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_from_payload() {
        let obj = DetectedObject::with_class(
            ObjectClass::WheelLocker,
            3,
            0,
            vec![Point2::new(0.0, 0.0); 4],
        );
        assert_eq!(obj.class(), ObjectClass::WheelLocker);
        assert_eq!(obj.payload.confidence(), 1.0);
    }

    #[test]
    fn test_reference_points() {
        let obj = DetectedObject::delimiter(1, 0, Point2::new(0.0, 0.0), Point2::new(2.0, 0.0));
        assert_eq!(
            obj.reference_point(ReferencePoint::Centroid),
            Some(Point2::new(1.0, 0.0))
        );
        assert_eq!(
            obj.reference_point(ReferencePoint::FirstPoint),
            Some(Point2::new(0.0, 0.0))
        );
    }

    #[test]
    fn test_distance_without_geometry() {
        let a = DetectedObject::with_class(ObjectClass::StopLine, 1, 0, vec![]);
        let b = DetectedObject::delimiter(2, 0, Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        assert_eq!(a.distance_to(&b, ReferencePoint::Centroid), None);
    }

    #[test]
    fn test_payload_serde_tagged() {
        let obj = DetectedObject::delimiter(7, 100, Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        let json = serde_json::to_string(&obj).unwrap();
        assert!(json.contains("\"class\":\"delimiter\""));

        let parsed: DetectedObject = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, obj);
    }

    #[test]
    fn test_payload_defaults_on_deserialize() {
        let json = r#"{
            "id": 4,
            "timestamp": 10,
            "geometry": [{"x": 0.0, "y": 0.0}, {"x": 1.0, "y": 0.0}],
            "payload": {"class": "stop_line"}
        }"#;
        let obj: DetectedObject = serde_json::from_str(json).unwrap();
        assert_eq!(obj.class(), ObjectClass::StopLine);
        assert_eq!(obj.payload.confidence(), 1.0);
    }

    #[test]
    fn test_expected_points() {
        assert_eq!(ObjectClass::Delimiter.expected_points(), 2);
        assert_eq!(ObjectClass::PedestrianCrossing.expected_points(), 4);
    }
}

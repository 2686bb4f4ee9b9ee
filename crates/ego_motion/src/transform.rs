//! Object transformer: previous-cycle geometry into the current ego frame.

use contracts::{DetectedObject, PoseDelta};
use nalgebra::{Isometry2, Point2, Vector2};

/// Rigid transform equivalent to `delta`
#[inline]
pub fn delta_to_isometry(delta: &PoseDelta) -> Isometry2<f64> {
    Isometry2::new(Vector2::new(delta.dx, delta.dy), delta.dtheta)
}

/// Pose delta equivalent to `iso`
#[inline]
pub fn delta_from_isometry(iso: &Isometry2<f64>) -> PoseDelta {
    PoseDelta::new(
        iso.translation.vector.x,
        iso.translation.vector.y,
        iso.rotation.angle(),
    )
}

/// Apply `delta` to every geometry point of `object`
///
/// Rotation by `dtheta` first, then translation by `(dx, dy)`. Identifier,
/// timestamp and payload are carried over untouched. An identity delta
/// returns an exact copy.
pub fn transform(object: &DetectedObject, delta: &PoseDelta) -> DetectedObject {
    if delta.is_identity() {
        return object.clone();
    }

    let iso = delta_to_isometry(delta);
    let geometry = object
        .geometry
        .iter()
        .map(|p| {
            let moved = iso.transform_point(&Point2::new(p.x, p.y));
            contracts::Point2::new(moved.x, moved.y)
        })
        .collect();

    DetectedObject {
        geometry,
        ..object.clone()
    }
}

/// [`transform`] over a slice, preserving order
pub fn transform_all(objects: &[DetectedObject], delta: &PoseDelta) -> Vec<DetectedObject> {
    objects.iter().map(|o| transform(o, delta)).collect()
}

//! Reference-point access shared by everything the engine matches.

use contracts::{DetectedObject, Point2, ReferencePoint};
use crate::merger::{CompensatedCandidate, UpdatedObject};

/// Anything with a geometry the engine can measure distances on
pub trait Located {
    /// Reference point in the current ego frame, `None` without geometry
    fn reference_point(&self, reference: ReferencePoint) -> Option<Point2>;
}

impl Located for DetectedObject {
    fn reference_point(&self, reference: ReferencePoint) -> Option<Point2> {
        DetectedObject::reference_point(self, reference)
    }
}

impl Located for UpdatedObject {
    fn reference_point(&self, reference: ReferencePoint) -> Option<Point2> {
        self.object.reference_point(reference)
    }
}

impl Located for CompensatedCandidate {
    fn reference_point(&self, reference: ReferencePoint) -> Option<Point2> {
        self.object.reference_point(reference)
    }
}

/// Reference-point distance, `None` when either side has no usable point
pub(crate) fn distance<A, B>(a: &A, b: &B, reference: ReferencePoint) -> Option<f64>
where
    A: Located + ?Sized,
    B: Located + ?Sized,
{
    let pa = a.reference_point(reference)?;
    let pb = b.reference_point(reference)?;
    let d = pa.distance(&pb);
    d.is_finite().then_some(d)
}

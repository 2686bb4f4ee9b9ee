//! # Association
//!
//! Two-frame object association ("ID maintenance").
//!
//! Responsibilities:
//! - Refine motion-compensated previous objects with current camera
//!   candidates (candidate merger)
//! - One-to-one nearest-distance matching of previous to current objects
//!   (associator)
//! - Identifier propagation check over a whole recording (evaluator)
//!
//! ## Example
//!
//! ```
//! use association::associate;
//! use contracts::{DetectedObject, Point2, ReferencePoint};
//!
//! let prev = vec![DetectedObject::delimiter(7, 0, Point2::new(-1.0, 0.0), Point2::new(-1.0, 1.0))];
//! let cur = vec![DetectedObject::delimiter(7, 1, Point2::new(-1.0, 0.0), Point2::new(-1.0, 1.0))];
//!
//! let mapping = associate(&cur, &prev, 1.0, ReferencePoint::Centroid);
//! assert_eq!(mapping.current_for(0), Some(0));
//! ```

mod associator;
mod evaluator;
mod located;
mod merger;

pub use associator::{
    associate, associate_first_within_radius, associate_with_strategy, AssociationMap, Match,
};
pub use evaluator::{CycleAssociation, IdMaintenanceEvaluator};
pub use located::Located;
pub use merger::{
    compensate_candidates, merge, CandidateSource, CompensatedCandidate, CompensatedCandidates,
    UpdatedObject,
};

//! Candidate merger: refine motion-compensated previous objects with the
//! closest current camera candidate.

use contracts::{CameraId, DetectedObject, PoseDelta, ReferencePoint, Timestamp};
use ego_motion::{transform, MotionSource};
use sync_engine::Candidate;
use tracing::instrument;

use crate::located::distance;

/// Camera candidate that refined a previous object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSource {
    pub camera: CameraId,
    pub frame_index: usize,
    pub object_index: usize,
    /// Identifier the camera reported for the candidate
    pub candidate_id: u32,
}

/// Camera candidate expressed in the current cycle's ego frame
#[derive(Debug, Clone, PartialEq)]
pub struct CompensatedCandidate {
    pub source: CandidateSource,
    pub object: DetectedObject,
}

/// Window candidates moved into the `t_cur` ego frame
#[derive(Debug, Clone, Default)]
pub struct CompensatedCandidates {
    pub candidates: Vec<CompensatedCandidate>,
    /// Cameras dropped because no ego motion covers their timeframe
    pub uncompensated: Vec<CameraId>,
}

/// Transform every candidate from its timeframe's ego frame into the frame
/// at `t_cur`
///
/// The motion is looked up once per camera. A camera whose timeframe is not
/// covered contributes no candidates.
pub fn compensate_candidates<M: MotionSource>(
    candidates: &[Candidate<'_>],
    t_cur: Timestamp,
    motion: &M,
) -> CompensatedCandidates {
    let mut deltas: [Option<Option<PoseDelta>>; CameraId::COUNT] = [None; CameraId::COUNT];
    let mut out = CompensatedCandidates::default();

    for candidate in candidates {
        let delta = *deltas[candidate.camera.index()]
            .get_or_insert_with(|| motion.relative_motion(t_cur, candidate.timestamp));

        match delta {
            Some(delta) => out.candidates.push(CompensatedCandidate {
                source: CandidateSource {
                    camera: candidate.camera,
                    frame_index: candidate.frame_index,
                    object_index: candidate.object_index,
                    candidate_id: candidate.object.id,
                },
                object: transform(candidate.object, &delta),
            }),
            None if !out.uncompensated.contains(&candidate.camera) => {
                tracing::debug!(
                    camera = %candidate.camera,
                    t_frame = candidate.timestamp,
                    t_cur,
                    "no ego motion for camera timeframe, candidates dropped"
                );
                out.uncompensated.push(candidate.camera);
            }
            None => {}
        }
    }

    out
}

/// Previous object with its predicted current-cycle geometry
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatedObject {
    /// Index into the previous cycle's object list
    pub source_index: usize,

    /// Previous identifier and payload, current-frame geometry
    pub object: DetectedObject,

    /// Candidate whose geometry was taken, `None` if none was in range
    pub source: Option<CandidateSource>,

    /// Distance between the transformed object and the chosen candidate
    pub residual: Option<f64>,
}

impl UpdatedObject {
    #[inline]
    pub fn id(&self) -> u32 {
        self.object.id
    }

    #[inline]
    pub fn is_refined(&self) -> bool {
        self.source.is_some()
    }
}

/// Attach the closest candidate within `radius` to each transformed object
///
/// Candidates are shared: several previous objects may be refined by the
/// same candidate. Equal distances resolve to the earliest candidate. The
/// output has exactly one entry per input object, in input order.
#[instrument(
    name = "association_merge",
    level = "trace",
    skip(transformed_prev, candidates),
    fields(prev = transformed_prev.len(), candidates = candidates.len())
)]
pub fn merge(
    transformed_prev: &[DetectedObject],
    candidates: &[CompensatedCandidate],
    radius: f64,
    reference: ReferencePoint,
) -> Vec<UpdatedObject> {
    transformed_prev
        .iter()
        .enumerate()
        .map(|(source_index, prev)| {
            let best = candidates
                .iter()
                .enumerate()
                .filter_map(|(pos, candidate)| {
                    let d = distance(prev, candidate, reference)?;
                    (d <= radius).then_some((pos, d))
                })
                .min_by(|(pa, da), (pb, db)| da.total_cmp(db).then(pa.cmp(pb)));

            match best {
                Some((pos, residual)) => {
                    let candidate = &candidates[pos];
                    UpdatedObject {
                        source_index,
                        object: DetectedObject {
                            geometry: candidate.object.geometry.clone(),
                            ..prev.clone()
                        },
                        source: Some(candidate.source),
                        residual: Some(residual),
                    }
                }
                None => UpdatedObject {
                    source_index,
                    object: prev.clone(),
                    source: None,
                    residual: None,
                },
            }
        })
        .collect()
}

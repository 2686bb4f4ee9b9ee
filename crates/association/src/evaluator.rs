//! ID maintenance evaluator.
//!
//! Walks a recording cycle by cycle, associates every cycle with its
//! predecessor and checks that matched objects kept their identifier.

use contracts::{
    CameraId, Cycle, CycleOutcome, CycleReport, DetectedObject, EngineConfig, EvaluationReport,
    IdCheck, ObjectClass, PoseDelta, Recording, SensorFrames, SkipReason,
};
use ego_motion::{transform_all, MotionSource};
use sync_engine::TimeframeSynchronizer;
use tracing::instrument;

use crate::associator::{associate_with_strategy, AssociationMap};
use crate::merger::{compensate_candidates, merge, UpdatedObject};

/// Association result for one previous/current cycle pair
#[derive(Debug, Clone)]
pub struct CycleAssociation {
    pub delta: PoseDelta,
    pub updated: Vec<UpdatedObject>,
    pub mapping: AssociationMap,
    pub missing_cameras: Vec<CameraId>,
}

impl CycleAssociation {
    /// Compare identifiers across every matched pair
    ///
    /// Pairs whose indices fall outside `updated` or `current` are skipped.
    pub fn id_checks(&self, current: &[DetectedObject]) -> Vec<IdCheck> {
        self.mapping
            .iter()
            .filter_map(|m| {
                let previous_id = self.updated.get(m.previous)?.id();
                let current_id = current.get(m.current)?.id;
                Some(IdCheck {
                    prev_index: m.previous,
                    cur_index: m.current,
                    previous_id,
                    current_id,
                    distance: m.distance,
                    passed: previous_id == current_id,
                })
            })
            .collect()
    }

    /// Previous objects refined by a camera candidate
    pub fn merged_count(&self) -> usize {
        self.updated.iter().filter(|u| u.is_refined()).count()
    }
}

/// Drives the full pipeline over a recording
#[derive(Debug, Clone, Default)]
pub struct IdMaintenanceEvaluator {
    config: EngineConfig,
    synchronizer: TimeframeSynchronizer,
}

impl IdMaintenanceEvaluator {
    pub fn new(config: EngineConfig) -> Self {
        let synchronizer = TimeframeSynchronizer::new(config.sync.clone());
        Self {
            config,
            synchronizer,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Associate one cycle with its predecessor
    ///
    /// Fails with the skip reason when either cycle has no objects or no ego
    /// motion covers the interval. Camera candidates are moved from their
    /// timeframe into the `t_cur` ego frame before merging; cameras whose
    /// timeframe has no motion coverage count as missing.
    pub fn associate_cycle<M: MotionSource>(
        &self,
        prev: &Cycle,
        cur: &Cycle,
        frames: &SensorFrames,
        class: ObjectClass,
        motion: &M,
    ) -> Result<CycleAssociation, SkipReason> {
        if prev.objects.is_empty() || cur.objects.is_empty() {
            return Err(SkipReason::EmptyObjects);
        }

        let delta = motion
            .relative_motion(cur.timestamp, prev.timestamp)
            .ok_or(SkipReason::NoMotion)?;

        let radius = self.config.radii.for_class(class);
        let matching = self.config.matching;

        let transformed = transform_all(&prev.objects, &delta);
        let selection = self
            .synchronizer
            .select(cur.timestamp, prev.timestamp, frames);
        let compensated = compensate_candidates(selection.candidates(), cur.timestamp, motion);
        let updated = merge(
            &transformed,
            &compensated.candidates,
            radius,
            matching.reference_point,
        );
        let mapping = associate_with_strategy(
            matching.strategy,
            &cur.objects,
            &updated,
            radius,
            matching.reference_point,
        );

        let mut missing_cameras = selection.missing_cameras().to_vec();
        missing_cameras.extend(compensated.uncompensated);
        missing_cameras.sort_by_key(|camera| camera.index());

        Ok(CycleAssociation {
            delta,
            updated,
            mapping,
            missing_cameras,
        })
    }

    /// Evaluate the (index - 1, index) cycle pair
    #[instrument(
        name = "id_maintenance_cycle",
        level = "debug",
        skip(self, prev, cur, frames, motion),
        fields(t_prev = prev.timestamp, t_cur = cur.timestamp)
    )]
    pub fn evaluate_cycle<M: MotionSource>(
        &self,
        index: usize,
        prev: &Cycle,
        cur: &Cycle,
        frames: &SensorFrames,
        class: ObjectClass,
        motion: &M,
    ) -> CycleReport {
        let outcome = match self.associate_cycle(prev, cur, frames, class, motion) {
            Ok(association) => {
                let checks = association.id_checks(&cur.objects);
                record_cycle_metrics(class, &association, &checks);

                for failed in checks.iter().filter(|c| !c.passed) {
                    tracing::warn!(
                        index,
                        prev_index = failed.prev_index,
                        cur_index = failed.cur_index,
                        previous_id = failed.previous_id,
                        current_id = failed.current_id,
                        distance = failed.distance,
                        "identifier changed across cycles"
                    );
                }

                CycleOutcome::Evaluated {
                    merged: association.merged_count(),
                    missing_cameras: association.missing_cameras,
                    checks,
                }
            }
            Err(reason) => {
                tracing::warn!(index, reason = reason.as_str(), "cycle skipped");
                metrics::counter!(
                    "idtrack_cycles_total",
                    "status" => reason.as_str(),
                    "class" => class.as_str()
                )
                .increment(1);
                CycleOutcome::Skipped { reason }
            }
        };

        CycleReport {
            index,
            t_prev: prev.timestamp,
            t_cur: cur.timestamp,
            outcome,
        }
    }

    /// Evaluate every cycle against its predecessor
    ///
    /// Cycle 0 has no predecessor and is never evaluated as current.
    #[instrument(
        name = "id_maintenance_evaluate",
        skip(self, recording, motion),
        fields(recording = %recording.name, class = %recording.object_class, cycles = recording.cycles.len())
    )]
    pub fn evaluate<M: MotionSource>(&self, recording: &Recording, motion: &M) -> EvaluationReport {
        let class = recording.object_class;
        let mut report =
            EvaluationReport::new(&recording.name, class, self.config.radii.for_class(class));

        for (index, pair) in recording.cycles.windows(2).enumerate() {
            let cycle = self.evaluate_cycle(
                index + 1,
                &pair[0],
                &pair[1],
                &recording.sensor_frames,
                class,
                motion,
            );
            report.cycles.push(cycle);
        }

        tracing::info!(
            evaluated = report.evaluated_cycles(),
            skipped = report.skipped_cycles(),
            checks = report.total_checks(),
            failures = report.total_failures(),
            verdict = ?report.verdict(),
            "ID maintenance evaluation finished"
        );

        report
    }
}

fn record_cycle_metrics(class: ObjectClass, association: &CycleAssociation, checks: &[IdCheck]) {
    metrics::counter!(
        "idtrack_cycles_total",
        "status" => "evaluated",
        "class" => class.as_str()
    )
    .increment(1);

    for check in checks {
        let result = if check.passed { "passed" } else { "failed" };
        metrics::counter!(
            "idtrack_id_checks_total",
            "result" => result,
            "class" => class.as_str()
        )
        .increment(1);
        metrics::histogram!("idtrack_match_distance_m", "class" => class.as_str())
            .record(check.distance);
    }

    for residual in association.updated.iter().filter_map(|u| u.residual) {
        metrics::histogram!("idtrack_merge_residual_m", "class" => class.as_str()).record(residual);
    }
}

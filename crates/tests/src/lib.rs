//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 端到端场景：recording -> ego motion -> 相机合并 -> 关联 -> ID 检查
//! - 跨 crate 性质测试

#[cfg(test)]
mod fixtures {
    use contracts::{Cycle, DetectedObject, ObjectClass, OdometrySample, Point2, Recording};
    use ego_motion::EgoMotionStream;

    /// Delimiter whose centroid is exactly `(x, y)`
    pub fn delimiter_at(id: u32, t: u64, x: f64, y: f64) -> DetectedObject {
        DetectedObject::delimiter(id, t, Point2::new(x, y - 0.5), Point2::new(x, y + 0.5))
    }

    pub fn recording(cycles: Vec<Cycle>, odometry: Vec<OdometrySample>) -> Recording {
        let mut rec = Recording::new(ObjectClass::Delimiter);
        rec.name = "e2e".to_string();
        rec.cycles = cycles;
        rec.odometry = odometry;
        rec
    }

    /// Ego at the origin at t=0, one meter further along x at t=100
    pub fn one_meter_forward() -> Vec<OdometrySample> {
        vec![
            OdometrySample::new(0, 0.0, 0.0, 0.0),
            OdometrySample::new(100, 1.0, 0.0, 0.0),
        ]
    }

    pub fn motion_of(rec: &Recording) -> EgoMotionStream {
        EgoMotionStream::new(rec.odometry.clone())
    }
}

#[cfg(test)]
mod contract_tests {
    use contracts::{
        CameraId, CycleOutcome, CycleReport, EngineConfig, EvaluationReport, ObjectClass,
        SkipReason, Verdict,
    };

    #[test]
    fn test_camera_order_is_canonical() {
        for (i, camera) in CameraId::ALL.iter().enumerate() {
            assert_eq!(camera.index(), i);
            let json = serde_json::to_value(camera).unwrap();
            assert_eq!(json, camera.as_str());
        }
    }

    #[test]
    fn test_report_json_shape() {
        let mut report = EvaluationReport::new("snapshot", ObjectClass::Delimiter, 1.0);
        report.cycles.push(CycleReport {
            index: 1,
            t_prev: 0,
            t_cur: 100,
            outcome: CycleOutcome::Skipped {
                reason: SkipReason::NoMotion,
            },
        });

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["object_class"], "delimiter");
        assert_eq!(json["cycles"][0]["outcome"]["status"], "skipped");
        assert_eq!(json["cycles"][0]["outcome"]["reason"], "no_motion");
        assert_eq!(report.verdict(), Verdict::NotEvaluated);
    }

    #[test]
    fn test_default_config_round_trips_through_loader() {
        let toml = config_loader::ConfigLoader::to_toml(&EngineConfig::default()).unwrap();
        let config =
            config_loader::ConfigLoader::load_from_str(&toml, config_loader::ConfigFormat::Toml)
                .unwrap();
        assert_eq!(config.radii.stop_line, 1.5);
    }
}

#[cfg(test)]
mod e2e_tests {
    use association::{associate, compensate_candidates, IdMaintenanceEvaluator};
    use contracts::{
        AssociationRadii, CameraId, Cycle, CycleOutcome, EngineConfig, MatchingStrategy,
        ObjectClass, OdometrySample, PoseDelta, ReferencePoint, SensorFrames, SyncConfig,
        Timeframe, Verdict,
    };
    use ego_motion::{transform_all, FixedMotion, MotionSource};
    use sync_engine::TimeframeSynchronizer;

    use crate::fixtures::*;

    fn unit_radius() -> IdMaintenanceEvaluator {
        IdMaintenanceEvaluator::new(EngineConfig {
            radii: AssociationRadii::uniform(1.0),
            ..Default::default()
        })
    }

    /// Scenario 1: stable identifier under one meter of forward motion
    #[test]
    fn test_scenario_stable_id_passes() {
        let rec = recording(
            vec![
                Cycle::new(0, vec![delimiter_at(7, 0, 0.0, 0.0)]),
                Cycle::new(100, vec![delimiter_at(7, 100, -1.0, 0.0)]),
            ],
            one_meter_forward(),
        );
        let motion = motion_of(&rec);

        let association = unit_radius()
            .associate_cycle(
                &rec.cycles[0],
                &rec.cycles[1],
                &rec.sensor_frames,
                rec.object_class,
                &motion,
            )
            .unwrap();
        assert_eq!(association.mapping.pairs(), vec![(0, 0)]);

        let report = unit_radius().evaluate(&rec, &motion);
        assert_eq!(report.total_checks(), 1);
        assert_eq!(report.verdict(), Verdict::Passed);
    }

    /// Scenario 2: geometry still matches, identifier changed
    #[test]
    fn test_scenario_id_switch_fails_once() {
        let rec = recording(
            vec![
                Cycle::new(0, vec![delimiter_at(7, 0, 0.0, 0.0)]),
                Cycle::new(100, vec![delimiter_at(9, 100, -1.0, 0.0)]),
            ],
            one_meter_forward(),
        );
        let motion = motion_of(&rec);

        let association = unit_radius()
            .associate_cycle(
                &rec.cycles[0],
                &rec.cycles[1],
                &rec.sensor_frames,
                rec.object_class,
                &motion,
            )
            .unwrap();
        assert_eq!(association.mapping.pairs(), vec![(0, 0)]);

        let report = unit_radius().evaluate(&rec, &motion);
        assert_eq!(report.verdict(), Verdict::Failed);
        assert_eq!(report.total_failures(), 1);

        let failed = report.cycles[0].failures().next().unwrap();
        assert_eq!((failed.previous_id, failed.current_id), (7, 9));
    }

    /// Scenario 3: transformed object out of range of every current object
    #[test]
    fn test_scenario_out_of_radius_unmatched() {
        let rec = recording(
            vec![
                Cycle::new(
                    0,
                    vec![delimiter_at(7, 0, 0.0, 0.0), delimiter_at(8, 0, 10.0, 0.0)],
                ),
                Cycle::new(100, vec![delimiter_at(7, 100, -1.0, 0.0)]),
            ],
            one_meter_forward(),
        );
        let motion = motion_of(&rec);

        let association = unit_radius()
            .associate_cycle(
                &rec.cycles[0],
                &rec.cycles[1],
                &rec.sensor_frames,
                rec.object_class,
                &motion,
            )
            .unwrap();
        assert_eq!(association.mapping.current_for(1), None);
        assert_eq!(association.mapping.len(), 1);
    }

    /// Scenario 4: contention at 0.3 and 0.5, with and without an alternative
    #[test]
    fn test_scenario_contention() {
        let prev = vec![delimiter_at(1, 0, -0.5, 0.0), delimiter_at(2, 0, 0.3, 0.0)];
        let identity = PoseDelta::identity();
        let transformed = transform_all(&prev, &identity);

        // Only one current object: the 0.3 pair wins, the other stays unmatched
        let cur = vec![delimiter_at(2, 100, 0.0, 0.0)];
        let map = associate(&cur, &transformed, 1.0, ReferencePoint::Centroid);
        assert_eq!(map.pairs(), vec![(1, 0)]);
        assert_eq!(map.current_for(0), None);

        // A more distant alternative within radius is taken by the loser
        let cur = vec![delimiter_at(2, 100, 0.0, 0.0), delimiter_at(1, 100, -1.2, 0.0)];
        let map = associate(&cur, &transformed, 1.0, ReferencePoint::Centroid);
        assert_eq!(map.pairs(), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_rotation_is_compensated() {
        // Ego turns in place by 90 degrees to the left
        let rec = recording(
            vec![
                Cycle::new(0, vec![delimiter_at(4, 0, 2.0, 0.0)]),
                Cycle::new(100, vec![delimiter_at(4, 100, 0.0, -2.0)]),
            ],
            vec![
                OdometrySample::new(0, 0.0, 0.0, 0.0),
                OdometrySample::new(100, 0.0, 0.0, std::f64::consts::FRAC_PI_2),
            ],
        );
        let motion = motion_of(&rec);
        let delta = motion.relative_motion(100, 0).unwrap();
        assert!((delta.dtheta + std::f64::consts::FRAC_PI_2).abs() < 1e-9);

        let report = unit_radius().evaluate(&rec, &motion);
        assert_eq!(report.verdict(), Verdict::Passed);
        assert!(report.cycles[0].checks()[0].distance < 1e-9);
    }

    #[test]
    fn test_camera_candidate_rescues_bad_odometry() {
        // Odometry reports no motion, the camera saw the true position
        let mut rec = recording(
            vec![
                Cycle::new(0, vec![delimiter_at(7, 0, 0.0, 0.0)]),
                Cycle::new(100, vec![delimiter_at(7, 100, -1.5, 0.0)]),
            ],
            vec![
                OdometrySample::new(0, 0.0, 0.0, 0.0),
                OdometrySample::new(100, 0.0, 0.0, 0.0),
            ],
        );
        let evaluator = IdMaintenanceEvaluator::new(EngineConfig {
            radii: AssociationRadii::uniform(1.2),
            ..Default::default()
        });

        let without_camera = evaluator.evaluate(&rec, &motion_of(&rec));
        assert_eq!(without_camera.verdict(), Verdict::NotEvaluated);

        // Camera observes the marker 1.0 m from the prediction, within radius
        rec.sensor_frames.push(
            CameraId::Front,
            Timeframe::new(95, vec![delimiter_at(300, 95, -1.0, 0.0)]),
        );
        let with_camera = evaluator.evaluate(&rec, &motion_of(&rec));
        assert_eq!(with_camera.verdict(), Verdict::Passed);

        let CycleOutcome::Evaluated {
            merged,
            missing_cameras,
            ..
        } = &with_camera.cycles[0].outcome
        else {
            panic!("cycle should be evaluated");
        };
        assert_eq!(*merged, 1);
        assert_eq!(
            missing_cameras,
            &vec![CameraId::Rear, CameraId::Left, CameraId::Right]
        );
    }

    /// Ego moves while the camera frame lags the cycle: candidates must be
    /// compared in the current ego frame, not in their own timeframe's frame
    #[test]
    fn test_camera_candidates_are_motion_compensated() {
        let mut rec = recording(
            vec![
                Cycle::new(0, vec![delimiter_at(7, 0, 0.0, 0.0)]),
                Cycle::new(
                    100,
                    vec![delimiter_at(7, 100, -1.0, 0.0), delimiter_at(9, 100, -0.2, 0.0)],
                ),
            ],
            one_meter_forward(),
        );
        let motion = motion_of(&rec);

        let without_camera = unit_radius().evaluate(&rec, &motion);
        assert_eq!(without_camera.verdict(), Verdict::Passed);

        // Both markers seen at t=50, half a meter behind the t=100 ego pose
        rec.sensor_frames = SensorFrames::new().with_frame(
            CameraId::Front,
            Timeframe::new(
                50,
                vec![delimiter_at(507, 50, -0.5, 0.0), delimiter_at(509, 50, 0.3, 0.0)],
            ),
        );

        let selection =
            TimeframeSynchronizer::new(SyncConfig::default()).select(100, 0, &rec.sensor_frames);
        assert_eq!(selection.frame_index(CameraId::Front), Some(0));
        assert!(selection.candidates().iter().all(|c| c.timestamp == 50));

        let compensated = compensate_candidates(selection.candidates(), 100, &motion);
        let xs: Vec<f64> = compensated
            .candidates
            .iter()
            .map(|c| c.object.geometry[0].x)
            .collect();
        assert!((xs[0] + 1.0).abs() < 1e-9);
        assert!((xs[1] + 0.2).abs() < 1e-9);

        let with_camera = unit_radius().evaluate(&rec, &motion);
        assert_eq!(with_camera.verdict(), Verdict::Passed);
        let check = &with_camera.cycles[0].checks()[0];
        assert_eq!((check.cur_index, check.current_id), (0, 7));
        assert!(check.distance < 1e-9);

        let CycleOutcome::Evaluated { merged, .. } = &with_camera.cycles[0].outcome else {
            panic!("cycle should be evaluated");
        };
        assert_eq!(*merged, 1);
    }

    #[test]
    fn test_camera_frame_outside_window_ignored() {
        let mut rec = recording(
            vec![
                Cycle::new(0, vec![delimiter_at(7, 0, 0.0, 0.0)]),
                Cycle::new(100, vec![delimiter_at(7, 100, -1.5, 0.0)]),
            ],
            vec![
                OdometrySample::new(0, 0.0, 0.0, 0.0),
                OdometrySample::new(100, 0.0, 0.0, 0.0),
            ],
        );
        // Frame at t_prev is outside the half-open window
        rec.sensor_frames.push(
            CameraId::Front,
            Timeframe::new(0, vec![delimiter_at(300, 0, -1.0, 0.0)]),
        );
        let evaluator = IdMaintenanceEvaluator::new(EngineConfig {
            radii: AssociationRadii::uniform(1.2),
            ..Default::default()
        });
        let report = evaluator.evaluate(&rec, &motion_of(&rec));
        assert_eq!(report.verdict(), Verdict::NotEvaluated);
    }

    #[test]
    fn test_configured_strategy_reaches_evaluator() {
        let content = r#"
[radii]
delimiter = 1.0

[matching]
strategy = "first_within_radius"
"#;
        let config =
            config_loader::ConfigLoader::load_from_str(content, config_loader::ConfigFormat::Toml)
                .unwrap();
        assert_eq!(config.matching.strategy, MatchingStrategy::FirstWithinRadius);

        let rec = recording(
            vec![
                Cycle::new(
                    0,
                    vec![delimiter_at(1, 0, -0.5, 0.0), delimiter_at(2, 0, 0.3, 0.0)],
                ),
                Cycle::new(100, vec![delimiter_at(2, 100, 0.0, 0.0)]),
            ],
            vec![],
        );
        let motion = FixedMotion(PoseDelta::identity());

        // Index-order scan pairs object 0 (id 1) with the id-2 current object
        let scan = IdMaintenanceEvaluator::new(config).evaluate(&rec, &motion);
        assert_eq!(scan.verdict(), Verdict::Failed);

        let greedy = IdMaintenanceEvaluator::default().evaluate(&rec, &motion);
        assert_eq!(greedy.verdict(), Verdict::Passed);
    }

    #[test]
    fn test_mock_recording_through_reader() {
        for class in ObjectClass::ALL {
            let generated = ingestion::MockRecording::for_class(class).generate();
            let json = ingestion::RecordingReader::to_json(&generated).unwrap();
            let rec = ingestion::RecordingReader::load_from_str(&json).unwrap();

            let report = IdMaintenanceEvaluator::default().evaluate(&rec, &motion_of(&rec));
            assert_eq!(report.verdict(), Verdict::Passed, "{class}");
            assert_eq!(report.evaluated_cycles(), rec.cycles.len() - 1);

            let summary = observability::AssociationMetricsAggregator::from_report(&report).summary();
            assert_eq!(summary.total_failures, 0);
            assert!(summary.total_merged > 0);
        }
    }

    #[test]
    fn test_mock_id_switch_is_detected_once() {
        let rec = ingestion::MockRecording::new(ingestion::MockRecordingConfig {
            id_switch_at: Some(7),
            ..Default::default()
        })
        .generate();
        let report = IdMaintenanceEvaluator::default().evaluate(&rec, &motion_of(&rec));

        assert_eq!(report.verdict(), Verdict::Failed);
        let failing: Vec<usize> = report
            .cycles
            .iter()
            .filter(|c| c.failures().next().is_some())
            .map(|c| c.index)
            .collect();
        assert_eq!(failing, vec![7]);
    }
}

#[cfg(test)]
mod property_tests {
    use association::{associate, IdMaintenanceEvaluator};
    use contracts::{
        Cycle, EngineConfig, PoseDelta, ReferencePoint, SensorFrames, SkipReason, Verdict,
    };
    use ego_motion::{transform, transform_all, FixedMotion};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    use crate::fixtures::*;

    /// Objects on a 3 m grid, far apart relative to a 1 m radius
    fn separated_scene(rng: &mut StdRng, n: usize, t: u64) -> Vec<contracts::DetectedObject> {
        let mut cells: Vec<(i32, i32)> = (-4..4).flat_map(|x| (-4..4).map(move |y| (x, y))).collect();
        cells.shuffle(rng);
        cells
            .into_iter()
            .take(n)
            .enumerate()
            .map(|(i, (x, y))| delimiter_at(i as u32 + 1, t, x as f64 * 3.0, y as f64 * 3.0))
            .collect()
    }

    #[test]
    fn test_identity_delta_is_stable() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let n = rng.random_range(1..10);
            let objects = separated_scene(&mut rng, n, 0);

            let moved = transform_all(&objects, &PoseDelta::identity());
            assert_eq!(moved, objects);

            let map = associate(&objects, &moved, 1.0, ReferencePoint::Centroid);
            let expected: Vec<(usize, usize)> = (0..n).map(|i| (i, i)).collect();
            assert_eq!(map.pairs(), expected);
        }
    }

    #[test]
    fn test_random_motion_keeps_ids() {
        let mut rng = StdRng::seed_from_u64(2024);
        let evaluator = IdMaintenanceEvaluator::default();

        for _ in 0..100 {
            let n = rng.random_range(1..10);
            let prev = separated_scene(&mut rng, n, 0);
            let delta = PoseDelta::new(
                rng.random_range(-2.0..2.0),
                rng.random_range(-2.0..2.0),
                rng.random_range(-0.5..0.5),
            );

            // Current cycle: exact prediction plus small noise, shuffled
            let mut cur: Vec<_> = prev
                .iter()
                .map(|o| {
                    let mut moved = transform(o, &delta);
                    let (nx, ny) = (rng.random_range(-0.2..0.2), rng.random_range(-0.2..0.2));
                    for p in &mut moved.geometry {
                        p.x += nx;
                        p.y += ny;
                    }
                    moved.timestamp = 100;
                    moved
                })
                .collect();
            cur.shuffle(&mut rng);

            let mut rec = recording(vec![Cycle::new(0, prev), Cycle::new(100, cur)], vec![]);
            rec.sensor_frames = SensorFrames::new();

            let report = evaluator.evaluate(&rec, &FixedMotion(delta));
            assert_eq!(report.verdict(), Verdict::Passed);
            assert_eq!(report.total_checks(), n);
        }
    }

    #[test]
    fn test_first_cycle_never_current() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..30 {
            let n_cycles: usize = rng.random_range(0..8);
            let cycles: Vec<Cycle> = (0..n_cycles)
                .map(|i| {
                    let t = i as u64 * 100;
                    let objects = if rng.random_bool(0.3) {
                        vec![]
                    } else {
                        vec![delimiter_at(1, t, 0.0, 0.0)]
                    };
                    Cycle::new(t, objects)
                })
                .collect();
            let rec = recording(cycles, vec![]);

            let report = IdMaintenanceEvaluator::default()
                .evaluate(&rec, &FixedMotion(PoseDelta::identity()));

            assert_eq!(report.cycles.len(), n_cycles.saturating_sub(1));
            let indices: Vec<usize> = report.cycles.iter().map(|c| c.index).collect();
            let expected: Vec<usize> = (1..n_cycles).collect();
            assert_eq!(indices, expected);

            for cycle in &report.cycles {
                let i = cycle.index;
                let empty =
                    rec.cycles[i - 1].objects.is_empty() || rec.cycles[i].objects.is_empty();
                assert_eq!(
                    cycle.is_evaluated(),
                    !empty,
                    "cycle {i} evaluated={}",
                    cycle.is_evaluated()
                );
                if empty {
                    assert_eq!(
                        cycle.outcome,
                        contracts::CycleOutcome::Skipped {
                            reason: SkipReason::EmptyObjects
                        }
                    );
                }
            }
        }
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let rec = ingestion::MockRecording::new(ingestion::MockRecordingConfig {
            id_switch_at: Some(4),
            ..Default::default()
        })
        .generate();
        let motion = motion_of(&rec);
        let evaluator = IdMaintenanceEvaluator::new(EngineConfig::default());

        let first = evaluator.evaluate(&rec, &motion);
        let second = evaluator.evaluate(&rec, &motion);
        assert_eq!(first, second);
    }
}

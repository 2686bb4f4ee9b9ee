//! Mock recording 生成
//!
//! 用于无真实录制数据的测试：自车沿 x 轴匀速直行，
//! 路边等间距分布静止标记物。

use contracts::{
    CameraId, Cycle, DetectedObject, ObjectClass, OdometrySample, Point2, Recording, Timeframe,
    Timestamp,
};
use tracing::debug;

/// Identifier offset for camera candidates
const CAMERA_ID_OFFSET: u32 = 500;

/// Identifier offset applied after a forced identifier switch
const SWITCH_ID_OFFSET: u32 = 1000;

/// Mock recording 配置
#[derive(Debug, Clone)]
pub struct MockRecordingConfig {
    pub object_class: ObjectClass,

    /// Number of primary cycles
    pub cycles: usize,

    /// Cycle period (microseconds)
    pub period_us: Timestamp,

    /// Ego speed along x (m/s)
    pub speed_mps: f64,

    /// Distance between consecutive markers along x (meters)
    pub marker_spacing_m: f64,

    pub marker_count: usize,

    /// Lateral marker offset (meters)
    pub lateral_offset_m: f64,

    /// Markers farther than this from the ego are not reported
    pub view_range_m: f64,

    /// Camera emitting one timeframe per cycle, `None` for no camera data
    pub camera: Option<CameraId>,

    /// How long before each cycle the camera timeframe is taken
    pub camera_lead_us: Timestamp,

    /// From this cycle on, the detector reports fresh identifiers
    pub id_switch_at: Option<usize>,
}

impl Default for MockRecordingConfig {
    fn default() -> Self {
        Self {
            object_class: ObjectClass::Delimiter,
            cycles: 20,
            period_us: 100_000,
            speed_mps: 2.0,
            marker_spacing_m: 5.0,
            marker_count: 6,
            lateral_offset_m: 2.0,
            view_range_m: 15.0,
            camera: Some(CameraId::Front),
            camera_lead_us: 10_000,
            id_switch_at: None,
        }
    }
}

/// Mock recording 生成器
pub struct MockRecording {
    config: MockRecordingConfig,
}

impl MockRecording {
    pub fn new(config: MockRecordingConfig) -> Self {
        Self { config }
    }

    /// Default scenario for `class`
    pub fn for_class(object_class: ObjectClass) -> Self {
        Self::new(MockRecordingConfig {
            object_class,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &MockRecordingConfig {
        &self.config
    }

    /// Build the recording
    pub fn generate(&self) -> Recording {
        let cfg = &self.config;
        let mut recording = Recording::new(cfg.object_class);
        recording.name = format!("mock_{}", cfg.object_class);

        for i in 0..cfg.cycles {
            let t = i as Timestamp * cfg.period_us;
            let ego_x = self.ego_x(t);

            recording.odometry.push(OdometrySample::new(t, ego_x, 0.0, 0.0));

            let id_base = match cfg.id_switch_at {
                Some(at) if i >= at => SWITCH_ID_OFFSET,
                _ => 0,
            };
            recording
                .cycles
                .push(Cycle::new(t, self.visible_objects(t, ego_x, id_base)));

            if let Some(camera) = cfg.camera {
                // Camera geometry is in the ego frame at the timeframe's own time
                if i > 0 && cfg.camera_lead_us < cfg.period_us {
                    let tf = t - cfg.camera_lead_us;
                    let objects = self.visible_objects(tf, self.ego_x(tf), CAMERA_ID_OFFSET);
                    recording
                        .sensor_frames
                        .push(camera, Timeframe::new(tf, objects));
                }
            }
        }

        debug!(
            class = %cfg.object_class,
            cycles = recording.cycles.len(),
            objects = recording.object_count(),
            "mock recording generated"
        );
        recording
    }

    fn ego_x(&self, t: Timestamp) -> f64 {
        self.config.speed_mps * t as f64 / 1e6
    }

    fn visible_objects(&self, t: Timestamp, ego_x: f64, id_base: u32) -> Vec<DetectedObject> {
        let cfg = &self.config;
        (0..cfg.marker_count)
            .filter_map(|k| {
                let x = cfg.marker_spacing_m * (k + 1) as f64 - ego_x;
                if x.abs() > cfg.view_range_m {
                    return None;
                }
                let geometry = marker_geometry(cfg.object_class, x, cfg.lateral_offset_m);
                Some(DetectedObject::with_class(
                    cfg.object_class,
                    id_base + k as u32 + 1,
                    t,
                    geometry,
                ))
            })
            .collect()
    }
}

/// Geometry centered on `(cx, cy)` with the point count of `class`
fn marker_geometry(class: ObjectClass, cx: f64, cy: f64) -> Vec<Point2> {
    match class.expected_points() {
        2 => vec![Point2::new(cx, cy - 0.5), Point2::new(cx, cy + 0.5)],
        _ => vec![
            Point2::new(cx - 0.25, cy - 0.25),
            Point2::new(cx + 0.25, cy - 0.25),
            Point2::new(cx + 0.25, cy + 0.25),
            Point2::new(cx - 0.25, cy + 0.25),
        ],
    }
}

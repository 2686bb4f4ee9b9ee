//! Timeframe synchronizer over all cameras.

use contracts::{CameraId, DetectedObject, SensorFrames, SyncConfig, Timestamp};
use tracing::instrument;

use crate::window::find_matching_index_with_tolerance;

/// Current-cycle candidate drawn from a selected camera timeframe
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub camera: CameraId,
    /// Index of the selected timeframe in the camera stream
    pub frame_index: usize,
    /// Timestamp of that timeframe; the object geometry is in its ego frame
    pub timestamp: Timestamp,
    /// Index of the object inside that timeframe
    pub object_index: usize,
    pub object: &'a DetectedObject,
}

/// Result of one window selection
#[derive(Debug, Clone, Default)]
pub struct WindowSelection<'a> {
    selected: [Option<usize>; CameraId::COUNT],
    candidates: Vec<Candidate<'a>>,
    missing: Vec<CameraId>,
}

impl<'a> WindowSelection<'a> {
    /// Selected timeframe index of `camera`
    #[inline]
    pub fn frame_index(&self, camera: CameraId) -> Option<usize> {
        self.selected[camera.index()]
    }

    #[inline]
    pub fn is_missing(&self, camera: CameraId) -> bool {
        self.selected[camera.index()].is_none()
    }

    /// Cameras without a timeframe in the window, canonical order
    pub fn missing_cameras(&self) -> &[CameraId] {
        &self.missing
    }

    /// Cameras that contributed a timeframe
    pub fn selected_cameras(&self) -> impl Iterator<Item = CameraId> + '_ {
        CameraId::ALL
            .into_iter()
            .filter(move |camera| !self.is_missing(*camera))
    }

    /// Merged candidates, camera order then object order
    pub fn candidates(&self) -> &[Candidate<'a>] {
        &self.candidates
    }

    /// True when no candidate object is available
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Multi-camera timeframe synchronizer
#[derive(Debug, Clone, Default)]
pub struct TimeframeSynchronizer {
    config: SyncConfig,
}

impl TimeframeSynchronizer {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Select the matching timeframe of every camera
    ///
    /// Cameras with no frame in the window are recorded as missing and
    /// contribute no candidates.
    #[instrument(
        name = "sync_engine_select",
        level = "trace",
        skip(self, frames),
        fields(t_cur = t_cur, t_prev = t_prev)
    )]
    pub fn select<'a>(
        &self,
        t_cur: Timestamp,
        t_prev: Timestamp,
        frames: &'a SensorFrames,
    ) -> WindowSelection<'a> {
        let mut selection = WindowSelection::default();

        for (camera, stream) in frames.iter() {
            let found =
                find_matching_index_with_tolerance(t_cur, t_prev, stream, self.config.tolerance_us);

            let frame_index = match found {
                Some(idx) => idx,
                None => {
                    selection.missing.push(camera);
                    continue;
                }
            };

            selection.selected[camera.index()] = Some(frame_index);
            let timeframe = &stream[frame_index];
            selection.candidates.extend(timeframe.objects.iter().enumerate().map(
                |(object_index, object)| Candidate {
                    camera,
                    frame_index,
                    timestamp: timeframe.timestamp,
                    object_index,
                    object,
                },
            ));
        }

        self.record_selection_metrics(&selection);
        tracing::trace!(
            candidates = selection.candidates.len(),
            missing = ?selection.missing,
            "camera window selected"
        );

        selection
    }

    fn record_selection_metrics(&self, selection: &WindowSelection<'_>) {
        for camera in &selection.missing {
            metrics::counter!(
                "idtrack_missing_camera_total",
                "camera" => camera.as_str()
            )
            .increment(1);
        }
        metrics::histogram!("idtrack_window_candidates").record(selection.candidates.len() as f64);
    }
}

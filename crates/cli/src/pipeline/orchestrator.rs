//! Evaluation pipeline orchestrator.
//!
//! Loads the recording, builds the ego-motion source from its odometry and
//! drives the evaluator over every cycle pair.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use association::IdMaintenanceEvaluator;
use contracts::{EngineConfig, EvaluationReport, ObjectClass, Recording};
use ego_motion::EgoMotionStream;
use ingestion::{MockRecording, RecordingReader};
use observability::AssociationMetricsAggregator;
use tracing::{info, instrument, warn};

use super::stats::PipelineStats;
use crate::error::CliError;

/// Where the recording comes from
#[derive(Debug, Clone)]
pub enum RecordingSource {
    File(PathBuf),
    Mock(ObjectClass),
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub engine: EngineConfig,
    pub source: RecordingSource,
}

/// Evaluation pipeline
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the evaluation and collect statistics
    #[instrument(name = "pipeline_run", skip(self))]
    pub fn run(&self) -> Result<(EvaluationReport, PipelineStats)> {
        let start = Instant::now();
        let recording = self.load_recording()?;

        if recording.odometry.len() < 2 {
            warn!(
                samples = recording.odometry.len(),
                "recording has too little odometry, every cycle will be skipped"
            );
        }

        let motion = EgoMotionStream::new(recording.odometry.clone());
        let evaluator = IdMaintenanceEvaluator::new(self.config.engine.clone());
        let report = evaluator.evaluate(&recording, &motion);

        observability::record_evaluation_metrics(&report);

        let stats = PipelineStats {
            duration: start.elapsed(),
            cycles: recording.cycles.len(),
            objects: recording.object_count(),
            camera_frames: recording.sensor_frames.total_frames(),
            metrics: AssociationMetricsAggregator::from_report(&report),
        };

        info!(
            duration_ms = stats.duration.as_millis() as u64,
            verdict = ?report.verdict(),
            "Evaluation finished"
        );

        Ok((report, stats))
    }

    fn load_recording(&self) -> Result<Recording> {
        match &self.config.source {
            RecordingSource::File(path) => {
                if !path.exists() {
                    return Err(CliError::recording_not_found(path.display().to_string()).into());
                }
                RecordingReader::load_from_path(path)
                    .with_context(|| format!("Failed to load recording from {}", path.display()))
            }
            RecordingSource::Mock(class) => {
                info!(class = %class, "Generating mock recording");
                Ok(MockRecording::for_class(*class).generate())
            }
        }
    }
}

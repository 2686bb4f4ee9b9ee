//! Recording reader

use std::io::Read;
use std::path::Path;

use contracts::{ContractError, Recording};
use tracing::{debug, info, instrument};

use crate::validate;

/// Loads recordings from JSON
///
/// Every loaded recording is validated before it is returned.
pub struct RecordingReader;

impl RecordingReader {
    /// Load a recording from a JSON file
    #[instrument(name = "recording_load", skip_all, fields(path = %path.display()))]
    pub fn load_from_path(path: &Path) -> Result<Recording, ContractError> {
        let content = std::fs::read_to_string(path)?;
        let mut recording = Self::load_from_str(&content)?;
        if recording.name.is_empty() {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                recording.name = stem.to_string();
            }
        }
        Ok(recording)
    }

    /// Load a recording from any reader
    pub fn load_from_reader<R: Read>(reader: R) -> Result<Recording, ContractError> {
        let recording: Recording =
            serde_json::from_reader(reader).map_err(Self::parse_error)?;
        Self::accept(recording)
    }

    /// Load a recording from a JSON string
    pub fn load_from_str(content: &str) -> Result<Recording, ContractError> {
        let recording: Recording = serde_json::from_str(content).map_err(Self::parse_error)?;
        Self::accept(recording)
    }

    /// Serialize a recording to pretty JSON
    pub fn to_json(recording: &Recording) -> Result<String, ContractError> {
        serde_json::to_string_pretty(recording)
            .map_err(|e| ContractError::recording_parse(format!("JSON serialize error: {e}")))
    }

    fn parse_error(e: serde_json::Error) -> ContractError {
        metrics::counter!("idtrack_recordings_loaded_total", "status" => "parse_error")
            .increment(1);
        ContractError::RecordingParse {
            message: format!("JSON parse error: {e}"),
            source: Some(Box::new(e)),
        }
    }

    fn accept(recording: Recording) -> Result<Recording, ContractError> {
        if let Err(e) = validate::validate(&recording) {
            debug!(error = %e, "recording rejected");
            metrics::counter!("idtrack_recordings_loaded_total", "status" => "invalid")
                .increment(1);
            return Err(e);
        }

        metrics::counter!("idtrack_recordings_loaded_total", "status" => "ok").increment(1);
        info!(
            name = %recording.name,
            class = %recording.object_class,
            cycles = recording.cycles.len(),
            camera_frames = recording.sensor_frames.total_frames(),
            odometry = recording.odometry.len(),
            "recording loaded"
        );
        Ok(recording)
    }
}

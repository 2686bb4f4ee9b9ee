//! # Ingestion
//!
//! Recording ingestion module.
//!
//! Responsibilities:
//! - Load a `Recording` from JSON (file, string or reader)
//! - Validate ordering, object classes and geometry
//! - Generate mock recordings for tests
//!
//! ## Usage Example
//!
//! ```no_run
//! use ingestion::RecordingReader;
//! use std::path::Path;
//!
//! let recording = RecordingReader::load_from_path(Path::new("drive.json")).unwrap();
//! println!("{} cycles", recording.cycles.len());
//! ```
//!
//! ## Mock Testing
//!
//! ```
//! use contracts::ObjectClass;
//! use ingestion::MockRecording;
//!
//! let recording = MockRecording::for_class(ObjectClass::StopLine).generate();
//! assert!(ingestion::validate(&recording).is_ok());
//! ```

mod mock;
mod reader;
mod validate;

// Re-exports
pub use contracts::Recording;
pub use mock::{MockRecording, MockRecordingConfig};
pub use reader::RecordingReader;
pub use validate::validate;

//! EvaluationReport - ID maintenance evaluator output
//!
//! Per-cycle identifier checks and run totals.

use serde::{Deserialize, Serialize};

use crate::{CameraId, ObjectClass, Timestamp};

/// Identifier comparison for one associated pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdCheck {
    /// Index into the previous cycle's object list
    pub prev_index: usize,
    /// Index into the current cycle's object list
    pub cur_index: usize,
    pub previous_id: u32,
    pub current_id: u32,
    /// Association distance (meters)
    pub distance: f64,
    pub passed: bool,
}

/// Why a cycle pair was not evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Previous or current cycle reported no objects
    EmptyObjects,
    /// No ego motion available for the interval
    NoMotion,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::EmptyObjects => "empty_objects",
            SkipReason::NoMotion => "no_motion",
        }
    }
}

/// Outcome of one cycle pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleOutcome {
    Evaluated {
        checks: Vec<IdCheck>,
        /// Previous objects refined by a camera candidate
        merged: usize,
        missing_cameras: Vec<CameraId>,
    },
    Skipped {
        reason: SkipReason,
    },
}

/// Report for the (index - 1, index) cycle pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Index of the current cycle
    pub index: usize,
    pub t_prev: Timestamp,
    pub t_cur: Timestamp,
    pub outcome: CycleOutcome,
}

impl CycleReport {
    pub fn checks(&self) -> &[IdCheck] {
        match &self.outcome {
            CycleOutcome::Evaluated { checks, .. } => checks,
            CycleOutcome::Skipped { .. } => &[],
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &IdCheck> {
        self.checks().iter().filter(|c| !c.passed)
    }

    pub fn is_evaluated(&self) -> bool {
        matches!(self.outcome, CycleOutcome::Evaluated { .. })
    }
}

/// Overall verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// At least one check and no identifier mismatch
    Passed,
    /// At least one identifier mismatch
    Failed,
    /// No associated pair was ever checked
    NotEvaluated,
}

/// Run report over a whole recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub recording: String,
    pub object_class: ObjectClass,
    pub radius: f64,
    pub cycles: Vec<CycleReport>,
}

impl EvaluationReport {
    pub fn new(recording: impl Into<String>, object_class: ObjectClass, radius: f64) -> Self {
        Self {
            recording: recording.into(),
            object_class,
            radius,
            cycles: Vec::new(),
        }
    }

    pub fn evaluated_cycles(&self) -> usize {
        self.cycles.iter().filter(|c| c.is_evaluated()).count()
    }

    pub fn skipped_cycles(&self) -> usize {
        self.cycles.len() - self.evaluated_cycles()
    }

    pub fn total_checks(&self) -> usize {
        self.cycles.iter().map(|c| c.checks().len()).sum()
    }

    pub fn total_failures(&self) -> usize {
        self.cycles.iter().map(|c| c.failures().count()).sum()
    }

    pub fn verdict(&self) -> Verdict {
        if self.total_failures() > 0 {
            Verdict::Failed
        } else if self.total_checks() == 0 {
            Verdict::NotEvaluated
        } else {
            Verdict::Passed
        }
    }
}

#![deny(missing_docs)]
//! Machine inspection core library.
//!
//! This crate contains the report domain types and the scoring engine that
//! turns checkpoint conditions into unit scores, an overall score and a
//! rating.

pub mod checklist;
pub mod domain;
pub mod engine;
pub mod error;
pub mod report;
pub mod session;
pub mod source;

pub use checklist::{ChecklistTemplate, SubUnitTemplate, UnitTemplate, build_draft};
pub use domain::{
    Checkpoint, Condition, ConditionValue, Rating, Report, ReportMetadata, ReportStatus, SubUnit,
    Unit,
};
pub use engine::{
    CheckpointScore, UnitSummary, answered_checkpoints, calculate_scores, classify_rating,
    compute_overall_score, compute_unit_score, score_checkpoint_condition, summarize_unit,
};
pub use error::{InspectionError, Result};
pub use report::{
    LoadStatus, ScoreRun, condition_text, render_json, render_report_markdown,
    render_score_markdown,
};
pub use session::{InspectorRole, InspectorSession};
pub use source::{ReportSource, StdReportSource, load_scored};

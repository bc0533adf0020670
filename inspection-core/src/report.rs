//! Scoring run records and report formatting.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{Checkpoint, ConditionValue, Report, Unit};
use crate::engine::{UnitSummary, calculate_scores, summarize_unit};

/// Status of loading a report file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum LoadStatus {
    /// Load has not started.
    Pending,
    /// Report was loaded and scored.
    Loaded,
    /// Load failed with an error message.
    Failed(String),
}

/// Outcome of scoring one report file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRun {
    /// Report source (usually the file path as given).
    pub source: String,
    /// Path the report was read from.
    pub path: PathBuf,
    /// Load status.
    pub load_status: LoadStatus,
    /// Scored report, when loading succeeded.
    pub report: Option<Report>,
    /// Per-unit answer counts.
    pub units: Vec<UnitSummary>,
    /// Errors encountered after loading, such as a failed write-back.
    pub errors: Vec<String>,
}

impl ScoreRun {
    /// Create a pending run for a report file.
    pub fn new(source: String, path: PathBuf) -> Self {
        Self {
            source,
            path,
            load_status: LoadStatus::Pending,
            report: None,
            units: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Create a run for a report that could not be loaded.
    pub fn failed(source: String, path: PathBuf, error: impl Into<String>) -> Self {
        Self {
            source,
            path,
            load_status: LoadStatus::Failed(error.into()),
            report: None,
            units: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Score a loaded report and record the result.
    pub fn scored(path: &Path, report: &Report) -> Self {
        let scored = calculate_scores(report);
        let mut run = Self::new(path.display().to_string(), path.to_path_buf());
        run.units = scored.units.iter().map(summarize_unit).collect();
        run.report = Some(scored);
        run.load_status = LoadStatus::Loaded;
        run
    }
}

/// Render a list of scoring runs as Markdown.
pub fn render_score_markdown(runs: &[ScoreRun]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Inspection Score Report\n");
    for run in runs {
        let _ = writeln!(output, "## {}\n", run.source);
        append_load_status(&mut output, &run.load_status, &run.path);
        if let Some(report) = &run.report {
            append_overall(&mut output, report);
            append_unit_table(&mut output, &run.units);
        }
        append_errors(&mut output, &run.errors);
        let _ = writeln!(output);
    }
    output
}

/// Render a single report with every checkpoint as Markdown.
pub fn render_report_markdown(report: &Report) -> String {
    let mut output = String::new();
    let title = report.metadata.machine.as_deref().unwrap_or("Machine");
    let _ = writeln!(output, "# {title} Inspection\n");
    append_metadata(&mut output, report);
    append_overall(&mut output, report);
    for unit in &report.units {
        append_unit_detail(&mut output, unit);
    }
    output
}

/// Render any serializable report payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

/// Display text for a checkpoint condition.
pub fn condition_text(condition: &ConditionValue) -> String {
    match condition {
        ConditionValue::Unset => "unanswered".to_string(),
        ConditionValue::Recognized(condition) => condition.label().to_string(),
        ConditionValue::Unrecognized(raw) => format!("unrecognized ({raw})"),
    }
}

fn append_load_status(output: &mut String, status: &LoadStatus, path: &Path) {
    let _ = writeln!(output, "- Path: `{}`", path.display());
    match status {
        LoadStatus::Loaded => {
            let _ = writeln!(output, "- Status: scored");
        }
        LoadStatus::Pending => {
            let _ = writeln!(output, "- Status: pending");
        }
        LoadStatus::Failed(error) => {
            let _ = writeln!(output, "- Status: failed ({error})");
        }
    }
    let _ = writeln!(output);
}

fn append_metadata(output: &mut String, report: &Report) {
    let metadata = &report.metadata;
    let fields = [
        ("Machine ID", metadata.machine_id.as_deref()),
        ("Customer", metadata.customer.as_deref()),
        ("Buyer", metadata.buyer.as_deref()),
        ("Seller", metadata.seller.as_deref()),
        ("Control station", metadata.control_station.as_deref()),
        ("Inspector", metadata.inspector.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            let _ = writeln!(output, "- {label}: {value}");
        }
    }
    if let Some(date) = metadata.inspected_on {
        let _ = writeln!(output, "- Inspected on: {date}");
    }
    let _ = writeln!(output);
}

fn append_overall(output: &mut String, report: &Report) {
    let _ = writeln!(
        output,
        "**Overall score:** {}% ({})\n",
        report.overall_score, report.overall_rating
    );
}

fn append_unit_table(output: &mut String, units: &[UnitSummary]) {
    if units.is_empty() {
        let _ = writeln!(output, "### Units\nNo units in report.\n");
        return;
    }
    let _ = writeln!(output, "### Units");
    let _ = writeln!(output, "| Unit | Score | Answered | Unrecognized |");
    let _ = writeln!(output, "| --- | --- | --- | --- |");
    for unit in units {
        let _ = writeln!(
            output,
            "| {} | {}% | {}/{} | {} |",
            unit.name, unit.score, unit.answered, unit.total, unit.unrecognized
        );
    }
    let _ = writeln!(output);
}

fn append_unit_detail(output: &mut String, unit: &Unit) {
    let _ = writeln!(output, "## {} ({}%)\n", unit.name, unit.unit_score);
    append_checkpoints(output, &unit.checkpoints);
    for sub_unit in &unit.sub_units {
        let _ = writeln!(output, "### {}", sub_unit.name);
        append_checkpoints(output, &sub_unit.checkpoints);
    }
}

fn append_checkpoints(output: &mut String, checkpoints: &[Checkpoint]) {
    if checkpoints.is_empty() {
        return;
    }
    for checkpoint in checkpoints {
        let condition = condition_text(&checkpoint.condition);
        if checkpoint.remarks.trim().is_empty() {
            let _ = writeln!(output, "- {}: {condition}", checkpoint.name);
        } else {
            let _ = writeln!(
                output,
                "- {}: {condition} ({})",
                checkpoint.name,
                checkpoint.remarks.trim()
            );
        }
    }
    let _ = writeln!(output);
}

fn append_errors(output: &mut String, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    let _ = writeln!(output, "### Errors");
    for error in errors {
        let _ = writeln!(output, "- {error}");
    }
    let _ = writeln!(output);
}

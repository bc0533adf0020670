//! Report storage abstractions used by batch scoring.

use std::path::{Path, PathBuf};

use crate::domain::Report;
use crate::engine::calculate_scores;
use crate::error::Result;

/// Abstraction over report files for testability.
#[cfg_attr(test, mockall::automock)]
pub trait ReportSource {
    /// List the `.json` report files directly inside a directory, sorted.
    fn list_reports(&self, dir: &Path) -> Result<Vec<PathBuf>>;
    /// Read and parse a report.
    fn read_report(&self, path: &Path) -> Result<Report>;
    /// Write a report as pretty JSON, creating parent directories.
    fn write_report(&self, path: &Path, report: &Report) -> Result<()>;
}

/// Default report source backed by `std::fs`.
#[derive(Debug, Default, Clone)]
pub struct StdReportSource;

impl StdReportSource {
    /// Create a new standard report source.
    pub fn new() -> Self {
        Self
    }
}

impl ReportSource for StdReportSource {
    fn list_reports(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut reports = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if is_hidden(&path) || !entry.file_type()?.is_file() {
                continue;
            }
            if is_json(&path) {
                reports.push(path);
            }
        }
        reports.sort();
        Ok(reports)
    }

    fn read_report(&self, path: &Path) -> Result<Report> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_report(&self, path: &Path, report: &Report) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(report)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Read a report and run the scoring engine over it.
pub fn load_scored<S: ReportSource + ?Sized>(source: &S, path: &Path) -> Result<Report> {
    let report = source.read_report(path)?;
    Ok(calculate_scores(&report))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::{MockReportSource, ReportSource, StdReportSource, load_scored};
    use crate::domain::{Checkpoint, Condition, Rating, Report, ReportMetadata, Unit};
    use crate::error::InspectionError;
    use std::path::{Path, PathBuf};

    fn sample_report() -> Report {
        let mut unit = Unit::new("Engine");
        unit.checkpoints = vec![
            Checkpoint::new("1.0.1", "Oil").with_condition(Condition::Good),
            Checkpoint::new("1.0.2", "Belt").with_condition(Condition::Better),
        ];
        Report::draft(ReportMetadata::default(), vec![unit])
    }

    #[test]
    fn std_source_lists_reads_and_writes_reports() {
        let root = std::env::temp_dir().join(unique_dir_name());
        std::fs::create_dir_all(root.join("nested")).expect("create temp dir");
        std::fs::write(root.join("notes.txt"), "ignore me").expect("write notes");
        std::fs::write(root.join(".hidden.json"), "{}").expect("write hidden");

        let source = StdReportSource::new();
        let b_path = root.join("b.json");
        let a_path = root.join("a.JSON");
        source
            .write_report(&b_path, &sample_report())
            .expect("write b");
        source
            .write_report(&a_path, &sample_report())
            .expect("write a");

        let files = source.list_reports(&root).expect("list reports");
        assert_eq!(files, vec![a_path.clone(), b_path.clone()]);

        let report = source.read_report(&b_path).expect("read report");
        assert_eq!(report, sample_report());

        std::fs::remove_dir_all(&root).expect("cleanup temp dir");
    }

    #[test]
    fn write_report_creates_parent_dirs() {
        let root = std::env::temp_dir().join(unique_dir_name());
        let path = root.join("out/scored/report.json");

        StdReportSource::new()
            .write_report(&path, &sample_report())
            .expect("write report");

        assert!(path.is_file());
        std::fs::remove_dir_all(&root).expect("cleanup temp dir");
    }

    #[test]
    fn load_scored_runs_engine() {
        let mut source = MockReportSource::new();
        source
            .expect_read_report()
            .withf(|path: &Path| path == Path::new("report.json"))
            .times(1)
            .returning(|_| Ok(sample_report()));

        let report = load_scored(&source, Path::new("report.json")).expect("scored");

        assert_eq!(report.units[0].unit_score, 90);
        assert_eq!(report.overall_score, 90);
        assert_eq!(report.overall_rating, Rating::Good);
    }

    #[test]
    fn load_scored_propagates_read_errors() {
        let mut source = MockReportSource::new();
        source
            .expect_read_report()
            .returning(|_| Err(InspectionError::Other("unreadable".to_string())));

        let error = load_scored(&source, Path::new("broken.json")).expect_err("error");
        assert_eq!(error.to_string(), "unreadable");
    }

    static UNIQUE_COUNTER: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

    fn unique_dir_name() -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time")
            .as_nanos();
        let counter = UNIQUE_COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        PathBuf::from(format!("inspection_core_test_{nanos}_{counter}"))
    }
}

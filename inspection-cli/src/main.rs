#![deny(missing_docs)]
//! Machine inspection command-line interface.
//!
//! Scores inspection report files in batches, drafts blank reports from
//! checklist templates, and exports the report schema.

mod config;
mod schema;

use chrono::NaiveDate;
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use config::CliConfig;
use inspection_core::{
    ChecklistTemplate, InspectorRole, InspectorSession, LoadStatus, ReportMetadata, ReportSource,
    ScoreRun, StdReportSource, build_draft, classify_rating, render_json, render_report_markdown,
    render_score_markdown,
};
use log::{info, warn};
use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

type SharedSource = Arc<dyn ReportSource + Send + Sync>;

#[derive(Parser)]
#[command(name = "inspection", version, about = "Machine inspection CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(&["file", "dir"])
))]
struct ReportSourceArgs {
    /// Single report JSON file to score.
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Directory of report JSON files to score.
    #[arg(long)]
    dir: Option<PathBuf>,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output format for report data.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
    /// Include every checkpoint in Markdown output.
    #[arg(long)]
    detail: bool,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum RoleArg {
    Inspector,
    Admin,
    Viewer,
}

impl From<RoleArg> for InspectorRole {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Inspector => InspectorRole::Inspector,
            RoleArg::Admin => InspectorRole::Admin,
            RoleArg::Viewer => InspectorRole::Viewer,
        }
    }
}

#[derive(Args, Clone, Debug)]
struct DraftArgs {
    /// Checklist template JSON (units, sub-units and questions).
    #[arg(long)]
    template: PathBuf,
    /// Where to write the draft report.
    #[arg(short, long)]
    output: PathBuf,
    /// Machine display name.
    #[arg(long)]
    machine: Option<String>,
    /// Machine serial or registry identifier.
    #[arg(long)]
    machine_id: Option<String>,
    /// Buyer name.
    #[arg(long)]
    buyer: Option<String>,
    /// Seller name.
    #[arg(long)]
    seller: Option<String>,
    /// Control station performing the inspection.
    #[arg(long)]
    control_station: Option<String>,
    /// Customer name.
    #[arg(long)]
    customer: Option<String>,
    /// Inspection date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    inspected_on: Option<NaiveDate>,
    /// Inspector name; defaults to INSPECTION_INSPECTOR.
    #[arg(long)]
    inspector: Option<String>,
    /// Inspector role; defaults to INSPECTION_ROLE.
    #[arg(long, value_enum)]
    role: Option<RoleArg>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score report files and print unit scores, overall score and rating.
    Score {
        #[command(flatten)]
        source: ReportSourceArgs,
        /// Maximum number of reports scored concurrently.
        #[arg(short = 'j', long)]
        concurrency: Option<usize>,
        #[command(flatten)]
        report: OutputArgs,
        /// Write scored reports back to their files.
        #[arg(long)]
        write_back: bool,
    },
    /// Create an unanswered report from a checklist template.
    Draft(DraftArgs),
    /// Print the rating for an overall score.
    Rate {
        /// Overall score, 0-100.
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        score: u8,
    },
    /// Print the OpenAPI schema of the report types.
    Schema,
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let config = CliConfig::load()?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            source,
            concurrency,
            report,
            write_back,
        } => {
            let source = resolve_source_args(&source)?;
            let concurrency = concurrency.unwrap_or(config.concurrency);
            let reports: SharedSource = Arc::new(StdReportSource::new());
            run_score(source, reports, concurrency, report, write_back).await?
        }
        Commands::Draft(args) => run_draft(args, &config).await?,
        Commands::Rate { score } => println!("{}", classify_rating(score)),
        Commands::Schema => println!("{}", schema::render_schema()?),
    }

    Ok(())
}

#[cfg(test)]
fn main() {}

enum ScoreSource {
    File(PathBuf),
    Dir(PathBuf),
}

fn resolve_source_args(source: &ReportSourceArgs) -> CliResult<ScoreSource> {
    if let Some(file) = source.file.clone() {
        return Ok(ScoreSource::File(file));
    }
    if let Some(dir) = source.dir.clone() {
        return Ok(ScoreSource::Dir(dir));
    }
    Err("no report source provided".into())
}

fn load_report_paths(source: ScoreSource, reports: &dyn ReportSource) -> CliResult<Vec<PathBuf>> {
    match source {
        ScoreSource::File(path) => Ok(vec![path]),
        ScoreSource::Dir(dir) => Ok(reports.list_reports(&dir)?),
    }
}

async fn run_score(
    source: ScoreSource,
    reports: SharedSource,
    concurrency: usize,
    output: OutputArgs,
    write_back: bool,
) -> CliResult<()> {
    let paths = load_report_paths(source, reports.as_ref())?;
    if paths.is_empty() {
        println!("No reports found to score.");
        return Ok(());
    }

    let concurrency = if concurrency == 0 { 1 } else { concurrency };
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();

    for path in paths {
        let permit = semaphore.clone().acquire_owned().await?;
        let reports = reports.clone();
        tasks.spawn(async move {
            let _permit = permit;
            let target = path.clone();
            let scoring = tokio::task::spawn_blocking(move || {
                score_target(path, reports.as_ref(), write_back)
            });
            match scoring.await {
                Ok(run) => run,
                Err(err) => ScoreRun::failed(target.display().to_string(), target, err.to_string()),
            }
        });
    }

    let mut runs = Vec::new();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(run) => runs.push(run),
            Err(err) => runs.push(score_run_from_task_error(err)),
        }
    }
    runs.sort_by(|a, b| a.path.cmp(&b.path));

    info!("scored {} report(s)", runs.len());
    emit_score_runs(&runs, &output).await
}

fn score_target(path: PathBuf, reports: &dyn ReportSource, write_back: bool) -> ScoreRun {
    let report = match reports.read_report(&path) {
        Ok(report) => report,
        Err(err) => {
            warn!("failed to load {}: {err}", path.display());
            return ScoreRun::failed(path.display().to_string(), path, err.to_string());
        }
    };

    let mut run = ScoreRun::scored(&path, &report);
    if write_back {
        if let Some(scored) = &run.report {
            if let Err(err) = reports.write_report(&path, scored) {
                run.errors.push(format!("write-back: {err}"));
            }
        }
    }
    run
}

fn score_run_from_task_error(error: tokio::task::JoinError) -> ScoreRun {
    ScoreRun::failed("unknown".to_string(), PathBuf::from("."), error.to_string())
}

async fn run_draft(args: DraftArgs, config: &CliConfig) -> CliResult<()> {
    let session = resolve_session(&args, config)?;
    let contents = tokio::fs::read_to_string(&args.template).await?;
    let template = ChecklistTemplate::from_json(&contents)?;
    let metadata = ReportMetadata {
        machine: args.machine,
        machine_id: args.machine_id,
        buyer: args.buyer,
        seller: args.seller,
        control_station: args.control_station,
        customer: args.customer,
        inspector: None,
        inspected_on: args.inspected_on,
        notes: None,
    };

    let report = build_draft(&template, metadata, &session)?;
    StdReportSource::new().write_report(&args.output, &report)?;
    println!(
        "Drafted report with {} checkpoint(s) at {}.",
        template.question_count(),
        args.output.display()
    );
    Ok(())
}

fn resolve_session(args: &DraftArgs, config: &CliConfig) -> CliResult<InspectorSession> {
    let inspector = args
        .inspector
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| config.inspector.clone())
        .ok_or("inspector name required (--inspector or INSPECTION_INSPECTOR)")?;
    let role = args.role.map(InspectorRole::from).unwrap_or(config.role);
    Ok(InspectorSession::new(inspector, role))
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("invalid date '{value}': {err}"))
}

async fn emit_score_runs(runs: &[ScoreRun], output: &OutputArgs) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => render_score_text(runs),
        OutputFormat::Markdown => {
            let mut contents = render_score_markdown(runs);
            if output.detail {
                for report in runs.iter().filter_map(|run| run.report.as_ref()) {
                    contents.push_str(&render_report_markdown(report));
                }
            }
            contents
        }
        OutputFormat::Json => render_json(runs)?,
    };
    emit_output(output, contents).await
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.report_output {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
    } else {
        print!("{contents}");
    }
    Ok(())
}

fn render_score_text(runs: &[ScoreRun]) -> String {
    let mut output = String::new();
    for run in runs {
        let _ = writeln!(output, "Source: {}", run.source);
        match &run.load_status {
            LoadStatus::Loaded => {
                let _ = writeln!(output, "Status: scored");
            }
            LoadStatus::Failed(error) => {
                let _ = writeln!(output, "Status: failed ({error})");
                let _ = writeln!(output);
                continue;
            }
            LoadStatus::Pending => {
                let _ = writeln!(output, "Status: pending");
                let _ = writeln!(output);
                continue;
            }
        }

        if let Some(report) = &run.report {
            let _ = writeln!(
                output,
                "Overall: {}% ({})",
                report.overall_score, report.overall_rating
            );
        }

        if run.units.is_empty() {
            let _ = writeln!(output, "Units: none");
        } else {
            let _ = writeln!(output, "Units:");
            for unit in &run.units {
                let _ = writeln!(
                    output,
                    "- {}: {}% ({}/{} answered)",
                    unit.name, unit.score, unit.answered, unit.total
                );
                if unit.unrecognized > 0 {
                    let _ = writeln!(
                        output,
                        "  {} unrecognized condition(s) ignored",
                        unit.unrecognized
                    );
                }
            }
        }

        if !run.errors.is_empty() {
            let _ = writeln!(output, "Errors:");
            for error in &run.errors {
                let _ = writeln!(output, "- {error}");
            }
        }

        let _ = writeln!(output);
    }
    output
}

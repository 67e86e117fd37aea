use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

mod aggregate;
mod analyzer;
mod classifier;
mod config;
mod error;
mod ingest;
mod logging;
mod models;
mod phrases;
mod report;
mod segment;
mod sentiment;
mod split;
mod topic;

use crate::analyzer::RecordAnalyzer;
use crate::classifier::Classifiers;
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::logging::{LogFormat, LogLevel};

#[derive(Parser)]
#[command(name = "feedback-analyzer")]
#[command(about = "Sentiment and topic analysis for course feedback surveys", long_about = None)]
struct Cli {
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    log_level: LogLevel,

    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a feedback CSV and emit the summary with per-response results
    Analyze {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Split a feedback CSV into one file per instructor
    Split {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = "instructor_data")]
        out_dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level, cli.log_format);

    if let Err(err) = run(cli) {
        let code = err
            .downcast_ref::<AnalyzerError>()
            .map_or(1, AnalyzerError::exit_code);
        tracing::error!(error = %format!("{err:#}"), "run failed");
        println!("{}", serde_json::json!({ "error": err.to_string() }));
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Analyze { csv, format, out } => {
            let config = AnalyzerConfig::load(cli.config.as_deref())?;
            analyze(&config, &csv, format, out)
        }
        Commands::Split { csv, out_dir } => {
            let files = split::split_by_instructor(&csv, &out_dir)?;
            for file in &files {
                tracing::info!(instructor = %file.instructor, rows = file.rows, "instructor split");
                println!("Created: {} ({} responses)", file.path.display(), file.rows);
            }
            println!("Successfully split into {} instructor files", files.len());
            Ok(())
        }
    }
}

fn analyze(
    config: &AnalyzerConfig,
    csv: &std::path::Path,
    format: OutputFormat,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let run_id = Uuid::new_v4();
    tracing::info!(%run_id, csv = %csv.display(), "analysis started");

    // classifiers must be ready before the first record is read
    let classifiers = Classifiers::init(&config.classifier)?;
    let records = ingest::read_feedback_csv(csv)?;

    let results = RecordAnalyzer::new(&classifiers).analyze_all(&records);
    if results.is_empty() {
        return Err(AnalyzerError::NoValidFeedback.into());
    }

    let summary = aggregate::summarize(&results);
    let report = report::build_report(run_id, summary, &results, config.output.preview_chars);

    let rendered = match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&report).context("failed to serialize report")?
        }
        OutputFormat::Markdown => report::render_markdown(&report),
    };

    match out {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(%run_id, path = %path.display(), "report written");
        }
        None => println!("{rendered}"),
    }

    tracing::info!(
        %run_id,
        rows = records.len(),
        analyzed = results.len(),
        "analysis finished"
    );
    Ok(())
}

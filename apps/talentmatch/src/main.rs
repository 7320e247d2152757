//! talentmatch CLI: rank a batch of resumes against a job description.
//!
//! Reads the ranking service URL from `TALENTMATCH_API_URL` (or `.env`), submits one
//! scan, prints the summary and rankings, and optionally writes a CSV report.

mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use talentmatch::config::Config;
use talentmatch::models::{Criterion, PriorityLevel};
use talentmatch::results::{write_report, TopN, DEFAULT_REPORT_NAME};
use talentmatch::scan_client::ScanClient;
use talentmatch::session::{ScanOutcome, ScanSession};

/// Rank resumes against a job description using the TalentMatch ranking service.
///
/// Examples:
///   talentmatch -j "Senior Backend Engineer" a.pdf b.pdf
///   talentmatch --job-description-file jd.txt --skills Critical --top 10 cvs/*.pdf
///   talentmatch -j "Data Engineer" --export report.csv *.pdf
#[derive(Parser, Debug)]
#[command(name = "talentmatch")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    /// Resume documents (PDF) to rank. Files sharing a name with an earlier one are skipped.
    #[arg(value_name = "RESUMES")]
    resumes: Vec<PathBuf>,

    /// Job description text
    #[arg(short = 'j', long, conflicts_with = "job_description_file")]
    job_description: Option<String>,

    /// Read the job description from a file
    #[arg(long, value_name = "PATH")]
    job_description_file: Option<PathBuf>,

    /// Weight of skills match (Ignore | Low | Medium | High | Critical)
    #[arg(long, default_value = "Medium")]
    skills: PriorityLevel,

    /// Weight of years of experience
    #[arg(long, default_value = "Medium")]
    experience: PriorityLevel,

    /// Weight of education
    #[arg(long, default_value = "Medium")]
    education: PriorityLevel,

    /// Weight of semantic relevance
    #[arg(long, default_value = "Medium")]
    relevance: PriorityLevel,

    /// Number of top candidates to keep (1-20)
    #[arg(short = 't', long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=20))]
    top: u8,

    /// Write the ranked candidates as CSV (defaults to TalentMatch_Report.csv)
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = DEFAULT_REPORT_NAME)]
    export: Option<PathBuf>,

    /// Show every matched skill instead of the first four
    #[arg(long)]
    expand_all: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on a missing or malformed service URL)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting TalentMatch client v{}", env!("CARGO_PKG_VERSION"));

    let client = ScanClient::new(&config).context("Failed to build HTTP client")?;
    info!("Ranking service endpoint: {}", client.endpoint());

    let mut session = ScanSession::new(Arc::new(client));

    let job_description = match (&cli.job_description, &cli.job_description_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read job description from {}", path.display()))?,
        (None, None) => String::new(),
    };
    session.set_job_description(job_description);
    session.add_paths(&cli.resumes).await?;

    for (criterion, level) in [
        (Criterion::Skills, cli.skills),
        (Criterion::Experience, cli.experience),
        (Criterion::Education, cli.education),
        (Criterion::Relevance, cli.relevance),
    ] {
        session.set_priority(criterion, level);
    }
    session.set_top_n(TopN::new(cli.top as usize)?);

    if let ScanOutcome::Failed = session.submit().await {
        let message = session
            .error_message()
            .unwrap_or_else(|| "Analysis failed.".to_string());
        anyhow::bail!(message);
    }

    if cli.expand_all {
        let rows = session.results().map_or(0, |r| r.len());
        for index in 0..rows {
            session.toggle_row(index);
        }
    }

    let Some(results) = session.results() else {
        return Ok(());
    };

    match session.metrics() {
        Some(metrics) => {
            println!(
                "{}\n",
                render::metrics_block(&metrics, session.priorities().active_criteria())
            );
            println!("{}", render::rankings_table(results, session.expansion()));
        }
        None => println!("The ranking service returned no candidates."),
    }

    if let Some(path) = &cli.export {
        if write_report(path, results)
            .await
            .with_context(|| format!("Failed to write report to {}", path.display()))?
        {
            println!("\nReport written to {}", path.display());
        }
    }

    Ok(())
}

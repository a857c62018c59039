//! Survey CLI - Command-line interface for the Big5 survey engine
//!
//! Commands:
//! - items: List questionnaire items from a catalog file
//! - score: Score a response set and optionally persist it to a store snapshot
//! - insights: Show display scores and highlights for five trait sums
//! - purge: Apply the retention policy to a store snapshot

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use big5_survey::error::ScoringError;
use big5_survey::store::MEMO_MAX_CHARS;
use big5_survey::types::TraitDisplays;
use big5_survey::{
    compute_highlights, compute_trait_displays, purge_old_results, Highlights, ItemCatalog,
    MemoryResultStore, ResponseSet, SurveyConfig, SurveyError, SurveyProcessor, TraitSums,
    ENGINE_VERSION,
};

/// Survey - Big Five scoring and display-normalization engine
#[derive(Parser)]
#[command(name = "survey")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Score Big Five questionnaire responses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List questionnaire items in presentation order
    Items {
        /// Item catalog (JSON array)
        #[arg(short, long)]
        catalog: PathBuf,
    },

    /// Score a response set and print the result payload
    Score {
        /// Item catalog (JSON array)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Responses file (use - for stdin)
        #[arg(short, long)]
        responses: PathBuf,

        /// Store snapshot to append the result to (created if missing)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Note attached to the stored result
        #[arg(long, default_value = "")]
        memo: String,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show display scores and highlights for five trait sums
    Insights {
        /// Trait sums in O,C,E,A,N order (e.g. 32,31,30,29,29)
        #[arg(long, value_delimiter = ',', required = true)]
        sums: Vec<u32>,
    },

    /// Scrub and delete stored results according to the retention policy
    Purge {
        /// Store snapshot to purge in place
        #[arg(long)]
        store: PathBuf,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let error = CliError::from(e);
            eprintln!(
                "{}",
                serde_json::to_string(&error).unwrap_or_else(|_| error.message.clone())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), SurveyCliError> {
    match cli.command {
        Commands::Items { catalog } => cmd_items(&catalog),

        Commands::Score {
            catalog,
            responses,
            store,
            memo,
            config,
        } => cmd_score(&catalog, &responses, store.as_deref(), &memo, config.as_deref()),

        Commands::Insights { sums } => cmd_insights(&sums),

        Commands::Purge { store, config } => cmd_purge(&store, config.as_deref()),
    }
}

fn cmd_items(catalog: &Path) -> Result<(), SurveyCliError> {
    let catalog = load_catalog(catalog)?;
    if catalog.is_empty() {
        return Err(SurveyCliError::EmptyCatalog);
    }
    let processor = SurveyProcessor::new(catalog, MemoryResultStore::new());
    println!("{}", serde_json::to_string_pretty(&processor.items())?);
    Ok(())
}

fn cmd_score(
    catalog: &Path,
    responses: &Path,
    store_path: Option<&Path>,
    memo: &str,
    config: Option<&Path>,
) -> Result<(), SurveyCliError> {
    let config = SurveyConfig::load(config)?;
    let catalog = load_catalog(catalog)?;
    let request: ScoreRequest = serde_json::from_str(&read_input(responses)?)?;

    let store = match store_path {
        Some(path) => load_store(path)?,
        None => MemoryResultStore::new(),
    };

    let processor = SurveyProcessor::with_options(catalog, store, config.payload);
    let payload = processor.score(request.responses(), memo)?;

    if let Some(path) = store_path {
        fs::write(path, processor.store().to_json()?)?;
    }

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn cmd_insights(sums: &[u32]) -> Result<(), SurveyCliError> {
    let values: [u32; 5] = sums
        .try_into()
        .map_err(|_| SurveyCliError::InvalidSums(sums.len()))?;
    let displays = compute_trait_displays(&TraitSums::new(values));
    let highlights = compute_highlights(&displays);

    let report = InsightsReport {
        trait_scores: displays,
        highlights,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_purge(store_path: &Path, config: Option<&Path>) -> Result<(), SurveyCliError> {
    let config = SurveyConfig::load(config)?;
    let store = load_store(store_path)?;

    let report = purge_old_results(&store, &config.retention, chrono::Utc::now());
    fs::write(store_path, store.to_json()?)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// Helper functions

fn read_input(path: &Path) -> Result<String, SurveyCliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn load_catalog(path: &Path) -> Result<ItemCatalog, SurveyCliError> {
    Ok(ItemCatalog::from_json(&fs::read_to_string(path)?)?)
}

fn load_store(path: &Path) -> Result<MemoryResultStore, SurveyCliError> {
    if path.exists() {
        Ok(MemoryResultStore::from_json(&fs::read_to_string(path)?)?)
    } else {
        Ok(MemoryResultStore::new())
    }
}

/// Responses either bare or wrapped in a `{"responses": ...}` request body
#[derive(Deserialize)]
#[serde(untagged)]
enum ScoreRequest {
    Wrapped { responses: ResponseSet },
    Bare(ResponseSet),
}

impl ScoreRequest {
    fn responses(&self) -> &ResponseSet {
        match self {
            ScoreRequest::Wrapped { responses } => responses,
            ScoreRequest::Bare(responses) => responses,
        }
    }
}

#[derive(Serialize)]
struct InsightsReport {
    trait_scores: TraitDisplays,
    highlights: Highlights,
}

// Error types

#[derive(Debug)]
enum SurveyCliError {
    Io(io::Error),
    Json(serde_json::Error),
    Survey(SurveyError),
    EmptyCatalog,
    InvalidSums(usize),
}

impl From<io::Error> for SurveyCliError {
    fn from(e: io::Error) -> Self {
        SurveyCliError::Io(e)
    }
}

impl From<serde_json::Error> for SurveyCliError {
    fn from(e: serde_json::Error) -> Self {
        SurveyCliError::Json(e)
    }
}

impl From<SurveyError> for SurveyCliError {
    fn from(e: SurveyError) -> Self {
        SurveyCliError::Survey(e)
    }
}

#[derive(Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<SurveyCliError> for CliError {
    fn from(e: SurveyCliError) -> Self {
        match e {
            SurveyCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            SurveyCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            SurveyCliError::Survey(SurveyError::Scoring(e @ ScoringError::EmptyCatalog)) => {
                CliError {
                    code: "EMPTY_CATALOG".to_string(),
                    message: e.to_string(),
                    hint: Some("Ensure the catalog file is a non-empty JSON array".to_string()),
                }
            }
            SurveyCliError::Survey(SurveyError::Scoring(e)) => CliError {
                code: "VALIDATION_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Answer every item with a value from 1 to 5".to_string()),
            },
            SurveyCliError::Survey(e @ SurveyError::MemoTooLong { .. }) => CliError {
                code: "VALIDATION_ERROR".to_string(),
                message: e.to_string(),
                hint: Some(format!("Keep --memo within {} characters", MEMO_MAX_CHARS)),
            },
            SurveyCliError::Survey(e) => CliError {
                code: "SURVEY_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            SurveyCliError::EmptyCatalog => CliError {
                code: "EMPTY_CATALOG".to_string(),
                message: "No personality items are registered".to_string(),
                hint: Some("Ensure the catalog file is a non-empty JSON array".to_string()),
            },
            SurveyCliError::InvalidSums(count) => CliError {
                code: "INVALID_SUMS".to_string(),
                message: format!("Expected 5 trait sums, got {}", count),
                hint: Some("Pass sums in O,C,E,A,N order".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("survey-cli-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_score_surfaces_engine_empty_catalog() {
        let catalog = catalog_file("empty-catalog.json", "[]");
        let responses = catalog_file("empty-responses.json", "{}");

        let err = cmd_score(&catalog, &responses, None, "", None).unwrap_err();
        assert!(matches!(
            err,
            SurveyCliError::Survey(SurveyError::Scoring(ScoringError::EmptyCatalog))
        ));

        let error = CliError::from(err);
        assert_eq!(error.code, "EMPTY_CATALOG");
        assert_eq!(error.message, ScoringError::EmptyCatalog.to_string());
    }

    #[test]
    fn test_items_rejects_empty_catalog() {
        let catalog = catalog_file("items-empty.json", "[]");
        assert!(matches!(cmd_items(&catalog), Err(SurveyCliError::EmptyCatalog)));
    }
}

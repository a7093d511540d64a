use clap::{Parser, ValueEnum};
use printmatch::{ImageDescriptor, MatchConfig, MatchResult, Matcher};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Find the stored fingerprint most similar to a query image"
)]
struct Cli {
    /// Query image: a file path, or base64 text with `--encoding base64`.
    query: String,
    /// JSON array of candidate images in the same encoding as the query.
    #[arg(required_unless_present = "candidates_file")]
    candidates: Option<String>,
    /// Read the JSON candidate array from a file instead of the command line.
    #[arg(long, value_name = "FILE", conflicts_with = "candidates")]
    candidates_file: Option<PathBuf>,
    /// How the query and candidates are encoded.
    #[arg(short, long, value_enum, default_value_t = Encoding::Path)]
    encoding: Encoding,
    /// Write the JSON result to a file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Score candidates on all cores.
    #[arg(long)]
    parallel: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Encoding {
    /// Locators are file paths.
    Path,
    /// Locators are base64-encoded images; missing padding is tolerated.
    Base64,
}

impl Encoding {
    fn descriptor(self, locator: String) -> ImageDescriptor {
        match self {
            Encoding::Path => ImageDescriptor::from_path(locator),
            Encoding::Base64 => ImageDescriptor::from_base64(locator),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MatchRecord {
    match_index: i64,
    match_percentage: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ErrorRecord {
    error: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Output {
    Match(MatchRecord),
    Error(ErrorRecord),
}

impl From<MatchResult> for Output {
    fn from(value: MatchResult) -> Self {
        match value {
            MatchResult::Matched { index, percentage } => Output::Match(MatchRecord {
                match_index: index as i64,
                match_percentage: Some(percentage),
            }),
            MatchResult::NoMatch => Output::Match(MatchRecord {
                match_index: -1,
                match_percentage: None,
            }),
            MatchResult::Failure { message } => Output::Error(ErrorRecord { error: message }),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("printmatch=info".parse()?),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let candidates_text = match (&cli.candidates_file, cli.candidates) {
        (Some(path), _) => fs::read_to_string(path)?,
        (None, Some(text)) => text,
        (None, None) => return Err("a candidate list is required".into()),
    };
    let locators: Vec<String> = serde_json::from_str(&candidates_text)?;
    let candidates: Vec<ImageDescriptor> = locators
        .into_iter()
        .map(|locator| cli.encoding.descriptor(locator))
        .collect();
    let query = cli.encoding.descriptor(cli.query);

    let matcher = Matcher::default().with_config(MatchConfig {
        parallel: cli.parallel,
        ..MatchConfig::default()
    });
    let report = matcher.select_best(&query, &candidates);
    for failure in &report.failures {
        eprintln!(
            "Error processing fingerprint at index {}: {}",
            failure.index, failure.error
        );
    }

    let output = Output::from(report.result);
    let json = serde_json::to_string(&output)?;
    match cli.output {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}

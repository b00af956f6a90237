use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

use infraval::loader::load_document;
use infraval::output::{OutputFormat, render};
use infraval::validation::{Document, Validator};

#[derive(Parser)]
#[command(
    name = "infraval",
    about = "Validate an AWS resource YAML configuration file",
    version,
    author,
    long_about = None
)]
struct Cli {
    /// YAML configuration file to validate
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, env = "INFRAVAL_FORMAT")]
    format: OutputFormat,

    /// Enable verbose output (use -vv for debug output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    init_logging(cli.verbose);

    validate_command(&cli.file, cli.format)
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbose {
        0 => EnvFilter::new("infraval=warn"),
        1 => EnvFilter::new("infraval=info"),
        _ => EnvFilter::new("infraval=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn validate_command(path: &Path, format: OutputFormat) -> Result<ExitCode> {
    info!("Validating configuration file: {}", path.display());

    let value = match load_document(path) {
        Ok(value) => value,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            return Ok(ExitCode::FAILURE);
        }
    };

    let document = match Document::try_from(value) {
        Ok(document) => document,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            return Ok(ExitCode::FAILURE);
        }
    };

    let report = Validator::new().validate(&document);
    debug!(
        "Validation finished with {} finding(s)",
        report.findings().count()
    );

    print!("{}", render(&report, format)?);

    Ok(if report.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

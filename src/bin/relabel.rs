//! Relabel CLI - Command-line interface for ERP trigger relabeling
//!
//! Commands:
//! - transform: Relabel a session and write the hand-off payload
//! - validate: Check the behavioral log and its alignment with the triggers
//! - taxonomy: Print a convention's label table

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use erp_relabel::config::{EpochingConfig, EpochingOverrides, RelabelConfig, UnmappedPolicy};
use erp_relabel::convention::Convention;
use erp_relabel::encoder::HandoffEncoder;
use erp_relabel::filter::{observed_codes, restrict};
use erp_relabel::pipeline::{AlignmentReport, SessionProcessor};
use erp_relabel::schema::{EventStreamAdapter, TrialLogAdapter};
use erp_relabel::taxonomy::LabelTaxonomy;
use erp_relabel::{RelabelError, PRODUCER_NAME, VERSION};

/// Relabel - condition-specific trigger codes for priming EEG sessions
#[derive(Parser)]
#[command(name = "relabel")]
#[command(version = VERSION)]
#[command(
    about = "Rewrite generic prime/target/response triggers into condition codes",
    long_about = None
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RELABEL_LOG overrides
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Relabel a session and write the hand-off payload
    Transform(TransformArgs),

    /// Check the behavioral log and its alignment with the trigger stream
    Validate {
        /// Trigger stream file (JSON, NDJSON or MNE text events; - for stdin)
        #[arg(short, long)]
        events: PathBuf,

        /// Behavioral log file (JSON array or NDJSON)
        #[arg(short, long)]
        trials: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a convention's label table
    Taxonomy {
        /// Labeling convention
        #[arg(short, long, value_enum, default_value = "a")]
        convention: Convention,

        /// Restrict to the codes present in this (relabeled) event file
        #[arg(long)]
        events: Option<PathBuf>,

        /// Output as a JSON label → code object
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct TransformArgs {
    /// Trigger stream file (JSON, NDJSON or MNE text events; - for stdin)
    #[arg(short, long)]
    events: PathBuf,

    /// Behavioral log file (JSON array or NDJSON)
    #[arg(short, long)]
    trials: PathBuf,

    /// Output file path (use - for stdout)
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// Output format; defaults to json-pretty on a terminal, json otherwise
    #[arg(long)]
    output_format: Option<OutputFormat>,

    /// Labeling convention of the recording session
    #[arg(short, long, value_enum, default_value = "a")]
    convention: Convention,

    /// Label map (JSON label → code object) replacing the built-in taxonomy
    #[arg(long)]
    taxonomy: Option<PathBuf>,

    /// Handling of codes other than 10/20/30
    #[arg(long, value_enum, default_value = "drop")]
    unmapped: UnmappedPolicy,

    /// Tolerate trial log rows left over after the last prime trigger
    #[arg(long)]
    lenient: bool,

    /// Session identifier recorded in the payload provenance
    #[arg(long, default_value = "unnamed")]
    session_id: String,

    #[command(flatten)]
    epoching: EpochingArgs,
}

/// Overrides applied on top of the epoching config file (or the defaults)
#[derive(Args)]
struct EpochingArgs {
    /// Epoching parameters file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Epoch start relative to onset (s)
    #[arg(long, allow_negative_numbers = true)]
    tmin: Option<f64>,

    /// Epoch end relative to onset (s)
    #[arg(long, allow_negative_numbers = true)]
    tmax: Option<f64>,

    /// Baseline start (s); follows --tmin when omitted
    #[arg(long, allow_negative_numbers = true)]
    baseline_start: Option<f64>,

    /// Baseline end (s)
    #[arg(long, allow_negative_numbers = true)]
    baseline_end: Option<f64>,

    /// Band-pass lower cutoff (Hz)
    #[arg(long)]
    l_freq: Option<f64>,

    /// Band-pass upper cutoff (Hz)
    #[arg(long)]
    h_freq: Option<f64>,

    /// Peak-to-peak EEG rejection threshold (V)
    #[arg(long)]
    reject_eeg: Option<f64>,

    /// Standard montage name
    #[arg(long)]
    montage: Option<String>,

    /// Bad channels, comma separated
    #[arg(long, value_delimiter = ',')]
    bad_channels: Option<Vec<String>>,
}

impl EpochingArgs {
    fn resolve(&self) -> Result<EpochingConfig, RelabelCliError> {
        let base = match &self.config {
            Some(path) => EpochingConfig::from_json(&read_input(path)?)?,
            None => EpochingConfig::default(),
        };

        let overrides = EpochingOverrides {
            tmin: self.tmin,
            tmax: self.tmax,
            baseline_start: self.baseline_start,
            baseline_end: self.baseline_end,
            l_freq: self.l_freq,
            h_freq: self.h_freq,
            reject_eeg: self.reject_eeg,
            montage: self.montage.clone(),
            bad_channels: self.bad_channels.clone(),
        };
        Ok(overrides.apply(base)?)
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON hand-off payload
    Json,
    /// Pretty-printed JSON hand-off payload
    JsonPretty,
    /// Relabeled events in the MNE three-column text format
    Eve,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level) {
        eprintln!("failed to initialize logging: {e}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_env("RELABEL_LOG")
        .unwrap_or_else(|_| EnvFilter::new(level.to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}

fn run(cli: Cli) -> Result<(), RelabelCliError> {
    match cli.command {
        Commands::Transform(args) => cmd_transform(&args),
        Commands::Validate {
            events,
            trials,
            json,
        } => cmd_validate(&events, &trials, json),
        Commands::Taxonomy {
            convention,
            events,
            json,
        } => cmd_taxonomy(convention, events.as_deref(), json),
    }
}

fn cmd_transform(args: &TransformArgs) -> Result<(), RelabelCliError> {
    if is_stdin(&args.events) && is_stdin(&args.trials) {
        return Err(RelabelCliError::Usage(
            "events and trials cannot both be read from stdin".to_string(),
        ));
    }

    let events = EventStreamAdapter::parse_auto(&read_input(&args.events)?)?;
    let rows = TrialLogAdapter::parse_auto(&read_input(&args.trials)?)?;
    if events.is_empty() {
        return Err(RelabelCliError::NoEvents);
    }
    info!(events = events.len(), rows = rows.len(), "inputs loaded");

    let config = RelabelConfig {
        convention: args.convention,
        unmapped: args.unmapped,
        strict_alignment: !args.lenient,
    };

    let mut processor = SessionProcessor::new(config).with_epoching(args.epoching.resolve()?)?;
    if let Some(path) = &args.taxonomy {
        let taxonomy: LabelTaxonomy = serde_json::from_str(&read_input(path)?)?;
        debug!(labels = taxonomy.len(), path = %path.display(), "custom taxonomy loaded");
        processor = processor.with_taxonomy(taxonomy);
    }

    let payload = processor.process(&args.session_id, &events, &rows)?;

    let to_terminal = is_stdin(&args.output) && atty::is(atty::Stream::Stdout);
    let format = args.output_format.clone().unwrap_or(if to_terminal {
        OutputFormat::JsonPretty
    } else {
        OutputFormat::Json
    });

    let output_data = match format {
        OutputFormat::Json => HandoffEncoder::to_json(&payload, false)? + "\n",
        OutputFormat::JsonPretty => HandoffEncoder::to_json(&payload, true)? + "\n",
        OutputFormat::Eve => EventStreamAdapter::to_eve(&payload.events),
    };

    if is_stdin(&args.output) {
        print!("{output_data}");
    } else {
        fs::write(&args.output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(events: &Path, trials: &Path, json: bool) -> Result<(), RelabelCliError> {
    let events = EventStreamAdapter::parse_auto(&read_input(events)?)?;
    let rows = TrialLogAdapter::parse_auto(&read_input(trials)?)?;

    let report = AlignmentReport::build(&events, &rows);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Events:            {}", report.events);
        println!("Prime triggers:    {}", report.prime_triggers);
        println!("Target triggers:   {}", report.target_triggers);
        println!("Response triggers: {}", report.response_triggers);
        println!("Other triggers:    {}", report.unmapped_triggers);
        println!("Trial log rows:    {}", report.trial_rows);

        if !report.invalid_rows.is_empty() {
            println!("\nInvalid rows:");
            for (index, error) in &report.invalid_rows {
                println!("  - row {index}: {error}");
            }
        }
    }

    if !report.invalid_rows.is_empty() {
        Err(RelabelCliError::ValidationFailed(report.invalid_rows.len()))
    } else if report.prime_triggers != report.trial_rows {
        Err(RelabelCliError::Misaligned {
            primes: report.prime_triggers,
            rows: report.trial_rows,
        })
    } else {
        Ok(())
    }
}

fn cmd_taxonomy(
    convention: Convention,
    events: Option<&Path>,
    json: bool,
) -> Result<(), RelabelCliError> {
    let full = convention.taxonomy();
    let taxonomy = match events {
        Some(path) => {
            let events = EventStreamAdapter::parse_auto(&read_input(path)?)?;
            restrict(&full, observed_codes(&events))
        }
        None => full,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&taxonomy)?);
    } else {
        println!(
            "{PRODUCER_NAME} {VERSION} - convention {convention} ({} labels)",
            taxonomy.len()
        );
        println!();
        for (label, code) in taxonomy.iter() {
            println!("{code:>5}  {label}");
        }
    }

    Ok(())
}

// Helper functions

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_input(path: &Path) -> Result<String, RelabelCliError> {
    if is_stdin(path) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

// Error types

#[derive(Debug)]
enum RelabelCliError {
    Io(io::Error),
    Relabel(RelabelError),
    Json(serde_json::Error),
    Usage(String),
    NoEvents,
    ValidationFailed(usize),
    Misaligned { primes: usize, rows: usize },
}

impl From<io::Error> for RelabelCliError {
    fn from(e: io::Error) -> Self {
        RelabelCliError::Io(e)
    }
}

impl From<RelabelError> for RelabelCliError {
    fn from(e: RelabelError) -> Self {
        RelabelCliError::Relabel(e)
    }
}

impl From<serde_json::Error> for RelabelCliError {
    fn from(e: serde_json::Error) -> Self {
        RelabelCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(code: &str, message: String, hint: &str) -> Self {
        CliError {
            code: code.to_string(),
            message,
            hint: Some(hint.to_string()),
        }
    }
}

impl From<RelabelCliError> for CliError {
    fn from(e: RelabelCliError) -> Self {
        match e {
            RelabelCliError::Io(e) => {
                CliError::new("IO_ERROR", e.to_string(), "Check file paths and permissions")
            }
            RelabelCliError::Json(e) => {
                CliError::new("JSON_ERROR", e.to_string(), "Check JSON syntax")
            }
            RelabelCliError::Usage(msg) => {
                CliError::new("USAGE_ERROR", msg, "See 'relabel --help'")
            }
            RelabelCliError::NoEvents => CliError::new(
                "NO_EVENTS",
                "No events found in input".to_string(),
                "Ensure the events file is not empty",
            ),
            RelabelCliError::ValidationFailed(count) => CliError::new(
                "VALIDATION_FAILED",
                format!("{count} trial log rows failed validation"),
                "Fix the listed rows and retry",
            ),
            RelabelCliError::Misaligned { primes, rows } => CliError::new(
                "MISALIGNED",
                format!("{primes} prime triggers but {rows} trial log rows"),
                "Check that the log belongs to this recording and is not truncated",
            ),
            RelabelCliError::Relabel(e) => {
                let (code, hint) = match &e {
                    RelabelError::Alignment(_) => (
                        "ALIGNMENT_ERROR",
                        "Run 'relabel validate' to compare trigger and row counts",
                    ),
                    RelabelError::TrialCountMismatch { .. } => (
                        "TRIAL_COUNT_MISMATCH",
                        "Pass --lenient to tolerate trailing log rows",
                    ),
                    RelabelError::UnknownLabel(_) => (
                        "UNKNOWN_LABEL",
                        "Check the --convention matches the recording session",
                    ),
                    RelabelError::InvalidTrialField { .. } => (
                        "INVALID_TRIAL",
                        "Run 'relabel validate' for every invalid row",
                    ),
                    RelabelError::DuplicateLabel(_) | RelabelError::DuplicateCode { .. } => (
                        "TAXONOMY_ERROR",
                        "Labels and codes in a taxonomy must be unique",
                    ),
                    RelabelError::InvalidConfig(_) => {
                        ("INVALID_CONFIG", "Check the epoching parameters")
                    }
                    RelabelError::ParseError(_) => (
                        "PARSE_ERROR",
                        "Events must be [sample, previous, code] triples or MNE text lines",
                    ),
                    RelabelError::JsonError(_) => ("JSON_ERROR", "Check JSON syntax"),
                };
                CliError::new(code, e.to_string(), hint)
            }
        }
    }
}

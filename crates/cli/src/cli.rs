//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::{MatchingStrategy, ObjectClass};
use std::path::PathBuf;

/// idtrack - ID maintenance evaluation for detected road markings
#[derive(Parser, Debug)]
#[command(
    name = "idtrack",
    author,
    version,
    about = "Frame-to-frame ID maintenance evaluation",
    long_about = "Evaluates whether a detector keeps object identifiers stable across cycles.\n\n\
                  Loads a recording, compensates ego motion, refines predictions with \n\
                  surround camera detections and checks every associated pair's identifier."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "IDTRACK_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "IDTRACK_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate ID maintenance over a recording
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration and recording information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to the recording (JSON)
    #[arg(
        short,
        long,
        env = "IDTRACK_RECORDING",
        required_unless_present = "mock",
        conflicts_with = "mock"
    )]
    pub recording: Option<PathBuf>,

    /// Evaluate a generated straight-drive recording of this class instead
    #[arg(long, value_enum)]
    pub mock: Option<ClassArg>,

    /// Path to engine configuration file (TOML or JSON); defaults apply if omitted
    #[arg(short, long, env = "IDTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the matching strategy from configuration
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Override the camera window tolerance (microseconds)
    #[arg(long)]
    pub tolerance_us: Option<u64>,

    /// Print the full report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Also write the JSON report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "IDTRACK_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "idtrack.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file; defaults are shown if omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Recording to summarize
    #[arg(short, long)]
    pub recording: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
        }
    }
}

/// Object class selectable on the command line
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ClassArg {
    Delimiter,
    StopLine,
    WheelLocker,
    WheelStopper,
    PedestrianCrossing,
}

impl From<ClassArg> for ObjectClass {
    fn from(class: ClassArg) -> Self {
        match class {
            ClassArg::Delimiter => ObjectClass::Delimiter,
            ClassArg::StopLine => ObjectClass::StopLine,
            ClassArg::WheelLocker => ObjectClass::WheelLocker,
            ClassArg::WheelStopper => ObjectClass::WheelStopper,
            ClassArg::PedestrianCrossing => ObjectClass::PedestrianCrossing,
        }
    }
}

/// Matching strategy selectable on the command line
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StrategyArg {
    GlobalGreedy,
    FirstWithinRadius,
}

impl From<StrategyArg> for MatchingStrategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::GlobalGreedy => MatchingStrategy::GlobalGreedy,
            StrategyArg::FirstWithinRadius => MatchingStrategy::FirstWithinRadius,
        }
    }
}

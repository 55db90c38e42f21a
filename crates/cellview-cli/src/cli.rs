//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use cellview_cli::filters::{ClipArg, LabelFilter, RangeFilter};

#[derive(Parser)]
#[command(
    name = "cellview",
    version,
    about = "Inspect single-cell datasets through a filtered, clipped World",
    long_about = "Load a dataset directory (obs.csv, layout.csv, optional var.csv and \
                  schema.json), narrow it to a selection, clip continuous values at \
                  quantiles and summarize the resulting World."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// JSON file with World options (unassigned label, name field, layout columns).
    #[arg(long = "options", value_name = "PATH", global = true)]
    pub options: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Summarize the entire dataset.
    Summary(DatasetArgs),

    /// Narrow the dataset to a selection and summarize the result.
    Select(SelectArgs),
}

#[derive(Args)]
pub struct DatasetArgs {
    /// Dataset directory.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,
}

#[derive(Args)]
pub struct SelectArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Keep rows with one of the labels (FIELD=LABEL[,LABEL...]); repeatable.
    #[arg(long = "label", value_name = "FIELD=LABELS")]
    pub labels: Vec<LabelFilter>,

    /// Keep rows within the range (FIELD=MIN:MAX); repeatable.
    #[arg(long = "range", value_name = "FIELD=MIN:MAX")]
    pub ranges: Vec<RangeFilter>,

    /// Clip continuous values at these quantiles (MIN:MAX).
    #[arg(long = "clip", value_name = "MIN:MAX")]
    pub clip: Option<ClipArg>,

    /// Expression columns from var.csv to load into the World.
    #[arg(long = "gene", value_name = "GENE")]
    pub genes: Vec<String>,

    /// Print the selected global row ids.
    #[arg(long = "ids")]
    pub ids: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rtfmri",
    version,
    about = "Explore the methods of real-time fMRI neurofeedback studies",
    long_about = "Browse, visualize and extend a coded review of real-time fMRI\n\
                  neurofeedback studies.\n\n\
                  The dataset is a tab-separated table with one study per row."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Study table to load (default: $RTFMRI_DATASET, the config file, then the bundled path).
    #[arg(long = "dataset", value_name = "PATH", global = true)]
    pub dataset: Option<PathBuf>,

    /// TOML config file (default: $RTFMRI_CONFIG, then ./rtfmri.toml if present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables.
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// List the plottable fields with their labels and distinct values.
    Fields,

    /// Search the study table across all columns.
    Browse(BrowseArgs),

    /// Print the linked aggregates for one selection.
    Visualize(VisualizeArgs),

    /// Drive the linked aggregates interactively, one command per line.
    Explore(ExploreArgs),

    /// Fill in the methods form and export it.
    Submit(SubmitArgs),
}

#[derive(Args)]
pub struct BrowseArgs {
    /// Case-insensitive text to look for; empty shows every study.
    #[arg(value_name = "QUERY", default_value = "")]
    pub query: String,

    /// Show at most this many studies.
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct VisualizeArgs {
    /// Field of the primary aggregate.
    #[arg(long = "primary", value_name = "FIELD")]
    pub primary: Option<String>,

    /// Field of the secondary aggregate.
    #[arg(long = "secondary", value_name = "FIELD")]
    pub secondary: Option<String>,

    /// Primary value to hover, which fills the secondary aggregate.
    #[arg(long = "hover", value_name = "VALUE")]
    pub hover: Option<String>,

    /// Primary value to click, which lists the matching studies.
    #[arg(long = "click", value_name = "VALUE")]
    pub click: Option<String>,

    /// Cap on listed studies (overrides `[view] max_rows`).
    #[arg(long = "max-rows", value_name = "N")]
    pub max_rows: Option<usize>,
}

#[derive(Args)]
pub struct ExploreArgs {
    /// Read commands from this file instead of stdin.
    #[arg(long = "script", value_name = "PATH")]
    pub script: Option<PathBuf>,
}

#[derive(Args)]
pub struct SubmitArgs {
    /// Answer for one field, e.g. `--set vendor=Siemens`. Repeat for more fields.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    #[arg(long = "author", value_name = "TEXT")]
    pub author: Option<String>,

    #[arg(long = "doi", value_name = "DOI")]
    pub doi: Option<String>,

    #[arg(long = "title", value_name = "TEXT")]
    pub title: Option<String>,

    /// Write the CSV here instead of printing a data URI.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let (field, value) = (field.trim(), value.trim());
    if field.is_empty() || value.is_empty() {
        return Err(format!("expected FIELD=VALUE, got '{raw}'"));
    }
    Ok((field.to_string(), value.to_string()))
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

//! CLI argument definitions for `rowgraph`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rowgraph",
    version,
    about = "Turn delimited records into typed entities and relationships",
    long_about = "Validate mapper configurations against a schema, preview them on the \
                  head of a file, and map whole files into a bundle of entities and \
                  relationships."
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

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow raw cell values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check a mapper configuration against the schema.
    Validate(ValidateArgs),

    /// Map the first lines of a file and print what would be produced.
    Test(TestArgs),

    /// Map a whole file into a bundle.
    Ingest(IngestArgs),

    /// List the entity and relationship types of a schema.
    Types(TypesArgs),
}

/// Inputs every mapping command needs.
#[derive(Args)]
pub struct MapperArgs {
    /// Mapper configuration (JSON).
    #[arg(long = "mapper", value_name = "FILE")]
    pub mapper: PathBuf,

    /// Schema document (.toml or .json).
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: PathBuf,

    /// Extra type settings, replacing the schema's settings per type.
    #[arg(long = "settings", value_name = "FILE")]
    pub settings: Option<PathBuf>,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub inputs: MapperArgs,

    /// Print the report as JSON.
    #[arg(long = "json")]
    pub json: bool,

    /// Write the configuration without source-less attributes when it is valid.
    #[arg(long = "write-sanitized", value_name = "FILE")]
    pub write_sanitized: Option<PathBuf>,
}

#[derive(Args)]
pub struct TestArgs {
    #[command(flatten)]
    pub inputs: MapperArgs,

    /// Delimited input file.
    #[arg(long = "input", value_name = "CSV")]
    pub input: PathBuf,

    /// Known objects for default-valued references (JSON list).
    #[arg(long = "identities", value_name = "FILE")]
    pub identities: Option<PathBuf>,

    /// Print the produced bundle as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct IngestArgs {
    #[command(flatten)]
    pub inputs: MapperArgs,

    /// Delimited input file.
    #[arg(long = "input", value_name = "CSV")]
    pub input: PathBuf,

    /// Known objects for default-valued references (JSON list).
    #[arg(long = "identities", value_name = "FILE")]
    pub identities: Option<PathBuf>,

    /// Bundle destination (stdout when omitted).
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Evaluate entities in dependency order instead of by reference count.
    #[arg(long = "topological")]
    pub topological: bool,
}

#[derive(Args)]
pub struct TypesArgs {
    /// Schema document (.toml or .json).
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: PathBuf,
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

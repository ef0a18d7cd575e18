//! `rowgraph` command line.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use rowgraph_cli::logging::{LogConfig, LogFormat, init_logging};
use rowgraph_cli::types::Outcome;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_ingest, run_test, run_types, run_validate};
use crate::summary::{print_batch, print_issues, print_preview, print_types};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli.command).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

async fn run(command: &Command) -> anyhow::Result<i32> {
    Ok(match command {
        Command::Validate(args) => {
            let report = run_validate(args).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_issues(&report);
            }
            i32::from(!report.is_valid())
        }
        Command::Test(args) => match run_test(args).await? {
            Outcome::Completed(report) => {
                print_preview(&report, args.json);
                0
            }
            Outcome::Rejected(report) => {
                print_issues(&report);
                1
            }
        },
        Command::Ingest(args) => match run_ingest(args).await? {
            Outcome::Completed(report) => {
                print_batch(&report);
                i32::from(report.cancelled)
            }
            Outcome::Rejected(report) => {
                print_issues(&report);
                1
            }
        },
        Command::Types(args) => {
            print_types(&run_types(args)?);
            0
        }
    })
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}

//! Sinklog CLI Application
//!
//! Command-line front end for the sinklog library. It builds one logger from an
//! optional TOML config plus command-line flags, registers the requested sinks in
//! order and submits a single message. The process exits nonzero when any sink fails.

use anyhow::{Context, Result};
use clap::Parser;
use sinklog::{Logger, Severity};
use std::path::PathBuf;
use std::process::ExitCode;

mod config;

/// Sinklog - Render a message and fan it out to log sinks
#[derive(Parser, Debug)]
#[command(name = "sinklog-cli")]
#[command(about = "Render a log message and dispatch it to console and file sinks", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Severity of the submitted message
    #[arg(short, long, default_value = "info")]
    severity: Severity,

    /// Drop messages less severe than this (overrides config)
    #[arg(short, long)]
    threshold: Option<Severity>,

    /// Append a newline to each message
    #[arg(short, long)]
    newline: bool,

    /// Write to standard output
    #[arg(long)]
    stdout: bool,

    /// Write to standard error
    #[arg(long)]
    stderr: bool,

    /// Append to a file (can be repeated)
    #[arg(long, value_name = "FILE")]
    file: Vec<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all diagnostics except errors
    #[arg(short, long)]
    quiet: bool,

    /// Message text
    #[arg(required = true)]
    message: Vec<String>,
}

fn main() -> Result<ExitCode> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::debug!("Sinklog CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using sinklog library v{}", sinklog::VERSION);

    let logger = build_logger(&args)?;
    if logger.registry().is_empty() {
        log::warn!("No sinks registered; use --stdout, --stderr, --file or a config file");
    }

    let message = args.message.join(" ");
    let status = logger
        .submit(args.severity, format_args!("{}", message))
        .context("Failed to dispatch message")?;

    if status != 0 {
        log::error!("One or more sinks failed (status {:#x})", status);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Build the logger: config sinks first, then command-line sinks
fn build_logger(args: &Args) -> Result<Logger> {
    let app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => config::AppConfig::default(),
    };

    let mut settings = app_config.settings;
    if let Some(threshold) = args.threshold {
        settings.threshold = threshold;
    }
    if args.newline {
        settings.flags.append_newline = true;
    }

    let mut logger =
        Logger::with_capacity(settings, app_config.capacity).context("Failed to create logger")?;

    for sink in &app_config.sinks {
        logger
            .add_sink_config(sink)
            .with_context(|| format!("Failed to register sink {:?}", sink))?;
    }
    if args.stdout {
        logger.add_stdout().context("Failed to register stdout sink")?;
    }
    if args.stderr {
        logger.add_stderr().context("Failed to register stderr sink")?;
    }
    for path in &args.file {
        logger
            .add_file(path.clone())
            .with_context(|| format!("Failed to register file sink {:?}", path))?;
    }

    log::debug!("Registered {} sink(s)", logger.registry().len());
    Ok(logger)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "sinklog-cli",
            "--severity",
            "warning",
            "--threshold",
            "error",
            "--stdout",
            "--file",
            "a.log",
            "--file",
            "b.log",
            "disk",
            "full",
        ])
        .unwrap();
        assert_eq!(args.severity, Severity::Warning);
        assert_eq!(args.threshold, Some(Severity::Error));
        assert!(args.stdout);
        assert_eq!(args.file.len(), 2);
        assert_eq!(args.message, vec!["disk", "full"]);
    }

    #[test]
    fn test_message_required() {
        assert!(Args::try_parse_from(["sinklog-cli", "--stdout"]).is_err());
    }

    #[test]
    fn test_build_logger_registers_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cli.log");
        let args = Args::try_parse_from([
            "sinklog-cli",
            "--newline",
            "--file",
            path.to_str().unwrap(),
            "hello",
        ])
        .unwrap();

        let logger = build_logger(&args).unwrap();
        assert_eq!(logger.registry().len(), 1);
        assert!(logger.flags().append_newline);

        let rc = logger
            .submit(Severity::Info, format_args!("{}", args.message.join(" ")))
            .unwrap();
        assert_eq!(rc, 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[INFO] hello\n");
    }
}

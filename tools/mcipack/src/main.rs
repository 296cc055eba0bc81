//! mcipack - MCI word packing tool
//!
//! Loads parameter records from a JSON/YAML file, packs the allow-listed
//! ones into 16-bit words and prints them as 4-digit hex strings.

mod config;
mod logging;
mod records;

use crate::config::{load_config, AppConfig, LogFormat};
use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use mci_codec::{Converter, PackReport};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "mcipack")]
#[command(about = "MCI word packing tool")]
#[command(long_about = "MCI word packing tool

Commands:
  pack        Pack allow-listed records and print hex words
  check       Pack every record and report diagnostics without output words

Examples:
  mcipack pack records.json                    # One word per line
  mcipack pack records.yaml --format json      # Words plus per-record reports
  mcipack check records.json --allow MCI_PARAMS
  mcipack -c config/strict.yaml check records.json")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Configuration file (toml, yaml or json)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Log output format (overrides config)
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    /// Additional record type to consume (repeatable, extends the allow-list)
    #[arg(short = 'a', long = "allow", global = true)]
    allow: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack allow-listed records and print hex words
    Pack {
        /// Records file (.json, .yaml, .yml)
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Lines)]
        format: OutputFormat,
    },

    /// Pack every record and report diagnostics
    Check {
        /// Records file (.json, .yaml, .yml)
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One hex word per line
    Lines,
    /// JSON document with words and reports
    Json,
}

#[derive(Serialize)]
struct PackOutput<'a> {
    words: &'a [String],
    consumed: usize,
    remaining: usize,
    reports: &'a [PackReport],
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut app_config = load_config(cli.config.as_deref())?;
    apply_overrides(&cli, &mut app_config);
    logging::init_logging(&app_config.log)?;

    debug!(
        "Codec config: allow_list={:?}, order={}, overlap={}, zero_tail={}, word_order={}",
        app_config.codec.allow_list,
        app_config.codec.order,
        app_config.codec.overlap,
        app_config.codec.zero_tail,
        app_config.codec.word_order
    );

    let converter = Converter::new(app_config.codec);

    match cli.command {
        Commands::Pack { file, format } => run_pack(&converter, &file, format),
        Commands::Check { file } => run_check(&converter, &file),
    }
}

fn apply_overrides(cli: &Cli, app_config: &mut AppConfig) {
    if cli.verbose {
        app_config.log.level = "debug".to_string();
    }
    if let Some(format) = cli.log_format {
        app_config.log.format = format;
    }
    if cli.no_color {
        app_config.log.ansi = false;
    }
    app_config
        .codec
        .allow_list
        .extend(cli.allow.iter().cloned());
}

fn run_pack(converter: &Converter, file: &std::path::Path, format: OutputFormat) -> Result<()> {
    let pending = records::load_records(file)?;
    let conversion = converter.convert(pending)?;

    match format {
        OutputFormat::Lines => {
            for word in &conversion.words {
                println!("{}", word);
            }
        },
        OutputFormat::Json => {
            let doc = PackOutput {
                words: &conversion.words,
                consumed: conversion.consumed(),
                remaining: conversion.remaining.len(),
                reports: &conversion.reports,
            };
            println!("{}", serde_json::to_string_pretty(&doc)?);
        },
    }

    eprintln!(
        "{} {} records consumed, {} words, {} left pending",
        "Packed:".bright_green(),
        conversion.consumed(),
        conversion.words.len(),
        conversion.remaining.len()
    );
    Ok(())
}

fn run_check(converter: &Converter, file: &std::path::Path) -> Result<()> {
    let pending = records::load_records(file)?;
    let mut failures = 0;

    for (index, record) in pending.iter().enumerate() {
        let selected = if converter.accepts(record) {
            "consumed".bright_green()
        } else {
            "pending".yellow()
        };

        match converter.convert_record(record) {
            Ok(packed) => {
                let status = if packed.report.is_clean() {
                    "ok".green()
                } else {
                    "warnings".yellow()
                };
                println!(
                    "[{}] {} ({}): {} words (layout addresses {}), {}",
                    index,
                    record.type_tag.bold(),
                    selected,
                    packed.words.len(),
                    records::expected_word_count(record),
                    status
                );
                print_report(&packed.report);
            },
            Err(e) => {
                failures += 1;
                println!(
                    "[{}] {} ({}): {} {}",
                    index,
                    record.type_tag.bold(),
                    selected,
                    "error:".red(),
                    e
                );
            },
        }
    }

    if failures > 0 {
        bail!("{} of {} records failed to pack", failures, pending.len());
    }
    println!("{} {} records checked", "✓".green(), pending.len());
    Ok(())
}

fn print_report(report: &PackReport) {
    if !report.skipped_params.is_empty() {
        println!(
            "    unsupported types: {}",
            report.skipped_params.join(", ")
        );
    }
    if !report.truncated_params.is_empty() {
        println!(
            "    truncated spans: {}",
            report.truncated_params.join(", ")
        );
    }
    if report.overlaps > 0 {
        println!("    overlaps combined: {}", report.overlaps);
    }
    if report.reordered {
        println!("    parameters re-sorted by start word");
    }
    if report.dropped_zero_tail {
        println!("    trailing all-zero bit-field word dropped");
    }
    if report.gap_words > 0 {
        println!("    gap words: {}", report.gap_words);
    }
}

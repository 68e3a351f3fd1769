// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

//! The command-line frontend: flag parsing, input acquisition, output
//! selection, and exit-code mapping.

use std::fs::File;
use std::io;
use std::path::PathBuf;

use clap::Parser as ClapParser;
use log::debug;

use crate::analyzer::{Analyzer, Config};
use crate::dockerfile::Dockerfile;
use crate::finding::Severity;
use crate::render::{JsonFormatter, TextFormatter};
use crate::rules::default_registry;

/// Exit code when findings above the threshold are present.
const EXIT_FINDINGS: i32 = 1;

/// Exit code for fatal conditions (unreadable input, parse failure).
const EXIT_FATAL: i32 = 2;

#[derive(Debug, ClapParser)]
#[command(
  name = "docker-lint",
  about = "Static analysis for Dockerfiles: inefficiencies, anti-patterns, and security risks",
  disable_version_flag = true
)]
pub struct Cli {
  /// Path to the Dockerfile; reads standard input when omitted
  #[arg(value_name = "FILE")]
  pub file: Option<PathBuf>,

  /// Output findings as JSON
  #[arg(short, long)]
  pub json: bool,

  /// Suppress informational findings
  #[arg(short, long)]
  pub quiet: bool,

  /// Treat warnings as errors
  #[arg(short, long)]
  pub strict: bool,

  /// Comma-separated list of rule IDs to ignore
  #[arg(long, value_name = "RULES")]
  pub ignore: Option<String>,

  /// List all available rules with descriptions
  #[arg(long)]
  pub rules: bool,

  /// Show version information
  #[arg(short = 'v', long)]
  pub version: bool
}

/// Splits a `--ignore` value into rule identifiers, trimming whitespace
/// and dropping empties.
pub fn parse_ignore_list(csv: &str) -> Vec<String> {
  csv
    .split(',')
    .map(str::trim)
    .filter(|id| !id.is_empty())
    .map(String::from)
    .collect()
}

fn list_rules() {
  for rule in default_registry().iter() {
    println!(
      "{}\t[{}]\t{} - {}",
      rule.id(),
      rule.severity(),
      rule.name(),
      rule.description()
    );
  }
}

/// Runs the frontend and returns the process exit code.
pub fn run(cli: Cli) -> i32 {
  if cli.version {
    println!("{}", env!("CARGO_PKG_VERSION"));
    return 0;
  }

  if cli.rules {
    list_rules();
    return 0;
  }

  let filename = cli
    .file
    .as_ref()
    .map(|path| path.display().to_string())
    .unwrap_or_else(|| "stdin".to_string());

  let parsed = match &cli.file {
    Some(path) => match File::open(path) {
      Ok(file) => Dockerfile::from_reader(file),
      Err(err) => {
        eprintln!("failed to open file: {}", err);
        return EXIT_FATAL;
      }
    },
    None => Dockerfile::from_reader(io::stdin().lock())
  };

  let dockerfile = match parsed {
    Ok(dockerfile) => dockerfile,
    Err(err) => {
      eprintln!("failed to parse Dockerfile: {}", err);
      return EXIT_FATAL;
    }
  };

  debug!(
    "parsed {}: {} instructions, {} stages",
    filename,
    dockerfile.instructions.len(),
    dockerfile.stages().len()
  );

  let ignore_rules = cli
    .ignore
    .as_deref()
    .map(parse_ignore_list)
    .unwrap_or_default();

  let analyzer = Analyzer::with_defaults(Config { ignore_rules });
  let findings = analyzer.analyze(&dockerfile);

  let errors = findings
    .iter()
    .filter(|f| f.severity == Severity::Error)
    .count();
  let warnings = findings
    .iter()
    .filter(|f| f.severity == Severity::Warning)
    .count();

  let stdout = io::stdout();
  let mut out = stdout.lock();

  let rendered = if cli.json {
    JsonFormatter::new(filename.as_str(), cli.quiet).format(&findings, &mut out)
  } else {
    TextFormatter::new(filename.as_str(), cli.quiet).format(&findings, &mut out)
  };

  if let Err(err) = rendered {
    eprintln!("failed to write output: {}", err);
    return EXIT_FATAL;
  }

  if errors > 0 || (cli.strict && warnings > 0) {
    EXIT_FINDINGS
  } else {
    0
  }
}

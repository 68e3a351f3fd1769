// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

//! Output serializers for lint findings: human-readable text and JSON.

use std::io::{self, Write};

use serde::Serialize;

use crate::finding::{Finding, Severity};

/// Renders findings as human-readable text, one finding per line:
///
/// ```text
/// <filename>:<line>:<column>: [<severity>] <rule_id>: <message>
///   Suggestion: <suggestion>
/// ```
pub struct TextFormatter {
  filename: String,
  quiet: bool
}

impl TextFormatter {
  pub fn new<S: Into<String>>(filename: S, quiet: bool) -> TextFormatter {
    TextFormatter {
      filename: filename.into(),
      quiet
    }
  }

  pub fn format<W: Write>(&self, findings: &[Finding], w: &mut W) -> io::Result<()> {
    for finding in findings {
      if self.quiet && finding.severity == Severity::Info {
        continue;
      }

      writeln!(
        w,
        "{}:{}:{}: [{}] {}: {}",
        self.filename,
        finding.line,
        finding.column,
        finding.severity,
        finding.rule_id,
        finding.message
      )?;

      if !finding.suggestion.is_empty() {
        writeln!(w, "  Suggestion: {}", finding.suggestion)?;
      }
    }

    Ok(())
  }
}

#[derive(Debug, Serialize)]
struct JsonFinding<'a> {
  rule_id: &'a str,
  severity: String,
  line: usize,
  column: usize,
  message: &'a str,

  #[serde(skip_serializing_if = "str::is_empty")]
  suggestion: &'a str
}

#[derive(Debug, Serialize, Default)]
struct JsonSummary {
  total: usize,
  errors: usize,
  warnings: usize,
  info: usize
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
  file: &'a str,
  findings: Vec<JsonFinding<'a>>,
  summary: JsonSummary
}

/// Renders findings as pretty-printed JSON for machine consumption.
///
/// `findings` is always present (possibly empty); the summary counts
/// equal the rendered findings partitioned by severity.
pub struct JsonFormatter {
  filename: String,
  quiet: bool
}

impl JsonFormatter {
  pub fn new<S: Into<String>>(filename: S, quiet: bool) -> JsonFormatter {
    JsonFormatter {
      filename: filename.into(),
      quiet
    }
  }

  pub fn format<W: Write>(&self, findings: &[Finding], w: &mut W) -> io::Result<()> {
    let mut output = JsonOutput {
      file: &self.filename,
      findings: Vec::new(),
      summary: JsonSummary::default()
    };

    for finding in findings {
      if self.quiet && finding.severity == Severity::Info {
        continue;
      }

      output.findings.push(JsonFinding {
        rule_id: &finding.rule_id,
        severity: finding.severity.to_string(),
        line: finding.line,
        column: finding.column,
        message: &finding.message,
        suggestion: &finding.suggestion
      });

      match finding.severity {
        Severity::Error => output.summary.errors += 1,
        Severity::Warning => output.summary.warnings += 1,
        Severity::Info => output.summary.info += 1
      }
      output.summary.total += 1;
    }

    serde_json::to_writer_pretty(&mut *w, &output)
      .map_err(io::Error::from)?;
    writeln!(w)
  }
}

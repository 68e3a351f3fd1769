// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use std::fmt;

/// The severity of a lint finding.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Severity {
  Info,
  Warning,
  Error
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Severity::Info => "info",
      Severity::Warning => "warning",
      Severity::Error => "error"
    };

    write!(f, "{}", s)
  }
}

/// One diagnostic produced by one rule at one source line.
///
/// Messages and suggestions are parameterized only by values that are not
/// sensitive (image names, key names); ENV/ARG *values* never appear in
/// either field.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Finding {
  pub rule_id: String,
  pub severity: Severity,
  pub line: usize,
  pub column: usize,
  pub message: String,
  pub suggestion: String
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn severity_display() {
    assert_eq!(Severity::Info.to_string(), "info");
    assert_eq!(Severity::Warning.to_string(), "warning");
    assert_eq!(Severity::Error.to_string(), "error");
  }

  #[test]
  fn severity_ordering() {
    assert!(Severity::Info < Severity::Warning);
    assert!(Severity::Warning < Severity::Error);
  }
}

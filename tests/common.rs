// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use docker_lint::{Analyzer, Config, Dockerfile, Finding};

pub fn strings(strs: &[&str]) -> Vec<String> {
  strs.iter().map(|s| String::from(*s)).collect()
}

/// Parses and analyzes with the default registry and no global ignores.
pub fn analyze(input: &str) -> Vec<Finding> {
  let dockerfile = Dockerfile::parse(input).expect("input should parse");
  Analyzer::with_defaults(Config::default()).analyze(&dockerfile)
}

/// Parses and analyzes with a global ignore set.
pub fn analyze_ignoring(input: &str, ignore: &[&str]) -> Vec<Finding> {
  let dockerfile = Dockerfile::parse(input).expect("input should parse");
  let config = Config {
    ignore_rules: ignore.iter().map(|s| s.to_string()).collect()
  };

  Analyzer::with_defaults(config).analyze(&dockerfile)
}

/// `(line, rule_id)` pairs in emission order.
pub fn keys(findings: &[Finding]) -> Vec<(usize, String)> {
  findings
    .iter()
    .map(|f| (f.line, f.rule_id.clone()))
    .collect()
}

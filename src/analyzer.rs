// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use std::collections::HashSet;

use log::debug;

use crate::dockerfile::Dockerfile;
use crate::finding::Finding;
use crate::rules::{default_registry, RuleRegistry};

/// Configuration for an analysis run.
#[derive(Debug, Clone, Default)]
pub struct Config {
  /// Rule identifiers to skip entirely.
  pub ignore_rules: Vec<String>
}

/// Runs the rule catalogue over a parsed Dockerfile.
///
/// Rules are invoked in sorted-identifier order and the combined findings
/// are sorted by `(line, rule_id)`, so output is deterministic for any
/// input. Both the global ignore set and inline ignore directives are
/// honored.
///
/// # Example
/// ```
/// use docker_lint::{Analyzer, Config, Dockerfile};
///
/// let dockerfile = Dockerfile::parse("FROM ubuntu\n").unwrap();
/// let findings = Analyzer::with_defaults(Config::default()).analyze(&dockerfile);
///
/// assert!(findings.iter().any(|f| f.rule_id == "DL3006"));
/// ```
pub struct Analyzer<'a> {
  registry: &'a RuleRegistry,
  config: Config
}

impl<'a> Analyzer<'a> {
  pub fn new(registry: &'a RuleRegistry, config: Config) -> Analyzer<'a> {
    Analyzer { registry, config }
  }

  /// Creates an `Analyzer` over the built-in rule registry.
  pub fn with_defaults(config: Config) -> Analyzer<'static> {
    Analyzer::new(default_registry(), config)
  }

  /// Runs every registered rule and returns the surviving findings,
  /// sorted by `(line, rule_id)`.
  pub fn analyze(&self, dockerfile: &Dockerfile) -> Vec<Finding> {
    self.run(dockerfile, None)
  }

  /// Runs only the named rules, still honoring both ignore mechanisms
  /// and the final sort.
  pub fn analyze_with_rules(&self, dockerfile: &Dockerfile, rule_ids: &[&str]) -> Vec<Finding> {
    let requested: HashSet<&str> = rule_ids.iter().copied().collect();
    self.run(dockerfile, Some(&requested))
  }

  /// The rule registry used by this analyzer.
  pub fn registry(&self) -> &RuleRegistry {
    self.registry
  }

  fn run(&self, dockerfile: &Dockerfile, requested: Option<&HashSet<&str>>) -> Vec<Finding> {
    let ignored: HashSet<&str> = self
      .config
      .ignore_rules
      .iter()
      .map(String::as_str)
      .collect();

    let mut findings = Vec::new();

    for rule in self.registry.iter() {
      if ignored.contains(rule.id()) {
        continue;
      }

      if let Some(requested) = requested {
        if !requested.contains(rule.id()) {
          continue;
        }
      }

      for finding in rule.check(dockerfile) {
        if self.inline_ignored(dockerfile, &finding) {
          continue;
        }

        findings.push(finding);
      }
    }

    findings.sort_by(|a, b| {
      a.line.cmp(&b.line).then_with(|| a.rule_id.cmp(&b.rule_id))
    });

    debug!(
      "analysis produced {} findings over {} instructions",
      findings.len(),
      dockerfile.instructions.len()
    );

    findings
  }

  /// True if an inline directive on the preceding source line suppresses
  /// this finding.
  fn inline_ignored(&self, dockerfile: &Dockerfile, finding: &Finding) -> bool {
    dockerfile
      .inline_ignores
      .get(&finding.line)
      .map(|ids| ids.iter().any(|id| id == &finding.rule_id))
      .unwrap_or(false)
  }
}

// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

//! Best practice rules: DL3001, DL3002, DL3003, DL5000, DL5001.

use crate::dockerfile::{Dockerfile, Instruction};
use crate::finding::{Finding, Severity};
use crate::rules::*;

const WILDCARD_CHARS: &[char] = &['*', '?', '['];

fn is_absolute_path(path: &str) -> bool {
  if path.is_empty() {
    return false;
  }

  // unix absolute, windows drive letter, or a variable reference
  path.starts_with('/')
    || path.chars().nth(1) == Some(':')
    || path.starts_with('$')
}

fn basename(path: &str) -> &str {
  let trimmed = path.trim_end_matches('/');
  trimmed.rsplit('/').next().unwrap_or(trimmed)
}

fn has_wildcard(sources: &[String]) -> bool {
  sources
    .iter()
    .any(|source| basename(source).contains(WILDCARD_CHARS))
}

/// DL3001: multiple CMD instructions within one stage; only the last
/// takes effect. Fires on every CMD except the last.
pub struct MultipleCmdRule;

impl Rule for MultipleCmdRule {
  fn id(&self) -> &'static str {
    RULE_MULTIPLE_CMD
  }

  fn name(&self) -> &'static str {
    "Multiple CMD instructions"
  }

  fn description(&self) -> &'static str {
    "Only the last CMD instruction takes effect; multiple CMD instructions are likely a mistake"
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }

  fn check(&self, dockerfile: &Dockerfile) -> Vec<Finding> {
    let mut findings = Vec::new();

    for stage in dockerfile.stages().iter() {
      let cmds: Vec<usize> = stage
        .instructions
        .iter()
        .filter_map(|ins| match ins {
          Instruction::Cmd(cmd) => Some(cmd.line),
          _ => None
        })
        .collect();

      if cmds.len() > 1 {
        for line in &cmds[..cmds.len() - 1] {
          findings.push(Finding {
            rule_id: self.id().to_string(),
            severity: self.severity(),
            line: *line,
            column: 1,
            message: "Multiple CMD instructions found; only the last one will take effect"
              .to_string(),
            suggestion: "Remove duplicate CMD instructions and keep only the final one"
              .to_string()
          });
        }
      }
    }

    findings
  }
}

/// DL3002: multiple ENTRYPOINT instructions within one stage.
pub struct MultipleEntrypointRule;

impl Rule for MultipleEntrypointRule {
  fn id(&self) -> &'static str {
    RULE_MULTIPLE_ENTRYPOINT
  }

  fn name(&self) -> &'static str {
    "Multiple ENTRYPOINT instructions"
  }

  fn description(&self) -> &'static str {
    "Only the last ENTRYPOINT instruction takes effect; multiple ENTRYPOINT instructions are likely a mistake"
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }

  fn check(&self, dockerfile: &Dockerfile) -> Vec<Finding> {
    let mut findings = Vec::new();

    for stage in dockerfile.stages().iter() {
      let entrypoints: Vec<usize> = stage
        .instructions
        .iter()
        .filter_map(|ins| match ins {
          Instruction::Entrypoint(ep) => Some(ep.line),
          _ => None
        })
        .collect();

      if entrypoints.len() > 1 {
        for line in &entrypoints[..entrypoints.len() - 1] {
          findings.push(Finding {
            rule_id: self.id().to_string(),
            severity: self.severity(),
            line: *line,
            column: 1,
            message: "Multiple ENTRYPOINT instructions found; only the last one will take effect"
              .to_string(),
            suggestion: "Remove duplicate ENTRYPOINT instructions and keep only the final one"
              .to_string()
          });
        }
      }
    }

    findings
  }
}

/// DL3003: WORKDIR with a relative path.
pub struct RelativeWorkdirRule;

impl Rule for RelativeWorkdirRule {
  fn id(&self) -> &'static str {
    RULE_RELATIVE_WORKDIR
  }

  fn name(&self) -> &'static str {
    "WORKDIR with relative path"
  }

  fn description(&self) -> &'static str {
    "Use absolute paths in WORKDIR to avoid confusion about the current directory"
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }

  fn check(&self, dockerfile: &Dockerfile) -> Vec<Finding> {
    let mut findings = Vec::new();

    for ins in &dockerfile.instructions {
      let workdir = match ins {
        Instruction::Workdir(workdir) => workdir,
        _ => continue
      };

      if !workdir.path.is_empty() && !is_absolute_path(&workdir.path) {
        findings.push(Finding {
          rule_id: self.id().to_string(),
          severity: self.severity(),
          line: workdir.line,
          column: 1,
          message: format!("WORKDIR uses relative path '{}'", workdir.path),
          suggestion: format!("Use an absolute path like '/{}' for clarity", workdir.path)
        });
      }
    }

    findings
  }
}

/// DL5000: no HEALTHCHECK anywhere in the file. Reported once, against
/// the last stage.
pub struct MissingHealthcheckRule;

impl Rule for MissingHealthcheckRule {
  fn id(&self) -> &'static str {
    RULE_MISSING_HEALTHCHECK
  }

  fn name(&self) -> &'static str {
    "Missing HEALTHCHECK"
  }

  fn description(&self) -> &'static str {
    "Add a HEALTHCHECK instruction to enable container health monitoring"
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }

  fn check(&self, dockerfile: &Dockerfile) -> Vec<Finding> {
    let has_healthcheck = dockerfile
      .instructions
      .iter()
      .any(|ins| matches!(ins, Instruction::Healthcheck(_)));

    if has_healthcheck {
      return Vec::new();
    }

    // anchored to the final image's stage; a FROM-less file has nowhere
    // to report
    let last_line = match dockerfile.stages().last() {
      Some(stage) => stage.last_line(),
      None => return Vec::new()
    };

    vec![Finding {
      rule_id: self.id().to_string(),
      severity: self.severity(),
      line: last_line,
      column: 1,
      message: "No HEALTHCHECK instruction found".to_string(),
      suggestion: "Add 'HEALTHCHECK CMD <command>' to enable container health monitoring"
        .to_string()
    }]
  }
}

/// DL5001 (Info): wildcard patterns in COPY/ADD sources.
pub struct WildcardCopyRule;

impl Rule for WildcardCopyRule {
  fn id(&self) -> &'static str {
    RULE_WILDCARD_COPY
  }

  fn name(&self) -> &'static str {
    "Wildcard in COPY/ADD source"
  }

  fn description(&self) -> &'static str {
    "Wildcard patterns in COPY/ADD may include unnecessary files, increasing build context size"
  }

  fn severity(&self) -> Severity {
    Severity::Info
  }

  fn check(&self, dockerfile: &Dockerfile) -> Vec<Finding> {
    let mut findings = Vec::new();

    for ins in &dockerfile.instructions {
      let (keyword, line, wildcard) = match ins {
        // copies from other stages read no build context
        Instruction::Copy(copy) if copy.from.is_none() => {
          ("COPY", copy.line, has_wildcard(&copy.sources))
        },
        Instruction::Add(add) => ("ADD", add.line, has_wildcard(&add.sources)),
        _ => continue
      };

      if wildcard {
        findings.push(Finding {
          rule_id: self.id().to_string(),
          severity: self.severity(),
          line,
          column: 1,
          message: format!(
            "{} uses wildcard pattern which may include unnecessary files",
            keyword
          ),
          suggestion: "Consider using explicit file paths or a .dockerignore file to exclude unnecessary files"
            .to_string()
        });
      }
    }

    findings
  }
}

pub(crate) fn register(registry: &mut RuleRegistry) {
  registry.register(Box::new(MultipleCmdRule));
  registry.register(Box::new(MultipleEntrypointRule));
  registry.register(Box::new(RelativeWorkdirRule));
  registry.register(Box::new(MissingHealthcheckRule));
  registry.register(Box::new(WildcardCopyRule));
}

// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

//! Security rules: DL4000, DL4001, DL4002, DL4003, DL4004.
//!
//! The secret-key rules match on ENV/ARG *names* only; their messages and
//! suggestions must never contain the instruction's value.

use lazy_static::lazy_static;
use regex::Regex;

use crate::dockerfile::{Dockerfile, Instruction};
use crate::finding::{Finding, Severity};
use crate::rules::*;

lazy_static! {
  /// Name fragments that suggest a key holds a secret.
  static ref SECRET_KEY: Regex = Regex::new(
    r"(?i)(password|passwd|secret|token|api[_-]?key|apikey|private[_-]?key|privatekey|access[_-]?key|accesskey|auth[_-]?token|credentials?|ssh[_-]?key|encryption[_-]?key)"
  ).unwrap();

  static ref URL_SOURCE: Regex = Regex::new(r"^https?://").unwrap();
}

const ARCHIVE_EXTENSIONS: &[&str] = &[
  ".tar", ".tar.gz", ".tgz", ".tar.bz2", ".tbz2", ".tar.xz", ".txz",
  ".zip", ".gz", ".bz2", ".xz",
];

fn is_secret_key(key: &str) -> bool {
  SECRET_KEY.is_match(key)
}

fn is_archive(filename: &str) -> bool {
  let lower = filename.to_ascii_lowercase();
  ARCHIVE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// DL4000: ENV key that looks like a secret.
pub struct SecretInEnvRule;

impl Rule for SecretInEnvRule {
  fn id(&self) -> &'static str {
    RULE_SECRET_IN_ENV
  }

  fn name(&self) -> &'static str {
    "Potential secret in ENV"
  }

  fn description(&self) -> &'static str {
    "Avoid storing secrets in ENV instructions as they persist in the image layers"
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }

  fn check(&self, dockerfile: &Dockerfile) -> Vec<Finding> {
    let mut findings = Vec::new();

    for ins in &dockerfile.instructions {
      let env = match ins {
        Instruction::Env(env) => env,
        _ => continue
      };

      if is_secret_key(&env.key) {
        findings.push(Finding {
          rule_id: self.id().to_string(),
          severity: self.severity(),
          line: env.line,
          column: 1,
          message: format!(
            "ENV instruction contains key '{}' which may contain a secret",
            env.key
          ),
          suggestion: "Use Docker secrets, build-time secrets (--secret), or runtime environment variables instead"
            .to_string()
        });
      }
    }

    findings
  }
}

/// DL4001: ARG name that looks like a secret.
pub struct SecretInArgRule;

impl Rule for SecretInArgRule {
  fn id(&self) -> &'static str {
    RULE_SECRET_IN_ARG
  }

  fn name(&self) -> &'static str {
    "Potential secret in ARG"
  }

  fn description(&self) -> &'static str {
    "Avoid storing secrets in ARG instructions as they are visible in image history"
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }

  fn check(&self, dockerfile: &Dockerfile) -> Vec<Finding> {
    let mut findings = Vec::new();

    for ins in &dockerfile.instructions {
      let arg = match ins {
        Instruction::Arg(arg) => arg,
        _ => continue
      };

      if is_secret_key(&arg.name) {
        findings.push(Finding {
          rule_id: self.id().to_string(),
          severity: self.severity(),
          line: arg.line,
          column: 1,
          message: format!(
            "ARG instruction contains name '{}' which may contain a secret",
            arg.name
          ),
          suggestion: "Use Docker secrets or build-time secrets (--secret) instead of ARG for sensitive values"
            .to_string()
        });
      }
    }

    findings
  }
}

/// DL4002: a stage without a USER instruction runs as root. One finding
/// per offending stage, anchored to the stage's last instruction line.
pub struct NoUserRule;

impl Rule for NoUserRule {
  fn id(&self) -> &'static str {
    RULE_NO_USER
  }

  fn name(&self) -> &'static str {
    "No USER instruction"
  }

  fn description(&self) -> &'static str {
    "Containers should not run as root; specify a USER instruction"
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }

  fn check(&self, dockerfile: &Dockerfile) -> Vec<Finding> {
    let mut findings = Vec::new();

    for stage in dockerfile.stages().iter() {
      let has_user = stage
        .instructions
        .iter()
        .any(|ins| matches!(ins, Instruction::User(_)));

      if has_user {
        continue;
      }

      let stage_name = match &stage.name {
        Some(name) => name.clone(),
        None => format!("stage {}", stage.index)
      };

      findings.push(Finding {
        rule_id: self.id().to_string(),
        severity: self.severity(),
        line: stage.last_line(),
        column: 1,
        message: format!(
          "No USER instruction in {}; container will run as root",
          stage_name
        ),
        suggestion: "Add 'USER <username>' instruction to run container as non-root user"
          .to_string()
      });
    }

    findings
  }
}

/// DL4003: ADD fetching a URL.
pub struct AddWithUrlRule;

impl Rule for AddWithUrlRule {
  fn id(&self) -> &'static str {
    RULE_ADD_WITH_URL
  }

  fn name(&self) -> &'static str {
    "ADD with URL"
  }

  fn description(&self) -> &'static str {
    "Using ADD with URLs is discouraged; use curl or wget in RUN for better control"
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }

  fn check(&self, dockerfile: &Dockerfile) -> Vec<Finding> {
    let mut findings = Vec::new();

    for ins in &dockerfile.instructions {
      let add = match ins {
        Instruction::Add(add) => add,
        _ => continue
      };

      // at most one finding per instruction
      if add.sources.iter().any(|source| URL_SOURCE.is_match(source)) {
        findings.push(Finding {
          rule_id: self.id().to_string(),
          severity: self.severity(),
          line: add.line,
          column: 1,
          message: "ADD with URL source is not recommended".to_string(),
          suggestion: "Use 'RUN curl -o <dest> <url>' or 'RUN wget -O <dest> <url>' for better caching and security"
            .to_string()
        });
      }
    }

    findings
  }
}

/// DL4004: ADD used where COPY would suffice (no URL, no archive to
/// extract).
pub struct AddOverCopyRule;

impl Rule for AddOverCopyRule {
  fn id(&self) -> &'static str {
    RULE_ADD_OVER_COPY
  }

  fn name(&self) -> &'static str {
    "ADD where COPY would suffice"
  }

  fn description(&self) -> &'static str {
    "Use COPY instead of ADD when not extracting archives or fetching URLs"
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }

  fn check(&self, dockerfile: &Dockerfile) -> Vec<Finding> {
    let mut findings = Vec::new();

    for ins in &dockerfile.instructions {
      let add = match ins {
        Instruction::Add(add) => add,
        _ => continue
      };

      let has_url = add.sources.iter().any(|source| URL_SOURCE.is_match(source));
      let has_archive = add.sources.iter().any(|source| is_archive(source));

      if !has_url && !has_archive {
        findings.push(Finding {
          rule_id: self.id().to_string(),
          severity: self.severity(),
          line: add.line,
          column: 1,
          message: "ADD used where COPY would suffice".to_string(),
          suggestion: "Use COPY instead of ADD for simple file copying; ADD should only be used for URL fetching or archive extraction"
            .to_string()
        });
      }
    }

    findings
  }
}

pub(crate) fn register(registry: &mut RuleRegistry) {
  registry.register(Box::new(SecretInEnvRule));
  registry.register(Box::new(SecretInArgRule));
  registry.register(Box::new(NoUserRule));
  registry.register(Box::new(AddWithUrlRule));
  registry.register(Box::new(AddOverCopyRule));
}

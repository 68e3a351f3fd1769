// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

//! Layer optimization rules: DL3009, DL3010, DL3011, DL3012.

use lazy_static::lazy_static;
use regex::Regex;

use crate::dockerfile::{Dockerfile, Instruction};
use crate::finding::{Finding, Severity};
use crate::rules::*;
use crate::stage::Stage;

lazy_static! {
  static ref APT_GET_INSTALL: Regex =
    Regex::new(r"apt-get\s+(install|upgrade)").unwrap();
  static ref APT_GET_CLEAN: Regex =
    Regex::new(r"(apt-get\s+clean|rm\s+-rf?\s+/var/lib/apt/lists)").unwrap();

  static ref YUM_INSTALL: Regex =
    Regex::new(r"(yum|dnf)\s+install").unwrap();
  static ref YUM_CLEAN: Regex =
    Regex::new(r"(yum|dnf)\s+clean\s+all").unwrap();

  static ref APK_ADD: Regex =
    Regex::new(r"apk\s+(add|update)").unwrap();
  static ref APK_NO_CACHE: Regex =
    Regex::new(r"(apk\s+add\s+[^\n]*--no-cache|rm\s+-rf?\s+/var/cache/apk)").unwrap();

  static ref PIP_INSTALL: Regex =
    Regex::new(r"pip[3]?\s+install").unwrap();
  static ref PIP_NO_CACHE: Regex =
    Regex::new(r"pip[3]?\s+install\s+[^\n]*--no-cache-dir").unwrap();

  static ref APT_GET_UPDATE: Regex =
    Regex::new(r"apt-get\s+update").unwrap();
  static ref YUM_MAKECACHE: Regex =
    Regex::new(r"(yum|dnf)\s+makecache").unwrap();
}

/// Dependency manifest basenames whose early COPY is deliberate: copying
/// only the manifest before installing keeps the install layer cacheable.
const PACKAGE_MANIFESTS: &[&str] = &[
  "requirements.txt",
  "package.json",
  "package-lock.json",
  "yarn.lock",
  "go.mod",
  "go.sum",
  "gemfile",
  "gemfile.lock",
  "cargo.toml",
  "cargo.lock",
  "pom.xml",
  "build.gradle",
  "composer.json",
  "composer.lock",
];

fn is_package_install(command: &str) -> bool {
  APT_GET_INSTALL.is_match(command)
    || YUM_INSTALL.is_match(command)
    || APK_ADD.is_match(command)
    || PIP_INSTALL.is_match(command)
    || command.contains("npm install")
    || command.contains("yarn install")
    || command.contains("go mod download")
}

fn is_package_manifest(dest: &str) -> bool {
  let dest = dest.to_ascii_lowercase();
  PACKAGE_MANIFESTS.iter().any(|manifest| dest.contains(manifest))
}

/// DL3009: package manager installs without cache cleanup in the same
/// layer.
pub struct CacheNotCleanedRule;

impl Rule for CacheNotCleanedRule {
  fn id(&self) -> &'static str {
    RULE_CACHE_NOT_CLEANED
  }

  fn name(&self) -> &'static str {
    "Package manager cache not cleaned"
  }

  fn description(&self) -> &'static str {
    "Clean package manager cache in the same RUN instruction to reduce image size"
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }

  fn check(&self, dockerfile: &Dockerfile) -> Vec<Finding> {
    let mut findings = Vec::new();

    for ins in &dockerfile.instructions {
      let run = match ins {
        Instruction::Run(run) => run,
        _ => continue
      };

      let cmd = &run.command;
      let (message, suggestion) =
        if APT_GET_INSTALL.is_match(cmd) && !APT_GET_CLEAN.is_match(cmd) {
          (
            "apt-get install without cache cleanup increases image size",
            "Add 'apt-get clean && rm -rf /var/lib/apt/lists/*' in the same RUN instruction"
          )
        } else if YUM_INSTALL.is_match(cmd) && !YUM_CLEAN.is_match(cmd) {
          (
            "yum/dnf install without cache cleanup increases image size",
            "Add 'yum clean all' or 'dnf clean all' in the same RUN instruction"
          )
        } else if APK_ADD.is_match(cmd) && !APK_NO_CACHE.is_match(cmd) {
          (
            "apk add without --no-cache increases image size",
            "Use 'apk add --no-cache' or add 'rm -rf /var/cache/apk/*'"
          )
        } else if PIP_INSTALL.is_match(cmd) && !PIP_NO_CACHE.is_match(cmd) {
          (
            "pip install without --no-cache-dir increases image size",
            "Use 'pip install --no-cache-dir' to avoid caching packages"
          )
        } else {
          continue;
        };

      findings.push(Finding {
        rule_id: self.id().to_string(),
        severity: self.severity(),
        line: run.line,
        column: 1,
        message: message.to_string(),
        suggestion: suggestion.to_string()
      });
    }

    findings
  }
}

/// DL3010: runs of consecutive RUN instructions that could be a single
/// layer. Reported once per maximal run, at its first RUN.
pub struct ConsecutiveRunRule;

impl ConsecutiveRunRule {
  fn flush(&self, count: usize, first_line: usize, findings: &mut Vec<Finding>) {
    if count < 2 {
      return;
    }

    findings.push(Finding {
      rule_id: self.id().to_string(),
      severity: self.severity(),
      line: first_line,
      column: 1,
      message: format!(
        "Found {} consecutive RUN instructions that could be combined",
        count
      ),
      suggestion: "Combine RUN instructions using '&&' to reduce layers".to_string()
    });
  }
}

impl Rule for ConsecutiveRunRule {
  fn id(&self) -> &'static str {
    RULE_CONSECUTIVE_RUN
  }

  fn name(&self) -> &'static str {
    "Consecutive RUN instructions"
  }

  fn description(&self) -> &'static str {
    "Combine consecutive RUN instructions to reduce the number of layers"
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }

  fn check(&self, dockerfile: &Dockerfile) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut count = 0;
    let mut first_line = 0;

    for ins in &dockerfile.instructions {
      if let Instruction::Run(run) = ins {
        if count == 0 {
          first_line = run.line;
        }

        count += 1;
      } else {
        self.flush(count, first_line, &mut findings);
        count = 0;
      }
    }

    // the list may end mid-run
    self.flush(count, first_line, &mut findings);

    findings
  }
}

/// DL3011: COPY/ADD placed before a package install that another COPY/ADD
/// follows, hurting layer cache reuse.
pub struct SuboptimalOrderingRule;

impl SuboptimalOrderingRule {
  fn check_stage(&self, stage: &Stage, findings: &mut Vec<Finding>) {
    let instructions = &stage.instructions;

    let is_copy_like = |ins: &Instruction| match ins {
      // copies from other stages are not build-context sensitive
      Instruction::Copy(copy) => copy.from.is_none(),
      Instruction::Add(_) => true,
      _ => false
    };

    let install_positions: Vec<usize> = instructions
      .iter()
      .enumerate()
      .filter_map(|(i, ins)| match ins {
        Instruction::Run(run) if is_package_install(&run.command) => Some(i),
        _ => None
      })
      .collect();

    for (i, ins) in instructions.iter().enumerate() {
      let dest = match *ins {
        Instruction::Copy(copy) if copy.from.is_none() => &copy.dest,
        Instruction::Add(add) => &add.dest,
        _ => continue
      };

      if is_package_manifest(dest) {
        continue;
      }

      // flag when a package install follows, and some other COPY/ADD
      // follows that install
      let offending = install_positions.iter().any(|&j| {
        j > i && instructions[j + 1..].iter().any(|later| is_copy_like(later))
      });

      if offending {
        findings.push(Finding {
          rule_id: self.id().to_string(),
          severity: self.severity(),
          line: ins.line(),
          column: 1,
          message: "COPY/ADD before package installation may reduce cache efficiency"
            .to_string(),
          suggestion: "Move COPY/ADD after RUN instructions that don't depend on copied files"
            .to_string()
        });
      }
    }
  }
}

impl Rule for SuboptimalOrderingRule {
  fn id(&self) -> &'static str {
    RULE_SUBOPTIMAL_ORDERING
  }

  fn name(&self) -> &'static str {
    "Suboptimal layer ordering"
  }

  fn description(&self) -> &'static str {
    "Place instructions that change less frequently earlier to optimize layer caching"
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }

  fn check(&self, dockerfile: &Dockerfile) -> Vec<Finding> {
    let mut findings = Vec::new();

    for stage in dockerfile.stages().iter() {
      self.check_stage(stage, &mut findings);
    }

    findings
  }
}

/// DL3012: package index refresh without an install in the same layer.
pub struct UpdateWithoutInstallRule;

impl Rule for UpdateWithoutInstallRule {
  fn id(&self) -> &'static str {
    RULE_UPDATE_WITHOUT_INSTALL
  }

  fn name(&self) -> &'static str {
    "Package update without install"
  }

  fn description(&self) -> &'static str {
    "Combine package update with install in the same RUN instruction to avoid cache issues"
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }

  fn check(&self, dockerfile: &Dockerfile) -> Vec<Finding> {
    let mut findings = Vec::new();

    for ins in &dockerfile.instructions {
      let run = match ins {
        Instruction::Run(run) => run,
        _ => continue
      };

      let cmd = &run.command;
      let (message, suggestion) =
        if APT_GET_UPDATE.is_match(cmd) && !APT_GET_INSTALL.is_match(cmd) {
          (
            "apt-get update without install in same RUN instruction",
            "Combine 'apt-get update' with 'apt-get install' in the same RUN instruction"
          )
        } else if YUM_MAKECACHE.is_match(cmd) && !YUM_INSTALL.is_match(cmd) {
          (
            "yum/dnf makecache without install in same RUN instruction",
            "Combine cache refresh with install in the same RUN instruction"
          )
        } else {
          continue;
        };

      findings.push(Finding {
        rule_id: self.id().to_string(),
        severity: self.severity(),
        line: run.line,
        column: 1,
        message: message.to_string(),
        suggestion: suggestion.to_string()
      });
    }

    findings
  }
}

pub(crate) fn register(registry: &mut RuleRegistry) {
  registry.register(Box::new(CacheNotCleanedRule));
  registry.register(Box::new(ConsecutiveRunRule));
  registry.register(Box::new(SuboptimalOrderingRule));
  registry.register(Box::new(UpdateWithoutInstallRule));
}

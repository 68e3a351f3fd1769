// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

//! Base image selection rules: DL3006, DL3007, DL3008.

use crate::dockerfile::{Dockerfile, Instruction};
use crate::finding::{Finding, Severity};
use crate::image::base_name;
use crate::instructions::FromInstruction;
use crate::rules::*;

/// Known large base images paired with their suggested smaller variants.
static LARGE_BASE_IMAGES: &[(&str, &str)] = &[
  ("amazonlinux", "alpine or distroless"),
  ("centos", "alpine or distroless"),
  ("debian", "debian:*-slim or alpine"),
  ("fedora", "alpine or distroless"),
  ("golang", "golang:*-alpine or distroless"),
  ("java", "eclipse-temurin:*-alpine or distroless"),
  ("node", "node:*-slim or node:*-alpine"),
  ("openjdk", "openjdk:*-slim or eclipse-temurin:*-alpine"),
  ("oraclelinux", "alpine or distroless"),
  ("perl", "perl:*-slim"),
  ("php", "php:*-alpine"),
  ("python", "python:*-slim or python:*-alpine"),
  ("ruby", "ruby:*-slim or ruby:*-alpine"),
  ("rust", "rust:*-slim or rust:*-alpine"),
  ("ubuntu", "ubuntu:*-slim or alpine"),
];

const SLIM_INDICATORS: &[&str] = &[
  "slim", "alpine", "minimal", "distroless", "scratch", "tiny", "micro"
];

fn is_scratch(from: &FromInstruction) -> bool {
  from.image.eq_ignore_ascii_case("scratch")
}

fn is_slim_variant(tag: &str) -> bool {
  if tag.is_empty() {
    return false;
  }

  let tag = tag.to_ascii_lowercase();
  SLIM_INDICATORS.iter().any(|indicator| tag.contains(indicator))
}

fn froms<'a>(dockerfile: &'a Dockerfile) -> impl Iterator<Item = &'a FromInstruction> + 'a {
  dockerfile.instructions.iter().filter_map(|ins| match ins {
    Instruction::From(from) => Some(from),
    _ => None
  })
}

/// DL3006: FROM without an explicit image tag.
pub struct MissingTagRule;

impl Rule for MissingTagRule {
  fn id(&self) -> &'static str {
    RULE_MISSING_TAG
  }

  fn name(&self) -> &'static str {
    "Missing explicit image tag"
  }

  fn description(&self) -> &'static str {
    "Always tag the version of an image explicitly to ensure reproducible builds"
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }

  fn check(&self, dockerfile: &Dockerfile) -> Vec<Finding> {
    let mut findings = Vec::new();

    for from in froms(dockerfile) {
      // scratch needs no tag, and a digest is more specific than one
      if is_scratch(from) || from.digest.is_some() {
        continue;
      }

      if from.tag.as_deref().unwrap_or("").is_empty() {
        findings.push(Finding {
          rule_id: self.id().to_string(),
          severity: self.severity(),
          line: from.line,
          column: 1,
          message: format!(
            "Image '{}' does not have an explicit tag, defaulting to 'latest'",
            from.image
          ),
          suggestion: format!(
            "Use explicit tag like '{}:<version>' for reproducible builds",
            from.image
          )
        });
      }
    }

    findings
  }
}

/// DL3007: FROM pinned to the mutable `latest` tag.
pub struct LatestTagRule;

impl Rule for LatestTagRule {
  fn id(&self) -> &'static str {
    RULE_LATEST_TAG
  }

  fn name(&self) -> &'static str {
    "Using 'latest' tag"
  }

  fn description(&self) -> &'static str {
    "Using 'latest' tag can lead to unpredictable builds as the image may change"
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }

  fn check(&self, dockerfile: &Dockerfile) -> Vec<Finding> {
    let mut findings = Vec::new();

    for from in froms(dockerfile) {
      if is_scratch(from) || from.digest.is_some() {
        continue;
      }

      let tag = from.tag.as_deref().unwrap_or("");
      if tag.eq_ignore_ascii_case("latest") {
        findings.push(Finding {
          rule_id: self.id().to_string(),
          severity: self.severity(),
          line: from.line,
          column: 1,
          message: format!(
            "Using 'latest' tag for image '{}' is not recommended",
            from.image
          ),
          suggestion: format!(
            "Pin to a specific version like '{}:<version>' for reproducible builds",
            from.image
          )
        });
      }
    }

    findings
  }
}

/// DL3008: a known large base image without a slim variant tag.
pub struct LargeBaseImageRule;

impl Rule for LargeBaseImageRule {
  fn id(&self) -> &'static str {
    RULE_LARGE_BASE_IMAGE
  }

  fn name(&self) -> &'static str {
    "Large base image"
  }

  fn description(&self) -> &'static str {
    "Consider using a smaller base image variant to reduce image size"
  }

  fn severity(&self) -> Severity {
    Severity::Warning
  }

  fn check(&self, dockerfile: &Dockerfile) -> Vec<Finding> {
    let mut findings = Vec::new();

    for from in froms(dockerfile) {
      let name = base_name(&from.image);
      let alternative = match LARGE_BASE_IMAGES.iter().find(|(image, _)| *image == name) {
        Some((_, alternative)) => alternative,
        None => continue
      };

      if is_slim_variant(from.tag.as_deref().unwrap_or("")) {
        continue;
      }

      findings.push(Finding {
        rule_id: self.id().to_string(),
        severity: self.severity(),
        line: from.line,
        column: 1,
        message: format!("Image '{}' is a large base image", from.image),
        suggestion: format!("Consider using {} for smaller image size", alternative)
      });
    }

    findings
  }
}

pub(crate) fn register(registry: &mut RuleRegistry) {
  registry.register(Box::new(MissingTagRule));
  registry.register(Box::new(LatestTagRule));
  registry.register(Box::new(LargeBaseImageRule));
}

// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

//! The lint rule catalogue and its registry.

use std::collections::BTreeMap;

use lazy_static::lazy_static;

use crate::dockerfile::Dockerfile;
use crate::finding::{Finding, Severity};

mod base_image;
mod bestpractice;
mod layer;
mod security;

// layer optimization rules
pub const RULE_MISSING_TAG: &str = "DL3006";
pub const RULE_LATEST_TAG: &str = "DL3007";
pub const RULE_LARGE_BASE_IMAGE: &str = "DL3008";
pub const RULE_CACHE_NOT_CLEANED: &str = "DL3009";
pub const RULE_CONSECUTIVE_RUN: &str = "DL3010";
pub const RULE_SUBOPTIMAL_ORDERING: &str = "DL3011";
pub const RULE_UPDATE_WITHOUT_INSTALL: &str = "DL3012";

// best practice rules
pub const RULE_MULTIPLE_CMD: &str = "DL3001";
pub const RULE_MULTIPLE_ENTRYPOINT: &str = "DL3002";
pub const RULE_RELATIVE_WORKDIR: &str = "DL3003";
pub const RULE_MISSING_HEALTHCHECK: &str = "DL5000";
pub const RULE_WILDCARD_COPY: &str = "DL5001";

// security rules
pub const RULE_SECRET_IN_ENV: &str = "DL4000";
pub const RULE_SECRET_IN_ARG: &str = "DL4001";
pub const RULE_NO_USER: &str = "DL4002";
pub const RULE_ADD_WITH_URL: &str = "DL4003";
pub const RULE_ADD_OVER_COPY: &str = "DL4004";

/// A single lint rule.
///
/// Rules are pure over the tree: they never fail, and they never mutate
/// anything. Rules that match on ENV/ARG key names must construct
/// messages that quote only the key, never the value.
pub trait Rule: Send + Sync {
  /// The unique identifier for this rule, e.g. `DL3006`.
  fn id(&self) -> &'static str;

  /// A short human-readable name.
  fn name(&self) -> &'static str;

  /// A detailed description of what this rule checks.
  fn description(&self) -> &'static str;

  /// The severity of findings from this rule.
  fn severity(&self) -> Severity;

  /// Analyzes the Dockerfile and returns any findings.
  fn check(&self, dockerfile: &Dockerfile) -> Vec<Finding>;
}

/// The collection of available lint rules, iterated in sorted-identifier
/// order for deterministic output.
pub struct RuleRegistry {
  rules: BTreeMap<&'static str, Box<dyn Rule>>
}

impl RuleRegistry {
  pub fn new() -> RuleRegistry {
    RuleRegistry {
      rules: BTreeMap::new()
    }
  }

  /// Adds a rule to the registry. A rule with the same identifier is
  /// replaced, making registration idempotent.
  pub fn register(&mut self, rule: Box<dyn Rule>) {
    self.rules.insert(rule.id(), rule);
  }

  /// Retrieves a rule by its identifier.
  pub fn get(&self, id: &str) -> Option<&dyn Rule> {
    self.rules.get(id).map(|rule| &**rule)
  }

  /// Iterates over all rules in sorted-identifier order.
  pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
    self.rules.values().map(|rule| &**rule)
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }
}

impl Default for RuleRegistry {
  fn default() -> Self {
    RuleRegistry::new()
  }
}

lazy_static! {
  static ref DEFAULT_REGISTRY: RuleRegistry = {
    let mut registry = RuleRegistry::new();
    base_image::register(&mut registry);
    bestpractice::register(&mut registry);
    layer::register(&mut registry);
    security::register(&mut registry);
    registry
  };
}

/// The process-wide registry holding every built-in rule. Initialized
/// once and read-only thereafter.
pub fn default_registry() -> &'static RuleRegistry {
  &DEFAULT_REGISTRY
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn default_registry_holds_the_full_catalogue() {
    let ids: Vec<&str> = default_registry().iter().map(|r| r.id()).collect();

    assert_eq!(ids, vec![
      "DL3001", "DL3002", "DL3003", "DL3006", "DL3007", "DL3008",
      "DL3009", "DL3010", "DL3011", "DL3012", "DL4000", "DL4001",
      "DL4002", "DL4003", "DL4004", "DL5000", "DL5001",
    ]);
  }

  #[test]
  fn registry_lookup() {
    let registry = default_registry();

    let rule = registry.get(RULE_MISSING_TAG).unwrap();
    assert_eq!(rule.id(), "DL3006");
    assert!(!rule.name().is_empty());
    assert!(!rule.description().is_empty());

    assert!(registry.get("DL9999").is_none());
  }

  #[test]
  fn registration_is_idempotent() {
    struct Nop;

    impl Rule for Nop {
      fn id(&self) -> &'static str { "DLTEST" }
      fn name(&self) -> &'static str { "nop" }
      fn description(&self) -> &'static str { "does nothing" }
      fn severity(&self) -> Severity { Severity::Info }
      fn check(&self, _dockerfile: &Dockerfile) -> Vec<Finding> { Vec::new() }
    }

    let mut registry = RuleRegistry::new();
    registry.register(Box::new(Nop));
    registry.register(Box::new(Nop));

    assert_eq!(registry.len(), 1);
  }
}

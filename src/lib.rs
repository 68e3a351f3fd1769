// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

#![forbid(unsafe_code)]

//! # docker-lint
//!
//! Static analysis for Dockerfiles. The analysis pipeline tokenizes the
//! surface syntax, parses a typed instruction tree (grouping multi-stage
//! builds and extracting inline ignore directives), and runs a fixed rule
//! catalogue over that tree, yielding a deterministic, sorted stream of
//! findings. No build is ever executed and nothing touches the network.
//!
//! ## Quick start
//!
//! ```rust
//! use docker_lint::{Analyzer, Config, Dockerfile};
//!
//! let dockerfile = Dockerfile::parse(r#"
//! FROM ubuntu
//! RUN apt-get update
//! "#).unwrap();
//!
//! let findings = Analyzer::with_defaults(Config::default()).analyze(&dockerfile);
//!
//! for finding in &findings {
//!   println!("{}:{}: {}", finding.line, finding.rule_id, finding.message);
//! }
//! # assert!(findings.iter().any(|f| f.rule_id == "DL3006"));
//! ```

use std::collections::HashMap;

mod analyzer;
mod dockerfile;
mod error;
mod finding;
mod image;
mod instructions;
mod lexer;
mod parser;
mod render;
mod stage;
mod util;

pub mod cli;
pub mod rules;

pub use analyzer::*;
pub use dockerfile::*;
pub use error::*;
pub use finding::*;
pub use image::ImageRef;
pub use instructions::*;
pub use lexer::*;
pub use parser::Parser;
pub use render::*;
pub use stage::*;

/// Rule identifiers suppressed per source line, as recorded from inline
/// ignore directives.
pub type IgnoreMap = HashMap<usize, Vec<String>>;

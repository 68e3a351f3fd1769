// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use std::fmt;
use std::io::{BufReader, Read};
use std::str::FromStr;

use snafu::ResultExt;

use crate::error::*;
use crate::instructions::*;
use crate::parser::Parser;
use crate::stage::Stages;
use crate::IgnoreMap;

/// A single Dockerfile instruction.
///
/// Individual instruction structures may be unpacked with pattern matching
/// or via the `TryFrom` impls on each instruction type.
///
/// # Example
///
/// ```
/// use std::convert::TryInto;
/// use docker_lint::*;
///
/// let dockerfile = Dockerfile::parse("FROM alpine:3.18").unwrap();
/// let from: &FromInstruction = dockerfile.instructions
///   .get(0).unwrap()
///   .try_into().unwrap();
///
/// assert_eq!(from.tag, Some("3.18".to_string()));
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Instruction {
  From(FromInstruction),
  Run(RunInstruction),
  Copy(CopyInstruction),
  Add(AddInstruction),
  Env(EnvInstruction),
  Arg(ArgInstruction),
  Expose(ExposeInstruction),
  Workdir(WorkdirInstruction),
  User(UserInstruction),
  Label(LabelInstruction),
  Volume(VolumeInstruction),
  Cmd(CmdInstruction),
  Entrypoint(EntrypointInstruction),
  Healthcheck(HealthcheckInstruction),
  Shell(ShellInstruction),
  Stopsignal(StopsignalInstruction),
  Onbuild(OnbuildInstruction)
}

/// Maps an instruction struct to its enum variant, implementing From<T> on
/// Instruction for it.
macro_rules! impl_from_instruction {
  ($struct:ident, $enum:expr) => {
    impl From<$struct> for Instruction {
      fn from(ins: $struct) -> Self {
        $enum(ins)
      }
    }
  };
}

impl_from_instruction!(FromInstruction, Instruction::From);
impl_from_instruction!(RunInstruction, Instruction::Run);
impl_from_instruction!(CopyInstruction, Instruction::Copy);
impl_from_instruction!(AddInstruction, Instruction::Add);
impl_from_instruction!(EnvInstruction, Instruction::Env);
impl_from_instruction!(ArgInstruction, Instruction::Arg);
impl_from_instruction!(ExposeInstruction, Instruction::Expose);
impl_from_instruction!(WorkdirInstruction, Instruction::Workdir);
impl_from_instruction!(UserInstruction, Instruction::User);
impl_from_instruction!(LabelInstruction, Instruction::Label);
impl_from_instruction!(VolumeInstruction, Instruction::Volume);
impl_from_instruction!(CmdInstruction, Instruction::Cmd);
impl_from_instruction!(EntrypointInstruction, Instruction::Entrypoint);
impl_from_instruction!(HealthcheckInstruction, Instruction::Healthcheck);
impl_from_instruction!(ShellInstruction, Instruction::Shell);
impl_from_instruction!(StopsignalInstruction, Instruction::Stopsignal);
impl_from_instruction!(OnbuildInstruction, Instruction::Onbuild);

impl Instruction {
  /// The 1-based source line of the first token of this instruction.
  pub fn line(&self) -> usize {
    match self {
      Instruction::From(i) => i.line,
      Instruction::Run(i) => i.line,
      Instruction::Copy(i) => i.line,
      Instruction::Add(i) => i.line,
      Instruction::Env(i) => i.line,
      Instruction::Arg(i) => i.line,
      Instruction::Expose(i) => i.line,
      Instruction::Workdir(i) => i.line,
      Instruction::User(i) => i.line,
      Instruction::Label(i) => i.line,
      Instruction::Volume(i) => i.line,
      Instruction::Cmd(i) => i.line,
      Instruction::Entrypoint(i) => i.line,
      Instruction::Healthcheck(i) => i.line,
      Instruction::Shell(i) => i.line,
      Instruction::Stopsignal(i) => i.line,
      Instruction::Onbuild(i) => i.line
    }
  }

  /// The original source text of the instruction, without its trailing
  /// newline.
  pub fn raw(&self) -> &str {
    match self {
      Instruction::From(i) => &i.raw,
      Instruction::Run(i) => &i.raw,
      Instruction::Copy(i) => &i.raw,
      Instruction::Add(i) => &i.raw,
      Instruction::Env(i) => &i.raw,
      Instruction::Arg(i) => &i.raw,
      Instruction::Expose(i) => &i.raw,
      Instruction::Workdir(i) => &i.raw,
      Instruction::User(i) => &i.raw,
      Instruction::Label(i) => &i.raw,
      Instruction::Volume(i) => &i.raw,
      Instruction::Cmd(i) => &i.raw,
      Instruction::Entrypoint(i) => &i.raw,
      Instruction::Healthcheck(i) => &i.raw,
      Instruction::Shell(i) => &i.raw,
      Instruction::Stopsignal(i) => &i.raw,
      Instruction::Onbuild(i) => &i.raw
    }
  }
}

impl fmt::Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Instruction::From(i) => i.fmt(f),
      Instruction::Run(i) => i.fmt(f),
      Instruction::Copy(i) => i.fmt(f),
      Instruction::Add(i) => i.fmt(f),
      Instruction::Env(i) => i.fmt(f),
      Instruction::Arg(i) => i.fmt(f),
      Instruction::Expose(i) => i.fmt(f),
      Instruction::Workdir(i) => i.fmt(f),
      Instruction::User(i) => i.fmt(f),
      Instruction::Label(i) => i.fmt(f),
      Instruction::Volume(i) => i.fmt(f),
      Instruction::Cmd(i) => i.fmt(f),
      Instruction::Entrypoint(i) => i.fmt(f),
      Instruction::Healthcheck(i) => i.fmt(f),
      Instruction::Shell(i) => i.fmt(f),
      Instruction::Stopsignal(i) => i.fmt(f),
      Instruction::Onbuild(i) => i.fmt(f)
    }
  }
}

/// A comment line, preserving its leading `#`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Comment {
  pub line: usize,
  pub text: String
}

/// A parsed Dockerfile.
///
/// An ordered list of all instructions is available via `instructions`,
/// and individual stages in a multi-stage build may be iterated over
/// using `Dockerfile::stages()`.
///
/// # Example
/// ```
/// use docker_lint::Dockerfile;
///
/// let dockerfile = Dockerfile::parse(concat!(
///   "FROM golang:1.21-alpine AS builder\n",
///   "RUN go build -o /out/app ./cmd/app\n",
///   "FROM alpine:3.18\n",
///   "COPY --from=builder /out/app /usr/bin/app\n",
/// )).unwrap();
///
/// assert_eq!(dockerfile.instructions.len(), 4);
/// assert_eq!(dockerfile.stages().len(), 2);
/// ```
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Dockerfile {
  /// An ordered list of all parsed instructions, including every FROM.
  pub instructions: Vec<Instruction>,

  /// All comment lines, in source order.
  pub comments: Vec<Comment>,

  /// Rule identifiers suppressed per source line by inline ignore
  /// directives (`# docker-lint ignore: ...` applies to the next line).
  pub inline_ignores: IgnoreMap
}

impl Dockerfile {
  /// Parses a Dockerfile from a string.
  ///
  /// The first recorded parse error is returned; use
  /// [`Dockerfile::parse_lenient`] to obtain the best-effort partial tree
  /// alongside any errors.
  pub fn parse(input: &str) -> Result<Dockerfile> {
    let (dockerfile, mut errors) = Parser::new(input.as_bytes()).parse();

    if errors.is_empty() {
      Ok(dockerfile)
    } else {
      Err(errors.remove(0))
    }
  }

  /// Parses a Dockerfile from a reader.
  pub fn from_reader<R: Read>(reader: R) -> Result<Dockerfile> {
    let mut buf = String::new();
    let mut buf_reader = BufReader::new(reader);
    buf_reader.read_to_string(&mut buf).context(ReadSnafu)?;

    Dockerfile::parse(&buf)
  }

  /// Parses a Dockerfile, returning the partial tree and every error
  /// recorded along the way. Malformed instructions are skipped; all
  /// well-formed ones are retained.
  pub fn parse_lenient(input: &str) -> (Dockerfile, Vec<Error>) {
    Parser::new(input.as_bytes()).parse()
  }

  /// Splits this Dockerfile into its build stages.
  pub fn stages(&self) -> Stages {
    Stages::new(self)
  }
}

impl fmt::Display for Dockerfile {
  /// Renders the instruction tree back to canonical Dockerfile text, one
  /// instruction per line. Comments and original spacing are not
  /// preserved; re-parsing the output yields an equivalent tree.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, ins) in self.instructions.iter().enumerate() {
      if i > 0 {
        writeln!(f)?;
      }

      write!(f, "{}", ins)?;
    }

    Ok(())
  }
}

impl FromStr for Dockerfile {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Dockerfile::parse(s)
  }
}

// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use std::convert::TryFrom;
use std::fmt;

use crate::dockerfile::Instruction;
use crate::error::*;
use crate::util::is_exec_form;

/// A Dockerfile [`RUN` instruction][run].
///
/// The command text is kept verbatim; `shell_form` is false iff the
/// argument is a JSON-array exec form. Rules match textual patterns over
/// `command` either way.
///
/// [run]: https://docs.docker.com/engine/reference/builder/#run
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RunInstruction {
  pub line: usize,
  pub raw: String,

  pub command: String,
  pub shell_form: bool
}

impl RunInstruction {
  pub(crate) fn parse(line: usize, raw: &str, args: &str) -> Result<RunInstruction> {
    Ok(RunInstruction {
      line,
      raw: raw.to_string(),
      command: args.to_string(),
      shell_form: !is_exec_form(args)
    })
  }
}

impl fmt::Display for RunInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.command.is_empty() {
      write!(f, "RUN")
    } else {
      write!(f, "RUN {}", self.command)
    }
  }
}

impl<'a> TryFrom<&'a Instruction> for &'a RunInstruction {
  type Error = Error;

  fn try_from(instruction: &'a Instruction) -> std::result::Result<Self, Self::Error> {
    if let Instruction::Run(r) = instruction {
      Ok(r)
    } else {
      Err(Error::ConversionError {
        from: format!("{:?}", instruction),
        to: "RunInstruction".into()
      })
    }
  }
}

// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use std::convert::TryFrom;
use std::fmt;

use crate::dockerfile::Instruction;
use crate::error::*;
use crate::instructions::cmd::{fmt_command, parse_command};

/// A Dockerfile [`ENTRYPOINT` instruction][entrypoint].
///
/// [entrypoint]: https://docs.docker.com/engine/reference/builder/#entrypoint
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct EntrypointInstruction {
  pub line: usize,
  pub raw: String,

  pub command: Vec<String>,
  pub shell_form: bool
}

impl EntrypointInstruction {
  pub(crate) fn parse(line: usize, raw: &str, args: &str) -> Result<EntrypointInstruction> {
    let (command, shell_form) = parse_command(args);

    Ok(EntrypointInstruction {
      line,
      raw: raw.to_string(),
      command, shell_form
    })
  }
}

impl fmt::Display for EntrypointInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt_command(f, "ENTRYPOINT", &self.command, self.shell_form)
  }
}

impl<'a> TryFrom<&'a Instruction> for &'a EntrypointInstruction {
  type Error = Error;

  fn try_from(instruction: &'a Instruction) -> std::result::Result<Self, Self::Error> {
    if let Instruction::Entrypoint(e) = instruction {
      Ok(e)
    } else {
      Err(Error::ConversionError {
        from: format!("{:?}", instruction),
        to: "EntrypointInstruction".into()
      })
    }
  }
}

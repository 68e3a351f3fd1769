// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use std::convert::TryFrom;
use std::fmt;

use crate::dockerfile::Instruction;
use crate::error::*;

/// A Dockerfile [`ARG` instruction][arg].
///
/// `default` may be unset when passing arguments through to later stages
/// in a multi-stage build.
///
/// [arg]: https://docs.docker.com/engine/reference/builder/#arg
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ArgInstruction {
  pub line: usize,
  pub raw: String,

  pub name: String,
  pub default: Option<String>
}

impl ArgInstruction {
  pub(crate) fn parse(line: usize, raw: &str, args: &str) -> Result<ArgInstruction> {
    if args.is_empty() {
      return Err(parse_error(line, "ARG requires a name"));
    }

    let (name, default) = match args.find('=') {
      Some(eq) => (
        args[..eq].trim().to_string(),
        Some(args[eq + 1..].trim().to_string())
      ),
      None => (args.trim().to_string(), None)
    };

    Ok(ArgInstruction {
      line,
      raw: raw.to_string(),
      name, default
    })
  }
}

impl fmt::Display for ArgInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.default {
      Some(default) => write!(f, "ARG {}={}", self.name, default),
      None => write!(f, "ARG {}", self.name)
    }
  }
}

impl<'a> TryFrom<&'a Instruction> for &'a ArgInstruction {
  type Error = Error;

  fn try_from(instruction: &'a Instruction) -> std::result::Result<Self, Self::Error> {
    if let Instruction::Arg(a) = instruction {
      Ok(a)
    } else {
      Err(Error::ConversionError {
        from: format!("{:?}", instruction),
        to: "ArgInstruction".into()
      })
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn arg_name_only() -> Result<()> {
    let arg = ArgInstruction::parse(1, "ARG VERSION", "VERSION")?;

    assert_eq!(arg.name, "VERSION");
    assert_eq!(arg.default, None);

    Ok(())
  }

  #[test]
  fn arg_with_default() -> Result<()> {
    let arg = ArgInstruction::parse(1, "ARG VERSION=1.0", "VERSION=1.0")?;

    assert_eq!(arg.name, "VERSION");
    assert_eq!(arg.default, Some("1.0".into()));

    Ok(())
  }

  #[test]
  fn arg_missing_name() {
    assert!(ArgInstruction::parse(1, "ARG", "").is_err());
  }

  #[test]
  fn arg_display() -> Result<()> {
    assert_eq!(
      ArgInstruction::parse(1, "ARG VERSION=1.0", "VERSION=1.0")?.to_string(),
      "ARG VERSION=1.0"
    );
    assert_eq!(
      ArgInstruction::parse(1, "ARG VERSION", "VERSION")?.to_string(),
      "ARG VERSION"
    );

    Ok(())
  }
}

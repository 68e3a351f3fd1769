// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use std::convert::TryFrom;
use std::fmt;

use crate::dockerfile::Instruction;
use crate::error::*;
use crate::lexer::is_keyword;
use crate::parser::dispatch_instruction;
use crate::util::split_words;

/// A Dockerfile [`ONBUILD` instruction][onbuild].
///
/// The wrapped instruction is owned by this node; `FROM`, `ONBUILD`, and
/// `MAINTAINER` are not valid targets.
///
/// [onbuild]: https://docs.docker.com/engine/reference/builder/#onbuild
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct OnbuildInstruction {
  pub line: usize,
  pub raw: String,

  pub instruction: Box<Instruction>
}

impl OnbuildInstruction {
  pub(crate) fn parse(line: usize, raw: &str, args: &str) -> Result<OnbuildInstruction> {
    let words = split_words(args);
    if words.is_empty() {
      return Err(parse_error(line, "ONBUILD requires an instruction"));
    }

    let keyword = words[0].to_ascii_uppercase();
    if matches!(keyword.as_str(), "FROM" | "ONBUILD" | "MAINTAINER") || !is_keyword(&keyword) {
      return Err(parse_error(
        line,
        format!("invalid ONBUILD instruction: {}", keyword)
      ));
    }

    let inner_args = words[1..].join(" ");
    let inner_raw = if inner_args.is_empty() {
      keyword.clone()
    } else {
      format!("{} {}", keyword, inner_args)
    };

    let inner = dispatch_instruction(&keyword, line, &inner_raw, &inner_args)?;

    Ok(OnbuildInstruction {
      line,
      raw: raw.to_string(),
      instruction: Box::new(inner)
    })
  }
}

impl fmt::Display for OnbuildInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ONBUILD {}", self.instruction)
  }
}

impl<'a> TryFrom<&'a Instruction> for &'a OnbuildInstruction {
  type Error = Error;

  fn try_from(instruction: &'a Instruction) -> std::result::Result<Self, Self::Error> {
    if let Instruction::Onbuild(o) = instruction {
      Ok(o)
    } else {
      Err(Error::ConversionError {
        from: format!("{:?}", instruction),
        to: "OnbuildInstruction".into()
      })
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::instructions::CopyInstruction;

  #[test]
  fn onbuild_copy() -> Result<()> {
    let onbuild = OnbuildInstruction::parse(
      1,
      "ONBUILD COPY . /app/src",
      "COPY . /app/src"
    )?;

    let copy: &CopyInstruction = match onbuild.instruction.as_ref() {
      Instruction::Copy(c) => c,
      other => panic!("expected COPY, got {:?}", other)
    };

    assert_eq!(copy.sources, vec![".".to_string()]);
    assert_eq!(copy.dest, "/app/src");

    Ok(())
  }

  #[test]
  fn onbuild_run_lowercase() -> Result<()> {
    let onbuild = OnbuildInstruction::parse(1, "ONBUILD run make", "run make")?;

    assert!(matches!(onbuild.instruction.as_ref(), Instruction::Run(_)));

    Ok(())
  }

  #[test]
  fn onbuild_rejects_nested_forms() {
    assert!(OnbuildInstruction::parse(1, "ONBUILD FROM alpine", "FROM alpine").is_err());
    assert!(OnbuildInstruction::parse(1, "ONBUILD ONBUILD RUN x", "ONBUILD RUN x").is_err());
    assert!(OnbuildInstruction::parse(1, "ONBUILD MAINTAINER x", "MAINTAINER x").is_err());
    assert!(OnbuildInstruction::parse(1, "ONBUILD", "").is_err());
    assert!(OnbuildInstruction::parse(1, "ONBUILD FROBNICATE x", "FROBNICATE x").is_err());
  }

  #[test]
  fn onbuild_display() -> Result<()> {
    let onbuild = OnbuildInstruction::parse(1, "onbuild copy . /src", "copy . /src")?;

    assert_eq!(onbuild.to_string(), "ONBUILD COPY . /src");

    Ok(())
  }
}

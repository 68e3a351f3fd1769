// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use std::convert::TryFrom;
use std::fmt;

use crate::dockerfile::Instruction;
use crate::error::*;
use crate::util::{is_exec_form, parse_exec_form};

/// A Dockerfile [`CMD` instruction][cmd].
///
/// Exec form stores the parsed JSON array; shell form stores a single
/// element holding the raw command text.
///
/// [cmd]: https://docs.docker.com/engine/reference/builder/#cmd
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CmdInstruction {
  pub line: usize,
  pub raw: String,

  pub command: Vec<String>,
  pub shell_form: bool
}

impl CmdInstruction {
  pub(crate) fn parse(line: usize, raw: &str, args: &str) -> Result<CmdInstruction> {
    let (command, shell_form) = parse_command(args);

    Ok(CmdInstruction {
      line,
      raw: raw.to_string(),
      command, shell_form
    })
  }
}

/// Shared CMD/ENTRYPOINT argument handling.
pub(crate) fn parse_command(args: &str) -> (Vec<String>, bool) {
  if is_exec_form(args) {
    (parse_exec_form(args), false)
  } else if args.is_empty() {
    (Vec::new(), true)
  } else {
    (vec![args.to_string()], true)
  }
}

pub(crate) fn fmt_command(
  f: &mut fmt::Formatter<'_>,
  keyword: &str,
  command: &[String],
  shell_form: bool
) -> fmt::Result {
  if command.is_empty() {
    return write!(f, "{}", keyword);
  }

  if shell_form {
    write!(f, "{} {}", keyword, command.join(" "))
  } else {
    let json = serde_json::to_string(command).unwrap_or_else(|_| command.join(" "));
    write!(f, "{} {}", keyword, json)
  }
}

impl fmt::Display for CmdInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt_command(f, "CMD", &self.command, self.shell_form)
  }
}

impl<'a> TryFrom<&'a Instruction> for &'a CmdInstruction {
  type Error = Error;

  fn try_from(instruction: &'a Instruction) -> std::result::Result<Self, Self::Error> {
    if let Instruction::Cmd(c) = instruction {
      Ok(c)
    } else {
      Err(Error::ConversionError {
        from: format!("{:?}", instruction),
        to: "CmdInstruction".into()
      })
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn cmd_exec_form() -> Result<()> {
    let cmd = CmdInstruction::parse(1, r#"CMD ["./app", "--serve"]"#, r#"["./app", "--serve"]"#)?;

    assert_eq!(cmd.command, vec!["./app".to_string(), "--serve".to_string()]);
    assert!(!cmd.shell_form);

    Ok(())
  }

  #[test]
  fn cmd_shell_form() -> Result<()> {
    let cmd = CmdInstruction::parse(1, "CMD ./app --serve", "./app --serve")?;

    assert_eq!(cmd.command, vec!["./app --serve".to_string()]);
    assert!(cmd.shell_form);

    Ok(())
  }

  #[test]
  fn cmd_malformed_exec_form_downgrades() -> Result<()> {
    let cmd = CmdInstruction::parse(1, "CMD [./app, --serve]", "[./app, --serve]")?;

    assert_eq!(cmd.command, vec!["./app".to_string(), "--serve".to_string()]);
    assert!(!cmd.shell_form);

    Ok(())
  }

  #[test]
  fn cmd_display() -> Result<()> {
    assert_eq!(
      CmdInstruction::parse(1, r#"CMD ["./app"]"#, r#"["./app"]"#)?.to_string(),
      r#"CMD ["./app"]"#
    );
    assert_eq!(
      CmdInstruction::parse(1, "CMD ./app", "./app")?.to_string(),
      "CMD ./app"
    );

    Ok(())
  }
}

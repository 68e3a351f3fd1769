// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use std::convert::TryFrom;
use std::fmt;

use crate::dockerfile::Instruction;
use crate::error::*;
use crate::util::{is_exec_form, parse_exec_form, split_words};

/// A Dockerfile [`HEALTHCHECK` instruction][healthcheck].
///
/// Either `HEALTHCHECK NONE` (disabling any inherited check) or a set of
/// timing options followed by `CMD <command>`.
///
/// [healthcheck]: https://docs.docker.com/engine/reference/builder/#healthcheck
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct HealthcheckInstruction {
  pub line: usize,
  pub raw: String,

  pub none: bool,
  pub interval: Option<String>,
  pub timeout: Option<String>,
  pub retries: Option<String>,
  pub start_period: Option<String>,
  pub command: Vec<String>
}

impl HealthcheckInstruction {
  pub(crate) fn parse(line: usize, raw: &str, args: &str) -> Result<HealthcheckInstruction> {
    let args = args.trim();

    let mut instruction = HealthcheckInstruction {
      line,
      raw: raw.to_string(),
      ..Default::default()
    };

    if args.eq_ignore_ascii_case("NONE") {
      instruction.none = true;
      return Ok(instruction);
    }

    let words = split_words(args);
    let mut idx = 0;

    while idx < words.len() {
      let word = &words[idx];

      if let Some(value) = word.strip_prefix("--interval=") {
        instruction.interval = Some(value.to_string());
      } else if let Some(value) = word.strip_prefix("--timeout=") {
        instruction.timeout = Some(value.to_string());
      } else if let Some(value) = word.strip_prefix("--retries=") {
        instruction.retries = Some(value.to_string());
      } else if let Some(value) = word.strip_prefix("--start-period=") {
        instruction.start_period = Some(value.to_string());
      } else if word.eq_ignore_ascii_case("CMD") {
        let remainder = words[idx + 1..].join(" ");
        if is_exec_form(&remainder) {
          instruction.command = parse_exec_form(&remainder);
        } else if !remainder.is_empty() {
          instruction.command = vec![remainder];
        }

        break;
      }

      idx += 1;
    }

    Ok(instruction)
  }
}

impl fmt::Display for HealthcheckInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.none {
      return write!(f, "HEALTHCHECK NONE");
    }

    write!(f, "HEALTHCHECK")?;

    if let Some(interval) = &self.interval {
      write!(f, " --interval={}", interval)?;
    }
    if let Some(timeout) = &self.timeout {
      write!(f, " --timeout={}", timeout)?;
    }
    if let Some(retries) = &self.retries {
      write!(f, " --retries={}", retries)?;
    }
    if let Some(start_period) = &self.start_period {
      write!(f, " --start-period={}", start_period)?;
    }

    if !self.command.is_empty() {
      write!(f, " CMD")?;
      if self.command.len() > 1 {
        let json = serde_json::to_string(&self.command)
          .unwrap_or_else(|_| self.command.join(" "));
        write!(f, " {}", json)?;
      } else {
        write!(f, " {}", self.command[0])?;
      }
    }

    Ok(())
  }
}

impl<'a> TryFrom<&'a Instruction> for &'a HealthcheckInstruction {
  type Error = Error;

  fn try_from(instruction: &'a Instruction) -> std::result::Result<Self, Self::Error> {
    if let Instruction::Healthcheck(h) = instruction {
      Ok(h)
    } else {
      Err(Error::ConversionError {
        from: format!("{:?}", instruction),
        to: "HealthcheckInstruction".into()
      })
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn healthcheck_none() -> Result<()> {
    let hc = HealthcheckInstruction::parse(1, "HEALTHCHECK NONE", "NONE")?;
    assert!(hc.none);

    let hc = HealthcheckInstruction::parse(1, "HEALTHCHECK none", "none")?;
    assert!(hc.none);

    Ok(())
  }

  #[test]
  fn healthcheck_options_and_cmd() -> Result<()> {
    let hc = HealthcheckInstruction::parse(
      1,
      "HEALTHCHECK --interval=30s --timeout=3s --retries=3 CMD curl -f http://localhost/ || exit 1",
      "--interval=30s --timeout=3s --retries=3 CMD curl -f http://localhost/ || exit 1"
    )?;

    assert!(!hc.none);
    assert_eq!(hc.interval, Some("30s".into()));
    assert_eq!(hc.timeout, Some("3s".into()));
    assert_eq!(hc.retries, Some("3".into()));
    assert_eq!(hc.start_period, None);
    assert_eq!(
      hc.command,
      vec!["curl -f http://localhost/ || exit 1".to_string()]
    );

    Ok(())
  }

  #[test]
  fn healthcheck_exec_form_cmd() -> Result<()> {
    let hc = HealthcheckInstruction::parse(
      1,
      r#"HEALTHCHECK CMD ["curl", "-f", "http://localhost/"]"#,
      r#"CMD ["curl", "-f", "http://localhost/"]"#
    )?;

    assert_eq!(
      hc.command,
      vec!["curl".to_string(), "-f".to_string(), "http://localhost/".to_string()]
    );

    Ok(())
  }

  #[test]
  fn healthcheck_start_period() -> Result<()> {
    let hc = HealthcheckInstruction::parse(
      1,
      "HEALTHCHECK --start-period=5s CMD true",
      "--start-period=5s CMD true"
    )?;

    assert_eq!(hc.start_period, Some("5s".into()));
    assert_eq!(hc.command, vec!["true".to_string()]);

    Ok(())
  }

  #[test]
  fn healthcheck_display() -> Result<()> {
    let hc = HealthcheckInstruction::parse(
      1,
      "healthcheck --interval=30s CMD true",
      "--interval=30s CMD true"
    )?;

    assert_eq!(hc.to_string(), "HEALTHCHECK --interval=30s CMD true");

    let none = HealthcheckInstruction::parse(1, "HEALTHCHECK NONE", "NONE")?;
    assert_eq!(none.to_string(), "HEALTHCHECK NONE");

    Ok(())
  }
}

// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use std::convert::TryFrom;
use std::fmt;

use crate::dockerfile::Instruction;
use crate::error::*;
use crate::util::split_words;

/// A Dockerfile [`ENV` instruction][env].
///
/// Both the `KEY=value` form and the legacy space-separated `KEY value`
/// form collapse into a single key/value pair.
///
/// [env]: https://docs.docker.com/engine/reference/builder/#env
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct EnvInstruction {
  pub line: usize,
  pub raw: String,

  pub key: String,
  pub value: String
}

impl EnvInstruction {
  pub(crate) fn parse(line: usize, raw: &str, args: &str) -> Result<EnvInstruction> {
    if args.is_empty() {
      return Err(parse_error(line, "ENV requires key and value"));
    }

    let (key, value) = if let Some(eq) = args.find('=') {
      (args[..eq].trim().to_string(), args[eq + 1..].trim().to_string())
    } else {
      // legacy form: ENV key value...
      let words = split_words(args);
      let key = words.first().cloned().unwrap_or_default();
      let value = if words.len() > 1 {
        words[1..].join(" ")
      } else {
        String::new()
      };

      (key, value)
    };

    Ok(EnvInstruction {
      line,
      raw: raw.to_string(),
      key, value
    })
  }
}

impl fmt::Display for EnvInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.key.is_empty() {
      write!(f, "ENV")
    } else {
      write!(f, "ENV {}={}", self.key, self.value)
    }
  }
}

impl<'a> TryFrom<&'a Instruction> for &'a EnvInstruction {
  type Error = Error;

  fn try_from(instruction: &'a Instruction) -> std::result::Result<Self, Self::Error> {
    if let Instruction::Env(e) = instruction {
      Ok(e)
    } else {
      Err(Error::ConversionError {
        from: format!("{:?}", instruction),
        to: "EnvInstruction".into()
      })
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn env_equals_form() -> Result<()> {
    let env = EnvInstruction::parse(1, "ENV FOO=bar", "FOO=bar")?;

    assert_eq!(env.key, "FOO");
    assert_eq!(env.value, "bar");

    Ok(())
  }

  #[test]
  fn env_splits_on_first_equals() -> Result<()> {
    let env = EnvInstruction::parse(1, "ENV FOO=a=b", "FOO=a=b")?;

    assert_eq!(env.key, "FOO");
    assert_eq!(env.value, "a=b");

    Ok(())
  }

  #[test]
  fn env_legacy_form() -> Result<()> {
    let env = EnvInstruction::parse(1, "ENV FOO bar baz", "FOO bar baz")?;

    assert_eq!(env.key, "FOO");
    assert_eq!(env.value, "bar baz");

    Ok(())
  }

  #[test]
  fn env_legacy_form_single_word() -> Result<()> {
    let env = EnvInstruction::parse(1, "ENV FOO", "FOO")?;

    assert_eq!(env.key, "FOO");
    assert_eq!(env.value, "");

    Ok(())
  }

  #[test]
  fn env_missing_argument() {
    assert!(EnvInstruction::parse(1, "ENV", "").is_err());
  }

  #[test]
  fn env_display() -> Result<()> {
    let env = EnvInstruction::parse(1, "ENV FOO bar", "FOO bar")?;

    assert_eq!(env.to_string(), "ENV FOO=bar");

    Ok(())
  }
}

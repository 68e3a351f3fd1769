// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::fmt;

use crate::dockerfile::Instruction;
use crate::error::*;
use crate::util::parse_key_value_pairs;

/// A Dockerfile [`LABEL` instruction][label].
///
/// A single `LABEL` instruction may set many labels. The deprecated
/// `MAINTAINER` instruction is folded into a label with the `maintainer`
/// key.
///
/// [label]: https://docs.docker.com/engine/reference/builder/#label
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct LabelInstruction {
  pub line: usize,
  pub raw: String,

  pub labels: BTreeMap<String, String>
}

impl LabelInstruction {
  pub(crate) fn parse(line: usize, raw: &str, args: &str) -> Result<LabelInstruction> {
    Ok(LabelInstruction {
      line,
      raw: raw.to_string(),
      labels: parse_key_value_pairs(args)
    })
  }

  /// Builds the label a deprecated `MAINTAINER` instruction folds into.
  pub(crate) fn maintainer(line: usize, raw: &str, args: &str) -> LabelInstruction {
    let mut labels = BTreeMap::new();
    labels.insert("maintainer".to_string(), args.to_string());

    LabelInstruction {
      line,
      raw: raw.to_string(),
      labels
    }
  }
}

impl fmt::Display for LabelInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "LABEL")?;

    // BTreeMap iteration is already key-sorted, keeping output stable
    for (key, value) in &self.labels {
      if value.contains(' ') {
        write!(f, " {}=\"{}\"", key, value)?;
      } else {
        write!(f, " {}={}", key, value)?;
      }
    }

    Ok(())
  }
}

impl<'a> TryFrom<&'a Instruction> for &'a LabelInstruction {
  type Error = Error;

  fn try_from(instruction: &'a Instruction) -> std::result::Result<Self, Self::Error> {
    if let Instruction::Label(l) = instruction {
      Ok(l)
    } else {
      Err(Error::ConversionError {
        from: format!("{:?}", instruction),
        to: "LabelInstruction".into()
      })
    }
  }
}

// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::convert::TryFrom;
use std::fmt;

use crate::dockerfile::Instruction;
use crate::error::*;
use crate::util::split_words;

/// Splits leading `--key=value` flags off a COPY/ADD word list.
///
/// Only the flags named in `known` are captured, in order; any other
/// `--` word is silently tolerated. Returns the captured values and the
/// index of the first path word.
fn take_flags<'a>(words: &'a [String], known: &[&str]) -> (Vec<Option<&'a str>>, usize) {
  let mut values = vec![None; known.len()];
  let mut idx = 0;

  while idx < words.len() {
    let word = &words[idx];
    if !word.starts_with("--") {
      break;
    }

    for (i, name) in known.iter().enumerate() {
      let prefix = format!("--{}=", name);
      if let Some(value) = word.strip_prefix(&prefix) {
        values[i] = Some(value);
      }
    }

    idx += 1;
  }

  (values, idx)
}

fn split_sources_dest(
  line: usize,
  keyword: &str,
  words: &[String],
  idx: usize
) -> Result<(Vec<String>, String)> {
  let mut paths: Vec<String> = words[idx..].to_vec();
  if paths.len() < 2 {
    return Err(parse_error(
      line,
      format!("{} requires at least source and destination", keyword)
    ));
  }

  // the pop cannot fail, there are at least two paths
  let dest = paths.pop().unwrap_or_default();
  Ok((paths, dest))
}

/// A Dockerfile [`COPY` instruction][copy].
///
/// `from` carries the `--from=<stage>` flag used to copy between stages of
/// a multi-stage build.
///
/// [copy]: https://docs.docker.com/engine/reference/builder/#copy
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CopyInstruction {
  pub line: usize,
  pub raw: String,

  pub sources: Vec<String>,
  pub dest: String,
  pub from: Option<String>,
  pub chown: Option<String>
}

impl CopyInstruction {
  pub(crate) fn parse(line: usize, raw: &str, args: &str) -> Result<CopyInstruction> {
    if args.is_empty() {
      return Err(parse_error(line, "COPY requires source and destination arguments"));
    }

    let words = split_words(args);
    let (flags, idx) = take_flags(&words, &["from", "chown"]);
    let (sources, dest) = split_sources_dest(line, "COPY", &words, idx)?;

    Ok(CopyInstruction {
      line,
      raw: raw.to_string(),
      sources, dest,
      from: flags[0].map(String::from),
      chown: flags[1].map(String::from)
    })
  }
}

impl fmt::Display for CopyInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "COPY")?;

    if let Some(from) = &self.from {
      write!(f, " --from={}", from)?;
    }

    if let Some(chown) = &self.chown {
      write!(f, " --chown={}", chown)?;
    }

    for source in &self.sources {
      write!(f, " {}", source)?;
    }

    write!(f, " {}", self.dest)
  }
}

impl<'a> TryFrom<&'a Instruction> for &'a CopyInstruction {
  type Error = Error;

  fn try_from(instruction: &'a Instruction) -> std::result::Result<Self, Self::Error> {
    if let Instruction::Copy(c) = instruction {
      Ok(c)
    } else {
      Err(Error::ConversionError {
        from: format!("{:?}", instruction),
        to: "CopyInstruction".into()
      })
    }
  }
}

/// A Dockerfile [`ADD` instruction][add].
///
/// Unlike `COPY`, sources may be URLs or archives to extract; several
/// rules exist to discourage using it where `COPY` would do.
///
/// [add]: https://docs.docker.com/engine/reference/builder/#add
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct AddInstruction {
  pub line: usize,
  pub raw: String,

  pub sources: Vec<String>,
  pub dest: String,
  pub chown: Option<String>
}

impl AddInstruction {
  pub(crate) fn parse(line: usize, raw: &str, args: &str) -> Result<AddInstruction> {
    if args.is_empty() {
      return Err(parse_error(line, "ADD requires source and destination arguments"));
    }

    let words = split_words(args);
    let (flags, idx) = take_flags(&words, &["chown"]);
    let (sources, dest) = split_sources_dest(line, "ADD", &words, idx)?;

    Ok(AddInstruction {
      line,
      raw: raw.to_string(),
      sources, dest,
      chown: flags[0].map(String::from)
    })
  }
}

impl fmt::Display for AddInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ADD")?;

    if let Some(chown) = &self.chown {
      write!(f, " --chown={}", chown)?;
    }

    for source in &self.sources {
      write!(f, " {}", source)?;
    }

    write!(f, " {}", self.dest)
  }
}

impl<'a> TryFrom<&'a Instruction> for &'a AddInstruction {
  type Error = Error;

  fn try_from(instruction: &'a Instruction) -> std::result::Result<Self, Self::Error> {
    if let Instruction::Add(a) = instruction {
      Ok(a)
    } else {
      Err(Error::ConversionError {
        from: format!("{:?}", instruction),
        to: "AddInstruction".into()
      })
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn strings(strs: &[&str]) -> Vec<String> {
    strs.iter().map(|s| String::from(*s)).collect()
  }

  #[test]
  fn copy_basic() -> Result<()> {
    let copy = CopyInstruction::parse(1, "COPY foo bar", "foo bar")?;

    assert_eq!(copy.sources, strings(&["foo"]));
    assert_eq!(copy.dest, "bar");
    assert_eq!(copy.from, None);

    Ok(())
  }

  #[test]
  fn copy_multiple_sources() -> Result<()> {
    let copy = CopyInstruction::parse(1, "COPY foo bar baz qux", "foo bar baz qux")?;

    assert_eq!(copy.sources, strings(&["foo", "bar", "baz"]));
    assert_eq!(copy.dest, "qux");

    Ok(())
  }

  #[test]
  fn copy_flags() -> Result<()> {
    let copy = CopyInstruction::parse(
      1,
      "COPY --from=builder --chown=app:app /out /srv/",
      "--from=builder --chown=app:app /out /srv/"
    )?;

    assert_eq!(copy.from, Some("builder".into()));
    assert_eq!(copy.chown, Some("app:app".into()));
    assert_eq!(copy.sources, strings(&["/out"]));
    assert_eq!(copy.dest, "/srv/");

    Ok(())
  }

  #[test]
  fn copy_unknown_flags_tolerated() -> Result<()> {
    let copy = CopyInstruction::parse(
      1,
      "COPY --link --parents foo bar",
      "--link --parents foo bar"
    )?;

    assert_eq!(copy.sources, strings(&["foo"]));
    assert_eq!(copy.dest, "bar");

    Ok(())
  }

  #[test]
  fn copy_too_few_paths() {
    assert!(CopyInstruction::parse(1, "COPY foo", "foo").is_err());
    assert!(CopyInstruction::parse(1, "COPY", "").is_err());
    assert!(CopyInstruction::parse(1, "COPY --from=builder foo", "--from=builder foo").is_err());
  }

  #[test]
  fn add_basic() -> Result<()> {
    let add = AddInstruction::parse(1, "ADD app.tar.gz /opt/", "app.tar.gz /opt/")?;

    assert_eq!(add.sources, strings(&["app.tar.gz"]));
    assert_eq!(add.dest, "/opt/");
    assert_eq!(add.chown, None);

    Ok(())
  }

  #[test]
  fn add_chown() -> Result<()> {
    let add = AddInstruction::parse(
      1,
      "ADD --chown=1000:1000 files /data",
      "--chown=1000:1000 files /data"
    )?;

    assert_eq!(add.chown, Some("1000:1000".into()));

    Ok(())
  }

  #[test]
  fn add_too_few_paths() {
    assert!(AddInstruction::parse(1, "ADD /dest", "/dest").is_err());
  }

  #[test]
  fn copy_display() -> Result<()> {
    let copy = CopyInstruction::parse(
      1,
      "copy  --from=builder  /out   /srv/",
      "--from=builder  /out   /srv/"
    )?;

    assert_eq!(copy.to_string(), "COPY --from=builder /out /srv/");

    Ok(())
  }
}

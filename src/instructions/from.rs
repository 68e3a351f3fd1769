// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use std::convert::TryFrom;
use std::fmt;

use crate::dockerfile::Instruction;
use crate::error::*;
use crate::image::ImageRef;
use crate::util::split_words;

/// A Dockerfile [`FROM` instruction][from].
///
/// Every `FROM` opens a new build stage. The image reference is stored in
/// its split form; `alias` holds the `AS <name>` stage name if present.
///
/// [from]: https://docs.docker.com/engine/reference/builder/#from
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FromInstruction {
  pub line: usize,
  pub raw: String,

  pub image: String,
  pub tag: Option<String>,
  pub digest: Option<String>,
  pub alias: Option<String>,
  pub platform: Option<String>
}

impl FromInstruction {
  pub(crate) fn parse(line: usize, raw: &str, args: &str) -> Result<FromInstruction> {
    let words = split_words(args);
    if words.is_empty() {
      return Err(parse_error(line, "FROM requires an image argument"));
    }

    let mut platform = None;
    let mut idx = 0;

    // --platform may be given as `--platform=<p>` or `--platform <p>`
    while idx < words.len() && words[idx].starts_with("--platform") {
      if let Some(eq) = words[idx].find('=') {
        platform = Some(words[idx][eq + 1..].to_string());
      } else if idx + 1 < words.len() {
        idx += 1;
        platform = Some(words[idx].clone());
      }

      idx += 1;
    }

    if idx >= words.len() {
      return Err(parse_error(line, "FROM requires an image argument"));
    }

    let image_ref = ImageRef::parse(&words[idx]);
    idx += 1;

    if image_ref.image.is_empty() {
      return Err(parse_error(line, "FROM requires an image argument"));
    }

    let mut alias = None;
    while idx < words.len() {
      if words[idx].eq_ignore_ascii_case("AS") && idx + 1 < words.len() {
        alias = Some(words[idx + 1].clone());
        break;
      }

      idx += 1;
    }

    Ok(FromInstruction {
      line,
      raw: raw.to_string(),
      image: image_ref.image,
      tag: image_ref.tag,
      digest: image_ref.digest,
      alias, platform
    })
  }

  /// The image reference in its parsed form.
  pub fn image_ref(&self) -> ImageRef {
    ImageRef {
      image: self.image.clone(),
      tag: self.tag.clone(),
      digest: self.digest.clone()
    }
  }
}

impl fmt::Display for FromInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "FROM")?;

    if let Some(platform) = &self.platform {
      write!(f, " --platform={}", platform)?;
    }

    write!(f, " {}", self.image_ref())?;

    if let Some(alias) = &self.alias {
      write!(f, " AS {}", alias)?;
    }

    Ok(())
  }
}

impl<'a> TryFrom<&'a Instruction> for &'a FromInstruction {
  type Error = Error;

  fn try_from(instruction: &'a Instruction) -> std::result::Result<Self, Self::Error> {
    if let Instruction::From(f) = instruction {
      Ok(f)
    } else {
      Err(Error::ConversionError {
        from: format!("{:?}", instruction),
        to: "FromInstruction".into()
      })
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn from_basic() -> Result<()> {
    let from = FromInstruction::parse(1, "FROM alpine:3.18", "alpine:3.18")?;

    assert_eq!(from, FromInstruction {
      line: 1,
      raw: "FROM alpine:3.18".into(),
      image: "alpine".into(),
      tag: Some("3.18".into()),
      digest: None,
      alias: None,
      platform: None
    });

    Ok(())
  }

  #[test]
  fn from_no_tag() -> Result<()> {
    let from = FromInstruction::parse(1, "FROM ubuntu", "ubuntu")?;

    assert_eq!(from.image, "ubuntu");
    assert_eq!(from.tag, None);
    assert_eq!(from.digest, None);

    Ok(())
  }

  #[test]
  fn from_digest() -> Result<()> {
    let from = FromInstruction::parse(
      1,
      "FROM alpine@sha256:abc123",
      "alpine@sha256:abc123"
    )?;

    assert_eq!(from.image, "alpine");
    assert_eq!(from.tag, None);
    assert_eq!(from.digest, Some("sha256:abc123".into()));

    Ok(())
  }

  #[test]
  fn from_alias() -> Result<()> {
    let from = FromInstruction::parse(
      2,
      "FROM golang:1.21 AS builder",
      "golang:1.21 AS builder"
    )?;

    assert_eq!(from.alias, Some("builder".into()));

    // lowercase `as` is accepted as well
    let from = FromInstruction::parse(2, "FROM golang:1.21 as builder", "golang:1.21 as builder")?;
    assert_eq!(from.alias, Some("builder".into()));

    Ok(())
  }

  #[test]
  fn from_platform() -> Result<()> {
    let eq_form = FromInstruction::parse(
      1,
      "FROM --platform=linux/amd64 alpine:3.18",
      "--platform=linux/amd64 alpine:3.18"
    )?;
    assert_eq!(eq_form.platform, Some("linux/amd64".into()));
    assert_eq!(eq_form.image, "alpine");

    let space_form = FromInstruction::parse(
      1,
      "FROM --platform linux/arm64 alpine:3.18",
      "--platform linux/arm64 alpine:3.18"
    )?;
    assert_eq!(space_form.platform, Some("linux/arm64".into()));
    assert_eq!(space_form.image, "alpine");

    Ok(())
  }

  #[test]
  fn from_missing_image() {
    assert!(FromInstruction::parse(1, "FROM", "").is_err());
    assert!(FromInstruction::parse(1, "FROM --platform=linux/amd64", "--platform=linux/amd64").is_err());
    assert!(FromInstruction::parse(1, "FROM :3.18", ":3.18").is_err());
  }

  #[test]
  fn from_display() -> Result<()> {
    let from = FromInstruction::parse(
      1,
      "from --platform=linux/amd64   golang:1.21  as builder",
      "--platform=linux/amd64   golang:1.21  as builder"
    )?;

    assert_eq!(
      from.to_string(),
      "FROM --platform=linux/amd64 golang:1.21 AS builder"
    );

    Ok(())
  }
}

// (C) Copyright 2020 Hewlett Packard Enterprise Development LP

use std::ops::Index;

use crate::dockerfile::{Dockerfile, Instruction};
use crate::instructions::FromInstruction;

/// A single stage in a [multi-stage build].
///
/// A stage begins with (and includes) a `FROM` instruction and continues
/// until (but does *not* include) the next `FROM` instruction, if any.
///
/// Note that instructions in a Dockerfile before the first `FROM` are not
/// part of any stage (this mirrors build-arg-before-FROM usage).
///
/// [multi-stage build]: https://docs.docker.com/develop/develop-images/multistage-build/
#[derive(Debug, Eq, PartialEq)]
pub struct Stage<'a> {
  /// The stage index.
  pub index: usize,

  /// The stage's FROM alias, if any.
  pub name: Option<String>,

  /// The FROM instruction that opened this stage.
  pub from: &'a FromInstruction,

  /// An ordered list of instructions in this stage, including the FROM.
  pub instructions: Vec<&'a Instruction>
}

impl<'a> Stage<'a> {
  /// The source line of the last instruction of this stage; findings that
  /// attach to "the stage" anchor here.
  pub fn last_line(&self) -> usize {
    self.instructions
      .last()
      .map(|ins| ins.line())
      .unwrap_or(self.from.line)
  }
}

/// A collection of stages in a [multi-stage build].
///
/// Every instruction reference points into the owning
/// [`Dockerfile`]'s flat instruction list, at the same position.
///
/// # Example
/// ```
/// use docker_lint::Dockerfile;
///
/// let dockerfile = Dockerfile::parse(concat!(
///   "FROM alpine:3.12 AS build\n",
///   "RUN echo hello > /foo\n",
///   "FROM scratch\n",
///   "COPY --from=build /foo /foo\n",
/// )).unwrap();
///
/// for stage in dockerfile.stages().iter() {
///   println!("stage #{}, name: {:?}", stage.index, stage.name);
/// }
/// ```
///
/// [multi-stage build]: https://docs.docker.com/develop/develop-images/multistage-build/
#[derive(Debug)]
pub struct Stages<'a> {
  pub stages: Vec<Stage<'a>>
}

impl<'a> Stages<'a> {
  pub fn new(dockerfile: &'a Dockerfile) -> Stages<'a> {
    let mut stages: Vec<Stage> = Vec::new();

    for ins in &dockerfile.instructions {
      if let Instruction::From(from) = ins {
        stages.push(Stage {
          index: stages.len(),
          name: from.alias.clone(),
          from,
          instructions: vec![ins]
        });
      } else if let Some(stage) = stages.last_mut() {
        stage.instructions.push(ins);
      }
      // instructions before the first FROM belong to no stage
    }

    Stages { stages }
  }

  pub fn len(&self) -> usize {
    self.stages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.stages.is_empty()
  }

  /// The last stage, which produces the final image.
  pub fn last(&self) -> Option<&Stage<'a>> {
    self.stages.last()
  }

  /// Returns an iterator over `stages`, wrapping the underlying
  /// `Vec::iter()`.
  pub fn iter(&self) -> std::slice::Iter<'_, Stage<'a>> {
    self.stages.iter()
  }
}

impl<'a> Index<usize> for Stages<'a> {
  type Output = Stage<'a>;

  fn index(&self, index: usize) -> &Self::Output {
    &self.stages[index]
  }
}

impl<'a> IntoIterator for Stages<'a> {
  type Item = Stage<'a>;
  type IntoIter = std::vec::IntoIter<Stage<'a>>;

  fn into_iter(self) -> Self::IntoIter {
    self.stages.into_iter()
  }
}

#[cfg(test)]
mod tests {
  use indoc::indoc;
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_stages() {
    let dockerfile = Dockerfile::parse(indoc!(r#"
      FROM alpine:3.12

      FROM ubuntu:18.04 AS build
      RUN echo hello

      FROM build AS build2
      COPY /foo /bar
      COPY /bar /baz
    "#)).unwrap();

    let stages = dockerfile.stages();
    assert_eq!(stages.len(), 3);

    assert_eq!(stages[0].index, 0);
    assert_eq!(stages[0].name, None);
    assert_eq!(stages[0].instructions.len(), 1);

    assert_eq!(stages[1].name, Some("build".into()));
    assert_eq!(
      stages[1].instructions,
      vec![&dockerfile.instructions[1], &dockerfile.instructions[2]]
    );

    assert_eq!(stages[2].name, Some("build2".into()));
    assert_eq!(stages[2].instructions.len(), 3);
    assert_eq!(stages[2].last_line(), 8);
  }

  #[test]
  fn test_instructions_before_first_from_belong_to_no_stage() {
    let dockerfile = Dockerfile::parse(indoc!(r#"
      ARG VERSION=3.18
      FROM alpine:3.18
      RUN echo hi
    "#)).unwrap();

    let stages = dockerfile.stages();
    assert_eq!(stages.len(), 1);
    assert_eq!(stages[0].instructions.len(), 2);
    assert_eq!(dockerfile.instructions.len(), 3);
  }

  #[test]
  fn test_no_stages_without_from() {
    let dockerfile = Dockerfile::parse("ARG VERSION=1\n").unwrap();

    assert!(dockerfile.stages().is_empty());
  }

  #[test]
  fn test_stage_positions_match_flat_list() {
    let dockerfile = Dockerfile::parse(indoc!(r#"
      FROM alpine:3.18 AS a
      RUN echo one
      FROM alpine:3.18 AS b
      RUN echo two
    "#)).unwrap();

    let stages = dockerfile.stages();
    let mut flat = dockerfile.instructions.iter();

    for stage in stages.iter() {
      for ins in &stage.instructions {
        assert_eq!(*ins, flat.next().unwrap());
      }
    }
  }
}

// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use std::convert::TryInto;

use docker_lint::*;
use indoc::indoc;
use pretty_assertions::assert_eq;

mod common;
use common::strings;

#[test]
fn parse_basic() -> Result<(), Error> {
  let dockerfile = Dockerfile::parse(indoc!(r#"
    FROM alpine:3.18

    RUN apk add --no-cache curl
  "#))?;

  assert_eq!(dockerfile.instructions.len(), 2);

  let from: &FromInstruction = (&dockerfile.instructions[0]).try_into()?;
  assert_eq!(from.image, "alpine");
  assert_eq!(from.tag, Some("3.18".to_string()));
  assert_eq!(from.line, 1);

  let run: &RunInstruction = (&dockerfile.instructions[1]).try_into()?;
  assert_eq!(run.command, "apk add --no-cache curl");
  assert_eq!(run.line, 3);

  Ok(())
}

#[test]
fn parse_multiline_shell() -> Result<(), Error> {
  let dockerfile = Dockerfile::parse(indoc!(r#"
    RUN apk add --no-cache \
        curl

    RUN foo
  "#))?;

  assert_eq!(dockerfile.instructions.len(), 2);
  assert_eq!(dockerfile.instructions[0].line(), 1);
  assert_eq!(dockerfile.instructions[1].line(), 4);

  let run: &RunInstruction = (&dockerfile.instructions[0]).try_into()?;
  assert_eq!(run.command, "apk add --no-cache      curl");

  Ok(())
}

#[test]
fn parse_all_instruction_types() -> Result<(), Error> {
  let dockerfile = Dockerfile::parse(indoc!(r#"
    FROM ubuntu:22.04 AS base
    ARG VERSION=1.0
    ENV APP_HOME=/app
    WORKDIR /app
    COPY src/ /app/src/
    ADD archive.tar.gz /opt/
    RUN make build
    EXPOSE 8080 9090/udp
    USER app:app
    LABEL version=1.0 name=test
    VOLUME ["/data"]
    SHELL ["/bin/bash", "-c"]
    STOPSIGNAL SIGTERM
    HEALTHCHECK --interval=30s CMD curl -f http://localhost:8080/
    ONBUILD RUN make test
    ENTRYPOINT ["/entrypoint.sh"]
    CMD ["serve"]
  "#))?;

  assert_eq!(dockerfile.instructions.len(), 17);

  let expected_lines: Vec<usize> = (1..=17).collect();
  let lines: Vec<usize> = dockerfile.instructions.iter().map(|i| i.line()).collect();
  assert_eq!(lines, expected_lines);

  let expose: &ExposeInstruction = (&dockerfile.instructions[7]).try_into()?;
  assert_eq!(expose.ports, strings(&["8080", "9090/udp"]));

  let shell: &ShellInstruction = (&dockerfile.instructions[11]).try_into()?;
  assert_eq!(shell.shell, strings(&["/bin/bash", "-c"]));

  let onbuild: &OnbuildInstruction = (&dockerfile.instructions[14]).try_into()?;
  assert!(matches!(onbuild.instruction.as_ref(), Instruction::Run(_)));

  Ok(())
}

#[test]
fn parse_multi_stage() -> Result<(), Error> {
  let dockerfile = Dockerfile::parse(indoc!(r#"
    FROM golang:1.21 AS builder
    WORKDIR /src
    COPY . .
    RUN go build -o /out/app

    FROM alpine:3.18
    COPY --from=builder /out/app /usr/bin/app
    CMD ["app"]
  "#))?;

  let stages = dockerfile.stages();
  assert_eq!(stages.len(), 2);

  assert_eq!(stages[0].name, Some("builder".to_string()));
  assert_eq!(stages[0].instructions.len(), 4);

  assert_eq!(stages[1].name, None);
  assert_eq!(stages[1].instructions.len(), 3);

  let copy: &CopyInstruction = stages[1].instructions[1].try_into()?;
  assert_eq!(copy.from, Some("builder".to_string()));

  Ok(())
}

#[test]
fn parse_error_reports_line() {
  let err = Dockerfile::parse(indoc!(r#"
    FROM alpine:3.18
    WORKDIR
  "#)).unwrap_err();

  assert_eq!(err.line(), Some(2));
  assert!(err.to_string().contains("WORKDIR"));
}

#[test]
fn parse_lenient_keeps_going() {
  let (dockerfile, errors) = Dockerfile::parse_lenient(indoc!(r#"
    FROM alpine:3.18
    COPY onlyone
    NOTANINSTRUCTION foo
    USER nobody
  "#));

  assert_eq!(errors.len(), 2);
  assert_eq!(dockerfile.instructions.len(), 2);
}

#[test]
fn parse_comments_and_directives() -> Result<(), Error> {
  let dockerfile = Dockerfile::parse(indoc!(r#"
    # build stage
    FROM alpine:3.18
    # docker-lint ignore: DL3010, DL4002
    RUN echo hi
  "#))?;

  assert_eq!(dockerfile.comments.len(), 2);
  assert_eq!(
    dockerfile.inline_ignores.get(&4),
    Some(&strings(&["DL3010", "DL4002"]))
  );

  Ok(())
}

#[test]
fn parse_from_reader_matches_parse() -> Result<(), Error> {
  let input = "FROM alpine:3.18\nUSER nobody\n";

  assert_eq!(
    Dockerfile::parse(input)?,
    Dockerfile::from_reader(input.as_bytes())?
  );
  assert_eq!(Dockerfile::parse(input)?, input.parse::<Dockerfile>()?);

  Ok(())
}

#[test]
fn parse_healthcheck_variants() -> Result<(), Error> {
  let dockerfile = Dockerfile::parse(indoc!(r#"
    FROM alpine:3.18
    HEALTHCHECK NONE
  "#))?;

  let hc: &HealthcheckInstruction = (&dockerfile.instructions[1]).try_into()?;
  assert!(hc.none);

  let dockerfile = Dockerfile::parse(indoc!(r#"
    FROM alpine:3.18
    HEALTHCHECK --interval=5m --timeout=3s CMD curl -f http://localhost/ || exit 1
  "#))?;

  let hc: &HealthcheckInstruction = (&dockerfile.instructions[1]).try_into()?;
  assert!(!hc.none);
  assert_eq!(hc.interval, Some("5m".to_string()));
  assert_eq!(hc.timeout, Some("3s".to_string()));
  assert_eq!(hc.command, strings(&["curl -f http://localhost/ || exit 1"]));

  Ok(())
}

#[test]
fn parse_env_forms_collapse_to_one_pair() -> Result<(), Error> {
  let dockerfile = Dockerfile::parse(indoc!(r#"
    ENV A=1
    ENV B two words
  "#))?;

  let a: &EnvInstruction = (&dockerfile.instructions[0]).try_into()?;
  assert_eq!((a.key.as_str(), a.value.as_str()), ("A", "1"));

  let b: &EnvInstruction = (&dockerfile.instructions[1]).try_into()?;
  assert_eq!((b.key.as_str(), b.value.as_str()), ("B", "two words"));

  Ok(())
}

#[test]
fn instruction_conversion_errors_are_typed() {
  let dockerfile = Dockerfile::parse("FROM alpine:3.18\n").unwrap();

  let result: Result<&RunInstruction, Error> = (&dockerfile.instructions[0]).try_into();
  assert!(matches!(result, Err(Error::ConversionError { .. })));
}

// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use std::io::Read;

use lazy_static::lazy_static;
use regex::Regex;

use crate::dockerfile::{Comment, Dockerfile, Instruction};
use crate::error::*;
use crate::instructions::*;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::IgnoreMap;

lazy_static! {
  /// The inline ignore directive, e.g. `# docker-lint ignore: DL3006, DL3007`.
  static ref INLINE_IGNORE: Regex =
    Regex::new(r"(?i)#\s*docker-lint\s+ignore:\s*(.+)").unwrap();
}

/// Parses a token stream into a [`Dockerfile`].
///
/// The parser is resilient: a malformed instruction is recorded as an
/// error and skipped through the end of its logical line, so later
/// instructions still land in the tree.
pub struct Parser<R> {
  lexer: Lexer<R>,
  instructions: Vec<Instruction>,
  comments: Vec<Comment>,
  inline_ignores: IgnoreMap,
  errors: Vec<Error>
}

impl<R: Read> Parser<R> {
  pub fn new(reader: R) -> Parser<R> {
    Parser {
      lexer: Lexer::new(reader),
      instructions: Vec::new(),
      comments: Vec::new(),
      inline_ignores: IgnoreMap::new(),
      errors: Vec::new()
    }
  }

  /// Consumes the token stream, returning the best-effort tree and every
  /// recorded error.
  pub fn parse(mut self) -> (Dockerfile, Vec<Error>) {
    loop {
      let token = self.lexer.next_token();

      match token.kind {
        TokenKind::Eof => break,

        TokenKind::Error => {
          self.errors.push(parse_error(token.line, token.text));
          break;
        },

        TokenKind::Newline => continue,

        TokenKind::Comment => {
          self.record_comment(&token);
        },

        TokenKind::Instruction => {
          match self.parse_instruction(&token) {
            Ok(instruction) => self.instructions.push(instruction),
            Err(err) => self.errors.push(err)
          }
        },

        TokenKind::Argument => {
          self.errors.push(parse_error(
            token.line,
            format!("unexpected argument without instruction: {}", token.text)
          ));
          self.skip_to_next_line();
        }
      }
    }

    let dockerfile = Dockerfile {
      instructions: self.instructions,
      comments: self.comments,
      inline_ignores: self.inline_ignores
    };

    (dockerfile, self.errors)
  }

  fn record_comment(&mut self, token: &Token) {
    self.comments.push(Comment {
      line: token.line,
      text: token.text.clone()
    });

    // an ignore directive suppresses findings on the following line
    if let Some(captures) = INLINE_IGNORE.captures(&token.text) {
      let ids: Vec<String> = captures[1]
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect();

      if !ids.is_empty() {
        self.inline_ignores
          .entry(token.line + 1)
          .or_default()
          .extend(ids);
      }
    }
  }

  fn parse_instruction(&mut self, token: &Token) -> Result<Instruction> {
    let keyword = token.text.clone();
    let line = token.line;

    let next = self.lexer.next_token();
    let (args, at_line_end) = match next.kind {
      TokenKind::Argument => (next.text, false),
      TokenKind::Newline | TokenKind::Eof => (String::new(), true),
      _ => {
        self.skip_to_next_line();
        return Err(parse_error(
          line,
          format!("expected argument after {}", keyword)
        ));
      }
    };

    let raw = if args.is_empty() {
      keyword.clone()
    } else {
      format!("{} {}", keyword, args)
    };

    let result = dispatch_instruction(&keyword, line, &raw, &args);
    if result.is_err() && !at_line_end {
      // resync without swallowing the following logical line
      self.skip_to_next_line();
    }

    result
  }

  fn skip_to_next_line(&mut self) {
    loop {
      let token = self.lexer.next_token();
      if matches!(token.kind, TokenKind::Newline | TokenKind::Eof) {
        break;
      }
    }
  }
}

/// Dispatches an instruction keyword to its parser. The keyword must be
/// uppercase, as emitted by the lexer.
pub(crate) fn dispatch_instruction(
  keyword: &str,
  line: usize,
  raw: &str,
  args: &str
) -> Result<Instruction> {
  let instruction = match keyword {
    "FROM" => FromInstruction::parse(line, raw, args)?.into(),
    "RUN" => RunInstruction::parse(line, raw, args)?.into(),
    "COPY" => CopyInstruction::parse(line, raw, args)?.into(),
    "ADD" => AddInstruction::parse(line, raw, args)?.into(),
    "ENV" => EnvInstruction::parse(line, raw, args)?.into(),
    "ARG" => ArgInstruction::parse(line, raw, args)?.into(),
    "EXPOSE" => ExposeInstruction::parse(line, raw, args)?.into(),
    "WORKDIR" => WorkdirInstruction::parse(line, raw, args)?.into(),
    "USER" => UserInstruction::parse(line, raw, args)?.into(),
    "LABEL" => LabelInstruction::parse(line, raw, args)?.into(),
    "VOLUME" => VolumeInstruction::parse(line, raw, args)?.into(),
    "CMD" => CmdInstruction::parse(line, raw, args)?.into(),
    "ENTRYPOINT" => EntrypointInstruction::parse(line, raw, args)?.into(),
    "HEALTHCHECK" => HealthcheckInstruction::parse(line, raw, args)?.into(),
    "SHELL" => ShellInstruction::parse(line, raw, args)?.into(),
    "STOPSIGNAL" => StopsignalInstruction::parse(line, raw, args)?.into(),
    "ONBUILD" => OnbuildInstruction::parse(line, raw, args)?.into(),

    // deprecated but still valid
    "MAINTAINER" => LabelInstruction::maintainer(line, raw, args).into(),

    _ => {
      return Err(parse_error(
        line,
        format!("unknown instruction: {}", keyword)
      ));
    }
  };

  Ok(instruction)
}

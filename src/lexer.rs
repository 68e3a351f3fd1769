// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use std::fmt;
use std::io::{BufRead, BufReader, Read};

/// The kind of a lexer token.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
  /// A Dockerfile instruction keyword (FROM, RUN, ...)
  Instruction,

  /// An instruction argument
  Argument,

  /// A comment, including its leading `#`
  Comment,

  /// The end of a logical line
  Newline,

  /// The end of the input
  Eof,

  /// A lexer error
  Error
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      TokenKind::Instruction => "INSTRUCTION",
      TokenKind::Argument => "ARGUMENT",
      TokenKind::Comment => "COMMENT",
      TokenKind::Newline => "NEWLINE",
      TokenKind::Eof => "EOF",
      TokenKind::Error => "ERROR"
    };

    write!(f, "{}", s)
  }
}

/// A single lexer token.
///
/// `line` is the 1-based number of the first physical line of the logical
/// line the token was scanned from; `column` is 1-based within the folded
/// logical line.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
  pub kind: TokenKind,
  pub text: String,
  pub line: usize,
  pub column: usize
}

impl Token {
  fn new<S: Into<String>>(kind: TokenKind, text: S, line: usize, column: usize) -> Token {
    Token {
      kind,
      text: text.into(),
      line, column
    }
  }
}

/// Returns true if the given word, uppercased, is a recognized Dockerfile
/// instruction keyword.
///
/// `MAINTAINER` is deprecated but still accepted; the parser folds it into
/// a `LABEL`.
pub fn is_keyword(word: &str) -> bool {
  matches!(
    word.to_ascii_uppercase().as_str(),
    "FROM" | "RUN" | "COPY" | "ADD" | "ENV" | "ARG" | "EXPOSE" | "WORKDIR"
      | "USER" | "LABEL" | "VOLUME" | "CMD" | "ENTRYPOINT" | "HEALTHCHECK"
      | "SHELL" | "STOPSIGNAL" | "ONBUILD" | "MAINTAINER"
  )
}

/// Tokenizes Dockerfile text.
///
/// Physical lines ending in `\` are folded into logical lines joined by a
/// single space before any token is produced. The lexer is infallible:
/// malformed content is emitted as `Argument` tokens and rejected by the
/// parser where context makes the failure meaningful.
pub struct Lexer<R> {
  reader: BufReader<R>,

  /// 1-based number of the last physical line read
  physical: usize,

  /// line number reported for tokens of the current logical line
  line: usize,

  current: Option<Vec<char>>,
  pos: usize,
  at_eof: bool,
  peeked: Option<Token>
}

impl<R: Read> Lexer<R> {
  pub fn new(reader: R) -> Lexer<R> {
    Lexer {
      reader: BufReader::new(reader),
      physical: 0,
      line: 0,
      current: None,
      pos: 0,
      at_eof: false,
      peeked: None
    }
  }

  /// Returns the next token, consuming it.
  pub fn next_token(&mut self) -> Token {
    if let Some(tok) = self.peeked.take() {
      return tok;
    }

    self.scan_token()
  }

  /// Returns the next token without consuming it.
  pub fn peek_token(&mut self) -> Token {
    if self.peeked.is_none() {
      self.peeked = Some(self.scan_token());
    }

    // unwrap is safe, the option was just filled
    self.peeked.clone().unwrap()
  }

  /// Restarts the lexer over a new reader, discarding all scanning
  /// state.
  pub fn reset(&mut self, reader: R) {
    self.reader = BufReader::new(reader);
    self.physical = 0;
    self.line = 0;
    self.current = None;
    self.pos = 0;
    self.at_eof = false;
    self.peeked = None;
  }

  /// Drains the input, collecting every token up to and including `Eof`.
  pub fn tokenize(mut self) -> Vec<Token> {
    let mut tokens = Vec::new();

    loop {
      let tok = self.next_token();
      let kind = tok.kind;
      tokens.push(tok);

      if kind == TokenKind::Eof || kind == TokenKind::Error {
        break;
      }
    }

    tokens
  }

  fn scan_token(&mut self) -> Token {
    if self.current.is_none() && !self.read_logical_line() {
      return Token::new(TokenKind::Eof, "", self.line, self.pos + 1);
    }

    self.skip_whitespace();

    let len = self.current.as_ref().map(|l| l.len()).unwrap_or(0);
    if self.pos >= len {
      // end of the logical line
      let tok = Token::new(TokenKind::Newline, "\n", self.line, self.pos + 1);
      self.current = None;
      self.pos = 0;
      return tok;
    }

    let start_col = self.pos + 1;

    if self.char_at(self.pos) == '#' {
      let comment: String = self.rest_of_line();
      self.pos = len;
      return Token::new(TokenKind::Comment, comment, self.line, start_col);
    }

    // the first word of a logical line may be an instruction keyword
    if self.at_line_start() {
      let word = self.scan_word();
      if !word.is_empty() {
        if is_keyword(&word) {
          return Token::new(
            TokenKind::Instruction,
            word.to_ascii_uppercase(),
            self.line,
            start_col
          );
        }

        // not a keyword; the parser will reject it
        return Token::new(TokenKind::Argument, word, self.line, start_col);
      }
      // line does not begin with a word character; fall through so the
      // argument scan always advances
    }

    let arg = self.scan_argument();
    Token::new(TokenKind::Argument, arg, self.line, start_col)
  }

  /// Reads the next logical line, folding trailing-`\` continuations.
  /// Returns false once the input is exhausted.
  fn read_logical_line(&mut self) -> bool {
    if self.at_eof {
      return false;
    }

    let mut full = String::new();
    let mut first = true;

    loop {
      let mut buf = String::new();
      let n = self.reader.read_line(&mut buf).unwrap_or(0);
      if n == 0 {
        self.at_eof = true;
        if first {
          return false;
        }

        break;
      }

      self.physical += 1;
      if first {
        self.line = self.physical;
        first = false;
      }

      let line = buf.trim_end_matches(['\r', '\n']);
      if let Some(stripped) = line.strip_suffix('\\') {
        full.push_str(stripped);
        full.push(' ');
        continue;
      }

      full.push_str(line);
      break;
    }

    self.current = Some(full.chars().collect());
    self.pos = 0;

    true
  }

  fn char_at(&self, pos: usize) -> char {
    self.current.as_ref().map(|l| l[pos]).unwrap_or('\0')
  }

  fn rest_of_line(&self) -> String {
    match &self.current {
      Some(line) => line[self.pos..].iter().collect(),
      None => String::new()
    }
  }

  fn skip_whitespace(&mut self) {
    let len = self.current.as_ref().map(|l| l.len()).unwrap_or(0);
    while self.pos < len {
      let ch = self.char_at(self.pos);
      if ch != ' ' && ch != '\t' {
        break;
      }

      self.pos += 1;
    }
  }

  /// True if everything before the cursor on this logical line is
  /// whitespace.
  fn at_line_start(&self) -> bool {
    (0..self.pos).all(|i| {
      let ch = self.char_at(i);
      ch == ' ' || ch == '\t'
    })
  }

  fn scan_word(&mut self) -> String {
    let len = self.current.as_ref().map(|l| l.len()).unwrap_or(0);
    let start = self.pos;

    while self.pos < len {
      let ch = self.char_at(self.pos);
      if !ch.is_alphanumeric() && ch != '_' {
        break;
      }

      self.pos += 1;
    }

    match &self.current {
      Some(line) => line[start..self.pos].iter().collect(),
      None => String::new()
    }
  }

  /// Scans the remainder of the logical line as a single argument,
  /// interpreting escapes and tracking quoting state. Quote characters
  /// themselves are preserved so per-instruction parsers can re-split
  /// the argument.
  fn scan_argument(&mut self) -> String {
    self.skip_whitespace();

    let len = self.current.as_ref().map(|l| l.len()).unwrap_or(0);
    let mut result = String::new();
    let mut in_double = false;
    let mut in_single = false;

    while self.pos < len {
      let ch = self.char_at(self.pos);

      if ch == '\\' && self.pos + 1 < len && !in_single {
        let next = self.char_at(self.pos + 1);
        match next {
          'n' => {
            result.push('\n');
            self.pos += 2;
            continue;
          },
          't' => {
            result.push('\t');
            self.pos += 2;
            continue;
          },
          '"' | '\'' | '\\' | ' ' => {
            result.push(next);
            self.pos += 2;
            continue;
          },
          _ => {
            // unknown escape, keep the backslash as-is
            result.push(ch);
            self.pos += 1;
            continue;
          }
        }
      }

      if ch == '"' && !in_single {
        in_double = !in_double;
        result.push(ch);
        self.pos += 1;
        continue;
      }

      if ch == '\'' && !in_double {
        in_single = !in_single;
        result.push(ch);
        self.pos += 1;
        continue;
      }

      // an unquoted # ends the argument and begins a trailing comment
      if ch == '#' && !in_double && !in_single {
        break;
      }

      result.push(ch);
      self.pos += 1;
    }

    result.trim().to_string()
  }
}

/// Tokenizes a string in one call.
pub fn tokenize_str(s: &str) -> Vec<Token> {
  Lexer::new(s.as_bytes()).tokenize()
}

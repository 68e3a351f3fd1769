// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use snafu::Snafu;

/// A Dockerfile analysis error.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
  #[snafu(display(
    "line {}: {}", line, message
  ))]
  ParseError {
    line: usize,
    message: String
  },

  #[snafu(display(
    "could not read Dockerfile: {}", source
  ))]
  ReadError {
    source: std::io::Error
  },

  #[snafu(display(
    "could not convert instruction '{}' to desired type '{}'", from, to
  ))]
  ConversionError {
    from: String,
    to: String
  }
}

impl Error {
  /// The source line the error refers to, if any.
  pub fn line(&self) -> Option<usize> {
    match self {
      Error::ParseError { line, .. } => Some(*line),
      _ => None
    }
  }
}

/// A Dockerfile analysis Result.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Helper to create a parse error at a given source line.
pub(crate) fn parse_error<S: Into<String>>(line: usize, message: S) -> Error {
  Error::ParseError {
    line,
    message: message.into()
  }
}

use std::string::FromUtf8Error;

/// Errors raised while decoding a whole iptables-save document.
///
/// Every variant carries the offending line and its 0-based line number.
#[derive(Debug, thiserror::Error)]
pub enum RIPTError {
  #[error("unmatched {quote} quote in [{line}] on line [{line_number}]")]
  UnmatchedQuote { quote: char, line: String, line_number: usize },

  #[error("found a value [{value}] without a corresponding switch in [{line}] on line [{line_number}]")]
  ValueWithoutSwitch { value: String, line: String, line_number: usize },

  #[error("rule [{line}] on line [{line_number}] does not begin with -A <chain>")]
  MissingChainDeclaration { line: String, line_number: usize },

  #[error("found an append line [{line}] on line [{line_number}], but no table yet")]
  NoTableDeclared { line: String, line_number: usize },

  #[error("invalid token in [{line}] on line [{line_number}]: {source}")]
  Encoding { source: FromUtf8Error, line: String, line_number: usize },
}

/// Defines the Result type of riptables-save crate
pub type RIPTResult<T> = Result<T, RIPTError>;

impl RIPTError {
  /// The 0-based line number the error was raised on.
  pub fn line_number(&self) -> usize {
    match *self {
      RIPTError::UnmatchedQuote { line_number, .. } => line_number,
      RIPTError::ValueWithoutSwitch { line_number, .. } => line_number,
      RIPTError::MissingChainDeclaration { line_number, .. } => line_number,
      RIPTError::NoTableDeclared { line_number, .. } => line_number,
      RIPTError::Encoding { line_number, .. } => line_number,
    }
  }

  /// The original text of the offending line.
  pub fn line(&self) -> &str {
    match self {
      RIPTError::UnmatchedQuote { line, .. } => line,
      RIPTError::ValueWithoutSwitch { line, .. } => line,
      RIPTError::MissingChainDeclaration { line, .. } => line,
      RIPTError::NoTableDeclared { line, .. } => line,
      RIPTError::Encoding { line, .. } => line,
    }
  }
}

/// Errors raised by a single stage of the line pipeline, before the decoder
/// knows which line they belong to.
#[derive(Debug, thiserror::Error)]
pub enum RIPTAnalysisError {
  #[error("unmatched {quote} quote")]
  UnmatchedQuote { quote: char },

  #[error("found a value [{0}] without a corresponding switch")]
  ValueWithoutSwitch(String),

  #[error("first switch is not -A <chain>")]
  MissingChainDeclaration,

  #[error(transparent)]
  FromUtf8Error(#[from] FromUtf8Error),
}

pub type RIPTAnalysisResult<T> = Result<T, RIPTAnalysisError>;

impl RIPTAnalysisError {
  /// Attach the line text and line number to a line-local error.
  pub fn at<S: Into<String>>(self, line: S, line_number: usize) -> RIPTError {
    let line = line.into();
    match self {
      RIPTAnalysisError::UnmatchedQuote { quote } => RIPTError::UnmatchedQuote { quote, line, line_number },
      RIPTAnalysisError::ValueWithoutSwitch(value) => RIPTError::ValueWithoutSwitch { value, line, line_number },
      RIPTAnalysisError::MissingChainDeclaration => RIPTError::MissingChainDeclaration { line, line_number },
      RIPTAnalysisError::FromUtf8Error(source) => RIPTError::Encoding { source, line, line_number },
    }
  }
}

//! Error types for the stylesheet tokenizer.
//!
//! Tokenizing never fails outright. Problems found while scanning are
//! collected as [`ParseError`] values next to the token output, and the
//! scanner applies a best-effort repair so that a result is always produced.

/// Result type alias for strict tokenizer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by strict tokenizer operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The stylesheet was tokenized, but parse errors were recorded.
    #[error("stylesheet has {} parse error(s), first: {}", .errors.len(), first_message(.errors))]
    Parse { errors: Vec<ParseError> },
}

fn first_message(errors: &[ParseError]) -> String {
    errors.first().map(ToString::to_string).unwrap_or_default()
}

/// Failure of the `url(...)` scanner.
///
/// Each variant carries the byte offset the failure is reported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    /// A quoted url argument never closes its quote.
    #[error("Incomplete string")]
    IncompleteString { offset: usize },

    /// Input ended before the closing `)`.
    #[error("Cannot find end of URL")]
    Unterminated { offset: usize },

    /// An unquoted url contains a character that is not allowed there.
    #[error("Invalid URL")]
    Invalid { offset: usize },
}

impl UrlError {
    /// Byte offset the failure is reported at.
    pub fn offset(&self) -> usize {
        match *self {
            Self::IncompleteString { offset }
            | Self::Unterminated { offset }
            | Self::Invalid { offset } => offset,
        }
    }
}

/// The kind of problem found while tokenizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// `/*` without a matching `*/`.
    #[error("Missing comment closing statement")]
    UnterminatedComment,

    /// `url(` that could not be scanned to its end.
    #[error("Incomplete URL")]
    IncompleteUrl(#[source] UrlError),

    /// A quoted string without its closing quote.
    #[error("Missing closing {quote}")]
    UnterminatedString { quote: char },

    /// A statement that is neither a declaration nor valid raw code.
    #[error("Invalid css rule")]
    InvalidRule,

    /// `}` with no open block.
    #[error("Unexpected }}")]
    UnexpectedBlockEnd,

    /// Blocks still open at the end of input.
    #[error("Missing }}")]
    MissingBlockEnd,

    /// Leftover top-level `}` found while folding tokens into a tree.
    #[error("Unmatched }}")]
    UnmatchedBlockEnd,
}

/// A recorded tokenizer error with an optional 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Line number where the error occurred (1-indexed).
    pub line: Option<u32>,
}

impl ParseError {
    /// Create an error without location information.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, line: None }
    }

    /// Create an error located at a byte offset of `source`.
    ///
    /// Blank characters at the offset are skipped before counting lines, so
    /// the reported line is the one holding the next real character.
    pub fn at(kind: ErrorKind, source: &str, offset: usize) -> Self {
        Self {
            kind,
            line: Some(line_at(source, offset)),
        }
    }

    /// The error message without the line suffix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} on line {}", self.kind, line),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::IncompleteUrl(cause) => Some(cause),
            _ => None,
        }
    }
}

/// Blank characters skipped by trimming and line computation.
pub(crate) fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B')
}

/// 1-based line of the first non-blank character at or after `offset`.
pub(crate) fn line_at(source: &str, offset: usize) -> u32 {
    let offset = offset.min(source.len());
    let rest = source.get(offset..).unwrap_or("");
    let end = offset + (rest.len() - rest.trim_start_matches(is_blank).len());
    let newlines = source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count();
    newlines as u32 + 1
}

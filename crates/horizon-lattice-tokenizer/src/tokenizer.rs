//! Tokenizer entry points.

use crate::builder::Builder;
use crate::config::{BuildConfig, TokenizerConfig};
use crate::error::{Error, ErrorKind, ParseError, Result};
use crate::lexer;
use crate::token::Token;

/// Tokens together with the errors recorded while producing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized<'a> {
    pub tokens: Vec<Token<'a>>,
    pub errors: Vec<ParseError>,
}

impl<'a> Tokenized<'a> {
    /// No errors were recorded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Return the tokens, or [`Error::Parse`] if any error was recorded.
    pub fn into_result(self) -> Result<Vec<Token<'a>>> {
        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(Error::Parse {
                errors: self.errors,
            })
        }
    }
}

/// Tokenize `source` into a flat token list.
pub fn tokenize<'a>(source: &'a str, config: &TokenizerConfig) -> Tokenized<'a> {
    tracing::debug!(
        len = source.len(),
        split_rules = config.split_rules,
        less_syntax = config.less_syntax,
        "tokenize"
    );
    let (tokens, errors) = lexer::tokenize(source, config);
    tracing::debug!(
        tokens = tokens.len(),
        errors = errors.len(),
        "tokenized"
    );
    Tokenized { tokens, errors }
}

/// Tokenize `source` and fold the result into a tree.
///
/// Leftover top-level `}` are recorded as [`ErrorKind::UnmatchedBlockEnd`]
/// after the errors of the flat pass.
pub fn tree<'a>(source: &'a str, config: &TokenizerConfig) -> Tokenized<'a> {
    let Tokenized { tokens, mut errors } = tokenize(source, config);
    let tokens = crate::tree::fold(tokens, |next| {
        if !config.ignore_errors {
            errors.push(ParseError::at(
                ErrorKind::UnmatchedBlockEnd,
                source,
                next.offset(),
            ));
        }
    });
    tracing::debug!(roots = tokens.len(), "tree folded");
    Tokenized { tokens, errors }
}

/// A configured tokenizer that keeps the errors of its latest call.
///
/// # Example
///
/// ```
/// use horizon_lattice_tokenizer::{Token, Tokenizer, TokenizerConfig};
///
/// let mut tokenizer = Tokenizer::new(TokenizerConfig::new().report_errors());
/// let tokens = tokenizer.tree("a { color: red; }");
///
/// assert!(tokenizer.errors().is_empty());
/// assert_eq!(tokens.len(), 1);
///
/// let Token::BlockStart(block) = &tokens[0] else {
///     unreachable!()
/// };
/// assert_eq!(block.selectors(), Some(&["a".into()][..]));
/// assert_eq!(block.children.as_ref().map(Vec::len), Some(1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    config: TokenizerConfig,
    errors: Vec<ParseError>,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        Self {
            config,
            errors: Vec::new(),
        }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Errors recorded by the latest `tokenize` or `tree` call.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Tokenize `source` into a flat token list.
    pub fn tokenize<'a>(&mut self, source: &'a str) -> Vec<Token<'a>> {
        let result = tokenize(source, &self.config);
        self.errors = result.errors;
        result.tokens
    }

    /// Tokenize `source` into a tree.
    pub fn tree<'a>(&mut self, source: &'a str) -> Vec<Token<'a>> {
        let result = tree(source, &self.config);
        self.errors = result.errors;
        result.tokens
    }

    /// Serialize flat or tree tokens.
    pub fn build(tokens: &[Token<'_>], config: &BuildConfig) -> String {
        Builder::new(config.clone()).build(tokens)
    }
}

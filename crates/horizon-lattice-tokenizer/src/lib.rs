//! Structural tokenizer for CSS and LESS/SASS stylesheets.
//!
//! This crate turns stylesheet source into a flat token stream or a nested
//! tree, and serializes tokens back into text. It recognizes structure only:
//!
//! - **Blocks**: selector headers and at-rules with their `{ ... }` bodies
//! - **Declarations**: `key: value` rules with `!important`-style modifiers
//! - **Recovery**: malformed input always yields tokens plus a list of errors
//! - **LESS/SASS**: optional support for mixins, `//` comments, `@{}`/`#{}`
//!   interpolation and `&:extend`
//!
//! Variables, mixins and expressions are never evaluated.
//!
//! # Example
//!
//! ```
//! use horizon_lattice_tokenizer::prelude::*;
//!
//! let source = "a { color: red !important; }";
//! let result = tokenize(source, &TokenizerConfig::default());
//! assert!(result.is_clean());
//!
//! let Token::Rule(rule) = &result.tokens[1] else {
//!     unreachable!()
//! };
//! assert_eq!(rule.key, "color");
//! assert!(rule.is_important());
//!
//! let css = Builder::new(BuildConfig::minified()).build(&result.tokens);
//! assert_eq!(css, "a{color:red !important;}");
//! ```

pub mod builder;
pub mod config;
pub mod scanner;
pub mod token;
pub mod tokenizer;

mod classify;
mod error;
mod lexer;
mod tree;
mod word;

pub use builder::Builder;
pub use config::{BuildConfig, DEFAULT_RULE_MODIFIERS, TokenizerConfig};
pub use error::{Error, ErrorKind, ParseError, Result, UrlError};
pub use token::{BlockStart, Header, Rule, Token};
pub use tokenizer::{Tokenized, Tokenizer, tokenize, tree};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::builder::Builder;
    pub use crate::config::{BuildConfig, TokenizerConfig};
    pub use crate::error::{ErrorKind, ParseError};
    pub use crate::token::{BlockStart, Header, Rule, Token};
    pub use crate::tokenizer::{Tokenized, Tokenizer, tokenize, tree};
}

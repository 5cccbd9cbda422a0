//! Single-pass lexical state machine.
//!
//! The lexer walks the sorted marker list once, accumulating words between
//! statement boundaries and handing them to the classifier whenever a `;`,
//! `{` or `}` closes a statement. All scanning state lives in a local
//! [`ScanState`], so every call starts from scratch.

use crate::classify::{Statement, check_rule, check_selectors};
use crate::config::TokenizerConfig;
use crate::error::{ErrorKind, ParseError};
use crate::scanner::{
    Marker, find_byte, find_end_of_quoted_string, find_end_of_url, find_markers, find_str,
};
use crate::token::Token;
use crate::word::{TextJoin, Word, WordKind};

/// Cursor, nesting counters and the word buffer for one pass.
#[derive(Debug, Default)]
struct ScanState<'a> {
    /// Next unconsumed byte offset.
    start: usize,
    /// Block nesting. Goes negative on stray `}`.
    depth: isize,
    function_depth: usize,
    expression_depth: usize,
    /// Start of the current block body (unsplit mode).
    block_start: usize,
    /// Start of the current header (unsplit mode).
    selector_start: usize,
    /// An error was recorded inside the current statement.
    error: bool,
    words: Vec<Word<'a>>,
    /// Index of the word that precedes the outermost open `(`.
    function_mark: Option<usize>,
    /// Index of the word that ends with the outermost open `@{`/`#{`.
    expression_mark: Option<usize>,
}

impl<'a> ScanState<'a> {
    /// Push `source[start..end]` as a text word and return its index.
    fn push_text(&mut self, source: &'a str, end: usize) -> usize {
        self.words
            .push(Word::slice(WordKind::Text, source, self.start..end));
        self.words.len() - 1
    }

    fn push_word(&mut self, kind: WordKind, source: &'a str, range: std::ops::Range<usize>) {
        self.start = range.end;
        self.words.push(Word::slice(kind, source, range));
    }

    fn take_words(&mut self) -> Vec<Word<'a>> {
        self.function_mark = None;
        self.expression_mark = None;
        std::mem::take(&mut self.words)
    }

    /// Collapse the words after `mark`, plus the text up to and including
    /// the closing character at `close`, into a single word.
    ///
    /// Without a mark the whole buffer is collapsed and the word is flagged
    /// as an error.
    fn merge_group(&mut self, source: &'a str, close: usize, kind: WordKind, mark: Option<usize>) {
        let from = mark.map_or(0, |index| index + 1);
        let offset = self.words.get(from).map_or(self.start, |word| word.offset);

        let mut join = TextJoin::new(source);
        for word in self.words.drain(from..) {
            join.push_word(&word);
        }
        join.push_slice(self.start..close + 1);

        let mut word = join.into_word(kind, offset);
        word.error = mark.is_none();
        self.words.push(word);
        self.start = close + 1;

        let keep = |other: Option<usize>| other.filter(|&index| mark.is_some_and(|m| index <= m));
        self.function_mark = keep(self.function_mark);
        self.expression_mark = keep(self.expression_mark);
    }
}

/// Runs one tokenize pass over a source string.
pub(crate) struct Lexer<'a, 'c> {
    source: &'a str,
    config: &'c TokenizerConfig,
    tokens: Vec<Token<'a>>,
    errors: Vec<ParseError>,
}

impl<'a, 'c> Lexer<'a, 'c> {
    pub fn new(source: &'a str, config: &'c TokenizerConfig) -> Self {
        Self {
            source,
            config,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Produce the flat token list and the recorded errors.
    pub fn run(mut self) -> (Vec<Token<'a>>, Vec<ParseError>) {
        let mut state = ScanState::default();

        for hit in find_markers(self.source, self.config.less_syntax) {
            if hit.offset < state.start {
                continue;
            }
            tracing::trace!(marker = hit.marker.as_str(), offset = hit.offset, "marker");

            let at = hit.offset;
            match hit.marker {
                Marker::LineComment => self.line_comment(&mut state, at),
                Marker::BlockComment => self.block_comment(&mut state, at),
                Marker::Escape => self.escape(&mut state, at),
                Marker::Url => self.url(&mut state, at),
                Marker::DoubleQuote => self.quoted(&mut state, at, b'"'),
                Marker::SingleQuote => self.quoted(&mut state, at, b'\''),
                Marker::Semicolon => self.semicolon(&mut state, at),
                Marker::BlockOpen => self.block_open(&mut state, at),
                Marker::BlockClose => self.block_close(&mut state, at),
                Marker::ParenOpen => self.paren_open(&mut state, at),
                Marker::ParenClose => self.paren_close(&mut state, at),
                Marker::LessInterpolation | Marker::SassInterpolation => {
                    self.interpolation_open(&mut state, at)
                }
            }
        }

        self.finish(&mut state);
        (self.tokens, self.errors)
    }

    /// Record an error unless errors are ignored. Returns whether the error
    /// was recorded.
    fn report(&mut self, kind: ErrorKind, offset: usize) -> bool {
        if self.config.ignore_errors {
            return false;
        }
        let error = ParseError::at(kind, self.source, offset);
        tracing::debug!(offset, "{}", error);
        self.errors.push(error);
        true
    }

    fn line_comment(&mut self, state: &mut ScanState<'a>, at: usize) {
        state.push_text(self.source, at);
        let newline = find_byte(self.source, b'\n', at + 2);
        let carriage = find_byte(self.source, b'\r', at + 2);
        let end = match (newline, carriage) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        state.start = end.map_or(self.source.len(), |end| end + 1);
    }

    fn block_comment(&mut self, state: &mut ScanState<'a>, at: usize) {
        state.push_text(self.source, at);
        match find_str(self.source, "*/", at + 2) {
            Some(end) => state.start = end + 2,
            None => {
                state.error |= self.report(ErrorKind::UnterminatedComment, at);
                state.start = self.source.len();
            }
        }
    }

    fn escape(&mut self, state: &mut ScanState<'a>, at: usize) {
        let escaped = self.source[at + 1..].chars().next().map_or(0, char::len_utf8);
        let end = at + 1 + escaped;
        state.push_text(self.source, end);
        state.start = end;
    }

    fn url(&mut self, state: &mut ScanState<'a>, at: usize) {
        state.push_text(self.source, at);
        state.start = at;
        match find_end_of_url(self.source, at) {
            Ok(end) => state.push_word(WordKind::Url, self.source, at..end),
            Err(cause) => {
                tracing::trace!(offset = cause.offset(), "{}", cause);
                state.push_word(WordKind::Text, self.source, at..at + 3);
                state.error |= self.report(ErrorKind::IncompleteUrl(cause), at);
            }
        }
    }

    fn quoted(&mut self, state: &mut ScanState<'a>, at: usize, quote: u8) {
        state.push_text(self.source, at);
        state.start = at;
        match find_end_of_quoted_string(self.source, quote, at) {
            Some(end) => state.push_word(WordKind::String, self.source, at..end),
            None if self.config.ignore_errors => {
                state.push_word(WordKind::Text, self.source, at..at + 1);
            }
            None => {
                self.report(ErrorKind::UnterminatedString { quote: quote as char }, at);
                state.error = true;
                state.push_word(WordKind::Raw, self.source, at..self.source.len());
            }
        }
    }

    fn semicolon(&mut self, state: &mut ScanState<'a>, at: usize) {
        if state.function_depth > 0 {
            return;
        }
        if self.config.split_rules {
            state.push_text(self.source, at);
            let words = state.take_words();
            self.emit_statement(&words, Some(at), state.error);
            state.error = false;
        }
        state.start = at + 1;
        state.selector_start = at + 1;
        state.take_words();
    }

    fn block_open(&mut self, state: &mut ScanState<'a>, at: usize) {
        if !self.config.split_rules && state.selector_start > state.block_start {
            let range = state.block_start..state.selector_start;
            if self.emit_code(range, state.error) {
                state.error = false;
            }
        }

        state.push_text(self.source, at);
        let words = state.take_words();
        self.tokens.push(check_selectors(self.source, &words));

        state.start = at + 1;
        state.block_start = at + 1;
        state.selector_start = at + 1;
        state.depth += 1;
    }

    fn block_close(&mut self, state: &mut ScanState<'a>, at: usize) {
        if state.expression_depth > 0 {
            if state.expression_depth == 1 {
                let mark = state.expression_mark.take();
                state.merge_group(self.source, at, WordKind::Expression, mark);
            }
            state.expression_depth -= 1;
            return;
        }

        self.flush_body(state, at);
        state.error = false;
        self.tokens.push(Token::BlockEnd { offset: at });

        if state.depth == 0 {
            self.report(ErrorKind::UnexpectedBlockEnd, at);
        }
        state.depth -= 1;

        state.start = at + 1;
        state.block_start = at + 1;
        state.selector_start = at + 1;
        state.take_words();
        state.function_depth = 0;
    }

    fn paren_open(&mut self, state: &mut ScanState<'a>, at: usize) {
        let index = state.push_text(self.source, at);
        if state.function_depth == 0 {
            state.function_mark = Some(index);
        }
        // The `(` itself stays in the next text run
        state.start = at;
        state.function_depth += 1;
    }

    fn paren_close(&mut self, state: &mut ScanState<'a>, at: usize) {
        if state.function_depth == 1 {
            let mark = state.function_mark.take();
            state.merge_group(self.source, at, WordKind::Function, mark);
        }
        state.function_depth = state.function_depth.saturating_sub(1);
    }

    fn interpolation_open(&mut self, state: &mut ScanState<'a>, at: usize) {
        let index = state.push_text(self.source, at + 2);
        if state.expression_depth == 0 {
            state.expression_mark = Some(index);
        }
        state.start = at + 2;
        state.expression_depth += 1;
    }

    fn finish(&mut self, state: &mut ScanState<'a>) {
        if state.depth > 0 {
            self.report(ErrorKind::MissingBlockEnd, self.source.len());
        }
        self.flush_body(state, self.source.len());
    }

    /// Flush whatever precedes a block end (or the end of input) at `end`.
    fn flush_body(&mut self, state: &mut ScanState<'a>, end: usize) {
        if self.config.split_rules {
            state.push_text(self.source, end);
            let words = state.take_words();
            self.emit_statement(&words, None, state.error);
        } else {
            self.emit_code(state.block_start..end, state.error);
        }
    }

    /// Emit trimmed `source[range]` as code. Returns whether anything was
    /// emitted.
    fn emit_code(&mut self, range: std::ops::Range<usize>, error: bool) -> bool {
        let offset = range.start;
        let text = TextJoin::trimmed_slice(self.source, range);
        if text.is_empty() {
            return false;
        }
        self.tokens.push(Token::Code {
            text,
            offset,
            error,
        });
        true
    }

    /// Classify a statement and emit it, carrying the pending error flag.
    fn emit_statement(&mut self, words: &[Word<'a>], terminator: Option<usize>, pending: bool) {
        let Some(Statement { mut token, invalid }) =
            check_rule(self.source, words, terminator, self.config)
        else {
            return;
        };

        if invalid && !pending {
            self.report(ErrorKind::InvalidRule, token.offset());
        }

        let error = pending || words.iter().any(|word| word.error);
        match &mut token {
            Token::Code { error: flag, .. } => *flag = error,
            Token::Rule(rule) => rule.error = error,
            Token::BlockStart(_) | Token::BlockEnd { .. } => {}
        }
        self.tokens.push(token);
    }
}

/// Tokenize `source` into a flat token list.
pub(crate) fn tokenize<'a>(
    source: &'a str,
    config: &TokenizerConfig,
) -> (Vec<Token<'a>>, Vec<ParseError>) {
    Lexer::new(source, config).run()
}

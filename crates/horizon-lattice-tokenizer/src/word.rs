//! Scanning words and zero-copy text joining.
//!
//! Words are the transient units the lexer accumulates between statement
//! boundaries. A borrowed word's text is always `source[offset..offset + len]`,
//! which lets [`TextJoin`] stitch consecutive words back into a single source
//! slice and only allocate when a gap (such as a skipped comment) separates
//! them.

use std::borrow::Cow;
use std::ops::Range;

use crate::error::is_blank;

/// What a scanned word holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WordKind {
    /// Plain text between markers.
    Text,
    /// Quoted string including its quotes.
    String,
    /// Complete `url(...)` construct.
    Url,
    /// LESS parenthesized group, including the parentheses.
    Function,
    /// LESS/SASS interpolation tail, up to and including `}`.
    Expression,
    /// Unscannable rest of the input after an unterminated string.
    Raw,
}

#[derive(Debug, Clone)]
pub(crate) struct Word<'a> {
    pub kind: WordKind,
    pub text: Cow<'a, str>,
    pub offset: usize,
    /// The word closes a nesting level that had no recorded opener.
    pub error: bool,
}

impl<'a> Word<'a> {
    pub fn slice(kind: WordKind, source: &'a str, range: Range<usize>) -> Self {
        Self {
            kind,
            text: Cow::Borrowed(&source[range.clone()]),
            offset: range.start,
            error: false,
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == WordKind::Text
    }
}

#[derive(Debug, Clone)]
enum Joined {
    Empty,
    Span(Range<usize>),
    Owned(String),
}

/// Accumulates text pieces, borrowing from the source while they stay
/// contiguous.
#[derive(Debug, Clone)]
pub(crate) struct TextJoin<'a> {
    source: &'a str,
    joined: Joined,
}

impl<'a> TextJoin<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            joined: Joined::Empty,
        }
    }

    /// Join a source range into a trimmed slice.
    pub fn trimmed_slice(source: &'a str, range: Range<usize>) -> Cow<'a, str> {
        let mut join = Self::new(source);
        join.push_slice(range);
        join.trim();
        join.finish()
    }

    /// Append `source[range]`.
    pub fn push_slice(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        match &mut self.joined {
            Joined::Empty => self.joined = Joined::Span(range),
            Joined::Span(span) if span.end == range.start => span.end = range.end,
            Joined::Span(span) => {
                let mut owned = self.source[span.clone()].to_string();
                owned.push_str(&self.source[range]);
                self.joined = Joined::Owned(owned);
            }
            Joined::Owned(owned) => owned.push_str(&self.source[range]),
        }
    }

    /// Append text that does not come from the source.
    pub fn push_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match &mut self.joined {
            Joined::Empty => self.joined = Joined::Owned(text.to_string()),
            Joined::Span(span) => {
                let mut owned = self.source[span.clone()].to_string();
                owned.push_str(text);
                self.joined = Joined::Owned(owned);
            }
            Joined::Owned(owned) => owned.push_str(text),
        }
    }

    pub fn push_word(&mut self, word: &Word<'a>) {
        self.push_word_part(word, 0..word.text.len());
    }

    /// Append `word.text[part]`.
    pub fn push_word_part(&mut self, word: &Word<'a>, part: Range<usize>) {
        match &word.text {
            Cow::Borrowed(_) => self.push_slice(word.offset + part.start..word.offset + part.end),
            Cow::Owned(text) => self.push_str(&text[part]),
        }
    }

    pub fn as_str(&self) -> &str {
        match &self.joined {
            Joined::Empty => "",
            Joined::Span(span) => &self.source[span.clone()],
            Joined::Owned(owned) => owned,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Remove leading and trailing blanks.
    pub fn trim(&mut self) {
        match &mut self.joined {
            Joined::Empty => {}
            Joined::Span(span) => {
                let text = &self.source[span.clone()];
                let leading = text.len() - text.trim_start_matches(is_blank).len();
                let trailing = text.len() - text.trim_end_matches(is_blank).len();
                if leading == text.len() {
                    self.joined = Joined::Empty;
                } else {
                    *span = span.start + leading..span.end - trailing;
                }
            }
            Joined::Owned(owned) => {
                let trimmed = owned.trim_matches(is_blank);
                if trimmed.is_empty() {
                    self.joined = Joined::Empty;
                } else if trimmed.len() != owned.len() {
                    *owned = trimmed.to_string();
                }
            }
        }
    }

    /// Remove `suffix` from the end, ignoring ASCII case. Returns whether
    /// it was present.
    pub fn strip_suffix_ignore_case(&mut self, suffix: &str) -> bool {
        let text = self.as_str();
        let Some(cut) = text.len().checked_sub(suffix.len()) else {
            return false;
        };
        let matches = text
            .get(cut..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix));
        if !matches {
            return false;
        }
        match &mut self.joined {
            Joined::Empty => {}
            Joined::Span(span) => span.end = span.start + cut,
            Joined::Owned(owned) => owned.truncate(cut),
        }
        true
    }

    pub fn finish(self) -> Cow<'a, str> {
        match self.joined {
            Joined::Empty => Cow::Borrowed(""),
            Joined::Span(span) => Cow::Borrowed(&self.source[span]),
            Joined::Owned(owned) => Cow::Owned(owned),
        }
    }

    /// Turn the joined text into a word. Borrowed text keeps the offset of
    /// its slice; owned text is placed at `offset`.
    pub fn into_word(self, kind: WordKind, offset: usize) -> Word<'a> {
        let offset = match &self.joined {
            Joined::Span(span) => span.start,
            _ => offset,
        };
        Word {
            kind,
            text: self.finish(),
            offset,
            error: false,
        }
    }
}

/// Byte ranges of `text` separated by `separator`.
pub(crate) fn split_ranges(text: &str, separator: u8) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut from = 0;
    for (index, byte) in text.bytes().enumerate() {
        if byte == separator {
            ranges.push(from..index);
            from = index + 1;
        }
    }
    ranges.push(from..text.len());
    ranges
}

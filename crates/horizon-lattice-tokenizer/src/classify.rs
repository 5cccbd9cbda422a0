//! Statement classification.
//!
//! Decides what a run of words between two structural boundaries is: a
//! `key: value` declaration, raw code, or a block header with selectors or
//! an at-rule.

use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::config::TokenizerConfig;
use crate::token::{BlockStart, Header, Rule, Token};
use crate::word::{TextJoin, Word, WordKind, split_ranges};

/// Result of looking for a `key: value` pair.
#[derive(Debug)]
pub(crate) enum RulePairs<'a> {
    /// A valid declaration.
    Rule(Rule<'a>),
    /// Not a declaration, but acceptable as raw code (LESS mixin calls and
    /// `@` statements).
    Code,
    /// Not a declaration and not acceptable code.
    Invalid,
    /// Key or value is empty.
    Empty,
}

/// A classified statement ready to be emitted.
#[derive(Debug)]
pub(crate) struct Statement<'a> {
    pub token: Token<'a>,
    /// The statement should be reported as an invalid rule.
    pub invalid: bool,
}

/// Merge all words into one trimmed text.
pub(crate) fn merge_words<'a>(source: &'a str, words: &[Word<'a>]) -> TextJoin<'a> {
    let mut join = TextJoin::new(source);
    for word in words {
        join.push_word(word);
    }
    join.trim();
    join
}

fn statement_offset(words: &[Word<'_>]) -> usize {
    words.first().map_or(0, |word| word.offset)
}

/// Classify the words before a `;`, a `}` or the end of input.
///
/// `terminator` is the offset of the `;` that ended the statement; it is
/// kept at the end of the text when the statement falls back to code.
/// Returns `None` for an empty statement.
pub(crate) fn check_rule<'a>(
    source: &'a str,
    words: &[Word<'a>],
    terminator: Option<usize>,
    config: &TokenizerConfig,
) -> Option<Statement<'a>> {
    let mut code = merge_words(source, words);
    if code.is_empty() {
        return None;
    }

    let pairs = if words.iter().any(|word| word.kind == WordKind::Raw) {
        RulePairs::Code
    } else {
        find_rule_pairs(source, words, config)
    };

    let invalid = match pairs {
        RulePairs::Rule(rule) => {
            return Some(Statement {
                token: Token::Rule(rule),
                invalid: false,
            });
        }
        RulePairs::Invalid => true,
        RulePairs::Code | RulePairs::Empty => false,
    };

    if let Some(at) = terminator {
        code.push_slice(at..at + 1);
    }
    Some(Statement {
        token: Token::Code {
            text: code.finish(),
            offset: statement_offset(words),
            error: false,
        },
        invalid,
    })
}

/// Split words into a declaration key and value.
pub(crate) fn find_rule_pairs<'a>(
    source: &'a str,
    words: &[Word<'a>],
    config: &TokenizerConfig,
) -> RulePairs<'a> {
    let mut key = TextJoin::new(source);
    let mut value = TextJoin::new(source);
    let mut is_key = true;
    let mut has_function = false;

    for word in words {
        if !word.is_text() {
            if is_key {
                // Quoted strings and urls cannot be part of a key
                if !config.less_syntax {
                    return RulePairs::Invalid;
                }
                has_function |= word.kind == WordKind::Function;
                key.push_word(word);
            } else {
                value.push_word(word);
            }
            continue;
        }

        let segments = key_value_segments(&word.text, config.less_syntax);
        match segments.as_slice() {
            [_, _, _, ..] => return RulePairs::Invalid,
            [head, tail] => {
                if !is_key {
                    return RulePairs::Invalid;
                }
                key.push_word_part(word, head.clone());
                value.push_word_part(word, tail.clone());
                is_key = false;
            }
            _ if is_key => key.push_word(word),
            _ => value.push_word(word),
        }
    }

    if is_key {
        key.trim();
        let mixin_or_variable = has_function || key.as_str().starts_with('@');
        return if config.less_syntax && mixin_or_variable {
            RulePairs::Code
        } else {
            RulePairs::Invalid
        };
    }

    key.trim();
    value.trim();
    if key.is_empty() || value.is_empty() {
        return RulePairs::Empty;
    }

    let mut modifiers = BTreeSet::new();
    for modifier in &config.rule_modifiers {
        if value.strip_suffix_ignore_case(&format!("!{modifier}")) {
            modifiers.insert(modifier.clone());
            value.trim();
            if value.is_empty() {
                return RulePairs::Empty;
            }
        }
    }

    RulePairs::Rule(Rule {
        key: key.finish(),
        value: value.finish(),
        modifiers,
        offset: statement_offset(words),
        error: false,
    })
}

/// Split a text word on `:`. With LESS syntax, `:extend` and `:extend(`
/// segments stay attached to the segment before them.
fn key_value_segments(text: &str, less_syntax: bool) -> Vec<std::ops::Range<usize>> {
    let ranges = split_ranges(text, b':');
    if !less_syntax {
        return ranges;
    }

    let mut segments: Vec<std::ops::Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        let segment = &text[range.clone()];
        let extend = segment == "extend" || segment.starts_with("extend(");
        match segments.last_mut() {
            Some(previous) if extend => previous.end = range.end,
            _ => segments.push(range),
        }
    }
    segments
}

/// Build the `BlockStart` token for the words before a `{`.
pub(crate) fn check_selectors<'a>(source: &'a str, words: &[Word<'a>]) -> Token<'a> {
    let mut selectors = get_selectors(source, words);
    let header = if selectors.first().is_some_and(|first| first.starts_with('@')) {
        let first = selectors.remove(0);
        let (name, rest) = split_at_rule(first);
        selectors.insert(0, rest);
        Header::AtRule {
            name,
            values: selectors,
        }
    } else if selectors.is_empty() {
        Header::Unclassified
    } else {
        Header::Selectors(selectors)
    };

    Token::BlockStart(BlockStart {
        code: merge_words(source, words).finish(),
        offset: statement_offset(words),
        header,
        children: None,
    })
}

/// Split `@name rest` into the at-rule name and its trimmed remainder.
fn split_at_rule(first: Cow<'_, str>) -> (Cow<'_, str>, Cow<'_, str>) {
    let name_end = first[1..]
        .find(|c: char| c.is_ascii_whitespace() || c == '\x0B')
        .map_or(first.len(), |pos| pos + 1);
    let trim = |text: &str| text.trim_matches(crate::error::is_blank).to_string();

    match first {
        Cow::Borrowed(text) => (
            Cow::Borrowed(&text[1..name_end]),
            Cow::Borrowed(text[name_end..].trim_matches(crate::error::is_blank)),
        ),
        Cow::Owned(text) => (
            Cow::Owned(text[1..name_end].to_string()),
            Cow::Owned(trim(&text[name_end..])),
        ),
    }
}

/// Split header words into comma separated pieces.
///
/// Commas only separate inside plain text words; strings, urls, functions
/// and expressions are never split. Empty pieces are dropped.
pub(crate) fn get_selectors<'a>(source: &'a str, words: &[Word<'a>]) -> Vec<Cow<'a, str>> {
    let mut pieces = Vec::new();
    let mut current = TextJoin::new(source);

    for word in words {
        if !word.is_text() {
            current.push_word(word);
            continue;
        }

        let mut ranges = split_ranges(&word.text, b',').into_iter();
        if let Some(first) = ranges.next() {
            current.push_word_part(word, first);
        }
        for range in ranges {
            let mut piece = std::mem::replace(&mut current, TextJoin::new(source));
            piece.trim();
            pieces.push(piece);
            current.push_word_part(word, range);
        }
    }
    current.trim();
    pieces.push(current);

    pieces
        .into_iter()
        .filter(|piece| !piece.is_empty())
        .map(TextJoin::finish)
        .collect()
}

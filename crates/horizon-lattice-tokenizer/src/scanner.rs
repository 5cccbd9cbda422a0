//! Scanner primitives: marker search and end-of-construct lookups.
//!
//! All functions here are pure lookups over the immutable source text. They
//! work on byte offsets; every marker is ASCII, so offsets returned by the
//! search are always valid `str` boundaries.

use crate::error::UrlError;

/// Special character sequences that drive the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    DoubleQuote,
    SingleQuote,
    BlockComment,
    BlockOpen,
    BlockClose,
    Semicolon,
    Url,
    Escape,
    /// `(`, LESS only.
    ParenOpen,
    /// `)`, LESS only.
    ParenClose,
    /// `//`, LESS only.
    LineComment,
    /// `@{`, LESS only.
    LessInterpolation,
    /// `#{`, LESS only.
    SassInterpolation,
}

/// Markers active for plain CSS, in declaration order.
const CSS_MARKERS: [Marker; 8] = [
    Marker::DoubleQuote,
    Marker::SingleQuote,
    Marker::BlockComment,
    Marker::BlockOpen,
    Marker::BlockClose,
    Marker::Semicolon,
    Marker::Url,
    Marker::Escape,
];

/// Additional markers active with LESS/SASS syntax.
const LESS_MARKERS: [Marker; 5] = [
    Marker::ParenOpen,
    Marker::ParenClose,
    Marker::LineComment,
    Marker::LessInterpolation,
    Marker::SassInterpolation,
];

impl Marker {
    /// Literal text of the marker.
    pub fn as_str(self) -> &'static str {
        match self {
            Marker::DoubleQuote => "\"",
            Marker::SingleQuote => "'",
            Marker::BlockComment => "/*",
            Marker::BlockOpen => "{",
            Marker::BlockClose => "}",
            Marker::Semicolon => ";",
            Marker::Url => "url(",
            Marker::Escape => "\\",
            Marker::ParenOpen => "(",
            Marker::ParenClose => ")",
            Marker::LineComment => "//",
            Marker::LessInterpolation => "@{",
            Marker::SassInterpolation => "#{",
        }
    }

    /// Length of the marker in bytes.
    pub fn width(self) -> usize {
        self.as_str().len()
    }

    /// Keyword markers match regardless of ASCII case.
    fn ignores_case(self) -> bool {
        matches!(self, Marker::Url)
    }
}

/// A marker occurrence in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerHit {
    pub marker: Marker,
    pub offset: usize,
}

/// Find every occurrence of the active markers, sorted by offset.
///
/// Two different markers never start at the same offset with the current
/// marker set; should that change, longer markers sort first and equal
/// lengths keep declaration order.
pub fn find_markers(source: &str, less_syntax: bool) -> Vec<MarkerHit> {
    let mut active = CSS_MARKERS.to_vec();
    if less_syntax {
        active.extend(LESS_MARKERS);
    }

    let mut hits = Vec::new();
    for marker in active {
        let needle = marker.as_str();
        if marker.ignores_case() {
            let needle = needle.as_bytes();
            hits.extend(
                source
                    .as_bytes()
                    .windows(needle.len())
                    .enumerate()
                    .filter(|(_, window)| window.eq_ignore_ascii_case(needle))
                    .map(|(offset, _)| MarkerHit { marker, offset }),
            );
        } else {
            hits.extend(
                source
                    .match_indices(needle)
                    .map(|(offset, _)| MarkerHit { marker, offset }),
            );
        }
    }

    hits.sort_by_key(|hit| (hit.offset, std::cmp::Reverse(hit.marker.width())));
    hits
}

/// Find the next occurrence of `byte` at or after `from`.
pub(crate) fn find_byte(source: &str, byte: u8, from: usize) -> Option<usize> {
    source
        .as_bytes()
        .get(from..)?
        .iter()
        .position(|&b| b == byte)
        .map(|pos| pos + from)
}

/// Find the next occurrence of `needle` at or after `from`.
pub(crate) fn find_str(source: &str, needle: &str, from: usize) -> Option<usize> {
    source.get(from..)?.find(needle).map(|pos| pos + from)
}

/// Find the end of a quoted string whose opening quote is at `start`.
///
/// Returns the offset just after the closing quote, or `None` if the string
/// is never closed. A quote preceded by a backslash is escaped, unless that
/// backslash is itself escaped.
pub fn find_end_of_quoted_string(source: &str, quote: u8, start: usize) -> Option<usize> {
    let mut next_escape = find_byte(source, b'\\', start + 1);
    let mut end = find_byte(source, quote, start + 1)?;

    while let Some(escape) = next_escape
        && escape < end
    {
        if end == escape + 1 {
            end = find_byte(source, quote, end + 1)?;
        }
        next_escape = find_byte(source, b'\\', escape + 2);
    }

    Some(end + 1)
}

/// Find the end of a `url(...)` construct whose marker starts at `start`.
///
/// Returns the offset just after the closing `)`.
pub fn find_end_of_url(source: &str, start: usize) -> Result<usize, UrlError> {
    let bytes = source.as_bytes();
    let mut index = start + Marker::Url.width();

    while index < bytes.len() {
        match bytes[index] {
            quote @ (b'"' | b'\'') => {
                let end = find_end_of_quoted_string(source, quote, index)
                    .ok_or(UrlError::IncompleteString { offset: index })?;
                return find_byte(source, b')', end)
                    .map(|close| close + 1)
                    .ok_or(UrlError::Unterminated { offset: start });
            }
            b' ' | b'\t' | b'\r' | b'\n' => index += 1,
            _ => return find_end_of_unquoted_url(bytes, start, index),
        }
    }

    Err(UrlError::Unterminated { offset: start })
}

fn find_end_of_unquoted_url(bytes: &[u8], start: usize, mut index: usize) -> Result<usize, UrlError> {
    while let Some(&byte) = bytes.get(index) {
        match byte {
            b')' => return Ok(index + 1),
            b'"' | b'\'' | b'(' | b' ' | b'\t' | b'\r' | b'\n' => {
                return Err(UrlError::Invalid { offset: start });
            }
            control if control < 0x20 => return Err(UrlError::Invalid { offset: start }),
            _ => index += 1,
        }
    }
    Err(UrlError::Unterminated { offset: start })
}

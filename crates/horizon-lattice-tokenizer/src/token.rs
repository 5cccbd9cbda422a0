//! Structural tokens produced by the tokenizer.
//!
//! Text fields borrow from the tokenized source whenever the text is a
//! contiguous slice of it, and own their data only when the text had to be
//! stitched together (for example around a skipped comment).

use std::borrow::Cow;
use std::collections::BTreeSet;

/// A structural token.
///
/// In flat form every [`Token::BlockStart`] is followed later by a matching
/// [`Token::BlockEnd`]. In tree form block contents live in
/// [`BlockStart::children`] and there are no `BlockEnd` tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "token", rename_all = "snake_case"))]
pub enum Token<'a> {
    /// Unparsed or fallback statement.
    Code {
        text: Cow<'a, str>,
        offset: usize,
        error: bool,
    },
    /// Block header followed by `{`.
    BlockStart(BlockStart<'a>),
    /// Closing `}` (flat form only).
    BlockEnd { offset: usize },
    /// A `key: value` declaration.
    Rule(Rule<'a>),
}

/// Classification of a block header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Header<'a> {
    /// Comma separated selector list.
    Selectors(Vec<Cow<'a, str>>),
    /// At-rule such as `@media screen, print`.
    AtRule {
        name: Cow<'a, str>,
        values: Vec<Cow<'a, str>>,
    },
    /// The header yielded nothing classifiable; only the raw text is usable.
    Unclassified,
}

/// A block header token.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockStart<'a> {
    /// Raw header text with comments removed and surrounding blanks trimmed.
    pub code: Cow<'a, str>,
    /// Byte offset where the header statement starts.
    pub offset: usize,
    /// Selector list or at-rule parsed from the header.
    pub header: Header<'a>,
    /// Nested tokens, set only in tree form.
    pub children: Option<Vec<Token<'a>>>,
}

/// A declaration token.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule<'a> {
    pub key: Cow<'a, str>,
    pub value: Cow<'a, str>,
    /// Modifier flags stripped from the value, such as `important`.
    pub modifiers: BTreeSet<String>,
    /// Byte offset where the declaration statement starts.
    pub offset: usize,
    /// A scan error was recovered inside this declaration.
    pub error: bool,
}

impl<'a> Rule<'a> {
    /// Create a declaration without modifiers.
    pub fn new(key: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            modifiers: BTreeSet::new(),
            offset: 0,
            error: false,
        }
    }

    /// Add a modifier flag.
    pub fn modifier(mut self, name: impl Into<String>) -> Self {
        self.modifiers.insert(name.into());
        self
    }

    /// Check whether a modifier flag is set.
    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers.contains(name)
    }

    /// Shorthand for `has_modifier("important")`.
    pub fn is_important(&self) -> bool {
        self.has_modifier("important")
    }

    /// Set the source offset.
    pub fn at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Detach from the source lifetime.
    pub fn into_owned(self) -> Rule<'static> {
        Rule {
            key: Cow::Owned(self.key.into_owned()),
            value: Cow::Owned(self.value.into_owned()),
            modifiers: self.modifiers,
            offset: self.offset,
            error: self.error,
        }
    }
}

impl<'a> BlockStart<'a> {
    /// Create a header token from its parts.
    pub fn new(code: impl Into<Cow<'a, str>>, header: Header<'a>) -> Self {
        Self {
            code: code.into(),
            offset: 0,
            header,
            children: None,
        }
    }

    /// Selector list, if the header is a selector header.
    pub fn selectors(&self) -> Option<&[Cow<'a, str>]> {
        match &self.header {
            Header::Selectors(selectors) => Some(selectors.as_slice()),
            _ => None,
        }
    }

    /// At-rule name and values, if the header is an at-rule.
    pub fn at_rule(&self) -> Option<(&str, &[Cow<'a, str>])> {
        match &self.header {
            Header::AtRule { name, values } => Some((name.as_ref(), values.as_slice())),
            _ => None,
        }
    }

    /// Detach from the source lifetime.
    pub fn into_owned(self) -> BlockStart<'static> {
        BlockStart {
            code: Cow::Owned(self.code.into_owned()),
            offset: self.offset,
            header: self.header.into_owned(),
            children: self
                .children
                .map(|children| children.into_iter().map(Token::into_owned).collect()),
        }
    }
}

impl Header<'_> {
    /// Detach from the source lifetime.
    pub fn into_owned(self) -> Header<'static> {
        match self {
            Header::Selectors(selectors) => Header::Selectors(owned_list(selectors)),
            Header::AtRule { name, values } => Header::AtRule {
                name: Cow::Owned(name.into_owned()),
                values: owned_list(values),
            },
            Header::Unclassified => Header::Unclassified,
        }
    }
}

fn owned_list(list: Vec<Cow<'_, str>>) -> Vec<Cow<'static, str>> {
    list.into_iter().map(|s| Cow::Owned(s.into_owned())).collect()
}

impl<'a> Token<'a> {
    /// A code token.
    pub fn code(text: impl Into<Cow<'a, str>>) -> Self {
        Token::Code {
            text: text.into(),
            offset: 0,
            error: false,
        }
    }

    /// A declaration token without modifiers.
    pub fn rule(key: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        Token::Rule(Rule::new(key, value))
    }

    /// A selector block header.
    pub fn selectors<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'a, str>>,
    {
        let selectors: Vec<Cow<'a, str>> = selectors.into_iter().map(Into::into).collect();
        let code = selectors.join(", ");
        Token::BlockStart(BlockStart::new(code, Header::Selectors(selectors)))
    }

    /// An at-rule block header.
    pub fn at_rule<I, S>(name: impl Into<Cow<'a, str>>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'a, str>>,
    {
        let name = name.into();
        let values: Vec<Cow<'a, str>> = values.into_iter().map(Into::into).collect();
        let code = if values.is_empty() {
            format!("@{name}")
        } else {
            format!("@{name} {}", values.join(", "))
        };
        Token::BlockStart(BlockStart::new(code, Header::AtRule { name, values }))
    }

    /// A block header with no classification, only raw text.
    pub fn raw_header(code: impl Into<Cow<'a, str>>) -> Self {
        Token::BlockStart(BlockStart::new(code, Header::Unclassified))
    }

    /// A closing `}`.
    pub fn block_end() -> Self {
        Token::BlockEnd { offset: 0 }
    }

    /// Attach children, turning a flat header into a tree node.
    ///
    /// Tokens other than `BlockStart` are returned unchanged.
    pub fn with_children(self, children: Vec<Token<'a>>) -> Self {
        match self {
            Token::BlockStart(mut block) => {
                block.children = Some(children);
                Token::BlockStart(block)
            }
            other => other,
        }
    }

    /// Set the source offset.
    pub fn at(mut self, offset: usize) -> Self {
        match &mut self {
            Token::Code { offset: at, .. } | Token::BlockEnd { offset: at } => *at = offset,
            Token::BlockStart(block) => block.offset = offset,
            Token::Rule(rule) => rule.offset = offset,
        }
        self
    }

    /// Byte offset of the token in the source.
    pub fn offset(&self) -> usize {
        match self {
            Token::Code { offset, .. } | Token::BlockEnd { offset } => *offset,
            Token::BlockStart(block) => block.offset,
            Token::Rule(rule) => rule.offset,
        }
    }

    /// Whether a scan error was recovered inside this token.
    pub fn has_error(&self) -> bool {
        match self {
            Token::Code { error, .. } => *error,
            Token::Rule(rule) => rule.error,
            _ => false,
        }
    }

    /// Whether this is a `BlockStart` still waiting for its `BlockEnd`.
    pub fn is_open_block(&self) -> bool {
        matches!(self, Token::BlockStart(block) if block.children.is_none())
    }

    /// Detach from the source lifetime.
    pub fn into_owned(self) -> Token<'static> {
        match self {
            Token::Code {
                text,
                offset,
                error,
            } => Token::Code {
                text: Cow::Owned(text.into_owned()),
                offset,
                error,
            },
            Token::BlockStart(block) => Token::BlockStart(block.into_owned()),
            Token::BlockEnd { offset } => Token::BlockEnd { offset },
            Token::Rule(rule) => Token::Rule(rule.into_owned()),
        }
    }
}

impl<'a> From<Rule<'a>> for Token<'a> {
    fn from(rule: Rule<'a>) -> Self {
        Token::Rule(rule)
    }
}

impl<'a> From<BlockStart<'a>> for Token<'a> {
    fn from(block: BlockStart<'a>) -> Self {
        Token::BlockStart(block)
    }
}

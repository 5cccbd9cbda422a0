//! Serializing tokens back into stylesheet text.

use crate::config::BuildConfig;
use crate::error::is_blank;
use crate::token::{BlockStart, Header, Rule, Token};

/// Turns flat or tree tokens into formatted text.
///
/// # Example
///
/// ```
/// use horizon_lattice_tokenizer::{BuildConfig, Builder, Token};
///
/// let tokens = vec![
///     Token::selectors(["a"]),
///     Token::rule("color", "red"),
///     Token::block_end(),
/// ];
/// let css = Builder::new(BuildConfig::minified()).build(&tokens);
/// assert_eq!(css, "a{color:red;}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    config: BuildConfig,
}

impl Builder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Serialize `tokens`. Surrounding blanks are trimmed from the result.
    pub fn build(&self, tokens: &[Token<'_>]) -> String {
        let mut out = String::new();
        self.write_tokens(&mut out, tokens, String::new());
        tracing::debug!(
            tokens = tokens.len(),
            len = out.len(),
            minify = self.config.minify,
            "build"
        );
        out.trim_matches(is_blank).to_string()
    }

    fn write_tokens(&self, out: &mut String, tokens: &[Token<'_>], mut indent: String) {
        let newline = self.config.newline.as_str();
        let unit = self.config.indent.as_str();
        let mut after_block_end = false;

        for token in tokens {
            match token {
                Token::Code { text, .. } => {
                    out.push_str(&indent);
                    out.push_str(text);
                    out.push_str(newline);
                }
                Token::BlockEnd { .. } => {
                    indent = indent.get(unit.len()..).unwrap_or_default().to_string();
                    out.push_str(&indent);
                    out.push('}');
                    out.push_str(newline);
                }
                Token::BlockStart(block) => {
                    // Separate sibling blocks with a blank line
                    if after_block_end {
                        out.push_str(newline);
                    }
                    out.push_str(&indent);
                    self.write_header(out, block);

                    if self.config.newline_after_selector {
                        out.push_str(newline);
                        out.push_str(&indent);
                    } else if !self.config.minify {
                        out.push(' ');
                    }
                    out.push('{');
                    out.push_str(newline);

                    let nested = format!("{indent}{unit}");
                    match &block.children {
                        Some(children) => {
                            self.write_tokens(out, children, nested);
                            out.push_str(&indent);
                            out.push('}');
                            out.push_str(newline);
                        }
                        None => indent = nested,
                    }
                }
                Token::Rule(rule) => self.write_rule(out, rule, &indent),
            }
            after_block_end = matches!(token, Token::BlockEnd { .. });
        }
    }

    fn write_header(&self, out: &mut String, block: &BlockStart<'_>) {
        let separator = self.config.selector_separator.as_str();
        match &block.header {
            Header::Selectors(selectors) => out.push_str(&selectors.join(separator)),
            Header::AtRule { name, values } => {
                out.push('@');
                out.push_str(name);
                let values = values.join(separator);
                if !values.is_empty() {
                    out.push(' ');
                    out.push_str(&values);
                }
            }
            Header::Unclassified => out.push_str(&block.code),
        }
    }

    fn write_rule(&self, out: &mut String, rule: &Rule<'_>, indent: &str) {
        out.push_str(indent);
        out.push_str(&rule.key);
        out.push_str(&self.config.rule_separator);
        out.push_str(&rule.value);
        for modifier in &self.config.rule_modifiers {
            if rule.has_modifier(modifier) {
                out.push_str(" !");
                out.push_str(modifier);
            }
        }
        out.push(';');
        out.push_str(&self.config.newline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(tokens: &[Token<'_>]) -> String {
        Builder::default().build(tokens)
    }

    #[test]
    fn code_and_rules() {
        assert_eq!(build(&[Token::code("color: red")]), "color: red");
        assert_eq!(
            build(&[
                Token::rule("color", "red"),
                Token::Rule(Rule::new("text-decoration", "none").modifier("important")),
            ]),
            "color: red;\ntext-decoration: none !important;"
        );
    }

    #[test]
    fn unknown_modifiers_are_not_written() {
        let rule = Rule::new("a", "b").modifier("optional");
        assert_eq!(build(&[Token::Rule(rule.clone())]), "a: b;");

        let builder = Builder::new(BuildConfig::new().rule_modifiers(["optional"]));
        assert_eq!(builder.build(&[Token::Rule(rule)]), "a: b !optional;");
    }

    #[test]
    fn at_rule_without_values() {
        let tokens = [
            Token::BlockStart(BlockStart::new(
                ".ignored",
                Header::AtRule {
                    name: "foo".into(),
                    values: Vec::new(),
                },
            )),
            Token::rule("color", "red"),
            Token::block_end(),
        ];
        assert_eq!(build(&tokens), "@foo\n{\n\tcolor: red;\n}");
    }

    #[test]
    fn blank_line_between_flat_blocks() {
        let tokens = [
            Token::selectors(["a"]),
            Token::block_end(),
            Token::selectors(["b"]),
            Token::block_end(),
        ];
        let builder = Builder::new(BuildConfig::new().newline_after_selector(false));
        assert_eq!(builder.build(&tokens), "a {\n}\n\nb {\n}");
    }

    #[test]
    fn stray_block_end_does_not_underflow() {
        assert_eq!(build(&[Token::block_end(), Token::code("x")]), "}\nx");
    }
}

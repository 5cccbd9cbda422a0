//! Tokenizer and builder configuration.

/// Modifier flags recognized at the end of a declaration value by default.
pub const DEFAULT_RULE_MODIFIERS: [&str; 2] = ["default", "important"];

fn default_rule_modifiers() -> Vec<String> {
    DEFAULT_RULE_MODIFIERS.iter().map(|m| m.to_string()).collect()
}

/// Configuration for [`Tokenizer`](crate::Tokenizer).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TokenizerConfig {
    /// Split block bodies into individual declarations. When disabled, a
    /// whole block body is kept as one opaque code statement.
    pub split_rules: bool,
    /// Apply best-effort repairs silently instead of recording errors.
    pub ignore_errors: bool,
    /// Enable LESS/SASS syntax: `(` `)` nesting, `//` comments, `@{`/`#{`
    /// interpolation and `&:extend`.
    pub less_syntax: bool,
    /// Trailing `!flag` suffixes stripped from declaration values.
    pub rule_modifiers: Vec<String>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            split_rules: true,
            ignore_errors: true,
            less_syntax: false,
            rule_modifiers: default_rule_modifiers(),
        }
    }
}

impl TokenizerConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for LESS/SASS stylesheets.
    pub fn less() -> Self {
        Self::default().less_syntax(true)
    }

    /// Enable or disable splitting block bodies into declarations.
    pub fn split_rules(mut self, enabled: bool) -> Self {
        self.split_rules = enabled;
        self
    }

    /// Enable or disable silent error repair.
    pub fn ignore_errors(mut self, enabled: bool) -> Self {
        self.ignore_errors = enabled;
        self
    }

    /// Record every error found while scanning.
    pub fn report_errors(self) -> Self {
        self.ignore_errors(false)
    }

    /// Enable or disable LESS/SASS syntax.
    pub fn less_syntax(mut self, enabled: bool) -> Self {
        self.less_syntax = enabled;
        self
    }

    /// Replace the list of recognized rule modifiers.
    pub fn rule_modifiers<I, S>(mut self, modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule_modifiers = modifiers.into_iter().map(Into::into).collect();
        self
    }
}

/// Formatting options for [`Builder`](crate::Builder).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BuildConfig {
    /// Minified output: no indentation, newlines or optional spaces.
    pub minify: bool,
    /// Indentation unit for one nesting level.
    pub indent: String,
    /// Line terminator.
    pub newline: String,
    /// Text between a declaration key and its value.
    pub rule_separator: String,
    /// Text between selectors (and between at-rule values).
    pub selector_separator: String,
    /// Put `{` on its own line after a block header.
    pub newline_after_selector: bool,
    /// Modifier flags re-emitted as ` !flag`, in this order.
    pub rule_modifiers: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            minify: false,
            indent: "\t".to_string(),
            newline: "\n".to_string(),
            rule_separator: ": ".to_string(),
            selector_separator: ", ".to_string(),
            newline_after_selector: true,
            rule_modifiers: default_rule_modifiers(),
        }
    }
}

impl BuildConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for minified output.
    pub fn minified() -> Self {
        Self::default().minify(true)
    }

    /// Enable or disable minified output.
    ///
    /// Enabling it clears indentation and newlines and tightens the
    /// separators; disabling it restores the defaults for those fields.
    pub fn minify(mut self, enabled: bool) -> Self {
        let defaults = Self::default();
        self.minify = enabled;
        if enabled {
            self.indent.clear();
            self.newline.clear();
            self.rule_separator = ":".to_string();
            self.selector_separator = ",".to_string();
        } else {
            self.indent = defaults.indent;
            self.newline = defaults.newline;
            self.rule_separator = defaults.rule_separator;
            self.selector_separator = defaults.selector_separator;
        }
        self
    }

    /// Set the indentation unit.
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Set the line terminator.
    pub fn newline(mut self, newline: impl Into<String>) -> Self {
        self.newline = newline.into();
        self
    }

    /// Set the key/value separator.
    pub fn rule_separator(mut self, separator: impl Into<String>) -> Self {
        self.rule_separator = separator.into();
        self
    }

    /// Set the selector separator.
    pub fn selector_separator(mut self, separator: impl Into<String>) -> Self {
        self.selector_separator = separator.into();
        self
    }

    /// Put `{` on its own line (`true`) or on the header line (`false`).
    pub fn newline_after_selector(mut self, enabled: bool) -> Self {
        self.newline_after_selector = enabled;
        self
    }

    /// Replace the list of re-emitted rule modifiers.
    pub fn rule_modifiers<I, S>(mut self, modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule_modifiers = modifiers.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_defaults() {
        let config = TokenizerConfig::default();
        assert!(config.split_rules);
        assert!(config.ignore_errors);
        assert!(!config.less_syntax);
        assert_eq!(config.rule_modifiers, vec!["default", "important"]);
    }

    #[test]
    fn tokenizer_builder() {
        let config = TokenizerConfig::less()
            .split_rules(false)
            .report_errors()
            .rule_modifiers(["important", "optional"]);

        assert!(!config.split_rules);
        assert!(!config.ignore_errors);
        assert!(config.less_syntax);
        assert_eq!(config.rule_modifiers, vec!["important", "optional"]);
    }

    #[test]
    fn minify_adjusts_layout() {
        let config = BuildConfig::minified();
        assert_eq!(config.indent, "");
        assert_eq!(config.newline, "");
        assert_eq!(config.rule_separator, ":");
        assert_eq!(config.selector_separator, ",");

        let config = config.minify(false);
        assert_eq!(config, BuildConfig::default());
    }

    #[test]
    fn build_builder() {
        let config = BuildConfig::new()
            .indent("  ")
            .newline("\r\n")
            .newline_after_selector(false);

        assert_eq!(config.indent, "  ");
        assert_eq!(config.newline, "\r\n");
        assert!(!config.newline_after_selector);
    }
}

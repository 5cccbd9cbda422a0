//! Tests for flat tokenizing of plain CSS.

use horizon_lattice_tokenizer::{
    BlockStart, ErrorKind, Header, Rule, Token, Tokenizer, TokenizerConfig,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn strict() -> Tokenizer {
    Tokenizer::new(TokenizerConfig::new().report_errors())
}

fn unsplit() -> Tokenizer {
    Tokenizer::new(TokenizerConfig::new().report_errors().split_rules(false))
}

fn code(text: &str, offset: usize) -> Token<'_> {
    Token::code(text).at(offset)
}

fn rule<'a>(key: &'a str, value: &'a str, offset: usize) -> Token<'a> {
    Token::rule(key, value).at(offset)
}

fn important<'a>(key: &'a str, value: &'a str, offset: usize) -> Token<'a> {
    Token::Rule(Rule::new(key, value).modifier("important").at(offset))
}

fn block<'a>(selectors: &[&'a str], offset: usize) -> Token<'a> {
    Token::selectors(selectors.iter().copied()).at(offset)
}

fn end(offset: usize) -> Token<'static> {
    Token::block_end().at(offset)
}

fn messages(tokenizer: &Tokenizer) -> Vec<String> {
    tokenizer.errors().iter().map(ToString::to_string).collect()
}

#[test]
fn test_unsplit_code() {
    init_tracing();
    let mut tokenizer = unsplit();

    assert_eq!(tokenizer.tokenize("color: red"), vec![code("color: red", 0)]);
    assert!(tokenizer.errors().is_empty());

    let css = "color: red; opacity: 1; border: 1px solid blue;";
    assert_eq!(tokenizer.tokenize(css), vec![code(css, 0)]);

    let css = ";color: red; /* opacity: 1; */ border: 1px solid blue";
    assert_eq!(tokenizer.tokenize(css), vec![code(css, 0)]);
    assert!(tokenizer.errors().is_empty());
}

#[test]
fn test_simple_selector() {
    let css = "a { Color: Red; }";
    assert_eq!(
        unsplit().tokenize(css),
        vec![block(&["a"], 0), code("Color: Red;", 3), end(16)]
    );
    assert_eq!(
        strict().tokenize(css),
        vec![block(&["a"], 0), rule("Color", "Red", 3), end(16)]
    );
}

#[test]
fn test_selector_with_spacing() {
    let css = "\n a[href] { color: red; opacity: .5 \n }\n\n";
    assert_eq!(
        unsplit().tokenize(css),
        vec![
            block(&["a[href]"], 0),
            code("color: red; opacity: .5", 11),
            end(38),
        ]
    );

    let mut tokenizer = strict();
    assert_eq!(
        tokenizer.tokenize(css),
        vec![
            block(&["a[href]"], 0),
            rule("color", "red", 11),
            rule("opacity", ".5", 23),
            end(38),
        ]
    );
    assert!(tokenizer.errors().is_empty());
}

#[test]
fn test_page_at_rule() {
    let css = "@page :left {\n margin-left: 4cm;\n margin-right: 3cm !important;\n}";
    let mut tokenizer = strict();
    let tokens = tokenizer.tokenize(css);

    assert!(tokenizer.errors().is_empty());
    assert_eq!(
        tokens,
        vec![
            Token::BlockStart(BlockStart {
                code: "@page :left".into(),
                offset: 0,
                header: Header::AtRule {
                    name: "page".into(),
                    values: vec![":left".into()],
                },
                children: None,
            }),
            rule("margin-left", "4cm", 13),
            important("margin-right", "3cm", 32),
            end(64),
        ]
    );
}

#[test]
fn test_at_rule_without_values() {
    let mut tokenizer = strict();
    let tokens = tokenizer.tokenize("@font-face { a: b; }");

    assert!(tokenizer.errors().is_empty());
    assert_eq!(
        tokens,
        vec![
            Token::BlockStart(BlockStart {
                code: "@font-face".into(),
                offset: 0,
                header: Header::AtRule {
                    name: "font-face".into(),
                    values: vec!["".into()],
                },
                children: None,
            }),
            rule("a", "b", 12),
            end(19),
        ]
    );
}

#[test]
fn test_comments() {
    let css = "/* comment at start */.foo, /* comment in selector */a[href], b { color: red; /* margin: 0; */ opacity: .5; }\n/* the end */";

    assert_eq!(
        unsplit().tokenize(css),
        vec![
            block(&[".foo", "a[href]", "b"], 0),
            code("color: red; /* margin: 0; */ opacity: .5;", 65),
            end(108),
            code("/* the end */", 109),
        ]
    );
    assert_eq!(
        strict().tokenize(css),
        vec![
            block(&[".foo", "a[href]", "b"], 0),
            rule("color", "red", 65),
            rule("opacity", ".5", 77),
            end(108),
        ]
    );
}

#[test]
fn test_escaped_strings() {
    let css = r#"div:after { content: "test; line } \"; " }"#;
    assert_eq!(
        unsplit().tokenize(css),
        vec![
            block(&["div:after"], 0),
            code(r#"content: "test; line } \"; ""#, 11),
            end(41),
        ]
    );
    assert_eq!(
        strict().tokenize(css),
        vec![
            block(&["div:after"], 0),
            rule("content", r#""test; line } \"; ""#, 11),
            end(41),
        ]
    );
}

#[test]
fn test_quotes_in_selector() {
    let css = r#"div[href="/*foo{bar}"], span[data-foo='test"\'str'] { color: blue !important }"#;
    let mut tokenizer = strict();

    assert_eq!(
        tokenizer.tokenize(css),
        vec![
            block(&[r#"div[href="/*foo{bar}"]"#, r#"span[data-foo='test"\'str']"#], 0),
            important("color", "blue", 53),
            end(77),
        ]
    );
    assert!(tokenizer.errors().is_empty());
}

#[test]
fn test_escaped_semicolon() {
    let mut tokenizer = strict();
    assert_eq!(
        tokenizer.tokenize(r"font-family: Test\;1, Arial;"),
        vec![rule("font-family", r"Test\;1, Arial", 0)]
    );
    assert!(tokenizer.errors().is_empty());
}

#[test]
fn test_urls() {
    let mut tokenizer = strict();
    assert_eq!(
        tokenizer.tokenize(r#"div { background: url("test;}{url"); color: blue; }"#),
        vec![
            block(&["div"], 0),
            rule("background", r#"url("test;}{url")"#, 5),
            rule("color", "blue", 36),
            end(50),
        ]
    );
    assert!(tokenizer.errors().is_empty());

    assert_eq!(
        tokenizer.tokenize("div { background: url(data:image/png;base64,whatever/*}{&); color: blue; }"),
        vec![
            block(&["div"], 0),
            rule("background", "url(data:image/png;base64,whatever/*}{&)", 5),
            rule("color", "blue", 59),
            end(73),
        ]
    );
    assert!(tokenizer.errors().is_empty());
}

#[test]
fn test_nested_rules() {
    let css = ".foo { color: red; border: 1px solid red; &:hover { color: blue; }}";

    assert_eq!(
        unsplit().tokenize(css),
        vec![
            block(&[".foo"], 0),
            code("color: red; border: 1px solid red;", 6),
            block(&["&:hover"], 41),
            code("color: blue;", 51),
            end(65),
            end(66),
        ]
    );
    assert_eq!(
        strict().tokenize(css),
        vec![
            block(&[".foo"], 0),
            rule("color", "red", 6),
            rule("border", "1px solid red", 18),
            block(&["&:hover"], 41),
            rule("color", "blue", 51),
            end(65),
            end(66),
        ]
    );
}

#[test]
fn test_sass_variables_as_rules() {
    let mut tokenizer = strict();
    assert_eq!(
        tokenizer.tokenize("$test: black; $foo: lighten(#400, 20%); a { color: $test; }"),
        vec![
            rule("$test", "black", 0),
            rule("$foo", "lighten(#400, 20%)", 13),
            block(&["a"], 39),
            rule("color", "$test", 43),
            end(58),
        ]
    );
    assert!(tokenizer.errors().is_empty());
}

#[test]
fn test_misplaced_import() {
    let css = r#".foo { color: red; @import "bar.css"; opacity: 0 }"#;
    let expected = vec![
        block(&[".foo"], 0),
        rule("color", "red", 6),
        code(r#"@import "bar.css";"#, 18),
        rule("opacity", "0", 37),
        end(49),
    ];

    let mut tokenizer = strict();
    assert_eq!(tokenizer.tokenize(css), expected);
    assert_eq!(messages(&tokenizer), vec!["Invalid css rule on line 1"]);

    let mut tokenizer = Tokenizer::default();
    assert_eq!(tokenizer.tokenize(css), expected);
    assert!(tokenizer.errors().is_empty());
}

#[test]
fn test_block_balance_errors() {
    let mut tokenizer = strict();
    tokenizer.tokenize(".foo { color: red; border: 1px solid red; &:hover { color: blue; }");
    assert_eq!(messages(&tokenizer), vec!["Missing } on line 1"]);

    tokenizer.tokenize(
        ".foo
                {
                    color: red;
                    border: 1px solid red;
                    &:hover {
                        color: blue;
                    }
                }
            }",
    );
    assert_eq!(messages(&tokenizer), vec!["Unexpected } on line 9"]);

    tokenizer.tokenize(
        ".foo {
                color: red;
                border: 1px solid red;
                }
            }
            .bar {
                .baz {
                    color: blue;
            }",
    );
    assert_eq!(messages(&tokenizer), vec!["Unexpected } on line 5"]);
}

#[test]
fn test_invalid_rule() {
    let css = ".foo
            {
                color: red: blue;
                opacity: 0;
            }";
    let expected = vec![
        block(&[".foo"], 0),
        code("color: red: blue;", 18),
        rule("opacity", "0", 52),
        end(93),
    ];

    let mut tokenizer = strict();
    assert_eq!(tokenizer.tokenize(css), expected);
    assert_eq!(messages(&tokenizer), vec!["Invalid css rule on line 3"]);
    assert_eq!(tokenizer.errors()[0].kind, ErrorKind::InvalidRule);

    let mut tokenizer = Tokenizer::default();
    assert_eq!(tokenizer.tokenize(css), expected);
    assert!(tokenizer.errors().is_empty());

    // Statements are not classified when rules are not split
    let mut tokenizer = unsplit();
    tokenizer.tokenize(css);
    assert!(tokenizer.errors().is_empty());
}

#[test]
fn test_missing_closing_quote() {
    let mut tokenizer = strict();
    tokenizer.tokenize(
        ".foo[\"bar] {
                color: red;
            }",
    );
    assert_eq!(messages(&tokenizer), vec!["Missing closing \" on line 1"]);

    let css = ".foo['bar] {
                color: red;
            }";
    assert_eq!(
        tokenizer.tokenize(css),
        vec![Token::Code {
            text: css.into(),
            offset: 0,
            error: true,
        }]
    );
    assert_eq!(messages(&tokenizer), vec!["Missing closing ' on line 1"]);

    // Ignoring errors resynchronizes after the lone quote
    let mut tokenizer = Tokenizer::default();
    assert_eq!(
        tokenizer.tokenize(css),
        vec![block(&[".foo['bar]"], 0), rule("color", "red", 12), end(53)]
    );
    assert!(tokenizer.errors().is_empty());
}

#[test]
fn test_invalid_url() {
    let mut tokenizer = strict();
    let tokens = tokenizer.tokenize(
        ".foo {
                background-image: url(image/png\ntest);
            }",
    );

    assert_eq!(messages(&tokenizer), vec!["Incomplete URL on line 2"]);
    assert!(matches!(
        tokenizer.errors()[0].kind,
        ErrorKind::IncompleteUrl(_)
    ));
    // The declaration survives, flagged as recovered
    assert!(tokens[1].has_error());
}

#[test]
fn test_unterminated_comment() {
    let mut tokenizer = strict();
    let tokens = tokenizer.tokenize("a { color: red; /* b: c; }");

    assert_eq!(tokens.len(), 2);
    assert_eq!(
        messages(&tokenizer),
        vec!["Missing comment closing statement on line 1", "Missing } on line 1"]
    );
}

#[test]
fn test_url_keyword_is_case_insensitive() {
    let mut tokenizer = strict();
    let tokens = tokenizer.tokenize("a { background: URL( 'x;y.png' ) }");
    assert_eq!(tokens[1], rule("background", "URL( 'x;y.png' )", 3));
    assert!(tokenizer.errors().is_empty());
}

#[test]
fn test_empty_statements_are_dropped() {
    let mut tokenizer = strict();
    assert_eq!(
        tokenizer.tokenize(";; a { ; } ;"),
        vec![block(&["a"], 2), end(9)]
    );
    assert!(tokenizer.errors().is_empty());
}

#[test]
fn test_blank_header_is_kept() {
    let tokens = strict().tokenize("{ a: b }");
    assert_eq!(
        tokens[0],
        Token::BlockStart(BlockStart::new("", Header::Unclassified))
    );
    assert_eq!(tokens.len(), 3);
}

#[test]
fn test_tokens_borrow_source() {
    let tokens = strict().tokenize("a { color: red; }");
    let Token::Rule(rule) = &tokens[1] else {
        panic!("expected rule");
    };
    assert!(matches!(rule.value, std::borrow::Cow::Borrowed("red")));
}

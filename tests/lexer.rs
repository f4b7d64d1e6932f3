//! Lexer edge cases, error reporting, and the pairwise
//! concatenation-invariance matrix.

mod common;

use common::assert_token_tiling;
use listfile_rs::{LexErrorKind, TokenKind, tokenize};

// -----------------------------------------------------------
// Basic lexer behaviour.
// -----------------------------------------------------------

#[test]
fn lex_empty_input() {
    let tokens = tokenize("").expect("tokenize");
    assert!(tokens.is_empty());
}

#[test]
fn lex_only_whitespace() {
    let tokens = tokenize("   \t  \n\n  ").expect("tokenize");
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Space,
            TokenKind::Newline,
            TokenKind::Newline,
            TokenKind::Space,
        ]
    );
}

#[test]
fn lex_crlf_splits_into_space_and_newline() {
    let tokens = tokenize("foo(bar)\r\n").expect("tokenize");
    let last_two = &tokens[tokens.len() - 2..];
    assert_eq!(last_two[0].kind, TokenKind::Space);
    assert_eq!(last_two[0].raw, "\r");
    assert_eq!(last_two[1].kind, TokenKind::Newline);
}

#[test]
fn lex_identifier_with_underscore_and_digits() {
    let tokens = tokenize("_foo2(a)").expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "_foo2");
}

#[test]
fn lex_digit_start_is_not_an_identifier() {
    let tokens = tokenize("2foo").expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::UnquotedArgument);
}

// -----------------------------------------------------------
// Bracket forms.
// -----------------------------------------------------------

#[test]
fn lex_mismatched_close_strength_is_content() {
    let tokens = tokenize("[=[abc]]x]=]").expect("tokenize");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::BracketArgument { strength: 1 });
    assert_eq!(tokens[0].value, "abc]]x");
}

#[test]
fn lex_single_close_bracket_is_content_at_strength_zero() {
    let tokens = tokenize("[[a]b]]").expect("tokenize");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].value, "a]b");
}

#[test]
fn lex_bracket_with_embedded_hash_and_open() {
    let tokens = tokenize("[=[a#[[b]=]").expect("tokenize");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].value, "a#[[b");
}

#[test]
fn lex_hash_without_bracket_opener_is_line_comment() {
    let tokens = tokenize("#[=abc").expect("tokenize");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::LineComment);
    assert_eq!(tokens[0].value, "[=abc");
}

#[test]
fn lex_unterminated_bracket_comment() {
    let err = tokenize("#[[abc").expect_err("should fail");
    assert_eq!(err.kind, LexErrorKind::UnterminatedBracket { strength: 0 });
    assert_eq!(err.offset, 0);
}

// -----------------------------------------------------------
// Quoted and unquoted arguments.
// -----------------------------------------------------------

#[test]
fn lex_empty_quoted_argument() {
    let tokens = tokenize("\"\"").expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::QuotedArgument);
    assert_eq!(tokens[0].value, "");
    assert_eq!(tokens[0].raw, "\"\"");
}

#[test]
fn lex_balanced_nesting_inside_quote() {
    let tokens = tokenize("\"${a${b}c}\"").expect("tokenize");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].value, "${a${b}c}");
}

#[test]
fn lex_comment_at_end_of_input() {
    let tokens = tokenize("#").expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::LineComment);
    assert_eq!(tokens[0].value, "");
    assert_eq!(tokens[0].raw, "#");
}

#[test]
fn lex_punctuation_soup_is_one_unquoted_argument() {
    let input = "~`!1@23$4%5^6&7*890_-+=QqWwEeRrTtYyUuIiOoPp{[}]|\
                 AaSsDdFfGgHhJjKkLl:;'ZzXxCcVvBbNnMm<,>.?/";
    let tokens = tokenize(input).expect("tokenize");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::UnquotedArgument);
    assert_eq!(tokens[0].value, input);
}

#[test]
fn lex_legacy_quote_spans_whitespace() {
    let tokens = tokenize("a\" \"b c").expect("tokenize");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].value, "a\" \"b");
    assert_eq!(tokens[2].value, "c");
}

#[test]
fn lex_unterminated_legacy_quote() {
    let err = tokenize("arg\"open").expect_err("should fail");
    assert_eq!(err.kind, LexErrorKind::UnterminatedQuote);
    assert_eq!(err.offset, 3);
}

#[test]
fn lex_nested_reference_error_reports_outermost_open() {
    let err = tokenize("x ${a${b}").expect_err("should fail");
    assert_eq!(err.kind, LexErrorKind::UnterminatedVariableReference);
    assert_eq!(err.offset, 2);
}

// -----------------------------------------------------------
// Raw-span tiling.
// -----------------------------------------------------------

#[test]
fn lex_raw_spans_tile_the_input() {
    for input in [
        "foo(bar \"baz\" [[qux]]) # done\n",
        "  \t#[=[c]=]# line\nset(X ${a${b}c})\n",
        "a\" \"b $(abc) some_arg\"with a\"quote\n",
        "(((  )))",
    ] {
        assert_token_tiling(input);
    }
}

// -----------------------------------------------------------
// Concatenation invariance: lexing `a + b` yields the same two
// tokens as lexing `a` and `b` separately, except where the first
// token can absorb or recolor the second.
// -----------------------------------------------------------

struct Single {
    input: &'static str,
    kind: TokenKind,
    value: &'static str,
    /// Kind names that may not follow this token in the matrix:
    /// the pair would merge, be absorbed, or change kind.
    excludes: &'static [&'static str],
}

const ALL_KINDS: &[&str] = &[
    "space",
    "newline",
    "identifier",
    "lparen",
    "rparen",
    "bracket_argument",
    "quoted_argument",
    "unquoted_argument",
    "bracket_comment",
    "line_comment",
];

const SINGLES: &[Single] = &[
    Single {
        input: " ",
        kind: TokenKind::Space,
        value: " ",
        // adjacent space runs merge
        excludes: &["space"],
    },
    Single {
        input: "\n",
        kind: TokenKind::Newline,
        value: "\n",
        excludes: &[],
    },
    Single {
        input: "(",
        kind: TokenKind::LParen,
        value: "(",
        // a following word lexes as an argument, not an identifier
        excludes: &["identifier"],
    },
    Single {
        input: ")",
        kind: TokenKind::RParen,
        value: ")",
        excludes: &[],
    },
    Single {
        input: "# some comment",
        kind: TokenKind::LineComment,
        value: " some comment",
        // a line comment absorbs everything up to a newline
        excludes: &[
            "space",
            "identifier",
            "lparen",
            "rparen",
            "bracket_argument",
            "quoted_argument",
            "unquoted_argument",
            "bracket_comment",
            "line_comment",
        ],
    },
    Single {
        input: "[=[some bracket\n argument]=]",
        kind: TokenKind::BracketArgument { strength: 1 },
        value: "some bracket\n argument",
        excludes: &[],
    },
    Single {
        input: "#[=[some bracket\n comment]=]",
        kind: TokenKind::BracketComment { strength: 1 },
        value: "some bracket\n comment",
        excludes: &[],
    },
    Single {
        input: "\"some quote\"",
        kind: TokenKind::QuotedArgument,
        value: "some quote",
        excludes: &[],
    },
    Single {
        input: "a+b",
        kind: TokenKind::UnquotedArgument,
        value: "a+b",
        // words glue together; an embedded quote or bracket opener
        // becomes legacy content of the same token
        excludes: &[
            "identifier",
            "unquoted_argument",
            "quoted_argument",
            "bracket_argument",
        ],
    },
    Single {
        input: "foo",
        kind: TokenKind::Identifier,
        value: "foo",
        excludes: &[
            "identifier",
            "unquoted_argument",
            "quoted_argument",
            "bracket_argument",
        ],
    },
];

#[test]
fn concatenation_invariance() {
    for first in SINGLES {
        for second in SINGLES {
            if first.excludes.contains(&second.kind.name()) {
                continue;
            }
            let input = format!("{}{}", first.input, second.input);
            let tokens =
                tokenize(&input).unwrap_or_else(|e| panic!("tokenize failed for {input:?}: {e}"));
            assert_eq!(tokens.len(), 2, "wrong token count for {input:?}");
            assert_eq!(tokens[0].kind, first.kind, "first kind in {input:?}");
            assert_eq!(tokens[0].value, first.value, "first value in {input:?}");
            assert_eq!(tokens[1].kind, second.kind, "second kind in {input:?}");
            assert_eq!(tokens[1].value, second.value, "second value in {input:?}");
        }
    }
}

#[test]
fn concatenation_matrix_exclusions_are_known_kinds() {
    for single in SINGLES {
        for name in single.excludes {
            assert!(ALL_KINDS.contains(name), "unknown kind name {name}");
        }
    }
}

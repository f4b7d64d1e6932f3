use std::fmt;

use crate::token::{Token, TokenKind};

/// Classifies a lexer error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Bracket argument or comment whose closing delimiter never appears.
    UnterminatedBracket { strength: usize },
    /// Quoted argument (or legacy embedded quote) with no closing `"`.
    UnterminatedQuote,
    /// `${` nesting still open at end of input.
    UnterminatedVariableReference,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedBracket { strength } => {
                write!(f, "unterminated bracket of strength {strength}")
            }
            Self::UnterminatedQuote => {
                write!(f, "unterminated quoted argument")
            }
            Self::UnterminatedVariableReference => {
                write!(f, "unterminated variable reference")
            }
        }
    }
}

/// Error produced during lexing.
///
/// `offset` is the byte offset of the start of the unterminated construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} starting at offset {offset}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub offset: usize,
}

/// Tokenize a full source string into a sequence of tokens.
///
/// This is a convenience over driving [`Lexer`] by hand; the parser never
/// materializes the stream like this.
///
/// # Errors
///
/// Returns `LexError` on an unterminated bracket, quote, or variable
/// reference.
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, LexError> {
    Lexer::new(input).collect()
}

/// A pull lexer over one immutable source buffer.
///
/// Tokens are produced one at a time via [`Lexer::advance`] and
/// [`Lexer::read`], or through the [`Iterator`] impl. Every token borrows
/// from the input; nothing is copied.
///
/// Identifiers are context-sensitive: a bare word lexes as `identifier`
/// only outside parentheses, and as `unquoted_argument` inside an
/// argument list.
#[derive(Debug)]
pub struct Lexer<'src> {
    input: &'src str,
    pos: usize,
    paren_depth: usize,
    current: Option<Token<'src>>,
}

impl<'src> Lexer<'src> {
    #[must_use]
    pub const fn new(input: &'src str) -> Self {
        Self {
            input,
            pos: 0,
            paren_depth: 0,
            current: None,
        }
    }

    /// Recognize the next token.
    ///
    /// Returns `Ok(true)` and updates the current token on success,
    /// `Ok(false)` at end of input. After an error or end of input the
    /// lexer stays exhausted.
    ///
    /// # Errors
    ///
    /// Returns `LexError` when the construct starting at the scan position
    /// never terminates.
    pub fn advance(&mut self) -> Result<bool, LexError> {
        if self.pos >= self.input.len() {
            self.current = None;
            return Ok(false);
        }
        match self.scan() {
            Ok(token) => {
                self.current = Some(token);
                Ok(true)
            }
            Err(err) => {
                self.pos = self.input.len();
                self.current = None;
                Err(err)
            }
        }
    }

    /// The most recently recognized token.
    ///
    /// # Panics
    ///
    /// Calling this before a successful [`Lexer::advance`], or after
    /// `advance` returned `Ok(false)` or an error, is a contract violation
    /// and panics.
    #[must_use]
    pub fn read(&self) -> &Token<'src> {
        self.current
            .as_ref()
            .expect("read() called without a current token")
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    /// Dispatch on the first one or two characters; no backtracking past
    /// this decision.
    fn scan(&mut self) -> Result<Token<'src>, LexError> {
        let start = self.pos;
        match self.input.as_bytes()[start] {
            b'\n' => Ok(self.lex_single(TokenKind::Newline)),
            b' ' | b'\t' | b'\r' => Ok(self.lex_space()),
            b'(' => {
                self.paren_depth += 1;
                Ok(self.lex_single(TokenKind::LParen))
            }
            b')' => {
                self.paren_depth = self.paren_depth.saturating_sub(1);
                Ok(self.lex_single(TokenKind::RParen))
            }
            b'#' => self.lex_comment(),
            b'"' => self.lex_quoted(),
            b'[' => match self.bracket_open_strength(start) {
                Some(strength) => self.lex_bracket(start, strength, false),
                None => self.lex_unquoted(),
            },
            _ => self.lex_unquoted(),
        }
    }

    fn lex_single(&mut self, kind: TokenKind) -> Token<'src> {
        let start = self.pos;
        self.pos += 1;
        let raw = &self.input[start..self.pos];
        Token {
            kind,
            value: raw,
            raw,
            offset: start,
        }
    }

    fn lex_space(&mut self) -> Token<'src> {
        let start = self.pos;
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r')) {
            self.pos += 1;
        }
        let raw = &self.input[start..self.pos];
        Token {
            kind: TokenKind::Space,
            value: raw,
            raw,
            offset: start,
        }
    }

    /// `[` + n `=` + `[` starting at `at` opens a bracket of strength n.
    fn bracket_open_strength(&self, at: usize) -> Option<usize> {
        let bytes = self.input.as_bytes();
        if bytes.get(at) != Some(&b'[') {
            return None;
        }
        let mut strength = 0;
        while bytes.get(at + 1 + strength) == Some(&b'=') {
            strength += 1;
        }
        (bytes.get(at + 1 + strength) == Some(&b'[')).then_some(strength)
    }

    /// `]` + exactly n `=` + `]` starting at `at` closes strength n.
    fn is_bracket_close(&self, at: usize, strength: usize) -> bool {
        let bytes = self.input.as_bytes();
        (0..strength).all(|i| bytes.get(at + 1 + i) == Some(&b'='))
            && bytes.get(at + 1 + strength) == Some(&b']')
    }

    /// Scan a bracket argument or comment. `self.pos` sits on the opening
    /// `[`; `start` is the token start (one earlier for comments, whose
    /// raw text includes the `#`).
    fn lex_bracket(
        &mut self,
        start: usize,
        strength: usize,
        comment: bool,
    ) -> Result<Token<'src>, LexError> {
        self.pos += strength + 2;
        let content_start = self.pos;
        let bytes = self.input.as_bytes();
        while self.pos < self.input.len() {
            if bytes[self.pos] == b']' && self.is_bracket_close(self.pos, strength) {
                let value = &self.input[content_start..self.pos];
                self.pos += strength + 2;
                let raw = &self.input[start..self.pos];
                let kind = if comment {
                    TokenKind::BracketComment { strength }
                } else {
                    TokenKind::BracketArgument { strength }
                };
                return Ok(Token {
                    kind,
                    value,
                    raw,
                    offset: start,
                });
            }
            self.pos += 1;
        }
        Err(LexError {
            kind: LexErrorKind::UnterminatedBracket { strength },
            offset: start,
        })
    }

    fn lex_comment(&mut self) -> Result<Token<'src>, LexError> {
        let start = self.pos;
        if let Some(strength) = self.bracket_open_strength(start + 1) {
            self.pos += 1;
            return self.lex_bracket(start, strength, true);
        }
        self.pos += 1;
        while self.pos < self.input.len() && self.input.as_bytes()[self.pos] != b'\n' {
            self.pos += 1;
        }
        let raw = &self.input[start..self.pos];
        Ok(Token {
            kind: TokenKind::LineComment,
            value: &raw[1..],
            raw,
            offset: start,
        })
    }

    fn lex_quoted(&mut self) -> Result<Token<'src>, LexError> {
        let start = self.pos;
        self.pos += 1;
        let mut depth = 0usize;
        let mut reference_start = start;
        loop {
            match self.peek() {
                None => {
                    return Err(if depth > 0 {
                        LexError {
                            kind: LexErrorKind::UnterminatedVariableReference,
                            offset: reference_start,
                        }
                    } else {
                        LexError {
                            kind: LexErrorKind::UnterminatedQuote,
                            offset: start,
                        }
                    });
                }
                Some(b'\\') => self.skip_escape_pair(),
                Some(b'$') if self.peek_at(1) == Some(b'{') => {
                    if depth == 0 {
                        reference_start = self.pos;
                    }
                    depth += 1;
                    self.pos += 2;
                }
                Some(b'}') if depth > 0 => {
                    depth -= 1;
                    self.pos += 1;
                }
                // The closing quote only counts at nesting depth 0.
                Some(b'"') if depth == 0 => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        let raw = &self.input[start..self.pos];
        Ok(Token {
            kind: TokenKind::QuotedArgument,
            value: &raw[1..raw.len() - 1],
            raw,
            offset: start,
        })
    }

    fn lex_unquoted(&mut self) -> Result<Token<'src>, LexError> {
        let start = self.pos;
        let mut depth = 0usize;
        let mut reference_start = start;
        loop {
            let Some(byte) = self.peek() else {
                if depth > 0 {
                    return Err(LexError {
                        kind: LexErrorKind::UnterminatedVariableReference,
                        offset: reference_start,
                    });
                }
                break;
            };
            match byte {
                b'\\' => self.skip_escape_pair(),
                b'$' if self.peek_at(1) == Some(b'{') => {
                    if depth == 0 {
                        reference_start = self.pos;
                    }
                    depth += 1;
                    self.pos += 2;
                }
                b'}' if depth > 0 => {
                    depth -= 1;
                    self.pos += 1;
                }
                // Inside an open `${...}` nothing terminates the token.
                _ if depth > 0 => self.pos += 1,
                b'$' if self.peek_at(1) == Some(b'(') => {
                    if !self.try_skip_make_reference() {
                        self.pos += 1;
                    }
                }
                b' ' | b'\t' | b'\r' | b'\n' | b'(' | b')' | b'#' => break,
                b'"' => self.skip_legacy_quote()?,
                _ => self.pos += 1,
            }
        }
        let raw = &self.input[start..self.pos];
        let kind = if self.paren_depth == 0 && is_identifier(raw) {
            TokenKind::Identifier
        } else {
            TokenKind::UnquotedArgument
        };
        Ok(Token {
            kind,
            value: raw,
            raw,
            offset: start,
        })
    }

    /// Legacy `$(name)`: consumed whole when the parenthesized name is
    /// present, otherwise the `$` stays ordinary content and the `(`
    /// terminates the token as usual.
    fn try_skip_make_reference(&mut self) -> bool {
        let bytes = self.input.as_bytes();
        let mut i = self.pos + 2;
        while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
            i += 1;
        }
        if bytes.get(i) == Some(&b')') {
            self.pos = i + 1;
            true
        } else {
            false
        }
    }

    /// Legacy embedded quote mid-token: `arg"with a"quote` is one token.
    /// The quoted section is consumed verbatim through its closing `"`.
    fn skip_legacy_quote(&mut self) -> Result<(), LexError> {
        let quote_start = self.pos;
        self.pos += 1;
        loop {
            match self.peek() {
                None => {
                    return Err(LexError {
                        kind: LexErrorKind::UnterminatedQuote,
                        offset: quote_start,
                    });
                }
                Some(b'\\') => self.skip_escape_pair(),
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Backslash plus the following character, consumed as two literal
    /// characters. Covers `\\`, `\"`, and the quoted line continuation,
    /// and keeps `\${` from opening a reference.
    fn skip_escape_pair(&mut self) {
        self.pos += 1;
        if self.pos < self.input.len() {
            self.pos += 1;
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Token<'src>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(true) => self.current.map(Ok),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

fn is_identifier(text: &str) -> bool {
    let bytes = text.as_bytes();
    let Some((&first, rest)) = bytes.split_first() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == b'_')
        && rest.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'_')
}

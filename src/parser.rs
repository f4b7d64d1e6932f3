use std::collections::VecDeque;
use std::fmt;

use crate::Error;
use crate::ast::{
    Argument, BracketArgument, BracketComment, Comment, CommandInvocation, File, FileElement,
    Identifier, LineComment, QuotedArgument, SpaceOrComment, UnquotedArgument,
};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Classifies a parser error. `found` is the offending token's kind name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A new file element must start with a command identifier.
    ExpectedCommand { found: &'static str },
    /// Expected `(` after the command identifier, found something else
    /// or end of input.
    ExpectedLParen { found: Option<&'static str> },
    /// Argument list never closed before end of input.
    ExpectedRParen,
    /// Token inside an argument list that is neither an argument nor `)`.
    UnexpectedArgument { found: &'static str },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpectedCommand { found } => {
                write!(f, "expected a command identifier, got {found}")
            }
            Self::ExpectedLParen { found: None } => {
                write!(f, "expected '(', got end of input")
            }
            Self::ExpectedLParen { found: Some(found) } => {
                write!(f, "expected '(', got {found}")
            }
            Self::ExpectedRParen => {
                write!(f, "expected ')', got end of input")
            }
            Self::UnexpectedArgument { found } => {
                write!(f, "expected an argument or ')', got {found}")
            }
        }
    }
}

/// Error produced during parsing.
///
/// `offset` is the byte offset of the offending token, or the input
/// length when the input ended early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

/// Parse a listfile source string into a [`File`].
///
/// Tokens are pulled from the lexer on demand; the stream is never
/// materialized. The first lexical or structural error aborts the parse.
///
/// # Errors
///
/// Returns [`Error`] on an unterminated lexical construct or a structural
/// violation such as a missing parenthesis.
pub fn parse(input: &str) -> Result<File<'_>, Error> {
    Parser::new(input).parse()
}

struct Parser<'src> {
    source: &'src str,
    lexer: Lexer<'src>,
    lookahead: VecDeque<Token<'src>>,
}

impl<'src> Parser<'src> {
    const fn new(source: &'src str) -> Self {
        Self {
            source,
            lexer: Lexer::new(source),
            lookahead: VecDeque::new(),
        }
    }

    fn parse(mut self) -> Result<File<'src>, Error> {
        let mut elements = Vec::new();
        loop {
            if let Some(group) = self.collect_space_or_comment()? {
                elements.push(FileElement::SpaceOrComment(group));
            }
            let Some(token) = self.bump()? else {
                break;
            };
            if token.kind == TokenKind::Identifier {
                elements.push(FileElement::Command(self.parse_command(&token)?));
            } else {
                return Err(ParseError {
                    kind: ParseErrorKind::ExpectedCommand {
                        found: token.kind.name(),
                    },
                    offset: token.offset,
                }
                .into());
            }
        }
        Ok(File { elements })
    }

    /// Accumulate whitespace and comments until the next identifier or
    /// end of input. Returns `None` when the region is empty.
    fn collect_space_or_comment(&mut self) -> Result<Option<SpaceOrComment<'src>>, Error> {
        let mut comments = Vec::new();
        let mut start = None;
        let mut end = 0;
        while let Some(token) = self.peek()? {
            match token.kind {
                TokenKind::Space | TokenKind::Newline => {}
                TokenKind::BracketComment { strength } => {
                    comments.push(Comment::Bracket(BracketComment {
                        value: token.value,
                        strength,
                        raw: token.raw,
                        offset: token.offset,
                    }));
                }
                TokenKind::LineComment => {
                    comments.push(Comment::Line(LineComment {
                        value: token.value,
                        raw: token.raw,
                        offset: token.offset,
                    }));
                }
                _ => break,
            }
            start.get_or_insert(token.offset);
            end = token.offset + token.raw.len();
            self.bump()?;
        }
        Ok(start.map(|offset| SpaceOrComment {
            comments,
            raw: &self.source[offset..end],
            offset,
        }))
    }

    fn parse_command(&mut self, identifier: &Token<'src>) -> Result<CommandInvocation<'src>, Error> {
        let start = identifier.offset;

        self.skip_blank()?;
        match self.bump()? {
            Some(token) if token.kind == TokenKind::LParen => {}
            Some(token) => {
                return Err(ParseError {
                    kind: ParseErrorKind::ExpectedLParen {
                        found: Some(token.kind.name()),
                    },
                    offset: token.offset,
                }
                .into());
            }
            None => {
                return Err(ParseError {
                    kind: ParseErrorKind::ExpectedLParen { found: None },
                    offset: self.source.len(),
                }
                .into());
            }
        }

        let mut arguments = Vec::new();
        let end = loop {
            self.skip_blank()?;
            let Some(token) = self.bump()? else {
                return Err(ParseError {
                    kind: ParseErrorKind::ExpectedRParen,
                    offset: self.source.len(),
                }
                .into());
            };
            match token.kind {
                TokenKind::RParen => break token.offset + token.raw.len(),
                TokenKind::BracketArgument { strength } => {
                    arguments.push(Argument::Bracket(BracketArgument {
                        value: token.value,
                        strength,
                        raw: token.raw,
                        offset: token.offset,
                    }));
                }
                TokenKind::QuotedArgument => {
                    arguments.push(Argument::Quoted(QuotedArgument {
                        value: token.value,
                        raw: token.raw,
                        offset: token.offset,
                    }));
                }
                TokenKind::UnquotedArgument => {
                    arguments.push(Argument::Unquoted(UnquotedArgument {
                        value: token.value,
                        raw: token.raw,
                        offset: token.offset,
                    }));
                }
                kind => {
                    return Err(ParseError {
                        kind: ParseErrorKind::UnexpectedArgument { found: kind.name() },
                        offset: token.offset,
                    }
                    .into());
                }
            }
        };

        let trailing_comment = self.take_trailing_comment()?;
        let end = trailing_comment
            .as_ref()
            .map_or(end, |comment| comment.offset + comment.raw.len());

        Ok(CommandInvocation {
            command_id: Identifier {
                value: identifier.value,
                offset: identifier.offset,
            },
            arguments,
            trailing_comment,
            raw: &self.source[start..end],
            offset: start,
        })
    }

    /// A line comment still on the invocation's logical line attaches to
    /// it; at most one space run may sit between `)` and the `#`.
    fn take_trailing_comment(&mut self) -> Result<Option<LineComment<'src>>, Error> {
        let comment = match self.peek()? {
            Some(token) if token.kind == TokenKind::LineComment => {
                self.bump()?;
                token
            }
            Some(token) if token.kind == TokenKind::Space => match self.peek_second()? {
                Some(next) if next.kind == TokenKind::LineComment => {
                    self.bump()?;
                    self.bump()?;
                    next
                }
                _ => return Ok(None),
            },
            _ => return Ok(None),
        };
        Ok(Some(LineComment {
            value: comment.value,
            raw: comment.raw,
            offset: comment.offset,
        }))
    }

    fn skip_blank(&mut self) -> Result<(), Error> {
        while let Some(token) = self.peek()? {
            match token.kind {
                TokenKind::Space | TokenKind::Newline => {
                    self.bump()?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn fill(&mut self, want: usize) -> Result<(), Error> {
        while self.lookahead.len() < want {
            match self.lexer.next().transpose()? {
                Some(token) => self.lookahead.push_back(token),
                None => break,
            }
        }
        Ok(())
    }

    fn peek(&mut self) -> Result<Option<Token<'src>>, Error> {
        self.fill(1)?;
        Ok(self.lookahead.front().copied())
    }

    fn peek_second(&mut self) -> Result<Option<Token<'src>>, Error> {
        self.fill(2)?;
        Ok(self.lookahead.get(1).copied())
    }

    fn bump(&mut self) -> Result<Option<Token<'src>>, Error> {
        self.fill(1)?;
        Ok(self.lookahead.pop_front())
    }
}

//! Listfile lexer and structural parser.
//!
//! A zero-copy token stream and AST for CMake-style build-description
//! files ("listfiles"): command invocations, arguments, and comments,
//! with exact source spans, bracket strengths, and comment placement
//! preserved so evaluators and formatters can be built on top without
//! losing a byte of the original text.
//!
//! This crate is purely syntactic: `${...}` references and command
//! semantics are recognized as boundaries, never interpreted.
//!
//! # Quick start
//!
//! ```
//! use listfile_rs::{FileElement, parse};
//!
//! let input = "add_executable(app main.c) # entry point\n";
//! let file = parse(input).unwrap();
//!
//! let FileElement::Command(command) = &file.elements[0] else {
//!     unreachable!()
//! };
//! assert_eq!(command.command_id.value, "add_executable");
//! assert_eq!(command.arguments[1].value(), "main.c");
//! assert!(command.trailing_comment.is_some());
//!
//! // The AST tiles the source exactly.
//! assert_eq!(file.reconstruct(), input);
//! ```
//!
//! # Token-level access
//!
//! ```
//! use listfile_rs::{TokenKind, tokenize};
//!
//! let tokens = tokenize("#[=[a\nb]=]").unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::BracketComment { strength: 1 });
//! assert_eq!(tokens[0].value, "a\nb");
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{
    Argument, BracketArgument, BracketComment, Comment, CommandInvocation, File, FileElement,
    Identifier, LineComment, QuotedArgument, SpaceOrComment, UnquotedArgument,
};
pub use lexer::{LexError, LexErrorKind, Lexer, tokenize};
pub use parser::{ParseError, ParseErrorKind, parse};
pub use token::{Token, TokenKind};

/// Unified error type covering both lexing and parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A lexer error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// A parser error.
    #[error("{0}")]
    Parse(#[from] ParseError),
}

impl Error {
    /// Byte offset of the failure in the source buffer.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::Lex(err) => err.offset,
            Self::Parse(err) => err.offset,
        }
    }
}

//! Syntactic AST for one listfile.
//!
//! Every node borrows from the source buffer handed to the parser; no
//! text is copied. Each node carries `raw` (the exact source slice it
//! covers) and `offset` (its byte offset), and sibling raws tile the
//! input in order, so the original text can be reconstructed exactly.

use std::fmt;

/// Complete parsed listfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File<'src> {
    pub elements: Vec<FileElement<'src>>,
}

impl File<'_> {
    /// Concatenate the element raw slices back into the original source.
    #[must_use]
    pub fn reconstruct(&self) -> String {
        self.elements.iter().map(FileElement::raw).collect()
    }
}

/// One top-level element: a command invocation, or the whitespace and
/// comments between invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileElement<'src> {
    Command(CommandInvocation<'src>),
    SpaceOrComment(SpaceOrComment<'src>),
}

impl<'src> FileElement<'src> {
    #[must_use]
    pub const fn raw(&self) -> &'src str {
        match self {
            Self::Command(command) => command.raw,
            Self::SpaceOrComment(group) => group.raw,
        }
    }

    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::Command(command) => command.offset,
            Self::SpaceOrComment(group) => group.offset,
        }
    }
}

/// A command invocation: `identifier ( arguments )`, with an optional
/// line comment trailing the closing parenthesis on the same line.
///
/// `raw` spans from the identifier through the closing parenthesis (or
/// the trailing comment, when present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation<'src> {
    pub command_id: Identifier<'src>,
    pub arguments: Vec<Argument<'src>>,
    pub trailing_comment: Option<LineComment<'src>>,
    pub raw: &'src str,
    pub offset: usize,
}

/// Command name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identifier<'src> {
    pub value: &'src str,
    pub offset: usize,
}

/// One argument of a command invocation, preserving its source form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument<'src> {
    Bracket(BracketArgument<'src>),
    Quoted(QuotedArgument<'src>),
    Unquoted(UnquotedArgument<'src>),
}

impl<'src> Argument<'src> {
    /// The logical text, regardless of source form. Escapes and variable
    /// references are preserved literally; no decoding is performed.
    #[must_use]
    pub const fn value(&self) -> &'src str {
        match self {
            Self::Bracket(arg) => arg.value,
            Self::Quoted(arg) => arg.value,
            Self::Unquoted(arg) => arg.value,
        }
    }

    /// The exact source slice, including any delimiters.
    #[must_use]
    pub const fn raw(&self) -> &'src str {
        match self {
            Self::Bracket(arg) => arg.raw,
            Self::Quoted(arg) => arg.raw,
            Self::Unquoted(arg) => arg.raw,
        }
    }

    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::Bracket(arg) => arg.offset,
            Self::Quoted(arg) => arg.offset,
            Self::Unquoted(arg) => arg.offset,
        }
    }
}

/// Bracket argument (`[=[...]=]`); `value` excludes the delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketArgument<'src> {
    pub value: &'src str,
    pub strength: usize,
    pub raw: &'src str,
    pub offset: usize,
}

/// Quoted argument (`"..."`); `value` excludes the quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotedArgument<'src> {
    pub value: &'src str,
    pub raw: &'src str,
    pub offset: usize,
}

/// Unquoted argument; `value` and `raw` coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnquotedArgument<'src> {
    pub value: &'src str,
    pub raw: &'src str,
    pub offset: usize,
}

/// Whitespace and comments between command invocations, collapsed into
/// one element. `comments` holds the comment tokens in source order;
/// `raw` also covers the surrounding whitespace, so a whitespace-only
/// region is a group with no comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceOrComment<'src> {
    pub comments: Vec<Comment<'src>>,
    pub raw: &'src str,
    pub offset: usize,
}

/// A comment in either source form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comment<'src> {
    Bracket(BracketComment<'src>),
    Line(LineComment<'src>),
}

impl<'src> Comment<'src> {
    #[must_use]
    pub const fn value(&self) -> &'src str {
        match self {
            Self::Bracket(comment) => comment.value,
            Self::Line(comment) => comment.value,
        }
    }

    #[must_use]
    pub const fn raw(&self) -> &'src str {
        match self {
            Self::Bracket(comment) => comment.raw,
            Self::Line(comment) => comment.raw,
        }
    }
}

/// Bracket comment (`#[=[...]=]`); `value` excludes `#` and delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketComment<'src> {
    pub value: &'src str,
    pub strength: usize,
    pub raw: &'src str,
    pub offset: usize,
}

/// Line comment; `value` excludes the leading `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineComment<'src> {
    pub value: &'src str,
    pub raw: &'src str,
    pub offset: usize,
}

impl fmt::Display for Identifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<identifier: \"{}\">", self.value)
    }
}

impl fmt::Display for Argument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Bracket(_) => "bracket_argument",
            Self::Quoted(_) => "quoted_argument",
            Self::Unquoted(_) => "unquoted_argument",
        };
        write!(f, "<{kind}: \"{}\">", self.value())
    }
}

impl fmt::Display for Comment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Bracket(_) => "bracket_comment",
            Self::Line(_) => "line_comment",
        };
        write!(f, "<{kind}: \"{}\">", self.value())
    }
}

use std::fmt;

/// Token kinds produced by the lexer.
///
/// Bracket forms carry their *strength*: the number of `=` characters
/// between the bracket delimiters (`[==[` has strength 2). The open and
/// close delimiters of one token always have equal strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Run of spaces, tabs, and carriage returns.
    Space,
    /// A single `\n`.
    Newline,
    /// Command name (`[A-Za-z_][A-Za-z0-9_]*`, outside parentheses).
    Identifier,
    /// Opening parenthesis `(`.
    LParen,
    /// Closing parenthesis `)`.
    RParen,
    /// Bracket argument (`[=[...]=]`).
    BracketArgument { strength: usize },
    /// Double-quoted argument (`"..."`).
    QuotedArgument,
    /// Unquoted argument, including legacy forms.
    UnquotedArgument,
    /// Bracket comment (`#[=[...]=]`).
    BracketComment { strength: usize },
    /// Line comment (`# ...`, up to the next newline).
    LineComment,
}

impl TokenKind {
    /// Name of the kind, without any payload.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Space => "space",
            Self::Newline => "newline",
            Self::Identifier => "identifier",
            Self::LParen => "lparen",
            Self::RParen => "rparen",
            Self::BracketArgument { .. } => "bracket_argument",
            Self::QuotedArgument => "quoted_argument",
            Self::UnquotedArgument => "unquoted_argument",
            Self::BracketComment { .. } => "bracket_comment",
            Self::LineComment => "line_comment",
        }
    }

    /// Whether a token of this kind may appear inside an argument list.
    #[must_use]
    pub const fn is_argument(self) -> bool {
        matches!(
            self,
            Self::BracketArgument { .. } | Self::QuotedArgument | Self::UnquotedArgument
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token borrowing from the source buffer.
///
/// `value` is the logically meaningful text (a bracket argument's value
/// excludes its delimiters, a quoted argument's its quotes, a line
/// comment's its `#`); `raw` is the exact source slice including
/// delimiters, so concatenating `raw` over a token stream reconstructs
/// the input. `offset` is the byte offset of `raw` in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub value: &'src str,
    pub raw: &'src str,
    pub offset: usize,
}

impl Token<'_> {
    /// Bracket strength for bracket forms, `None` otherwise.
    #[must_use]
    pub const fn strength(&self) -> Option<usize> {
        match self.kind {
            TokenKind::BracketArgument { strength } | TokenKind::BracketComment { strength } => {
                Some(strength)
            }
            _ => None,
        }
    }
}

/// Diagnostic rendering: `<kind: "value">`. Not a wire format.
impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: \"{}\">", self.kind, self.value)
    }
}

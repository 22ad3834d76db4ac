//! Token types for the statement lexer.

/// Byte range of a token in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Keywords the clause rewrites look for.
///
/// Anything else that looks like a word is an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Select,
    From,
    Order,
    By,
    Offset,
    Top,
}

impl Keyword {
    /// Attempts to parse a keyword from a word (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SELECT" => Some(Self::Select),
            "FROM" => Some(Self::From),
            "ORDER" => Some(Self::Order),
            "BY" => Some(Self::By),
            "OFFSET" => Some(Self::Offset),
            "TOP" => Some(Self::Top),
            _ => None,
        }
    }

    /// Returns the keyword as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Order => "ORDER",
            Self::By => "BY",
            Self::Offset => "OFFSET",
            Self::Top => "TOP",
        }
    }
}

/// Token kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A clause keyword.
    Keyword(Keyword),
    /// A bare word that is not a clause keyword.
    Identifier(String),
    /// A `"quoted"`, `` `quoted` `` or `[bracketed]` identifier, unescaped.
    QuotedIdentifier(String),
    /// A string literal (`'...'` or `N'...'`), unescaped.
    String(String),
    /// A numeric literal, kept as written.
    Number(String),
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `.`
    Dot,
    /// `?` or `@name` parameter marker, kept as written.
    Parameter(String),
    /// Any other operator character(s).
    Operator(String),
    /// Lexing error (unterminated literal or identifier).
    Error(String),
    /// End of input.
    Eof,
}

/// A token with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// Where the token appears in the source.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this token is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.kind, TokenKind::Keyword(k) if k == keyword)
    }

    /// Returns true if this is the end-of-input token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns true if this is an error token.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, TokenKind::Error(_))
    }
}

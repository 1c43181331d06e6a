//! The closed set of WDL token kinds and the [`Token`] type.

use wdl_core::SourceLocation;
use wdl_core::Span;

/// The closed set of token kinds the lexer can produce.
///
/// This enum is exhaustive by design: the grammar this crate implements
/// does not grow new lexical categories without a corresponding change to
/// the parser, so there is no "unknown token" escape hatch beyond
/// [`TokenKind::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A soft statement terminator: a newline or a `;`.
    Endl,
    /// End of input.
    Eof,

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LCurly,
    /// `}`
    RCurly,
    /// `[`
    LSquare,
    /// `]`
    RSquare,

    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `?`
    Question,
    /// `|`
    Pipe,
    /// `&`
    Ampersand,
    /// `~`
    Ellipses,

    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    FSlash,
    /// `\`
    BSlash,
    /// `%`
    Modulo,
    /// `=`
    Assign,
    /// `==`
    Equality,
    /// `!=`
    Neq,
    /// `!`
    Not,
    /// `<`
    LessThan,
    /// `<=`
    LessOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterOrEqual,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `and` / `∧`
    LogicalAnd,
    /// `or` / `∨`
    LogicalOr,
    /// `not`
    LogicalNot,
    /// `xor` / `¬`
    Xor,
    /// `<<`
    LShift,
    /// `>>`
    RShift,
    /// `<<<`
    LShiftAssign,
    /// `>>>`
    RShiftAssign,

    /// A string literal, quoted by `"` or `'`.
    StringLiteral,
    /// An integer or floating-point literal.
    NumberLiteral,
    /// `true` or `false`.
    BooleanLiteral,

    /// An identifier that is not a reserved word.
    Ident,
    /// A primitive or container type keyword (`Int`, `String`, `Array`, …).
    Type,
    /// `if`
    If,
    /// `else`
    Else,
    /// `then`
    Then,
    /// `do`
    Do,
    /// `while`
    While,
    /// `return`
    Return,
    /// `input`
    Input,
    /// `output`
    Output,
    /// `runtime`
    Runtime,
    /// `parameter_meta` or `meta`
    Meta,
    /// The captured body of a `command <<< … >>>` block.
    Command,
    /// `call`
    Call,
    /// `import`
    Import,
    /// `as`
    As,
    /// `scatter`
    Scatter,
    /// `in`
    In,
    /// `default` (used in `default=expr` function arguments)
    Default,

    /// A `#` or `//` comment. Never returned by [`Lexer::lex`][crate::Lexer::lex]
    /// (comments are skipped silently); retained in the kind set for
    /// completeness and for tools that want to re-lex trivia.
    Comment,
    /// A lexical error (unterminated string, unterminated command block,
    /// malformed number, or an unrecognized byte).
    Error,
}

/// The literal payload carried by a [`TokenKind::NumberLiteral`] token.
///
/// A numeric token carries exactly one of these, never both and never
/// neither: a lexeme containing `.` carries [`Float`][Literal::Float],
/// otherwise it carries [`Integer`][Literal::Integer].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    /// An integer value.
    Integer(i64),
    /// A double-precision floating point value.
    Float(f64),
}

/// A single lexical token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token's kind.
    pub kind: TokenKind,
    /// The exact source substring matched.
    pub lexeme: String,
    /// The location of the lexeme's first character.
    pub location: SourceLocation,
    /// The byte span of the lexeme in the normalized source.
    pub span: Span,
    /// The literal payload, present only for [`TokenKind::NumberLiteral`].
    pub literal: Option<Literal>,
}

impl Token {
    /// Creates a new token with no literal payload.
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            location,
            span,
            literal: None,
        }
    }

    /// Attaches a literal payload to this token.
    pub fn with_literal(mut self, literal: Literal) -> Self {
        self.literal = Some(literal);
        self
    }

    /// Whether this token is [`TokenKind::Eof`].
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

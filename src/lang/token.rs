//! Token definitions for the playground language.

/// Source position of a token (1-based line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Span { line, column }
    }
}

/// Token kinds.
///
/// The four `RecordOpen`/`TupleOpen`/`BarRecordClose`/`BarTupleClose`
/// variants cover both surface dialects: the lexer only emits the ones
/// that belong to the dialect it was configured with. Hash-dialect
/// literals close with the ordinary `}` / `]` tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals and names
    Number(f64),
    String(String),
    Ident(String),

    // Keywords
    Const,
    Let,
    Var,
    If,
    Else,
    While,
    For,
    Return,
    Break,
    Continue,
    Throw,
    Import,
    From,
    True,
    False,
    Null,
    Typeof,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Question,
    Arrow,

    // Operators
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StrictEq,
    StrictNe,
    LooseEq,
    LooseNe,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AndAnd,
    OrOr,
    Bang,

    // Dialect delimiters
    /// `#{` (hash) or `{|` (bar)
    RecordOpen,
    /// `#[` (hash) or `[|` (bar)
    TupleOpen,
    /// `|}` (bar only)
    BarRecordClose,
    /// `|]` (bar only)
    BarTupleClose,

    Eof,
}

impl TokenKind {
    /// Keyword lookup for identifier-shaped lexemes.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        let kind = match ident {
            "const" => TokenKind::Const,
            "let" => TokenKind::Let,
            "var" => TokenKind::Var,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "return" => TokenKind::Return,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "throw" => TokenKind::Throw,
            "import" => TokenKind::Import,
            "from" => TokenKind::From,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "typeof" => TokenKind::Typeof,
            _ => return None,
        };
        Some(kind)
    }
}

/// A token with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

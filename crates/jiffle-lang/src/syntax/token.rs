#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(f64),
    Ident(String),

    // Operators
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    Caret,      // ^
    Eq,         // =
    EqEq,       // ==
    BangEq,     // !=
    Bang,       // !
    Lt,         // <
    LtEq,       // <=
    Gt,         // >
    GtEq,       // >=
    AndAnd,     // &&
    OrOr,       // ||
    Question,   // ?

    // Punctuation
    Colon,      // :
    Comma,      // ,
    Semicolon,  // ;
    LParen,     // (
    RParen,     // )

    Eof,
}

impl TokenKind {
    /// Source spelling, used in parser diagnostics.
    pub fn describe(&self) -> String {
        let s = match self {
            Self::Number(n)  => return format!("number `{n}`"),
            Self::Ident(s)   => return format!("identifier `{s}`"),
            Self::Plus       => "+",
            Self::Minus      => "-",
            Self::Star       => "*",
            Self::Slash      => "/",
            Self::Percent    => "%",
            Self::Caret      => "^",
            Self::Eq         => "=",
            Self::EqEq       => "==",
            Self::BangEq     => "!=",
            Self::Bang       => "!",
            Self::Lt         => "<",
            Self::LtEq       => "<=",
            Self::Gt         => ">",
            Self::GtEq       => ">=",
            Self::AndAnd     => "&&",
            Self::OrOr       => "||",
            Self::Question   => "?",
            Self::Colon      => ":",
            Self::Comma      => ",",
            Self::Semicolon  => ";",
            Self::LParen     => "(",
            Self::RParen     => ")",
            Self::Eof        => return "end of input".to_string(),
        };
        format!("`{s}`")
    }
}

// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }
}

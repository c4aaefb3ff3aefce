/// Source location attached to every node for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

// ─── Top level ───────────────────────────────────────────────────────────────

/// The whole script body: assignments executed in textual order.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub stmts: Vec<Assign>,
}

/// `name = expr;`
#[derive(Debug, Clone)]
pub struct Assign {
    pub target: String,
    pub value: Expr,
    pub span: Span,
}

// ─── Expressions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Expr {
    Number(f64, Span),
    Ident(String, Span),

    /// `a + b`, `a < b`, `a && b`, etc.
    BinOp {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
        span: Span,
    },

    /// `-x`, `+x`, `!x`
    UnOp {
        op: UnOp,
        operand: Box<Expr>,
        span: Span,
    },

    /// `cond ? then : else`
    Ternary {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
        span: Span,
    },

    /// `name(args)`
    Call {
        callee: String,
        args: Vec<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Number(_, s)          => *s,
            Expr::Ident(_, s)           => *s,
            Expr::BinOp { span, .. }    => *span,
            Expr::UnOp { span, .. }     => *span,
            Expr::Ternary { span, .. }  => *span,
            Expr::Call { span, .. }     => *span,
        }
    }
}

// ─── Operators ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add, Sub, Mul, Div, Mod, Pow,
    Eq, NotEq,
    Lt, LtEq, Gt, GtEq,
    And, Or,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add  => "+",  BinOp::Sub   => "-",
            BinOp::Mul  => "*",  BinOp::Div   => "/",
            BinOp::Mod  => "%",  BinOp::Pow   => "^",
            BinOp::Eq   => "==", BinOp::NotEq => "!=",
            BinOp::Lt   => "<",  BinOp::LtEq  => "<=",
            BinOp::Gt   => ">",  BinOp::GtEq  => ">=",
            BinOp::And  => "&&", BinOp::Or    => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Plus,
    Not,
}

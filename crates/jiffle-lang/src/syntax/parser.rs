use crate::syntax::ast::*;
use crate::error::{Error, ErrorCode};
use crate::syntax::token::{Token, TokenKind};

/// Tallest expression tree the parser builds. Analysis and evaluation walk
/// trees recursively, so anything deeper is rejected with P003.
const MAX_DEPTH: usize = 256;

/// An expression together with the height of its tree.
struct Parsed {
    expr: Expr,
    height: usize,
}

impl Parsed {
    fn leaf(expr: Expr) -> Self {
        Self { expr, height: 1 }
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Nested `parse_expr` / `parse_unary` calls in the current statement.
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0, depth: 0 }
    }

    pub fn parse(mut self) -> Result<Program, Vec<Error>> {
        let mut errors = Vec::new();
        let mut stmts = Vec::new();

        while !self.is_at_end() {
            let pos_before = self.pos;

            match self.parse_stmt() {
                Ok(s) => stmts.push(s),
                Err(e) => { errors.push(e); self.recover(); }
            }

            // a statement that consumed nothing would loop forever
            if self.pos == pos_before {
                self.advance();
            }
        }

        if errors.is_empty() {
            Ok(Program { stmts })
        } else {
            Err(errors)
        }
    }

    // ─── Statements ──────────────────────────────────────────────────────────

    fn parse_stmt(&mut self) -> Result<Assign, Error> {
        self.depth = 0;
        let span = self.span();
        let target = match self.peek_kind() {
            TokenKind::Ident(_) => self.expect_ident()?,
            _ => return Err(self.unexpected("assignment")),
        };
        self.expect(TokenKind::Eq)?;
        let value = self.parse_expr()?.expr;
        self.expect(TokenKind::Semicolon)?;
        Ok(Assign { target, value, span })
    }

    // ─── Expressions (precedence climbing) ───────────────────────────────────

    fn parse_expr(&mut self) -> Result<Parsed, Error> {
        self.descend()?;
        let expr = self.parse_ternary();
        self.depth -= 1;
        expr
    }

    fn parse_ternary(&mut self) -> Result<Parsed, Error> {
        let cond = self.parse_or()?;
        if self.matches(TokenKind::Question) {
            let span = cond.expr.span();
            let then_expr = self.parse_expr()?;
            self.expect(TokenKind::Colon)?;
            let else_expr = self.parse_expr()?;
            let height = 1 + cond.height.max(then_expr.height).max(else_expr.height);
            return self.node(Expr::Ternary {
                condition: Box::new(cond.expr),
                then_expr: Box::new(then_expr.expr),
                else_expr: Box::new(else_expr.expr),
                span,
            }, height);
        }
        Ok(cond)
    }

    fn parse_or(&mut self) -> Result<Parsed, Error> {
        let mut left = self.parse_and()?;
        while self.matches(TokenKind::OrOr) {
            let right = self.parse_and()?;
            left = self.binary(left, BinOp::Or, right)?;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Parsed, Error> {
        let mut left = self.parse_equality()?;
        while self.matches(TokenKind::AndAnd) {
            let right = self.parse_equality()?;
            left = self.binary(left, BinOp::And, right)?;
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Parsed, Error> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq   => BinOp::Eq,
                TokenKind::BangEq => BinOp::NotEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            left = self.binary(left, op, right)?;
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Parsed, Error> {
        let mut left = self.parse_addition()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Lt   => BinOp::Lt,
                TokenKind::LtEq => BinOp::LtEq,
                TokenKind::Gt   => BinOp::Gt,
                TokenKind::GtEq => BinOp::GtEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_addition()?;
            left = self.binary(left, op, right)?;
        }
        Ok(left)
    }

    fn parse_addition(&mut self) -> Result<Parsed, Error> {
        let mut left = self.parse_multiplication()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus  => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplication()?;
            left = self.binary(left, op, right)?;
        }
        Ok(left)
    }

    fn parse_multiplication(&mut self) -> Result<Parsed, Error> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star    => BinOp::Mul,
                TokenKind::Slash   => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = self.binary(left, op, right)?;
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Parsed, Error> {
        self.descend()?;
        let expr = self.parse_unary_inner();
        self.depth -= 1;
        expr
    }

    fn parse_unary_inner(&mut self) -> Result<Parsed, Error> {
        let span = self.span();
        let op = match self.peek_kind() {
            TokenKind::Minus => UnOp::Neg,
            TokenKind::Plus  => UnOp::Plus,
            TokenKind::Bang  => UnOp::Not,
            _ => return self.parse_power(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        let height = operand.height + 1;
        self.node(Expr::UnOp { op, operand: Box::new(operand.expr), span }, height)
    }

    /// `^` binds tighter than unary minus on its left and is right-associative:
    /// `-2^2` is `-(2^2)`, `2^3^2` is `2^(3^2)`.
    fn parse_power(&mut self) -> Result<Parsed, Error> {
        let base = self.parse_primary()?;
        if self.matches(TokenKind::Caret) {
            let exponent = self.parse_unary()?;
            return self.binary(base, BinOp::Pow, exponent);
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Parsed, Error> {
        let tok = self.peek().clone();
        let span = Span::new(tok.line, tok.column);

        match tok.kind {
            TokenKind::Number(v) => { self.advance(); Ok(Parsed::leaf(Expr::Number(v, span))) }

            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }

            TokenKind::Ident(_) => self.parse_call_or_ident(),

            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_call_or_ident(&mut self) -> Result<Parsed, Error> {
        let tok = self.advance();
        let span = Span::new(tok.line, tok.column);
        let name = match tok.kind {
            TokenKind::Ident(s) => s,
            _ => return Err(self.error_at(&tok, "expected identifier")),
        };

        if self.matches(TokenKind::LParen) {
            let args = self.parse_arg_list()?;
            self.expect(TokenKind::RParen)?;
            let height = 1 + args.iter().map(|a| a.height).max().unwrap_or(0);
            let args = args.into_iter().map(|a| a.expr).collect();
            self.node(Expr::Call { callee: name, args, span }, height)
        } else {
            Ok(Parsed::leaf(Expr::Ident(name, span)))
        }
    }

    /// Comma-separated arguments up to (not including) `)`. A comma must be
    /// followed by another argument.
    fn parse_arg_list(&mut self) -> Result<Vec<Parsed>, Error> {
        let mut args = Vec::new();
        if self.check(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if !self.matches(TokenKind::Comma) { break; }
        }
        Ok(args)
    }

    // ─── Nesting limit ───────────────────────────────────────────────────────

    fn binary(&self, left: Parsed, op: BinOp, right: Parsed) -> Result<Parsed, Error> {
        let span = left.expr.span();
        let height = 1 + left.height.max(right.height);
        self.node(Expr::BinOp { left: Box::new(left.expr), op, right: Box::new(right.expr), span }, height)
    }

    fn node(&self, expr: Expr, height: usize) -> Result<Parsed, Error> {
        if height > MAX_DEPTH {
            let span = expr.span();
            return Err(too_deep(span.line, span.column));
        }
        Ok(Parsed { expr, height })
    }

    fn descend(&mut self) -> Result<(), Error> {
        if self.depth >= MAX_DEPTH {
            let tok = self.peek();
            return Err(too_deep(tok.line, tok.column));
        }
        self.depth += 1;
        Ok(())
    }

    // ─── Token primitives ────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind.clone()
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() { self.pos += 1; }
        tok
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) { self.advance(); true } else { false }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Error> {
        if self.check(kind.clone()) {
            Ok(self.advance())
        } else {
            let tok = self.peek();
            Err(Error::new(
                ErrorCode::P002,
                tok.line,
                tok.column,
                format!("expected {}, found {}", kind.describe(), tok.kind.describe()),
            ))
        }
    }

    fn expect_ident(&mut self) -> Result<String, Error> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Ident(s) => Ok(s),
            _ => Err(self.error_at(&tok, "expected identifier")),
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    fn span(&self) -> Span {
        let tok = self.peek();
        Span::new(tok.line, tok.column)
    }

    fn unexpected(&self, expected: &str) -> Error {
        let tok = self.peek();
        Error::new(
            ErrorCode::P001,
            tok.line,
            tok.column,
            format!("expected {}, found {}", expected, tok.kind.describe()),
        )
    }

    fn error_at(&self, tok: &Token, msg: &str) -> Error {
        Error::new(ErrorCode::P001, tok.line, tok.column, msg)
    }

    /// Skip to just past the next `;` so the following statement parses cleanly.
    fn recover(&mut self) {
        loop {
            match self.peek_kind() {
                TokenKind::Eof => break,
                TokenKind::Semicolon => { self.advance(); break; }
                _ => { self.advance(); }
            }
        }
    }
}

fn too_deep(line: usize, column: usize) -> Error {
    Error::new(ErrorCode::P003, line, column, "expression nested too deeply")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

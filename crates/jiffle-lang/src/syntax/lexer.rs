use crate::error::{Error, ErrorCode};
use crate::syntax::token::{Token, TokenKind};

pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source: source.as_bytes(), pos: 0, line: 1, column: 1 }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<Error>> {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                tokens.push(Token::new(TokenKind::Eof, self.line, self.column));
                break;
            }

            match self.next_token() {
                Ok(Some(tok)) => tokens.push(tok),
                Ok(None) => {}
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() { Ok(tokens) } else { Err(errors) }
    }

    fn next_token(&mut self) -> Result<Option<Token>, Error> {
        let line = self.line;
        let col = self.column;
        let ch = self.advance();

        let kind = match ch {
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'%' => TokenKind::Percent,
            b'^' => TokenKind::Caret,
            b'?' => TokenKind::Question,
            b':' => TokenKind::Colon,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,

            b'/' => {
                if self.peek() == b'/' { self.skip_line(); return Ok(None); }
                else if self.peek() == b'*' { self.skip_block_comment(); return Ok(None); }
                else { TokenKind::Slash }
            }
            b'=' => {
                if self.peek() == b'=' { self.advance(); TokenKind::EqEq }
                else { TokenKind::Eq }
            }
            b'!' => {
                if self.peek() == b'=' { self.advance(); TokenKind::BangEq }
                else { TokenKind::Bang }
            }
            b'<' => {
                if self.peek() == b'=' { self.advance(); TokenKind::LtEq }
                else { TokenKind::Lt }
            }
            b'>' => {
                if self.peek() == b'=' { self.advance(); TokenKind::GtEq }
                else { TokenKind::Gt }
            }
            b'&' => {
                if self.peek() == b'&' { self.advance(); TokenKind::AndAnd }
                else {
                    return Err(Error::new(ErrorCode::L001, line, col,
                        "expected `&&`, bare `&` is not valid"));
                }
            }
            b'|' => {
                if self.peek() == b'|' { self.advance(); TokenKind::OrOr }
                else {
                    return Err(Error::new(ErrorCode::L001, line, col,
                        "expected `||`, bare `|` is not valid"));
                }
            }

            b'0'..=b'9' => TokenKind::Number(self.read_number(ch, line, col)?),
            b'.' if self.peek().is_ascii_digit() => TokenKind::Number(self.read_number(ch, line, col)?),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => TokenKind::Ident(self.read_ident(ch)),

            _ => {
                let start = self.pos - 1;
                while is_continuation(self.peek()) { self.advance(); }
                let text = String::from_utf8_lossy(&self.source[start..self.pos]);
                return Err(Error::new(ErrorCode::L001, line, col,
                    format!("unexpected character `{text}`")));
            }
        };

        Ok(Some(Token::new(kind, line, col)))
    }

    // ─── Primitives ──────────────────────────────────────────────────────────

    fn advance(&mut self) -> u8 {
        let ch = self.source[self.pos];
        self.pos += 1;
        if ch == b'\n' { self.line += 1; self.column = 1; }
        else if !is_continuation(ch) { self.column += 1; }
        ch
    }

    fn peek(&self) -> u8 {
        if self.is_at_end() { 0 } else { self.source[self.pos] }
    }

    fn peek_next(&self) -> u8 {
        if self.pos + 1 >= self.source.len() { 0 } else { self.source[self.pos + 1] }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                b' ' | b'\t' | b'\r' | b'\n' => { self.advance(); }
                _ => break,
            }
        }
    }

    fn skip_line(&mut self) {
        while !self.is_at_end() && self.peek() != b'\n' { self.advance(); }
    }

    fn skip_block_comment(&mut self) {
        self.advance(); // consume *
        while !self.is_at_end() {
            if self.peek() == b'*' && self.peek_next() == b'/' {
                self.advance(); // *
                self.advance(); // /
                break;
            }
            self.advance();
        }
    }

    // ─── Readers ─────────────────────────────────────────────────────────────

    fn read_number(&mut self, first: u8, line: usize, col: usize) -> Result<f64, Error> {
        let mut s = String::new();
        s.push(first as char);
        let mut seen_dot = first == b'.';
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            s.push(self.advance() as char);
        }
        if !seen_dot && self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            seen_dot = true;
            s.push(self.advance() as char);
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                s.push(self.advance() as char);
            }
        }
        // `2.` is accepted as `2.0`
        if !seen_dot && self.peek() == b'.' && !self.peek_next().is_ascii_alphabetic() {
            self.advance();
        }
        if matches!(self.peek(), b'e' | b'E') {
            s.push(self.advance() as char);
            if matches!(self.peek(), b'+' | b'-') {
                s.push(self.advance() as char);
            }
            if !self.peek().is_ascii_digit() {
                return Err(Error::new(ErrorCode::L002, line, col,
                    format!("malformed exponent in number `{s}`")));
            }
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                s.push(self.advance() as char);
            }
        }
        s.parse().map_err(|_| Error::new(ErrorCode::L002, line, col,
            format!("malformed number `{s}`")))
    }

    fn read_ident(&mut self, first: u8) -> String {
        let mut s = String::new();
        s.push(first as char);
        while !self.is_at_end() && (self.peek().is_ascii_alphanumeric() || self.peek() == b'_') {
            s.push(self.advance() as char);
        }
        s
    }
}

/// Trailing byte of a multi-byte UTF-8 character. Columns count characters.
fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

// ─── Tests ───────────────────────────────────────────────────────────────────

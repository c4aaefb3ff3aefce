pub mod token;
pub mod lexer;
pub mod ast;
pub mod parser;

use crate::error::Error;

/// Lex and parse `source` into a program, collecting every syntax error.
pub fn parse(source: &str) -> Result<ast::Program, Vec<Error>> {
    let tokens = lexer::Lexer::new(source).tokenize()?;
    parser::Parser::new(tokens).parse()
}

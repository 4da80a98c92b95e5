pub mod ast;
mod lexer;
mod parser;

pub use lexer::TokenKind;
pub use parser::{ParseError, ParseErrorKind};

/// Parses a YADN string into its rolls.
pub fn parse(s: &str) -> Result<ast::Ast, ParseError> {
    parser::Parser::new(s).parse()
}

#[macro_use]
pub mod errors;
pub mod ast;
pub mod kinds;
pub mod lexer;
pub mod parser;
pub mod printer;

use self::ast::Document;
use self::errors::ParseError;
use self::lexer::Source;
use self::parser::{ParseOptions, Parser};

/// Parses `body` with locations but without copying the source into them.
pub fn parse(body: &str) -> Result<Document, ParseError> {
    Parser::parse(Source::new(body), ParseOptions::no_source())
}

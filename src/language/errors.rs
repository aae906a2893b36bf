use thiserror::Error;

use crate::language::lexer::Source;

macro_rules! parse_error {
    ($source:expr, $position:expr, $($arg:tt)*) => (
        Err($crate::language::errors::ParseError::new($source, $position, &format!($($arg)*)))
    )
}

/// A syntax error with the line and column (both 1-based) it was found at.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{description} ({line}:{column})")]
pub struct ParseError {
    pub description: String,
    pub position: usize,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub fn new(source: &Source, position: usize, msg: &str) -> ParseError {
        let (line, column) = line_and_column(source.body(), position);
        ParseError {
            description: msg.to_string(),
            position: position,
            line: line,
            column: column,
        }
    }
}

/// One-based line and column of a byte position. Columns count characters.
pub fn line_and_column(body: &str, position: usize) -> (usize, usize) {
    let mut line = 1;
    let mut line_start = 0;
    for (i, byte) in body.bytes().enumerate().take(position) {
        if byte == b'\n' {
            line += 1;
            line_start = i + 1;
        }
    }
    let column = body
        .get(line_start..position.min(body.len()))
        .map_or(position - line_start, |prefix| prefix.chars().count());
    (line, column + 1)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_locates_errors() {
        let source = Source::new("{\n  field(\n}");
        let error = ParseError::new(&source, 11, "Syntax Error: Expected Name, found \"}\".");
        assert_eq!(error.line, 3);
        assert_eq!(error.column, 1);
        assert_eq!(error.to_string(), "Syntax Error: Expected Name, found \"}\". (3:1)");
    }
}

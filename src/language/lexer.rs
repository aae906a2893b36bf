use std::sync::Arc;

use crate::language::errors::ParseError;

#[derive(PartialEq, Debug, Clone)]
pub struct Source {
    body: Arc<str>,
    name: Option<String>,
}

impl Source {
    pub fn new(body: &str) -> Source {
        Source::from(String::from(body))
    }

    pub fn named(body: &str, name: &str) -> Source {
        Source {
            body: Arc::from(body),
            name: Some(name.to_string()),
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl From<String> for Source {
    fn from(body: String) -> Source {
        Source {
            body: Arc::from(body),
            name: None,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum TokenKind {
    EOF,
    Bang,
    Dollar,
    Amp,
    ParenL,
    ParenR,
    Spread,
    Colon,
    Equals,
    At,
    BracketL,
    BracketR,
    BraceL,
    BraceR,
    Pipe,
    Name,
    Int,
    Float,
    String,
    BlockString,
}

impl TokenKind {
    pub fn describe(&self) -> &'static str {
        match *self {
            TokenKind::EOF => "<EOF>",
            TokenKind::Bang => "\"!\"",
            TokenKind::Dollar => "\"$\"",
            TokenKind::Amp => "\"&\"",
            TokenKind::ParenL => "\"(\"",
            TokenKind::ParenR => "\")\"",
            TokenKind::Spread => "\"...\"",
            TokenKind::Colon => "\":\"",
            TokenKind::Equals => "\"=\"",
            TokenKind::At => "\"@\"",
            TokenKind::BracketL => "\"[\"",
            TokenKind::BracketR => "\"]\"",
            TokenKind::BraceL => "\"{\"",
            TokenKind::BraceR => "\"}\"",
            TokenKind::Pipe => "\"|\"",
            TokenKind::Name => "Name",
            TokenKind::Int => "Int",
            TokenKind::Float => "Float",
            TokenKind::String => "String",
            TokenKind::BlockString => "BlockString",
        }
    }
}

/// Keywords that open a definition.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum NameKind {
    Query,
    Mutation,
    Subscription,
    Fragment,
    Schema,
    Scalar,
    Type,
    Interface,
    Union,
    Enum,
    Input,
    Directive,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub value: Option<String>,
}

impl Token {
    fn make(kind: TokenKind, start: usize, end: usize) -> Token {
        Token {
            kind: kind,
            start: start,
            end: end,
            value: None,
        }
    }

    fn make_char(kind: TokenKind, start: usize) -> Token {
        Token::make(kind, start, start + 1)
    }

    pub fn name_kind_from_value(&self) -> Option<NameKind> {
        if self.kind != TokenKind::Name {
            return None;
        }
        match self.value.as_deref() {
            Some("query") => Some(NameKind::Query),
            Some("mutation") => Some(NameKind::Mutation),
            Some("subscription") => Some(NameKind::Subscription),
            Some("fragment") => Some(NameKind::Fragment),
            Some("schema") => Some(NameKind::Schema),
            Some("scalar") => Some(NameKind::Scalar),
            Some("type") => Some(NameKind::Type),
            Some("interface") => Some(NameKind::Interface),
            Some("union") => Some(NameKind::Union),
            Some("enum") => Some(NameKind::Enum),
            Some("input") => Some(NameKind::Input),
            Some("directive") => Some(NameKind::Directive),
            _ => None,
        }
    }

    /// Human readable form used in syntax errors.
    pub fn describe(&self) -> String {
        match self.value {
            Some(ref v) if self.kind == TokenKind::Name => format!("Name \"{}\"", v),
            Some(ref v) => format!("{} \"{}\"", self.kind.describe(), v),
            None => self.kind.describe().to_string(),
        }
    }
}

pub struct Lexer {
    prev_position: usize,
    source: Source,
}

impl Lexer {
    pub fn lex(source: Source) -> Lexer {
        Lexer {
            prev_position: 0,
            source: source,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn next(&mut self) -> Result<Token, ParseError> {
        let token = Lexer::read_token(&self.source, self.prev_position)?;
        self.prev_position = token.end;
        Ok(token)
    }

    pub(crate) fn read_token(source: &Source, from_position: usize) -> Result<Token, ParseError> {
        let body = source.body().as_bytes();
        let position = Lexer::position_after_whitespace(body, from_position);

        let code = match body.get(position) {
            Some(code) => *code,
            None => return Ok(Token::make(TokenKind::EOF, position, position)),
        };

        match code {
            b'!' => Ok(Token::make_char(TokenKind::Bang, position)),
            b'$' => Ok(Token::make_char(TokenKind::Dollar, position)),
            b'&' => Ok(Token::make_char(TokenKind::Amp, position)),
            b'(' => Ok(Token::make_char(TokenKind::ParenL, position)),
            b')' => Ok(Token::make_char(TokenKind::ParenR, position)),
            b'.' => {
                if body.get(position + 1) == Some(&b'.') && body.get(position + 2) == Some(&b'.') {
                    Ok(Token::make(TokenKind::Spread, position, position + 3))
                } else {
                    Err(ParseError::new(source, position, "Syntax Error: Unexpected character \".\"."))
                }
            }
            b':' => Ok(Token::make_char(TokenKind::Colon, position)),
            b'=' => Ok(Token::make_char(TokenKind::Equals, position)),
            b'@' => Ok(Token::make_char(TokenKind::At, position)),
            b'[' => Ok(Token::make_char(TokenKind::BracketL, position)),
            b']' => Ok(Token::make_char(TokenKind::BracketR, position)),
            b'{' => Ok(Token::make_char(TokenKind::BraceL, position)),
            b'|' => Ok(Token::make_char(TokenKind::Pipe, position)),
            b'}' => Ok(Token::make_char(TokenKind::BraceR, position)),
            b'A'..=b'Z' | b'_' | b'a'..=b'z' => Ok(Lexer::read_name(source, position)),
            b'-' | b'0'..=b'9' => Lexer::read_number(source, position),
            b'"' => {
                if body.get(position + 1) == Some(&b'"') && body.get(position + 2) == Some(&b'"') {
                    Lexer::read_block_string(source, position)
                } else {
                    Lexer::read_string(source, position)
                }
            }
            _ => {
                let ch = source.body()[position..].chars().next().unwrap_or('\u{fffd}');
                Err(ParseError::new(
                    source,
                    position,
                    &format!("Syntax Error: Unexpected character {:?}.", ch),
                ))
            }
        }
    }

    fn read_string(source: &Source, start: usize) -> Result<Token, ParseError> {
        let body = source.body();
        let bytes = body.as_bytes();
        let mut position = start + 1;
        let mut chunk_start = position;
        let mut value = String::new();

        loop {
            let code = match bytes.get(position) {
                Some(code) => *code,
                None => return Err(ParseError::new(source, position, "Syntax Error: Unterminated string.")),
            };
            match code {
                b'"' => {
                    value.push_str(&body[chunk_start..position]);
                    return Ok(Token {
                        kind: TokenKind::String,
                        start: start,
                        end: position + 1,
                        value: Some(value),
                    });
                }
                b'\n' | b'\r' => {
                    return Err(ParseError::new(source, position, "Syntax Error: Unterminated string."));
                }
                b'\\' => {
                    value.push_str(&body[chunk_start..position]);
                    let escaped = bytes.get(position + 1).copied().unwrap_or(0);
                    let width = match escaped {
                        b'"' => { value.push('"'); 2 }
                        b'/' => { value.push('/'); 2 }
                        b'\\' => { value.push('\\'); 2 }
                        b'b' => { value.push('\u{8}'); 2 }
                        b'f' => { value.push('\u{c}'); 2 }
                        b'n' => { value.push('\n'); 2 }
                        b'r' => { value.push('\r'); 2 }
                        b't' => { value.push('\t'); 2 }
                        b'u' => {
                            let ch = body
                                .get(position + 2..position + 6)
                                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                                .and_then(char::from_u32);
                            match ch {
                                Some(ch) => value.push(ch),
                                None => {
                                    return Err(ParseError::new(
                                        source,
                                        position,
                                        "Syntax Error: Invalid Unicode escape sequence.",
                                    ))
                                }
                            }
                            6
                        }
                        _ => {
                            return Err(ParseError::new(
                                source,
                                position,
                                "Syntax Error: Invalid character escape sequence.",
                            ))
                        }
                    };
                    position += width;
                    chunk_start = position;
                }
                _ => position += 1,
            }
        }
    }

    fn read_block_string(source: &Source, start: usize) -> Result<Token, ParseError> {
        let body = source.body();
        let bytes = body.as_bytes();
        let mut position = start + 3;
        let mut raw = String::new();
        let mut chunk_start = position;

        while position < bytes.len() {
            if bytes[position..].starts_with(b"\"\"\"") {
                raw.push_str(&body[chunk_start..position]);
                return Ok(Token {
                    kind: TokenKind::BlockString,
                    start: start,
                    end: position + 3,
                    value: Some(block_string_value(&raw)),
                });
            }
            if bytes[position..].starts_with(b"\\\"\"\"") {
                raw.push_str(&body[chunk_start..position]);
                raw.push_str("\"\"\"");
                position += 4;
                chunk_start = position;
                continue;
            }
            position += 1;
        }

        Err(ParseError::new(source, position, "Syntax Error: Unterminated string."))
    }

    fn read_name(source: &Source, position: usize) -> Token {
        let body = source.body();
        let bytes = body.as_bytes();
        let mut end = position + 1;
        while end < bytes.len() {
            match bytes[end] {
                b'_' | b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' => end += 1,
                _ => break,
            }
        }

        Token {
            kind: TokenKind::Name,
            start: position,
            end: end,
            value: Some(body[position..end].to_string()),
        }
    }

    fn read_number(source: &Source, start: usize) -> Result<Token, ParseError> {
        let body = source.body();
        let bytes = body.as_bytes();
        let code_at = |position: usize| bytes.get(position).copied().unwrap_or(0);
        let mut position = start;
        let mut is_float = false;

        if code_at(position) == b'-' {
            position += 1;
        }

        if code_at(position) == b'0' {
            position += 1;
            if code_at(position).is_ascii_digit() {
                return Err(ParseError::new(
                    source,
                    position,
                    "Syntax Error: Invalid number, unexpected digit after 0.",
                ));
            }
        } else {
            position = Lexer::read_digits(source, position)?;
        }

        if code_at(position) == b'.' {
            is_float = true;
            position = Lexer::read_digits(source, position + 1)?;
        }

        if code_at(position) == b'e' || code_at(position) == b'E' {
            is_float = true;
            position += 1;
            if code_at(position) == b'+' || code_at(position) == b'-' {
                position += 1;
            }
            position = Lexer::read_digits(source, position)?;
        }

        let kind = match is_float {
            true => TokenKind::Float,
            false => TokenKind::Int,
        };

        Ok(Token {
            kind: kind,
            start: start,
            end: position,
            value: Some(body[start..position].to_string()),
        })
    }

    fn read_digits(source: &Source, start: usize) -> Result<usize, ParseError> {
        let bytes = source.body().as_bytes();
        let mut position = start;
        while bytes.get(position).map_or(false, |c| c.is_ascii_digit()) {
            position += 1;
        }
        if position == start {
            return Err(ParseError::new(
                source,
                start,
                "Syntax Error: Invalid number, expected digit.",
            ));
        }
        Ok(position)
    }

    fn position_after_whitespace(body: &[u8], start_position: usize) -> usize {
        let mut position = start_position;

        while position < body.len() {
            let code = body[position];
            if Lexer::is_whitespace(code) {
                position += 1;
            } else if code == b'#' {
                // comments run to the end of the line
                while position < body.len() && body[position] != b'\n' && body[position] != b'\r' {
                    position += 1;
                }
            } else if body[position..].starts_with(&[0xef, 0xbb, 0xbf]) {
                position += 3;
            } else {
                break;
            }
        }
        position
    }

    fn is_whitespace(code: u8) -> bool {
        code == b' ' || code == b',' || code == b'\t' || code == b'\n' || code == b'\r'
    }
}

/// Dedents a raw block string the way GraphQL block strings are defined.
/// Only spaces and tabs count as indentation, so every cut lands on an
/// ASCII byte.
fn block_string_value(raw: &str) -> String {
    let lines: Vec<&str> = raw.split('\n').map(|line| line.trim_end_matches('\r')).collect();

    let common_indent = lines
        .iter()
        .skip(1)
        .filter(|line| !is_blank(line))
        .map(|line| leading_whitespace(line))
        .min()
        .unwrap_or(0);

    let mut result: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| match i {
            0 => *line,
            _ => &line[leading_whitespace(line).min(common_indent)..],
        })
        .collect();

    while result.first().map_or(false, |line| is_blank(line)) {
        result.remove(0);
    }
    while result.last().map_or(false, |line| is_blank(line)) {
        result.pop();
    }

    result.join("\n")
}

fn leading_whitespace(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ' || *b == b'\t').count()
}

fn is_blank(line: &str) -> bool {
    leading_whitespace(line) == line.len()
}

#[cfg(test)]
mod test {
    use super::*;

    fn lex_one(body: &str) -> Token {
        Lexer::lex(Source::new(body)).next().unwrap()
    }

    fn lex_err(body: &str) -> String {
        Lexer::lex(Source::new(body)).next().unwrap_err().description
    }

    #[test]
    fn it_skips_whitespace() {
        assert_eq!(lex_one("

        foo

        "),
        Token {
            kind: TokenKind::Name,
            start: 10,
            end: 13,
            value: Some("foo".to_string())
        });

        assert_eq!(lex_one("
        #comment
        foo#comment
        "),
        Token {
            kind: TokenKind::Name,
            start: 26,
            end: 29,
            value: Some("foo".to_string())
        });

        assert_eq!(lex_one(",,,foo,,,,"),
        Token {
            kind: TokenKind::Name,
            start: 3,
            end: 6,
            value: Some("foo".to_string())
        });
    }

    #[test]
    fn it_lexes_numbers() {
        fn number(body: &str, kind: TokenKind) {
            assert_eq!(lex_one(body), Token {
                kind: kind,
                start: 0,
                end: body.len(),
                value: Some(body.to_string())
            });
        }

        number("4", TokenKind::Int);
        number("-4", TokenKind::Int);
        number("0", TokenKind::Int);
        number("4.123", TokenKind::Float);
        number("-4.123", TokenKind::Float);
        number("0.123", TokenKind::Float);
        number("123e4", TokenKind::Float);
        number("123E4", TokenKind::Float);
        number("123e-4", TokenKind::Float);
        number("123e+4", TokenKind::Float);
        number("-1.123e4567", TokenKind::Float);
    }

    #[test]
    fn it_rejects_bad_numbers() {
        assert_eq!(lex_err("00"), "Syntax Error: Invalid number, unexpected digit after 0.");
        assert_eq!(lex_err("1."), "Syntax Error: Invalid number, expected digit.");
        assert_eq!(lex_err("-"), "Syntax Error: Invalid number, expected digit.");
    }

    #[test]
    fn it_lexes_punctuation() {
        fn test_punct(punc: &str, kind: TokenKind) {
            assert_eq!(lex_one(punc), Token {
                kind: kind,
                start: 0,
                end: punc.len(),
                value: None
            });
        }

        test_punct("!", TokenKind::Bang);
        test_punct("$", TokenKind::Dollar);
        test_punct("&", TokenKind::Amp);
        test_punct("(", TokenKind::ParenL);
        test_punct(")", TokenKind::ParenR);
        test_punct("...", TokenKind::Spread);
        test_punct(":", TokenKind::Colon);
        test_punct("=", TokenKind::Equals);
        test_punct("@", TokenKind::At);
        test_punct("[", TokenKind::BracketL);
        test_punct("]", TokenKind::BracketR);
        test_punct("{", TokenKind::BraceL);
        test_punct("}", TokenKind::BraceR);
        test_punct("|", TokenKind::Pipe);
    }

    #[test]
    fn it_lexes_strings() {
        assert_eq!(lex_one("\"simple\""), Token {
            kind: TokenKind::String,
            start: 0,
            end: 8,
            value: Some("simple".to_string())
        });

        assert_eq!(lex_one(r#"" white space ""#), Token {
            kind: TokenKind::String,
            start: 0,
            end: 15,
            value: Some(" white space ".to_string())
        });

        assert_eq!(lex_one(r#""quote \"""#), Token {
            kind: TokenKind::String,
            start: 0,
            end: 10,
            value: Some(r#"quote ""#.to_string())
        });

        assert_eq!(lex_one(r#""unicode é""#).value, Some("unicode é".to_string()));
        assert_eq!(lex_err("\"no end"), "Syntax Error: Unterminated string.");
        assert_eq!(lex_err(r#""bad \x""#), "Syntax Error: Invalid character escape sequence.");
    }

    #[test]
    fn it_lexes_block_strings() {
        let token = lex_one("\"\"\"\n    Describes a user.\n      Indented.\n    \"\"\"");
        assert_eq!(token.kind, TokenKind::BlockString);
        assert_eq!(token.value, Some("Describes a user.\n  Indented.".to_string()));

        let token = lex_one("\"\"\"\n    a\n  \n    b\n\"\"\"");
        assert_eq!(token.value, Some("a\n\nb".to_string()));
    }

    #[test]
    fn block_string_indentation_is_spaces_and_tabs_only() {
        // U+3000 is whitespace to Unicode but content to GraphQL
        let token = lex_one("\"\"\"\n  x\n\u{3000}\n\"\"\"");
        assert_eq!(token.value, Some("  x\n\u{3000}".to_string()));

        let token = lex_one("\"\"\"\n\t\u{3000}y\n\t\tz\n\"\"\"");
        assert_eq!(token.value, Some("\u{3000}y\n\tz".to_string()));

        let document = crate::language::parse("{ a(b: \"\"\"\n  x\n\u{3000}\n\"\"\") }");
        assert!(document.is_ok());
    }

    #[test]
    fn it_finishes() {
        let mut lexer = Lexer::lex(Source::new("{{"));
        lexer.next().unwrap();
        lexer.next().unwrap();
        assert_eq!(lexer.next().unwrap().kind, TokenKind::EOF);
    }

    #[test]
    fn it_reports_unexpected_characters() {
        assert_eq!(lex_err("?"), "Syntax Error: Unexpected character '?'.");
        assert_eq!(lex_err(".."), "Syntax Error: Unexpected character \".\".");
    }
}

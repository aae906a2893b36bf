use crate::language::ast::*;
use crate::language::errors::ParseError;
use crate::language::kinds::OperationType;
use crate::language::lexer::{Lexer, NameKind, Source, Token, TokenKind};

const DIRECTIVE_LOCATIONS: &[&str] = &[
    "QUERY",
    "MUTATION",
    "SUBSCRIPTION",
    "FIELD",
    "FRAGMENT_DEFINITION",
    "FRAGMENT_SPREAD",
    "INLINE_FRAGMENT",
    "VARIABLE_DEFINITION",
    "SCHEMA",
    "SCALAR",
    "OBJECT",
    "FIELD_DEFINITION",
    "ARGUMENT_DEFINITION",
    "INTERFACE",
    "UNION",
    "ENUM",
    "ENUM_VALUE",
    "INPUT_OBJECT",
    "INPUT_FIELD_DEFINITION",
];

/// Deepest nesting of selection sets, list and object values, and list
/// types that a document may use.
pub const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub no_source: bool,
    pub no_location: bool,
}

impl ParseOptions {
    pub fn new() -> ParseOptions {
        ParseOptions::default()
    }

    /// Keep locations but leave the source out of them.
    pub fn no_source() -> ParseOptions {
        ParseOptions { no_source: true, no_location: false }
    }

    pub fn no_location() -> ParseOptions {
        ParseOptions { no_source: true, no_location: true }
    }
}

pub struct Parser {
    lexer: Lexer,
    source: Source,
    options: ParseOptions,
    prev_end: usize,
    token: Token,
    depth: usize,
}

impl Parser {
    pub fn parse(source: Source, options: ParseOptions) -> Result<Document, ParseError> {
        let mut lexer = Lexer::lex(source.clone());
        let token = lexer.next()?;
        let mut parser = Parser {
            lexer: lexer,
            source: source,
            options: options,
            prev_end: 0,
            token: token,
            depth: 0,
        };
        parser.parse_document()
    }

    fn parse_document(&mut self) -> Result<Document, ParseError> {
        let start = self.token.start;
        let mut definitions = vec![];

        // rust doesn't have do/while so we make our own
        loop {
            definitions.push(self.parse_definition()?);
            if self.skip(TokenKind::EOF)? {
                break;
            }
        }

        Ok(Document {
            loc: self.loc(start),
            definitions: definitions,
        })
    }

    fn parse_definition(&mut self) -> Result<Definition, ParseError> {
        match self.token.kind {
            TokenKind::BraceL => Ok(Definition::Operation(self.parse_operation_definition()?)),
            TokenKind::String | TokenKind::BlockString => self.parse_type_system_definition(),
            TokenKind::Name => match self.token.name_kind_from_value() {
                Some(NameKind::Query) | Some(NameKind::Mutation) | Some(NameKind::Subscription) => {
                    Ok(Definition::Operation(self.parse_operation_definition()?))
                }
                Some(NameKind::Fragment) => Ok(Definition::Fragment(self.parse_fragment_definition()?)),
                Some(_) => self.parse_type_system_definition(),
                None => self.unexpected(),
            },
            _ => self.unexpected(),
        }
    }

    // Operations

    fn parse_operation_definition(&mut self) -> Result<OperationDefinition, ParseError> {
        let start = self.token.start;
        if self.peek(TokenKind::BraceL) {
            let selection_set = self.parse_selection_set()?;
            return Ok(OperationDefinition {
                loc: self.loc(start),
                operation: OperationType::Query,
                name: None,
                variable_definitions: vec![],
                directives: vec![],
                selection_set: selection_set,
            });
        }

        let operation = self.parse_operation_type()?;
        let name = match self.peek(TokenKind::Name) {
            true => Some(self.parse_name()?),
            false => None,
        };
        let variable_definitions = self.parse_variable_definitions()?;
        let directives = self.parse_directives(false)?;
        let selection_set = self.parse_selection_set()?;

        Ok(OperationDefinition {
            loc: self.loc(start),
            operation: operation,
            name: name,
            variable_definitions: variable_definitions,
            directives: directives,
            selection_set: selection_set,
        })
    }

    fn parse_operation_type(&mut self) -> Result<OperationType, ParseError> {
        let token = self.expect(TokenKind::Name)?;
        match token.value.as_deref() {
            Some("query") => Ok(OperationType::Query),
            Some("mutation") => Ok(OperationType::Mutation),
            Some("subscription") => Ok(OperationType::Subscription),
            _ => parse_error!(&self.source, token.start, "Syntax Error: Unexpected {}.", token.describe()),
        }
    }

    fn parse_variable_definitions(&mut self) -> Result<Vec<VariableDefinition>, ParseError> {
        match self.peek(TokenKind::ParenL) {
            true => self.many(TokenKind::ParenL, Parser::parse_variable_definition, TokenKind::ParenR),
            false => Ok(vec![]),
        }
    }

    fn parse_variable_definition(&mut self) -> Result<VariableDefinition, ParseError> {
        let start = self.token.start;
        self.expect(TokenKind::Dollar)?;
        let variable = self.parse_name()?;
        self.expect(TokenKind::Colon)?;
        let var_type = self.parse_type_reference()?;
        let default_value = match self.skip(TokenKind::Equals)? {
            true => Some(self.parse_value_literal(true)?),
            false => None,
        };
        let directives = self.parse_directives(true)?;

        Ok(VariableDefinition {
            loc: self.loc(start),
            variable: variable,
            var_type: var_type,
            default_value: default_value,
            directives: directives,
        })
    }

    fn parse_selection_set(&mut self) -> Result<SelectionSet, ParseError> {
        let start = self.token.start;
        self.descend()?;
        let selections = self.many(TokenKind::BraceL, Parser::parse_selection, TokenKind::BraceR)?;
        self.depth -= 1;
        Ok(SelectionSet {
            loc: self.loc(start),
            selections: selections,
        })
    }

    fn parse_selection(&mut self) -> Result<Selection, ParseError> {
        match self.peek(TokenKind::Spread) {
            true => self.parse_fragment(),
            false => Ok(Selection::Field(self.parse_field()?)),
        }
    }

    fn parse_field(&mut self) -> Result<Field, ParseError> {
        let start = self.token.start;
        let name_or_alias = self.parse_name()?;
        let (alias, name) = match self.skip(TokenKind::Colon)? {
            true => (Some(name_or_alias), self.parse_name()?),
            false => (None, name_or_alias),
        };
        let arguments = self.parse_arguments(false)?;
        let directives = self.parse_directives(false)?;
        let selection_set = match self.peek(TokenKind::BraceL) {
            true => Some(self.parse_selection_set()?),
            false => None,
        };

        Ok(Field {
            loc: self.loc(start),
            alias: alias,
            name: name,
            arguments: arguments,
            directives: directives,
            selection_set: selection_set,
        })
    }

    fn parse_arguments(&mut self, is_const: bool) -> Result<Vec<Argument>, ParseError> {
        if !self.peek(TokenKind::ParenL) {
            return Ok(vec![]);
        }
        let parse: fn(&mut Parser) -> Result<Argument, ParseError> = match is_const {
            true => Parser::parse_const_argument,
            false => Parser::parse_argument,
        };
        self.many(TokenKind::ParenL, parse, TokenKind::ParenR)
    }

    fn parse_argument(&mut self) -> Result<Argument, ParseError> {
        self.parse_argument_value(false)
    }

    fn parse_const_argument(&mut self) -> Result<Argument, ParseError> {
        self.parse_argument_value(true)
    }

    fn parse_argument_value(&mut self, is_const: bool) -> Result<Argument, ParseError> {
        let start = self.token.start;
        let name = self.parse_name()?;
        self.expect(TokenKind::Colon)?;
        let value = self.parse_value_literal(is_const)?;
        Ok(Argument {
            loc: self.loc(start),
            name: name,
            value: value,
        })
    }

    // Fragments

    fn parse_fragment(&mut self) -> Result<Selection, ParseError> {
        let start = self.token.start;
        self.expect(TokenKind::Spread)?;

        let has_type_condition = self.peek_keyword("on");
        if !has_type_condition && self.peek(TokenKind::Name) {
            let name = self.parse_fragment_name()?;
            let directives = self.parse_directives(false)?;
            return Ok(Selection::FragmentSpread(FragmentSpread {
                loc: self.loc(start),
                name: name,
                directives: directives,
            }));
        }

        let type_condition = match has_type_condition {
            true => {
                self.advance()?;
                Some(self.parse_name()?)
            }
            false => None,
        };
        let directives = self.parse_directives(false)?;
        let selection_set = self.parse_selection_set()?;

        Ok(Selection::InlineFragment(InlineFragment {
            loc: self.loc(start),
            type_condition: type_condition,
            directives: directives,
            selection_set: selection_set,
        }))
    }

    fn parse_fragment_definition(&mut self) -> Result<FragmentDefinition, ParseError> {
        let start = self.token.start;
        self.expect_keyword("fragment")?;
        let name = self.parse_fragment_name()?;
        self.expect_keyword("on")?;
        let type_condition = self.parse_name()?;
        let directives = self.parse_directives(false)?;
        let selection_set = self.parse_selection_set()?;

        Ok(FragmentDefinition {
            loc: self.loc(start),
            name: name,
            type_condition: type_condition,
            directives: directives,
            selection_set: selection_set,
        })
    }

    fn parse_fragment_name(&mut self) -> Result<Name, ParseError> {
        if self.peek_keyword("on") {
            return self.unexpected();
        }
        self.parse_name()
    }

    // Values

    fn parse_value_literal(&mut self, is_const: bool) -> Result<Value, ParseError> {
        let start = self.token.start;
        match self.token.kind {
            TokenKind::BracketL => {
                self.descend()?;
                let values = match is_const {
                    true => self.any(TokenKind::BracketL, Parser::parse_const_value, TokenKind::BracketR)?,
                    false => self.any(TokenKind::BracketL, Parser::parse_variable_value, TokenKind::BracketR)?,
                };
                self.depth -= 1;
                Ok(Value::ArrayValue { values: values, loc: self.loc(start) })
            }
            TokenKind::BraceL => {
                self.descend()?;
                let fields = match is_const {
                    true => self.any(TokenKind::BraceL, Parser::parse_const_object_field, TokenKind::BraceR)?,
                    false => self.any(TokenKind::BraceL, Parser::parse_object_field, TokenKind::BraceR)?,
                };
                self.depth -= 1;
                Ok(Value::ObjectValue { fields: fields, loc: self.loc(start) })
            }
            TokenKind::Int => {
                let token = self.advance()?;
                Ok(Value::IntValue { value: token.value.unwrap_or_default(), loc: self.loc(start) })
            }
            TokenKind::Float => {
                let token = self.advance()?;
                Ok(Value::FloatValue { value: token.value.unwrap_or_default(), loc: self.loc(start) })
            }
            TokenKind::String | TokenKind::BlockString => {
                let block = self.token.kind == TokenKind::BlockString;
                let token = self.advance()?;
                Ok(Value::StringValue {
                    value: token.value.unwrap_or_default(),
                    block: block,
                    loc: self.loc(start),
                })
            }
            TokenKind::Name => {
                let token = self.advance()?;
                let value = token.value.unwrap_or_default();
                match value.as_str() {
                    "true" => Ok(Value::BooleanValue { value: true, loc: self.loc(start) }),
                    "false" => Ok(Value::BooleanValue { value: false, loc: self.loc(start) }),
                    "null" => Ok(Value::NullValue { loc: self.loc(start) }),
                    _ => Ok(Value::EnumValue { value: value, loc: self.loc(start) }),
                }
            }
            TokenKind::Dollar if !is_const => {
                self.advance()?;
                let name = self.parse_name()?;
                Ok(Value::VariableValue { name: name, loc: self.loc(start) })
            }
            _ => self.unexpected(),
        }
    }

    fn parse_const_value(&mut self) -> Result<Value, ParseError> {
        self.parse_value_literal(true)
    }

    fn parse_variable_value(&mut self) -> Result<Value, ParseError> {
        self.parse_value_literal(false)
    }

    fn parse_object_field(&mut self) -> Result<ObjectField, ParseError> {
        self.parse_object_field_value(false)
    }

    fn parse_const_object_field(&mut self) -> Result<ObjectField, ParseError> {
        self.parse_object_field_value(true)
    }

    fn parse_object_field_value(&mut self, is_const: bool) -> Result<ObjectField, ParseError> {
        let start = self.token.start;
        let name = self.parse_name()?;
        self.expect(TokenKind::Colon)?;
        let value = self.parse_value_literal(is_const)?;
        Ok(ObjectField {
            loc: self.loc(start),
            name: name,
            value: value,
        })
    }

    // Directives and types

    fn parse_directives(&mut self, is_const: bool) -> Result<Vec<Directive>, ParseError> {
        let mut directives = vec![];
        while self.peek(TokenKind::At) {
            let start = self.token.start;
            self.advance()?;
            let name = self.parse_name()?;
            let arguments = self.parse_arguments(is_const)?;
            directives.push(Directive {
                loc: self.loc(start),
                name: name,
                arguments: arguments,
            });
        }
        Ok(directives)
    }

    fn parse_type_reference(&mut self) -> Result<Type, ParseError> {
        let start = self.token.start;
        let mut var_type = match self.skip(TokenKind::BracketL)? {
            true => {
                self.descend()?;
                let inner = self.parse_type_reference()?;
                self.expect(TokenKind::BracketR)?;
                self.depth -= 1;
                Type::List(Box::new(inner), self.loc(start))
            }
            false => Type::Named(self.parse_name()?),
        };

        if self.skip(TokenKind::Bang)? {
            var_type = Type::NonNull(Box::new(var_type), self.loc(start));
        }
        Ok(var_type)
    }

    fn parse_name(&mut self) -> Result<Name, ParseError> {
        let token = self.expect(TokenKind::Name)?;
        Ok(Name {
            loc: self.loc(token.start),
            value: token.value.unwrap_or_default(),
        })
    }

    // Type system

    fn parse_type_system_definition(&mut self) -> Result<Definition, ParseError> {
        let keyword = match self.peek_description() {
            true => Lexer::read_token(&self.source, self.token.end)?,
            false => self.token.clone(),
        };

        match keyword.name_kind_from_value() {
            Some(NameKind::Schema) => Ok(Definition::Schema(self.parse_schema_definition()?)),
            Some(NameKind::Scalar) => {
                Ok(Definition::Type(TypeDefinition::Scalar(self.parse_scalar_type_definition()?)))
            }
            Some(NameKind::Type) => Ok(Definition::Type(TypeDefinition::Object(
                self.parse_object_type_definition("type")?,
            ))),
            Some(NameKind::Interface) => Ok(Definition::Type(TypeDefinition::Interface(
                self.parse_object_type_definition("interface")?,
            ))),
            Some(NameKind::Union) => {
                Ok(Definition::Type(TypeDefinition::Union(self.parse_union_type_definition()?)))
            }
            Some(NameKind::Enum) => {
                Ok(Definition::Type(TypeDefinition::Enum(self.parse_enum_type_definition()?)))
            }
            Some(NameKind::Input) => Ok(Definition::Type(TypeDefinition::InputObject(
                self.parse_input_object_type_definition()?,
            ))),
            Some(NameKind::Directive) => Ok(Definition::Directive(self.parse_directive_definition()?)),
            _ => parse_error!(&self.source, keyword.start, "Syntax Error: Unexpected {}.", keyword.describe()),
        }
    }

    fn parse_description(&mut self) -> Result<Option<String>, ParseError> {
        match self.peek_description() {
            true => Ok(self.advance()?.value),
            false => Ok(None),
        }
    }

    fn parse_schema_definition(&mut self) -> Result<SchemaDefinition, ParseError> {
        let start = self.token.start;
        let description = self.parse_description()?;
        self.expect_keyword("schema")?;
        let directives = self.parse_directives(true)?;
        let operation_types = self.many(
            TokenKind::BraceL,
            Parser::parse_operation_type_definition,
            TokenKind::BraceR,
        )?;

        Ok(SchemaDefinition {
            loc: self.loc(start),
            description: description,
            directives: directives,
            operation_types: operation_types,
        })
    }

    fn parse_operation_type_definition(&mut self) -> Result<OperationTypeDefinition, ParseError> {
        let start = self.token.start;
        let operation = self.parse_operation_type()?;
        self.expect(TokenKind::Colon)?;
        let type_name = self.parse_name()?;
        Ok(OperationTypeDefinition {
            loc: self.loc(start),
            operation: operation,
            type_name: type_name,
        })
    }

    fn parse_scalar_type_definition(&mut self) -> Result<ScalarTypeDefinition, ParseError> {
        let start = self.token.start;
        let description = self.parse_description()?;
        self.expect_keyword("scalar")?;
        let name = self.parse_name()?;
        let directives = self.parse_directives(true)?;
        Ok(ScalarTypeDefinition {
            loc: self.loc(start),
            description: description,
            name: name,
            directives: directives,
        })
    }

    fn parse_object_type_definition(&mut self, keyword: &str) -> Result<ObjectTypeDefinition, ParseError> {
        let start = self.token.start;
        let description = self.parse_description()?;
        self.expect_keyword(keyword)?;
        let name = self.parse_name()?;

        let mut interfaces = vec![];
        if self.peek_keyword("implements") {
            self.advance()?;
            self.skip(TokenKind::Amp)?;
            loop {
                interfaces.push(self.parse_name()?);
                if self.skip(TokenKind::Amp)? {
                    continue;
                }
                // legacy comma separated lists, commas being whitespace
                if self.peek(TokenKind::Name) && self.token.name_kind_from_value().is_none() {
                    continue;
                }
                break;
            }
        }

        let directives = self.parse_directives(true)?;
        let fields = match self.peek(TokenKind::BraceL) {
            true => self.many(TokenKind::BraceL, Parser::parse_field_definition, TokenKind::BraceR)?,
            false => vec![],
        };

        Ok(ObjectTypeDefinition {
            loc: self.loc(start),
            description: description,
            name: name,
            interfaces: interfaces,
            directives: directives,
            fields: fields,
        })
    }

    fn parse_field_definition(&mut self) -> Result<FieldDefinition, ParseError> {
        let start = self.token.start;
        let description = self.parse_description()?;
        let name = self.parse_name()?;
        let arguments = self.parse_argument_definitions()?;
        self.expect(TokenKind::Colon)?;
        let field_type = self.parse_type_reference()?;
        let directives = self.parse_directives(true)?;

        Ok(FieldDefinition {
            loc: self.loc(start),
            description: description,
            name: name,
            arguments: arguments,
            field_type: field_type,
            directives: directives,
        })
    }

    fn parse_argument_definitions(&mut self) -> Result<Vec<InputValueDefinition>, ParseError> {
        match self.peek(TokenKind::ParenL) {
            true => self.many(TokenKind::ParenL, Parser::parse_input_value_definition, TokenKind::ParenR),
            false => Ok(vec![]),
        }
    }

    fn parse_input_value_definition(&mut self) -> Result<InputValueDefinition, ParseError> {
        let start = self.token.start;
        let description = self.parse_description()?;
        let name = self.parse_name()?;
        self.expect(TokenKind::Colon)?;
        let value_type = self.parse_type_reference()?;
        let default_value = match self.skip(TokenKind::Equals)? {
            true => Some(self.parse_value_literal(true)?),
            false => None,
        };
        let directives = self.parse_directives(true)?;

        Ok(InputValueDefinition {
            loc: self.loc(start),
            description: description,
            name: name,
            value_type: value_type,
            default_value: default_value,
            directives: directives,
        })
    }

    fn parse_union_type_definition(&mut self) -> Result<UnionTypeDefinition, ParseError> {
        let start = self.token.start;
        let description = self.parse_description()?;
        self.expect_keyword("union")?;
        let name = self.parse_name()?;
        let directives = self.parse_directives(true)?;

        let mut types = vec![];
        if self.skip(TokenKind::Equals)? {
            self.skip(TokenKind::Pipe)?;
            loop {
                types.push(self.parse_name()?);
                if !self.skip(TokenKind::Pipe)? {
                    break;
                }
            }
        }

        Ok(UnionTypeDefinition {
            loc: self.loc(start),
            description: description,
            name: name,
            directives: directives,
            types: types,
        })
    }

    fn parse_enum_type_definition(&mut self) -> Result<EnumTypeDefinition, ParseError> {
        let start = self.token.start;
        let description = self.parse_description()?;
        self.expect_keyword("enum")?;
        let name = self.parse_name()?;
        let directives = self.parse_directives(true)?;
        let values = match self.peek(TokenKind::BraceL) {
            true => self.many(TokenKind::BraceL, Parser::parse_enum_value_definition, TokenKind::BraceR)?,
            false => vec![],
        };

        Ok(EnumTypeDefinition {
            loc: self.loc(start),
            description: description,
            name: name,
            directives: directives,
            values: values,
        })
    }

    fn parse_enum_value_definition(&mut self) -> Result<EnumValueDefinition, ParseError> {
        let start = self.token.start;
        let description = self.parse_description()?;
        if self.peek_keyword("true") || self.peek_keyword("false") || self.peek_keyword("null") {
            return parse_error!(
                &self.source,
                self.token.start,
                "Syntax Error: {} is reserved and cannot be used for an enum value.",
                self.token.describe()
            );
        }
        let name = self.parse_name()?;
        let directives = self.parse_directives(true)?;

        Ok(EnumValueDefinition {
            loc: self.loc(start),
            description: description,
            name: name,
            directives: directives,
        })
    }

    fn parse_input_object_type_definition(&mut self) -> Result<InputObjectTypeDefinition, ParseError> {
        let start = self.token.start;
        let description = self.parse_description()?;
        self.expect_keyword("input")?;
        let name = self.parse_name()?;
        let directives = self.parse_directives(true)?;
        let fields = match self.peek(TokenKind::BraceL) {
            true => self.many(TokenKind::BraceL, Parser::parse_input_value_definition, TokenKind::BraceR)?,
            false => vec![],
        };

        Ok(InputObjectTypeDefinition {
            loc: self.loc(start),
            description: description,
            name: name,
            directives: directives,
            fields: fields,
        })
    }

    fn parse_directive_definition(&mut self) -> Result<DirectiveDefinition, ParseError> {
        let start = self.token.start;
        let description = self.parse_description()?;
        self.expect_keyword("directive")?;
        self.expect(TokenKind::At)?;
        let name = self.parse_name()?;
        let arguments = self.parse_argument_definitions()?;
        let repeatable = self.peek_keyword("repeatable");
        if repeatable {
            self.advance()?;
        }
        self.expect_keyword("on")?;

        let mut locations = vec![];
        self.skip(TokenKind::Pipe)?;
        loop {
            let location = self.parse_name()?;
            if !DIRECTIVE_LOCATIONS.contains(&location.value.as_str()) {
                let position = location.loc.as_ref().map_or(self.prev_end, |loc| loc.start);
                return parse_error!(
                    &self.source,
                    position,
                    "Syntax Error: Unexpected Name \"{}\".",
                    location.value
                );
            }
            locations.push(location);
            if !self.skip(TokenKind::Pipe)? {
                break;
            }
        }

        Ok(DirectiveDefinition {
            loc: self.loc(start),
            description: description,
            name: name,
            arguments: arguments,
            repeatable: repeatable,
            locations: locations,
        })
    }

    // Token helpers

    fn many<T>(
        &mut self,
        open: TokenKind,
        parse: fn(&mut Parser) -> Result<T, ParseError>,
        close: TokenKind,
    ) -> Result<Vec<T>, ParseError> {
        self.expect(open)?;
        let mut nodes = vec![parse(self)?];
        while !self.skip(close)? {
            nodes.push(parse(self)?);
        }
        Ok(nodes)
    }

    fn any<T>(
        &mut self,
        open: TokenKind,
        parse: fn(&mut Parser) -> Result<T, ParseError>,
        close: TokenKind,
    ) -> Result<Vec<T>, ParseError> {
        self.expect(open)?;
        let mut nodes = vec![];
        while !self.skip(close)? {
            nodes.push(parse(self)?);
        }
        Ok(nodes)
    }

    fn loc(&self, start: usize) -> Option<Location> {
        if self.options.no_location {
            return None;
        }
        let source = match self.options.no_source {
            true => None,
            false => Some(self.source.clone()),
        };
        Some(Location {
            start: start,
            end: self.prev_end,
            source: source,
        })
    }

    fn skip(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        match self.token.kind == kind {
            true => {
                self.advance()?;
                Ok(true)
            }
            false => Ok(false),
        }
    }

    /// Moves to the next token and returns the one just consumed.
    fn advance(&mut self) -> Result<Token, ParseError> {
        let next = match self.token.kind {
            TokenKind::EOF => self.token.clone(),
            _ => self.lexer.next()?,
        };
        self.prev_end = self.token.end;
        Ok(std::mem::replace(&mut self.token, next))
    }

    fn peek(&self, kind: TokenKind) -> bool {
        self.token.kind == kind
    }

    fn peek_keyword(&self, value: &str) -> bool {
        self.token.kind == TokenKind::Name && self.token.value.as_deref() == Some(value)
    }

    fn peek_description(&self) -> bool {
        self.peek(TokenKind::String) || self.peek(TokenKind::BlockString)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        match self.token.kind == kind {
            true => self.advance(),
            false => parse_error!(
                &self.source,
                self.token.start,
                "Syntax Error: Expected {}, found {}.",
                kind.describe(),
                self.token.describe()
            ),
        }
    }

    fn expect_keyword(&mut self, value: &str) -> Result<Token, ParseError> {
        match self.peek_keyword(value) {
            true => self.advance(),
            false => parse_error!(
                &self.source,
                self.token.start,
                "Syntax Error: Expected \"{}\", found {}.",
                value,
                self.token.describe()
            ),
        }
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        match self.depth > MAX_DEPTH {
            true => parse_error!(&self.source, self.token.start, "Syntax Error: Document is nested too deeply."),
            false => Ok(()),
        }
    }

    fn unexpected<T>(&self) -> Result<T, ParseError> {
        parse_error!(&self.source, self.token.start, "Syntax Error: Unexpected {}.", self.token.describe())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(body: &str) -> Result<Document, ParseError> {
        Parser::parse(Source::new(body), ParseOptions::no_location())
    }

    #[test]
    fn it_accepts_option_to_not_include_source() {
        let document = Parser::parse(Source::new("{ field }"), ParseOptions::no_source()).unwrap();
        assert_eq!(document.loc, Some(Location { start: 0, end: 9, source: None }));
    }

    #[test]
    fn it_parses_named_operations_with_variables() {
        let document = parse("query Hero($episode: Episode = JEDI, $ids: [ID!]!) @live { hero { name } }").unwrap();
        let operation = document.operation(Some("Hero")).unwrap();
        assert_eq!(operation.operation, OperationType::Query);
        assert_eq!(operation.variable_definitions.len(), 2);
        assert_eq!(operation.variable_definitions[0].variable.value, "episode");
        assert_eq!(
            operation.variable_definitions[0].default_value,
            Some(Value::EnumValue { value: "JEDI".to_string(), loc: None })
        );
        match operation.variable_definitions[1].var_type {
            Type::NonNull(ref inner, _) => assert_eq!(inner.kind(), crate::language::kinds::Kinds::ListType),
            ref other => panic!("unexpected type {:?}", other),
        }
        assert_eq!(operation.directives[0].name.value, "live");
    }

    #[test]
    fn it_parses_fragments() {
        let document = parse("{ ...Parts ... on User { id } ... @skip(if: true) { name } } fragment Parts on Query { me }").unwrap();
        let selections = &document.operation(None).unwrap().selection_set.selections;
        assert_eq!(selections.len(), 3);
        match selections[1] {
            Selection::InlineFragment(ref fragment) => {
                assert_eq!(fragment.type_condition.as_ref().unwrap().value, "User")
            }
            ref other => panic!("unexpected selection {:?}", other),
        }
        match selections[2] {
            Selection::InlineFragment(ref fragment) => assert!(fragment.type_condition.is_none()),
            ref other => panic!("unexpected selection {:?}", other),
        }
        assert_eq!(document.fragment("Parts").unwrap().type_condition.value, "Query");
    }

    #[test]
    fn it_rejects_variables_in_const_positions() {
        let error = parse("query ($a: Int = $b) { f }").unwrap_err();
        assert_eq!(error.description, "Syntax Error: Unexpected \"$\".");
    }

    #[test]
    fn it_rejects_empty_documents() {
        let error = parse("").unwrap_err();
        assert_eq!(error.description, "Syntax Error: Unexpected <EOF>.");
    }

    #[test]
    fn it_rejects_documents_nested_too_deeply() {
        let deep = [
            format!("{{ f(a: {}) }}", "[".repeat(20_000)),
            format!("{{ f(a: {}) }}", "{b: ".repeat(20_000)),
            "{ a ".repeat(20_000),
            format!("{{ f(a: 1) {} }}", "... { a ".repeat(20_000)),
            format!("query ($v: {}Int) {{ f }}", "[".repeat(20_000)),
        ];
        for body in &deep {
            let error = parse(body).unwrap_err();
            assert_eq!(error.description, "Syntax Error: Document is nested too deeply.");
        }

        let allowed = format!("{{ f(a: {}1{}) }}", "[".repeat(MAX_DEPTH - 1), "]".repeat(MAX_DEPTH - 1));
        assert!(parse(&allowed).is_ok());
        let allowed = format!("{}a{}", "{ a ".repeat(MAX_DEPTH - 1) + "{ ", " }".repeat(MAX_DEPTH));
        assert!(parse(&allowed).is_ok());
    }

    #[test]
    fn it_reports_unbalanced_braces() {
        let error = parse("{ user(id: 1) { name").unwrap_err();
        assert_eq!(error.description, "Syntax Error: Expected Name, found <EOF>.");
        assert_eq!((error.line, error.column), (1, 21));
    }

    #[test]
    fn it_parses_type_system_definitions() {
        let document = parse(
            r#"
            schema { query: Query }
            "The root" type Query implements Node & Entity @key(fields: "id") {
              "Look up" node(id: ID!, first: Int = 10): Node
            }
            interface Node { id: ID! }
            union Result = | User | Post
            enum Color { RED GREEN }
            input Filter { name: String = "x", tags: [String!] }
            scalar Date
            """Marks a field."""
            directive @view(input: [Filter!]) repeatable on FIELD | QUERY
            "#,
        )
        .unwrap();

        assert_eq!(document.definitions.len(), 8);
        match document.definitions[1] {
            Definition::Type(TypeDefinition::Object(ref object)) => {
                assert_eq!(object.description.as_deref(), Some("The root"));
                assert_eq!(object.interfaces.len(), 2);
                assert_eq!(object.fields[0].arguments.len(), 2);
                assert_eq!(object.fields[0].description.as_deref(), Some("Look up"));
            }
            ref other => panic!("unexpected definition {:?}", other),
        }
        match document.definitions[7] {
            Definition::Directive(ref directive) => {
                assert!(directive.repeatable);
                assert_eq!(directive.locations.len(), 2);
                assert_eq!(directive.description.as_deref(), Some("Marks a field."));
            }
            ref other => panic!("unexpected definition {:?}", other),
        }
    }

    #[test]
    fn it_rejects_unknown_directive_locations() {
        let error = parse("directive @x on NOWHERE").unwrap_err();
        assert_eq!(error.description, "Syntax Error: Unexpected Name \"NOWHERE\".");
    }
}

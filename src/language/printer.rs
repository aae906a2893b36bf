//! Turns an AST back into GraphQL source text.
//!
//! Output uses two-space indentation and puts each selection on its own
//! line. An anonymous query without variables or directives is printed as a
//! bare selection set.

use crate::language::ast::*;
use crate::language::kinds::OperationType;

pub fn print(document: &Document) -> String {
    document
        .definitions
        .iter()
        .map(print_definition)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn print_definition(definition: &Definition) -> String {
    match *definition {
        Definition::Operation(ref operation) => print_operation(operation),
        Definition::Fragment(ref fragment) => print_fragment_definition(fragment),
        Definition::Schema(ref schema) => print_schema_definition(schema),
        Definition::Type(ref type_definition) => print_type_definition(type_definition),
        Definition::Directive(ref directive) => print_directive_definition(directive),
    }
}

pub fn print_operation(operation: &OperationDefinition) -> String {
    let variables = wrap(
        "(",
        &operation
            .variable_definitions
            .iter()
            .map(print_variable_definition)
            .collect::<Vec<_>>()
            .join(", "),
        ")",
    );
    let name = operation.name.as_ref().map_or("", |name| name.value.as_str());
    let prefix = join(
        &[
            operation.operation.as_str().to_string(),
            format!("{}{}", name, variables),
            print_directives(&operation.directives),
        ],
        " ",
    );
    let selection_set = print_selection_set(&operation.selection_set);

    match operation.operation == OperationType::Query && prefix == "query" {
        true => selection_set,
        false => format!("{} {}", prefix, selection_set),
    }
}

fn print_variable_definition(variable: &VariableDefinition) -> String {
    format!(
        "${}: {}{}{}",
        variable.variable.value,
        print_type(&variable.var_type),
        wrap(" = ", &variable.default_value.as_ref().map(print_value).unwrap_or_default(), ""),
        wrap(" ", &print_directives(&variable.directives), ""),
    )
}

fn print_fragment_definition(fragment: &FragmentDefinition) -> String {
    format!(
        "fragment {} on {} {}{}",
        fragment.name.value,
        fragment.type_condition.value,
        wrap("", &print_directives(&fragment.directives), " "),
        print_selection_set(&fragment.selection_set),
    )
}

pub fn print_selection_set(selection_set: &SelectionSet) -> String {
    block(&selection_set.selections.iter().map(print_selection).collect::<Vec<_>>())
}

fn print_selection(selection: &Selection) -> String {
    match *selection {
        Selection::Field(ref field) => print_field(field),
        Selection::FragmentSpread(ref spread) => format!(
            "...{}{}",
            spread.name.value,
            wrap(" ", &print_directives(&spread.directives), "")
        ),
        Selection::InlineFragment(ref fragment) => join(
            &[
                "...".to_string(),
                wrap(
                    "on ",
                    fragment.type_condition.as_ref().map_or("", |name| name.value.as_str()),
                    "",
                ),
                print_directives(&fragment.directives),
                print_selection_set(&fragment.selection_set),
            ],
            " ",
        ),
    }
}

fn print_field(field: &Field) -> String {
    let alias = field.alias.as_ref().map_or(String::new(), |alias| format!("{}: ", alias.value));
    let prefix = format!("{}{}{}", alias, field.name.value, print_arguments(&field.arguments));
    join(
        &[
            prefix,
            print_directives(&field.directives),
            field.selection_set.as_ref().map(print_selection_set).unwrap_or_default(),
        ],
        " ",
    )
}

fn print_arguments(arguments: &[Argument]) -> String {
    wrap(
        "(",
        &arguments
            .iter()
            .map(|argument| format!("{}: {}", argument.name.value, print_value(&argument.value)))
            .collect::<Vec<_>>()
            .join(", "),
        ")",
    )
}

pub fn print_directives(directives: &[Directive]) -> String {
    directives
        .iter()
        .map(|directive| format!("@{}{}", directive.name.value, print_arguments(&directive.arguments)))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn print_value(value: &Value) -> String {
    match *value {
        Value::IntValue { ref value, .. } | Value::FloatValue { ref value, .. } => value.clone(),
        Value::StringValue { ref value, block: true, .. } => print_block_string(value),
        Value::StringValue { ref value, .. } => print_string(value),
        Value::BooleanValue { value, .. } => value.to_string(),
        Value::NullValue { .. } => "null".to_string(),
        Value::EnumValue { ref value, .. } => value.clone(),
        Value::ArrayValue { ref values, .. } => {
            format!("[{}]", values.iter().map(print_value).collect::<Vec<_>>().join(", "))
        }
        Value::ObjectValue { ref fields, .. } => format!(
            "{{{}}}",
            fields
                .iter()
                .map(|field| format!("{}: {}", field.name.value, print_value(&field.value)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Value::VariableValue { ref name, .. } => format!("${}", name.value),
    }
}

pub fn print_type(value_type: &Type) -> String {
    match *value_type {
        Type::Named(ref name) => name.value.clone(),
        Type::List(ref inner, _) => format!("[{}]", print_type(inner)),
        Type::NonNull(ref inner, _) => format!("{}!", print_type(inner)),
    }
}

pub fn print_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Prints `value` so that lexing the result as a block string gives
/// `value` back. The closing quotes go on their own line whenever the last
/// character would otherwise merge with them.
pub fn print_block_string(value: &str) -> String {
    let escaped = value.replace("\"\"\"", "\\\"\"\"");
    let lines = escaped.split('\n').collect::<Vec<_>>();
    let is_blank_start = |line: &str| line.is_empty() || line.starts_with(' ') || line.starts_with('\t');

    let single_line = lines.len() == 1;
    let force_leading_newline = !single_line && lines[1..].iter().all(|line| is_blank_start(line));
    let trailing_triple_quotes = escaped.ends_with("\\\"\"\"");
    let trailing_quote = value.ends_with('"') && !trailing_triple_quotes;
    let trailing_slash = value.ends_with('\\');
    let ends_in_whitespace = value.ends_with(' ') || value.ends_with('\t');
    let force_trailing_newline = trailing_quote || trailing_slash || ends_in_whitespace;
    let multiple_lines = !single_line || force_trailing_newline || trailing_triple_quotes || force_leading_newline;

    let mut out = String::from("\"\"\"");
    let skip_leading_newline = single_line && value.starts_with(|c: char| c == ' ' || c == '\t');
    if (multiple_lines && !skip_leading_newline) || force_leading_newline {
        out.push('\n');
    }
    out.push_str(&escaped);
    if multiple_lines {
        out.push('\n');
    }
    out.push_str("\"\"\"");
    out
}

/// A description followed by a newline, or nothing.
pub fn print_description(description: Option<&str>) -> String {
    match description {
        Some(text) if text.contains('\n') => format!("{}\n", print_block_string(text)),
        Some(text) => format!("{}\n", print_string(text)),
        None => String::new(),
    }
}

fn print_schema_definition(schema: &SchemaDefinition) -> String {
    let operation_types = schema
        .operation_types
        .iter()
        .map(|operation| format!("{}: {}", operation.operation, operation.type_name.value))
        .collect::<Vec<_>>();
    format!(
        "{}{}",
        print_description(schema.description.as_deref()),
        join(
            &["schema".to_string(), print_directives(&schema.directives), block(&operation_types)],
            " "
        )
    )
}

fn print_type_definition(definition: &TypeDefinition) -> String {
    match *definition {
        TypeDefinition::Scalar(ref scalar) => format!(
            "{}{}",
            print_description(scalar.description.as_deref()),
            join(
                &["scalar".to_string(), scalar.name.value.clone(), print_directives(&scalar.directives)],
                " "
            )
        ),
        TypeDefinition::Object(ref object) => print_object_like("type", object),
        TypeDefinition::Interface(ref interface) => print_object_like("interface", interface),
        TypeDefinition::Union(ref union) => format!(
            "{}{}",
            print_description(union.description.as_deref()),
            join(
                &[
                    "union".to_string(),
                    union.name.value.clone(),
                    print_directives(&union.directives),
                    wrap(
                        "= ",
                        &union.types.iter().map(|t| t.value.as_str()).collect::<Vec<_>>().join(" | "),
                        ""
                    ),
                ],
                " "
            )
        ),
        TypeDefinition::Enum(ref enum_type) => {
            let values = enum_type
                .values
                .iter()
                .map(|value| {
                    format!(
                        "{}{}",
                        print_description(value.description.as_deref()),
                        join(&[value.name.value.clone(), print_directives(&value.directives)], " ")
                    )
                })
                .collect::<Vec<_>>();
            format!(
                "{}{}",
                print_description(enum_type.description.as_deref()),
                join(
                    &[
                        "enum".to_string(),
                        enum_type.name.value.clone(),
                        print_directives(&enum_type.directives),
                        block(&values),
                    ],
                    " "
                )
            )
        }
        TypeDefinition::InputObject(ref input) => format!(
            "{}{}",
            print_description(input.description.as_deref()),
            join(
                &[
                    "input".to_string(),
                    input.name.value.clone(),
                    print_directives(&input.directives),
                    block(&input.fields.iter().map(print_input_value_definition).collect::<Vec<_>>()),
                ],
                " "
            )
        ),
    }
}

fn print_object_like(keyword: &str, object: &ObjectTypeDefinition) -> String {
    let fields = object
        .fields
        .iter()
        .map(|field| {
            format!(
                "{}{}{}: {}{}",
                print_description(field.description.as_deref()),
                field.name.value,
                print_argument_definitions(&field.arguments),
                print_type(&field.field_type),
                wrap(" ", &print_directives(&field.directives), "")
            )
        })
        .collect::<Vec<_>>();
    format!(
        "{}{}",
        print_description(object.description.as_deref()),
        join(
            &[
                keyword.to_string(),
                object.name.value.clone(),
                wrap(
                    "implements ",
                    &object.interfaces.iter().map(|i| i.value.as_str()).collect::<Vec<_>>().join(" & "),
                    ""
                ),
                print_directives(&object.directives),
                block(&fields),
            ],
            " "
        )
    )
}

fn print_argument_definitions(arguments: &[InputValueDefinition]) -> String {
    wrap(
        "(",
        &arguments.iter().map(print_input_value_definition).collect::<Vec<_>>().join(", "),
        ")",
    )
}

fn print_input_value_definition(input: &InputValueDefinition) -> String {
    format!(
        "{}{}",
        print_description(input.description.as_deref()),
        join(
            &[
                format!("{}: {}", input.name.value, print_type(&input.value_type)),
                wrap("= ", &input.default_value.as_ref().map(print_value).unwrap_or_default(), ""),
                print_directives(&input.directives),
            ],
            " "
        )
    )
}

fn print_directive_definition(directive: &DirectiveDefinition) -> String {
    format!(
        "{}directive @{}{}{} on {}",
        print_description(directive.description.as_deref()),
        directive.name.value,
        print_argument_definitions(&directive.arguments),
        if directive.repeatable { " repeatable" } else { "" },
        directive.locations.iter().map(|l| l.value.as_str()).collect::<Vec<_>>().join(" | ")
    )
}

/// `{`, the lines indented by two spaces, `}`. Nothing when there are no lines.
pub fn block(lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let body = lines.join("\n").replace('\n', "\n  ");
    format!("{{\n  {}\n}}", body)
}

fn join(parts: &[String], separator: &str) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}

fn wrap(start: &str, value: &str, end: &str) -> String {
    match value.is_empty() {
        true => String::new(),
        false => format!("{}{}{}", start, value, end),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::language::lexer::Source;
    use crate::language::parser::{ParseOptions, Parser};

    fn parse(body: &str) -> Document {
        Parser::parse(Source::new(body), ParseOptions::no_location()).unwrap()
    }

    #[test]
    fn it_prints_shorthand_queries_as_selection_sets() {
        assert_eq!(print(&parse("{ user(id: 1) { name } }")), "{\n  user(id: 1) {\n    name\n  }\n}");
    }

    #[test]
    fn it_prints_named_operations() {
        let document = parse(
            "mutation Rename($id: ID!, $name: String = \"anon\") @audit { rename(id: $id, name: $name) { id ...F } }",
        );
        assert_eq!(
            print(&document),
            "mutation Rename($id: ID!, $name: String = \"anon\") @audit {\n  rename(id: $id, name: $name) {\n    id\n    ...F\n  }\n}"
        );
    }

    #[test]
    fn it_prints_values() {
        let document = parse(r#"{ f(a: [1, 2.5], b: {c: null, d: RED}, e: "q\"uote\n", f: true) }"#);
        assert_eq!(
            print(&document),
            "{\n  f(a: [1, 2.5], b: {c: null, d: RED}, e: \"q\\\"uote\\n\", f: true)\n}"
        );
    }

    #[test]
    fn it_prints_fragments() {
        let document = parse("query Q { ... on User @include(if: $x) { id } } fragment F on User { name }");
        assert_eq!(
            print(&document),
            "query Q {\n  ... on User @include(if: $x) {\n    id\n  }\n}\n\nfragment F on User {\n  name\n}"
        );
    }

    #[test]
    fn printed_documents_parse_back_to_the_same_ast() {
        let text = "query Hero($ep: Episode) { hero(episode: $ep) { name friends { name } ... on Droid { primaryFunction } } }";
        let document = parse(text);
        assert_eq!(parse(&print(&document)), document);
    }

    #[test]
    fn block_strings_survive_printing() {
        assert_eq!(print_block_string("plain"), "\"\"\"plain\"\"\"");
        assert_eq!(print_block_string("say \"hi\""), "\"\"\"\nsay \"hi\"\n\"\"\"");
        assert_eq!(print_block_string("dir\\"), "\"\"\"\ndir\\\n\"\"\"");
        assert_eq!(print_block_string("  lead"), "\"\"\"  lead\"\"\"");

        let texts = [
            "query Q { a(b: \"\"\"\nsay \"hi\"\n\"\"\") }",
            "{ a(b: \"\"\"\n  x\n\"\"\") }",
            "{ a(b: \"\"\"  indented first line\"\"\") }",
            "{ a(b: \"\"\"first\n  second\n\"\"\") }",
            "{ a(b: \"\"\"quoted \\\"\"\" inside\"\"\") }",
            "{ a(b: \"\"\"ends in quotes \\\"\"\"\"\"\") }",
            "{ a(b: \"\"\"\ntrailing space  \n\"\"\") }",
        ];
        for text in &texts {
            let document = parse(text);
            let printed = print(&document);
            let reparsed = Parser::parse(Source::new(&printed), ParseOptions::no_location());
            assert_eq!(reparsed.as_ref().ok(), Some(&document), "{} printed as {}", text, printed);
        }
    }

    #[test]
    fn it_prints_type_system_definitions() {
        let document = parse(
            "type Query implements Node @key { \"The id\" node(id: ID!): Node } union U = A | B directive @d(x: Int = 1) on FIELD | QUERY",
        );
        assert_eq!(
            print(&document),
            "type Query implements Node @key {\n  \"The id\"\n  node(id: ID!): Node\n}\n\nunion U = A | B\n\ndirective @d(x: Int = 1) on FIELD | QUERY"
        );
    }
}

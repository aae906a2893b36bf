use crate::language::printer::{block, print_block_string, print_string};
use crate::types::definition::*;

/// Prints a schema as SDL, leaving out built-in scalars, built-in directives
/// and introspection types.
pub fn print_schema(schema: &Schema) -> String {
    let mut parts = vec![];

    if let Some(definition) = print_schema_definition(schema) {
        parts.push(definition);
    }

    parts.extend(
        schema
            .directives
            .values()
            .filter(|directive| !BUILTIN_DIRECTIVES.contains(&directive.name.as_str()))
            .map(print_directive),
    );
    parts.extend(schema.user_types().map(print_type));

    parts.join("\n\n")
}

/// Only printed when the root types do not use the conventional names.
fn print_schema_definition(schema: &Schema) -> Option<String> {
    let conventional = schema.query_type.as_deref().map_or(true, |name| name == "Query")
        && schema.mutation_type.as_deref().map_or(true, |name| name == "Mutation")
        && schema.subscription_type.as_deref().map_or(true, |name| name == "Subscription");
    if conventional && schema.description.is_none() {
        return None;
    }

    let roots = [
        ("query", &schema.query_type),
        ("mutation", &schema.mutation_type),
        ("subscription", &schema.subscription_type),
    ];
    let lines = roots
        .iter()
        .filter_map(|&(operation, name)| name.as_ref().map(|name| format!("{}: {}", operation, name)))
        .collect::<Vec<_>>();

    Some(format!(
        "{}schema {}",
        description(schema.description.as_deref(), ""),
        block(&lines)
    ))
}

pub fn print_type(definition: &TypeDefinition) -> String {
    let header = description(definition.description(), "");
    match *definition {
        TypeDefinition::Scalar(ref scalar) => {
            let specified_by = scalar
                .specified_by_url
                .as_ref()
                .map_or(String::new(), |url| format!(" @specifiedBy(url: {})", print_string(url)));
            format!("{}scalar {}{}", header, scalar.name, specified_by)
        }
        TypeDefinition::Object(ref object) => print_object(&header, "type", object),
        TypeDefinition::Interface(ref object) => print_object(&header, "interface", object),
        TypeDefinition::Union(ref union) => {
            let members = match union.possible_types.is_empty() {
                true => String::new(),
                false => format!(" = {}", union.possible_types.join(" | ")),
            };
            format!("{}union {}{}", header, union.name, members)
        }
        TypeDefinition::Enum(ref enum_type) => {
            let values = enum_type
                .values
                .iter()
                .map(|value| {
                    format!(
                        "{}{}{}",
                        description(value.description.as_deref(), ""),
                        value.name,
                        deprecated(&value.deprecation_reason)
                    )
                })
                .collect::<Vec<_>>();
            format!("{}enum {} {}", header, enum_type.name, block(&values))
        }
        TypeDefinition::InputObject(ref input) => {
            let fields = input.fields.iter().map(|field| print_input_value(field, "")).collect::<Vec<_>>();
            format!("{}input {} {}", header, input.name, block(&fields))
        }
    }
}

fn print_object(header: &str, keyword: &str, object: &Object) -> String {
    let implements = match object.interfaces.is_empty() {
        true => String::new(),
        false => format!(" implements {}", object.interfaces.join(" & ")),
    };
    let fields = object
        .fields
        .iter()
        .map(|field| {
            format!(
                "{}{}{}: {}{}",
                description(field.description.as_deref(), ""),
                field.name,
                print_arguments(&field.arguments),
                field.field_type,
                deprecated(&field.deprecation_reason)
            )
        })
        .collect::<Vec<_>>();
    format!("{}{} {}{} {}", header, keyword, object.name, implements, block(&fields))
}

fn print_directive(directive: &DirectiveDefinition) -> String {
    format!(
        "{}directive @{}{}{} on {}",
        description(directive.description.as_deref(), ""),
        directive.name,
        print_arguments(&directive.arguments),
        if directive.repeatable { " repeatable" } else { "" },
        directive.locations.join(" | ")
    )
}

/// Arguments go on one line unless one of them carries a description.
fn print_arguments(arguments: &[InputValue]) -> String {
    if arguments.is_empty() {
        return String::new();
    }
    if arguments.iter().all(|argument| argument.description.is_none()) {
        let inline = arguments.iter().map(|argument| print_input_value(argument, "")).collect::<Vec<_>>();
        return format!("({})", inline.join(", "));
    }
    let lines = arguments
        .iter()
        .map(|argument| print_input_value(argument, "  "))
        .collect::<Vec<_>>();
    format!("(\n{}\n)", lines.join("\n"))
}

fn print_input_value(value: &InputValue, indentation: &str) -> String {
    let default_value = value
        .default_value
        .as_ref()
        .map_or(String::new(), |default| format!(" = {}", default));
    format!(
        "{}{}{}: {}{}",
        description(value.description.as_deref(), indentation),
        indentation,
        value.name,
        value.value_type,
        default_value
    )
}

fn deprecated(reason: &Option<String>) -> String {
    match reason.as_deref() {
        None => String::new(),
        Some("No longer supported") => " @deprecated".to_string(),
        Some(reason) => format!(" @deprecated(reason: {})", print_string(reason)),
    }
}

fn description(text: Option<&str>, indentation: &str) -> String {
    match text {
        Some(text) => format!(
            "{}{}\n",
            indentation,
            print_block_string(text).replace('\n', &format!("\n{}", indentation))
        ),
        None => String::new(),
    }
}

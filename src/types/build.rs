//! Builds a [`Schema`] from a type-system document.

use std::collections::BTreeMap;

use crate::language::ast;
use crate::language::kinds::OperationType;
use crate::language::printer::print_value;
use crate::types::definition::*;
use crate::types::errors::SchemaError;
use crate::types::introspection::check_references;

pub fn build_ast_schema(document: &ast::Document) -> Result<Schema, SchemaError> {
    let mut schema = Schema::default();
    let mut schema_definition = None;

    for definition in &document.definitions {
        match *definition {
            ast::Definition::Schema(ref definition) => {
                if schema_definition.is_some() {
                    return Err(SchemaError::Build("must provide only one schema definition".to_string()));
                }
                schema_definition = Some(definition);
            }
            ast::Definition::Type(ref definition) => {
                let name = definition.name().value.clone();
                if schema.types.contains_key(&name) {
                    return Err(SchemaError::Build(format!("there can be only one type named \"{}\"", name)));
                }
                schema.types.insert(name, build_type(definition));
            }
            ast::Definition::Directive(ref directive) => {
                let name = directive.name.value.clone();
                if schema.directives.contains_key(&name) {
                    return Err(SchemaError::Build(format!(
                        "there can be only one directive named \"@{}\"",
                        name
                    )));
                }
                schema.directives.insert(
                    name.clone(),
                    DirectiveDefinition {
                        name: name,
                        description: directive.description.clone(),
                        arguments: build_input_values(&directive.arguments),
                        locations: directive.locations.iter().map(|l| l.value.clone()).collect(),
                        repeatable: directive.repeatable,
                    },
                );
            }
            ast::Definition::Operation(_) | ast::Definition::Fragment(_) => {
                return Err(SchemaError::Build(format!(
                    "{:?} is not allowed in a schema definition",
                    definition.kind()
                )));
            }
        }
    }

    match schema_definition {
        Some(definition) => {
            schema.description = definition.description.clone();
            for operation_type in &definition.operation_types {
                let name = Some(operation_type.type_name.value.clone());
                match operation_type.operation {
                    OperationType::Query => schema.query_type = name,
                    OperationType::Mutation => schema.mutation_type = name,
                    OperationType::Subscription => schema.subscription_type = name,
                }
            }
        }
        None => {
            let present = |name: &str| match schema.types.contains_key(name) {
                true => Some(name.to_string()),
                false => None,
            };
            schema.query_type = present("Query");
            schema.mutation_type = present("Mutation");
            schema.subscription_type = present("Subscription");
        }
    }

    add_builtins(&mut schema);
    check_references(&schema).map_err(|e| match e {
        SchemaError::Introspection(message) => SchemaError::Build(message),
        other => other,
    })?;
    Ok(schema)
}

fn build_type(definition: &ast::TypeDefinition) -> TypeDefinition {
    match *definition {
        ast::TypeDefinition::Scalar(ref scalar) => TypeDefinition::Scalar(Scalar {
            name: scalar.name.value.clone(),
            description: scalar.description.clone(),
            specified_by_url: directive_argument(&scalar.directives, "specifiedBy", "url"),
        }),
        ast::TypeDefinition::Object(ref object) => TypeDefinition::Object(build_object(object)),
        ast::TypeDefinition::Interface(ref object) => TypeDefinition::Interface(build_object(object)),
        ast::TypeDefinition::Union(ref union) => TypeDefinition::Union(Union {
            name: union.name.value.clone(),
            description: union.description.clone(),
            possible_types: union.types.iter().map(|t| t.value.clone()).collect(),
        }),
        ast::TypeDefinition::Enum(ref enum_type) => TypeDefinition::Enum(Enum {
            name: enum_type.name.value.clone(),
            description: enum_type.description.clone(),
            values: enum_type
                .values
                .iter()
                .map(|value| EnumValue {
                    name: value.name.value.clone(),
                    description: value.description.clone(),
                    deprecation_reason: deprecation_reason(&value.directives),
                })
                .collect(),
        }),
        ast::TypeDefinition::InputObject(ref input) => TypeDefinition::InputObject(InputObject {
            name: input.name.value.clone(),
            description: input.description.clone(),
            fields: build_input_values(&input.fields),
        }),
    }
}

fn build_object(object: &ast::ObjectTypeDefinition) -> Object {
    Object {
        name: object.name.value.clone(),
        description: object.description.clone(),
        interfaces: object.interfaces.iter().map(|i| i.value.clone()).collect(),
        fields: object
            .fields
            .iter()
            .map(|field| Field {
                name: field.name.value.clone(),
                description: field.description.clone(),
                arguments: build_input_values(&field.arguments),
                field_type: type_ref(&field.field_type),
                deprecation_reason: deprecation_reason(&field.directives),
            })
            .collect(),
    }
}

fn build_input_values(values: &[ast::InputValueDefinition]) -> Vec<InputValue> {
    values
        .iter()
        .map(|value| InputValue {
            name: value.name.value.clone(),
            description: value.description.clone(),
            value_type: type_ref(&value.value_type),
            default_value: value.default_value.as_ref().map(print_value),
        })
        .collect()
}

pub(crate) fn type_ref(value_type: &ast::Type) -> TypeRef {
    match *value_type {
        ast::Type::Named(ref name) => TypeRef::Named(name.value.clone()),
        ast::Type::List(ref inner, _) => TypeRef::List(Box::new(type_ref(inner))),
        ast::Type::NonNull(ref inner, _) => TypeRef::NonNull(Box::new(type_ref(inner))),
    }
}

fn deprecation_reason(directives: &[ast::Directive]) -> Option<String> {
    directives
        .iter()
        .find(|directive| directive.name.value == "deprecated")
        .map(|_| {
            directive_argument(directives, "deprecated", "reason")
                .unwrap_or_else(|| "No longer supported".to_string())
        })
}

fn directive_argument(directives: &[ast::Directive], directive: &str, argument: &str) -> Option<String> {
    directives
        .iter()
        .find(|d| d.name.value == directive)
        .and_then(|d| d.arguments.iter().find(|arg| arg.name.value == argument))
        .and_then(|arg| match arg.value {
            ast::Value::StringValue { ref value, .. } => Some(value.clone()),
            _ => None,
        })
}

/// Standard scalars and the `@skip`, `@include` and `@deprecated` directives.
fn add_builtins(schema: &mut Schema) {
    for name in BUILTIN_SCALARS {
        schema.types.entry(name.to_string()).or_insert_with(|| {
            TypeDefinition::Scalar(Scalar {
                name: name.to_string(),
                description: None,
                specified_by_url: None,
            })
        });
    }

    let condition = |description: &str| InputValue {
        name: "if".to_string(),
        description: Some(description.to_string()),
        value_type: TypeRef::NonNull(Box::new(TypeRef::named("Boolean"))),
        default_value: None,
    };
    let builtins: BTreeMap<String, DirectiveDefinition> = vec![
        DirectiveDefinition {
            name: "skip".to_string(),
            description: Some("Directs the executor to skip this field or fragment when the `if` argument is true.".to_string()),
            arguments: vec![condition("Skipped when true.")],
            locations: vec!["FIELD".to_string(), "FRAGMENT_SPREAD".to_string(), "INLINE_FRAGMENT".to_string()],
            repeatable: false,
        },
        DirectiveDefinition {
            name: "include".to_string(),
            description: Some("Directs the executor to include this field or fragment only when the `if` argument is true.".to_string()),
            arguments: vec![condition("Included when true.")],
            locations: vec!["FIELD".to_string(), "FRAGMENT_SPREAD".to_string(), "INLINE_FRAGMENT".to_string()],
            repeatable: false,
        },
        DirectiveDefinition {
            name: "deprecated".to_string(),
            description: Some("Marks an element of a GraphQL schema as no longer supported.".to_string()),
            arguments: vec![InputValue {
                name: "reason".to_string(),
                description: None,
                value_type: TypeRef::named("String"),
                default_value: Some("\"No longer supported\"".to_string()),
            }],
            locations: vec![
                "FIELD_DEFINITION".to_string(),
                "ARGUMENT_DEFINITION".to_string(),
                "INPUT_FIELD_DEFINITION".to_string(),
                "ENUM_VALUE".to_string(),
            ],
            repeatable: false,
        },
    ]
    .into_iter()
    .map(|directive| (directive.name.clone(), directive))
    .collect();

    for (name, directive) in builtins {
        schema.directives.entry(name).or_insert(directive);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::language::parse;

    #[test]
    fn it_builds_a_schema_from_sdl() {
        let document = parse(
            r#"
            type Query { todos(done: Boolean = false): [Todo!]! }
            type Todo { id: ID! title: String @deprecated(reason: "use name") }
            "#,
        )
        .unwrap();
        let schema = build_ast_schema(&document).unwrap();

        assert_eq!(schema.query_type.as_deref(), Some("Query"));
        assert_eq!(schema.mutation_type, None);
        let todos = schema.get_type("Query").and_then(|q| q.field("todos")).unwrap();
        assert_eq!(todos.field_type.to_string(), "[Todo!]!");
        assert_eq!(todos.arguments[0].default_value.as_deref(), Some("false"));
        let title = schema.get_type("Todo").and_then(|t| t.field("title")).unwrap();
        assert_eq!(title.deprecation_reason.as_deref(), Some("use name"));
        assert!(schema.get_type("Boolean").unwrap().is_builtin());
        assert!(schema.directive("include").is_some());
    }

    #[test]
    fn it_honours_the_schema_definition() {
        let document = parse("schema { query: Root } type Root { ok: Boolean }").unwrap();
        let schema = build_ast_schema(&document).unwrap();
        assert_eq!(schema.query_type.as_deref(), Some("Root"));
    }

    #[test]
    fn it_rejects_unknown_and_duplicate_types() {
        let unknown = build_ast_schema(&parse("type Query { me: User }").unwrap()).unwrap_err();
        match unknown {
            SchemaError::Build(message) => assert!(message.contains("\"User\"")),
            other => panic!("unexpected error {:?}", other),
        }

        let duplicate = build_ast_schema(&parse("scalar A scalar A").unwrap()).unwrap_err();
        assert_eq!(duplicate, SchemaError::Build("there can be only one type named \"A\"".to_string()));
    }

    #[test]
    fn it_rejects_executable_definitions() {
        assert!(build_ast_schema(&parse("{ me }").unwrap()).is_err());
    }
}

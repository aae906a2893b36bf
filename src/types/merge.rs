use log::debug;

use crate::types::definition::*;
use crate::types::errors::SchemaError;

/// Merges schemas left to right.
///
/// Types with the same name are combined: fields, input fields, enum values,
/// interfaces and union members are unioned, and a field defined again by a
/// later schema replaces the earlier one. The first schema to declare a root
/// operation type keeps it.
pub fn merge_schemas(schemas: &[&Schema]) -> Result<Schema, SchemaError> {
    let mut merged = Schema::default();

    for schema in schemas {
        merged.description = merged.description.take().or_else(|| schema.description.clone());
        merged.query_type = merged.query_type.take().or_else(|| schema.query_type.clone());
        merged.mutation_type = merged.mutation_type.take().or_else(|| schema.mutation_type.clone());
        merged.subscription_type = merged.subscription_type.take().or_else(|| schema.subscription_type.clone());

        for (name, definition) in &schema.types {
            let combined = match merged.types.remove(name) {
                Some(existing) => merge_type(existing, definition)?,
                None => definition.clone(),
            };
            merged.types.insert(name.clone(), combined);
        }

        for (name, directive) in &schema.directives {
            if merged.directives.insert(name.clone(), directive.clone()).is_some() {
                debug!("directive @{} redefined while merging schemas", name);
            }
        }
    }

    Ok(merged)
}

fn merge_type(existing: TypeDefinition, incoming: &TypeDefinition) -> Result<TypeDefinition, SchemaError> {
    match (existing, incoming) {
        (TypeDefinition::Scalar(mut left), &TypeDefinition::Scalar(ref right)) => {
            left.description = right.description.clone().or(left.description);
            left.specified_by_url = right.specified_by_url.clone().or(left.specified_by_url);
            Ok(TypeDefinition::Scalar(left))
        }
        (TypeDefinition::Object(left), &TypeDefinition::Object(ref right)) => {
            Ok(TypeDefinition::Object(merge_object(left, right)))
        }
        (TypeDefinition::Interface(left), &TypeDefinition::Interface(ref right)) => {
            Ok(TypeDefinition::Interface(merge_object(left, right)))
        }
        (TypeDefinition::Union(mut left), &TypeDefinition::Union(ref right)) => {
            left.description = right.description.clone().or(left.description);
            union_names(&mut left.possible_types, &right.possible_types);
            Ok(TypeDefinition::Union(left))
        }
        (TypeDefinition::Enum(mut left), &TypeDefinition::Enum(ref right)) => {
            left.description = right.description.clone().or(left.description);
            for value in &right.values {
                match left.values.iter_mut().find(|v| v.name == value.name) {
                    Some(existing) => *existing = value.clone(),
                    None => left.values.push(value.clone()),
                }
            }
            Ok(TypeDefinition::Enum(left))
        }
        (TypeDefinition::InputObject(mut left), &TypeDefinition::InputObject(ref right)) => {
            left.description = right.description.clone().or(left.description);
            for field in &right.fields {
                match left.fields.iter_mut().find(|f| f.name == field.name) {
                    Some(existing) => *existing = field.clone(),
                    None => left.fields.push(field.clone()),
                }
            }
            Ok(TypeDefinition::InputObject(left))
        }
        (left, right) => Err(SchemaError::Merge(format!(
            "type \"{}\" is defined as both {} and {}",
            left.name(),
            left.kind_name(),
            right.kind_name()
        ))),
    }
}

fn merge_object(mut left: Object, right: &Object) -> Object {
    left.description = right.description.clone().or(left.description);
    union_names(&mut left.interfaces, &right.interfaces);
    for field in &right.fields {
        match left.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field.clone(),
            None => left.fields.push(field.clone()),
        }
    }
    left
}

fn union_names(target: &mut Vec<String>, names: &[String]) {
    for name in names {
        if !target.contains(name) {
            target.push(name.clone());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::language::parse;
    use crate::types::build::build_ast_schema;

    fn schema(sdl: &str) -> Schema {
        build_ast_schema(&parse(sdl).unwrap()).unwrap()
    }

    #[test]
    fn it_unions_fields_of_shared_types() {
        let remote = schema("type Query { users: [User] } type User { id: ID! }");
        let local = schema("type Query { version: String } type User { name: String } enum Role { ADMIN }");
        let merged = merge_schemas(&[&remote, &local]).unwrap();

        let query = merged.get_type("Query").unwrap();
        assert!(query.field("users").is_some());
        assert!(query.field("version").is_some());
        let user = merged.get_type("User").unwrap();
        assert_eq!(user.fields().unwrap().len(), 2);
        assert!(merged.get_type("Role").is_some());
        assert_eq!(merged.query_type.as_deref(), Some("Query"));
    }

    #[test]
    fn it_keeps_the_first_root_types() {
        let remote = schema("schema { query: Root } type Root { a: Int }");
        let local = schema("type Query { b: Int }");
        let merged = merge_schemas(&[&remote, &local]).unwrap();
        assert_eq!(merged.query_type.as_deref(), Some("Root"));
    }

    #[test]
    fn it_rejects_kind_conflicts() {
        let left = schema("type Query { a: Thing } type Thing { id: ID }");
        let right = schema("scalar Thing");
        let error = merge_schemas(&[&left, &right]).unwrap_err();
        assert_eq!(
            error,
            SchemaError::Merge("type \"Thing\" is defined as both OBJECT and SCALAR".to_string())
        );
    }
}

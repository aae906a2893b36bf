//! The standard introspection query and a client schema built from its result.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::definition::*;
use crate::types::errors::SchemaError;

pub const INTROSPECTION_OPERATION_NAME: &str = "IntrospectionQuery";

pub const INTROSPECTION_QUERY: &str = r#"
    query IntrospectionQuery {
      __schema {
        queryType { name }
        mutationType { name }
        subscriptionType { name }
        types {
          ...FullType
        }
        directives {
          name
          description
          locations
          args {
            ...InputValue
          }
        }
      }
    }

    fragment FullType on __Type {
      kind
      name
      description
      fields(includeDeprecated: true) {
        name
        description
        args {
          ...InputValue
        }
        type {
          ...TypeRef
        }
        isDeprecated
        deprecationReason
      }
      inputFields {
        ...InputValue
      }
      interfaces {
        ...TypeRef
      }
      enumValues(includeDeprecated: true) {
        name
        description
        isDeprecated
        deprecationReason
      }
      possibleTypes {
        ...TypeRef
      }
    }

    fragment InputValue on __InputValue {
      name
      description
      type { ...TypeRef }
      defaultValue
    }

    fragment TypeRef on __Type {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
                ofType {
                  kind
                  name
                  ofType {
                    kind
                    name
                    ofType {
                      kind
                      name
                    }
                  }
                }
              }
            }
          }
        }
      }
    }
"#;

/// Body of an introspection response: `data` may be missing when the server
/// answered with errors only.
#[derive(Debug, Deserialize)]
pub struct IntrospectionResponse {
    pub data: Option<IntrospectionQuery>,
    #[serde(default)]
    pub errors: Option<Vec<ResponseError>>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseError {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectionQuery {
    #[serde(rename = "__schema")]
    pub schema: IntrospectionSchema,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    #[serde(default)]
    pub description: Option<String>,
    pub query_type: Option<NamedTypeRef>,
    #[serde(default)]
    pub mutation_type: Option<NamedTypeRef>,
    #[serde(default)]
    pub subscription_type: Option<NamedTypeRef>,
    pub types: Vec<IntrospectionType>,
    #[serde(default)]
    pub directives: Vec<IntrospectionDirective>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedTypeRef {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionType {
    pub kind: TypeKind,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub specified_by_url: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<IntrospectionField>>,
    #[serde(default)]
    pub input_fields: Option<Vec<IntrospectionInputValue>>,
    #[serde(default)]
    pub interfaces: Option<Vec<IntrospectionTypeRef>>,
    #[serde(default)]
    pub enum_values: Option<Vec<IntrospectionEnumValue>>,
    #[serde(default)]
    pub possible_types: Option<Vec<IntrospectionTypeRef>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionTypeRef {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<IntrospectionTypeRef>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionField {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub args: Vec<IntrospectionInputValue>,
    #[serde(rename = "type")]
    pub field_type: IntrospectionTypeRef,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionInputValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub value_type: IntrospectionTypeRef,
    #[serde(default)]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionEnumValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionDirective {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub args: Vec<IntrospectionInputValue>,
    #[serde(default)]
    pub is_repeatable: bool,
}

/// Decodes a response body into the introspection result it carries.
pub fn parse_introspection_response(body: &str) -> Result<IntrospectionQuery, SchemaError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| SchemaError::InvalidResponse(e.to_string()))?;
    let response: IntrospectionResponse =
        serde_json::from_value(value).map_err(|e| SchemaError::Introspection(e.to_string()))?;

    match response.data {
        Some(data) => Ok(data),
        None => {
            let messages = response
                .errors
                .unwrap_or_default()
                .into_iter()
                .map(|error| error.message)
                .collect::<Vec<_>>();
            match messages.is_empty() {
                true => Err(SchemaError::Introspection("response has no data".to_string())),
                false => Err(SchemaError::Introspection(messages.join("; "))),
            }
        }
    }
}

/// Builds a schema from an introspection result, checking that every
/// referenced type is present.
pub fn build_client_schema(introspection: &IntrospectionQuery) -> Result<Schema, SchemaError> {
    let source = &introspection.schema;
    let mut types = BTreeMap::new();

    for introspected in &source.types {
        let definition = build_type(introspected)?;
        types.insert(introspected.name.clone(), definition);
    }

    let mut directives = BTreeMap::new();
    for directive in &source.directives {
        directives.insert(
            directive.name.clone(),
            DirectiveDefinition {
                name: directive.name.clone(),
                description: directive.description.clone(),
                arguments: build_input_values(&directive.args)?,
                locations: directive.locations.clone(),
                repeatable: directive.is_repeatable,
            },
        );
    }

    let schema = Schema {
        description: source.description.clone(),
        query_type: source.query_type.as_ref().map(|t| t.name.clone()),
        mutation_type: source.mutation_type.as_ref().map(|t| t.name.clone()),
        subscription_type: source.subscription_type.as_ref().map(|t| t.name.clone()),
        types: types,
        directives: directives,
    };

    check_references(&schema)?;
    Ok(schema)
}

fn build_type(introspected: &IntrospectionType) -> Result<TypeDefinition, SchemaError> {
    let name = introspected.name.clone();
    let description = introspected.description.clone();

    match introspected.kind {
        TypeKind::Scalar => Ok(TypeDefinition::Scalar(Scalar {
            name: name,
            description: description,
            specified_by_url: introspected.specified_by_url.clone(),
        })),
        TypeKind::Object | TypeKind::Interface => {
            let fields = introspected
                .fields
                .as_ref()
                .ok_or_else(|| SchemaError::Introspection(format!("missing fields for type {}", name)))?;
            let object = Object {
                name: name.clone(),
                description: description,
                interfaces: named_refs(introspected.interfaces.as_deref().unwrap_or(&[]))?,
                fields: fields.iter().map(build_field).collect::<Result<Vec<_>, _>>()?,
            };
            match introspected.kind {
                TypeKind::Object => Ok(TypeDefinition::Object(object)),
                _ => Ok(TypeDefinition::Interface(object)),
            }
        }
        TypeKind::Union => {
            let possible_types = introspected
                .possible_types
                .as_ref()
                .ok_or_else(|| SchemaError::Introspection(format!("missing possibleTypes for union {}", name)))?;
            Ok(TypeDefinition::Union(Union {
                name: name,
                description: description,
                possible_types: named_refs(possible_types)?,
            }))
        }
        TypeKind::Enum => {
            let values = introspected
                .enum_values
                .as_ref()
                .ok_or_else(|| SchemaError::Introspection(format!("missing enumValues for enum {}", name)))?;
            Ok(TypeDefinition::Enum(Enum {
                name: name,
                description: description,
                values: values
                    .iter()
                    .map(|value| EnumValue {
                        name: value.name.clone(),
                        description: value.description.clone(),
                        deprecation_reason: deprecation(value.is_deprecated, &value.deprecation_reason),
                    })
                    .collect(),
            }))
        }
        TypeKind::InputObject => {
            let fields = introspected
                .input_fields
                .as_ref()
                .ok_or_else(|| SchemaError::Introspection(format!("missing inputFields for input {}", name)))?;
            Ok(TypeDefinition::InputObject(InputObject {
                name: name,
                description: description,
                fields: build_input_values(fields)?,
            }))
        }
        TypeKind::List | TypeKind::NonNull => Err(SchemaError::Introspection(format!(
            "named type {} cannot be a list or non-null wrapper",
            name
        ))),
    }
}

fn build_field(field: &IntrospectionField) -> Result<Field, SchemaError> {
    Ok(Field {
        name: field.name.clone(),
        description: field.description.clone(),
        arguments: build_input_values(&field.args)?,
        field_type: build_type_ref(&field.field_type)?,
        deprecation_reason: deprecation(field.is_deprecated, &field.deprecation_reason),
    })
}

fn build_input_values(values: &[IntrospectionInputValue]) -> Result<Vec<InputValue>, SchemaError> {
    values
        .iter()
        .map(|value| {
            Ok(InputValue {
                name: value.name.clone(),
                description: value.description.clone(),
                value_type: build_type_ref(&value.value_type)?,
                default_value: value.default_value.clone(),
            })
        })
        .collect()
}

fn build_type_ref(type_ref: &IntrospectionTypeRef) -> Result<TypeRef, SchemaError> {
    match type_ref.kind {
        TypeKind::List | TypeKind::NonNull => {
            let inner = type_ref.of_type.as_ref().ok_or_else(|| {
                SchemaError::Introspection("decorated type deeper than introspection query".to_string())
            })?;
            let inner = build_type_ref(inner)?;
            match type_ref.kind {
                TypeKind::List => Ok(TypeRef::List(Box::new(inner))),
                _ => Ok(TypeRef::NonNull(Box::new(inner))),
            }
        }
        _ => match type_ref.name {
            Some(ref name) => Ok(TypeRef::Named(name.clone())),
            None => Err(SchemaError::Introspection("type reference without a name".to_string())),
        },
    }
}

fn named_refs(refs: &[IntrospectionTypeRef]) -> Result<Vec<String>, SchemaError> {
    refs.iter()
        .map(|type_ref| {
            type_ref
                .name
                .clone()
                .ok_or_else(|| SchemaError::Introspection("type reference without a name".to_string()))
        })
        .collect()
}

fn deprecation(is_deprecated: bool, reason: &Option<String>) -> Option<String> {
    match is_deprecated {
        true => Some(reason.clone().unwrap_or_else(|| "No longer supported".to_string())),
        false => None,
    }
}

/// Every root, field, argument, interface and member type must be defined.
pub(crate) fn check_references(schema: &Schema) -> Result<(), SchemaError> {
    let known = |name: &str| schema.types.contains_key(name) || BUILTIN_SCALARS.contains(&name);
    let missing = |name: &str| {
        SchemaError::Introspection(format!(
            "unknown type \"{}\"; ensure that a full introspection query is used in order to build a client schema",
            name
        ))
    };

    let roots = [&schema.query_type, &schema.mutation_type, &schema.subscription_type];
    for root in roots.iter().filter_map(|root| root.as_deref()) {
        if !known(root) {
            return Err(missing(root));
        }
    }

    for definition in schema.types.values() {
        let mut referenced: Vec<&str> = vec![];
        match *definition {
            TypeDefinition::Object(ref object) | TypeDefinition::Interface(ref object) => {
                referenced.extend(object.interfaces.iter().map(String::as_str));
                for field in &object.fields {
                    referenced.push(field.field_type.named_type());
                    referenced.extend(field.arguments.iter().map(|arg| arg.value_type.named_type()));
                }
            }
            TypeDefinition::Union(ref union) => {
                referenced.extend(union.possible_types.iter().map(String::as_str))
            }
            TypeDefinition::InputObject(ref input) => {
                referenced.extend(input.fields.iter().map(|field| field.value_type.named_type()))
            }
            TypeDefinition::Scalar(_) | TypeDefinition::Enum(_) => {}
        }
        if let Some(name) = referenced.into_iter().find(|name| !known(name)) {
            return Err(missing(name));
        }
    }

    for directive in schema.directives.values() {
        if let Some(arg) = directive.arguments.iter().find(|arg| !known(arg.value_type.named_type())) {
            return Err(missing(arg.value_type.named_type()));
        }
    }

    Ok(())
}

use std::collections::BTreeMap;
use std::fmt;

use crate::language::kinds::OperationType;

pub const BUILTIN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];
pub const BUILTIN_DIRECTIVES: &[&str] = &["skip", "include", "deprecated", "specifiedBy", "oneOf"];

/// A GraphQL schema: root operation types, named types and directives.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub description: Option<String>,
    pub query_type: Option<String>,
    pub mutation_type: Option<String>,
    pub subscription_type: Option<String>,
    pub types: BTreeMap<String, TypeDefinition>,
    pub directives: BTreeMap<String, DirectiveDefinition>,
}

impl Schema {
    pub fn root_type_name(&self, operation: OperationType) -> Option<&str> {
        match operation {
            OperationType::Query => self.query_type.as_deref(),
            OperationType::Mutation => self.mutation_type.as_deref(),
            OperationType::Subscription => self.subscription_type.as_deref(),
        }
    }

    pub fn root_type(&self, operation: OperationType) -> Option<&TypeDefinition> {
        self.root_type_name(operation).and_then(|name| self.get_type(name))
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn directive(&self, name: &str) -> Option<&DirectiveDefinition> {
        self.directives.get(name)
    }

    /// Named types that are neither built-in scalars nor introspection types.
    pub fn user_types(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values().filter(|t| !t.is_builtin() && !t.is_introspection())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefinition {
    Scalar(Scalar),
    Object(Object),
    Interface(Object),
    Union(Union),
    Enum(Enum),
    InputObject(InputObject),
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match *self {
            TypeDefinition::Scalar(ref t) => &t.name,
            TypeDefinition::Object(ref t) | TypeDefinition::Interface(ref t) => &t.name,
            TypeDefinition::Union(ref t) => &t.name,
            TypeDefinition::Enum(ref t) => &t.name,
            TypeDefinition::InputObject(ref t) => &t.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match *self {
            TypeDefinition::Scalar(ref t) => t.description.as_deref(),
            TypeDefinition::Object(ref t) | TypeDefinition::Interface(ref t) => t.description.as_deref(),
            TypeDefinition::Union(ref t) => t.description.as_deref(),
            TypeDefinition::Enum(ref t) => t.description.as_deref(),
            TypeDefinition::InputObject(ref t) => t.description.as_deref(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match *self {
            TypeDefinition::Scalar(_) => "SCALAR",
            TypeDefinition::Object(_) => "OBJECT",
            TypeDefinition::Interface(_) => "INTERFACE",
            TypeDefinition::Union(_) => "UNION",
            TypeDefinition::Enum(_) => "ENUM",
            TypeDefinition::InputObject(_) => "INPUT_OBJECT",
        }
    }

    /// Output fields, for object and interface types.
    pub fn fields(&self) -> Option<&[Field]> {
        match *self {
            TypeDefinition::Object(ref t) | TypeDefinition::Interface(ref t) => Some(&t.fields),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().and_then(|fields| fields.iter().find(|field| field.name == name))
    }

    /// Scalars and enums; these take no selection set.
    pub fn is_leaf(&self) -> bool {
        match *self {
            TypeDefinition::Scalar(_) | TypeDefinition::Enum(_) => true,
            _ => false,
        }
    }

    pub fn is_composite(&self) -> bool {
        match *self {
            TypeDefinition::Object(_) | TypeDefinition::Interface(_) | TypeDefinition::Union(_) => true,
            _ => false,
        }
    }

    pub fn is_builtin(&self) -> bool {
        match *self {
            TypeDefinition::Scalar(ref t) => BUILTIN_SCALARS.contains(&t.name.as_str()),
            _ => false,
        }
    }

    pub fn is_introspection(&self) -> bool {
        self.name().starts_with("__")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    pub name: String,
    pub description: Option<String>,
    pub specified_by_url: Option<String>,
}

/// Object and interface types.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub name: String,
    pub description: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    pub name: String,
    pub description: Option<String>,
    pub possible_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputObject {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<InputValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputValue>,
    pub field_type: TypeRef,
    pub deprecation_reason: Option<String>,
}

/// Arguments and input object fields.
#[derive(Debug, Clone, PartialEq)]
pub struct InputValue {
    pub name: String,
    pub description: Option<String>,
    pub value_type: TypeRef,
    /// Default value as GraphQL source text.
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveDefinition {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputValue>,
    pub locations: Vec<String>,
    pub repeatable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: &str) -> TypeRef {
        TypeRef::Named(name.to_string())
    }

    pub fn named_type(&self) -> &str {
        match *self {
            TypeRef::Named(ref name) => name,
            TypeRef::List(ref inner) | TypeRef::NonNull(ref inner) => inner.named_type(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TypeRef::Named(ref name) => f.write_str(name),
            TypeRef::List(ref inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(ref inner) => write!(f, "{}!", inner),
        }
    }
}

use crate::language::kinds::{Kinds, OperationType};
use crate::language::lexer::Source;

#[derive(PartialEq, Debug, Clone)]
pub struct Document {
    pub loc: Option<Location>,
    pub definitions: Vec<Definition>,
}

impl Document {
    pub fn kind(&self) -> Kinds {
        Kinds::Document
    }

    pub fn operations(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.definitions.iter().filter_map(|definition| match *definition {
            Definition::Operation(ref operation) => Some(operation),
            _ => None,
        })
    }

    pub fn fragments(&self) -> impl Iterator<Item = &FragmentDefinition> {
        self.definitions.iter().filter_map(|definition| match *definition {
            Definition::Fragment(ref fragment) => Some(fragment),
            _ => None,
        })
    }

    /// Finds the operation whose name equals `name`. An absent name only
    /// matches an anonymous operation.
    pub fn operation(&self, name: Option<&str>) -> Option<&OperationDefinition> {
        self.operations()
            .find(|operation| operation.name.as_ref().map(|n| n.value.as_str()) == name)
    }

    pub fn fragment(&self, name: &str) -> Option<&FragmentDefinition> {
        self.fragments().find(|fragment| fragment.name.value == name)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum Definition {
    Operation(OperationDefinition),
    Fragment(FragmentDefinition),
    Schema(SchemaDefinition),
    Type(TypeDefinition),
    Directive(DirectiveDefinition),
}

impl Definition {
    pub fn kind(&self) -> Kinds {
        match *self {
            Definition::Operation(_) => Kinds::OperationDefinition,
            Definition::Fragment(_) => Kinds::FragmentDefinition,
            Definition::Schema(_) => Kinds::SchemaDefinition,
            Definition::Type(ref definition) => definition.kind(),
            Definition::Directive(_) => Kinds::DirectiveDefinition,
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct OperationDefinition {
    pub loc: Option<Location>,
    pub operation: OperationType,
    pub name: Option<Name>,
    pub variable_definitions: Vec<VariableDefinition>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}

#[derive(PartialEq, Debug, Clone)]
pub struct FragmentDefinition {
    pub loc: Option<Location>,
    pub name: Name,
    pub type_condition: Name,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}

#[derive(PartialEq, Debug, Clone)]
pub struct VariableDefinition {
    pub loc: Option<Location>,
    pub variable: Name,
    pub var_type: Type,
    pub default_value: Option<Value>,
    pub directives: Vec<Directive>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct SelectionSet {
    pub loc: Option<Location>,
    pub selections: Vec<Selection>,
}

#[derive(PartialEq, Debug, Clone)]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

impl Selection {
    pub fn kind(&self) -> Kinds {
        match *self {
            Selection::Field(_) => Kinds::Field,
            Selection::FragmentSpread(_) => Kinds::FragmentSpread,
            Selection::InlineFragment(_) => Kinds::InlineFragment,
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Field {
    pub loc: Option<Location>,
    pub alias: Option<Name>,
    pub name: Name,
    pub arguments: Vec<Argument>,
    pub directives: Vec<Directive>,
    pub selection_set: Option<SelectionSet>,
}

impl Field {
    /// The key this field's value is returned under.
    pub fn response_key(&self) -> &str {
        self.alias.as_ref().unwrap_or(&self.name).value.as_str()
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct FragmentSpread {
    pub loc: Option<Location>,
    pub name: Name,
    pub directives: Vec<Directive>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct InlineFragment {
    pub loc: Option<Location>,
    pub type_condition: Option<Name>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Location {
    pub start: usize,
    pub end: usize,
    pub source: Option<Source>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Name {
    pub loc: Option<Location>,
    pub value: String,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Argument {
    pub loc: Option<Location>,
    pub name: Name,
    pub value: Value,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Directive {
    pub loc: Option<Location>,
    pub name: Name,
    pub arguments: Vec<Argument>,
}

#[derive(PartialEq, Debug, Clone)]
pub enum Value {
    IntValue { value: String, loc: Option<Location> },
    FloatValue { value: String, loc: Option<Location> },
    StringValue { value: String, block: bool, loc: Option<Location> },
    BooleanValue { value: bool, loc: Option<Location> },
    NullValue { loc: Option<Location> },
    EnumValue { value: String, loc: Option<Location> },
    ArrayValue { values: Vec<Value>, loc: Option<Location> },
    ObjectValue { fields: Vec<ObjectField>, loc: Option<Location> },
    VariableValue { name: Name, loc: Option<Location> },
}

impl Value {
    pub fn kind(&self) -> Kinds {
        match *self {
            Value::IntValue { .. } => Kinds::Int,
            Value::FloatValue { .. } => Kinds::Float,
            Value::StringValue { .. } => Kinds::String,
            Value::BooleanValue { .. } => Kinds::Boolean,
            Value::NullValue { .. } => Kinds::Null,
            Value::EnumValue { .. } => Kinds::Enum,
            Value::ArrayValue { .. } => Kinds::Array,
            Value::ObjectValue { .. } => Kinds::Object,
            Value::VariableValue { .. } => Kinds::Variable,
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct ObjectField {
    pub loc: Option<Location>,
    pub name: Name,
    pub value: Value,
}

#[derive(PartialEq, Debug, Clone)]
pub enum Type {
    Named(Name),
    List(Box<Type>, Option<Location>),
    NonNull(Box<Type>, Option<Location>),
}

impl Type {
    pub fn kind(&self) -> Kinds {
        match *self {
            Type::Named(_) => Kinds::NamedType,
            Type::List(..) => Kinds::ListType,
            Type::NonNull(..) => Kinds::NonNullType,
        }
    }

    /// The named type at the bottom of any list and non-null wrappers.
    pub fn named_type(&self) -> &Name {
        match *self {
            Type::Named(ref name) => name,
            Type::List(ref inner, _) | Type::NonNull(ref inner, _) => inner.named_type(),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct SchemaDefinition {
    pub loc: Option<Location>,
    pub description: Option<String>,
    pub directives: Vec<Directive>,
    pub operation_types: Vec<OperationTypeDefinition>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct OperationTypeDefinition {
    pub loc: Option<Location>,
    pub operation: OperationType,
    pub type_name: Name,
}

#[derive(PartialEq, Debug, Clone)]
pub enum TypeDefinition {
    Scalar(ScalarTypeDefinition),
    Object(ObjectTypeDefinition),
    Interface(ObjectTypeDefinition),
    Union(UnionTypeDefinition),
    Enum(EnumTypeDefinition),
    InputObject(InputObjectTypeDefinition),
}

impl TypeDefinition {
    pub fn kind(&self) -> Kinds {
        match *self {
            TypeDefinition::Scalar(_) => Kinds::ScalarTypeDefinition,
            TypeDefinition::Object(_) => Kinds::ObjectTypeDefinition,
            TypeDefinition::Interface(_) => Kinds::InterfaceTypeDefinition,
            TypeDefinition::Union(_) => Kinds::UnionTypeDefinition,
            TypeDefinition::Enum(_) => Kinds::EnumTypeDefinition,
            TypeDefinition::InputObject(_) => Kinds::InputObjectTypeDefinition,
        }
    }

    pub fn name(&self) -> &Name {
        match *self {
            TypeDefinition::Scalar(ref d) => &d.name,
            TypeDefinition::Object(ref d) | TypeDefinition::Interface(ref d) => &d.name,
            TypeDefinition::Union(ref d) => &d.name,
            TypeDefinition::Enum(ref d) => &d.name,
            TypeDefinition::InputObject(ref d) => &d.name,
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct ScalarTypeDefinition {
    pub loc: Option<Location>,
    pub description: Option<String>,
    pub name: Name,
    pub directives: Vec<Directive>,
}

/// Shared by `type` and `interface` definitions.
#[derive(PartialEq, Debug, Clone)]
pub struct ObjectTypeDefinition {
    pub loc: Option<Location>,
    pub description: Option<String>,
    pub name: Name,
    pub interfaces: Vec<Name>,
    pub directives: Vec<Directive>,
    pub fields: Vec<FieldDefinition>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct UnionTypeDefinition {
    pub loc: Option<Location>,
    pub description: Option<String>,
    pub name: Name,
    pub directives: Vec<Directive>,
    pub types: Vec<Name>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct EnumTypeDefinition {
    pub loc: Option<Location>,
    pub description: Option<String>,
    pub name: Name,
    pub directives: Vec<Directive>,
    pub values: Vec<EnumValueDefinition>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct EnumValueDefinition {
    pub loc: Option<Location>,
    pub description: Option<String>,
    pub name: Name,
    pub directives: Vec<Directive>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct InputObjectTypeDefinition {
    pub loc: Option<Location>,
    pub description: Option<String>,
    pub name: Name,
    pub directives: Vec<Directive>,
    pub fields: Vec<InputValueDefinition>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct FieldDefinition {
    pub loc: Option<Location>,
    pub description: Option<String>,
    pub name: Name,
    pub arguments: Vec<InputValueDefinition>,
    pub field_type: Type,
    pub directives: Vec<Directive>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct InputValueDefinition {
    pub loc: Option<Location>,
    pub description: Option<String>,
    pub name: Name,
    pub value_type: Type,
    pub default_value: Option<Value>,
    pub directives: Vec<Directive>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct DirectiveDefinition {
    pub loc: Option<Location>,
    pub description: Option<String>,
    pub name: Name,
    pub arguments: Vec<InputValueDefinition>,
    pub repeatable: bool,
    pub locations: Vec<Name>,
}

use std::fmt;

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Kinds {
    Document,

    OperationDefinition,
    FragmentDefinition,
    VariableDefinition,

    SelectionSet,
    Field,
    FragmentSpread,
    InlineFragment,

    Argument,
    Directive,
    Name,

    Int,
    Float,
    String,
    Boolean,
    Null,
    Enum,
    Array,
    Object,
    ObjectField,
    Variable,

    NamedType,
    ListType,
    NonNullType,

    SchemaDefinition,
    ScalarTypeDefinition,
    ObjectTypeDefinition,
    InterfaceTypeDefinition,
    UnionTypeDefinition,
    EnumTypeDefinition,
    InputObjectTypeDefinition,
    DirectiveDefinition,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match *self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
            OperationType::Subscription => "subscription",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Checks an executable document against a schema.
//!
//! Diagnostics only: a document that fails validation still parses, and the
//! editor keeps showing its preview.

use std::fmt;

use crate::language::ast::{self, Directive, Document, Selection, SelectionSet};
use crate::language::errors::line_and_column;
use crate::language::lexer::Source;
use crate::types::definition::{Schema, TypeDefinition};

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub message: String,
    pub position: Option<usize>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ValidationError {
    fn new(message: String, loc: &Option<ast::Location>) -> ValidationError {
        ValidationError {
            message: message,
            position: loc.as_ref().map(|loc| loc.start),
        }
    }

    /// One-based line and column of the error, when it has a position.
    pub fn line_column(&self, source: &Source) -> Option<(usize, usize)> {
        self.position.map(|position| line_and_column(source.body(), position))
    }
}

pub fn validate(schema: &Schema, document: &Document) -> Vec<ValidationError> {
    let mut validator = Validator {
        schema: schema,
        document: document,
        errors: vec![],
    };

    for operation in document.operations() {
        validator.check_directives(&operation.directives);
        match schema.root_type(operation.operation) {
            Some(root) => validator.check_selection_set(root, &operation.selection_set),
            None => validator.errors.push(ValidationError::new(
                format!("Schema is not configured for {} operations.", operation.operation),
                &operation.loc,
            )),
        }
    }

    for fragment in document.fragments() {
        validator.check_directives(&fragment.directives);
        match validator.composite_type(&fragment.type_condition) {
            Some(parent) => validator.check_selection_set(parent, &fragment.selection_set),
            None => continue,
        }
    }

    validator.errors
}

struct Validator<'a> {
    schema: &'a Schema,
    document: &'a Document,
    errors: Vec<ValidationError>,
}

impl<'a> Validator<'a> {
    fn check_selection_set(&mut self, parent: &'a TypeDefinition, selection_set: &'a SelectionSet) {
        for selection in &selection_set.selections {
            match *selection {
                Selection::Field(ref field) => self.check_field(parent, field),
                Selection::FragmentSpread(ref spread) => {
                    self.check_directives(&spread.directives);
                    // fragment bodies are checked once, against their own type condition
                    if self.document.fragment(&spread.name.value).is_none() {
                        self.errors.push(ValidationError::new(
                            format!("Unknown fragment \"{}\".", spread.name.value),
                            &spread.name.loc,
                        ));
                    }
                }
                Selection::InlineFragment(ref inline) => {
                    self.check_directives(&inline.directives);
                    let target = match inline.type_condition {
                        Some(ref name) => self.composite_type(name),
                        None => Some(parent),
                    };
                    if let Some(target) = target {
                        self.check_selection_set(target, &inline.selection_set);
                    }
                }
            }
        }
    }

    fn check_field(&mut self, parent: &'a TypeDefinition, field: &'a ast::Field) {
        self.check_directives(&field.directives);

        let name = field.name.value.as_str();
        if name == "__typename" {
            if field.selection_set.is_some() {
                self.leaf_with_selection(name, "String!", field);
            }
            return;
        }
        if name == "__schema" || name == "__type" {
            return;
        }

        let definition = match parent.field(name) {
            Some(definition) => definition,
            None => {
                let message = match *parent {
                    TypeDefinition::Union(_) => format!(
                        "Cannot query field \"{}\" on type \"{}\". Did you mean to use an inline fragment?",
                        name,
                        parent.name()
                    ),
                    _ => format!("Cannot query field \"{}\" on type \"{}\".", name, parent.name()),
                };
                self.errors.push(ValidationError::new(message, &field.name.loc));
                return;
            }
        };

        for argument in &field.arguments {
            if !definition.arguments.iter().any(|a| a.name == argument.name.value) {
                self.errors.push(ValidationError::new(
                    format!(
                        "Unknown argument \"{}\" on field \"{}.{}\".",
                        argument.name.value,
                        parent.name(),
                        name
                    ),
                    &argument.name.loc,
                ));
            }
        }

        let field_type = match self.schema.get_type(definition.field_type.named_type()) {
            Some(field_type) => field_type,
            None => return,
        };
        match (field_type.is_leaf(), &field.selection_set) {
            (true, &Some(_)) => {
                let type_name = definition.field_type.to_string();
                self.leaf_with_selection(name, &type_name, field)
            }
            (false, &None) => self.errors.push(ValidationError::new(
                format!(
                    "Field \"{}\" of type \"{}\" must have a selection of subfields. Did you mean \"{} {{ ... }}\"?",
                    name, definition.field_type, name
                ),
                &field.loc,
            )),
            (false, &Some(ref selection_set)) => self.check_selection_set(field_type, selection_set),
            (true, &None) => {}
        }
    }

    fn leaf_with_selection(&mut self, name: &str, type_name: &str, field: &ast::Field) {
        self.errors.push(ValidationError::new(
            format!(
                "Field \"{}\" must not have a selection since type \"{}\" has no subfields.",
                name, type_name
            ),
            &field.loc,
        ));
    }

    fn composite_type(&mut self, name: &ast::Name) -> Option<&'a TypeDefinition> {
        match self.schema.get_type(&name.value) {
            Some(definition) if definition.is_composite() => Some(definition),
            Some(_) => {
                self.errors.push(ValidationError::new(
                    format!("Fragment cannot condition on non composite type \"{}\".", name.value),
                    &name.loc,
                ));
                None
            }
            None => {
                self.errors.push(ValidationError::new(format!("Unknown type \"{}\".", name.value), &name.loc));
                None
            }
        }
    }

    fn check_directives(&mut self, directives: &[Directive]) {
        for directive in directives {
            if self.schema.directive(&directive.name.value).is_none() {
                self.errors.push(ValidationError::new(
                    format!("Unknown directive \"@{}\".", directive.name.value),
                    &directive.name.loc,
                ));
            }
        }
    }
}

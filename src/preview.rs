//! The preview pane: what it shows for the current pipeline state, and a
//! plain-text outline of a document for terminals.

use std::sync::Arc;

use crate::language::ast::{Definition, Directive, Document, Selection, SelectionSet};
use crate::language::printer::print_directives;
use crate::pipeline::EditorError;

pub const EMPTY_MESSAGE: &str = "Add your query in the editor first";

#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Error(String),
    Empty,
    Document(Arc<Document>),
}

impl Preview {
    /// An error hides the document; no document means there is nothing to
    /// preview yet.
    pub fn new(error: Option<&EditorError>, document: Option<Arc<Document>>) -> Preview {
        match (error, document) {
            (Some(error), _) => Preview::Error(error.to_string()),
            (None, None) => Preview::Empty,
            (None, Some(document)) => Preview::Document(document),
        }
    }

    pub fn render(&self) -> String {
        match *self {
            Preview::Error(ref message) => format!("Error: {}", message),
            Preview::Empty => EMPTY_MESSAGE.to_string(),
            Preview::Document(ref document) => outline(document),
        }
    }
}

/// One line per definition and per selected field, indented by depth.
/// Directives such as `@fabrixView` are kept since they decide how a field
/// is rendered.
pub fn outline(document: &Document) -> String {
    let mut lines = vec![];
    for definition in &document.definitions {
        match *definition {
            Definition::Operation(ref operation) => {
                let name = operation.name.as_ref().map_or("<anonymous>", |n| n.value.as_str());
                lines.push(format!("{} {}{}", operation.operation, name, directives(&operation.directives)));
                outline_selections(&operation.selection_set, 1, &mut lines);
            }
            Definition::Fragment(ref fragment) => {
                lines.push(format!(
                    "fragment {} on {}{}",
                    fragment.name.value,
                    fragment.type_condition.value,
                    directives(&fragment.directives)
                ));
                outline_selections(&fragment.selection_set, 1, &mut lines);
            }
            _ => {}
        }
    }
    lines.join("\n")
}

fn outline_selections(selection_set: &SelectionSet, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for selection in &selection_set.selections {
        match *selection {
            Selection::Field(ref field) => {
                let label = match field.alias {
                    Some(ref alias) => format!("{}: {}", alias.value, field.name.value),
                    None => field.name.value.clone(),
                };
                lines.push(format!("{}{}{}", indent, label, directives(&field.directives)));
                if let Some(ref selection_set) = field.selection_set {
                    outline_selections(selection_set, depth + 1, lines);
                }
            }
            Selection::FragmentSpread(ref spread) => {
                lines.push(format!("{}...{}{}", indent, spread.name.value, directives(&spread.directives)));
            }
            Selection::InlineFragment(ref inline) => {
                let condition = inline
                    .type_condition
                    .as_ref()
                    .map_or(String::new(), |t| format!(" on {}", t.value));
                lines.push(format!("{}...{}{}", indent, condition, directives(&inline.directives)));
                outline_selections(&inline.selection_set, depth + 1, lines);
            }
        }
    }
}

fn directives(directives: &[Directive]) -> String {
    match directives.is_empty() {
        true => String::new(),
        false => format!(" {}", print_directives(directives)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::language::parse;

    #[test]
    fn errors_win_over_documents() {
        let document = Arc::new(parse("{ a }").unwrap());
        let error = EditorError::Runtime("render failed".to_string());
        assert_eq!(
            Preview::new(Some(&error), Some(document.clone())).render(),
            "Error: render failed"
        );
        assert_eq!(Preview::new(None, None).render(), "Add your query in the editor first");
        assert_eq!(Preview::new(None, Some(document.clone())), Preview::Document(document));
    }

    #[test]
    fn it_outlines_operations_and_fragments() {
        let document = parse(
            r#"
            query Users { users @fabrixView(input: [{ field: "id", config: { hidden: true } }]) { id ...Bits } }
            fragment Bits on User { me: name ... on Admin { level } }
            "#,
        )
        .unwrap();

        assert_eq!(
            outline(&document),
            "query Users\n\
             \x20 users @fabrixView(input: [{field: \"id\", config: {hidden: true}}])\n\
             \x20   id\n\
             \x20   ...Bits\n\
             fragment Bits on User\n\
             \x20 me: name\n\
             \x20 ... on Admin\n\
             \x20   level"
        );
    }
}

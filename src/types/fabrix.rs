//! Directives understood by the schema-driven preview renderer.
//!
//! The fragment is merged into every loaded schema so that queries using the
//! view directives validate and autocomplete against any endpoint.

use crate::language::lexer::Source;
use crate::language::parser::{ParseOptions, Parser};
use crate::types::build::build_ast_schema;
use crate::types::definition::Schema;
use crate::types::errors::SchemaError;

pub const SCHEMA_DEFINITION: &str = r#"
"""
Renders the annotated field as a read-only view: a table for lists, a set of
labelled values otherwise.
"""
directive @fabrixView(input: [FabrixComponentFieldsInput!]) on FIELD

"""
Renders the annotated mutation or query field as a form built from its
arguments.
"""
directive @fabrixForm(input: [FabrixComponentFieldsInput!]) on FIELD

"Per-field rendering options."
input FabrixComponentFieldsInput {
  "Dot separated path of the field the options apply to."
  field: String!
  config: FabrixComponentFieldConfigInput!
}

input FabrixComponentFieldConfigInput {
  label: String
  hidden: Boolean
  gridCol: Int
  index: Int
  componentType: FabrixComponentTypeInput
}

input FabrixComponentTypeInput {
  name: String!
  props: [FabrixComponentCustomPropInput!]
}

input FabrixComponentCustomPropInput {
  name: String!
  value: FabrixAny
}

"Any JSON value."
scalar FabrixAny
"#;

/// The bundled fragment as a schema.
pub fn schema_definition() -> Result<Schema, SchemaError> {
    let document = Parser::parse(Source::named(SCHEMA_DEFINITION, "fabrix.graphql"), ParseOptions::no_location())
        .map_err(|e| SchemaError::Build(e.to_string()))?;
    build_ast_schema(&document)
}

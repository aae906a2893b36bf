//! The schema model: definitions, builders, merging, printing and
//! validation of executable documents.

pub mod build;
pub mod definition;
pub mod errors;
pub mod fabrix;
pub mod introspection;
pub mod merge;
pub mod printer;
pub mod validate;

pub use self::build::build_ast_schema;
pub use self::definition::{Schema, TypeDefinition, TypeRef};
pub use self::errors::SchemaError;
pub use self::introspection::{build_client_schema, INTROSPECTION_QUERY};
pub use self::merge::merge_schemas;
pub use self::printer::print_schema;
pub use self::validate::{validate, ValidationError};

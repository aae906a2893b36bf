use thiserror::Error;

/// Why a schema could not be loaded or built.
///
/// Causes are kept as text so a failed status can be cloned and compared.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("failed to fetch schema: {0}")]
    Network(String),
    #[error("schema endpoint returned a body that is not JSON: {0}")]
    InvalidResponse(String),
    #[error("invalid or incomplete introspection result: {0}")]
    Introspection(String),
    #[error("invalid schema definition: {0}")]
    Build(String),
    #[error("cannot merge schemas: {0}")]
    Merge(String),
    #[error("unknown error in fetching schema")]
    Unknown,
}

//! The core of a GraphQL query editor.
//!
//! An [`EditorSession`] loads the endpoint's schema by introspection, turns
//! editor text into a parsed document for the preview after a short quiet
//! period, runs operations submitted from the query explorer and keeps the
//! last result for the response view. An optional assistant drafts queries
//! against the loaded schema.

#[macro_use]
pub mod language;
pub mod chat;
pub mod client;
pub mod config;
pub mod debounce;
pub mod executor;
pub mod pipeline;
pub mod preview;
pub mod schema_loader;
pub mod session;
pub mod types;

pub use crate::config::Config;
pub use crate::executor::{DispatchError, FetcherParams, OperationResult, PlaceholderResponse};
pub use crate::pipeline::{strip_comments, EditorError};
pub use crate::preview::Preview;
pub use crate::schema_loader::SchemaStatus;
pub use crate::session::EditorSession;

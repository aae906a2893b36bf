//! Runs the operations the query explorer submits.
//!
//! The explorer expects a fetch result back, but the real response goes to
//! the result store that backs the response tab; the explorer only receives
//! a placeholder.

use std::sync::Arc;

use log::{info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::client::{ClientError, GraphQlClient, OperationResponse};
use crate::language;
use crate::language::errors::ParseError;
use crate::language::kinds::OperationType;
use crate::language::printer::print_operation;

/// The JSON body the explorer posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetcherParams {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
    #[serde(default, rename = "operationName", skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("invalid request body: {0}")]
    InvalidRequest(String),
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("no operation named {}", .0.as_deref().unwrap_or("<anonymous>"))]
    OperationNotFound(Option<String>),
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(OperationType),
}

/// What the explorer gets back in place of the real response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceholderResponse;

impl PlaceholderResponse {
    pub fn json(&self) -> Value {
        json!({ "message": "see the response in the json tab" })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult {
    Data(Value),
    Error(ClientError),
}

impl OperationResult {
    /// Data wins over an error when the server sent both.
    pub fn from_response(response: OperationResponse) -> Option<OperationResult> {
        match response {
            OperationResponse { data: Some(data), .. } => Some(OperationResult::Data(data)),
            OperationResponse { error: Some(error), .. } => Some(OperationResult::Error(error)),
            _ => None,
        }
    }

    /// Two-space indented JSON, as shown in the response tab.
    pub fn to_json(&self) -> String {
        let rendered = match *self {
            OperationResult::Data(ref data) => serde_json::to_string_pretty(data),
            OperationResult::Error(ref error) => serde_json::to_string_pretty(error),
        };
        rendered.unwrap_or_else(|e| format!("{{\"message\": \"{}\"}}", e))
    }
}

/// The last operation result. Clones share it.
#[derive(Clone, Debug, Default)]
pub struct ResultStore(Arc<Mutex<Option<OperationResult>>>);

impl ResultStore {
    pub fn new() -> ResultStore {
        ResultStore::default()
    }

    pub fn get(&self) -> Option<OperationResult> {
        self.0.lock().clone()
    }

    pub fn set(&self, result: Option<OperationResult>) {
        *self.0.lock() = result;
    }
}

pub struct Executor {
    client: Arc<dyn GraphQlClient>,
    results: ResultStore,
}

impl Executor {
    pub fn new(client: Arc<dyn GraphQlClient>, results: ResultStore) -> Executor {
        Executor {
            client: client,
            results: results,
        }
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    /// Runs the operation described by a JSON request body.
    pub async fn execute(&self, body: &str) -> Result<PlaceholderResponse, DispatchError> {
        let params: FetcherParams =
            serde_json::from_str(body).map_err(|e| DispatchError::InvalidRequest(e.to_string()))?;
        self.execute_params(params).await
    }

    /// Mutations are sent as written. Queries are sent as the printed form of
    /// the selected operation, which leaves out the other definitions in the
    /// document. Subscriptions are not supported.
    pub async fn execute_params(&self, params: FetcherParams) -> Result<PlaceholderResponse, DispatchError> {
        let document = language::parse(&params.query)?;
        let name = params.operation_name.as_deref();
        let operation = document
            .operation(name)
            .ok_or_else(|| DispatchError::OperationNotFound(params.operation_name.clone()))?;

        let response = match operation.operation {
            OperationType::Mutation => {
                info!("dispatching mutation {}", name.unwrap_or("<anonymous>"));
                self.client.mutation(&params.query, params.variables).await
            }
            OperationType::Query => {
                info!("dispatching query {}", name.unwrap_or("<anonymous>"));
                self.client.query(&print_operation(operation), params.variables).await
            }
            OperationType::Subscription => {
                warn!("refusing to dispatch subscription {}", name.unwrap_or("<anonymous>"));
                return Err(DispatchError::UnsupportedOperation(OperationType::Subscription));
            }
        };

        if let Some(ref error) = response.error {
            warn!("operation failed: {}", error);
        }
        self.results.set(OperationResult::from_response(response));
        Ok(PlaceholderResponse)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::client::GraphQlError;

    #[test]
    fn results_prefer_data_over_errors() {
        let error = ClientError::graphql(vec![GraphQlError {
            message: "partial".to_string(),
            path: None,
            extensions: None,
        }]);

        let both = OperationResponse {
            data: Some(json!({ "a": 1 })),
            error: Some(error.clone()),
        };
        assert_eq!(OperationResult::from_response(both), Some(OperationResult::Data(json!({ "a": 1 }))));

        let failed = OperationResponse {
            data: None,
            error: Some(error.clone()),
        };
        assert_eq!(OperationResult::from_response(failed), Some(OperationResult::Error(error)));

        assert_eq!(OperationResult::from_response(OperationResponse::default()), None);
    }

    #[test]
    fn data_renders_as_indented_json() {
        let result = OperationResult::Data(json!({ "user": { "name": "Luke" } }));
        assert_eq!(result.to_json(), "{\n  \"user\": {\n    \"name\": \"Luke\"\n  }\n}");
    }

    #[test]
    fn params_accept_a_null_operation_name() {
        let params: FetcherParams =
            serde_json::from_str(r#"{"query":"{ a }","variables":null,"operationName":null}"#).unwrap();
        assert_eq!(params.operation_name, None);
        assert_eq!(params.variables, None);
    }

    #[test]
    fn the_placeholder_points_at_the_json_tab() {
        assert_eq!(
            PlaceholderResponse.json(),
            json!({ "message": "see the response in the json tab" })
        );
    }
}

//! GraphQL over HTTP for the operations run from the editor.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use parking_lot::RwLock;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The endpoint URL, shared by the schema loader and the client so that
/// editing it in one place retargets both.
#[derive(Clone, Debug)]
pub struct Endpoint(Arc<RwLock<String>>);

impl Endpoint {
    pub fn new(url: &str) -> Endpoint {
        Endpoint(Arc::new(RwLock::new(url.to_string())))
    }

    pub fn get(&self) -> String {
        self.0.read().clone()
    }

    pub fn set(&self, url: &str) {
        *self.0.write() = url.to_string();
    }
}

/// Headers appended to every request sent to the endpoint.
#[derive(Clone, Debug, Default)]
pub struct AdditionalHeaders(Arc<RwLock<BTreeMap<String, String>>>);

impl AdditionalHeaders {
    pub fn new() -> AdditionalHeaders {
        AdditionalHeaders::default()
    }

    pub fn set(&self, name: &str, value: &str) {
        self.0.write().insert(name.to_string(), value.to_string());
    }

    pub fn remove(&self, name: &str) -> Option<String> {
        self.0.write().remove(name)
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.0.read().clone()
    }

    pub fn apply(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        for (name, value) in self.0.read().iter() {
            request = request.header(name.as_str(), value.as_str());
        }
        request
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

/// A failed operation: the transport failed, the server answered with
/// GraphQL errors, or both.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct ClientError {
    pub network_error: Option<String>,
    pub graphql_errors: Vec<GraphQlError>,
}

impl ClientError {
    pub fn network<T: fmt::Display>(error: T) -> ClientError {
        ClientError {
            network_error: Some(error.to_string()),
            graphql_errors: vec![],
        }
    }

    pub fn graphql(errors: Vec<GraphQlError>) -> ClientError {
        ClientError {
            network_error: None,
            graphql_errors: errors,
        }
    }

    pub fn message(&self) -> String {
        let mut lines = vec![];
        if let Some(ref network) = self.network_error {
            lines.push(format!("[Network] {}", network));
        }
        lines.extend(self.graphql_errors.iter().map(|e| format!("[GraphQL] {}", e.message)));
        lines.join("\n")
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl Serialize for ClientError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("CombinedError", 4)?;
        state.serialize_field("name", "CombinedError")?;
        state.serialize_field("message", &self.message())?;
        state.serialize_field("graphQLErrors", &self.graphql_errors)?;
        state.serialize_field("networkError", &self.network_error)?;
        state.end()
    }
}

/// The outcome of one operation. `data` and `error` may both be present
/// when the server returns partial data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OperationResponse {
    pub data: Option<Value>,
    pub error: Option<ClientError>,
}

impl OperationResponse {
    fn failed(error: ClientError) -> OperationResponse {
        OperationResponse { data: None, error: Some(error) }
    }
}

#[async_trait]
pub trait GraphQlClient: Send + Sync {
    async fn query(&self, query: &str, variables: Option<Value>) -> OperationResponse;

    async fn mutation(&self, query: &str, variables: Option<Value>) -> OperationResponse;
}

#[derive(Serialize)]
struct RequestBody<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<Value>,
}

#[derive(Deserialize)]
struct ResponseBody {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Clone)]
pub struct HttpGraphQlClient {
    http: reqwest::Client,
    endpoint: Endpoint,
    headers: AdditionalHeaders,
    timeout: Duration,
}

impl HttpGraphQlClient {
    pub fn new(endpoint: Endpoint, headers: AdditionalHeaders, timeout: Duration) -> HttpGraphQlClient {
        HttpGraphQlClient {
            http: reqwest::Client::new(),
            endpoint: endpoint,
            headers: headers,
            timeout: timeout,
        }
    }

    async fn execute(&self, kind: &str, query: &str, variables: Option<Value>) -> OperationResponse {
        let url = self.endpoint.get();
        info!("sending {} to {}", kind, url);

        let request = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.timeout)
            .json(&RequestBody { query: query, variables: variables });
        let response = match self.headers.apply(request).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} to {} failed: {}", kind, url, e);
                return OperationResponse::failed(ClientError::network(e));
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return OperationResponse::failed(ClientError::network(e)),
        };
        debug!("{} response from {}: {} ({} bytes)", kind, url, status, text.len());

        match serde_json::from_str::<ResponseBody>(&text) {
            Ok(body) => OperationResponse {
                data: body.data.filter(|data| !data.is_null()),
                error: body.errors.filter(|errors| !errors.is_empty()).map(ClientError::graphql),
            },
            Err(_) if !status.is_success() => OperationResponse::failed(ClientError::network(status)),
            Err(e) => OperationResponse::failed(ClientError::network(format!("invalid response body: {}", e))),
        }
    }
}

#[async_trait]
impl GraphQlClient for HttpGraphQlClient {
    async fn query(&self, query: &str, variables: Option<Value>) -> OperationResponse {
        self.execute("query", query, variables).await
    }

    async fn mutation(&self, query: &str, variables: Option<Value>) -> OperationResponse {
        self.execute("mutation", query, variables).await
    }
}

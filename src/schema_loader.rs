//! Loading the endpoint's schema by introspection.
//!
//! The first load runs immediately. Later loads, triggered when the endpoint
//! URL no longer matches the URL of the last result, are debounced so that
//! typing a URL does not fire one request per keystroke.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use parking_lot::Mutex;
use reqwest::header::CONTENT_TYPE;
use serde_json::json;

use crate::client::{AdditionalHeaders, Endpoint};
use crate::debounce::Debouncer;
use crate::types::definition::Schema;
use crate::types::errors::SchemaError;
use crate::types::introspection::{
    build_client_schema, parse_introspection_response, INTROSPECTION_OPERATION_NAME, INTROSPECTION_QUERY,
};
use crate::types::{fabrix, merge};

#[derive(Debug, Clone)]
pub enum SchemaStatus {
    /// Nothing fetched yet.
    Ready,
    Success { url: String, schema: Arc<Schema> },
    Failed { url: String, error: Arc<SchemaError> },
}

impl SchemaStatus {
    /// The URL the status was produced for.
    pub fn url(&self) -> Option<&str> {
        match *self {
            SchemaStatus::Ready => None,
            SchemaStatus::Success { ref url, .. } | SchemaStatus::Failed { ref url, .. } => Some(url),
        }
    }

    pub fn schema(&self) -> Option<Arc<Schema>> {
        match *self {
            SchemaStatus::Success { ref schema, .. } => Some(schema.clone()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<Arc<SchemaError>> {
        match *self {
            SchemaStatus::Failed { ref error, .. } => Some(error.clone()),
            _ => None,
        }
    }

    /// Whether a loaded status is stale for `current_url`.
    pub fn should_refetch(&self, current_url: &str) -> bool {
        self.url().map_or(false, |url| url != current_url)
    }
}

/// Fetches the raw introspection response body for a URL.
#[async_trait]
pub trait SchemaFetcher: Send + Sync {
    async fn introspect(&self, url: &str) -> Result<String, SchemaError>;
}

pub struct HttpSchemaFetcher {
    http: reqwest::Client,
    headers: AdditionalHeaders,
    timeout: Duration,
}

impl HttpSchemaFetcher {
    pub fn new(headers: AdditionalHeaders, timeout: Duration) -> HttpSchemaFetcher {
        HttpSchemaFetcher {
            http: reqwest::Client::new(),
            headers: headers,
            timeout: timeout,
        }
    }
}

#[async_trait]
impl SchemaFetcher for HttpSchemaFetcher {
    async fn introspect(&self, url: &str) -> Result<String, SchemaError> {
        let body = json!({
            "operationName": INTROSPECTION_OPERATION_NAME,
            "query": INTROSPECTION_QUERY,
        });
        let request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.timeout)
            .json(&body);

        let response = self
            .headers
            .apply(request)
            .send()
            .await
            .map_err(|e| SchemaError::Network(e.to_string()))?;
        debug!("introspection response from {}: {}", url, response.status());
        response.text().await.map_err(|e| SchemaError::Network(e.to_string()))
    }
}

/// Runs one introspection round trip and turns the outcome into a status.
/// The client schema is merged with the bundled view directives.
pub async fn fetch_schema(fetcher: &dyn SchemaFetcher, url: &str) -> SchemaStatus {
    match load(fetcher, url).await {
        Ok(schema) => {
            info!("loaded schema from {} ({} types)", url, schema.types.len());
            SchemaStatus::Success {
                url: url.to_string(),
                schema: Arc::new(schema),
            }
        }
        Err(error) => {
            warn!("failed to load schema from {}: {}", url, error);
            SchemaStatus::Failed {
                url: url.to_string(),
                error: Arc::new(error),
            }
        }
    }
}

async fn load(fetcher: &dyn SchemaFetcher, url: &str) -> Result<Schema, SchemaError> {
    let body = fetcher.introspect(url).await?;
    if body.trim().is_empty() {
        return Err(SchemaError::Unknown);
    }
    let introspection = parse_introspection_response(&body)?;
    let remote = build_client_schema(&introspection)?;
    let local = fabrix::schema_definition()?;
    merge::merge_schemas(&[&remote, &local])
}

struct Inner {
    fetcher: Arc<dyn SchemaFetcher>,
    endpoint: Endpoint,
    status: Mutex<SchemaStatus>,
    debouncer: Debouncer,
}

/// Tracks the schema of the current endpoint. Clones share state.
#[derive(Clone)]
pub struct SchemaLoader {
    inner: Arc<Inner>,
}

impl SchemaLoader {
    pub fn new(fetcher: Arc<dyn SchemaFetcher>, endpoint: Endpoint, debounce: Duration) -> SchemaLoader {
        SchemaLoader {
            inner: Arc::new(Inner {
                fetcher: fetcher,
                endpoint: endpoint,
                status: Mutex::new(SchemaStatus::Ready),
                debouncer: Debouncer::new("schema", debounce),
            }),
        }
    }

    pub fn url(&self) -> String {
        self.inner.endpoint.get()
    }

    /// Changes the endpoint. Takes effect on the next `ensure_loaded`.
    pub fn set_url(&self, url: &str) {
        self.inner.endpoint.set(url);
    }

    pub fn status(&self) -> SchemaStatus {
        self.inner.status.lock().clone()
    }

    /// The schema, only while the last load succeeded.
    pub fn schema(&self) -> Option<Arc<Schema>> {
        self.inner.status.lock().schema()
    }

    /// True while a debounced refetch is waiting.
    pub fn is_pending(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    /// Loads the schema if it was never loaded, or schedules a debounced
    /// refetch if the endpoint changed since the last result. Failures are
    /// not retried for an unchanged URL.
    pub async fn ensure_loaded(&self) {
        let url = self.url();
        let status = self.status();

        if let SchemaStatus::Ready = status {
            let status = fetch_schema(&*self.inner.fetcher, &url).await;
            self.store(status);
            return;
        }

        if status.should_refetch(&url) {
            debug!("schema url changed to {}, scheduling refetch", url);
            let loader = self.clone();
            self.inner.debouncer.call(async move {
                let status = fetch_schema(&*loader.inner.fetcher, &url).await;
                loader.store(status);
            });
        }
    }

    // last write wins, even when an older request finishes late
    fn store(&self, status: SchemaStatus) {
        *self.inner.status.lock() = status;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn refetch_only_when_the_url_changed() {
        let url = "http://a/graphql".to_string();
        assert!(!SchemaStatus::Ready.should_refetch(&url));

        let success = SchemaStatus::Success {
            url: url.clone(),
            schema: Arc::new(Schema::default()),
        };
        assert!(!success.should_refetch("http://a/graphql"));
        assert!(success.should_refetch("http://b/graphql"));

        let failed = SchemaStatus::Failed {
            url: url,
            error: Arc::new(SchemaError::Unknown),
        };
        assert!(!failed.should_refetch("http://a/graphql"));
        assert!(failed.should_refetch("http://b/graphql"));
    }
}

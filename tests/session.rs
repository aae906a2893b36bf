extern crate fabrix_editor;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fabrix_editor::chat::{ChatError, Role};
use fabrix_editor::client::{AdditionalHeaders, Endpoint, GraphQlClient, OperationResponse};
use fabrix_editor::schema_loader::SchemaFetcher;
use fabrix_editor::types::errors::SchemaError;
use fabrix_editor::{Config, DispatchError, EditorError, EditorSession, Preview, SchemaStatus};

const INTROSPECTION: &str = include_str!("data/introspection.json");

#[derive(Default)]
struct FakeFetcher {
    urls: Mutex<Vec<String>>,
}

#[async_trait]
impl SchemaFetcher for FakeFetcher {
    async fn introspect(&self, url: &str) -> Result<String, SchemaError> {
        self.urls.lock().push(url.to_string());
        Ok(INTROSPECTION.to_string())
    }
}

#[derive(Default)]
struct FakeClient {
    queries: Mutex<Vec<String>>,
}

#[async_trait]
impl GraphQlClient for FakeClient {
    async fn query(&self, query: &str, _variables: Option<Value>) -> OperationResponse {
        self.queries.lock().push(query.to_string());
        OperationResponse {
            data: Some(json!({ "todos": [] })),
            error: None,
        }
    }

    async fn mutation(&self, query: &str, _variables: Option<Value>) -> OperationResponse {
        self.query(query, None).await
    }
}

fn config(endpoint: &str) -> Config {
    let vars = HashMap::from([
        ("FABRIX_GRAPHQL_ENDPOINT_URL".to_string(), endpoint.to_string()),
        ("FABRIX_SCHEMA_DEBOUNCE_MS".to_string(), "100".to_string()),
        ("FABRIX_PREVIEW_DEBOUNCE_MS".to_string(), "100".to_string()),
    ]);
    Config::from_map(&vars).unwrap()
}

fn session() -> (Arc<FakeFetcher>, Arc<FakeClient>, EditorSession) {
    let config = config("http://a/graphql");
    let fetcher = Arc::new(FakeFetcher::default());
    let client = Arc::new(FakeClient::default());
    let session = EditorSession::with_parts(
        config,
        Endpoint::new("http://a/graphql"),
        AdditionalHeaders::new(),
        fetcher.clone(),
        client.clone(),
    );
    (fetcher, client, session)
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(250)).await;
}

#[tokio::test(start_paused = true)]
async fn the_committed_text_does_not_commit_again() {
    let (_, _, session) = session();

    session.commit_query("{ todos { id } }");
    session.on_edit_query("{ todos { id } }");
    assert!(!session.pipeline().is_pending());

    session.on_edit_query("{ todos { title } }");
    assert!(session.pipeline().is_pending());
    settle().await;
    assert_eq!(session.editor_query(), "{ todos { title } }");
    assert_eq!(session.pipeline().parse_attempts(), 2);
}

#[tokio::test(start_paused = true)]
async fn a_new_url_refetches_the_schema_and_recommits_the_query() {
    let (fetcher, _, session) = session();
    session.load_schema().await;
    session.commit_query("{ todos { id } }");
    assert_eq!(session.schema_status().url(), Some("http://a/graphql"));

    session.set_schema_url("http://b/graphql").await;
    assert_eq!(session.schema_url(), "http://b/graphql");
    assert!(session.schema_loader().is_pending());
    settle().await;

    assert_eq!(*fetcher.urls.lock(), vec!["http://a/graphql".to_string(), "http://b/graphql".to_string()]);
    assert!(matches!(session.schema_status(), SchemaStatus::Success { ref url, .. } if url == "http://b/graphql"));
    assert_eq!(session.pipeline().parse_attempts(), 2);
    assert_eq!(session.editor_query(), "{ todos { id } }");
}

#[tokio::test(start_paused = true)]
async fn diagnostics_use_the_loaded_schema() {
    let (_, _, session) = session();
    session.commit_query("{ todos { id nope } }");
    assert!(session.diagnostics().is_empty());

    session.load_schema().await;
    let messages = session
        .diagnostics()
        .into_iter()
        .map(|d| d.message)
        .collect::<Vec<_>>();
    assert_eq!(messages, vec!["Cannot query field \"nope\" on type \"Todo\".".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn dispatch_failures_show_in_the_preview() {
    let (_, client, session) = session();
    session.commit_query("subscription { todoAdded { id } }");

    let result = session
        .dispatch(r#"{"query":"subscription { todoAdded { id } }"}"#)
        .await;
    assert!(matches!(result, Err(DispatchError::UnsupportedOperation(_))));
    assert!(matches!(session.error(), Some(EditorError::Dispatch(_))));
    assert_eq!(session.preview(), Preview::Error("unsupported operation: subscription".to_string()));
    assert!(client.queries.lock().is_empty());

    // a bad request body only fails the call
    session.commit_query("{ todos { id } }");
    assert!(session.dispatch("nope").await.is_err());
    assert!(session.error().is_none());

    session.dispatch(r#"{"query":"{ todos { id } }"}"#).await.unwrap();
    assert_eq!(session.response_json(), Some("{\n  \"todos\": []\n}".to_string()));
}

#[tokio::test(start_paused = true)]
async fn render_errors_replace_the_preview() {
    let (_, _, session) = session();
    session.commit_query("{ todos { id } }");
    assert!(matches!(session.preview(), Preview::Document(_)));

    session.report_render_error("cannot render todos");
    assert_eq!(session.preview().render(), "Error: cannot render todos");
    assert!(session.parsed_query().is_some());
}

#[tokio::test(start_paused = true)]
async fn chat_needs_a_token_and_follows_the_schema() {
    let (_, _, session) = session();
    assert!(!session.chat_available());
    assert!(matches!(session.ask("hi").await, Err(ChatError::MissingToken)));

    session.set_openai_token("");
    assert!(!session.chat_available());
    session.set_openai_token("sk-test");
    assert!(session.chat_available());

    let before = session.chat().messages();
    assert_eq!(before.len(), 1);
    assert!(!before[0].content.contains("type Todo"));

    session.load_schema().await;
    let after = session.chat().messages();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].role, Role::System);
    assert!(after[0].content.contains("type Todo"));
    assert!(after[0].content.contains("directive @fabrixView"));
}

#[tokio::test]
async fn additional_headers_go_with_every_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("x-tenant", "acme"))
        .and(body_partial_json(json!({ "operationName": "IntrospectionQuery" })))
        .respond_with(ResponseTemplate::new(200).set_body_string(INTROSPECTION))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(header("x-tenant", "acme"))
        .and(body_partial_json(json!({ "query": "{\n  todos {\n    id\n  }\n}" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "todos": [{ "id": "1" }] } })))
        .expect(1)
        .mount(&server)
        .await;

    let session = EditorSession::new(config(&server.uri()));
    session.set_additional_header("x-tenant", "acme");
    assert_eq!(session.additional_headers().snapshot().len(), 1);

    session.load_schema().await;
    assert!(session.schema().is_some());

    session.dispatch(r#"{"query":"{ todos { id } }"}"#).await.unwrap();
    assert_eq!(
        session.response_json(),
        Some("{\n  \"todos\": [\n    {\n      \"id\": \"1\"\n    }\n  ]\n}".to_string())
    );

    assert_eq!(session.remove_additional_header("x-tenant"), Some("acme".to_string()));
}

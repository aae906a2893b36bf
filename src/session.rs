//! The editor session: one owner for the schema, the editor text, the last
//! operation result, the request headers and the chat.
//!
//! Consumers hold a reference to the session and go through its methods;
//! nothing is pushed to them.

use std::sync::Arc;

use log::{debug, info};
use parking_lot::Mutex;

use crate::chat::{ChatError, ChatSession, OpenAiBackend};
use crate::client::{AdditionalHeaders, Endpoint, GraphQlClient, HttpGraphQlClient};
use crate::config::Config;
use crate::executor::{DispatchError, Executor, FetcherParams, OperationResult, PlaceholderResponse, ResultStore};
use crate::language::ast::Document;
use crate::pipeline::{EditPreviewPipeline, EditorError};
use crate::preview::Preview;
use crate::schema_loader::{HttpSchemaFetcher, SchemaFetcher, SchemaLoader, SchemaStatus};
use crate::types::definition::Schema;
use crate::types::validate::{validate, ValidationError};

pub struct EditorSession {
    config: Config,
    headers: AdditionalHeaders,
    loader: SchemaLoader,
    pipeline: EditPreviewPipeline,
    executor: Executor,
    chat: ChatSession,
    // the schema the chat prompt was built from
    chat_schema: Mutex<Option<Arc<Schema>>>,
    openai_token: Mutex<Option<String>>,
}

impl EditorSession {
    /// A session talking HTTP to the configured endpoint.
    pub fn new(config: Config) -> EditorSession {
        let endpoint = Endpoint::new(config.endpoint_url());
        let headers = AdditionalHeaders::new();
        let fetcher = Arc::new(HttpSchemaFetcher::new(headers.clone(), config.http_timeout()));
        let client = Arc::new(HttpGraphQlClient::new(endpoint.clone(), headers.clone(), config.http_timeout()));
        EditorSession::with_parts(config, endpoint, headers, fetcher, client)
    }

    pub fn with_parts(
        config: Config,
        endpoint: Endpoint,
        headers: AdditionalHeaders,
        fetcher: Arc<dyn SchemaFetcher>,
        client: Arc<dyn GraphQlClient>,
    ) -> EditorSession {
        EditorSession {
            loader: SchemaLoader::new(fetcher, endpoint, config.schema_debounce()),
            pipeline: EditPreviewPipeline::new(config.preview_debounce()),
            executor: Executor::new(client, ResultStore::new()),
            chat: ChatSession::new(None),
            chat_schema: Mutex::new(None),
            openai_token: Mutex::new(None),
            headers: headers,
            config: config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // schema

    pub fn schema_url(&self) -> String {
        self.loader.url()
    }

    pub fn schema_status(&self) -> SchemaStatus {
        self.loader.status()
    }

    pub fn schema(&self) -> Option<Arc<Schema>> {
        self.loader.schema()
    }

    pub fn schema_loader(&self) -> &SchemaLoader {
        &self.loader
    }

    pub async fn load_schema(&self) {
        self.loader.ensure_loaded().await;
        self.sync_chat();
    }

    /// Points the session at another endpoint. The committed query goes
    /// through the pipeline again and the schema is refetched for the new
    /// URL once the debounce settles.
    pub async fn set_schema_url(&self, url: &str) {
        info!("schema url set to {}", url);
        self.loader.set_url(url);
        self.pipeline.on_text_changed(&self.pipeline.editor_query());
        self.load_schema().await;
    }

    // editor

    /// Handles a change of the editor text. Text equal to the committed
    /// query is ignored, which stops the editor's echo of the committed text
    /// from scheduling another commit.
    pub fn on_edit_query(&self, raw: &str) {
        if raw == self.pipeline.editor_query() {
            debug!("editor text unchanged, skipping commit");
            return;
        }
        self.pipeline.on_text_changed(raw);
    }

    /// Commits `raw` without waiting for the debounce.
    pub fn commit_query(&self, raw: &str) {
        self.pipeline.commit_now(raw);
    }

    /// Replaces the editor text with a suggested query.
    pub fn use_suggestion(&self, code: &str) {
        self.on_edit_query(code);
    }

    pub fn pipeline(&self) -> &EditPreviewPipeline {
        &self.pipeline
    }

    pub fn editor_query(&self) -> String {
        self.pipeline.editor_query()
    }

    pub fn parsed_query(&self) -> Option<Arc<Document>> {
        self.pipeline.parsed_query()
    }

    pub fn error(&self) -> Option<EditorError> {
        self.pipeline.error()
    }

    pub fn preview(&self) -> Preview {
        Preview::new(self.pipeline.error().as_ref(), self.pipeline.parsed_query())
    }

    /// Surfaces a failure from rendering the preview.
    pub fn report_render_error(&self, message: &str) {
        self.pipeline.report_error(EditorError::Runtime(message.to_string()));
    }

    /// Validation of the parsed query against the loaded schema. Empty when
    /// either is missing.
    pub fn diagnostics(&self) -> Vec<ValidationError> {
        match (self.loader.schema(), self.pipeline.parsed_query()) {
            (Some(schema), Some(document)) => validate(&schema, &document),
            _ => vec![],
        }
    }

    // operations

    pub async fn dispatch(&self, body: &str) -> Result<PlaceholderResponse, DispatchError> {
        let result = self.executor.execute(body).await;
        self.report_dispatch(result)
    }

    pub async fn dispatch_params(&self, params: FetcherParams) -> Result<PlaceholderResponse, DispatchError> {
        let result = self.executor.execute_params(params).await;
        self.report_dispatch(result)
    }

    fn report_dispatch(
        &self,
        result: Result<PlaceholderResponse, DispatchError>,
    ) -> Result<PlaceholderResponse, DispatchError> {
        if let Err(ref error) = result {
            match *error {
                DispatchError::UnsupportedOperation(_) | DispatchError::OperationNotFound(_) => {
                    self.pipeline.report_error(EditorError::Dispatch(error.clone()))
                }
                _ => {}
            }
        }
        result
    }

    pub fn response(&self) -> Option<OperationResult> {
        self.executor.results().get()
    }

    /// The response tab contents.
    pub fn response_json(&self) -> Option<String> {
        self.response().map(|result| result.to_json())
    }

    // headers

    pub fn set_additional_header(&self, name: &str, value: &str) {
        self.headers.set(name, value);
    }

    pub fn remove_additional_header(&self, name: &str) -> Option<String> {
        self.headers.remove(name)
    }

    pub fn additional_headers(&self) -> &AdditionalHeaders {
        &self.headers
    }

    // chat

    /// Held in memory for the lifetime of the session only.
    pub fn set_openai_token(&self, token: &str) {
        *self.openai_token.lock() = Some(token.to_string());
    }

    pub fn chat_available(&self) -> bool {
        self.openai_token.lock().as_ref().map_or(false, |token| !token.is_empty())
    }

    pub fn chat_backend(&self) -> Result<OpenAiBackend, ChatError> {
        let token = self.openai_token.lock().clone().unwrap_or_default();
        OpenAiBackend::new(self.config.openai_base_url(), self.config.openai_model(), &token)
    }

    /// The conversation, restarted first if the schema changed since it began.
    pub fn chat(&self) -> &ChatSession {
        self.sync_chat();
        &self.chat
    }

    pub async fn ask(&self, prompt: &str) -> Result<String, ChatError> {
        let backend = self.chat_backend()?;
        self.chat().submit(&backend, prompt).await
    }

    fn sync_chat(&self) {
        let schema = self.loader.schema();
        let mut current = self.chat_schema.lock();
        let unchanged = match (&*current, &schema) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if !unchanged {
            debug!("schema changed, restarting chat");
            self.chat.reset(schema.as_deref());
            *current = schema;
        }
    }
}

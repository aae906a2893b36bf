//! An assistant that drafts queries for the loaded schema.
//!
//! The conversation starts with a system message holding the printed
//! schema. Replies stream in from an OpenAI compatible endpoint and keep
//! rewriting the last assistant message until the stream ends.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use log::{debug, info, warn};
use parking_lot::Mutex;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::types::definition::Schema;
use crate::types::printer::print_schema;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    #[error("an OpenAI token is required to chat")]
    MissingToken,
    #[error("a reply is still streaming")]
    Busy,
    #[error("completion request failed: {0}")]
    Network(String),
    #[error("completion endpoint answered {status}: {body}")]
    Api { status: u16, body: String },
    #[error("cannot decode completion chunk: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Message {
        Message {
            role: role,
            content: content.to_string(),
        }
    }
}

pub fn schema_prompt(schema: Option<&Schema>) -> String {
    format!(
        "\nYou are a helpful assistant that can answer questions about the following GraphQL schema:\n```graphql\n{}\n```\n",
        schema.map(print_schema).unwrap_or_default()
    )
}

pub type Deltas = BoxStream<'static, Result<String, ChatError>>;

/// Produces a streamed reply to a conversation.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<Deltas, ChatError>;
}

/// Conversation state. Clones share it.
#[derive(Clone)]
pub struct ChatSession {
    messages: Arc<Mutex<Vec<Message>>>,
    streaming: Arc<AtomicBool>,
}

impl ChatSession {
    pub fn new(schema: Option<&Schema>) -> ChatSession {
        ChatSession {
            messages: Arc::new(Mutex::new(vec![Message::new(Role::System, &schema_prompt(schema))])),
            streaming: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts over with a prompt for `schema`.
    pub fn reset(&self, schema: Option<&Schema>) {
        *self.messages.lock() = vec![Message::new(Role::System, &schema_prompt(schema))];
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().clone()
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming.load(Ordering::SeqCst)
    }

    /// Sends `input` and streams the reply into the conversation. Returns the
    /// complete reply.
    pub async fn submit(&self, backend: &dyn CompletionBackend, input: &str) -> Result<String, ChatError> {
        if self.streaming.swap(true, Ordering::SeqCst) {
            return Err(ChatError::Busy);
        }
        let _streaming = StreamingGuard(self.streaming.clone());
        self.stream_reply(backend, input).await
    }

    async fn stream_reply(&self, backend: &dyn CompletionBackend, input: &str) -> Result<String, ChatError> {
        let request = {
            let mut messages = self.messages.lock();
            messages.push(Message::new(Role::User, input));
            // the assistant message is always last while the reply streams
            messages.push(Message::new(Role::Assistant, ""));
            messages.clone()
        };

        let mut deltas = backend.complete(&request).await?;
        let mut reply = String::new();
        while let Some(delta) = deltas.next().await {
            reply.push_str(&delta?);
            let mut messages = self.messages.lock();
            if let Some(last) = messages.last_mut() {
                last.content = reply.clone();
            }
        }
        debug!("assistant replied with {} characters", reply.len());
        Ok(reply)
    }
}

/// Clears the streaming flag however `submit` ends, cancellation included.
struct StreamingGuard(Arc<AtomicBool>);

impl Drop for StreamingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A fenced code block with a language tag.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
}

/// Fenced blocks that name a language, in order. These are the parts of a
/// reply that can replace the editor text. Untagged blocks are skipped.
pub fn code_blocks(text: &str) -> Vec<CodeBlock> {
    let mut blocks = vec![];
    let mut open: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        let trimmed = line.trim_start();
        match open.take() {
            Some((language, lines)) if trimmed.starts_with("```") => {
                if !language.is_empty() {
                    blocks.push(CodeBlock {
                        language: language,
                        code: lines.join("\n"),
                    });
                }
            }
            Some((language, mut lines)) => {
                lines.push(line);
                open = Some((language, lines));
            }
            None if trimmed.starts_with("```") => {
                let language = trimmed[3..]
                    .chars()
                    .take_while(|c| c.is_alphanumeric() || *c == '_')
                    .collect::<String>();
                open = Some((language, vec![]));
            }
            None => {}
        }
    }

    blocks
}

pub struct OpenAiBackend {
    http: reqwest::Client,
    base_url: String,
    model: String,
    token: String,
}

impl OpenAiBackend {
    pub fn new(base_url: &str, model: &str, token: &str) -> Result<OpenAiBackend, ChatError> {
        if token.is_empty() {
            return Err(ChatError::MissingToken);
        }
        Ok(OpenAiBackend {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, messages: &[Message]) -> Result<Deltas, ChatError> {
        let url = format!("{}/chat/completions", self.base_url);
        info!("requesting completion from {} with {}", url, self.model);

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "text/event-stream")
            .json(&json!({
                "model": self.model,
                "messages": messages,
                "stream": true,
            }))
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("completion request failed with {}", status);
            return Err(ChatError::Api {
                status: status.as_u16(),
                body: body,
            });
        }

        Ok(deltas(response.bytes_stream().boxed()))
    }
}

struct DeltaState {
    body: BoxStream<'static, reqwest::Result<Bytes>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    done: bool,
}

fn deltas(body: BoxStream<'static, reqwest::Result<Bytes>>) -> Deltas {
    let state = DeltaState {
        body: body,
        decoder: SseDecoder::default(),
        pending: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(delta) = state.pending.pop_front() {
                return Some((Ok(delta), state));
            }
            if state.done {
                return None;
            }
            match state.body.next().await {
                Some(Ok(bytes)) => {
                    for data in state.decoder.push(&bytes) {
                        match decode_chunk(&data) {
                            Ok(Chunk::Done) => {
                                state.done = true;
                                break;
                            }
                            Ok(Chunk::Delta(delta)) => state.pending.push_back(delta),
                            Ok(Chunk::Empty) => {}
                            Err(e) => {
                                state.done = true;
                                return Some((Err(e), state));
                            }
                        }
                    }
                }
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(ChatError::Network(e.to_string())), state));
                }
                None => state.done = true,
            }
        }
    })
    .boxed()
}

/// Splits a server-sent event stream into the payloads of its `data:` lines.
#[derive(Default)]
struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut data = vec![];
        while let Some(end) = self.buffer.iter().position(|b| *b == b'\n') {
            let line = self.buffer.drain(..=end).collect::<Vec<u8>>();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(&['\n', '\r'][..]);
            if let Some(payload) = line.strip_prefix("data:") {
                data.push(payload.strip_prefix(' ').unwrap_or(payload).to_string());
            }
        }
        data
    }
}

#[derive(Debug, PartialEq)]
enum Chunk {
    Delta(String),
    Empty,
    Done,
}

#[derive(Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    delta: CompletionDelta,
}

#[derive(Deserialize, Default)]
struct CompletionDelta {
    content: Option<String>,
}

fn decode_chunk(data: &str) -> Result<Chunk, ChatError> {
    if data.trim() == "[DONE]" {
        return Ok(Chunk::Done);
    }
    let chunk: CompletionChunk = serde_json::from_str(data).map_err(|e| ChatError::Decode(e.to_string()))?;
    match chunk.choices.into_iter().next().and_then(|choice| choice.delta.content) {
        Some(content) if !content.is_empty() => Ok(Chunk::Delta(content)),
        _ => Ok(Chunk::Empty),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn the_decoder_handles_split_lines() {
        let mut decoder = SseDecoder::default();
        assert_eq!(decoder.push(b"data: {\"a\""), Vec::<String>::new());
        assert_eq!(decoder.push(b":1}\r\n\r\n: keep-alive\ndata: [DONE]\n"), vec!["{\"a\":1}", "[DONE]"]);
    }

    #[test]
    fn chunks_decode_to_deltas() {
        assert_eq!(
            decode_chunk(r#"{"choices":[{"delta":{"content":"Hi"}}]}"#),
            Ok(Chunk::Delta("Hi".to_string()))
        );
        assert_eq!(decode_chunk(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#), Ok(Chunk::Empty));
        assert_eq!(decode_chunk("[DONE]"), Ok(Chunk::Done));
        assert!(matches!(decode_chunk("nope"), Err(ChatError::Decode(_))));
    }

    #[test]
    fn code_blocks_need_a_language() {
        let reply = "Try this:\n```graphql\nquery {\n  users { id }\n}\n```\nor\n```\nplain\n```\n";
        assert_eq!(
            code_blocks(reply),
            vec![CodeBlock {
                language: "graphql".to_string(),
                code: "query {\n  users { id }\n}".to_string(),
            }]
        );
    }

    #[test]
    fn the_prompt_embeds_the_schema() {
        assert_eq!(
            schema_prompt(None),
            "\nYou are a helpful assistant that can answer questions about the following GraphQL schema:\n```graphql\n\n```\n"
        );
    }

    #[test]
    fn the_backend_requires_a_token() {
        assert!(matches!(
            OpenAiBackend::new("https://api.openai.com/v1", "gpt-4o-mini", ""),
            Err(ChatError::MissingToken)
        ));
    }
}

//! From raw editor text to the document the preview renders.
//!
//! Text changes are debounced; on commit the text loses its comments, is
//! stored as the committed query and parsed. A failed parse keeps the last
//! good document on screen and records the error next to it.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use parking_lot::Mutex;
use thiserror::Error;

use crate::debounce::Debouncer;
use crate::executor::DispatchError;
use crate::language;
use crate::language::ast::Document;
use crate::language::errors::ParseError;

/// What the preview shows in place of the document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Dispatch(#[from] DispatchError),
    /// Raised while rendering a document that parsed fine.
    #[error("{0}")]
    Runtime(String),
}

/// Removes `#` comments up to the end of their line and trims the result.
/// Line breaks stay, so the remaining text keeps its line numbers.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_comment = false;
    for ch in text.chars() {
        match ch {
            '#' => in_comment = true,
            '\n' | '\r' => {
                in_comment = false;
                out.push(ch);
            }
            _ if in_comment => {}
            _ => out.push(ch),
        }
    }
    out.trim().to_string()
}

#[derive(Default)]
struct State {
    editor_query: String,
    parsed_query: Option<Arc<Document>>,
    error: Option<EditorError>,
    parse_attempts: usize,
}

/// Clones share state.
#[derive(Clone)]
pub struct EditPreviewPipeline {
    state: Arc<Mutex<State>>,
    debouncer: Arc<Debouncer>,
}

impl EditPreviewPipeline {
    pub fn new(debounce: Duration) -> EditPreviewPipeline {
        EditPreviewPipeline {
            state: Arc::new(Mutex::new(State::default())),
            debouncer: Arc::new(Debouncer::new("preview", debounce)),
        }
    }

    /// Schedules a commit of `raw`. Only the last text of a burst of changes
    /// is committed.
    pub fn on_text_changed(&self, raw: &str) {
        let state = self.state.clone();
        let raw = raw.to_string();
        self.debouncer.call(async move { commit(&state, &raw) });
    }

    /// Commits `raw` right away, dropping any scheduled commit.
    pub fn commit_now(&self, raw: &str) {
        self.debouncer.cancel();
        commit(&self.state, raw);
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// The last committed text, comments removed.
    pub fn editor_query(&self) -> String {
        self.state.lock().editor_query.clone()
    }

    pub fn parsed_query(&self) -> Option<Arc<Document>> {
        self.state.lock().parsed_query.clone()
    }

    pub fn error(&self) -> Option<EditorError> {
        self.state.lock().error.clone()
    }

    /// How many commits reached the parser.
    pub fn parse_attempts(&self) -> usize {
        self.state.lock().parse_attempts
    }

    /// Puts an error raised outside the pipeline into the error slot. The
    /// parsed document is left alone.
    pub fn report_error(&self, error: EditorError) {
        debug!("reported editor error: {}", error);
        self.state.lock().error = Some(error);
    }
}

fn commit(state: &Mutex<State>, raw: &str) {
    let query = strip_comments(raw);
    let mut state = state.lock();
    state.editor_query = query.clone();

    if query.is_empty() {
        debug!("committed empty query");
        state.error = None;
        state.parsed_query = None;
        return;
    }

    state.parse_attempts += 1;
    match language::parse(&query) {
        Ok(document) => {
            debug!("committed query with {} definitions", document.definitions.len());
            state.error = None;
            state.parsed_query = Some(Arc::new(document));
        }
        Err(error) => {
            debug!("committed query does not parse: {}", error);
            state.error = Some(EditorError::Parse(error));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strip_comments_removes_comment_spans() {
        assert_eq!(strip_comments("# heading\n{ a }"), "{ a }");
        assert_eq!(strip_comments("{\n  a # why\n  b\n}"), "{\n  a \n  b\n}");
        assert_eq!(strip_comments("{ a } # trailing"), "{ a }");
        assert_eq!(strip_comments("  \n# only\n  "), "");
    }

    #[test]
    fn strip_comments_does_not_spare_strings() {
        assert_eq!(strip_comments("{ a(b: \"#1\") }"), "{ a(b: \"");
    }

    #[test]
    fn commit_now_updates_state_synchronously() {
        let pipeline = EditPreviewPipeline::new(Duration::from_millis(500));

        pipeline.commit_now("{ a }");
        assert_eq!(pipeline.editor_query(), "{ a }");
        assert!(pipeline.parsed_query().is_some());
        assert_eq!(pipeline.error(), None);

        pipeline.commit_now("{ a");
        assert!(pipeline.parsed_query().is_some());
        match pipeline.error() {
            Some(EditorError::Parse(error)) => assert_eq!(error.description, "Syntax Error: Expected Name, found <EOF>."),
            other => panic!("unexpected error {:?}", other),
        }

        pipeline.commit_now("# nothing");
        assert_eq!(pipeline.parsed_query(), None);
        assert_eq!(pipeline.error(), None);
        assert_eq!(pipeline.parse_attempts(), 2);
    }

    #[test]
    fn reported_errors_keep_the_document() {
        let pipeline = EditPreviewPipeline::new(Duration::from_millis(500));
        pipeline.commit_now("{ a }");
        pipeline.report_error(EditorError::Runtime("boom".to_string()));
        assert!(pipeline.parsed_query().is_some());
        assert_eq!(pipeline.error().map(|e| e.to_string()), Some("boom".to_string()));
    }
}

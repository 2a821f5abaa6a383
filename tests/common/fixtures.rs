use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use waypoint::message::Message;
use waypoint::session::{ResearchTransport, SubmitRequest, TransportError};

/// Scriptable in-memory transport that records every interaction.
///
/// Cloning shares the underlying state, so a clone handed to a controller
/// can still be scripted and inspected from the test body.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    submissions: Vec<SubmitRequest>,
    messages: Vec<Message>,
    stop_calls: usize,
    loading: bool,
    reject_next: Option<String>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the backend's reply: appended the way the real transport
    /// appends the streamed answer to the conversation.
    pub fn push_assistant_reply(&self, id: &str, content: &str) {
        let mut state = self.inner.lock().unwrap();
        state.messages.push(Message::assistant(id, content));
        state.loading = false;
    }

    /// Replace the conversation wholesale (for degenerate-case tests).
    pub fn set_messages(&self, messages: Vec<Message>) {
        self.inner.lock().unwrap().messages = messages;
    }

    pub fn submissions(&self) -> Vec<SubmitRequest> {
        self.inner.lock().unwrap().submissions.clone()
    }

    pub fn last_submission(&self) -> Option<SubmitRequest> {
        self.inner.lock().unwrap().submissions.last().cloned()
    }

    pub fn stop_calls(&self) -> usize {
        self.inner.lock().unwrap().stop_calls
    }

    /// Make the next submit fail with the given reason.
    pub fn reject_next_submit(&self, reason: &str) {
        self.inner.lock().unwrap().reject_next = Some(reason.to_string());
    }
}

#[async_trait]
impl ResearchTransport for MockTransport {
    async fn submit(&self, request: SubmitRequest) -> Result<(), TransportError> {
        let mut state = self.inner.lock().unwrap();
        if let Some(message) = state.reject_next.take() {
            return Err(TransportError::SubmitRejected { message });
        }
        // The conversation list is appended to only via submit.
        state.messages = request.messages.clone();
        state.submissions.push(request);
        state.loading = true;
        Ok(())
    }

    fn stop(&self) {
        let mut state = self.inner.lock().unwrap();
        state.stop_calls += 1;
        state.loading = false;
    }

    fn is_loading(&self) -> bool {
        self.inner.lock().unwrap().loading
    }

    fn messages(&self) -> Vec<Message> {
        self.inner.lock().unwrap().messages.clone()
    }
}

/********************
 * Raw event builders
 ********************/

#[allow(dead_code)]
pub fn query_generation_event(queries: &[&str]) -> Value {
    json!({"query-generation": {"queries": queries}})
}

#[allow(dead_code)]
pub fn retrieval_event(sources: &[&str]) -> Value {
    let sources: Vec<Value> = sources.iter().map(|url| json!({"url": url})).collect();
    json!({"retrieval": {"sources": sources}})
}

#[allow(dead_code)]
pub fn reflection_event(is_sufficient: Option<bool>, follow_ups: &[&str]) -> Value {
    match is_sufficient {
        Some(sufficient) => {
            json!({"reflection": {"isSufficient": sufficient, "followUps": follow_ups}})
        }
        None => json!({"reflection": {"followUps": follow_ups}}),
    }
}

#[allow(dead_code)]
pub fn finalize_event() -> Value {
    json!({"finalize": {}})
}

#[allow(dead_code)]
pub fn token_chunk_event(text: &str) -> Value {
    json!({"message": {"content": text}})
}

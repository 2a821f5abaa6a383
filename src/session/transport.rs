//! Boundary to the streaming transport collaborator.
//!
//! The transport owns everything this crate does not: the wire protocol, the
//! conversation message list, retry policy, and the actual backend process.
//! [`ResearchTransport`] is the seam the session controller drives; stream
//! delivery comes back as [`StreamSignal`](super::streaming::StreamSignal)s.

use async_trait::async_trait;
use miette::Diagnostic;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::message::Message;

/// Run submission forwarded to the transport.
///
/// Carries the full conversation (existing messages plus the freshly minted
/// user message) together with the effort-derived research budget and the
/// caller's model choice.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubmitRequest {
    pub messages: Vec<Message>,
    pub initial_query_count: u32,
    pub max_research_loops: u32,
    pub model: String,
}

/// Failure to start or abort a run, surfaced by the transport.
///
/// Opaque to this crate: the controller terminates the run and hands the
/// error to its caller, nothing more.
#[derive(Debug, Error, Diagnostic)]
pub enum TransportError {
    /// The transport refused the submission.
    #[error("submission rejected: {message}")]
    #[diagnostic(
        code(waypoint::transport::submit_rejected),
        help("The backend may be unreachable or the payload oversized. Retry is the transport's concern.")
    )]
    SubmitRejected { message: String },

    /// The transport is not connected.
    #[error("transport unavailable")]
    #[diagnostic(code(waypoint::transport::unavailable))]
    Unavailable,
}

/// Opaque mid-stream failure delivered by the transport.
///
/// Mirrors the shapes a streaming collaborator actually produces: a failure
/// with a human-readable message, an arbitrary structured payload, or nothing
/// usable at all. [`display_text`](Self::display_text) renders the fallback
/// chain the presentation layer expects.
#[derive(Clone, Debug, PartialEq)]
pub enum TransportFault {
    /// Failure carrying a message.
    Message(String),
    /// Structured failure without a message; serialized for display.
    Payload(Value),
    /// Failure carrying nothing renderable.
    Opaque,
}

impl TransportFault {
    /// Fallback text for a fault with no message and no serializable payload.
    pub const UNSERIALIZABLE_TEXT: &'static str = "An un-serializable error occurred.";
    /// Fallback text for a fault carrying nothing at all.
    pub const UNKNOWN_TEXT: &'static str = "An unknown error occurred.";

    /// Render the fault for display: the message if present, else the
    /// serialized payload, else a fixed fallback string.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            TransportFault::Message(message) => message.clone(),
            TransportFault::Payload(payload) => serde_json::to_string(payload)
                .unwrap_or_else(|_| Self::UNSERIALIZABLE_TEXT.to_string()),
            TransportFault::Opaque => Self::UNKNOWN_TEXT.to_string(),
        }
    }
}

impl From<TransportError> for TransportFault {
    fn from(error: TransportError) -> Self {
        TransportFault::Message(error.to_string())
    }
}

/// The streaming transport collaborator.
///
/// Implementations must deliver stream signals in order and serialized; the
/// controller never reorders them. The conversation list is appended to only
/// via [`submit`](Self::submit) — the controller reads it back at stream end
/// to find the archive join key.
#[async_trait]
pub trait ResearchTransport: Send + Sync {
    /// Start (or supersede) a run with the given submission.
    async fn submit(&self, request: SubmitRequest) -> Result<(), TransportError>;

    /// Abort any in-flight stream. Must be safe to call when idle.
    fn stop(&self);

    /// Whether a stream is currently being delivered.
    fn is_loading(&self) -> bool;

    /// Ordered snapshot of the conversation's message list.
    fn messages(&self) -> Vec<Message>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fault_display_prefers_the_message() {
        let fault = TransportFault::Message("connection reset".into());
        assert_eq!(fault.display_text(), "connection reset");
    }

    #[test]
    fn fault_display_serializes_payloads() {
        let fault = TransportFault::Payload(json!({"code": 502, "retryable": false}));
        assert_eq!(fault.display_text(), r#"{"code":502,"retryable":false}"#);
    }

    #[test]
    fn fault_display_falls_back_for_opaque_failures() {
        assert_eq!(
            TransportFault::Opaque.display_text(),
            "An unknown error occurred."
        );
    }

    #[test]
    fn transport_errors_convert_to_faults() {
        let fault: TransportFault = TransportError::Unavailable.into();
        assert_eq!(fault.display_text(), "transport unavailable");
    }
}

//! # Waypoint: Session-State Core for Streaming Research Agents
//!
//! Waypoint observes a long-running, multi-stage research backend that emits
//! an open-ended, order-sensitive stream of named milestone events
//! interleaved with partial answer content, and turns that stream into a
//! live, correctly-merged activity timeline plus a durable per-answer
//! archive — with correct reset, cancel, and supersede semantics across
//! overlapping submissions.
//!
//! ## Core Concepts
//!
//! - **Stages**: Milestone envelopes decoded once at the boundary into a
//!   fixed kind set, classified into display-ready descriptors
//! - **Timeline**: Ordered stage summaries with an append-vs-replace merge
//!   policy per kind
//! - **Archive**: Append-only mapping from a completed answer's message id to
//!   an immutable timeline snapshot
//! - **Session**: The controller state machine driving submit, stream,
//!   error, finish, and cancel over a transport boundary
//!
//! ## Quick Start
//!
//! ### Classifying milestone events
//!
//! ```
//! use serde_json::json;
//! use waypoint::stage::{StageEvent, classify};
//! use waypoint::timeline::Timeline;
//!
//! let mut timeline = Timeline::new();
//! for raw in [
//!     json!({"retrieval": {"sources": []}}),
//!     json!({"retrieval": {"sources": [{"url": "a"}, {"url": "b"}]}}),
//!     json!({"reflection": {"isSufficient": true}}),
//! ] {
//!     if let Some(classified) = StageEvent::from_value(&raw).and_then(|e| classify(&e)) {
//!         timeline.apply_classified(classified);
//!     }
//! }
//!
//! // Both retrieval passes survive; reflection is a singleton.
//! assert_eq!(timeline.len(), 3);
//! assert_eq!(timeline.entries()[2].data, "Search successful, generating final answer.");
//! ```
//!
//! ### Running a session
//!
//! The controller drives any [`session::ResearchTransport`] implementation
//! and consumes the run's stream as [`session::StreamSignal`]s:
//!
//! ```no_run
//! use waypoint::session::{SessionController, signal_conduit};
//! # use async_trait::async_trait;
//! # use waypoint::message::Message;
//! # use waypoint::session::{ResearchTransport, SubmitRequest, TransportError};
//! # struct MyTransport;
//! # #[async_trait]
//! # impl ResearchTransport for MyTransport {
//! #     async fn submit(&self, _request: SubmitRequest) -> Result<(), TransportError> { Ok(()) }
//! #     fn stop(&self) {}
//! #     fn is_loading(&self) -> bool { false }
//! #     fn messages(&self) -> Vec<Message> { Vec::new() }
//! # }
//!
//! # async fn example() -> Result<(), TransportError> {
//! let mut session = SessionController::new(MyTransport);
//! let (signals_tx, signals_rx) = signal_conduit(session.config().stream.buffer_capacity);
//!
//! session.submit("how do transformers work", "high", "gemini-2.5-pro").await?;
//! // ... the transport feeds signals_tx while streaming ...
//! # drop(signals_tx);
//! let _outcome = session.drive(signals_rx.into_stream()).await;
//!
//! for entry in session.live_timeline() {
//!     println!("{}: {}", entry.title, entry.data);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency Model
//!
//! Single-threaded, cooperative, event-driven. Every controller handler
//! takes `&mut self`, so exactly one of submit / event / error / finished /
//! cancel executes at a time — the absence of concurrent mutation is
//! guaranteed structurally, not by locks. All I/O lives behind the
//! transport boundary.
//!
//! ## Module Guide
//!
//! - [`stage`] - Stage kinds, raw envelopes, and the event classifier
//! - [`timeline`] - The live timeline and its merge policy
//! - [`archive`] - Append-only archive of completed run timelines
//! - [`session`] - Controller state machine, transport boundary, config
//! - [`message`] - Conversation messages and role constants
//! - [`telemetry`] - Tracing/miette bootstrap for embedding hosts
//! - [`utils`] - Identifier generation

pub mod archive;
pub mod message;
pub mod session;
pub mod stage;
pub mod telemetry;
pub mod timeline;
pub mod utils;

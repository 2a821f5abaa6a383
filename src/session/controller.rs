//! The session controller: run lifecycle and state machine.
//!
//! [`SessionController`] owns every piece of session-local state — the live
//! timeline, the archive, the completion flag, and the synthesized error
//! message — and composes the classifier, the timeline merge policy, and the
//! archive store over the transport boundary.
//!
//! # State machine
//!
//! ```text
//!             submit               finalize observed
//!   Idle ───────────────▶ Streaming ───────────────▶ Streaming (completion pending)
//!    ▲                        │                             │
//!    │   error / finished /   │                             │ finished → archive
//!    └────────── cancel ──────┴─────────────────────────────┘
//! ```
//!
//! Exactly one of {`submit`, `on_stream_event`, `on_stream_error`,
//! `on_stream_finished`, `cancel`} executes at a time: every handler takes
//! `&mut self`, so the absence of concurrent mutation is structural rather
//! than lock-based.

use futures_util::{Stream, StreamExt, pin_mut};
use std::fmt;
use tracing::instrument;

use crate::archive::ArchiveStore;
use crate::message::Message;
use crate::stage::{StageEvent, classify};
use crate::timeline::Timeline;
use crate::utils::id_generator::IdGenerator;

use super::config::{SearchBudget, SessionConfig};
use super::streaming::StreamSignal;
use super::transport::{ResearchTransport, SubmitRequest, TransportError, TransportFault};

/// Where the session currently is in a run's lifecycle.
///
/// "Streaming with completion pending" is `Streaming` plus the controller's
/// completion flag; it is not a separate variant because every transition out
/// of it is shared with plain `Streaming`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunPhase {
    /// No run in flight.
    #[default]
    Idle,
    /// A run was submitted and its stream has not ended.
    Streaming,
}

/// Result of a submission attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The run was forwarded to the transport.
    Started,
    /// The input was empty or whitespace; nothing changed, nothing was sent.
    IgnoredEmptyInput,
}

impl SubmitOutcome {
    #[must_use]
    pub fn is_started(&self) -> bool {
        matches!(self, SubmitOutcome::Started)
    }
}

/// What happened at stream end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FinishOutcome {
    /// The run's timeline was archived under the final assistant message id.
    Archived { output_id: String },
    /// No archive write; the run's timeline is dropped with the next submit.
    Skipped(ArchiveSkip),
}

/// Named non-error reasons for skipping the archive write at stream end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveSkip {
    /// The terminal stage was never observed during the run.
    CompletionNotObserved,
    /// The transport's conversation list is empty.
    EmptyConversation,
    /// The conversation's last message is not assistant-authored.
    NotAssistantAuthored,
    /// The last assistant message carries no identifier to key the archive.
    MissingOutputId,
}

impl fmt::Display for ArchiveSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ArchiveSkip::CompletionNotObserved => "terminal stage not observed",
            ArchiveSkip::EmptyConversation => "conversation is empty",
            ArchiveSkip::NotAssistantAuthored => "last message not assistant-authored",
            ArchiveSkip::MissingOutputId => "last assistant message has no id",
        };
        write!(f, "{reason}")
    }
}

/// Owns the run lifecycle over a [`ResearchTransport`].
///
/// # Examples
///
/// ```no_run
/// use async_trait::async_trait;
/// use waypoint::message::Message;
/// use waypoint::session::{
///     ResearchTransport, SessionController, SubmitRequest, TransportError,
/// };
///
/// struct NullTransport;
///
/// #[async_trait]
/// impl ResearchTransport for NullTransport {
///     async fn submit(&self, _request: SubmitRequest) -> Result<(), TransportError> {
///         Ok(())
///     }
///     fn stop(&self) {}
///     fn is_loading(&self) -> bool {
///         false
///     }
///     fn messages(&self) -> Vec<Message> {
///         Vec::new()
///     }
/// }
///
/// # async fn example() -> Result<(), TransportError> {
/// let mut session = SessionController::new(NullTransport);
/// session.submit("compare async runtimes", "medium", "gemini-2.5-pro").await?;
/// assert!(session.is_streaming_active());
/// # Ok(())
/// # }
/// ```
pub struct SessionController<T> {
    transport: T,
    config: SessionConfig,
    ids: IdGenerator,
    phase: RunPhase,
    live_timeline: Timeline,
    archive: ArchiveStore,
    completion_pending: bool,
    error_message: Option<Message>,
}

impl<T: ResearchTransport> SessionController<T> {
    /// Creates a controller with the default configuration.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, SessionConfig::default())
    }

    /// Creates a controller with an explicit configuration.
    #[must_use]
    pub fn with_config(transport: T, config: SessionConfig) -> Self {
        Self {
            transport,
            config,
            ids: IdGenerator::new(),
            phase: RunPhase::default(),
            live_timeline: Timeline::new(),
            archive: ArchiveStore::new(),
            completion_pending: false,
            error_message: None,
        }
    }

    /// Submit a new run.
    ///
    /// Empty or whitespace-only input is a complete no-op. Otherwise the
    /// prior run's transient state is superseded (no queuing): the error
    /// message and completion flag are cleared, the live timeline is replaced
    /// with an empty one, and a submission carrying the conversation plus a
    /// freshly minted user message is forwarded to the transport with the
    /// effort-derived budget.
    ///
    /// If the transport rejects the submission, the controller falls back to
    /// [`RunPhase::Idle`] and propagates the error.
    #[instrument(skip_all, fields(session = ?self.config.session_id, effort = %effort, model = %model))]
    pub async fn submit(
        &mut self,
        input: &str,
        effort: &str,
        model: &str,
    ) -> Result<SubmitOutcome, TransportError> {
        if input.trim().is_empty() {
            tracing::debug!("ignoring empty submission");
            return Ok(SubmitOutcome::IgnoredEmptyInput);
        }

        self.error_message = None;
        self.live_timeline = Timeline::new();
        self.completion_pending = false;
        self.phase = RunPhase::Streaming;

        let budget = SearchBudget::for_effort(effort);
        let mut messages = self.transport.messages();
        messages.push(Message::user(&self.ids.generate_message_id(), input));

        tracing::info!(
            queries = budget.initial_query_count,
            loops = budget.max_research_loops,
            conversation_len = messages.len(),
            "submitting run"
        );

        let request = SubmitRequest {
            messages,
            initial_query_count: budget.initial_query_count,
            max_research_loops: budget.max_research_loops,
            model: model.to_string(),
        };
        if let Err(error) = self.transport.submit(request).await {
            self.phase = RunPhase::Idle;
            tracing::warn!(%error, "transport rejected submission");
            return Err(error);
        }
        Ok(SubmitOutcome::Started)
    }

    /// Handle one raw stream event.
    ///
    /// Decodes the envelope once at the boundary, classifies it, and merges
    /// the result into the live timeline. Observing the terminal stage sets
    /// the completion flag; everything unclassifiable is ignored.
    pub fn on_stream_event(&mut self, raw: &serde_json::Value) {
        let Some(event) = StageEvent::from_value(raw) else {
            tracing::trace!("ignoring non-envelope stream value");
            return;
        };
        let Some(classified) = classify(&event) else {
            tracing::trace!(key = event.key(), "event classified to nothing");
            return;
        };

        if classified.kind.is_terminal() {
            self.completion_pending = true;
            tracing::debug!("terminal stage observed; completion pending");
        }
        tracing::debug!(
            kind = %classified.kind,
            data = %classified.descriptor.data,
            "stage update"
        );
        self.live_timeline.apply_classified(classified);
    }

    /// Handle a mid-stream transport fault.
    ///
    /// Ends the run and synthesizes exactly one display-only message; the
    /// fault itself is never propagated further.
    pub fn on_stream_error(&mut self, fault: TransportFault) {
        self.phase = RunPhase::Idle;
        let text = fault.display_text();
        tracing::warn!(error = %text, "stream terminated with transport fault");
        self.error_message = Some(Message::new(
            &self.ids.generate_error_id(),
            Message::ASSISTANT_ERROR,
            &format!("An error occurred: {text}"),
        ));
    }

    /// Handle normal stream end.
    ///
    /// Archives the live timeline under the final assistant message's id when
    /// the completion preconditions hold; otherwise reports the named skip
    /// reason and drops nothing yet — the timeline survives until the next
    /// submit or cancel. Either way the session returns to idle.
    pub fn on_stream_finished(&mut self) -> FinishOutcome {
        self.phase = RunPhase::Idle;
        let outcome = self.try_archive();
        match &outcome {
            FinishOutcome::Archived { output_id } => {
                tracing::info!(
                    output_id = %output_id,
                    entries = self.archive.timeline(output_id).map_or(0, |t| t.len()),
                    "run archived"
                );
            }
            FinishOutcome::Skipped(reason) => {
                tracing::debug!(%reason, "archive skipped");
            }
        }
        outcome
    }

    fn try_archive(&mut self) -> FinishOutcome {
        if !self.completion_pending {
            return FinishOutcome::Skipped(ArchiveSkip::CompletionNotObserved);
        }
        let messages = self.transport.messages();
        let Some(last) = messages.last() else {
            return FinishOutcome::Skipped(ArchiveSkip::EmptyConversation);
        };
        if !last.has_role(Message::ASSISTANT) {
            return FinishOutcome::Skipped(ArchiveSkip::NotAssistantAuthored);
        }
        if last.id.is_empty() {
            return FinishOutcome::Skipped(ArchiveSkip::MissingOutputId);
        }

        self.archive.record(last.id.clone(), &self.live_timeline);
        self.completion_pending = false;
        FinishOutcome::Archived {
            output_id: last.id.clone(),
        }
    }

    /// Abort any in-flight stream and hard-reset to the idle baseline.
    ///
    /// Transient state only: the archive is not transient and survives.
    /// Safe to call when no run is active.
    pub fn cancel(&mut self) {
        self.transport.stop();
        self.phase = RunPhase::Idle;
        self.live_timeline = Timeline::new();
        self.completion_pending = false;
        self.error_message = None;
        tracing::debug!(session = ?self.config.session_id, "session reset to idle baseline");
    }

    /// Drive a run's signal stream to completion.
    ///
    /// Consumes signals in delivery order and dispatches each to its handler;
    /// returns `Some` with the finish outcome once the transport signals
    /// `Finished`, or `None` if the stream was dropped without a terminal
    /// signal (a transport contract violation — the session stays in
    /// whatever state the last signal produced).
    #[instrument(skip_all, fields(session = ?self.config.session_id))]
    pub async fn drive<S>(&mut self, signals: S) -> Option<FinishOutcome>
    where
        S: Stream<Item = StreamSignal>,
    {
        pin_mut!(signals);
        while let Some(signal) = signals.next().await {
            match signal {
                StreamSignal::Event(raw) => self.on_stream_event(&raw),
                StreamSignal::Error(fault) => self.on_stream_error(fault),
                StreamSignal::Finished => return Some(self.on_stream_finished()),
            }
        }
        tracing::warn!("signal stream closed without a terminal Finished signal");
        None
    }

    /// The live timeline for the in-flight (or most recent) run.
    #[must_use]
    pub fn live_timeline(&self) -> &Timeline {
        &self.live_timeline
    }

    /// Archived timelines of completed runs, keyed by output message id.
    #[must_use]
    pub fn archive(&self) -> &ArchiveStore {
        &self.archive
    }

    /// Whether a run's stream is currently active.
    #[must_use]
    pub fn is_streaming_active(&self) -> bool {
        matches!(self.phase, RunPhase::Streaming)
    }

    /// The session's current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// The synthesized error message from the last failed run, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&Message> {
        self.error_message.as_ref()
    }

    /// This session's configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The transport collaborator.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

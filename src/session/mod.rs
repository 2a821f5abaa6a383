//! Session lifecycle: controller state machine, transport boundary, stream
//! plumbing, and configuration.
//!
//! The module is organised around the [`SessionController`], which owns all
//! session-local state, and the [`ResearchTransport`] trait it drives. Stream
//! delivery flows through [`StreamSignal`]s, optionally over the bounded
//! conduit from [`signal_conduit`].

pub mod config;
pub mod controller;
pub mod streaming;
pub mod transport;

pub use config::{API_URL_ENV, DEFAULT_API_URL, Effort, SearchBudget, SessionConfig, StreamConfig};
pub use controller::{ArchiveSkip, FinishOutcome, RunPhase, SessionController, SubmitOutcome};
pub use streaming::{StreamSignal, signal_conduit};
pub use transport::{ResearchTransport, SubmitRequest, TransportError, TransportFault};

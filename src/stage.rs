//! Milestone classification for the research event stream.
//!
//! The backend emits an open-ended sequence of raw JSON envelopes over the
//! run's stream: named milestone events interleaved with partial token
//! content. This module decodes each envelope once at the boundary into a
//! [`StageKind`] and turns it into a display-ready [`StageDescriptor`].
//!
//! Classification is deliberately forgiving: unknown kinds, missing payloads,
//! and malformed payload fields never produce an error. Unknown kinds and
//! token content classify to nothing; malformed payloads degrade to the
//! provisional "in progress" rendering for their kind.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use waypoint::stage::{classify, StageEvent, StageKind};
//!
//! let raw = json!({"retrieval": {"sources": ["a", "b"]}});
//! let event = StageEvent::from_value(&raw).unwrap();
//! let classified = classify(&event).unwrap();
//!
//! assert_eq!(classified.kind, StageKind::Retrieval);
//! assert_eq!(classified.descriptor.title, "Web Research");
//! assert_eq!(classified.descriptor.data, "Gathered 2 sources.");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Envelope key for partial token-stream content.
///
/// Content chunks share the stream with milestone events but are not
/// milestones; they classify to nothing.
pub const TOKEN_STREAM_KEY: &str = "message";

/// Canonical category of a milestone event.
///
/// The raw envelope names its stage kind with a string key; `StageKind` is
/// the explicit union over the recognized set, decoded once when the envelope
/// enters the session. Each kind carries a fixed repeatability flag and a
/// fixed display title.
///
/// Unknown keys decode to `None`, which keeps the stream forward compatible:
/// a newer backend can emit stages this crate does not know about without
/// breaking the timeline.
///
/// # Examples
///
/// ```
/// use waypoint::stage::StageKind;
///
/// assert_eq!(StageKind::decode("retrieval"), Some(StageKind::Retrieval));
/// assert_eq!(StageKind::decode("telemetry-v2"), None);
/// assert!(StageKind::Retrieval.is_repeatable());
/// assert!(StageKind::Finalize.is_terminal());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageKind {
    /// The backend is generating search queries for the current loop.
    QueryGeneration,
    /// A web-research pass gathering sources.
    Retrieval,
    /// The backend is judging whether gathered material suffices.
    Reflection,
    /// Terminal stage: the final answer is being composed.
    Finalize,
}

impl StageKind {
    /// Decode a wire key into a stage kind.
    ///
    /// Returns `None` for unrecognized keys, including [`TOKEN_STREAM_KEY`].
    #[must_use]
    pub fn decode(key: &str) -> Option<Self> {
        match key {
            "query-generation" => Some(StageKind::QueryGeneration),
            "retrieval" => Some(StageKind::Retrieval),
            "reflection" => Some(StageKind::Reflection),
            "finalize" => Some(StageKind::Finalize),
            _ => None,
        }
    }

    /// The wire key this kind decodes from.
    #[must_use]
    pub fn encode(&self) -> &'static str {
        match self {
            StageKind::QueryGeneration => "query-generation",
            StageKind::Retrieval => "retrieval",
            StageKind::Reflection => "reflection",
            StageKind::Finalize => "finalize",
        }
    }

    /// Whether every occurrence of this kind is independently meaningful.
    ///
    /// Repeatable kinds are always appended to the timeline; singleton kinds
    /// replace their existing entry in place.
    #[must_use]
    pub fn is_repeatable(&self) -> bool {
        matches!(self, StageKind::QueryGeneration | StageKind::Retrieval)
    }

    /// Whether this kind marks the run's terminal stage.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, StageKind::Finalize)
    }

    /// Fixed human-readable title for this kind's timeline entries.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            StageKind::QueryGeneration => "Generating Search Queries",
            StageKind::Retrieval => "Web Research",
            StageKind::Reflection => "Reflection",
            StageKind::Finalize => "Finalizing Answer",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

/// Raw milestone envelope: one stage-kind key with an arbitrary payload.
///
/// The backend's wire format is a JSON object with a single entry; the entry
/// key names the stage kind and the value is a possibly-incomplete payload.
/// [`StageEvent::from_value`] performs the boundary decode; everything past
/// it works with the typed envelope.
#[derive(Clone, Debug, PartialEq)]
pub struct StageEvent {
    key: String,
    payload: Value,
}

impl StageEvent {
    /// Build an envelope directly from a key and payload.
    #[must_use]
    pub fn new(key: impl Into<String>, payload: Value) -> Self {
        Self {
            key: key.into(),
            payload,
        }
    }

    /// Decode a raw stream value into an envelope.
    ///
    /// Takes the object's first entry; returns `None` when the value is not
    /// an object or the object is empty. Extra entries are ignored.
    #[must_use]
    pub fn from_value(raw: &Value) -> Option<Self> {
        let map = raw.as_object()?;
        let (key, payload) = map.iter().next()?;
        Some(Self {
            key: key.clone(),
            payload: payload.clone(),
        })
    }

    /// The envelope's stage-kind key, verbatim from the wire.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The decoded stage kind, if the key is recognized.
    #[must_use]
    pub fn kind(&self) -> Option<StageKind> {
        StageKind::decode(&self.key)
    }

    /// The envelope's payload, verbatim from the wire.
    #[must_use]
    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

/// Display-ready summary of a milestone, derived — never copied — from the
/// backend's payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDescriptor {
    /// Fixed title for the stage kind.
    pub title: String,
    /// Rendered progress summary.
    pub data: String,
}

impl StageDescriptor {
    #[must_use]
    pub fn new(title: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            data: data.into(),
        }
    }
}

/// Classifier output: the descriptor paired with its decoded kind.
///
/// Carrying the kind lets the timeline's merge policy and the controller's
/// completion detection key off the enum instead of comparing title strings.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassifiedStage {
    pub kind: StageKind,
    pub descriptor: StageDescriptor,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct QueryGenerationPayload {
    queries: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RetrievalPayload {
    sources: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ReflectionPayload {
    is_sufficient: Option<bool>,
    follow_ups: Vec<String>,
}

/// Lenient payload decode: malformed shapes fall back to the default, which
/// renders as the kind's provisional "in progress" summary.
fn lenient<T: Default + for<'de> Deserialize<'de>>(payload: &Value) -> T {
    serde_json::from_value(payload.clone()).unwrap_or_default()
}

/// Classify a raw envelope into a display-ready stage descriptor.
///
/// Pure function of its input. Returns `None` when the payload is absent
/// (JSON `null`), when the key denotes token-stream content, or when the key
/// is unrecognized. Never errors for malformed payloads.
#[must_use]
pub fn classify(event: &StageEvent) -> Option<ClassifiedStage> {
    if event.payload().is_null() {
        return None;
    }
    let kind = event.kind()?;

    let data = match kind {
        StageKind::QueryGeneration => {
            let payload: QueryGenerationPayload = lenient(event.payload());
            if payload.queries.is_empty() {
                "In progress...".to_string()
            } else {
                format!("Queries: {}", payload.queries.join(", "))
            }
        }
        StageKind::Retrieval => {
            let payload: RetrievalPayload = lenient(event.payload());
            if payload.sources.is_empty() {
                "Searching...".to_string()
            } else {
                format!("Gathered {} sources.", payload.sources.len())
            }
        }
        StageKind::Reflection => {
            let payload: ReflectionPayload = lenient(event.payload());
            match payload.is_sufficient {
                None => "Reflecting on results...".to_string(),
                Some(true) => "Search successful, generating final answer.".to_string(),
                Some(false) => format!(
                    "Need more info, searching for: {}",
                    payload.follow_ups.join(", ")
                ),
            }
        }
        StageKind::Finalize => "Composing and presenting the final answer.".to_string(),
    };

    Some(ClassifiedStage {
        kind,
        descriptor: StageDescriptor::new(kind.title(), data),
    })
}

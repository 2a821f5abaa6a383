//! Session configuration and effort presets.

use std::fmt;

use crate::utils::id_generator::IdGenerator;

/// Environment variable overriding the default transport endpoint.
pub const API_URL_ENV: &str = "WAYPOINT_API_URL";

/// Endpoint used when [`API_URL_ENV`] is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8123";

/// Configuration for one session's controller and its transport.
///
/// `Default` mints a fresh session id, resolves the endpoint from the
/// environment (via `dotenvy`, so a local `.env` file works), and targets the
/// backend's default assistant.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Identifier attached to this session's logs and diagnostics.
    pub session_id: Option<String>,
    /// Endpoint the transport should connect to.
    pub api_url: String,
    /// Backend assistant the transport should address.
    pub assistant_id: String,
    /// Stream-conduit tuning.
    pub stream: StreamConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: Some(IdGenerator::new().generate_run_id()),
            api_url: Self::resolve_api_url(None),
            assistant_id: "agent".to_string(),
            stream: StreamConfig::default(),
        }
    }
}

impl SessionConfig {
    fn resolve_api_url(provided: Option<String>) -> String {
        if let Some(url) = provided {
            return url;
        }
        dotenvy::dotenv().ok();
        std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string())
    }

    pub fn new(
        session_id: Option<String>,
        api_url: Option<String>,
        assistant_id: Option<String>,
    ) -> Self {
        Self {
            session_id,
            api_url: Self::resolve_api_url(api_url),
            assistant_id: assistant_id.unwrap_or_else(|| "agent".to_string()),
            stream: StreamConfig::default(),
        }
    }

    #[must_use]
    pub fn with_stream(mut self, stream: StreamConfig) -> Self {
        self.stream = stream;
        self
    }
}

/// Tuning for the signal conduit between transport and controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamConfig {
    pub buffer_capacity: usize,
}

impl StreamConfig {
    pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

    #[must_use]
    pub fn new(buffer_capacity: usize) -> Self {
        Self {
            buffer_capacity: if buffer_capacity == 0 {
                Self::DEFAULT_BUFFER_CAPACITY
            } else {
                buffer_capacity
            },
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BUFFER_CAPACITY)
    }
}

/// Research effort presets selectable at submission.
///
/// Each preset maps to a fixed [`SearchBudget`]; unrecognized labels carry no
/// budget at all (see [`SearchBudget::for_effort`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    /// Parse an effort label. Unknown labels return `None`.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "low" => Some(Effort::Low),
            "medium" => Some(Effort::Medium),
            "high" => Some(Effort::High),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Effort::Low => "low",
            Effort::Medium => "medium",
            Effort::High => "high",
        }
    }

    /// The fixed research budget for this preset.
    #[must_use]
    pub fn budget(self) -> SearchBudget {
        match self {
            Effort::Low => SearchBudget {
                initial_query_count: 1,
                max_research_loops: 1,
            },
            Effort::Medium => SearchBudget {
                initial_query_count: 3,
                max_research_loops: 3,
            },
            Effort::High => SearchBudget {
                initial_query_count: 5,
                max_research_loops: 10,
            },
        }
    }
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Query and loop limits derived from an effort preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchBudget {
    pub initial_query_count: u32,
    pub max_research_loops: u32,
}

impl SearchBudget {
    /// Map an effort label through the exhaustive preset table.
    ///
    /// `low` → (1, 1), `medium` → (3, 3), `high` → (5, 10); any other label
    /// maps to (0, 0).
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::session::SearchBudget;
    ///
    /// assert_eq!(SearchBudget::for_effort("high").max_research_loops, 10);
    /// assert_eq!(SearchBudget::for_effort("turbo").initial_query_count, 0);
    /// ```
    #[must_use]
    pub fn for_effort(label: &str) -> Self {
        Effort::parse(label).map(Effort::budget).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effort_presets_map_to_fixed_budgets() {
        assert_eq!(
            Effort::Low.budget(),
            SearchBudget {
                initial_query_count: 1,
                max_research_loops: 1
            }
        );
        assert_eq!(
            Effort::Medium.budget(),
            SearchBudget {
                initial_query_count: 3,
                max_research_loops: 3
            }
        );
        assert_eq!(
            Effort::High.budget(),
            SearchBudget {
                initial_query_count: 5,
                max_research_loops: 10
            }
        );
    }

    #[test]
    fn unknown_effort_labels_carry_no_budget() {
        assert_eq!(SearchBudget::for_effort("x"), SearchBudget::default());
        assert_eq!(SearchBudget::for_effort(""), SearchBudget::default());
        // Labels are matched exactly, not case-folded.
        assert_eq!(SearchBudget::for_effort("Low"), SearchBudget::default());
    }

    #[test]
    fn effort_labels_round_trip() {
        for effort in [Effort::Low, Effort::Medium, Effort::High] {
            assert_eq!(Effort::parse(effort.as_str()), Some(effort));
        }
        assert_eq!(Effort::parse("extreme"), None);
    }

    #[test]
    fn stream_config_coerces_zero_capacity() {
        assert_eq!(
            StreamConfig::new(0).buffer_capacity,
            StreamConfig::DEFAULT_BUFFER_CAPACITY
        );
        assert_eq!(StreamConfig::new(16).buffer_capacity, 16);
    }

    #[test]
    fn default_config_mints_a_session_id() {
        let config = SessionConfig::default();
        assert!(config.session_id.is_some());
        assert_eq!(config.assistant_id, "agent");
        assert!(!config.api_url.is_empty());
    }
}

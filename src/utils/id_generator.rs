//! Identifier generation for sessions and messages.
//!
//! Generated IDs follow predictable, parseable formats:
//!
//! - Run IDs: `run-{uuid}`
//! - Message IDs: `msg-{uuid}`
//! - Error-message IDs: `error-{uuid}`
//!
//! The uuid v4 suffix makes every ID unique without shared state, so the
//! generator is freely cloneable.

use uuid::Uuid;

/// Mints prefixed, globally unique identifiers.
///
/// # Examples
///
/// ```
/// use waypoint::utils::IdGenerator;
///
/// let ids = IdGenerator::new();
/// assert!(ids.generate_run_id().starts_with("run-"));
/// assert_ne!(ids.generate_message_id(), ids.generate_message_id());
/// ```
#[derive(Clone, Debug, Default)]
pub struct IdGenerator;

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Identifier for a session or run.
    #[must_use]
    pub fn generate_run_id(&self) -> String {
        format!("run-{}", Uuid::new_v4())
    }

    /// Identifier for a conversation message.
    #[must_use]
    pub fn generate_message_id(&self) -> String {
        format!("msg-{}", Uuid::new_v4())
    }

    /// Identifier for a synthesized error message.
    #[must_use]
    pub fn generate_error_id(&self) -> String {
        format!("error-{}", Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_carry_their_prefix() {
        let ids = IdGenerator::new();
        assert!(ids.generate_run_id().starts_with("run-"));
        assert!(ids.generate_message_id().starts_with("msg-"));
        assert!(ids.generate_error_id().starts_with("error-"));
    }

    #[test]
    fn ids_are_unique() {
        let ids = IdGenerator::new();
        let a = ids.generate_error_id();
        let b = ids.generate_error_id();
        assert_ne!(a, b);
    }
}

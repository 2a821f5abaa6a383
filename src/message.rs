use serde::{Deserialize, Serialize};

/// A message in the session's conversation, with an identifier, a role, and
/// text content.
///
/// Messages are the join point between the live session and the archive: a
/// completed run is archived under the identifier of the conversation's final
/// assistant message. The transport collaborator owns the conversation list;
/// this crate only mints new user messages on submission and synthesizes
/// display-only error messages.
///
/// # Examples
///
/// ```
/// use waypoint::message::Message;
///
/// let user_msg = Message::user("msg-1", "What is the airspeed of a swallow?");
/// let reply = Message::assistant("msg-2", "African or European?");
///
/// assert!(user_msg.has_role(Message::USER));
/// assert!(reply.has_role(Message::ASSISTANT));
/// ```
///
/// # Serialization
///
/// Messages implement `Serialize` and `Deserialize` for JSON/other formats:
/// ```
/// use waypoint::message::Message;
///
/// let msg = Message::user("m1", "test");
/// let json = serde_json::to_string(&msg).unwrap();
/// let parsed: Message = serde_json::from_str(&json).unwrap();
/// assert_eq!(msg, parsed);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier assigned by whoever authored the message.
    ///
    /// Assistant message ids double as archive keys, so the transport must
    /// assign them before signaling stream completion.
    pub id: String,
    /// The role of the message sender (e.g., "user", "assistant").
    ///
    /// Use the constants on [`Message`] for standardized values.
    pub role: String,
    /// The text content of the message.
    pub content: String,
}

impl Message {
    /// User input message role.
    pub const USER: &'static str = "user";
    /// AI assistant response message role.
    pub const ASSISTANT: &'static str = "assistant";
    /// System prompt or instruction message role.
    pub const SYSTEM: &'static str = "system";
    /// Display-only role for messages synthesized from transport faults.
    ///
    /// Never produced by the backend; carried alongside the conversation so
    /// the presentation layer can render the failure in place.
    pub const ASSISTANT_ERROR: &'static str = "assistant-error";

    /// Creates a new message with the specified id, role, and content.
    ///
    /// # Examples
    /// ```
    /// use waypoint::message::Message;
    ///
    /// let msg = Message::new("m1", Message::USER, "Hello!");
    /// assert_eq!(msg.role, "user");
    /// assert_eq!(msg.content, "Hello!");
    /// ```
    #[must_use]
    pub fn new(id: &str, role: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    /// Creates a user message with the specified id and content.
    #[must_use]
    pub fn user(id: &str, content: &str) -> Self {
        Self::new(id, Self::USER, content)
    }

    /// Creates an assistant message with the specified id and content.
    #[must_use]
    pub fn assistant(id: &str, content: &str) -> Self {
        Self::new(id, Self::ASSISTANT, content)
    }

    /// Creates a system message with the specified id and content.
    #[must_use]
    pub fn system(id: &str, content: &str) -> Self {
        Self::new(id, Self::SYSTEM, content)
    }

    /// Returns true if this message has the specified role.
    ///
    /// # Examples
    /// ```
    /// use waypoint::message::Message;
    ///
    /// let msg = Message::user("m1", "Hello");
    /// assert!(msg.has_role(Message::USER));
    /// assert!(!msg.has_role(Message::ASSISTANT));
    /// ```
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }
}

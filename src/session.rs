//! Client session boundary.
//!
//! The gate never owns a session. The host framework hands one in for every
//! request and is responsible for persisting it, signing cookies, expiring it
//! and so on. The gate only reads and writes two keys (see [`SessionKeys`]).

use std::collections::HashMap;

/// Key used for the bound principal's identifier unless configured otherwise.
pub const DEFAULT_USER_ID_KEY: &str = "user_id";

/// Key used for the stashed return location unless configured otherwise.
pub const DEFAULT_RETURN_TO_KEY: &str = "return_to";

/// A mutable string key/value store scoped to one client.
///
/// Implement this for whatever session type your framework provides.
/// All methods are infallible: a session backend that can fail should
/// surface that failure when the host loads or saves the session, not here.
///
/// # Examples
///
/// ```
/// use access_gate::{MemorySession, Session};
///
/// let mut session = MemorySession::new();
/// session.insert("user_id", "42".to_string());
/// assert_eq!(session.get("user_id").as_deref(), Some("42"));
///
/// assert_eq!(session.remove("user_id").as_deref(), Some("42"));
/// assert!(session.get("user_id").is_none());
/// ```
pub trait Session {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn insert(&mut self, key: &str, value: String);

    /// Removes `key`, returning the value it held.
    fn remove(&mut self, key: &str) -> Option<String>;
}

/// Names of the session keys the gate reads and writes.
///
/// # Examples
///
/// ```
/// use access_gate::SessionKeys;
///
/// let keys = SessionKeys::default();
/// assert_eq!(keys.user_id(), "user_id");
/// assert_eq!(keys.return_to(), "return_to");
///
/// let keys = SessionKeys::new("uid", "next");
/// assert_eq!(keys.user_id(), "uid");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKeys {
    user_id: String,
    return_to: String,
}

impl SessionKeys {
    /// Creates a key set with custom names.
    pub fn new(user_id: impl Into<String>, return_to: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            return_to: return_to.into(),
        }
    }

    /// Key holding the bound principal's identifier.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Key holding the stashed return location.
    pub fn return_to(&self) -> &str {
        &self.return_to
    }
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self::new(DEFAULT_USER_ID_KEY, DEFAULT_RETURN_TO_KEY)
    }
}

/// In-memory [`Session`] backed by a `HashMap`.
///
/// Useful for tests and for hosts that keep sessions in process memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySession {
    values: HashMap<String, String>,
}

impl MemorySession {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Session for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn insert(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }
}

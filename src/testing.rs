//! Helpers for testing code that sits behind the gate.
//!
//! **These types are for tests and documentation.** They record what the
//! gate asked the host to do instead of producing real responses.

use crate::response::{Denial, Responder};

/// A [`Responder`] that records every call.
///
/// Redirects are recorded as `"to:<target>"` for [`Responder::redirect_to`]
/// and `"uri:<uri>"` for [`Responder::redirect_to_uri`].
///
/// # Examples
///
/// ```
/// use access_gate::Responder;
/// use access_gate::testing::RecordingResponder;
///
/// let mut responder = RecordingResponder::new();
/// responder.redirect_to("/home");
///
/// assert_eq!(responder.redirects(), vec!["to:/home"]);
/// assert_eq!(responder.denial_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingResponder {
    denials: Vec<Denial>,
    redirects: Vec<String>,
}

impl RecordingResponder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Denials received, oldest first.
    pub fn denials(&self) -> &[Denial] {
        &self.denials
    }

    /// Number of `access_denied` calls.
    pub fn denial_count(&self) -> usize {
        self.denials.len()
    }

    /// The most recent denial, if any.
    pub fn last_denial(&self) -> Option<&Denial> {
        self.denials.last()
    }

    /// Redirects issued, oldest first.
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.clone()
    }
}

impl Responder for RecordingResponder {
    fn access_denied(&mut self, denial: &Denial) {
        self.denials.push(denial.clone());
    }

    fn redirect_to(&mut self, target: &str) {
        self.redirects.push(format!("to:{target}"));
    }

    fn redirect_to_uri(&mut self, uri: &str) {
        self.redirects.push(format!("uri:{uri}"));
    }
}

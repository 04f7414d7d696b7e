//! Single-slot memory of where a denied request was headed.

use crate::response::{Redirect, Responder};
use crate::session::{Session, SessionKeys};

/// Records the URI of a denied request so the client can be sent back there
/// after logging in.
///
/// The stash is one slot, not a queue: the most recent denial wins. A stashed
/// location is consumed by [`redirect_back_or_default`](Self::redirect_back_or_default)
/// and never reused.
///
/// # Examples
///
/// ```
/// use access_gate::{MemorySession, Redirect, Responder, ReturnLocationStash, Denial};
///
/// # #[derive(Default)] struct Reply(Option<String>);
/// # impl Responder for Reply {
/// #     fn access_denied(&mut self, _: &Denial) {}
/// #     fn redirect_to(&mut self, t: &str) { self.0 = Some(t.to_string()) }
/// #     fn redirect_to_uri(&mut self, u: &str) { self.0 = Some(u.to_string()) }
/// # }
/// let stash = ReturnLocationStash::new();
/// let mut session = MemorySession::new();
/// let mut reply = Reply::default();
///
/// stash.store(&mut session, "/orders");
/// let redirect = stash.redirect_back_or_default(&mut session, &mut reply, "/home");
///
/// assert_eq!(redirect, Redirect::Back("/orders".to_string()));
/// assert!(stash.stashed(&session).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReturnLocationStash {
    keys: SessionKeys,
}

impl ReturnLocationStash {
    /// Creates a stash using the default session keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the session key names.
    pub fn session_keys(mut self, keys: SessionKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Remembers `uri`, replacing anything stashed earlier.
    pub fn store(&self, session: &mut dyn Session, uri: &str) {
        session.insert(self.keys.return_to(), uri.to_string());
    }

    /// Returns the stashed location without consuming it.
    pub fn stashed(&self, session: &dyn Session) -> Option<String> {
        session.get(self.keys.return_to())
    }

    /// Redirects to the stashed location and clears it, or redirects to
    /// `default` when nothing is stashed.
    pub fn redirect_back_or_default(
        &self,
        session: &mut dyn Session,
        responder: &mut dyn Responder,
        default: &str,
    ) -> Redirect {
        match session.remove(self.keys.return_to()) {
            Some(uri) => {
                responder.redirect_to_uri(&uri);
                Redirect::Back(uri)
            }
            None => {
                responder.redirect_to(default);
                Redirect::Default(default.to_string())
            }
        }
    }
}
